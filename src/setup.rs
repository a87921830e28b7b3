//! Public parameters of the hidden-order group.
//!
//! A [`Setup`] bundles the RSA modulus `N`, the generator `G` used for every
//! accumulation and an auxiliary generator `H` kept for future proof systems.
//! All three are validated when the value is built, so every other module can
//! assume a usable group.  The factorization of `N` is never known to this
//! crate; generating fresh parameters is left to an external ceremony plugged
//! in through [`SetupSource`].

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{AccumulatorError, Result};

/// Bit length of the modulus shipped with [`FixedSetup`].
pub const RSA_BIT_LENGTH: u64 = 2048;

const N_2048: &str = "22582513446883649683242153375773765418277977026848618150278436227443969113525388\
    36096541459638229267163201015427202779249828939046432609312896347452592574312540\
    41870906382215874552850894945627517934890981827613209538286574391300442523382831\
    09583198301789045090284695934345711523245381620643226632165168827411546661236460\
    97338998226338540678944385898507309147352973232535609883082529927598520206085210\
    27759429400394431552279867484572615854403685288349101828514337055872230406109349\
    54417065434756145769875043620201897615075786323297141320586481340831246603933018\
    654794846594742280842668198512719618188992528830140149361";

const G_2048: &str = "37343205781669227689763073050812803036582373034829217932433100320021329513254268\
    85895423150554487167609218974062079302792001919827304933109188668552532361245089\
    02938029438416978760691140109485651191670999995476423294832377950382086089345951\
    49287137449837073600782642670389007988438934056649905215313269199971063381390560\
    96176409033756102908667173913246197068450150318832809948977367751025873698025220\
    76678200361195613060474264474661070852058196953841620645566597224804795977907911\
    80362994176019685762594266481587146144528610314915533051871135459163303226860537\
    58561416773919173504690956803771722726889946697788319929";

const H_2048: &str = "2";

/// Validated RSA accumulator parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    n: BigUint,
    g: BigUint,
    h: BigUint,
}

impl Setup {
    /// Builds a setup after checking that `g` and `h` are units modulo `n`.
    ///
    /// Rejects a modulus below 3 or an even modulus, a generator outside
    /// `[2, n)`, and an auxiliary generator outside `[1, n)`.  Both
    /// generators must be coprime to `n`.
    pub fn new(n: BigUint, g: BigUint, h: BigUint) -> Result<Self> {
        if n < BigUint::from(3u8) {
            return Err(AccumulatorError::invalid_setup("modulus must be at least 3"));
        }
        if n.is_even() {
            return Err(AccumulatorError::invalid_setup("modulus must be odd"));
        }
        if g <= BigUint::one() || g >= n {
            return Err(AccumulatorError::invalid_setup(
                "generator must lie in [2, N)",
            ));
        }
        if !g.gcd(&n).is_one() {
            return Err(AccumulatorError::invalid_setup(
                "generator shares a factor with the modulus",
            ));
        }
        if h.is_zero() || h >= n {
            return Err(AccumulatorError::invalid_setup(
                "auxiliary generator must lie in [1, N)",
            ));
        }
        if !h.gcd(&n).is_one() {
            return Err(AccumulatorError::invalid_setup(
                "auxiliary generator shares a factor with the modulus",
            ));
        }
        Ok(Self { n, g, h })
    }

    /// Parses decimal strings and validates them like [`Setup::new`].
    pub fn from_decimal(n: &str, g: &str, h: &str) -> Result<Self> {
        Self::new(parse_decimal(n)?, parse_decimal(g)?, parse_decimal(h)?)
    }

    /// The RSA modulus `N`.
    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// The accumulation base `G`.
    #[inline]
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// The reserved auxiliary generator `H`.
    #[inline]
    pub fn auxiliary(&self) -> &BigUint {
        &self.h
    }

    /// Number of significant bits in the modulus.
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

fn parse_decimal(text: &str) -> Result<BigUint> {
    BigUint::parse_bytes(text.trim().as_bytes(), 10)
        .ok_or_else(|| AccumulatorError::InvalidInteger(format!("not a decimal integer: {text}")))
}

/// A provider of setup parameters.
///
/// Implementations wrap whatever procedure produced the modulus.  Callers
/// load once and thread the resulting [`Setup`] through every operation.
pub trait SetupSource {
    /// Produces validated parameters.
    fn load(&self) -> Result<Setup>;
}

/// The fixed 2048-bit parameters used by the reference deployment.
///
/// These are demonstration constants.  Anyone relying on them must trust
/// that the factorization of the modulus was discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSetup;

impl SetupSource for FixedSetup {
    fn load(&self) -> Result<Setup> {
        Setup::from_decimal(N_2048, G_2048, H_2048)
    }
}

/// Returns the fixed 2048-bit setup.
pub fn obtain_setup() -> Result<Setup> {
    FixedSetup.load()
}
