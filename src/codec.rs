//! JSON documents for setups and membership proofs.
//!
//! Big integers travel as lowercase big-endian hex strings.  Decoding
//! re-validates everything: setups go through [`Setup::new`], and proof
//! representatives are re-tested for primality.

use num_bigint::BigUint;
use serde_json::{json, Value};

use crate::error::{AccumulatorError, Result};
use crate::prime::DEFAULT_MR_ROUNDS;
use crate::representative::Representative;
use crate::setup::Setup;
use crate::witness::{MembershipProof, Witness};
use crate::AccumulatorValue;

/// Encodes an integer as big-endian hex.  Zero encodes as `"00"`.
pub fn biguint_to_hex(value: &BigUint) -> String {
    hex::encode(value.to_bytes_be())
}

/// Decodes a big-endian hex string, with or without a `0x` prefix.
pub fn biguint_from_hex(input: &str) -> Result<BigUint> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(AccumulatorError::InvalidInteger("empty hex string".to_string()));
    }
    if digits.len() % 2 == 1 {
        return Ok(BigUint::from_bytes_be(&hex::decode(format!("0{digits}"))?));
    }
    Ok(BigUint::from_bytes_be(&hex::decode(digits)?))
}

fn hex_field(value: &Value, name: &str) -> Result<BigUint> {
    let text = value
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| AccumulatorError::Codec(format!("missing {name}")))?;
    biguint_from_hex(text)
}

impl Setup {
    /// Serialises the parameters to a JSON string.
    pub fn to_json_string(&self) -> String {
        json!({
            "bits": self.bit_length(),
            "n": biguint_to_hex(self.modulus()),
            "g": biguint_to_hex(self.generator()),
            "h": biguint_to_hex(self.auxiliary()),
        })
        .to_string()
    }

    /// Parses and validates parameters emitted by [`Setup::to_json_string`].
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Setup::new(
            hex_field(&value, "n")?,
            hex_field(&value, "g")?,
            hex_field(&value, "h")?,
        )
    }
}

impl MembershipProof {
    /// Serialises the proof to a JSON string.
    pub fn to_json_string(&self) -> String {
        json!({
            "representative": biguint_to_hex(self.representative.as_biguint()),
            "witness": biguint_to_hex(self.witness.as_biguint()),
        })
        .to_string()
    }

    /// Parses a proof emitted by [`MembershipProof::to_json_string`].
    ///
    /// The witness is reduced modulo the setup's modulus and the
    /// representative must still pass the primality test.
    pub fn from_json_str(input: &str, setup: &Setup) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        let representative =
            Representative::new(hex_field(&value, "representative")?, DEFAULT_MR_ROUNDS)?;
        let witness = Witness::from_biguint(hex_field(&value, "witness")?, setup);
        Ok(Self {
            representative,
            witness,
        })
    }
}

impl AccumulatorValue {
    /// Hex form of the value.
    pub fn to_hex(&self) -> String {
        biguint_to_hex(self.as_biguint())
    }

    /// Parses a hex value and reduces it modulo the setup's modulus.
    pub fn from_hex(input: &str, setup: &Setup) -> Result<Self> {
        Ok(AccumulatorValue::from_biguint(biguint_from_hex(input)?, setup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::obtain_setup;
    use crate::{EncodingScheme, RsaAccumulator};

    #[test]
    fn hex_helpers() {
        assert_eq!(biguint_to_hex(&BigUint::from(0x1234u32)), "1234");
        assert_eq!(biguint_from_hex("0x234").unwrap(), BigUint::from(0x234u32));
        assert!(biguint_from_hex("").is_err());
        assert!(matches!(
            biguint_from_hex("zz"),
            Err(AccumulatorError::InvalidInteger(_))
        ));
    }

    #[test]
    fn setup_json() {
        let setup = obtain_setup().unwrap();
        let parsed = Setup::from_json_str(&setup.to_json_string()).unwrap();
        assert_eq!(parsed, setup);
        let bad = json!({ "n": "0f", "g": "03", "h": "02" }).to_string();
        assert!(matches!(
            Setup::from_json_str(&bad),
            Err(AccumulatorError::InvalidSetup { .. })
        ));
        assert!(matches!(
            Setup::from_json_str("{\"n\": \"0f\"}"),
            Err(AccumulatorError::Codec(_))
        ));
    }

    #[test]
    fn proof_json_still_verifies() {
        let acc = RsaAccumulator::with_items(
            obtain_setup().unwrap(),
            EncodingScheme::default(),
            &["Alice", "Bob"],
        )
        .unwrap();
        let proof = acc.prove("Alice").unwrap();
        let parsed = MembershipProof::from_json_str(&proof.to_json_string(), acc.setup()).unwrap();
        assert_eq!(parsed, proof);
        assert!(parsed.verify(acc.setup(), acc.value()));
        let value = AccumulatorValue::from_hex(&acc.value().to_hex(), acc.setup()).unwrap();
        assert_eq!(&value, acc.value());
    }

    #[test]
    fn composite_representative_rejected() {
        let setup = obtain_setup().unwrap();
        let doc = json!({ "representative": "5b", "witness": "02" }).to_string();
        assert!(matches!(
            MembershipProof::from_json_str(&doc, &setup),
            Err(AccumulatorError::InvalidInteger(_))
        ));
    }
}
