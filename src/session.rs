//! Stateful accumulator sessions and end-to-end pipelines.
//!
//! [`RsaAccumulator`] owns a setup, an encoding scheme and the ordered list
//! of member representatives.  It applies additions incrementally, refuses
//! to add an item twice, and produces witnesses on demand against its
//! current value.  The free functions [`accumulate_and_prove`] and
//! [`accumulate_items`] run the whole items-to-value pipeline in one call;
//! their `_with` variants take an explicit [`EncoderConfig`].

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info};

use crate::accumulator::{
    accumulate, accumulate_from_witness, update_accumulator, AccumulatorValue,
};
use crate::error::{AccumulatorError, Result};
use crate::prime::{hash_to_prime, EncoderConfig};
use crate::representative::{generate_representatives_with, EncodingScheme, Representative};
use crate::setup::Setup;
use crate::witness::{generate_proof_at, generate_proofs, MembershipProof, Witness};

/// An append-only accumulator with set semantics.
#[derive(Debug, Clone)]
pub struct RsaAccumulator {
    setup: Setup,
    scheme: EncodingScheme,
    config: EncoderConfig,
    members: Vec<Representative>,
    positions: HashMap<Representative, usize>,
    value: AccumulatorValue,
}

impl RsaAccumulator {
    /// Creates an empty accumulator whose value is the generator.
    pub fn new(setup: Setup, scheme: EncodingScheme) -> Self {
        let value = AccumulatorValue::empty(&setup);
        Self {
            setup,
            scheme,
            config: EncoderConfig::default(),
            members: Vec::new(),
            positions: HashMap::new(),
            value,
        }
    }

    /// Replaces the prime-search configuration.
    pub fn with_config(mut self, config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Builds an accumulator over `items` with one full aggregation.
    pub fn with_items<T>(setup: Setup, scheme: EncodingScheme, items: &[T]) -> Result<Self>
    where
        T: AsRef<[u8]> + Sync,
    {
        Self::with_items_config(setup, scheme, EncoderConfig::default(), items)
    }

    /// Like [`RsaAccumulator::with_items`], encoding under `config`.
    ///
    /// The configuration is kept for every later `add`, `contains` and `prove`.
    pub fn with_items_config<T>(
        setup: Setup,
        scheme: EncodingScheme,
        config: EncoderConfig,
        items: &[T],
    ) -> Result<Self>
    where
        T: AsRef<[u8]> + Sync,
    {
        let mut acc = Self::new(setup, scheme).with_config(config)?;
        let reps = generate_representatives_with(items, scheme, &acc.config)?;
        acc.value = accumulate(&acc.setup, &reps)?;
        for (idx, rep) in reps.iter().enumerate() {
            acc.positions.insert(rep.clone(), idx);
        }
        acc.members = reps;
        Ok(acc)
    }

    /// Current accumulator value.
    pub fn value(&self) -> &AccumulatorValue {
        &self.value
    }

    /// Parameters this accumulator is bound to.
    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    /// Encoding scheme applied to new items.
    pub fn scheme(&self) -> EncodingScheme {
        self.scheme
    }

    /// Member representatives in insertion order.
    pub fn representatives(&self) -> &[Representative] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn encode(&self, item: &[u8]) -> Result<Representative> {
        hash_to_prime(item, self.scheme, &self.config)
    }

    /// Whether `item` has been accumulated.
    pub fn contains(&self, item: impl AsRef<[u8]>) -> Result<bool> {
        let rep = self.encode(item.as_ref())?;
        Ok(self.positions.contains_key(&rep))
    }

    /// Adds `item` with a single exponentiation and returns the new value.
    ///
    /// Every witness issued before this call is stale afterwards.
    pub fn add(&mut self, item: impl AsRef<[u8]>) -> Result<&AccumulatorValue> {
        let rep = self.encode(item.as_ref())?;
        if let Some(&first) = self.positions.get(&rep) {
            return Err(AccumulatorError::DuplicateRepresentative {
                first,
                second: self.members.len(),
            });
        }
        self.value = update_accumulator(&self.value, &rep, &self.setup);
        self.positions.insert(rep.clone(), self.members.len());
        self.members.push(rep);
        debug!("accumulator now holds {} members", self.members.len());
        Ok(&self.value)
    }

    /// Adds each item in order.
    pub fn extend<I, T>(&mut self, items: I) -> Result<&AccumulatorValue>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for item in items {
            self.add(item)?;
        }
        Ok(&self.value)
    }

    /// Produces a membership proof for `item` against the current value.
    pub fn prove(&self, item: impl AsRef<[u8]>) -> Result<MembershipProof> {
        let rep = self.encode(item.as_ref())?;
        let &index = self.positions.get(&rep).ok_or(AccumulatorError::NotAMember)?;
        self.prove_at(index)
    }

    /// Produces a membership proof for the member at `index`.
    pub fn prove_at(&self, index: usize) -> Result<MembershipProof> {
        let witness = generate_proof_at(&self.setup, &self.members, index)?;
        Ok(MembershipProof {
            representative: self.members[index].clone(),
            witness,
        })
    }

    /// Produces proofs for every member, in insertion order.
    pub fn prove_all(&self) -> Result<Vec<MembershipProof>> {
        let witnesses = generate_proofs(&self.setup, &self.members)?;
        Ok(self
            .members
            .iter()
            .cloned()
            .zip(witnesses)
            .map(|(representative, witness)| MembershipProof {
                representative,
                witness,
            })
            .collect())
    }

    /// Verifies `proof` against the current value.
    pub fn check_membership(&self, proof: &MembershipProof) -> Result<()> {
        proof.check(&self.setup, &self.value)
    }

    /// Recomputes the value from scratch over every member.
    ///
    /// The result always equals [`RsaAccumulator::value`]; this is the full
    /// rebuild the incremental path is checked against.
    pub fn rebuild(&self) -> Result<AccumulatorValue> {
        accumulate(&self.setup, &self.members)
    }
}

/// Encodes `items`, computes every witness and derives the accumulator from
/// the first witness.
///
/// Returns the value and one witness per item, in item order.  An empty
/// input yields the empty accumulator and no witnesses.  Encodes under the
/// default [`EncoderConfig`]; see [`accumulate_and_prove_with`].
pub fn accumulate_and_prove<T>(
    setup: &Setup,
    items: &[T],
    scheme: EncodingScheme,
) -> Result<(AccumulatorValue, Vec<Witness>)>
where
    T: AsRef<[u8]> + Sync,
{
    accumulate_and_prove_with(setup, items, scheme, &EncoderConfig::default())
}

/// [`accumulate_and_prove`] under an explicit prime-search configuration.
///
/// Debug builds also aggregate directly and assert that both constructions
/// agree.
pub fn accumulate_and_prove_with<T>(
    setup: &Setup,
    items: &[T],
    scheme: EncodingScheme,
    config: &EncoderConfig,
) -> Result<(AccumulatorValue, Vec<Witness>)>
where
    T: AsRef<[u8]> + Sync,
{
    let started = Instant::now();
    let reps = generate_representatives_with(items, scheme, config)?;
    info!(
        "generated {} representatives in {:.3}s",
        reps.len(),
        started.elapsed().as_secs_f64()
    );
    let witnesses = generate_proofs(setup, &reps)?;
    let value = if reps.is_empty() {
        AccumulatorValue::empty(setup)
    } else {
        accumulate_from_witness(setup, &reps, &witnesses)?
    };
    #[cfg(debug_assertions)]
    {
        let direct = accumulate(setup, &reps)?;
        debug_assert_eq!(
            value, direct,
            "witness-derived accumulator disagrees with direct aggregation"
        );
    }
    Ok((value, witnesses))
}

/// Encodes `items` and accumulates them without producing witnesses.
pub fn accumulate_items<T>(setup: &Setup, items: &[T], scheme: EncodingScheme) -> Result<AccumulatorValue>
where
    T: AsRef<[u8]> + Sync,
{
    accumulate_items_with(setup, items, scheme, &EncoderConfig::default())
}

/// [`accumulate_items`] under an explicit prime-search configuration.
pub fn accumulate_items_with<T>(
    setup: &Setup,
    items: &[T],
    scheme: EncodingScheme,
    config: &EncoderConfig,
) -> Result<AccumulatorValue>
where
    T: AsRef<[u8]> + Sync,
{
    let reps = generate_representatives_with(items, scheme, config)?;
    accumulate(setup, &reps)
}
