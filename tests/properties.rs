use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use rsa_accumulator::{
    accumulate, accumulate_from_witness, encode_to_prime, generate_proofs,
    generate_representatives, is_probable_prime, obtain_setup, update_accumulator, verify,
    EncodingScheme, Setup, DEFAULT_MR_ROUNDS,
};

fn setup() -> Setup {
    obtain_setup().unwrap()
}

fn item_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-zA-Z0-9]{1,12}", 1..5).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn encoding_is_deterministic_and_prime(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let first = encode_to_prime(&bytes).unwrap();
        let second = encode_to_prime(&bytes).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(is_probable_prime(first.as_biguint(), DEFAULT_MR_ROUNDS));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn members_verify(items in item_set()) {
        let setup = setup();
        let reps = generate_representatives(&items, EncodingScheme::default()).unwrap();
        let value = accumulate(&setup, &reps).unwrap();
        let witnesses = generate_proofs(&setup, &reps).unwrap();
        for (w, r) in witnesses.iter().zip(&reps) {
            prop_assert!(verify(w, r, &setup, &value));
        }
        prop_assert_eq!(accumulate_from_witness(&setup, &reps, &witnesses).unwrap(), value);
    }

    #[test]
    fn update_equals_rebuild_and_stales_witnesses(items in item_set(), extra in "[#@!]{1,6}") {
        let setup = setup();
        let reps = generate_representatives(&items, EncodingScheme::default()).unwrap();
        let value = accumulate(&setup, &reps).unwrap();
        let witnesses = generate_proofs(&setup, &reps).unwrap();

        let new_rep = encode_to_prime(extra.as_bytes()).unwrap();
        let updated = update_accumulator(&value, &new_rep, &setup);
        let mut extended = reps.clone();
        extended.push(new_rep);
        prop_assert_eq!(&updated, &accumulate(&setup, &extended).unwrap());
        for (w, r) in witnesses.iter().zip(&reps) {
            prop_assert!(!verify(w, r, &setup, &updated));
        }
    }

    #[test]
    fn order_independent(items in item_set(), seed in any::<u64>()) {
        let setup = setup();
        let reps = generate_representatives(&items, EncodingScheme::default()).unwrap();
        let mut shuffled = reps.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(
            accumulate(&setup, &reps).unwrap(),
            accumulate(&setup, &shuffled).unwrap()
        );
    }
}
