//! Command-line driver for the RSA accumulator.
//!
//! Runs the membership walkthrough, times accumulation over synthetic sets,
//! and prints representatives or setup parameters.  Integers are printed in
//! decimal; durations in seconds.

use rsa_accumulator::{
    accumulate, accumulate_and_prove_with, accumulate_items_with, generate_proofs,
    generate_representatives_with, hash_to_prime, obtain_setup, update_accumulator, verify,
    EncoderConfig, EncodingScheme, Setup,
};
use std::{
    env,
    time::{Duration, Instant},
};

const DEMO_ITEMS: [&str; 3] = ["Alice", "Bob", "Charlie"];
const DEMO_NEW_ITEM: &str = "David";

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn timing_line(label: &str, elapsed: Duration) -> String {
    format!("Running {label} took [{:.3}] seconds", elapsed.as_secs_f64())
}

fn print_help() {
    println!("Usage: rsa-acc <demo|bench|encode|setup> ...");
    println!("  demo [--scheme <name>]");
    println!("  bench [--elements <N>] [--with-proofs] [--scheme <name>]");
    println!("  encode [--scheme <name>] <item>...");
    println!("  setup");
    println!("Environment: RSA_ACC_MR_ROUNDS, RSA_ACC_MAX_INCREMENTS, RUST_LOG");
}

fn main() {
    env_logger::init();
    let mut args = env::args().skip(1);
    let command = args.next();
    match command.as_deref() {
        Some("demo") => cmd_demo(args.collect()),
        Some("bench") => cmd_bench(args.collect()),
        Some("encode") => cmd_encode(args.collect()),
        Some("setup") => cmd_setup(),
        Some("-h") | Some("--help") => print_help(),
        _ => {
            print_help();
            std::process::exit(1);
        }
    }
}

fn load_setup() -> Setup {
    obtain_setup().unwrap_or_else(|err| fatal(&format!("setup rejected: {err}")))
}

fn load_config() -> EncoderConfig {
    EncoderConfig::from_env().unwrap_or_else(|err| fatal(&err.to_string()))
}

fn parse_scheme(value: Option<String>) -> EncodingScheme {
    let value = value.unwrap_or_else(|| fatal("--scheme expects a value"));
    value
        .parse()
        .unwrap_or_else(|err: rsa_accumulator::AccumulatorError| fatal(&err.to_string()))
}

fn cmd_setup() {
    let setup = load_setup();
    println!("{}", setup.to_json_string());
}

fn cmd_encode(args: Vec<String>) {
    let config = load_config();
    let mut scheme = EncodingScheme::default();
    let mut items = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scheme" => scheme = parse_scheme(iter.next()),
            _ => items.push(arg),
        }
    }
    if items.is_empty() {
        fatal("encode expects at least one item");
    }
    for item in &items {
        let rep = hash_to_prime(item.as_bytes(), scheme, &config)
            .unwrap_or_else(|err| fatal(&format!("{item}: {err}")));
        println!("{item}: {rep}");
    }
}

fn cmd_demo(args: Vec<String>) {
    let mut scheme = EncodingScheme::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scheme" => scheme = parse_scheme(iter.next()),
            other => fatal(&format!("unknown argument: {other}")),
        }
    }
    let config = load_config();
    let setup = load_setup();
    println!("Param N:\n{}", setup.modulus());

    let started = Instant::now();
    let (value, witnesses) = accumulate_and_prove_with(&setup, &DEMO_ITEMS, scheme, &config)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    println!("{}", timing_line("accumulate_and_prove", started.elapsed()));
    println!("Initial accumulator value:\n{value}");

    let reps = generate_representatives_with(&DEMO_ITEMS, scheme, &config)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    for ((item, witness), rep) in DEMO_ITEMS.iter().zip(&witnesses).zip(&reps) {
        println!(
            "Element {item} proof verification result: {}",
            verify(witness, rep, &setup, &value)
        );
    }

    let started = Instant::now();
    let new_rep = hash_to_prime(DEMO_NEW_ITEM.as_bytes(), scheme, &config)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    let updated = update_accumulator(&value, &new_rep, &setup);
    println!("{}", timing_line("update_accumulator", started.elapsed()));
    println!("Updated accumulator value:\n{updated}");

    let mut extended: Vec<&str> = DEMO_ITEMS.to_vec();
    extended.push(DEMO_NEW_ITEM);
    let started = Instant::now();
    let extended_reps = generate_representatives_with(&extended, scheme, &config)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    let rebuilt =
        accumulate(&setup, &extended_reps).unwrap_or_else(|err| fatal(&err.to_string()));
    println!("{}", timing_line("full rebuild", started.elapsed()));
    println!("Rebuilt accumulator value:\n{rebuilt}");
    if rebuilt == updated {
        println!("Incremental update matches the full rebuild.");
    } else {
        fatal("Incremental update does not match the full rebuild.");
    }

    let new_witnesses =
        generate_proofs(&setup, &extended_reps).unwrap_or_else(|err| fatal(&err.to_string()));
    let last = extended_reps.len() - 1;
    println!(
        "New element {DEMO_NEW_ITEM} proof verification result: {}",
        verify(&new_witnesses[last], &extended_reps[last], &setup, &updated)
    );
    for ((item, witness), rep) in DEMO_ITEMS.iter().zip(&witnesses).zip(&reps) {
        println!(
            "Stale proof for {item} against updated value: {}",
            verify(witness, rep, &setup, &updated)
        );
    }
}

fn cmd_bench(args: Vec<String>) {
    let mut elements = 1000usize;
    let mut with_proofs = false;
    let mut scheme = EncodingScheme::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--elements" => {
                let value = iter
                    .next()
                    .unwrap_or_else(|| fatal("--elements expects a value"));
                elements = value
                    .parse()
                    .unwrap_or_else(|_| fatal("invalid --elements value"));
            }
            "--with-proofs" => with_proofs = true,
            "--scheme" => scheme = parse_scheme(iter.next()),
            other => fatal(&format!("unknown argument: {other}")),
        }
    }
    let config = load_config();
    let setup = load_setup();
    let items: Vec<String> = (0..elements).map(|i| format!("Element {i}")).collect();
    let started = Instant::now();
    let value = if with_proofs {
        println!("Testing {elements} elements with proofs...");
        accumulate_and_prove_with(&setup, &items, scheme, &config)
            .map(|(value, _)| value)
            .unwrap_or_else(|err| fatal(&err.to_string()))
    } else {
        println!("Testing {elements} elements without proofs...");
        accumulate_items_with(&setup, &items, scheme, &config)
            .unwrap_or_else(|err| fatal(&err.to_string()))
    };
    println!("{}", timing_line("accumulation", started.elapsed()));
    println!("Accumulator value:\n{value}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_line_uses_three_decimals() {
        assert_eq!(
            timing_line("accumulate_and_prove", Duration::from_millis(1234)),
            "Running accumulate_and_prove took [1.234] seconds"
        );
        assert_eq!(
            timing_line("full rebuild", Duration::ZERO),
            "Running full rebuild took [0.000] seconds"
        );
    }
}
