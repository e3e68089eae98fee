//! Text Matching
//!
//! This example evolves a string toward a target phrase. Each character is
//! one gene holding a single allele, decoded by indexing into an alphabet;
//! fitness counts the characters already in place. The observer stops the
//! engine as soon as the phrase is matched.
//!
//! Run with `RUST_LOG=debug` to see per-generation statistics, and pass a
//! phrase as the first argument to override the default target.

use gene_pool::prelude::*;

const ALPHABET: &[u8] = b" abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ,.;:!?";

/// Decode a chromosome into text, one character per gene
fn decode(chromosome: &Chromosome) -> String {
    chromosome
        .genes()
        .iter()
        .map(|gene| {
            let index = (gene[0] * ALPHABET.len() as f64) as usize;
            ALPHABET[index.min(ALPHABET.len() - 1)] as char
        })
        .collect()
}

/// Number of positions where the decoded text matches the target
fn matching(decoded: &str, target: &str) -> usize {
    decoded
        .bytes()
        .zip(target.bytes())
        .filter(|(a, b)| a == b)
        .count()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello, World!".to_string());
    if let Some(c) = target.bytes().find(|c| !ALPHABET.contains(c)) {
        return Err(format!("character {:?} is not in the alphabet", c as char).into());
    }

    println!("=== Text Matching ===\n");
    println!("Target: {target:?}\n");

    let length = target.len();
    let evaluated = target.clone();
    let settings = EngineSettings {
        gene_length: 1,
        chromosome_length: length,
        iterations: 100_000,
        ..EngineSettings::default()
    };
    println!("Settings:\n{}\n", settings.to_json()?);

    let configuration = Configuration::builder()
        .settings(settings)
        .evaluator(move |chromosome: &Chromosome| {
            matching(&decode(chromosome), &evaluated) as f64
        })
        .observer(move |generation, engine: &Engine| {
            let Ok(best) = engine.best() else { return };
            if generation % 100 == 0 {
                println!(
                    "Gen {:5}: {:?} {{{}/{}}}",
                    generation,
                    decode(best.chromosome()),
                    best.fitness(),
                    length
                );
            }
            if best.fitness() as usize == length {
                engine.stop();
            }
        })
        .build()?;

    let mut engine = Engine::new(configuration);
    let summary = engine.start()?;

    println!("\nCompleted in {:?}", summary.elapsed);
    println!(
        "{:?}\t{{{}/{}}}",
        decode(summary.best.chromosome()),
        summary.best.fitness(),
        length
    );
    println!("\n{}", summary.summary());

    Ok(())
}
