//! CLI: derive keys from a recovery guess
//!
//! Reads a `Secret` JSON file and prints the derived keys as a JSON array of
//! upper-case hex strings, or a human-readable failure:
//!
//! ```text
//! gen_keys --secret secret.json --words "1 2 3 4" [--key-count 1]
//! ```

#![forbid(unsafe_code)]

use std::{env, fs};

use anyhow::Context;
use fuzzyvault::{codec, gen_keys, Secret};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn parse_words(text: &str) -> anyhow::Result<Vec<u64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse::<u64>()
                .with_context(|| format!("word `{tok}` is not a non-negative integer"))
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "fuzzyvault=info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = env::args().collect();
    let secret_path = parse_flag(&args, "--secret").unwrap_or_else(|| "secret.json".to_string());
    let words_text = parse_flag(&args, "--words").context("--words is required")?;
    let key_count: usize = parse_flag(&args, "--key-count")
        .unwrap_or_else(|| "1".to_string())
        .parse()
        .context("--key-count must be a non-negative integer")?;

    let recovery_words = parse_words(&words_text)?;
    let secret_text = fs::read_to_string(&secret_path)
        .with_context(|| format!("read {secret_path}"))?;
    let secret: Secret =
        serde_json::from_str(&secret_text).with_context(|| format!("parse {secret_path}"))?;

    let keys = gen_keys(&secret, &recovery_words, key_count)
        .context("key recovery failed")?;

    let rendered: Vec<String> = keys.iter().map(|k| codec::bytes_to_hex(k)).collect();
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
