//! CLI: create a secret from original words
//!
//! Reads a `Params` JSON file, computes the public recovery state for the
//! given original words, writes it out, and prints the first derived keys:
//!
//! ```text
//! gen_secret --params-path params.json --words "1 2 3 4" \
//!            [--secret-path secret.json] [--key-count 1]
//! ```

#![forbid(unsafe_code)]

use std::{env, fs};

use anyhow::Context;
use fuzzyvault::{codec, gen_keys, gen_secret, Params};

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
    let params_path =
        parse_flag(&args, "--params-path").unwrap_or_else(|| "params.json".to_string());
    let secret_path =
        parse_flag(&args, "--secret-path").unwrap_or_else(|| "secret.json".to_string());
    let words_text = parse_flag(&args, "--words").context("--words is required")?;
    let key_count: usize = parse_flag(&args, "--key-count")
        .unwrap_or_else(|| "1".to_string())
        .parse()
        .context("--key-count must be a non-negative integer")?;

    let original_words = parse_words(&words_text)?;
    let params_text = fs::read_to_string(&params_path)
        .with_context(|| format!("read {params_path}"))?;
    let params: Params =
        serde_json::from_str(&params_text).with_context(|| format!("parse {params_path}"))?;

    let secret = gen_secret(&params, &original_words).context("secret generation failed")?;
    let keys = gen_keys(&secret, &original_words, key_count)
        .context("key derivation failed")?;

    println!("keys:");
    for key in &keys {
        println!("- {}", codec::bytes_to_hex(key));
    }

    let mut text = serde_json::to_string_pretty(&secret)?;
    text.push('\n');
    fs::write(&secret_path, text)
        .with_context(|| format!("write {secret_path}"))?;
    eprintln!("writing secret to {secret_path}");
    Ok(())
}
