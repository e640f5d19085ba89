//! CLI: generate public parameters
//!
//! Writes a `Params` JSON file for later use by `gen_secret`:
//!
//! ```text
//! gen_params --set-size 9 --correct-threshold 6 --corpus-size 7000 \
//!            [--params-path params.json]
//! ```

#![forbid(unsafe_code)]

use std::{env, fs};

use anyhow::Context;
use fuzzyvault::{gen_params, Input};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn required_usize(args: &[String], key: &str) -> anyhow::Result<usize> {
    parse_flag(args, key)
        .with_context(|| format!("{key} is required"))?
        .parse()
        .with_context(|| format!("{key} must be a non-negative integer"))
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
    let set_size = required_usize(&args, "--set-size")?;
    let correct_threshold = required_usize(&args, "--correct-threshold")?;
    let corpus_size = required_usize(&args, "--corpus-size")? as u64;
    let params_path =
        parse_flag(&args, "--params-path").unwrap_or_else(|| "params.json".to_string());

    let input = Input {
        set_size,
        correct_threshold,
        corpus_size,
        random_bytes: None,
    };
    let params = gen_params(&input).context("parameter generation failed")?;

    let mut text = serde_json::to_string_pretty(&params)?;
    text.push('\n');
    fs::write(&params_path, text)
        .with_context(|| format!("write {params_path}"))?;
    eprintln!("writing parameters to {params_path}");
    Ok(())
}
