// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! hbinder-inspect - bundle wire format inspector
//!
//! Writes marshalled sample bundles and prints the decoded tree of a
//! marshalled bundle file. Decoding is strict unless `--defuse` is given.

use clap::{Parser, Subcommand};
use colored::*;
use hbinder::config::{BUNDLE_MAGIC, DEFAULT_MAX_NESTING_DEPTH};
use hbinder::{Bundle, DecodeOptions, Parcel, PersistableBundle, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Bundle wire format inspector
#[derive(Parser, Debug)]
#[command(name = "hbinder-inspect")]
#[command(version = "0.1.0")]
#[command(about = "Encode and decode marshalled bundles")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a marshalled sample bundle covering the plain value types
    EncodeSample {
        /// Output file
        file: PathBuf,
    },
    /// Print the decoded tree of a marshalled bundle
    Decode {
        /// Input file
        file: PathBuf,

        /// Replace malformed containers by empty ones instead of failing
        #[arg(long)]
        defuse: bool,

        /// Nesting limit for containers and lists
        #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
        max_depth: usize,
    },
}

fn main() -> ExitCode {
    // Initialize logger for RUST_LOG-based debug output
    env_logger::init();

    let args = Args::parse();
    let result = match &args.command {
        Command::EncodeSample { file } => encode_sample(file),
        Command::Decode {
            file,
            defuse,
            max_depth,
        } => decode(file, DecodeOptions::new().defuse(*defuse).max_depth(*max_depth)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = if e.is_format() { "Format error" } else { "Error" };
            eprintln!("{}: {}", kind.red().bold(), e);
            ExitCode::from(1)
        }
    }
}

fn sample() -> hbinder::Result<Bundle> {
    let mut settings = PersistableBundle::new();
    settings.put("retries", 3)?;
    settings.put("endpoint", "local")?;
    settings.put("weights", vec![0.5f64, 0.25])?;

    let mut extras = Bundle::new();
    extras.put("tag", 'x' as u16)?;
    extras.put("flags", vec![true, false])?;

    let mut b = Bundle::new();
    b.put("name", "sample")?;
    b.put("id", 1_i64 << 40)?;
    b.put("ratio", 0.75f32)?;
    b.put("enabled", true)?;
    b.put("level", -3i8)?;
    b.put("payload", vec![0xde_u8, 0xad, 0xbe, 0xef])?;
    b.put("labels", vec![Some("alpha".to_owned()), None])?;
    b.put("extras", extras)?;
    b.put("settings", settings)?;
    b.put(
        "history",
        Value::List(vec![Value::Int(1), Value::String("two".into()), Value::Null]),
    )?;
    b.put("missing", Value::Null)?;
    Ok(b)
}

fn encode_sample(path: &Path) -> hbinder::Result<()> {
    let bundle = sample()?;
    let mut parcel = Parcel::new();
    bundle.write_to_parcel(&mut parcel)?;
    let bytes = parcel.marshall()?;
    fs::write(path, &bytes)?;
    println!(
        "{} {} bytes to {}",
        "Wrote".green().bold(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

fn decode(path: &Path, options: DecodeOptions) -> hbinder::Result<()> {
    let bytes = fs::read(path)?;
    let mut parcel = Parcel::unmarshall(&bytes);
    log::debug!("decoding {} bytes with {:?}", bytes.len(), options);

    println!("{}", "=== Header ===".cyan().bold());
    print_header(&bytes);

    let bundle = Bundle::read_from_parcel(&mut parcel, options)?;
    bundle.unparcel()?;
    let trailing = parcel.data_avail();

    println!("{}", "=== Entries ===".cyan().bold());
    print_entries(&bundle, 0)?;

    println!("{}", "=== Summary ===".cyan().bold());
    println!("  entries:       {}", bundle.size()?);
    println!("  decode passes: {}", bundle.decode_count());
    if trailing > 0 {
        println!("  {} {} bytes after the container", "trailing:".yellow(), trailing);
    }
    Ok(())
}

fn print_header(bytes: &[u8]) {
    let word = |at: usize| {
        bytes
            .get(at..at + 4)
            .and_then(|b| <[u8; 4]>::try_from(b).ok())
            .map(i32::from_le_bytes)
    };
    match word(0) {
        Some(length) => println!("  length: {}", length),
        None => println!("  length: {}", "<truncated>".red()),
    }
    if let Some(magic) = word(4) {
        let verdict = if magic == BUNDLE_MAGIC {
            "ok".green()
        } else {
            "mismatch".red()
        };
        println!("  magic:  {:#010x} ({})", magic, verdict);
    }
    if let Some(count) = word(8) {
        println!("  count:  {}", count);
    }
}

/// Anything with bundle accessors: both container kinds deref to it.
fn print_entries(bundle: &hbinder::bundle::BaseBundle, indent: usize) -> hbinder::Result<()> {
    if bundle.is_empty()? {
        println!("{:indent$}  {}", "", "(empty)".dimmed(), indent = indent);
    }
    for (key, value) in bundle.entries()? {
        print_value(&key, &value, indent + 2)?;
    }
    Ok(())
}

fn print_value(label: &str, value: &Value, indent: usize) -> hbinder::Result<()> {
    let type_name = value.type_name().blue();
    match value {
        Value::Bundle(nested) => {
            println!("{:indent$}{} ({})", "", label.bold(), type_name, indent = indent);
            print_entries(nested, indent + 2)?;
        }
        Value::PersistableBundle(nested) => {
            println!("{:indent$}{} ({})", "", label.bold(), type_name, indent = indent);
            print_entries(nested, indent + 2)?;
        }
        Value::BundleArray(items) => {
            println!(
                "{:indent$}{} ({}, {} items)",
                "",
                label.bold(),
                type_name,
                items.len(),
                indent = indent
            );
            for (i, item) in items.iter().enumerate() {
                print_bundle_item(i, item.as_ref(), indent + 2)?;
            }
        }
        Value::List(items) => {
            println!(
                "{:indent$}{} ({}, {} items)",
                "",
                label.bold(),
                type_name,
                items.len(),
                indent = indent
            );
            for (i, item) in items.iter().enumerate() {
                print_value(&format!("[{}]", i), item, indent + 2)?;
            }
        }
        other => println!(
            "{:indent$}{} ({}) = {}",
            "",
            label.bold(),
            type_name,
            other,
            indent = indent
        ),
    }
    Ok(())
}

fn print_bundle_item(index: usize, item: Option<&Arc<Bundle>>, indent: usize) -> hbinder::Result<()> {
    let label = format!("[{}]", index);
    match item {
        Some(bundle) => {
            println!("{:indent$}{}", "", label.bold(), indent = indent);
            print_entries(bundle, indent + 2)
        }
        None => {
            println!("{:indent$}{} = {}", "", label.bold(), "null".dimmed(), indent = indent);
            Ok(())
        }
    }
}
