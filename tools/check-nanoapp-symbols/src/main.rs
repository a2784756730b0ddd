//! CONTEXT: CI gate checking a nanoapp's undefined symbols against the platform allowlist
//! OWNERS: @tools-team
//! PURPOSE: Fail the build if a nanoapp references symbols the runtime will not resolve
//! NOTE: Command-line tool; no library API
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use symcheck::{run_check, CheckConfig};

#[derive(Parser)]
#[command(
    name = "check-nanoapp-symbols",
    about = "Check a nanoapp shared object for unresolvable external symbols"
)]
struct Cli {
    /// Nanoapp shared object to check.
    #[arg(long)]
    nanoapp: PathBuf,

    /// Extra allowed symbols, one per line.
    #[arg(long)]
    allowed_symbols_file: Option<PathBuf>,

    /// Check configuration: reader path, API headers, platform profiles.
    #[arg(long)]
    config: PathBuf,

    /// Platform profile name from the config.
    #[arg(long)]
    platform: String,

    /// Override the symbol reader named in the config.
    #[arg(long)]
    elf_reader: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    println!("------- Checking unresolvable external symbols -------");

    let mut config = CheckConfig::load(&cli.config)?;
    if let Some(reader) = cli.elf_reader {
        config.elf_reader = reader;
    }

    let outcome = run_check(
        &config,
        &cli.platform,
        &cli.nanoapp,
        cli.allowed_symbols_file.as_deref(),
    )?;

    if outcome.is_clean() {
        println!("All the dynamic symbols are resolvable!");
        return Ok(());
    }

    println!("{} unresolvable symbol(s) found:", outcome.disallowed.len());
    for sym in &outcome.disallowed {
        println!(" - {sym}");
    }
    Err("nanoapp references symbols outside the allowlist".into())
}
