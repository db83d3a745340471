//! medledger CLI — inspect feed defaults and run a demo pipeline.
//!
//! Usage:
//! ```bash
//! medledger info
//! medledger demo
//! medledger version
//! ```

use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

mod demo;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "info" => cmd_info(),
        "demo" => {
            init_tracing();
            tokio::runtime::Runtime::new()?.block_on(demo::run())?;
        }
        "version" | "--version" | "-V" => {
            println!("medledger {}", env!("CARGO_PKG_VERSION"));
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
    Ok(())
}

/// Log to stderr, filtered by RUST_LOG (default: info).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("medledger {}", env!("CARGO_PKG_VERSION"));
    println!("Live ledger event feed and batch timelines for medicine supply chains\n");
    println!("USAGE:");
    println!("    medledger <COMMAND>\n");
    println!("COMMANDS:");
    println!("    info     Show feed configuration defaults");
    println!("    demo     Run the full pipeline against a scripted in-process ledger");
    println!("    version  Print version");
    println!("    help     Print this help");
}

fn cmd_info() {
    let registry = medledger_core::SchemaRegistry::new();
    println!("MedLedger v{}", env!("CARGO_PKG_VERSION"));
    println!("  Known event schemas: {}", registry.len());
    for schema in registry.schemas() {
        println!("    {}", schema.signature);
    }
    println!("  Default feed capacity: {} events", medledger_feed::store::DEFAULT_CAPACITY);
    println!("  Default poll interval: 3s, overlap: 10 blocks");
    println!("  Timeline offsets (approximate steps): 7 / 14 / 21 days");
    println!("  Networks: Hardhat Local, Polygon Mumbai, Sepolia");
}
