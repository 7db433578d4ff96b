use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cvere_rs::{image, Assembler};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble CVERE source into 16-bit machine words")]
struct Opts {
    /// Input assembly file (one instruction or label per line)
    #[arg(value_name = "SRCFILE")]
    input: PathBuf,
    /// Write a little-endian binary instead of printing the hex listing
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Print the hex listing even when writing a binary
    #[arg(long)]
    hex: bool,
    /// Print the symbol table after assembling
    #[arg(long)]
    symbols: bool,
    /// Export labels as JSON (Vec<{ addr, name }>) for cvere-disasm --labels-in
    #[arg(long, value_name = "FILE")]
    labels_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    let mut asm = Assembler::new();
    let words = asm
        .assemble(&source)
        .with_context(|| format!("assembling {}", opts.input.display()))?;

    match &opts.output {
        Some(path) => {
            fs::write(path, image::words_to_le_bytes(&words))
                .with_context(|| format!("writing {}", path.display()))?;
            if opts.hex {
                println!("{}", image::to_hex_listing(&words));
            }
        }
        None => println!("{}", image::to_hex_listing(&words)),
    }

    if opts.symbols {
        println!("\nSymbol table:");
        for e in asm.symbol_table() {
            println!("  {}: 0x{:04X}", e.name, e.addr);
        }
    }

    if let Some(path) = &opts.labels_out {
        let json = serde_json::to_string_pretty(&asm.symbol_table())?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
