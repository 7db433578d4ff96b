use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cvere_disasm::{load_labels, load_program, parse_label_arg, parse_u32, InputFormat};
use cvere_rs::{Columns, DisasmConfig, Disassembler};

#[derive(Parser, Debug)]
#[command(author, version, about = "CVERE disassembler CLI", long_about = None)]
struct Cli {
    /// Input program (raw little-endian binary or hex listing)
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Layout of the input file
    #[arg(long, value_enum, default_value_t = InputFormat::Bin)]
    input_format: InputFormat,
    /// Address of the first word (hex or dec)
    #[arg(long, default_value = "0")]
    base: String,
    /// Hide the raw machine word column
    #[arg(long)]
    no_raw: bool,
    /// Hide the `; ...` annotation column
    #[arg(long)]
    no_annotations: bool,
    /// One record per word, even for two-word extended instructions
    #[arg(long)]
    word_stride: bool,
    /// Import labels from JSON (Vec<{ addr, name }>)
    #[arg(long, value_name = "FILE")]
    labels_in: Option<PathBuf>,
    /// Extra label as ADDR=NAME. Repeat to add several.
    #[arg(long = "label", value_name = "ADDR=NAME")]
    labels: Vec<String>,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let words = load_program(&cli.input, cli.input_format)?;
    let base = parse_u32(&cli.base)?;

    let mut columns = Columns::all();
    columns.set(Columns::RAW, !cli.no_raw);
    columns.set(Columns::ANNOTATION, !cli.no_annotations);
    let mut dis = Disassembler::new().with_config(DisasmConfig { columns, word_stride: cli.word_stride });

    if let Some(path) = &cli.labels_in {
        dis.extend_labels(load_labels(path)?);
    }
    for arg in &cli.labels {
        let entry = parse_label_arg(arg)?;
        dis.add_label(entry.addr, entry.name);
    }

    let records = dis.disassemble(&words, base);
    let text = match cli.format {
        OutputFormat::Text => {
            // label headers before the instructions they name
            let mut lines = Vec::with_capacity(records.len());
            for r in &records {
                if let Some(name) = dis.labels().get(&r.address) {
                    lines.push(format!("{name}:"));
                }
                lines.push(r.render(columns));
            }
            lines.join("\n")
        }
        OutputFormat::Json => serde_json::to_string_pretty(&records)?,
    };
    if let Some(path) = cli.out {
        std::fs::write(path, text)?;
    } else {
        println!("{}", text);
    }

    Ok(())
}
