use std::path::PathBuf;

use bpmn_flow::logging::init_logging;
use bpmn_flow::{parse_file, Report};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human readable console report
    Text,
    /// Machine readable JSON
    Json,
}

/// Analyze a BPMN 2.0 file and reconstruct its process flow
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the BPMN file
    #[arg(value_name = "FILE", default_value = "process.bpmn")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!(file = %cli.file.display(), "analyzing BPMN file");
    let model = parse_file(&cli.file)?;
    let report = Report::new(&model);

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => {
            println!("=============================================");
            println!("=         BPMN 2.0 Process Analyzer         =");
            println!("=============================================");
            println!("Analyzed file: {}\n", cli.file.display());
            print!("{}", report);
        }
    }

    Ok(())
}
