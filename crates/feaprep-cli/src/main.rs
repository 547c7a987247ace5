//! feaprep CLI — run contact detection on an assembly document.
//!
//! The document is a JSON list of named axis-aligned boxes (the shapes
//! synthetic test assemblies are made of); real assemblies live in the
//! host CAD document and reach the library through its model API
//! instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use feaprep::select::InMemorySelectionStore;
use feaprep::{detect_and_create_selections, run_self_test, ContactKind, DetectionOptions};

mod doc;

#[derive(Parser)]
#[command(name = "feaprep")]
#[command(about = "Assembly contact detection for FEA tie constraints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect contacts in a JSON assembly document
    Detect {
        /// Input assembly document (.json)
        input: PathBuf,
        /// Keyword for label-prefix substitution
        #[arg(short, long)]
        keyword: Option<String>,
        /// Linear (plane coincidence) tolerance in mm
        #[arg(long)]
        linear_tol: Option<f64>,
        /// Angular tolerance for the anti-parallel normal check, radians
        #[arg(long)]
        angular_tol: Option<f64>,
        /// Minimum contact area in mm²
        #[arg(long)]
        min_area: Option<f64>,
        /// Emit the pair list as JSON
        #[arg(long)]
        json: bool,
        /// Print the detection diagnostic log
        #[arg(short, long)]
        verbose: bool,
    },
    /// Run the built-in self-test battery and print its report
    Selftest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            input,
            keyword,
            linear_tol,
            angular_tol,
            min_area,
            json,
            verbose,
        } => detect(
            &input,
            keyword,
            linear_tol,
            angular_tol,
            min_area,
            json,
            verbose,
        ),
        Commands::Selftest => {
            let report = run_self_test();
            for line in &report {
                println!("{line}");
            }
            if report.iter().any(|l| l.starts_with("FAIL")) {
                anyhow::bail!("self-test reported failures");
            }
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn detect(
    input: &PathBuf,
    keyword: Option<String>,
    linear_tol: Option<f64>,
    angular_tol: Option<f64>,
    min_area: Option<f64>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let document: doc::AssemblyDoc =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input.display()))?;
    let assembly = document.to_assembly();

    let mut options = DetectionOptions {
        keyword,
        ..Default::default()
    };
    if let Some(v) = linear_tol {
        options.tolerance.linear = v;
    }
    if let Some(v) = angular_tol {
        options.tolerance.angular = v;
    }
    if let Some(v) = min_area {
        options.tolerance.min_area = v;
    }

    let mut store = InMemorySelectionStore::new();
    let detection = detect_and_create_selections(&assembly, &options, &mut store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detection.pairs)?);
    } else if detection.pairs.is_empty() {
        println!("no contacts found (run with --verbose for the trace)");
    } else {
        println!("{} contact pair(s):", detection.pairs.len());
        for pair in &detection.pairs {
            let kind = match pair.kind {
                ContactKind::Face => "face",
                ContactKind::Edge => "edge",
            };
            println!(
                "  {kind}  {} ~ {}  area {:.3} mm²",
                pair.name_a, pair.name_b, pair.area
            );
        }
        println!("{} named selection(s) created", store.len());
    }

    if verbose {
        eprintln!("--- diagnostic log ---");
        for entry in detection.log.entries() {
            eprintln!("{entry}");
        }
    }

    Ok(())
}
