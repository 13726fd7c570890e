use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use irisid_backend_native::NativeEngine;
use irisid_corelib as core;
use irisid_corelib::backend::ProvingEngine;
use irisid_corelib::proof::Proof;
use irisid_corelib::{FieldFraction, Fr, SelectionCircuit, Settings};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Exit code for a proof that parsed but did not verify.
const EXIT_REJECTED: u8 = 4;

#[derive(Parser)]
#[command(name = "irisd", version, about = "Iris selection proof CLI")]
struct Cli {
    /// TOML settings file ([selection] / [engine] tables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the hash commitment and selected index of a preimage
    Select {
        #[arg(short, long)]
        preimage: String,
        /// Override the selection bound
        #[arg(long)]
        max: Option<u64>,
    },
    /// Prove knowledge of a preimage selecting its index
    Prove {
        #[arg(short, long)]
        preimage: String,
        #[arg(long)]
        max: Option<u64>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Verify a selection proof against a public hash and index
    Verify {
        #[arg(short, long)]
        proof: PathBuf,
        #[arg(long)]
        hash: String,
        #[arg(long)]
        index: u64,
        #[arg(long)]
        max: Option<u64>,
    },
    /// Evaluate a fraction operation on decimal operands
    Fraction {
        #[arg(value_enum)]
        op: FractionOp,
        #[arg(allow_negative_numbers = true)]
        a: String,
        #[arg(allow_negative_numbers = true)]
        b: Option<String>,
    },
    /// Show engine capabilities and effective settings
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum FractionOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Cmp,
    Floor,
}

#[derive(Serialize)]
struct SelectReport {
    hash: Fr,
    index: u64,
    max: u64,
}

#[derive(Serialize)]
struct ProveReport {
    hash: Fr,
    index: u64,
    max: u64,
    proof: String,
    bytes: usize,
}

#[derive(Serialize)]
struct VerifyReport {
    valid: bool,
}

#[derive(Serialize)]
struct FractionReport {
    numerator: String,
    denominator: String,
    display: String,
    decimal: Option<String>,
}

#[derive(Serialize)]
struct InfoReport<'a> {
    version: &'a str,
    engine: &'a str,
    capabilities: core::backend::Capabilities,
    settings: &'a Settings,
}

fn load_settings(path: Option<&PathBuf>, max: Option<u64>) -> Result<Settings> {
    let mut settings = match path {
        Some(p) => Settings::load_from_file(p)?,
        None => Settings::default(),
    };
    if let Some(m) = max {
        settings.selection.max = m;
    }
    settings.validate()?;
    Ok(settings)
}

fn parse_fr(s: &str) -> Result<Fr> {
    s.parse::<Fr>().with_context(|| format!("parsing field element '{s}'"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_select(settings: &Settings, preimage: &str) -> Result<()> {
    let sel = core::select_index(&parse_fr(preimage)?, &settings.selection)?;
    print_json(&SelectReport {
        hash: sel.hash,
        index: sel.index,
        max: settings.selection.max,
    })
}

fn run_prove(settings: &Settings, preimage: &str, output: &Path) -> Result<()> {
    let engine = NativeEngine;
    let shape = SelectionCircuit::shape(settings.selection.clone());
    let cs = engine.compile(&settings.engine, &shape)?;
    let (pk, _) = engine.setup(&cs);

    let preimage = parse_fr(preimage)?;
    let sel = core::select_index(&preimage, &settings.selection)?;
    let circuit = SelectionCircuit::assigned(settings.selection.clone(), preimage)?;
    let proof = engine.prove(&cs, &pk, &circuit)?;
    let bytes = proof.to_bytes();
    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), bytes = bytes.len(), "proof written");

    print_json(&ProveReport {
        hash: sel.hash,
        index: sel.index,
        max: settings.selection.max,
        proof: output.display().to_string(),
        bytes: bytes.len(),
    })
}

fn run_verify(settings: &Settings, proof_path: &Path, hash: &str, index: u64) -> Result<bool> {
    let engine = NativeEngine;
    let shape = SelectionCircuit::shape(settings.selection.clone());
    let cs = engine.compile(&settings.engine, &shape)?;
    let (_, vk) = engine.setup(&cs);

    let bytes = fs::read(proof_path).with_context(|| format!("reading {}", proof_path.display()))?;
    let proof = Proof::from_bytes(&bytes)?;
    let valid = engine.verify(&proof, &vk, &[parse_fr(hash)?, Fr::from_u64(index)]);
    print_json(&VerifyReport { valid })?;
    Ok(valid)
}

fn run_fraction(op: FractionOp, a: &str, b: Option<&str>) -> Result<()> {
    let x = FieldFraction::from_decimal(a)?;
    let y = || -> Result<FieldFraction> {
        let b = b.ok_or_else(|| anyhow!("operation needs a second operand"))?;
        Ok(FieldFraction::from_decimal(b)?)
    };
    let result = match op {
        FractionOp::Add => x.add(&y()?)?,
        FractionOp::Sub => x.sub(&y()?)?,
        FractionOp::Mul => x.mul(&y()?)?,
        FractionOp::Div => x.div(&y()?)?,
        FractionOp::Mod => x.modulo(&y()?)?,
        FractionOp::Floor => x.floor()?,
        FractionOp::Cmp => FieldFraction::from_integer(x.compare(&y()?)? as i64),
    };
    print_json(&FractionReport {
        numerator: result.numerator().lift().to_string(),
        denominator: result.denominator().lift().to_string(),
        display: result.to_string(),
        decimal: result.to_decimal(),
    })
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Select { preimage, max }) => {
            let settings = load_settings(cli.config.as_ref(), max)?;
            run_select(&settings, &preimage)?;
        }
        Some(Commands::Prove {
            preimage,
            max,
            output,
        }) => {
            let settings = load_settings(cli.config.as_ref(), max)?;
            run_prove(&settings, &preimage, &output)?;
        }
        Some(Commands::Verify {
            proof,
            hash,
            index,
            max,
        }) => {
            let settings = load_settings(cli.config.as_ref(), max)?;
            if !run_verify(&settings, &proof, &hash, index)? {
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
        }
        Some(Commands::Fraction { op, a, b }) => run_fraction(op, &a, b.as_deref())?,
        Some(Commands::Info) => {
            let settings = load_settings(cli.config.as_ref(), None)?;
            let engine = NativeEngine;
            print_json(&InfoReport {
                version: core::version(),
                engine: engine.id(),
                capabilities: engine.capabilities(),
                settings: &settings,
            })?;
        }
        None => {
            println!("irisd {} ready", core::version());
            println!("Try: `irisd select --preimage 42` or `irisd info`");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
