//! # Coil CLI
//!
//! Terminal front end for the bimetal coil engine: sizes a coil against
//! every material in the catalog and maintains the catalog file.
//!
//! ```text
//! coil_cli calculate --t1 70 --t2 300 --sweep 270 --thickness 0.012
//! coil_cli materials add tm1.json
//! coil_cli seed
//! ```

mod config;
mod report;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use coil_core::calculations::{CatalogReport, CoilRequest};
use coil_core::errors::CalcError;
use coil_core::file_io::{load_catalog, load_catalog_or_empty, update_catalog};
use coil_core::materials::{seed_materials, BimetalMaterial, UpsertAction};
use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Calc(#[from] CalcError),
}

#[derive(Parser, Debug)]
#[command(name = "coil_cli", version, about = "Helical bimetal coil calculator")]
struct Cli {
    /// Material catalog file (overrides the config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Config file (default: $COIL_CONFIG or ./coil.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size a coil with every material in the catalog
    Calculate(CalculateArgs),

    /// Inspect or edit the material catalog
    #[command(subcommand)]
    Materials(MaterialsCommand),

    /// Add the built-in seed materials to the catalog
    Seed,
}

#[derive(Args, Debug)]
struct CalculateArgs {
    /// Min operating temperature (°F)
    #[arg(long, allow_hyphen_values = true)]
    t1: Option<f64>,

    /// Max operating temperature (°F)
    #[arg(long, allow_hyphen_values = true)]
    t2: Option<f64>,

    /// Angular sweep over the range (degrees)
    #[arg(long)]
    sweep: Option<f64>,

    /// Strip thickness (in)
    #[arg(long)]
    thickness: Option<f64>,

    /// Thickness tolerance, ± (in)
    #[arg(long)]
    thick_tol: Option<f64>,

    /// Maximum coil outside diameter (in)
    #[arg(long)]
    max_od: Option<f64>,

    /// Strip width (in)
    #[arg(long)]
    width: Option<f64>,

    /// Gap between turns (in)
    #[arg(long)]
    gap: Option<f64>,

    /// Use config defaults for omitted values instead of prompting
    #[arg(long)]
    no_prompt: bool,

    /// Leave unusable materials out of the output
    #[arg(long)]
    viable_only: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum MaterialsCommand {
    /// List catalog materials
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print one material as JSON
    Show { astm_type: String },

    /// Add or replace materials from a JSON file (one object or an array)
    Add { file: PathBuf },

    /// Remove a material by ASTM type
    Remove { astm_type: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaterialInput {
    One(BimetalMaterial),
    Many(Vec<BimetalMaterial>),
}

impl MaterialInput {
    fn into_vec(self) -> Vec<BimetalMaterial> {
        match self {
            MaterialInput::One(material) => vec![material],
            MaterialInput::Many(materials) => materials,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match config::load_or_default(cli.config.as_deref()).map_err(CliError::from) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let CliError::Calc(calc) = &e {
                if let Ok(json) = serde_json::to_string_pretty(calc) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, cfg: &Config) -> Result<(), CliError> {
    let catalog_path = cli.catalog.unwrap_or_else(|| cfg.catalog_path.clone());
    tracing::debug!("catalog: {}", catalog_path.display());

    match cli.command {
        Command::Calculate(args) => calculate(&args, &catalog_path, cfg),
        Command::Materials(cmd) => materials(cmd, &catalog_path, cfg),
        Command::Seed => seed(&catalog_path, cfg),
    }
}

fn calculate(args: &CalculateArgs, catalog_path: &Path, cfg: &Config) -> Result<(), CliError> {
    let catalog = load_catalog(catalog_path)?;
    let request = build_request(args, cfg);

    let mut scan = CatalogReport::build(&catalog, &request)?;
    if args.viable_only {
        scan = scan.viable_only();
    }

    if args.json {
        println!("{}", to_json(&scan)?);
    } else {
        println!("{}", report::coil_table(&scan, cfg.precision));
    }
    Ok(())
}

fn materials(cmd: MaterialsCommand, catalog_path: &Path, cfg: &Config) -> Result<(), CliError> {
    match cmd {
        MaterialsCommand::List { json } => {
            let catalog = load_catalog_or_empty(catalog_path)?;
            if json {
                println!("{}", to_json(&catalog)?);
            } else {
                println!("{}", report::material_table(&catalog));
            }
        }
        MaterialsCommand::Show { astm_type } => {
            let catalog = load_catalog(catalog_path)?;
            println!("{}", to_json(catalog.get(&astm_type)?)?);
        }
        MaterialsCommand::Add { file } => {
            let text = fs::read_to_string(&file)
                .map_err(|e| CalcError::file_error("read", file.display().to_string(), e.to_string()))?;
            let input: MaterialInput = serde_json::from_str(&text)
                .map_err(|e| CalcError::serialization(format!("{}: {}", file.display(), e)))?;

            let actions = update_catalog(catalog_path, &cfg.lock_user(), |catalog| {
                input
                    .into_vec()
                    .into_iter()
                    .map(|material| {
                        let key = material.astm_type.clone();
                        catalog.upsert(material).map(|action| (key, action))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })?;
            for (astm_type, action) in actions {
                println!("{} {}", describe(action), astm_type);
            }
        }
        MaterialsCommand::Remove { astm_type } => {
            let removed = update_catalog(catalog_path, &cfg.lock_user(), |catalog| catalog.remove(&astm_type))?;
            println!("Removed {}", removed.display_name());
        }
    }
    Ok(())
}

fn seed(catalog_path: &Path, cfg: &Config) -> Result<(), CliError> {
    let actions = update_catalog(catalog_path, &cfg.lock_user(), |catalog| {
        seed_materials()
            .iter()
            .map(|material| {
                catalog
                    .upsert(material.clone())
                    .map(|action| (material.display_name(), action))
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    for (name, action) in actions {
        println!("{} {}", describe(action), name);
    }
    Ok(())
}

fn describe(action: UpsertAction) -> &'static str {
    match action {
        UpsertAction::Inserted => "Added",
        UpsertAction::Replaced => "Updated",
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CalcError> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))
}

/// Fill the request from flags, prompting (or defaulting) for the rest
fn build_request(args: &CalculateArgs, cfg: &Config) -> CoilRequest {
    let d: CoilRequest = cfg.defaults.into();
    let value = |flag: Option<f64>, label: &str, default: f64| match flag {
        Some(v) => v,
        None if args.no_prompt => default,
        None => prompt_f64(&format!("{} [{}]: ", label, default), default),
    };

    CoilRequest {
        t1: value(args.t1, "Min temperature (°F)", d.t1),
        t2: value(args.t2, "Max temperature (°F)", d.t2),
        sweep: value(args.sweep, "Sweep (degrees)", d.sweep),
        thickness: value(args.thickness, "Thickness (in)", d.thickness),
        thick_tol: value(args.thick_tol, "Thickness tolerance ± (in)", d.thick_tol),
        max_od: value(args.max_od, "Max outside diameter (in)", d.max_od),
        width: value(args.width, "Strip width (in)", d.width),
        gap: value(args.gap, "Gap between turns (in)", d.gap),
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_and_defaults_fill_request() {
        let cli = Cli::parse_from([
            "coil_cli", "calculate", "--t1", "-40", "--t2", "250", "--sweep", "90", "--no-prompt",
        ]);
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        let request = build_request(&args, &Config::default());

        assert_eq!(request.t1, -40.0);
        assert_eq!(request.t2, 250.0);
        assert_eq!(request.sweep, 90.0);
        assert_eq!(request.thickness, Config::default().defaults.thickness);
    }

    #[test]
    fn test_material_input_accepts_object_or_array() {
        let one = r#"{"astmType":"TM1","maxRecommendedTempF":550,"flexivities":[]}"#;
        let input: MaterialInput = serde_json::from_str(one).unwrap();
        assert_eq!(input.into_vec().len(), 1);

        let many = format!("[{},{}]", one, one.replace("TM1", "TM2"));
        let input: MaterialInput = serde_json::from_str(&many).unwrap();
        assert_eq!(input.into_vec().len(), 2);
    }

    #[test]
    fn test_global_catalog_flag() {
        let cli = Cli::parse_from(["coil_cli", "materials", "list", "--catalog", "alt.json"]);
        assert_eq!(cli.catalog, Some(PathBuf::from("alt.json")));
    }
}
