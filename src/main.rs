use anyhow::{Context as _, Result};
use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tbscc::constants::HARTREE_TO_EV;
use tbscc::io::{read_xyz, write_header, Configuration};
use tbscc::param::{ParamRecords, Parametrization};
use tbscc::utils::Timer;
use tbscc::{Context, Results, ScfStatus};

/// Single point calculation with the self-consistent charge tight-binding model
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// geometry in the xyz format (Angstrom)
    #[clap(value_parser)]
    geometry: PathBuf,
    /// configuration file, the defaults are written to it if it does not exist
    #[clap(short, long, value_parser, default_value = tbscc::defaults::CONFIG_FILE_NAME)]
    config: PathBuf,
    /// parameter records in the RON format, replace the built-in method
    #[clap(short, long, value_parser)]
    param: Option<PathBuf>,
    /// write the results as JSON
    #[clap(short, long, value_parser)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    let config: Configuration = Configuration::load_or_create(&cli.config)?;

    // RUST_LOG takes precedence over the verbosity of the configuration
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .init();
    write_header();
    let timer: Timer = Timer::start();

    let mut mol = read_xyz(&cli.geometry)
        .with_context(|| format!("failed to read {}", cli.geometry.display()))?;
    mol.set_charge(config.mol.charge);
    mol.set_multiplicity(config.mol.multiplicity);
    info!("{: <25} {}", "structure:", mol.formula());

    let param: Arc<Parametrization> = match &cli.param {
        Some(path) => {
            let content: String = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let records: ParamRecords = ParamRecords::from_ron_str(&content)?;
            Arc::new(Parametrization::from_records(records)?)
        }
        None => config.parametrization()?,
    };
    info!("{: <25} {}", "parametrization:", param.name());
    let calc = config.calculator(param)?;

    let mut ctx: Context = Context::new();
    let mut results: Results = Results::new();
    let status: ScfStatus = calc.singlepoint(&mut ctx, &mol, &mut results)?;
    for msg in ctx.warnings() {
        warn!("{}", msg);
    }
    if let Some(energy) = results.energy() {
        info!("{: <25} {:>18.10} Hartree", "total energy:", energy);
    }
    if let Some(gap) = results.homo_lumo_gap() {
        info!(
            "{: <25} {:>18.10} eV",
            "HOMO-LUMO gap:",
            gap * HARTREE_TO_EV
        );
    }

    if let Some(path) = &cli.json {
        let json: String = serde_json::to_string_pretty(&results.to_sorted_map())?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }
    info!("{}", timer);

    if status != ScfStatus::Converged {
        anyhow::bail!("the SCC cycle did not converge");
    }
    Ok(())
}
