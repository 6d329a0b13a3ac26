use std::path::{Path, PathBuf};

use clap::{Args, Command, FromArgMatches as _};

use crate::error::EpisimError;
use crate::log::{set_log_level, LevelFilter};
use crate::params::{load_config, SimulationConfig};
use crate::policy::PolicyEvent;
use crate::simulation::Simulation;
use crate::state::DaySample;

/// Default cli arguments for the episim runner
#[derive(Args, Debug)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path for a simulation config file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Optional path for report output
    #[arg(short, long, default_value = "")]
    pub output_dir: String,

    /// Number of days to simulate
    #[arg(short, long, default_value = "365")]
    pub days: u32,

    /// Console log level (off, error, warn, info, debug, trace)
    #[arg(short, long)]
    pub log_level: Option<LevelFilter>,
}

#[derive(Args)]
pub struct PlaceholderCustom {}

fn create_episim_cli() -> Command {
    let cli = Command::new("episim");
    BaseArgs::augment_args(cli)
}

/// Runs a simulation with custom cli arguments.
///
/// This function allows you to define custom arguments and a setup function
///
/// # Parameters
/// - `setup_fn`: A function that takes a mutable reference to a `Simulation`,
///   a `BaseArgs` struct, and an `Option<A>` where A is the custom cli
///   arguments struct
///
/// # Errors
/// Returns an error if argument parsing or the setup function fails
pub fn run_with_custom_args<A, F>(setup_fn: F) -> Result<Simulation, EpisimError>
where
    A: Args,
    F: Fn(&mut Simulation, BaseArgs, Option<A>) -> Result<(), EpisimError>,
{
    let mut cli = create_episim_cli();
    cli = A::augment_args(cli);
    let matches = cli.get_matches();

    let base_args_matches = BaseArgs::from_arg_matches(&matches)?;
    let custom_matches = A::from_arg_matches(&matches)?;
    run_with_args_internal(base_args_matches, Some(custom_matches), setup_fn)
}

/// Runs a simulation with default cli arguments
///
/// This function parses command line arguments and allows you to define a
/// setup function
///
/// # Parameters
/// - `setup_fn`: A function that takes a mutable reference to a `Simulation`
///   and a `BaseArgs` struct
///
/// # Errors
/// Returns an error if argument parsing or the setup function fails
pub fn run_with_args<F>(setup_fn: F) -> Result<Simulation, EpisimError>
where
    F: Fn(&mut Simulation, BaseArgs, Option<PlaceholderCustom>) -> Result<(), EpisimError>,
{
    let cli = create_episim_cli();
    let matches = cli.get_matches();

    let base_args_matches = BaseArgs::from_arg_matches(&matches)?;
    run_with_args_internal(base_args_matches, None, setup_fn)
}

fn run_with_args_internal<A, F>(
    args: BaseArgs,
    custom_args: Option<A>,
    setup_fn: F,
) -> Result<Simulation, EpisimError>
where
    F: Fn(&mut Simulation, BaseArgs, Option<A>) -> Result<(), EpisimError>,
{
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    // Optionally load the simulation config from a file
    let config = if args.config.is_empty() {
        SimulationConfig::default()
    } else {
        println!("Loading simulation config from: {}", args.config);
        load_config(Path::new(&args.config))?
    };

    let mut simulation = Simulation::with_seed(config, args.random_seed);

    // Optionally set output dir for reports
    if !args.output_dir.is_empty() {
        let output_dir = PathBuf::from(&args.output_dir);
        simulation.add_report::<DaySample>(&output_dir.join("time_series.csv"))?;
        simulation.add_report::<PolicyEvent>(&output_dir.join("policy_log.csv"))?;
    }

    let days = args.days;

    // Run the provided Fn
    setup_fn(&mut simulation, args, custom_args)?;

    // Execute the simulation
    simulation.start();
    simulation.run_days(days);
    Ok(simulation)
}
