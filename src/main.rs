use std::{
    fs::File,
    io::BufWriter,
    path::PathBuf,
};

use clap::{
    Parser,
    Subcommand,
};
use color_eyre::eyre::{
    Error,
    WrapErr,
};
use dotenvy::dotenv;
use fdtd_tfsf::{
    Simulation,
    SimulationConfig,
    output::TextSink,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    let _ = dotenv();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Run(args) => run(args)?,
        Command::DumpDefaultConfig { output } => {
            let config = toml::to_string_pretty(&SimulationConfig::default())?;
            if let Some(output) = &output {
                std::fs::write(output, &config)?;
            }
            else {
                println!("{config}");
            }
        }
    }

    Ok(())
}

fn run(args: RunArgs) -> Result<(), Error> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(steps) = args.steps {
        config.steps = steps;
    }

    let simulation = Simulation::new(&config)?;

    let file = File::create(&args.output)
        .with_context(|| format!("Could not create output file: {}", args.output.display()))?;
    let mut sink = TextSink::new(BufWriter::new(file), config.sample_stride);

    match args.threads {
        #[cfg(feature = "rayon")]
        Some(num_threads) => {
            use fdtd_tfsf::fdtd::update::MultiThreaded;

            let threading = if num_threads == 0 {
                MultiThreaded::from_default_thread_pool()
            }
            else {
                MultiThreaded::from_num_threads(num_threads)?
            };
            tracing::debug!(num_threads = threading.num_threads(), "using multi-threading");
            simulation.with_threading(threading).run(&mut sink)?;
        }
        #[cfg(not(feature = "rayon"))]
        Some(_) => {
            tracing::warn!("built without multi-threading support, running single-threaded");
            let mut simulation = simulation;
            simulation.run(&mut sink)?;
        }
        None => {
            let mut simulation = simulation;
            simulation.run(&mut sink)?;
        }
    }

    tracing::info!(output = %args.output.display(), "wrote samples");

    Ok(())
}

#[derive(Debug, Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a simulation and write the sampled fields to a text file.
    Run(RunArgs),
    DumpDefaultConfig {
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// TOML config file. Defaults are used if omitted.
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[clap(short, long, default_value = "FDTD.dat")]
    output: PathBuf,

    /// Overrides the number of steps from the config.
    #[clap(short, long)]
    steps: Option<usize>,

    /// Number of worker threads for the field updates, 0 for one per core.
    #[clap(short, long)]
    threads: Option<usize>,
}
