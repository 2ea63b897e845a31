use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sensortree::date::parse_timestamp;
use sensortree::registers::{IoConfig, IoModule};
use sensortree::sampling::{build_tree, SamplingConfig};
use sensortree::tree::{write_in_order, ReadingTree};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RULE: &str = "--------------------------------------------";

#[derive(Parser, Debug)]
#[command(
    name = "sensortree",
    about = "Store a month of simulated sensor readings in a timestamp tree and query it by date"
)]
struct Cli {
    #[command(flatten)]
    sampling: SamplingArgs,

    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `sensortree=trace`).
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct SamplingArgs {
    /// Seed for the simulated sensor (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
    /// Seed for the insertion shuffle (random when omitted).
    #[arg(long)]
    shuffle_seed: Option<u64>,
    /// Insert readings in day order instead of shuffling.
    #[arg(long)]
    no_shuffle: bool,
    /// Month to sample (1-12).
    #[arg(long, default_value_t = 11)]
    month: u32,
    /// Year to sample.
    #[arg(long, default_value_t = 2024)]
    year: i32,
    /// Number of days to sample, starting on the 1st.
    #[arg(long, default_value_t = 30)]
    days: u32,
    /// Lowest simulated temperature (degrees C).
    #[arg(long, default_value_t = 42.0, allow_negative_numbers = true)]
    temp_low: f32,
    /// Highest simulated temperature (degrees C).
    #[arg(long, default_value_t = 52.0, allow_negative_numbers = true)]
    temp_high: f32,
    /// Lowest simulated relative humidity (%).
    #[arg(long, default_value_t = 72.6, allow_negative_numbers = true)]
    humid_low: f32,
    /// Highest simulated relative humidity (%).
    #[arg(long, default_value_t = 87.3, allow_negative_numbers = true)]
    humid_high: f32,
    /// Number of switches on the emulated I/O module (0-32).
    #[arg(long, default_value_t = 0)]
    switches: u32,
    /// Number of LEDs on the emulated I/O module (0-32).
    #[arg(long, default_value_t = 0)]
    leds: u32,
}

impl SamplingArgs {
    fn io_config(&self) -> IoConfig {
        IoConfig {
            num_switches: self.switches,
            num_leds: self.leds,
            seed: self.seed,
        }
    }

    fn sampling_config(&self) -> SamplingConfig {
        SamplingConfig {
            temp_range: self.temp_low..=self.temp_high,
            humid_range: self.humid_low..=self.humid_high,
            month: self.month,
            year: self.year,
            days: self.days,
            shuffle: !self.no_shuffle,
            shuffle_seed: self.shuffle_seed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prompt for MM/DD/YYYY dates until an empty line, then list all readings (default).
    Interactive,
    /// Look up each given MM/DD/YYYY date, then list all readings.
    Query {
        /// Dates to search for.
        dates: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let tree = grow_tree(&cli.sampling)?;
    let mut out = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(&tree, io::stdin().lock(), &mut out)?,
        Commands::Query { dates } => run_query(&tree, &dates, &mut out)?,
    }

    Ok(())
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter '{default_filter}'"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn grow_tree(args: &SamplingArgs) -> Result<ReadingTree> {
    let mut io = IoModule::initialize(args.io_config())
        .context("could not initialize the I/O module")?;
    info!("I/O module ready");

    let config = args.sampling_config();
    let tree = build_tree(&mut io, &config).with_context(|| {
        format!(
            "failed to sample {} days of {:02}/{}",
            config.days, config.month, config.year
        )
    })?;

    info!(readings = tree.len(), depth = tree.depth(), "tree grown");
    Ok(tree)
}

fn run_interactive<R: BufRead, W: Write>(tree: &ReadingTree, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "Please enter a date to search in format: MM/DD/YYYY")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read from stdin")?;
        let entry = line.trim();
        if entry.is_empty() {
            break;
        }

        writeln!(out, "You entered: {entry}")?;
        report_search(tree, entry, out)?;
        writeln!(out, "{RULE}")?;
        out.flush()?;
    }

    report_traversal(tree, out)
}

fn run_query<W: Write>(tree: &ReadingTree, dates: &[String], out: &mut W) -> Result<()> {
    for date in dates {
        report_search(tree, date, out)?;
        writeln!(out, "{RULE}")?;
    }
    report_traversal(tree, out)
}

fn report_search<W: Write>(tree: &ReadingTree, entry: &str, out: &mut W) -> Result<()> {
    match parse_timestamp(entry) {
        Ok(timestamp) => {
            writeln!(out, "Searching for timestamp...")?;
            match tree.search(timestamp) {
                Some(reading) => writeln!(out, "{reading}")?,
                None => writeln!(out, "No reading found for {entry}")?,
            }
        }
        Err(err) => {
            warn!(%err, "rejected date input");
            writeln!(out, "Invalid format.")?;
        }
    }
    Ok(())
}

fn report_traversal<W: Write>(tree: &ReadingTree, out: &mut W) -> Result<()> {
    writeln!(out, "In-order traversal:\n")?;
    write_in_order(out, tree)
}
