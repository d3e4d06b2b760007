use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use msd_core::{read_design_file, read_design_stream, read_start_sequence, DesignError, DesignInput};
use msd_fold::{DesignFactory, EngineKind};
use msd_graph::{build_with_timeout, write_graphml, Constructed};
use msd_search::{
    CsvRecordWriter, HumanRecordWriter, OutputFormat, RecordSink, RunConfig, RunDriver, RunReport,
    SampleMode,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod preamble;
mod progress;

use progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(
    name = "msd-sim",
    about = "Design sequences that fold into several target structures"
)]
struct Cli {
    /// YAML run configuration; explicit flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read structures and constraint from a design file.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,
    /// Read the start sequence from a file.
    #[arg(short = 's', long)]
    start: Option<PathBuf>,
    /// Read structures and constraint from stdin.
    #[arg(short = 'i', long)]
    input: bool,
    /// Use the layered engine for pseudoknotted targets.
    #[arg(short = 'q', long)]
    pseudoknot: bool,
    /// Number of designs to generate.
    #[arg(short = 'n', long)]
    number: Option<usize>,
    /// Upper end of the measurement schedule.
    #[arg(long)]
    stop: Option<u64>,
    /// Mutation mode: sample, sample_local, sample_global, sample_strelem or random.
    #[arg(short = 'm', long)]
    mode: Option<SampleMode>,
    /// Weight of the energy difference term.
    #[arg(short = 'w', long)]
    weight: Option<f64>,
    /// Graph construction timeout in seconds (0 = unlimited).
    #[arg(short = 'k', long)]
    kill: Option<u64>,
    /// Write the dependency graph as GraphML.
    #[arg(short = 'g', long)]
    graphml: Option<PathBuf>,
    /// Write semicolon separated records to stdout.
    #[arg(short = 'c', long)]
    csv: bool,
    /// Show optimization progress on stderr.
    #[arg(short = 'p', long)]
    progress: bool,
    /// Enable debug logging.
    #[arg(short = 'd', long)]
    debug: bool,
    /// Write per-run summaries as JSON.
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Master seed for all runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    // Only the first call installs a subscriber.
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();

    let config = resolve_config(&cli)?;
    println!("{}", preamble::options_line(&config));
    let input = select_input(&cli)?;

    let Some(Constructed { mut graph, elapsed }) =
        construct_graph(&input, config.timeout(), &mut io::stdout().lock())?
    else {
        return Ok(());
    };
    for line in preamble::graph_lines(&graph)? {
        println!("{line}");
    }
    if let Some(path) = &cli.graphml {
        write_graphml(&graph, path)?;
        info!(path = %path.display(), "wrote graphml");
    }

    let engine = config.engine.build();
    let factory = DesignFactory::new(input.structures.clone(), input.start_sequence.clone());
    let mut sink: Box<dyn RecordSink> = match config.output {
        OutputFormat::Csv => Box::new(CsvRecordWriter::new(io::stdout())),
        OutputFormat::Human => Box::new(HumanRecordWriter::new(io::stdout())),
    };
    let mut progress = ConsoleProgress;
    let mut driver = RunDriver::new(&mut graph, engine.as_ref(), &factory, &config, sink.as_mut())
        .with_construction_time(elapsed);
    if config.progress {
        driver = driver.with_progress(&mut progress);
    }
    let summaries = driver.run()?;

    if let Some(path) = &cli.summary {
        RunReport::new(&config, summaries).write(path)?;
        info!(path = %path.display(), "wrote run summary");
    }
    Ok(())
}

/// Prints the targets and builds the dependency graph. A failed construction
/// is reported on `out` and yields `None`; the run then ends without designs.
fn construct_graph<W: Write>(
    input: &DesignInput,
    timeout: Option<Duration>,
    out: &mut W,
) -> io::Result<Option<Constructed>> {
    let constructed = match build_with_timeout(&input.structures, &input.constraint, timeout) {
        Ok(constructed) => Some(constructed),
        Err(err) => {
            error!(%err, "dependency graph construction failed");
            None
        }
    };
    for line in preamble::target_lines(input) {
        writeln!(out, "{line}")?;
    }
    if constructed.is_none() {
        writeln!(out, "# Construction time out reached!")?;
    }
    Ok(constructed)
}

/// Loads the base configuration and applies explicit flags on top of it.
fn resolve_config(cli: &Cli) -> Result<RunConfig, DesignError> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(runs) = cli.number {
        config.runs = runs;
    }
    if let Some(stop) = cli.stop {
        config.stop = stop;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(weight) = cli.weight {
        config.weight = weight;
    }
    if let Some(kill) = cli.kill {
        config.timeout_secs = kill;
    }
    if let Some(seed) = cli.seed {
        config.seed_policy.master_seed = seed;
    }
    if cli.pseudoknot {
        config.engine = EngineKind::Pseudoknot;
    }
    if cli.csv {
        config.output = OutputFormat::Csv;
    }
    if cli.progress {
        config.progress = true;
    }
    Ok(config)
}

/// Reads the design problem from stdin, a file or the built-in example, then
/// applies the start sequence file.
fn select_input(cli: &Cli) -> Result<DesignInput, DesignError> {
    let mut input = if cli.input {
        read_design_stream(io::stdin().lock())?
    } else if let Some(path) = &cli.file {
        println!("# Input File: {}", path.display());
        read_design_file(path)?
    } else {
        DesignInput::builtin()
    };
    if let Some(path) = &cli.start {
        let sequence = read_start_sequence(path)?;
        println!("# {sequence}");
        input = input.with_start_sequence(&sequence)?;
    }
    Ok(input)
}
