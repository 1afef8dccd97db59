//! Y86-64 simulator CLI.
//!
//! This binary runs one program to termination. It performs:
//! 1. **Setup:** Builds the configuration from defaults, an optional JSON file and flag overrides.
//! 2. **Loading:** Reads object text from a file or stdin, or assembles a `.ys` source file.
//! 3. **Reporting:** Streams one JSON state record per step to stdout; logs, `--stats` and
//!    `--dump-memory` go to stderr.
//!
//! The exit code is 0 whenever the run completes, whatever the final machine status,
//! and 1 on host errors (unreadable input, malformed object text or assembly, bad config,
//! broken pipe).

use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use tracing_subscriber::EnvFilter;

use y86sim_core::config::{Config, ConfigError};
use y86sim_core::sim::loader::LoadError;
use y86sim_core::stats::STATS_SECTIONS;
use y86sim_core::{AsmError, JsonSink, RegId, SinkError, Simulator};

/// Bytes shown by `--dump-memory`.
const DUMP_BYTES: usize = 256;

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "y86sim",
    author,
    version,
    about = "Y86-64 instruction-set simulator with a direct-mapped cache model",
    long_about = "Run a Y86-64 object file or assembly source and print the machine state after every step as a JSON array.\n\nExamples:\n  y86sim prog.yo\n  y86sim -v prog.ys\n  y86sim --stats-sections summary,cache < prog.yo"
)]
struct Cli {
    /// Program to run; reads object text from stdin when absent or `-`.
    file: Option<PathBuf>,

    /// Treat the input as `.ys` assembly; implied by a `.ys` extension.
    #[arg(long)]
    asm: bool,

    /// Memory size in bytes.
    #[arg(long, value_name = "BYTES")]
    mem_size: Option<usize>,

    /// Initial `%rsp`; assembly input defaults to the end of memory.
    #[arg(long, value_name = "ADDR", value_parser = parse_int)]
    stack: Option<i64>,

    /// Enable the data cache model and include its counters in every record.
    #[arg(short = 'v', long = "cache")]
    cache: bool,

    /// JSON configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after this many steps.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Log every retired instruction to stderr.
    #[arg(long)]
    trace: bool,

    /// Print run statistics to stderr when the run ends.
    #[arg(long)]
    stats: bool,

    /// Print only these statistics sections; implies `--stats`.
    #[arg(
        long,
        value_name = "SECTION",
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
    )]
    stats_sections: Vec<String>,

    /// Hex-dump the first 256 bytes of memory to stderr when the run ends.
    #[arg(short = 'd', long)]
    dump_memory: bool,

    /// Seed a register before the run, e.g. `--set-reg rsp=0x1000`.
    #[arg(long = "set-reg", value_name = "NAME=VALUE", value_parser = parse_reg_assignment)]
    set_reg: Vec<(RegId, i64)>,
}

/// Host-side failures; architectural faults are not errors.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// Configuration file unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Object text unreadable or malformed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Assembly source unreadable or malformed.
    #[error(transparent)]
    Asm(#[from] AsmError),

    /// State records could not be written to stdout.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Statistics or the memory dump could not be written to stderr.
    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("y86sim: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber; `--trace` forces instruction-level output for the core.
fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("y86sim_core=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Builds the configuration: file (or defaults), then flag overrides.
fn build_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.cache.enabled |= cli.cache;
    config.general.trace_instructions |= cli.trace;
    if cli.max_steps.is_some() {
        config.general.max_steps = cli.max_steps;
    }
    if let Some(size) = cli.mem_size {
        config.memory.size = size;
    }
    if cli.stack.is_some() {
        config.general.initial_sp = cli.stack;
    }
    config.validate()?;
    Ok(config)
}

impl Cli {
    /// Returns the input path, or `None` for stdin.
    fn input(&self) -> Option<&Path> {
        self.file.as_deref().filter(|p| *p != Path::new("-"))
    }

    /// Whether the input is assembly source rather than object text.
    fn is_assembly(&self) -> bool {
        self.asm
            || self
                .input()
                .and_then(Path::extension)
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ys"))
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = build_config(cli)?;
    let mut sim = Simulator::new(&config);

    if cli.is_assembly() {
        let stack = config.general.initial_sp;
        let asm = match cli.input() {
            Some(path) => sim.load_assembly_file(path, stack)?,
            None => {
                let mut source = String::new();
                let _ = io::stdin().read_to_string(&mut source).map_err(AsmError::from)?;
                sim.load_assembly(&source, stack)?
            }
        };
        tracing::info!(
            bytes = asm.bytes.len(),
            labels = asm.labels.len(),
            "program assembled"
        );
    } else {
        let summary = match cli.input() {
            Some(path) => sim.load_object_file(path)?,
            None => sim.load_object(io::stdin().lock())?,
        };
        tracing::info!(
            records = summary.records,
            bytes = summary.bytes_loaded,
            dropped = summary.bytes_dropped,
            "program loaded"
        );
    }

    for &(reg, value) in &cli.set_reg {
        sim.cpu.regs.write(reg, value);
    }

    let mut sink = JsonSink::new(BufWriter::new(io::stdout().lock()));
    let _ = sim.run(&mut sink)?;

    let mut err = io::stderr().lock();
    if cli.stats || !cli.stats_sections.is_empty() {
        sim.stats()
            .write_sections(&mut err, &cli.stats_sections)
            .map_err(CliError::Report)?;
    }
    if cli.dump_memory {
        writeln!(err, "Memory dump:")
            .and_then(|()| sim.cpu.memory.write_hexdump(&mut err, 0, DUMP_BYTES))
            .map_err(CliError::Report)?;
    }
    err.flush().map_err(CliError::Report)?;
    Ok(())
}

/// Parses a decimal (optionally negative) or `0x` hex integer; hex wraps to 64 bits.
fn parse_int(value: &str) -> Result<i64, String> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).map(|v| v as i64),
        None => value.parse::<i64>(),
    };
    parsed.map_err(|e| format!("invalid value '{value}': {e}"))
}

/// Parses `NAME=VALUE`, where VALUE is decimal (optionally negative) or `0x` hex.
fn parse_reg_assignment(arg: &str) -> Result<(RegId, i64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let reg: RegId = name.trim().parse().map_err(|e| format!("{e}"))?;
    Ok((reg, parse_int(value)?))
}
