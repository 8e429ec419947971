pub mod config;
pub mod data;
pub mod error;
pub mod formatting;
pub mod load;
pub mod save;
pub mod session;

use config::Config;
use data::*;
use error::*;
use formatting::{value_to_string, Format};
use load::load_file;
use session::Session;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Inspect and rewrite VCD waveform files.
#[derive(Parser)]
#[clap(version)]
pub struct Opts {
    /// Raise log verbosity, may be repeated
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u64,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show header information and the tick range
    Info {
        /// VCD file to read
        input: PathBuf,
    },

    /// List all variables with their hierarchical names
    List {
        /// VCD file to read
        input: PathBuf,
    },

    /// Show the value of every variable at a tick
    Values {
        /// VCD file to read
        input: PathBuf,

        /// Tick to place the cursor at
        #[clap(short, long)]
        tick: u64,

        /// Display format: bin, dec or hex
        #[clap(short, long)]
        format: Option<Format>,
    },

    /// Show the value changes of one variable
    Waves {
        /// VCD file to read
        input: PathBuf,

        /// Dotted name of the variable, e.g. top.cpu.clk
        path: String,

        /// First tick of the window
        #[clap(long)]
        start: Option<u64>,

        /// Tick after the end of the window
        #[clap(long)]
        end: Option<u64>,

        /// Display format: bin, dec or hex
        #[clap(short, long)]
        format: Option<Format>,
    },

    /// Decode and encode a file again
    Reencode {
        /// VCD file to read
        input: PathBuf,

        /// Write here instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

fn verbosity(base: LevelFilter, verbose: u64) -> LevelFilter {
    let requested = match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    std::cmp::max(base, requested)
}

/// Log to stderr, and into the log file of the config directory if there is one.
pub fn init_logging(config: &Config, verbose: u64) -> Result<()> {
    let level = verbosity(config.get_log_level(), verbose);
    let log_config = simplelog::Config::default();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(level, log_config.clone(), TerminalMode::Stderr, ColorChoice::Auto),
    ];

    if let Some(log_file) = config.get_log_file() {
        loggers.push(WriteLogger::new(level, log_config, File::create(log_file)?));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn open_session(input: &Path, format: Option<Format>, config: &Config) -> Result<Session> {
    let mut session = Session::new(load_file(input)?);

    if let Some(format) = format.or(config.get_format()) {
        for i in 0..session.num_variables() {
            session.set_format(i, format)?;
        }
    }

    Ok(session)
}

fn info(vcd: &Vcd, out: &mut impl Write) -> Result<()> {
    let date = vcd.date
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    writeln!(out, "date:      {}", date)?;
    writeln!(out, "version:   {}", vcd.version.as_deref().unwrap_or("-"))?;
    writeln!(out, "timescale: {}", timescale_to_string(vcd.timescale))?;
    writeln!(out, "variables: {}", vcd.variables().len())?;

    match (min_tick(&vcd.root_module), max_tick(&vcd.root_module)) {
        (Some(min), Some(max)) => writeln!(
            out,
            "ticks:     {}..{} ({}..{})",
            min,
            max,
            tick_to_string(min, vcd.timescale),
            tick_to_string(max, vcd.timescale)
        )?,
        _ => writeln!(out, "ticks:     -")?,
    }

    Ok(())
}

pub fn run(opts: Opts, config: &Config, out: &mut impl Write) -> Result<()> {
    match opts.command {
        Command::Info { input } => {
            info(&load_file(input)?, out)?;
        }

        Command::List { input } => {
            let session = open_session(&input, None, config)?;

            for (var, label) in session.variables().iter().zip(session.labels()) {
                writeln!(out, "{}\t{}\t{}\t{}", label, var.alias, var.var_type, var.size)?;
            }
        }

        Command::Values { input, tick, format } => {
            let mut session = open_session(&input, format, config)?;
            session.set_cursor(tick);

            for value in session.cursor_values() {
                writeln!(out, "{} = {}", value.label, value.text())?;
            }
        }

        Command::Waves { input, path, start, end, format } => {
            let session = open_session(&input, format, config)?;
            let vcd = session.document();
            let var = find_by_path(vcd, &path).ok_or(Error::NotFound(path))?;

            let start = start.unwrap_or(0);
            let waves = match end {
                Some(end) => waves_in_range(&var, start, end),
                None => waves_from(&var, start),
            };

            for wave in waves {
                writeln!(
                    out,
                    "#{}\t{}\t{}",
                    wave.tick,
                    tick_to_string(wave.tick, vcd.timescale),
                    value_to_string(&wave.value, var.format)
                )?;
            }
        }

        Command::Reencode { input, output } => {
            let vcd = load_file(input)?;

            match output {
                Some(output) => save::save_file(&vcd, output)?,
                None => writeln!(out, "{}", save::save(&vcd))?,
            }
        }
    }

    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_verbosity() {
        assert_eq!(LevelFilter::Warn, verbosity(LevelFilter::Warn, 0));
        assert_eq!(LevelFilter::Info, verbosity(LevelFilter::Warn, 1));
        assert_eq!(LevelFilter::Trace, verbosity(LevelFilter::Off, 5));
        assert_eq!(LevelFilter::Debug, verbosity(LevelFilter::Debug, 1));
    }
}
