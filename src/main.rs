use clap::Parser;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use thiserror::Error;

mod advice;
mod config;
mod output;
mod secrets;

use config::{Config, LoadError, Overrides, Settings};
use output::{MaterializeError, OutputChannel};

/// Generate a strong random password and explain how to bcrypt-hash it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Where to put the generated password
    #[arg(short, long, value_enum)]
    output: Option<OutputChannel>,

    /// Directory for the password file (defaults to the system temp dir)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// bcrypt work factor shown in the instructions (4-31)
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Random bytes in the password (32-1024)
    #[arg(short, long)]
    bytes: Option<usize>,

    /// Config file to read instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error("Failed to print instructions: {0}")]
    Print(std::io::Error),
}

fn main() -> ExitCode {
    // Setup logger
    let filter =
        LevelFilter::from_str(&std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_owned()))
            .unwrap_or(LevelFilter::Warn);

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                chrono::Local::now().format("%T%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    match run(args, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, out: &mut impl Write) -> Result<(), Error> {
    let config = Config::discover(args.config.as_deref())?;
    let settings = Settings::resolve(
        config,
        Overrides {
            channel: args.output,
            directory: args.dir,
            rounds: args.rounds,
            bytes: args.bytes,
        },
    )?;

    log::info!(
        "Generating {}-byte password for {:?} output",
        settings.bytes,
        settings.channel
    );

    let secret = secrets::generate_secret(settings.bytes);
    let delivery = output::materialize(&secret, settings.channel, &settings.directory, out)?;

    out.write_all(advice::advisory(&secret, &delivery, settings.rounds).as_bytes())
        .map_err(Error::Print)?;

    Ok(())
}
