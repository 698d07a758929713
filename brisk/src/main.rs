//! Brisk CLI

use brisk::error::report_parse_errors;
use brisk::repl::Repl;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "brisk", version, about = "Brisk - a small interpreted language")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive shell
    Repl {
        /// Commands to run in the shell before it starts
        #[arg(short = 'c', long = "command", num_args = 1..)]
        commands: Vec<String>,
        /// Keep the shell open after the -c commands ran
        #[arg(short, long)]
        interactive: bool,
    },
    /// Evaluate a source file and print its value
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Repl {
            commands,
            interactive,
        } => run_repl(&commands, interactive),
        Command::Run { file } => run_file(&file),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_repl(commands: &[String], interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = Repl::new()?;

    if commands.is_empty() {
        if interactive {
            log::warn!("-i has no effect without -c; starting the shell normally");
        }
    } else if !repl.run_commands(commands) || !interactive {
        return Ok(());
    }

    repl.run()?;
    Ok(())
}

fn run_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let env = brisk::Environment::new().into_ref();

    match brisk::run_source(&source, &env) {
        Ok(Some(value)) => println!("{value}"),
        Ok(None) => {}
        Err(brisk::Error::Parse(errors)) => {
            report_parse_errors(&path.display().to_string(), &source, &errors);
            return Err(brisk::Error::Parse(errors).into());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let (program, errors) = brisk::parse(&source);
    if !errors.is_empty() {
        report_parse_errors(&path.display().to_string(), &source, &errors);
        return Err(brisk::Error::Parse(errors).into());
    }

    println!("{}", serde_json::to_string_pretty(&program)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    for tok in brisk::tokenize(&source) {
        println!("{} {:?} @ {}", tok.kind, tok.literal, tok.span);
    }

    Ok(())
}
