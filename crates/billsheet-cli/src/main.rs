//! Billsheet CLI - a billing form in the terminal

mod command;
mod render;

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use billsheet::prelude::*;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::render::{render_session, render_sheet, sheet_to_json};

#[derive(Parser)]
#[command(name = "bill")]
#[command(author, version, about = "Billing form with spreadsheet export")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a bill from --item arguments and export billing.xlsx
    Checkout {
        /// Line item as NAME:PRICE[:QUANTITY] (repeatable)
        #[arg(short, long = "item", value_name = "NAME:PRICE[:QTY]")]
        items: Vec<String>,

        /// Directory to save billing.xlsx into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Print the exported records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a bill interactively with line commands
    Session {
        /// Read commands from a file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Directory to save billing.xlsx into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Show the rows of an exported workbook
    Inspect {
        /// Workbook to read
        input: PathBuf,

        /// Print rows as JSON objects
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Checkout {
            items,
            out_dir,
            json,
        } => checkout_items(&items, &out_dir, json),
        Commands::Session { script, out_dir } => session(script.as_deref(), &out_dir),
        Commands::Inspect { input, json } => inspect(&input, json),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Split `NAME:PRICE[:QTY]`; the name may itself contain colons
fn parse_item(spec: &str) -> Result<(String, String, String)> {
    let parts: Vec<&str> = spec.rsplitn(3, ':').collect();
    match parts.as_slice() {
        [qty, price, name] if price.trim().parse::<f64>().is_ok() => {
            Ok((name.to_string(), price.to_string(), qty.to_string()))
        }
        [price, name, ..] => {
            // NAME:PRICE, or a name containing a colon followed by PRICE
            let name = if parts.len() == 3 {
                format!("{}:{}", parts[2], name)
            } else {
                name.to_string()
            };
            Ok((name, price.to_string(), "1".to_string()))
        }
        _ => bail!("invalid item '{}', expected NAME:PRICE[:QTY]", spec),
    }
}

fn checkout_items(items: &[String], out_dir: &Path, json: bool) -> Result<()> {
    let mut session = BillingSession::new();

    for (i, spec) in items.iter().enumerate() {
        let (name, price, qty) = parse_item(spec)?;
        let index = if i == 0 { 0 } else { session.add_item() };
        session.update_field(index, Field::Name, &name)?;
        session.update_field(index, Field::UnitPrice, &price)?;
        session.update_field(index, Field::Quantity, &qty)?;
    }

    let mut download = DirectoryDownload::new(out_dir);
    let result = session.checkout(&mut download);
    print!("{}", render_session(&session));

    let receipt = result?;
    eprintln!(
        "Saved '{}' ({} items)",
        download.path_for(&receipt.file_name).display(),
        receipt.rows
    );

    if json {
        let records = session.ledger().to_records();
        let text = serde_json::to_string_pretty(&records).context("Failed to encode JSON")?;
        println!("{}", text);
    }

    Ok(())
}

fn session(script: Option<&Path>, out_dir: &Path) -> Result<()> {
    let mut download = DirectoryDownload::new(out_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            run_session(BufReader::new(file), &mut out, &mut download, false)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            run_session(stdin.lock(), &mut out, &mut download, interactive)
        }
    }
}

fn inspect(input: &Path, json: bool) -> Result<()> {
    let sheet = XlsxReader::read_file(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    if json {
        let text = serde_json::to_string_pretty(&sheet_to_json(&sheet))
            .context("Failed to encode JSON")?;
        println!("{}", text);
    } else {
        eprintln!("Sheet: \"{}\" ({} rows)", sheet.name(), sheet.row_count());
        print!("{}", render_sheet(&sheet));
    }

    Ok(())
}

/// Drive one [`BillingSession`] from line commands until `quit` or end of input
fn run_session<R: BufRead, W: Write, D: Download>(
    input: R,
    out: &mut W,
    download: &mut D,
    interactive: bool,
) -> Result<()> {
    let mut session = BillingSession::new();
    write!(out, "{}", render_session(&session))?;

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        let line = match lines.next() {
            Some(line) => line.context("Failed to read command")?,
            None => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command = match trimmed.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {:#}", e)?;
                continue;
            }
        };
        tracing::debug!(?command, "session command");

        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            Command::Show => Ok(()),
            Command::Add => {
                session.add_item();
                Ok(())
            }
            Command::Set {
                index,
                field,
                value,
            } => session.update_field(index, field, &value),
            Command::Remove { index } => session.remove_item(index).map(|_| ()),
            Command::Checkout => session.checkout(&mut *download).map(|receipt| {
                log::info!("exported {} rows", receipt.rows);
            }),
        };

        match outcome {
            Err(e) if !e.is_validation() => writeln!(out, "error: {}", e)?,
            _ => write!(out, "{}", render_session(&session))?,
        }
    }

    Ok(())
}
