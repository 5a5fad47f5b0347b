//! Line commands understood by `bill session`

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use billsheet::Field;

/// One parsed session command. Row numbers are already 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Set {
        index: usize,
        field: Field,
        value: String,
    },
    Remove {
        index: usize,
    },
    Show,
    Checkout,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  add                      append a blank product row
  set ROW FIELD VALUE      edit a row (FIELD: name, price, quantity; \"\" for empty)
  remove ROW               delete a row
  show                     print the bill
  checkout                 export billing.xlsx
  help                     show this help
  quit                     leave the session";

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" => Command::Add,
            "show" | "ls" => Command::Show,
            "checkout" => Command::Checkout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "remove" | "rm" => Command::Remove {
                index: parse_row(rest)?,
            },
            "set" => {
                let (row, rest) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: set ROW FIELD VALUE")?;
                let rest = rest.trim_start();
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                let value = if value == "\"\"" { "" } else { value };
                Command::Set {
                    index: parse_row(row)?,
                    field: field.parse()?,
                    value: value.to_string(),
                }
            }
            "" => bail!("empty command"),
            other => bail!("unknown command '{}' (try 'help')", other),
        };
        Ok(command)
    }
}

/// Parse a 1-based row number into a 0-based position
fn parse_row(text: &str) -> Result<usize> {
    let row: usize = text
        .trim()
        .parse()
        .with_context(|| format!("invalid row number '{}'", text.trim()))?;
    if row == 0 {
        bail!("rows are numbered from 1");
    }
    Ok(row - 1)
}
