//! Line-oriented commands for the interactive board.

use thiserror::Error;

use crate::application::intent::Intent;
use crate::domain::types::SortOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Intent(Intent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, CommandError> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "page" => ShellCommand::Intent(Intent::GoToPage(number(rest, "page N")?)),
        "next" => ShellCommand::Intent(Intent::NextGroup),
        "prev" => ShellCommand::Intent(Intent::PrevGroup),
        "sort" => {
            let order: SortOrder = rest
                .trim()
                .parse()
                .map_err(|_| CommandError::Usage("sort asc|desc|oldest|newest"))?;
            ShellCommand::Intent(Intent::ChangeOrder(order))
        }
        // Keystroke semantics: the raw text goes to the debouncer untouched.
        "search" => ShellCommand::Intent(Intent::QueryChanged(rest.trim_end().to_string())),
        "show" => ShellCommand::Intent(Intent::ShowDetails(number(rest, "show ID")?)),
        "new" => ShellCommand::Intent(Intent::OpenCreate),
        "edit" => ShellCommand::Intent(Intent::OpenEdit(number(rest, "edit ID")?)),
        "title" => ShellCommand::Intent(Intent::EditTitle(rest.trim_end().to_string())),
        "body" => ShellCommand::Intent(Intent::EditBody(rest.trim_end().to_string())),
        "submit" => ShellCommand::Intent(Intent::SubmitForm),
        "close" => ShellCommand::Intent(Intent::CloseModal),
        "dismiss" => ShellCommand::Intent(Intent::DismissOutside),
        "delete" => ShellCommand::Intent(Intent::Delete(number(rest, "delete ID")?)),
        "refresh" => ShellCommand::Intent(Intent::Refresh),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Interpret an answer to a yes/no prompt; anything but yes declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn number(rest: &str, usage: &'static str) -> Result<u64, CommandError> {
    rest.trim().parse().map_err(|_| CommandError::Usage(usage))
}
