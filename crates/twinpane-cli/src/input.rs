//! Parsing of command lines typed at the prompt.

use std::path::PathBuf;

use twinpane_core::event::Command;
use twinpane_core::nav::sort::{SortDirection, SortKey};

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A command for the list model.
    List(Command),
    /// Print the rows of the current directory.
    Ls,
    /// Print the visible part of the folder tree.
    Tree,
    Expand(PathBuf),
    Collapse(PathBuf),
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

/// Parses one line of user input.
///
/// # Errors
///
/// Returns a message suitable for printing when the line is not understood.
pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word {
        "" => Input::Nothing,
        "ls" => Input::Ls,
        "tree" => Input::Tree,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        "cd" => Input::List(Command::ViewPath(required_path(word, rest)?)),
        "open" => {
            let index = rest
                .parse::<usize>()
                .map_err(|_| format!("open: expected a row number, got {rest:?}"))?;
            Input::List(Command::Open(index))
        }
        "up" => Input::List(Command::GoUp),
        "back" => Input::List(Command::GoBack),
        "forward" => Input::List(Command::GoForward),
        "sort" => parse_sort(rest)?,
        "filter" => Input::List(Command::Filter(rest.to_owned())),
        "select" => {
            if rest.is_empty() {
                return Err("select: missing name".to_owned());
            }
            Input::List(Command::SelectByName(rest.to_owned()))
        }
        "clear" => Input::List(Command::ClearSelection),
        "hidden" => Input::List(Command::ToggleHidden),
        "refresh" => Input::List(Command::Refresh),
        "expand" => Input::Expand(required_path(word, rest)?),
        "collapse" => Input::Collapse(required_path(word, rest)?),
        other => return Err(format!("unknown command {other:?}; try `help`")),
    };
    Ok(input)
}

fn required_path(word: &str, rest: &str) -> Result<PathBuf, String> {
    if rest.is_empty() {
        Err(format!("{word}: missing path"))
    } else {
        Ok(PathBuf::from(rest))
    }
}

fn parse_sort(rest: &str) -> Result<Input, String> {
    let mut parts = rest.split_whitespace();
    let key: SortKey = parts
        .next()
        .ok_or_else(|| "sort: missing key (name, ext, size, date)".to_owned())?
        .parse()?;
    let direction = match parts.next() {
        None | Some("asc") => SortDirection::Ascending,
        Some("desc") => SortDirection::Descending,
        Some(other) => return Err(format!("sort: expected asc or desc, got {other:?}")),
    };
    Ok(Input::List(Command::SortBy(key, direction)))
}

pub const HELP: &str = "\
commands:
  ls                    list the current directory
  tree                  show the folder tree
  cd <path>             view a directory
  open <n>              enter row n (folder) or report it (file)
  up | back | forward   navigate
  sort <key> [asc|desc] key: name, ext, size, date
  filter <patterns>     wildcard filter, e.g. `*.rs;*.toml`; empty clears
  select <name>         add a row to the selection
  clear                 clear the selection
  hidden                show or hide dot-entries
  expand <path>         expand a tree folder
  collapse <path>       collapse a tree folder
  refresh               re-read the current directory and the tree
  quit";
