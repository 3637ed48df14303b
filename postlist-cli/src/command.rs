//! Shell command parsing.

use postlist_lib::model::PostId;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    First,
    Last,
    /// One-based page number; `None` goes to the first page.
    Page(Option<usize>),
    Size(usize),
    Sort(String),
    /// Empty text clears the filter.
    Filter { column: String, text: String },
    Select(PostId),
    SelectAll,
    Edit(PostId),
    Title(String),
    Status(String),
    Save,
    Cancel,
    Delete(PostId),
    DeleteSelected,
    Yes,
    No,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
Navigation:  next, prev, first, last, page [N], size N, refresh
Query:       sort COLUMN, filter COLUMN [TEXT]
Selection:   select ID, select-all
Editing:     edit ID, title TEXT, status NAME, save, cancel
Deleting:    delete ID, delete-selected, yes, no
Other:       help, quit";

fn number(text: &str) -> Result<usize, ParseError> {
    text.parse().map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

fn required<'a>(rest: &'a str, command: &'static str, argument: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn id(rest: &str, command: &'static str) -> Result<PostId, ParseError> {
    let text = required(rest, command, "an id")?;
    text.parse()
        .map(PostId)
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "first" => Command::First,
            "last" => Command::Last,
            "page" => Command::Page(if rest.is_empty() { None } else { Some(number(rest)?) }),
            "size" => Command::Size(number(required(rest, "size", "a page size")?)?),
            "sort" => Command::Sort(required(rest, "sort", "a column")?.to_string()),
            "filter" => {
                let rest = required(rest, "filter", "a column")?;
                let (column, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Filter {
                    column: column.to_string(),
                    text: text.trim().to_string(),
                }
            }
            "select" => Command::Select(id(rest, "select")?),
            "select-all" => Command::SelectAll,
            "edit" => Command::Edit(id(rest, "edit")?),
            "title" => Command::Title(rest.to_string()),
            "status" => Command::Status(rest.to_string()),
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "delete" => Command::Delete(id(rest, "delete")?),
            "delete-selected" => Command::DeleteSelected,
            "yes" | "y" => Command::Yes,
            "no" => Command::No,
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(ParseError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}
