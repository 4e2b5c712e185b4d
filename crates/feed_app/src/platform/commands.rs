/// One line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    LoadMore,
    Refresh { force: bool },
    Reset,
    /// 1-based row number as printed by the renderer.
    Open(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseError {
    Empty,
    Unknown(String),
    BadRow(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "no command"),
            ParseError::Unknown(word) => write!(f, "unknown command {word:?}; try `help`"),
            ParseError::BadRow(raw) => write!(f, "expected a row number after `open`, got {raw:?}"),
        }
    }
}

pub(crate) const HELP: &str =
    "commands: more | refresh | refresh! | reset | open <n> | help | quit";

pub(crate) fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    match head.to_ascii_lowercase().as_str() {
        "more" | "m" => Ok(Command::LoadMore),
        "refresh" | "r" => Ok(Command::Refresh { force: false }),
        "refresh!" | "r!" => Ok(Command::Refresh { force: true }),
        "reset" => Ok(Command::Reset),
        "open" | "o" => {
            let raw = words.next().unwrap_or_default();
            match raw.parse::<usize>() {
                Ok(row) if row > 0 => Ok(Command::Open(row)),
                _ => Err(ParseError::BadRow(raw.to_string())),
            }
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::Unknown(head.to_string())),
    }
}
