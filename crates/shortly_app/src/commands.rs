use thiserror::Error;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Submit this text for shortening. Empty text is still submitted so the
    /// user sees the validation message.
    Shorten(String),
    /// Copy the short link at a 1-based position.
    Copy(usize),
    /// Delete the row at a 1-based position.
    Delete(usize),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("`{0}` needs a row number, e.g. `{0} 1`")]
    MissingPosition(&'static str),
    #[error("`{0}` is not a row number (rows start at 1)")]
    BadPosition(String),
}

pub const HELP: &str = "\
Commands:
  <url>            shorten a link (same as `shorten <url>`)
  shorten <url>    shorten a link
  copy <n>         copy the short link in row n
  delete <n>       delete row n
  list             show all links
  help             show this help
  quit             exit";

pub fn parse(line: &str) -> Result<UserCommand, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "shorten" => UserCommand::Shorten(rest.to_string()),
        "copy" => UserCommand::Copy(position("copy", rest)?),
        "delete" | "rm" => UserCommand::Delete(position("delete", rest)?),
        "list" | "ls" if rest.is_empty() => UserCommand::List,
        "help" | "?" if rest.is_empty() => UserCommand::Help,
        "quit" | "exit" if rest.is_empty() => UserCommand::Quit,
        _ => UserCommand::Shorten(line.to_string()),
    };
    Ok(command)
}

fn position(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingPosition(command));
    }
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::BadPosition(arg.to_string())),
    }
}
