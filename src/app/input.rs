//! Input Handling
//!
//! Maps lines typed at the interactive prompt to actions.
//!
//! | Input | Action |
//! |-------|--------|
//! | Enter, `r`, `run` | Run the focused block |
//! | `n`, `next`, Tab | Focus the next block |
//! | `p`, `prev`, Shift+Tab | Focus the previous block |
//! | `<N>` | Focus block N (1-based) |
//! | `s`, `show` | Show the focused block's source and last output |
//! | `l`, `list` | List all blocks |
//! | `h`, `help`, `?` | Show this table |
//! | `q`, `quit`, Ctrl+D | Quit |

/// Action requested at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Next,
    Prev,
    Jump(usize),
    Show,
    List,
    Help,
    Quit,
}

/// Input that could not be mapped to an action
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command: {0} (type h for help)")]
    Unknown(String),

    #[error("Block numbers start at 1")]
    ZeroBlock,
}

/// Help text shown for `h`
pub const HELP: &str = "\
  enter, r     run the focused block
  n, tab       focus the next block
  p            focus the previous block
  <number>     focus block <number>
  s            show the focused block
  l            list blocks
  q            quit";

/// Parse one line of input
pub fn parse_action(line: &str) -> Result<Action, InputError> {
    // Tab arrives as a literal character in line mode
    let input = line.trim_matches(|c: char| c == ' ' || c == '\r' || c == '\n');

    match input {
        "" | "r" | "run" => return Ok(Action::Run),
        "\t" | "n" | "next" => return Ok(Action::Next),
        "\x1b[Z" | "p" | "prev" => return Ok(Action::Prev),
        "s" | "show" => return Ok(Action::Show),
        "l" | "list" => return Ok(Action::List),
        "h" | "help" | "?" => return Ok(Action::Help),
        "q" | "quit" | "exit" => return Ok(Action::Quit),
        _ => {}
    }

    match input.parse::<usize>() {
        Ok(0) => Err(InputError::ZeroBlock),
        Ok(number) => Ok(Action::Jump(number - 1)),
        Err(_) => Err(InputError::Unknown(input.to_string())),
    }
}
