use tribute_core::DisplayMode;

#[derive(Debug, PartialEq)]
pub enum Command {
    Mode(DisplayMode),
    /// Drop the pinned choice.
    Auto,
    Variant(Option<String>),
    Online,
    Offline,
    Retry,
    /// "Return to Default".
    Reset,
    Next,
    Show,
    Caps,
    Help,
    Quit,
    Empty,
    Invalid(String),
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> Command {
        let trimmed = input.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Command::Empty;
        };

        match cmd.to_ascii_lowercase().as_str() {
            "mode" | "m" => match parts.next() {
                Some("auto") => Command::Auto,
                Some(name) => match name.parse::<DisplayMode>() {
                    Ok(mode) => Command::Mode(mode),
                    Err(e) => Command::Invalid(e.to_string()),
                },
                None => Command::Invalid("usage: mode <default|vr|beamer|auto>".to_string()),
            },
            "auto" => Command::Auto,
            "variant" | "v" => {
                let name = trimmed[cmd.len()..].trim();
                if name.is_empty() || name == "none" {
                    Command::Variant(None)
                } else {
                    Command::Variant(Some(name.to_string()))
                }
            }
            "online" => Command::Online,
            "offline" => Command::Offline,
            "retry" | "r" => Command::Retry,
            "reset" | "back" => Command::Reset,
            "next" | "n" => Command::Next,
            "show" | "s" => Command::Show,
            "caps" => Command::Caps,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            // Bare mode names are a shortcut for `mode <name>`.
            other => match other.parse::<DisplayMode>() {
                Ok(mode) if parts.next().is_none() => Command::Mode(mode),
                _ => Command::Unknown(trimmed.to_string()),
            },
        }
    }
}

pub const HELP: &str = "\
Commands:
  mode <default|vr|beamer>   pin a display mode
  auto                       follow the hardware again
  variant [name|none]        switch the card's template variant
  online | offline           simulate a connectivity change
  retry                      retry a failed mode
  reset                      return to the default view
  next                       next slide
  show                       redraw the screen
  caps                       print the capability snapshot
  help                       this text
  quit                       exit";
