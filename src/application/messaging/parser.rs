//! Input parser - Turns raw console lines into commands or chat text

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/name arg1 arg2`
    Command { name: String, args: Vec<String> },
    /// Anything else, sent to the assistant
    Text(String),
    Empty,
}

impl Input {
    /// Arguments joined back into one string, for free-form values
    pub fn rest(&self) -> Option<String> {
        match self {
            Input::Command { args, .. } if !args.is_empty() => Some(args.join(" ")),
            _ => None,
        }
    }
}

/// Parses console input lines
pub struct InputParser {
    command_prefix: String,
}

impl InputParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn parse(&self, line: &str) -> Input {
        let text = line.trim();
        if text.is_empty() {
            return Input::Empty;
        }

        if let Some(cmd_text) = text.strip_prefix(self.command_prefix.as_str()) {
            let mut parts = cmd_text.split_whitespace();
            let name = parts.next().unwrap_or("").to_lowercase();
            if name.is_empty() {
                return Input::Empty;
            }
            let args = parts.map(|s| s.to_string()).collect();
            return Input::Command { name, args };
        }

        Input::Text(text.to_string())
    }
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new("/")
    }
}
