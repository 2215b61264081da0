//! Parsing of REPL input lines.

/// Slash commands offered for completion, in the order `/help` lists them.
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/upload", "Upload and index a PDF: /upload <path>"),
    ("/clear", "Clear all indexed documents and the conversation"),
    ("/docs", "List documents uploaded in this workspace"),
    ("/sources", "Show or hide the sources of a message: /sources <n>"),
    ("/history", "Show the whole conversation again"),
    ("/help", "Show this help"),
];

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text to send as a question.
    Ask(String),
    Upload(String),
    Clear,
    Docs,
    /// 1-based position of a message in the timeline.
    Sources(usize),
    History,
    Help,
    Quit,
    Empty,
    /// Not understood; carries the text to show the user.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Command::Quit;
        }
        if !trimmed.starts_with('/') {
            return Command::Ask(line.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "/upload" if rest.is_empty() => Command::Invalid("Usage: /upload <path>".to_string()),
            "/upload" => Command::Upload(expand_home(unquote(rest))),
            "/clear" => Command::Clear,
            "/docs" => Command::Docs,
            "/sources" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Command::Sources(n),
                _ => Command::Invalid("Usage: /sources <message number>".to_string()),
            },
            "/history" => Command::History,
            "/help" => Command::Help,
            other => Command::Invalid(format!(
                "Unknown command: {}. Type /help for a list of commands.",
                other
            )),
        }
    }
}

/// Strips one pair of matching quotes, as left by terminals on drag and drop.
fn unquote(path: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = path
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    path
}

/// Expands a leading `~/` to the home directory; other paths pass through.
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    path.to_string()
}
