//! Slash command parsing

use tracing::debug;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: quick-add
    Add(String),
    /// Manual form: explicit fields win, missing ones are predicted
    Form(FormInput),
    /// Whole board, or the open tasks of one category
    List(Option<String>),
    Done(String),
    Undo(String),
    Delete(String),
    Group,
    Classify(String),
    Decompose(String),
    Estimate(String),
    Categorize(String),
    Help,
    Quit,
    /// A slash command missing its argument
    MissingArgument(&'static str),
    Unknown(String),
}

/// `/form <text> [| <category> [| <duration>]]`
///
/// Labels are kept raw here; the session parses them so it can report an
/// unknown label to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub text: String,
    pub category: Option<String>,
    pub duration: Option<String>,
}

impl FormInput {
    pub fn parse(raw: &str) -> Self {
        let mut fields = raw.splitn(3, '|').map(str::trim);
        let text = fields.next().unwrap_or_default().to_string();
        let mut field = || fields.next().filter(|f| !f.is_empty()).map(str::to_string);
        let category = field();
        let duration = field();
        Self { text, category, duration }
    }
}

impl ReplCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if !input.starts_with('/') {
            return ReplCommand::Add(input.to_string());
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };
        debug!(%cmd, "ReplCommand::parse: slash command");

        let with_arg = |name: &'static str, make: fn(String) -> ReplCommand| {
            if rest.is_empty() {
                ReplCommand::MissingArgument(name)
            } else {
                make(rest.to_string())
            }
        };

        match cmd {
            "/help" | "/h" => ReplCommand::Help,
            "/quit" | "/q" | "/exit" => ReplCommand::Quit,
            "/list" | "/ls" => ReplCommand::List(Some(rest.to_string()).filter(|r| !r.is_empty())),
            "/group" => ReplCommand::Group,
            "/form" => with_arg("/form", |raw| ReplCommand::Form(FormInput::parse(&raw))),
            "/done" => with_arg("/done", ReplCommand::Done),
            "/undo" => with_arg("/undo", ReplCommand::Undo),
            "/delete" | "/rm" => with_arg("/delete", ReplCommand::Delete),
            "/classify" => with_arg("/classify", ReplCommand::Classify),
            "/decompose" => with_arg("/decompose", ReplCommand::Decompose),
            "/estimate" => with_arg("/estimate", ReplCommand::Estimate),
            "/categorize" => with_arg("/categorize", ReplCommand::Categorize),
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}
