/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text; submitted as if Enter was pressed in the input field.
    Prompt(String),
    /// `/ask <text>`, the explicit ask action.
    Ask(String),
    /// `/history`
    History,
    /// `/show <n>`
    Show(usize),
    /// `/all`
    All,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// A slash command that could not be understood, with a hint for the viewer.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Prompt(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "ask" => Command::Ask(arg.to_string()),
            "history" | "h" => Command::History,
            "show" | "s" => match arg.parse::<usize>() {
                Ok(number) => Command::Show(number),
                Err(_) => Command::Invalid(format!("Usage: /show <number>, got {arg:?}")),
            },
            "all" => Command::All,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("Unknown command: /{other}")),
        }
    }
}
