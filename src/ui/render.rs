//! Text views of the application state.
//!
//! Every function returns a `String`; the binary decides where it goes.

use crate::history::{History, Turn};
use crate::llm::models::MessageRole;
use crate::session::review::{SelectedExchange, SidebarEntry};

pub const TITLE: &str = "🤖 Chat with AI (LLaMA 3)";
pub const THINKING: &str = "🤖 Thinking...";
pub const SELECTION_WARNING: &str = "⚠️ Unable to load selected chat.";

pub fn banner() -> String {
    let rule = "=".repeat(40);
    format!("{TITLE}\n{rule}\nType a question and press Enter. /help lists commands.\n")
}

pub fn help() -> String {
    [
        "Commands:",
        "  <text>        ask the model",
        "  /ask <text>   ask the model",
        "  /history      list previous prompts",
        "  /show <n>     show prompt n and its reply",
        "  /all          show the whole conversation",
        "  /help         show this help",
        "  /quit         leave",
        "",
        "Lines starting with '/' are read as commands.",
        "Use /ask to send a prompt that starts with '/', e.g. /ask /etc/hosts explained?",
    ]
    .join("\n")
}

fn speaker(turn: &Turn) -> &'static str {
    match turn.role() {
        MessageRole::User => "You",
        MessageRole::Assistant => "AI",
    }
}

fn exchange_block(prompt: &Turn, reply: &Turn) -> String {
    format!(
        "{}: {}\n{}: {}",
        speaker(prompt),
        prompt.text(),
        speaker(reply),
        reply.text()
    )
}

/// The most recent prompt and reply, or nothing before the first cycle.
pub fn latest(history: &History) -> Option<String> {
    let (prompt, reply) = history.latest_exchange()?;
    Some(format!(
        "### 🧠 Latest Conversation\n{}",
        exchange_block(prompt, reply)
    ))
}

/// The sidebar listing: `<n>. <preview>` per previous prompt.
pub fn sidebar(entries: &[SidebarEntry]) -> String {
    if entries.is_empty() {
        return "🕘 Chat History\n(no previous prompts)".to_string();
    }

    let rows: Vec<String> = entries
        .iter()
        .map(|entry| format!("{}. {}", entry.number, entry.preview))
        .collect();
    format!("🕘 Chat History\n{}", rows.join("\n"))
}

pub fn selected(exchange: &SelectedExchange<'_>) -> String {
    format!(
        "📝 Selected Prompt:\n{}\n🤖 AI Reply:\n{}",
        exchange.prompt.text(),
        exchange.reply.text()
    )
}

/// Every turn, oldest first, with its time of creation.
pub fn full_log(history: &History) -> String {
    if history.is_empty() {
        return "(empty conversation)".to_string();
    }

    history
        .turns()
        .iter()
        .map(|turn| {
            format!(
                "[{}] {}: {}",
                turn.created_at().format("%Y-%m-%d %H:%M"),
                speaker(turn),
                turn.text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
