//! Terminal chat client.
//!
//! Type a question and press Enter. Every exchange is appended to the history
//! file and the latest one is shown after the reply arrives.
//!
//! Requires `OPENROUTER_API_KEY` in the environment or in a `.env` file.

use anyhow::Result;
use ask_ai::config::AppConfig;
use ask_ai::history::HistoryStore;
use ask_ai::llm::gateways::OpenRouterGateway;
use ask_ai::session::{ChatController, CycleOutcome, Trigger};
use ask_ai::ui::{render, Command};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let gateway = Arc::new(OpenRouterGateway::with_config(config.gateway)?);
    let store = HistoryStore::new(config.history_path);
    info!(model = %config.model, history = %store.path().display(), "Starting chat client");

    let mut controller = ChatController::builder(gateway, store)
        .model(config.model)
        .instruction_suffix(config.instruction_suffix)
        .build();

    println!("{}", render::banner());
    if !controller.history().is_empty() {
        println!("{}\n", render::sidebar(&controller.sidebar()));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("💬 ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match Command::parse(&line) {
            Command::Prompt(text) => ask(&mut controller, Trigger::Enter, text).await,
            Command::Ask(text) => ask(&mut controller, Trigger::Ask, text).await,
            Command::History => println!("{}\n", render::sidebar(&controller.sidebar())),
            Command::Show(number) => show(&mut controller, number),
            Command::All => println!("{}\n", render::full_log(controller.history())),
            Command::Help => println!("{}\n", render::help()),
            Command::Quit => break,
            Command::Invalid(hint) => println!("{hint}\n"),
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

async fn ask(controller: &mut ChatController, trigger: Trigger, text: String) {
    let blank = text.trim().is_empty();
    controller.set_input(text);
    controller.trigger(trigger);
    if !blank {
        println!("{}", render::THINKING);
    }

    match controller.dispatch().await {
        Ok(CycleOutcome::Ignored) => return,
        Ok(_) => {}
        Err(e) => eprintln!("⚠️ {e}"),
    }

    if let Some(view) = render::latest(controller.history()) {
        println!("{view}\n");
    }
}

fn show(controller: &mut ChatController, number: usize) {
    if let Err(e) = controller.select_number(number) {
        println!("{}\n", render::SELECTION_WARNING);
        debug!(error = %e, "Selection rejected");
        return;
    }

    match controller.selected() {
        Ok(Some(exchange)) => println!("{}\n", render::selected(&exchange)),
        Ok(None) => {}
        Err(e) => {
            println!("{}\n", render::SELECTION_WARNING);
            debug!(error = %e, "Selected chat could not be resolved");
        }
    }
}
