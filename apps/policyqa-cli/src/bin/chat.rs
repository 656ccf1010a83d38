use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use policyqa_assistant::{Assistant, EscalationPolicy, KnowledgeBase, Session};
use policyqa_cli::{init_tracing, load_settings, spinner, StrategyArg};
use policyqa_core::types::Role;

#[derive(Parser)]
#[command(name = "policyqa-chat", version, about = "Chat with the insurance policy assistant")]
struct Cli {
    /// Directory holding config.toml; relative data paths resolve against it
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Override retrieval.strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = load_settings(&cli.config_dir, cli.strategy)?;

    let escalation = EscalationPolicy::new(&settings.escalation);
    let history_window = settings.retrieval.history_window;
    let assistant = Assistant::new(KnowledgeBase::new(settings, &cli.config_dir), escalation)
        .with_history_window(history_window);
    let mut session = Session::new();

    warm_up(&assistant, &mut session, "Setting up the knowledge base...");
    for message in session.messages() {
        println!("{}", message.content);
    }
    show_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nyou> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let input = line?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/help" | "/h" => show_help(),
            "/history" => show_history(&session),
            "/clear" => {
                session.clear();
                println!("Conversation cleared.");
            }
            "/reload" => {
                session.reset_responder();
                warm_up(&assistant, &mut session, "Rebuilding the knowledge base...");
            }
            "/quit" | "/q" | "quit" | "exit" => break,
            query => {
                let answer = assistant.handle(&mut session, query);
                println!("\n{}", answer);
            }
        }
    }
    println!("Goodbye!");
    Ok(())
}

/// A failed build is not fatal: the next query retries it.
fn warm_up(assistant: &Assistant, session: &mut Session, message: &str) {
    let pb = spinner(message);
    match assistant.prepare(session) {
        Ok(()) => pb.finish_and_clear(),
        Err(e) => {
            pb.finish_and_clear();
            warn!(error = %e, "knowledge base not ready, will retry on the next question");
        }
    }
}

fn show_help() {
    println!();
    println!("Commands:");
    println!("  /help     - Show this help message");
    println!("  /history  - Show the conversation so far");
    println!("  /clear    - Clear the conversation");
    println!("  /reload   - Rebuild the knowledge base from the documents directory");
    println!("  /quit     - Exit");
    println!("  <question> - Ask about our insurance policies (mention \"human agent\" to reach a person)");
}

fn show_history(session: &Session) {
    if session.messages().is_empty() {
        println!("(no messages)");
        return;
    }
    for message in session.messages() {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("{}> {}", who, message.content);
    }
}
