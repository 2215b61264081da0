//! Interactive loop.
//!
//! Reading input and printing results happen on separate tasks: questions
//! and uploads run in the background and report back over a channel, so the
//! prompt stays usable while the backend works.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tokio::time::timeout;

use docqa_application::{ClearOutcome, SendOutcome, SendRejection, SessionController, UploadOutcome};

use crate::commands::{Command, SLASH_COMMANDS};
use crate::helper::CliHelper;
use crate::render::{render_documents, render_message};

const PENDING_INDICATOR: &str = "Analyzing documents...";

/// Work results and display requests handled by the printer task.
enum Event {
    Sent(SendOutcome),
    Uploaded(UploadOutcome),
    Cleared(ClearOutcome),
    ToggleSources(usize),
    ShowHistory,
    ShowDocuments,
}

pub async fn run(controller: Arc<SessionController>) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<Event>(32);
    let printer = tokio::spawn(print_events(controller.clone(), event_rx));

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== DocQA ===".bright_magenta().bold());
    println!(
        "{}",
        "Ask a question, '/upload <file.pdf>' to add a document, '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();
    let _ = event_tx.send(Event::ShowHistory).await;

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let command = Command::parse(&line);
                if !matches!(command, Command::Empty) {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match command {
                    Command::Empty => continue,
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Ask(text) => {
                        if controller.is_query_pending().await {
                            println!("{}", pending_notice().yellow());
                            continue;
                        }
                        println!("{}", PENDING_INDICATOR.bright_black().italic());

                        let tx = event_tx.clone();
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            let outcome = controller.send(&text).await;
                            let _ = tx.send(Event::Sent(outcome)).await;
                        });
                    }
                    Command::Upload(path) => {
                        println!("{}", format!("Uploading {}...", path).bright_black());

                        let tx = event_tx.clone();
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            let outcome = controller.upload_path(&path).await;
                            let _ = tx.send(Event::Uploaded(outcome)).await;
                        });
                    }
                    Command::Clear => {
                        let outcome = controller.clear().await;
                        let _ = event_tx.send(Event::Cleared(outcome)).await;
                    }
                    Command::Docs => {
                        let _ = event_tx.send(Event::ShowDocuments).await;
                    }
                    Command::Sources(position) => {
                        let _ = event_tx.send(Event::ToggleSources(position)).await;
                    }
                    Command::History => {
                        let _ = event_tx.send(Event::ShowHistory).await;
                    }
                    Command::Help => print_help(),
                    Command::Invalid(text) => println!("{}", text.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Background work still in flight keeps a sender alive; do not wait on it.
    drop(event_tx);
    if timeout(Duration::from_secs(1), printer).await.is_err() {
        tracing::debug!("[Repl] Exiting with work still in flight");
    }

    Ok(())
}

fn pending_notice() -> String {
    format!("{} Please wait for the current answer.", SendRejection::Pending)
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    for (name, description) in SLASH_COMMANDS {
        println!("  {} {}", format!("{:<10}", name).bright_cyan(), description);
    }
    println!("  {} Exit (also Ctrl-D)", format!("{:<10}", "quit").bright_cyan());
    println!("{}", "Anything else is sent as a question.".bright_black());
}

/// Prints the timeline incrementally, remembering how much of it is on screen.
struct TimelinePrinter {
    controller: Arc<SessionController>,
    shown: usize,
    first_id: Option<String>,
}

impl TimelinePrinter {
    fn new(controller: Arc<SessionController>) -> Self {
        Self {
            controller,
            shown: 0,
            first_id: None,
        }
    }

    /// Prints messages appended since the last flush.
    ///
    /// A reset replaces the whole timeline, which shows up as a new first
    /// message; the timeline is then printed from the start.
    async fn flush(&mut self) {
        let state = self.controller.snapshot().await;
        let first_id = state.messages().first().map(|m| m.id.clone());
        if first_id != self.first_id {
            self.shown = 0;
            self.first_id = first_id;
        }

        for (index, message) in state.messages().iter().enumerate().skip(self.shown) {
            let visible = self.controller.visible_citations(message).await;
            print!("{}", render_message(index + 1, message, visible.as_deref()));
        }
        self.shown = state.len();
    }

    async fn replay(&mut self) {
        self.shown = 0;
        self.flush().await;
    }

    async fn toggle_sources(&mut self, position: usize) {
        let state = self.controller.snapshot().await;
        let Some(message) = state.messages().get(position - 1) else {
            println!("{}", format!("There is no message [{}].", position).yellow());
            return;
        };
        if !message.has_citations() {
            println!("{}", format!("Message [{}] has no sources.", position).yellow());
            return;
        }

        match self.controller.toggle_citations(&message.id).await {
            Some(true) => {
                let visible = self.controller.visible_citations(message).await;
                print!("{}", render_message(position, message, visible.as_deref()));
            }
            Some(false) => {
                println!("{}", format!("Sources of [{}] hidden.", position).bright_black());
            }
            // Cleared between the snapshot and the toggle
            None => println!("{}", format!("There is no message [{}].", position).yellow()),
        }
    }

    async fn handle(&mut self, event: Event) {
        match event {
            Event::Sent(SendOutcome::Rejected(SendRejection::Pending)) => {
                println!("{}", pending_notice().yellow());
            }
            Event::Sent(SendOutcome::Rejected(SendRejection::Empty)) => {}
            Event::Sent(_) => self.flush().await,
            Event::Uploaded(UploadOutcome::Indexed { .. }) => self.flush().await,
            Event::Uploaded(UploadOutcome::Busy) => {
                println!(
                    "{}",
                    "Another upload is still in progress. Please wait.".yellow()
                );
            }
            Event::Uploaded(UploadOutcome::Rejected { notice }) => println!("{}", notice.red()),
            Event::Uploaded(UploadOutcome::Failed { notice, error }) => {
                println!("{}", notice.red());
                println!("{}", format!("  {}", error).bright_black());
            }
            Event::Cleared(ClearOutcome::Cleared) => self.flush().await,
            Event::Cleared(ClearOutcome::Failed { notice, error }) => {
                println!("{}", notice.red());
                println!("{}", format!("  {}", error).bright_black());
            }
            Event::ToggleSources(position) => self.toggle_sources(position).await,
            Event::ShowHistory => self.replay().await,
            Event::ShowDocuments => {
                let registry = self.controller.documents().await;
                print!("{}", render_documents(&registry));
            }
        }
    }
}

async fn print_events(controller: Arc<SessionController>, mut events: mpsc::Receiver<Event>) {
    let mut printer = TimelinePrinter::new(controller);
    while let Some(event) = events.recv().await {
        printer.handle(event).await;
    }
}
