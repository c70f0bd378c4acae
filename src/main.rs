/// Demo entry point for the habit counter core
///
/// Wires the in-memory store to the reactive container and walks through the
/// observable flow: seeding, a couple of increases, and the add-habit dialog
/// with its one-shot keyboard effects. Projection snapshots go to stdout as
/// JSON; logs go to stderr.

use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Handle;
use tracing::info;

use habit_counter::{HabitsContainer, Keyboard, MemoryStore};

/// Keyboard collaborator that just reports what it was asked to do
struct LoggingKeyboard;

impl Keyboard for LoggingKeyboard {
    fn show(&self) {
        info!("keyboard shown with focus on the new habit input");
    }

    fn hide(&self) {
        info!("keyboard hidden");
    }
}

/// Command line arguments for the habit counter demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Habit names the store is seeded with on first populate
    #[arg(long, default_values_t = [
        "no social media".to_string(),
        "reading".to_string(),
        "workout".to_string(),
    ])]
    seed: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_counter={}", log_level))
        .with_writer(std::io::stderr) // keep stdout clean for the projection
        .init();

    let store = Arc::new(MemoryStore::with_seed(&args.seed));
    let container = HabitsContainer::new(store, Handle::current());

    // Wait for the seeded collection to reach the projection.
    let mut view = container.view_state();
    while view.borrow_and_update().items.is_empty() {
        view.changed().await?;
    }
    println!("{}", serde_json::to_string_pretty(&*view.borrow_and_update())?);

    // First tap of the day extends the streak; the update arrives back
    // through the collection stream.
    container.on_item_activated(1).await;
    view.changed().await?;
    println!("{}", serde_json::to_string_pretty(&*view.borrow_and_update())?);

    // A second tap the same day runs into the once-per-day rule (logged).
    container.on_item_activated(1).await;

    // Open the add dialog; the focus request lands after a short delay.
    let mut effects = container.effect_signal();
    container.on_add_requested();
    while *effects.borrow_and_update() == 0 {
        effects.changed().await?;
    }
    if let Some(effect) = container.consume_next_effect() {
        container.on_effect(effect, &LoggingKeyboard);
    }

    // Type a name and confirm; the dialog closes and the keyboard hides.
    container.on_draft_text_changed("meditate");
    container.on_new_habit_confirmed();
    if let Some(effect) = container.consume_next_effect() {
        container.on_effect(effect, &LoggingKeyboard);
    }

    container.dispose();
    info!("habit counter demo finished");
    Ok(())
}
