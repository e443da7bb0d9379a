//! Habit commands backed by the local/remote gateway.
//!
//! State lives in the local JSON file; when the backend answers the
//! startup probe it is preferred on load and notified after each change.

use habitlog_core::storage::FallbackStore;
use habitlog_core::{
    ApiClient, Config, HabitView, HistoryEntry, JsonBlobStore, MemoryStore, PersistenceGateway,
    SyncStatus, SystemClock,
};

pub enum HabitAction {
    Status { json: bool },
    Done,
    Reset,
    History { json: bool },
}

type Gateway = PersistenceGateway<FallbackStore<JsonBlobStore, MemoryStore>, ApiClient, SystemClock>;

async fn open_gateway(offline: bool) -> Result<Gateway, Box<dyn std::error::Error>> {
    let config = Config::load()?;

    // Disk problems degrade to an in-memory copy for this run.
    let local = FallbackStore::new(
        JsonBlobStore::new(config.local_file_path()?),
        MemoryStore::new(),
    );

    let remote = if offline || !config.client.sync_enabled {
        None
    } else {
        Some(ApiClient::new(&config.client.api_base_url)?)
    };

    let gateway = PersistenceGateway::connect(local, remote, SystemClock)
        .await
        .with_default_name(config.habit.default_name);
    Ok(gateway)
}

pub async fn run(action: HabitAction, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut gateway = open_gateway(offline).await?;
    let loaded = gateway.load().await?;

    match action {
        HabitAction::Status { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&loaded)?);
            } else {
                print_view(&loaded);
            }
        }
        HabitAction::Done => {
            if loaded.completed_today {
                println!("Already done today.");
            }
            let view = gateway.complete().await?;
            print_view(&view);
        }
        HabitAction::Reset => {
            let view = gateway.reset().await?;
            println!("Habit data reset.");
            print_view(&view);
        }
        HabitAction::History { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&gateway.history())?);
            } else {
                print_history(&gateway.history());
            }
        }
    }

    print_sync_status(gateway.sync_status());
    Ok(())
}

fn print_view(view: &HabitView) {
    let unit = if view.streak == 1 { "day" } else { "days" };
    println!("{}", view.name);
    println!("  Streak: {} {unit}", view.streak);
    println!(
        "  Today:  {}",
        if view.completed_today { "done" } else { "not yet" }
    );
}

fn print_history(history: &[HistoryEntry]) {
    for entry in history {
        let mark = if entry.completed { "x" } else { " " };
        println!("{} {} [{mark}]", entry.day_name, entry.date);
    }
}

fn print_sync_status(status: SyncStatus) {
    if status != SyncStatus::Local {
        eprintln!("sync: {status}");
    }
}
