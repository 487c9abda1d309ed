//! Mission Control entry point
//!
//! On the web, opens the board from LocalStorage. Natively, runs a smoke
//! session against in-memory storage, optionally importing a backup file
//! and listing only missions with a given status:
//!
//! `mission-control [backup.json] [status]`

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use mission_control::MissionControl;
    use mission_control::platform::LocalStorage;

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Mission Control starting...");

        let Some(storage) = LocalStorage::open() else {
            log::error!("LocalStorage is not available");
            return;
        };
        let control = MissionControl::with_defaults(storage);
        let summary = control.summary();
        log::info!(
            "{} missions ({} done, {} in progress), average {}%, {} overdue, {} snapshots",
            summary.total,
            summary.completed,
            summary.in_progress,
            summary.average_progress,
            summary.overdue,
            control.snapshots().len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use mission_control::platform::MemoryStorage;
    use mission_control::{MissionControl, MissionStatus};

    env_logger::init();
    log::info!("Mission Control (native) starting...");

    let mut args = std::env::args().skip(1);
    let backup_path = args.next();
    let status_filter = match args.next() {
        Some(raw) => match MissionStatus::from_str(&raw) {
            Some(status) => Some(status),
            None => {
                eprintln!("Unknown status {:?} (try in-progress, done, delayed, pending)", raw);
                return std::process::ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let mut control = MissionControl::with_defaults(MemoryStorage::new());

    if let Some(path) = backup_path {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Cannot read {}: {}", path, e);
                return std::process::ExitCode::FAILURE;
            }
        };
        if let Err(e) = control.restore_from_file(&bytes) {
            eprintln!("{}: {}", path, e);
            return std::process::ExitCode::FAILURE;
        }
    }

    let summary = control.summary();
    println!(
        "Missions: {} total, {} done, {} in progress",
        summary.total, summary.completed, summary.in_progress
    );
    println!("Average progress: {}%", summary.average_progress);
    println!("Overdue: {}", summary.overdue);
    for mission in control
        .state()
        .missions
        .iter()
        .filter(|m| status_filter.is_none_or(|status| m.status == status))
    {
        println!(
            "  [{}] {} ({}, {}) {}% - {}/{} tasks, due {}",
            mission.priority.as_str(),
            mission.title,
            mission.status.as_str(),
            mission.owner,
            mission.progress,
            mission.completed_tasks(),
            mission.tasks.len(),
            mission.due
        );
    }
    if !control.state().focus_log.is_empty() {
        println!("Latest note: {}", control.state().focus_log);
    }

    control.shutdown();
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
