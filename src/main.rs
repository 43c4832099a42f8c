mod app;
mod charts;
mod cli;
mod color;
mod data;
mod export;
mod state;
mod ui;

use std::process::ExitCode;

use app::DashboardApp;
use cli::{Flags, HELP};
use eframe::egui;
use export::{ExportOutcome, export_charts};
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    let flags = match Flags::from_env() {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("error: {e:#}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };
    if flags.help {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    if let Some(out) = &flags.export {
        return match export_charts(&flags, out) {
            Ok(ExportOutcome::Written { year_rows }) => {
                println!("Wrote chart specs ({year_rows} observations) to {}", out.display());
                ExitCode::SUCCESS
            }
            Ok(ExportOutcome::NoObservations) => {
                println!("No observations found for the chosen filters.");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        };
    }

    match run_window(initial_state(&flags)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Open the configured dataset if it exists; otherwise start empty and let
/// the user pick a file.
fn initial_state(flags: &Flags) -> AppState {
    let mut state = AppState::default();
    if !flags.data_path.exists() {
        log::info!(
            "{} not found, starting without a dataset",
            flags.data_path.display()
        );
        return state;
    }
    if state.open_path(&flags.data_path) {
        if let Some(ds) = state.dataset.clone() {
            state.set_selection(flags.selection_for(&ds));
        }
    }
    state
}

fn run_window(state: AppState) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gapminder Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}
