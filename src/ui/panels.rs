use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the year selector and the continent multi-select.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year ----
            ui.strong("Year");
            let current_year = state.selection.year;
            egui::ComboBox::from_id_salt("year")
                .selected_text(current_year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for &year in &dataset.years {
                        if ui
                            .selectable_label(current_year == year, year.to_string())
                            .clicked()
                        {
                            state.set_year(year);
                        }
                    }
                });
            ui.separator();

            // ---- Continents ----
            let n_selected = state.selection.continents.len();
            let n_total = dataset.continents.len();
            ui.strong(format!("Continents  ({n_selected}/{n_total})"))
                .on_hover_text("Applies to all charts.");

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_continents();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_continents();
                }
            });
            if n_selected == 0 {
                ui.label(RichText::new("Nothing selected: showing all").italics().weak());
            }

            for continent in &dataset.continents {
                let mut checked = state.selection.continents.contains(continent);
                let text = RichText::new(continent).color(state.color_map.color_for(continent));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_continent(continent);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.charts.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export chart specs…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let (in_year, in_history) = state.visible_rows();
            ui.label(format!(
                "{} observations loaded, {in_year} in {}, {in_history} across all years",
                ds.len(),
                state.selection.year
            ));
        }

        if let Some(path) = &state.source_path {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Gapminder data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(charts) = &state.charts else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart specs")
        .add_filter("Vega-Lite JSON", &["json"])
        .set_file_name(format!("gapminder_{}.json", charts.year))
        .save_file();

    if let Some(path) = file {
        match charts.write_json(&path) {
            Ok(()) => {
                log::info!("Exported chart specs to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
