use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::summary;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: model multi-select, year range slider,
/// fuel-type multi-select.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the domains so we can mutate state inside the loops.
    let models: Vec<String> = dataset.models.iter().cloned().collect();
    let fuel_types: Vec<String> = dataset.fuel_types.iter().cloned().collect();
    let year_bounds = dataset.year_bounds;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multi_select(
                ui,
                "Select Model(s)",
                &models,
                state.criteria.models.clone(),
                |state, value| state.toggle_model(value),
                |state| state.select_all_models(),
                |state| state.select_no_models(),
                state,
            );

            ui.separator();

            // ---- Year range ----
            if let Some((lo, hi)) = year_bounds {
                ui.strong("Year Range");
                let (mut min_year, mut max_year) = state.criteria.year_range;
                let mut changed = false;
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    changed |= ui
                        .add(egui::Slider::new(&mut min_year, lo..=hi))
                        .changed();
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("To");
                    changed |= ui
                        .add(egui::Slider::new(&mut max_year, lo..=hi))
                        .changed();
                });
                if changed {
                    state.set_year_range(min_year, max_year);
                }
            }

            ui.separator();

            multi_select(
                ui,
                "Fuel Type",
                &fuel_types,
                state.criteria.fuel_types.clone(),
                |state, value| state.toggle_fuel(value),
                |state| state.select_all_fuels(),
                |state| state.select_no_fuels(),
                state,
            );
        });
}

/// A collapsible checkbox multi-select with All / None shortcuts.
#[allow(clippy::too_many_arguments)]
fn multi_select(
    ui: &mut Ui,
    title: &str,
    values: &[String],
    selected: BTreeSet<String>,
    toggle: impl Fn(&mut AppState, &str),
    select_all: impl Fn(&mut AppState),
    select_none: impl Fn(&mut AppState),
    state: &mut AppState,
) {
    let header_text = format!("{title}  ({}/{})", selected.len(), values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    select_all(state);
                }
                if ui.small_button("None").clicked() {
                    select_none(state);
                }
            });

            for value in values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    toggle(state, value);
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} visible",
                ds.len(),
                state.visible.len()
            ));
            ui.separator();
            summary::export_button(ui, state);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings ({} models, years {:?})",
                    dataset.len(),
                    dataset.models.len(),
                    dataset.year_bounds
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
