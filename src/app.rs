use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyGarageApp {
    pub state: AppState,
}

impl Default for RustyGarageApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for RustyGarageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(dataset) = &self.state.dataset else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a listings file to view the dashboard  (File → Open…)");
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Used Car Sales Analytics");
                    ui.separator();

                    summary::metrics_strip(ui, dataset, &self.state.visible);
                    ui.separator();

                    charts::chart_grid(ui, &self.state);

                    ui.separator();
                    ui.heading("Detailed Data Summary");
                    summary::summary_table(ui, dataset, &self.state.visible);

                    ui.add_space(12.0);
                    ui.heading("Filtered Dataset Preview");
                    summary::preview_table(ui, dataset, &self.state.visible);
                });
        });
    }
}
