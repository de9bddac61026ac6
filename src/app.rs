use eframe::egui;

use crate::data::model::TableView;
use crate::pages::{conclusions, explore, overview, Page, Section};
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CineLensApp {
    pub state: AppState,
}

impl Default for CineLensApp {
    fn default() -> Self {
        let mut state = AppState::default();
        state.load_initial();
        Self { state }
    }
}

impl eframe::App for CineLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation and controls ----
        egui::SidePanel::left("nav_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let sections = self.build_page();
            match sections {
                Some(sections) => {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            plot::show_sections(ui, &sections, &self.state.colors);
                        });
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Open a movie dataset to begin  (File → Open…)");
                    });
                }
            }
        });
    }
}

impl CineLensApp {
    /// Run the full pipeline for the active page: cached dataset →
    /// filtered view → aggregations → chart specs.
    fn build_page(&self) -> Option<Vec<Section>> {
        let state = &self.state;
        let table = state.dataset.as_ref()?;
        let sections = match state.page {
            Page::Overview => overview::build(
                TableView::new(table, &state.all_rows),
                state.overview_section,
            ),
            Page::Explore => explore::build(
                TableView::new(table, &state.visible_rows),
                state.explore,
                state.null_report.as_ref(),
            ),
            Page::Conclusions => conclusions::build(
                TableView::new(table, &state.all_rows),
                state.filters.trim_bound(),
            ),
        };
        Some(sections)
    }
}
