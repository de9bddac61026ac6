use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{CategoryField, NumericField};
use crate::pages::overview::OverviewSection;
use crate::pages::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – navigation and controls
// ---------------------------------------------------------------------------

/// Render the navigation + controls panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CineLens");
    ui.separator();

    for page in Page::ALL {
        if ui
            .selectable_label(state.page == page, page.title())
            .clicked()
        {
            state.page = page;
        }
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match state.page {
                Page::Overview => overview_controls(ui, state),
                Page::Explore => explore_controls(ui, state),
                Page::Conclusions => conclusions_controls(ui, state),
            }

            ui.add_space(12.0);
            ui.separator();
            ui.strong("Resources");
            ui.hyperlink_to(
                "Original dataset",
                "https://www.kaggle.com/datasets/danielgrijalvas/movies",
            );
        });

    // Recompute visible rows after any control changes.
    state.refilter();
}

fn overview_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Show");
    egui::ComboBox::from_id_salt("overview_section")
        .selected_text(state.overview_section.title())
        .show_ui(ui, |ui: &mut Ui| {
            for section in OverviewSection::ALL {
                ui.selectable_value(&mut state.overview_section, section, section.title());
            }
        });
}

fn explore_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Filters");
    year_filter(ui, state);
    ui.add_space(4.0);
    genre_filter(ui, state);

    ui.add_space(12.0);
    ui.strong("Distributions");
    egui::ComboBox::from_id_salt("numeric_pick")
        .selected_text(state.explore.numeric.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for field in NumericField::ALL {
                ui.selectable_value(&mut state.explore.numeric, field, field.to_string());
            }
        });
    egui::ComboBox::from_id_salt("category_pick")
        .selected_text(state.explore.category.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for field in CategoryField::PICKABLE {
                ui.selectable_value(&mut state.explore.category, field, field.to_string());
            }
        });
}

fn conclusions_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Robustness");
    ui.checkbox(&mut state.filters.trim_roi, "Limit ROI to 0–100");
    ui.weak("The decade view uses the median and drops extreme ROI values so one freak release cannot distort the trend.");
}

fn year_filter(ui: &mut Ui, state: &mut AppState) {
    let Some(bounds) = state.dataset.as_ref().and_then(|d| d.year_bounds()) else {
        return;
    };
    let range = state.filters.year_range.get_or_insert(bounds);
    ui.label("Years");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::DragValue::new(&mut range.0).range(bounds.0..=range.1));
        ui.label("–");
        ui.add(egui::DragValue::new(&mut range.1).range(range.0..=bounds.1));
    });
}

fn genre_filter(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    let Some(all_genres) = dataset.categories.get(&CategoryField::Genre) else {
        return;
    };
    let selected = state
        .filters
        .categories
        .entry(CategoryField::Genre)
        .or_default();

    let header = format!("genre  ({}/{})", selected.len(), all_genres.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("genre_filter")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = all_genres.iter().cloned().collect();
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });
            ui.weak("An empty selection shows every genre.");

            for genre in all_genres {
                let mut checked = selected.contains(genre);
                if ui.checkbox(&mut checked, genre).changed() {
                    if checked {
                        selected.insert(genre.clone());
                    } else {
                        selected.remove(genre);
                    }
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

        if let Some(table) = &state.dataset {
            ui.label(format!(
                "{} movies loaded, {} in view",
                table.len(),
                state.visible_rows.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
