use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::chart::{ChartData, ChartKind, ChartSpec, Kpi, ValueFormat};
use crate::color::CategoryColors;
use crate::data::model::Table;
use crate::pages::Section;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Section renderer (central panel)
// ---------------------------------------------------------------------------

/// Render prepared page content.  All the data work happened in the page
/// builders; this only draws.
pub fn show_sections(ui: &mut Ui, sections: &[Section], colors: &CategoryColors) {
    for section in sections {
        match section {
            Section::Heading(text) => {
                ui.add_space(12.0);
                ui.heading(text);
                ui.separator();
            }
            Section::Text(text) => {
                ui.label(text);
            }
            Section::Kpis(kpis) => kpi_row(ui, kpis),
            Section::Chart(spec) => chart(ui, spec, colors),
            Section::Table { title, table } => data_table(ui, title, table),
            Section::Notice(text) => notice(ui, text),
        }
        ui.add_space(8.0);
    }
}

fn kpi_row(ui: &mut Ui, kpis: &[Kpi]) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for kpi in kpis {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(&kpi.value).strong().size(20.0));
                    ui.label(RichText::new(&kpi.label).weak());
                });
            });
        }
    });
}

fn notice(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).weak().italics());
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn chart(ui: &mut Ui, spec: &ChartSpec, colors: &CategoryColors) {
    ui.strong(&spec.title);

    let mut plot = Plot::new(&spec.title)
        .height(CHART_HEIGHT)
        .x_axis_label(&spec.x_label)
        .y_axis_label(&spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    let format = spec.value_format;

    match (&spec.data, spec.kind) {
        (ChartData::Series(points), _) => {
            if format != ValueFormat::Plain {
                plot = plot.y_axis_formatter(move |mark, _range| format.format(mark.value));
            }
            let line = Line::new(PlotPoints::from(points.clone()))
                .name(&spec.y_label)
                .width(1.5);
            plot.show(ui, |plot_ui| {
                plot_ui.line(line);
            });
        }
        (ChartData::Categories(cats), ChartKind::BarH) => {
            let n = cats.len();
            let bars: Vec<Bar> = cats
                .iter()
                .enumerate()
                .map(|(i, (label, value))| {
                    // first category lands at the top of the axis
                    Bar::new((n - 1 - i) as f64, *value)
                        .width(0.6)
                        .name(format!("{label}: {}", format.format(*value)))
                })
                .collect();
            let labels: Vec<String> = cats.iter().map(|(label, _)| label.clone()).collect();
            plot = plot.y_axis_formatter(move |mark, _range| {
                category_label(&labels, mark.value, true)
            });
            if format != ValueFormat::Plain {
                plot = plot.x_axis_formatter(move |mark, _range| format.format(mark.value));
            }
            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
        }
        (ChartData::Categories(cats), _) => {
            let bars: Vec<Bar> = cats
                .iter()
                .enumerate()
                .map(|(i, (label, value))| {
                    Bar::new(i as f64, *value)
                        .width(0.6)
                        .name(format!("{label}: {}", format.format(*value)))
                })
                .collect();
            let labels: Vec<String> = cats.iter().map(|(label, _)| label.clone()).collect();
            plot = plot.x_axis_formatter(move |mark, _range| {
                category_label(&labels, mark.value, false)
            });
            if format != ValueFormat::Plain {
                plot = plot.y_axis_formatter(move |mark, _range| format.format(mark.value));
            }
            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
        }
        (ChartData::Groups(groups), _) => {
            plot = plot.legend(Legend::default());
            if format != ValueFormat::Plain {
                plot = plot.y_axis_formatter(move |mark, _range| format.format(mark.value));
            }
            let marks: Vec<Points> = groups
                .iter()
                .map(|group| {
                    Points::new(PlotPoints::from(group.points.clone()))
                        .name(&group.label)
                        .color(colors.color_for(&group.label))
                        .radius(2.5)
                })
                .collect();
            plot.show(ui, |plot_ui| {
                for points in marks {
                    plot_ui.points(points);
                }
            });
        }
        (ChartData::Bins(bins), _) => {
            let bars: Vec<Bar> = bins
                .iter()
                .map(|bin| {
                    Bar::new((bin.lo + bin.hi) / 2.0, bin.count as f64)
                        .width(bin.hi - bin.lo)
                        .name(format!("{:.2}–{:.2}: {}", bin.lo, bin.hi, bin.count))
                })
                .collect();
            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
        }
    }
}

/// Tick label for a category axis: whole positions map to labels, the
/// rest stay blank.
fn category_label(labels: &[String], value: f64, reversed: bool) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    let i = rounded as usize;
    if i >= labels.len() {
        return String::new();
    }
    let idx = if reversed { labels.len() - 1 - i } else { i };
    labels[idx].clone()
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, title: &str, table: &Table) {
    ui.strong(title);
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(120.0), table.columns.len().max(1))
        .header(20.0, |mut header| {
            for column in &table.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(column);
                });
            }
        })
        .body(|mut body| {
            for row in &table.rows {
                body.row(18.0, |mut table_row| {
                    for cell in row {
                        table_row.col(|ui: &mut Ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_hit_whole_positions_only() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(category_label(&labels, 0.0, false), "a");
        assert_eq!(category_label(&labels, 2.0, false), "c");
        assert_eq!(category_label(&labels, 0.5, false), "");
        assert_eq!(category_label(&labels, 3.0, false), "");
        assert_eq!(category_label(&labels, -1.0, false), "");
    }

    #[test]
    fn reversed_axis_puts_the_first_label_on_top() {
        let labels = vec!["first".to_string(), "second".to_string()];
        assert_eq!(category_label(&labels, 1.0, true), "first");
        assert_eq!(category_label(&labels, 0.0, true), "second");
    }
}
