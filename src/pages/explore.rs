use super::Section;
use crate::chart::{ChartData, ChartKind, ChartSpec, ScatterGroup, ValueFormat};
use crate::data::aggregate;
use crate::data::model::{CategoryField, NumericField, Table, TableView};

/// Bin count of the numeric-distribution histogram.
const HISTOGRAM_BINS: usize = 30;

/// Picker state for the two distribution charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreSelections {
    pub numeric: NumericField,
    pub category: CategoryField,
}

impl Default for ExploreSelections {
    fn default() -> Self {
        ExploreSelections {
            numeric: NumericField::Score,
            category: CategoryField::Genre,
        }
    }
}

/// Exploratory page over the filtered view: distributions, the release
/// time line, budget vs gross, the cleaning report, and profit/ROI.
pub fn build(
    view: TableView<'_>,
    selections: ExploreSelections,
    null_report: Option<&Table>,
) -> Vec<Section> {
    let mut sections = vec![Section::Text(
        "Exploratory look at the dataset, together with the transformations applied \
         during cleaning."
            .to_string(),
    )];

    sections.push(Section::Heading("Distributions".to_string()));
    sections.extend(numeric_distribution(view, selections.numeric));
    sections.push(category_distribution(view, selections.category));

    sections.push(Section::Heading("Releases over time".to_string()));
    sections.push(releases_per_year(view));

    sections.push(Section::Heading("Budget vs gross".to_string()));
    sections.push(budget_vs_gross(view));

    sections.push(Section::Heading("Cleaning and transformations".to_string()));
    sections.extend(cleaning_report(null_report));

    sections.push(Section::Heading("Profit & ROI".to_string()));
    sections.push(roi_by_genre(view));
    sections.push(top_by_profit(view));

    sections
}

fn numeric_distribution(view: TableView<'_>, field: NumericField) -> Vec<Section> {
    let bins = aggregate::histogram(view, field, HISTOGRAM_BINS);
    if bins.is_empty() {
        return vec![Section::Notice(format!(
            "No values of '{field}' in the current selection."
        ))];
    }
    let chart = Section::Chart(ChartSpec {
        title: format!("Distribution of {field}"),
        kind: ChartKind::Histogram,
        x_label: field.to_string(),
        y_label: "Movies".to_string(),
        value_format: ValueFormat::Count,
        data: ChartData::Bins(bins),
    });
    let caption = match (
        aggregate::mean_of(view, field),
        aggregate::median_of(view, field),
    ) {
        (Some(mean), Some(median)) => {
            Some(Section::Text(format!("Mean: {mean:.2} · Median: {median:.2}")))
        }
        _ => None,
    };
    std::iter::once(chart).chain(caption).collect()
}

fn category_distribution(view: TableView<'_>, field: CategoryField) -> Section {
    let counts = aggregate::value_counts(view, field, 10);
    if counts.is_empty() {
        return Section::Notice(format!("No values of '{field}' in the current selection."));
    }
    Section::Chart(ChartSpec {
        title: format!("{field} (top 10)"),
        kind: ChartKind::BarH,
        x_label: "Movies".to_string(),
        y_label: String::new(),
        value_format: ValueFormat::Count,
        data: ChartData::Categories(
            counts
                .into_iter()
                .map(|(label, count)| (label, count as f64))
                .collect(),
        ),
    })
}

fn releases_per_year(view: TableView<'_>) -> Section {
    let counts = aggregate::count_by_year(view);
    if counts.is_empty() {
        return Section::Notice("No release years in the current selection.".to_string());
    }
    Section::Chart(ChartSpec {
        title: "Movies per year".to_string(),
        kind: ChartKind::Line,
        x_label: "Year".to_string(),
        y_label: "Movies".to_string(),
        value_format: ValueFormat::Count,
        data: ChartData::Series(
            counts
                .into_iter()
                .map(|(year, count)| [year as f64, count as f64])
                .collect(),
        ),
    })
}

fn budget_vs_gross(view: TableView<'_>) -> Section {
    let mut groups: Vec<ScatterGroup> = Vec::new();
    for movie in view.movies() {
        let (Some(budget), Some(gross)) = (movie.budget, movie.gross) else {
            continue;
        };
        let label = movie.genre.as_deref().unwrap_or("(unknown)");
        let slot = match groups.iter().position(|g| g.label == label) {
            Some(i) => i,
            None => {
                groups.push(ScatterGroup {
                    label: label.to_string(),
                    points: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].points.push([budget, gross]);
    }
    if groups.is_empty() {
        return Section::Notice(
            "Budget and gross are both needed for this chart and neither is available."
                .to_string(),
        );
    }
    Section::Chart(ChartSpec {
        title: "Budget vs gross".to_string(),
        kind: ChartKind::Scatter,
        x_label: "Budget".to_string(),
        y_label: "Gross".to_string(),
        value_format: ValueFormat::Dollars,
        data: ChartData::Groups(groups),
    })
}

const CLEANING_NOTES: &str = "\
Columns and types: names normalized; score, votes, budget, gross, runtime and year \
coerced to numeric.\n\
Nulls: numeric columns (gross, runtime, votes, score) imputed with the column mean; \
categoricals (rating, company, country, writer, released, star) filled with \
\"Unknown\".\n\
Budget: over 20% missing, imputed with a linear regression on year, votes, gross, \
runtime, rating and country.\n\
Derived columns: profit = gross - budget and roi = (gross - budget) / budget.";

fn cleaning_report(null_report: Option<&Table>) -> Vec<Section> {
    match null_report {
        Some(report) if !report.is_empty() => vec![
            Section::Table {
                title: "Missing values before cleaning (%)".to_string(),
                table: report.clone(),
            },
            Section::Text(CLEANING_NOTES.to_string()),
        ],
        _ => vec![Section::Notice(
            "The null report is not available.".to_string(),
        )],
    }
}

fn roi_by_genre(view: TableView<'_>) -> Section {
    let means = aggregate::grouped_mean(view, CategoryField::Genre, NumericField::Roi, None);
    if means.is_empty() {
        return Section::Notice(
            "Genre and ROI are needed for this chart and no rows carry both.".to_string(),
        );
    }
    Section::Chart(ChartSpec {
        title: "Mean ROI by genre (top 10)".to_string(),
        kind: ChartKind::BarH,
        x_label: "ROI (x)".to_string(),
        y_label: String::new(),
        value_format: ValueFormat::Multiplier,
        data: ChartData::Categories(aggregate::top_n_groups(means, 10)),
    })
}

fn top_by_profit(view: TableView<'_>) -> Section {
    let top = aggregate::top_n_by(view, NumericField::Profit, 10);
    if top.is_empty() {
        return Section::Notice("No profit figures in the current selection.".to_string());
    }
    let bars = top
        .into_iter()
        .map(|row| {
            let movie = view.movie(row);
            let name = movie
                .name
                .clone()
                .unwrap_or_else(|| "(untitled)".to_string());
            (name, movie.profit.unwrap_or_default())
        })
        .collect();
    Section::Chart(ChartSpec {
        title: "Top 10 movies by profit".to_string(),
        kind: ChartKind::Bar,
        x_label: String::new(),
        y_label: "Profit".to_string(),
        value_format: ValueFormat::Dollars,
        data: ChartData::Categories(bars),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::ensure_derived;
    use crate::data::model::{Movie, MovieTable, Value};

    fn sample() -> MovieTable {
        ensure_derived(MovieTable::from_movies(vec![
            Movie {
                name: Some("Heat".to_string()),
                year: Some(1995),
                genre: Some("Action".to_string()),
                budget: Some(60.0),
                gross: Some(187.0),
                score: Some(8.3),
                ..Movie::default()
            },
            Movie {
                name: Some("Clerks".to_string()),
                year: Some(1994),
                genre: Some("Comedy".to_string()),
                budget: Some(0.03),
                gross: Some(3.2),
                score: Some(7.9),
                ..Movie::default()
            },
        ]))
    }

    #[test]
    fn full_page_builds_all_sections() {
        let table = sample();
        let rows: Vec<usize> = (0..table.len()).collect();
        let report = Table {
            columns: vec!["column".to_string(), "null_pct".to_string()],
            rows: vec![vec![Value::String("budget".to_string()), Value::Float(28.3)]],
        };
        let sections = build(
            TableView::new(&table, &rows),
            ExploreSelections::default(),
            Some(&report),
        );

        let charts = sections
            .iter()
            .filter(|s| matches!(s, Section::Chart(_)))
            .count();
        // histogram, category bar, time line, scatter, roi-by-genre, top-profit
        assert_eq!(charts, 6);
        assert!(sections
            .iter()
            .any(|s| matches!(s, Section::Table { .. })));
        assert!(!sections.iter().any(|s| matches!(s, Section::Notice(_))));
    }

    #[test]
    fn empty_view_degrades_every_chart_to_a_notice() {
        let table = sample();
        let rows: Vec<usize> = Vec::new();
        let sections = build(
            TableView::new(&table, &rows),
            ExploreSelections::default(),
            None,
        );
        assert!(!sections.iter().any(|s| matches!(s, Section::Chart(_))));
        let notices = sections
            .iter()
            .filter(|s| matches!(s, Section::Notice(_)))
            .count();
        // numeric, categorical, time line, scatter, null report, roi, profit
        assert_eq!(notices, 7);
    }

    #[test]
    fn scatter_groups_points_by_genre() {
        let table = sample();
        let rows: Vec<usize> = (0..table.len()).collect();
        let section = budget_vs_gross(TableView::new(&table, &rows));
        let Section::Chart(spec) = section else {
            panic!("expected a chart");
        };
        let ChartData::Groups(groups) = spec.data else {
            panic!("expected scatter groups");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Action");
        assert_eq!(groups[0].points, vec![[60.0, 187.0]]);
    }

    #[test]
    fn roi_by_genre_is_untrimmed_on_this_page() {
        // an extreme ROI stays in the per-genre mean here
        let table = sample();
        let rows: Vec<usize> = (0..table.len()).collect();
        let Section::Chart(spec) = roi_by_genre(TableView::new(&table, &rows)) else {
            panic!("expected a chart");
        };
        let ChartData::Categories(bars) = spec.data else {
            panic!("expected bars");
        };
        // Clerks' ROI is ~105x and survives, so Comedy ranks first
        assert_eq!(bars[0].0, "Comedy");
        assert!(bars[0].1 > 100.0);
    }
}
