use super::Section;
use crate::chart::{ChartData, ChartKind, ChartSpec, Kpi, ValueFormat, UNAVAILABLE};
use crate::data::aggregate;
use crate::data::model::{CategoryField, NumericField, TableView};

/// Which of the two overview sections is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverviewSection {
    #[default]
    Kpis,
    TopMovies,
}

impl OverviewSection {
    pub const ALL: [OverviewSection; 2] = [OverviewSection::Kpis, OverviewSection::TopMovies];

    pub fn title(&self) -> &'static str {
        match self {
            OverviewSection::Kpis => "General KPIs",
            OverviewSection::TopMovies => "Top 5 movies",
        }
    }
}

const INTRO: &str = "The movie business has changed radically over the last decades. \
From blockbuster theatrical releases to the rise of streaming, both the way we watch \
movies and the kind of productions that succeed look very different today. This \
dashboard explores box office, budgets, genres, ratings and talent to understand how \
the industry evolved and what drives a movie's success or failure.\n\n\
Note: the analysis covers theatrical productions only, not streaming-native content.";

/// Landing page: intro text plus either the KPI grid or the top-5 chart.
pub fn build(view: TableView<'_>, section: OverviewSection) -> Vec<Section> {
    let mut sections = vec![Section::Text(INTRO.to_string())];
    match section {
        OverviewSection::Kpis => sections.extend(kpi_grid(view)),
        OverviewSection::TopMovies => sections.push(top_movies(view)),
    }
    sections
}

fn kpi_grid(view: TableView<'_>) -> Vec<Section> {
    let year_range = aggregate::year_span(view)
        .map(|(min, max)| format!("{min}–{max}"))
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let headline = vec![
        Kpi::new(
            "Movies",
            ValueFormat::Count.format(aggregate::row_count(view) as f64),
        ),
        Kpi::new("Year range", year_range),
        Kpi::new(
            "Genres",
            aggregate::distinct_count(view, CategoryField::Genre).to_string(),
        ),
    ];
    let averages = vec![
        Kpi::numeric(
            "Mean budget",
            aggregate::mean_of(view, NumericField::Budget),
            ValueFormat::Dollars,
        ),
        Kpi::numeric(
            "Mean gross",
            aggregate::mean_of(view, NumericField::Gross),
            ValueFormat::Dollars,
        ),
        Kpi::numeric(
            "Mean ROI",
            aggregate::mean_of(view, NumericField::Roi),
            ValueFormat::Multiplier,
        ),
        Kpi::numeric(
            "Mean score",
            aggregate::mean_of(view, NumericField::Score),
            ValueFormat::Plain,
        ),
    ];
    vec![Section::Kpis(headline), Section::Kpis(averages)]
}

fn top_movies(view: TableView<'_>) -> Section {
    let top = aggregate::top_n_by(view, NumericField::Gross, 5);
    if top.is_empty() {
        return Section::Notice("No gross figures available for a top-5 ranking.".to_string());
    }
    let bars = top
        .into_iter()
        .map(|row| {
            let movie = view.movie(row);
            let name = movie
                .name
                .clone()
                .unwrap_or_else(|| "(untitled)".to_string());
            (name, movie.gross.unwrap_or_default())
        })
        .collect();
    Section::Chart(ChartSpec {
        title: "Top 5 movies by gross".to_string(),
        kind: ChartKind::Bar,
        x_label: String::new(),
        y_label: "Gross".to_string(),
        value_format: ValueFormat::Dollars,
        data: ChartData::Categories(bars),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::ensure_derived;
    use crate::data::model::{Movie, MovieTable};

    fn sample() -> MovieTable {
        ensure_derived(MovieTable::from_movies(vec![
            Movie {
                name: Some("Big".to_string()),
                year: Some(1994),
                genre: Some("Action".to_string()),
                budget: Some(100.0),
                gross: Some(300.0),
                score: Some(8.0),
                ..Movie::default()
            },
            Movie {
                name: Some("Small".to_string()),
                year: Some(2005),
                genre: Some("Drama".to_string()),
                budget: Some(10.0),
                gross: Some(20.0),
                score: Some(6.0),
                ..Movie::default()
            },
        ]))
    }

    #[test]
    fn kpi_grid_reports_counts_and_means() {
        let table = sample();
        let rows: Vec<usize> = (0..table.len()).collect();
        let sections = build(TableView::new(&table, &rows), OverviewSection::Kpis);

        let Section::Kpis(headline) = &sections[1] else {
            panic!("expected a KPI row");
        };
        assert_eq!(headline[0].value, "2");
        assert_eq!(headline[1].value, "1994–2005");
        assert_eq!(headline[2].value, "2");
    }

    #[test]
    fn top_movies_ranks_by_gross() {
        let table = sample();
        let rows: Vec<usize> = (0..table.len()).collect();
        let sections = build(TableView::new(&table, &rows), OverviewSection::TopMovies);

        let Section::Chart(spec) = &sections[1] else {
            panic!("expected a chart");
        };
        let ChartData::Categories(bars) = &spec.data else {
            panic!("expected category bars");
        };
        assert_eq!(bars[0].0, "Big");
        assert_eq!(bars[0].1, 300.0);
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn empty_dataset_degrades_to_sentinels_and_notice() {
        let table = MovieTable::default();
        let rows: Vec<usize> = Vec::new();
        let view = TableView::new(&table, &rows);

        let sections = build(view, OverviewSection::Kpis);
        let Section::Kpis(headline) = &sections[1] else {
            panic!("expected a KPI row");
        };
        assert_eq!(headline[1].value, UNAVAILABLE);

        let sections = build(view, OverviewSection::TopMovies);
        assert!(matches!(sections[1], Section::Notice(_)));
    }
}
