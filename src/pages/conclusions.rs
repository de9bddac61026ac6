use super::Section;
use crate::chart::{ChartData, ChartKind, ChartSpec, Kpi, ValueFormat, UNAVAILABLE};
use crate::data::aggregate;
use crate::data::filter::TrimBound;
use crate::data::model::{NumericField, TableView};

/// Results page: KPI row, ROI by decade with a volume companion, and the
/// genre efficiency ranking.  Runs over the full dataset; only the ROI
/// trim toggle applies here.
pub fn build(view: TableView<'_>, trim: Option<TrimBound>) -> Vec<Section> {
    let mut sections = vec![
        Section::Text(
            "Summary of the analysis: headline KPIs, how profitability moved across \
             decades, and which genres make the most of their budgets."
                .to_string(),
        ),
        Section::Kpis(kpi_row(view)),
    ];

    sections.push(Section::Heading("Profitability by decade".to_string()));
    sections.push(roi_by_decade(view, trim));
    sections.push(volume_by_decade(view));

    sections.push(Section::Heading("Genre efficiency".to_string()));
    sections.push(roi_by_genre(view));

    sections
}

fn kpi_row(view: TableView<'_>) -> Vec<Kpi> {
    vec![
        Kpi::new(
            "Movies",
            ValueFormat::Count.format(aggregate::row_count(view) as f64),
        ),
        Kpi::numeric(
            "Mean ROI",
            aggregate::mean_of(view, NumericField::Roi),
            ValueFormat::Multiplier,
        ),
        Kpi::numeric(
            "Mean profit",
            aggregate::mean_of(view, NumericField::Profit),
            ValueFormat::Dollars,
        ),
        Kpi::new(
            "Most profitable genre",
            aggregate::most_profitable_genre(view).unwrap_or_else(|| UNAVAILABLE.to_string()),
        ),
    ]
}

fn roi_by_decade(view: TableView<'_>, trim: Option<TrimBound>) -> Section {
    let medians = aggregate::median_by_decade(view, NumericField::Roi, trim);
    if medians.is_empty() {
        return Section::Notice(
            "Not enough data to compute ROI by decade with the current trim.".to_string(),
        );
    }
    let title = if trim.is_some() {
        "Median ROI by decade (outliers trimmed)"
    } else {
        "Median ROI by decade"
    };
    Section::Chart(ChartSpec {
        title: title.to_string(),
        kind: ChartKind::Line,
        x_label: "Decade".to_string(),
        y_label: "Median ROI (x)".to_string(),
        value_format: ValueFormat::Multiplier,
        data: ChartData::Series(
            medians
                .into_iter()
                .map(|(decade, roi)| [decade as f64, roi])
                .collect(),
        ),
    })
}

fn volume_by_decade(view: TableView<'_>) -> Section {
    let counts = aggregate::count_by_decade(view);
    if counts.is_empty() {
        return Section::Notice("No decade information available.".to_string());
    }
    Section::Chart(ChartSpec {
        title: "Movies per decade".to_string(),
        kind: ChartKind::Bar,
        x_label: "Decade".to_string(),
        y_label: "Movies".to_string(),
        value_format: ValueFormat::Count,
        data: ChartData::Categories(
            counts
                .into_iter()
                .map(|(decade, count)| (decade.to_string(), count as f64))
                .collect(),
        ),
    })
}

fn roi_by_genre(view: TableView<'_>) -> Section {
    // this ranking always trims so one freak release cannot stretch the axis
    let means = aggregate::grouped_mean(
        view,
        crate::data::model::CategoryField::Genre,
        NumericField::Roi,
        Some(TrimBound::default()),
    );
    if means.is_empty() {
        return Section::Notice(
            "Genre and ROI are needed for this ranking and no rows carry both.".to_string(),
        );
    }
    Section::Chart(ChartSpec {
        title: "Genres with the best mean ROI (top 12)".to_string(),
        kind: ChartKind::BarH,
        x_label: "ROI (x)".to_string(),
        y_label: String::new(),
        value_format: ValueFormat::Multiplier,
        data: ChartData::Categories(aggregate::top_n_groups(means, 12)),
    })
}
