/// Page layer: turns a (filtered) dataset view into renderable content.
///
/// Each page module exposes a pure `build` function producing a list of
/// [`Section`]s (KPI rows, chart specs, tables, notices) which the ui
/// layer renders without touching the data again.  Anything a page
/// cannot compute (missing column, empty view) becomes a
/// [`Section::Notice`] instead of an error.

pub mod conclusions;
pub mod explore;
pub mod overview;

use crate::chart::{ChartSpec, Kpi};
use crate::data::model::Table;

/// Dashboard navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Explore,
    Conclusions,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Overview, Page::Explore, Page::Conclusions];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Explore => "Explore",
            Page::Conclusions => "Conclusions",
        }
    }
}

/// One renderable block of a page, in display order.
#[derive(Debug, Clone)]
pub enum Section {
    Heading(String),
    Text(String),
    Kpis(Vec<Kpi>),
    Chart(ChartSpec),
    Table { title: String, table: Table },
    /// Informational placeholder shown where a chart has no data.
    Notice(String),
}
