use std::path::Path;
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::filter::{apply_filters, FilterConfig};
use crate::data::loader::{load_null_report, DatasetCache, DEFAULT_NULL_REPORT_PATH};
use crate::data::model::{CategoryField, MovieTable, Table};
use crate::pages::explore::ExploreSelections;
use crate::pages::overview::OverviewSection;
use crate::pages::Page;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// One-time-init handle to the shared dataset.
    pub cache: DatasetCache,
    /// Loaded dataset (None until the default file or File → Open works).
    pub dataset: Option<Arc<MovieTable>>,
    /// Pre-baked null report for the cleaning section.
    pub null_report: Option<Table>,

    /// Active navigation target.
    pub page: Page,
    /// User-facing filter state (year interval, genre set, trim toggle).
    pub filters: FilterConfig,
    /// Every row index, cached so unfiltered pages skip the filter pass.
    pub all_rows: Vec<usize>,
    /// Row indices passing the current filters (cached).
    pub visible_rows: Vec<usize>,

    /// Overview section selector.
    pub overview_section: OverviewSection,
    /// Variable pickers on the explore page.
    pub explore: ExploreSelections,

    /// Genre colour assignments for the scatter chart.
    pub colors: CategoryColors,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: DatasetCache::default(),
            dataset: None,
            null_report: None,
            page: Page::Overview,
            filters: FilterConfig::default(),
            all_rows: Vec::new(),
            visible_rows: Vec::new(),
            overview_section: OverviewSection::default(),
            explore: ExploreSelections::default(),
            colors: CategoryColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load the default dataset and null report from `data/`.  A missing
    /// dataset is not fatal to the app: the shell opens with a message
    /// and File → Open still works.
    pub fn load_initial(&mut self) {
        match self.cache.get_or_load(None) {
            Ok(table) => self.set_dataset(table),
            Err(e) => {
                log::error!("initial dataset load failed: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.reload_null_report(Path::new(DEFAULT_NULL_REPORT_PATH));
    }

    /// Load a dataset picked in the file dialog, replacing the cached one.
    pub fn open_path(&mut self, path: &Path) {
        match self.cache.replace(path) {
            Ok(table) => self.set_dataset(table),
            Err(e) => {
                log::error!("failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset; reset filters, colours, and views.
    pub fn set_dataset(&mut self, table: Arc<MovieTable>) {
        self.filters = FilterConfig::for_table(&table);
        self.all_rows = (0..table.len()).collect();
        self.visible_rows = self.all_rows.clone();

        let genres = table
            .categories
            .get(&CategoryField::Genre)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.colors = CategoryColors::new(genres);

        self.dataset = Some(table);
        self.status_message = None;
    }

    fn reload_null_report(&mut self, path: &Path) {
        match load_null_report(path) {
            Ok(report) => self.null_report = Some(report),
            Err(e) => {
                // the explore page degrades to a notice for this one
                log::warn!("null report unavailable: {e:#}");
                self.null_report = None;
            }
        }
    }

    /// Recompute `visible_rows` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.dataset {
            self.visible_rows = apply_filters(table, &self.filters);
        }
    }
}
