use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryField, MovieTable};

// ---------------------------------------------------------------------------
// Filter configuration
// ---------------------------------------------------------------------------

/// ROI values outside this inclusive bound are dropped before a trimmed
/// aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimBound {
    pub min: f64,
    pub max: f64,
}

impl TrimBound {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for TrimBound {
    fn default() -> Self {
        TrimBound { min: 0.0, max: 100.0 }
    }
}

/// User-facing filter state: an inclusive year interval, a selected-value
/// set per categorical column, and the ROI trim toggle.
///
/// An absent year range or an empty selection set means "no filtering on
/// that dimension".
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub year_range: Option<(i32, i32)>,
    pub categories: BTreeMap<CategoryField, BTreeSet<String>>,
    pub trim_roi: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            year_range: None,
            categories: BTreeMap::new(),
            trim_roi: true,
        }
    }
}

impl FilterConfig {
    /// The default configuration for a freshly loaded dataset: full year
    /// span, nothing selected, trim on.
    pub fn for_table(table: &MovieTable) -> Self {
        FilterConfig {
            year_range: table.year_bounds(),
            ..FilterConfig::default()
        }
    }

    /// The trim bound implied by the toggle.
    pub fn trim_bound(&self) -> Option<TrimBound> {
        self.trim_roi.then(TrimBound::default)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of rows passing all active filters, in source order.
///
/// A row passes when:
/// * no year range is set, or its `year` lies inside the inclusive range
///   (a row without a year fails an active range);
/// * for each column with a non-empty selection set, its value is in the
///   set (a row without a value for that column fails).
///
/// The source table is never touched; the result is an index list for a
/// [`TableView`](super::model::TableView).
pub fn apply_filters(table: &MovieTable, config: &FilterConfig) -> Vec<usize> {
    table
        .movies
        .iter()
        .enumerate()
        .filter(|(_, movie)| {
            if let Some((min, max)) = config.year_range {
                match movie.year {
                    Some(year) if year >= min && year <= max => {}
                    _ => return false,
                }
            }
            for (field, selected) in &config.categories {
                if selected.is_empty() {
                    continue; // nothing selected means no constraint
                }
                match field.get(movie) {
                    Some(value) if selected.contains(value) => {}
                    _ => return false,
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}
