//! Pure reductions over a [`TableView`].
//!
//! Shared policies, applied uniformly:
//! * rows whose value column is unset are dropped before the statistic;
//!   rows whose group key is unset belong to no group;
//! * group output order is first-seen in source row order, which also
//!   pins the arg-max tie-break;
//! * top-K selection sorts stably, so ties keep source order;
//! * an optional [`TrimBound`] drops values outside the bound before
//!   aggregating;
//! * empty or column-less input yields an empty result or `None`, never
//!   an error.

use std::collections::BTreeMap;
use std::collections::HashMap;

use super::filter::TrimBound;
use super::model::{CategoryField, Movie, NumericField, TableView};

// ---------------------------------------------------------------------------
// Scalar statistics
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Non-null values of a column inside the view, trimmed if requested.
fn column_values(view: TableView<'_>, field: NumericField, trim: Option<TrimBound>) -> Vec<f64> {
    view.movies()
        .filter_map(|m| field.get(m))
        .filter(|v| trim.map_or(true, |t| t.contains(*v)))
        .collect()
}

// ---------------------------------------------------------------------------
// Grouped statistics
// ---------------------------------------------------------------------------

/// Collect the value column per group, groups ordered first-seen.
fn group_values(
    view: TableView<'_>,
    group: CategoryField,
    value: NumericField,
    trim: Option<TrimBound>,
) -> Vec<(String, Vec<f64>)> {
    let mut order: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for movie in view.movies() {
        let Some(key) = group.get(movie) else {
            continue;
        };
        let Some(v) = value.get(movie) else {
            continue;
        };
        if let Some(t) = trim {
            if !t.contains(v) {
                continue;
            }
        }
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            order.push((key.to_string(), Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(v);
    }
    order
}

/// Mean of `value` per `group`.  Groups with no surviving values are
/// omitted.  Order is first-seen.
pub fn grouped_mean(
    view: TableView<'_>,
    group: CategoryField,
    value: NumericField,
    trim: Option<TrimBound>,
) -> Vec<(String, f64)> {
    group_values(view, group, value, trim)
        .into_iter()
        .filter_map(|(key, values)| mean(&values).map(|m| (key, m)))
        .collect()
}

/// Median of `value` per `group`.  Used where decade-level robustness is
/// wanted; the per-genre views deliberately stay on the mean.
pub fn grouped_median(
    view: TableView<'_>,
    group: CategoryField,
    value: NumericField,
    trim: Option<TrimBound>,
) -> Vec<(String, f64)> {
    group_values(view, group, value, trim)
        .into_iter()
        .filter_map(|(key, values)| median(values).map(|m| (key, m)))
        .collect()
}

/// Median of `value` per decade, ascending by decade.  Decades with no
/// surviving values produce no row.
pub fn median_by_decade(
    view: TableView<'_>,
    value: NumericField,
    trim: Option<TrimBound>,
) -> Vec<(i32, f64)> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for movie in view.movies() {
        let Some(decade) = movie.decade else {
            continue;
        };
        let Some(v) = value.get(movie) else {
            continue;
        };
        if let Some(t) = trim {
            if !t.contains(v) {
                continue;
            }
        }
        groups.entry(decade).or_default().push(v);
    }
    groups
        .into_iter()
        .filter_map(|(decade, values)| median(values).map(|m| (decade, m)))
        .collect()
}

/// Keep the `n` largest groups, descending by value; ties keep their
/// incoming (first-seen) order.
pub fn top_n_groups(mut groups: Vec<(String, f64)>, n: usize) -> Vec<(String, f64)> {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups.truncate(n);
    groups
}

// ---------------------------------------------------------------------------
// Top-K rows and value counts
// ---------------------------------------------------------------------------

/// Absolute row indices of the `n` rows with the largest `value`,
/// descending.  Rows without the value are skipped; ties keep source
/// order (stable sort).
pub fn top_n_by(view: TableView<'_>, value: NumericField, n: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = view
        .indexed()
        .filter_map(|(i, m)| value.get(m).map(|v| (i, v)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(n);
    scored.into_iter().map(|(i, _)| i).collect()
}

/// The `n` most frequent values of a categorical column, descending by
/// count.  Null cells are not counted; ties keep first-seen order.
pub fn value_counts(view: TableView<'_>, category: CategoryField, n: usize) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for movie in view.movies() {
        let Some(value) = category.get(movie) else {
            continue;
        };
        let slot = *index.entry(value.to_string()).or_insert_with(|| {
            order.push((value.to_string(), 0));
            order.len() - 1
        });
        order[slot].1 += 1;
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(n);
    order
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

fn count_over(view: TableView<'_>, key: impl Fn(&Movie) -> Option<i32>) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for movie in view.movies() {
        if let Some(k) = key(movie) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

/// Rows per year, ascending.  Years with zero rows produce no entry;
/// gaps stay gaps.
pub fn count_by_year(view: TableView<'_>) -> Vec<(i32, usize)> {
    count_over(view, |m| m.year)
}

/// Rows per decade, ascending, gaps unfilled.
pub fn count_by_decade(view: TableView<'_>) -> Vec<(i32, usize)> {
    count_over(view, |m| m.decade)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One equal-width histogram bin over `[lo, hi)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width histogram of a numeric column.  Returns no bins when the
/// column has no values; a constant column collapses into a single bin.
pub fn histogram(view: TableView<'_>, field: NumericField, nbins: usize) -> Vec<Bin> {
    let values = column_values(view, field, None);
    if values.is_empty() || nbins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![Bin {
            lo: min,
            hi: max,
            count: values.len(),
        }];
    }
    let width = (max - min) / nbins as f64;
    let mut bins: Vec<Bin> = (0..nbins)
        .map(|i| Bin {
            lo: min + i as f64 * width,
            hi: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width) as usize).min(nbins - 1);
        bins[idx].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// Total row count of the view.
pub fn row_count(view: TableView<'_>) -> usize {
    view.len()
}

/// Mean of a numeric column; `None` when the column is absent or
/// entirely null in the view.
pub fn mean_of(view: TableView<'_>, field: NumericField) -> Option<f64> {
    mean(&column_values(view, field, None))
}

/// Median of a numeric column, same availability contract as [`mean_of`].
pub fn median_of(view: TableView<'_>, field: NumericField) -> Option<f64> {
    median(column_values(view, field, None))
}

/// Inclusive `[min, max]` over `year` within the view.
pub fn year_span(view: TableView<'_>) -> Option<(i32, i32)> {
    let mut years = view.movies().filter_map(|m| m.year);
    let first = years.next()?;
    Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
}

/// Number of distinct non-null values in a categorical column.
pub fn distinct_count(view: TableView<'_>, category: CategoryField) -> usize {
    let mut seen: Vec<&str> = view.movies().filter_map(|m| category.get(m)).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// The genre whose mean ROI is highest; `None` when no row carries both
/// a genre and an ROI.  Ties go to the genre seen first in source order.
pub fn most_profitable_genre(view: TableView<'_>) -> Option<String> {
    grouped_mean(view, CategoryField::Genre, NumericField::Roi, None)
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map(|(genre, _)| genre)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::ensure_derived;
    use crate::data::model::MovieTable;

    fn movie(genre: &str, budget: f64, gross: f64, year: i32) -> Movie {
        Movie {
            name: Some(format!("{genre}-{year}")),
            genre: Some(genre.to_string()),
            budget: Some(budget),
            gross: Some(gross),
            year: Some(year),
            ..Movie::default()
        }
    }

    fn all_rows(table: &MovieTable) -> Vec<usize> {
        (0..table.len()).collect()
    }

    #[test]
    fn end_to_end_scenario_from_two_rows() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("Action", 100.0, 300.0, 1994),
            movie("Drama", 0.0, 50.0, 1994),
        ]));
        assert_eq!(table.movies[0].profit, Some(200.0));
        assert_eq!(table.movies[1].profit, Some(50.0));
        assert_eq!(table.movies[0].roi, Some(2.0));
        assert_eq!(table.movies[1].roi, None);
        assert_eq!(table.movies[0].decade, Some(1990));
        assert_eq!(table.movies[1].decade, Some(1990));

        let rows = all_rows(&table);
        let view = TableView::new(&table, &rows);
        let by_genre = grouped_mean(view, CategoryField::Genre, NumericField::Roi, None);
        assert_eq!(by_genre, vec![("Action".to_string(), 2.0)]);
        assert_eq!(most_profitable_genre(view), Some("Action".to_string()));
    }

    #[test]
    fn grouped_mean_is_ordered_first_seen_and_skips_null_keys() {
        let mut rows = vec![
            movie("Drama", 10.0, 30.0, 1990),
            movie("Action", 10.0, 20.0, 1991),
            movie("Drama", 10.0, 50.0, 1992),
        ];
        rows.push(Movie {
            roi: Some(99.0),
            ..Movie::default()
        });
        let table = ensure_derived(MovieTable::from_movies(rows));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);

        let means = grouped_mean(view, CategoryField::Genre, NumericField::Roi, None);
        assert_eq!(
            means,
            vec![("Drama".to_string(), 3.0), ("Action".to_string(), 1.0)]
        );
    }

    #[test]
    fn most_profitable_genre_tie_goes_to_first_seen() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("Drama", 10.0, 30.0, 1990),
            movie("Action", 10.0, 30.0, 1991),
        ]));
        let idx = all_rows(&table);
        assert_eq!(
            most_profitable_genre(TableView::new(&table, &idx)),
            Some("Drama".to_string())
        );
    }

    #[test]
    fn most_profitable_genre_unavailable_without_roi() {
        let table = MovieTable::from_movies(vec![
            Movie {
                genre: Some("Action".to_string()),
                ..Movie::default()
            },
            Movie::default(),
        ]);
        let idx = all_rows(&table);
        assert_eq!(most_profitable_genre(TableView::new(&table, &idx)), None);

        let empty = MovieTable::default();
        let none: Vec<usize> = Vec::new();
        assert_eq!(most_profitable_genre(TableView::new(&empty, &none)), None);
    }

    #[test]
    fn trim_drops_out_of_bound_values_before_the_statistic() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("Action", 1.0, 3.0, 1990),   // roi 2
            movie("Action", 1.0, 500.0, 1991), // roi 499, trimmed out
            movie("Action", 1.0, 0.5, 1992),   // roi -0.5, trimmed out
        ]));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);

        let trimmed = grouped_mean(
            view,
            CategoryField::Genre,
            NumericField::Roi,
            Some(TrimBound::default()),
        );
        assert_eq!(trimmed, vec![("Action".to_string(), 2.0)]);

        let untrimmed = grouped_mean(view, CategoryField::Genre, NumericField::Roi, None);
        assert!((untrimmed[0].1 - (2.0 + 499.0 - 0.5) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_median_resists_the_outlier_the_mean_follows() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("Action", 1.0, 2.0, 1990),  // roi 1
            movie("Action", 1.0, 4.0, 1991),  // roi 3
            movie("Action", 1.0, 90.0, 1992), // roi 89
        ]));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);
        assert_eq!(
            grouped_median(view, CategoryField::Genre, NumericField::Roi, None),
            vec![("Action".to_string(), 3.0)]
        );
        assert_eq!(
            grouped_mean(view, CategoryField::Genre, NumericField::Roi, None),
            vec![("Action".to_string(), 31.0)]
        );
    }

    #[test]
    fn median_by_decade_empty_after_trim_is_no_data() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("Action", 1.0, 0.5, 1990), // roi -0.5
        ]));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);
        let out = median_by_decade(view, NumericField::Roi, Some(TrimBound::default()));
        assert!(out.is_empty());
    }

    #[test]
    fn median_by_decade_is_ascending_and_robust() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("A", 1.0, 2.0, 2001),  // roi 1
            movie("B", 1.0, 4.0, 2005),  // roi 3
            movie("C", 1.0, 90.0, 2009), // roi 89
            movie("D", 1.0, 6.0, 1995),  // roi 5
        ]));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);
        let out = median_by_decade(view, NumericField::Roi, Some(TrimBound::default()));
        assert_eq!(out, vec![(1990, 5.0), (2000, 3.0)]);
    }

    #[test]
    fn top_n_by_is_stable_and_bounded() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("A", 10.0, 110.0, 1990), // profit 100
            movie("B", 10.0, 310.0, 1991), // profit 300
            movie("C", 10.0, 110.0, 1992), // profit 100, ties with A
            movie("D", 10.0, 60.0, 1993),  // profit 50
        ]));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);

        let top = top_n_by(view, NumericField::Profit, 3);
        assert_eq!(top, vec![1, 0, 2]);
        assert!(top_n_by(view, NumericField::Profit, 10).len() <= 4);
    }

    #[test]
    fn top_k_respects_the_active_filters() {
        use crate::data::filter::{apply_filters, FilterConfig};

        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("A", 10.0, 1000.0, 1994), // biggest gross, outside the year range
            movie("B", 10.0, 500.0, 2005),
            movie("C", 10.0, 400.0, 2006),
        ]));
        let config = FilterConfig {
            year_range: Some((2000, 2010)),
            ..FilterConfig::default()
        };
        let rows = apply_filters(&table, &config);
        let view = TableView::new(&table, &rows);
        assert_eq!(top_n_by(view, NumericField::Gross, 2), vec![1, 2]);
    }

    #[test]
    fn top_n_groups_keeps_first_seen_order_on_ties() {
        let groups = vec![
            ("Drama".to_string(), 1.0),
            ("Action".to_string(), 2.0),
            ("Comedy".to_string(), 2.0),
        ];
        let top = top_n_groups(groups, 2);
        assert_eq!(
            top,
            vec![("Action".to_string(), 2.0), ("Comedy".to_string(), 2.0)]
        );
    }

    #[test]
    fn value_counts_orders_by_count_then_first_seen() {
        let table = MovieTable::from_movies(vec![
            Movie {
                country: Some("Spain".to_string()),
                ..Movie::default()
            },
            Movie {
                country: Some("France".to_string()),
                ..Movie::default()
            },
            Movie {
                country: Some("France".to_string()),
                ..Movie::default()
            },
            Movie {
                country: Some("Italy".to_string()),
                ..Movie::default()
            },
            Movie::default(),
        ]);
        let idx = all_rows(&table);
        let counts = value_counts(TableView::new(&table, &idx), CategoryField::Country, 2);
        assert_eq!(
            counts,
            vec![("France".to_string(), 2), ("Spain".to_string(), 1)]
        );
    }

    #[test]
    fn count_by_year_keeps_gaps_unfilled() {
        let table = MovieTable::from_movies(vec![
            movie("A", 1.0, 2.0, 1994),
            movie("B", 1.0, 2.0, 1994),
            movie("C", 1.0, 2.0, 2005),
        ]);
        let idx = all_rows(&table);
        let counts = count_by_year(TableView::new(&table, &idx));
        assert_eq!(counts, vec![(1994, 2), (2005, 1)]);
    }

    #[test]
    fn histogram_covers_range_and_counts_everything() {
        let table = MovieTable::from_movies(
            (0..10)
                .map(|i| Movie {
                    score: Some(i as f64),
                    ..Movie::default()
                })
                .collect(),
        );
        let idx = all_rows(&table);
        let bins = histogram(TableView::new(&table, &idx), NumericField::Score, 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);
        assert_eq!(bins[0].lo, 0.0);
        assert_eq!(bins[2].hi, 9.0);
    }

    #[test]
    fn histogram_of_missing_column_is_empty() {
        let table = MovieTable::from_movies(vec![Movie::default()]);
        let idx = all_rows(&table);
        assert!(histogram(TableView::new(&table, &idx), NumericField::Score, 30).is_empty());
    }

    #[test]
    fn kpi_scalars_degrade_to_none() {
        let table = MovieTable::from_movies(vec![Movie::default()]);
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);
        assert_eq!(mean_of(view, NumericField::Budget), None);
        assert_eq!(median_of(view, NumericField::Budget), None);
        assert_eq!(year_span(view), None);
        assert_eq!(distinct_count(view, CategoryField::Genre), 0);
        assert_eq!(row_count(view), 1);
    }

    #[test]
    fn kpi_scalars_on_real_values() {
        let table = ensure_derived(MovieTable::from_movies(vec![
            movie("Action", 100.0, 300.0, 1994),
            movie("Drama", 50.0, 100.0, 2005),
        ]));
        let idx = all_rows(&table);
        let view = TableView::new(&table, &idx);
        assert_eq!(mean_of(view, NumericField::Budget), Some(75.0));
        assert_eq!(median_of(view, NumericField::Gross), Some(200.0));
        assert_eq!(year_span(view), Some((1994, 2005)));
        assert_eq!(distinct_count(view, CategoryField::Genre), 2);
    }
}
