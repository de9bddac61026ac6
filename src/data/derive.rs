use super::model::MovieTable;

// ---------------------------------------------------------------------------
// Derived columns: profit, roi, decade
// ---------------------------------------------------------------------------

/// Fill in the derived fields on every row that is missing them.
///
/// * `profit = gross - budget`, needs both operands.
/// * `roi = (gross - budget) / budget`, only where `budget > 0`; a zero,
///   negative, or missing budget leaves `roi` unset.
/// * `decade = year` floored to the nearest multiple of 10.
///
/// Values already present (for instance parsed from a source file that
/// carries the columns) are never overwritten, so the pass is idempotent.
/// Takes the table by value and returns it; callers holding a shared
/// dataset clone first.
pub fn ensure_derived(mut table: MovieTable) -> MovieTable {
    for movie in &mut table.movies {
        if movie.profit.is_none() {
            movie.profit = match (movie.gross, movie.budget) {
                (Some(gross), Some(budget)) => Some(gross - budget),
                _ => None,
            };
        }
        if movie.roi.is_none() {
            movie.roi = match (movie.gross, movie.budget) {
                (Some(gross), Some(budget)) if budget > 0.0 => Some((gross - budget) / budget),
                _ => None,
            };
        }
        if movie.decade.is_none() {
            movie.decade = movie.year.map(decade_of);
        }
    }
    table
}

/// Decade bucket for a year: `1994 -> 1990`, `2000 -> 2000`.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Movie;

    fn row(budget: Option<f64>, gross: Option<f64>, year: Option<i32>) -> Movie {
        Movie {
            budget,
            gross,
            year,
            ..Movie::default()
        }
    }

    #[test]
    fn profit_and_roi_from_base_columns() {
        let table = MovieTable::from_movies(vec![row(Some(100.0), Some(300.0), Some(1994))]);
        let table = ensure_derived(table);
        let m = &table.movies[0];
        assert_eq!(m.profit, Some(200.0));
        assert_eq!(m.roi, Some(2.0));
        assert_eq!(m.decade, Some(1990));
    }

    #[test]
    fn roi_undefined_for_zero_or_negative_budget() {
        let table = MovieTable::from_movies(vec![
            row(Some(0.0), Some(50.0), None),
            row(Some(-5.0), Some(50.0), None),
            row(None, Some(50.0), None),
        ]);
        let table = ensure_derived(table);
        for m in &table.movies {
            assert_eq!(m.roi, None);
        }
        // profit still defined where both operands exist
        assert_eq!(table.movies[0].profit, Some(50.0));
        assert_eq!(table.movies[2].profit, None);
    }

    #[test]
    fn decade_buckets_floor_toward_negative_infinity() {
        assert_eq!(decade_of(1994), 1990);
        assert_eq!(decade_of(2000), 2000);
        assert_eq!(decade_of(2009), 2000);
        assert_eq!(decade_of(-5), -10);
    }

    #[test]
    fn derivation_is_idempotent_and_preserves_existing_values() {
        let mut seeded = row(Some(10.0), Some(30.0), Some(1987));
        seeded.profit = Some(999.0);
        let table = MovieTable::from_movies(vec![seeded]);

        let once = ensure_derived(table);
        // the pre-existing profit survives
        assert_eq!(once.movies[0].profit, Some(999.0));
        assert_eq!(once.movies[0].roi, Some(2.0));

        let twice = ensure_derived(once.clone());
        assert_eq!(once.movies, twice.movies);
    }
}
