use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell in a generic table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, used for the null-report table and for
/// reading columnar files whose schema is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether this cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – a generic column-named table
// ---------------------------------------------------------------------------

/// A small row-oriented table with named columns.  The null report is read
/// into one of these verbatim and handed to the renderer as-is.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Movie – one row of the primary dataset
// ---------------------------------------------------------------------------

/// A single movie (one row of the source table).  Every column of the
/// source file that may be missing is an `Option`; the three derived
/// fields start out `None` and are filled in by the derivation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movie {
    pub name: Option<String>,
    pub year: Option<i32>,

    pub genre: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub rating: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub star: Option<String>,
    pub released: Option<String>,

    pub budget: Option<f64>,
    pub gross: Option<f64>,
    pub score: Option<f64>,
    pub votes: Option<f64>,
    pub runtime: Option<f64>,

    /// `gross - budget`; derived when absent from the source.
    pub profit: Option<f64>,
    /// `(gross - budget) / budget`, only defined where `budget > 0`.
    pub roi: Option<f64>,
    /// `year` rounded down to the nearest multiple of 10.
    pub decade: Option<i32>,
}

// ---------------------------------------------------------------------------
// Field selectors
// ---------------------------------------------------------------------------

/// Numeric columns that charts and aggregations can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Budget,
    Gross,
    Score,
    Votes,
    Runtime,
    Profit,
    Roi,
}

impl NumericField {
    /// Fields offered by the numeric-distribution picker.
    pub const ALL: [NumericField; 7] = [
        NumericField::Score,
        NumericField::Votes,
        NumericField::Budget,
        NumericField::Gross,
        NumericField::Runtime,
        NumericField::Profit,
        NumericField::Roi,
    ];

    pub fn get(&self, movie: &Movie) -> Option<f64> {
        match self {
            NumericField::Budget => movie.budget,
            NumericField::Gross => movie.gross,
            NumericField::Score => movie.score,
            NumericField::Votes => movie.votes,
            NumericField::Runtime => movie.runtime,
            NumericField::Profit => movie.profit,
            NumericField::Roi => movie.roi,
        }
    }

    /// Column name as it appears in the source file.
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericField::Budget => "budget",
            NumericField::Gross => "gross",
            NumericField::Score => "score",
            NumericField::Votes => "votes",
            NumericField::Runtime => "runtime",
            NumericField::Profit => "profit",
            NumericField::Roi => "roi",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Categorical columns usable for grouping, counting, and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryField {
    Genre,
    Country,
    Company,
    Rating,
    Director,
    Writer,
    Star,
    Released,
}

impl CategoryField {
    /// Fields offered by the categorical-distribution picker.
    pub const PICKABLE: [CategoryField; 3] = [
        CategoryField::Genre,
        CategoryField::Country,
        CategoryField::Company,
    ];

    pub fn get<'m>(&self, movie: &'m Movie) -> Option<&'m str> {
        let slot = match self {
            CategoryField::Genre => &movie.genre,
            CategoryField::Country => &movie.country,
            CategoryField::Company => &movie.company,
            CategoryField::Rating => &movie.rating,
            CategoryField::Director => &movie.director,
            CategoryField::Writer => &movie.writer,
            CategoryField::Star => &movie.star,
            CategoryField::Released => &movie.released,
        };
        slot.as_deref()
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            CategoryField::Genre => "genre",
            CategoryField::Country => "country",
            CategoryField::Company => "company",
            CategoryField::Rating => "rating",
            CategoryField::Director => "director",
            CategoryField::Writer => "writer",
            CategoryField::Star => "star",
            CategoryField::Released => "released",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// MovieTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed unique category values.
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    /// All movies (rows), in source order.
    pub movies: Vec<Movie>,
    /// Sorted unique values per pickable categorical column, for the
    /// filter widgets.
    pub categories: BTreeMap<CategoryField, Vec<String>>,
}

impl MovieTable {
    /// Build category indices from the loaded rows.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut sets: BTreeMap<CategoryField, BTreeSet<String>> = BTreeMap::new();
        for movie in &movies {
            for field in CategoryField::PICKABLE {
                if let Some(value) = field.get(movie) {
                    sets.entry(field).or_default().insert(value.to_string());
                }
            }
        }
        let categories = sets
            .into_iter()
            .map(|(field, values)| (field, values.into_iter().collect()))
            .collect();
        MovieTable { movies, categories }
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Inclusive `[min, max]` over the `year` column, `None` when the
    /// column is entirely missing.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.movies.iter().filter_map(|m| m.year);
        let first = years.next()?;
        let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some((min, max))
    }
}

// ---------------------------------------------------------------------------
// TableView – a filtered, borrowed view over a MovieTable
// ---------------------------------------------------------------------------

/// A borrowed view over a subset of rows.  Produced by the filter engine,
/// consumed by every aggregation.  Never owns or mutates the table.
#[derive(Clone, Copy)]
pub struct TableView<'a> {
    table: &'a MovieTable,
    rows: &'a [usize],
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a MovieTable, rows: &'a [usize]) -> Self {
        TableView { table, rows }
    }

    /// Iterate the movies in the view, in source order.
    pub fn movies(&self) -> impl Iterator<Item = &'a Movie> + 'a {
        let table = self.table;
        self.rows.iter().map(move |&i| &table.movies[i])
    }

    /// Iterate `(absolute_row_index, movie)` pairs.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &'a Movie)> + 'a {
        let table = self.table;
        self.rows.iter().map(move |&i| (i, &table.movies[i]))
    }

    pub fn movie(&self, row: usize) -> &'a Movie {
        &self.table.movies[row]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(genre: &str, year: i32) -> Movie {
        Movie {
            name: Some(format!("{genre} {year}")),
            year: Some(year),
            genre: Some(genre.to_string()),
            ..Movie::default()
        }
    }

    #[test]
    fn categories_are_unique_and_sorted() {
        let table = MovieTable::from_movies(vec![
            movie("Drama", 1994),
            movie("Action", 1995),
            movie("Drama", 1996),
        ]);
        assert_eq!(
            table.categories.get(&CategoryField::Genre).unwrap(),
            &vec!["Action".to_string(), "Drama".to_string()]
        );
    }

    #[test]
    fn year_bounds_span_the_column() {
        let table = MovieTable::from_movies(vec![
            movie("Drama", 1994),
            movie("Action", 2005),
            Movie::default(),
        ]);
        assert_eq!(table.year_bounds(), Some((1994, 2005)));
    }

    #[test]
    fn year_bounds_none_when_column_missing() {
        let table = MovieTable::from_movies(vec![Movie::default()]);
        assert_eq!(table.year_bounds(), None);
    }

    #[test]
    fn view_iterates_selected_rows_in_order() {
        let table = MovieTable::from_movies(vec![
            movie("A", 1990),
            movie("B", 1991),
            movie("C", 1992),
        ]);
        let rows = vec![2, 0];
        let view = TableView::new(&table, &rows);
        let names: Vec<_> = view.movies().map(|m| m.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["C 1992", "A 1990"]);
    }
}
