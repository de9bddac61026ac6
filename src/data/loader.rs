use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::derive::ensure_derived;
use super::model::{Movie, MovieTable, Table, Value};

/// Where the cleaned movie table lives unless the caller says otherwise.
pub const DEFAULT_DATA_PATH: &str = "data/movies_cleaned.csv";
/// Pre-baked null-percentage report produced by the cleaning pipeline.
pub const DEFAULT_NULL_REPORT_PATH: &str = "data/null_report.csv";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A dataset failed to load.  Fatal to the requesting render: the app
/// shell reports it and skips the page, the process keeps running.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its contents could not be parsed.
    #[error("malformed dataset file {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

fn malformed(path: &Path, source: anyhow::Error) -> LoadError {
    LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the primary movie table.  Dispatch by extension:
///
/// * `.csv`     – delimited text, one movie per row (primary format)
/// * `.json`    – records orientation, `[{"name": ..., "year": ...}, ...]`
/// * `.parquet` – scalar columns, as written by Pandas or Polars
pub fn load_primary(path: &Path) -> Result<MovieTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let movies = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(malformed(
                path,
                anyhow::anyhow!("unsupported file extension: .{other}"),
            ))
        }
    };

    let table = MovieTable::from_movies(movies);
    log::info!("loaded {} movies from {}", table.len(), path.display());
    Ok(table)
}

/// Load the null-percentage report verbatim into a generic table.  Not
/// cached; it is read once per render of the page that shows it.
pub fn load_null_report(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_to_load_error(path, e))?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_to_load_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_to_load_error(path, e))?;
        rows.push(record.iter().map(guess_value_type).collect());
    }
    Ok(Table { columns, rows })
}

fn csv_to_load_error(path: &Path, err: csv::Error) -> LoadError {
    if err.is_io_error() {
        LoadError::Io {
            path: path.to_path_buf(),
            source: err.into(),
        }
    } else {
        malformed(path, err.into())
    }
}

// ---------------------------------------------------------------------------
// Dataset cache
// ---------------------------------------------------------------------------

/// Explicitly passed, lazily-initialized handle to the shared dataset.
///
/// The first `get_or_load` reads storage, runs the derivation pass, and
/// parks the result behind an `Arc`; every later call returns the cached
/// table without touching disk.  The mutex doubles as the one-time-init
/// guard: parallel first loads serialize, steady-state reads just clone
/// the `Arc`.
#[derive(Default)]
pub struct DatasetCache {
    slot: Mutex<Option<Arc<MovieTable>>>,
}

impl DatasetCache {
    /// Cached table, loading from `path` (default path when `None`) on
    /// first use.
    pub fn get_or_load(&self, path: Option<&Path>) -> Result<Arc<MovieTable>, LoadError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_DATA_PATH));
        let table = Arc::new(ensure_derived(load_primary(path)?));
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Load `path` unconditionally and make it the cached dataset
    /// (File → Open).
    pub fn replace(&self, path: &Path) -> Result<Arc<MovieTable>, LoadError> {
        let table = Arc::new(ensure_derived(load_primary(path)?));
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Column assignment (shared by all three formats)
// ---------------------------------------------------------------------------

/// Put a typed cell into its slot on the record.  Columns the model does
/// not know are skipped, so datasets with extra columns still load.
fn assign(movie: &mut Movie, column: &str, value: Value) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    match column {
        "name" => movie.name = Some(as_text(value)),
        "year" => movie.year = Some(as_year(value)?),
        "genre" => movie.genre = Some(as_text(value)),
        "country" => movie.country = Some(as_text(value)),
        "company" => movie.company = Some(as_text(value)),
        "rating" => movie.rating = Some(as_text(value)),
        "director" => movie.director = Some(as_text(value)),
        "writer" => movie.writer = Some(as_text(value)),
        "star" => movie.star = Some(as_text(value)),
        "released" => movie.released = Some(as_text(value)),
        "budget" => movie.budget = Some(as_number(value, "budget")?),
        "gross" => movie.gross = Some(as_number(value, "gross")?),
        "score" => movie.score = Some(as_number(value, "score")?),
        "votes" => movie.votes = Some(as_number(value, "votes")?),
        "runtime" => movie.runtime = Some(as_number(value, "runtime")?),
        "profit" => movie.profit = Some(as_number(value, "profit")?),
        "roi" => movie.roi = Some(as_number(value, "roi")?),
        _ => {}
    }
    Ok(())
}

fn as_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn as_number(value: Value, column: &str) -> Result<f64> {
    value
        .as_f64()
        .with_context(|| format!("column '{column}': expected a number"))
}

/// `year` must be coercible to integer; a float like `1994.0` truncates.
fn as_year(value: Value) -> Result<i32> {
    match value {
        Value::Integer(i) => i32::try_from(i).context("year out of range"),
        Value::Float(f) if f.is_finite() => Ok(f as i32),
        Value::String(s) => parse_year(&s),
        other => bail!("year: cannot coerce {other} to an integer"),
    }
}

fn parse_year(raw: &str) -> Result<i32> {
    if let Ok(y) = raw.parse::<i32>() {
        return Ok(y);
    }
    let f: f64 = raw
        .parse()
        .with_context(|| format!("year: '{raw}' is not a number"))?;
    if !f.is_finite() {
        bail!("year: '{raw}' is not a finite number");
    }
    Ok(f as i32)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; empty cells are nulls.  Numeric columns
/// must parse as numbers, `year` as an integer.
fn load_csv(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_to_load_error(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_to_load_error(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut movies = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_to_load_error(path, e))?;
        let mut movie = Movie::default();
        for (col_idx, raw) in record.iter().enumerate() {
            let Some(column) = headers.get(col_idx) else {
                continue;
            };
            parse_csv_cell(column, raw)
                .and_then(|value| assign(&mut movie, column, value))
                .with_context(|| format!("CSV row {row_no}"))
                .map_err(|e| malformed(path, e))?;
        }
        movies.push(movie);
    }
    Ok(movies)
}

fn parse_csv_cell(column: &str, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    Ok(match column {
        "year" => Value::Integer(parse_year(raw)? as i64),
        "budget" | "gross" | "score" | "votes" | "runtime" | "profit" | "roi" => {
            let v: f64 = raw
                .parse()
                .with_context(|| format!("column '{column}': '{raw}' is not a number"))?;
            Value::Float(v)
        }
        _ => Value::String(raw.to_string()),
    })
}

/// Best-effort typing for cells of the null report.
fn guess_value_type(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    if raw == "true" || raw == "false" {
        return Value::Bool(raw == "true");
    }
    Value::String(raw.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records orientation, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "name": "Heat", "year": 1995, "genre": "Action", "budget": 6.0e7 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| malformed(path, anyhow::Error::from(e).context("parsing JSON")))?;

    let records = match root.as_array() {
        Some(records) => records,
        None => return Err(malformed(path, anyhow::anyhow!("expected top-level JSON array"))),
    };

    let mut movies = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))
            .map_err(|e| malformed(path, e))?;

        let mut movie = Movie::default();
        for (key, val) in obj {
            assign(&mut movie, key, json_to_value(val))
                .with_context(|| format!("JSON row {i}"))
                .map_err(|e| malformed(path, e))?;
        }
        movies.push(movie);
    }
    Ok(movies)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Scalar columns only (strings, ints, floats, bools).  Works with files
/// written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| malformed(path, anyhow::Error::from(e).context("reading parquet metadata")))?;
    let reader = builder
        .build()
        .map_err(|e| malformed(path, anyhow::Error::from(e).context("building parquet reader")))?;

    let mut movies = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| malformed(path, anyhow::Error::from(e).context("reading record batch")))?;
        let schema = batch.schema();
        let columns: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let mut movie = Movie::default();
            for (col_idx, column) in &columns {
                let value = extract_value(batch.column(*col_idx), row)
                    .with_context(|| format!("parquet row {row}, column '{column}'"))
                    .map_err(|e| malformed(path, e))?;
                assign(&mut movie, column, value)
                    .with_context(|| format!("parquet row {row}"))
                    .map_err(|e| malformed(path, e))?;
            }
            movies.push(movie);
        }
    }
    Ok(movies)
}

/// Extract a single scalar from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Value::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Value::String(arr.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Value::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Value::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Value::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Value::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            Value::Bool(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}
