/// Data layer: core types, loading, derivation, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MovieTable, cache behind an Arc
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  fill profit / roi / decade where absent
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year interval + category sets → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  grouped stats, top-K, counts, KPI scalars
///   └───────────┘
/// ```

pub mod aggregate;
pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
