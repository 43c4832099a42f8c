/// Data layer: core types, loading, and the filter/aggregate pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────────┐
///   │ loader/cache  │  parse file once → Arc<GapminderDataset>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   filter      │  continent set → history, then year → year rows
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  aggregate    │  group by continent, melt into long form
///   └──────────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
