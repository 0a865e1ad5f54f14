/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ListingDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ ListingDataset │  Vec<Listing>, categorical domains
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply criteria → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  summaries, group-by aggregates, histograms
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
