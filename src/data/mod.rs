/// Data layer: input splitting, metadata parsing, CSV decoding.
///
/// Architecture:
/// ```text
///  pattern.txt
///        │
///        ▼
///   ┌──────────┐
///   │ splitter  │  one block per '#' marker line
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metadata  │  marker → title / color / bold
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  CSV body → Vec<Sample> per Trace
///   └──────────┘
/// ```

pub mod loader;
pub mod metadata;
pub mod model;
pub mod splitter;
