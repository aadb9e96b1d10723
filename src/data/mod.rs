//! Loading and reducing the measurement log for presentation.
//!
//! ## Submodules
//!
//! - [`dataset`]: Strict loader producing the reduced [`Dataset`] (date, speed, comment)
//! - [`histogram`]: Equal-width binning of download speeds
//! - [`summary`]: Headline statistics for the terminal header bar
//!
//! ## Data Flow
//!
//! ```text
//! measurement log (CSV)
//!        │
//!        ▼
//! dataset::load()
//!        │
//!        ├──▶ Histogram::from_values() (static chart, upper panel)
//!        ├──▶ Dataset::rows()          (time series, HTML chart)
//!        └──▶ Dataset::summary()       (header bar)
//! ```

pub mod dataset;
pub mod histogram;
pub mod summary;

pub use dataset::{
    load, parse_timestamp, Dataset, DatasetError, DatasetRow, COMMENTS_LABEL, DATE_LABEL,
    SPEED_LABEL,
};
pub use histogram::{Bin, Histogram};
pub use summary::Summary;
