//! # speedwatch-types
//!
//! Core types shared by the speedwatch crates: the [`MeasurementRecord`]
//! produced by a probe and the column schema of the persisted log.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to serialize records
//! - **Stable log schema**: Column names are defined once and shared by writer and reader
//!
//! ## Features
//!
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use speedwatch_types::{MeasurementRecord, SENTINEL};
//!
//! let record = MeasurementRecord::builder("2024-01-01T00:00:00Z")
//!     .download_bps(471_859_200.0)
//!     .upload_bps(58_720_256.0)
//!     .ping_ms(12.3)
//!     .isp("Example ISP")
//!     .build();
//!
//! assert_eq!(record.download_mibps(), 450.0);
//!
//! let offline = MeasurementRecord::unavailable("2024-01-01T00:05:00Z", "Example ISP");
//! assert_eq!(offline.ping_ms, SENTINEL);
//! assert!(offline.is_unavailable());
//! ```

mod columns;
mod record;

pub use columns::*;
pub use record::*;
