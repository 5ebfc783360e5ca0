//! Game catalog engine.
//!
//! Turns raw package introspection records into [`GameEntry`] values and
//! keeps them in a deduplicated [`GameLibrary`] that can be scanned
//! synchronously or in the background.

pub mod entry;
pub mod error;
pub mod library;
pub mod scanner;
pub mod settings;
pub mod worker_pool;

pub use entry::{GameEntry, UNKNOWN_TITLE};
pub use error::{DerivationError, SettingsError};
pub use library::{AsyncScan, GameLibrary, LibraryOptions, ProgressCallback};
pub use scanner::{ScanFailure, ScanSummary, Scanner};
pub use settings::LibrarySettings;

// Re-export core types so callers only need this crate.
pub use title_shelf_core::{
    DescriptiveInfo, ExecutionInfo, GameFormat, GameInfo, GameRatings, NxeInfo,
    RatingRegulator, RatingValue, Ratings, Region, RegionFlags, ScanError, SecurityInfo,
    VersionInfo, XexInfo,
};
