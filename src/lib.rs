//! Keep a flat directory under a size budget by deleting its oldest files.
//!
//! [`size`] turns `"512MiB"` into bytes and back, [`scanner`] lists the
//! directory and fixes the deletion order, and [`pruner`] runs the
//! size-bounded deletion loop.

pub mod error;
pub mod pruner;
pub mod scanner;
pub mod size;

pub use error::{PruneError, SizeParseError};
pub use pruner::{DeletionReport, PruneEvents, PruneOptions, PruneSummary, TracingEvents, prune};
pub use size::{SizeFormat, format_size, format_size_with, parse_size};
