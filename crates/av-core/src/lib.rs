//! av-core: shared foundation for aeroval.
//!
//! Contains:
//! - units (uom angle type + degree/radian helpers)
//! - numeric (Real + sample-grid helpers)
//! - timing (wall-clock timer for solver runs)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

pub use error::{AvError, AvResult};
pub use numeric::*;
pub use units::*;
