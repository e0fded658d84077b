//! Business logic services.

pub mod catalog;
pub mod session_sweeper;

pub use catalog::JobCatalog;
pub use session_sweeper::SessionSweeper;
