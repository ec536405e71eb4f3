//! Detection History and Temporal Smoothing
//!
//! Keeps the last few per-frame subject counts and uses them to hide
//! single-frame detector dropouts.

mod history;
mod smoother;

pub use history::{History, DEFAULT_CAPACITY};
pub use smoother::TemporalSmoother;
