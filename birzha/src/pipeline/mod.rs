//! The two load pipelines and the background-run plumbing.
//!
//! Each user-initiated load runs the whole fetch → normalize → (resample) →
//! combine sequence on exactly one background task; the foreground observes
//! it only through the event channel.

mod candles;
mod handle;
mod rates;

pub use candles::CandlesBuilder;
pub use handle::{LoadEvent, LoadHandle};
pub use rates::RatesBuilder;
