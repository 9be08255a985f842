//! One notifier run: fetch the feed, gate on its revision, render, deliver,
//! and commit the revision marker.

pub mod error;
pub mod gate;
pub mod pipeline;
pub mod source;
pub mod store;

pub use error::{FeedError, RunError, StoreError};
pub use gate::{evaluate, Gate};
pub use pipeline::{Pipeline, RunOutcome};
pub use source::{FeedSource, FileFeedSource, HttpFeedSource};
pub use store::{FileRevisionStore, MemoryRevisionStore, RevisionStore};
