//! Story source abstraction layer.
//!
//! This module defines the [`StorySource`] trait and the common [`Story`] and
//! [`Batch`] types.  Concrete sources live in sub-modules (currently only
//! [`algolia`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `firebase.rs`).
//! 2. Define a struct and implement [`StorySource`] for it.
//! 3. Add `mod firebase;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of (or next to) `AlgoliaSource`.
//!
//! The fetcher, the view pipeline and the UI are all source-agnostic.

pub mod algolia;
mod error;
mod story;

pub use algolia::{AlgoliaSettings, AlgoliaSource};
pub use error::FetchError;
pub use story::{Batch, Story};

#[cfg(test)]
pub(crate) use story::tests::make_story;

use async_trait::async_trait;

/// Trait that every story source must implement.
///
/// [`crate::fetch::Fetcher`] calls [`fetch()`](StorySource::fetch) on a tokio
/// worker, so implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Human-readable label shown in the title bar.
    fn name(&self) -> &str;

    /// Fetch one complete batch of stories.
    ///
    /// Exactly one upstream request per call.  Errors are shown to the user
    /// as a retry-able failure.
    async fn fetch(&self) -> Result<Batch, FetchError>;
}
