//! The story type shared by every story source and the view pipeline.
//!
//! `Story` represents a single ranked item from the front page.  Sources
//! convert their native records into `Story` values so the pipeline and the
//! UI never need to know where a story came from.
//!
//! ## For contributors
//!
//! Stories are read-only once fetched.  The view pipeline borrows them and
//! builds new orderings out of references; nothing downstream of a source
//! should construct or mutate a `Story`.

use chrono::{DateTime, Utc};

/// A single front-page story.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Story {
    /// Stable upstream identifier, used as the rendering key.
    pub id: String,

    /// Headline.  Usually non-empty, but the upstream does not promise it.
    pub title: String,

    /// Link to the story.  `None` for text posts such as "Ask HN".
    pub url: Option<String>,

    /// Upvote score.
    pub points: u64,

    /// Submitter's user name.  Empty when the upstream omitted it.
    pub author: String,

    /// Submission time.
    ///
    /// `None` means the source gave no usable timestamp; such stories are
    /// shown as "unknown date" and sort after all dated stories.
    pub created_at: Option<DateTime<Utc>>,

    /// Number of comments in the discussion thread.
    pub num_comments: u64,
}

/// One atomically fetched set of stories.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Batch {
    /// Stories in upstream rank order.
    pub stories: Vec<Story>,

    /// How many upstream records could not be turned into a [`Story`].
    pub rejected: usize,
}

impl Batch {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            stories,
            rejected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

impl Story {
    /// The author for display; `"unknown"` when missing.
    pub fn author_label(&self) -> &str {
        if self.author.is_empty() {
            "unknown"
        } else {
            &self.author
        }
    }

    /// Human-readable age relative to `now`, e.g. `"3h ago"`.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let Some(created) = self.created_at else {
            return "unknown date".into();
        };

        let secs = (now - created).num_seconds();
        match secs {
            s if s < 0 => created.format("%Y-%m-%d %H:%M").to_string(),
            s if s < 60 => "just now".into(),
            s if s < 3_600 => format!("{}m ago", s / 60),
            s if s < 86_400 => format!("{}h ago", s / 3_600),
            s => format!("{}d ago", s / 86_400),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
