//! The view pipeline: filter → sort → paginate.
//!
//! [`compute_view`] is a pure function of a batch, a [`ViewState`] and a
//! page size.  It never mutates a story; the result borrows from the batch.
//! The main loop simply calls it again whenever any input changes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::source::Story;

/// Field the visible stories are ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Highest score first.
    #[default]
    Points,
    /// Newest first; stories without a date go last.
    Date,
    /// Alphabetical by title.
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Points, SortKey::Date, SortKey::Title];

    /// The next key in [`SortKey::ALL`], wrapping around.
    pub fn next(self) -> Self {
        match self {
            SortKey::Points => SortKey::Date,
            SortKey::Date => SortKey::Title,
            SortKey::Title => SortKey::Points,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Points => "points",
            SortKey::Date => "date",
            SortKey::Title => "title",
        }
    }

    fn compare(self, a: &Story, b: &Story) -> Ordering {
        match self {
            SortKey::Points => b.points.cmp(&a.points),
            // `None < Some(_)`, so reversing puts undated stories last.
            SortKey::Date => b.created_at.cmp(&a.created_at),
            SortKey::Title => compare_titles(&a.title, &b.title),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown sort key `{0}` (expected points, date or title)")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

/// Collation key: canonical decomposition with combining marks removed,
/// then lowercased.  `"Éclair"` and `"eclair"` share a key.
fn base_letters(title: &str) -> impl Iterator<Item = char> + '_ {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Approximates a locale collation for Latin-script headlines:
/// base letters first, then accents and case, then the raw string.
/// `"apple" < "Éclair" < "zebra"`.
fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| {
            let accented_a = a.chars().flat_map(char::to_lowercase);
            accented_a.cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| a.cmp(b))
}

/// User-controlled search, sort and page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_term: String,
    sort_key: SortKey,
    current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_key: SortKey::default(),
            current_page: 1,
        }
    }
}

impl ViewState {
    pub fn new(search_term: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            search_term: search_term.into(),
            sort_key,
            current_page: 1,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    // -- search / sort: any change returns to page 1 ---------------------------

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.current_page = 1;
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_term.push(c);
        self.current_page = 1;
    }

    pub fn pop_search_char(&mut self) {
        if self.search_term.pop().is_some() {
            self.current_page = 1;
        }
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        if key != self.sort_key {
            self.sort_key = key;
            self.current_page = 1;
        }
    }

    pub fn cycle_sort_key(&mut self) {
        self.set_sort_key(self.sort_key.next());
    }

    // -- paging ------------------------------------------------------------------

    /// Jump to `page`; values below 1 become 1.  The upper bound is applied
    /// by [`compute_view`], which knows the page count.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.current_page = (self.current_page + 1).min(total_pages.max(1));
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }
}

/// Render-ready result of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    /// Stories on the current page, in display order.
    pub items: Vec<&'a Story>,
    /// Always at least 1.
    pub total_pages: usize,
    /// Clamped into `1..=total_pages`.
    pub current_page: usize,
    /// Number of stories that passed the search filter, across all pages.
    pub matched: usize,
}

/// Filter, sort and slice `stories` for display.
///
/// # Panics
///
/// Panics if `page_size` is zero.
pub fn compute_view<'a>(stories: &'a [Story], state: &ViewState, page_size: usize) -> View<'a> {
    assert!(page_size > 0, "page_size must be positive");

    let needle = state.search_term.to_lowercase();
    let mut matched: Vec<&Story> = stories
        .iter()
        .filter(|story| needle.is_empty() || story.title.to_lowercase().contains(&needle))
        .collect();

    // `sort_by` is stable: equal keys keep batch order.
    let key = state.sort_key;
    matched.sort_by(|a, b| key.compare(a, b));

    let total_pages = matched.len().div_ceil(page_size).max(1);
    let current_page = state.current_page.clamp(1, total_pages);
    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(matched.len());

    View {
        items: matched[start..end].to_vec(),
        total_pages,
        current_page,
        matched: matched.len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
