//! Session state: the one cached batch, the user's view selection and the
//! fetch status.  Everything the UI shows is derived from [`App`] through
//! [`App::view`].

use crate::fetch::FetchResult;
use crate::source::{Batch, Story};
use crate::view::{compute_view, SortKey, View, ViewState};

/// What the status bar says about the last fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Whether keystrokes edit the search term or drive navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

pub struct App {
    /// Latest successful batch.  Kept while a retry is loading.
    pub batch: Option<Batch>,
    pub status: FetchStatus,
    pub view_state: ViewState,
    pub page_size: usize,
    pub mode: InputMode,
    /// Highlighted card, as an index into the current page.
    pub selected: usize,
    /// Label of the story source, shown in the title.
    pub source_name: String,
    /// Whether the user has requested to quit.
    pub quit: bool,
    retry_requested: bool,
}

impl App {
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn new(view_state: ViewState, page_size: usize, source_name: impl Into<String>) -> Self {
        assert!(page_size > 0, "page_size must be positive");
        Self {
            batch: None,
            status: FetchStatus::Loading,
            view_state,
            page_size,
            mode: InputMode::Browse,
            selected: 0,
            source_name: source_name.into(),
            quit: false,
            retry_requested: false,
        }
    }

    /// Fold a fetch outcome into the session.  A success replaces the cached
    /// batch wholesale; a failure leaves the previous batch on screen.
    pub fn apply_fetch(&mut self, result: FetchResult) {
        match result {
            FetchResult::Loading => self.status = FetchStatus::Loading,
            FetchResult::Success(batch) => {
                self.batch = Some(batch);
                self.status = FetchStatus::Ready;
                self.clamp_selection();
            }
            FetchResult::Failure(reason) => self.status = FetchStatus::Failed(reason),
        }
    }

    pub fn stories(&self) -> &[Story] {
        match &self.batch {
            Some(batch) => &batch.stories,
            None => &[],
        }
    }

    pub fn view(&self) -> View<'_> {
        compute_view(self.stories(), &self.view_state, self.page_size)
    }

    pub fn selected_story(&self) -> Option<&Story> {
        self.view().items.get(self.selected).copied()
    }

    // -- retry ---------------------------------------------------------------

    pub fn request_retry(&mut self) {
        self.retry_requested = true;
    }

    /// Returns `true` once per [`request_retry`](Self::request_retry).
    pub fn take_retry(&mut self) -> bool {
        std::mem::take(&mut self.retry_requested)
    }

    // -- search / sort ---------------------------------------------------------

    pub fn start_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn end_search(&mut self) {
        self.mode = InputMode::Browse;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.view_state.push_search_char(c);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.view_state.pop_search_char();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.view_state.set_search_term("");
        self.selected = 0;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.view_state.set_sort_key(key);
        self.selected = 0;
    }

    pub fn cycle_sort_key(&mut self) {
        self.set_sort_key(self.view_state.sort_key().next());
    }

    // -- paging ----------------------------------------------------------------

    /// Pull the stored page back into range before moving relative to it.
    fn sync_page(&mut self) -> usize {
        let view = self.view();
        let (page, total) = (view.current_page, view.total_pages);
        self.view_state.set_page(page);
        total
    }

    pub fn next_page(&mut self) {
        let total = self.sync_page();
        self.view_state.next_page(total);
        self.clamp_selection();
    }

    pub fn previous_page(&mut self) {
        self.sync_page();
        self.view_state.previous_page();
        self.clamp_selection();
    }

    pub fn first_page(&mut self) {
        self.view_state.set_page(1);
        self.clamp_selection();
    }

    pub fn last_page(&mut self) {
        let total = self.sync_page();
        self.view_state.set_page(total);
        self.clamp_selection();
    }

    // -- card selection --------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.view().items.len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.view().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::make_story;

    fn batch_of(n: usize) -> Batch {
        Batch::new(
            (0..n)
                .map(|i| make_story(&i.to_string(), &format!("Story {i}"), (100 - i) as u64, None))
                .collect(),
        )
    }

    fn ready_app(n: usize) -> App {
        let mut app = App::new(ViewState::default(), 9, "test");
        app.apply_fetch(FetchResult::Success(batch_of(n)));
        app
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_is_loading_and_empty() {
        let app = App::new(ViewState::default(), 9, "test");
        assert_eq!(app.status, FetchStatus::Loading);
        assert!(app.batch.is_none());
        assert!(app.view().items.is_empty());
        assert_eq!(app.view().total_pages, 1);
        assert!(!app.quit);
    }

    #[test]
    #[should_panic(expected = "page_size must be positive")]
    fn zero_page_size_is_rejected() {
        App::new(ViewState::default(), 0, "test");
    }

    // -- fetch results -------------------------------------------------------

    #[test]
    fn success_replaces_batch() {
        let mut app = ready_app(3);
        assert_eq!(app.status, FetchStatus::Ready);
        assert_eq!(app.stories().len(), 3);

        app.apply_fetch(FetchResult::Success(batch_of(20)));
        assert_eq!(app.stories().len(), 20);
    }

    #[test]
    fn failure_keeps_previous_batch() {
        let mut app = ready_app(5);
        app.apply_fetch(FetchResult::Loading);
        assert_eq!(app.stories().len(), 5, "batch stays visible while loading");

        app.apply_fetch(FetchResult::Failure("boom".into()));
        assert_eq!(app.status, FetchStatus::Failed("boom".into()));
        assert_eq!(app.stories().len(), 5);
    }

    #[test]
    fn retry_flag_is_taken_once() {
        let mut app = ready_app(1);
        assert!(!app.take_retry());
        app.request_retry();
        assert!(app.take_retry());
        assert!(!app.take_retry());
    }

    // -- paging --------------------------------------------------------------

    #[test]
    fn paging_moves_within_bounds() {
        let mut app = ready_app(20);
        assert_eq!(app.view().total_pages, 3);

        app.next_page();
        assert_eq!(app.view().current_page, 2);
        app.next_page();
        app.next_page();
        assert_eq!(app.view().current_page, 3);
        assert_eq!(app.view().items.len(), 2);

        app.previous_page();
        assert_eq!(app.view().current_page, 2);
        app.first_page();
        assert_eq!(app.view().current_page, 1);
        app.last_page();
        assert_eq!(app.view().current_page, 3);
    }

    #[test]
    fn previous_page_from_stale_page_steps_from_clamped_value() {
        let mut app = ready_app(20);
        app.view_state.set_page(10);
        app.previous_page();
        assert_eq!(app.view().current_page, 2);
    }

    #[test]
    fn shrinking_batch_keeps_selection_on_page() {
        let mut app = ready_app(9);
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 3);

        app.apply_fetch(FetchResult::Success(batch_of(2)));
        assert_eq!(app.selected, 1);
    }

    // -- search / sort -------------------------------------------------------

    #[test]
    fn search_resets_page_and_selection() {
        let mut app = ready_app(20);
        app.next_page();
        app.select_next();

        app.start_search();
        assert_eq!(app.mode, InputMode::Search);
        app.push_search_char('1');
        assert_eq!(app.view().current_page, 1);
        assert_eq!(app.selected, 0);
        // "Story 1", "Story 10".."Story 19"
        assert_eq!(app.view().matched, 11);

        app.pop_search_char();
        assert_eq!(app.view().matched, 20);

        app.push_search_char('x');
        app.clear_search();
        assert_eq!(app.view_state.search_term(), "");
        app.end_search();
        assert_eq!(app.mode, InputMode::Browse);
    }

    #[test]
    fn sort_change_resets_page() {
        let mut app = ready_app(20);
        app.next_page();
        app.cycle_sort_key();
        assert_eq!(app.view_state.sort_key(), SortKey::Date);
        assert_eq!(app.view().current_page, 1);

        app.set_sort_key(SortKey::Title);
        assert_eq!(app.view().items[0].title, "Story 0");
    }

    // -- selection -----------------------------------------------------------

    #[test]
    fn selection_clamps_to_page() {
        let mut app = ready_app(2);
        app.select_previous();
        assert_eq!(app.selected, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_story().map(|s| s.id.as_str()), Some("1"));
    }

    #[test]
    fn selection_on_empty_is_noop() {
        let mut app = App::new(ViewState::default(), 9, "test");
        app.select_next();
        assert_eq!(app.selected, 0);
        assert!(app.selected_story().is_none());
    }
}
