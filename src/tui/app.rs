use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ratatui::widgets::ListState;

use crate::config::Config;
use crate::contributions::{
    ContributionGroup, EnrichmentTracker, GroupEntry, Grouping, RepoKey,
};
use crate::fetch::PageData;
use crate::theme::{Subscription, ThemeStore};
use crate::tui::theme::ThemeColors;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Contributions,
    Blog,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Contributions, View::Blog];

    pub fn title(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Contributions => "Contributions",
            View::Blog => "Blog",
        }
    }

    fn next(self) -> Self {
        match self {
            View::Overview => View::Contributions,
            View::Contributions => View::Blog,
            View::Blog => View::Overview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

/// One line of the contributions list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRow {
    /// Repository header, by group index
    Header(usize),
    /// Entry of an expanded group: (group index, entry index)
    Entry(usize, usize),
}

pub struct App {
    pub config: Config,
    pub grouping: Grouping,
    pub expanded: HashSet<RepoKey>,
    pub tracker: EnrichmentTracker,
    pub list_state: ListState,
    pub blog_state: ListState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub page: PageData,
    pub theme_store: ThemeStore,
    pub colors: ThemeColors,
    theme_changed: Arc<AtomicBool>,
    _theme_subscription: Subscription,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl App {
    /// Build the view in its loading state. Every group starts collapsed, so
    /// no lookups happen until the user expands one.
    pub fn new(config: Config, grouping: Grouping, tracker: EnrichmentTracker, theme_store: ThemeStore) -> Self {
        let theme_changed = Arc::new(AtomicBool::new(false));
        let flag = theme_changed.clone();
        let subscription = theme_store.subscribe(move |_| flag.store(true, Ordering::Release));

        let mut list_state = ListState::default();
        if !grouping.groups.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            colors: ThemeColors::for_theme(theme_store.get()),
            config,
            grouping,
            expanded: HashSet::new(),
            tracker,
            list_state,
            blog_state: ListState::default(),
            current_view: View::Overview,
            input_mode: InputMode::Normal,
            page: PageData::default(),
            theme_store,
            theme_changed,
            _theme_subscription: subscription,
            flash_message: None,
            should_quit: false,
            is_loading: true,
            spinner_frame: 0,
        }
    }

    /// Rows currently shown in the contributions list
    pub fn visible_rows(&self) -> Vec<ListRow> {
        let mut rows = Vec::new();
        for (g, group) in self.grouping.groups.iter().enumerate() {
            rows.push(ListRow::Header(g));
            if self.expanded.contains(&group.repo_key) {
                rows.extend((0..group.entries.len()).map(|e| ListRow::Entry(g, e)));
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<ListRow> {
        let selected = self.list_state.selected()?;
        self.visible_rows().get(selected).copied()
    }

    pub fn group_at(&self, index: usize) -> Option<&ContributionGroup> {
        self.grouping.groups.get(index)
    }

    pub fn entry_at(&self, group: usize, entry: usize) -> Option<&GroupEntry> {
        self.grouping.groups.get(group)?.entries.get(entry)
    }

    pub fn selected_entry(&self) -> Option<&GroupEntry> {
        match self.selected_row()? {
            ListRow::Entry(g, e) => self.entry_at(g, e),
            ListRow::Header(_) => None,
        }
    }

    pub fn is_expanded(&self, group: &ContributionGroup) -> bool {
        self.expanded.contains(&group.repo_key)
    }

    fn row_count(&self) -> usize {
        match self.current_view {
            View::Contributions => self.visible_rows().len(),
            View::Blog => self.page.posts.len(),
            View::Overview => 0,
        }
    }

    fn active_state(&mut self) -> Option<&mut ListState> {
        match self.current_view {
            View::Contributions => Some(&mut self.list_state),
            View::Blog => Some(&mut self.blog_state),
            View::Overview => None,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        if let Some(state) = self.active_state() {
            let i = match state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            state.select(Some(i));
        }
    }

    pub fn previous_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        if let Some(state) = self.active_state() {
            let i = match state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.select(Some(i));
        }
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        if self.current_view == View::Blog && self.blog_state.selected().is_none() && !self.page.posts.is_empty() {
            self.blog_state.select(Some(0));
        }
    }

    /// Expand or collapse the group at `index`. Expanding requests
    /// enrichment for each of its entries; already resolved or pending
    /// entries are not looked up again.
    pub fn toggle_group(&mut self, index: usize) {
        let Some(group) = self.grouping.groups.get(index) else {
            return;
        };
        let key = group.repo_key.clone();
        if self.expanded.remove(&key) {
            return;
        }

        let mut started = 0;
        for entry in &group.entries {
            if self.tracker.request(entry.id, &entry.reference) {
                started += 1;
            }
        }
        log::debug!("Expanded {}: {} new resolutions", key, started);
        self.expanded.insert(key);
    }

    /// Enter: headers expand/collapse, entries open their link
    pub fn activate_selected(&mut self) {
        match self.current_view {
            View::Contributions => match self.selected_row() {
                Some(ListRow::Header(g)) => self.toggle_group(g),
                Some(ListRow::Entry(..)) => self.open_selected(),
                None => {}
            },
            View::Blog => self.open_selected(),
            View::Overview => {}
        }
    }

    /// Open the selected contribution (its redirect when private) or post
    pub fn open_selected(&mut self) {
        let target = match self.current_view {
            View::Contributions => self.selected_entry().map(|entry| entry.reference.clone()),
            View::Blog => {
                let post = self.blog_state.selected().and_then(|i| self.page.posts.get(i));
                if let Some(post) = post {
                    let link = post.link.clone();
                    match crate::browser::open_url(&link) {
                        Ok(()) => self.show_flash(format!("Opened: {}", link)),
                        Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
                    }
                }
                return;
            }
            View::Overview => None,
        };

        match target {
            Some(reference) => match crate::browser::open_contribution(&reference) {
                Ok(url) => self.show_flash(format!("Opened: {}", url)),
                Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
            },
            None if self.current_view == View::Contributions => {
                self.show_flash("Expand a repository and select a contribution to open".to_string())
            }
            None => {}
        }
    }

    /// Flip the theme through the shared store. Colours follow on the next
    /// tick via the subscription.
    pub fn toggle_theme(&mut self) {
        let theme = self.theme_store.toggle();
        self.show_flash(format!("Theme: {}", theme));
    }

    /// Pick up a theme change broadcast by the store
    pub fn sync_theme(&mut self) -> bool {
        if self.theme_changed.swap(false, Ordering::AcqRel) {
            self.colors = ThemeColors::for_theme(self.theme_store.get());
            true
        } else {
            false
        }
    }

    pub fn set_page_data(&mut self, page: PageData) {
        self.page = page;
        self.is_loading = false;
        if !self.page.posts.is_empty() {
            self.blog_state.select(Some(0));
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Periodic housekeeping: apply finished lookups, follow theme changes
    pub fn on_tick(&mut self) {
        self.update_flash();
        self.advance_spinner();
        self.tracker.poll();
        self.sync_theme();
    }

    /// Tear down the view. Pending lookups are abandoned.
    pub fn shutdown(&mut self) {
        self.tracker.teardown();
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::contributions::testing::StaticLookup;
    use crate::contributions::{group, ContributionId, ContributionStatus, RowState};
    use crate::github::PullRequestSummary;
    use crate::theme::Theme;
    use std::time::Duration;

    fn config() -> Config {
        parse_config(
            r#"
personal:
  name: Someone
contributions:
  - prUrl: https://github.com/a/x/pull/1
  - prUrl: https://github.com/b/y/pull/2
    private: true
    title: Private fix
    status: merged
  - prUrl: https://github.com/a/x/pull/3
"#,
        )
        .unwrap()
    }

    fn app_with(lookup: Arc<StaticLookup>, store: ThemeStore) -> App {
        let config = config();
        let grouping = group(&config.contributions);
        let tracker = EnrichmentTracker::new(lookup, Duration::from_secs(5));
        App::new(config, grouping, tracker, store)
    }

    fn summary(title: &str) -> PullRequestSummary {
        PullRequestSummary {
            title: title.to_string(),
            state: "open".to_string(),
            merged: false,
        }
    }

    #[tokio::test]
    async fn test_groups_start_collapsed_without_lookups() {
        let lookup = Arc::new(StaticLookup::new());
        let app = app_with(lookup.clone(), ThemeStore::in_memory(Theme::Dark));

        assert_eq!(app.visible_rows(), vec![ListRow::Header(0), ListRow::Header(1)]);
        assert_eq!(app.selected_row(), Some(ListRow::Header(0)));
        assert_eq!(app.tracker.state(ContributionId(0)), RowState::Idle);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_expanding_requests_enrichment_once() {
        let lookup = Arc::new(StaticLookup::new().with(1, Ok(summary("First"))).with(3, Ok(summary("Third"))));
        let mut app = app_with(lookup.clone(), ThemeStore::in_memory(Theme::Dark));
        app.current_view = View::Contributions;

        app.activate_selected();
        assert_eq!(
            app.visible_rows(),
            vec![ListRow::Header(0), ListRow::Entry(0, 0), ListRow::Entry(0, 1), ListRow::Header(1)]
        );
        assert_eq!(app.tracker.state(ContributionId(0)), RowState::Loading);

        while app.tracker.next_resolved().await.is_some() {}
        let first = app.tracker.resolved(ContributionId(0)).unwrap();
        assert_eq!(first.display_title, "First");
        assert_eq!(lookup.calls(), 2);

        // Collapse and expand again: cached, no new lookups
        app.toggle_group(0);
        assert_eq!(app.visible_rows().len(), 2);
        app.toggle_group(0);
        assert_eq!(lookup.calls(), 2);
        assert_eq!(app.tracker.resolved(ContributionId(2)).unwrap().display_title, "Third");
    }

    #[tokio::test]
    async fn test_private_group_settles_without_network() {
        let lookup = Arc::new(StaticLookup::new());
        let mut app = app_with(lookup.clone(), ThemeStore::in_memory(Theme::Dark));

        app.toggle_group(1);

        let enriched = app.tracker.resolved(ContributionId(1)).unwrap();
        assert_eq!(enriched.display_title, "Private fix");
        assert_eq!(enriched.status, ContributionStatus::Merged);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_navigation_wraps() {
        let mut app = app_with(Arc::new(StaticLookup::new()), ThemeStore::in_memory(Theme::Dark));
        app.current_view = View::Contributions;

        app.previous_row();
        assert_eq!(app.selected_row(), Some(ListRow::Header(1)));
        app.next_row();
        assert_eq!(app.selected_row(), Some(ListRow::Header(0)));
    }

    #[tokio::test]
    async fn test_theme_toggle_updates_colors_on_tick() {
        let store = ThemeStore::in_memory(Theme::Dark);
        let mut app = app_with(Arc::new(StaticLookup::new()), store.clone());
        assert_eq!(app.colors, ThemeColors::dark());

        app.toggle_theme();
        assert_eq!(store.get(), Theme::Light);
        app.on_tick();
        assert_eq!(app.colors, ThemeColors::light());

        // A change made elsewhere reaches the view too
        store.set(Theme::Dark);
        assert!(app.sync_theme());
        assert_eq!(app.colors, ThemeColors::dark());
    }

    #[tokio::test]
    async fn test_dropping_app_unsubscribes() {
        let store = ThemeStore::in_memory(Theme::Dark);
        let app = app_with(Arc::new(StaticLookup::new()), store.clone());
        assert_eq!(store.subscriber_count(), 1);
        drop(app);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_tears_down_tracker() {
        let lookup = Arc::new(StaticLookup::new().hanging(1).hanging(3));
        let mut app = app_with(lookup, ThemeStore::in_memory(Theme::Dark));
        app.toggle_group(0);
        assert_eq!(app.tracker.pending_count(), 2);

        app.shutdown();

        assert!(!app.tracker.is_alive());
        assert!(app.should_quit);
        assert_eq!(app.tracker.state(ContributionId(0)), RowState::Idle);
    }

    #[tokio::test]
    async fn test_view_cycle() {
        let mut app = app_with(Arc::new(StaticLookup::new()), ThemeStore::in_memory(Theme::Dark));
        assert_eq!(app.current_view, View::Overview);
        app.next_view();
        app.next_view();
        assert_eq!(app.current_view, View::Blog);
        app.next_view();
        assert_eq!(app.current_view, View::Overview);
    }
}
