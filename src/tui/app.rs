//! TUI application state

use crate::graph::{QueryTicket, RenderBundle, ThemeVars, ViewState};
use crate::transform::QueryResult;
use crate::validator::{self, FieldMarker};
use crate::Result;
use ratatui::widgets::ListState;
use std::time::Instant;

/// TUI application state
pub struct App {
    pub view: ViewState,
    pub theme: ThemeVars,
    pub bundle: RenderBundle,
    pub selected_edge_index: usize,
    pub edge_list_state: ListState,
    pub should_quit: bool,
    /// Address being typed, when the input field is open
    pub input: Option<String>,
    pub input_marker: FieldMarker,
    /// Latest query still in flight
    pub pending: Option<QueryTicket>,
    /// Last failure shown in the footer
    pub status: Option<String>,
}

impl App {
    pub fn new(view: ViewState, theme: ThemeVars) -> Result<Self> {
        let bundle = view.bundle(&theme)?;
        let mut app = Self {
            view,
            theme,
            bundle,
            selected_edge_index: 0,
            edge_list_state: ListState::default(),
            should_quit: false,
            input: None,
            input_marker: FieldMarker::new(),
            pending: None,
            status: None,
        };
        app.reset_selection();
        Ok(app)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn reset_selection(&mut self) {
        self.selected_edge_index = 0;
        self.edge_list_state
            .select(if self.bundle.elements.edges.is_empty() {
                None
            } else {
                Some(0)
            });
    }

    /// Rebuild the graph for the current mode and result
    fn redraw(&mut self) -> Result<()> {
        self.bundle = self.view.bundle(&self.theme)?;
        self.reset_selection();
        Ok(())
    }

    /// Toggle sender/participant and rebuild from scratch
    pub fn switch_view(&mut self) -> Result<()> {
        self.view.switch_view();
        self.redraw()
    }

    pub fn select_next_edge(&mut self) {
        let len = self.bundle.elements.edges.len();
        if len > 0 {
            self.selected_edge_index = (self.selected_edge_index + 1) % len;
            self.edge_list_state.select(Some(self.selected_edge_index));
        }
    }

    pub fn select_previous_edge(&mut self) {
        let len = self.bundle.elements.edges.len();
        if len > 0 {
            if self.selected_edge_index == 0 {
                self.selected_edge_index = len - 1;
            } else {
                self.selected_edge_index -= 1;
            }
            self.edge_list_state.select(Some(self.selected_edge_index));
        }
    }

    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    pub fn open_input(&mut self) {
        self.input = Some(String::new());
        self.input_marker.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
        self.input_marker.clear();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(input) = &mut self.input {
            input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(input) = &mut self.input {
            input.pop();
        }
    }

    /// Validate the typed address and start a query for it
    ///
    /// An invalid address marks the field and sends nothing.
    pub fn submit_input(&mut self, now: Instant) -> Option<(QueryTicket, String)> {
        let address = self.input.as_deref()?.trim().to_string();

        if !validator::is_address(&address) {
            tracing::debug!("Rejected address input {:?}", address);
            self.input_marker.mark_invalid(now);
            return None;
        }

        self.input = None;
        self.input_marker.clear();
        self.status = None;

        let ticket = self.view.begin_query();
        self.pending = Some(ticket);
        Some((ticket, address))
    }

    /// Apply a query response; responses to superseded queries are ignored
    pub fn apply_response(&mut self, ticket: QueryTicket, response: Result<QueryResult>) -> Result<()> {
        if !self.view.is_latest(ticket) {
            tracing::debug!("Ignoring response to a superseded query");
            return Ok(());
        }
        self.pending = None;

        match response {
            Ok(result) => {
                self.view.resolve(ticket, result);
                self.status = None;
                self.redraw()
            }
            Err(e) => {
                tracing::warn!("Query failed: {}", e);
                self.status = Some(e.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::DataSource;
    use crate::data_source::mock::{MOCK_ADDRESS, MockDataSource};
    use crate::graph::ViewMode;
    use crate::Error;

    async fn create_test_app() -> App {
        let result = MockDataSource::new()
            .get_address_transfers(MOCK_ADDRESS)
            .await
            .unwrap();
        let mut view = ViewState::new();
        view.load(result);
        App::new(view, ThemeVars::new("hsl(195, 85%, 41%)", "hsl(205, 15%, 41%)")).unwrap()
    }

    #[tokio::test]
    async fn test_app_creation() {
        let app = create_test_app().await;

        assert_eq!(app.view.mode(), ViewMode::Sender);
        assert_eq!(app.bundle.elements.edges.len(), 3);
        assert_eq!(app.bundle.style.node_fill, "#1095c1");
        assert_eq!(app.edge_list_state.selected(), Some(0));
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_switch_view_rebuilds() {
        let mut app = create_test_app().await;
        let sender = app.bundle.clone();

        app.select_next_edge();
        app.switch_view().unwrap();
        assert_eq!(app.view.mode(), ViewMode::Participant);
        assert_eq!(app.bundle.elements.nodes.len(), 4);
        assert_eq!(app.selected_edge_index, 0);

        app.switch_view().unwrap();
        assert_eq!(app.bundle, sender);
    }

    #[tokio::test]
    async fn test_edge_navigation_wraps() {
        let mut app = create_test_app().await;

        app.select_next_edge();
        app.select_next_edge();
        assert_eq!(app.selected_edge_index, 2);
        app.select_next_edge();
        assert_eq!(app.selected_edge_index, 0);
        app.select_previous_edge();
        assert_eq!(app.selected_edge_index, 2);
    }

    #[test]
    fn test_navigation_on_empty_graph() {
        let mut app = App::new(ViewState::new(), ThemeVars::new("#111111", "#222222")).unwrap();

        assert!(app.bundle.elements.is_empty());
        assert_eq!(app.edge_list_state.selected(), None);
        app.select_next_edge();
        app.select_previous_edge();
        assert_eq!(app.selected_edge_index, 0);
    }

    #[test]
    fn test_invalid_input_marks_field() {
        let mut app = App::new(ViewState::new(), ThemeVars::new("#111111", "#222222")).unwrap();
        let now = Instant::now();

        app.open_input();
        for c in "0xnotanaddress".chars() {
            app.push_char(c);
        }
        assert!(app.submit_input(now).is_none());
        assert!(app.is_editing());
        assert!(app.input_marker.is_invalid(now));
        assert!(app.pending.is_none());

        app.cancel_input();
        assert!(!app.input_marker.is_invalid(now));
    }

    #[tokio::test]
    async fn test_stale_response_is_ignored() {
        let mut app = create_test_app().await;

        app.open_input();
        for c in MOCK_ADDRESS.chars() {
            app.push_char(c);
        }
        let (first, address) = app.submit_input(Instant::now()).unwrap();
        assert_eq!(address, MOCK_ADDRESS);

        app.open_input();
        for c in MOCK_ADDRESS.chars() {
            app.push_char(c);
        }
        let (second, _) = app.submit_input(Instant::now()).unwrap();

        app.apply_response(first, Ok(QueryResult::default())).unwrap();
        assert_eq!(app.pending, Some(second));
        assert_eq!(app.bundle.elements.edges.len(), 3);

        app.apply_response(second, Ok(QueryResult::default())).unwrap();
        assert!(app.pending.is_none());
        assert!(app.bundle.elements.is_empty());
    }

    #[tokio::test]
    async fn test_failed_query_sets_status() {
        let mut app = create_test_app().await;

        app.open_input();
        for c in MOCK_ADDRESS.chars() {
            app.push_char(c);
        }
        let (ticket, _) = app.submit_input(Instant::now()).unwrap();
        app.apply_response(ticket, Err(Error::Api("No transfers for that sender.".to_string())))
            .unwrap();

        assert_eq!(app.status.as_deref(), Some("API error: No transfers for that sender."));
        assert_eq!(app.bundle.elements.edges.len(), 3);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new(ViewState::new(), ThemeVars::new("#111111", "#222222")).unwrap();
        assert!(!app.should_quit);
        app.quit();
        assert!(app.should_quit);
    }
}
