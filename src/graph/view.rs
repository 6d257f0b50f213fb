//! View state: active mode and the last resolved query result

use crate::graph::{GraphElements, RenderBundle, ThemeVars, build_view};
use crate::transform::QueryResult;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which role of the queried address feeds the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Transactions sent by the address
    #[default]
    Sender,
    /// Every transaction the address took part in
    Participant,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Sender => ViewMode::Participant,
            ViewMode::Participant => ViewMode::Sender,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Sender => "Sender",
            ViewMode::Participant => "Participant",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sender" => Ok(ViewMode::Sender),
            "participant" => Ok(ViewMode::Participant),
            other => Err(Error::Config(format!("Unknown view mode: {}", other))),
        }
    }
}

/// Identifies one issued query; only the latest ticket may resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Mutable state behind the visualizer
///
/// Holds the active [`ViewMode`] and the last resolved [`QueryResult`].
/// Graphs are never cached here: every call to [`ViewState::build`] or
/// [`ViewState::switch_view`] reruns the pipeline from scratch.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    mode: ViewMode,
    result: Option<QueryResult>,
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    /// Address of the loaded result, if the API reported one
    pub fn address(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.address.as_deref())
    }

    /// Register a new query; any earlier in-flight query becomes stale
    pub fn begin_query(&mut self) -> QueryTicket {
        self.generation += 1;
        QueryTicket(self.generation)
    }

    pub fn is_latest(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Store a fetched result if its ticket is still the latest
    ///
    /// Returns `false` and drops the result when a newer query was issued.
    pub fn resolve(&mut self, ticket: QueryTicket, result: QueryResult) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(
                "Dropping stale query result (ticket {}, latest {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.result = Some(result);
        true
    }

    /// Replace the result directly, superseding any in-flight query
    pub fn load(&mut self, result: QueryResult) {
        let ticket = self.begin_query();
        self.resolve(ticket, result);
    }

    /// Build the graph for the active mode
    pub fn build(&self) -> GraphElements {
        build_view(self.result.as_ref(), self.mode)
    }

    /// Toggle the mode and rebuild the graph
    pub fn switch_view(&mut self) -> GraphElements {
        self.mode = self.mode.toggled();
        tracing::info!("Switched to {} view", self.mode);
        self.build()
    }

    /// Build the full renderer input for the active mode
    pub fn bundle(&self, theme: &ThemeVars) -> Result<RenderBundle> {
        RenderBundle::new(self.build(), theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{RawTransfer, TransferBatch};
    use std::collections::HashSet;

    const ALICE: &str = "NSTSntFPK36QXsjEK6oAhnPzSyfgfVA2GQ";
    const BOB: &str = "NhGomBpYnKXArr55nHRQ5rzy79TwKVXZbr";
    const CAROL: &str = "NZs2zXSPuuv9ZF6TDGSWT1RBmE8rfGj7UW";
    const GAS: &str = "0xd2a4cff31913016155e38e474a2c06d08be276cf";

    fn result_with(amount: f64) -> QueryResult {
        QueryResult {
            address: Some(ALICE.to_string()),
            as_sender: vec![TransferBatch::new(vec![
                RawTransfer::new(ALICE, BOB, amount, GAS),
                RawTransfer::new(ALICE, CAROL, amount, GAS),
            ])],
            as_participant: vec![TransferBatch::new(vec![RawTransfer::new(
                BOB, ALICE, amount, GAS,
            )])],
        }
    }

    fn content(graph: &GraphElements) -> (HashSet<String>, Vec<String>) {
        let nodes = graph.nodes.iter().map(|n| n.id.clone()).collect();
        let mut edges: Vec<String> = graph
            .edges
            .iter()
            .map(|e| format!("{}:{}", e.id, e.weight))
            .collect();
        edges.sort();
        (nodes, edges)
    }

    #[test]
    fn test_initial_mode_is_sender() {
        let state = ViewState::new();
        assert_eq!(state.mode(), ViewMode::Sender);
        assert!(state.result().is_none());
        assert!(state.build().is_empty());
    }

    #[test]
    fn test_double_switch_restores_content() {
        let mut state = ViewState::new();
        state.load(result_with(1.0));

        let initial = state.build();
        let participant = state.switch_view();
        assert_eq!(state.mode(), ViewMode::Participant);
        assert_eq!(participant.edges.len(), 1);

        let back = state.switch_view();
        assert_eq!(state.mode(), ViewMode::Sender);
        assert_eq!(content(&initial), content(&back));
    }

    #[test]
    fn test_switch_without_result_is_empty() {
        let mut state = ViewState::new();
        assert!(state.switch_view().is_empty());
        assert_eq!(state.mode(), ViewMode::Participant);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut state = ViewState::new();
        let first = state.begin_query();
        let second = state.begin_query();

        assert!(state.resolve(second, result_with(2.0)));
        // the older request resolves last but must not win
        assert!(!state.resolve(first, result_with(1.0)));

        assert_eq!(state.build().edges[0].weight, 2.0);
    }

    #[test]
    fn test_load_supersedes_in_flight_query() {
        let mut state = ViewState::new();
        let pending = state.begin_query();
        state.load(result_with(5.0));

        assert!(!state.resolve(pending, result_with(1.0)));
        assert_eq!(state.address(), Some(ALICE));
        assert_eq!(state.build().edges[0].weight, 5.0);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("sender".parse::<ViewMode>().unwrap(), ViewMode::Sender);
        assert_eq!(
            "Participant".parse::<ViewMode>().unwrap(),
            ViewMode::Participant
        );
        assert!("both".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Sender.toggled().toggled(), ViewMode::Sender);
    }
}
