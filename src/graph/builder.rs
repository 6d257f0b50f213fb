//! Graph construction from transfer batches

use crate::graph::ViewMode;
use crate::transform::{self, GraphEdge, GraphNode, QueryResult};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Nodes and edges handed to a renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphElements {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphElements {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Build a petgraph view of the elements
    ///
    /// Every edge becomes its own petgraph edge, so parallel transfers stay
    /// visible. Edges whose endpoints are not in the node set are dropped.
    pub fn to_graph(&self) -> StableGraph<GraphNode, GraphEdge> {
        let mut graph = StableGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.clone());
            index.insert(node.id.as_str(), idx);
        }

        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) {
                graph.add_edge(from, to, edge.clone());
            }
        }

        graph
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let graph = self.to_graph();
        let count_without = |direction: Direction| {
            graph
                .node_indices()
                .filter(|&idx| graph.edges_directed(idx, direction).next().is_none())
                .count()
        };

        GraphStats {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            distinct_edge_ids: index_edges_by_id(&self.edges).len(),
            source_only: count_without(Direction::Incoming),
            sink_only: count_without(Direction::Outgoing),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub distinct_edge_ids: usize,
    /// Nodes that only send
    pub source_only: usize,
    /// Nodes that only receive
    pub sink_only: usize,
}

/// Build the graph for one view of a query result
///
/// A missing result yields an empty graph.
pub fn build_view(result: Option<&QueryResult>, mode: ViewMode) -> GraphElements {
    let Some(result) = result else {
        tracing::debug!("No query result loaded, building empty graph");
        return GraphElements::default();
    };

    let batches = match mode {
        ViewMode::Sender => &result.as_sender,
        ViewMode::Participant => &result.as_participant,
    };

    let nodes = transform::extract_addresses(batches)
        .into_iter()
        .map(|id| GraphNode { id })
        .collect();
    let edges = transform::extract_edges(batches);

    let elements = GraphElements { nodes, edges };
    tracing::debug!(
        "Built {} view: {} nodes, {} edges",
        mode.name(),
        elements.nodes.len(),
        elements.edges.len()
    );
    elements
}

/// Key edges by id; for colliding ids the last edge wins
pub fn index_edges_by_id(edges: &[GraphEdge]) -> HashMap<&str, &GraphEdge> {
    edges.iter().map(|edge| (edge.id.as_str(), edge)).collect()
}

/// Merge edges sharing an id, summing their weights
///
/// Output keeps the first-seen order of ids.
pub fn aggregate_edges(edges: &[GraphEdge]) -> Vec<GraphEdge> {
    let mut merged: Vec<GraphEdge> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for edge in edges {
        match positions.get(edge.id.as_str()) {
            Some(&pos) => merged[pos].weight += edge.weight,
            None => {
                positions.insert(edge.id.as_str(), merged.len());
                merged.push(edge.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{RawTransfer, TransferBatch};

    const ALICE: &str = "NSTSntFPK36QXsjEK6oAhnPzSyfgfVA2GQ";
    const BOB: &str = "NhGomBpYnKXArr55nHRQ5rzy79TwKVXZbr";
    const CAROL: &str = "NZs2zXSPuuv9ZF6TDGSWT1RBmE8rfGj7UW";
    const GAS: &str = "0xd2a4cff31913016155e38e474a2c06d08be276cf";
    const NEO: &str = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";

    fn create_test_result() -> QueryResult {
        QueryResult {
            address: Some(ALICE.to_string()),
            as_sender: vec![
                TransferBatch::new(vec![RawTransfer::new(ALICE, BOB, 1.0, GAS)]).with_txid("0x01"),
                TransferBatch::new(vec![
                    RawTransfer::new(ALICE, BOB, 2.0, NEO),
                    RawTransfer::new(ALICE, CAROL, 4.0, GAS),
                ])
                .with_txid("0x02"),
            ],
            as_participant: vec![
                TransferBatch::new(vec![RawTransfer::new(CAROL, ALICE, 8.0, GAS)])
                    .with_txid("0x03"),
            ],
        }
    }

    #[test]
    fn test_build_sender_view() {
        let result = create_test_result();
        let graph = build_view(Some(&result), ViewMode::Sender);

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["NSTSn", "NhGom", "NZs2z"]);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.edges[2].id, "NSTSnNZs2z");
    }

    #[test]
    fn test_build_participant_view() {
        let result = create_test_result();
        let graph = build_view(Some(&result), ViewMode::Participant);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "NZs2z");
        assert_eq!(graph.edges[0].weight, 8.0);
    }

    #[test]
    fn test_missing_result_is_empty_graph() {
        let graph = build_view(None, ViewMode::Sender);
        assert!(graph.is_empty());
        assert_eq!(graph, GraphElements::default());
    }

    #[test]
    fn test_keyed_edges_collide_last_wins() {
        let result = create_test_result();
        let graph = build_view(Some(&result), ViewMode::Sender);

        // raw list keeps both ALICE -> BOB transfers
        assert_eq!(
            graph.edges.iter().filter(|e| e.id == "NSTSnNhGom").count(),
            2
        );

        let keyed = index_edges_by_id(&graph.edges);
        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed["NSTSnNhGom"].weight, 2.0);
    }

    #[test]
    fn test_aggregate_edges_sums_weights() {
        let result = create_test_result();
        let graph = build_view(Some(&result), ViewMode::Sender);

        let merged = aggregate_edges(&graph.edges);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "NSTSnNhGom");
        assert_eq!(merged[0].weight, 3.0);
        assert_eq!(merged[1].weight, 4.0);
    }

    #[test]
    fn test_graph_stats() {
        let result = create_test_result();
        let stats = build_view(Some(&result), ViewMode::Sender).stats();

        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.distinct_edge_ids, 2);
        assert_eq!(stats.source_only, 1);
        assert_eq!(stats.sink_only, 2);
    }

    #[test]
    fn test_to_graph_skips_dangling_edges() {
        let elements = GraphElements {
            nodes: vec![GraphNode {
                id: "NSTSn".to_string(),
            }],
            edges: vec![GraphEdge {
                id: "NSTSnNhGom".to_string(),
                weight: 1.0,
                source: "NSTSn".to_string(),
                target: "NhGom".to_string(),
            }],
        };

        let graph = elements.to_graph();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
