//! Textual graph outputs: cytoscape JSON, Graphviz DOT and a plain table

use crate::Result;
use crate::graph::RenderBundle;
use serde_json::{Value, json};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Build the element/style/layout document a cytoscape instance is created from
pub fn to_cytoscape_json(bundle: &RenderBundle) -> Value {
    json!({
        "elements": {
            "nodes": bundle.elements.nodes.iter().map(|node| json!({ "data": node })).collect::<Vec<_>>(),
            "edges": bundle.elements.edges.iter().map(|edge| json!({ "data": edge })).collect::<Vec<_>>(),
        },
        "style": bundle.style.rules(),
        "layout": bundle.layout,
    })
}

/// Output the graph as pretty JSON
pub fn output_json(w: &mut impl Write, bundle: &RenderBundle) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, &to_cytoscape_json(bundle))?;
    writeln!(w)?;
    Ok(())
}

fn quote(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Export to DOT format for Graphviz
pub fn to_dot(bundle: &RenderBundle) -> String {
    let graph = bundle.elements.to_graph();
    let style = &bundle.style;

    let mut dot = "digraph Transfers {\n".to_string();
    dot.push_str("  rankdir=TB;\n");
    dot.push_str(&format!(
        "  node [shape=ellipse, style=filled, fillcolor=\"{}\", fontcolor=\"white\"];\n",
        style.node_fill
    ));
    dot.push_str(&format!(
        "  edge [color=\"{}\", fontcolor=\"{}\"];\n\n",
        style.edge_arrow, style.node_label
    ));

    for node in graph.node_indices().filter_map(|idx| graph.node_weight(idx)) {
        dot.push_str(&format!("  \"{}\";\n", quote(&node.id)));
    }

    dot.push('\n');

    for edge_idx in graph.edge_indices() {
        if let Some((from_idx, to_idx)) = graph.edge_endpoints(edge_idx)
            && let (Some(from), Some(to), Some(edge)) = (
                graph.node_weight(from_idx),
                graph.node_weight(to_idx),
                graph.edge_weight(edge_idx),
            )
        {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                quote(&from.id),
                quote(&to.id),
                edge.weight
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Write the DOT graph to `{timestamp}.graph.dot` inside `dir`
pub fn export_dot(bundle: &RenderBundle, dir: &Path) -> Result<PathBuf> {
    let filename = format!("{}.graph.dot", chrono::Utc::now().format("%Y%m%d%H%M%S"));
    let path = dir.join(filename);
    std::fs::write(&path, to_dot(bundle))?;
    tracing::info!("Graph exported to {}", path.display());
    Ok(path)
}

/// Output the graph as text table
pub fn output_table(w: &mut impl Write, bundle: &RenderBundle) -> Result<()> {
    let elements = &bundle.elements;
    let stats = elements.stats();

    writeln!(w, "NEO Transfer Graph")?;
    writeln!(w, "{}", "=".repeat(60))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Nodes:             {}", stats.total_nodes)?;
    writeln!(w, "  Edges:             {}", stats.total_edges)?;
    writeln!(w, "  Distinct edge ids: {}", stats.distinct_edge_ids)?;
    writeln!(w, "  Sending only:      {}", stats.source_only)?;
    writeln!(w, "  Receiving only:    {}", stats.sink_only)?;
    writeln!(w)?;

    if elements.is_empty() {
        writeln!(w, "No transfers.")?;
        return Ok(());
    }

    writeln!(w, "Transfers:")?;
    writeln!(w, "{:-<60}", "")?;
    writeln!(w, "{:<8} {:<8} {:>20}", "From", "To", "Amount")?;
    writeln!(w, "{:-<60}", "")?;

    for edge in &elements.edges {
        writeln!(w, "{:<8} {:<8} {:>20}", edge.source, edge.target, edge.weight)?;
    }
    writeln!(w)?;

    Ok(())
}
