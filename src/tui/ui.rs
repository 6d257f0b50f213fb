//! TUI UI rendering

use super::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::time::Instant;

/// Map a resolved `#rgb`/`#rrggbb` colour onto the terminal palette
///
/// Anything else (named CSS colours, unparsable strings) falls back to gray.
pub fn terminal_color(css: &str) -> Color {
    let Some(digits) = css.trim().strip_prefix('#') else {
        return Color::Gray;
    };

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Color::Gray,
    };

    match hex::decode(expanded).as_deref() {
        Ok([r, g, b]) => Color::Rgb(*r, *g, *b),
        _ => Color::Gray,
    }
}

/// Draw the UI based on current app state
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Nodes and edges
            Constraint::Length(3), // Address input
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    draw_nodes(f, app, body[0]);
    draw_edges(f, app, body[1]);
    draw_input(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let mut title = format!(
        "NEO Transfer Graph - {} view | {}",
        app.view.mode(),
        app.view.address().unwrap_or("no address")
    );
    if app.pending.is_some() {
        title.push_str(" | loading...");
    }

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_nodes(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let color = terminal_color(&app.bundle.style.node_fill);
    let items: Vec<ListItem> = app
        .bundle
        .elements
        .nodes
        .iter()
        .map(|node| ListItem::new(format!("● {}", node.id)).style(Style::default().fg(color)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Addresses ({})", app.bundle.elements.nodes.len())),
    );
    f.render_widget(list, area);
}

fn draw_edges(f: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    let color = terminal_color(&app.bundle.style.edge_arrow);
    let edges = &app.bundle.elements.edges;

    let items: Vec<ListItem> = edges
        .iter()
        .enumerate()
        .map(|(idx, edge)| {
            let is_selected = idx == app.selected_edge_index;
            let prefix = if is_selected { "► " } else { "  " };
            let text = format!("{}{} → {} | {}", prefix, edge.source, edge.target, edge.weight);

            let style = if is_selected {
                Style::default()
                    .fg(color)
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::DarkGray)
            } else {
                Style::default().fg(color)
            };

            ListItem::new(text).style(style)
        })
        .collect();
    let total = edges.len();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Transfers"))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut app.edge_list_state);

    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(total).position(app.selected_edge_index);
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

fn draw_input(f: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    let invalid = app.input_marker.is_invalid(Instant::now());
    let (text, border) = match &app.input {
        Some(input) if invalid => (input.clone(), Color::Red),
        Some(input) => (input.clone(), Color::Yellow),
        None => ("[/] search another address".to_string(), Color::DarkGray),
    };

    let title = if invalid { "Address (invalid)" } else { "Address" };
    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    f.render_widget(input, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let (text, color) = match &app.status {
        Some(status) => (format!("Error: {}", status), Color::Red),
        None => {
            let stats = app.bundle.elements.stats();
            (
                format!(
                    "Nodes: {} | Edges: {} | Sending only: {} | Receiving only: {} | [s/Tab] Switch view | [↑/↓] Select | [/] Search | [q] Quit",
                    stats.total_nodes, stats.total_edges, stats.source_only, stats.sink_only
                ),
                Color::White,
            )
        }
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_color() {
        assert_eq!(terminal_color("#1095c1"), Color::Rgb(0x10, 0x95, 0xc1));
        assert_eq!(terminal_color("#ddd"), Color::Rgb(0xdd, 0xdd, 0xdd));
        assert_eq!(terminal_color("red"), Color::Gray);
        assert_eq!(terminal_color("#12345"), Color::Gray);
        assert_eq!(terminal_color("#zzzzzz"), Color::Gray);
    }
}
