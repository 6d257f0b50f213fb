//! Graph module - Build renderer-ready transfer graphs
//!
//! A [`RenderBundle`] is everything a renderer needs for one draw: the node
//! and edge elements for the active [`ViewMode`], the resolved stylesheet
//! and the layout directive.

use crate::Result;
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod style;
pub mod view;

// Re-export key types
pub use crate::transform::{GraphEdge, GraphNode};
pub use builder::{GraphElements, GraphStats, aggregate_edges, build_view, index_edges_by_id};
pub use style::{LayoutDirective, StyleRule, Stylesheet, ThemeVars, style};
pub use view::{QueryTicket, ViewMode, ViewState};

/// Complete input for one draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderBundle {
    pub elements: GraphElements,
    pub style: Stylesheet,
    pub layout: LayoutDirective,
}

impl RenderBundle {
    /// Resolve the theme and wrap the elements for rendering
    pub fn new(elements: GraphElements, theme: &ThemeVars) -> Result<Self> {
        Ok(Self {
            elements,
            style: style(theme)?,
            layout: LayoutDirective::default(),
        })
    }
}
