//! Renderer stylesheet and layout directive

use crate::Result;
use crate::color::parse_if_hsl;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Edge line colour, independent of the theme
pub const EDGE_LINE_COLOR: &str = "#ddd";

/// Colour used for highlighted elements
pub const HIGHLIGHT_COLOR: &str = "#61bffc";

/// The two theme custom properties the graph is styled with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeVars {
    /// `--primary`
    pub primary: String,
    /// `--secondary`
    pub secondary: String,
}

impl ThemeVars {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Resolved colours for one draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    pub node_fill: String,
    pub node_label: String,
    pub edge_line: String,
    pub edge_arrow: String,
}

/// A single selector with its properties, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Map<String, Value>,
}

/// Resolve the theme into a stylesheet
///
/// Each theme property goes through [`parse_if_hsl`], so a malformed HSL
/// value fails the draw instead of producing a wrong colour.
pub fn style(theme: &ThemeVars) -> Result<Stylesheet> {
    let primary = parse_if_hsl(&theme.primary)?;
    let secondary = parse_if_hsl(&theme.secondary)?;

    Ok(Stylesheet {
        node_fill: primary.clone(),
        node_label: primary,
        edge_line: EDGE_LINE_COLOR.to_string(),
        edge_arrow: secondary,
    })
}

fn properties(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl Stylesheet {
    /// Expand into selector rules for the renderer
    pub fn rules(&self) -> Vec<StyleRule> {
        vec![
            StyleRule {
                selector: "node".to_string(),
                style: properties(json!({
                    "content": "data(id)",
                    "background-color": self.node_fill,
                    "color": self.node_label,
                })),
            },
            StyleRule {
                selector: "edge".to_string(),
                style: properties(json!({
                    "curve-style": "bezier",
                    "target-arrow-shape": "triangle",
                    "width": 2,
                    "line-color": self.edge_line,
                    "line-opacity": 0.5,
                    "target-arrow-color": self.edge_arrow,
                })),
            },
            StyleRule {
                selector: ".highlighted".to_string(),
                style: properties(json!({
                    "background-color": HIGHLIGHT_COLOR,
                    "line-color": HIGHLIGHT_COLOR,
                    "target-arrow-color": HIGHLIGHT_COLOR,
                    "transition-property": "background-color, line-color, target-arrow-color",
                    "transition-duration": "0.5s",
                })),
            },
        ]
    }
}

/// Layout algorithm settings passed through to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDirective {
    pub name: String,
    pub fit: bool,
    pub padding: u32,
    pub node_dimensions_include_labels: bool,
}

impl Default for LayoutDirective {
    fn default() -> Self {
        Self {
            name: "dagre".to_string(),
            fit: true,
            padding: 20,
            node_dimensions_include_labels: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_style_resolves_hsl_theme() {
        let theme = ThemeVars::new("hsl(0, 100%, 50%)", "hsl(240, 100%, 50%)");
        let sheet = style(&theme).unwrap();

        assert_eq!(sheet.node_fill, "#ff0000");
        assert_eq!(sheet.node_label, "#ff0000");
        assert_eq!(sheet.edge_line, EDGE_LINE_COLOR);
        assert_eq!(sheet.edge_arrow, "#0000ff");
    }

    #[test]
    fn test_style_keeps_hex_theme() {
        let theme = ThemeVars::new("#336699", " #aabbcc");
        let sheet = style(&theme).unwrap();

        assert_eq!(sheet.node_fill, "#336699");
        assert_eq!(sheet.edge_arrow, " #aabbcc");
    }

    #[test]
    fn test_style_rejects_malformed_theme() {
        let theme = ThemeVars::new("hsl(0, 100%)", "#fff");
        assert!(matches!(style(&theme), Err(Error::MalformedColor(_))));
    }

    #[test]
    fn test_rules_order_and_content() {
        let sheet = style(&ThemeVars::new("#111111", "#222222")).unwrap();
        let rules = sheet.rules();

        let selectors: Vec<&str> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec!["node", "edge", ".highlighted"]);

        let node_keys: Vec<&String> = rules[0].style.keys().collect();
        assert_eq!(node_keys, vec!["content", "background-color", "color"]);
        assert_eq!(rules[1].style["line-color"], json!("#ddd"));
        assert_eq!(rules[1].style["target-arrow-color"], json!("#222222"));
    }

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutDirective::default();
        let json = serde_json::to_value(&layout).unwrap();

        assert_eq!(
            json,
            json!({"name": "dagre", "fit": true, "padding": 20, "nodeDimensionsIncludeLabels": true})
        );
    }
}
