use crate::geom::Point;
use seqdiag_core::DiagramSettings;
use serde::{Deserialize, Serialize};

/// Size constants for the metrics engine.
///
/// Deserializes from partial JSON: missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub cellsize: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub span_width: f64,
    pub span_height: f64,
    /// Base height of a message row before its label is added.
    pub edge_height: f64,
    /// Fixed distance between adjacent lifelines; overrides `span_width` between columns.
    pub edge_length: Option<f64>,
    pub shadow_offset: Point,
    pub page_margin: Point,
    /// `[top, right, bottom, left]`
    pub page_padding: [f64; 4],
    pub font_size: f64,
    pub line_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cellsize: 8.0,
            node_width: 128.0,
            node_height: 40.0,
            span_width: 64.0,
            span_height: 40.0,
            edge_height: 10.0,
            edge_length: None,
            shadow_offset: Point::new(3.0, 6.0),
            page_margin: Point::new(0.0, 0.0),
            page_padding: [0.0, 0.0, 24.0, 0.0],
            font_size: 11.0,
            line_spacing: 2.0,
        }
    }
}

impl LayoutConfig {
    /// Overlays the size attributes declared in the diagram source.
    pub fn apply_diagram(&mut self, settings: &DiagramSettings) {
        if let Some(v) = settings.node_width {
            self.node_width = v;
        }
        if let Some(v) = settings.node_height {
            self.node_height = v;
        }
        if let Some(v) = settings.span_width {
            self.span_width = v;
        }
        if let Some(v) = settings.span_height {
            self.span_height = v;
        }
        if let Some(v) = settings.edge_length {
            self.edge_length = Some(v);
        }
        if let Some(v) = settings.default_fontsize {
            self.font_size = v;
        }
    }

    pub fn with_diagram(mut self, settings: &DiagramSettings) -> Self {
        self.apply_diagram(settings);
        self
    }
}
