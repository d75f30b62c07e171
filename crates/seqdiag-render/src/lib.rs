#![forbid(unsafe_code)]

//! Headless layout + SVG rendering for seqdiag sequence diagrams.
//!
//! [`layout_diagram`] resolves a [`Diagram`] into a [`SequenceLayout`];
//! [`scene::Scene`] turns that into an ordered drawing list and
//! [`svg::render_scene_svg`] serializes it.

pub mod config;
pub mod geom;
mod grid;
pub mod metrics;
pub mod model;
pub mod scene;
pub mod sequence;
pub mod svg;
pub mod text;

pub use crate::config::LayoutConfig;
pub use crate::model::SequenceLayout;
use crate::scene::Scene;
use crate::svg::SvgRenderOptions;
pub use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
use seqdiag_core::Diagram;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown {kind} id: {index}")]
    UnknownEntity { kind: &'static str, index: usize },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub config: LayoutConfig,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

pub fn layout_diagram(diagram: &Diagram, options: &LayoutOptions) -> Result<SequenceLayout> {
    sequence::layout_sequence_diagram(diagram, &options.config, options.text_measurer.as_ref())
}

/// Lays out `diagram` and serializes it to a standalone SVG document.
pub fn render_svg(
    diagram: &Diagram,
    options: &LayoutOptions,
    svg_options: &SvgRenderOptions,
) -> Result<String> {
    let layout = layout_diagram(diagram, options)?;
    let scene = Scene::from_layout(&layout);
    Ok(svg::render_scene_svg(&scene, svg_options))
}
