#![forbid(unsafe_code)]

//! `seqdiag` parses seqdiag sequence diagrams and lays them out headlessly.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`seqdiag::render`)

pub use seqdiag_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use seqdiag_render::config::LayoutConfig;
    pub use seqdiag_render::model::SequenceLayout;
    pub use seqdiag_render::scene::Scene;
    pub use seqdiag_render::svg::SvgRenderOptions;
    pub use seqdiag_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use seqdiag_render::{LayoutOptions, layout_diagram};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] seqdiag_core::Error),
        #[error(transparent)]
        Render(#[from] seqdiag_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Parses and lays out `text` in one call.
    pub fn layout_source(text: &str, layout_options: &LayoutOptions) -> Result<SequenceLayout> {
        let diagram = seqdiag_core::parse_and_build(text)?;
        Ok(layout_diagram(&diagram, layout_options)?)
    }

    pub fn render_layout_svg(layout: &SequenceLayout, svg_options: &SvgRenderOptions) -> String {
        seqdiag_render::svg::render_scene_svg(&Scene::from_layout(layout), svg_options)
    }

    /// Parses, lays out and renders `text` to an SVG document.
    pub fn render_svg(
        text: &str,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let layout = layout_source(text, layout_options)?;
        Ok(render_layout_svg(&layout, svg_options))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parse_errors_surface_through_the_facade() {
            let err = render_svg("{ A -> ", &LayoutOptions::default(), &SvgRenderOptions::default())
                .unwrap_err();
            assert!(matches!(err, HeadlessError::Parse(_)));
        }

        #[test]
        fn renders_a_minimal_diagram() {
            let svg = render_svg(
                "seqdiag { A -> B [label = \"hi\"]; }",
                &LayoutOptions::default(),
                &SvgRenderOptions::default(),
            )
            .unwrap();
            assert!(svg.contains("<svg "));
            assert!(svg.contains(">hi<"));
        }
    }
}
