//! Serializable layout snapshot: every coordinate the renderer needs, resolved.

use crate::geom::{Point, Rect, Size};
use crate::metrics::LifelineSegment;
use seqdiag_core::ast::{FragmentKind, SeparatorKind};
use seqdiag_core::{Heading, LineStyle, ShadowStyle, Warning};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationLayout {
    pub level: usize,
    pub start: usize,
    pub end: usize,
    pub rect: Rect,
    pub shadow: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantLayout {
    pub id: String,
    pub label: String,
    pub rect: Rect,
    pub lifeline_x: f64,
    pub lifeline: Vec<LifelineSegment>,
    pub activations: Vec<ActivationLayout>,
    pub color: String,
    pub textcolor: String,
    pub linecolor: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayout {
    pub text: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteLayout {
    pub text: String,
    pub rect: Rect,
    /// Folded-corner outline.
    pub shape: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLayout {
    pub order: usize,
    pub row: usize,
    pub from: String,
    pub to: String,
    pub heading: Heading,
    pub style: LineStyle,
    pub asynchronous: bool,
    pub baseline: f64,
    pub shaft: Vec<Point>,
    pub head: [Point; 3],
    pub failed_mark: Vec<[Point; 2]>,
    pub label: Option<TextLayout>,
    pub left_note: Option<NoteLayout>,
    pub right_note: Option<NoteLayout>,
    pub color: String,
    pub textcolor: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorLayout {
    pub kind: SeparatorKind,
    pub row: usize,
    pub band: Rect,
    pub label: TextLayout,
    pub lines: Vec<[Point; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentLayout {
    pub kind: FragmentKind,
    pub xlevel: usize,
    pub rect: Rect,
    pub tag: TextLayout,
    pub label: Option<TextLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayout {
    pub rect: Rect,
    pub label: Option<TextLayout>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceLayout {
    pub size: Size,
    pub font_size: f64,
    pub shadow_style: ShadowStyle,
    pub shadow_offset: Point,
    pub note_color: String,
    pub participants: Vec<ParticipantLayout>,
    pub messages: Vec<MessageLayout>,
    pub separators: Vec<SeparatorLayout>,
    pub fragments: Vec<FragmentLayout>,
    pub groups: Vec<GroupLayout>,
    /// Layout-time warnings only; model warnings stay on the diagram.
    pub warnings: Vec<Warning>,
}

impl SequenceLayout {
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }
}
