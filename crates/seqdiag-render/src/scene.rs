//! Renderer-neutral drawing list built from a [`SequenceLayout`].
//!
//! Items are emitted in paint order: anything later may cover anything
//! earlier. [`Layer`] names that order and is the contract back-ends rely on.

use crate::geom::{Point, Rect};
use crate::model::{SequenceLayout, TextLayout};
use seqdiag_core::{LineStyle, ShadowStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Group,
    Shadow,
    Participant,
    Lifeline,
    Activation,
    Fragment,
    Message,
    Note,
    Label,
    Separator,
    GroupLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Rect {
        rect: Rect,
        fill: Option<String>,
        stroke: Option<String>,
        blur: bool,
    },
    Line {
        points: Vec<Point>,
        stroke: String,
        style: LineStyle,
    },
    Polygon {
        points: Vec<Point>,
        fill: Option<String>,
        stroke: Option<String>,
        blur: bool,
    },
    Text {
        rect: Rect,
        text: String,
        color: String,
        font_size: f64,
        align: TextAlign,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    pub layer: Layer,
    pub op: DrawOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub items: Vec<SceneItem>,
}

const SHADOW_COLOR: &str = "#000000";
const ACTIVATION_COLOR: &str = "moccasin";
const LINE_COLOR: &str = "#000000";

impl Scene {
    pub fn from_layout(layout: &SequenceLayout) -> Self {
        let mut scene = SceneBuilder {
            items: Vec::new(),
            layout,
        };
        scene.groups();
        scene.shadows();
        scene.participants();
        scene.lifelines();
        scene.activations();
        scene.fragments();
        scene.messages();
        scene.notes();
        scene.labels();
        scene.separators();
        scene.group_labels();

        Self {
            width: layout.size.width,
            height: layout.size.height,
            items: scene.items,
        }
    }

    pub fn ops(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> + '_ {
        self.items
            .iter()
            .filter(move |item| item.layer == layer)
            .map(|item| &item.op)
    }
}

struct SceneBuilder<'a> {
    items: Vec<SceneItem>,
    layout: &'a SequenceLayout,
}

impl SceneBuilder<'_> {
    fn push(&mut self, layer: Layer, op: DrawOp) {
        self.items.push(SceneItem { layer, op });
    }

    fn text(&mut self, layer: Layer, label: &TextLayout, color: &str, font_size: f64, align: TextAlign) {
        if label.text.is_empty() {
            return;
        }
        self.push(
            layer,
            DrawOp::Text {
                rect: label.rect,
                text: label.text.clone(),
                color: color.to_string(),
                font_size,
                align,
            },
        );
    }

    fn groups(&mut self) {
        let layout = self.layout;
        for group in &layout.groups {
            self.push(
                Layer::Group,
                DrawOp::Rect {
                    rect: group.rect,
                    fill: Some(group.color.clone()),
                    stroke: None,
                    blur: false,
                },
            );
        }
    }

    fn shadows(&mut self) {
        let blur = match self.layout.shadow_style {
            ShadowStyle::None => return,
            ShadowStyle::Solid => false,
            ShadowStyle::Blur => true,
        };
        let layout = self.layout;
        for p in &layout.participants {
            for a in &p.activations {
                self.push(
                    Layer::Shadow,
                    DrawOp::Rect {
                        rect: a.shadow,
                        fill: Some(SHADOW_COLOR.to_string()),
                        stroke: None,
                        blur,
                    },
                );
            }
        }
        let Point { x: dx, y: dy } = layout.shadow_offset;
        for m in &layout.messages {
            for note in [&m.left_note, &m.right_note].into_iter().flatten() {
                self.push(
                    Layer::Shadow,
                    DrawOp::Polygon {
                        points: note.shape.iter().map(|p| p.offset(dx, dy)).collect(),
                        fill: Some(SHADOW_COLOR.to_string()),
                        stroke: None,
                        blur,
                    },
                );
            }
        }
        for p in &layout.participants {
            self.push(
                Layer::Shadow,
                DrawOp::Rect {
                    rect: p.rect.offset(dx, dy),
                    fill: Some(SHADOW_COLOR.to_string()),
                    stroke: None,
                    blur,
                },
            );
        }
    }

    fn participants(&mut self) {
        let layout = self.layout;
        for p in &layout.participants {
            self.push(
                Layer::Participant,
                DrawOp::Rect {
                    rect: p.rect,
                    fill: Some(p.color.clone()),
                    stroke: Some(p.linecolor.clone()),
                    blur: false,
                },
            );
            let label = TextLayout {
                text: p.label.clone(),
                rect: p.rect,
            };
            self.text(Layer::Participant, &label, &p.textcolor, p.font_size, TextAlign::Center);
        }
    }

    fn lifelines(&mut self) {
        let layout = self.layout;
        for p in &layout.participants {
            for segment in &p.lifeline {
                self.push(
                    Layer::Lifeline,
                    DrawOp::Line {
                        points: vec![segment.from, segment.to],
                        stroke: p.linecolor.clone(),
                        style: segment.style,
                    },
                );
            }
        }
    }

    fn activations(&mut self) {
        let layout = self.layout;
        for p in &layout.participants {
            for a in &p.activations {
                self.push(
                    Layer::Activation,
                    DrawOp::Rect {
                        rect: a.rect,
                        fill: Some(ACTIVATION_COLOR.to_string()),
                        stroke: Some(p.linecolor.clone()),
                        blur: false,
                    },
                );
            }
        }
    }

    fn fragments(&mut self) {
        let layout = self.layout;
        for f in &layout.fragments {
            self.push(
                Layer::Fragment,
                DrawOp::Rect {
                    rect: f.rect,
                    fill: None,
                    stroke: Some(LINE_COLOR.to_string()),
                    blur: false,
                },
            );
            let tag = f.tag.rect;
            let cut = (tag.y2 - tag.y1) / 3.0;
            self.push(
                Layer::Fragment,
                DrawOp::Polygon {
                    points: vec![
                        Point::new(tag.x1, tag.y1),
                        Point::new(tag.x2 + cut, tag.y1),
                        Point::new(tag.x2 + cut, tag.y2 - cut),
                        Point::new(tag.x2, tag.y2),
                        Point::new(tag.x1, tag.y2),
                    ],
                    fill: Some("#ffffff".to_string()),
                    stroke: Some(LINE_COLOR.to_string()),
                    blur: false,
                },
            );
            self.text(Layer::Fragment, &f.tag, LINE_COLOR, layout.font_size, TextAlign::Center);
            if let Some(label) = &f.label {
                self.text(Layer::Fragment, label, LINE_COLOR, layout.font_size, TextAlign::Left);
            }
        }
    }

    fn messages(&mut self) {
        let layout = self.layout;
        for m in &layout.messages {
            self.push(
                Layer::Message,
                DrawOp::Line {
                    points: m.shaft.clone(),
                    stroke: m.color.clone(),
                    style: m.style,
                },
            );
            if m.asynchronous {
                let [tip, a, b] = m.head;
                self.push(
                    Layer::Message,
                    DrawOp::Line {
                        points: vec![a, tip, b],
                        stroke: m.color.clone(),
                        style: LineStyle::Solid,
                    },
                );
            } else {
                self.push(
                    Layer::Message,
                    DrawOp::Polygon {
                        points: m.head.to_vec(),
                        fill: Some(m.color.clone()),
                        stroke: Some(m.color.clone()),
                        blur: false,
                    },
                );
            }
            for [from, to] in &m.failed_mark {
                self.push(
                    Layer::Message,
                    DrawOp::Line {
                        points: vec![*from, *to],
                        stroke: m.color.clone(),
                        style: LineStyle::Solid,
                    },
                );
            }
        }
    }

    fn notes(&mut self) {
        let layout = self.layout;
        for m in &layout.messages {
            for note in [&m.left_note, &m.right_note].into_iter().flatten() {
                self.push(
                    Layer::Note,
                    DrawOp::Polygon {
                        points: note.shape.clone(),
                        fill: Some(layout.note_color.clone()),
                        stroke: Some(LINE_COLOR.to_string()),
                        blur: false,
                    },
                );
                let label = TextLayout {
                    text: note.text.clone(),
                    rect: note.rect,
                };
                self.text(Layer::Note, &label, &m.textcolor, m.font_size, TextAlign::Left);
            }
        }
    }

    fn labels(&mut self) {
        let layout = self.layout;
        for m in &layout.messages {
            if let Some(label) = &m.label {
                self.text(Layer::Label, label, &m.textcolor, m.font_size, TextAlign::Left);
            }
        }
    }

    fn separators(&mut self) {
        let layout = self.layout;
        for s in &layout.separators {
            for [from, to] in &s.lines {
                self.push(
                    Layer::Separator,
                    DrawOp::Line {
                        points: vec![*from, *to],
                        stroke: LINE_COLOR.to_string(),
                        style: LineStyle::Solid,
                    },
                );
            }
            self.push(
                Layer::Separator,
                DrawOp::Rect {
                    rect: s.label.rect,
                    fill: Some("#ffffff".to_string()),
                    stroke: Some(LINE_COLOR.to_string()),
                    blur: false,
                },
            );
            self.text(Layer::Separator, &s.label, LINE_COLOR, layout.font_size, TextAlign::Center);
        }
    }

    fn group_labels(&mut self) {
        let layout = self.layout;
        for g in &layout.groups {
            if let Some(label) = &g.label {
                self.text(Layer::GroupLabel, label, LINE_COLOR, layout.font_size, TextAlign::Center);
            }
        }
    }
}
