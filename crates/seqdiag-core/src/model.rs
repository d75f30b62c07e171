//! Diagram model: built once per render by [`crate::builder`], read-only afterwards.
//!
//! Participants are stored in column order, so a [`ParticipantId`] doubles as
//! the participant's column index.

use crate::ast::{FragmentKind, SeparatorKind};
use crate::diagnostics::Warning;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

macro_rules! index_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

index_id!(ParticipantId);
index_id!(MessageId);
index_id!(SeparatorId);
index_id!(FragmentId);
index_id!(GroupId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowStyle {
    None,
    Solid,
    #[default]
    Blur,
}

impl ShadowStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "solid" => Some(Self::Solid),
            "blur" => Some(Self::Blur),
            _ => None,
        }
    }
}

/// Logical direction of a materialized message. `both` edges are split into
/// a `Forward` + `Back` pair by the builder and never reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDir {
    Forward,
    Back,
}

/// Rendered direction, derived from the columns of the two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    Left,
    Right,
    SelfLoop,
}

/// A closed interval of rows during which an activation bar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub level: usize,
    pub start: usize,
    pub end: usize,
}

impl Activation {
    pub fn lifetime(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, row: usize) -> bool {
        self.start <= row && row <= self.end
    }

    pub fn overlaps(&self, other: &Activation) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub label: String,
    pub column: usize,
    pub group: Option<GroupId>,
    /// Marked "always active": active-count starts at 1.
    pub activated: bool,
    pub color: Option<String>,
    pub textcolor: Option<String>,
    pub linecolor: Option<String>,
    pub fontsize: Option<f64>,
    /// Sorted by `(level, start)`.
    pub activations: Vec<Activation>,
}

impl Participant {
    /// Deepest activation level covering `row`, if any.
    pub fn activation_level_at(&self, row: usize) -> Option<usize> {
        self.activations
            .iter()
            .filter(|a| a.contains(row))
            .map(|a| a.level)
            .max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub dir: MessageDir,
    /// Dense over messages only.
    pub order: usize,
    /// Dense over messages and separators.
    pub row: usize,
    pub label: Option<String>,
    pub style: LineStyle,
    pub asynchronous: bool,
    pub diagonal: bool,
    pub failed: bool,
    pub activate: bool,
    pub left_note: Option<String>,
    pub right_note: Option<String>,
    pub return_label: Option<String>,
    pub color: Option<String>,
    pub textcolor: Option<String>,
    pub fontsize: Option<f64>,
}

impl Message {
    pub fn left(&self) -> ParticipantId {
        self.from.min(self.to)
    }

    pub fn right(&self) -> ParticipantId {
        self.from.max(self.to)
    }

    pub fn is_self(&self) -> bool {
        self.from == self.to
    }

    pub fn heading(&self) -> Heading {
        match (self.from.cmp(&self.to), self.dir) {
            (std::cmp::Ordering::Equal, _) => Heading::SelfLoop,
            (std::cmp::Ordering::Less, MessageDir::Forward)
            | (std::cmp::Ordering::Greater, MessageDir::Back) => Heading::Right,
            _ => Heading::Left,
        }
    }

    /// The participant the arrowhead points at.
    pub fn receiver(&self) -> ParticipantId {
        match self.dir {
            MessageDir::Forward => self.to,
            MessageDir::Back => self.from,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    pub kind: SeparatorKind,
    pub label: String,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub label: Option<String>,
    /// Nesting depth; root fragments are level 1.
    pub xlevel: usize,
    pub ylevel_top: usize,
    pub ylevel_bottom: usize,
    pub messages: Vec<MessageId>,
    pub first_row: usize,
    pub last_row: usize,
    pub first_column: usize,
    pub last_column: usize,
}

impl Fragment {
    pub fn column_count(&self) -> usize {
        self.last_column - self.first_column + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<String>,
    pub label: Option<String>,
    pub color: Option<String>,
    /// Contiguous, in column order.
    pub members: Vec<ParticipantId>,
}

impl Group {
    pub fn first_column(&self) -> usize {
        self.members.first().map(|p| p.index()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RowItem {
    Message(MessageId),
    Separator(SeparatorId),
}

/// Diagram-level attributes. Size overrides are applied once by the layout
/// engine when it is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSettings {
    pub node_width: Option<f64>,
    pub node_height: Option<f64>,
    pub span_width: Option<f64>,
    pub span_height: Option<f64>,
    pub edge_length: Option<f64>,
    pub activation: bool,
    pub autonumber: bool,
    pub default_fontsize: Option<f64>,
    pub default_node_color: String,
    pub default_group_color: String,
    pub default_linecolor: String,
    pub default_textcolor: String,
    pub default_note_color: String,
    pub shadow_style: ShadowStyle,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            node_width: None,
            node_height: None,
            span_width: None,
            span_height: None,
            edge_length: None,
            activation: true,
            autonumber: false,
            default_fontsize: None,
            default_node_color: "#ffffff".to_string(),
            default_group_color: "#f39800".to_string(),
            default_linecolor: "#000000".to_string(),
            default_textcolor: "#000000".to_string(),
            default_note_color: "#ffb6c1".to_string(),
            shadow_style: ShadowStyle::Blur,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub id: Option<String>,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    pub separators: Vec<Separator>,
    pub rows: Vec<RowItem>,
    pub fragments: Vec<Fragment>,
    pub groups: Vec<Group>,
    pub settings: DiagramSettings,
    pub warnings: Vec<Warning>,
}

impl Diagram {
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id.0)
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(id.0)
    }

    pub fn separator(&self, id: SeparatorId) -> Option<&Separator> {
        self.separators.get(id.0)
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.get(id.0)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The message occupying `row`, if that row is not a separator.
    pub fn message_at_row(&self, row: usize) -> Option<&Message> {
        match self.rows.get(row)? {
            RowItem::Message(id) => self.message(*id),
            RowItem::Separator(_) => None,
        }
    }

    pub fn participant_name(&self, id: ParticipantId) -> &str {
        self.participant(id).map(|p| p.id.as_str()).unwrap_or("")
    }
}
