use crate::config::LayoutConfig;
use crate::metrics::{NoteSide, SequenceMetrics};
use crate::model::{
    ActivationLayout, FragmentLayout, GroupLayout, MessageLayout, NoteLayout, ParticipantLayout,
    SeparatorLayout, SequenceLayout, TextLayout,
};
use crate::text::TextMeasurer;
use crate::Result;
use seqdiag_core::{Diagram, FragmentId, GroupId, MessageId, ParticipantId, SeparatorId};

/// Resolves every box, line and label of `diagram` into a [`SequenceLayout`].
pub fn layout_sequence_diagram(
    diagram: &Diagram,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Result<SequenceLayout> {
    let metrics = SequenceMetrics::new(diagram, config, measurer);
    let config = metrics.config();
    let settings = &diagram.settings;

    let mut participants = Vec::with_capacity(diagram.participants.len());
    for (idx, p) in diagram.participants.iter().enumerate() {
        let id = ParticipantId(idx);
        let mut activations = Vec::with_capacity(p.activations.len());
        for a in &p.activations {
            activations.push(ActivationLayout {
                level: a.level,
                start: a.start,
                end: a.end,
                rect: metrics.activation_box(id, a)?,
                shadow: metrics.activation_shadow(id, a)?,
            });
        }
        participants.push(ParticipantLayout {
            id: p.id.clone(),
            label: p.label.clone(),
            rect: metrics.participant_box(id)?,
            lifeline_x: metrics.column_position(id)?,
            lifeline: metrics.lifeline(id)?,
            activations,
            color: p
                .color
                .clone()
                .unwrap_or_else(|| settings.default_node_color.clone()),
            textcolor: p
                .textcolor
                .clone()
                .unwrap_or_else(|| settings.default_textcolor.clone()),
            linecolor: p
                .linecolor
                .clone()
                .unwrap_or_else(|| settings.default_linecolor.clone()),
            font_size: p.fontsize.unwrap_or(config.font_size),
        });
    }

    let mut messages = Vec::with_capacity(diagram.messages.len());
    for (idx, m) in diagram.messages.iter().enumerate() {
        let id = MessageId(idx);
        let label = match (&m.label, metrics.label_box(id)?) {
            (Some(text), Some(rect)) => Some(TextLayout {
                text: text.clone(),
                rect,
            }),
            _ => None,
        };
        let note = |side: NoteSide, text: &Option<String>| -> Result<Option<NoteLayout>> {
            let (Some(text), Some(rect)) = (text, metrics.note_box(id, side)?) else {
                return Ok(None);
            };
            Ok(Some(NoteLayout {
                text: text.clone(),
                rect,
                shape: metrics.note_shape(id, side)?,
            }))
        };
        messages.push(MessageLayout {
            order: m.order,
            row: m.row,
            from: diagram.participant_name(m.from).to_string(),
            to: diagram.participant_name(m.to).to_string(),
            heading: m.heading(),
            style: m.style,
            asynchronous: m.asynchronous,
            baseline: metrics.message_baseline(id)?,
            shaft: metrics.edge_shaft(id)?,
            head: metrics.edge_head(id)?,
            failed_mark: metrics.failed_mark(id)?,
            label,
            left_note: note(NoteSide::Left, &m.left_note)?,
            right_note: note(NoteSide::Right, &m.right_note)?,
            color: m
                .color
                .clone()
                .unwrap_or_else(|| settings.default_linecolor.clone()),
            textcolor: m
                .textcolor
                .clone()
                .unwrap_or_else(|| settings.default_textcolor.clone()),
            font_size: m.fontsize.unwrap_or(config.font_size),
        });
    }

    let mut separators = Vec::with_capacity(diagram.separators.len());
    for (idx, s) in diagram.separators.iter().enumerate() {
        let geometry = metrics.separator_geometry(SeparatorId(idx))?;
        separators.push(SeparatorLayout {
            kind: s.kind,
            row: s.row,
            band: geometry.band,
            label: TextLayout {
                text: s.label.clone(),
                rect: geometry.label_box,
            },
            lines: geometry.lines,
        });
    }

    let mut fragments = Vec::with_capacity(diagram.fragments.len());
    for (idx, f) in diagram.fragments.iter().enumerate() {
        let id = FragmentId(idx);
        let label = match (&f.label, metrics.fragment_label_box(id, measurer)?) {
            (Some(text), Some(rect)) => Some(TextLayout {
                text: text.clone(),
                rect,
            }),
            _ => None,
        };
        fragments.push(FragmentLayout {
            kind: f.kind,
            xlevel: f.xlevel,
            rect: metrics.fragment_box(id)?,
            tag: TextLayout {
                text: f.kind.as_str().to_string(),
                rect: metrics.fragment_kind_box(id, measurer)?,
            },
            label,
        });
    }

    let mut groups = Vec::with_capacity(diagram.groups.len());
    for (idx, g) in diagram.groups.iter().enumerate() {
        let id = GroupId(idx);
        let label = match &g.label {
            Some(text) => Some(TextLayout {
                text: text.clone(),
                rect: metrics.group_label_box(id)?,
            }),
            None => None,
        };
        groups.push(GroupLayout {
            rect: metrics.group_box(id)?,
            label,
            color: g
                .color
                .clone()
                .unwrap_or_else(|| settings.default_group_color.clone()),
        });
    }

    Ok(SequenceLayout {
        size: metrics.page_size(),
        font_size: config.font_size,
        shadow_style: settings.shadow_style,
        shadow_offset: config.shadow_offset,
        note_color: settings.default_note_color.clone(),
        participants,
        messages,
        separators,
        fragments,
        groups,
        warnings: metrics.warnings().to_vec(),
    })
}
