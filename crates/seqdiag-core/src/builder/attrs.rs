use crate::ast::Attr;
use crate::diagnostics::Warning;
use crate::model::{DiagramSettings, Group, LineStyle, Participant, ShadowStyle};

use super::{EdgeDir, EdgeDraft, FragmentDraft};

/// `name -> (dir, style, asynchronous)`; `None` leaves the current style alone.
pub(super) fn arrow_def(token: &str) -> Option<(EdgeDir, Option<LineStyle>, bool)> {
    let def = match token.to_ascii_lowercase().as_str() {
        "both" | "=>" => (EdgeDir::Both, None, false),
        "forward" | "->" => (EdgeDir::Forward, None, false),
        "-->" => (EdgeDir::Forward, Some(LineStyle::Dashed), false),
        "->>" => (EdgeDir::Forward, None, true),
        "-->>" => (EdgeDir::Forward, Some(LineStyle::Dashed), true),
        "back" | "<-" => (EdgeDir::Back, None, false),
        "<--" => (EdgeDir::Back, Some(LineStyle::Dashed), false),
        "<<-" => (EdgeDir::Back, None, true),
        "<<--" => (EdgeDir::Back, Some(LineStyle::Dashed), true),
        _ => return None,
    };
    Some(def)
}

/// Flag-style attributes: a bare name or any value except an explicit negative is `true`.
fn flag(attr: &Attr) -> bool {
    match attr.value.as_deref() {
        None => true,
        Some(v) => !matches!(
            v.to_ascii_lowercase().as_str(),
            "false" | "no" | "off" | "0"
        ),
    }
}

fn text(attr: &Attr) -> String {
    attr.value.clone().unwrap_or_default()
}

fn number(attr: &Attr, warnings: &mut Vec<Warning>) -> Option<f64> {
    let raw = attr.value.as_deref().unwrap_or_default();
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            Warning::InvalidAttributeValue {
                name: attr.name.clone(),
                value: raw.to_string(),
            }
            .record(warnings);
            None
        }
    }
}

fn unknown(target: &str, attr: &Attr, warnings: &mut Vec<Warning>) {
    Warning::UnknownAttribute {
        target: target.to_string(),
        name: attr.name.clone(),
    }
    .record(warnings);
}

pub(super) fn set_edge_dir(edge: &mut EdgeDraft, token: &str, warnings: &mut Vec<Warning>) {
    match arrow_def(token) {
        Some((dir, style, asynchronous)) => {
            edge.dir = dir;
            if let Some(style) = style {
                edge.proto.style = style;
            }
            edge.proto.asynchronous = asynchronous;
        }
        None => Warning::UnknownEdgeDirection {
            token: token.to_string(),
        }
        .record(warnings),
    }
}

/// Returns the class name when the attribute is `class = NAME`; the caller expands it.
pub(super) fn apply_participant_attr<'a>(
    participant: &mut Participant,
    attr: &'a Attr,
    warnings: &mut Vec<Warning>,
) -> Option<&'a str> {
    match attr.name.as_str() {
        "label" => participant.label = text(attr),
        "color" => participant.color = attr.value.clone(),
        "textcolor" => participant.textcolor = attr.value.clone(),
        "linecolor" => participant.linecolor = attr.value.clone(),
        "fontsize" => participant.fontsize = number(attr, warnings),
        "activated" => participant.activated = flag(attr),
        "class" => return attr.value.as_deref(),
        _ => unknown("node", attr, warnings),
    }
    None
}

/// Returns the class name when the attribute is `class = NAME`; the caller expands it.
pub(super) fn apply_edge_attr<'a>(
    edge: &mut EdgeDraft,
    attr: &'a Attr,
    warnings: &mut Vec<Warning>,
) -> Option<&'a str> {
    if attr.name == "dir" {
        set_edge_dir(edge, &text(attr), warnings);
        return None;
    }

    let m = &mut edge.proto;
    match attr.name.as_str() {
        "label" => m.label = attr.value.clone(),
        "color" => m.color = attr.value.clone(),
        "textcolor" => m.textcolor = attr.value.clone(),
        "fontsize" => m.fontsize = number(attr, warnings),
        "style" => match attr.value.as_deref().and_then(LineStyle::parse) {
            Some(style) => m.style = style,
            None => Warning::InvalidAttributeValue {
                name: attr.name.clone(),
                value: text(attr),
            }
            .record(warnings),
        },
        "note" | "rightnote" => m.right_note = attr.value.clone(),
        "leftnote" => m.left_note = attr.value.clone(),
        "diagonal" => m.diagonal = flag(attr),
        "async" => m.asynchronous = flag(attr),
        "return" => m.return_label = attr.value.clone(),
        "failed" => m.failed = flag(attr),
        "activate" => m.activate = flag(attr),
        "noactivate" => m.activate = !flag(attr),
        "class" => return attr.value.as_deref(),
        _ => unknown("edge", attr, warnings),
    }
    None
}

pub(super) fn apply_group_attr(group: &mut Group, attr: &Attr, warnings: &mut Vec<Warning>) {
    match attr.name.as_str() {
        "label" => group.label = attr.value.clone(),
        "color" => group.color = attr.value.clone(),
        _ => unknown("group", attr, warnings),
    }
}

pub(super) fn apply_fragment_attr(
    fragment: &mut FragmentDraft,
    attr: &Attr,
    warnings: &mut Vec<Warning>,
) {
    match attr.name.as_str() {
        "label" => fragment.label = attr.value.clone(),
        _ => unknown(fragment.kind.as_str(), attr, warnings),
    }
}

pub(super) fn apply_diagram_attr(
    settings: &mut DiagramSettings,
    attr: &Attr,
    warnings: &mut Vec<Warning>,
) {
    match attr.name.as_str() {
        "node_width" => settings.node_width = number(attr, warnings),
        "node_height" => settings.node_height = number(attr, warnings),
        "span_width" => settings.span_width = number(attr, warnings),
        "span_height" => settings.span_height = number(attr, warnings),
        "edge_length" => settings.edge_length = number(attr, warnings),
        "edge_height" => {
            Warning::DeprecatedAttribute {
                name: "edge_height".to_string(),
                replacement: "span_height".to_string(),
            }
            .record(warnings);
            settings.span_height = number(attr, warnings);
        }
        "activation" => {
            let value = text(attr);
            if value.eq_ignore_ascii_case("none") {
                settings.activation = false;
            } else {
                Warning::UnknownActivationStyle { value }.record(warnings);
            }
        }
        "autonumber" => settings.autonumber = flag(attr),
        "default_fontsize" => settings.default_fontsize = number(attr, warnings),
        "default_node_color" => settings.default_node_color = text(attr),
        "default_group_color" => settings.default_group_color = text(attr),
        "default_linecolor" => settings.default_linecolor = text(attr),
        "default_textcolor" => settings.default_textcolor = text(attr),
        "default_note_color" => settings.default_note_color = text(attr),
        "shadow_style" => match ShadowStyle::parse(&text(attr)) {
            Some(style) => settings.shadow_style = style,
            None => Warning::InvalidAttributeValue {
                name: attr.name.clone(),
                value: text(attr),
            }
            .record(warnings),
        },
        _ => unknown("diagram", attr, warnings),
    }
}
