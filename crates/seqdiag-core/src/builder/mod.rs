//! Tree builder: one forward pass over a parsed [`Document`] producing a [`Diagram`].
//!
//! All identity caches (participants by name, classes, attribute defaults) live
//! on a [`TreeBuilder`] value that is created per call to [`build`] and dropped
//! with it, so repeated builds in one process never share state.

mod activity;
mod attrs;

use crate::ast::{
    Attr, DefaultsStmt, DefaultsTarget, Document, ExtensionKind, ExtensionStmt, FragmentKind,
    FragmentStmt, GroupStmt, NodeStmt, Position, Statement,
};
use crate::diagnostics::Warning;
use crate::model::{
    Diagram, DiagramSettings, Fragment, Group, GroupId, LineStyle, Message, MessageDir, MessageId,
    Participant, ParticipantId, RowItem, Separator, SeparatorId,
};
use crate::{Error, Result};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

pub fn build(document: &Document) -> Result<Diagram> {
    let mut builder = TreeBuilder {
        diagram_id: document.id.clone(),
        ..TreeBuilder::default()
    };
    builder.walk(&document.statements, Scope::Diagram)?;
    Ok(builder.finish())
}

/// Direction as written on an edge statement, before `both` is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeDir {
    Forward,
    Back,
    Both,
}

/// An edge statement with its attributes resolved, not yet placed on a row.
#[derive(Debug, Clone)]
struct EdgeDraft {
    dir: EdgeDir,
    proto: Message,
}

impl EdgeDraft {
    fn new(from: ParticipantId, to: ParticipantId) -> Self {
        Self {
            dir: EdgeDir::Forward,
            proto: Message {
                from,
                to,
                dir: MessageDir::Forward,
                order: 0,
                row: 0,
                label: None,
                style: LineStyle::Solid,
                asynchronous: false,
                diagonal: false,
                failed: false,
                activate: true,
                left_note: None,
                right_note: None,
                return_label: None,
                color: None,
                textcolor: None,
                fontsize: None,
            },
        }
    }

    /// A failed call never activates its receiver, and neither does a
    /// one-way call to self.
    fn normalize(&mut self) {
        if self.proto.failed || (self.proto.is_self() && self.dir != EdgeDir::Both) {
            self.proto.activate = false;
        }
    }

    fn call(&self) -> Message {
        Message {
            dir: MessageDir::Forward,
            ..self.proto.clone()
        }
    }

    fn reply(&self) -> Message {
        let mut message = Message {
            dir: MessageDir::Back,
            ..self.proto.clone()
        };
        if self.dir == EdgeDir::Both {
            message.style = LineStyle::Dashed;
            message.label = self.proto.return_label.clone();
            message.left_note = None;
            message.right_note = None;
        }
        message
    }
}

#[derive(Debug, Clone)]
struct FragmentDraft {
    kind: FragmentKind,
    label: Option<String>,
    xlevel: usize,
    /// Rows of every message emitted while this fragment was open, nested ones included.
    rows: Vec<usize>,
    position: Position,
}

#[derive(Debug, Clone)]
enum Item {
    Message(Message),
    Separator(Separator),
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Diagram,
    Group(usize),
    EdgeBlock,
    Fragment(usize),
}

impl Scope {
    fn name(self) -> &'static str {
        match self {
            Scope::Diagram => "diagram",
            Scope::Group(_) => "group",
            Scope::EdgeBlock => "edge block",
            Scope::Fragment(_) => "fragment",
        }
    }

    fn reject(self, stmt: &Statement) -> Error {
        Error::UnexpectedStatement {
            kind: stmt.kind_name(),
            context: self.name(),
        }
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    diagram_id: Option<String>,
    /// Keyed by participant id, in first-encounter order.
    participants: IndexMap<String, Participant>,
    /// Members hold encounter indices until [`TreeBuilder::finish`] assigns columns.
    groups: Vec<Group>,
    items: Vec<Item>,
    fragments: Vec<FragmentDraft>,
    open_fragments: Vec<usize>,
    classes: FxHashMap<String, Vec<Attr>>,
    node_defaults: Vec<Attr>,
    edge_defaults: Vec<Attr>,
    settings: DiagramSettings,
    warnings: Vec<Warning>,
}

impl TreeBuilder {
    /// Attribute, defaults and extension statements of a block take effect
    /// before any of its other statements, wherever they are written.
    fn walk(&mut self, statements: &[Statement], scope: Scope) -> Result<()> {
        let (declarations, rest): (Vec<&Statement>, Vec<&Statement>) =
            statements.iter().partition(|stmt| stmt.is_declaration());
        for stmt in declarations.into_iter().chain(rest) {
            match stmt {
                Statement::Node(node) => match scope {
                    Scope::Diagram | Scope::Fragment(_) => self.node(node, None)?,
                    Scope::Group(g) => self.node(node, Some(g))?,
                    Scope::EdgeBlock => return Err(scope.reject(stmt)),
                },
                Statement::Edge(edge) => match scope {
                    Scope::Diagram | Scope::EdgeBlock | Scope::Fragment(_) => self
                        .instantiate_edge(
                            &edge.from,
                            &edge.edge_type,
                            &edge.to,
                            &edge.followers,
                            &edge.attrs,
                            edge.block.as_deref(),
                        )?,
                    Scope::Group(_) => return Err(scope.reject(stmt)),
                },
                Statement::Group(group) => match scope {
                    Scope::Diagram => self.group(group)?,
                    _ => return Err(scope.reject(stmt)),
                },
                Statement::Separator(sep) => match scope {
                    Scope::Diagram | Scope::EdgeBlock | Scope::Fragment(_) => {
                        self.items.push(Item::Separator(Separator {
                            kind: sep.kind,
                            label: sep.label.clone(),
                            row: 0,
                        }));
                    }
                    Scope::Group(_) => return Err(scope.reject(stmt)),
                },
                Statement::Fragment(fragment) => match scope {
                    Scope::Diagram | Scope::EdgeBlock | Scope::Fragment(_) => {
                        self.fragment(fragment)?
                    }
                    Scope::Group(_) => return Err(scope.reject(stmt)),
                },
                Statement::Attribute(attr) => match scope {
                    Scope::Diagram => {
                        attrs::apply_diagram_attr(&mut self.settings, attr, &mut self.warnings)
                    }
                    Scope::Group(g) => {
                        attrs::apply_group_attr(&mut self.groups[g], attr, &mut self.warnings)
                    }
                    Scope::Fragment(f) => {
                        attrs::apply_fragment_attr(&mut self.fragments[f], attr, &mut self.warnings)
                    }
                    Scope::EdgeBlock => return Err(scope.reject(stmt)),
                },
                Statement::Defaults(defaults) => match scope {
                    Scope::Diagram => self.defaults(defaults),
                    _ => return Err(scope.reject(stmt)),
                },
                Statement::Extension(ext) => match scope {
                    Scope::Diagram => self.extension(ext),
                    _ => return Err(scope.reject(stmt)),
                },
            }
        }
        Ok(())
    }

    /// Index of the participant named `name`, creating it on first encounter.
    fn participant(&mut self, name: &str) -> usize {
        if let Some(idx) = self.participants.get_index_of(name) {
            return idx;
        }
        let (idx, _) = self.participants.insert_full(
            name.to_string(),
            Participant {
                id: name.to_string(),
                label: name.to_string(),
                ..Participant::default()
            },
        );
        let defaults = self.node_defaults.clone();
        self.apply_participant_attrs(idx, &defaults);
        idx
    }

    fn apply_participant_attrs(&mut self, idx: usize, attrs: &[Attr]) {
        let Some((_, participant)) = self.participants.get_index_mut(idx) else {
            return;
        };
        for attr in attrs {
            if let Some(class) = attrs::apply_participant_attr(participant, attr, &mut self.warnings)
            {
                for class_attr in class_attrs(&self.classes, class, &mut self.warnings) {
                    attrs::apply_participant_attr(participant, class_attr, &mut self.warnings);
                }
            }
        }
    }

    fn apply_edge_attrs(&mut self, edge: &mut EdgeDraft, attrs: &[Attr]) {
        for attr in attrs {
            if let Some(class) = attrs::apply_edge_attr(edge, attr, &mut self.warnings) {
                for class_attr in class_attrs(&self.classes, class, &mut self.warnings) {
                    attrs::apply_edge_attr(edge, class_attr, &mut self.warnings);
                }
            }
        }
    }

    fn node(&mut self, node: &NodeStmt, group: Option<usize>) -> Result<()> {
        let idx = self.participant(&node.id);
        self.apply_participant_attrs(idx, &node.attrs);
        match group {
            Some(g) => self.join_group(idx, g),
            None => Ok(()),
        }
    }

    fn join_group(&mut self, idx: usize, g: usize) -> Result<()> {
        let participant = &mut self.participants[idx];
        match participant.group {
            Some(existing) if existing.index() == g => Ok(()),
            Some(_) => Err(Error::ParticipantInTwoGroups {
                participant: participant.id.clone(),
            }),
            None => {
                participant.group = Some(GroupId(g));
                self.groups[g].members.push(ParticipantId(idx));
                Ok(())
            }
        }
    }

    fn group(&mut self, stmt: &GroupStmt) -> Result<()> {
        let g = self.groups.len();
        self.groups.push(Group {
            id: stmt.id.clone(),
            label: None,
            color: None,
            members: Vec::new(),
        });
        self.walk(&stmt.statements, Scope::Group(g))
    }

    fn fragment(&mut self, stmt: &FragmentStmt) -> Result<()> {
        let f = self.fragments.len();
        let mut draft = FragmentDraft {
            kind: stmt.kind,
            label: None,
            xlevel: self.open_fragments.len() + 1,
            rows: Vec::new(),
            position: stmt.position,
        };
        for attr in &stmt.attrs {
            attrs::apply_fragment_attr(&mut draft, attr, &mut self.warnings);
        }
        self.fragments.push(draft);

        self.open_fragments.push(f);
        let walked = self.walk(&stmt.statements, Scope::Fragment(f));
        self.open_fragments.pop();
        walked
    }

    fn defaults(&mut self, stmt: &DefaultsStmt) {
        match stmt.target {
            DefaultsTarget::Node => self.node_defaults.extend(stmt.attrs.iter().cloned()),
            DefaultsTarget::Edge => self.edge_defaults.extend(stmt.attrs.iter().cloned()),
            DefaultsTarget::Graph => {
                for attr in &stmt.attrs {
                    attrs::apply_diagram_attr(&mut self.settings, attr, &mut self.warnings);
                }
            }
        }
    }

    fn extension(&mut self, stmt: &ExtensionStmt) {
        match stmt.kind {
            ExtensionKind::Class => {
                self.classes.insert(stmt.name.clone(), stmt.attrs.clone());
            }
            ExtensionKind::Plugin => Warning::UnsupportedPlugin {
                name: stmt.name.clone(),
            }
            .record(&mut self.warnings),
        }
    }

    /// Expands `A -> B -> C` greedily: the call for the first pair is emitted,
    /// then the rest of the chain (or the nested block), then the reply.
    fn instantiate_edge(
        &mut self,
        from: &str,
        edge_type: &str,
        to: &str,
        followers: &[(String, String)],
        attrs: &[Attr],
        block: Option<&[Statement]>,
    ) -> Result<()> {
        let from_id = ParticipantId(self.participant(from));
        let to_id = ParticipantId(self.participant(to));

        let mut edge = EdgeDraft::new(from_id, to_id);
        let defaults = self.edge_defaults.clone();
        self.apply_edge_attrs(&mut edge, &defaults);
        attrs::set_edge_dir(&mut edge, edge_type, &mut self.warnings);
        self.apply_edge_attrs(&mut edge, attrs);
        edge.normalize();

        if matches!(edge.dir, EdgeDir::Forward | EdgeDir::Both) {
            self.push_message(edge.call());
        }

        if let Some(((next_type, next_to), rest)) = followers.split_first() {
            self.instantiate_edge(to, next_type, next_to, rest, attrs, block)?;
        } else if let Some(block) = block {
            self.walk(block, Scope::EdgeBlock)?;
        }

        if matches!(edge.dir, EdgeDir::Back | EdgeDir::Both) {
            self.push_message(edge.reply());
        }
        Ok(())
    }

    fn push_message(&mut self, message: Message) {
        let row = self.items.len();
        self.items.push(Item::Message(message));
        for &f in &self.open_fragments {
            self.fragments[f].rows.push(row);
        }
    }

    fn finish(self) -> Diagram {
        let TreeBuilder {
            diagram_id,
            participants,
            groups,
            items,
            fragments: fragment_drafts,
            settings,
            mut warnings,
            ..
        } = self;

        let mut drafts: Vec<Participant> = participants.into_values().collect();
        let order = column_order(&drafts, &groups);
        let mut column_of = vec![0; drafts.len()];
        for (column, &idx) in order.iter().enumerate() {
            column_of[idx] = column;
        }
        let to_column = |id: ParticipantId| ParticipantId(column_of[id.index()]);

        // Groups that ended up with no members are dropped; ids are renumbered.
        let mut group_of = vec![None; groups.len()];
        let mut kept_groups = Vec::new();
        for (old, mut group) in groups.into_iter().enumerate() {
            if group.members.is_empty() {
                continue;
            }
            group.members = group.members.into_iter().map(to_column).collect();
            group.members.sort();
            group_of[old] = Some(GroupId(kept_groups.len()));
            kept_groups.push(group);
        }

        let mut participants: Vec<Participant> = order
            .iter()
            .map(|&idx| std::mem::take(&mut drafts[idx]))
            .collect();
        for (column, participant) in participants.iter_mut().enumerate() {
            participant.column = column;
            participant.group = participant.group.and_then(|g| group_of[g.index()]);
        }

        let mut messages = Vec::new();
        let mut separators = Vec::new();
        let mut rows = Vec::with_capacity(items.len());
        for (row, item) in items.into_iter().enumerate() {
            match item {
                Item::Message(mut message) => {
                    message.row = row;
                    message.order = messages.len();
                    message.from = to_column(message.from);
                    message.to = to_column(message.to);
                    rows.push(RowItem::Message(MessageId(messages.len())));
                    messages.push(message);
                }
                Item::Separator(mut separator) => {
                    separator.row = row;
                    rows.push(RowItem::Separator(SeparatorId(separators.len())));
                    separators.push(separator);
                }
            }
        }

        let mut fragments = Vec::new();
        for draft in fragment_drafts {
            let ids: Vec<MessageId> = draft
                .rows
                .iter()
                .filter_map(|&row| match rows.get(row) {
                    Some(RowItem::Message(id)) => Some(*id),
                    _ => None,
                })
                .collect();
            let (Some(first), Some(last)) = (ids.first(), ids.last()) else {
                Warning::EmptyFragment {
                    fragment: draft.kind.as_str().to_string(),
                    line: draft.position.line,
                    column: draft.position.column,
                }
                .record(&mut warnings);
                continue;
            };
            let first_row = messages[first.index()].row;
            let last_row = messages[last.index()].row;
            let first_column = ids
                .iter()
                .map(|id| messages[id.index()].left().index())
                .min()
                .unwrap_or_default();
            let last_column = ids
                .iter()
                .map(|id| messages[id.index()].right().index())
                .max()
                .unwrap_or_default();
            fragments.push(Fragment {
                kind: draft.kind,
                label: draft.label,
                xlevel: draft.xlevel,
                ylevel_top: 1,
                ylevel_bottom: 1,
                messages: ids,
                first_row,
                last_row,
                first_column,
                last_column,
            });
        }
        assign_ylevels(&mut fragments);

        if settings.activation {
            activity::compute_activations(&mut participants, &messages, &rows, &mut warnings);
        }

        if settings.autonumber {
            for message in &mut messages {
                let label = message.label.take().unwrap_or_default();
                message.label = Some(format!("{}. {}", message.order + 1, label));
            }
        }

        tracing::debug!(
            participants = participants.len(),
            messages = messages.len(),
            separators = separators.len(),
            fragments = fragments.len(),
            "built sequence diagram"
        );

        Diagram {
            id: diagram_id,
            participants,
            messages,
            separators,
            rows,
            fragments,
            groups: kept_groups,
            settings,
            warnings,
        }
    }
}

fn class_attrs<'c>(
    classes: &'c FxHashMap<String, Vec<Attr>>,
    name: &str,
    warnings: &mut Vec<Warning>,
) -> &'c [Attr] {
    match classes.get(name) {
        Some(attrs) => attrs,
        None => {
            Warning::UnknownClass {
                name: name.to_string(),
            }
            .record(warnings);
            &[]
        }
    }
}

/// Encounter indices in column order. The first member of a group pulls the
/// whole group in behind it so groups stay contiguous.
fn column_order(participants: &[Participant], groups: &[Group]) -> Vec<usize> {
    let mut placed = vec![false; participants.len()];
    let mut order = Vec::with_capacity(participants.len());
    let mut place = |idx: usize, order: &mut Vec<usize>| {
        if !placed[idx] {
            placed[idx] = true;
            order.push(idx);
        }
    };

    for (idx, participant) in participants.iter().enumerate() {
        place(idx, &mut order);
        if let Some(group) = participant.group.and_then(|g| groups.get(g.index())) {
            for member in &group.members {
                place(member.index(), &mut order);
            }
        }
    }
    order
}

/// Fragments sharing a first (last) row are stacked; the innermost, most
/// recently opened one sits closest to the content at level 1.
fn assign_ylevels(fragments: &mut [Fragment]) {
    let rows = fragments
        .iter()
        .flat_map(|f| [f.first_row, f.last_row])
        .max()
        .map_or(0, |r| r + 1);
    for row in 0..rows {
        let starting: Vec<usize> = (0..fragments.len())
            .filter(|&f| fragments[f].first_row == row)
            .collect();
        for (level, &f) in starting.iter().rev().enumerate() {
            fragments[f].ylevel_top = level + 1;
        }

        let ending: Vec<usize> = (0..fragments.len())
            .filter(|&f| fragments[f].last_row == row)
            .collect();
        for (level, &f) in ending.iter().rev().enumerate() {
            fragments[f].ylevel_bottom = level + 1;
        }
    }
}
