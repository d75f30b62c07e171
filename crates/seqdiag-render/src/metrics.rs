//! Geometry of a sequence diagram.
//!
//! [`SequenceMetrics`] resolves every size up front: the grid spans and row
//! heights are final once [`SequenceMetrics::new`] returns, and every query
//! afterwards is a pure function of that state.

use crate::config::LayoutConfig;
use crate::geom::{Point, Rect, Size};
use crate::grid::Grid;
use crate::text::{TextMeasurer, TextStyle};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use seqdiag_core::ast::SeparatorKind;
use seqdiag_core::{
    Activation, Diagram, Fragment, FragmentId, Group, GroupId, Heading, LineStyle, Message,
    MessageId, Participant, ParticipantId, RowItem, Separator, SeparatorId, Warning,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteSide {
    Left,
    Right,
}

/// One drawn piece of a lifeline. Delay separators break the line into a
/// dashed run, a dotted gap and another dashed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifelineSegment {
    pub from: Point,
    pub to: Point,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorGeometry {
    /// Full-width band the separator occupies.
    pub band: Rect,
    pub label_box: Rect,
    /// Divider rules; empty for delays.
    pub lines: Vec<[Point; 2]>,
}

pub struct SequenceMetrics<'a> {
    diagram: &'a Diagram,
    config: LayoutConfig,
    grid: Grid,
    inner_span: f64,
    /// Distance from a message row's top to its baseline.
    ascents: Vec<f64>,
    labels: Vec<Size>,
    left_notes: Vec<Size>,
    right_notes: Vec<Size>,
    separator_labels: Vec<Size>,
    warnings: Vec<Warning>,
}

impl<'a> SequenceMetrics<'a> {
    pub fn new(diagram: &'a Diagram, config: &LayoutConfig, measurer: &dyn TextMeasurer) -> Self {
        let config = config.clone().with_diagram(&diagram.settings);
        let columns = diagram.participants.len();
        let mut grid = Grid::new(columns, diagram.row_count() + 1, &config);
        let mut warnings = Vec::new();

        let mut inner_span = config.span_width;
        if let Some(edge_length) = config.edge_length {
            inner_span = edge_length - config.node_width;
            if inner_span < 0.0 {
                Warning::EdgeLengthTooShort { edge_length }.record(&mut warnings);
                inner_span = 0.0;
            }
            for span in grid.span_widths.iter_mut().take(columns).skip(1) {
                *span = inner_span;
            }
        }

        let mut metrics = Self {
            diagram,
            config,
            grid,
            inner_span,
            ascents: vec![0.0; diagram.messages.len()],
            labels: vec![Size::default(); diagram.messages.len()],
            left_notes: vec![Size::default(); diagram.messages.len()],
            right_notes: vec![Size::default(); diagram.messages.len()],
            separator_labels: vec![Size::default(); diagram.separators.len()],
            warnings,
        };
        metrics.widen_for_fragment_borders();
        metrics.measure_rows(measurer);
        metrics.heighten_for_fragments();
        metrics.expand_page_for_notes();

        tracing::debug!(
            participants = columns,
            rows = diagram.row_count(),
            width = metrics.grid.width(),
            height = metrics.grid.height(),
            "computed sequence metrics"
        );
        metrics
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Warnings raised while resolving sizes.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    // Sizing passes, run once from `new`.

    fn widen_for_fragment_borders(&mut self) {
        let mut crossings: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        for fragment in &self.diagram.fragments {
            for row in fragment.first_row..=fragment.last_row {
                *crossings.entry((fragment.first_column, row)).or_default() += 1;
                *crossings.entry((fragment.last_column + 1, row)).or_default() += 1;
            }
        }

        let mut widest = vec![0usize; self.grid.span_widths.len()];
        for ((boundary, _), count) in crossings {
            if let Some(slot) = widest.get_mut(boundary) {
                *slot = (*slot).max(count);
            }
        }
        for (span, count) in self.grid.span_widths.iter_mut().zip(widest) {
            *span += count as f64 * self.config.cellsize;
        }
    }

    fn measure_rows(&mut self, measurer: &dyn TextMeasurer) {
        let cell = self.config.cellsize;
        for (idx, message) in self.diagram.messages.iter().enumerate() {
            let style = self.message_style(message);
            let max_width = if message.is_self() {
                self.self_right(message) - self.lifeline_x(message.from)
            } else {
                self.lifeline_x(message.right()) - self.lifeline_x(message.left())
            };

            let label = match message.label.as_deref() {
                Some(text) => {
                    let m = measurer.measure(text, &style, Some(max_width));
                    Size::new(m.width, m.height)
                }
                None => Size::default(),
            };
            let note = |text: Option<&str>| match text {
                Some(text) => {
                    let m = measurer.measure(text, &style, None);
                    Size::new(m.width + cell, m.height + cell / 2.0)
                }
                None => Size::default(),
            };
            let left_note = note(message.left_note.as_deref());
            let right_note = note(message.right_note.as_deref());

            // Labels sit above the baseline and notes are centered on it.
            let note_half = left_note.height.max(right_note.height) / 2.0;
            let ascent = label.height.max(note_half);
            let descent = (self.config.edge_height + self.reserved_extra(message)).max(note_half);
            self.grid.row_heights[message.row + 1] = ascent + descent;

            self.ascents[idx] = ascent;
            self.labels[idx] = label;
            self.left_notes[idx] = left_note;
            self.right_notes[idx] = right_note;
        }

        let style = self.text_style(self.config.font_size);
        for (idx, separator) in self.diagram.separators.iter().enumerate() {
            let band = self.separator_band(separator);
            let m = measurer.measure(&separator.label, &style, Some(band.width()));
            self.separator_labels[idx] = Size::new(m.width, m.height);
        }
    }

    fn heighten_for_fragments(&mut self) {
        let cell = self.config.cellsize;
        for row in 0..self.diagram.row_count() {
            let top = self
                .diagram
                .fragments
                .iter()
                .filter(|f| f.first_row == row)
                .map(|f| f.ylevel_top)
                .max();
            if let Some(level) = top {
                self.grid.span_heights[row + 1] += cell * 2.5 * (level as f64 - 1.0) + cell;
            }

            let bottom = self
                .diagram
                .fragments
                .iter()
                .filter(|f| f.last_row == row)
                .map(|f| f.ylevel_bottom)
                .max();
            if let Some(level) = bottom {
                self.grid.span_heights[row + 2] += cell / 2.0 * (level as f64 - 1.0);
            }
        }
    }

    /// Notes hang outside the lifelines; when one would leave the page the
    /// outer span on that side grows to fit it.
    fn expand_page_for_notes(&mut self) {
        let cell = self.config.cellsize;
        let columns = self.grid.columns();
        for (idx, message) in self.diagram.messages.iter().enumerate() {
            if message.left_note.is_some() {
                let needed = self.left_notes[idx].width;
                let available = self.lifeline_x(message.left()) - cell * 6.0;
                if available < needed {
                    self.grid.span_widths[0] += needed - available;
                }
            }

            if message.right_note.is_some() {
                let needed = self.right_notes[idx].width;
                let anchor = if message.is_self() {
                    self.self_right(message)
                } else {
                    self.lifeline_x(message.right())
                };
                let mut available = self.grid.width() - anchor - cell * 3.0;
                if message.right().index() + 1 == columns {
                    available -= cell * 2.0;
                }
                if available < needed {
                    self.grid.span_widths[columns] += needed - available;
                }
            }
        }
    }

    // Shared helpers.

    fn text_style(&self, font_size: f64) -> TextStyle {
        TextStyle::new(font_size, self.config.line_spacing)
    }

    fn message_style(&self, message: &Message) -> TextStyle {
        self.text_style(message.fontsize.unwrap_or(self.config.font_size))
    }

    /// Row height kept free below the baseline for diagonal drops and self folds.
    fn reserved_extra(&self, message: &Message) -> f64 {
        if message.is_self() {
            self.config.cellsize * 2.0
        } else if message.diagonal {
            self.diagonal_drop()
        } else {
            0.0
        }
    }

    fn diagonal_drop(&self) -> f64 {
        self.config.node_height * 3.0 / 4.0
    }

    /// Distance between adjacent lifelines.
    fn edge_length(&self) -> f64 {
        self.config.node_width + self.inner_span
    }

    fn lifeline_x(&self, id: ParticipantId) -> f64 {
        self.grid.column_center(id.index())
    }

    fn activity_width(&self, id: ParticipantId, row: usize) -> f64 {
        let level = self
            .diagram
            .participant(id)
            .and_then(|p| p.activation_level_at(row))
            .unwrap_or(0);
        self.config.cellsize / 2.0 * level as f64
    }

    fn self_right(&self, message: &Message) -> f64 {
        let column = message.from.index();
        let reach = if column + 1 == self.grid.columns() {
            self.config.node_width / 2.0 + self.config.cellsize * 3.0
        } else {
            self.config.node_width / 2.0 + self.grid.span_widths[column + 1] / 2.0
        };
        self.lifeline_x(message.from) + reach
    }

    fn shaft_left(&self, message: &Message) -> f64 {
        let mut x = self.lifeline_x(message.left())
            + self.activity_width(message.left(), message.row)
            + self.config.cellsize;
        if message.failed && message.heading() == Heading::Left {
            x += self.edge_length() / 2.0;
        }
        x
    }

    fn shaft_right(&self, message: &Message) -> f64 {
        let mut x = self.lifeline_x(message.right()) - self.config.cellsize;
        if message.failed && message.heading() == Heading::Right {
            x -= self.edge_length() / 2.0;
        }
        x
    }

    fn baseline(&self, message: &Message) -> f64 {
        let ascent = self.ascents.get(message.order).copied().unwrap_or_default();
        self.grid.row_top(message.row + 1) + ascent
    }

    /// Vertical anchor of a row: a message's baseline, or the top of a separator.
    fn row_baseline(&self, row: usize) -> f64 {
        match self.diagram.message_at_row(row) {
            Some(message) => self.baseline(message),
            None => self.grid.row_top(row + 1),
        }
    }

    fn separator_band(&self, separator: &Separator) -> Rect {
        let cell = self.config.cellsize;
        let columns = self.grid.columns();
        let row = separator.row + 1;
        let (x1, x2) = if columns == 0 {
            let x = self.grid.column_left(0);
            (x - cell * 3.0, x + cell * 3.0)
        } else {
            (
                self.grid.column_left(0) - cell * 3.0,
                self.grid.column_right(columns - 1) + cell * 3.0,
            )
        };
        Rect::new(x1, self.grid.row_top(row), x2, self.grid.row_bottom(row))
    }

    fn participant_ref(&self, id: ParticipantId) -> Result<&'a Participant> {
        self.diagram.participant(id).ok_or(Error::UnknownEntity {
            kind: "participant",
            index: id.index(),
        })
    }

    fn message_ref(&self, id: MessageId) -> Result<&'a Message> {
        self.diagram.message(id).ok_or(Error::UnknownEntity {
            kind: "message",
            index: id.index(),
        })
    }

    fn separator_ref(&self, id: SeparatorId) -> Result<&'a Separator> {
        self.diagram.separator(id).ok_or(Error::UnknownEntity {
            kind: "separator",
            index: id.index(),
        })
    }

    fn fragment_ref(&self, id: FragmentId) -> Result<&'a Fragment> {
        self.diagram.fragment(id).ok_or(Error::UnknownEntity {
            kind: "fragment",
            index: id.index(),
        })
    }

    fn group_ref(&self, id: GroupId) -> Result<&'a Group> {
        self.diagram.group(id).ok_or(Error::UnknownEntity {
            kind: "group",
            index: id.index(),
        })
    }

    // Queries.

    pub fn page_size(&self) -> Size {
        let height = self
            .grid
            .height()
            .max(self.lifeline_end() + self.config.cellsize + self.config.page_margin.y);
        Size::new(self.grid.width(), height)
    }

    /// X coordinate of the participant's lifeline.
    pub fn column_position(&self, id: ParticipantId) -> Result<f64> {
        self.participant_ref(id)?;
        Ok(self.lifeline_x(id))
    }

    pub fn participant_box(&self, id: ParticipantId) -> Result<Rect> {
        self.participant_ref(id)?;
        Ok(self.grid.cells(id.index(), 0, id.index(), 0))
    }

    /// Y just below the last row, halfway into the trailing span.
    pub fn bottom_height(&self) -> f64 {
        let last = self.grid.rows() - 1;
        self.grid.row_bottom(last) + self.grid.span_heights[last + 1] / 2.0
    }

    fn lifeline_end(&self) -> f64 {
        self.bottom_height() + self.config.cellsize * 4.0
    }

    pub fn lifeline(&self, id: ParticipantId) -> Result<Vec<LifelineSegment>> {
        let head = self.participant_box(id)?;
        let x = self.lifeline_x(id);
        let cell = self.config.cellsize;

        let mut segments = Vec::new();
        let mut cursor = Point::new(x, head.y2);
        for separator in &self.diagram.separators {
            if separator.kind != SeparatorKind::Delay {
                continue;
            }
            let row = separator.row + 1;
            let (top, bottom) = (self.grid.row_top(row), self.grid.row_bottom(row));
            segments.push(LifelineSegment {
                from: cursor,
                to: Point::new(x, top),
                style: LineStyle::Dashed,
            });
            segments.push(LifelineSegment {
                from: Point::new(x, top + cell),
                to: Point::new(x, bottom - cell),
                style: LineStyle::Dotted,
            });
            cursor = Point::new(x, bottom);
        }
        segments.push(LifelineSegment {
            from: cursor,
            to: Point::new(x, self.lifeline_end()),
            style: LineStyle::Dashed,
        });
        Ok(segments)
    }

    pub fn message_baseline(&self, id: MessageId) -> Result<f64> {
        Ok(self.baseline(self.message_ref(id)?))
    }

    pub fn activation_box(&self, id: ParticipantId, activation: &Activation) -> Result<Rect> {
        self.participant_ref(id)?;
        let x = self.lifeline_x(id);
        let half = self.config.cellsize / 2.0;

        let mut top = self.row_baseline(activation.start);
        let dropped = self
            .diagram
            .message_at_row(activation.start)
            .is_some_and(|m| m.diagonal && !m.is_self() && m.receiver() == id);
        if dropped {
            top += self.diagonal_drop();
        }
        let bottom = if activation.end + 1 < self.diagram.row_count() {
            self.row_baseline(activation.end + 1)
        } else {
            self.bottom_height() + self.config.cellsize * 2.0
        };

        Ok(Rect::new(
            x + (activation.level as f64 - 1.0) * half,
            top,
            x + (activation.level as f64 + 1.0) * half,
            bottom,
        ))
    }

    pub fn activation_shadow(&self, id: ParticipantId, activation: &Activation) -> Result<Rect> {
        let offset = self.config.shadow_offset;
        Ok(self.activation_box(id, activation)?.offset(offset.x, offset.y))
    }

    /// Polyline of the message shaft, from sender side to receiver side.
    pub fn edge_shaft(&self, id: MessageId) -> Result<Vec<Point>> {
        let message = self.message_ref(id)?;
        let baseline = self.baseline(message);
        let cell = self.config.cellsize;

        if message.is_self() {
            let x1 = self.lifeline_x(message.from)
                + self.activity_width(message.from, message.row)
                + cell;
            let x2 = self.self_right(message);
            let fold = baseline + cell * 2.0;
            return Ok(vec![
                Point::new(x1, baseline),
                Point::new(x2, baseline),
                Point::new(x2, fold),
                Point::new(x1, fold),
            ]);
        }

        let (x1, x2) = (self.shaft_left(message), self.shaft_right(message));
        let mut y1 = baseline;
        let mut y2 = baseline;
        if message.diagonal {
            let drop = if message.failed {
                self.diagonal_drop() / 2.0
            } else {
                self.diagonal_drop()
            };
            match message.heading() {
                Heading::Right => y2 += drop,
                _ => y1 += drop,
            }
        }

        Ok(match message.heading() {
            Heading::Left => vec![Point::new(x2, y2), Point::new(x1, y1)],
            _ => vec![Point::new(x1, y1), Point::new(x2, y2)],
        })
    }

    /// Arrowhead triangle at the receiving end: tip first.
    pub fn edge_head(&self, id: MessageId) -> Result<[Point; 3]> {
        let shaft = self.edge_shaft(id)?;
        let message = self.message_ref(id)?;
        let cell = self.config.cellsize;
        let half = cell / 2.0;

        let (tip, inward) = match message.heading() {
            Heading::SelfLoop => (shaft[shaft.len() - 1], cell),
            Heading::Right => (shaft[shaft.len() - 1], -cell),
            Heading::Left => (shaft[shaft.len() - 1], cell),
        };
        Ok([
            tip,
            Point::new(tip.x + inward, tip.y - half),
            Point::new(tip.x + inward, tip.y + half),
        ])
    }

    /// Two crossed strokes drawn past the end of a failed message.
    pub fn failed_mark(&self, id: MessageId) -> Result<Vec<[Point; 2]>> {
        let message = self.message_ref(id)?;
        if !message.failed || message.is_self() {
            return Ok(Vec::new());
        }
        let shaft = self.edge_shaft(id)?;
        let end = shaft[shaft.len() - 1];
        let r = self.config.cellsize;
        let (near, far) = match message.heading() {
            Heading::Right => (end.x + r, end.x + r * 3.0),
            _ => (end.x - r * 3.0, end.x - r),
        };
        Ok(vec![
            [Point::new(near, end.y - r), Point::new(far, end.y + r)],
            [Point::new(near, end.y + r), Point::new(far, end.y - r)],
        ])
    }

    /// Box of the message label, sitting above the baseline.
    pub fn label_box(&self, id: MessageId) -> Result<Option<Rect>> {
        let message = self.message_ref(id)?;
        if message.label.is_none() {
            return Ok(None);
        }
        let size = self.labels[id.index()];
        let baseline = self.baseline(message);
        let cell = self.config.cellsize;

        let x = match message.heading() {
            Heading::SelfLoop => {
                self.lifeline_x(message.from) + self.activity_width(message.from, message.row)
            }
            Heading::Right => {
                self.lifeline_x(message.left())
                    + self.activity_width(message.left(), message.row)
                    + cell / 2.0
            }
            Heading::Left => self.lifeline_x(message.right()) - size.width,
        };
        Ok(Some(Rect::from_origin(
            Point::new(x, baseline - size.height),
            size,
        )))
    }

    pub fn note_box(&self, id: MessageId, side: NoteSide) -> Result<Option<Rect>> {
        let message = self.message_ref(id)?;
        let cell = self.config.cellsize;
        let (text, size) = match side {
            NoteSide::Left => (&message.left_note, self.left_notes[id.index()]),
            NoteSide::Right => (&message.right_note, self.right_notes[id.index()]),
        };
        if text.is_none() {
            return Ok(None);
        }

        let x = match side {
            NoteSide::Left => {
                let mut x = self.lifeline_x(message.left()) - cell * 3.0 - size.width;
                if message.failed && message.heading() == Heading::Left {
                    x += self.edge_length() / 2.0 - cell;
                }
                x
            }
            NoteSide::Right if message.is_self() => self.self_right(message) + cell * 2.0,
            NoteSide::Right if message.failed && message.heading() == Heading::Right => {
                self.shaft_right(message) + cell * 4.0
            }
            NoteSide::Right => self.lifeline_x(message.right()) + cell * 2.0,
        };
        let y = self.baseline(message) - size.height / 2.0;
        Ok(Some(Rect::from_origin(Point::new(x, y), size)))
    }

    /// Outline of a note with a folded top-right corner.
    pub fn note_shape(&self, id: MessageId, side: NoteSide) -> Result<Vec<Point>> {
        let Some(rect) = self.note_box(id, side)? else {
            return Ok(Vec::new());
        };
        let r = self.config.cellsize;
        Ok(vec![
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x2, rect.y1),
            Point::new(rect.x2 + r, rect.y1 + r),
            Point::new(rect.x2 + r, rect.y2),
            Point::new(rect.x1, rect.y2),
            Point::new(rect.x1, rect.y1),
        ])
    }

    pub fn fragment_box(&self, id: FragmentId) -> Result<Rect> {
        let fragment = self.fragment_ref(id)?;
        let cell = self.config.cellsize;
        let inset = cell * (fragment.xlevel as f64 - 1.0);
        let cells = self.grid.cells(
            fragment.first_column,
            fragment.first_row + 1,
            fragment.last_column,
            fragment.last_row + 1,
        );
        let mut x2 = cells.x2 + self.grid.span_widths[fragment.last_column + 1] / 2.0 - inset;
        if let Some(reach) = self.self_loop_reach(fragment) {
            x2 = x2.max(reach);
        }
        Ok(Rect::new(
            cells.x1 - self.grid.span_widths[fragment.first_column] / 2.0 + inset,
            cells.y1 - (cell * 2.5 * (fragment.ylevel_top as f64 - 1.0) + cell * 3.0),
            x2,
            cells.y2 + cell * (fragment.ylevel_bottom as f64 - 1.0) + cell,
        ))
    }

    /// Rightmost edge `fragment` needs to clear the self loops it contains.
    /// Each fragment nested between the loop and `fragment` adds one cell.
    fn self_loop_reach(&self, fragment: &Fragment) -> Option<f64> {
        let cell = self.config.cellsize;
        fragment
            .messages
            .iter()
            .filter_map(|&id| self.diagram.message(id).map(|m| (id, m)))
            .filter(|(_, m)| m.is_self())
            .map(|(id, m)| {
                let innermost = self
                    .diagram
                    .fragments
                    .iter()
                    .filter(|f| f.messages.contains(&id))
                    .map(|f| f.xlevel)
                    .max()
                    .unwrap_or(fragment.xlevel);
                let depth = innermost.saturating_sub(fragment.xlevel) + 1;
                self.self_right(m) + cell * depth as f64
            })
            .reduce(f64::max)
    }

    /// The `alt`/`loop` tag in the top-left corner of a fragment.
    pub fn fragment_kind_box(&self, id: FragmentId, measurer: &dyn TextMeasurer) -> Result<Rect> {
        let fragment = self.fragment_ref(id)?;
        let outer = self.fragment_box(id)?;
        let style = self.text_style(self.config.font_size);
        let m = measurer.measure(fragment.kind.as_str(), &style, None);
        let cell = self.config.cellsize;
        Ok(Rect::from_origin(
            Point::new(outer.x1, outer.y1),
            Size::new(m.width + cell, m.height + cell / 2.0),
        ))
    }

    /// Fragment condition text, placed right of the kind tag.
    pub fn fragment_label_box(
        &self,
        id: FragmentId,
        measurer: &dyn TextMeasurer,
    ) -> Result<Option<Rect>> {
        let fragment = self.fragment_ref(id)?;
        let Some(label) = fragment.label.as_deref() else {
            return Ok(None);
        };
        let tag = self.fragment_kind_box(id, measurer)?;
        let outer = self.fragment_box(id)?;
        let style = self.text_style(self.config.font_size);
        let x = tag.x2 + self.config.cellsize / 2.0;
        let m = measurer.measure(label, &style, Some((outer.x2 - x).max(0.0)));
        Ok(Some(Rect::from_origin(
            Point::new(x, outer.y1),
            Size::new(m.width, m.height),
        )))
    }

    pub fn separator_geometry(&self, id: SeparatorId) -> Result<SeparatorGeometry> {
        let separator = self.separator_ref(id)?;
        let band = self.separator_band(separator);
        let size = self.separator_labels[id.index()];
        let center = band.center();
        let label_box = Rect::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            center.x + size.width / 2.0,
            center.y + size.height / 2.0,
        )
        .inflate(self.config.cellsize / 4.0, self.config.cellsize / 4.0);

        let lines = match separator.kind {
            SeparatorKind::Delay => Vec::new(),
            SeparatorKind::Divider => {
                let d = self.config.cellsize / 4.0;
                let mut lines = Vec::with_capacity(4);
                for y in [center.y - d, center.y + d] {
                    lines.push([Point::new(band.x1, y), Point::new(label_box.x1, y)]);
                    lines.push([Point::new(label_box.x2, y), Point::new(band.x2, y)]);
                }
                lines
            }
        };
        Ok(SeparatorGeometry {
            band,
            label_box,
            lines,
        })
    }

    pub fn group_box(&self, id: GroupId) -> Result<Rect> {
        let group = self.group_ref(id)?;
        let first = group.first_column();
        let last = first + group.column_count().saturating_sub(1);
        Ok(Rect::new(
            self.grid.column_left(first) - self.grid.span_widths[first] / 2.0,
            self.grid.row_top(0) - self.grid.span_heights[0] / 2.0,
            self.grid.column_right(last) + self.grid.span_widths[last + 1] / 2.0,
            self.lifeline_end() + self.config.cellsize / 2.0,
        ))
    }

    /// Strip along the top of a group box holding its label.
    pub fn group_label_box(&self, id: GroupId) -> Result<Rect> {
        let outer = self.group_box(id)?;
        let height = self.grid.row_top(0) - outer.y1;
        Ok(Rect::new(outer.x1, outer.y1, outer.x2, outer.y1 + height))
    }

    /// Iterates `(row, item)` pairs in row order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, RowItem)> + '_ {
        self.diagram.rows.iter().copied().enumerate()
    }
}
