//! Spreadsheet-style grid behind the metrics engine.
//!
//! `n` columns are separated by `n + 1` spans (one before the first column,
//! one after the last); rows likewise. Grid row 0 holds the participant
//! headers and diagram row `r` lives in grid row `r + 1`.

use crate::config::LayoutConfig;
use crate::geom::Rect;

#[derive(Debug, Clone)]
pub(crate) struct Grid {
    origin_x: f64,
    origin_y: f64,
    trailing_x: f64,
    trailing_y: f64,
    pub(crate) column_widths: Vec<f64>,
    pub(crate) span_widths: Vec<f64>,
    pub(crate) row_heights: Vec<f64>,
    pub(crate) span_heights: Vec<f64>,
}

impl Grid {
    pub(crate) fn new(columns: usize, rows: usize, config: &LayoutConfig) -> Self {
        let [top, right, bottom, left] = config.page_padding;
        Self {
            origin_x: config.page_margin.x + left,
            origin_y: config.page_margin.y + top,
            trailing_x: config.page_margin.x + right,
            trailing_y: config.page_margin.y + bottom,
            column_widths: vec![config.node_width; columns],
            span_widths: vec![config.span_width; columns + 1],
            row_heights: vec![config.node_height; rows],
            span_heights: vec![config.span_height; rows + 1],
        }
    }

    pub(crate) fn columns(&self) -> usize {
        self.column_widths.len()
    }

    pub(crate) fn rows(&self) -> usize {
        self.row_heights.len()
    }

    pub(crate) fn column_left(&self, x: usize) -> f64 {
        let x = x.min(self.columns());
        self.origin_x
            + self.span_widths[..=x].iter().sum::<f64>()
            + self.column_widths[..x].iter().sum::<f64>()
    }

    pub(crate) fn column_right(&self, x: usize) -> f64 {
        self.column_left(x) + self.column_widths.get(x).copied().unwrap_or(0.0)
    }

    pub(crate) fn column_center(&self, x: usize) -> f64 {
        (self.column_left(x) + self.column_right(x)) / 2.0
    }

    pub(crate) fn row_top(&self, y: usize) -> f64 {
        let y = y.min(self.rows());
        self.origin_y
            + self.span_heights[..=y].iter().sum::<f64>()
            + self.row_heights[..y].iter().sum::<f64>()
    }

    pub(crate) fn row_bottom(&self, y: usize) -> f64 {
        self.row_top(y) + self.row_heights.get(y).copied().unwrap_or(0.0)
    }

    /// The rectangle covering columns `x1..=x2` and rows `y1..=y2`.
    pub(crate) fn cells(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> Rect {
        Rect::new(
            self.column_left(x1),
            self.row_top(y1),
            self.column_right(x2),
            self.row_bottom(y2),
        )
    }

    pub(crate) fn width(&self) -> f64 {
        self.origin_x
            + self.span_widths.iter().sum::<f64>()
            + self.column_widths.iter().sum::<f64>()
            + self.trailing_x
    }

    pub(crate) fn height(&self) -> f64 {
        self.origin_y
            + self.span_heights.iter().sum::<f64>()
            + self.row_heights.iter().sum::<f64>()
            + self.trailing_y
    }
}
