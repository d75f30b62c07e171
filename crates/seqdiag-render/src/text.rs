use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    /// Extra space added below every line.
    pub line_spacing: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            line_spacing: 2.0,
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f64, line_spacing: f64) -> Self {
        Self {
            font_size,
            line_spacing,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Black-box text sizing used by the metrics engine.
///
/// `max_width` bounds the wrapped width; `None` keeps explicit line breaks only.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics;
}

/// Font-free measurer: each character is `unicode-width` cells of
/// `font_size * char_width_factor`, so results are stable across platforms.
#[derive(Debug, Clone)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }
}

impl DeterministicTextMeasurer {
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        ch.width().unwrap_or(0) as f64 * font_size * self.char_width_factor
    }

    fn line_width(&self, line: &str, font_size: f64) -> f64 {
        line.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Greedy word wrap. A single word wider than `max_width` is split by characters.
    pub fn wrap_lines(&self, text: &str, font_size: f64, max_width: Option<f64>) -> Vec<String> {
        let max_width = max_width.filter(|w| w.is_finite() && *w > 0.0);
        let mut out = Vec::new();
        for raw in text.split('\n') {
            let Some(max_width) = max_width else {
                out.push(raw.to_string());
                continue;
            };

            let space = self.char_width(' ', font_size);
            let mut line = String::new();
            let mut line_width = 0.0;
            for word in raw.split(' ').filter(|w| !w.is_empty()) {
                let word_width = self.line_width(word, font_size);
                if !line.is_empty() && line_width + space + word_width <= max_width {
                    line.push(' ');
                    line.push_str(word);
                    line_width += space + word_width;
                    continue;
                }
                if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
                line_width = 0.0;
                for ch in word.chars() {
                    let w = self.char_width(ch, font_size);
                    if !line.is_empty() && line_width + w > max_width {
                        out.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += w;
                }
            }
            out.push(line);
        }
        out
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics {
        if text.trim().is_empty() {
            return TextMetrics::default();
        }

        let font_size = style.font_size.max(1.0);
        let lines = self.wrap_lines(text, font_size, max_width);
        let width = lines
            .iter()
            .map(|line| self.line_width(line, font_size))
            .fold(0.0, f64::max);
        let line_height = font_size * self.line_height_factor + style.line_spacing.max(0.0);
        TextMetrics {
            width,
            height: lines.len() as f64 * line_height,
            line_count: lines.len(),
        }
    }
}
