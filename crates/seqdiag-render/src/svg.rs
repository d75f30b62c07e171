use crate::geom::Point;
use crate::scene::{DrawOp, Layer, Scene, TextAlign};
use seqdiag_core::LineStyle;
use std::fmt::Write as _;

const BLUR_FILTER_ID: &str = "seqdiag-blur";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    pub font_family: String,
    /// Opacity applied to shadow shapes.
    pub shadow_opacity: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            shadow_opacity: 0.7,
        }
    }
}

pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt(scene.width),
        h = fmt(scene.height),
    );
    let _ = write!(
        &mut out,
        r#"<defs><filter id="{BLUR_FILTER_ID}" filterUnits="userSpaceOnUse"><feGaussianBlur stdDeviation="4"/></filter></defs>"#
    );
    let _ = write!(
        &mut out,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
        fmt(scene.width),
        fmt(scene.height),
    );

    for item in &scene.items {
        let is_shadow = item.layer == Layer::Shadow;
        match &item.op {
            DrawOp::Rect {
                rect,
                fill,
                stroke,
                blur,
            } => {
                let _ = write!(
                    &mut out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" {}{}/>"#,
                    fmt(rect.x1),
                    fmt(rect.y1),
                    fmt(rect.width()),
                    fmt(rect.height()),
                    paint_attrs(fill.as_deref(), stroke.as_deref()),
                    shadow_attrs(*blur, is_shadow, options),
                );
            }
            DrawOp::Polygon {
                points,
                fill,
                stroke,
                blur,
            } => {
                let _ = write!(
                    &mut out,
                    r#"<polygon points="{}" {}{}/>"#,
                    fmt_points(points),
                    paint_attrs(fill.as_deref(), stroke.as_deref()),
                    shadow_attrs(*blur, is_shadow, options),
                );
            }
            DrawOp::Line {
                points,
                stroke,
                style,
            } => {
                let _ = write!(
                    &mut out,
                    r#"<polyline points="{}" fill="none" stroke="{}"{}/>"#,
                    fmt_points(points),
                    escape_attr(stroke),
                    dash_attr(*style),
                );
            }
            DrawOp::Text {
                rect,
                text,
                color,
                font_size,
                align,
            } => {
                render_text(&mut out, rect, text, color, *font_size, *align, options);
            }
        }
    }

    out.push_str("</svg>");
    out
}

fn render_text(
    out: &mut String,
    rect: &crate::geom::Rect,
    text: &str,
    color: &str,
    font_size: f64,
    align: TextAlign,
    options: &SvgRenderOptions,
) {
    let lines: Vec<&str> = text.split('\n').collect();
    let line_height = rect.height() / lines.len().max(1) as f64;
    let (x, anchor) = match align {
        TextAlign::Left => (rect.x1, "start"),
        TextAlign::Center => (rect.center().x, "middle"),
    };
    // Centered text is vertically centered in its box; left text is stacked from the top.
    let first_y = match align {
        TextAlign::Center => {
            let block = font_size * 1.2 * lines.len() as f64;
            rect.center().y - block / 2.0 + font_size
        }
        TextAlign::Left => rect.y1 + (line_height + font_size) / 2.0,
    };

    let _ = write!(
        out,
        r#"<text x="{}" y="{}" fill="{}" font-family="{}" font-size="{}" text-anchor="{anchor}">"#,
        fmt(x),
        fmt(first_y),
        escape_attr(color),
        escape_attr(&options.font_family),
        fmt(font_size),
    );
    for (idx, line) in lines.iter().enumerate() {
        if idx == 0 {
            let _ = write!(out, "<tspan>{}</tspan>", escape_xml(line));
        } else {
            let _ = write!(
                out,
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                fmt(x),
                fmt(font_size * 1.2),
                escape_xml(line),
            );
        }
    }
    out.push_str("</text>");
}

fn paint_attrs(fill: Option<&str>, stroke: Option<&str>) -> String {
    format!(
        r#"fill="{}" stroke="{}""#,
        escape_attr(fill.unwrap_or("none")),
        escape_attr(stroke.unwrap_or("none")),
    )
}

fn shadow_attrs(blur: bool, is_shadow: bool, options: &SvgRenderOptions) -> String {
    if !is_shadow {
        return String::new();
    }
    let mut out = format!(r#" fill-opacity="{}""#, fmt(options.shadow_opacity));
    if blur {
        let _ = write!(&mut out, r#" filter="url(#{BLUR_FILTER_ID})""#);
    }
    out
}

fn dash_attr(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Solid => "",
        LineStyle::Dashed => r#" stroke-dasharray="8,4""#,
        LineStyle::Dotted => r#" stroke-dasharray="2,8""#,
    }
}

fn fmt_points(points: &[Point]) -> String {
    let mut out = String::new();
    for (idx, p) in points.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(&mut out, "{},{}", fmt(p.x), fmt(p.y));
    }
    out
}

fn fmt(v: f64) -> String {
    // Stable attribute text: no `-0`, no float noise from our own arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
