//! Text for titles, axis labels, tick labels and legends.
//!
//! Labels are collected while the figure is rasterized and drawn last with
//! the embedded TrueType font, on top of every layer.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

use crate::error::{RenderError, RenderResult};
use crate::gradient::Color;

/// Embedded font data - DejaVu Sans Mono (covers Latin, Greek and Cyrillic)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Parse the embedded font.
pub fn load_font() -> RenderResult<Font<'static>> {
    Font::try_from_bytes(FONT_DATA).ok_or(RenderError::Font)
}

/// Horizontal placement of text relative to its anchor point.
///
/// For vertical labels "start" is the bottom end, since they read upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// A piece of text placed in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Anchor point; `y` is the vertical centre of the line.
    pub x: f32,
    pub y: f32,
    /// Line height in pixels.
    pub size: f32,
    pub anchor: Anchor,
    /// Rotated a quarter turn counter-clockwise.
    pub vertical: bool,
    pub color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            anchor: Anchor::Middle,
            vertical: false,
            color: Color::BLACK,
        }
    }

    pub fn anchored(self, anchor: Anchor) -> Self {
        Self { anchor, ..self }
    }

    pub fn vertical(self) -> Self {
        Self {
            vertical: true,
            ..self
        }
    }
}

/// Advance width of `text` in pixels at line height `size`.
pub fn text_width(font: &Font<'_>, text: &str, size: f32) -> f32 {
    font.layout(text, Scale::uniform(size), point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Draw `label` onto `canvas`. Glyph pixels outside the canvas are dropped.
pub fn draw_label(canvas: &mut RgbaImage, font: &Font<'_>, label: &Label) {
    if label.text.is_empty() {
        return;
    }
    let scale = Scale::uniform(label.size);
    let color = Rgba([label.color.r, label.color.g, label.color.b, label.color.a]);
    let width = text_width(font, &label.text, label.size);
    let offset = match label.anchor {
        Anchor::Start => 0.0,
        Anchor::Middle => width / 2.0,
        Anchor::End => width,
    };

    if !label.vertical {
        let x = (label.x - offset).round() as i32;
        let y = (label.y - label.size / 2.0).round() as i32;
        draw_text_mut(canvas, color, x, y, scale, font, &label.text);
        return;
    }

    let mut strip = RgbaImage::from_pixel(
        width.ceil() as u32 + 1,
        label.size.ceil() as u32 + 1,
        Rgba([0, 0, 0, 0]),
    );
    draw_text_mut(&mut strip, color, 0, 0, scale, font, &label.text);
    let rotated = imageops::rotate270(&strip);

    let left = (label.x - rotated.width() as f32 / 2.0).round() as i64;
    let top = (label.y - rotated.height() as f32 + offset).round() as i64;
    imageops::overlay(canvas, &rotated, left, top);
}
