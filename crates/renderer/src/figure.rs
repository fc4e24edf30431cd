//! A single-axes figure that implements [`RenderSurface`].
//!
//! Layers are recorded as they are added and rasterized together by
//! [`Figure::render`], because the data-to-pixel transform depends on the
//! extent of every layer. Drawing order is: grid lines, layers in insertion
//! order, axes frame with ticks, colour bar, legend, then the text, which is
//! set with the embedded font once the shapes are rasterized.

use std::collections::HashMap;
use std::path::Path;

use field_common::{
    finite_range, ArrowStyle, BoundingBox, ContourStyle, FigureOptions, GridView, LineStyle,
    RenderSurface, VectorView,
};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use rusttype::Font;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect,
    Stroke, Transform,
};
use tracing::{debug, info};

use crate::arrows::{arrow_geometry, vector_magnitude};
use crate::contour::{generate_contour_levels, generate_isolines, Contour};
use crate::error::{RenderError, RenderResult, StyleError};
use crate::gradient::{band_position, quantize_level, Color, GridSampler};
use crate::png::{create_png_auto, TextChunk};
use crate::labels::{draw_label, load_font, text_width, Anchor, Label};
use crate::style::{parse_color, ColorMap};

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const COLORBAR_SPACE: f64 = 110.0;
const COLORBAR_GAP: f64 = 20.0;
const COLORBAR_WIDTH: f64 = 18.0;
const TICK_LENGTH: f32 = 5.0;
const TICK_FONT: f32 = 12.0;
const LABEL_FONT: f32 = 14.0;
const TITLE_FONT: f32 = 18.0;
/// Fraction of the extent added around non-grid layers.
const DATA_PADDING: f64 = 0.05;

struct FilledLayer {
    sampler: GridSampler,
    bbox: BoundingBox,
    colormap: ColorMap,
    range: (f64, f64),
    levels: usize,
    colorbar_label: Option<String>,
    isolines: Vec<Contour>,
}

struct VectorLayer {
    x: Vec<f64>,
    y: Vec<f64>,
    u: Vec<f64>,
    v: Vec<f64>,
    style: ArrowStyle,
    color: Color,
}

struct LineLayer {
    xs: Vec<f64>,
    ys: Vec<f64>,
    color: Color,
    width: f64,
    label: Option<String>,
}

enum Layer {
    Filled(FilledLayer),
    Vectors(VectorLayer),
    Line(LineLayer),
}

impl Layer {
    fn extent(&self) -> Option<BoundingBox> {
        match self {
            Layer::Filled(layer) => Some(layer.bbox),
            Layer::Vectors(layer) => BoundingBox::from_points(&layer.x, &layer.y),
            Layer::Line(layer) => BoundingBox::from_points(&layer.xs, &layer.ys),
        }
    }
}

/// Pixel rectangle, `f64` so transforms stay exact.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelRect {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PixelRect {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn to_skia(self) -> Option<Rect> {
        Rect::from_xywh(self.left as f32, self.top as f32, self.width as f32, self.height as f32)
    }
}

/// Data extent and the plot rectangle it maps onto.
#[derive(Debug, Clone, Copy)]
struct Layout {
    extent: BoundingBox,
    plot: PixelRect,
    colorbar: Option<PixelRect>,
}

impl Layout {
    fn new(
        options: &FigureOptions,
        extent: BoundingBox,
        with_colorbar: bool,
    ) -> RenderResult<Self> {
        let width = options.width_px as f64;
        let height = options.height_px as f64;
        let right = MARGIN_RIGHT + if with_colorbar { COLORBAR_SPACE } else { 0.0 };

        let mut plot = PixelRect {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: width - MARGIN_LEFT - right,
            height: height - MARGIN_TOP - MARGIN_BOTTOM,
        };
        if plot.width < 20.0 || plot.height < 20.0 {
            return Err(StyleError::FigureTooSmall(options.width_px, options.height_px).into());
        }

        if options.equal_aspect {
            let scale = (plot.width / extent.width()).min(plot.height / extent.height());
            let fitted_w = extent.width() * scale;
            let fitted_h = extent.height() * scale;
            plot.left += (plot.width - fitted_w) / 2.0;
            plot.top += (plot.height - fitted_h) / 2.0;
            plot.width = fitted_w;
            plot.height = fitted_h;
        }

        let colorbar = with_colorbar.then(|| PixelRect {
            left: plot.right() + COLORBAR_GAP,
            top: plot.top,
            width: COLORBAR_WIDTH,
            height: plot.height,
        });

        Ok(Self {
            extent,
            plot,
            colorbar,
        })
    }

    fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.plot.left + (x - self.extent.min_x) / self.extent.width() * self.plot.width,
            self.plot.top + (self.extent.max_y - y) / self.extent.height() * self.plot.height,
        )
    }

    fn to_data(&self, px: f64, py: f64) -> (f64, f64) {
        (
            self.extent.min_x + (px - self.plot.left) / self.plot.width * self.extent.width(),
            self.extent.max_y - (py - self.plot.top) / self.plot.height * self.extent.height(),
        )
    }
}

/// Tick spacing giving roughly `target` intervals over `span`.
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_step(span: f64, target: usize) -> f64 {
    if !(span > 0.0) || !span.is_finite() {
        return 1.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions inside `[min, max]`.
pub fn axis_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    generate_contour_levels(min, max, nice_step(max - min, target))
}

/// Format a tick value with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let value = if value.abs() < step.abs() * 1e-9 { 0.0 } else { value };
    let decimals = (0..=10)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0)
        })
        .unwrap_or(10) as usize;
    format!("{:.*}", decimals, value)
}

/// A figure with one set of axes.
pub struct Figure {
    options: FigureOptions,
    colormaps: HashMap<String, ColorMap>,
    layers: Vec<Layer>,
}

impl Figure {
    pub fn new(options: FigureOptions) -> Self {
        Self {
            options,
            colormaps: HashMap::new(),
            layers: Vec::new(),
        }
    }

    /// Make extra colour maps available by name, ahead of the built-ins.
    pub fn with_colormaps(mut self, colormaps: HashMap<String, ColorMap>) -> Self {
        self.colormaps.extend(colormaps);
        self
    }

    pub fn options(&self) -> &FigureOptions {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn resolve_colormap(&self, name: &str) -> Result<ColorMap, StyleError> {
        match self.colormaps.get(name) {
            Some(map) => Ok(map.clone()),
            None => ColorMap::from_name(name),
        }
    }

    /// Data extent shown on the axes, `None` when there is nothing to draw.
    pub fn data_extent(&self) -> Option<BoundingBox> {
        let extent = self
            .layers
            .iter()
            .filter_map(Layer::extent)
            .reduce(|a, b| a.union(&b))?;

        let only_grids = self.layers.iter().all(|l| matches!(l, Layer::Filled(_)));
        if only_grids && !extent.is_degenerate() {
            Some(extent)
        } else {
            Some(extent.padded(DATA_PADDING))
        }
    }

    /// Rasterize every layer with axes, decorations and text.
    pub fn render(&self) -> RenderResult<RgbaImage> {
        if self.layers.is_empty() {
            return Err(RenderError::EmptyFigure);
        }
        let extent = self
            .data_extent()
            .ok_or_else(|| RenderError::invalid_data("no finite coordinates to plot"))?;

        let colorbar = self.layers.iter().find_map(|layer| match layer {
            Layer::Filled(filled) if filled.colorbar_label.is_some() => Some(filled),
            _ => None,
        });
        let layout = Layout::new(&self.options, extent, colorbar.is_some())?;
        let background = parse_color(&self.options.background)?;

        let mut pixmap = Pixmap::new(self.options.width_px, self.options.height_px).ok_or(
            StyleError::FigureTooSmall(self.options.width_px, self.options.height_px),
        )?;
        pixmap.fill(background.to_skia());
        let font = load_font()?;
        let mut labels = Vec::new();

        let clip = plot_clip(&pixmap, &layout);
        if self.options.grid {
            draw_grid(&mut pixmap, &layout);
        }

        for layer in &self.layers {
            match layer {
                Layer::Filled(filled) => {
                    fill_grid(&mut pixmap, &layout, filled);
                    draw_isolines(&mut pixmap, &layout, &filled.isolines, clip.as_ref());
                }
                Layer::Vectors(vectors) => {
                    draw_vectors(&mut pixmap, &layout, vectors, clip.as_ref())
                }
                Layer::Line(line) => draw_line(&mut pixmap, &layout, line, clip.as_ref()),
            }
        }

        draw_axes(&mut pixmap, &layout, &mut labels);
        if let (Some(filled), Some(bar)) = (colorbar, layout.colorbar) {
            draw_colorbar(&mut pixmap, bar, filled, &font, &mut labels);
        }
        self.draw_legend(&mut pixmap, &layout, &font, &mut labels);
        self.push_titles(&layout, &mut labels);

        let mut image = to_image(&pixmap);
        for label in &labels {
            draw_label(&mut image, &font, label);
        }

        debug!(
            width = self.options.width_px,
            height = self.options.height_px,
            layers = self.layers.len(),
            min_x = extent.min_x,
            max_x = extent.max_x,
            min_y = extent.min_y,
            max_y = extent.max_y,
            labels = labels.len(),
            "Rendered figure"
        );

        Ok(image)
    }

    /// Rendered image as straight (not premultiplied) RGBA bytes.
    pub fn render_rgba(&self) -> RenderResult<Vec<u8>> {
        Ok(self.render()?.into_raw())
    }

    /// PNG-encoded image with title and axis labels as `tEXt` metadata.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let rgba = self.render_rgba()?;
        create_png_auto(
            &rgba,
            self.options.width_px as usize,
            self.options.height_px as usize,
            &self.metadata(),
        )
    }

    /// Encode and write the PNG to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let png = self.encode_png()?;
        std::fs::write(path, &png).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = png.len(), "Saved figure");
        Ok(())
    }

    /// `tEXt` entries describing the figure.
    pub fn metadata(&self) -> Vec<TextChunk> {
        let mut chunks = vec![TextChunk::new("Software", "fieldview renderer")];
        let entries = [
            ("Title", &self.options.title),
            ("X Label", &self.options.x_label),
            ("Y Label", &self.options.y_label),
        ];
        for (keyword, value) in entries {
            if let Some(text) = value {
                chunks.push(TextChunk::new(keyword, text.clone()));
            }
        }
        for layer in &self.layers {
            if let Layer::Filled(FilledLayer { colorbar_label: Some(label), .. }) = layer {
                chunks.push(TextChunk::new("Colorbar", label.clone()));
            }
        }
        chunks
    }

    fn push_titles(&self, layout: &Layout, labels: &mut Vec<Label>) {
        let plot = layout.plot;
        let center_x = (plot.left + plot.width / 2.0) as f32;
        let center_y = (plot.top + plot.height / 2.0) as f32;

        if let Some(title) = &self.options.title {
            labels.push(Label::new(title, center_x, (plot.top / 2.0) as f32, TITLE_FONT));
        }
        if let Some(label) = &self.options.x_label {
            labels.push(Label::new(label, center_x, plot.bottom() as f32 + 40.0, LABEL_FONT));
        }
        if let Some(label) = &self.options.y_label {
            let x = plot.left as f32 - 66.0;
            labels.push(Label::new(label, x, center_y, LABEL_FONT).vertical());
        }
    }

    fn draw_legend(
        &self,
        pixmap: &mut Pixmap,
        layout: &Layout,
        font: &Font<'_>,
        labels: &mut Vec<Label>,
    ) {
        let entries: Vec<(&str, Color, f64)> = self
            .layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Line(LineLayer { label: Some(label), color, width, .. }) => {
                    Some((label.as_str(), *color, *width))
                }
                _ => None,
            })
            .collect();
        if entries.is_empty() {
            return;
        }

        let row_height = 16.0f32;
        let sample_len = 22.0f32;
        let text_w = entries
            .iter()
            .map(|(label, _, _)| text_width(font, label, TICK_FONT))
            .fold(0.0, f32::max);
        let box_w = sample_len + text_w + 24.0;
        let box_h = row_height * entries.len() as f32 + 8.0;
        let right = layout.plot.right() as f32 - 8.0;
        let top = layout.plot.top as f32 + 8.0;

        if let Some(rect) = Rect::from_xywh(right - box_w, top, box_w, box_h) {
            let fill = solid(Color::new(255, 255, 255, 220));
            pixmap.fill_rect(rect, &fill, Transform::identity(), None);
            let path = PathBuilder::from_rect(rect);
            let edge = solid(Color::rgb(160, 160, 160));
            pixmap.stroke_path(&path, &edge, &thin(0.8), Transform::identity(), None);
        }

        for (i, (label, color, width)) in entries.into_iter().enumerate() {
            let y = top + 4.0 + row_height * (i as f32 + 0.5);
            let x0 = right - box_w + 8.0;
            let mut pb = PathBuilder::new();
            pb.move_to(x0, y);
            pb.line_to(x0 + sample_len, y);
            if let Some(path) = pb.finish() {
                let stroke = thin(width as f32);
                pixmap.stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
            }
            let text_x = x0 + sample_len + 6.0;
            labels.push(Label::new(label, text_x, y, TICK_FONT).anchored(Anchor::Start));
        }
    }
}

impl RenderSurface for Figure {
    type Error = RenderError;

    fn filled_contour(&mut self, grid: GridView<'_>, style: &ContourStyle) -> RenderResult<()> {
        if !grid.is_consistent() || grid.rows < 2 || grid.cols < 2 {
            return Err(RenderError::invalid_data(format!(
                "grid of {}x{} does not match its {} values",
                grid.rows,
                grid.cols,
                grid.values.len()
            )));
        }
        if style.levels == 0 {
            return Err(StyleError::NoLevels.into());
        }
        let range = match style.value_range {
            Some((min, max)) if min.is_finite() && max.is_finite() && min <= max => (min, max),
            Some((min, max)) => return Err(StyleError::InvalidRange(min, max).into()),
            None => finite_range(grid.values).unwrap_or((0.0, 1.0)),
        };
        let bbox = BoundingBox::from_points(grid.xs, grid.ys)
            .ok_or_else(|| RenderError::invalid_data("grid has no finite coordinates"))?;
        let colormap = self.resolve_colormap(&style.colormap)?;

        let isolines = if style.isolines {
            let levels: Vec<f64> = axis_ticks(range.0, range.1, 8)
                .into_iter()
                .filter(|l| *l > range.0 && *l < range.1)
                .collect();
            generate_isolines(grid, &levels, 1)
        } else {
            Vec::new()
        };

        debug!(
            rows = grid.rows,
            cols = grid.cols,
            colormap = colormap.name(),
            levels = style.levels,
            min = range.0,
            max = range.1,
            "Added filled contour layer"
        );

        self.layers.push(Layer::Filled(FilledLayer {
            sampler: GridSampler::new(grid),
            bbox,
            colormap,
            range,
            levels: style.levels,
            colorbar_label: style.colorbar_label.clone(),
            isolines,
        }));
        Ok(())
    }

    fn vector_field(&mut self, field: VectorView<'_>, style: &ArrowStyle) -> RenderResult<()> {
        let n = field.x.len();
        if n == 0 || field.y.len() != n || field.u.len() != n || field.v.len() != n {
            return Err(RenderError::invalid_data(format!(
                "vector columns must be non-empty and equal length (x={}, y={}, u={}, v={})",
                n,
                field.y.len(),
                field.u.len(),
                field.v.len()
            )));
        }
        let color = parse_color(&style.color)?.with_alpha(style.alpha);

        let max_magnitude = finite_range(&vector_magnitude(field.u, field.v))
            .map(|(_, max)| max)
            .unwrap_or(0.0);
        debug!(
            vectors = n,
            max_magnitude,
            scale_factor = style.scale_factor,
            "Added vector layer"
        );

        self.layers.push(Layer::Vectors(VectorLayer {
            x: field.x.to_vec(),
            y: field.y.to_vec(),
            u: field.u.to_vec(),
            v: field.v.to_vec(),
            style: style.clone(),
            color,
        }));
        Ok(())
    }

    fn polyline(&mut self, xs: &[f64], ys: &[f64], style: &LineStyle) -> RenderResult<()> {
        if xs.is_empty() || xs.len() != ys.len() {
            return Err(RenderError::invalid_data(format!(
                "polyline needs equal, non-empty coordinate lists (x={}, y={})",
                xs.len(),
                ys.len()
            )));
        }
        let color = parse_color(&style.color)?;

        self.layers.push(Layer::Line(LineLayer {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            color,
            width: if style.width > 0.0 { style.width } else { 1.0 },
            label: style.label.clone(),
        }));
        Ok(())
    }
}

/// Copy a premultiplied pixmap into a straight-alpha image.
fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn thin(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn plot_clip(pixmap: &Pixmap, layout: &Layout) -> Option<Mask> {
    let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
    let path = PathBuilder::from_rect(layout.plot.to_skia()?);
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    Some(mask)
}

/// Source-over blend of a premultiplied colour onto a premultiplied pixel.
fn blend(dst: PremultipliedColorU8, src: PremultipliedColorU8) -> PremultipliedColorU8 {
    if src.alpha() == 255 {
        return src;
    }
    let inv = 255 - src.alpha() as u16;
    let mix = |s: u8, d: u8| (s as u16 + (d as u16 * inv + 127) / 255).min(255) as u8;
    PremultipliedColorU8::from_rgba(
        mix(src.red(), dst.red()),
        mix(src.green(), dst.green()),
        mix(src.blue(), dst.blue()),
        mix(src.alpha(), dst.alpha()),
    )
    .unwrap_or(dst)
}

/// Paint each pixel of the plot area with the band colour of the grid value
/// under its centre. Pixels over missing nodes keep the background.
fn fill_grid(pixmap: &mut Pixmap, layout: &Layout, layer: &FilledLayer) {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let x0 = layout.plot.left.floor().max(0.0) as usize;
    let x1 = (layout.plot.right().ceil() as usize).min(width);
    let y0 = layout.plot.top.floor().max(0.0) as usize;
    let y1 = (layout.plot.bottom().ceil() as usize).min(height);
    let (min, max) = layer.range;

    let bands: Vec<PremultipliedColorU8> = (0..layer.levels)
        .map(|band| layer.colormap.sample(band_position(band, layer.levels)).premultiplied())
        .collect();

    pixmap
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(py, _)| *py >= y0 && *py < y1)
        .for_each(|(py, row)| {
            for (px, pixel) in row.iter_mut().enumerate().take(x1).skip(x0) {
                let (x, y) = layout.to_data(px as f64 + 0.5, py as f64 + 0.5);
                let value = layer.sampler.sample(x, y);
                if let Some(band) = quantize_level(value, min, max, layer.levels) {
                    *pixel = blend(*pixel, bands[band]);
                }
            }
        });
}

fn draw_isolines(pixmap: &mut Pixmap, layout: &Layout, contours: &[Contour], clip: Option<&Mask>) {
    let mut pb = PathBuilder::new();
    for contour in contours {
        for (i, point) in contour.points.iter().enumerate() {
            let (px, py) = layout.to_px(point.x, point.y);
            if i == 0 {
                pb.move_to(px as f32, py as f32);
            } else {
                pb.line_to(px as f32, py as f32);
            }
        }
        if contour.closed {
            pb.close();
        }
    }
    if let Some(path) = pb.finish() {
        let paint = solid(Color::new(0, 0, 0, 160));
        pixmap.stroke_path(&path, &paint, &thin(0.8), Transform::identity(), clip);
    }
}

fn draw_vectors(pixmap: &mut Pixmap, layout: &Layout, layer: &VectorLayer, clip: Option<&Mask>) {
    let mut pb = PathBuilder::new();
    let mut drawn = 0usize;

    for i in 0..layer.x.len() {
        let (px, py) = layout.to_px(layer.x[i], layer.y[i]);
        // Pixel y grows downwards.
        let (u, v) = (layer.u[i], -layer.v[i]);
        let Some(arrow) = arrow_geometry(px, py, u, v, &layer.style, layout.plot.width) else {
            continue;
        };
        for (j, &(ax, ay)) in arrow.outline.iter().enumerate() {
            if j == 0 {
                pb.move_to(ax as f32, ay as f32);
            } else {
                pb.line_to(ax as f32, ay as f32);
            }
        }
        pb.close();
        drawn += 1;
    }

    if let Some(path) = pb.finish() {
        let paint = solid(layer.color);
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), clip);
    }
    debug!(arrows = drawn, skipped = layer.x.len() - drawn, "Drew vector layer");
}

fn draw_line(pixmap: &mut Pixmap, layout: &Layout, layer: &LineLayer, clip: Option<&Mask>) {
    let mut pb = PathBuilder::new();
    let mut pen_down = false;
    for (&x, &y) in layer.xs.iter().zip(&layer.ys) {
        if !(x.is_finite() && y.is_finite()) {
            pen_down = false;
            continue;
        }
        let (px, py) = layout.to_px(x, y);
        if pen_down {
            pb.line_to(px as f32, py as f32);
        } else {
            pb.move_to(px as f32, py as f32);
            pen_down = true;
        }
    }
    if let Some(path) = pb.finish() {
        let stroke = thin(layer.width as f32);
        pixmap.stroke_path(&path, &solid(layer.color), &stroke, Transform::identity(), clip);
    }
}

fn draw_grid(pixmap: &mut Pixmap, layout: &Layout) {
    let extent = layout.extent;
    let plot = layout.plot;
    let mut pb = PathBuilder::new();
    for x in axis_ticks(extent.min_x, extent.max_x, 6) {
        let (px, _) = layout.to_px(x, extent.min_y);
        pb.move_to(px as f32, plot.top as f32);
        pb.line_to(px as f32, plot.bottom() as f32);
    }
    for y in axis_ticks(extent.min_y, extent.max_y, 6) {
        let (_, py) = layout.to_px(extent.min_x, y);
        pb.move_to(plot.left as f32, py as f32);
        pb.line_to(plot.right() as f32, py as f32);
    }
    if let Some(path) = pb.finish() {
        let paint = solid(Color::rgb(200, 200, 200));
        pixmap.stroke_path(&path, &paint, &thin(0.8), Transform::identity(), None);
    }
}

fn draw_axes(pixmap: &mut Pixmap, layout: &Layout, labels: &mut Vec<Label>) {
    let extent = layout.extent;
    let plot = layout.plot;
    let black = solid(Color::BLACK);

    if let Some(rect) = plot.to_skia() {
        let path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&path, &black, &thin(1.0), Transform::identity(), None);
    }

    let mut pb = PathBuilder::new();

    let x_step = nice_step(extent.width(), 6);
    for x in axis_ticks(extent.min_x, extent.max_x, 6) {
        let (px, _) = layout.to_px(x, extent.min_y);
        let (px, bottom) = (px as f32, plot.bottom() as f32);
        pb.move_to(px, bottom);
        pb.line_to(px, bottom + TICK_LENGTH);
        labels.push(Label::new(format_tick(x, x_step), px, bottom + TICK_LENGTH + 10.0, TICK_FONT));
    }

    let y_step = nice_step(extent.height(), 6);
    for y in axis_ticks(extent.min_y, extent.max_y, 6) {
        let (_, py) = layout.to_px(extent.min_x, y);
        let (left, py) = (plot.left as f32, py as f32);
        pb.move_to(left - TICK_LENGTH, py);
        pb.line_to(left, py);
        let label = Label::new(format_tick(y, y_step), left - TICK_LENGTH - 4.0, py, TICK_FONT);
        labels.push(label.anchored(Anchor::End));
    }

    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &black, &thin(1.0), Transform::identity(), None);
    }
}

fn draw_colorbar(
    pixmap: &mut Pixmap,
    bar: PixelRect,
    layer: &FilledLayer,
    font: &Font<'_>,
    labels: &mut Vec<Label>,
) {
    let (min, max) = layer.range;
    let top = bar.top.floor() as i64;
    let bottom = bar.bottom().ceil() as i64;

    for py in top..bottom {
        let t = 1.0 - (py as f64 + 0.5 - bar.top) / bar.height;
        let value = min + t * (max - min);
        let Some(band) = quantize_level(value, min, max, layer.levels) else { continue };
        let color = layer.colormap.sample(band_position(band, layer.levels));
        if let Some(rect) = Rect::from_xywh(bar.left as f32, py as f32, bar.width as f32, 1.0) {
            pixmap.fill_rect(rect, &solid(color), Transform::identity(), None);
        }
    }

    let black = solid(Color::BLACK);
    if let Some(rect) = bar.to_skia() {
        let path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&path, &black, &thin(1.0), Transform::identity(), None);
    }

    let step = nice_step(max - min, 6);
    let right = bar.right() as f32;
    let mut widest = 0.0f32;
    let mut pb = PathBuilder::new();
    if max > min {
        for value in axis_ticks(min, max, 6) {
            let py = (bar.top + (max - value) / (max - min) * bar.height) as f32;
            pb.move_to(right, py);
            pb.line_to(right + TICK_LENGTH, py);
            let label = format_tick(value, step);
            widest = widest.max(text_width(font, &label, TICK_FONT));
            let x = right + TICK_LENGTH + 3.0;
            labels.push(Label::new(label, x, py, TICK_FONT).anchored(Anchor::Start));
        }
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &black, &thin(1.0), Transform::identity(), None);
    }

    if let Some(label) = &layer.colorbar_label {
        let x = right + TICK_LENGTH + 3.0 + widest + 14.0;
        let y = (bar.top + bar.height / 2.0) as f32;
        labels.push(Label::new(label, x, y, LABEL_FONT).vertical());
    }
}
