//! End-to-end tests for `Figure` through the `RenderSurface` contract.
//!
//! Figures are 400x300 with no title or axis labels so pixel positions are
//! predictable: the plot area spans x 80..370 and y 50..240 (x 80..260 with a colour bar).

use std::collections::HashMap;

use field_common::{
    ArrowStyle, ContourStyle, FigureOptions, GridView, LineStyle, RenderSurface, VectorView,
};
use renderer::png::PNG_SIGNATURE;
use renderer::{ColorMap, Figure, RenderError, StyleError};
use test_utils::temp_test_dir;

// ============================================================================
// Helper functions
// ============================================================================

fn bare_options() -> FigureOptions {
    FigureOptions {
        width_px: 400,
        height_px: 300,
        title: None,
        x_label: None,
        y_label: None,
        ..Default::default()
    }
}

/// Unit-square mesh with `n` x `n` nodes and values equal to x.
fn ramp_grid(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for r in 0..n {
        for c in 0..n {
            xs.push(c as f64 / (n - 1) as f64);
            ys.push(r as f64 / (n - 1) as f64);
        }
    }
    let values = xs.clone();
    (xs, ys, values)
}

fn square<'a>(xs: &'a [f64], ys: &'a [f64], values: &'a [f64], n: usize) -> GridView<'a> {
    GridView { xs, ys, values, rows: n, cols: n }
}

fn pixel(rgba: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let i = (y * width + x) * 4;
    [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
}

fn banded(colormap: &str, levels: usize) -> ContourStyle {
    ContourStyle {
        colormap: colormap.to_string(),
        levels,
        ..Default::default()
    }
}

const WHITE: [u8; 4] = [255, 255, 255, 255];

// ============================================================================
// Filled contours
// ============================================================================

#[test]
fn test_empty_figure_is_an_error() {
    let figure = Figure::new(bare_options());
    assert!(matches!(figure.render(), Err(RenderError::EmptyFigure)));
}

#[test]
fn test_filled_contour_uses_colormap_endpoints() {
    let (xs, ys, values) = ramp_grid(11);
    let mut figure = Figure::new(bare_options());
    figure
        .filled_contour(square(&xs, &ys, &values, 11), &banded("coolwarm", 10))
        .unwrap();

    let rgba = figure.render_rgba().unwrap();
    assert_eq!(rgba.len(), 400 * 300 * 4);
    assert_eq!(pixel(&rgba, 400, 85, 145), [59, 76, 192, 255]);
    assert_eq!(pixel(&rgba, 400, 365, 145), [180, 4, 38, 255]);
}

#[test]
fn test_missing_nodes_leave_background() {
    let (xs, ys, mut values) = ramp_grid(11);
    for v in values.iter_mut() {
        if *v < 0.45 {
            *v = f64::NAN;
        }
    }
    let mut figure = Figure::new(bare_options());
    figure
        .filled_contour(square(&xs, &ys, &values, 11), &banded("plasma", 20))
        .unwrap();

    let rgba = figure.render_rgba().unwrap();
    assert_eq!(pixel(&rgba, 400, 90, 145), WHITE);
    assert_ne!(pixel(&rgba, 400, 360, 145), WHITE);
}

#[test]
fn test_fixed_value_range_clamps_colors() {
    let (xs, ys, values) = ramp_grid(11);
    let style = ContourStyle {
        colormap: "gray".to_string(),
        levels: 2,
        value_range: Some((0.0, 0.1)),
        ..Default::default()
    };
    let mut figure = Figure::new(bare_options());
    figure
        .filled_contour(square(&xs, &ys, &values, 11), &style)
        .unwrap();

    // Everything above 0.1 saturates into the top band
    let rgba = figure.render_rgba().unwrap();
    assert_eq!(pixel(&rgba, 400, 200, 145), WHITE);
    assert_eq!(pixel(&rgba, 400, 300, 145), WHITE);
}

#[test]
fn test_colorbar_is_drawn_and_recorded() {
    let (xs, ys, values) = ramp_grid(11);
    let style = ContourStyle {
        colorbar_label: Some("Temperature".to_string()),
        ..banded("coolwarm", 10)
    };
    let mut figure = Figure::new(bare_options());
    figure
        .filled_contour(square(&xs, &ys, &values, 11), &style)
        .unwrap();

    let rgba = figure.render_rgba().unwrap();
    // Bar spans x 280..298; the top holds the highest band
    assert_eq!(pixel(&rgba, 400, 289, 52), [180, 4, 38, 255]);
    assert_eq!(pixel(&rgba, 400, 289, 237), [59, 76, 192, 255]);

    let metadata = figure.metadata();
    assert!(metadata.iter().any(|c| c.keyword == "Colorbar" && c.text == "Temperature"));
}

#[test]
fn test_custom_colormap_takes_precedence() {
    let (xs, ys, values) = ramp_grid(5);
    let mut maps = HashMap::new();
    maps.insert(
        "coolwarm".to_string(),
        ColorMap::from_name("gray").unwrap(),
    );
    let mut figure = Figure::new(bare_options()).with_colormaps(maps);
    figure
        .filled_contour(square(&xs, &ys, &values, 5), &banded("coolwarm", 4))
        .unwrap();

    let rgba = figure.render_rgba().unwrap();
    assert_eq!(pixel(&rgba, 400, 85, 145), [0, 0, 0, 255]);
}

#[test]
fn test_contour_style_errors() {
    let (xs, ys, values) = ramp_grid(3);
    let grid = square(&xs, &ys, &values, 3);
    let mut figure = Figure::new(bare_options());

    assert!(matches!(
        figure.filled_contour(grid, &banded("jet", 10)),
        Err(RenderError::InvalidStyle(StyleError::UnknownColormap(_)))
    ));
    assert!(matches!(
        figure.filled_contour(grid, &banded("gray", 0)),
        Err(RenderError::InvalidStyle(StyleError::NoLevels))
    ));
    let bad = GridView { rows: 4, ..grid };
    assert!(matches!(
        figure.filled_contour(bad, &banded("gray", 10)),
        Err(RenderError::InvalidData(_))
    ));
    assert!(figure.is_empty());
}

// ============================================================================
// Vectors and lines
// ============================================================================

#[test]
fn test_vector_arrow_points_along_u() {
    let style = ArrowStyle {
        scale_factor: 1.0,
        scale: 1.0,
        shaft_width: 0.01,
        color: "#0000ff".to_string(),
        alpha: 1.0,
        ..Default::default()
    };
    let mut figure = Figure::new(bare_options());
    figure
        .vector_field(VectorView { x: &[0.5], y: &[0.5], u: &[0.1], v: &[0.0] }, &style)
        .unwrap();

    // Anchor at the plot centre (225, 145), 29 px long towards +x
    let rgba = figure.render_rgba().unwrap();
    assert_eq!(pixel(&rgba, 400, 235, 145), [0, 0, 255, 255]);
    assert_eq!(pixel(&rgba, 400, 212, 145), WHITE);
}

#[test]
fn test_vector_alpha_blends_with_background() {
    let style = ArrowStyle {
        scale_factor: 1.0,
        shaft_width: 0.01,
        alpha: 0.5,
        ..Default::default()
    };
    let mut figure = Figure::new(bare_options());
    figure
        .vector_field(VectorView { x: &[0.5], y: &[0.5], u: &[0.1], v: &[0.0] }, &style)
        .unwrap();

    let [r, g, b, a] = pixel(&figure.render_rgba().unwrap(), 400, 235, 145);
    assert_eq!(a, 255);
    assert_eq!(b, 255);
    assert!(r > 100 && r < 160 && r == g);
}

#[test]
fn test_vector_length_mismatch() {
    let mut figure = Figure::new(bare_options());
    let err = figure
        .vector_field(
            VectorView { x: &[0.0, 1.0], y: &[0.0], u: &[1.0], v: &[1.0] },
            &ArrowStyle::default(),
        )
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidData(_)));
}

#[test]
fn test_polyline_renders_and_validates() {
    let mut figure = Figure::new(bare_options());
    let style = LineStyle {
        color: "#ff0000".to_string(),
        width: 3.0,
        label: Some("Series".to_string()),
    };
    figure.polyline(&[0.0, 1.0], &[0.0, 1.0], &style).unwrap();

    let [r, _, b, _] = pixel(&figure.render_rgba().unwrap(), 400, 225, 145);
    assert!(r > b);

    assert!(figure.polyline(&[0.0], &[0.0, 1.0], &style).is_err());
    assert!(figure.polyline(&[], &[], &style).is_err());
    assert!(matches!(
        figure.polyline(&[0.0], &[0.0], &LineStyle { color: "blue".into(), ..Default::default() }),
        Err(RenderError::InvalidStyle(StyleError::InvalidColor(_)))
    ));
}

// ============================================================================
// Text
// ============================================================================

fn titled(title: &str) -> Vec<u8> {
    let mut figure = Figure::new(FigureOptions {
        title: Some(title.to_string()),
        ..bare_options()
    });
    figure.polyline(&[0.0, 1.0], &[0.0, 1.0], &LineStyle::default()).unwrap();
    figure.render_rgba().unwrap()
}

/// Dark pixels in the title band above the plot.
fn title_ink(rgba: &[u8], x0: usize, x1: usize) -> usize {
    (5..40)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| pixel(rgba, 400, x, y)[0] < 128)
        .count()
}

#[test]
fn test_title_is_drawn() {
    let untitled = {
        let mut figure = Figure::new(bare_options());
        figure.polyline(&[0.0, 1.0], &[0.0, 1.0], &LineStyle::default()).unwrap();
        figure.render_rgba().unwrap()
    };
    assert_eq!(title_ink(&untitled, 0, 400), 0);
    assert!(title_ink(&titled("Temperature Field"), 0, 400) > 100);
}

#[test]
fn test_cyrillic_title_letter_matches_latin_lookalike() {
    let latin = titled("Computational Field");
    let cyrillic = titled("\u{0421}omputational Field");

    let ink = title_ink(&latin, 0, 400);
    // Both titles start with the same shape, so almost every pixel agrees.
    let differing = (5..40)
        .flat_map(|y| (0..400).map(move |x| (x, y)))
        .filter(|&(x, y)| pixel(&latin, 400, x, y) != pixel(&cyrillic, 400, x, y))
        .count();
    assert!(differing * 20 < ink, "{} of {} pixels differ", differing, ink);
    assert!(title_ink(&cyrillic, 0, 400) * 10 > ink * 9);
}

#[test]
fn test_lowercase_text_keeps_its_case() {
    assert_ne!(titled("field"), titled("FIELD"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_encode_and_save_png() {
    let (xs, ys, values) = ramp_grid(11);
    let options = FigureOptions {
        title: Some("Temperature Field".to_string()),
        ..Default::default()
    };
    let mut figure = Figure::new(options);
    figure
        .filled_contour(square(&xs, &ys, &values, 11), &ContourStyle::default())
        .unwrap();
    figure
        .vector_field(VectorView { x: &xs, y: &ys, u: &values, v: &values }, &ArrowStyle::default())
        .unwrap();

    let png = figure.encode_png().unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
    assert!(png.windows(b"Temperature Field".len()).any(|w| w == b"Temperature Field"));

    let dir = temp_test_dir();
    let path = dir.path().join("field.png");
    figure.save_png(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), png);

    let err = figure.save_png(dir.path().join("missing").join("field.png")).unwrap_err();
    assert!(matches!(err, RenderError::Io { .. }));
}

#[test]
fn test_background_color_option() {
    let options = FigureOptions {
        background: "#102030".to_string(),
        ..bare_options()
    };
    let mut figure = Figure::new(options);
    figure.polyline(&[0.0, 1.0], &[0.0, 0.0], &LineStyle::default()).unwrap();
    assert_eq!(pixel(&figure.render_rgba().unwrap(), 400, 5, 5), [16, 32, 48, 255]);

    let mut bad = Figure::new(FigureOptions { background: "white".into(), ..bare_options() });
    bad.polyline(&[0.0, 1.0], &[0.0, 0.0], &LineStyle::default()).unwrap();
    assert!(matches!(bad.render(), Err(RenderError::InvalidStyle(_))));
}

#[test]
fn test_render_is_deterministic() {
    let (xs, ys, values) = ramp_grid(11);
    let build = || {
        let mut figure = Figure::new(FigureOptions::default());
        figure
            .filled_contour(
                square(&xs, &ys, &values, 11),
                &ContourStyle { isolines: true, ..Default::default() },
            )
            .unwrap();
        figure.encode_png().unwrap()
    };
    assert_eq!(build(), build());
}
