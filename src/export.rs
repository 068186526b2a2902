use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::{bail, Context, Result};
use eframe::egui::Color32;
use image::ImageFormat;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::figure::{format_db, PolarFigure};

/// Chart extent in unit-disc coordinates; leaves room for angle labels.
const LIMIT: f64 = 1.18;
/// Direction (degrees) along which radial tick labels are placed.
const RADIAL_LABEL_DEG: f64 = 22.5;
/// Height of the title band, points.
const TITLE_BAND_PT: f64 = 30.0;
/// Margin around the polar chart, points.
const CHART_MARGIN_PT: f64 = 12.0;
/// Smallest polar disc worth drawing, points.
const MIN_PLOT_PT: f64 = 36.0;

/// Smallest image edge (pixels) that still leaves room for the chart at `dpi`.
pub fn min_edge_px(dpi: u32) -> u32 {
    pt(TITLE_BAND_PT + 2.0 * CHART_MARGIN_PT + MIN_PLOT_PT, dpi).ceil() as u32
}

// ---------------------------------------------------------------------------
// Raster export
// ---------------------------------------------------------------------------

/// Render `figure` to a square image of `edge` pixels at `dpi` and write it.
///
/// The format follows the extension of `path` (png, jpg/jpeg, bmp).
pub fn save(figure: &PolarFigure, path: &Path, edge: u32, dpi: u32) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("cannot infer image format of {}", path.display()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp) {
        bail!("unsupported output format {format:?} for {}", path.display());
    }
    let min_edge = min_edge_px(dpi);
    if edge < min_edge {
        bail!("image of {edge} px is too small at {dpi} dpi (need at least {min_edge} px)");
    }

    let mut buffer = vec![0u8; edge as usize * edge as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (edge, edge)).into_drawing_area();
        draw_polar(root, figure, dpi)?;
    }

    let img = image::RgbImage::from_raw(edge, edge, buffer)
        .context("raster buffer does not match image size")?;
    img.save_with_format(path, format)
        .with_context(|| format!("writing {}", path.display()))?;

    log::info!("wrote {}x{} px image to {}", edge, edge, path.display());
    Ok(())
}

/// Pixel size of `points` typographic points at `dpi`.
fn pt(points: f64, dpi: u32) -> f64 {
    points * f64::from(dpi) / 72.0
}

fn rgba(c: Color32) -> RGBAColor {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    RGBAColor(r, g, b, f64::from(a) / 255.0)
}

type PolarChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_polar<DB>(root: DrawingArea<DB, Shift>, figure: &PolarFigure, dpi: u32) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (title_band, body) = root.split_vertically(pt(TITLE_BAND_PT, dpi) as u32);
    let (w, h) = body.dim_in_pixel();
    let side = w.min(h);
    let dx = ((w - side) / 2) as i32;
    let dy = ((h - side) / 2) as i32;
    let square = body.margin(dy, dy, dx, dx);

    let mut chart = ChartBuilder::on(&square)
        .margin(pt(CHART_MARGIN_PT, dpi) as u32)
        .build_cartesian_2d(-LIMIT..LIMIT, -LIMIT..LIMIT)?;

    let grid = ShapeStyle {
        color: BLACK.mix(0.25),
        filled: false,
        stroke_width: pt(0.8, dpi).round().max(1.0) as u32,
    };
    let rim = ShapeStyle {
        color: BLACK.to_rgba(),
        filled: false,
        stroke_width: pt(1.0, dpi).round().max(1.0) as u32,
    };

    // rings and spokes
    chart.draw_series(
        figure
            .visible_radial_ticks()
            .filter(|t| *t < 0.0)
            .map(|t| PathElement::new(as_tuples(figure.ring_xy(t)), grid)),
    )?;
    chart.draw_series(figure.angular_ticks_deg.iter().map(|deg| {
        let t = deg.to_radians();
        PathElement::new(vec![(0.0, 0.0), (t.cos(), t.sin())], grid)
    }))?;
    chart.draw_series(std::iter::once(PathElement::new(
        as_tuples(figure.ring_xy(0.0)),
        rim,
    )))?;

    // traces, in file order so the first dataset ends up underneath
    let mut labelled = false;
    for trace in &figure.traces {
        let style = ShapeStyle {
            color: rgba(trace.color),
            filled: false,
            stroke_width: pt(trace.width, dpi).round().max(1.0) as u32,
        };
        let series = chart.draw_series(LineSeries::new(
            as_tuples(figure.trace_xy(trace)),
            style,
        ))?;
        if !trace.label.is_empty() {
            let legend_len = pt(20.0, dpi) as i32;
            series
                .label(trace.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));
            labelled = true;
        }
    }

    // Text goes through the system font backend, which can fail or panic on
    // hosts without fonts. The geometry above is kept either way.
    let annotated = panic::catch_unwind(AssertUnwindSafe(|| {
        annotate(&title_band, &mut chart, figure, dpi, labelled)
    }));
    match annotated {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("text labels skipped: {e:#}"),
        Err(_) => log::warn!("text labels skipped: font backend panicked"),
    }

    root.present()?;
    Ok(())
}

/// Title, tick labels and legend.
fn annotate<'a, DB>(
    title_band: &DrawingArea<DB, Shift>,
    chart: &mut PolarChart<'a, DB>,
    figure: &PolarFigure,
    dpi: u32,
    legend: bool,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    let title_font = FontDesc::new(FontFamily::SansSerif, pt(14.0, dpi), FontStyle::Normal);
    let tick_font = FontDesc::new(FontFamily::SansSerif, pt(10.0, dpi), FontStyle::Normal);
    let centered = Pos::new(HPos::Center, VPos::Center);

    if !figure.title.is_empty() {
        let (w, h) = title_band.dim_in_pixel();
        title_band.draw_text(
            &figure.title,
            &title_font.color(&BLACK).pos(centered),
            (w as i32 / 2, h as i32 / 2),
        )?;
    }

    chart.draw_series(figure.angular_ticks_deg.iter().map(|deg| {
        let t = deg.to_radians();
        Text::new(
            format!("{deg:.0}°"),
            (1.09 * t.cos(), 1.09 * t.sin()),
            tick_font.color(&BLACK).pos(centered),
        )
    }))?;

    let label_theta = RADIAL_LABEL_DEG.to_radians();
    chart.draw_series(figure.visible_radial_ticks().map(|tick| {
        let [x, y] = figure.to_xy(label_theta, tick);
        Text::new(format_db(tick), (x, y), tick_font.color(&BLACK.mix(0.8)).pos(centered))
    }))?;

    if legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .label_font(tick_font.color(&BLACK))
            .draw()?;
    }
    Ok(())
}

fn as_tuples(points: Vec<[f64; 2]>) -> Vec<(f64, f64)> {
    points.into_iter().map(|[x, y]| (x, y)).collect()
}
