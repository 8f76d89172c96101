//! SVG chart drawing
//!
//! Charts are emitted as standalone SVG markup, written element by
//! element. Scatter and line charts take numeric x/y columns, bar charts a
//! categorical x and numeric y, heatmaps two categorical axes plus a
//! numeric value column mapped onto a color ramp.

use std::fmt::Write;

use indexmap::IndexSet;

use crate::error::{Result, TabError};
use crate::model::{CellValue, Table};

use super::scale::{format_tick, LinearScale};
use super::{ChartKind, ChartSpec};

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 56.0;

const SERIES_COLOR: &str = "#1f77b4";
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#dddddd";
// Heatmap ramp endpoints (light to dark blue)
const RAMP_LOW: (u8, u8, u8) = (247, 251, 255);
const RAMP_HIGH: (u8, u8, u8) = (8, 48, 107);

/// Render a chart to an SVG string
pub fn render_svg(table: &Table, spec: &ChartSpec) -> Result<String> {
    if table.is_empty() {
        return Err(TabError::render("cannot chart an empty table"));
    }

    let data = extract(table, spec)?;
    let mut out = String::new();
    draw(spec, &data, &mut out).map_err(|e| TabError::render(format!("svg write failed: {}", e)))?;
    Ok(out)
}

/// Chart-ready data pulled out of the table
enum ChartData {
    Points(Vec<(f64, f64)>),
    Bars(Vec<(String, f64)>),
    Grid {
        xs: Vec<String>,
        ys: Vec<String>,
        /// Row-major over (ys, xs); None where no value was present
        cells: Vec<Option<f64>>,
        min: f64,
        max: f64,
    },
}

/// Column lookup for chart input. Unlike transforms, a missing column here
/// is a render failure.
fn chart_column<'t>(table: &'t Table, name: &str) -> Result<&'t [CellValue]> {
    let idx = table
        .column_index(name)
        .ok_or_else(|| TabError::render(format!("chart column not found: {}", name)))?;
    Ok(table.values(idx))
}

fn extract(table: &Table, spec: &ChartSpec) -> Result<ChartData> {
    match spec.kind {
        ChartKind::Scatter | ChartKind::Line => {
            let xs = chart_column(table, &spec.x)?;
            let ys = chart_column(table, spec.require_y()?)?;

            let points: Vec<(f64, f64)> = xs
                .iter()
                .zip(ys)
                .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
                .collect();
            if points.is_empty() {
                return Err(TabError::render(format!(
                    "no numeric data in columns '{}' and '{}'",
                    spec.x,
                    spec.y.as_deref().unwrap_or_default()
                )));
            }
            Ok(ChartData::Points(points))
        }
        ChartKind::Bar => {
            let xs = chart_column(table, &spec.x)?;
            let ys = chart_column(table, spec.require_y()?)?;

            let bars: Vec<(String, f64)> = xs
                .iter()
                .zip(ys)
                .filter_map(|(x, y)| Some((x.to_string(), y.as_f64()?)))
                .collect();
            if bars.is_empty() {
                return Err(TabError::render(format!(
                    "no numeric data in column '{}'",
                    spec.y.as_deref().unwrap_or_default()
                )));
            }
            Ok(ChartData::Bars(bars))
        }
        ChartKind::Heatmap => {
            let x_cells = chart_column(table, &spec.x)?;
            let y_cells = chart_column(table, spec.require_y()?)?;
            let value_name = spec
                .value
                .as_deref()
                .ok_or_else(|| TabError::render("heatmap requires a value column"))?;
            let values = chart_column(table, value_name)?;

            let xs: IndexSet<String> = x_cells.iter().map(CellValue::to_string).collect();
            let ys: IndexSet<String> = y_cells.iter().map(CellValue::to_string).collect();

            let mut cells = vec![None; xs.len() * ys.len()];
            for ((x, y), v) in x_cells.iter().zip(y_cells).zip(values) {
                let (Some(xi), Some(yi)) = (
                    xs.get_index_of(&x.to_string()),
                    ys.get_index_of(&y.to_string()),
                ) else {
                    continue;
                };
                if let Some(v) = v.as_f64() {
                    cells[yi * xs.len() + xi] = Some(v);
                }
            }

            let present: Vec<f64> = cells.iter().flatten().copied().collect();
            if present.is_empty() {
                return Err(TabError::render(format!(
                    "no numeric data in column '{}'",
                    value_name
                )));
            }
            let min = present.iter().copied().fold(f64::INFINITY, f64::min);
            let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            Ok(ChartData::Grid {
                xs: xs.into_iter().collect(),
                ys: ys.into_iter().collect(),
                cells,
                min,
                max,
            })
        }
    }
}

fn draw(spec: &ChartSpec, data: &ChartData, out: &mut String) -> std::fmt::Result {
    let w = spec.width as f64;
    let h = spec.height as f64;
    let plot_w = w - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = h - MARGIN_TOP - MARGIN_BOTTOM;

    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        spec.width, spec.height, spec.width, spec.height
    )?;
    writeln!(out, "  <rect width=\"{}\" height=\"{}\" fill=\"white\"/>", w, h)?;

    if let Some(ref title) = spec.title {
        writeln!(
            out,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"16\" fill=\"{}\">{}</text>",
            w / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            AXIS_COLOR,
            xml_escape(title)
        )?;
    }

    match data {
        ChartData::Points(points) => draw_points(spec, points, plot_w, plot_h, out)?,
        ChartData::Bars(bars) => draw_bars(bars, plot_w, plot_h, out)?,
        ChartData::Grid {
            xs,
            ys,
            cells,
            min,
            max,
        } => draw_grid(xs, ys, cells, *min, *max, plot_w, plot_h, out)?,
    }

    draw_axis_titles(spec, w, h, out)?;
    writeln!(out, "</svg>")
}

fn padded_domain(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn draw_points(
    spec: &ChartSpec,
    points: &[(f64, f64)],
    plot_w: f64,
    plot_h: f64,
    out: &mut String,
) -> std::fmt::Result {
    let x_scale = LinearScale::new(
        padded_domain(points.iter().map(|p| p.0)),
        (MARGIN_LEFT, MARGIN_LEFT + plot_w),
    );
    // SVG y grows downward
    let y_scale = LinearScale::new(
        padded_domain(points.iter().map(|p| p.1)),
        (MARGIN_TOP + plot_h, MARGIN_TOP),
    );

    draw_numeric_axis(&x_scale, Axis::X, plot_h, out)?;
    draw_numeric_axis(&y_scale, Axis::Y, plot_w, out)?;
    draw_frame(plot_w, plot_h, out)?;

    match spec.kind {
        ChartKind::Line => {
            write!(out, "  <polyline fill=\"none\" stroke=\"{}\" stroke-width=\"2\" points=\"", SERIES_COLOR)?;
            for (x, y) in points {
                write!(out, "{:.1},{:.1} ", x_scale.map(*x), y_scale.map(*y))?;
            }
            writeln!(out, "\"/>")?;
        }
        _ => {
            for (x, y) in points {
                writeln!(
                    out,
                    "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\" fill-opacity=\"0.8\"/>",
                    x_scale.map(*x),
                    y_scale.map(*y),
                    SERIES_COLOR
                )?;
            }
        }
    }
    Ok(())
}

fn draw_bars(
    bars: &[(String, f64)],
    plot_w: f64,
    plot_h: f64,
    out: &mut String,
) -> std::fmt::Result {
    // Bars always include the zero baseline
    let lo = bars.iter().map(|b| b.1).fold(0.0, f64::min);
    let hi = bars.iter().map(|b| b.1).fold(0.0, f64::max);
    let y_scale = LinearScale::new((lo, hi), (MARGIN_TOP + plot_h, MARGIN_TOP));

    draw_numeric_axis(&y_scale, Axis::Y, plot_w, out)?;
    draw_frame(plot_w, plot_h, out)?;

    let band = plot_w / bars.len() as f64;
    let bar_w = band * 0.8;
    let zero = y_scale.map(0.0);

    for (i, (label, value)) in bars.iter().enumerate() {
        let x = MARGIN_LEFT + i as f64 * band + (band - bar_w) / 2.0;
        let y = y_scale.map(*value);
        let (top, height) = if y <= zero { (y, zero - y) } else { (zero, y - zero) };
        writeln!(
            out,
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            x, top, bar_w, height, SERIES_COLOR
        )?;
        writeln!(
            out,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">{}</text>",
            MARGIN_LEFT + i as f64 * band + band / 2.0,
            MARGIN_TOP + plot_h + 16.0,
            AXIS_COLOR,
            xml_escape(label)
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_grid(
    xs: &[String],
    ys: &[String],
    cells: &[Option<f64>],
    min: f64,
    max: f64,
    plot_w: f64,
    plot_h: f64,
    out: &mut String,
) -> std::fmt::Result {
    let cell_w = plot_w / xs.len() as f64;
    let cell_h = plot_h / ys.len() as f64;
    let span = if max > min { max - min } else { 1.0 };

    for (yi, y_label) in ys.iter().enumerate() {
        for xi in 0..xs.len() {
            let px = MARGIN_LEFT + xi as f64 * cell_w;
            let py = MARGIN_TOP + yi as f64 * cell_h;
            let fill = match cells[yi * xs.len() + xi] {
                Some(v) => ramp((v - min) / span),
                None => "#f0f0f0".to_string(),
            };
            writeln!(
                out,
                "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"white\"/>",
                px, py, cell_w, cell_h, fill
            )?;
        }
        writeln!(
            out,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">{}</text>",
            MARGIN_LEFT - 6.0,
            MARGIN_TOP + yi as f64 * cell_h + cell_h / 2.0 + 4.0,
            AXIS_COLOR,
            xml_escape(y_label)
        )?;
    }

    for (xi, x_label) in xs.iter().enumerate() {
        writeln!(
            out,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">{}</text>",
            MARGIN_LEFT + xi as f64 * cell_w + cell_w / 2.0,
            MARGIN_TOP + plot_h + 16.0,
            AXIS_COLOR,
            xml_escape(x_label)
        )?;
    }
    Ok(())
}

enum Axis {
    X,
    Y,
}

fn draw_numeric_axis(
    scale: &LinearScale,
    axis: Axis,
    cross_extent: f64,
    out: &mut String,
) -> std::fmt::Result {
    for tick in scale.ticks(6) {
        let pos = scale.map(tick);
        let label = format_tick(tick);
        match axis {
            Axis::X => {
                writeln!(
                    out,
                    "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\"/>",
                    pos,
                    MARGIN_TOP,
                    pos,
                    MARGIN_TOP + cross_extent,
                    GRID_COLOR
                )?;
                writeln!(
                    out,
                    "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">{}</text>",
                    pos,
                    MARGIN_TOP + cross_extent + 16.0,
                    AXIS_COLOR,
                    label
                )?;
            }
            Axis::Y => {
                writeln!(
                    out,
                    "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\"/>",
                    MARGIN_LEFT,
                    pos,
                    MARGIN_LEFT + cross_extent,
                    pos,
                    GRID_COLOR
                )?;
                writeln!(
                    out,
                    "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">{}</text>",
                    MARGIN_LEFT - 6.0,
                    pos + 4.0,
                    AXIS_COLOR,
                    label
                )?;
            }
        }
    }
    Ok(())
}

fn draw_frame(plot_w: f64, plot_h: f64, out: &mut String) -> std::fmt::Result {
    writeln!(
        out,
        "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"{}\"/>",
        MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h, AXIS_COLOR
    )
}

fn draw_axis_titles(spec: &ChartSpec, w: f64, h: f64, out: &mut String) -> std::fmt::Result {
    let x_title = spec.x_label.clone().unwrap_or_else(|| spec.x.clone());
    let y_title = spec
        .y_label
        .clone()
        .or_else(|| spec.y.clone())
        .unwrap_or_default();

    writeln!(
        out,
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\" fill=\"{}\">{}</text>",
        MARGIN_LEFT + (w - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
        h - 12.0,
        AXIS_COLOR,
        xml_escape(&x_title)
    )?;
    if !y_title.is_empty() {
        writeln!(
            out,
            "  <text x=\"16\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\" fill=\"{}\" transform=\"rotate(-90 16 {:.1})\">{}</text>",
            MARGIN_TOP + (h - MARGIN_TOP - MARGIN_BOTTOM) / 2.0,
            AXIS_COLOR,
            MARGIN_TOP + (h - MARGIN_TOP - MARGIN_BOTTOM) / 2.0,
            xml_escape(&y_title)
        )?;
    }
    Ok(())
}

/// Interpolate the color ramp at `t` in [0, 1]
fn ramp(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(RAMP_LOW.0, RAMP_HIGH.0),
        lerp(RAMP_LOW.1, RAMP_HIGH.1),
        lerp(RAMP_LOW.2, RAMP_HIGH.2)
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn xy_table() -> Table {
        let mut t = Table::new(vec![Column::new("x"), Column::new("y")]);
        t.push_row(vec![CellValue::Int(1), CellValue::Int(2)]);
        t.push_row(vec![CellValue::Int(3), CellValue::Int(4)]);
        t.push_row(vec![CellValue::Int(5), CellValue::Int(6)]);
        t.infer_types();
        t
    }

    #[test]
    fn scatter_emits_one_circle_per_row() {
        let spec = ChartSpec::new(ChartKind::Scatter, "x").with_y("y");
        let svg = render_svg(&xy_table(), &spec).unwrap();

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn empty_table_is_a_render_error() {
        let empty = Table::new(vec![Column::new("x"), Column::new("y")]);
        let spec = ChartSpec::new(ChartKind::Scatter, "x").with_y("y");

        let err = render_svg(&empty, &spec).unwrap_err();
        assert!(matches!(err, TabError::Render { .. }));
    }

    #[test]
    fn missing_column_is_a_render_error() {
        let spec = ChartSpec::new(ChartKind::Line, "x").with_y("nope");
        let err = render_svg(&xy_table(), &spec).unwrap_err();
        assert!(matches!(err, TabError::Render { .. }));
    }

    #[test]
    fn non_numeric_y_is_a_render_error() {
        let mut t = Table::new(vec![Column::new("x"), Column::new("label")]);
        t.push_row(vec![CellValue::Int(1), "a".into()]);
        t.infer_types();

        let spec = ChartSpec::new(ChartKind::Scatter, "x").with_y("label");
        let err = render_svg(&t, &spec).unwrap_err();
        assert!(matches!(err, TabError::Render { .. }));
    }

    #[test]
    fn bar_chart_escapes_labels() {
        let mut t = Table::new(vec![Column::new("cat"), Column::new("n")]);
        t.push_row(vec!["a<b".into(), CellValue::Int(5)]);
        t.infer_types();

        let spec = ChartSpec::new(ChartKind::Bar, "cat").with_y("n");
        let svg = render_svg(&t, &spec).unwrap();
        assert!(svg.contains("a&lt;b"));
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn heatmap_draws_full_grid() {
        let mut t = Table::new(vec![
            Column::new("day"),
            Column::new("hour"),
            Column::new("n"),
        ]);
        t.push_row(vec!["mon".into(), "am".into(), CellValue::Int(1)]);
        t.push_row(vec!["mon".into(), "pm".into(), CellValue::Int(5)]);
        t.push_row(vec!["tue".into(), "am".into(), CellValue::Int(3)]);
        t.infer_types();

        let spec = ChartSpec::new(ChartKind::Heatmap, "day")
            .with_y("hour")
            .with_value("n");
        let svg = render_svg(&t, &spec).unwrap();
        // 2x2 grid plus the background rect
        assert_eq!(svg.matches("<rect").count(), 5);
    }

    #[test]
    fn ramp_endpoints() {
        assert_eq!(ramp(0.0), "#f7fbff");
        assert_eq!(ramp(1.0), "#08306b");
    }
}
