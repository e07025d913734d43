//! Chart rendering for the four analysis pipelines
//!
//! Every chart is a grid of panels drawn with the [`plotters`] bitmap backend
//! and written as PNG, replacing any file of the same name. Panel captions are
//! bold, axis descriptions italic, grid lines light grey and reference lines
//! dashed.

use crate::PlotError;
use hoops_core::analysis::{DecadeLeaders, EraComparison, ShooterComparison, YearlyTrends};
use log::{debug, info};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

type Result<T> = core::result::Result<T, PlotError>;
type Panel<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub const TRENDS_FILE: &str = "mean_stats_by_year.png";
pub const DECADES_FILE: &str = "top_ten_stats_by_decade.png";

const FIRST_COLOR: RGBColor = RGBColor(31, 119, 180);
const SECOND_COLOR: RGBColor = RGBColor(255, 127, 14);
const MARKER_COLORS: [RGBColor; 2] = [BLACK, RGBColor(0, 128, 0)];

/// Dashes per vertical reference line
const DASHES: usize = 30;

fn area_error<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::DrawingArea(e.to_string())
}

fn config_error<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

fn drawing<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

fn title_style(size: f64) -> TextStyle<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Bold).into()
}

fn axis_desc_style() -> TextStyle<'static> {
    FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Italic).into()
}

/// `(rows, cols)` holding `panels` with at most `max_cols` per row.
pub(crate) fn grid_shape(panels: usize, max_cols: usize) -> (usize, usize) {
    let cols = max_cols.clamp(1, panels.max(1));
    (panels.max(1).div_ceil(cols), cols)
}

/// Axis range for `[lo, hi]`, widened when the data is flat and replaced by
/// `0..1` when either end is not finite.
pub(crate) fn axis_range(lo: f64, hi: f64) -> Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    if hi > lo {
        return lo..hi;
    }
    let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
    (lo - pad)..(hi + pad)
}

/// Finite `(x, y)` points of a curve whose x lies inside `x_range`.
pub(crate) fn curve(grid: &[f64], values: &[f64], x_range: &Range<f64>) -> Vec<(f64, f64)> {
    grid.iter()
        .zip(values)
        .filter(|(x, y)| y.is_finite() && **x >= x_range.start && **x <= x_range.end)
        .map(|(&x, &y)| (x, y))
        .collect()
}

/// Largest y over several curves, `NaN` when all are empty.
fn peak(curves: &[&[(f64, f64)]]) -> f64 {
    curves
        .iter()
        .flat_map(|c| c.iter().map(|&(_, y)| y))
        .fold(f64::NAN, f64::max)
}

fn density_range(curves: &[&[(f64, f64)]]) -> Range<f64> {
    axis_range(0.0, peak(curves) * 1.1)
}

/// Segments of a dashed vertical line at `x` over `ys`.
pub(crate) fn dash_segments(x: f64, ys: &Range<f64>, dashes: usize) -> Vec<Vec<(f64, f64)>> {
    let step = (ys.end - ys.start) / (2 * dashes) as f64;
    (0..dashes)
        .map(|i| {
            let y0 = ys.start + (2 * i) as f64 * step;
            vec![(x, y0), (x, y0 + step)]
        })
        .collect()
}

/// Tick text for decade index `x`; empty between decades.
pub(crate) fn decade_tick(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn draw_vline(
    chart: &mut Panel<'_, '_>,
    x: f64,
    ys: &Range<f64>,
    color: RGBColor,
    label: Option<&str>,
) -> Result<()> {
    if !x.is_finite() {
        return Ok(());
    }
    let style = color.mix(0.6).stroke_width(2);
    let anno = chart
        .draw_series(
            dash_segments(x, ys, DASHES)
                .into_iter()
                .map(|segment| PathElement::new(segment, style)),
        )
        .map_err(drawing)?;
    if let Some(label) = label {
        anno.label(label.replace('\n', " "))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }
    Ok(())
}

fn draw_curve(
    chart: &mut Panel<'_, '_>,
    points: Vec<(f64, f64)>,
    color: RGBColor,
    label: &str,
) -> Result<()> {
    let style = color.stroke_width(2);
    chart
        .draw_series(LineSeries::new(points, style))
        .map_err(drawing)?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    Ok(())
}

fn draw_mesh(
    chart: &mut Panel<'_, '_>,
    x_desc: &str,
    y_desc: &str,
    x_labels: Option<usize>,
    x_formatter: Option<&dyn Fn(&f64) -> String>,
) -> Result<()> {
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(axis_desc_style())
        .label_style(("sans-serif", 12))
        .bold_line_style(BLACK.mix(0.12))
        .light_line_style(BLACK.mix(0.04));
    if let Some(count) = x_labels {
        mesh.x_labels(count);
    }
    if let Some(formatter) = x_formatter {
        mesh.x_label_formatter(formatter);
    }
    mesh.draw().map_err(drawing)
}

fn draw_legend<'a>(chart: &mut Panel<'a, 'a>) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .draw()
        .map_err(drawing)
}

/// League mean per season, one panel per column, 4×2 by default.
pub fn render_trends(trends: &YearlyTrends, out_dir: &Path) -> Result<PathBuf> {
    if trends.series.is_empty() || trends.years.is_empty() {
        return Err(PlotError::InvalidData("no yearly series to plot".to_string()));
    }
    let path = out_dir.join(TRENDS_FILE);
    draw_trends(trends, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn draw_trends(trends: &YearlyTrends, path: &Path) -> Result<()> {
    let first = trends.years[0];
    let last = trends.years[trends.years.len() - 1];
    let (rows, cols) = grid_shape(trends.series.len(), 2);

    let root = BitMapBackend::new(path, (1500, 300 * rows as u32 + 100)).into_drawing_area();
    root.fill(&WHITE).map_err(area_error)?;
    let body = root
        .titled("Average Player Statistics Over the Years", title_style(30.0))
        .map_err(area_error)?;
    let panels = body.split_evenly((rows, cols));

    let x_range = axis_range(first as f64, last as f64);
    let year_label: &dyn Fn(&f64) -> String = &|x| format!("{:.0}", x);

    for (series, area) in trends.series.iter().zip(panels.iter()) {
        let y_range = axis_range(series.max * 0.1, series.max * 1.2);
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{} By Year {}-{}", series.label, first, last),
                title_style(16.0),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(config_error)?;

        draw_mesh(&mut chart, "Year", &series.label, None, Some(year_label))?;

        let points: Vec<(f64, f64)> = trends
            .years
            .iter()
            .zip(&series.means)
            .filter(|(_, mean)| mean.is_finite())
            .map(|(&year, &mean)| (year as f64, mean))
            .collect();
        chart
            .draw_series(LineSeries::new(points, FIRST_COLOR.stroke_width(2)))
            .map_err(drawing)?;

        let mut labeled = false;
        for (i, marker) in trends.markers.iter().enumerate() {
            let x = marker.year as f64;
            if x < x_range.start || x > x_range.end {
                debug!("Marker {} outside {}-{}, skipped", marker.year, first, last);
                continue;
            }
            let color = MARKER_COLORS[i % MARKER_COLORS.len()];
            draw_vline(&mut chart, x, &y_range, color, Some(marker.label.as_str()))?;
            labeled = true;
        }
        if labeled {
            draw_legend(&mut chart)?;
        }
    }

    root.present().map_err(drawing)
}

/// Beta densities of the two shooters, one panel per shot type, 1×3 by default.
pub fn render_shooters(comparison: &ShooterComparison, out_dir: &Path) -> Result<PathBuf> {
    if comparison.panels.is_empty() {
        return Err(PlotError::InvalidData("no shot types to plot".to_string()));
    }
    let path = out_dir.join(format!("{}.png", comparison.file_stem()));
    draw_shooters(comparison, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn draw_shooters(comparison: &ShooterComparison, path: &Path) -> Result<()> {
    let (rows, cols) = grid_shape(comparison.panels.len(), comparison.panels.len());
    let root =
        BitMapBackend::new(path, (420 * cols as u32, 420 * rows as u32 + 80)).into_drawing_area();
    root.fill(&WHITE).map_err(area_error)?;

    let title = format!(
        "{} ({}) vs {} ({})",
        comparison.first.display_name,
        comparison.first.year,
        comparison.second.display_name,
        comparison.second.year
    );
    let body = root.titled(&title, title_style(22.0)).map_err(area_error)?;
    let panels = body.split_evenly((rows, cols));

    for (panel, area) in comparison.panels.iter().zip(panels.iter()) {
        let x_range = axis_range(panel.x_limits.0, panel.x_limits.1);
        let first = curve(&panel.grid, &panel.first.density, &x_range);
        let second = curve(&panel.grid, &panel.second.density, &x_range);
        let y_range = density_range(&[&first, &second]);

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, title_style(16.0))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range.clone())
            .map_err(config_error)?;

        draw_mesh(&mut chart, "Success Rate", "Probability", None, None)?;
        draw_curve(&mut chart, first, FIRST_COLOR, &panel.first.name)?;
        draw_curve(&mut chart, second, SECOND_COLOR, &panel.second.name)?;
        draw_vline(&mut chart, panel.first.median, &y_range, BLACK, Some("median"))?;
        draw_vline(&mut chart, panel.second.median, &y_range, BLACK, None)?;
        draw_legend(&mut chart)?;
    }

    root.present().map_err(drawing)
}

/// Normal overlays of the two seasons with U-test p-values, 3×4 by default.
pub fn render_eras(comparison: &EraComparison, out_dir: &Path) -> Result<PathBuf> {
    if comparison.panels.is_empty() {
        return Err(PlotError::InvalidData("no era columns to plot".to_string()));
    }
    let path = out_dir.join(format!("{}.png", comparison.file_stem()));
    draw_eras(comparison, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn draw_eras(comparison: &EraComparison, path: &Path) -> Result<()> {
    let (rows, cols) = grid_shape(comparison.panels.len(), 4);
    let root =
        BitMapBackend::new(path, (500 * cols as u32, 450 * rows as u32 + 100)).into_drawing_area();
    root.fill(&WHITE).map_err(area_error)?;

    let title = format!(
        "Average League Statistics {} vs {} (Mann Whitney U Test)",
        comparison.newer_year, comparison.older_year
    );
    let body = root.titled(&title, title_style(30.0)).map_err(area_error)?;
    let panels = body.split_evenly((rows, cols));

    let newer_label = comparison.newer_year.to_string();
    let older_label = comparison.older_year.to_string();

    for (panel, area) in comparison.panels.iter().zip(panels.iter()) {
        let (lo, hi) = match (panel.grid.first(), panel.grid.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (f64::NAN, f64::NAN),
        };
        let x_range = axis_range(lo, hi);
        let newer = curve(&panel.grid, &panel.newer.density, &x_range);
        let older = curve(&panel.grid, &panel.older.density, &x_range);
        let y_range = density_range(&[&newer, &older]);

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.label, title_style(16.0))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range.clone())
            .map_err(config_error)?;

        let p_label = format!("P Value: {:.5}", panel.test.p_value);
        draw_mesh(&mut chart, &p_label, "Probability", None, None)?;
        draw_curve(&mut chart, newer, FIRST_COLOR, &newer_label)?;
        draw_curve(&mut chart, older, SECOND_COLOR, &older_label)?;
        draw_vline(&mut chart, panel.newer.mean, &y_range, BLACK, None)?;
        draw_vline(&mut chart, panel.older.mean, &y_range, BLACK, None)?;
        draw_legend(&mut chart)?;
    }

    root.present().map_err(drawing)
}

/// Mean-of-means of each decade's top scorers, 2×5 by default.
pub fn render_decades(leaders: &DecadeLeaders, out_dir: &Path) -> Result<PathBuf> {
    if leaders.decades.is_empty() || leaders.plot_columns.is_empty() {
        return Err(PlotError::InvalidData("no decades to plot".to_string()));
    }
    let path = out_dir.join(DECADES_FILE);
    draw_decades(leaders, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn draw_decades(leaders: &DecadeLeaders, path: &Path) -> Result<()> {
    let (rows, cols) = grid_shape(leaders.plot_columns.len(), 5);
    let root =
        BitMapBackend::new(path, (400 * cols as u32, 500 * rows as u32 + 100)).into_drawing_area();
    root.fill(&WHITE).map_err(area_error)?;

    let top = leaders
        .decades
        .iter()
        .map(|d| d.leaders.len())
        .max()
        .unwrap_or(0);
    let body = root
        .titled(
            &format!("Average Statistics for the Top {} Players by Decade", top),
            title_style(30.0),
        )
        .map_err(area_error)?;
    let panels = body.split_evenly((rows, cols));

    let labels: Vec<String> = leaders.decades.iter().map(|d| d.label.clone()).collect();
    let tick: &dyn Fn(&f64) -> String = &|x| decade_tick(&labels, *x);
    let x_range = -0.25..(labels.len() as f64 - 0.75);

    for (&column, area) in leaders.plot_columns.iter().zip(panels.iter()) {
        let y_range = leaders
            .extent(column)
            .map(|e| axis_range(e.min, e.max * leaders.y_max_fraction))
            .unwrap_or(0.0..1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(column.label(), title_style(16.0))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range)
            .map_err(config_error)?;

        draw_mesh(&mut chart, "Decade", column.label(), Some(labels.len()), Some(tick))?;

        let points: Vec<(f64, f64)> = leaders
            .series(column)
            .into_iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i as f64, v))
            .collect();
        chart
            .draw_series(LineSeries::new(points.clone(), FIRST_COLOR.stroke_width(2)))
            .map_err(drawing)?;
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, 4, FIRST_COLOR.filled())),
            )
            .map_err(drawing)?;
    }

    root.present().map_err(drawing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoops_core::analysis::TrendSeries;
    use hoops_core::config::YearMarker;
    use hoops_core::StatColumn;
    use tempfile::TempDir;

    #[test]
    fn test_grid_shape_default_layouts() {
        assert_eq!(grid_shape(8, 2), (4, 2));
        assert_eq!(grid_shape(3, 3), (1, 3));
        assert_eq!(grid_shape(12, 4), (3, 4));
        assert_eq!(grid_shape(10, 5), (2, 5));
        // Fewer panels than columns collapses to one row
        assert_eq!(grid_shape(2, 5), (1, 2));
        assert_eq!(grid_shape(9, 4), (3, 4));
    }

    #[test]
    fn test_axis_range_handles_flat_and_missing() {
        assert_eq!(axis_range(1.0, 3.0), 1.0..3.0);
        assert_eq!(axis_range(3.0, 1.0), 1.0..3.0);
        assert_eq!(axis_range(0.0, 0.0), -1.0..1.0);
        assert_eq!(axis_range(10.0, 10.0), 9.0..11.0);
        assert_eq!(axis_range(f64::NAN, 1.0), 0.0..1.0);
    }

    #[test]
    fn test_curve_clips_to_range_and_drops_nan() {
        let grid = [0.0, 0.25, 0.5, 0.75, 1.0];
        let values = [1.0, 2.0, f64::NAN, 4.0, 5.0];
        let points = curve(&grid, &values, &(0.2..0.8));
        assert_eq!(points, vec![(0.25, 2.0), (0.75, 4.0)]);
    }

    #[test]
    fn test_dash_segments_alternate() {
        let segments = dash_segments(5.0, &(0.0..10.0), 5);
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], vec![(5.0, 0.0), (5.0, 1.0)]);
        assert_eq!(segments[1], vec![(5.0, 2.0), (5.0, 3.0)]);
        assert_eq!(segments[4][1], (5.0, 9.0));
    }

    #[test]
    fn test_decade_ticks() {
        let labels = vec!["1980's".to_string(), "1990's".to_string()];
        assert_eq!(decade_tick(&labels, 0.0), "1980's");
        assert_eq!(decade_tick(&labels, 1.0), "1990's");
        assert_eq!(decade_tick(&labels, 0.5), "");
        assert_eq!(decade_tick(&labels, 2.0), "");
        assert_eq!(decade_tick(&labels, -1.0), "");
    }

    #[test]
    fn test_empty_trends_rejected() {
        let dir = TempDir::new().unwrap();
        let trends = YearlyTrends {
            years: vec![],
            series: vec![],
            markers: vec![],
        };
        assert!(matches!(
            render_trends(&trends, dir.path()),
            Err(PlotError::InvalidData(_))
        ));
    }

    #[test]
    #[ignore = "text rendering needs a system sans-serif font"]
    fn test_render_trends_writes_png() {
        let dir = TempDir::new().unwrap();
        let trends = YearlyTrends {
            years: vec![1979, 1980, 1981],
            series: vec![TrendSeries {
                column: StatColumn::ThreePointAttempts,
                label: StatColumn::ThreePointAttempts.label().to_string(),
                means: vec![f64::NAN, 20.0, 25.0],
                max: 25.0,
            }],
            markers: vec![YearMarker {
                year: 1980,
                label: "Three Point Rule Introduced".to_string(),
            }],
        };

        let path = render_trends(&trends, dir.path()).unwrap();
        assert_eq!(path, dir.path().join(TRENDS_FILE));
        assert!(path.exists());
    }
}
