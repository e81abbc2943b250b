//! PNG export of the Hubble diagram.
//!
//! Drawn with Plotters' bitmap backend: blue markers for observations, a red
//! fitted line. No text is rendered (Plotters is built without a font backend),
//! so the image carries axes and data only.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::PlotSeries;

const GRID_DIVISIONS: usize = 5;

/// Render `series` to a PNG file of `width` x `height` pixels.
pub fn write_plot_png(path: &Path, series: &PlotSeries, width: u32, height: u32) -> Result<(), AppError> {
    if width < 64 || height < 64 {
        return Err(AppError::new(2, format!("Plot image too small: {width}x{height}")));
    }

    draw_png(path, series, (width, height))
        .map_err(|e| AppError::new(2, format!("Failed to write plot PNG '{}': {e}", path.display())))
}

fn draw_png(path: &Path, series: &PlotSeries, size: (u32, u32)) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let [x0, x1] = series.x_bounds;
    let [y0, y1] = series.y_bounds;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    // Tick labels would need a font backend; the mesh keeps only the axes.
    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .axis_style(&BLACK)
        .draw()?;

    let grid = RGBColor(235, 235, 235);
    for i in 0..=GRID_DIVISIONS {
        let u = i as f64 / GRID_DIVISIONS as f64;
        let x = x0 + u * (x1 - x0);
        let y = y0 + u * (y1 - y0);
        chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &grid))?;
        chart.draw_series(LineSeries::new([(x0, y), (x1, y)], &grid))?;
    }

    if let Some([a, b]) = series.line {
        chart.draw_series(LineSeries::new([a, b], RED.stroke_width(3)))?;
    }

    chart.draw_series(
        series
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 8, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}
