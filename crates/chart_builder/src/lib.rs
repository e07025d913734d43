//! Chart Builder Library
//!
//! Runs the hoops_core pipelines and renders their results to PNG:
//! `mean_stats_by_year.png`, `<A>_versus_<B>.png`, `stats_<new>_v_<old>.png`
//! and `top_ten_stats_by_decade.png`, plus an optional JSON run report.

pub mod charts;
pub mod run;

use thiserror::Error;

pub use charts::{render_decades, render_eras, render_shooters, render_trends};
pub use run::{run_analyses, run_on, save_report, AnalysisSelection, RunReport};

/// Errors that can occur while rendering a chart
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
