//! Presentation Chart Renderer
//! Draws the two-panel simulation figure and writes it to disk.
//!
//! Layout:
//! 1. Optional figure title centered at the top
//! 2. Upper panel (3/4 height): glucose trace over the 70-180 mg/dl target
//!    band, with hyper/hypoglycaemia annotations at the horizontal midpoint
//! 3. Lower panel (1/4 height): basal insulin on the left axis and meal
//!    events as filled steps on a secondary right axis
//!
//! Both panels share the time axis; labels show hour of day at 6 h marks.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime, Timelike};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use tracing::info;

use crate::charts::theme::{
    ANNOTATION_FONT_SIZE, ANNOTATION_VSPACE, BASAL_COLOR, BASAL_MAX, BASAL_MIN, BASAL_STEADY,
    BASAL_UPPER, DASH_SIZE, DASH_SPACING, FIGURE_SIZE, GLUCOSE_COLOR, GLUCOSE_LOWER, GLUCOSE_MAX,
    GLUCOSE_MIN, GLUCOSE_PANEL_RATIO, GLUCOSE_STEADY, GLUCOSE_UPPER, HOUR_TICK_INTERVAL,
    LABEL_FONT_SIZE, LINE_WIDTH, MEAL_COLOR, MEAL_HEADROOM, MEAL_SCALE, PANEL_MARGIN,
    SECONDARY_LABEL_AREA, TARGET_BAND_ALPHA, TARGET_BAND_COLOR, TITLE_FONT_SIZE, X_LABEL_AREA,
    Y_LABEL_AREA,
};
use crate::charts::PlotOptions;
use crate::data::SimulationSeries;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("save_name must be provided when save is requested")]
    MissingSaveName,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing failed: {0}")]
    Render(String),
}

/// Renders the two-panel presentation figure.
pub struct PresentationRenderer;

impl PresentationRenderer {
    /// Render a series according to the given options.
    ///
    /// Fails with [`ChartError::MissingSaveName`] before any side effect if a
    /// save is requested without a file name. Saving creates the target
    /// directory when absent and writes `save_path/save_name`; showing opens
    /// the saved figure (or a preview rendered under the OS temp directory)
    /// with the system image viewer.
    pub fn render(series: &SimulationSeries, options: &PlotOptions) -> Result<(), ChartError> {
        let mut saved: Option<PathBuf> = None;
        if options.save {
            let Some(name) = options.save_name.as_deref() else {
                return Err(ChartError::MissingSaveName);
            };
            fs::create_dir_all(&options.save_path)?;
            let path = options.save_path.join(name);
            Self::render_to_file(series, options.title.as_deref(), &path)?;
            info!("Chart saved to {}", path.display());
            saved = Some(path);
        }

        if options.show {
            let path = match saved {
                Some(path) => path,
                None => {
                    let dir = std::env::temp_dir().join("glucoplot");
                    fs::create_dir_all(&dir)?;
                    let path = dir.join("preview.png");
                    Self::render_to_file(series, options.title.as_deref(), &path)?;
                    path
                }
            };
            open::that(&path)?;
            info!("Figure opened from {}", path.display());
        }

        if !options.save && !options.show {
            // Nothing to write or open: render off-screen and discard.
            Self::render_to_rgb(series, options.title.as_deref())?;
        }

        Ok(())
    }

    /// Render directly to a PNG file. The parent directory must exist.
    pub fn render_to_file(
        series: &SimulationSeries,
        title: Option<&str>,
        path: &Path,
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
        Self::draw(&root, series, title).map_err(|e| ChartError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
        Ok(())
    }

    /// Render into an in-memory RGB888 buffer of [`FIGURE_SIZE`] pixels.
    pub fn render_to_rgb(
        series: &SimulationSeries,
        title: Option<&str>,
    ) -> Result<Vec<u8>, ChartError> {
        let (width, height) = FIGURE_SIZE;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, FIGURE_SIZE).into_drawing_area();
            Self::draw(&root, series, title).map_err(|e| ChartError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }
        Ok(buffer)
    }

    fn draw<DB>(
        root: &DrawingArea<DB, Shift>,
        series: &SimulationSeries,
        title: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        let area = match title {
            Some(text) => root.titled(text, ("sans-serif", TITLE_FONT_SIZE).into_font())?,
            None => root.clone(),
        };

        let (_, height) = area.dim_in_pixel();
        let split = (f64::from(height) * GLUCOSE_PANEL_RATIO) as u32;
        let (upper, lower) = area.split_vertically(split);

        let xmin = series.start_time();
        let xmax = series.end_time();
        let hour_marks = hour_ticks(xmin, xmax, HOUR_TICK_INTERVAL);

        // Upper panel: glucose. The time grid is drawn but its labels live on
        // the lower panel only.
        let mut glucose_chart = ChartBuilder::on(&upper)
            .margin(PANEL_MARGIN)
            .x_label_area_size(0)
            .y_label_area_size(Y_LABEL_AREA)
            .right_y_label_area_size(SECONDARY_LABEL_AREA)
            .build_cartesian_2d(
                RangedDateTime::from(xmin..xmax).with_key_points(hour_marks.clone()),
                (GLUCOSE_MIN..GLUCOSE_MAX).with_key_points(vec![
                    GLUCOSE_LOWER,
                    GLUCOSE_STEADY,
                    GLUCOSE_UPPER,
                ]),
            )?;

        glucose_chart
            .configure_mesh()
            .y_desc("Glucose Concentration [mg/dl]")
            .y_label_formatter(&|v| v.to_string())
            .label_style(("sans-serif", LABEL_FONT_SIZE))
            .draw()?;

        glucose_chart.plotting_area().draw(&Rectangle::new(
            [(xmin, GLUCOSE_LOWER), (xmax, GLUCOSE_UPPER)],
            TARGET_BAND_COLOR.mix(TARGET_BAND_ALPHA).filled(),
        ))?;

        glucose_chart.draw_series(LineSeries::new(
            series
                .time()
                .iter()
                .copied()
                .zip(series.glucose().iter().copied()),
            GLUCOSE_COLOR.stroke_width(LINE_WIDTH),
        ))?;

        for (bound, width) in [
            (GLUCOSE_UPPER, LINE_WIDTH),
            (GLUCOSE_STEADY, 1),
            (GLUCOSE_LOWER, LINE_WIDTH),
        ] {
            glucose_chart.draw_series(DashedLineSeries::new(
                vec![(xmin, bound), (xmax, bound)],
                DASH_SIZE,
                DASH_SPACING,
                BLACK.stroke_width(width),
            ))?;
        }

        let mid = series.midpoint_time();
        let annotation =
            FontDesc::new(FontFamily::SansSerif, ANNOTATION_FONT_SIZE, FontStyle::Bold)
                .color(&BLACK);
        glucose_chart.plotting_area().draw(&Text::new(
            "Hyperglycaemia",
            (mid, GLUCOSE_UPPER + ANNOTATION_VSPACE),
            annotation.pos(Pos::new(HPos::Center, VPos::Bottom)),
        ))?;
        glucose_chart.plotting_area().draw(&Text::new(
            "Hypoglycaemia",
            (mid, GLUCOSE_LOWER - 2.0 * ANNOTATION_VSPACE),
            annotation.pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;

        // Lower panel: basal insulin with the meal overlay on the right axis.
        let meal_ticks = meal_axis_ticks(series.meals());
        let mut basal_chart = ChartBuilder::on(&lower)
            .margin(PANEL_MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .right_y_label_area_size(SECONDARY_LABEL_AREA)
            .build_cartesian_2d(
                RangedDateTime::from(xmin..xmax).with_key_points(hour_marks),
                (BASAL_MIN..BASAL_MAX).with_key_points(vec![BASAL_STEADY, BASAL_UPPER]),
            )?
            .set_secondary_coord(
                RangedDateTime::from(xmin..xmax),
                (0.0..meal_axis_top(series.meals())).with_key_points(meal_ticks),
            );

        basal_chart
            .configure_mesh()
            .x_desc("Time [h]")
            .y_desc("Basal Insulin [U/min]")
            .x_label_formatter(&|t| t.format("%H").to_string())
            .y_label_formatter(&|v| v.to_string())
            .label_style(("sans-serif", LABEL_FONT_SIZE))
            .draw()?;

        basal_chart
            .configure_secondary_axes()
            .y_desc("Meal Size [g]")
            .y_label_formatter(&|v| v.to_string())
            .label_style(
                ("sans-serif", LABEL_FONT_SIZE)
                    .into_font()
                    .color(&MEAL_COLOR),
            )
            .draw()?;

        basal_chart.draw_series(LineSeries::new(
            series
                .time()
                .iter()
                .copied()
                .zip(series.basal().iter().copied()),
            BASAL_COLOR.stroke_width(LINE_WIDTH),
        ))?;

        for (bound, width) in [(BASAL_STEADY, 1), (BASAL_UPPER, LINE_WIDTH)] {
            basal_chart.draw_series(DashedLineSeries::new(
                vec![(xmin, bound), (xmax, bound)],
                DASH_SIZE,
                DASH_SPACING,
                BLACK.stroke_width(width),
            ))?;
        }

        for segment in meal_steps(series.time(), series.meals()) {
            basal_chart.draw_secondary_series(
                AreaSeries::new(segment.iter().copied(), 0.0, MEAL_COLOR.filled())
                    .border_style(MEAL_COLOR.stroke_width(LINE_WIDTH)),
            )?;
        }

        Ok(())
    }
}

/// Instants at whole hours divisible by `interval` between `start` and `end`.
fn hour_ticks(start: NaiveDateTime, end: NaiveDateTime, interval: i64) -> Vec<NaiveDateTime> {
    let Some(mut tick) = start.date().and_hms_opt(start.time().hour(), 0, 0) else {
        return Vec::new();
    };
    while tick < start || i64::from(tick.hour()) % interval != 0 {
        tick += Duration::hours(1);
    }

    let mut marks = Vec::new();
    while tick <= end {
        marks.push(tick);
        tick += Duration::hours(interval);
    }
    marks
}

/// Top of the secondary meal axis: tallest scaled meal plus headroom.
fn meal_axis_top(meals: &[f64]) -> f64 {
    meals.iter().copied().fold(0.0_f64, f64::max) * MEAL_SCALE + MEAL_HEADROOM
}

/// Tick values for the meal axis: zero followed by the distinct positive
/// scaled meal values in descending order.
fn meal_axis_ticks(meals: &[f64]) -> Vec<f64> {
    let mut scaled: Vec<f64> = meals
        .iter()
        .copied()
        .filter(|m| *m > 0.0)
        .map(|m| m * MEAL_SCALE)
        .collect();
    scaled.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    scaled.dedup();

    let mut ticks = Vec::with_capacity(scaled.len() + 1);
    ticks.push(0.0);
    ticks.extend(scaled);
    ticks
}

/// Scaled step segments over each contiguous run of positive meal samples.
/// Zero samples are masked out so the overlay only appears at meal times.
fn meal_steps(time: &[NaiveDateTime], meals: &[f64]) -> Vec<Vec<(NaiveDateTime, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(NaiveDateTime, f64)> = Vec::new();

    for (idx, &meal) in meals.iter().enumerate() {
        if meal > 0.0 {
            let value = meal * MEAL_SCALE;
            current.push((time[idx], value));
            if let Some(&next) = time.get(idx + 1) {
                current.push((next, value));
            }
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instants(count: usize, step_minutes: i64) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| start + Duration::minutes(step_minutes * i as i64))
            .collect()
    }

    #[test]
    fn meal_ticks_are_zero_then_descending_scaled_values() {
        assert_eq!(
            meal_axis_ticks(&[0.0, 0.0, 5.0, 0.0, 10.0]),
            vec![0.0, 50.0, 25.0]
        );
    }

    #[test]
    fn meal_ticks_collapse_duplicates() {
        assert_eq!(meal_axis_ticks(&[5.0, 5.0, 2.0]), vec![0.0, 25.0, 10.0]);
    }

    #[test]
    fn meal_ticks_without_meals_keep_the_zero() {
        assert_eq!(meal_axis_ticks(&[0.0, 0.0]), vec![0.0]);
    }

    #[test]
    fn meal_axis_leaves_headroom() {
        assert_eq!(meal_axis_top(&[0.0, 10.0, 5.0]), 55.0);
        assert_eq!(meal_axis_top(&[0.0, 0.0]), 5.0);
    }

    #[test]
    fn meal_steps_split_on_zero_runs() {
        let time = instants(5, 5);
        let segments = meal_steps(&time, &[0.0, 0.0, 5.0, 0.0, 10.0]);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(time[2], 25.0), (time[3], 25.0)]);
        // Last sample has no successor to extend the step to.
        assert_eq!(segments[1], vec![(time[4], 50.0)]);
    }

    #[test]
    fn meal_steps_keep_contiguous_runs_together() {
        let time = instants(4, 5);
        let segments = meal_steps(&time, &[0.0, 5.0, 5.0, 0.0]);

        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0],
            vec![
                (time[1], 25.0),
                (time[2], 25.0),
                (time[2], 25.0),
                (time[3], 25.0)
            ]
        );
    }

    #[test]
    fn hour_ticks_cover_a_day_at_six_hour_marks() {
        let time = instants(289, 5); // 24 h at 5 min
        let marks = hour_ticks(time[0], time[288], HOUR_TICK_INTERVAL);

        assert_eq!(marks.len(), 5);
        assert_eq!(marks[0], time[0]);
        assert_eq!(marks[4], time[288]);
        assert!(marks.iter().all(|m| m.hour() % 6 == 0));
    }

    #[test]
    fn hour_ticks_advance_to_the_next_aligned_hour() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let marks = hour_ticks(start, start + Duration::hours(12), HOUR_TICK_INTERVAL);

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].hour(), 6);
        assert_eq!(marks[1].hour(), 12);
        assert!(marks[0] > start);
    }
}
