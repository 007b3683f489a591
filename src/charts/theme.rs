//! Chart Theme Module
//! Fixed visual constants for the presentation figure.

use plotters::style::colors::{BLUE, GREEN, RED};
use plotters::style::RGBColor;

/// Figure size in pixels (matches the original 10x6 in layout).
pub const FIGURE_SIZE: (u32, u32) = (1000, 600);
/// Fraction of the figure height given to the glucose panel (3:1 split).
pub const GLUCOSE_PANEL_RATIO: f64 = 0.75;

pub const GLUCOSE_COLOR: RGBColor = RED;
pub const BASAL_COLOR: RGBColor = BLUE;
pub const MEAL_COLOR: RGBColor = GREEN;
pub const TARGET_BAND_COLOR: RGBColor = GREEN;
pub const TARGET_BAND_ALPHA: f64 = 0.2;

// Glucose panel bounds [mg/dl]
pub const GLUCOSE_MIN: f64 = 50.0;
pub const GLUCOSE_MAX: f64 = 200.0;
pub const GLUCOSE_LOWER: f64 = 70.0;
pub const GLUCOSE_UPPER: f64 = 180.0;
pub const GLUCOSE_STEADY: f64 = 120.0;

// Basal panel bounds [U/min]
pub const BASAL_MIN: f64 = 0.0;
pub const BASAL_MAX: f64 = 0.05;
pub const BASAL_UPPER: f64 = 0.04;
pub const BASAL_STEADY: f64 = 0.0022;

/// Display scale applied to meal values on the secondary axis.
pub const MEAL_SCALE: f64 = 5.0;
/// Headroom above the tallest scaled meal on the secondary axis.
pub const MEAL_HEADROOM: f64 = 5.0;

/// Spacing of the hour-of-day labels on the shared time axis.
pub const HOUR_TICK_INTERVAL: i64 = 6;

pub const LINE_WIDTH: u32 = 2;
pub const DASH_SIZE: i32 = 8;
pub const DASH_SPACING: i32 = 6;

pub const PANEL_MARGIN: u32 = 8;
pub const X_LABEL_AREA: u32 = 40;
pub const Y_LABEL_AREA: u32 = 60;
pub const SECONDARY_LABEL_AREA: u32 = 55;

pub const TITLE_FONT_SIZE: i32 = 28;
pub const LABEL_FONT_SIZE: i32 = 13;
pub const ANNOTATION_FONT_SIZE: f64 = 14.0;
/// Vertical offset of the hyper/hypoglycaemia annotations [mg/dl].
pub const ANNOTATION_VSPACE: f64 = 4.0;
