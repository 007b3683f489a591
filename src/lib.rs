//! Glucoplot - Glucose Simulation Chart Rendering
//!
//! Renders the two-panel result figure of a glucose/insulin simulation:
//! glucose concentration with its target band on top, basal insulin and meal
//! events on a shared time axis below. Figures can be written to disk as PNG
//! and opened with the system image viewer.

pub mod charts;
pub mod data;

pub use charts::{ChartError, PlotOptions, PresentationRenderer};
pub use data::{SeriesError, SimulationSeries};
