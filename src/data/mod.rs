//! Data module - simulation series model

mod series;

pub use series::{SeriesError, SimulationSeries};
