//! Simulation Series Module
//! Holds the aligned simulation outputs consumed by the chart renderer.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    #[error(
        "sequence lengths differ: glucose={glucose}, insulin_bolus={insulin_bolus}, \
         basal={basal}, meals={meals}, time={time}"
    )]
    LengthMismatch {
        glucose: usize,
        insulin_bolus: usize,
        basal: usize,
        meals: usize,
        time: usize,
    },
    #[error("at least two samples are required, got {0}")]
    TooShort(usize),
    #[error("timestamps must be non-decreasing (violated at index {0})")]
    NonMonotonicTime(usize),
}

/// Aligned simulation outputs over a common time axis.
///
/// Glucose is in mg/dl, insulin rates in U/min, meals in g. The insulin bolus
/// sequence is carried with the rest of the record but is not rendered.
#[derive(Debug, Clone)]
pub struct SimulationSeries {
    glucose: Vec<f64>,
    insulin_bolus: Vec<f64>,
    basal: Vec<f64>,
    meals: Vec<f64>,
    time: Vec<NaiveDateTime>,
}

impl SimulationSeries {
    /// Build a series, validating index alignment and timestamp ordering.
    pub fn new(
        glucose: Vec<f64>,
        insulin_bolus: Vec<f64>,
        basal: Vec<f64>,
        meals: Vec<f64>,
        time: Vec<NaiveDateTime>,
    ) -> Result<Self, SeriesError> {
        let len = time.len();
        if glucose.len() != len
            || insulin_bolus.len() != len
            || basal.len() != len
            || meals.len() != len
        {
            return Err(SeriesError::LengthMismatch {
                glucose: glucose.len(),
                insulin_bolus: insulin_bolus.len(),
                basal: basal.len(),
                meals: meals.len(),
                time: len,
            });
        }

        // A single sample has no time extent to plot over.
        if len < 2 {
            return Err(SeriesError::TooShort(len));
        }

        if let Some(idx) = time.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(SeriesError::NonMonotonicTime(idx + 1));
        }

        Ok(Self {
            glucose,
            insulin_bolus,
            basal,
            meals,
            time,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn glucose(&self) -> &[f64] {
        &self.glucose
    }

    pub fn insulin_bolus(&self) -> &[f64] {
        &self.insulin_bolus
    }

    pub fn basal(&self) -> &[f64] {
        &self.basal
    }

    pub fn meals(&self) -> &[f64] {
        &self.meals
    }

    pub fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.time[0]
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.time[self.time.len() - 1]
    }

    /// Instant at the middle sample, used to anchor panel annotations.
    pub fn midpoint_time(&self) -> NaiveDateTime {
        self.time[self.time.len() / 2]
    }
}
