//! Finish-time distribution
//!
//! Equal-width histogram of a cohort's times split by gender, plus the
//! time-axis ticks used to label it. The renderer only draws what these
//! functions return.

use crate::cohort::Cohort;
use crate::error::{Result, ResultsError};
use crate::types::Gender;
use crate::utils::format_clock;
use serde::Serialize;

pub const DEFAULT_BINS: usize = 50;

/// Tick spacing on the time axis: five minutes
pub const DEFAULT_TICK_INTERVAL: u64 = 300;

/// Most ticks `time_ticks` returns; wider ranges get a coarser interval
pub const MAX_TICKS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub male: usize,
    pub female: usize,
}

impl HistogramBin {
    pub fn total(&self) -> usize {
        self.male + self.female
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub distance: f64,
    pub bins: Vec<HistogramBin>,
    /// Rows left out because their time is not finite
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeTick {
    pub seconds: i64,
    /// `H:MM:SS`
    pub label: String,
}

impl Cohort<'_> {
    /// Histogram of finish times with `bins` equal-width bins
    ///
    /// The last bin is closed on the right so the slowest time is counted.
    /// A cohort where every time is equal gets bins one second wide.
    ///
    /// # Errors
    /// `InvalidBins` for zero bins, `EmptyCohort` when there is nothing to bin.
    pub fn histogram(&self, bins: usize) -> Result<Histogram> {
        if bins == 0 {
            return Err(ResultsError::InvalidBins);
        }
        self.ensure_not_empty()?;

        let finite: Vec<(f64, Gender)> = self
            .rows()
            .iter()
            .filter(|r| r.result_time.is_finite())
            .map(|r| (r.result_time, r.gender))
            .collect();
        let skipped = self.len() - finite.len();

        if finite.is_empty() {
            return Ok(Histogram {
                distance: self.distance(),
                bins: Vec::new(),
                skipped,
            });
        }

        let lo = finite.iter().map(|(t, _)| *t).fold(f64::INFINITY, f64::min);
        let hi = finite.iter().map(|(t, _)| *t).fold(f64::NEG_INFINITY, f64::max);
        let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };

        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                start: lo + width * i as f64,
                end: lo + width * (i + 1) as f64,
                male: 0,
                female: 0,
            })
            .collect();

        for (time, gender) in finite {
            let idx = (((time - lo) / width).floor() as usize).min(bins - 1);
            match gender {
                Gender::Male => out[idx].male += 1,
                Gender::Female => out[idx].female += 1,
            }
        }

        Ok(Histogram {
            distance: self.distance(),
            bins: out,
            skipped,
        })
    }
}

/// Ticks every `interval` seconds from `min` up to the first tick past `max`
///
/// When that would exceed `MAX_TICKS`, the interval is widened to a multiple
/// of `interval` so an outlier time cannot blow up the axis.
pub fn time_ticks(min: f64, max: f64, interval: u64) -> Vec<TimeTick> {
    if interval == 0 || !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }

    let span = max - min;
    let steps = (span / interval as f64).ceil();
    let step = if steps > MAX_TICKS as f64 {
        let factor = (steps / MAX_TICKS as f64).ceil();
        // Saturating float-to-int cast
        (factor * interval as f64) as u64
    } else {
        interval
    };

    let start = min as i64;
    let stop = (max as i64).saturating_add(i64::try_from(step).unwrap_or(i64::MAX));

    (start..stop)
        .step_by(usize::try_from(step).unwrap_or(usize::MAX))
        .take(MAX_TICKS + 1)
        .map(|seconds| TimeTick {
            seconds,
            label: format_clock(seconds as f64),
        })
        .collect()
}
