//! Measurement Values
//!
//! A `Measurement` is a point estimate with its one-sigma uncertainty and the
//! number of samples behind it. Values are immutable; baseline removal builds
//! a new one with the two uncertainties added in quadrature.

use serde::Serialize;
use std::fmt;
use std::ops::Sub;
use thiserror::Error;

/// Errors raised when constructing a measurement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    /// Uncertainty was negative or not a number
    #[error("Invalid result: uncertainty must be non-negative, got {0}")]
    InvalidResult(f64),
}

/// Value with uncertainty, as produced by one measurement pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    value: f64,
    uncertainty: f64,
    sample_count: usize,
}

impl Measurement {
    /// Build a measurement, rejecting negative (or NaN) uncertainties.
    pub fn new(
        value: f64,
        uncertainty: f64,
        sample_count: usize,
    ) -> Result<Self, MeasurementError> {
        if uncertainty.is_nan() || uncertainty < 0.0 {
            return Err(MeasurementError::InvalidResult(uncertainty));
        }
        Ok(Self {
            value,
            uncertainty,
            sample_count,
        })
    }

    /// Point estimate
    pub fn value(&self) -> f64 {
        self.value
    }

    /// One-sigma uncertainty of the point estimate
    pub fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    /// Number of samples the estimate was computed from
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Unrounded `(value, uncertainty)` pair
    pub fn raw(&self) -> (f64, f64) {
        (self.value, self.uncertainty)
    }

    /// `uncertainty / |value|`, or `None` when the value is zero.
    pub fn relative_uncertainty(&self) -> Option<f64> {
        if self.value == 0.0 {
            None
        } else {
            Some(self.uncertainty / self.value.abs())
        }
    }

    /// Subtract `other`, propagating independent errors.
    ///
    /// The sample count of `self` is kept: it describes the foreground
    /// measurement the caller is interested in.
    pub fn subtract(&self, other: &Measurement) -> Measurement {
        Measurement {
            value: self.value - other.value,
            uncertainty: self.uncertainty.hypot(other.uncertainty),
            sample_count: self.sample_count,
        }
    }

    /// Remove a baseline if one was measured; identity otherwise.
    pub fn subtract_baseline(&self, baseline: Option<&Measurement>) -> Measurement {
        match baseline {
            Some(b) => self.subtract(b),
            None => *self,
        }
    }

    /// Value and uncertainty rounded to the first significant digit of the
    /// uncertainty, with the number of decimals needed to print them.
    ///
    /// A zero or non-finite uncertainty keeps the value to
    /// `EXACT_SIGNIFICANT_DIGITS` significant digits, which drops summation
    /// noise such as `0.010000000000000002`.
    pub fn rounded(&self) -> (f64, f64, Option<usize>) {
        if !self.uncertainty.is_finite() || self.uncertainty <= 0.0 {
            let value = round_significant(self.value, EXACT_SIGNIFICANT_DIGITS);
            return (value, self.uncertainty, None);
        }

        let exponent = self.uncertainty.log10().floor() as i32;
        let scale = 10f64.powi(exponent);
        let value = (self.value / scale).round() * scale;
        let uncertainty = (self.uncertainty / scale).round() * scale;
        let decimals = (-exponent).max(0) as usize;
        (value, uncertainty, Some(decimals))
    }
}

/// Significant digits kept when there is no uncertainty to round to
const EXACT_SIGNIFICANT_DIGITS: i32 = 12;

fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let exponent = value.abs().log10().floor() as i32;
    let shift = digits - 1 - exponent;
    // Scale only by positive powers of ten; their reciprocals are inexact.
    if shift >= 0 {
        let scale = 10f64.powi(shift);
        (value * scale).round() / scale
    } else {
        let scale = 10f64.powi(-shift);
        (value / scale).round() * scale
    }
}

impl Sub for Measurement {
    type Output = Measurement;

    fn sub(self, rhs: Measurement) -> Measurement {
        self.subtract(&rhs)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded() {
            (value, uncertainty, Some(decimals)) => {
                write!(f, "{value:.decimals$} ± {uncertainty:.decimals$}")
            }
            (value, uncertainty, None) => write!(f, "{value} ± {uncertainty}"),
        }
    }
}
