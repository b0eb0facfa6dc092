//! Prediction result types and their presentation rules.

use serde::{Deserialize, Serialize};

/// Probability above which a patient is shown in the high-risk band.
///
/// The comparison is strict: exactly 0.4 is still low risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.4;

/// Risk band used to color the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    High,
}

impl RiskBand {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_RISK_THRESHOLD {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129), // Emerald (#10B981)
            Self::High => (244, 63, 94), // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Output of the classifier for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of 28-day mortality (0.0 to 1.0)
    pub probability: f64,
}

impl PredictionResult {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    #[must_use]
    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_probability(self.probability)
    }

    #[must_use]
    pub fn display(&self) -> RiskDisplay {
        RiskDisplay::from_probability(self.probability)
    }
}

/// Format a probability as a percentage with two decimals ("42.00%").
#[must_use]
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Everything the result view needs to draw one probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskDisplay {
    pub percent: String,
    pub band: RiskBand,
    /// Probability clamped to [0, 1] for bar and progress widgets.
    pub ratio: f64,
}

impl RiskDisplay {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        Self {
            percent: format_percent(probability),
            band: RiskBand::from_probability(probability),
            ratio: probability.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_formatting() {
        assert_eq!(format_percent(0.42), "42.00%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.12345), "12.35%");
    }

    #[test]
    fn test_band_boundary() {
        assert_eq!(RiskBand::from_probability(0.41), RiskBand::High);
        assert_eq!(RiskBand::from_probability(0.40), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(1.0), RiskBand::High);
    }

    #[test]
    fn test_display_is_stable() {
        let result = PredictionResult::new(0.42);
        let first = result.display();
        let second = result.display();
        assert_eq!(first, second);
        assert_eq!(first.percent, "42.00%");
        assert_eq!(first.band, RiskBand::High);
        assert!((first.ratio - 0.42).abs() < f64::EPSILON);
    }
}
