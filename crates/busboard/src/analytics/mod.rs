//! Local analytics engine.
//!
//! Pure, read-only functions over historical day logs and the current
//! roster: field auto-suggestions, anomaly flags, a trend forecast, and a
//! natural-language narrative. The engine never writes to the store; every
//! result is recomputed fresh per query and is safe to request repeatedly.

mod anomaly;
mod forecast;
mod report;
mod suggest;

pub use anomaly::detect_anomalies;
pub use forecast::forecast;
pub use report::{narrative, EMPTY_STATE};
pub use suggest::suggest_for_line;

use serde::Serialize;

/// A historically-inferred default for platform/destination given a line label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Most common platform label for the line (may be empty).
    pub platform: String,
    /// Most common destination label for the line (may be empty).
    pub destination: String,
    /// Confidence in [0, 1]; full confidence at 5 historical occurrences.
    pub confidence: f64,
}

/// What kind of deviation an anomaly flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Current arrival rate is well below the historical average.
    LowArrival,
    /// Too many buses assigned to one platform.
    PlatformOverload,
    /// Records with an empty required field.
    MissingFields,
    /// Today's bus count is far from the historical average.
    UnusualVolume,
}

/// How urgent an anomaly is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Worth a look.
    Warning,
    /// Needs attention now.
    Alert,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Alert => write!(f, "alert"),
        }
    }
}

/// A flagged deviation from expected data completeness or historical norms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    /// What kind of deviation.
    pub kind: AnomalyKind,
    /// How urgent it is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// Direction of the recent performance trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Arrival rate is rising.
    Improving,
    /// Arrival rate is falling.
    Declining,
    /// No meaningful movement.
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Declining => write!(f, "declining"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// A weighted-average projection of near-future arrival rate and volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Predicted arrival-rate percentage.
    pub predicted_arrival_rate: i64,
    /// Predicted bus volume.
    pub predicted_volume: i64,
    /// Trend classification over the considered window.
    pub trend: Trend,
    /// Trend magnitude in percentage points (signed).
    pub trend_pct: i64,
}

/// Round half-up (0.5 always rounds toward positive infinity), the rounding
/// the rest of the engine's percentages are defined in terms of.
pub(crate) fn round_half_up(value: f64) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    {
        (value + 0.5).floor() as i64
    }
}

/// Mean of a series, 0 when empty.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}

/// An insertion-ordered frequency tally.
///
/// Ties are broken by first-encountered order: `top` returns the earliest
/// label whose weight no later label strictly exceeds.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    entries: Vec<(String, f64)>,
}

impl Tally {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, label: &str, weight: f64) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, w)) => *w += weight,
            None => self.entries.push((label.to_string(), weight)),
        }
    }

    pub(crate) fn top(&self) -> Option<&str> {
        self.top_entry().map(|(label, _)| label)
    }

    pub(crate) fn top_entry(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, weight) in &self.entries {
            match best {
                Some((_, best_weight)) if *weight <= best_weight => {}
                _ => best = Some((label, *weight)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.4), -2);
        // Half values round toward positive infinity, also for negatives
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_mean() {
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < f64::EPSILON);
        assert!(mean(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tally_top_prefers_higher_weight() {
        let mut tally = Tally::new();
        tally.add("a", 1.0);
        tally.add("b", 1.0);
        tally.add("b", 1.0);
        assert_eq!(tally.top(), Some("b"));
    }

    #[test]
    fn test_tally_tie_broken_by_first_encountered() {
        let mut tally = Tally::new();
        tally.add("late-but-equal", 2.0);
        tally.add("later", 2.0);
        assert_eq!(tally.top(), Some("late-but-equal"));
    }

    #[test]
    fn test_tally_empty() {
        assert!(Tally::new().top().is_none());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Alert);
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::Improving.to_string(), "improving");
        assert_eq!(Trend::Declining.to_string(), "declining");
        assert_eq!(Trend::Stable.to_string(), "stable");
    }
}
