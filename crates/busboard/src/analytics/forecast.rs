//! Weighted trend forecast over recent day logs.

use crate::roster::DayLog;

use super::{mean, round_half_up, Forecast, Trend};

/// Minimum saved logs before a forecast is produced.
const MIN_LOGS: usize = 3;
/// Newest logs considered by the forecast.
const WINDOW: usize = 7;
/// Half-split difference beyond which the trend is not stable.
const TREND_BAND: f64 = 3.0;

/// Forecast the next arrival rate and volume from the newest logs.
///
/// Takes up to the seven newest logs (the slice is newest first) and computes
/// a linearly weighted average of their arrival rates and bus counts, newest
/// weighted highest. The trend compares the newer half of the window against
/// the older half. Fewer than three logs yields no forecast.
#[must_use]
pub fn forecast(logs: &[DayLog]) -> Option<Forecast> {
    if logs.len() < MIN_LOGS {
        return None;
    }

    let window = &logs[..logs.len().min(WINDOW)];
    let rates: Vec<f64> = window.iter().map(DayLog::arrival_rate).collect();
    #[allow(clippy::cast_precision_loss)]
    let volumes: Vec<f64> = window.iter().map(|l| l.total_count as f64).collect();

    Some(Forecast {
        predicted_arrival_rate: round_half_up(weighted_average(&rates)),
        predicted_volume: round_half_up(weighted_average(&volumes)),
        trend: classify_trend(&rates),
        trend_pct: round_half_up(half_split_diff(&rates)),
    })
}

/// Linearly weighted average: for N values the newest gets weight N, the
/// oldest weight 1.
fn weighted_average(values: &[f64]) -> f64 {
    let n = values.len();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (i, value) in values.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let weight = (n - i) as f64;
        weighted_sum += value * weight;
        weight_total += weight;
    }
    if weight_total == 0.0 {
        0.0
    } else {
        weighted_sum / weight_total
    }
}

/// Newer-half mean minus older-half mean (values are newest first).
fn half_split_diff(rates: &[f64]) -> f64 {
    let mid = rates.len() / 2;
    mean(&rates[..mid]) - mean(&rates[mid..])
}

fn classify_trend(rates: &[f64]) -> Trend {
    let diff = half_split_diff(rates);
    if diff > TREND_BAND {
        Trend::Improving
    } else if diff < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::BusRecord;

    /// A log with the given total count and arrival rate percentage.
    fn log(total: usize, rate_pct: usize) -> DayLog {
        let arrived = total * rate_pct / 100;
        let buses: Vec<BusRecord> = (0..total)
            .map(|i| BusRecord {
                line_number: "1".to_string(),
                arrived: i < arrived,
                ..BusRecord::new()
            })
            .collect();
        DayLog::from_roster(&buses)
    }

    #[test]
    fn test_needs_three_logs() {
        assert!(forecast(&[]).is_none());
        assert!(forecast(&[log(4, 100), log(4, 100)]).is_none());
        assert!(forecast(&[log(4, 100), log(4, 100), log(4, 100)]).is_some());
    }

    #[test]
    fn test_flat_history_is_stable() {
        let logs = vec![log(10, 100); 3];
        let f = forecast(&logs).unwrap();

        assert_eq!(f.predicted_arrival_rate, 100);
        assert_eq!(f.predicted_volume, 10);
        assert_eq!(f.trend, Trend::Stable);
        assert_eq!(f.trend_pct, 0);
    }

    #[test]
    fn test_recent_improvement_detected() {
        // Newest first: three logs at 90%, then three at 60%.
        // Newer half mean 90, older half mean 60, diff +30.
        let logs = vec![
            log(10, 90),
            log(10, 90),
            log(10, 90),
            log(10, 60),
            log(10, 60),
            log(10, 60),
        ];
        let f = forecast(&logs).unwrap();

        assert_eq!(f.trend, Trend::Improving);
        assert_eq!(f.trend_pct, 30);
    }

    #[test]
    fn test_recent_decline_detected() {
        let logs = vec![
            log(10, 50),
            log(10, 50),
            log(10, 50),
            log(10, 90),
            log(10, 90),
            log(10, 90),
        ];
        let f = forecast(&logs).unwrap();

        assert_eq!(f.trend, Trend::Declining);
        assert_eq!(f.trend_pct, -40);
    }

    #[test]
    fn test_small_movement_is_stable() {
        // 46/50 = 92% and 45/50 = 90%; the diff of exactly 2 stays inside
        // the stable band
        let logs = vec![log(50, 92), log(50, 92), log(50, 90), log(50, 90)];
        let f = forecast(&logs).unwrap();

        assert_eq!(f.trend, Trend::Stable);
        assert_eq!(f.trend_pct, 2);
    }

    #[test]
    fn test_newest_logs_weighted_highest() {
        // Newest 100%, middle 50%, oldest 0%.
        // Weighted: (100*3 + 50*2 + 0*1) / 6 = 66.67, rounds to 67.
        let logs = vec![log(10, 100), log(10, 50), log(10, 0)];
        let f = forecast(&logs).unwrap();

        assert_eq!(f.predicted_arrival_rate, 67);
    }

    #[test]
    fn test_window_ignores_older_logs() {
        // Seven perfect days followed by a disastrous eighth: the eighth
        // must not influence the forecast.
        let mut logs = vec![log(10, 100); 7];
        logs.push(log(50, 0));
        let f = forecast(&logs).unwrap();

        assert_eq!(f.predicted_arrival_rate, 100);
        assert_eq!(f.predicted_volume, 10);
        assert_eq!(f.trend, Trend::Stable);
    }

    #[test]
    fn test_odd_window_splits_at_floor_midpoint() {
        // Five logs, mid = 2: newer half is the two newest, older half the
        // remaining three. Diff = 100 - 40 = 60.
        let logs = vec![
            log(10, 100),
            log(10, 100),
            log(10, 40),
            log(10, 40),
            log(10, 40),
        ];
        let f = forecast(&logs).unwrap();

        assert_eq!(f.trend, Trend::Improving);
        assert_eq!(f.trend_pct, 60);
    }
}
