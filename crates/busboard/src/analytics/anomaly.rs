//! Anomaly detection over the current roster.
//!
//! Structural checks (missing fields, platform overload) always run; the
//! history-relative checks (arrival rate, volume) need at least three saved
//! day logs to have a meaningful baseline.

use crate::roster::{BusRecord, DayLog};

use super::{mean, round_half_up, Anomaly, AnomalyKind, Severity};

/// Buses on one platform that trigger an alert.
const OVERLOAD_ALERT: usize = 6;
/// Buses on one platform that trigger a warning.
const OVERLOAD_WARNING: usize = 4;
/// Minimum saved logs before history-relative checks run.
const MIN_HISTORY_LOGS: usize = 3;
/// Current rate below this fraction of the historical mean is flagged.
const LOW_RATE_FACTOR: f64 = 0.7;
/// Current volume above this multiple of the mean is unusually high.
const HIGH_VOLUME_FACTOR: f64 = 1.5;
/// Current volume below this fraction of the mean is unusually low.
const LOW_VOLUME_FACTOR: f64 = 0.5;
/// High-volume flag also requires more than this many buses.
const HIGH_VOLUME_FLOOR: usize = 5;
/// Low-volume flag also requires a historical mean above this.
const LOW_VOLUME_MEAN_FLOOR: f64 = 3.0;

/// Detect anomalies in the current roster against historical day logs.
///
/// Checks run in a fixed order and each appends independently; a roster can
/// trigger zero, one, or several anomalies. An empty roster triggers none.
#[must_use]
pub fn detect_anomalies(current: &[BusRecord], logs: &[DayLog]) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    if current.is_empty() {
        return anomalies;
    }

    // Data completeness
    let missing_platform = current
        .iter()
        .filter(|b| b.platform_number.is_empty())
        .count();
    let missing_dest = current.iter().filter(|b| b.destination.is_empty()).count();
    if missing_platform > 0 {
        anomalies.push(Anomaly {
            kind: AnomalyKind::MissingFields,
            severity: Severity::Info,
            message: format!("{missing_platform} bus(es) have no platform assigned."),
        });
    }
    if missing_dest > 0 {
        anomalies.push(Anomaly {
            kind: AnomalyKind::MissingFields,
            severity: Severity::Info,
            message: format!("{missing_dest} bus(es) have no destination."),
        });
    }

    // Platform overload, evaluated per platform in first-seen order
    let mut platform_load: Vec<(&str, usize)> = Vec::new();
    for bus in current {
        if bus.platform_number.is_empty() {
            continue;
        }
        match platform_load
            .iter_mut()
            .find(|(p, _)| *p == bus.platform_number)
        {
            Some((_, count)) => *count += 1,
            None => platform_load.push((&bus.platform_number, 1)),
        }
    }
    for (platform, count) in platform_load {
        if count >= OVERLOAD_ALERT {
            anomalies.push(Anomaly {
                kind: AnomalyKind::PlatformOverload,
                severity: Severity::Alert,
                message: format!("Platform {platform} is overloaded with {count} buses!"),
            });
        } else if count >= OVERLOAD_WARNING {
            anomalies.push(Anomaly {
                kind: AnomalyKind::PlatformOverload,
                severity: Severity::Warning,
                message: format!("Platform {platform} is getting busy ({count} buses)."),
            });
        }
    }

    if logs.len() < MIN_HISTORY_LOGS {
        return anomalies;
    }

    // Arrival rate against the unweighted mean of per-log rates
    let arrived = current.iter().filter(|b| b.arrived).count();
    #[allow(clippy::cast_precision_loss)]
    let current_rate = (arrived as f64 / current.len() as f64) * 100.0;
    let rates: Vec<f64> = logs.iter().map(DayLog::arrival_rate).collect();
    let avg_rate = mean(&rates);

    if current_rate > 0.0 && current_rate < avg_rate * LOW_RATE_FACTOR {
        anomalies.push(Anomaly {
            kind: AnomalyKind::LowArrival,
            severity: Severity::Warning,
            message: format!(
                "Current arrival rate ({}%) is below your average ({}%).",
                round_half_up(current_rate),
                round_half_up(avg_rate)
            ),
        });
    }

    // Volume against the mean per-log total
    #[allow(clippy::cast_precision_loss)]
    let volumes: Vec<f64> = logs.iter().map(|l| l.total_count as f64).collect();
    let avg_volume = mean(&volumes);
    #[allow(clippy::cast_precision_loss)]
    let current_volume = current.len() as f64;

    if current_volume > avg_volume * HIGH_VOLUME_FACTOR && current.len() > HIGH_VOLUME_FLOOR {
        anomalies.push(Anomaly {
            kind: AnomalyKind::UnusualVolume,
            severity: Severity::Info,
            message: format!(
                "Unusually high bus count today ({} vs avg {}).",
                current.len(),
                round_half_up(avg_volume)
            ),
        });
    } else if current_volume < avg_volume * LOW_VOLUME_FACTOR
        && !current.is_empty()
        && avg_volume > LOW_VOLUME_MEAN_FLOOR
    {
        anomalies.push(Anomaly {
            kind: AnomalyKind::UnusualVolume,
            severity: Severity::Info,
            message: format!(
                "Fewer buses than usual today ({} vs avg {}).",
                current.len(),
                round_half_up(avg_volume)
            ),
        });
    }

    anomalies
}
