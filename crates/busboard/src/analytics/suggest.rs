//! Field auto-suggestion from historical usage.
//!
//! Given a line label, mines every bus record across the historical day logs
//! (and, at half weight, the current session) for the most common platform
//! and destination labels.

use crate::roster::{BusRecord, DayLog};

use super::{Suggestion, Tally};

/// Historical occurrences needed for full confidence.
const FULL_CONFIDENCE_OCCURRENCES: f64 = 5.0;

/// Weight of a current-session record relative to a historical one.
const SESSION_WEIGHT: f64 = 0.5;

/// Suggest the most common platform and destination for a line label.
///
/// Session records (the caller excludes the record being edited) contribute
/// at half weight but do not count toward the confidence total: with zero
/// historical occurrences there is no suggestion. Confidence is
/// `min(occurrences / 5, 1)`. A blank line label yields no suggestion.
#[must_use]
pub fn suggest_for_line(
    line: &str,
    logs: &[DayLog],
    session: Option<&[BusRecord]>,
) -> Option<Suggestion> {
    if line.trim().is_empty() {
        return None;
    }

    let mut platforms = Tally::new();
    let mut destinations = Tally::new();
    let mut occurrences: usize = 0;

    for log in logs {
        for bus in &log.buses {
            if bus.line_number != line {
                continue;
            }
            occurrences += 1;
            if !bus.platform_number.is_empty() {
                platforms.add(&bus.platform_number, 1.0);
            }
            if !bus.destination.is_empty() {
                destinations.add(&bus.destination, 1.0);
            }
        }
    }

    if let Some(session) = session {
        for bus in session {
            if bus.line_number != line {
                continue;
            }
            if !bus.platform_number.is_empty() {
                platforms.add(&bus.platform_number, SESSION_WEIGHT);
            }
            if !bus.destination.is_empty() {
                destinations.add(&bus.destination, SESSION_WEIGHT);
            }
        }
    }

    if occurrences == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let confidence = (occurrences as f64 / FULL_CONFIDENCE_OCCURRENCES).min(1.0);

    Some(Suggestion {
        platform: platforms.top().unwrap_or_default().to_string(),
        destination: destinations.top().unwrap_or_default().to_string(),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(line: &str, platform: &str, destination: &str) -> BusRecord {
        BusRecord {
            line_number: line.to_string(),
            platform_number: platform.to_string(),
            destination: destination.to_string(),
            ..BusRecord::new()
        }
    }

    fn log_of(buses: Vec<BusRecord>) -> DayLog {
        DayLog::from_roster(&buses)
    }

    #[test]
    fn test_blank_line_label() {
        let logs = vec![log_of(vec![bus("5", "2", "Haifa")])];
        assert!(suggest_for_line("", &logs, None).is_none());
        assert!(suggest_for_line("   ", &logs, None).is_none());
    }

    #[test]
    fn test_no_history_no_suggestion() {
        let logs = vec![log_of(vec![bus("5", "2", "Haifa")])];
        assert!(suggest_for_line("99", &logs, None).is_none());
    }

    #[test]
    fn test_session_only_occurrences_no_suggestion() {
        // Session records do not count toward the occurrence total
        let session = vec![bus("99", "4", "Eilat")];
        assert!(suggest_for_line("99", &[], Some(&session)).is_none());
    }

    #[test]
    fn test_full_confidence_at_five_occurrences() {
        let logs: Vec<DayLog> = (0..5)
            .map(|_| log_of(vec![bus("12", "2", "Haifa")]))
            .collect();

        let suggestion = suggest_for_line("12", &logs, None).unwrap();
        assert_eq!(suggestion.platform, "2");
        assert_eq!(suggestion.destination, "Haifa");
        assert!((suggestion.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_scales_with_occurrences() {
        let logs: Vec<DayLog> = (0..2)
            .map(|_| log_of(vec![bus("12", "2", "Haifa")]))
            .collect();

        let suggestion = suggest_for_line("12", &logs, None).unwrap();
        assert!((suggestion.confidence - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_capped_at_one() {
        let logs: Vec<DayLog> = (0..9)
            .map(|_| log_of(vec![bus("12", "2", "Haifa")]))
            .collect();

        let suggestion = suggest_for_line("12", &logs, None).unwrap();
        assert!((suggestion.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_most_frequent_labels_win() {
        let logs = vec![
            log_of(vec![bus("7", "3", "Akko"), bus("7", "5", "Akko")]),
            log_of(vec![bus("7", "5", "Nahariya")]),
        ];

        let suggestion = suggest_for_line("7", &logs, None).unwrap();
        assert_eq!(suggestion.platform, "5");
        assert_eq!(suggestion.destination, "Akko");
    }

    #[test]
    fn test_tie_broken_by_first_encountered() {
        let logs = vec![log_of(vec![bus("7", "3", "Akko"), bus("7", "5", "Haifa")])];

        let suggestion = suggest_for_line("7", &logs, None).unwrap();
        assert_eq!(suggestion.platform, "3");
        assert_eq!(suggestion.destination, "Akko");
    }

    #[test]
    fn test_session_contributes_half_weight() {
        // History: platform 3 once. Session: platform 5 twice (weight 1.0).
        // 3 and 5 tie at 1.0; 3 was encountered first and wins.
        let logs = vec![log_of(vec![bus("7", "3", "Akko")])];
        let session = vec![bus("7", "5", "Akko"), bus("7", "5", "Akko")];
        let suggestion = suggest_for_line("7", &logs, Some(&session)).unwrap();
        assert_eq!(suggestion.platform, "3");

        // A third session record tips the balance to 1.5
        let session = vec![
            bus("7", "5", "Akko"),
            bus("7", "5", "Akko"),
            bus("7", "5", "Akko"),
        ];
        let suggestion = suggest_for_line("7", &logs, Some(&session)).unwrap();
        assert_eq!(suggestion.platform, "5");
    }

    #[test]
    fn test_empty_fields_do_not_tally() {
        let logs = vec![
            log_of(vec![bus("7", "", ""), bus("7", "", "")]),
            log_of(vec![bus("7", "4", "Akko")]),
        ];

        let suggestion = suggest_for_line("7", &logs, None).unwrap();
        assert_eq!(suggestion.platform, "4");
        assert_eq!(suggestion.destination, "Akko");
        // All three occurrences still count toward confidence
        assert!((suggestion.confidence - 0.6).abs() < f64::EPSILON);
    }
}
