//! Natural-language narrative over the historical day logs.

use crate::roster::DayLog;

use super::{forecast, round_half_up, Tally, Trend};

/// Narrative shown when no logs have been saved yet.
pub const EMPTY_STATE: &str = "Save daily logs to see smart insights here.";

/// Newest logs forming "this week" in the week comparison.
const WEEK: usize = 7;
/// Minimum logs in the prior window for the comparison to run.
const MIN_PRIOR_LOGS: usize = 3;
/// Week-over-week drop (percentage points) tolerated as "similar".
const WEEK_DROP_TOLERANCE: f64 = -2.0;
/// Occurrences a line needs before its reliability is reported.
const MIN_LINE_OCCURRENCES: usize = 3;
/// Lines below this arrival-rate percentage are called out.
const ATTENTION_RATE: i64 = 80;

/// Build a one-paragraph plain-text summary of the logs (newest first).
///
/// Sentences are appended in a fixed order and joined with single spaces:
/// overall stats, week-over-week comparison, busiest platform, line
/// reliability, then the forecast. With no logs at all the empty-state
/// message is returned verbatim.
#[must_use]
pub fn narrative(logs: &[DayLog]) -> String {
    if logs.is_empty() {
        return EMPTY_STATE.to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    let total_buses: usize = logs.iter().map(|l| l.total_count).sum();
    let total_arrived: usize = logs.iter().map(|l| l.arrived_count).sum();
    let overall_rate = if total_buses > 0 {
        #[allow(clippy::cast_precision_loss)]
        round_half_up(total_arrived as f64 / total_buses as f64 * 100.0)
    } else {
        0
    };
    parts.push(format!(
        "Across {} days, you've tracked {total_buses} buses with an overall {overall_rate}% arrival rate.",
        logs.len()
    ));

    // Week-over-week comparison, only with a usable prior window
    if logs.len() >= WEEK {
        let this_week = &logs[..WEEK];
        let last_week = &logs[WEEK..logs.len().min(2 * WEEK)];
        if last_week.len() >= MIN_PRIOR_LOGS {
            let diff = window_rate(this_week) - window_rate(last_week);
            let pct = round_half_up(diff).abs();
            if diff > 0.0 {
                parts.push(format!("This week is {pct}% better than last week."));
            } else if diff < WEEK_DROP_TOLERANCE {
                parts.push(format!("This week is {pct}% below last week's performance."));
            } else {
                parts.push("Performance this week is similar to last week.".to_string());
            }
        }
    }

    // Busiest platform across all logged buses
    let mut platforms = Tally::new();
    for log in logs {
        for bus in &log.buses {
            if !bus.platform_number.is_empty() {
                platforms.add(&bus.platform_number, 1.0);
            }
        }
    }
    if let Some((platform, count)) = platforms.top_entry() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count as usize;
        parts.push(format!(
            "Platform {platform} is the most used ({count} buses total)."
        ));
    }

    // Line reliability, for lines seen at least three times
    let mut line_stats: Vec<(&str, usize, usize)> = Vec::new();
    for log in logs {
        for bus in &log.buses {
            if bus.line_number.is_empty() {
                continue;
            }
            match line_stats.iter_mut().find(|(l, _, _)| *l == bus.line_number) {
                Some((_, arrived, total)) => {
                    *total += 1;
                    if bus.arrived {
                        *arrived += 1;
                    }
                }
                None => line_stats.push((
                    &bus.line_number,
                    usize::from(bus.arrived),
                    1,
                )),
            }
        }
    }
    line_stats.retain(|(_, _, total)| *total >= MIN_LINE_OCCURRENCES);
    if !line_stats.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let rate_of = |arrived: usize, total: usize| arrived as f64 / total as f64;

        // Ties broken by first-encountered order, like the tallies
        let mut best: Option<(&str, f64)> = None;
        let mut worst: Option<(&str, f64)> = None;
        for &(line, arrived, total) in &line_stats {
            let rate = rate_of(arrived, total);
            match best {
                Some((_, b)) if rate <= b => {}
                _ => best = Some((line, rate)),
            }
            match worst {
                Some((_, w)) if rate >= w => {}
                _ => worst = Some((line, rate)),
            }
        }

        if let Some((line, rate)) = best {
            let rate = round_half_up(rate * 100.0);
            parts.push(format!(
                "Line {line} is the most reliable ({rate}% arrival rate)."
            ));
        }
        if let Some((line, rate)) = worst {
            let rate = round_half_up(rate * 100.0);
            if rate < ATTENTION_RATE {
                parts.push(format!("Line {line} needs attention: only {rate}% arrivals."));
            }
        }
    }

    if let Some(f) = forecast(logs) {
        match f.trend {
            Trend::Improving => parts.push(format!(
                "Trend is improving: +{}% over recent logs.",
                f.trend_pct.abs()
            )),
            Trend::Declining => parts.push(format!(
                "Trend is declining: -{}% over recent logs.",
                f.trend_pct.abs()
            )),
            Trend::Stable => parts.push("Performance trend is steady.".to_string()),
        }
        parts.push(format!(
            "Predicted next arrival rate: {}%.",
            f.predicted_arrival_rate
        ));
    }

    parts.join(" ")
}

/// Arrival rate over a window, pooled (sum of arrived over sum of total).
fn window_rate(logs: &[DayLog]) -> f64 {
    let total: usize = logs.iter().map(|l| l.total_count).sum();
    let arrived: usize = logs.iter().map(|l| l.arrived_count).sum();
    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        {
            arrived as f64 / total as f64 * 100.0
        }
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::BusRecord;

    fn bus(line: &str, platform: &str, arrived: bool) -> BusRecord {
        BusRecord {
            line_number: line.to_string(),
            platform_number: platform.to_string(),
            destination: "Somewhere".to_string(),
            arrived,
            ..BusRecord::new()
        }
    }

    /// A log with the given total count and arrival rate percentage.
    fn log(total: usize, rate_pct: usize) -> DayLog {
        let arrived = total * rate_pct / 100;
        let buses: Vec<BusRecord> = (0..total).map(|i| bus("1", "2", i < arrived)).collect();
        DayLog::from_roster(&buses)
    }

    #[test]
    fn test_empty_state_verbatim() {
        assert_eq!(narrative(&[]), EMPTY_STATE);
    }

    #[test]
    fn test_overall_sentence() {
        let logs = vec![log(4, 100), log(4, 50)];
        let text = narrative(&logs);
        assert!(text.starts_with(
            "Across 2 days, you've tracked 8 buses with an overall 75% arrival rate."
        ));
    }

    #[test]
    fn test_no_week_comparison_under_seven_logs() {
        let logs = vec![log(4, 100); 6];
        let text = narrative(&logs);
        assert!(!text.contains("week"));
    }

    #[test]
    fn test_no_week_comparison_with_thin_prior_window() {
        // 9 logs: this week is 7, prior window only 2
        let logs = vec![log(4, 100); 9];
        let text = narrative(&logs);
        assert!(!text.contains("week"));
    }

    #[test]
    fn test_week_better() {
        let mut logs = vec![log(4, 100); 7];
        logs.extend(vec![log(4, 50); 3]);
        let text = narrative(&logs);
        assert!(text.contains("This week is 50% better than last week."));
    }

    #[test]
    fn test_week_worse() {
        let mut logs = vec![log(4, 50); 7];
        logs.extend(vec![log(4, 100); 3]);
        let text = narrative(&logs);
        assert!(text.contains("This week is 50% below last week's performance."));
    }

    #[test]
    fn test_small_drop_reads_as_similar() {
        // This week pools to 78.6%, last week to 80%: a drop of 1.4 points
        // sits inside the tolerated band and reads as similar
        let mut logs = vec![log(10, 80); 6];
        logs.push(log(10, 70));
        logs.extend(vec![log(10, 80); 3]);
        let text = narrative(&logs);
        assert!(text.contains("Performance this week is similar to last week."));
    }

    #[test]
    fn test_busiest_platform() {
        let logs = vec![
            DayLog::from_roster(&[bus("1", "5", true), bus("2", "5", true), bus("3", "1", true)]),
            DayLog::from_roster(&[bus("1", "5", true)]),
        ];
        let text = narrative(&logs);
        assert!(text.contains("Platform 5 is the most used (3 buses total)."));
    }

    #[test]
    fn test_line_reliability_needs_three_occurrences() {
        // Line 9 appears twice: no reliability sentence at all
        let logs = vec![
            DayLog::from_roster(&[bus("9", "1", true)]),
            DayLog::from_roster(&[bus("9", "1", true)]),
        ];
        let text = narrative(&logs);
        assert!(!text.contains("reliable"));
        assert!(!text.contains("needs attention"));
    }

    #[test]
    fn test_best_and_worst_lines() {
        // Line 9: 3/3 arrived. Line 4: 1/3 arrived (33%, below 80).
        let logs = vec![
            DayLog::from_roster(&[bus("9", "1", true), bus("4", "2", true)]),
            DayLog::from_roster(&[bus("9", "1", true), bus("4", "2", false)]),
            DayLog::from_roster(&[bus("9", "1", true), bus("4", "2", false)]),
        ];
        let text = narrative(&logs);
        assert!(text.contains("Line 9 is the most reliable (100% arrival rate)."));
        assert!(text.contains("Line 4 needs attention: only 33% arrivals."));
    }

    #[test]
    fn test_line_rate_ties_broken_by_first_encountered() {
        // Lines 8 (3/3), 5 (1/3), and 9 (1/3), encountered in that order.
        // Best is unambiguous; 5 and 9 tie for worst and 5 came first.
        let logs = vec![
            DayLog::from_roster(&[bus("8", "1", true), bus("5", "2", true), bus("9", "3", true)]),
            DayLog::from_roster(&[bus("8", "1", true), bus("5", "2", false), bus("9", "3", false)]),
            DayLog::from_roster(&[bus("8", "1", true), bus("5", "2", false), bus("9", "3", false)]),
        ];
        let text = narrative(&logs);
        assert!(text.contains("Line 8 is the most reliable (100% arrival rate)."));
        assert!(text.contains("Line 5 needs attention: only 33% arrivals."));
        assert!(!text.contains("Line 9"));

        // Two lines tied for best: the first encountered wins
        let logs = vec![
            DayLog::from_roster(&[bus("5", "1", true), bus("9", "2", true)]),
            DayLog::from_roster(&[bus("5", "1", true), bus("9", "2", true)]),
            DayLog::from_roster(&[bus("5", "1", true), bus("9", "2", true)]),
        ];
        let text = narrative(&logs);
        assert!(text.contains("Line 5 is the most reliable (100% arrival rate)."));
    }

    #[test]
    fn test_worst_line_above_threshold_not_called_out() {
        // Worst line sits at 80%, not below it
        let logs = vec![
            DayLog::from_roster(&(0..5).map(|i| bus("4", "2", i < 4)).collect::<Vec<_>>()),
            DayLog::from_roster(&[bus("9", "1", true)]),
            DayLog::from_roster(&[bus("9", "1", true)]),
            DayLog::from_roster(&[bus("9", "1", true)]),
        ];
        let text = narrative(&logs);
        assert!(!text.contains("needs attention"));
    }

    #[test]
    fn test_forecast_sentences_present_with_enough_logs() {
        let logs = vec![log(4, 100); 3];
        let text = narrative(&logs);
        assert!(text.contains("Performance trend is steady."));
        assert!(text.ends_with("Predicted next arrival rate: 100%."));
    }

    #[test]
    fn test_improving_trend_sentence() {
        let logs = vec![
            log(10, 90),
            log(10, 90),
            log(10, 90),
            log(10, 60),
            log(10, 60),
            log(10, 60),
        ];
        let text = narrative(&logs);
        assert!(text.contains("Trend is improving: +30% over recent logs."));
    }

    #[test]
    fn test_declining_trend_sentence() {
        let logs = vec![
            log(10, 60),
            log(10, 60),
            log(10, 60),
            log(10, 90),
            log(10, 90),
            log(10, 90),
        ];
        let text = narrative(&logs);
        assert!(text.contains("Trend is declining: -30% over recent logs."));
    }

    #[test]
    fn test_sentences_joined_with_single_spaces() {
        let logs = vec![log(4, 100); 3];
        let text = narrative(&logs);
        assert!(!text.contains("  "));
        assert!(text.contains(". "));
    }
}
