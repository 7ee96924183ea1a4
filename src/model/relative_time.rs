//! Relative "time until event" labels.

use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Describe how far `at` lies in the future relative to `now`.
///
/// - under a day ahead: `in N hour(s)` (hours rounded up)
/// - a day or more ahead: `in N day(s)` (days rounded up)
/// - now or in the past: `Past event`
pub fn format_relative_time(now: DateTime<Utc>, at: DateTime<Utc>) -> String {
    let hours = (at - now).num_milliseconds() as f64 / MILLIS_PER_HOUR;

    if hours > 0.0 && hours < 24.0 {
        let n = hours.ceil() as u64;
        format!("in {n} hour{}", plural(n))
    } else if hours >= 24.0 {
        let n = (hours / 24.0).ceil() as u64;
        format!("in {n} day{}", plural(n))
    } else {
        "Past event".to_string()
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn partial_hour_rounds_up_to_one_hour() {
        let at = now() + Duration::minutes(20);
        assert_eq!(format_relative_time(now(), at), "in 1 hour");
    }

    #[test]
    fn several_hours_are_pluralized() {
        let at = now() + Duration::minutes(5 * 60 + 1);
        assert_eq!(format_relative_time(now(), at), "in 6 hours");
    }

    #[test]
    fn exactly_one_day_reports_days() {
        let at = now() + Duration::hours(24);
        assert_eq!(format_relative_time(now(), at), "in 1 day");
    }

    #[test]
    fn partial_days_round_up() {
        let at = now() + Duration::hours(49);
        assert_eq!(format_relative_time(now(), at), "in 3 days");
    }

    #[test]
    fn past_and_present_are_past_events() {
        assert_eq!(format_relative_time(now(), now()), "Past event");
        assert_eq!(
            format_relative_time(now(), now() - Duration::hours(2)),
            "Past event"
        );
    }
}
