//! Weekly study-log compaction.
//!
//! Logs older than seven days are folded into one aggregate per
//! (user, ISO week starting Monday). The bucketing here is pure; the db
//! layer inserts or merges each bucket and deletes its source logs.

use crate::models::StudyLog;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// One (user, week) aggregate plus the ids of the logs it absorbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub user_id: String,
    pub week_start: NaiveDate,
    pub subjects: BTreeMap<String, i64>,
    pub total_duration: i64,
    pub log_count: i64,
    pub log_ids: Vec<String>,
}

/// Partitions `logs` into week buckets, keeping only logs dated on or
/// before `cutoff` (cutoff is inclusive: "older than 7 days" uses
/// end-of-day semantics on the cutoff date). Logs with an unparseable
/// date are skipped rather than silently archived under a wrong week.
pub fn bucket_old_logs(logs: &[StudyLog], cutoff: NaiveDate) -> Vec<WeekBucket> {
    let mut buckets: BTreeMap<(String, NaiveDate), WeekBucket> = BTreeMap::new();

    for log in logs {
        let Ok(date) = log.log_date.parse::<NaiveDate>() else {
            tracing::warn!("skipping log {} with invalid date {:?}", log.id, log.log_date);
            continue;
        };
        if date > cutoff {
            continue;
        }
        let week = week_start(date);
        let bucket = buckets
            .entry((log.user_id.clone(), week))
            .or_insert_with(|| WeekBucket {
                user_id: log.user_id.clone(),
                week_start: week,
                subjects: BTreeMap::new(),
                total_duration: 0,
                log_count: 0,
                log_ids: Vec::new(),
            });
        *bucket.subjects.entry(log.subject.clone()).or_insert(0) += log.duration_minutes;
        bucket.total_duration += log.duration_minutes;
        bucket.log_count += 1;
        bucket.log_ids.push(log.id.clone());
    }

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: &str, user: &str, subject: &str, minutes: i64, date: &str) -> StudyLog {
        StudyLog {
            id: id.to_string(),
            user_id: user.to_string(),
            subject: subject.to_string(),
            duration_minutes: minutes,
            log_date: date.to_string(),
            created_at: format!("{date}T12:00:00Z"),
        }
    }

    #[test]
    fn week_start_is_monday_for_every_weekday() {
        // 2026-08-17 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 17).unwrap();
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(week_start(day), monday, "offset {offset}");
        }
        // Sunday maps back six days, not forward.
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(week_start(sunday), monday);
    }

    #[test]
    fn same_week_logs_fold_into_one_bucket() {
        let cutoff = NaiveDate::from_ymd_opt(2026, 8, 19).unwrap();
        let logs = vec![
            log("l1", "u1", "math", 30, "2026-08-10"),    // Monday
            log("l2", "u1", "english", 45, "2026-08-12"), // Wednesday
        ];
        let buckets = bucket_old_logs(&logs, cutoff);
        assert_eq!(buckets.len(), 1);
        let b = &buckets[0];
        assert_eq!(b.week_start, NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
        assert_eq!(b.subjects.get("math"), Some(&30));
        assert_eq!(b.subjects.get("english"), Some(&45));
        assert_eq!(b.total_duration, 75);
        assert_eq!(b.log_count, 2);
        assert_eq!(b.log_ids, vec!["l1", "l2"]);
    }

    #[test]
    fn recent_logs_are_not_bucketed() {
        let cutoff = NaiveDate::from_ymd_opt(2026, 8, 19).unwrap();
        let logs = vec![
            log("old", "u1", "math", 30, "2026-08-19"),
            log("new", "u1", "math", 30, "2026-08-20"),
        ];
        let buckets = bucket_old_logs(&logs, cutoff);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].log_ids, vec!["old"]);
    }

    #[test]
    fn users_and_weeks_bucket_separately() {
        let cutoff = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let logs = vec![
            log("a", "u1", "math", 10, "2026-08-10"),
            log("b", "u1", "math", 10, "2026-08-18"),
            log("c", "u2", "math", 10, "2026-08-10"),
        ];
        assert_eq!(bucket_old_logs(&logs, cutoff).len(), 3);
    }

    #[test]
    fn same_subject_minutes_accumulate() {
        let cutoff = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let logs = vec![
            log("a", "u1", "math", 10, "2026-08-10"),
            log("b", "u1", "math", 25, "2026-08-11"),
        ];
        let buckets = bucket_old_logs(&logs, cutoff);
        assert_eq!(buckets[0].subjects.get("math"), Some(&35));
    }
}
