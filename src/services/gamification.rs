//! XP, streak, and badge math for the kids dashboard.
//!
//! The stored summary is maintained incrementally as logs arrive
//! ([`apply_log`]); [`recompute`] walks the full history and is the
//! definition of correctness, used for initialization and repair.

use crate::models::StudyLog;
use chrono::{Duration, NaiveDate};

pub const EXP_PER_MINUTE: i64 = 2;
pub const EXP_PER_RECORD: i64 = 10;

#[derive(Debug, Clone, Copy)]
pub enum BadgeRule {
    StreakDays(i64),
    TotalMinutes(i64),
}

#[derive(Debug, Clone, Copy)]
pub struct BadgeDef {
    pub id: &'static str,
    pub rule: BadgeRule,
}

pub const BADGES: &[BadgeDef] = &[
    BadgeDef { id: "streak-3", rule: BadgeRule::StreakDays(3) },
    BadgeDef { id: "streak-7", rule: BadgeRule::StreakDays(7) },
    BadgeDef { id: "streak-14", rule: BadgeRule::StreakDays(14) },
    BadgeDef { id: "streak-30", rule: BadgeRule::StreakDays(30) },
    BadgeDef { id: "minutes-60", rule: BadgeRule::TotalMinutes(60) },
    BadgeDef { id: "minutes-300", rule: BadgeRule::TotalMinutes(300) },
    BadgeDef { id: "minutes-1000", rule: BadgeRule::TotalMinutes(1000) },
    BadgeDef { id: "minutes-3000", rule: BadgeRule::TotalMinutes(3000) },
];

pub fn earned_badges(best_streak: i64, total_minutes: i64) -> Vec<String> {
    BADGES
        .iter()
        .filter(|b| match b.rule {
            BadgeRule::StreakDays(days) => best_streak >= days,
            BadgeRule::TotalMinutes(minutes) => total_minutes >= minutes,
        })
        .map(|b| b.id.to_string())
        .collect()
}

pub fn total_exp(total_minutes: i64, record_count: i64) -> i64 {
    total_minutes * EXP_PER_MINUTE + record_count * EXP_PER_RECORD
}

/// Walks distinct log dates descending from `today`, counting entries while
/// each is at most one day before the running check date. The first gap
/// larger than one day breaks the chain, so a streak survives until a full
/// calendar day is skipped.
pub fn current_streak(distinct_dates_desc: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut streak = 0;
    let mut check_date = today;
    for &date in distinct_dates_desc {
        if date > check_date {
            continue;
        }
        if check_date - date > Duration::days(1) {
            break;
        }
        streak += 1;
        check_date = date;
    }
    streak
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub total_minutes: i64,
    pub record_count: i64,
    pub total_exp: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_log_date: Option<NaiveDate>,
    pub badges: Vec<String>,
}

/// Full recompute over a user's log history. `stored_longest` carries the
/// previously persisted longest streak, which can exceed anything derivable
/// from the (possibly archived-away) raw logs.
pub fn recompute(logs: &[StudyLog], today: NaiveDate, stored_longest: i64) -> GameSnapshot {
    let total_minutes: i64 = logs.iter().map(|l| l.duration_minutes).sum();
    let record_count = logs.len() as i64;

    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter_map(|l| l.log_date.parse::<NaiveDate>().ok())
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates.reverse();

    let streak = current_streak(&dates, today);
    let longest = streak.max(stored_longest);
    GameSnapshot {
        total_minutes,
        record_count,
        total_exp: total_exp(total_minutes, record_count),
        current_streak: streak,
        longest_streak: longest,
        last_log_date: dates.first().copied(),
        badges: earned_badges(longest, total_minutes),
    }
}

/// Incremental step for one newly inserted log. A log dated before the last
/// known date leaves the streak untouched; the recompute endpoint repairs
/// the summary if exact credit for backdated days matters.
pub fn apply_log(prev: &GameSnapshot, date: NaiveDate, minutes: i64) -> GameSnapshot {
    let total_minutes = prev.total_minutes + minutes;
    let record_count = prev.record_count + 1;

    let (current_streak, last_log_date) = match prev.last_log_date {
        None => (1, Some(date)),
        Some(last) if date == last => (prev.current_streak, Some(last)),
        Some(last) if date == last + Duration::days(1) => (prev.current_streak + 1, Some(date)),
        Some(last) if date > last => (1, Some(date)),
        Some(last) => (prev.current_streak, Some(last)),
    };
    let longest_streak = prev.longest_streak.max(current_streak);

    GameSnapshot {
        total_minutes,
        record_count,
        total_exp: total_exp(total_minutes, record_count),
        current_streak,
        longest_streak,
        last_log_date,
        badges: earned_badges(longest_streak, total_minutes),
    }
}
