//! Target-score gap analysis and exam-sitting grouping. Pure read-side
//! derivations; nothing here persists state.

use crate::models::{ExamRecord, ExamSitting};
use crate::services::subjects;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectGap {
    pub subject: String,
    pub label: String,
    pub target_score: i64,
    pub latest_score: Option<i64>,
    /// target − latest score; the full target when no exam exists.
    pub gap: i64,
    /// Achieved iff gap ≤ 0.
    pub achieved: bool,
}

/// Computes one gap entry per target subject against the latest exam for
/// that subject. `exams` must be sorted newest-first (exam_date desc,
/// created_at desc — ties resolve to the most recent insertion); the first
/// match per subject wins. Output is sorted by gap descending, so the
/// weakest subjects come first.
pub fn subject_gaps(targets: &BTreeMap<String, i64>, exams: &[ExamRecord]) -> Vec<SubjectGap> {
    let mut gaps: Vec<SubjectGap> = targets
        .iter()
        .map(|(subject, &target)| {
            let latest = exams.iter().find(|e| &e.subject == subject).map(|e| e.score);
            let gap = target - latest.unwrap_or(0);
            SubjectGap {
                label: subjects::label(subject).to_string(),
                subject: subject.clone(),
                target_score: target,
                latest_score: latest,
                gap,
                achieved: gap <= 0,
            }
        })
        .collect();
    gaps.sort_by(|a, b| b.gap.cmp(&a.gap));
    gaps
}

/// Weaknesses (gap > 0) capped to the `top_n` largest gaps.
pub fn weaknesses(gaps: &[SubjectGap], top_n: usize) -> Vec<SubjectGap> {
    gaps.iter().filter(|g| !g.achieved).take(top_n).cloned().collect()
}

/// Groups records sharing (exam_name, exam_date) into sittings, preserving
/// the order in which the sittings first appear in `records`.
pub fn group_sittings(records: Vec<ExamRecord>) -> Vec<ExamSitting> {
    let mut sittings: Vec<ExamSitting> = Vec::new();
    for record in records {
        match sittings
            .iter_mut()
            .find(|s| s.exam_name == record.exam_name && s.exam_date == record.exam_date)
        {
            Some(sitting) => {
                sitting.total_score += record.score;
                sitting.total_max_score += record.max_score;
                sitting.records.push(record);
            }
            None => sittings.push(ExamSitting {
                exam_name: record.exam_name.clone(),
                exam_date: record.exam_date.clone(),
                exam_type: record.exam_type,
                total_score: record.score,
                total_max_score: record.max_score,
                records: vec![record],
            }),
        }
    }
    sittings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;

    fn exam(subject: &str, score: i64, date: &str) -> ExamRecord {
        ExamRecord {
            id: format!("{subject}-{date}"),
            user_id: "u1".to_string(),
            exam_type: ExamType::Mock,
            exam_name: "spring mock".to_string(),
            exam_date: date.to_string(),
            subject: subject.to_string(),
            score,
            max_score: 100,
            deviation_score: None,
            created_at: format!("{date}T00:00:00Z"),
        }
    }

    #[test]
    fn positive_gap_is_a_weakness() {
        let targets = BTreeMap::from([("math".to_string(), 80)]);
        let exams = vec![exam("math", 62, "2026-06-01")];
        let gaps = subject_gaps(&targets, &exams);
        assert_eq!(gaps[0].gap, 18);
        assert!(!gaps[0].achieved);
    }

    #[test]
    fn negative_gap_is_achieved() {
        let targets = BTreeMap::from([("math".to_string(), 50)]);
        let exams = vec![exam("math", 70, "2026-06-01")];
        let gaps = subject_gaps(&targets, &exams);
        assert_eq!(gaps[0].gap, -20);
        assert!(gaps[0].achieved);
    }

    #[test]
    fn first_match_in_desc_history_wins() {
        let targets = BTreeMap::from([("math".to_string(), 80)]);
        // Newest first, as the query layer returns them.
        let exams = vec![exam("math", 75, "2026-06-01"), exam("math", 40, "2026-04-01")];
        let gaps = subject_gaps(&targets, &exams);
        assert_eq!(gaps[0].latest_score, Some(75));
        assert_eq!(gaps[0].gap, 5);
    }

    #[test]
    fn missing_subject_leaves_the_full_target_as_gap() {
        let targets = BTreeMap::from([("science".to_string(), 60)]);
        let gaps = subject_gaps(&targets, &[]);
        assert_eq!(gaps[0].latest_score, None);
        assert_eq!(gaps[0].gap, 60);
        assert!(!gaps[0].achieved);
    }

    #[test]
    fn output_sorts_weakest_first_and_top_n_caps() {
        let targets = BTreeMap::from([
            ("math".to_string(), 80),
            ("english".to_string(), 80),
            ("science".to_string(), 80),
        ]);
        let exams = vec![
            exam("math", 70, "2026-06-01"),
            exam("english", 30, "2026-06-01"),
            exam("science", 90, "2026-06-01"),
        ];
        let gaps = subject_gaps(&targets, &exams);
        assert_eq!(
            gaps.iter().map(|g| g.subject.as_str()).collect::<Vec<_>>(),
            vec!["english", "math", "science"]
        );
        let weak = weaknesses(&gaps, 1);
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].subject, "english");
    }

    #[test]
    fn records_group_into_sittings_by_name_and_date() {
        let mut second = exam("english", 55, "2026-06-01");
        second.exam_name = "spring mock".to_string();
        let other_day = exam("math", 80, "2026-07-01");
        let sittings = group_sittings(vec![exam("math", 62, "2026-06-01"), second, other_day]);
        assert_eq!(sittings.len(), 2);
        assert_eq!(sittings[0].records.len(), 2);
        assert_eq!(sittings[0].total_score, 117);
        assert_eq!(sittings[0].total_max_score, 200);
    }
}
