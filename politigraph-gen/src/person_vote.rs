//! Per-person vote option counts for the target year

use crate::labels::SUMMARY_OPTIONS;
use crate::normalize::VoteRow;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonVoteSummary {
    pub person_name: String,
    pub option: String,
    pub no_of_option: usize,
}

/// Count each person's choices over events starting in `target_year`
///
/// Only the summary options are reported. Rows are ordered by
/// (person name, option). The excluded-event title does not apply here.
pub fn build_person_vote_summary(rows: &[VoteRow], target_year: &str) -> Vec<PersonVoteSummary> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.in_year(target_year)) {
        let (Some(name), Some(option)) = (row.voter_name.as_deref(), row.vote_option.as_deref())
        else {
            continue;
        };
        *counts.entry((name, option)).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|((_, option), _)| SUMMARY_OPTIONS.contains(option))
        .map(|((name, option), count)| PersonVoteSummary {
            person_name: name.to_string(),
            option: option.to_string(),
            no_of_option: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{ABSENT, AGREE, DID_NOT_VOTE, DISAGREE};

    fn vote(name: &str, option: &str, date: &str) -> VoteRow {
        VoteRow {
            voter_name: Some(name.to_string()),
            vote_option: Some(option.to_string()),
            event_title: Some("ญัตติ".to_string()),
            event_start_date: Some(date.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_per_person_and_option() {
        let rows = vec![
            vote("ข", AGREE, "2025-01-10"),
            vote("ก", AGREE, "2025-01-10"),
            vote("ก", AGREE, "2025-02-10"),
            vote("ก", DISAGREE, "2025-03-10"),
            vote("ก", ABSENT, "2025-04-10"),
        ];

        let summary = build_person_vote_summary(&rows, "2025");

        let keys: Vec<(&str, &str, usize)> = summary
            .iter()
            .map(|s| (s.person_name.as_str(), s.option.as_str(), s.no_of_option))
            .collect();

        // Thai sorts by code point: ล < เ < ไ
        assert_eq!(
            keys,
            vec![("ก", ABSENT, 1), ("ก", AGREE, 2), ("ก", DISAGREE, 1), ("ข", AGREE, 1)]
        );
    }

    #[test]
    fn test_other_years_ignored() {
        let rows = vec![vote("ก", AGREE, "2024-12-31"), vote("ก", AGREE, "2026-01-01")];
        assert!(build_person_vote_summary(&rows, "2025").is_empty());
    }

    #[test]
    fn test_unlisted_options_dropped() {
        let rows = vec![vote("ก", DID_NOT_VOTE, "2025-01-10"), vote("ก", "อื่น ๆ", "2025-01-10")];
        assert!(build_person_vote_summary(&rows, "2025").is_empty());
    }
}
