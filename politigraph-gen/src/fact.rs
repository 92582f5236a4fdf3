//! Per-province vote outcome table
//!
//! Two kinds of rows share the table, told apart by `type`:
//! - `"All"`: the province's majority result (or tie marker) with the share
//!   of representatives who used their right to vote
//! - `<option>`: each option's share of the province's votes
//!
//! Groups are (event title, province) and are emitted in sorted key order,
//! majority rows first, then option-share rows.

use crate::labels::{
    ABSENT, AGREE, DISAGREE, FACT_TYPE_ALL, LOW_PRIORITY_RESULTS, NOT_USED_RIGHT, TIE, USED_RIGHT,
};
use crate::votes::QualifiedVote;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRow {
    pub title: String,
    pub province: String,
    /// Majority result for `"All"` rows, the option itself otherwise
    pub option: String,
    pub portion: f64,
    #[serde(rename = "type")]
    pub row_type: String,
}

/// Usage-of-right share within one (event, province) group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageShare {
    pub title: String,
    pub province: String,
    pub category: &'static str,
    pub no_of_person: usize,
    pub portion: f64,
}

const USAGE_CATEGORIES: [&str; 2] = [USED_RIGHT, NOT_USED_RIGHT];

/// Option counts keyed by (title, province), options in sorted order
pub type GroupCounts<'a> = BTreeMap<(&'a str, &'a str), BTreeMap<&'a str, usize>>;

pub fn group_counts<'a>(votes: &[QualifiedVote<'a>]) -> GroupCounts<'a> {
    let mut groups: GroupCounts<'a> = BTreeMap::new();
    for vote in votes {
        *groups
            .entry((vote.title, vote.province))
            .or_default()
            .entry(vote.option)
            .or_default() += 1;
    }
    groups
}

/// Resolve a group's majority result label(s)
///
/// 1. Keep every option with the top count.
/// 2. Several survivors including both agree and disagree collapse into the
///    tie marker.
/// 3. While more than one result remains, drop absent, then abstain, then
///    "did not vote", in that order.
///
/// Step 3 is order dependent: if absent and abstain are the only survivors,
/// absent is dropped and abstain wins. More than one result can remain,
/// e.g. agree tied with no-vote.
pub fn resolve_majority<'a>(options: &BTreeMap<&'a str, usize>) -> Vec<&'a str> {
    let Some(&top) = options.values().max() else {
        return Vec::new();
    };
    let survivors: Vec<&str> = options
        .iter()
        .filter(|&(_, &count)| count == top)
        .map(|(&option, _)| option)
        .collect();

    let tied = survivors.len() > 1 && survivors.contains(&AGREE) && survivors.contains(&DISAGREE);
    let mut results = if tied {
        vec![TIE]
    } else {
        survivors
    };

    for label in LOW_PRIORITY_RESULTS {
        if results.len() > 1 {
            results.retain(|result| *result != label);
        }
    }

    results
}

/// Used / not-used shares for every group
///
/// Both categories are always emitted, used first, so a group without
/// absentees has a not-used row with portion 0.0. The two portions of a
/// group sum to 1.
pub fn usage_shares(groups: &GroupCounts<'_>) -> Vec<UsageShare> {
    let mut shares = Vec::with_capacity(groups.len() * USAGE_CATEGORIES.len());

    for (&(title, province), options) in groups {
        let (used, not_used, total) = usage_counts(options);
        for (category, count) in USAGE_CATEGORIES.into_iter().zip([used, not_used]) {
            shares.push(UsageShare {
                title: title.to_string(),
                province: province.to_string(),
                category,
                no_of_person: count,
                portion: ratio(count, total),
            });
        }
    }

    shares
}

/// Portion carried by a group's `"All"` rows, from its usage shares
///
/// The not-used share is dropped while another share remains in the group.
/// A surviving not-used share carries 0.0.
pub fn majority_usage_portion(group_shares: &[UsageShare]) -> f64 {
    let mut kept: Vec<&UsageShare> = group_shares.iter().collect();
    if kept.len() > 1 {
        kept.retain(|share| share.category != NOT_USED_RIGHT);
    }

    match kept.first() {
        Some(share) if share.category != NOT_USED_RIGHT => share.portion,
        _ => 0.0,
    }
}

/// Share of each option in every group, not majority-filtered
pub fn option_shares(groups: &GroupCounts<'_>) -> Vec<FactRow> {
    let mut rows = Vec::new();

    for (&(title, province), options) in groups {
        let total: usize = options.values().sum();
        for (&option, &count) in options {
            rows.push(FactRow {
                title: title.to_string(),
                province: province.to_string(),
                option: option.to_string(),
                portion: ratio(count, total),
                row_type: option.to_string(),
            });
        }
    }

    rows
}

/// Build the fact table from in-scope votes
pub fn build_fact_table(votes: &[QualifiedVote<'_>]) -> Vec<FactRow> {
    let groups = group_counts(votes);
    let shares = usage_shares(&groups);
    let per_group = shares.chunks(USAGE_CATEGORIES.len());

    let mut rows = Vec::new();
    for ((&(title, province), options), group_shares) in groups.iter().zip(per_group) {
        let portion = majority_usage_portion(group_shares);
        for result in resolve_majority(options) {
            rows.push(FactRow {
                title: title.to_string(),
                province: province.to_string(),
                option: result.to_string(),
                portion,
                row_type: FACT_TYPE_ALL.to_string(),
            });
        }
    }

    rows.extend(option_shares(&groups));
    rows
}

/// (used, not used, total) voter counts of one group
fn usage_counts(options: &BTreeMap<&str, usize>) -> (usize, usize, usize) {
    let total: usize = options.values().sum();
    let not_used = options.get(ABSENT).copied().unwrap_or(0);
    (total - not_used, not_used, total)
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
