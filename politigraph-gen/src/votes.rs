//! Vote selection shared by the fact and vote-detail tables
//!
//! Voters are matched to the person dimension by display name. Names are
//! not unique identifiers: two representatives sharing a name would both
//! resolve to whichever dimension row was built first. Votes whose voter
//! has no dimension row (or no province) are silently skipped.

use crate::normalize::VoteRow;
use crate::person::PersonDim;
use std::collections::HashMap;

/// Scope of the per-province vote tables
#[derive(Debug, Clone, Copy)]
pub struct VoteScope<'a> {
    /// Four-digit year matched against the event start date
    pub target_year: &'a str,
    /// Event left out entirely
    pub excluded_title: &'a str,
}

/// A target-year vote by a current district representative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedVote<'a> {
    pub title: &'a str,
    pub province: &'a str,
    pub person_name: &'a str,
    pub option: &'a str,
}

/// Name → province lookup over the person dimension
pub fn province_index(people: &[PersonDim]) -> HashMap<&str, &str> {
    let mut index = HashMap::with_capacity(people.len());
    for person in people {
        if let Some(province) = person.province.as_deref() {
            index.entry(person.person_name.as_str()).or_insert(province);
        }
    }
    index
}

/// Votes in scope, joined to the voter's province, in source order
pub fn qualifying_votes<'a>(
    rows: &'a [VoteRow],
    people: &'a [PersonDim],
    scope: VoteScope<'_>,
) -> Vec<QualifiedVote<'a>> {
    let provinces = province_index(people);

    rows.iter()
        .filter(|row| row.in_year(scope.target_year))
        .filter_map(|row| {
            let title = row.event_title.as_deref()?;
            if title == scope.excluded_title {
                return None;
            }
            let person_name = row.voter_name.as_deref()?;
            let province = provinces.get(person_name).copied()?;
            let option = row.vote_option.as_deref()?;
            Some(QualifiedVote {
                title,
                province,
                person_name,
                option,
            })
        })
        .collect()
}
