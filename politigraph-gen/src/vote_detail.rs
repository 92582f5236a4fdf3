//! Finest-grain vote table: one row per (event, province, person, option)

use crate::votes::QualifiedVote;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteDetail {
    pub title: String,
    pub province: String,
    pub person_name: String,
    pub option: String,
}

pub fn build_vote_detail(votes: &[QualifiedVote<'_>]) -> Vec<VoteDetail> {
    votes
        .iter()
        .map(|vote| VoteDetail {
            title: vote.title.to_string(),
            province: vote.province.to_string(),
            person_name: vote.person_name.to_string(),
            option: vote.option.to_string(),
        })
        .collect()
}
