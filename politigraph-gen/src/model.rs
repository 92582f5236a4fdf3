//! Typed source entities
//!
//! Mirrors the `people` and `voteEvents` query shapes. Scalars the source
//! may leave out are `Option`; nested lists treat `null` as empty.

use crate::error::{GenError, GenResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Legislator
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Person {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub prefix: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub gender: Option<String>,
    pub national_identity: Option<String>,
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub educations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub previous_occupations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub memberships: Vec<Membership>,
}

/// Tenure under a label, e.g. a district seat
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Membership {
    pub label: Option<String>,
    pub province: Option<String>,
    pub district_number: Option<i64>,
    pub start_date: Option<String>,
    /// None while the membership is active
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub posts: Vec<Post>,
}

/// Office held during a membership
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Post {
    pub label: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub organizations: Vec<Organization>,
}

/// Party or chamber body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Organization {
    pub name: Option<String>,
    pub image: Option<String>,
    pub color: Option<String>,
}

/// Roll-call vote
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VoteEvent {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
    pub nickname: Option<String>,
    pub classification: Option<String>,
    pub publish_status: Option<String>,
    /// ISO date, `YYYY-MM-DD...`
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub pass_condition: Option<String>,
    pub result: Option<String>,
    pub agree_count: Option<i64>,
    pub disagree_count: Option<i64>,
    pub abstain_count: Option<i64>,
    pub novote_count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub votes: Vec<Vote>,
}

/// One option of a vote event and who chose it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Vote {
    pub option: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub voters: Vec<Voter>,
}

/// Voter, identified by display name only
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Voter {
    pub name: Option<String>,
}

pub fn parse_people(rows: Vec<Value>) -> GenResult<Vec<Person>> {
    parse_records(rows, "person")
}

pub fn parse_vote_events(rows: Vec<Value>) -> GenResult<Vec<VoteEvent>> {
    parse_records(rows, "vote event")
}

fn parse_records<T: DeserializeOwned>(rows: Vec<Value>, kind: &str) -> GenResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            serde_json::from_value(row)
                .map_err(|e| GenError::Transform(format!("malformed {} {}: {}", kind, id, e)))
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
