//! Flattening of nested source records
//!
//! Field names carry their nesting level as a prefix (`person_`,
//! `membership_`, `post_`, `org_`; `event_`, `vote_`, `voter_`). Serialized
//! column names use a double-underscore namespace, e.g. `m__label` versus
//! `post__label`.

use crate::model::{Organization, Person, VoteEvent};
use serde::Serialize;

/// One (person, membership, post, organization) combination
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonPostRow {
    #[serde(rename = "person__id")]
    pub person_id: String,
    #[serde(rename = "person__prefix")]
    pub person_prefix: Option<String>,
    #[serde(rename = "person__name")]
    pub person_name: Option<String>,
    #[serde(rename = "person__image")]
    pub person_image: Option<String>,
    #[serde(rename = "person__gender")]
    pub person_gender: Option<String>,
    #[serde(rename = "person__national_identity")]
    pub person_national_identity: Option<String>,
    #[serde(rename = "person__birth_date")]
    pub person_birth_date: Option<String>,
    #[serde(rename = "person__educations")]
    pub person_educations: Vec<String>,
    #[serde(rename = "person__previous_occupations")]
    pub person_previous_occupations: Vec<String>,

    #[serde(rename = "m__label")]
    pub membership_label: Option<String>,
    #[serde(rename = "m__province")]
    pub membership_province: Option<String>,
    #[serde(rename = "m__district_number")]
    pub membership_district_number: Option<i64>,
    #[serde(rename = "m__start_date")]
    pub membership_start_date: Option<String>,
    #[serde(rename = "m__end_date")]
    pub membership_end_date: Option<String>,

    #[serde(rename = "post__label")]
    pub post_label: Option<String>,
    #[serde(rename = "post__start_date")]
    pub post_start_date: Option<String>,
    #[serde(rename = "post__end_date")]
    pub post_end_date: Option<String>,

    #[serde(rename = "org__name")]
    pub org_name: Option<String>,
    #[serde(rename = "org__image")]
    pub org_image: Option<String>,
    #[serde(rename = "org__color")]
    pub org_color: Option<String>,
}

impl PersonPostRow {
    /// Membership has no end date
    pub fn membership_active(&self) -> bool {
        self.membership_end_date.is_none()
    }
}

/// One (event, vote option, voter) combination
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoteRow {
    #[serde(rename = "voters__name")]
    pub voter_name: Option<String>,
    #[serde(rename = "vote__option")]
    pub vote_option: Option<String>,

    #[serde(rename = "event__id")]
    pub event_id: String,
    #[serde(rename = "event__title")]
    pub event_title: Option<String>,
    #[serde(rename = "event__nickname")]
    pub event_nickname: Option<String>,
    #[serde(rename = "event__classification")]
    pub event_classification: Option<String>,
    #[serde(rename = "event__publish_status")]
    pub event_publish_status: Option<String>,
    #[serde(rename = "event__start_date")]
    pub event_start_date: Option<String>,
    #[serde(rename = "event__end_date")]
    pub event_end_date: Option<String>,
    #[serde(rename = "event__pass_condition")]
    pub event_pass_condition: Option<String>,
    #[serde(rename = "event__result")]
    pub event_result: Option<String>,
    #[serde(rename = "event__agree_count")]
    pub event_agree_count: Option<i64>,
    #[serde(rename = "event__disagree_count")]
    pub event_disagree_count: Option<i64>,
    #[serde(rename = "event__abstain_count")]
    pub event_abstain_count: Option<i64>,
    #[serde(rename = "event__novote_count")]
    pub event_novote_count: Option<i64>,
}

impl VoteRow {
    /// Event starts in `year` (compared on the first four characters)
    pub fn in_year(&self, year: &str) -> bool {
        self.event_start_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .is_some_and(|y| y == year)
    }
}

/// Explode people into membership/post/organization rows
///
/// A post without organizations still yields one row (organization fields
/// empty). People without memberships, and memberships without posts,
/// yield nothing.
pub fn flatten_people(people: &[Person]) -> Vec<PersonPostRow> {
    let mut rows = Vec::new();
    let no_org = [Organization::default()];

    for person in people {
        for membership in &person.memberships {
            for post in &membership.posts {
                let organizations: &[Organization] = if post.organizations.is_empty() {
                    &no_org
                } else {
                    &post.organizations
                };

                for org in organizations {
                    rows.push(PersonPostRow {
                        person_id: person.id.clone(),
                        person_prefix: person.prefix.clone(),
                        person_name: person.name.clone(),
                        person_image: person.image.clone(),
                        person_gender: person.gender.clone(),
                        person_national_identity: person.national_identity.clone(),
                        person_birth_date: person.birth_date.clone(),
                        person_educations: person.educations.clone(),
                        person_previous_occupations: person.previous_occupations.clone(),
                        membership_label: membership.label.clone(),
                        membership_province: membership.province.clone(),
                        membership_district_number: membership.district_number,
                        membership_start_date: membership.start_date.clone(),
                        membership_end_date: membership.end_date.clone(),
                        post_label: post.label.clone(),
                        post_start_date: post.start_date.clone(),
                        post_end_date: post.end_date.clone(),
                        org_name: org.name.clone(),
                        org_image: org.image.clone(),
                        org_color: org.color.clone(),
                    });
                }
            }
        }
    }

    rows
}

/// Explode vote events into per-voter rows
pub fn flatten_vote_events(events: &[VoteEvent]) -> Vec<VoteRow> {
    let mut rows = Vec::new();

    for event in events {
        for vote in &event.votes {
            for voter in &vote.voters {
                rows.push(VoteRow {
                    voter_name: voter.name.clone(),
                    vote_option: vote.option.clone(),
                    event_id: event.id.clone(),
                    event_title: event.title.clone(),
                    event_nickname: event.nickname.clone(),
                    event_classification: event.classification.clone(),
                    event_publish_status: event.publish_status.clone(),
                    event_start_date: event.start_date.clone(),
                    event_end_date: event.end_date.clone(),
                    event_pass_condition: event.pass_condition.clone(),
                    event_result: event.result.clone(),
                    event_agree_count: event.agree_count,
                    event_disagree_count: event.disagree_count,
                    event_abstain_count: event.abstain_count,
                    event_novote_count: event.novote_count,
                });
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parse_people, parse_vote_events};
    use serde_json::json;

    fn sample_people() -> Vec<Person> {
        parse_people(vec![
            json!({
                "id": "p-1",
                "name": "ก",
                "memberships": [
                    {
                        "label": "แบ่งเขต",
                        "province": "ลำปาง",
                        "posts": [
                            {
                                "label": "สส. ชุดที่ 26",
                                "organizations": [{"name": "สภาผู้แทนราษฎร"}]
                            },
                            {"label": "กรรมาธิการ", "organizations": []}
                        ]
                    },
                    {
                        "label": "พรรค",
                        "start_date": "2020-01-01",
                        "posts": [{
                            "label": "สมาชิกพรรค",
                            "organizations": [{"name": "พรรคหนึ่ง"}, {"name": "พรรคสอง"}]
                        }]
                    },
                    {"label": "ว่าง", "posts": []}
                ]
            }),
            json!({"id": "p-2", "name": "ข", "memberships": null}),
        ])
        .unwrap()
    }

    #[test]
    fn test_flatten_people_row_count() {
        let rows = flatten_people(&sample_people());
        // 1 + 1 (post without orgs) + 2 (two orgs) from p-1; nothing from p-2
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.person_id == "p-1"));
    }

    #[test]
    fn test_post_without_orgs_keeps_row() {
        let rows = flatten_people(&sample_people());
        let committee = rows
            .iter()
            .find(|r| r.post_label.as_deref() == Some("กรรมาธิการ"))
            .unwrap();
        assert!(committee.org_name.is_none());
        assert_eq!(committee.membership_province.as_deref(), Some("ลำปาง"));
    }

    #[test]
    fn test_levels_do_not_collide() {
        let rows = flatten_people(&sample_people());
        let value = serde_json::to_value(&rows[0]).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["m__label"], json!("แบ่งเขต"));
        assert_eq!(obj["post__label"], json!("สส. ชุดที่ 26"));
        assert_eq!(obj["person__name"], json!("ก"));
        assert_eq!(obj["org__name"], json!("สภาผู้แทนราษฎร"));
        assert!(!obj.contains_key("label"));
    }

    #[test]
    fn test_flatten_vote_events() {
        let events = parse_vote_events(vec![json!({
            "id": "e-1",
            "title": "ญัตติ",
            "start_date": "2025-03-01",
            "votes": [
                {"option": "เห็นด้วย", "voters": [{"name": "ก"}, {"name": "ข"}]},
                {"option": "งดออกเสียง", "voters": [{"name": "ค"}]},
                {"option": "ไม่เห็นด้วย", "voters": null}
            ]
        })])
        .unwrap();

        let rows = flatten_vote_events(&events);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].voter_name.as_deref(), Some("ค"));
        assert_eq!(rows[2].vote_option.as_deref(), Some("งดออกเสียง"));
        assert!(rows.iter().all(|r| r.event_title.as_deref() == Some("ญัตติ")));
    }

    #[test]
    fn test_in_year() {
        let mut row = VoteRow {
            event_start_date: Some("2025-06-30T10:00:00".to_string()),
            ..Default::default()
        };
        assert!(row.in_year("2025"));
        assert!(!row.in_year("2024"));

        row.event_start_date = Some("25".to_string());
        assert!(!row.in_year("2025"));
        row.event_start_date = None;
        assert!(!row.in_year("2025"));
    }
}
