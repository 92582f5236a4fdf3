//! Person dimension: current district representatives and their party

use crate::labels::{DISTRICT_SEAT, PARTY_MEMBER};
use crate::normalize::PersonPostRow;
use crate::term::TermPolicy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// One currently-serving district representative
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonDim {
    pub prefix: Option<String>,
    pub person_name: String,
    pub image: Option<String>,
    pub province: Option<String>,
    /// Post label of the party membership
    pub member_of: Option<String>,
    pub party_name: Option<String>,
    pub party_image: Option<String>,
    pub party_color: Option<String>,
}

/// Latest active party membership per person name
///
/// Only memberships without an end date count. Among those, the greatest
/// membership start date wins; on equal dates the earliest row wins.
/// Rows without a start date never win.
pub fn current_parties(rows: &[PersonPostRow]) -> HashMap<&str, &PersonPostRow> {
    let mut parties: HashMap<&str, &PersonPostRow> = HashMap::new();

    for row in rows {
        let is_party = row
            .post_label
            .as_deref()
            .is_some_and(|label| label.contains(PARTY_MEMBER));
        if !is_party || !row.membership_active() {
            continue;
        }
        let (Some(name), Some(start)) = (
            row.person_name.as_deref(),
            row.membership_start_date.as_deref(),
        ) else {
            continue;
        };

        parties
            .entry(name)
            .and_modify(|current| {
                if current.membership_start_date.as_deref().is_some_and(|s| start > s) {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    parties
}

/// Build the person dimension
///
/// Keeps rows whose post is the current term, whose membership is an
/// active district seat, and left-joins each person's current party by
/// name. One row per person name, first occurrence wins.
pub fn build_person_dim<P>(rows: &[PersonPostRow], policy: &P) -> Vec<PersonDim>
where
    P: TermPolicy + ?Sized,
{
    let labels: Vec<&str> = rows
        .iter()
        .filter_map(|r| r.post_label.as_deref())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let Some(term) = policy.current_term(&labels) else {
        warn!("No representative term label found; person table will be empty");
        return Vec::new();
    };
    info!(term, "Resolved current term");

    let parties = current_parties(rows);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut people = Vec::new();

    for row in rows {
        if row.post_label.as_deref() != Some(term)
            || row.membership_label.as_deref() != Some(DISTRICT_SEAT)
            || !row.membership_active()
        {
            continue;
        }
        let Some(name) = row.person_name.as_deref() else {
            continue;
        };
        if !seen.insert(name) {
            continue;
        }

        let party = parties.get(name);
        people.push(PersonDim {
            prefix: row.person_prefix.clone(),
            person_name: name.to_string(),
            image: row.person_image.clone(),
            province: row.membership_province.clone(),
            member_of: party.and_then(|p| p.post_label.clone()),
            party_name: party.and_then(|p| p.org_name.clone()),
            party_image: party.and_then(|p| p.org_image.clone()),
            party_color: party.and_then(|p| p.org_color.clone()),
        });
    }

    let without_party = people.iter().filter(|p| p.party_name.is_none()).count();
    if without_party > 0 {
        info!(without_party, "Representatives without a current party");
    }

    people
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::LatestFixedWidthTerm;
    use politigraph_common::RunConfig;

    fn policy() -> LatestFixedWidthTerm {
        LatestFixedWidthTerm::from_config(&RunConfig::default())
    }

    fn seat(name: &str, term: &str, province: &str, ended: bool) -> PersonPostRow {
        PersonPostRow {
            person_name: Some(name.to_string()),
            person_prefix: Some("นาย".to_string()),
            membership_label: Some(DISTRICT_SEAT.to_string()),
            membership_province: Some(province.to_string()),
            membership_end_date: ended.then(|| "2023-03-20".to_string()),
            post_label: Some(term.to_string()),
            ..Default::default()
        }
    }

    fn party(name: &str, party: &str, start: Option<&str>, ended: bool) -> PersonPostRow {
        PersonPostRow {
            person_name: Some(name.to_string()),
            membership_label: Some("พรรคการเมือง".to_string()),
            membership_start_date: start.map(str::to_string),
            membership_end_date: ended.then(|| "2024-01-01".to_string()),
            post_label: Some(PARTY_MEMBER.to_string()),
            org_name: Some(party.to_string()),
            org_color: Some("#ff0000".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_selects_active_district_seats_of_current_term() {
        let rows = vec![
            seat("ก", "สส. ชุดที่ 26", "ลำปาง", false),
            seat("ข", "สส. ชุดที่ 25", "ตาก", false), // previous term
            seat("ค", "สส. ชุดที่ 26", "น่าน", true),  // ended
            PersonPostRow {
                membership_label: Some("บัญชีรายชื่อ".to_string()), // list seat
                ..seat("ง", "สส. ชุดที่ 26", "แพร่", false)
            },
        ];

        let people = build_person_dim(&rows, &policy());

        assert_eq!(people.len(), 1);
        assert_eq!(people[0].person_name, "ก");
        assert_eq!(people[0].province.as_deref(), Some("ลำปาง"));
        assert!(people[0].party_name.is_none());
    }

    #[test]
    fn test_latest_active_party_wins() {
        let rows = vec![
            seat("ก", "สส. ชุดที่ 26", "ลำปาง", false),
            party("ก", "พรรคเก่า", Some("2019-01-01"), false),
            party("ก", "พรรคใหม่", Some("2023-02-01"), false),
            party("ก", "พรรคที่ลาออก", Some("2024-05-01"), true),
            party("ก", "ไม่มีวันที่", None, false),
        ];

        let people = build_person_dim(&rows, &policy());

        assert_eq!(people[0].party_name.as_deref(), Some("พรรคใหม่"));
        assert_eq!(people[0].member_of.as_deref(), Some(PARTY_MEMBER));
        assert_eq!(people[0].party_color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_party_tie_keeps_first_row() {
        let rows = vec![
            party("ก", "พรรคแรก", Some("2023-02-01"), false),
            party("ก", "พรรคสอง", Some("2023-02-01"), false),
        ];
        let parties = current_parties(&rows);
        assert_eq!(parties["ก"].org_name.as_deref(), Some("พรรคแรก"));
    }

    #[test]
    fn test_one_row_per_person() {
        let mut second_org = seat("ก", "สส. ชุดที่ 26", "ลำปาง", false);
        second_org.org_name = Some("สภาผู้แทนราษฎร".to_string());
        let rows = vec![seat("ก", "สส. ชุดที่ 26", "ลำปาง", false), second_org];

        assert_eq!(build_person_dim(&rows, &policy()).len(), 1);
    }

    #[test]
    fn test_no_term_label_yields_empty_table() {
        let rows = vec![party("ก", "พรรคแรก", Some("2023-02-01"), false)];
        assert!(build_person_dim(&rows, &policy()).is_empty());
    }
}
