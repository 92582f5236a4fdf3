//! Labels used by the politigraph source data
//!
//! Vote options, membership and post labels are Thai free text in the
//! source. Matching is exact string equality unless noted.

/// Vote option: agree
pub const AGREE: &str = "เห็นด้วย";
/// Vote option: disagree
pub const DISAGREE: &str = "ไม่เห็นด้วย";
/// Vote option: abstain
pub const ABSTAIN: &str = "งดออกเสียง";
/// Vote option: on leave / absent
pub const ABSENT: &str = "ลา / ขาดลงมติ";
/// Vote option: present but cast no vote
pub const NO_VOTE: &str = "ไม่ลงคะแนน";
/// Long form of "did not vote", used as the last cascade label
pub const DID_NOT_VOTE: &str = "ไม่ลงคะแนนเสียง";

/// Result label when agree and disagree tie for a province
pub const TIE: &str = "ผลโหวตเสมอ";

/// Usage category: cast any option other than [`ABSENT`]
pub const USED_RIGHT: &str = "ใช้สิทธิ์";
/// Usage category: [`ABSENT`]
pub const NOT_USED_RIGHT: &str = "ไม่ใช้สิทธิ์";

/// Membership label of a constituency (district) seat
pub const DISTRICT_SEAT: &str = "แบ่งเขต";
/// Substring of a party membership post label
pub const PARTY_MEMBER: &str = "สมาชิกพรรค";

/// `type` value of the per-province majority rows in the fact table
pub const FACT_TYPE_ALL: &str = "All";

/// Options counted in the per-person vote summary
pub const SUMMARY_OPTIONS: [&str; 5] = [AGREE, DISAGREE, ABSTAIN, ABSENT, NO_VOTE];

/// Low-priority results dropped from a contested province, in order
pub const LOW_PRIORITY_RESULTS: [&str; 3] = [ABSENT, ABSTAIN, DID_NOT_VOTE];
