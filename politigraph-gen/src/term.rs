//! Current representative-term detection
//!
//! Term labels look like "สส. ชุดที่ 26". The default policy takes the
//! lexicographically greatest label of the expected width, which tracks the
//! latest term only while term numbers keep the same number of digits.

use politigraph_common::RunConfig;

/// Chooses the current term label out of all post labels
pub trait TermPolicy {
    fn current_term<'a>(&self, labels: &[&'a str]) -> Option<&'a str>;
}

/// Greatest label containing `prefix` with exactly `width` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestFixedWidthTerm {
    prefix: String,
    width: usize,
}

impl LatestFixedWidthTerm {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.rep_term_prefix.clone(), config.rep_term_label_width)
    }
}

impl TermPolicy for LatestFixedWidthTerm {
    fn current_term<'a>(&self, labels: &[&'a str]) -> Option<&'a str> {
        labels
            .iter()
            .copied()
            .filter(|label| label.contains(self.prefix.as_str()))
            .filter(|label| label.chars().count() == self.width)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LatestFixedWidthTerm {
        LatestFixedWidthTerm::from_config(&RunConfig::default())
    }

    #[test]
    fn test_picks_latest_term() {
        let labels = ["สส. ชุดที่ 24", "สส. ชุดที่ 26", "สส. ชุดที่ 25", "สมาชิกพรรค"];
        assert_eq!(policy().current_term(&labels), Some("สส. ชุดที่ 26"));
    }

    #[test]
    fn test_ignores_other_widths() {
        // Longer labels (e.g. list-seat suffixes) are not term labels
        let labels = ["สส. ชุดที่ 25", "สส. ชุดที่ 26 (บัญชีรายชื่อ)", "สส. ชุดที่ 9"];
        assert_eq!(policy().current_term(&labels), Some("สส. ชุดที่ 25"));
    }

    #[test]
    fn test_no_term_labels() {
        let labels = ["สมาชิกพรรค", "กรรมาธิการ"];
        assert_eq!(policy().current_term(&labels), None);
        assert_eq!(policy().current_term(&[]), None);
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let ascii = LatestFixedWidthTerm::new("MP term", 10);
        assert_eq!(
            ascii.current_term(&["MP term 07", "MP term 12", "MP term 3"]),
            Some("MP term 12")
        );
    }

    #[test]
    fn test_custom_policy_can_be_injected() {
        struct Fixed;
        impl TermPolicy for Fixed {
            fn current_term<'a>(&self, labels: &[&'a str]) -> Option<&'a str> {
                labels.iter().copied().find(|l| *l == "สส. ชุดที่ 25")
            }
        }
        assert_eq!(Fixed.current_term(&["สส. ชุดที่ 26", "สส. ชุดที่ 25"]), Some("สส. ชุดที่ 25"));
    }
}
