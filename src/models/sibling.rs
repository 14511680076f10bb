//! Sibling groups and pairing rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How members of one sibling group relate on a service date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PairingRule {
    /// Soft preference: serving on the same date is rewarded.
    Together,
    /// Hard rule: two members must never share a service date.
    Separate,
}

/// A named set of persons bound by one pairing rule.
///
/// A person may belong to several groups; SEPARATE membership anywhere
/// dominates TOGETHER membership elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiblingGroup {
    pub id: String,
    pub name: String,
    pub pairing_rule: PairingRule,
    pub member_ids: BTreeSet<String>,
}

impl SiblingGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pairing_rule: PairingRule) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pairing_rule,
            member_ids: BTreeSet::new(),
        }
    }

    pub fn with_member(mut self, person_id: impl Into<String>) -> Self {
        self.member_ids.insert(person_id.into());
        self
    }

    pub fn with_members<I, S>(mut self, person_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_ids.extend(person_ids.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, person_id: &str) -> bool {
        self.member_ids.contains(person_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_builder() {
        let g = SiblingGroup::new("g1", "García", PairingRule::Separate)
            .with_members(["p1", "p2", "p3"]);
        assert_eq!(g.member_ids.len(), 3);
        assert!(g.contains("p2"));
        assert!(!g.contains("p9"));
        assert_eq!(g.pairing_rule, PairingRule::Separate);
    }
}
