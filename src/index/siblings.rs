//! Sibling index: group membership and pairing queries.
//!
//! SEPARATE is a hard constraint (two linked people must not share a
//! service date); TOGETHER is a soft preference rewarded by the scorer.
//! When groups disagree about a pair, SEPARATE dominates.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{PairingRule, SiblingGroup};

/// Pairing relationship between two people.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingIntent {
    SeparateForbidden,
    TogetherPreferred,
    Neutral,
}

/// Precomputed sibling-group memberships.
#[derive(Debug, Clone, Default)]
pub struct SiblingIndex {
    groups: Vec<SiblingGroup>,
    /// person id -> indices into `groups`
    memberships: BTreeMap<String, Vec<usize>>,
}

impl SiblingIndex {
    pub fn build(groups: &[SiblingGroup]) -> Self {
        let groups: Vec<SiblingGroup> = groups.to_vec();
        let mut memberships: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, group) in groups.iter().enumerate() {
            for member in &group.member_ids {
                memberships.entry(member.clone()).or_default().push(idx);
            }
        }
        Self { groups, memberships }
    }

    /// Union of co-members across every group containing the person.
    pub fn siblings_of(&self, person_id: &str) -> BTreeSet<String> {
        self.partners(person_id, None)
    }

    /// Co-members linked through any SEPARATE group.
    pub fn separate_partners(&self, person_id: &str) -> BTreeSet<String> {
        self.partners(person_id, Some(PairingRule::Separate))
    }

    /// Co-members linked through any TOGETHER group.
    pub fn together_partners(&self, person_id: &str) -> BTreeSet<String> {
        self.partners(person_id, Some(PairingRule::Together))
    }

    fn partners(&self, person_id: &str, rule: Option<PairingRule>) -> BTreeSet<String> {
        let mut partners = BTreeSet::new();
        if let Some(indices) = self.memberships.get(person_id) {
            for &idx in indices {
                let group = &self.groups[idx];
                if rule.is_some_and(|r| group.pairing_rule != r) {
                    continue;
                }
                for member in &group.member_ids {
                    if member != person_id {
                        partners.insert(member.clone());
                    }
                }
            }
        }
        partners
    }

    /// Relationship between two people. If any shared group marks
    /// SEPARATE the pair is forbidden; otherwise any shared TOGETHER
    /// group makes it preferred; otherwise neutral.
    pub fn pairing_intent(&self, a: &str, b: &str) -> PairingIntent {
        let mut together = false;
        if let Some(indices) = self.memberships.get(a) {
            for &idx in indices {
                let group = &self.groups[idx];
                if !group.contains(b) {
                    continue;
                }
                match group.pairing_rule {
                    PairingRule::Separate => return PairingIntent::SeparateForbidden,
                    PairingRule::Together => together = true,
                }
            }
        }
        if together {
            PairingIntent::TogetherPreferred
        } else {
            PairingIntent::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> SiblingIndex {
        SiblingIndex::build(&[
            SiblingGroup::new("g1", "García", PairingRule::Separate).with_members(["p1", "p2"]),
            SiblingGroup::new("g2", "López", PairingRule::Together).with_members(["p2", "p3", "p4"]),
        ])
    }

    #[test]
    fn test_siblings_union_across_groups() {
        let index = sample_index();
        assert_eq!(
            index.siblings_of("p2"),
            BTreeSet::from(["p1".to_string(), "p3".to_string(), "p4".to_string()])
        );
        assert!(index.siblings_of("p9").is_empty());
    }

    #[test]
    fn test_pairing_intent() {
        let index = sample_index();
        assert_eq!(index.pairing_intent("p1", "p2"), PairingIntent::SeparateForbidden);
        assert_eq!(index.pairing_intent("p2", "p1"), PairingIntent::SeparateForbidden);
        assert_eq!(index.pairing_intent("p3", "p4"), PairingIntent::TogetherPreferred);
        assert_eq!(index.pairing_intent("p1", "p3"), PairingIntent::Neutral);
        assert_eq!(index.pairing_intent("p1", "p9"), PairingIntent::Neutral);
    }

    #[test]
    fn test_separate_dominates_together() {
        // Same pair in both a TOGETHER and a SEPARATE group
        let index = SiblingIndex::build(&[
            SiblingGroup::new("g1", "A", PairingRule::Together).with_members(["p1", "p2"]),
            SiblingGroup::new("g2", "B", PairingRule::Separate).with_members(["p1", "p2"]),
        ]);
        assert_eq!(index.pairing_intent("p1", "p2"), PairingIntent::SeparateForbidden);
    }

    #[test]
    fn test_rule_filtered_partners() {
        let index = sample_index();
        assert_eq!(index.separate_partners("p2"), BTreeSet::from(["p1".to_string()]));
        assert_eq!(
            index.together_partners("p2"),
            BTreeSet::from(["p3".to_string(), "p4".to_string()])
        );
        assert!(index.separate_partners("p3").is_empty());
    }
}
