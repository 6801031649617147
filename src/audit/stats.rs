use indexmap::IndexMap;
use std::collections::HashMap;
use super::{Claim, ClaimOutcome};
use crate::license::{DocumentKind, LicenseFamily};

/// Totals folded from a complete claim stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Files per family, most frequent first, ties by category
    pub family_counts: IndexMap<LicenseFamily, usize>,
    /// Files per document kind, in a fixed kind order
    pub kind_counts: IndexMap<DocumentKind, usize>,
    pub num_approved: usize,
    pub num_unapproved: usize,
    pub num_unknown: usize,
    pub num_read_errors: usize,
    pub num_total: usize,
}

impl Statistics {
    pub fn has_unapproved(&self) -> bool {
        self.num_unapproved > 0
    }

    pub fn count_for(&self, category: &str) -> usize {
        self.family_counts
            .iter()
            .find(|(family, _)| family.category == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Single pass over the claims. The result does not depend on claim order.
pub fn aggregate(claims: &[Claim]) -> Statistics {
    let mut families: HashMap<&str, (&str, usize)> = HashMap::new();
    let mut kinds: HashMap<DocumentKind, usize> = HashMap::new();
    let mut stats = Statistics::default();

    for claim in claims {
        stats.num_total += 1;
        if claim.approved {
            stats.num_approved += 1;
        } else {
            stats.num_unapproved += 1;
        }
        *kinds.entry(claim.kind).or_insert(0) += 1;

        match &claim.outcome {
            ClaimOutcome::Family { family } => {
                let entry = families
                    .entry(family.category.as_str())
                    .or_insert((family.name.as_str(), 0));
                // Same category, different display names: keep the smallest
                if family.name.as_str() < entry.0 {
                    entry.0 = family.name.as_str();
                }
                entry.1 += 1;
            }
            ClaimOutcome::Unknown => stats.num_unknown += 1,
            ClaimOutcome::ReadError { .. } => stats.num_read_errors += 1,
        }
    }

    let mut family_vec: Vec<(LicenseFamily, usize)> = families
        .into_iter()
        .map(|(category, (name, count))| (LicenseFamily::new(category, name), count))
        .collect();
    family_vec.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.category.cmp(&b.0.category)));
    stats.family_counts = family_vec.into_iter().collect();

    stats.kind_counts = [
        DocumentKind::Standard,
        DocumentKind::Binary,
        DocumentKind::Archive,
        DocumentKind::Notice,
    ]
    .into_iter()
    .filter_map(|kind| kinds.get(&kind).map(|count| (kind, *count)))
    .collect();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(path: &str, outcome: ClaimOutcome, approved: bool) -> Claim {
        Claim {
            path: path.to_string(),
            kind: DocumentKind::Standard,
            outcome,
            approved,
            header_sample: None,
        }
    }

    fn family(category: &str, name: &str) -> ClaimOutcome {
        ClaimOutcome::Family {
            family: LicenseFamily::new(category, name),
        }
    }

    fn sample_claims() -> Vec<Claim> {
        vec![
            claim("a.java", family("AL", "Apache License Version 2.0"), true),
            claim("b.java", family("AL", "Apache License Version 2.0"), true),
            claim("c.js", family("MIT", "MIT"), false),
            claim("d.txt", ClaimOutcome::Unknown, false),
            claim(
                "e.txt",
                ClaimOutcome::ReadError {
                    reason: "permission denied".to_string(),
                },
                false,
            ),
        ]
    }

    #[test]
    fn test_totals_and_invariants() {
        let stats = aggregate(&sample_claims());
        assert_eq!(stats.num_total, 5);
        assert_eq!(stats.num_approved, 2);
        assert_eq!(stats.num_unapproved, 3);
        assert_eq!(stats.num_unknown, 1);
        assert_eq!(stats.num_read_errors, 1);
        assert_eq!(stats.num_total, stats.num_approved + stats.num_unapproved);
        assert!(stats.num_unknown <= stats.num_unapproved);
        assert_eq!(stats.count_for("AL"), 2);
        assert_eq!(stats.count_for("MIT"), 1);
        assert_eq!(stats.count_for("GPL3"), 0);
        assert_eq!(stats.kind_counts.get(&DocumentKind::Standard), Some(&5));
    }

    #[test]
    fn test_family_counts_sorted_by_count() {
        let stats = aggregate(&sample_claims());
        let order: Vec<_> = stats.family_counts.keys().map(|f| f.category.as_str()).collect();
        assert_eq!(order, vec!["AL", "MIT"]);
    }

    #[test]
    fn test_order_independent() {
        let claims = sample_claims();
        let mut reversed = claims.clone();
        reversed.reverse();
        assert_eq!(aggregate(&claims), aggregate(&reversed));
    }

    #[test]
    fn test_same_category_keeps_one_name() {
        let claims = vec![
            claim("a", family("MIT", "The MIT License"), true),
            claim("b", family("MIT", "MIT"), true),
        ];
        let stats = aggregate(&claims);
        assert_eq!(stats.family_counts.len(), 1);
        let (fam, count) = stats.family_counts.get_index(0).unwrap();
        assert_eq!(fam.name, "MIT");
        assert_eq!(*count, 2);
    }

    #[test]
    fn test_empty_stream() {
        let stats = aggregate(&[]);
        assert_eq!(stats, Statistics::default());
        assert!(!stats.has_unapproved());
    }
}
