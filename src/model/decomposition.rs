use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::lenient::{self, lenient_enum};
use super::{Priority, StageRecord};

lenient_enum! {
    pub enum ClaimKind {
        Fact => "fact",
        Opinion => "opinion",
        Interpretation => "interpretation",
    }
    default = Fact
}

/// A single independently verifiable assertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomicClaim {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub statement: String,
    /// Ids of earlier claims this one assumes; empty for foundational claims.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dependencies: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: ClaimKind,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub entities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub temporal: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub quantitative: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl AtomicClaim {
    pub fn is_foundational(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Partition of atomic claim ids by whether they have prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub foundational: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub derived: Vec<String>,
}

impl DependencyGraph {
    /// Derive the partition from the claims themselves, in claim order.
    pub fn from_claims(claims: &[AtomicClaim]) -> Self {
        let (foundational, derived): (Vec<&AtomicClaim>, Vec<&AtomicClaim>) =
            claims.iter().partition(|c| c.is_foundational());
        Self {
            foundational: foundational.into_iter().map(|c| c.id.clone()).collect(),
            derived: derived.into_iter().map(|c| c.id.clone()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.foundational.is_empty() && self.derived.is_empty()
    }
}

/// Decomposer stage record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    #[serde(default, deserialize_with = "lenient::string")]
    pub original_claim: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub atomic_claims: Vec<AtomicClaim>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub dependency_graph: DependencyGraph,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_claims: u32,
    /// Repairs applied during normalization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_notes: Vec<String>,
}

impl Decomposition {
    pub fn claim_ids(&self) -> Vec<String> {
        self.atomic_claims.iter().map(|c| c.id.clone()).collect()
    }
}

impl StageRecord for Decomposition {
    const REQUIRED: &'static [&'static str] = &["atomic_claims"];

    /// Enforce the dependency invariant.
    ///
    /// Claims get unique non-empty ids. A dependency survives only if it names a
    /// claim defined earlier in the list, which rules out cycles; dangling, self
    /// and forward references are dropped with a note. A claim left with no
    /// dependencies is foundational. The dependency graph is then rebuilt from
    /// the cleaned claims.
    fn normalize(&mut self) {
        let mut notes = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, claim) in self.atomic_claims.iter_mut().enumerate() {
            let original_id = claim.id.trim().to_string();
            let mut id = if original_id.is_empty() {
                format!("claim_{}", index + 1)
            } else {
                original_id.clone()
            };
            let base = id.clone();
            let mut suffix = 2;
            while seen.contains(&id) {
                id = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            if original_id.is_empty() {
                notes.push(format!("Assigned id {} to claim without an id", id));
            } else if id != original_id {
                notes.push(format!("Renamed duplicate claim id {} to {}", original_id, id));
            }
            claim.id = id.clone();

            let mut kept: Vec<String> = Vec::new();
            for dep in claim.dependencies.drain(..) {
                let dep = dep.trim().to_string();
                if dep == id {
                    notes.push(format!("Dropped self-dependency of {}", id));
                } else if !seen.contains(&dep) {
                    notes.push(format!(
                        "Dropped dependency {} -> {}: no earlier claim has that id",
                        id, dep
                    ));
                } else if !kept.contains(&dep) {
                    kept.push(dep);
                }
            }
            claim.dependencies = kept;

            let mut unique = HashSet::new();
            claim
                .entities
                .retain(|e| !e.trim().is_empty() && unique.insert(e.trim().to_lowercase()));

            seen.insert(id);
        }

        let graph = DependencyGraph::from_claims(&self.atomic_claims);
        if !self.dependency_graph.is_empty() && !same_members(&self.dependency_graph, &graph) {
            notes.push("Rebuilt dependency_graph from atomic claim dependencies".to_string());
        }
        self.dependency_graph = graph;
        self.total_claims = self.atomic_claims.len() as u32;
        self.validation_notes.extend(notes);
    }
}

fn same_members(a: &DependencyGraph, b: &DependencyGraph) -> bool {
    let set = |v: &[String]| v.iter().cloned().collect::<HashSet<_>>();
    set(&a.foundational) == set(&b.foundational) && set(&a.derived) == set(&b.derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Decomposition {
        let mut d: Decomposition = serde_json::from_value(value).unwrap();
        d.normalize();
        d
    }

    fn assert_graph_invariant(d: &Decomposition) {
        for id in &d.dependency_graph.derived {
            let claim = d.atomic_claims.iter().find(|c| &c.id == id).unwrap();
            assert!(!claim.dependencies.is_empty(), "{} listed as derived", id);
        }
        for id in &d.dependency_graph.foundational {
            let claim = d.atomic_claims.iter().find(|c| &c.id == id).unwrap();
            assert!(claim.dependencies.is_empty(), "{} listed as foundational", id);
        }
    }

    #[test]
    fn test_well_formed_decomposition_is_untouched() {
        let d = parse(json!({
            "original_claim": "A and therefore B",
            "atomic_claims": [
                {"id": "claim_1", "statement": "A", "dependencies": [], "type": "fact",
                 "entities": ["X"], "temporal": "2024", "priority": "high"},
                {"id": "claim_2", "statement": "B", "dependencies": ["claim_1"],
                 "type": "interpretation", "priority": "medium"}
            ],
            "dependency_graph": {"foundational": ["claim_1"], "derived": ["claim_2"]},
            "total_claims": 2
        }));
        assert!(d.validation_notes.is_empty());
        assert_eq!(d.dependency_graph.foundational, vec!["claim_1"]);
        assert_eq!(d.dependency_graph.derived, vec!["claim_2"]);
        assert_eq!(d.atomic_claims[1].kind, ClaimKind::Interpretation);
        assert_graph_invariant(&d);
    }

    #[test]
    fn test_dangling_dependency_is_dropped_and_claim_becomes_foundational() {
        let d = parse(json!({
            "atomic_claims": [
                {"id": "claim_1", "statement": "A", "dependencies": ["claim_9"]}
            ],
            "dependency_graph": {"foundational": [], "derived": ["claim_1"]}
        }));
        assert!(d.atomic_claims[0].dependencies.is_empty());
        assert_eq!(d.dependency_graph.foundational, vec!["claim_1"]);
        assert!(d.dependency_graph.derived.is_empty());
        assert!(d.validation_notes.iter().any(|n| n.contains("claim_9")));
        assert_graph_invariant(&d);
    }

    #[test]
    fn test_cycles_cannot_survive() {
        let d = parse(json!({
            "atomic_claims": [
                {"id": "a", "statement": "A", "dependencies": ["b"]},
                {"id": "b", "statement": "B", "dependencies": ["a", "b"]}
            ]
        }));
        assert!(d.atomic_claims[0].dependencies.is_empty());
        assert_eq!(d.atomic_claims[1].dependencies, vec!["a"]);
        assert_graph_invariant(&d);
    }

    #[test]
    fn test_missing_and_duplicate_ids_are_repaired() {
        let d = parse(json!({
            "atomic_claims": [
                {"statement": "A"},
                {"id": "claim_1", "statement": "B"},
                {"id": 7, "statement": "C"}
            ]
        }));
        let ids = d.claim_ids();
        assert_eq!(ids, vec!["claim_1", "claim_1_2", "7"]);
        assert_eq!(d.total_claims, 3);
    }

    #[test]
    fn test_entities_are_deduplicated_in_order() {
        let d = parse(json!({
            "atomic_claims": [
                {"id": "claim_1", "statement": "A", "entities": ["BLS", "Fed", "bls", ""]}
            ]
        }));
        assert_eq!(d.atomic_claims[0].entities, vec!["BLS", "Fed"]);
    }

    #[test]
    fn test_non_object_claims_are_skipped() {
        let d = parse(json!({
            "atomic_claims": ["just a string", {"id": "claim_1", "statement": "A"}]
        }));
        assert_eq!(d.claim_ids(), vec!["claim_1"]);
    }
}
