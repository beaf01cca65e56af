//! Inclusion proofs and their verification

use crate::hash::{hash_pair, Digest, PairEncoding};
use serde::{Deserialize, Serialize};

/// Which side of the pair the sibling occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One level of an inclusion proof
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Digest of the sibling node at this level
    pub sibling: Digest,
    /// Position of the sibling relative to the running digest
    pub side: Side,
}

impl ProofStep {
    pub fn new(sibling: Digest, side: Side) -> Self {
        ProofStep { sibling, side }
    }

    /// Combine the running digest with this step's sibling
    pub fn apply(&self, current: &Digest, encoding: PairEncoding) -> Digest {
        match self.side {
            Side::Left => hash_pair(&self.sibling, current, encoding),
            Side::Right => hash_pair(current, &self.sibling, encoding),
        }
    }
}

/// Where the proven leaf sits in its tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPosition {
    pub index: usize,
    pub leaf_count: usize,
}

impl LeafPosition {
    /// For each level below the root, the side the sibling must occupy, or
    /// `None` where the node on the path is the unpaired last node of an
    /// odd-length level (and so hashed with itself)
    ///
    /// Empty when `index` is not below `leaf_count`.
    pub fn sibling_sides(&self) -> Vec<Option<Side>> {
        let mut sides = Vec::new();
        if self.index >= self.leaf_count {
            return sides;
        }
        let (mut index, mut len) = (self.index, self.leaf_count);
        while len > 1 {
            sides.push(if index % 2 == 1 {
                Some(Side::Left)
            } else if index + 1 == len {
                None
            } else {
                Some(Side::Right)
            });
            index /= 2;
            len = len.div_ceil(2);
        }
        sides
    }

    /// For each level below the root, whether the node on the path is hashed
    /// with itself
    pub fn self_paired_levels(&self) -> Vec<bool> {
        self.sibling_sides().iter().map(Option::is_none).collect()
    }
}

/// Ordered sibling steps from the leaf level up to (not including) the root
///
/// Levels where the node on the path was the unpaired last node, and was
/// therefore hashed with itself, contribute no step. Proofs derived from a
/// [`MerkleTree`](super::MerkleTree) also record the leaf position so the
/// verifier can redo those self-pairings; a proof without a position is
/// folded over its steps alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<LeafPosition>,
    steps: Vec<ProofStep>,
}

impl ProofPath {
    /// A proof with no position: verified by folding the steps only
    pub fn new(steps: Vec<ProofStep>) -> Self {
        ProofPath {
            position: None,
            steps,
        }
    }

    pub fn with_position(steps: Vec<ProofStep>, index: usize, leaf_count: usize) -> Self {
        ProofPath {
            position: Some(LeafPosition { index, leaf_count }),
            steps,
        }
    }

    pub fn position(&self) -> Option<LeafPosition> {
        self.position
    }

    /// Drop the position, leaving only the steps
    pub fn without_position(mut self) -> Self {
        self.position = None;
        self
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProofStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fold the proof over `leaf` and return the resulting root
    ///
    /// Returns `None` when the recorded position is out of range, or when the
    /// steps do not match the shape it implies: wrong count, or a sibling on
    /// the wrong side at some level.
    pub fn compute_root(&self, leaf: &Digest, encoding: PairEncoding) -> Option<Digest> {
        let Some(position) = self.position else {
            return Some(
                self.steps
                    .iter()
                    .fold(*leaf, |current, step| step.apply(&current, encoding)),
            );
        };
        if position.index >= position.leaf_count {
            return None;
        }

        let mut steps = self.steps.iter();
        let mut current = *leaf;
        for expected in position.sibling_sides() {
            current = match expected {
                None => hash_pair(&current, &current, encoding),
                Some(side) => {
                    let step = steps.next()?;
                    if step.side != side {
                        return None;
                    }
                    step.apply(&current, encoding)
                }
            };
        }

        match steps.next() {
            Some(_) => None,
            None => Some(current),
        }
    }
}

impl From<Vec<ProofStep>> for ProofPath {
    fn from(steps: Vec<ProofStep>) -> Self {
        ProofPath::new(steps)
    }
}

impl<'a> IntoIterator for &'a ProofPath {
    type Item = &'a ProofStep;
    type IntoIter = std::slice::Iter<'a, ProofStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Check that `proof` folds `leaf` up to `root`, using raw pair encoding
///
/// Needs no tree. Never fails: a malformed or tampered proof just does not
/// reach `root` and yields `false`.
pub fn verify_proof(leaf: &Digest, proof: &ProofPath, root: &Digest) -> bool {
    verify_proof_with(leaf, proof, root, PairEncoding::Raw)
}

/// [`verify_proof`] with an explicit pair encoding
pub fn verify_proof_with(
    leaf: &Digest,
    proof: &ProofPath,
    root: &Digest,
    encoding: PairEncoding,
) -> bool {
    let computed = proof.compute_root(leaf, encoding);
    let valid = computed.as_ref() == Some(root);
    tracing::trace!(
        leaf = %leaf.short(),
        steps = proof.len(),
        positioned = proof.position.is_some(),
        valid,
        "verified inclusion proof"
    );
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;

    #[test]
    fn test_empty_proof_compares_leaf_to_root() {
        let leaf = hash("only");
        let proof = ProofPath::default();
        assert!(verify_proof(&leaf, &proof, &leaf));
        assert!(!verify_proof(&leaf, &proof, &hash("other")));

        let positioned = ProofPath::with_position(vec![], 0, 1);
        assert!(verify_proof(&leaf, &positioned, &leaf));
    }

    #[test]
    fn test_step_sides() {
        let leaf = hash("leaf");
        let sib = hash("sib");

        let left = ProofStep::new(sib, Side::Left);
        let right = ProofStep::new(sib, Side::Right);

        assert_eq!(
            left.apply(&leaf, PairEncoding::Raw),
            hash_pair(&sib, &leaf, PairEncoding::Raw)
        );
        assert_eq!(
            right.apply(&leaf, PairEncoding::Raw),
            hash_pair(&leaf, &sib, PairEncoding::Raw)
        );
    }

    #[test]
    fn test_hand_built_two_level_proof() {
        let (a, b, c) = (hash("a"), hash("b"), hash("c"));
        let ab = hash_pair(&a, &b, PairEncoding::Raw);
        let cc = hash_pair(&c, &c, PairEncoding::Raw);
        let root = hash_pair(&ab, &cc, PairEncoding::Raw);

        let proof = ProofPath::new(vec![
            ProofStep::new(a, Side::Left),
            ProofStep::new(cc, Side::Right),
        ]);
        assert!(verify_proof(&b, &proof, &root));
        assert!(!verify_proof(&a, &proof, &root));
        assert!(!verify_proof_with(&b, &proof, &root, PairEncoding::Hex));
    }

    #[test]
    fn test_position_redoes_self_pairing() {
        let (a, b, c) = (hash("a"), hash("b"), hash("c"));
        let ab = hash_pair(&a, &b, PairEncoding::Raw);
        let cc = hash_pair(&c, &c, PairEncoding::Raw);
        let root = hash_pair(&ab, &cc, PairEncoding::Raw);

        let steps = vec![ProofStep::new(ab, Side::Left)];
        assert!(verify_proof(
            &c,
            &ProofPath::with_position(steps.clone(), 2, 3),
            &root
        ));
        assert!(!verify_proof(&c, &ProofPath::new(steps), &root));
    }

    #[test]
    fn test_step_count_must_match_position() {
        let leaf = hash("x");
        let sib = hash("y");
        let root = hash_pair(&leaf, &sib, PairEncoding::Raw);

        let extra = ProofPath::with_position(
            vec![ProofStep::new(sib, Side::Right), ProofStep::new(sib, Side::Right)],
            0,
            2,
        );
        assert_eq!(extra.compute_root(&leaf, PairEncoding::Raw), None);
        assert!(!verify_proof(&leaf, &extra, &root));

        let short = ProofPath::with_position(vec![], 0, 2);
        assert_eq!(short.compute_root(&leaf, PairEncoding::Raw), None);
    }

    #[test]
    fn test_self_paired_levels() {
        let pos = LeafPosition {
            index: 10,
            leaf_count: 11,
        };
        assert_eq!(pos.self_paired_levels(), vec![true, false, true, false]);

        let pos = LeafPosition {
            index: 2,
            leaf_count: 11,
        };
        assert_eq!(pos.self_paired_levels(), vec![false; 4]);

        let pos = LeafPosition {
            index: 0,
            leaf_count: 1,
        };
        assert!(pos.self_paired_levels().is_empty());
    }

    #[test]
    fn test_sibling_sides() {
        let pos = LeafPosition {
            index: 10,
            leaf_count: 11,
        };
        assert_eq!(
            pos.sibling_sides(),
            vec![None, Some(Side::Left), None, Some(Side::Left)]
        );

        let pos = LeafPosition {
            index: 2,
            leaf_count: 11,
        };
        assert_eq!(
            pos.sibling_sides(),
            vec![
                Some(Side::Right),
                Some(Side::Left),
                Some(Side::Right),
                Some(Side::Right)
            ]
        );

        let pos = LeafPosition {
            index: 3,
            leaf_count: 3,
        };
        assert!(pos.sibling_sides().is_empty());
    }

    #[test]
    fn test_position_must_agree_with_sides() {
        let (a, b) = (hash("a"), hash("b"));
        let root = hash_pair(&a, &b, PairEncoding::Raw);
        let steps = vec![ProofStep::new(a, Side::Left)];

        assert!(verify_proof(&b, &ProofPath::with_position(steps.clone(), 1, 2), &root));
        // same steps claimed for the left leaf: sibling would have to be on the right
        assert_eq!(
            ProofPath::with_position(steps.clone(), 0, 2).compute_root(&b, PairEncoding::Raw),
            None
        );
        // index past the end
        assert_eq!(
            ProofPath::with_position(steps, 2, 2).compute_root(&b, PairEncoding::Raw),
            None
        );
    }

    #[test]
    fn test_proof_json_shape() {
        let sib = hash("sib");
        let proof = ProofPath::new(vec![ProofStep::new(sib, Side::Left)]);
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["steps"][0]["side"], "left");
        assert_eq!(json["steps"][0]["sibling"], sib.to_hex());
        assert!(json.get("position").is_none());

        let back: ProofPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);

        let positioned = ProofPath::with_position(vec![ProofStep::new(sib, Side::Left)], 1, 2);
        let json = serde_json::to_value(&positioned).unwrap();
        assert_eq!(json["position"]["index"], 1);
        assert_eq!(json["position"]["leaf_count"], 2);
    }
}
