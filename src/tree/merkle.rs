//! Binary merkle tree over an ordered list of leaf digests

use super::proof::{ProofPath, ProofStep, Side};
use crate::hash::{hash, hash_pair, Digest, PairEncoding};
use crate::{Error, Result};

/// An immutable binary merkle tree
///
/// Levels are stored as an arena indexed by depth: `levels[0]` holds the
/// leaves and the last level holds only the root. Children `2k` and `2k + 1`
/// at depth `d` hash into node `k` at depth `d + 1`. When a level has odd
/// length its last node is hashed with itself.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
    encoding: PairEncoding,
}

impl MerkleTree {
    /// Build a tree from leaf digests using raw pair encoding
    pub fn build(leaves: Vec<Digest>) -> Result<Self> {
        Self::build_with(leaves, PairEncoding::Raw)
    }

    /// Build a tree from leaf digests with an explicit pair encoding
    ///
    /// Leaves are used verbatim as level 0; they are not hashed again.
    pub fn build_with(leaves: Vec<Digest>, encoding: PairEncoding) -> Result<Self> {
        if leaves.is_empty() {
            return Err(Error::InvalidInput(
                "cannot build a merkle tree with no leaves".into(),
            ));
        }

        let leaf_count = leaves.len();
        let mut levels = vec![leaves];

        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    hash_pair(left, right, encoding)
                })
                .collect();
            levels.push(next);
        }

        let tree = MerkleTree { levels, encoding };
        tracing::debug!(
            leaves = leaf_count,
            depth = tree.depth(),
            root = %tree.root().short(),
            %encoding,
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Hash each raw item and build a tree over the resulting digests
    pub fn from_data<I, T>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::build(items.into_iter().map(hash).collect())
    }

    /// The root digest
    pub fn root(&self) -> Digest {
        // build_with guarantees a non-empty top level
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels, leaves and root included
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// All levels, leaves first
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Leaf digest at `index`, if present
    pub fn leaf(&self, index: usize) -> Option<&Digest> {
        self.levels[0].get(index)
    }

    pub fn encoding(&self) -> PairEncoding {
        self.encoding
    }

    /// Derive the inclusion proof for the leaf at `leaf_index`
    pub fn get_proof(&self, leaf_index: usize) -> Result<ProofPath> {
        if leaf_index >= self.leaf_count() {
            return Err(Error::IndexOutOfRange {
                index: i64::try_from(leaf_index).unwrap_or(i64::MAX),
                leaf_count: self.leaf_count(),
            });
        }

        let mut index = leaf_index;
        let mut steps = Vec::with_capacity(self.depth() - 1);

        for level in &self.levels[..self.levels.len() - 1] {
            let (sibling, side) = if index % 2 == 1 {
                (index - 1, Side::Left)
            } else {
                (index + 1, Side::Right)
            };

            // A missing right sibling means the node was paired with itself
            if let Some(digest) = level.get(sibling) {
                steps.push(ProofStep::new(*digest, side));
            }
            index /= 2;
        }

        tracing::trace!(leaf_index, steps = steps.len(), "derived inclusion proof");
        Ok(ProofPath::with_position(steps, leaf_index, self.leaf_count()))
    }
}
