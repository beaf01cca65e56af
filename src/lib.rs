//! # merkle_commit
//!
//! Tamper-evident commitments to ordered data: an in-crate SHA-256 and a
//! binary merkle tree with inclusion proofs.
//!
//! ## Core Concepts
//!
//! - **Digest**: 32-byte SHA-256 output, rendered as lowercase hex
//! - **Leaves**: digests of the original items, in order
//! - **Root**: single digest committing to every leaf and its position
//! - **Proofs**: sibling digests and sides from a leaf up to the root,
//!   checkable without the tree
//!
//! ## Example
//!
//! ```
//! use merkle_commit::{hash, verify_proof, MerkleTree};
//!
//! let leaves: Vec<_> = ["a", "b", "c"].iter().map(|s| hash(s)).collect();
//! let tree = MerkleTree::build(leaves.clone())?;
//! let proof = tree.get_proof(2)?;
//! assert!(verify_proof(&leaves[2], &proof, &tree.root()));
//! # Ok::<(), merkle_commit::Error>(())
//! ```

pub mod config;
pub mod hash;
pub mod tree;

mod error;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use hash::{hash, hash_pair, Digest, PairEncoding, DIGEST_LEN};
pub use tree::{
    verify_proof, verify_proof_with, LeafPosition, MerkleTree, ProofPath, ProofStep, Side,
};
