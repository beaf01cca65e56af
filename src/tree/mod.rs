//! Binary merkle tree and inclusion proofs
//!
//! The tree is built once from ordered leaf digests and never mutated.
//! Proofs are verified with [`verify_proof`], which needs only the leaf,
//! the proof and the expected root.

mod merkle;
mod proof;

pub use merkle::MerkleTree;
pub use proof::{verify_proof, verify_proof_with, LeafPosition, ProofPath, ProofStep, Side};
