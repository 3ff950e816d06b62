//! Merkle commitment library for anonymous voting eligibility
//!
//! Hashes participant secrets into leaf commitments, builds a binary hash
//! tree over the ordered leaf list, publishes the single root digest, and
//! generates/verifies per-leaf membership proofs against that root. An
//! issuer and a prover that share only the leaf list and the root stay
//! consistent because every operation is a pure function over its inputs.
//!
//! All digests are lowercase hex strings and parents hash the
//! concatenated hex *text* of their children (see [`digest`] for the
//! exact rules).
//!
//! # Quick Start
//!
//! ```rust
//! use merkle_commit::{hash_secret, locate_leaf, MerkleTree};
//!
//! // Issuer: hash secrets into leaves and commit to them
//! let leaves: Vec<_> = ["alpha", "beta", "gamma"]
//!     .iter()
//!     .map(|s| hash_secret(s))
//!     .collect();
//! let tree = MerkleTree::build(leaves.clone()).unwrap();
//! let root = tree.root().clone();
//!
//! // Prover: locate the own leaf, prove it, check against the root
//! let mine = hash_secret("beta");
//! let index = locate_leaf(&leaves, &mine).unwrap();
//! let proof = tree.prove(index).unwrap();
//! assert!(proof.verify(&mine, &root));
//! ```

pub mod digest;
pub mod error;
pub mod proof;
pub mod tree;

// Re-export commonly used types
pub use digest::{combine, hash_secret, Digest};
pub use error::{MerkleError, Result};
pub use proof::{locate_leaf, prove_membership, MerkleProof};
pub use tree::MerkleTree;
