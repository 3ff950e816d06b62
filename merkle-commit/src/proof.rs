//! Membership proofs: sibling-path generation and parity-walk verification
//!
//! A proof is the ordered list of sibling digests needed to recompute the
//! root from one leaf, bottom level first, together with the leaf index
//! the proof was generated for. The index drives verification: its low
//! bit at each step decides whether the running digest is the left or the
//! right input to the parent rule, then the index is halved to address
//! the next level.
//!
//! Verification is a plain boolean. A mismatching root means an invalid
//! proof or a tampered commitment, which is an expected outcome for a
//! verifier, not a fault.

use crate::digest::{combine, Digest};
use crate::error::{MerkleError, Result};
use serde::{Deserialize, Serialize};

/// Sibling path proving one leaf's membership under a root
///
/// # Example
///
/// ```rust
/// use merkle_commit::{hash_secret, MerkleTree};
///
/// let leaves: Vec<_> = ["a", "b", "c", "d"].iter().map(|s| hash_secret(s)).collect();
/// let tree = MerkleTree::build(leaves.clone()).unwrap();
///
/// let proof = tree.prove(1).unwrap();
/// assert!(proof.verify(&leaves[1], tree.root()));
/// assert!(!proof.verify(&leaves[0], tree.root()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MerkleProof {
    /// Sibling digests from the leaf level upward
    ///
    /// siblings[0] is the leaf's partner at level 0,
    /// siblings[n-1] is the sibling just below the root
    pub siblings: Vec<Digest>,

    /// Index the proof was generated for (decides left/right at each step)
    pub leaf_index: usize,
}

impl MerkleProof {
    /// Create a proof from its parts
    pub fn new(siblings: Vec<Digest>, leaf_index: usize) -> Self {
        Self {
            siblings,
            leaf_index,
        }
    }

    /// Number of levels the proof spans (tree height minus one)
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Recompute the root from `leaf` and compare it to `expected_root`
    ///
    /// # Parameters
    /// - `leaf`: the leaf commitment being proven
    /// - `expected_root`: the published root to check against
    ///
    /// # Returns
    /// - `true`: the sibling path reproduces `expected_root` for this
    ///   proof's leaf index
    /// - `false`: the path, the leaf, the index, or the root does not
    ///   match; never an error
    ///
    /// An empty proof (single-leaf tree) reduces to `leaf == expected_root`.
    pub fn verify(&self, leaf: &Digest, expected_root: &Digest) -> bool {
        let mut current = leaf.clone();
        let mut index = self.leaf_index;

        for sibling in &self.siblings {
            if index & 1 == 0 {
                // tracked node is the left input
                current = combine(&current, sibling);
            } else {
                // tracked node is the right input
                current = combine(sibling, &current);
            }

            index >>= 1;
        }

        let matches = &current == expected_root;
        if matches {
            tracing::debug!("Merkle proof verified for leaf index {}", self.leaf_index);
        } else {
            tracing::warn!(
                "Merkle proof mismatch for leaf index {}: computed {}, expected {}",
                self.leaf_index,
                current,
                expected_root
            );
        }

        matches
    }
}

/// Generate a membership proof from the leaf list alone
///
/// Recomputes the tree level by level while tracking the position of
/// interest, recording the other pair member at each step; in the
/// odd-tail case the recorded sibling is the tracked node's own digest.
/// Returns the same proof as [`crate::MerkleTree::prove`] for the same
/// inputs, without needing the built tree.
///
/// # Errors
/// - Returns `LeafIndexOutOfRange` if `leaf_index >= leaves.len()`
///   (an empty leaf list rejects every index)
///
/// # Example
///
/// ```rust
/// use merkle_commit::{hash_secret, prove_membership, MerkleTree};
///
/// let leaves: Vec<_> = ["a", "b", "c"].iter().map(|s| hash_secret(s)).collect();
///
/// let proof = prove_membership(&leaves, 2).unwrap();
/// let tree = MerkleTree::build(leaves.clone()).unwrap();
/// assert_eq!(proof, tree.prove(2).unwrap());
/// ```
pub fn prove_membership(leaves: &[Digest], leaf_index: usize) -> Result<MerkleProof> {
    if leaf_index >= leaves.len() {
        return Err(MerkleError::LeafIndexOutOfRange {
            index: leaf_index,
            leaf_count: leaves.len(),
        });
    }

    let mut siblings = Vec::new();
    let mut index = leaf_index;
    let mut level: Vec<Digest> = leaves.to_vec();

    while level.len() > 1 {
        let mut next = Vec::with_capacity((level.len() + 1) / 2);
        let mut next_index = index;

        let mut i = 0;
        while i < level.len() {
            let left = &level[i];
            let right = if i + 1 < level.len() {
                &level[i + 1]
            } else {
                // odd tail pairs with itself
                left
            };
            next.push(combine(left, right));

            if i == index {
                siblings.push(right.clone());
                next_index = i / 2;
            } else if i + 1 == index {
                siblings.push(left.clone());
                next_index = i / 2;
            }

            i += 2;
        }

        level = next;
        index = next_index;
    }

    Ok(MerkleProof::new(siblings, leaf_index))
}

/// Find the index of `target` in the distributed leaf list
///
/// Linear first-match search. `None` means the target is not part of the
/// committed set (an unregistered or mistyped secret), which callers
/// surface as a normal negative outcome.
///
/// Known limitation: duplicate leaves (identical secrets) all resolve to
/// the first occurrence, so later duplicates can only prove membership at
/// that first index.
pub fn locate_leaf(leaves: &[Digest], target: &Digest) -> Option<usize> {
    leaves.iter().position(|leaf| leaf == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::hash_secret;
    use crate::tree::MerkleTree;

    fn leaves(secrets: &[&str]) -> Vec<Digest> {
        secrets.iter().map(|s| hash_secret(s)).collect()
    }

    /// Change the first hex character of a digest
    fn tamper(digest: &Digest) -> Digest {
        let mut text = digest.as_str().to_string();
        let replacement = if text.starts_with('0') { "1" } else { "0" };
        text.replace_range(0..1, replacement);
        Digest::from_hex(&text).unwrap()
    }

    #[test]
    fn test_verify_left_and_right_positions() {
        let input = leaves(&["a", "b", "c", "d"]);
        let tree = MerkleTree::build(input.clone()).unwrap();

        // index 1: first step combines from the right
        let proof1 = tree.prove(1).unwrap();
        assert!(proof1.verify(&input[1], tree.root()));

        // index 2: first step combines from the left
        let proof2 = tree.prove(2).unwrap();
        assert_eq!(proof2.siblings[0], input[3]);
        assert!(proof2.verify(&input[2], tree.root()));
    }

    #[test]
    fn test_verify_wrong_leaf_fails() {
        let input = leaves(&["a", "b", "c", "d"]);
        let tree = MerkleTree::build(input.clone()).unwrap();

        let proof = tree.prove(0).unwrap();
        assert!(proof.verify(&input[0], tree.root()));
        assert!(!proof.verify(&input[1], tree.root()));
    }

    #[test]
    fn test_verify_wrong_index_fails() {
        // Same siblings, relabeled index: the parity walk diverges
        let input = leaves(&["a", "b", "c", "d"]);
        let tree = MerkleTree::build(input.clone()).unwrap();

        let proof = tree.prove(0).unwrap();
        let relabeled = MerkleProof::new(proof.siblings.clone(), 1);
        assert!(!relabeled.verify(&input[0], tree.root()));
    }

    #[test]
    fn test_verify_proof_not_transferable() {
        let input = leaves(&["a", "b", "c", "d"]);
        let tree = MerkleTree::build(input.clone()).unwrap();

        // A valid proof for leaf 0 says nothing about leaf 3
        let proof0 = tree.prove(0).unwrap();
        assert!(!proof0.verify(&input[3], tree.root()));
    }

    #[test]
    fn test_verify_tampered_sibling_fails() {
        let input = leaves(&["a", "b", "c", "d", "e"]);
        let tree = MerkleTree::build(input.clone()).unwrap();

        for i in 0..input.len() {
            let proof = tree.prove(i).unwrap();

            // Altering any single sibling breaks the recomputation
            for level in 0..proof.siblings.len() {
                let mut bad = proof.clone();
                bad.siblings[level] = tamper(&bad.siblings[level]);
                assert!(
                    !bad.verify(&input[i], tree.root()),
                    "tampered sibling {} accepted for leaf {}",
                    level,
                    i
                );
            }
        }
    }

    #[test]
    fn test_verify_tampered_root_fails() {
        let input = leaves(&["a", "b", "c"]);
        let tree = MerkleTree::build(input.clone()).unwrap();

        let proof = tree.prove(1).unwrap();
        let bad_root = tamper(tree.root());

        // Mismatch is a normal false, not an error
        assert!(!proof.verify(&input[1], &bad_root));
    }

    #[test]
    fn test_single_leaf_empty_proof() {
        let leaf = hash_secret("solo");
        let proof = MerkleProof::new(vec![], 0);

        assert_eq!(proof.depth(), 0);
        assert!(proof.verify(&leaf, &leaf));
        assert!(!proof.verify(&leaf, &hash_secret("other")));
    }

    #[test]
    fn test_prove_membership_matches_tree_walk() {
        // The recomputation form and the stored-tree walk must agree for
        // every index of every small tree
        for n in 1..=9usize {
            let input: Vec<Digest> = (0..n).map(|i| hash_secret(&format!("m{}", i))).collect();
            let tree = MerkleTree::build(input.clone()).unwrap();

            for i in 0..n {
                let from_leaves = prove_membership(&input, i).unwrap();
                let from_tree = tree.prove(i).unwrap();
                assert_eq!(from_leaves, from_tree, "divergence at leaf {} of {}", i, n);
            }
        }
    }

    #[test]
    fn test_prove_membership_odd_tail() {
        let input = leaves(&["a", "b", "c"]);

        let proof = prove_membership(&input, 2).unwrap();
        assert_eq!(proof.siblings.len(), 2);
        assert_eq!(proof.siblings[0], input[2]);

        let tree = MerkleTree::build(input.clone()).unwrap();
        assert!(proof.verify(&input[2], tree.root()));
    }

    #[test]
    fn test_prove_membership_out_of_range() {
        let input = leaves(&["a", "b"]);

        let result = prove_membership(&input, 2);
        assert!(result.is_err());
        match result {
            Err(MerkleError::LeafIndexOutOfRange { index, leaf_count }) => {
                assert_eq!(index, 2);
                assert_eq!(leaf_count, 2);
            }
            _ => panic!("Expected LeafIndexOutOfRange error"),
        }

        // An empty leaf list rejects every index
        let result = prove_membership(&[], 0);
        match result {
            Err(MerkleError::LeafIndexOutOfRange { index, leaf_count }) => {
                assert_eq!(index, 0);
                assert_eq!(leaf_count, 0);
            }
            _ => panic!("Expected LeafIndexOutOfRange error"),
        }
    }

    #[test]
    fn test_locate_leaf_found_and_missing() {
        let input = leaves(&["a", "b", "c"]);

        assert_eq!(locate_leaf(&input, &hash_secret("b")), Some(1));
        assert_eq!(locate_leaf(&input, &hash_secret("nope")), None);
        assert_eq!(locate_leaf(&[], &hash_secret("a")), None);
    }

    #[test]
    fn test_locate_leaf_first_of_duplicates() {
        // [h, h, k] resolves h to index 0
        let h = hash_secret("dup");
        let k = hash_secret("other");
        let input = vec![h.clone(), h.clone(), k];

        assert_eq!(locate_leaf(&input, &h), Some(0));
    }

    #[test]
    fn test_proof_serde_roundtrip() {
        let input = leaves(&["a", "b", "c", "d"]);
        let tree = MerkleTree::build(input).unwrap();

        let proof = tree.prove(3).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let back: MerkleProof = serde_json::from_str(&json).unwrap();
        assert_eq!(proof, back);
    }
}
