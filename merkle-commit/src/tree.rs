//! Merkle tree construction over an ordered leaf sequence
//!
//! # Tree shape
//!
//! The tree is stored level by level: `levels[0]` is the leaf sequence
//! exactly as supplied (never resorted, never deduplicated), each
//! following level has `ceil(len/2)` parents, and the last level holds the
//! single root. A tree over N leaves therefore has `ceil(log2(N)) + 1`
//! levels; a single-leaf tree is the degenerate one-level case whose root
//! *is* the leaf.
//!
//! # Pairing
//!
//! Parents are computed left to right with the parent rule from
//! [`crate::digest::combine`]. When a level has an odd count the unpaired
//! last node is combined with itself (odd-tail duplication), never
//! dropped.
//!
//! # Proofs
//!
//! The full tree is kept after construction so [`MerkleTree::prove`] can
//! read each level's sibling directly, halving the tracked index per
//! level. [`crate::proof::prove_membership`] offers the same contract as
//! a pure function over the leaf list alone; both forms return identical
//! proofs.

use crate::digest::{combine, Digest};
use crate::error::{MerkleError, Result};
use crate::proof::MerkleProof;

/// Level-by-level Merkle tree, leaves first
///
/// # Example
///
/// ```rust
/// use merkle_commit::{hash_secret, MerkleTree};
///
/// let leaves = vec![hash_secret("a"), hash_secret("b"), hash_secret("c")];
/// let tree = MerkleTree::build(leaves).unwrap();
///
/// assert_eq!(tree.leaf_count(), 3);
/// assert_eq!(tree.level_count(), 3);
/// assert_eq!(
///     tree.root().as_str(),
///     "0bdf27bf7ec894ca7cadfe491ec1a3ece840f117989e8c5e9bd7086467bf6c38"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// levels[0] = leaves, levels[len-1] = root level (exactly one entry)
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build the full tree from an ordered leaf sequence
    ///
    /// The input order defines each leaf's index, which is the only
    /// identity a leaf has; callers distribute the same ordered list to
    /// provers.
    ///
    /// # Errors
    /// - Returns `EmptyLeaves` if `leaves` is empty. An empty round has
    ///   no root; callers must not treat this as a one-leaf tree.
    ///
    /// # Example
    ///
    /// ```rust
    /// use merkle_commit::{hash_secret, MerkleTree};
    ///
    /// let tree = MerkleTree::build(vec![hash_secret("a"), hash_secret("b")]).unwrap();
    /// let proof = tree.prove(0).unwrap();
    /// assert!(proof.verify(&hash_secret("a"), tree.root()));
    /// ```
    pub fn build(leaves: Vec<Digest>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyLeaves);
        }

        let mut levels = Vec::new();
        let mut current = leaves;

        while current.len() > 1 {
            let mut next = Vec::with_capacity((current.len() + 1) / 2);

            let mut i = 0;
            while i < current.len() {
                if i + 1 < current.len() {
                    next.push(combine(&current[i], &current[i + 1]));
                    i += 2;
                } else {
                    // odd tail: the last node pairs with itself
                    next.push(combine(&current[i], &current[i]));
                    i += 1;
                }
            }

            levels.push(current);
            current = next;
        }

        levels.push(current);

        tracing::debug!(
            "Built Merkle tree: {} leaves, {} levels",
            levels[0].len(),
            levels.len()
        );

        Ok(MerkleTree { levels })
    }

    /// Root digest (the published commitment)
    pub fn root(&self) -> &Digest {
        // the last level always holds exactly one entry
        &self.levels[self.levels.len() - 1][0]
    }

    /// The leaf level, in original order
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// All levels, leaves first, root level last
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Number of levels, root level included
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Generate the membership proof for one leaf by walking the stored
    /// levels
    ///
    /// At each level below the root the sibling of the tracked index is
    /// recorded (the node itself when it sits in an odd tail), then the
    /// index is halved to address the parent level. The proof has exactly
    /// `level_count() - 1` siblings.
    ///
    /// # Errors
    /// - Returns `LeafIndexOutOfRange` if `leaf_index >= leaf_count()`
    ///
    /// # Example
    ///
    /// ```rust
    /// use merkle_commit::{hash_secret, MerkleTree};
    ///
    /// let leaves: Vec<_> = ["a", "b", "c", "d"].iter().map(|s| hash_secret(s)).collect();
    /// let tree = MerkleTree::build(leaves.clone()).unwrap();
    ///
    /// let proof = tree.prove(2).unwrap();
    /// assert_eq!(proof.siblings.len(), 2);
    /// assert_eq!(proof.siblings[0], leaves[3]);
    /// assert!(proof.verify(&leaves[2], tree.root()));
    /// ```
    pub fn prove(&self, leaf_index: usize) -> Result<MerkleProof> {
        if leaf_index >= self.leaf_count() {
            return Err(MerkleError::LeafIndexOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        let mut current_index = leaf_index;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = if current_index % 2 == 0 {
                current_index + 1
            } else {
                current_index - 1
            };

            if sibling_index < level.len() {
                siblings.push(level[sibling_index].clone());
            } else {
                // odd tail: the sibling is the node itself
                siblings.push(level[current_index].clone());
            }

            current_index /= 2;
        }

        tracing::debug!(
            "Generated membership proof for leaf {} ({} siblings)",
            leaf_index,
            siblings.len()
        );

        Ok(MerkleProof::new(siblings, leaf_index))
    }
}
