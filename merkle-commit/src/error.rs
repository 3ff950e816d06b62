/// Error type definitions
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleError {
    #[error("Cannot build tree from empty leaf set")]
    EmptyLeaves,

    #[error("Invalid leaf index: {index} (total leaves: {leaf_count})")]
    LeafIndexOutOfRange { index: usize, leaf_count: usize },

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),
}

pub type Result<T> = std::result::Result<T, MerkleError>;
