//! Persistent vectors with structural sharing.
//!
//! [`Vector`] is a persistent vector (a "bitmapped vector trie") with cheap
//! clones and copy-on-write modifications: any operation that changes one
//! element shares every subtree that is not on the path to that element.
//! Nodes are [`std::sync::Arc`]-shared, so a `Vector<T, N>` is `Send + Sync`
//! whenever `T` is, and two threads holding clones of the same vector may
//! read it concurrently without coordination.
//!
//! This crate is the storage primitive underneath `lazivec-core`; it knows
//! nothing about lazy pipelines or evaluation modes.

pub mod vector;

/// [`Vector`] takes a "branching factor" parameter, which must be a
/// reasonably-sized power of two. We use this trait to enforce that.
pub trait ValidBranchingConstant {}
pub struct Const<const N: usize> {}

impl ValidBranchingConstant for Const<2> {}
impl ValidBranchingConstant for Const<4> {}
impl ValidBranchingConstant for Const<8> {}
impl ValidBranchingConstant for Const<16> {}
impl ValidBranchingConstant for Const<32> {}
impl ValidBranchingConstant for Const<64> {}
impl ValidBranchingConstant for Const<128> {}

pub use vector::Vector;
