//! Persistent sequences with pluggable evaluation and algebraic instances.
//!
//! The central type is [`Seq`], an immutable, structurally-shared sequence
//! backed by the persistent vector from `lazivec-vector`. A `Seq` operates in
//! one of two [`Eval`] modes:
//!
//! - **eager**: every transformation runs immediately against the realized
//!   vector and returns a new realized sequence;
//! - **lazy** (the default for generator-backed sequences): transformations
//!   are recorded by composing them over the pending source, and nothing runs
//!   until a terminal operation (indexing, iteration, folding, equality)
//!   forces materialization. Chains of `map`/`filter`/`flat_map` fuse into a
//!   single pass with no intermediate vector.
//!
//! On top of the facade sits a set of algebraic traits ([`Functor`],
//! [`Applicative`], [`Monad`], [`MonadZero`], [`MonadPlus`], [`Foldable`],
//! [`Traverse`], [`Unfoldable`], [`MonadRec`]) written once against a
//! higher-kinded brand ([`Hkt`]) so that the same derived behavior applies to
//! any container shape that supplies the four primitives (`map`, `flat_map`,
//! `pure`, `empty`). [`SeqK`] and [`OptionK`] are the two shapes provided
//! here; external adapters integrate the same way.
//!
//! [`CompletableSeq`] is the one concurrent piece: a single-assignment cell
//! that hands out [`DeferredSeq`] handles which block until a producer thread
//! completes them.

pub mod algebra;
pub mod deferred;
pub mod error;
pub mod eval;
pub mod reducer;
pub mod seq;
pub mod tailrec;

/// The branching factor of the backing store. 32 keeps interior nodes at a
/// couple of cache lines while staying shallow for realistic lengths.
pub type Store<T> = lazivec_vector::Vector<T, 32>;

/// The bound every sequence element must satisfy.
///
/// `Clone` because the store hands out elements by value from shared chunks;
/// `Send + Sync + 'static` because sequences (and the closures captured in
/// pending pipelines) may be shared across threads, including through a
/// [`DeferredSeq`].
pub trait Element: Clone + Send + Sync + 'static {}
impl<T: Clone + Send + Sync + 'static> Element for T {}

pub use algebra::{
    ap2, Applicative, ArcFn, Foldable, Functor, Hkt, Monad, MonadPlus, MonadZero, Monoid, OptionK,
    SeqK, Traverse, Unfoldable,
};
pub use deferred::{CompletableSeq, DeferredSeq};
pub use error::{BoxError, Error};
pub use eval::Eval;
pub use reducer::{Reducer, StoreReducer};
pub use seq::Seq;
pub use tailrec::{MonadRec, Step};
