//! Fold specifications for building persistent results from pull sources.
//!
//! A [`Reducer`] is the seam through which external code targets a different
//! persistent representation: supply `identity`/`absorb`/`combine` and feed
//! any [`Seq`](crate::Seq) through [`Seq::reduce_with`](crate::Seq::reduce_with).

use crate::error::{BoxError, Error};
use crate::{Element, Store};

/// An incremental fold: an identity accumulator, an "absorb one element"
/// step, and a rule for combining two accumulators.
///
/// `combine` must be associative, and for data-parallel use absorption order
/// must not affect the final result; this crate only ever applies reducers
/// sequentially, left to right.
pub trait Reducer<T>: Send + Sync {
    type Acc;

    fn identity(&self) -> Self::Acc;

    /// Absorbs one element into the accumulator. `index` is the element's
    /// position in the source, used for error reporting.
    fn absorb(&self, acc: Self::Acc, index: usize, item: T) -> Result<Self::Acc, BoxError>;

    fn combine(&self, left: Self::Acc, right: Self::Acc) -> Self::Acc;

    /// Drives a whole source through [`Reducer::absorb`], in order.
    ///
    /// The first absorption failure aborts the fold and is reported as
    /// [`Error::ElementProcessing`] with the offending index; the partially
    /// built accumulator is dropped, never published.
    fn map_reduce<I>(&self, items: I) -> Result<Self::Acc, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let mut acc = self.identity();
        for (index, item) in items.into_iter().enumerate() {
            acc = self
                .absorb(acc, index, item)
                .map_err(|source| Error::ElementProcessing { index, source })?;
        }
        Ok(acc)
    }
}

/// The canonical reducer: builds the backing [`Store`]. Infallible by
/// construction; this is what pipeline materialization amounts to.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoreReducer;

impl<T: Element> Reducer<T> for StoreReducer {
    type Acc = Store<T>;

    fn identity(&self) -> Store<T> {
        Store::new()
    }

    fn absorb(&self, mut acc: Store<T>, _index: usize, item: T) -> Result<Store<T>, BoxError> {
        acc.push(item);
        Ok(acc)
    }

    fn combine(&self, left: Store<T>, right: Store<T>) -> Store<T> {
        left.concat(&right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CheckedSum {
        limit: u32,
    }

    impl Reducer<u32> for CheckedSum {
        type Acc = u32;

        fn identity(&self) -> u32 {
            0
        }

        fn absorb(&self, acc: u32, _index: usize, item: u32) -> Result<u32, BoxError> {
            if item > self.limit {
                return Err(format!("{item} exceeds limit {}", self.limit).into());
            }
            Ok(acc + item)
        }

        fn combine(&self, left: u32, right: u32) -> u32 {
            left + right
        }
    }

    #[test]
    fn map_reduce_sums() {
        let r = CheckedSum { limit: 100 };
        assert_eq!(r.map_reduce([1, 2, 3, 4]).unwrap(), 10);
        assert_eq!(r.map_reduce([]).unwrap(), 0);
    }

    #[test]
    fn map_reduce_reports_offending_index() {
        let r = CheckedSum { limit: 10 };
        let err = r.map_reduce([1, 2, 99, 4]).unwrap_err();
        match err {
            Error::ElementProcessing { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn store_reducer_builds_vector() {
        let store = StoreReducer.map_reduce(0..10u32).unwrap();
        assert_eq!(store.iter().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }
}
