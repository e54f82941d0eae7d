//! The sequence facade: an immutable, structurally-shared sequence whose
//! transformations run eagerly or lazily depending on its [`Eval`] mode.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::algebra::Monoid;
use crate::error::Error;
use crate::eval::{BoxIter, Eval, Pipeline, Source};
use crate::reducer::Reducer;
use crate::{Element, Store};

/// An immutable sequence.
///
/// `Seq` is a thin handle over an evaluation pipeline: cloning is O(1), every
/// "modifying" operation returns a new handle, and the backing [`Store`]
/// shares all untouched structure with its ancestors. Sequences built from
/// generators ([`Seq::unfold`], [`Seq::range`], [`Seq::iterate`], ...) start
/// out lazy; sequences built from concrete elements start out realized.
///
/// In lazy mode, chained `map`/`filter`/`flat_map` calls compose into a
/// single pass that runs at the first terminal operation (indexing, length,
/// iteration, folding, equality) and is cached from then on. In eager mode
/// each call runs immediately.
#[derive(Clone)]
pub struct Seq<T> {
    pipeline: Pipeline<T>,
}

impl<T: Element> Seq<T> {
    // ----- factories -----

    pub fn empty() -> Self {
        Seq {
            pipeline: Pipeline::realized(Store::new(), Eval::Eager),
        }
    }

    /// A realized sequence of the given elements.
    pub fn of(items: impl IntoIterator<Item = T>) -> Self {
        Seq {
            pipeline: Pipeline::realized(items.into_iter().collect(), Eval::Eager),
        }
    }

    /// The one-element sequence.
    pub fn pure(item: T) -> Self {
        Seq::of([item])
    }

    pub fn from_vector(store: Store<T>) -> Self {
        Seq {
            pipeline: Pipeline::realized(store, Eval::Eager),
        }
    }

    /// Wraps a single-use iterator as a lazy sequence.
    ///
    /// The iterator is consumed by the first terminal operation (after which
    /// the result is cached), or by the first `head`-style probe. Probing
    /// before materializing discards the iterator's remainder, and a clone
    /// made before materialization races for the single consumption; prefer
    /// [`Seq::of`] or a restartable generator unless the source is genuinely
    /// one-shot.
    pub fn from_iter_lazy(iter: impl Iterator<Item = T> + Send + 'static) -> Self {
        Seq {
            pipeline: Pipeline::pending(Source::once(iter), Eval::Lazy),
        }
    }

    /// Lazy anamorphism: repeatedly applies `f` to the seed, emitting
    /// elements until it returns `None`. The source replays from the seed on
    /// every draw, so the sequence is restartable (and may be unbounded).
    pub fn unfold<S, F>(seed: S, f: F) -> Self
    where
        S: Element,
        F: Fn(S) -> Option<(T, S)> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Seq {
            pipeline: Pipeline::pending(
                Source::from_fn(move || {
                    let f = f.clone();
                    let mut state = Some(seed.clone());
                    Box::new(std::iter::from_fn(move || {
                        let (item, next) = f(state.take()?)?;
                        state = Some(next);
                        Some(item)
                    }))
                }),
                Eval::Lazy,
            ),
        }
    }

    /// Lazy sequence `seed, f(seed), f(f(seed)), ...` of length `limit`.
    pub fn iterate<F>(limit: usize, seed: T, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Seq {
            pipeline: Pipeline::pending(
                Source::from_fn(move || {
                    let f = f.clone();
                    Box::new(
                        std::iter::successors(Some(seed.clone()), move |prev| {
                            Some(f(prev.clone()))
                        })
                        .take(limit),
                    )
                }),
                Eval::Lazy,
            ),
        }
    }

    /// Lazy sequence of `limit` values drawn from the supplier.
    pub fn generate<F>(limit: usize, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Seq {
            pipeline: Pipeline::pending(
                Source::from_fn(move || {
                    let f = f.clone();
                    Box::new(std::iter::repeat_with(move || f()).take(limit))
                }),
                Eval::Lazy,
            ),
        }
    }

    /// Lazy sequence of `limit` copies of `value`.
    pub fn fill(limit: usize, value: T) -> Self {
        Seq {
            pipeline: Pipeline::pending(
                Source::from_fn(move || Box::new(std::iter::repeat(value.clone()).take(limit))),
                Eval::Lazy,
            ),
        }
    }

    // ----- evaluation mode -----

    /// Makes subsequent operations lazy. Never forces or re-runs anything.
    pub fn lazy(&self) -> Self {
        Seq {
            pipeline: self.pipeline.with_mode(Eval::Lazy),
        }
    }

    /// Makes subsequent operations eager. Does not force recorded work by
    /// itself; the next operation (or [`Seq::materialize`]) does.
    pub fn eager(&self) -> Self {
        Seq {
            pipeline: self.pipeline.with_mode(Eval::Eager),
        }
    }

    pub fn evaluation(&self) -> Eval {
        self.pipeline.mode()
    }

    /// Runs any recorded transformations now and caches the result.
    pub fn materialize(&self) -> Self {
        Seq {
            pipeline: self.pipeline.materialize(),
        }
    }

    // ----- plumbing -----

    fn lift<R: Element>(
        &self,
        op: impl Fn(BoxIter<T>) -> BoxIter<R> + Send + Sync + 'static,
    ) -> Seq<R> {
        Seq {
            pipeline: self.pipeline.apply(op),
        }
    }

    fn with_store(&self, store: Store<T>) -> Self {
        Seq {
            pipeline: Pipeline::realized(store, self.pipeline.mode()),
        }
    }

    // ----- transformations -----

    pub fn map<R, F>(&self, f: F) -> Seq<R>
    where
        R: Element,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let f = f.clone();
            Box::new(iter.map(move |x| f(x)))
        })
    }

    pub fn filter<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        self.lift(move |iter| {
            let pred = pred.clone();
            Box::new(iter.filter(move |x| pred(x)))
        })
    }

    pub fn filter_not<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter(move |x| !pred(x))
    }

    pub fn flat_map<R, F>(&self, f: F) -> Seq<R>
    where
        R: Element,
        F: Fn(T) -> Seq<R> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let f = f.clone();
            Box::new(iter.flat_map(move |x| f(x).into_iter()))
        })
    }

    /// Observes each element as it flows by, without changing the sequence.
    pub fn inspect<F>(&self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let f = f.clone();
            Box::new(iter.inspect(move |x| f(x)))
        })
    }

    pub fn take(&self, n: usize) -> Self {
        self.lift(move |iter| Box::new(iter.take(n)))
    }

    pub fn drop(&self, n: usize) -> Self {
        self.lift(move |iter| Box::new(iter.skip(n)))
    }

    pub fn take_while<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        self.lift(move |iter| {
            let pred = pred.clone();
            Box::new(iter.take_while(move |x| pred(x)))
        })
    }

    pub fn drop_while<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        self.lift(move |iter| {
            let pred = pred.clone();
            Box::new(iter.skip_while(move |x| pred(x)))
        })
    }

    /// Elements up to (excluding) the first one matching `pred`.
    pub fn take_until<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.take_while(move |x| !pred(x))
    }

    /// Elements from the first one matching `pred` onwards.
    pub fn drop_until<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.drop_while(move |x| !pred(x))
    }

    /// The last `n` elements. Buffers the whole sequence.
    pub fn take_right(&self, n: usize) -> Self {
        self.lift(move |iter| {
            let items: Vec<T> = iter.collect();
            let start = items.len().saturating_sub(n);
            Box::new(items.into_iter().skip(start))
        })
    }

    /// Everything but the last `n` elements. Buffers the whole sequence.
    pub fn drop_right(&self, n: usize) -> Self {
        self.lift(move |iter| {
            let mut items: Vec<T> = iter.collect();
            items.truncate(items.len().saturating_sub(n));
            Box::new(items.into_iter())
        })
    }

    /// The subrange `[start, end)`, clamped to the sequence.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        self.lift(move |iter| Box::new(iter.skip(start).take(end.saturating_sub(start))))
    }

    pub fn reverse(&self) -> Self {
        self.lift(|iter| {
            let mut items: Vec<T> = iter.collect();
            items.reverse();
            Box::new(items.into_iter())
        })
    }

    pub fn distinct(&self) -> Self
    where
        T: Eq + Hash,
    {
        self.lift(|iter| {
            let mut seen = HashSet::new();
            Box::new(iter.filter(move |x| seen.insert(x.clone())))
        })
    }

    pub fn sorted(&self) -> Self
    where
        T: Ord,
    {
        self.lift(|iter| {
            let mut items: Vec<T> = iter.collect();
            items.sort();
            Box::new(items.into_iter())
        })
    }

    pub fn sorted_by<F>(&self, cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let cmp = Arc::new(cmp);
        self.lift(move |iter| {
            let mut items: Vec<T> = iter.collect();
            items.sort_by(|a, b| cmp(a, b));
            Box::new(items.into_iter())
        })
    }

    pub fn sorted_by_key<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let key = Arc::new(key);
        self.lift(move |iter| {
            let mut items: Vec<T> = iter.collect();
            items.sort_by_key(|x| key(x));
            Box::new(items.into_iter())
        })
    }

    /// Pairs up with `other`; the result has the length of the shorter side.
    pub fn zip<U: Element>(&self, other: &Seq<U>) -> Seq<(T, U)> {
        self.zip_with(other, |a, b| (a, b))
    }

    pub fn zip_with<U, R, F>(&self, other: &Seq<U>, f: F) -> Seq<R>
    where
        U: Element,
        R: Element,
        F: Fn(T, U) -> R + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let other = other.pipeline.clone();
        self.lift(move |iter| {
            let f = f.clone();
            Box::new(iter.zip(other.source_iter()).map(move |(a, b)| f(a, b)))
        })
    }

    pub fn zip_with_index(&self) -> Seq<(T, usize)> {
        self.lift(|iter| Box::new(iter.enumerate().map(|(i, x)| (x, i))))
    }

    /// Splits into consecutive chunks of `size` elements; the last chunk may
    /// be shorter. A `size` of zero is treated as 1.
    pub fn grouped(&self, size: usize) -> Seq<Seq<T>> {
        let size = size.max(1);
        self.lift(move |iter| {
            let mut iter = iter;
            Box::new(std::iter::from_fn(move || {
                let chunk: Vec<T> = iter.by_ref().take(size).collect();
                if chunk.is_empty() {
                    None
                } else {
                    Some(Seq::of(chunk))
                }
            }))
        })
    }

    /// Windows of (up to) `size` elements whose start positions advance by
    /// `step`. Emission stops with the first window that reaches the end of
    /// the sequence, so a trailing partial window appears only when `step`
    /// leaves one. A `size` or `step` of zero is treated as 1.
    pub fn sliding(&self, size: usize, step: usize) -> Seq<Seq<T>> {
        let size = size.max(1);
        let step = step.max(1);
        self.lift(move |iter| {
            let mut iter = iter.peekable();
            let mut buf: VecDeque<T> = VecDeque::new();
            let mut done = false;
            Box::new(std::iter::from_fn(move || {
                if done {
                    return None;
                }
                while buf.len() < size {
                    match iter.next() {
                        Some(x) => buf.push_back(x),
                        None => break,
                    }
                }
                if buf.is_empty() {
                    done = true;
                    return None;
                }
                if iter.peek().is_none() {
                    done = true;
                }
                let window = Seq::of(buf.iter().cloned());
                for _ in 0..step {
                    if buf.pop_front().is_none() && iter.next().is_none() {
                        done = true;
                    }
                }
                Some(window)
            }))
        })
    }

    /// Running left fold: emits `init` followed by each successive
    /// accumulator, so the result has one more element than the input.
    pub fn scan_left<R, F>(&self, init: R, f: F) -> Seq<R>
    where
        R: Element,
        F: Fn(R, T) -> R + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let f = f.clone();
            let head = init.clone();
            Box::new(std::iter::once(head).chain(iter.scan(init.clone(), move |acc, x| {
                *acc = f(acc.clone(), x);
                Some(acc.clone())
            })))
        })
    }

    /// Running right fold: element `i` of the result folds the suffix
    /// starting at `i`; the final element is `init`. Buffers the sequence.
    pub fn scan_right<R, F>(&self, init: R, f: F) -> Seq<R>
    where
        R: Element,
        F: Fn(T, R) -> R + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let items: Vec<T> = iter.collect();
            let mut out = Vec::with_capacity(items.len() + 1);
            let mut acc = init.clone();
            out.push(acc.clone());
            for x in items.into_iter().rev() {
                acc = f(x, acc);
                out.push(acc.clone());
            }
            out.reverse();
            Box::new(out.into_iter())
        })
    }

    /// Inserts `separator` between every pair of adjacent elements.
    pub fn intersperse(&self, separator: T) -> Self {
        self.lift(move |iter| {
            let sep = separator.clone();
            let mut iter = iter.peekable();
            let mut emit_sep = false;
            Box::new(std::iter::from_fn(move || {
                if emit_sep {
                    if iter.peek().is_some() {
                        emit_sep = false;
                        return Some(sep.clone());
                    }
                    return None;
                }
                let next = iter.next()?;
                emit_sep = true;
                Some(next)
            }))
        })
    }

    /// The whole sequence repeated `times` times. Buffers one copy.
    pub fn cycle(&self, times: usize) -> Self {
        self.lift(move |iter| {
            let items: Vec<T> = iter.collect();
            Box::new((0..times).flat_map(move |_| items.clone().into_iter()))
        })
    }

    /// Merges runs of adjacent elements.
    ///
    /// Scans left to right with a carried accumulator: when
    /// `pred(&acc, &next)` holds the two are merged (`acc = op(acc, next)`)
    /// and the merged value is tested against the following element;
    /// otherwise `acc` is emitted and `next` starts a fresh run. So
    /// `[1, 1, 2, 3]` with `pred` = equality and `op` = sum merges 1+1 = 2,
    /// then 2+2 = 4, then emits `[4, 3]`.
    pub fn combine<P, F>(&self, pred: P, op: F) -> Self
    where
        P: Fn(&T, &T) -> bool + Send + Sync + 'static,
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        let op = Arc::new(op);
        self.lift(move |iter| {
            let pred = pred.clone();
            let op = op.clone();
            let mut iter = iter;
            let mut acc: Option<T> = None;
            Box::new(std::iter::from_fn(move || loop {
                match iter.next() {
                    Some(next) => match acc.take() {
                        None => acc = Some(next),
                        Some(run) => {
                            if pred(&run, &next) {
                                acc = Some(op(run, next));
                            } else {
                                acc = Some(next);
                                return Some(run);
                            }
                        }
                    },
                    None => return acc.take(),
                }
            }))
        })
    }

    /// Appends one element.
    pub fn plus(&self, value: T) -> Self {
        self.lift(move |iter| Box::new(iter.chain(std::iter::once(value.clone()))))
    }

    /// Appends every element of `other`.
    pub fn plus_all(&self, other: &Seq<T>) -> Self {
        let other = other.pipeline.clone();
        self.lift(move |iter| Box::new(iter.chain(other.source_iter())))
    }

    /// Prepends one element.
    pub fn prepend(&self, value: T) -> Self {
        self.lift(move |iter| Box::new(std::iter::once(value.clone()).chain(iter)))
    }

    /// Removes the first element equal to `value`, if any.
    pub fn remove_value(&self, value: T) -> Self
    where
        T: PartialEq,
    {
        self.lift(move |iter| {
            let target = value.clone();
            let mut removed = false;
            Box::new(iter.filter(move |x| {
                if !removed && *x == target {
                    removed = true;
                    false
                } else {
                    true
                }
            }))
        })
    }

    /// Removes every element equal to `value`.
    pub fn remove_all_values(&self, value: T) -> Self
    where
        T: PartialEq,
    {
        self.filter(move |x| *x != value)
    }

    // ----- indexed edits -----
    //
    // Index-defined operations materialize first: a lazy pipeline has no
    // length to validate against.

    /// Inserts `value` so that it ends up at position `index`; `index` may
    /// equal the length (append).
    pub fn insert_at(&self, index: usize, value: T) -> Result<Self, Error> {
        let store = self.pipeline.force();
        let len = store.len();
        store
            .inserted(index, value)
            .map(|s| self.with_store(s))
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Inserts every element of `items`, in order, starting at `index`.
    pub fn insert_all_at(
        &self,
        index: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self, Error> {
        let store = self.pipeline.force();
        let len = store.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let mut out = store.sliced(0, index);
        out.extend(items);
        out.extend(store.iter_starting_at(index).cloned());
        Ok(self.with_store(out))
    }

    pub fn remove_at(&self, index: usize) -> Result<Self, Error> {
        let store = self.pipeline.force();
        let len = store.len();
        store
            .removed(index)
            .map(|s| self.with_store(s))
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn update_at(&self, index: usize, value: T) -> Result<Self, Error> {
        let store = self.pipeline.force();
        let len = store.len();
        store
            .updated(index, value)
            .map(|s| self.with_store(s))
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    // ----- on-empty policies -----

    /// Substitutes the one-element sequence of `value` when empty.
    pub fn on_empty(&self, value: T) -> Self {
        self.on_empty_get(move || value.clone())
    }

    /// Like [`Seq::on_empty`] but the fallback is computed only when needed.
    pub fn on_empty_get<F>(&self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let f = f.clone();
            let mut iter = iter.peekable();
            if iter.peek().is_none() {
                Box::new(std::iter::once(f()))
            } else {
                Box::new(iter)
            }
        })
    }

    /// Substitutes a whole alternative sequence when empty.
    pub fn on_empty_switch<F>(&self, f: F) -> Self
    where
        F: Fn() -> Seq<T> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |iter| {
            let f = f.clone();
            let mut iter = iter.peekable();
            if iter.peek().is_none() {
                f().into_iter_boxed()
            } else {
                Box::new(iter)
            }
        })
    }

    // ----- terminal operations -----

    /// Forces materialization.
    pub fn len(&self) -> usize {
        self.pipeline.force().len()
    }

    /// Alias of [`Seq::len`].
    pub fn count(&self) -> usize {
        self.len()
    }

    /// True when the sequence has no elements. Pulls at most one element
    /// from a pending pipeline.
    pub fn is_empty(&self) -> bool {
        if self.pipeline.is_realized() {
            self.pipeline.force().is_empty()
        } else {
            self.pipeline.source_iter().next().is_none()
        }
    }

    /// Forces materialization.
    pub fn get(&self, index: usize) -> Option<T> {
        self.pipeline.force().get(index).cloned()
    }

    /// The first element, pulling at most one element from a pending
    /// pipeline. On a single-use source this consumes the source; see
    /// [`Seq::from_iter_lazy`].
    pub fn head_maybe(&self) -> Option<T> {
        if self.pipeline.is_realized() {
            self.pipeline.force().first().cloned()
        } else {
            self.pipeline.source_iter().next()
        }
    }

    pub fn head(&self) -> Result<T, Error> {
        self.head_maybe().ok_or(Error::EmptySequence)
    }

    pub fn head_or(&self, default: T) -> T {
        self.head_maybe().unwrap_or(default)
    }

    pub fn head_or_else(&self, f: impl FnOnce() -> T) -> T {
        self.head_maybe().unwrap_or_else(f)
    }

    /// Everything after the first element; empty when the sequence is. Lazy
    /// in lazy mode.
    pub fn tail(&self) -> Self {
        self.drop(1)
    }

    pub fn head_and_tail(&self) -> Option<(T, Self)> {
        // Realize first so head and tail observe the same single-use source.
        let forced = self.materialize();
        forced.head_maybe().map(|h| (h, forced.tail()))
    }

    /// An iterator over a realized snapshot of the elements. Forces.
    pub fn iter(&self) -> impl Iterator<Item = T> {
        self.pipeline.force().into_iter()
    }

    fn into_iter_boxed(self) -> BoxIter<T> {
        self.pipeline.source_iter()
    }

    /// The backing store. Forces.
    pub fn to_vector(&self) -> Store<T> {
        self.pipeline.force()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.pipeline.force().iter().cloned().collect()
    }

    // The fold family forces (and caches) like the other terminals, so
    // repeated terminals on one handle always see the same elements, even
    // when the source was single-use. Only the head probes above pull from
    // the raw source.

    pub fn fold_left<R>(&self, init: R, mut f: impl FnMut(R, T) -> R) -> R {
        let mut acc = init;
        for x in self.pipeline.force() {
            acc = f(acc, x);
        }
        acc
    }

    pub fn fold_right<R>(&self, init: R, mut f: impl FnMut(T, R) -> R) -> R {
        let items: Vec<T> = self.pipeline.force().into_iter().collect();
        let mut acc = init;
        for x in items.into_iter().rev() {
            acc = f(x, acc);
        }
        acc
    }

    /// Maps each element into a monoid and combines the results.
    pub fn fold_map<M, F>(&self, monoid: &impl Monoid<M>, f: F) -> M
    where
        F: Fn(T) -> M,
    {
        self.fold_left(monoid.empty(), |acc, x| monoid.combine(acc, f(x)))
    }

    /// Fold without an identity; `None` on empty input.
    pub fn reduce(&self, mut f: impl FnMut(T, T) -> T) -> Option<T> {
        let mut iter = self.pipeline.force().into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, x| f(acc, x)))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.pipeline.force().iter().any(|x| x == value)
    }

    pub fn for_each(&self, mut f: impl FnMut(T)) {
        for x in self.pipeline.force() {
            f(x);
        }
    }

    /// Drives the elements through an external [`Reducer`], producing its
    /// accumulator or the first absorption failure (with the offending
    /// index).
    pub fn reduce_with<R: Reducer<T>>(&self, reducer: &R) -> Result<R::Acc, Error> {
        reducer.map_reduce(self.pipeline.force())
    }
}

impl Seq<i64> {
    /// The lazy sequence `start, start + 1, ..., end - 1`.
    pub fn range(start: i64, end: i64) -> Self {
        Seq {
            pipeline: Pipeline::pending(Source::from_fn(move || Box::new(start..end)), Eval::Lazy),
        }
    }
}

impl<T: Element> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Seq::of(iter)
    }
}

impl<T: Element> IntoIterator for Seq<T> {
    type Item = T;
    type IntoIter = <Store<T> as IntoIterator>::IntoIter;

    /// Forces materialization; iteration is a terminal operation.
    fn into_iter(self) -> Self::IntoIter {
        self.pipeline.force().into_iter()
    }
}

impl<T: Element> Default for Seq<T> {
    fn default() -> Self {
        Seq::empty()
    }
}

/// Equality forces both sides.
impl<T: Element + PartialEq> PartialEq for Seq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.pipeline.force() == other.pipeline.force()
    }
}

impl<T: Element + Eq> Eq for Seq<T> {}

/// Shows realized contents; a pending pipeline is reported as pending rather
/// than forced, since it may be unbounded.
impl<T: Element + fmt::Debug> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({:?})", self.pipeline)
    }
}

impl<T: Element + serde::Serialize> serde::Serialize for Seq<T> {
    /// Serializes as a plain sequence of elements. Forces.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.pipeline.force().iter())
    }
}

impl<'de, T: Element + serde::Deserialize<'de>> serde::Deserialize<'de> for Seq<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(Seq::of(items))
    }
}
