//! Container-generic algebra.
//!
//! Derived behaviors (applicative lifting, traversal, filtering, the
//! trampoline in [`crate::tailrec`]) are written once against a small set of
//! traits and a higher-kinded "brand": a zero-sized type implementing [`Hkt`]
//! whose `Apply<T>` GAT names the concrete container. [`SeqK`] brands
//! [`Seq`]; [`OptionK`] brands `Option` and exists to prove the derived code
//! never peeks inside the sequence representation. A third shape integrates
//! by implementing the same traits, with no registration step.

use std::sync::Arc;

use crate::seq::Seq;
use crate::Element;

/// A higher-kinded brand: `Self::Apply<T>` is the container holding `T`.
pub trait Hkt {
    type Apply<T: Element>: Element;
}

/// The brand of [`Seq`].
#[derive(Clone, Copy, Debug)]
pub struct SeqK;

/// The brand of `Option`.
#[derive(Clone, Copy, Debug)]
pub struct OptionK;

impl Hkt for SeqK {
    type Apply<T: Element> = Seq<T>;
}

impl Hkt for OptionK {
    type Apply<T: Element> = Option<T>;
}

/// A cloneable, shareable function value, so containers can hold functions
/// (as [`Applicative::ap`] requires).
pub type ArcFn<A, B> = Arc<dyn Fn(A) -> B + Send + Sync>;

pub trait Functor: Hkt {
    fn map<A: Element, B: Element>(
        fa: Self::Apply<A>,
        f: impl Fn(A) -> B + Send + Sync + 'static,
    ) -> Self::Apply<B>;
}

/// Functor plus `pure` and function application inside the container.
///
/// `ap` pairs functions with arguments positionally (zipping): element `i`
/// of the result is `ff[i](fa[i])`, and the result has the length of the
/// shorter side. For single-slot shapes like `Option` the zip is trivial.
pub trait Applicative: Functor {
    fn pure<A: Element>(a: A) -> Self::Apply<A>;

    fn ap<A: Element, B: Element>(
        ff: Self::Apply<ArcFn<A, B>>,
        fa: Self::Apply<A>,
    ) -> Self::Apply<B>;
}

/// Lifts a binary function over two containers via map-then-[`ap`].
///
/// [`ap`]: Applicative::ap
pub fn ap2<G, A, B, C>(
    f: impl Fn(A, B) -> C + Send + Sync + 'static,
    ga: G::Apply<A>,
    gb: G::Apply<B>,
) -> G::Apply<C>
where
    G: Applicative,
    A: Element,
    B: Element,
    C: Element,
{
    let f = Arc::new(f);
    let gf = G::map(ga, move |a: A| -> ArcFn<B, C> {
        let f = f.clone();
        Arc::new(move |b: B| f(a.clone(), b))
    });
    G::ap(gf, gb)
}

pub trait Monad: Applicative {
    fn flat_map<A: Element, B: Element>(
        fa: Self::Apply<A>,
        f: impl Fn(A) -> Self::Apply<B> + Send + Sync + 'static,
    ) -> Self::Apply<B>;
}

/// A monad with an absorbing empty container, which makes filtering
/// derivable: keep an element by mapping it to `pure`, discard it by mapping
/// to `empty`.
pub trait MonadZero: Monad {
    fn empty<A: Element>() -> Self::Apply<A>;

    fn filter<A: Element>(
        fa: Self::Apply<A>,
        pred: impl Fn(&A) -> bool + Send + Sync + 'static,
    ) -> Self::Apply<A> {
        Self::flat_map(fa, move |a| {
            if pred(&a) {
                Self::pure(a)
            } else {
                Self::empty()
            }
        })
    }
}

/// Adds an associative combination of two containers; for sequences this is
/// concatenation, for `Option` a left-biased choice.
pub trait MonadPlus: MonadZero {
    fn combine_k<A: Element>(left: Self::Apply<A>, right: Self::Apply<A>) -> Self::Apply<A>;
}

/// An associative combination with an identity, carried as a value so
/// callers can pick the rule per call site.
pub trait Monoid<A>: Send + Sync {
    fn empty(&self) -> A;
    fn combine(&self, left: A, right: A) -> A;
}

pub trait Foldable: Hkt {
    fn fold_left<A: Element, B>(
        fa: Self::Apply<A>,
        init: B,
        f: impl FnMut(B, A) -> B,
    ) -> B;

    fn fold_right<A: Element, B>(
        fa: Self::Apply<A>,
        init: B,
        f: impl FnMut(A, B) -> B,
    ) -> B;

    fn fold_map<A: Element, M>(
        fa: Self::Apply<A>,
        monoid: &impl Monoid<M>,
        f: impl Fn(A) -> M,
    ) -> M {
        Self::fold_left(fa, monoid.empty(), |acc, a| monoid.combine(acc, f(a)))
    }
}

/// Effectful traversal: maps each element to a value inside an outer
/// applicative `G` and collects the results back into this container, all
/// under `G`.
///
/// Implemented as a left fold seeded with `G::pure(empty)` and grown by
/// lifted append, so one "failed" element (for `G = OptionK`, a `None`)
/// collapses the whole traversal.
pub trait Traverse: Foldable + MonadPlus {
    fn traverse<G, A, B>(
        fa: Self::Apply<A>,
        f: impl Fn(A) -> G::Apply<B> + Send + Sync + 'static,
    ) -> G::Apply<Self::Apply<B>>
    where
        G: Applicative,
        A: Element,
        B: Element;

    fn sequence<G, A>(fga: Self::Apply<G::Apply<A>>) -> G::Apply<Self::Apply<A>>
    where
        G: Applicative,
        A: Element,
    {
        Self::traverse::<G, _, _>(fga, |ga| ga)
    }
}

/// Builds a container from a seed, the dual of folding.
pub trait Unfoldable: Hkt {
    fn unfold<A, S>(
        seed: S,
        f: impl Fn(S) -> Option<(A, S)> + Send + Sync + 'static,
    ) -> Self::Apply<A>
    where
        A: Element,
        S: Element;
}

// ----- Seq instances -----

impl Functor for SeqK {
    fn map<A: Element, B: Element>(
        fa: Seq<A>,
        f: impl Fn(A) -> B + Send + Sync + 'static,
    ) -> Seq<B> {
        fa.map(f)
    }
}

impl Applicative for SeqK {
    fn pure<A: Element>(a: A) -> Seq<A> {
        Seq::pure(a)
    }

    fn ap<A: Element, B: Element>(ff: Seq<ArcFn<A, B>>, fa: Seq<A>) -> Seq<B> {
        ff.zip_with(&fa, |f, a| f(a))
    }
}

impl Monad for SeqK {
    fn flat_map<A: Element, B: Element>(
        fa: Seq<A>,
        f: impl Fn(A) -> Seq<B> + Send + Sync + 'static,
    ) -> Seq<B> {
        fa.flat_map(f)
    }
}

impl MonadZero for SeqK {
    fn empty<A: Element>() -> Seq<A> {
        Seq::empty()
    }
}

impl MonadPlus for SeqK {
    fn combine_k<A: Element>(left: Seq<A>, right: Seq<A>) -> Seq<A> {
        left.plus_all(&right)
    }
}

impl Foldable for SeqK {
    fn fold_left<A: Element, B>(fa: Seq<A>, init: B, f: impl FnMut(B, A) -> B) -> B {
        fa.fold_left(init, f)
    }

    fn fold_right<A: Element, B>(fa: Seq<A>, init: B, f: impl FnMut(A, B) -> B) -> B {
        fa.fold_right(init, f)
    }
}

impl Traverse for SeqK {
    fn traverse<G, A, B>(
        fa: Seq<A>,
        f: impl Fn(A) -> G::Apply<B> + Send + Sync + 'static,
    ) -> G::Apply<Seq<B>>
    where
        G: Applicative,
        A: Element,
        B: Element,
    {
        fa.fold_left(G::pure(Seq::empty()), |acc, a| {
            ap2::<G, _, _, _>(|seq: Seq<B>, b: B| seq.plus(b), acc, f(a))
        })
    }
}

impl Unfoldable for SeqK {
    fn unfold<A, S>(seed: S, f: impl Fn(S) -> Option<(A, S)> + Send + Sync + 'static) -> Seq<A>
    where
        A: Element,
        S: Element,
    {
        Seq::unfold(seed, f)
    }
}

// ----- Option instances -----

impl Functor for OptionK {
    fn map<A: Element, B: Element>(
        fa: Option<A>,
        f: impl Fn(A) -> B + Send + Sync + 'static,
    ) -> Option<B> {
        fa.map(f)
    }
}

impl Applicative for OptionK {
    fn pure<A: Element>(a: A) -> Option<A> {
        Some(a)
    }

    fn ap<A: Element, B: Element>(ff: Option<ArcFn<A, B>>, fa: Option<A>) -> Option<B> {
        match (ff, fa) {
            (Some(f), Some(a)) => Some(f(a)),
            _ => None,
        }
    }
}

impl Monad for OptionK {
    fn flat_map<A: Element, B: Element>(
        fa: Option<A>,
        f: impl Fn(A) -> Option<B> + Send + Sync + 'static,
    ) -> Option<B> {
        fa.and_then(f)
    }
}

impl MonadZero for OptionK {
    fn empty<A: Element>() -> Option<A> {
        None
    }
}

impl MonadPlus for OptionK {
    fn combine_k<A: Element>(left: Option<A>, right: Option<A>) -> Option<A> {
        left.or(right)
    }
}

impl Foldable for OptionK {
    fn fold_left<A: Element, B>(fa: Option<A>, init: B, mut f: impl FnMut(B, A) -> B) -> B {
        match fa {
            Some(a) => f(init, a),
            None => init,
        }
    }

    fn fold_right<A: Element, B>(fa: Option<A>, init: B, mut f: impl FnMut(A, B) -> B) -> B {
        match fa {
            Some(a) => f(a, init),
            None => init,
        }
    }
}

impl Traverse for OptionK {
    fn traverse<G, A, B>(
        fa: Option<A>,
        f: impl Fn(A) -> G::Apply<B> + Send + Sync + 'static,
    ) -> G::Apply<Option<B>>
    where
        G: Applicative,
        A: Element,
        B: Element,
    {
        match fa {
            Some(a) => G::map(f(a), Some),
            None => G::pure(None),
        }
    }
}

impl Unfoldable for OptionK {
    /// `Option` holds at most one element, so unfolding takes a single step:
    /// the first emitted value, if any.
    fn unfold<A, S>(seed: S, f: impl Fn(S) -> Option<(A, S)> + Send + Sync + 'static) -> Option<A>
    where
        A: Element,
        S: Element,
    {
        f(seed).map(|(a, _)| a)
    }
}
