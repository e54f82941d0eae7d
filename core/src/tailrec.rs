//! A stack-safe monadic loop over any [`MonadZero`] shape.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::algebra::{MonadZero, OptionK, SeqK};
use crate::seq::Seq;
use crate::Element;

/// One round of a tail-recursive computation: either the next state to feed
/// back in, or a finished result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<S, R> {
    Continue(S),
    Done(R),
}

/// Tail recursion expressed as iteration over container operations.
///
/// `tail_rec` never calls itself: it keeps a container of [`Step`] values
/// and, in an explicit loop, flat-maps every `Continue` state through the
/// step function while passing `Done` results along unchanged. The loop ends
/// when a whole round expands no `Continue`, so stack depth is constant no
/// matter how many rounds the computation takes. A step function that always
/// continues makes `tail_rec` run forever; bounding it is the caller's job.
pub trait MonadRec: MonadZero {
    /// Forces any deferred work in the container.
    ///
    /// The loop below detects progress with a flag set *inside* the
    /// flat-mapped closure, so each round has to actually run before the
    /// flag is read. Shapes whose `flat_map` is lazy force here; strict
    /// shapes return the container unchanged.
    fn run<A: Element>(fa: Self::Apply<A>) -> Self::Apply<A>;

    fn tail_rec<S, R>(
        initial: S,
        step: impl Fn(S) -> Self::Apply<Step<S, R>> + Send + Sync + 'static,
    ) -> Self::Apply<R>
    where
        S: Element,
        R: Element,
    {
        let step = Arc::new(step);
        let mut current: Self::Apply<Step<S, R>> = Self::pure(Step::Continue(initial));
        loop {
            let expanded = Arc::new(AtomicBool::new(false));
            let flag = expanded.clone();
            let step = step.clone();
            current = Self::run(Self::flat_map(current, move |s| match s {
                Step::Continue(state) => {
                    flag.store(true, Ordering::Relaxed);
                    step(state)
                }
                Step::Done(result) => Self::pure(Step::Done(result)),
            }));
            if !expanded.load(Ordering::Relaxed) {
                break;
            }
        }
        Self::flat_map(current, |s| match s {
            Step::Done(result) => Self::pure(result),
            Step::Continue(_) => Self::empty(),
        })
    }
}

impl MonadRec for SeqK {
    fn run<A: Element>(fa: Seq<A>) -> Seq<A> {
        fa.materialize()
    }
}

impl MonadRec for OptionK {
    fn run<A: Element>(fa: Option<A>) -> Option<A> {
        fa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(n: i64) -> Seq<i64> {
        SeqK::tail_rec(n, |n| {
            if n <= 0 {
                Seq::pure(Step::Done(n))
            } else {
                Seq::pure(Step::Continue(n - 1))
            }
        })
    }

    #[test]
    fn terminates_immediately() {
        assert_eq!(countdown(0), Seq::pure(0));
    }

    #[test]
    fn single_round() {
        assert_eq!(countdown(1), Seq::pure(0));
    }

    #[test]
    fn deep_recursion_is_constant_stack() {
        // Would overflow the stack if each round recursed.
        assert_eq!(countdown(100_000), Seq::pure(0));
    }

    #[test]
    fn branching_steps() {
        // Each state under 2 fans out into two results; states >= 2 halve.
        let result = SeqK::tail_rec(8i64, |n| {
            if n < 2 {
                Seq::of([Step::Done(n), Step::Done(n + 10)])
            } else {
                Seq::pure(Step::Continue(n / 2))
            }
        });
        assert_eq!(result, Seq::of([1, 11]));
    }

    #[test]
    fn empty_step_yields_empty_result() {
        let result: Seq<i64> = SeqK::tail_rec(5i64, |_| Seq::empty());
        assert!(result.is_empty());
    }

    #[test]
    fn externally_capped_loop() {
        // The step itself carries the bound; tail_rec just iterates.
        let result = SeqK::tail_rec((0i64, 0i64), |(n, rounds)| {
            if rounds >= 1000 {
                Seq::pure(Step::Done(n))
            } else {
                Seq::pure(Step::Continue((n + 2, rounds + 1)))
            }
        });
        assert_eq!(result, Seq::pure(2000));
    }

    #[test]
    fn option_tail_rec() {
        let result = OptionK::tail_rec(100i64, |n| {
            if n == 0 {
                Some(Step::Done("done"))
            } else {
                Some(Step::Continue(n - 1))
            }
        });
        assert_eq!(result, Some("done"));

        let none: Option<i64> = OptionK::tail_rec(3i64, |n| {
            if n == 0 {
                None
            } else {
                Some(Step::Continue(n - 1))
            }
        });
        assert_eq!(none, None);
    }
}
