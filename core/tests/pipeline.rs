//! Observable evaluation behavior: when transformation closures actually run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lazivec_core::{Eval, Seq};

fn counted_map(seq: &Seq<i64>, counter: &Arc<AtomicUsize>) -> Seq<i64> {
    let counter = counter.clone();
    seq.map(move |n| {
        counter.fetch_add(1, Ordering::Relaxed);
        n + 1
    })
}

#[test]
fn lazy_transformations_are_deferred() {
    let _ = env_logger::builder().is_test(true).try_init();
    let counter = Arc::new(AtomicUsize::new(0));
    let mapped = counted_map(&Seq::range(0, 100), &counter);
    assert_eq!(counter.load(Ordering::Relaxed), 0);

    assert_eq!(mapped.len(), 100);
    assert_eq!(counter.load(Ordering::Relaxed), 100);
}

#[test]
fn eager_transformations_run_immediately() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seq = Seq::of([1i64, 2, 3]);
    assert_eq!(seq.evaluation(), Eval::Eager);

    let _mapped = counted_map(&seq, &counter);
    assert_eq!(counter.load(Ordering::Relaxed), 3);
}

#[test]
fn bounded_pull_from_an_unbounded_source() {
    // Naturals; unbounded until a take() bounds the pipeline.
    let counter = Arc::new(AtomicUsize::new(0));
    let naturals = Seq::unfold(0i64, |n| Some((n, n + 1)));
    let mapped = counted_map(&naturals, &counter);
    let first_five = mapped.take(5);

    assert_eq!(first_five.to_vec(), vec![1, 2, 3, 4, 5]);
    // Fused chain: take() bounds how many elements the map ever sees.
    assert_eq!(counter.load(Ordering::Relaxed), 5);
}

#[test]
fn head_pulls_one_element() {
    let counter = Arc::new(AtomicUsize::new(0));
    let naturals = Seq::unfold(0i64, |n| Some((n, n + 1)));
    let mapped = counted_map(&naturals, &counter);

    assert_eq!(mapped.head_maybe(), Some(1));
    assert_eq!(counter.load(Ordering::Relaxed), 1);
}

#[test]
fn materialization_is_cached() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mapped = counted_map(&Seq::range(0, 10), &counter);

    assert_eq!(mapped.len(), 10);
    assert_eq!(mapped.to_vec().len(), 10);
    assert_eq!(mapped.get(3), Some(4));
    // One materialization served every terminal.
    assert_eq!(counter.load(Ordering::Relaxed), 10);
}

#[test]
fn clones_share_one_materialization() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mapped = counted_map(&Seq::range(0, 10), &counter);
    let twin = mapped.clone();

    assert_eq!(mapped.len(), 10);
    assert_eq!(twin.len(), 10);
    assert_eq!(counter.load(Ordering::Relaxed), 10);
}

#[test]
fn derived_sequences_reuse_a_realized_parent() {
    let counter = Arc::new(AtomicUsize::new(0));
    let parent = counted_map(&Seq::range(0, 10), &counter).materialize();
    assert_eq!(counter.load(Ordering::Relaxed), 10);

    let child_a = parent.filter(|n| n % 2 == 0);
    let child_b = parent.map(|n| n * 2);
    assert_eq!(child_a.len(), 5);
    assert_eq!(child_b.len(), 10);
    // Children iterate the cached store; the counted closure never reruns.
    assert_eq!(counter.load(Ordering::Relaxed), 10);
}

#[test]
fn mode_switch_affects_only_later_operations() {
    let counter = Arc::new(AtomicUsize::new(0));
    let lazy = counted_map(&Seq::range(0, 4), &counter);
    assert_eq!(counter.load(Ordering::Relaxed), 0);

    // Switching modes does not force the recorded work...
    let eager = lazy.eager();
    assert_eq!(counter.load(Ordering::Relaxed), 0);

    // ...but the next operation runs the whole (recorded + new) chain now.
    let shifted = eager.map(|n| n - 1);
    assert_eq!(counter.load(Ordering::Relaxed), 4);
    assert_eq!(shifted.to_vec(), vec![0, 1, 2, 3]);
}

#[test]
fn failed_reduction_leaves_realized_state_usable() {
    use lazivec_core::{Error, Reducer};

    struct Limit(i64);

    impl Reducer<i64> for Limit {
        type Acc = i64;

        fn identity(&self) -> i64 {
            0
        }

        fn absorb(
            &self,
            acc: i64,
            _index: usize,
            item: i64,
        ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
            if item > self.0 {
                return Err(format!("{item} over limit").into());
            }
            Ok(acc + item)
        }

        fn combine(&self, left: i64, right: i64) -> i64 {
            left + right
        }
    }

    let seq = Seq::of([1i64, 2, 30, 4]);
    let err = seq.reduce_with(&Limit(10)).unwrap_err();
    assert!(matches!(err, Error::ElementProcessing { index: 2, .. }));
    // The sequence itself is untouched by the failed fold.
    assert_eq!(seq.to_vec(), vec![1, 2, 30, 4]);
    assert_eq!(seq.reduce_with(&Limit(100)).unwrap(), 37);
}
