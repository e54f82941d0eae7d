//! Cross-thread behavior of the completable cell and its handles.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lazivec_core::{CompletableSeq, Error, Seq};

#[test]
fn waiters_block_until_completion() {
    let cell: Arc<CompletableSeq<i64>> = Arc::new(CompletableSeq::new());
    let handle = cell.handle();

    let producer = {
        let cell = cell.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            assert!(cell.complete(Seq::range(0, 5).materialize()));
        })
    };

    assert_eq!(handle.wait().unwrap().to_vec(), vec![0, 1, 2, 3, 4]);
    producer.join().unwrap();
}

#[test]
fn many_consumers_observe_one_completion() {
    let cell: Arc<CompletableSeq<i64>> = Arc::new(CompletableSeq::new());

    let consumers: Vec<_> = (0..8)
        .map(|_| {
            let handle = cell.handle();
            thread::spawn(move || handle.fold_left(0i64, |acc, n| acc + n).unwrap())
        })
        .collect();

    thread::sleep(Duration::from_millis(10));
    assert!(cell.complete(Seq::of([1, 2, 3, 4])));

    for consumer in consumers {
        assert_eq!(consumer.join().unwrap(), 10);
    }
}

#[test]
fn failure_fans_out_to_all_handles() {
    let cell: Arc<CompletableSeq<i64>> = Arc::new(CompletableSeq::new());
    let blocked = cell.handle();
    let late = cell.handle();

    let waiter = thread::spawn(move || blocked.wait());

    thread::sleep(Duration::from_millis(10));
    assert!(cell.complete_err(Error::EmptySequence));

    // Both the already-blocked and the after-the-fact caller see the same
    // re-raised failure.
    for outcome in [waiter.join().unwrap(), late.wait()] {
        match outcome {
            Err(Error::Failed(inner)) => assert!(matches!(*inner, Error::EmptySequence)),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

#[test]
fn completion_races_have_one_winner() {
    let cell: Arc<CompletableSeq<i64>> = Arc::new(CompletableSeq::new());

    let racers: Vec<_> = (0..4i64)
        .map(|i| {
            let cell = cell.clone();
            thread::spawn(move || cell.complete(Seq::pure(i)))
        })
        .collect();

    let wins: usize = racers
        .into_iter()
        .map(|r| usize::from(r.join().unwrap()))
        .sum();
    assert_eq!(wins, 1);

    // The published value is whichever racer won, intact.
    let value = cell.handle().wait().unwrap();
    assert_eq!(value.len(), 1);
}

#[test]
fn delegators_dispatch_after_completion() {
    let cell: CompletableSeq<i64> = CompletableSeq::new();
    let handle = cell.handle();
    cell.complete(Seq::of([3, 1, 2]));

    assert_eq!(handle.len().unwrap(), 3);
    assert_eq!(handle.is_empty().unwrap(), false);
    assert_eq!(handle.get(1).unwrap(), Some(1));
    assert_eq!(handle.get(9).unwrap(), None);
    assert_eq!(handle.head_maybe().unwrap(), Some(3));
    assert_eq!(handle.map(|n| n * 2).unwrap().to_vec(), vec![6, 2, 4]);
    assert_eq!(handle.filter(|n| *n > 1).unwrap().to_vec(), vec![3, 2]);
    assert_eq!(handle.fold_left(0, |acc, n| acc + n).unwrap(), 6);
}

#[test]
fn wait_timeout_resolves_once_completed() {
    let cell: Arc<CompletableSeq<i64>> = Arc::new(CompletableSeq::new());
    let handle = cell.handle();

    assert!(handle
        .wait_timeout(Duration::from_millis(5))
        .unwrap()
        .is_none());

    cell.complete(Seq::pure(7));
    let resolved = handle.wait_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(resolved.unwrap().to_vec(), vec![7]);
}
