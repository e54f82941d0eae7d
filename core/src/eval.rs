//! The evaluation pipeline: decides whether transformations run now or later.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::{Element, Store};

/// How a sequence responds to chained transformations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eval {
    /// Record transformations; run them once, fused, at the first terminal
    /// operation.
    Lazy,
    /// Run each transformation immediately against the realized store.
    Eager,
}

pub(crate) type BoxIter<T> = Box<dyn Iterator<Item = T> + Send>;

/// A pull source of elements.
///
/// `Restartable` sources (ranges, unfolds, composed transformation chains)
/// can be drawn from any number of times and always replay from the start.
/// `Once` sources wrap an externally supplied single-use iterator: the first
/// draw takes it, later draws see an empty iteration. Sharing a `Once`-backed
/// pending pipeline across threads duplicates no work but the second consumer
/// observes emptiness; that hazard belongs to the caller.
#[derive(Clone)]
pub(crate) enum Source<T> {
    Restartable(Arc<dyn Fn() -> BoxIter<T> + Send + Sync>),
    Once(Arc<Mutex<Option<BoxIter<T>>>>),
}

impl<T: Element> Source<T> {
    pub(crate) fn from_fn(f: impl Fn() -> BoxIter<T> + Send + Sync + 'static) -> Self {
        Source::Restartable(Arc::new(f))
    }

    pub(crate) fn once(iter: impl Iterator<Item = T> + Send + 'static) -> Self {
        Source::Once(Arc::new(Mutex::new(Some(Box::new(iter)))))
    }

    pub(crate) fn draw(&self) -> BoxIter<T> {
        match self {
            Source::Restartable(f) => f(),
            Source::Once(slot) => slot
                .lock()
                .expect("poisoned source lock")
                .take()
                .unwrap_or_else(|| Box::new(std::iter::empty())),
        }
    }
}

/// Either a realized store or a pending source plus a shared materialization
/// cache.
///
/// Clones of one pipeline share the cache, so `force` runs the source exactly
/// once per pipeline no matter how many handles exist. Pipelines *derived*
/// from this one (through [`Pipeline::apply`] in lazy mode) get fresh caches
/// and re-pull the source independently; if the parent has already
/// materialized, derived pipelines read from its cache instead.
#[derive(Clone)]
enum PipeState<T> {
    Realized(Store<T>),
    Pending {
        source: Source<T>,
        cache: Arc<Mutex<Option<Store<T>>>>,
    },
}

#[derive(Clone)]
pub(crate) struct Pipeline<T> {
    mode: Eval,
    state: PipeState<T>,
}

impl<T: Element> Pipeline<T> {
    pub(crate) fn realized(store: Store<T>, mode: Eval) -> Self {
        Pipeline {
            mode,
            state: PipeState::Realized(store),
        }
    }

    /// Wraps a not-yet-consumed source. In eager mode the source is consumed
    /// right away, so the pipeline is realized from the caller's perspective.
    pub(crate) fn pending(source: Source<T>, mode: Eval) -> Self {
        let pipeline = Pipeline {
            mode,
            state: PipeState::Pending {
                source,
                cache: Arc::new(Mutex::new(None)),
            },
        };
        if mode == Eval::Eager {
            pipeline.force();
        }
        pipeline
    }

    pub(crate) fn mode(&self) -> Eval {
        self.mode
    }

    /// Same state, different mode for subsequent operations. Never forces.
    pub(crate) fn with_mode(&self, mode: Eval) -> Self {
        Pipeline {
            mode,
            state: self.state.clone(),
        }
    }

    pub(crate) fn is_realized(&self) -> bool {
        match &self.state {
            PipeState::Realized(_) => true,
            PipeState::Pending { cache, .. } => {
                cache.lock().expect("poisoned pipeline cache").is_some()
            }
        }
    }

    /// Materializes (if pending) and returns the realized store.
    ///
    /// Idempotent: the result is cached and shared with every clone of this
    /// pipeline. Never returns if the source is unbounded and no bounding
    /// operation was composed in.
    pub(crate) fn force(&self) -> Store<T> {
        match &self.state {
            PipeState::Realized(store) => store.clone(),
            PipeState::Pending { source, cache } => {
                let mut cache = cache.lock().expect("poisoned pipeline cache");
                if let Some(store) = cache.as_ref() {
                    return store.clone();
                }
                let store: Store<T> = source.draw().collect();
                log::trace!("materialized pending pipeline ({} elements)", store.len());
                *cache = Some(store.clone());
                store
            }
        }
    }

    /// A single pass over this pipeline's elements.
    ///
    /// Does not populate the cache; used for minimal forcing (head/tail) and
    /// as the upstream of derived pipelines.
    pub(crate) fn source_iter(&self) -> BoxIter<T> {
        match &self.state {
            PipeState::Realized(store) => Box::new(store.clone().into_iter()),
            PipeState::Pending { source, cache } => {
                let cached = cache.lock().expect("poisoned pipeline cache").clone();
                match cached {
                    Some(store) => Box::new(store.into_iter()),
                    None => source.draw(),
                }
            }
        }
    }

    /// The heart of the two evaluation modes.
    ///
    /// Eager: materialize, run `op` once over the realized elements, realize
    /// the result. Lazy: return a new pending pipeline whose source is `op`
    /// composed over this pipeline's elements — chained operations fuse into
    /// one pass at materialization time.
    pub(crate) fn apply<R: Element>(
        &self,
        op: impl Fn(BoxIter<T>) -> BoxIter<R> + Send + Sync + 'static,
    ) -> Pipeline<R> {
        match self.mode {
            Eval::Eager => {
                let store: Store<R> = op(Box::new(self.force().into_iter())).collect();
                Pipeline::realized(store, self.mode)
            }
            Eval::Lazy => {
                let parent = self.clone();
                Pipeline::pending(Source::from_fn(move || op(parent.source_iter())), self.mode)
            }
        }
    }

    /// Forces a pending pipeline into a realized one; no-op when already
    /// realized.
    pub(crate) fn materialize(&self) -> Pipeline<T> {
        Pipeline::realized(self.force(), self.mode)
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for Pipeline<T> {
    /// Shows realized contents when available; never forces a pending
    /// pipeline (it might be unbounded).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            PipeState::Realized(store) => {
                write!(f, "Realized({:?}, {:?})", self.mode, store)
            }
            PipeState::Pending { cache, .. } => {
                match cache.lock().expect("poisoned pipeline cache").as_ref() {
                    Some(store) => write!(f, "Realized({:?}, {:?})", self.mode, store),
                    None => write!(f, "Pending({:?})", self.mode),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_source_is_single_use() {
        let source: Source<u32> = Source::once([1, 2, 3].into_iter());
        assert_eq!(source.draw().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(source.draw().collect::<Vec<_>>(), Vec::<u32>::new());
    }

    #[test]
    fn restartable_source_replays() {
        let source: Source<u32> = Source::from_fn(|| Box::new(0..3));
        assert_eq!(source.draw().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(source.draw().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn force_caches_once_sources() {
        let pipeline: Pipeline<u32> =
            Pipeline::pending(Source::once([1, 2, 3].into_iter()), Eval::Lazy);
        assert!(!pipeline.is_realized());
        assert_eq!(pipeline.force().len(), 3);
        // Second force reads the cache, not the (exhausted) source.
        assert_eq!(pipeline.force().len(), 3);
        assert!(pipeline.is_realized());
    }

    #[test]
    fn eager_pending_realizes_immediately() {
        let pipeline: Pipeline<u32> = Pipeline::pending(Source::from_fn(|| Box::new(0..5)), Eval::Eager);
        assert!(pipeline.is_realized());
    }

    #[test]
    fn mode_switch_does_not_force() {
        let pipeline: Pipeline<u32> =
            Pipeline::pending(Source::from_fn(|| Box::new(0..5)), Eval::Lazy);
        let eager = pipeline.with_mode(Eval::Eager);
        assert_eq!(eager.mode(), Eval::Eager);
        assert!(!eager.is_realized());
    }
}
