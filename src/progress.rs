use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Run counters, shared between the workers, the writer and any observer.
///
/// The values are advisory; nothing in the search reads them back.
#[derive(Debug, Default)]
pub struct Progress {
    plans_total: AtomicUsize,
    plans_done: AtomicUsize,
    found: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub plans_done: usize,
    pub plans_total: usize,
    pub found: usize,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn start(&self, plans_total: usize) {
        self.plans_total.store(plans_total, Ordering::Relaxed);
        self.plans_done.store(0, Ordering::Relaxed);
        self.found.store(0, Ordering::Relaxed);
    }

    pub(crate) fn plan_done(&self) {
        self.plans_done.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn anagram_found(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            plans_done: self.plans_done.load(Ordering::Relaxed),
            plans_total: self.plans_total.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} plans, {} anagrams",
            self.plans_done, self.plans_total, self.found
        )
    }
}
