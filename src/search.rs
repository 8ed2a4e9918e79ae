//! Expansion of one length plan into concrete anagrams.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::trace;

use crate::dictionary::{DictionaryIndex, Entry};
use crate::progress::Progress;
use crate::signature::Signature;

/// Cooperative stop flag shared by the dispatcher and every search task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Where search tasks deliver anagrams.
///
/// A line is sent to the writer only the first time it is offered. The
/// seen-set lookup, the send and the insertion happen under one lock, so two
/// workers can never both deliver the same line.
pub struct ResultSink {
    seen: Mutex<HashSet<String>>,
    sender: Sender<String>,
    progress: Arc<Progress>,
}

impl ResultSink {
    pub fn new(sender: Sender<String>, progress: Arc<Progress>) -> Self {
        ResultSink {
            seen: Mutex::new(HashSet::new()),
            sender,
            progress,
        }
    }

    /// Returns `true` if `line` was new and has been queued.
    pub fn offer(&self, line: String) -> bool {
        let mut seen = self.seen.lock();
        if seen.contains(&line) {
            return false;
        }
        // The writer is gone only after a write failure, which cancels the run
        if self.sender.send(line.clone()).is_err() {
            return false;
        }
        seen.insert(line);
        self.progress.anagram_found();
        true
    }
}

/// Backtracking search over a single length plan.
pub struct SearchTask<'a> {
    dictionary: &'a DictionaryIndex,
    target: &'a Signature,
    included: Option<&'a str>,
    plan: &'a [usize],
    cancel: &'a CancelToken,
}

impl<'a> SearchTask<'a> {
    pub fn new(
        dictionary: &'a DictionaryIndex,
        target: &'a Signature,
        included: Option<&'a str>,
        plan: &'a [usize],
        cancel: &'a CancelToken,
    ) -> Self {
        SearchTask {
            dictionary,
            target,
            included,
            plan,
            cancel,
        }
    }

    /// Runs the search, returning how many new anagrams were delivered.
    pub fn run(&self, sink: &ResultSink) -> usize {
        if self.plan.is_empty() {
            return 0;
        }
        let mut acc = Signature::new();
        let mut chosen = Vec::with_capacity(self.plan.len());
        let mut found = 0;
        self.search(0, &mut acc, &mut chosen, sink, &mut found);
        found
    }

    fn search(
        &self,
        position: usize,
        acc: &mut Signature,
        chosen: &mut Vec<(usize, &'a Entry)>,
        sink: &ResultSink,
        found: &mut usize,
    ) {
        if position == self.plan.len() {
            if *acc == *self.target {
                self.emit(chosen, sink, found);
            }
            return;
        }

        let length = self.plan[position];
        // Plans are non-decreasing: for a run of equal lengths only visit
        // entries in index order so each multiset is reached once.
        let start = match chosen.last() {
            Some(&(index, _)) if self.plan[position - 1] == length => index,
            _ => 0,
        };

        for (index, entry) in self.dictionary.section(length).iter().enumerate().skip(start) {
            if self.cancel.is_cancelled() {
                return;
            }

            *acc += &entry.signature;
            if !acc.is_subset_of(self.target) {
                *acc -= &entry.signature;
                continue;
            }

            chosen.push((index, entry));
            self.search(position + 1, acc, chosen, sink, found);
            chosen.pop();
            *acc -= &entry.signature;
        }
    }

    fn emit(&self, chosen: &[(usize, &'a Entry)], sink: &ResultSink, found: &mut usize) {
        let mut words: Vec<&str> = Vec::with_capacity(chosen.len());
        self.expand(chosen, &mut words, sink, found);
    }

    // Every choice of one surface form per chosen signature.
    fn expand(
        &self,
        chosen: &[(usize, &'a Entry)],
        words: &mut Vec<&'a str>,
        sink: &ResultSink,
        found: &mut usize,
    ) {
        let Some((&(_, entry), rest)) = chosen.split_first() else {
            let line = self.canonical_line(words);
            trace!(anagram = %line, "candidate");
            if sink.offer(line) {
                *found += 1;
            }
            return;
        };

        for word in &entry.words {
            words.push(word);
            self.expand(rest, words, sink, found);
            words.pop();
        }
    }

    fn canonical_line(&self, words: &[&str]) -> String {
        let mut all: Vec<&str> = Vec::with_capacity(words.len() + 1);
        if let Some(included) = self.included {
            all.push(included);
        }
        all.extend_from_slice(words);
        all.sort_unstable();
        all.join(" ")
    }
}
