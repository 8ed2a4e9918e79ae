//! Runs a whole anagram search: index, plan, fan out, write.
//!
//! Plans are handed to a fixed pool of worker threads over a channel. Every
//! worker delivers its anagrams to one [`ResultSink`], and a single writer
//! thread drains the sink's channel into the output. The writer stops once
//! every worker has finished and the channel is empty.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use tracing::{debug, info, warn};

use crate::combinations::{self, LengthPlan};
use crate::config::Config;
use crate::dictionary::{DictionaryIndex, LoadStats};
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::search::{CancelToken, ResultSink, SearchTask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct anagrams written.
    pub found: usize,
    pub plans: usize,
    pub workers: usize,
    pub dictionary: LoadStats,
    pub elapsed: Duration,
    pub cancelled: bool,
}

pub struct Anagrammer {
    config: Config,
    progress: Arc<Progress>,
    cancel: CancelToken,
}

impl Anagrammer {
    pub fn new(config: Config) -> Self {
        Anagrammer {
            config,
            progress: Arc::new(Progress::new()),
            cancel: CancelToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Live counters for the current or last run.
    pub fn progress(&self) -> Arc<Progress> {
        self.progress.clone()
    }

    /// Cancelling stops dispatching plans and unwinds running searches.
    /// Anagrams found so far are still written.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs the search, writing anagrams to the configured output file.
    pub fn run(&self) -> Result<RunSummary> {
        let (dictionary, plans) = self.prepare()?;
        let path = self.config.output();
        let file = File::create(path).map_err(|source| Error::Output {
            path: path.to_owned(),
            source,
        })?;
        self.execute(&dictionary, plans, BufWriter::new(file))
    }

    /// Runs the search, writing anagrams to `out`.
    pub fn run_to_writer<W: Write + Send>(&self, out: W) -> Result<RunSummary> {
        let (dictionary, plans) = self.prepare()?;
        self.execute(&dictionary, plans, out)
    }

    /// Loads the dictionary and computes the length plans to search.
    pub fn prepare(&self) -> Result<(DictionaryIndex, Vec<LengthPlan>)> {
        let config = &self.config;
        let target = config.target();
        info!(
            source = config.source_text(),
            included = config.included_text().unwrap_or("<none>"),
            source_signature = %target.source,
            target_signature = %target.actual,
            min_words = target.min_words,
            max_words = target.max_words,
            "anagramming"
        );

        let dictionary =
            DictionaryIndex::from_path(config.dictionary(), &target.source, config.load_options())?;
        let stats = dictionary.stats();
        info!(
            dictionary = %config.dictionary().display(),
            words = stats.words,
            retained = stats.retained,
            filtered = stats.filtered,
            longest = stats.longest,
            "dictionary loaded"
        );

        let lengths = dictionary.available_lengths();
        let plans = if lengths.is_empty() {
            Vec::new()
        } else {
            combinations::generate(target.actual.char_count(), target.min_words, target.max_words, &lengths)
        };
        info!(plans = plans.len(), lengths = ?lengths, "length plans computed");

        Ok((dictionary, plans))
    }

    fn execute<W: Write + Send>(
        &self,
        dictionary: &DictionaryIndex,
        plans: Vec<LengthPlan>,
        out: W,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let config = &self.config;
        let target = &config.target().actual;
        let included = config.included_text();
        let workers = config.workers();
        let interval = config.progress_interval();
        let total = plans.len();
        self.progress.start(total);

        let (result_tx, result_rx) = unbounded();
        let written = thread::scope(|s| {
            let progress = &self.progress;
            let cancel = &self.cancel;
            let writer = s.spawn(move || {
                let written = write_results(result_rx, out, progress, interval);
                if written.is_err() {
                    cancel.cancel();
                }
                written
            });

            let sink = ResultSink::new(result_tx, self.progress.clone());
            info!(workers, plans = total, "starting search");
            thread::scope(|pool| {
                let (plan_tx, plan_rx) = crossbeam_channel::bounded::<LengthPlan>(workers * 2);
                for id in 0..workers {
                    let plan_rx = plan_rx.clone();
                    let sink = &sink;
                    pool.spawn(move || {
                        for plan in plan_rx {
                            let found = SearchTask::new(dictionary, target, included, &plan, cancel).run(sink);
                            debug!(worker = id, plan = %plan, found, "plan searched");
                            progress.plan_done();
                        }
                    });
                }
                drop(plan_rx);

                for plan in plans {
                    if cancel.is_cancelled() || plan_tx.send(plan).is_err() {
                        break;
                    }
                }
                drop(plan_tx);
            });
            // Dropping the sink closes the channel; the writer drains what is
            // left and returns.
            drop(sink);

            match writer.join() {
                Ok(written) => written,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
        .map_err(Error::Write)?;

        let cancelled = self.cancel.is_cancelled();
        let summary = RunSummary {
            found: written,
            plans: total,
            workers,
            dictionary: *dictionary.stats(),
            elapsed: started.elapsed(),
            cancelled,
        };
        if cancelled {
            warn!(found = written, "search cancelled");
        } else {
            info!(found = written, elapsed = ?summary.elapsed, "search complete");
        }
        Ok(summary)
    }
}

/// Writes every received line, flushing after each, until all senders are
/// gone. Logs progress at most once per `interval`.
fn write_results<W: Write>(
    results: Receiver<String>,
    mut out: W,
    progress: &Progress,
    interval: Duration,
) -> io::Result<usize> {
    let mut written = 0;
    let mut last = None;
    let mut last_report = Instant::now();
    loop {
        match results.recv_timeout(interval) {
            Ok(line) => {
                writeln!(out, "{}", line)?;
                out.flush()?;
                written += 1;
                last = Some(line);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_report.elapsed() >= interval {
            info!(
                progress = %progress.snapshot(),
                last = last.as_deref().unwrap_or(""),
                "searching"
            );
            last_report = Instant::now();
        }
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn word_list(words: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for word in words {
            writeln!(file, "{}", word).unwrap();
        }
        file
    }

    #[test]
    fn writes_each_anagram_once() {
        let dict = word_list(&["eat", "tea", "at", "e"]);
        let config = Config::builder("eat", dict.path())
            .cardinality(1, 2)
            .threads(3)
            .build()
            .unwrap();
        let mut out = Vec::new();
        let summary = Anagrammer::new(config).run_to_writer(&mut out).unwrap();

        let mut lines: Vec<&str> = std::str::from_utf8(&out).unwrap().lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["at e", "eat", "tea"]);
        assert_eq!(summary.found, 3);
        assert_eq!(summary.workers, 2);
        assert_eq!(summary.plans, 2);
        assert!(!summary.cancelled);
    }

    #[test]
    fn no_plans_means_no_output() {
        let dict = word_list(&["dog"]);
        let config = Config::builder("eat", dict.path()).cardinality(1, 2).build().unwrap();
        let anagrammer = Anagrammer::new(config);
        let mut out = Vec::new();
        let summary = anagrammer.run_to_writer(&mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(summary.found, 0);
        assert_eq!(summary.plans, 0);
        assert_eq!(anagrammer.progress().snapshot().found, 0);
    }

    #[test]
    fn cancelled_before_start_writes_nothing() {
        let dict = word_list(&["eat", "tea", "at", "e"]);
        let config = Config::builder("eat", dict.path()).cardinality(1, 2).build().unwrap();
        let anagrammer = Anagrammer::new(config);
        anagrammer.cancel_token().cancel();
        let mut out = Vec::new();
        let summary = anagrammer.run_to_writer(&mut out).unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.found, 0);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported() {
        let dict = word_list(&["eat", "tea", "at", "e"]);
        let config = Config::builder("eat", dict.path()).cardinality(1, 2).build().unwrap();
        let err = Anagrammer::new(config).run_to_writer(FailingWriter).unwrap_err();
        assert!(matches!(err, Error::Write(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn missing_dictionary_fails_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let config = Config::builder("eat", dir.path().join("missing.txt"))
            .output(&output)
            .build()
            .unwrap();
        let err = Anagrammer::new(config).run().unwrap_err();
        assert!(matches!(err, Error::Load(_)));
        assert!(!output.exists());
    }
}
