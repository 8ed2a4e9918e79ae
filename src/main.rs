extern crate argparse;

use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

use anagrams::dictionary::{LongWordPolicy, MAX_WORD_LENGTH};
use anagrams::{Anagrammer, Config, RunSummary};

struct Args {
    text: String,
    dictionary_path: String,
    included: String,
    minwords: usize,
    maxwords: usize,
    minletters: usize,
    maxletters: usize,
    threads: Option<usize>,
    output: String,
    reject_long_words: bool,
    verbose: bool,
}

fn parse_args() -> Args {
    use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};

    let mut args = Args {
        text: String::new(),
        dictionary_path: String::new(),
        included: String::new(),
        minwords: 1,
        maxwords: 1,
        minletters: 1,
        maxletters: MAX_WORD_LENGTH,
        threads: None,
        output: anagrams::config::DEFAULT_OUTPUT.to_owned(),
        reject_long_words: false,
        verbose: false,
    };

    {
        let mut ap = ArgumentParser::new();
        ap.set_description(
            "Find every combination of dictionary words that is an anagram of the given text. \
             Accented and plain letters count as the same letter.",
        );
        ap.refer(&mut args.text)
            .required()
            .add_argument("text", Store, "Text to generate anagrams of");
        ap.refer(&mut args.dictionary_path)
            .required()
            .add_option(&["-d", "--dictionary"], Store, "The path of the word list, one word per line");
        ap.refer(&mut args.included)
            .add_option(&["-i", "--include"], Store, "Text that every anagram must contain");
        ap.refer(&mut args.minwords)
            .add_option(&["-w", "--min-words"], Store, "The minimum number of words in the generated anagrams");
        ap.refer(&mut args.maxwords)
            .add_option(&["-W", "--max-words"], Store, "The maximum number of words in the generated anagrams");
        ap.refer(&mut args.minletters)
            .add_option(&["-l", "--min-letters"], Store, "The minimum number of letters per word");
        ap.refer(&mut args.maxletters)
            .add_option(&["-L", "--max-letters"], Store, "The maximum number of letters per word");
        ap.refer(&mut args.threads)
            .add_option(&["-t", "--threads"], StoreOption, "Number of threads (default: available parallelism)");
        ap.refer(&mut args.output)
            .add_option(&["-o", "--output"], Store, "Output file, or - for standard output (default: anagrams.txt)");
        ap.refer(&mut args.reject_long_words)
            .add_option(&["--reject-long-words"], StoreTrue, "Fail instead of skipping over-long dictionary words");
        ap.refer(&mut args.verbose)
            .add_option(&["-v", "--verbose"], StoreTrue, "Log every searched plan");
        ap.parse_args_or_exit();
    }

    args
}

fn run(args: Args) -> anagrams::Result<RunSummary> {
    let mut builder = Config::builder(args.text, args.dictionary_path)
        .included(args.included)
        .cardinality(args.minwords, args.maxwords)
        .word_length(args.minletters, args.maxletters)
        .output(&args.output);
    if let Some(threads) = args.threads {
        builder = builder.threads(threads);
    }
    if args.reject_long_words {
        builder = builder.long_words(LongWordPolicy::Reject);
    }

    let anagrammer = Anagrammer::new(builder.build()?);
    if args.output == "-" {
        anagrammer.run_to_writer(io::stdout())
    } else {
        anagrammer.run()
    }
}

fn main() {
    let args = parse_args();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(summary) => {
            eprintln!("{} anagrams found in {:.2?}", summary.found, summary.elapsed);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
