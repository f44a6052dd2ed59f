//! Phonolex command line interface
//!
//! ```bash
//! # Word-level and phoneme-level report
//! phonolex describe cat kitten
//!
//! # Words ending in a vowel followed by an alveolar consonant
//! phonolex search '[TYPE="V"] [PLACE="alveolar"]' --mode ends_with --syllables 2..4
//!
//! # JSON query document
//! phonolex search --query query.json --parallel
//! ```

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use phonolex::{
    CountFilter, Corpus, Lexicon, LexiconPaths, Mode, Query, WordFilter, par_search,
    parse_pattern, search,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "phonolex")]
#[command(version)]
#[command(about = "Describe words and search a pronunciation lexicon by phonological feature patterns")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct DataArgs {
    /// Directory holding cmu.json, features.json, commonwords.txt and commonlemmas.txt
    #[arg(long, global = true, env = "PHONOLEX_DATA", default_value = "data")]
    data_dir: PathBuf,

    /// Pronunciation dictionary (overrides the data directory)
    #[arg(long, global = true)]
    vocabulary: Option<PathBuf>,

    /// Phone feature table (overrides the data directory)
    #[arg(long, global = true)]
    features: Option<PathBuf>,

    /// Common word list (overrides the data directory)
    #[arg(long, global = true)]
    common_words: Option<PathBuf>,

    /// Common lemma list (overrides the data directory)
    #[arg(long, global = true)]
    common_lemmas: Option<PathBuf>,
}

impl DataArgs {
    fn paths(self) -> LexiconPaths {
        let defaults = LexiconPaths::in_dir(&self.data_dir);
        LexiconPaths {
            vocabulary: self.vocabulary.unwrap_or(defaults.vocabulary),
            features: self.features.unwrap_or(defaults.features),
            common_words: self.common_words.unwrap_or(defaults.common_words),
            common_lemmas: self.common_lemmas.unwrap_or(defaults.common_lemmas),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print word-level and phoneme-level features of words
    Describe {
        #[arg(required = true)]
        words: Vec<String>,

        /// Print one JSON record per word instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Search the lexicon, printing one matching word per line
    Search(SearchArgs),

    /// Print the compact single-character transcription of words
    Transcribe {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Pattern such as '[TYPE="C"] [] [TYPE="V", HEIGHT=0.6..1.0]'
    #[arg(value_name = "PATTERN")]
    pattern: Option<String>,

    /// Alignment: STARTS_WITH, ENDS_WITH or CONTAINS
    #[arg(short, long, default_value = "CONTAINS")]
    mode: Mode,

    /// Word list: ALL, COMMON_WORDS or COMMON_LEMMAS
    #[arg(short, long, default_value = "ALL")]
    corpus: Corpus,

    /// Syllable count, N or MIN..MAX with MAX excluded
    #[arg(long, value_name = "N|MIN..MAX")]
    syllables: Option<CountFilter>,

    /// Letter count, N or MIN..MAX with MAX excluded
    #[arg(long, value_name = "N|MIN..MAX")]
    characters: Option<CountFilter>,

    /// Phone count, N or MIN..MAX with MAX excluded
    #[arg(long, value_name = "N|MIN..MAX")]
    phonemes: Option<CountFilter>,

    /// Require (true) or forbid (false) a diphthong
    #[arg(long, value_name = "BOOL")]
    diphthong: Option<bool>,

    /// JSON query document, used instead of the other query options
    #[arg(
        short,
        long,
        value_name = "FILE",
        conflicts_with_all = ["pattern", "syllables", "characters", "phonemes", "diphthong"]
    )]
    query: Option<PathBuf>,

    /// Scan the corpus on all cores
    #[arg(long)]
    parallel: bool,

    /// Print at most this many words
    #[arg(short, long)]
    limit: Option<usize>,
}

impl SearchArgs {
    fn to_query(&self) -> Result<Query> {
        if let Some(path) = &self.query {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read query {}", path.display()))?;
            return Query::from_json(&text)
                .with_context(|| format!("invalid query {}", path.display()));
        }

        let pattern = parse_pattern(self.pattern.as_deref().unwrap_or_default())?;
        Ok(Query {
            filter: WordFilter {
                syllables: self.syllables,
                characters: self.characters,
                phonemes: self.phonemes,
                contains_diphthong: self.diphthong,
            },
            pattern,
            mode: self.mode,
            corpus: self.corpus,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = cli.data.paths();
    debug!(?paths, "data files");

    let lexicon = Lexicon::load(&paths)
        .with_context(|| format!("failed to load lexicon from {}", paths.vocabulary.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Describe { words, json } => cmd_describe(&lexicon, &words, json, &mut out)?,
        Commands::Search(args) => cmd_search(&lexicon, &args, &mut out)?,
        Commands::Transcribe { words } => cmd_transcribe(&lexicon, &words, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn cmd_describe(lexicon: &Lexicon, words: &[String], json: bool, out: &mut impl Write) -> Result<()> {
    for (i, word) in words.iter().enumerate() {
        let description = lexicon.describe(word);
        if json {
            writeln!(out, "{}", serde_json::to_string(&description)?)?;
        } else {
            if i > 0 {
                writeln!(out)?;
            }
            write!(out, "{}", description)?;
        }
    }
    Ok(())
}

fn cmd_search(lexicon: &Lexicon, args: &SearchArgs, out: &mut impl Write) -> Result<()> {
    let query = args.to_query()?;
    let words = if args.parallel {
        par_search(lexicon, &query)?
    } else {
        search(lexicon, &query)?
    };

    for word in words.iter().take(args.limit.unwrap_or(usize::MAX)) {
        writeln!(out, "{}", word)?;
    }
    Ok(())
}

fn cmd_transcribe(lexicon: &Lexicon, words: &[String], out: &mut impl Write) -> Result<()> {
    for word in words {
        match lexicon.compact_transcription(word) {
            Some(compact) => writeln!(out, "{}\t{}", word, compact)?,
            None => writeln!(out, "{}\t-", word)?,
        }
    }
    Ok(())
}
