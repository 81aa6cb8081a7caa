use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hmmalign::input::{parse_line, render_alignment};
use hmmalign::utils::open_model_file;
use hmmalign::{
    HmmModel, LexicalModel, TransitionModel, Vocabulary, DEFAULT_MIN_PROB, DEFAULT_PNULL,
};

/// Aligns every target word of decoder output to a source word or to null.
///
/// Reads `source ||| target [||| phrase-alignment]` lines from stdin and
/// writes each target token followed by `|i|`, its source position or -1.
#[derive(Parser, Debug)]
#[command(name = "hmmalign", version, about)]
struct Args {
    /// HMM jump weights per sentence length (GIZA++ format).
    hmm_file: PathBuf,

    /// Lexical translation probabilities.
    lex_file: PathBuf,

    /// Source vocabulary.
    source_vocab: PathBuf,

    /// Target vocabulary.
    target_vocab: PathBuf,

    /// Probability of moving to, or staying at, the null word.
    #[arg(long, default_value_t = DEFAULT_PNULL)]
    pnull: f64,

    /// Lexical entries with a probability not above this value are dropped.
    #[arg(long, default_value_t = DEFAULT_MIN_PROB)]
    min_prob: f64,

    /// Lowercases the input.
    #[arg(long)]
    lower: bool,

    /// Ignores phrase alignments given in the input.
    #[arg(long)]
    ignore_phrases: bool,

    /// Logs every sentence pair and its alignment.
    #[arg(long)]
    verbose: bool,

    /// Log level, overridden by `RUST_LOG`.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Default filter directive; `--verbose` needs at least `info`.
fn default_filter(log_level: &str, verbose: bool) -> String {
    if !verbose {
        return log_level.to_string();
    }
    match log_level.parse::<LevelFilter>() {
        Ok(level) if level >= LevelFilter::INFO => log_level.to_string(),
        Ok(_) => "info".to_string(),
        // a directive such as `hmmalign=debug`
        Err(_) => format!("info,{log_level}"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&args.log_level, args.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Loading models...");
    let transitions = TransitionModel::from_reader(open_model_file(&args.hmm_file)?)?;
    let lexicon = LexicalModel::from_reader(open_model_file(&args.lex_file)?, args.min_prob)?;
    let source_vocab = Vocabulary::from_reader(open_model_file(&args.source_vocab)?)?;
    let target_vocab = Vocabulary::from_reader(open_model_file(&args.target_vocab)?)?;
    let model = HmmModel::new(lexicon, transitions);
    tracing::info!(
        lexical_entries = model.lexicon().len(),
        lengths = model.transitions().lengths().len(),
        source_words = source_vocab.len(),
        target_words = target_vocab.len(),
        "models loaded"
    );

    let mut out = BufWriter::new(std::io::stdout().lock());
    for (i, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        if line.trim().is_empty() {
            writeln!(out)?;
            continue;
        }
        let pair = parse_line(&line)?;
        let phrase_alignment = if args.ignore_phrases {
            None
        } else {
            pair.phrase_alignment.as_deref()
        };

        let source = source_vocab.map_sentence(pair.source, args.lower);
        let target = target_vocab.map_sentence(pair.target, args.lower);
        if args.verbose {
            tracing::info!(lineno, src = pair.source, tgt = pair.target, ?phrase_alignment);
            tracing::info!(lineno, ?source, ?target, "mapped ids");
        }

        let alignment = model
            .align(&source, &target, args.pnull, phrase_alignment)
            .map_err(|e| {
                tracing::error!(lineno, "{e}");
                e
            })?;
        if args.verbose {
            tracing::info!(lineno, ?alignment);
        }
        writeln!(out, "{}", render_alignment(pair.target, &alignment)?)?;
    }
    out.flush()?;

    Ok(())
}
