#[cfg(feature = "vaporetto")]
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use meshitero::{corpus, CorpusSpec, MecabTokenizer, Tokenizer, WhitespaceTokenizer};

#[derive(Parser, Debug)]
#[command(
    name = "kfold",
    about = "A program to evaluate the accuracy of Meshitero with k-fold cross-validation."
)]
struct Args {
    /// A category and its corpus file with one document per line (e.g. good=corpus/good).
    /// Categories listed first win ties.
    #[arg(long = "category", value_name = "NAME=PATH", required = true)]
    categories: Vec<CorpusSpec>,

    /// The number of folds
    #[arg(long, default_value = "10")]
    k: usize,

    /// Analyze text with the external `mecab` command
    #[arg(long)]
    mecab: bool,

    /// An extra argument passed to `mecab` (e.g. --mecab-arg=-d --mecab-arg=/path/to/dic)
    #[arg(long, allow_hyphen_values = true)]
    mecab_arg: Vec<String>,

    /// The Vaporetto model file to use when analyzing text.
    /// Without a model or --mecab, documents must be segmented by whitespace.
    #[cfg(feature = "vaporetto")]
    #[arg(long, env = "MESHITERO_MODEL")]
    model: Option<PathBuf>,

    /// Do not normalize input strings before prediction.
    #[cfg(feature = "vaporetto")]
    #[arg(long)]
    no_norm: bool,
}

fn build_tokenizer(args: &Args) -> Result<Box<dyn Tokenizer>, Box<dyn std::error::Error>> {
    if args.mecab {
        eprintln!("Using mecab");
        let tokenizer = args
            .mecab_arg
            .iter()
            .fold(MecabTokenizer::new(), |t, arg| t.arg(arg));
        return Ok(Box::new(tokenizer));
    }
    #[cfg(feature = "vaporetto")]
    {
        if let Some(model) = &args.model {
            eprintln!("Loading model file...");
            let tokenizer =
                meshitero::VaporettoTokenizer::from_path(model)?.normalize(!args.no_norm);
            return Ok(Box::new(tokenizer));
        }
    }
    log::warn!("no analyzer specified; documents are split on whitespace");
    Ok(Box::new(WhitespaceTokenizer))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("MESHITERO_LOG", "warn"))
        .init();

    let args = Args::parse();

    let tokenizer = build_tokenizer(&args)?;

    eprintln!("Loading corpora...");
    let mut classifier = corpus::load_classifier(tokenizer, &args.categories, args.k)?;
    for category in classifier.categories() {
        eprintln!(
            "{}: # of documents: {}, # of morphemes: {}",
            category.name(),
            category.documents().len(),
            category.total_count(),
        );
    }

    eprintln!("Start cross-validation");
    let start = Instant::now();
    let report = classifier.k_fold_with_progress(|i, k| println!("{}/{}", i, k))?;
    print!("{}", report);
    eprintln!("Elapsed: {} [sec]", start.elapsed().as_secs_f64());

    Ok(())
}
