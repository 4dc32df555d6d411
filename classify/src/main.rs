use std::collections::BTreeMap;
use std::fs::File;
use std::io::{prelude::*, stdin, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use meshitero::{corpus, CorpusSpec, MecabTokenizer, Tokenizer, WhitespaceTokenizer};
use meshitero_bot::Screener;
use meshitero_rules::FoodMatcher;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(
    name = "classify",
    about = "A program to label each line of the standard input with Meshitero."
)]
struct Args {
    /// A category and its corpus file with one document per line (e.g. good=corpus/good).
    /// Categories listed first win ties.
    #[arg(long = "category", value_name = "NAME=PATH", required = true)]
    categories: Vec<CorpusSpec>,

    /// Analyze text with the external `mecab` command
    #[arg(long)]
    mecab: bool,

    /// An extra argument passed to `mecab` (e.g. --mecab-arg=-d --mecab-arg=/path/to/dic)
    #[arg(long, allow_hyphen_values = true)]
    mecab_arg: Vec<String>,

    /// The Vaporetto model file to use when analyzing text.
    /// Without a model or --mecab, input must be segmented by whitespace.
    #[cfg(feature = "vaporetto")]
    #[arg(long, env = "MESHITERO_MODEL")]
    model: Option<PathBuf>,

    /// Do not normalize input strings before prediction.
    #[cfg(feature = "vaporetto")]
    #[arg(long)]
    no_norm: bool,

    /// A file listing food names, one per line. Enables reply composition.
    #[arg(long, requires = "comments")]
    foods: Option<PathBuf>,

    /// A file listing reply comments, one per line
    #[arg(long, requires = "foods")]
    comments: Option<PathBuf>,

    /// The label of the category that marks a line as positive
    #[arg(long, default_value = meshitero_bot::DEFAULT_POSITIVE_LABEL)]
    positive_label: String,

    /// The seed of the random generator choosing foods and comments
    #[arg(long)]
    seed: Option<u64>,
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
    log::warn!("no analyzer specified; input is split on whitespace");
    Ok(Box::new(WhitespaceTokenizer))
}

fn read_list(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    eprintln!("Loading {:?} ...", path);
    let f = BufReader::new(File::open(path)?);
    Ok(corpus::read_documents(f)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("MESHITERO_LOG", "warn"))
        .init();

    let args = Args::parse();

    let tokenizer = build_tokenizer(&args)?;

    eprintln!("Loading corpora...");
    let classifier = corpus::load_classifier(tokenizer, &args.categories, meshitero::DEFAULT_K)?;
    if classifier.category(&args.positive_label).is_none() {
        log::warn!("no category is named {}", args.positive_label);
    }

    let compose = args.foods.is_some();
    let foods = match &args.foods {
        Some(path) => read_list(path)?,
        None => vec![],
    };
    let comments = match &args.comments {
        Some(path) => read_list(path)?,
        None => vec![],
    };
    let screener = Screener::new(classifier, FoodMatcher::new(foods)?, comments)
        .positive_label(args.positive_label.as_str());
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    eprintln!("Start classification");
    let mut n_labels = BTreeMap::new();
    let mut n_replies = 0;
    let start = Instant::now();
    for line in stdin().lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let label = screener.classifier().classify(&line)?;
        *n_labels.entry(label.to_string()).or_insert(0) += 1;
        if !compose {
            println!("{}\t{}", label, line);
            continue;
        }
        let reply = if label == args.positive_label {
            screener.compose_reply(&line, &mut rng)
        } else {
            None
        };
        match reply {
            Some(reply) => {
                n_replies += 1;
                println!("{}\t{}\t{}", label, line, reply.replace('\n', "\\n"));
            }
            None => println!("{}\t{}\t", label, line),
        }
    }
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    for (label, n) in &n_labels {
        eprintln!("{}: {}", label, n);
    }
    if compose {
        eprintln!("# of replies: {}", n_replies);
    }

    Ok(())
}
