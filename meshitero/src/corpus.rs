//! Loading of line-delimited corpora.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::category::Category;
use crate::classifier::Classifier;
use crate::errors::{MeshiteroError, Result};
use crate::tokenizer::Tokenizer;

/// A category name paired with the file holding its documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusSpec {
    /// Name of the category.
    pub name: String,

    /// Path to a file with one document per line.
    pub path: PathBuf,
}

impl CorpusSpec {
    /// Creates a new spec.
    pub fn new<S, P>(name: S, path: P) -> Self
    where
        S: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Reads the file into a category.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, an error variant will be returned.
    pub fn load(&self) -> Result<Category> {
        load_category(&self.name, &self.path)
    }
}

impl FromStr for CorpusSpec {
    type Err = MeshiteroError;

    /// Parses `name=path`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((name, path)) if !name.is_empty() && !path.is_empty() => {
                Ok(Self::new(name, path))
            }
            _ => Err(MeshiteroError::invalid_argument(
                "corpus",
                format!("expected NAME=PATH, got {:?}", s),
            )),
        }
    }
}

/// Reads documents, one per line.
///
/// Lines are taken verbatim except for the line terminator; empty lines are kept as empty
/// documents.
pub fn read_documents<R>(rdr: R) -> Result<Vec<String>>
where
    R: BufRead,
{
    let mut documents = vec![];
    for line in rdr.lines() {
        documents.push(line?);
    }
    Ok(documents)
}

/// Reads a category from a file with one document per line.
///
/// # Errors
///
/// If the file cannot be read, an error variant will be returned.
pub fn load_category<S, P>(name: S, path: P) -> Result<Category>
where
    S: Into<String>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let name = name.into();
    log::info!("Loading {:?} as {} ...", path, name);
    let documents = read_documents(BufReader::new(File::open(path)?))?;
    log::info!("# of documents: {}", documents.len());
    Ok(Category::new(name, documents))
}

/// Loads every corpus and builds a trained classifier.
///
/// # Arguments
///
/// * `tokenizer` - Tokenizer used by the classifier.
/// * `specs` - Corpora in tie-break order.
/// * `k` - Number of folds for cross-validation.
///
/// # Errors
///
/// If a file cannot be read or the classifier rejects the corpora, an error variant will be
/// returned.
pub fn load_classifier<T>(tokenizer: T, specs: &[CorpusSpec], k: usize) -> Result<Classifier<T>>
where
    T: Tokenizer,
{
    let categories = specs
        .iter()
        .map(CorpusSpec::load)
        .collect::<Result<Vec<_>>>()?;
    Classifier::with_k(tokenizer, categories, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::tokenizer::WhitespaceTokenizer;

    fn corpus_file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_read_documents() {
        let documents = read_documents("美味しい 食べ物\r\n\n最高 の 食事".as_bytes()).unwrap();
        assert_eq!(vec!["美味しい 食べ物", "", "最高 の 食事"], documents);
    }

    #[test]
    fn test_corpus_spec_from_str() {
        let spec: CorpusSpec = "good=data/good.txt".parse().unwrap();
        assert_eq!(CorpusSpec::new("good", "data/good.txt"), spec);

        let spec: CorpusSpec = "poor=a=b".parse().unwrap();
        assert_eq!(CorpusSpec::new("poor", "a=b"), spec);
    }

    #[test]
    fn test_corpus_spec_from_str_invalid() {
        assert!("good".parse::<CorpusSpec>().is_err());
        assert!("=path".parse::<CorpusSpec>().is_err());
        assert!("good=".parse::<CorpusSpec>().is_err());
    }

    #[test]
    fn test_load_category() {
        let f = corpus_file("美味しい 食べ物\n最高 の 食事\n");
        let category = load_category("good", f.path()).unwrap();
        assert_eq!("good", category.name());
        assert_eq!(2, category.documents().len());
    }

    #[test]
    fn test_load_category_missing() {
        let result = load_category("good", "/nonexistent/meshitero/good");
        assert!(matches!(result, Err(MeshiteroError::IOError(_))));
    }

    #[test]
    fn test_load_classifier() {
        let good = corpus_file("美味しい 食べ物\n最高 の 食事\n");
        let poor = corpus_file("つらい\n疲れ た\n");
        let specs = vec![
            CorpusSpec::new("good", good.path()),
            CorpusSpec::new("poor", poor.path()),
        ];
        let classifier = load_classifier(WhitespaceTokenizer, &specs, 10).unwrap();
        assert_eq!("good", classifier.classify("美味しい 食事").unwrap());
    }

    #[test]
    fn test_load_classifier_empty_corpus() {
        let good = corpus_file("美味しい 食べ物\n");
        let poor = corpus_file("");
        let specs = vec![
            CorpusSpec::new("good", good.path()),
            CorpusSpec::new("poor", poor.path()),
        ];
        let result = load_classifier(WhitespaceTokenizer, &specs, 10);
        assert!(matches!(result, Err(MeshiteroError::InvalidCorpus(_))));
    }
}
