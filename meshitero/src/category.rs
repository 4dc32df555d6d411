use std::ops::Range;

use hashbrown::HashMap;

use crate::errors::Result;
use crate::tokenizer::Tokenizer;

/// Default number of folds.
pub const DEFAULT_K: usize = 10;

/// Splits `n` items into `k` contiguous groups whose sizes differ by at most one.
///
/// The first `n % k` groups receive one extra item, the same layout as numpy's `array_split`.
/// When `n < k`, the trailing groups are empty.
///
/// # Panics
///
/// Panics if `k` is zero.
///
/// # Examples
///
/// ```
/// use meshitero::split_ranges;
///
/// assert_eq!(vec![0..3, 3..6, 6..8, 8..10], split_ranges(10, 4));
/// assert_eq!(vec![0..1, 1..1, 1..1], split_ranges(1, 3));
/// ```
pub fn split_ranges(n: usize, k: usize) -> Vec<Range<usize>> {
    assert!(k != 0, "the number of folds must be positive");
    let size = n / k;
    let extra = n % k;
    let mut ranges = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let end = start + size + usize::from(i < extra);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Labeled bucket of training documents with its morpheme statistics.
#[derive(Clone, Debug)]
pub struct Category {
    name: String,
    documents: Vec<String>,
    folds: Vec<Range<usize>>,
    test: Range<usize>,

    morphemes: Vec<String>,
    frequency_table: HashMap<String, usize>,
    pub(crate) prior_probability: f64,

    pub(crate) accurate_count: usize,
    pub(crate) tested_count: usize,
}

impl Category {
    /// Creates a new category partitioned into [`DEFAULT_K`] folds.
    ///
    /// The category holds no statistics until it is trained with [`Category::retrain()`] or
    /// passed to a [`Classifier`](crate::Classifier).
    ///
    /// # Arguments
    ///
    /// * `name` - Label of the category.
    /// * `documents` - Documents belonging to the label.
    pub fn new<S, I, D>(name: S, documents: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let documents: Vec<String> = documents.into_iter().map(Into::into).collect();
        let folds = split_ranges(documents.len(), DEFAULT_K);
        Self {
            name: name.into(),
            documents,
            folds,
            test: 0..0,
            morphemes: vec![],
            frequency_table: HashMap::new(),
            prior_probability: 0.0,
            accurate_count: 0,
            tested_count: 0,
        }
    }

    /// Re-partitions the documents into `k` folds and clears the held-out split.
    ///
    /// # Panics
    ///
    /// Panics if `k` is zero.
    pub fn partition(&mut self, k: usize) {
        self.folds = split_ranges(self.documents.len(), k);
        self.test = 0..0;
    }

    /// Tokenizes the given documents and replaces the morpheme statistics with theirs.
    ///
    /// The prior probability is left untouched; it depends on every category and is updated by
    /// [`Classifier::refresh()`](crate::Classifier::refresh).
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and the statistics are kept.
    pub fn retrain<T, I, D>(&mut self, documents: I, tokenizer: &T) -> Result<()>
    where
        T: Tokenizer + ?Sized,
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let documents: Vec<D> = documents.into_iter().collect();
        let documents: Vec<&str> = documents.iter().map(AsRef::as_ref).collect();
        let morphemes = tokenizer.tokenize_documents(&documents)?;
        self.set_morphemes(documents.len(), morphemes);
        Ok(())
    }

    /// Trains on every document and clears the held-out split.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and the category is left
    /// unchanged.
    pub fn retrain_all<T>(&mut self, tokenizer: &T) -> Result<()>
    where
        T: Tokenizer + ?Sized,
    {
        let morphemes = self.tokenize_split(0..0, tokenizer)?;
        self.set_split(0..0, morphemes);
        Ok(())
    }

    /// Holds out the fold at `test_index` and trains on the remaining folds.
    ///
    /// # Panics
    ///
    /// Panics if `test_index` is not less than the number of folds.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and the category is left
    /// unchanged.
    pub fn fold<T>(&mut self, test_index: usize, tokenizer: &T) -> Result<()>
    where
        T: Tokenizer + ?Sized,
    {
        let test = self.fold_range(test_index);
        let morphemes = self.tokenize_split(test.clone(), tokenizer)?;
        self.set_split(test, morphemes);
        Ok(())
    }

    pub(crate) fn fold_range(&self, test_index: usize) -> Range<usize> {
        assert!(
            test_index < self.folds.len(),
            "fold index {} out of range for {} folds",
            test_index,
            self.folds.len(),
        );
        self.folds[test_index].clone()
    }

    /// Tokenizes the documents outside of `test` without touching the statistics.
    pub(crate) fn tokenize_split<T>(&self, test: Range<usize>, tokenizer: &T) -> Result<Vec<String>>
    where
        T: Tokenizer + ?Sized,
    {
        let train: Vec<&str> = self.documents[..test.start]
            .iter()
            .chain(&self.documents[test.end..])
            .map(String::as_str)
            .collect();
        if train.is_empty() {
            log::warn!("{}: no training documents", self.name);
        }
        tokenizer.tokenize_documents(&train)
    }

    /// Replaces the held-out split and the statistics at once.
    pub(crate) fn set_split(&mut self, test: Range<usize>, morphemes: Vec<String>) {
        let n_documents = self.documents.len() - test.len();
        self.test = test;
        self.set_morphemes(n_documents, morphemes);
    }

    fn set_morphemes(&mut self, n_documents: usize, morphemes: Vec<String>) {
        let mut frequency_table = HashMap::new();
        for morpheme in &morphemes {
            *frequency_table.entry_ref(morpheme.as_str()).or_insert(0) += 1;
        }
        self.frequency_table = frequency_table;
        self.morphemes = morphemes;
        log::debug!(
            "{}: trained on {} documents, {} morphemes, {} distinct",
            self.name,
            n_documents,
            self.morphemes.len(),
            self.frequency_table.len(),
        );
    }

    /// Returns the label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all documents.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Returns the document ranges of the folds.
    pub fn folds(&self) -> &[Range<usize>] {
        &self.folds
    }

    /// Returns the documents of the current training split.
    pub fn train(&self) -> impl Iterator<Item = &String> + '_ {
        self.documents[..self.test.start]
            .iter()
            .chain(&self.documents[self.test.end..])
    }

    /// Returns the documents of the current held-out split.
    pub fn test(&self) -> &[String] {
        &self.documents[self.test.clone()]
    }

    /// Returns the morphemes of the training documents.
    pub fn morphemes(&self) -> &[String] {
        &self.morphemes
    }

    /// Returns the occurrence count of each morpheme.
    pub fn frequency_table(&self) -> &HashMap<String, usize> {
        &self.frequency_table
    }

    /// Returns the occurrence count of a morpheme.
    pub fn frequency(&self, morpheme: &str) -> usize {
        self.frequency_table.get(morpheme).copied().unwrap_or(0)
    }

    /// Returns the number of morphemes.
    pub fn total_count(&self) -> usize {
        self.morphemes.len()
    }

    /// Returns the prior probability computed by the last refresh.
    pub fn prior_probability(&self) -> f64 {
        self.prior_probability
    }

    /// Returns the number of held-out documents classified into this category.
    pub fn accurate_count(&self) -> usize {
        self.accurate_count
    }

    /// Returns the number of held-out documents evaluated.
    pub fn tested_count(&self) -> usize {
        self.tested_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tokenizer::WhitespaceTokenizer;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("d{}", i)).collect()
    }

    #[test]
    fn test_split_ranges_even() {
        assert_eq!(vec![0..2, 2..4, 4..6], split_ranges(6, 3));
    }

    #[test]
    fn test_split_ranges_uneven() {
        let ranges = split_ranges(23, 10);
        let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
        assert_eq!(vec![3, 3, 3, 2, 2, 2, 2, 2, 2, 2], sizes);
        assert_eq!(0, ranges[0].start);
        assert_eq!(23, ranges[9].end);
    }

    #[test]
    fn test_split_ranges_fewer_items() {
        let ranges = split_ranges(1, 10);
        assert_eq!(10, ranges.len());
        assert_eq!(0..1, ranges[0]);
        assert!(ranges[1..].iter().all(|r| r.is_empty()));
    }

    #[test]
    #[should_panic]
    fn test_split_ranges_zero_folds() {
        split_ranges(5, 0);
    }

    #[test]
    fn test_retrain() {
        let mut category = Category::new("good", ["美味しい 食べ物", "美味しい 食事"]);
        category
            .retrain(category.documents().to_vec(), &WhitespaceTokenizer)
            .unwrap();

        assert_eq!(4, category.total_count());
        assert_eq!(2, category.frequency("美味しい"));
        assert_eq!(1, category.frequency("食事"));
        assert_eq!(0, category.frequency("つらい"));
        assert_eq!(3, category.frequency_table().len());
        assert_eq!(
            category.total_count(),
            category.frequency_table().values().sum::<usize>()
        );
    }

    #[test]
    fn test_retrain_empty() {
        let mut category = Category::new("good", ["美味しい"]);
        category.retrain_all(&WhitespaceTokenizer).unwrap();
        category
            .retrain(Vec::<String>::new(), &WhitespaceTokenizer)
            .unwrap();

        assert_eq!(0, category.total_count());
        assert!(category.morphemes().is_empty());
        assert!(category.frequency_table().is_empty());
    }

    #[test]
    fn test_fold_partitions_documents() {
        let documents = numbered(23);
        let mut category = Category::new("c", documents.clone());
        for i in 0..DEFAULT_K {
            category.fold(i, &WhitespaceTokenizer).unwrap();

            let test = category.test().to_vec();
            let train: Vec<String> = category.train().cloned().collect();
            assert!(test.iter().all(|d| !train.contains(d)));
            assert_eq!(documents.len(), train.len() + test.len());
            assert!(test.len().abs_diff(documents.len() / DEFAULT_K) <= 1);

            let mut merged = train.clone();
            merged.extend(test);
            merged.sort();
            let mut expected = documents.clone();
            expected.sort();
            assert_eq!(expected, merged);

            assert_eq!(train, category.morphemes());
        }
    }

    #[test]
    fn test_fold_keeps_order() {
        let mut category = Category::new("c", numbered(5));
        category.partition(5);
        category.fold(2, &WhitespaceTokenizer).unwrap();

        assert_eq!(vec!["d2".to_string()], category.test());
        assert_eq!(vec!["d0", "d1", "d3", "d4"], category.morphemes());
    }

    #[test]
    fn test_fold_single_document() {
        let mut category = Category::new("good", ["美味しい 食事"]);
        category.fold(0, &WhitespaceTokenizer).unwrap();
        assert_eq!(1, category.test().len());
        assert_eq!(0, category.total_count());

        category.fold(9, &WhitespaceTokenizer).unwrap();
        assert!(category.test().is_empty());
        assert_eq!(2, category.total_count());
    }

    #[test]
    #[should_panic(expected = "fold index 10 out of range")]
    fn test_fold_out_of_range() {
        let mut category = Category::new("c", numbered(20));
        category.fold(10, &WhitespaceTokenizer).unwrap();
    }

    #[test]
    fn test_retrain_all_clears_test() {
        let mut category = Category::new("c", numbered(20));
        category.fold(3, &WhitespaceTokenizer).unwrap();
        assert_eq!(18, category.total_count());

        category.retrain_all(&WhitespaceTokenizer).unwrap();
        assert!(category.test().is_empty());
        assert_eq!(20, category.train().count());
        assert_eq!(20, category.total_count());
    }

    struct RejectingTokenizer;

    impl Tokenizer for RejectingTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<String>> {
            if text == "d0" {
                return Err(crate::errors::MeshiteroError::tokenizer("rejected"));
            }
            WhitespaceTokenizer.tokenize(text)
        }
    }

    #[test]
    fn test_fold_failure_keeps_split() {
        let mut category = Category::new("c", numbered(20));
        category.fold(0, &WhitespaceTokenizer).unwrap();
        assert_eq!(vec!["d0".to_string(), "d1".to_string()], category.test());

        assert!(category.fold(1, &RejectingTokenizer).is_err());
        assert_eq!(vec!["d0".to_string(), "d1".to_string()], category.test());
        assert_eq!(18, category.total_count());
        assert_eq!(0, category.frequency("d0"));
        assert_eq!(1, category.frequency("d2"));

        assert!(category.retrain_all(&RejectingTokenizer).is_err());
        assert_eq!(2, category.test().len());
        assert_eq!(18, category.total_count());
    }
}
