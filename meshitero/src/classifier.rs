use std::ops::Range;

use hashbrown::HashSet;

use crate::category::{Category, DEFAULT_K};
use crate::errors::{MeshiteroError, Result};
use crate::tokenizer::Tokenizer;

/// Naive Bayes classifier over morpheme frequencies.
///
/// Statistics of every category are recomputed in place whenever the categories are retrained,
/// and the prior probabilities are refreshed in the same call, so a classifier is always in a
/// consistent state when it is observed from outside.
pub struct Classifier<T> {
    tokenizer: T,
    pub(crate) categories: Vec<Category>,
    total_morpheme_count: usize,
    k: usize,
}

impl<T> Classifier<T>
where
    T: Tokenizer,
{
    /// Creates a new classifier with [`DEFAULT_K`] folds and trains it on all documents.
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - Tokenizer used for both training and classification.
    /// * `categories` - Categories in tie-break order.
    ///
    /// # Errors
    ///
    /// See [`Classifier::with_k()`].
    pub fn new(tokenizer: T, categories: Vec<Category>) -> Result<Self> {
        Self::with_k(tokenizer, categories, DEFAULT_K)
    }

    /// Creates a new classifier and trains it on all documents.
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - Tokenizer used for both training and classification.
    /// * `categories` - Categories in tie-break order.
    /// * `k` - Number of folds for cross-validation.
    ///
    /// # Errors
    ///
    /// An error variant will be returned when:
    ///
    /// * `categories` is empty, or contains duplicated names,
    /// * `k` is zero,
    /// * a category has no documents, or its documents produce no morphemes,
    /// * the tokenizer fails.
    pub fn with_k(tokenizer: T, mut categories: Vec<Category>, k: usize) -> Result<Self> {
        if categories.is_empty() {
            return Err(MeshiteroError::invalid_argument(
                "categories",
                "must contain at least one category",
            ));
        }
        if k == 0 {
            return Err(MeshiteroError::invalid_argument("k", "must be positive"));
        }
        {
            let mut names = HashSet::new();
            for category in &categories {
                if !names.insert(category.name()) {
                    return Err(MeshiteroError::invalid_argument(
                        "categories",
                        format!("duplicated name: {}", category.name()),
                    ));
                }
                if category.documents().is_empty() {
                    return Err(MeshiteroError::invalid_corpus(
                        category.name(),
                        "no documents",
                    ));
                }
            }
        }

        for category in &mut categories {
            category.partition(k);
        }
        let mut classifier = Self {
            tokenizer,
            categories,
            total_morpheme_count: 0,
            k,
        };
        classifier.retrain_all()?;

        for category in &classifier.categories {
            if category.total_count() == 0 {
                return Err(MeshiteroError::invalid_corpus(
                    category.name(),
                    "documents contain no morphemes",
                ));
            }
        }
        Ok(classifier)
    }

    /// Recomputes the total morpheme count and the prior probability of every category.
    pub fn refresh(&mut self) {
        self.total_morpheme_count = self.categories.iter().map(Category::total_count).sum();
        let total = self.total_morpheme_count as f64;
        for category in &mut self.categories {
            category.prior_probability = if self.total_morpheme_count == 0 {
                0.0
            } else {
                category.total_count() as f64 / total
            };
        }
    }

    /// Trains every category on all of its documents and refreshes the statistics.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and no category is changed.
    pub fn retrain_all(&mut self) -> Result<()> {
        self.resplit(|_| 0..0)
    }

    /// Holds out the fold at `fold_index` in every category, trains on the rest and refreshes
    /// the statistics.
    ///
    /// # Panics
    ///
    /// Panics if `fold_index` is not less than `k`.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and no category is changed.
    pub fn rotate(&mut self, fold_index: usize) -> Result<()> {
        self.resplit(|category| category.fold_range(fold_index))
    }

    // Every category is tokenized before any of them is updated.
    fn resplit<F>(&mut self, test_of: F) -> Result<()>
    where
        F: Fn(&Category) -> Range<usize>,
    {
        let mut splits = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let test = test_of(category);
            let morphemes = category.tokenize_split(test.clone(), &self.tokenizer)?;
            splits.push((test, morphemes));
        }
        for (category, (test, morphemes)) in self.categories.iter_mut().zip(splits) {
            category.set_split(test, morphemes);
        }
        self.refresh();
        Ok(())
    }

    /// Computes the natural logarithm of the unnormalized posterior of a category.
    ///
    /// Morphemes unseen in the category are given the probability `1 / total_morpheme_count`.
    /// A category without morphemes scores negative infinity.
    ///
    /// # Arguments
    ///
    /// * `morphemes` - Morphemes of the classified document.
    /// * `category` - A category of this classifier.
    pub fn log_score<S>(&self, morphemes: &[S], category: &Category) -> f64
    where
        S: AsRef<str>,
    {
        if category.total_count() == 0 || self.total_morpheme_count == 0 {
            return f64::NEG_INFINITY;
        }
        let category_total = category.total_count() as f64;
        let unseen = (self.total_morpheme_count as f64).recip().ln();
        let mut score = category.prior_probability().ln();
        for morpheme in morphemes {
            score += match category.frequency_table().get(morpheme.as_ref()) {
                Some(&count) => (count as f64 / category_total).ln(),
                None => unseen,
            };
        }
        score
    }

    /// Classifies pre-tokenized morphemes.
    ///
    /// # Returns
    ///
    /// The name of the category with the greatest score. Ties are won by the category that
    /// comes first.
    pub fn classify_morphemes<S>(&self, morphemes: &[S]) -> &str
    where
        S: AsRef<str>,
    {
        let mut best: Option<(&Category, f64)> = None;
        for category in &self.categories {
            let score = self.log_score(morphemes, category);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((category, score));
            }
        }
        // The constructor guarantees at least one category.
        best.map_or("", |(category, _)| category.name())
    }

    /// Classifies a document.
    ///
    /// # Returns
    ///
    /// The name of the category with the greatest score. Ties are won by the category that
    /// comes first.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned.
    pub fn classify(&self, document: &str) -> Result<&str> {
        let morphemes = self.tokenizer.tokenize(document)?;
        Ok(self.classify_morphemes(&morphemes))
    }

    /// Computes the score of every category for a document.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned.
    pub fn scores(&self, document: &str) -> Result<Vec<(&str, f64)>> {
        let morphemes = self.tokenizer.tokenize(document)?;
        Ok(self
            .categories
            .iter()
            .map(|category| (category.name(), self.log_score(&morphemes, category)))
            .collect())
    }

    /// Returns the categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the category with the given name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name() == name)
    }

    /// Returns the total number of morphemes over all categories.
    pub fn total_morpheme_count(&self) -> usize {
        self.total_morpheme_count
    }

    /// Returns the number of folds.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the tokenizer.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use crate::tokenizer::WhitespaceTokenizer;

    fn food_classifier() -> Classifier<WhitespaceTokenizer> {
        Classifier::new(
            WhitespaceTokenizer,
            vec![
                Category::new("good", ["美味しい 食べ物", "最高 の 食事"]),
                Category::new("poor", ["つらい", "疲れ た"]),
            ],
        )
        .unwrap()
    }

    fn prior_sum<T: Tokenizer>(classifier: &Classifier<T>) -> f64 {
        classifier
            .categories()
            .iter()
            .map(Category::prior_probability)
            .sum()
    }

    #[test]
    fn test_classify_good() {
        let classifier = food_classifier();
        assert_eq!("good", classifier.classify("美味しい 食事").unwrap());
    }

    #[test]
    fn test_classify_poor() {
        let classifier = food_classifier();
        assert_eq!("poor", classifier.classify("疲れ た").unwrap());
    }

    #[test]
    fn test_classify_deterministic() {
        let classifier = food_classifier();
        let first = classifier.classify("最高 に 疲れ た 食事").unwrap().to_string();
        for _ in 0..5 {
            assert_eq!(first, classifier.classify("最高 に 疲れ た 食事").unwrap());
        }
    }

    #[test]
    fn test_statistics() {
        let classifier = food_classifier();
        assert_eq!(8, classifier.total_morpheme_count());
        assert_eq!(10, classifier.k());

        let good = classifier.category("good").unwrap();
        assert_eq!(5, good.total_count());
        assert!((good.prior_probability() - 5.0 / 8.0).abs() < 1e-12);
        assert!((prior_sum(&classifier) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_score_value() {
        let classifier = food_classifier();
        let good = classifier.category("good").unwrap();
        let poor = classifier.category("poor").unwrap();

        let score = classifier.log_score(&["美味しい", "食事"], good);
        assert!((score - (5.0f64 / 8.0 * 1.0 / 5.0 * 1.0 / 5.0).ln()).abs() < 1e-12);

        let score = classifier.log_score(&["美味しい", "食事"], poor);
        assert!((score - (3.0f64 / 8.0 * 1.0 / 8.0 * 1.0 / 8.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_score_finite_non_positive() {
        let classifier = food_classifier();
        let documents = ["美味しい", "未知 の 単語", "つらい つらい つらい", ""];
        for document in documents {
            let morphemes = classifier.tokenizer().tokenize(document).unwrap();
            for category in classifier.categories() {
                let score = classifier.log_score(&morphemes, category);
                assert!(score.is_finite());
                assert!(score <= 0.0);
            }
        }
    }

    #[test]
    fn test_refresh_idempotent() {
        let mut classifier = food_classifier();
        classifier.rotate(0).unwrap();
        let priors: Vec<f64> = classifier
            .categories()
            .iter()
            .map(Category::prior_probability)
            .collect();
        classifier.refresh();
        classifier.refresh();
        let refreshed: Vec<f64> = classifier
            .categories()
            .iter()
            .map(Category::prior_probability)
            .collect();
        assert_eq!(priors, refreshed);
    }

    #[test]
    fn test_prior_sum_after_rotation() {
        let documents: Vec<String> = (0..13).map(|i| format!("w{} 共通", i)).collect();
        let mut classifier = Classifier::with_k(
            WhitespaceTokenizer,
            vec![
                Category::new("a", documents.clone()),
                Category::new("b", documents[..7].to_vec()),
            ],
            4,
        )
        .unwrap();
        for i in 0..4 {
            classifier.rotate(i).unwrap();
            assert!((prior_sum(&classifier) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tie_resolves_to_first() {
        let classifier = Classifier::new(
            WhitespaceTokenizer,
            vec![
                Category::new("first", ["x y"]),
                Category::new("second", ["x y"]),
            ],
        )
        .unwrap();
        assert_eq!("first", classifier.classify("x").unwrap());
        assert_eq!("first", classifier.classify("z").unwrap());
    }

    #[test]
    fn test_empty_category_never_selected() {
        let mut classifier = Classifier::new(
            WhitespaceTokenizer,
            vec![
                Category::new("single", ["美味しい"]),
                Category::new("other", ["つらい", "疲れ た"]),
            ],
        )
        .unwrap();
        classifier.rotate(0).unwrap();

        let single = classifier.category("single").unwrap();
        assert_eq!(0, single.total_count());
        assert_eq!(f64::NEG_INFINITY, classifier.log_score(&["美味しい"], single));
        assert_eq!("other", classifier.classify("美味しい").unwrap());
    }

    #[test]
    fn test_scores() {
        let classifier = food_classifier();
        let scores = classifier.scores("美味しい 食事").unwrap();
        assert_eq!(2, scores.len());
        assert_eq!("good", scores[0].0);
        assert_eq!("poor", scores[1].0);
        assert!(scores[0].1 > scores[1].1);
    }

    #[test]
    fn test_no_categories() {
        let result = Classifier::new(WhitespaceTokenizer, vec![]);
        assert!(matches!(result, Err(MeshiteroError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_k() {
        let result = Classifier::with_k(WhitespaceTokenizer, vec![Category::new("a", ["x"])], 0);
        assert!(matches!(result, Err(MeshiteroError::InvalidArgument(_))));
    }

    #[test]
    fn test_duplicated_names() {
        let result = Classifier::new(
            WhitespaceTokenizer,
            vec![Category::new("a", ["x"]), Category::new("a", ["y"])],
        );
        assert!(matches!(result, Err(MeshiteroError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_document_category() {
        let result = Classifier::new(
            WhitespaceTokenizer,
            vec![Category::new("a", ["x"]), Category::new("b", Vec::<String>::new())],
        );
        assert_eq!(
            "InvalidCorpusError: b: no documents",
            result.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_zero_morpheme_category() {
        let result = Classifier::new(
            WhitespaceTokenizer,
            vec![Category::new("a", ["x"]), Category::new("b", ["", "  "])],
        );
        assert!(matches!(result, Err(MeshiteroError::InvalidCorpus(_))));
    }

    struct FailingOnce {
        target: &'static str,
        armed: Cell<bool>,
    }

    impl Tokenizer for FailingOnce {
        fn tokenize(&self, text: &str) -> Result<Vec<String>> {
            if self.armed.get() && text == self.target {
                self.armed.set(false);
                return Err(MeshiteroError::tokenizer("temporary failure"));
            }
            WhitespaceTokenizer.tokenize(text)
        }
    }

    #[test]
    fn test_rotate_failure_keeps_statistics() {
        let tokenizer = FailingOnce {
            target: "q",
            armed: Cell::new(false),
        };
        let mut classifier = Classifier::with_k(
            tokenizer,
            vec![
                Category::new("a", ["x y z", "w"]),
                Category::new("b", ["p", "q"]),
            ],
            2,
        )
        .unwrap();

        classifier.tokenizer().armed.set(true);
        assert!(classifier.rotate(0).is_err());

        let sum: usize = classifier.categories().iter().map(Category::total_count).sum();
        assert_eq!(6, classifier.total_morpheme_count());
        assert_eq!(sum, classifier.total_morpheme_count());
        assert!((prior_sum(&classifier) - 1.0).abs() < 1e-12);
        assert!(classifier.categories().iter().all(|c| c.test().is_empty()));

        classifier.rotate(0).unwrap();
        assert_eq!(2, classifier.total_morpheme_count());
        assert_eq!(vec!["p".to_string()], classifier.category("b").unwrap().test());
    }
}
