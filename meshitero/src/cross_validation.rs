use std::fmt;

use crate::classifier::Classifier;
use crate::errors::Result;
use crate::tokenizer::Tokenizer;

/// Accuracy of one category accumulated over the folds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryAccuracy {
    /// Name of the category.
    pub name: String,

    /// Number of held-out documents classified into their own category.
    pub accurate_count: usize,

    /// Number of held-out documents.
    pub tested_count: usize,
}

impl CategoryAccuracy {
    /// Returns the accuracy in percent rounded to two decimal places, or `None` if nothing was
    /// tested.
    pub fn accuracy(&self) -> Option<f64> {
        if self.tested_count == 0 {
            return None;
        }
        let percent = self.accurate_count as f64 / self.tested_count as f64 * 100.0;
        // Formatting rounds the exact binary value half to even.
        format!("{:.2}", percent).parse().ok()
    }
}

impl fmt::Display for CategoryAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} ",
            self.name, self.accurate_count, self.tested_count
        )?;
        match self.accuracy() {
            // `{:?}` keeps a trailing `.0` on whole percentages, e.g. `100.0%`.
            Some(accuracy) => write!(f, "({:?}%)", accuracy),
            None => write!(f, "(n/a)"),
        }
    }
}

/// Result of k-fold cross-validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Number of folds.
    pub k: usize,

    /// Accuracy per category, in the order of the classifier's categories.
    pub categories: Vec<CategoryAccuracy>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for category in &self.categories {
            writeln!(f, "{}", category)?;
        }
        Ok(())
    }
}

impl<T> Classifier<T>
where
    T: Tokenizer,
{
    /// Runs one fold of cross-validation.
    ///
    /// Every category holds out its fold at `fold_index`, the classifier is retrained on the
    /// remaining documents, and the held-out documents are classified. The results are added to
    /// the accuracy counters of each category.
    ///
    /// # Panics
    ///
    /// Panics if `fold_index` is not less than `k`.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned.
    pub fn verify(&mut self, fold_index: usize) -> Result<()> {
        self.rotate(fold_index)?;

        let mut results = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let mut accurate_count = 0;
            for document in category.test() {
                if self.classify(document)? == category.name() {
                    accurate_count += 1;
                }
            }
            results.push((accurate_count, category.test().len()));
        }

        for (category, (accurate_count, tested_count)) in self.categories.iter_mut().zip(results) {
            log::debug!(
                "fold {}: {}: {}/{}",
                fold_index,
                category.name(),
                accurate_count,
                tested_count,
            );
            category.accurate_count += accurate_count;
            category.tested_count += tested_count;
        }
        Ok(())
    }

    /// Runs k-fold cross-validation.
    ///
    /// The accuracy counters are reset first, so repeated runs give the same report. When the
    /// run finishes, the classifier is trained on all documents again.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and the run is aborted.
    pub fn k_fold(&mut self) -> Result<Report> {
        self.k_fold_with_progress(|_, _| {})
    }

    /// Runs k-fold cross-validation, reporting progress.
    ///
    /// # Arguments
    ///
    /// * `progress` - Called with `(i, k)` before the `i`-th fold and with `(k, k)` after the
    ///   last one.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned and the run is aborted. The
    /// classifier is then trained on all documents again if the tokenizer allows it.
    pub fn k_fold_with_progress<F>(&mut self, mut progress: F) -> Result<Report>
    where
        F: FnMut(usize, usize),
    {
        for category in &mut self.categories {
            category.accurate_count = 0;
            category.tested_count = 0;
        }

        let k = self.k();
        for i in 0..k {
            progress(i, k);
            log::info!("cross-validation fold {}/{}", i + 1, k);
            if let Err(e) = self.verify(i) {
                if let Err(retrain_error) = self.retrain_all() {
                    log::warn!("failed to restore full training: {}", retrain_error);
                }
                return Err(e);
            }
        }
        progress(k, k);

        let report = Report {
            k,
            categories: self
                .categories
                .iter()
                .map(|category| CategoryAccuracy {
                    name: category.name().to_string(),
                    accurate_count: category.accurate_count(),
                    tested_count: category.tested_count(),
                })
                .collect(),
        };

        self.retrain_all()?;
        Ok(report)
    }
}
