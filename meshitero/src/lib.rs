#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Meshitero
//!
//! Meshitero is a Naive Bayes document classifier over morpheme frequencies, with k-fold
//! cross-validation.
//!
//! ## Examples
//!
//! ```
//! use meshitero::{Category, Classifier, WhitespaceTokenizer};
//!
//! let good = Category::new("good", ["美味しい 食べ物", "最高 の 食事"]);
//! let poor = Category::new("poor", ["つらい", "疲れ た"]);
//! let mut classifier = Classifier::new(WhitespaceTokenizer, vec![good, poor]).unwrap();
//!
//! assert_eq!("good", classifier.classify("美味しい 食事").unwrap());
//!
//! let report = classifier.k_fold().unwrap();
//! for category in &report.categories {
//!     println!("{}", category);
//! }
//! ```
//!
//! Morphological analysis with a Vaporetto model requires **crate feature** `vaporetto`.
//! For more details, see [`Tokenizer`].

mod category;
mod classifier;
mod cross_validation;
mod tokenizer;

pub mod corpus;
pub mod errors;

pub use category::{split_ranges, Category, DEFAULT_K};
pub use classifier::Classifier;
pub use corpus::CorpusSpec;
pub use cross_validation::{CategoryAccuracy, Report};
pub use tokenizer::{parse_mecab_output, MecabTokenizer, Tokenizer, WhitespaceTokenizer};

#[cfg(feature = "vaporetto")]
pub use tokenizer::VaporettoTokenizer;
