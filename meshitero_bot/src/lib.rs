//! # meshitero_bot
//!
//! Screening of posts for a food-photo bot: a post qualifies when it mentions a known food, the
//! classifier labels it positive, and it is recent. Qualifying posts get a generated reply.
//!
//! ## Examples
//!
//! ```
//! use meshitero::{Category, Classifier, WhitespaceTokenizer};
//! use meshitero_bot::Screener;
//! use meshitero_rules::FoodMatcher;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let classifier = Classifier::new(
//!     WhitespaceTokenizer,
//!     vec![
//!         Category::new("good", ["美味しい ラーメン", "最高 の 食事"]),
//!         Category::new("poor", ["つらい", "疲れ た"]),
//!     ],
//! )
//! .unwrap();
//! let foods = FoodMatcher::new(["ラーメン"]).unwrap();
//! let screener = Screener::new(classifier, foods, vec!["お腹が空きました。".to_string()]);
//!
//! let text = "美味しい らーめん";
//! assert!(screener.judge_text(text).unwrap());
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! assert_eq!(
//!     Some("ラーメン美味しそうですね。\nお腹が空きました。".to_string()),
//!     screener.compose_reply(text, &mut rng),
//! );
//! ```

mod post;
mod query;
mod screener;

pub use post::{Post, QUOTE_HEADER};
pub use query::{search_query, HASHTAG};
pub use screener::{Screener, DEFAULT_POSITIVE_LABEL, DEFAULT_RECENT_HOURS, REPLY_SUFFIX};
