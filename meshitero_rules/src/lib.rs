//! Rule base filters for Meshitero.
//!
//! ## Examples
//!
//! ```
//! use meshitero_rules::{string_filters::HiraganaFilter, FoodMatcher, StringFilter};
//!
//! let filter = HiraganaFilter;
//! assert_eq!("らーめん", filter.filter("ラーメン"));
//!
//! let matcher = FoodMatcher::new(["ラーメン", "寿司"]).unwrap();
//! assert_eq!(vec!["ラーメン"], matcher.find("今日のらーめん最高"));
//! ```

mod food_matcher;

pub mod string_filters;

pub use food_matcher::{FoodMatcher, FoodMatcherError};

/// Filter that converts a string into another string.
pub trait StringFilter<S>
where
    S: AsRef<str>,
{
    /// Filters the specified string.
    ///
    /// # Arguments:
    ///
    /// * `string` - Input string.
    ///
    /// # Returns
    ///
    /// A processed string.
    fn filter(&self, string: S) -> String;
}
