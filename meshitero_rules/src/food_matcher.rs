use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use daachorse::DoubleArrayAhoCorasick;

use crate::string_filters::HiraganaFilter;
use crate::StringFilter;

/// Error used when the pattern automaton cannot be built.
#[derive(Debug)]
pub struct FoodMatcherError {
    msg: String,
}

impl fmt::Display for FoodMatcherError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FoodMatcherError: {}", self.msg)
    }
}

impl Error for FoodMatcherError {}

/// Kana-insensitive multi-pattern matcher for food names.
///
/// Both the food names and the searched text are folded to hiragana before matching, so
/// `ラーメン` in the list matches `らーめん` in a post and vice versa.
pub struct FoodMatcher {
    foods: Vec<String>,
    pma: Option<DoubleArrayAhoCorasick<u32>>,
    // Folded pattern id -> indices of the foods sharing that pattern.
    owners: Vec<Vec<usize>>,
}

impl FoodMatcher {
    /// Creates a new matcher.
    ///
    /// # Arguments
    ///
    /// * `foods` - Food names. Empty names are ignored.
    ///
    /// # Errors
    ///
    /// If the automaton cannot be built, an error variant will be returned.
    pub fn new<I, S>(foods: I) -> Result<Self, FoodMatcherError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let foods: Vec<String> = foods.into_iter().map(Into::into).collect();

        let mut pattern_ids = HashMap::new();
        let mut patterns = vec![];
        let mut owners: Vec<Vec<usize>> = vec![];
        for (i, food) in foods.iter().enumerate() {
            if food.is_empty() {
                continue;
            }
            let folded = HiraganaFilter.filter(food);
            let id = *pattern_ids.entry(folded.clone()).or_insert_with(|| {
                patterns.push(folded);
                owners.push(vec![]);
                owners.len() - 1
            });
            owners[id].push(i);
        }

        let pma = if patterns.is_empty() {
            None
        } else {
            Some(
                DoubleArrayAhoCorasick::<u32>::new(&patterns).map_err(|e| FoodMatcherError {
                    msg: e.to_string(),
                })?,
            )
        };

        Ok(Self { foods, pma, owners })
    }

    /// Returns the registered food names.
    pub fn foods(&self) -> &[String] {
        &self.foods
    }

    /// Finds the foods mentioned in a text.
    ///
    /// # Arguments
    ///
    /// * `text` - Searched text.
    ///
    /// # Returns
    ///
    /// Matched food names in registration order, each at most once.
    pub fn find(&self, text: &str) -> Vec<&str> {
        let pma = match &self.pma {
            Some(pma) => pma,
            None => return vec![],
        };
        let folded = HiraganaFilter.filter(text);
        let mut hits = vec![false; self.foods.len()];
        for m in pma.find_overlapping_iter(&folded) {
            for &i in &self.owners[m.value() as usize] {
                hits[i] = true;
            }
        }
        self.foods
            .iter()
            .zip(hits)
            .filter_map(|(food, hit)| hit.then_some(food.as_str()))
            .collect()
    }

    /// Checks whether a text mentions any food.
    pub fn is_match(&self, text: &str) -> bool {
        !self.find(text).is_empty()
    }
}
