use chrono::{DateTime, Duration, Utc};
use meshitero::{errors::Result, Classifier, Tokenizer};
use meshitero_rules::FoodMatcher;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::post::Post;

/// Label of the category that marks a post as positive.
pub const DEFAULT_POSITIVE_LABEL: &str = "good";

/// Posts older than this are ignored.
pub const DEFAULT_RECENT_HOURS: i64 = 12;

/// Appended to the food name in a reply.
pub const REPLY_SUFFIX: &str = "美味しそうですね。";

/// Decides which posts deserve a reply and composes it.
pub struct Screener<T> {
    classifier: Classifier<T>,
    foods: FoodMatcher,
    comments: Vec<String>,
    positive_label: String,
    recent_window: Duration,
}

impl<T> Screener<T>
where
    T: Tokenizer,
{
    /// Creates a new screener.
    ///
    /// # Arguments
    ///
    /// * `classifier` - A trained classifier.
    /// * `foods` - Foods a post must mention.
    /// * `comments` - Comments appended to replies.
    pub fn new(classifier: Classifier<T>, foods: FoodMatcher, comments: Vec<String>) -> Self {
        Self {
            classifier,
            foods,
            comments,
            positive_label: DEFAULT_POSITIVE_LABEL.to_string(),
            recent_window: Duration::hours(DEFAULT_RECENT_HOURS),
        }
    }

    /// Sets the label that marks a post as positive.
    pub fn positive_label<S>(mut self, label: S) -> Self
    where
        S: Into<String>,
    {
        self.positive_label = label.into();
        self
    }

    /// Sets how old a post may be.
    pub fn recent_window(mut self, window: Duration) -> Self {
        self.recent_window = window;
        self
    }

    /// Returns the classifier.
    pub fn classifier(&self) -> &Classifier<T> {
        &self.classifier
    }

    /// Returns the foods mentioned in a text.
    pub fn food_mentions<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.foods.find(text)
    }

    /// Checks whether a text mentions any registered food.
    pub fn is_food_related(&self, text: &str) -> bool {
        self.foods.is_match(text)
    }

    /// Checks whether the classifier labels a text positive.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned.
    pub fn is_positive(&self, text: &str) -> Result<bool> {
        Ok(self.classifier.classify(text)? == self.positive_label)
    }

    /// Checks whether a post was created within the recent window before `now`.
    pub fn is_recent(&self, post: &Post, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(post.created_at) < self.recent_window
    }

    /// Checks whether a text mentions a food and is positive.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned.
    pub fn judge_text(&self, text: &str) -> Result<bool> {
        Ok(self.is_food_related(text) && self.is_positive(text)?)
    }

    /// Checks whether a post deserves a reply.
    ///
    /// # Errors
    ///
    /// If the tokenizer fails, an error variant will be returned.
    pub fn judge(&self, post: &Post, now: DateTime<Utc>) -> Result<bool> {
        let passed = self.is_recent(post, now) && self.judge_text(&post.text)?;
        log::debug!("post {}: {}", post.id, if passed { "passed" } else { "rejected" });
        Ok(passed)
    }

    /// Composes a reply from a randomly chosen mentioned food and a random comment.
    ///
    /// # Returns
    ///
    /// `None` if the text mentions no food or there are no comments.
    pub fn compose_reply<R>(&self, text: &str, rng: &mut R) -> Option<String>
    where
        R: Rng + ?Sized,
    {
        let foods = self.food_mentions(text);
        let food = foods.choose(rng)?;
        let comment = self.comments.choose(rng)?;
        Some(format!("{}{}\n{}", food, REPLY_SUFFIX, comment))
    }
}
