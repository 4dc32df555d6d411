use chrono::{DateTime, Utc};

/// Header of every quoting status.
pub const QUOTE_HEADER: &str = "(授業用BOT)";

/// A post fetched from the timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub screen_name: String,
    pub display_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Returns the permalink of the post.
    pub fn url(&self) -> String {
        format!("https://twitter.com/{}/status/{}", self.screen_name, self.id)
    }

    /// Builds the status that quotes this post with a comment.
    pub fn quote_status(&self, comment: &str) -> String {
        format!("{}\n{} {}", QUOTE_HEADER, comment, self.url())
    }
}
