use chrono::NaiveDate;

/// Hashtag every searched post must carry.
pub const HASHTAG: &str = "#飯テロ";

/// Builds the search query for candidate posts.
///
/// Candidates contain at least one keyword, carry [`HASHTAG`], have images, are not reposts,
/// and were posted on or after `since`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use meshitero_bot::search_query;
///
/// let since = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
/// assert_eq!(
///     "(ラーメン OR 寿司) (#飯テロ) filter:images -filter:retweets since:2021-06-01",
///     search_query(["ラーメン", "寿司"], since),
/// );
/// ```
pub fn search_query<I, S>(keywords: I, since: NaiveDate) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keywords: Vec<S> = keywords.into_iter().collect();
    let keywords: Vec<&str> = keywords.iter().map(AsRef::as_ref).collect();
    format!(
        "({}) ({}) filter:images -filter:retweets since:{}",
        keywords.join(" OR "),
        HASHTAG,
        since.format("%Y-%m-%d"),
    )
}
