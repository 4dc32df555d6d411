//! Filters for strings.

mod fullwidth;
mod kana;

pub use fullwidth::FullwidthFilter;
pub use kana::{HiraganaFilter, KatakanaFilter};
