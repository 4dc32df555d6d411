use crate::StringFilter;

// Katakana code points are placed at a constant distance from their hiragana counterparts.
const KANA_OFFSET: u32 = 0x60;

/// Katakana to hiragana filter.
///
/// Covers small kana, voiced and semi-voiced kana, ゔゕゖ and the iteration marks ゝゞ.
/// Characters without a hiragana counterpart (e.g. ヷ, ー) are kept as-is.
#[derive(Clone, Copy, Default)]
pub struct HiraganaFilter;

impl HiraganaFilter {
    /// Converts a single character.
    #[inline(always)]
    pub fn convert(c: char) -> char {
        match c as u32 {
            code @ (0x30A1..=0x30F6 | 0x30FD..=0x30FE) => {
                char::from_u32(code - KANA_OFFSET).unwrap_or(c)
            }
            _ => c,
        }
    }
}

impl<S> StringFilter<S> for HiraganaFilter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        string.as_ref().chars().map(Self::convert).collect()
    }
}

/// Hiragana to katakana filter. The inverse of [`HiraganaFilter`].
#[derive(Clone, Copy, Default)]
pub struct KatakanaFilter;

impl KatakanaFilter {
    /// Converts a single character.
    #[inline(always)]
    pub fn convert(c: char) -> char {
        match c as u32 {
            code @ (0x3041..=0x3096 | 0x309D..=0x309E) => {
                char::from_u32(code + KANA_OFFSET).unwrap_or(c)
            }
            _ => c,
        }
    }
}

impl<S> StringFilter<S> for KatakanaFilter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        string.as_ref().chars().map(Self::convert).collect()
    }
}
