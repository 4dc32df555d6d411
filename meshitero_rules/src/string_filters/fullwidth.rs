use crate::StringFilter;

// Distance between printable ASCII and the Halfwidth and Fullwidth Forms block.
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

/// Half-width to full-width filter.
///
/// Printable ASCII characters are replaced with their full-width forms and the ASCII space is
/// replaced with the ideographic space, so that pre-segmentation sees a single width.
#[derive(Clone, Copy, Default)]
pub struct FullwidthFilter;

impl FullwidthFilter {
    /// Creates a new FullwidthFilter.
    ///
    /// # Returns
    ///
    /// A new FullwidthFilter.
    pub const fn new() -> Self {
        Self
    }

    /// Converts a single character.
    #[inline(always)]
    pub fn convert(c: char) -> char {
        match c as u32 {
            0x20 => '\u{3000}',
            code @ 0x21..=0x7E => char::from_u32(code + FULLWIDTH_OFFSET).unwrap_or(c),
            _ => c,
        }
    }
}

impl<S> StringFilter<S> for FullwidthFilter
where
    S: AsRef<str>,
{
    /// Replace alphanumerics and symbols to full-width characters.
    ///
    /// # Arguments:
    ///
    /// * `string` - Input text.
    ///
    /// # Returns
    ///
    /// A processed text.
    fn filter(&self, string: S) -> String {
        string.as_ref().chars().map(Self::convert).collect()
    }
}
