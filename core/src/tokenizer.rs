use std::str::SplitWhitespace;

/// Lower-case `token` and keep only its alphabetic characters.
///
/// Returns an empty string when nothing alphabetic is left; callers treat that
/// as "no term".
pub fn normalize(token: &str) -> String {
    token
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphabetic())
        .collect()
}

/// Split `text` on runs of whitespace and normalize each piece.
///
/// The iterator is lazy and can be restarted by cloning it before use or by
/// calling `tokenize` again. Pieces that normalize to nothing are skipped and
/// take no position in the output.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { words: text.split_whitespace() }
}

#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    words: SplitWhitespace<'a>,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.words.by_ref().map(normalize).find(|term| !term.is_empty())
    }
}
