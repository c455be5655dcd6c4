/// Lowercase the text, turn punctuation into spaces and collapse whitespace.
///
/// A word character is any Unicode alphanumeric or `_`; everything else that
/// is not whitespace becomes a separator.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens of already-normalized text, in order
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
