/// Splits `text` into sentence-like units.
///
/// A boundary is one of `.`, `!` or `?` followed by one or more spaces. The
/// punctuation stays with the preceding sentence and the run of spaces is
/// dropped. Nothing else is normalized, so an empty input yields `[""]` and a
/// trailing boundary yields a trailing empty sentence.
pub fn segment(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') && bytes.get(i + 1) == Some(&b' ') {
            sentences.push(&text[start..=i]);
            i += 1;
            while bytes.get(i) == Some(&b' ') {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Splits a sentence into words on any whitespace.
pub fn words(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}
