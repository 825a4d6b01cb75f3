//! Whitespace-run-preserving message splitting
//!
//! Chat renderers need to reconstruct the message exactly, so whitespace
//! runs come back as their own segments rather than being merged into
//! adjacent text or discarded.

/// Split `text` into alternating non-whitespace and whitespace segments.
///
/// Every character of the input appears in exactly one segment, in order;
/// joining the segments reproduces the input byte-for-byte.
pub fn split_preserving_whitespace(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (idx, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match in_whitespace {
            None => in_whitespace = Some(ws),
            Some(prev) if prev != ws => {
                segments.push(&text[start..idx]);
                start = idx;
                in_whitespace = Some(ws);
            }
            Some(_) => {}
        }
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}
