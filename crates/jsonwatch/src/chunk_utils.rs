//! Helpers for splitting a document into fragments, used by tests, benches
//! and the fuzzer to simulate a chunked source.
use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks without
/// breaking UTF-8 code points.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Split `payload` at byte offsets derived from `splits`, each taken modulo
/// the remaining length. Chunks may be empty and may cut through a UTF-8
/// sequence, the way a network source delivers bytes.
#[must_use]
pub fn split_bytes<'a>(payload: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(splits.len() + 1);
    let mut rest = payload;
    for s in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(s % (rest.len() + 1));
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}
