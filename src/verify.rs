//! Reference orders to check a trace against.

use ::suffix_array::SuffixArray as SaisArray;

use crate::error::{Error, Result};
use crate::trace::Trace;

/// Sorts suffix starts by comparing the full suffixes directly.
pub fn naive_order(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut order: Vec<usize> = (0..chars.len()).collect();
    order.sort_by(|&a, &b| chars[a..].cmp(&chars[b..]));
    order
}

/// Order computed by the `suffix_array` crate over the UTF-8 bytes.
///
/// UTF-8 byte order agrees with code point order, so keeping only suffixes
/// that start on a character boundary and renumbering them by character
/// gives the character-level suffix array.
pub fn library_order(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut char_index = vec![None; bytes.len()];
    for (i, (offset, _)) in text.char_indices().enumerate() {
        char_index[offset] = Some(i);
    }

    let (_, array) = SaisArray::new(bytes).into_parts();
    array
        .into_iter()
        .map(|offset| offset as usize)
        .filter(|&offset| offset < bytes.len())
        .filter_map(|offset| char_index[offset])
        .collect()
}

/// Compares the trace's final suffix array with both reference orders.
pub fn check(trace: &Trace) -> Result<()> {
    let found = trace.suffix_array();
    for (name, expected) in [
        ("naive", naive_order(trace.input())),
        ("library", library_order(trace.input())),
    ] {
        if found != expected.as_slice() {
            return Err(Error::invariant(format!(
                "suffix array {found:?} of {:?} differs from the {name} order {expected:?}",
                trace.input()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::trace;
    use pretty_assertions::assert_eq;

    #[test]
    fn reference_orders_agree_on_banana() {
        assert_eq!(naive_order("banana"), vec![5, 3, 1, 0, 4, 2]);
        assert_eq!(library_order("banana"), vec![5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn library_order_maps_multibyte_offsets() {
        assert_eq!(library_order("été"), naive_order("été"));
        assert_eq!(library_order("日本日"), vec![2, 0, 1]);
    }

    #[test]
    fn traces_pass_the_check() {
        for input in ["a", "aaa", "banana", "mississippi", "zyx"] {
            check(&trace(input).unwrap()).unwrap();
        }
    }
}
