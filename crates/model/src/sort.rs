use std::cmp::Ordering;

/// Numeric-aware, case-insensitive comparison of file names: `2.jpg` sorts
/// before `10.jpg`, and `B.jpg` after `a.jpg`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b)
}

/// Stable sort of `items` by [`natural_cmp`] on the key `key` extracts.
pub fn sort_naturally<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}
