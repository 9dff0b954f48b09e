//! Post-hoc result ordering.

use std::cmp::Ordering;

use super::eval::as_number;
use super::result::Row;

/// Sort position of one value. Two numbers, or two texts, compare exactly as
/// the filter rule does; numbers sort before text so mixed keys still form a
/// total order.
#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> SortKey<'a> {
    fn of(value: &'a str) -> Self {
        match as_number(value) {
            Some(n) => SortKey::Number(n),
            None => SortKey::Text(value),
        }
    }
}

/// Stable sort of `items` by a string key, using the filter comparison rule.
pub fn order_by_key<T>(items: &mut [T], key: impl Fn(&T) -> &str, ascending: bool) {
    items.sort_by(|a, b| {
        // keys are finite, so partial_cmp is always Some
        let cmp = SortKey::of(key(a))
            .partial_cmp(&SortKey::of(key(b)))
            .unwrap_or(Ordering::Equal);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Sort rows on one projected field. Rows missing the field sort as empty.
pub fn order(rows: &mut [Row], field: &str, ascending: bool) {
    order_by_key(rows, |row| row.get(field).unwrap_or(""), ascending);
}
