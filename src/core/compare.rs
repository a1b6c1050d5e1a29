//! Ordering of fund rows by a sort key.

use crate::core::collation;
use crate::core::fund::FundRow;
use crate::core::sort_state::{Direction, FUND_CODE_KEY, LONG_NAME_KEY, SortState};
use std::cmp::Ordering;

/// A row's value for a sort key, resolved once per comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    Number(f64),
    Absent,
}

/// Looks up `key` in the row's categories first, then in the top-level
/// fields. A category sent as null resolves to `Absent` without falling back.
pub fn resolve<'a>(row: &'a FundRow, key: &str) -> Field<'a> {
    match row.category(key) {
        Some(Some(value)) => Field::Number(value),
        Some(None) => Field::Absent,
        None => match key {
            FUND_CODE_KEY => Field::Text(&row.fund.fund_code),
            LONG_NAME_KEY => Field::Text(&row.fund.long_name),
            _ => Field::Absent,
        },
    }
}

/// Three-way comparison of two rows.
///
/// Two strings compare under Turkish collation. Everything else only orders
/// when both sides are numbers; a number against an absent value, or any
/// NaN, is a tie. That makes the order stable but not total when absent
/// values are mixed with numbers.
pub fn compare(a: &FundRow, b: &FundRow, key: &str, direction: Direction) -> Ordering {
    match (resolve(a, key), resolve(b, key)) {
        (Field::Text(x), Field::Text(y)) => {
            let ordering = collation::compare(x, y);
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        }
        (Field::Number(x), Field::Number(y)) => {
            if x < y {
                match direction {
                    Direction::Ascending => Ordering::Less,
                    Direction::Descending => Ordering::Greater,
                }
            } else if x > y {
                match direction {
                    Direction::Ascending => Ordering::Greater,
                    Direction::Descending => Ordering::Less,
                }
            } else {
                Ordering::Equal
            }
        }
        _ => Ordering::Equal,
    }
}

/// Stable merge sort that tolerates comparators without a total order.
///
/// `slice::sort_by` may panic when it detects an inconsistent ordering, which
/// the tie rule in [`compare`] produces for mixed absent/numeric columns.
pub fn stable_sort_by<T, F>(items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = stable_sort_by(left, cmp);
    let right = stable_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}

/// Returns the rows in display order for `state`. Without an active key and
/// direction the API order is kept.
pub fn sort_rows(rows: &[FundRow], state: &SortState) -> Vec<FundRow> {
    let rows = rows.to_vec();
    match state.active() {
        Some((key, direction)) => stable_sort_by(rows, &|a: &FundRow, b: &FundRow| {
            compare(a, b, key, direction)
        }),
        None => rows,
    }
}
