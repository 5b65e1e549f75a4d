//! Natural-order comparison for call-number strings.
//!
//! Compares two strings by alternating non-digit and digit runs, with digit
//! runs compared as numeric magnitudes rather than character by character,
//! so `MSS 2` sorts before `MSS 10`.

use std::cmp::Ordering;

/// Compare two strings in natural order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.digits, y.digits) {
                    (true, true) => cmp_digit_runs(x.text, y.text),
                    _ => x.text.cmp(y.text),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Sort a slice of strings in natural order, in place.
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    // Equal-length digit runs compare lexicographically, which for
    // zero-trimmed runs is the numeric order.
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

struct Run<'s> {
    text: &'s str,
    digits: bool,
}

struct Runs<'s> {
    rest: &'s str,
}

impl<'s> Runs<'s> {
    fn new(s: &'s str) -> Self {
        Runs { rest: s }
    }
}

impl<'s> Iterator for Runs<'s> {
    type Item = Run<'s>;

    fn next(&mut self) -> Option<Run<'s>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Run { text: run, digits })
    }
}
