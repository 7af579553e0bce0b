//! Natural ordering for asset paths.
//!
//! Case-insensitive, and digit runs compare by numeric value, so
//! `photo_2.jpg` sorts before `photo_10.jpg`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two strings in natural order.
///
/// Strings that are equal under the natural rules fall back to a plain
/// byte comparison, which keeps the ordering total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                let ord = compare_digit_runs(&lhs, &rhs);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Compare digit runs by value without parsing (runs may exceed u64).
fn compare_digit_runs(lhs: &str, rhs: &str) -> Ordering {
    let l = lhs.trim_start_matches('0');
    let r = rhs.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn test_numeric_runs() {
        assert_eq!(
            sorted(&["photo_10.jpg", "photo_2.jpg", "photo_1.jpg"]),
            vec!["photo_1.jpg", "photo_2.jpg", "photo_10.jpg"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            sorted(&["Roof.png", "attic.png", "Barn.png"]),
            vec!["attic.png", "Barn.png", "Roof.png"]
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("/images/a", "/images/a/b"), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(natural_cmp("img007", "img7"), Ordering::Less);
        assert_eq!(natural_cmp("img08", "img7"), Ordering::Greater);
    }

    #[test]
    fn test_large_numbers() {
        assert_eq!(
            natural_cmp("x99999999999999999999999", "x100000000000000000000000"),
            Ordering::Less
        );
    }
}
