//! Small helpers shared across commands.

pub mod date;
pub mod natural;
pub mod path;

pub use natural::natural_cmp;

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, e.g. `3 images`, `1 route`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "image"), "0 images");
        assert_eq!(plural_count(1, "route"), "1 route");
        assert_eq!(plural_count(12, "path"), "12 paths");
    }
}
