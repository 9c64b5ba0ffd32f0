//! Pluralization utilities.

/// `"s"` unless `n == 1`.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `plural_count(2, "file")` -> `"2 files"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

/// Format count with an irregular plural, e.g. `("class", "classes")`.
#[inline]
pub fn plural_word(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(1, "file"), "1 file");
        assert_eq!(plural_count(3, "document"), "3 documents");
    }

    #[test]
    fn test_plural_word() {
        assert_eq!(plural_word(1, "class", "classes"), "1 class");
        assert_eq!(plural_word(2, "class", "classes"), "2 classes");
    }
}
