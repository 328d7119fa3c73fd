//! Index bounds validation for body records
//!
//! Matrix Market indices are 1-based. These helpers validate an index
//! against its declared dimension and convert it to a zero-based `usize`.

/// Validate a 1-based index against `1..=limit` and return it zero-based
#[inline]
pub fn checked_index(index: i64, limit: i64) -> Option<usize> {
    if index <= 0 || index > limit {
        return None;
    }
    usize::try_from(index - 1).ok()
}

/// Convert a non-negative header dimension to `usize`
#[inline]
pub fn dimension(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_index() {
        assert_eq!(checked_index(1, 3), Some(0));
        assert_eq!(checked_index(3, 3), Some(2));

        assert_eq!(checked_index(0, 3), None);
        assert_eq!(checked_index(4, 3), None);
        assert_eq!(checked_index(-1, 3), None);
        assert_eq!(checked_index(1, 0), None);
    }

    #[test]
    fn test_dimension() {
        assert_eq!(dimension(5), 5);
        assert_eq!(dimension(-1), 0);
    }
}
