//! File-selection ranges.
//!
//! A spec such as `*`, `3`, `2..5`, `2..`, `..4` or `1,3..` picks entries
//! from a directory listing. Positions are 1-based and count from the
//! newest (highest sorted) file, so `1` is always the most recent script.
//! The selected entries are handed back in ascending order, ready to run.

use crate::error::SpecError;

/// An inclusive, 1-based interval over a reversed listing.
///
/// A missing bound reaches the edge of the listing; with both bounds
/// missing the range selects everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    /// First position (newest side), `None` for the first entry.
    pub start: Option<usize>,
    /// Last position (oldest side), `None` for the last entry.
    pub end: Option<usize>,
}

impl Range {
    /// A range selecting every entry.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A range selecting exactly one entry.
    #[must_use]
    pub const fn single(position: usize) -> Self {
        Self {
            start: Some(position),
            end: Some(position),
        }
    }

    /// Returns true if the range selects every entry.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns true if exactly one bound is unset.
    #[must_use]
    pub const fn is_half_open(&self) -> bool {
        self.start.is_none() != self.end.is_none()
    }

    /// Resolves the range against a listing of `len` entries.
    ///
    /// Returns zero-based indices into that listing.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::OutOfRange`] when a bound exceeds `len`.
    pub fn resolve(&self, len: usize) -> Result<std::ops::Range<usize>, SpecError> {
        if self.is_full() {
            return Ok(0..len);
        }
        let start = self.start.unwrap_or(1);
        let end = self.end.unwrap_or(len);
        for position in [start, end] {
            if position > len {
                return Err(SpecError::OutOfRange { position, len });
            }
        }
        Ok(start - 1..end)
    }
}

/// Parses a comma-separated selection spec.
///
/// # Errors
///
/// Returns a [`SpecError`] for malformed items, zero positions and
/// ranges whose start is not before their end.
pub fn parse_spec(spec: &str) -> Result<Vec<Range>, SpecError> {
    let spec = spec.trim();
    if spec == "*" {
        return Ok(vec![Range::full()]);
    }
    spec.split(',').map(parse_item).collect()
}

fn parse_item(item: &str) -> Result<Range, SpecError> {
    let item = item.trim();
    if item.is_empty() {
        return Err(SpecError::Empty);
    }
    if item == "*" {
        return Ok(Range::full());
    }
    if let Ok(n) = item.parse::<usize>() {
        return position(n).map(Range::single);
    }

    let (before, after) = item
        .split_once("..")
        .ok_or_else(|| SpecError::InvalidItem(item.to_string()))?;
    let range = Range {
        start: bound(before)?,
        end: bound(after)?,
    };
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start >= end {
            return Err(SpecError::InvalidRange { start, end });
        }
    }
    Ok(range)
}

fn bound(text: &str) -> Result<Option<usize>, SpecError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let n = text
        .parse::<usize>()
        .map_err(|_| SpecError::InvalidNumber(text.to_string()))?;
    position(n).map(Some)
}

fn position(n: usize) -> Result<usize, SpecError> {
    if n == 0 {
        Err(SpecError::ZeroPosition)
    } else {
        Ok(n)
    }
}

/// Selects entries from an ascending listing according to `ranges`.
///
/// Ranges are resolved against the reversed listing (newest first) and
/// concatenated in the order given; duplicates are preserved. The result
/// is reversed again so it runs oldest first.
///
/// # Errors
///
/// Returns [`SpecError::OutOfRange`] if any range exceeds the listing.
pub fn select<T: Clone>(ranges: &[Range], entries: &[T]) -> Result<Vec<T>, SpecError> {
    let newest_first: Vec<&T> = entries.iter().rev().collect();
    let mut selected = Vec::new();
    for range in ranges {
        let indices = range.resolve(newest_first.len())?;
        selected.extend(newest_first[indices].iter().map(|e| (*e).clone()));
    }
    selected.reverse();
    Ok(selected)
}

/// Parses `spec` and applies it to `entries` in one step.
///
/// # Errors
///
/// See [`parse_spec`] and [`select`].
pub fn select_by_spec<T: Clone>(spec: &str, entries: &[T]) -> Result<Vec<T>, SpecError> {
    let ranges = parse_spec(spec)?;
    select(&ranges, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILES: [&str; 5] = ["001.sql", "002.sql", "003.sql", "004.sql", "005.sql"];

    #[test]
    fn test_parse_star() {
        assert_eq!(parse_spec("*").unwrap(), vec![Range::full()]);
    }

    #[test]
    fn test_parse_single() {
        assert_eq!(parse_spec("3").unwrap(), vec![Range::single(3)]);
    }

    #[test]
    fn test_parse_ranges() {
        let ranges = parse_spec("2..4,3..,..2,..").unwrap();
        assert_eq!(
            ranges,
            vec![
                Range {
                    start: Some(2),
                    end: Some(4)
                },
                Range {
                    start: Some(3),
                    end: None
                },
                Range {
                    start: None,
                    end: Some(2)
                },
                Range::full(),
            ]
        );
        assert!(ranges[1].is_half_open());
        assert!(ranges[2].is_half_open());
        assert!(ranges[3].is_full());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_spec(""), Err(SpecError::Empty));
        assert_eq!(parse_spec("1,"), Err(SpecError::Empty));
        assert_eq!(parse_spec("abc"), Err(SpecError::InvalidItem("abc".into())));
        assert_eq!(parse_spec("a..3"), Err(SpecError::InvalidNumber("a".into())));
        assert_eq!(parse_spec("0"), Err(SpecError::ZeroPosition));
        assert_eq!(
            parse_spec("4..2"),
            Err(SpecError::InvalidRange { start: 4, end: 2 })
        );
        assert_eq!(
            parse_spec("2..2"),
            Err(SpecError::InvalidRange { start: 2, end: 2 })
        );
    }

    #[test]
    fn test_select_all_ascending() {
        assert_eq!(select_by_spec("*", &FILES).unwrap(), FILES.to_vec());
        assert!(select_by_spec::<&str>("*", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_select_newest() {
        assert_eq!(select_by_spec("1", &FILES).unwrap(), vec!["005.sql"]);
        assert_eq!(select_by_spec("5", &FILES).unwrap(), vec!["001.sql"]);
    }

    #[test]
    fn test_select_half_open() {
        assert_eq!(
            select_by_spec("2..", &FILES).unwrap(),
            vec!["001.sql", "002.sql", "003.sql", "004.sql"]
        );
        assert_eq!(
            select_by_spec("..2", &FILES).unwrap(),
            vec!["004.sql", "005.sql"]
        );
    }

    #[test]
    fn test_select_closed_range() {
        assert_eq!(
            select_by_spec("2..4", &FILES).unwrap(),
            vec!["002.sql", "003.sql", "004.sql"]
        );
    }

    #[test]
    fn test_select_concatenates_with_duplicates() {
        assert_eq!(
            select_by_spec("1,1..2", &FILES).unwrap(),
            vec!["004.sql", "005.sql", "005.sql"]
        );
    }

    #[test]
    fn test_select_out_of_range() {
        assert_eq!(
            select_by_spec("6", &FILES),
            Err(SpecError::OutOfRange {
                position: 6,
                len: 5
            })
        );
        assert_eq!(
            select_by_spec("3..9", &FILES),
            Err(SpecError::OutOfRange {
                position: 9,
                len: 5
            })
        );
        assert!(select_by_spec::<&str>("1", &[]).is_err());
    }
}
