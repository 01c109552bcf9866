//! Pagination handling for LIST operations.
//!
//! List responses arrive in an envelope of `count`, `pageSize`, and the
//! page's `list` slice. Page numbering is 1-based and the page size is
//! fixed by the server; callers that need the full result set walk pages
//! `1..=ceil(count / pageSize)` sequentially.

use crate::errors::{MyraError, MyraResult};
use serde::Deserialize;

/// Response envelope of a LIST call.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    /// Total number of records across all pages.
    #[serde(default)]
    pub count: u32,
    /// Server-chosen page size.
    #[serde(rename = "pageSize", default)]
    pub page_size: u32,
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Number of pages needed to cover `count` records.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.count, self.page_size)
    }
}

/// `ceil(count / page_size)`, with a zero page size meaning no pages.
pub fn total_pages(count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Collects all records of a paginated listing.
///
/// Fetches page 1, takes `count` and `pageSize` from its envelope, then
/// walks the remaining pages in order and stops as soon as all pages are
/// consumed. Errors from `fetch` propagate immediately.
pub fn collect_all<T>(
    mut fetch: impl FnMut(u32) -> MyraResult<ListEnvelope<T>>,
) -> MyraResult<Vec<T>> {
    let first = fetch(1)?;
    let total = first.total_pages();
    let mut records = first.list;

    for page in 2..=total {
        records.extend(fetch(page)?.list);
    }

    Ok(records)
}

/// Scans all pages for the single record satisfying `predicate`.
///
/// Returns `Ok(None)` when nothing matches. More than one match is a
/// logic error ([`MyraError::AmbiguousMatch`]) rather than a silent pick.
pub fn find_unique<T>(
    fetch: impl FnMut(u32) -> MyraResult<ListEnvelope<T>>,
    mut predicate: impl FnMut(&T) -> bool,
) -> MyraResult<Option<T>> {
    let mut found = None;
    for record in collect_all(fetch)? {
        if predicate(&record) {
            if found.is_some() {
                return Err(MyraError::AmbiguousMatch);
            }
            found = Some(record);
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn paged(count: u32, page_size: u32, page: u32) -> ListEnvelope<u32> {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(count);
        ListEnvelope {
            count,
            page_size,
            list: (start..end).collect(),
        }
    }

    #[test_case(25, 10, 3; "partial last page")]
    #[test_case(20, 10, 2; "exact multiple")]
    #[test_case(1, 10, 1; "single record")]
    #[test_case(0, 10, 0; "empty result")]
    #[test_case(5, 0, 0; "defunct page size")]
    fn page_math(count: u32, page_size: u32, expected: u32) {
        assert_eq!(total_pages(count, page_size), expected);
    }

    #[test]
    fn collect_all_visits_exactly_the_needed_pages() {
        let mut visited = Vec::new();
        let records = collect_all(|page| {
            visited.push(page);
            Ok(paged(25, 10, page))
        })
        .unwrap();

        assert_eq!(visited, vec![1, 2, 3]);
        assert_eq!(records, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn collect_all_consumes_page_one_even_when_empty() {
        let mut visited = Vec::new();
        let records = collect_all(|page| {
            visited.push(page);
            Ok(paged(0, 10, page))
        })
        .unwrap();

        assert_eq!(visited, vec![1]);
        assert!(records.is_empty());
    }

    #[test]
    fn fetch_errors_propagate() {
        let result = collect_all::<u32>(|page| {
            if page == 2 {
                Err(MyraError::PermissionDenied)
            } else {
                Ok(paged(25, 10, page))
            }
        });
        assert!(matches!(result, Err(MyraError::PermissionDenied)));
    }

    #[test]
    fn find_unique_returns_the_single_match() {
        let found = find_unique(|page| Ok(paged(25, 10, page)), |n| *n == 17).unwrap();
        assert_eq!(found, Some(17));
    }

    #[test]
    fn find_unique_reports_no_match() {
        let found = find_unique(|page| Ok(paged(25, 10, page)), |n| *n == 99).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn find_unique_rejects_ambiguity_across_pages() {
        // Records 3 and 13 live on different pages and both match.
        let result = find_unique(|page| Ok(paged(25, 10, page)), |n| *n % 10 == 3);
        assert!(matches!(result, Err(MyraError::AmbiguousMatch)));
    }
}
