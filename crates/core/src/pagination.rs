//! Listing pagination.
//!
//! Query parameters arrive as raw strings so that junk values fall back to defaults
//! instead of failing the request:
//!
//! - `recordPerPage`: page size, default 10 when absent, unparsable or < 1
//! - `page`: 1-based page number, default 1 under the same rule
//! - `startIndex`: explicit offset; when present and non-negative it replaces the
//!   computed `(page - 1) * recordPerPage`

use crate::constants::DEFAULT_RECORDS_PER_PAGE;
use crate::models::{Appointment, Doctor, Invoice, Patient, Prescription};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size (default 10).
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Explicit offset overriding the computed one.
    #[serde(rename = "startIndex")]
    pub start_index: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub start_index: usize,
    pub record_per_page: usize,
}

fn positive(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .and_then(|v| usize::try_from(v).ok())
}

fn non_negative(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .and_then(|v| usize::try_from(v).ok())
}

impl Pagination {
    pub fn from_query(query: &PageQuery) -> Self {
        let record_per_page =
            positive(query.record_per_page.as_deref()).unwrap_or(DEFAULT_RECORDS_PER_PAGE);
        let page = positive(query.page.as_deref()).unwrap_or(1);
        let computed = (page - 1).saturating_mul(record_per_page);
        let start_index = non_negative(query.start_index.as_deref()).unwrap_or(computed);

        Self {
            start_index,
            record_per_page,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_query(&PageQuery::default())
    }
}

/// One page of a listing together with the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[aliases(
    PatientPage = Page<Patient>,
    DoctorPage = Page<Doctor>,
    AppointmentPage = Page<Appointment>,
    PrescriptionPage = Page<Prescription>,
    InvoicePage = Page<Invoice>
)]
pub struct Page<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(rpp: Option<&str>, page: Option<&str>, start: Option<&str>) -> PageQuery {
        PageQuery {
            record_per_page: rpp.map(str::to_string),
            page: page.map(str::to_string),
            start_index: start.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            Pagination::from_query(&PageQuery::default()),
            Pagination {
                start_index: 0,
                record_per_page: 10
            }
        );
    }

    #[test]
    fn test_page_two_of_five() {
        assert_eq!(
            Pagination::from_query(&query(Some("5"), Some("2"), None)),
            Pagination {
                start_index: 5,
                record_per_page: 5
            }
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let p = Pagination::from_query(&query(Some("zero"), Some("-3"), None));
        assert_eq!(p, Pagination::default());

        let p = Pagination::from_query(&query(Some("0"), Some("0"), None));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_start_index_overrides_page() {
        let p = Pagination::from_query(&query(Some("5"), Some("3"), Some("1")));
        assert_eq!(p.start_index, 1);

        // Negative or junk offsets are ignored.
        let p = Pagination::from_query(&query(Some("5"), Some("3"), Some("-1")));
        assert_eq!(p.start_index, 10);
        let p = Pagination::from_query(&query(Some("5"), Some("3"), Some("x")));
        assert_eq!(p.start_index, 10);
    }

    #[test]
    fn test_map_keeps_total() {
        let page = Page {
            total_count: 7,
            items: vec![1, 2],
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.total_count, 7);
        assert_eq!(mapped.items, vec![10, 20]);
    }
}
