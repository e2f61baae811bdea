//! Resource services.
//!
//! One service per resource. A service is built per request from the injected store and
//! configuration, performs a single logical store operation, and runs it inside the
//! request's timeout scope ([`crate::scope::within`]).

pub mod appointments;
pub mod doctors;
pub mod invoices;
pub mod patients;
pub mod prescriptions;

pub use appointments::AppointmentService;
pub use doctors::DoctorService;
pub use invoices::InvoiceService;
pub use patients::PatientService;
pub use prescriptions::PrescriptionService;

use crate::constants::ID_FIELD;
use crate::store::Filter;
use crate::HmsResult;
use hms_uuid::RecordId;

/// Parses a path identifier and builds the filter pinning both `_id` and `<resource>_id`
/// to it, so an upsert that matches nothing creates the record under the path id.
///
/// # Errors
///
/// Returns `HmsError::Uuid` when `raw` is not a canonical record id.
pub(crate) fn id_filter(field: &str, raw: &str) -> HmsResult<Filter> {
    let id = RecordId::parse(raw)?;
    let id = id.to_string();
    Ok(Filter::by(ID_FIELD, id.as_str()).eq(field, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HmsError;

    #[test]
    fn test_id_filter_rejects_non_canonical_ids() {
        assert!(matches!(
            id_filter("doctor_id", "not-an-id"),
            Err(HmsError::Uuid(_))
        ));
        assert!(id_filter("doctor_id", "550E8400E29B41D4A716446655440000").is_err());
    }

    #[test]
    fn test_id_filter_pins_resource_field() {
        let filter = id_filter("doctor_id", "550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(
            filter,
            Filter::by("_id", "550e8400e29b41d4a716446655440000")
                .eq("doctor_id", "550e8400e29b41d4a716446655440000")
        );
        assert_eq!(filter.id(), Some("550e8400e29b41d4a716446655440000"));
    }
}
