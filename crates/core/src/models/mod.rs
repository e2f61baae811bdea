//! Entity shapes and their request payloads.
//!
//! Each entity is stored as one flat document. Stored records keep their identifier twice:
//! as `_id` and as `<resource>_id`. Request payloads are all-optional structs so that a
//! missing field is reported by validation rather than by the JSON decoder.

pub mod appointment;
pub mod doctor;
pub mod invoice;
pub mod patient;
pub mod prescription;

pub use appointment::{Appointment, AppointmentRequest, NewAppointment};
pub use doctor::{Doctor, DoctorRequest, NewDoctor};
pub use invoice::{Invoice, InvoiceRequest, NewInvoice, PaymentMethod, PaymentStatus};
pub use patient::{
    LoginRequest, NewPatient, Patient, PatientUpdateRequest, RefreshRequest, SignupRequest,
};
pub use prescription::{NewPrescription, Prescription, PrescriptionRequest};

use crate::constants::TEXT_MAX_LEN;
use crate::validation::Validator;

/// Reference fields (`doctor_id`, `invoice_id`, ...) are free text on the wire.
pub(crate) fn optional_reference(
    v: &mut Validator,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    v.optional_text(field, value, 1, TEXT_MAX_LEN)
}
