//! Request handlers, one module per resource.

pub mod appointments;
pub mod doctors;
pub mod health;
pub mod invoices;
pub mod patients;
pub mod prescriptions;
