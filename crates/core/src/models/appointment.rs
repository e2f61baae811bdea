use super::optional_reference;
use crate::constants::TEXT_MAX_LEN;
use crate::update::{timestamp_value, FieldSet};
use crate::validation::{ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub appointment_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub appointment_id: String,
    pub invoice_id: String,
    pub prescription_id: Option<String>,
    pub doctor_id: Option<String>,
}

/// Body of both `POST /appointment` and `PATCH /appointment/:appointment_id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct AppointmentRequest {
    pub appointment_date: Option<DateTime<Utc>>,
    pub invoice_id: Option<String>,
    pub prescription_id: Option<String>,
    pub doctor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub appointment_date: DateTime<Utc>,
    pub invoice_id: String,
    pub prescription_id: Option<String>,
    pub doctor_id: Option<String>,
}

impl AppointmentRequest {
    pub fn validate_new(&self) -> Result<NewAppointment, ValidationErrors> {
        let mut v = Validator::new();
        let appointment_date = v.required("appointment_date", self.appointment_date);
        let invoice_id = v.required_text("invoice_id", self.invoice_id.as_deref(), 1, TEXT_MAX_LEN);
        let prescription_id =
            optional_reference(&mut v, "prescription_id", self.prescription_id.as_deref());
        let doctor_id = optional_reference(&mut v, "doctor_id", self.doctor_id.as_deref());
        v.finish()?;

        Ok(NewAppointment {
            appointment_date,
            invoice_id,
            prescription_id,
            doctor_id,
        })
    }

    /// The field-set for an update. A `doctor_id` in it still has to be checked against
    /// the doctors collection before writing.
    pub fn validate_update(&self) -> Result<FieldSet, ValidationErrors> {
        let mut v = Validator::new();
        let invoice_id = optional_reference(&mut v, "invoice_id", self.invoice_id.as_deref());
        let prescription_id =
            optional_reference(&mut v, "prescription_id", self.prescription_id.as_deref());
        let doctor_id = optional_reference(&mut v, "doctor_id", self.doctor_id.as_deref());
        v.finish()?;

        let mut fields = FieldSet::new();
        fields
            .set_if_present("appointment_date", self.appointment_date.map(timestamp_value))
            .set_if_present("invoice_id", invoice_id)
            .set_if_present("prescription_id", prescription_id)
            .set_if_present("doctor_id", doctor_id);
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_appointment_needs_date_and_invoice() {
        let errs = AppointmentRequest::default().validate_new().unwrap_err();
        assert!(errs.contains("appointment_date"));
        assert!(errs.contains("invoice_id"));
    }

    #[test]
    fn test_update_renders_date_like_stored_records() {
        let req: AppointmentRequest =
            serde_json::from_value(json!({ "appointment_date": "2030-03-01T09:30:00Z" })).unwrap();
        let fields = req.validate_update().unwrap();
        assert_eq!(
            fields.get("appointment_date"),
            Some(&json!("2030-03-01T09:30:00Z"))
        );
        assert_eq!(fields.len(), 1);
    }
}
