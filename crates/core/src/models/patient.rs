use super::optional_reference;
use crate::constants::{NAME_MAX_LEN, NAME_MIN_LEN, PASSWORD_MIN_LEN, TEXT_MAX_LEN};
use crate::update::FieldSet;
use crate::validation::{ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored patient.
///
/// `password` holds a PHC-format hash and `token`/`refresh_token` hold the latest pair
/// issued at login. None of the three leave the service: responses go through
/// [`Patient::redacted`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(write_only)]
    pub password: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub prescription_id: Option<String>,
    pub appointment_id: Option<String>,
    pub invoice_id: Option<String>,
}

impl Patient {
    /// Drops the password hash and the stored tokens.
    pub fn redacted(mut self) -> Self {
        self.password = None;
        self.token = None;
        self.refresh_token = None;
        self
    }
}

/// Body of `POST /patients/signup`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub doctor_id: Option<String>,
    pub prescription_id: Option<String>,
    pub appointment_id: Option<String>,
    pub invoice_id: Option<String>,
}

/// A signup that passed validation. `password` is still plaintext here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub doctor_id: Option<String>,
    pub prescription_id: Option<String>,
    pub appointment_id: Option<String>,
    pub invoice_id: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<NewPatient, ValidationErrors> {
        let mut v = Validator::new();
        let first_name = v.required_text(
            "first_name",
            self.first_name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        let last_name = v.required_text(
            "last_name",
            self.last_name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        let password = v.required_secret("password", self.password.as_deref(), PASSWORD_MIN_LEN);
        let email = v.required_email("email", self.email.as_deref());
        let phone = v.required_text("phone", self.phone.as_deref(), 1, TEXT_MAX_LEN);
        let doctor_id = optional_reference(&mut v, "doctor_id", self.doctor_id.as_deref());
        let prescription_id =
            optional_reference(&mut v, "prescription_id", self.prescription_id.as_deref());
        let appointment_id =
            optional_reference(&mut v, "appointment_id", self.appointment_id.as_deref());
        let invoice_id = optional_reference(&mut v, "invoice_id", self.invoice_id.as_deref());
        v.finish()?;

        Ok(NewPatient {
            first_name,
            last_name,
            password,
            email,
            phone,
            doctor_id,
            prescription_id,
            appointment_id,
            invoice_id,
        })
    }
}

/// Body of `POST /patients/login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the normalised email and the password.
    pub fn validate(&self) -> Result<(String, String), ValidationErrors> {
        let mut v = Validator::new();
        let email = v.required_text("email", self.email.as_deref(), 1, TEXT_MAX_LEN);
        let password = v.required_secret("password", self.password.as_deref(), 1);
        v.finish()?;
        Ok((email.to_lowercase(), password))
    }
}

/// Body of `POST /patients/refresh`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

impl RefreshRequest {
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut v = Validator::new();
        let token = v.required_text("refresh_token", self.refresh_token.as_deref(), 1, usize::MAX);
        v.finish()?;
        Ok(token)
    }
}

/// Body of `PATCH /patients/:patient_id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PatientUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PatientUpdateRequest {
    pub fn validate(&self) -> Result<FieldSet, ValidationErrors> {
        let mut v = Validator::new();
        let first_name = v.optional_text(
            "first_name",
            self.first_name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        let last_name = v.optional_text(
            "last_name",
            self.last_name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        v.finish()?;

        let mut fields = FieldSet::new();
        fields
            .set_if_present("first_name", first_name)
            .set_if_present("last_name", last_name);
        Ok(fields)
    }
}
