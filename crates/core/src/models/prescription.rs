use super::optional_reference;
use crate::constants::TEXT_MAX_LEN;
use crate::update::{timestamp_value, FieldSet};
use crate::validation::{ValidationErrors, Validator};
use crate::{HmsError, HmsResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Prescription {
    #[serde(rename = "_id")]
    pub id: String,
    pub drugs: String,
    pub dosage: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub prescription_id: String,
    pub doctor_id: Option<String>,
}

/// Body of both `POST /precription` and `PATCH /prescription/:prescription_id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PrescriptionRequest {
    pub drugs: Option<String>,
    pub dosage: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub doctor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPrescription {
    pub drugs: String,
    pub dosage: String,
    pub span: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub doctor_id: Option<String>,
}

/// A course must start in the future and end after it starts.
pub fn check_time_span(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> HmsResult<()> {
    if start > now && end > start {
        Ok(())
    } else {
        Err(HmsError::InvalidTimeSpan)
    }
}

impl PrescriptionRequest {
    fn span(&self, v: &mut Validator) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            (Some(_), None) => {
                v.reject("end_date", "is required when start_date is given");
                None
            }
            (None, Some(_)) => {
                v.reject("start_date", "is required when end_date is given");
                None
            }
        }
    }

    /// Field checks only; the time span is checked by [`check_time_span`] against the
    /// clock at write time.
    pub fn validate_new(&self) -> Result<NewPrescription, ValidationErrors> {
        let mut v = Validator::new();
        let drugs = v.required_text("drugs", self.drugs.as_deref(), 1, TEXT_MAX_LEN);
        let dosage = v.required_text("dosage", self.dosage.as_deref(), 1, TEXT_MAX_LEN);
        let span = self.span(&mut v);
        let doctor_id = optional_reference(&mut v, "doctor_id", self.doctor_id.as_deref());
        v.finish()?;

        Ok(NewPrescription {
            drugs,
            dosage,
            span,
            doctor_id,
        })
    }

    /// Returns the update field-set and the requested span, if any.
    pub fn validate_update(
        &self,
    ) -> Result<(FieldSet, Option<(DateTime<Utc>, DateTime<Utc>)>), ValidationErrors> {
        let mut v = Validator::new();
        let drugs = v.optional_text("drugs", self.drugs.as_deref(), 1, TEXT_MAX_LEN);
        let dosage = v.optional_text("dosage", self.dosage.as_deref(), 1, TEXT_MAX_LEN);
        let span = self.span(&mut v);
        let doctor_id = optional_reference(&mut v, "doctor_id", self.doctor_id.as_deref());
        v.finish()?;

        let mut fields = FieldSet::new();
        fields
            .set_if_present("drugs", drugs)
            .set_if_present("dosage", dosage)
            .set_if_present("doctor_id", doctor_id);
        if let Some((start, end)) = span {
            fields
                .set("start_date", timestamp_value(start))
                .set("end_date", timestamp_value(end));
        }
        Ok((fields, span))
    }
}
