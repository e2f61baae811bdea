use crate::constants::{NAME_MAX_LEN, TEXT_MAX_LEN};
use crate::update::FieldSet;
use crate::validation::{ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub speciality: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub doctor_id: String,
}

/// Body of both `POST /doctors` and `PATCH /doctors/:doctor_id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DoctorRequest {
    pub name: Option<String>,
    pub speciality: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub name: String,
    pub speciality: String,
}

impl DoctorRequest {
    pub fn validate_new(&self) -> Result<NewDoctor, ValidationErrors> {
        let mut v = Validator::new();
        let name = v.required_text("name", self.name.as_deref(), 1, NAME_MAX_LEN);
        let speciality = v.required_text("speciality", self.speciality.as_deref(), 1, TEXT_MAX_LEN);
        v.finish()?;
        Ok(NewDoctor { name, speciality })
    }

    pub fn validate_update(&self) -> Result<FieldSet, ValidationErrors> {
        let mut v = Validator::new();
        let name = v.optional_text("name", self.name.as_deref(), 1, NAME_MAX_LEN);
        let speciality = v.optional_text("speciality", self.speciality.as_deref(), 1, TEXT_MAX_LEN);
        v.finish()?;

        let mut fields = FieldSet::new();
        fields
            .set_if_present("name", name)
            .set_if_present("speciality", speciality);
        Ok(fields)
    }
}
