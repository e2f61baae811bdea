//! Appointment records.
//!
//! An appointment may name a doctor. The doctor must exist when the appointment is created
//! or re-pointed; nothing keeps the reference valid afterwards.

use super::id_filter;
use crate::config::CoreConfig;
use crate::constants::{APPOINTMENTS, DOCTORS};
use crate::models::{Appointment, AppointmentRequest};
use crate::pagination::{Page, Pagination};
use crate::scope::within;
use crate::store::{Collection, DocumentStore, Filter, InsertOneResult, UpdateResult};
use crate::{HmsError, HmsResult};
use chrono::Utc;
use hms_uuid::RecordId;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppointmentService {
    cfg: Arc<CoreConfig>,
    appointments: Collection,
    doctors: Collection,
}

impl AppointmentService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            cfg,
            appointments: Collection::new(store.clone(), APPOINTMENTS),
            doctors: Collection::new(store, DOCTORS),
        }
    }

    async fn ensure_doctor(&self, doctor_id: &str) -> HmsResult<()> {
        if self
            .doctors
            .exists(&Filter::by("doctor_id", doctor_id))
            .await?
        {
            Ok(())
        } else {
            tracing::info!("appointment references unknown doctor {}", doctor_id);
            Err(HmsError::DoctorNotFound)
        }
    }

    pub async fn list(&self, pagination: Pagination) -> HmsResult<Page<Appointment>> {
        within(self.cfg.request_timeout(), async {
            Ok(self.appointments.find_page(pagination).await?)
        })
        .await
    }

    pub async fn get(&self, appointment_id: &str) -> HmsResult<Appointment> {
        let filter = id_filter("appointment_id", appointment_id)?;
        within(self.cfg.request_timeout(), async {
            self.appointments
                .find_one(&filter)
                .await?
                .ok_or(HmsError::NotFound("appointment"))
        })
        .await
    }

    /// Inserts a new appointment.
    ///
    /// # Errors
    ///
    /// Returns `HmsError::DoctorNotFound` without writing anything if `doctor_id` is given
    /// and no such doctor exists.
    pub async fn create(&self, req: &AppointmentRequest) -> HmsResult<InsertOneResult> {
        let new = req.validate_new()?;
        let id = RecordId::new().to_string();
        let now = Utc::now();
        let appointment = Appointment {
            id: id.clone(),
            appointment_date: Some(new.appointment_date),
            created_at: Some(now),
            updated_at: Some(now),
            appointment_id: id,
            invoice_id: new.invoice_id,
            prescription_id: new.prescription_id,
            doctor_id: new.doctor_id,
        };

        within(self.cfg.request_timeout(), async {
            if let Some(doctor_id) = appointment.doctor_id.as_deref() {
                self.ensure_doctor(doctor_id).await?;
            }
            Ok(self.appointments.insert(&appointment).await?)
        })
        .await
    }

    /// Upserts the present fields plus `updated_at`, checking a new `doctor_id` first.
    pub async fn update(
        &self,
        appointment_id: &str,
        req: &AppointmentRequest,
    ) -> HmsResult<UpdateResult> {
        let filter = id_filter("appointment_id", appointment_id)?;
        let mut fields = req.validate_update()?;
        fields.touch(Utc::now());

        within(self.cfg.request_timeout(), async {
            if let Some(Value::String(doctor_id)) = fields.get("doctor_id") {
                self.ensure_doctor(doctor_id).await?;
            }
            Ok(self.appointments.upsert(&filter, &fields).await?)
        })
        .await
    }
}
