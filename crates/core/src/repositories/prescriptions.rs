//! Prescription records.

use super::id_filter;
use crate::config::CoreConfig;
use crate::constants::{DOCTORS, PRESCRIPTIONS};
use crate::models::prescription::check_time_span;
use crate::models::{Prescription, PrescriptionRequest};
use crate::pagination::{Page, Pagination};
use crate::scope::within;
use crate::store::{Collection, DocumentStore, Filter, InsertOneResult, UpdateResult};
use crate::{HmsError, HmsResult};
use chrono::Utc;
use hms_uuid::RecordId;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PrescriptionService {
    cfg: Arc<CoreConfig>,
    prescriptions: Collection,
    doctors: Collection,
}

impl PrescriptionService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            cfg,
            prescriptions: Collection::new(store.clone(), PRESCRIPTIONS),
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
            Err(HmsError::DoctorNotFound)
        }
    }

    pub async fn list(&self, pagination: Pagination) -> HmsResult<Page<Prescription>> {
        within(self.cfg.request_timeout(), async {
            Ok(self.prescriptions.find_page(pagination).await?)
        })
        .await
    }

    pub async fn get(&self, prescription_id: &str) -> HmsResult<Prescription> {
        let filter = id_filter("prescription_id", prescription_id)?;
        within(self.cfg.request_timeout(), async {
            self.prescriptions
                .find_one(&filter)
                .await?
                .ok_or(HmsError::NotFound("prescription"))
        })
        .await
    }

    /// Inserts a new prescription.
    ///
    /// # Errors
    ///
    /// - `HmsError::InvalidTimeSpan` if the course does not start in the future or ends
    ///   before it starts
    /// - `HmsError::DoctorNotFound` if `doctor_id` names no doctor
    pub async fn create(&self, req: &PrescriptionRequest) -> HmsResult<InsertOneResult> {
        let new = req.validate_new()?;
        let now = Utc::now();
        if let Some((start, end)) = new.span {
            check_time_span(start, end, now)?;
        }

        let id = RecordId::new().to_string();
        let prescription = Prescription {
            id: id.clone(),
            drugs: new.drugs,
            dosage: new.dosage,
            start_date: new.span.map(|(start, _)| start),
            end_date: new.span.map(|(_, end)| end),
            created_at: Some(now),
            updated_at: Some(now),
            prescription_id: id,
            doctor_id: new.doctor_id,
        };

        within(self.cfg.request_timeout(), async {
            if let Some(doctor_id) = prescription.doctor_id.as_deref() {
                self.ensure_doctor(doctor_id).await?;
            }
            Ok(self.prescriptions.insert(&prescription).await?)
        })
        .await
    }

    /// Upserts the present fields plus `updated_at`. New dates are checked against the
    /// clock before anything is written.
    pub async fn update(
        &self,
        prescription_id: &str,
        req: &PrescriptionRequest,
    ) -> HmsResult<UpdateResult> {
        let filter = id_filter("prescription_id", prescription_id)?;
        let (mut fields, span) = req.validate_update()?;
        let now = Utc::now();
        if let Some((start, end)) = span {
            check_time_span(start, end, now)?;
        }
        fields.touch(now);

        within(self.cfg.request_timeout(), async {
            if let Some(Value::String(doctor_id)) = fields.get("doctor_id") {
                self.ensure_doctor(doctor_id).await?;
            }
            Ok(self.prescriptions.upsert(&filter, &fields).await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn service() -> PrescriptionService {
        let cfg = CoreConfig::new("secret".into(), Duration::from_secs(5), None).unwrap();
        PrescriptionService::new(Arc::new(cfg), Arc::new(MemoryStore::new()))
    }

    fn request() -> PrescriptionRequest {
        PrescriptionRequest {
            drugs: Some("amoxicillin".into()),
            dosage: Some("500mg three times daily".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let prescriptions = service();
        let created = prescriptions.create(&request()).await.unwrap();
        let found = prescriptions.get(&created.inserted_id).await.unwrap();
        assert_eq!(found.drugs, "amoxicillin");
        assert_eq!(found.prescription_id, created.inserted_id);
        assert_eq!(found.start_date, None);
    }

    #[tokio::test]
    async fn test_update_rejects_past_start() {
        let prescriptions = service();
        let created = prescriptions.create(&request()).await.unwrap();

        let now = Utc::now();
        let err = prescriptions
            .update(
                &created.inserted_id,
                &PrescriptionRequest {
                    start_date: Some(now - ChronoDuration::days(2)),
                    end_date: Some(now + ChronoDuration::days(2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HmsError::InvalidTimeSpan));
        assert_eq!(err.to_string(), "kindly retype the time");
    }

    #[tokio::test]
    async fn test_update_sets_future_course() {
        let prescriptions = service();
        let created = prescriptions.create(&request()).await.unwrap();

        let start = Utc::now() + ChronoDuration::days(1);
        let end = start + ChronoDuration::days(10);
        prescriptions
            .update(
                &created.inserted_id,
                &PrescriptionRequest {
                    start_date: Some(start),
                    end_date: Some(end),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let found = prescriptions.get(&created.inserted_id).await.unwrap();
        assert_eq!(found.start_date, Some(start));
        assert_eq!(found.end_date, Some(end));
        assert_eq!(found.dosage, "500mg three times daily");
    }

    #[tokio::test]
    async fn test_create_with_unknown_doctor_fails() {
        let err = service()
            .create(&PrescriptionRequest {
                doctor_id: Some("nobody".into()),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HmsError::DoctorNotFound));
    }
}
