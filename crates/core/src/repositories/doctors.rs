//! Doctor records.

use super::id_filter;
use crate::config::CoreConfig;
use crate::constants::DOCTORS;
use crate::models::{Doctor, DoctorRequest};
use crate::pagination::{Page, Pagination};
use crate::scope::within;
use crate::store::{Collection, DocumentStore, InsertOneResult, UpdateResult};
use crate::{HmsError, HmsResult};
use chrono::Utc;
use hms_uuid::RecordId;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DoctorService {
    cfg: Arc<CoreConfig>,
    doctors: Collection,
}

impl DoctorService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            cfg,
            doctors: Collection::new(store, DOCTORS),
        }
    }

    pub async fn list(&self, pagination: Pagination) -> HmsResult<Page<Doctor>> {
        within(self.cfg.request_timeout(), async {
            Ok(self.doctors.find_page(pagination).await?)
        })
        .await
    }

    pub async fn get(&self, doctor_id: &str) -> HmsResult<Doctor> {
        let filter = id_filter("doctor_id", doctor_id)?;
        within(self.cfg.request_timeout(), async {
            self.doctors
                .find_one(&filter)
                .await?
                .ok_or(HmsError::NotFound("doctor"))
        })
        .await
    }

    /// Validates and inserts a new doctor with a fresh id and timestamps.
    pub async fn create(&self, req: &DoctorRequest) -> HmsResult<InsertOneResult> {
        let new = req.validate_new()?;
        let id = RecordId::new().to_string();
        let now = Utc::now();
        let doctor = Doctor {
            id: id.clone(),
            name: new.name,
            speciality: new.speciality,
            created_at: Some(now),
            updated_at: Some(now),
            doctor_id: id,
        };

        within(self.cfg.request_timeout(), async {
            Ok(self.doctors.insert(&doctor).await?)
        })
        .await
    }

    /// Upserts the present `name`/`speciality` fields plus `updated_at`.
    pub async fn update(&self, doctor_id: &str, req: &DoctorRequest) -> HmsResult<UpdateResult> {
        let filter = id_filter("doctor_id", doctor_id)?;
        let mut fields = req.validate_update()?;
        fields.touch(Utc::now());

        within(self.cfg.request_timeout(), async {
            Ok(self.doctors.upsert(&filter, &fields).await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use std::time::Duration;
    use tempfile::TempDir;

    fn service_on(store: Arc<dyn DocumentStore>) -> DoctorService {
        let cfg = CoreConfig::new("secret".into(), Duration::from_secs(5), None).unwrap();
        DoctorService::new(Arc::new(cfg), store)
    }

    fn service() -> DoctorService {
        service_on(Arc::new(MemoryStore::new()))
    }

    async fn file_service() -> (TempDir, DoctorService) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path())
            .await
            .expect("store should open");
        (temp_dir, service_on(Arc::new(store)))
    }

    /// Updating an unknown id creates the doctor under that id with both timestamps.
    async fn assert_update_creates_missing(doctors: &DoctorService) {
        let id = "550e8400e29b41d4a716446655440000";
        let result = doctors
            .update(id, &request(Some("Dr Upsert"), None))
            .await
            .unwrap();
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.upserted_id.as_deref(), Some(id));

        let doctor = doctors.get(id).await.unwrap();
        assert_eq!(doctor.id, id);
        assert_eq!(doctor.doctor_id, id);
        assert_eq!(doctor.name, "Dr Upsert");
        assert!(doctor.created_at.is_some());
        assert_eq!(doctor.created_at, doctor.updated_at);
    }

    /// A doctor created by an upsert is listed in creation order between its neighbours.
    async fn assert_upserted_listed_in_order(doctors: &DoctorService) {
        doctors
            .create(&request(Some("Dr First"), Some("general")))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        doctors
            .update(
                "6ba7b8109dad41d180b400c04fd430c8",
                &request(Some("Dr Second"), Some("general")),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        doctors
            .create(&request(Some("Dr Third"), Some("general")))
            .await
            .unwrap();

        let page = doctors.list(Pagination::default()).await.unwrap();
        assert_eq!(page.total_count, 3);
        let names: Vec<&str> = page.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Dr First", "Dr Second", "Dr Third"]);
    }

    fn request(name: Option<&str>, speciality: Option<&str>) -> DoctorRequest {
        DoctorRequest {
            name: name.map(str::to_string),
            speciality: speciality.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let doctors = service();
        let created = doctors
            .create(&request(Some("Dr Snow"), Some("epidemiology")))
            .await
            .unwrap();

        let doctor = doctors.get(&created.inserted_id).await.unwrap();
        assert_eq!(doctor.id, created.inserted_id);
        assert_eq!(doctor.doctor_id, created.inserted_id);
        assert_eq!(doctor.name, "Dr Snow");
        assert!(doctor.created_at.is_some());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let doctors = service();
        let created = doctors
            .create(&request(Some("Dr Snow"), Some("epidemiology")))
            .await
            .unwrap();
        let before = doctors.get(&created.inserted_id).await.unwrap();

        let result = doctors
            .update(&created.inserted_id, &request(None, Some("public health")))
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 1);
        assert_eq!(result.upserted_id, None);

        let after = doctors.get(&created.inserted_id).await.unwrap();
        assert_eq!(after.name, "Dr Snow");
        assert_eq!(after.speciality, "public health");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_update_of_missing_doctor_creates_it_under_path_id() {
        assert_update_creates_missing(&service()).await;
    }

    #[tokio::test]
    async fn test_update_of_missing_doctor_creates_it_under_path_id_on_files() {
        let (_temp_dir, doctors) = file_service().await;
        assert_update_creates_missing(&doctors).await;
    }

    #[tokio::test]
    async fn test_upserted_doctor_is_listed_in_creation_order() {
        assert_upserted_listed_in_order(&service()).await;
    }

    #[tokio::test]
    async fn test_upserted_doctor_is_listed_in_creation_order_on_files() {
        let (_temp_dir, doctors) = file_service().await;
        assert_upserted_listed_in_order(&doctors).await;
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let err = service()
            .get("550e8400e29b41d4a716446655440000")
            .await
            .unwrap_err();
        assert!(matches!(err, HmsError::NotFound("doctor")));
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        let err = service().get("42").await.unwrap_err();
        assert!(matches!(err, HmsError::Uuid(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let err = service().create(&request(None, None)).await.unwrap_err();
        match err {
            HmsError::Validation(errs) => {
                assert!(errs.contains("name"));
                assert!(errs.contains("speciality"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
