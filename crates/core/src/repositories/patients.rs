//! Patient accounts.
//!
//! Covers signup, login, token refresh and the plain record operations. Passwords are
//! stored as Argon2id PHC strings; the latest token pair issued to a patient is kept on
//! the patient record so a refresh token can only be used while it is current.
//!
//! ## Uniqueness
//!
//! Email and phone are unique across patients. Signup hands both fields to
//! [`Collection::insert_unique`], which checks and inserts as one store operation.

use super::id_filter;
use crate::auth::{spawn_hash, spawn_verify, TokenKind, TokenPair, TokenService, TokenSubject};
use crate::config::CoreConfig;
use crate::constants::PATIENTS;
use crate::models::{LoginRequest, Patient, PatientUpdateRequest, RefreshRequest, SignupRequest};
use crate::pagination::{Page, Pagination};
use crate::scope::within;
use crate::store::{Collection, DocumentStore, Filter, InsertOneResult, UpdateResult};
use crate::update::FieldSet;
use crate::{HmsError, HmsResult, StoreError};
use chrono::{DateTime, Utc};
use hms_uuid::RecordId;
use std::sync::Arc;

const UNIQUE_FIELDS: &[&str] = &["email", "phone"];

#[derive(Clone, Debug)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    patients: Collection,
    tokens: TokenService,
}

fn subject(patient: &Patient) -> TokenSubject<'_> {
    TokenSubject {
        id: &patient.patient_id,
        email: &patient.email,
        first_name: &patient.first_name,
        last_name: &patient.last_name,
    }
}

fn token_fields(tokens: &TokenPair, now: DateTime<Utc>) -> FieldSet {
    let mut fields = FieldSet::new();
    fields
        .set("token", tokens.token.as_str())
        .set("refresh_token", tokens.refresh_token.as_str())
        .touch(now);
    fields
}

impl PatientService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        Self {
            cfg,
            patients: Collection::new(store, PATIENTS),
            tokens,
        }
    }

    /// Registers a new patient.
    ///
    /// The password is hashed before it reaches the store and a first token pair is issued
    /// and stored with the record.
    ///
    /// # Errors
    ///
    /// - `HmsError::Validation` if any field fails validation
    /// - `HmsError::DuplicatePatient` if the email or phone is already registered
    /// - `HmsError::PasswordHash` / `HmsError::TokenSigning` on credential failures
    pub async fn signup(&self, req: &SignupRequest) -> HmsResult<InsertOneResult> {
        let new = req.validate()?;
        let password = spawn_hash(new.password).await?;
        let id = RecordId::new().to_string();
        let now = Utc::now();

        let mut patient = Patient {
            id: id.clone(),
            first_name: new.first_name,
            last_name: new.last_name,
            password: Some(password),
            email: new.email,
            phone: new.phone,
            token: None,
            refresh_token: None,
            created_at: Some(now),
            updated_at: Some(now),
            patient_id: id,
            doctor_id: new.doctor_id,
            prescription_id: new.prescription_id,
            appointment_id: new.appointment_id,
            invoice_id: new.invoice_id,
        };
        let tokens = self.tokens.generate_all(subject(&patient))?;
        patient.token = Some(tokens.token);
        patient.refresh_token = Some(tokens.refresh_token);

        within(self.cfg.request_timeout(), async {
            match self.patients.insert_unique(&patient, UNIQUE_FIELDS).await {
                Ok(result) => Ok(result),
                Err(StoreError::Duplicate { field, .. }) => {
                    tracing::info!("signup rejected: duplicate {}", field);
                    Err(HmsError::DuplicatePatient)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Checks the credentials and issues a fresh token pair.
    ///
    /// Returns the patient without the password hash but with the new tokens. An unknown
    /// email and a wrong password fail the same way.
    pub async fn login(&self, req: &LoginRequest) -> HmsResult<Patient> {
        let (email, password) = req.validate()?;

        within(self.cfg.request_timeout(), async {
            let found: Option<Patient> = self.patients.find_one(&Filter::by("email", email)).await?;
            let patient = found.ok_or(HmsError::IncorrectCredentials)?;

            let stored_hash = patient.password.clone().unwrap_or_default();
            if !spawn_verify(password, stored_hash).await {
                return Err(HmsError::IncorrectCredentials);
            }

            let tokens = self.tokens.generate_all(subject(&patient))?;
            let now = Utc::now();
            self.patients
                .upsert(
                    &Filter::by("patient_id", patient.patient_id.as_str()),
                    &token_fields(&tokens, now),
                )
                .await?;

            let mut patient = patient.redacted();
            patient.token = Some(tokens.token);
            patient.refresh_token = Some(tokens.refresh_token);
            patient.updated_at = Some(now);
            Ok(patient)
        })
        .await
    }

    /// Exchanges the patient's current refresh token for a new pair.
    ///
    /// # Errors
    ///
    /// Returns `HmsError::InvalidToken` if the token is not a valid refresh token, or is not
    /// the one currently stored for its patient.
    pub async fn refresh(&self, req: &RefreshRequest) -> HmsResult<TokenPair> {
        let presented = req.validate()?;
        let claims = self.tokens.validate(&presented, TokenKind::Refresh)?;

        within(self.cfg.request_timeout(), async {
            let filter = Filter::by("patient_id", claims.sub.as_str());
            let patient: Patient = self
                .patients
                .find_one(&filter)
                .await?
                .ok_or_else(|| HmsError::InvalidToken("unknown patient".into()))?;

            if patient.refresh_token.as_deref() != Some(presented.as_str()) {
                return Err(HmsError::InvalidToken(
                    "refresh token is no longer current".into(),
                ));
            }

            let tokens = self.tokens.generate_all(subject(&patient))?;
            self.patients
                .upsert(&filter, &token_fields(&tokens, Utc::now()))
                .await?;
            Ok(tokens)
        })
        .await
    }

    pub async fn list(&self, pagination: Pagination) -> HmsResult<Page<Patient>> {
        within(self.cfg.request_timeout(), async {
            let page: Page<Patient> = self.patients.find_page(pagination).await?;
            Ok(page.map(Patient::redacted))
        })
        .await
    }

    pub async fn get(&self, patient_id: &str) -> HmsResult<Patient> {
        let filter = id_filter("patient_id", patient_id)?;
        within(self.cfg.request_timeout(), async {
            let found: Option<Patient> = self.patients.find_one(&filter).await?;
            found
                .map(Patient::redacted)
                .ok_or(HmsError::NotFound("patient"))
        })
        .await
    }

    /// Upserts the present name fields plus `updated_at`.
    pub async fn update(
        &self,
        patient_id: &str,
        req: &PatientUpdateRequest,
    ) -> HmsResult<UpdateResult> {
        let filter = id_filter("patient_id", patient_id)?;
        let mut fields = req.validate()?;
        fields.touch(Utc::now());

        within(self.cfg.request_timeout(), async {
            Ok(self.patients.upsert(&filter, &fields).await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::Value;
    use std::time::Duration;

    struct Fixture {
        service: PatientService,
        store: Arc<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let cfg = Arc::new(CoreConfig::new("secret".into(), Duration::from_secs(5), None).unwrap());
        let store = Arc::new(MemoryStore::new());
        let tokens = TokenService::from_config(&cfg);
        Fixture {
            service: PatientService::new(cfg, store.clone(), tokens),
            store,
        }
    }

    fn signup(email: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
            password: Some("cobol-1959".into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Default::default()
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn test_signup_stores_hashed_password() {
        let fx = fixture();
        let created = fx
            .service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();

        let raw = fx
            .store
            .find_one(PATIENTS, &Filter::by("_id", created.inserted_id.as_str()))
            .await
            .unwrap()
            .expect("patient stored");
        let stored = raw["password"].as_str().unwrap();
        assert_ne!(stored, "cobol-1959");
        assert!(stored.starts_with("$argon2id$"));
        assert_eq!(raw["patient_id"], Value::String(created.inserted_id.clone()));
        assert!(raw["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email_or_phone() {
        let fx = fixture();
        fx.service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();

        let same_email = fx.service.signup(&signup("GRACE@navy.mil", "555-0199")).await;
        assert!(matches!(same_email, Err(HmsError::DuplicatePatient)));

        let same_phone = fx.service.signup(&signup("other@navy.mil", "555-0100")).await;
        assert!(matches!(same_phone, Err(HmsError::DuplicatePatient)));

        let total = fx.store.count(PATIENTS, &Filter::new()).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_login_issues_and_persists_tokens() {
        let fx = fixture();
        let created = fx
            .service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();

        let patient = fx
            .service
            .login(&login("grace@navy.mil", "cobol-1959"))
            .await
            .unwrap();
        assert_eq!(patient.patient_id, created.inserted_id);
        assert_eq!(patient.password, None);
        let token = patient.token.clone().expect("access token");
        let refresh = patient.refresh_token.clone().expect("refresh token");
        assert!(!token.is_empty());
        assert!(!refresh.is_empty());

        let raw = fx
            .store
            .find_one(PATIENTS, &Filter::by("patient_id", created.inserted_id.as_str()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw["token"], Value::String(token));
        assert_eq!(raw["refresh_token"], Value::String(refresh));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let fx = fixture();
        fx.service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();

        let wrong_password = fx.service.login(&login("grace@navy.mil", "fortran")).await;
        let unknown_email = fx.service.login(&login("ada@navy.mil", "cobol-1959")).await;
        for result in [wrong_password, unknown_email] {
            let err = result.unwrap_err();
            assert!(matches!(err, HmsError::IncorrectCredentials));
            assert_eq!(err.to_string(), "login or password is incorrect");
        }
    }

    #[tokio::test]
    async fn test_refresh_rotates_pair() {
        let fx = fixture();
        fx.service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();
        let patient = fx
            .service
            .login(&login("grace@navy.mil", "cobol-1959"))
            .await
            .unwrap();
        let first_refresh = patient.refresh_token.unwrap();

        let pair = fx
            .service
            .refresh(&RefreshRequest {
                refresh_token: Some(first_refresh.clone()),
            })
            .await
            .unwrap();
        assert_ne!(pair.refresh_token, first_refresh);

        let stale = fx
            .service
            .refresh(&RefreshRequest {
                refresh_token: Some(first_refresh),
            })
            .await;
        assert!(matches!(stale, Err(HmsError::InvalidToken(_))));

        let next = fx
            .service
            .refresh(&RefreshRequest {
                refresh_token: Some(pair.refresh_token.clone()),
            })
            .await
            .unwrap();
        let reused = fx
            .service
            .refresh(&RefreshRequest {
                refresh_token: Some(pair.refresh_token),
            })
            .await;
        assert!(matches!(reused, Err(HmsError::InvalidToken(_))));
        assert!(!next.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let fx = fixture();
        fx.service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();
        let patient = fx
            .service
            .login(&login("grace@navy.mil", "cobol-1959"))
            .await
            .unwrap();

        let err = fx
            .service
            .refresh(&RefreshRequest {
                refresh_token: patient.token,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HmsError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_update_changes_only_present_field() {
        let fx = fixture();
        let created = fx
            .service
            .signup(&signup("grace@navy.mil", "555-0100"))
            .await
            .unwrap();
        let before = fx.service.get(&created.inserted_id).await.unwrap();

        fx.service
            .update(
                &created.inserted_id,
                &PatientUpdateRequest {
                    first_name: None,
                    last_name: Some("Murray Hopper".into()),
                },
            )
            .await
            .unwrap();

        let after = fx.service.get(&created.inserted_id).await.unwrap();
        assert_eq!(after.last_name, "Murray Hopper");
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.password, None);
    }

    #[tokio::test]
    async fn test_list_redacts_every_patient() {
        let fx = fixture();
        for n in 0..3 {
            fx.service
                .signup(&signup(&format!("p{}@example.org", n), &format!("555-010{}", n)))
                .await
                .unwrap();
        }
        let page = fx.service.list(Pagination::default()).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert!(page
            .items
            .iter()
            .all(|p| p.password.is_none() && p.token.is_none()));
    }
}
