//! Invoice records.

use super::id_filter;
use crate::config::CoreConfig;
use crate::constants::INVOICES;
use crate::models::{Invoice, InvoiceRequest};
use crate::pagination::{Page, Pagination};
use crate::scope::within;
use crate::store::{Collection, DocumentStore, InsertOneResult, UpdateResult};
use crate::{HmsError, HmsResult};
use chrono::Utc;
use hms_uuid::RecordId;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct InvoiceService {
    cfg: Arc<CoreConfig>,
    invoices: Collection,
}

impl InvoiceService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            cfg,
            invoices: Collection::new(store, INVOICES),
        }
    }

    pub async fn list(&self, pagination: Pagination) -> HmsResult<Page<Invoice>> {
        within(self.cfg.request_timeout(), async {
            Ok(self.invoices.find_page(pagination).await?)
        })
        .await
    }

    pub async fn get(&self, invoice_id: &str) -> HmsResult<Invoice> {
        let filter = id_filter("invoice_id", invoice_id)?;
        within(self.cfg.request_timeout(), async {
            self.invoices
                .find_one(&filter)
                .await?
                .ok_or(HmsError::NotFound("invoice"))
        })
        .await
    }

    pub async fn create(&self, req: &InvoiceRequest) -> HmsResult<InsertOneResult> {
        let new = req.validate_new()?;
        let id = RecordId::new().to_string();
        let now = Utc::now();
        let invoice = Invoice {
            id: id.clone(),
            invoice_id: id,
            appointment_id: new.appointment_id,
            prescription_id: new.prescription_id,
            payment_method: new.payment_method,
            payment_status: new.payment_status,
            payment_due_date: new.payment_due_date,
            created_at: Some(now),
            updated_at: Some(now),
        };

        within(self.cfg.request_timeout(), async {
            Ok(self.invoices.insert(&invoice).await?)
        })
        .await
    }

    pub async fn update(&self, invoice_id: &str, req: &InvoiceRequest) -> HmsResult<UpdateResult> {
        let filter = id_filter("invoice_id", invoice_id)?;
        let mut fields = req.validate_update()?;
        fields.touch(Utc::now());

        within(self.cfg.request_timeout(), async {
            Ok(self.invoices.upsert(&filter, &fields).await?)
        })
        .await
    }
}
