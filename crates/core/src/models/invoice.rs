use super::optional_reference;
use crate::update::{timestamp_value, FieldSet};
use crate::validation::{ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    Cash,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentMethod {
    pub const ALLOWED: &'static [&'static str] = &["CARD", "CASH"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cash => "CASH",
        }
    }
}

impl PaymentStatus {
    pub const ALLOWED: &'static [&'static str] = &["PENDING", "PAID"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD" => Ok(PaymentMethod::Card),
            "CASH" => Ok(PaymentMethod::Cash),
            _ => Err(()),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub invoice_id: String,
    pub appointment_id: Option<String>,
    pub prescription_id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_due_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of both `POST /invoices` and `PATCH /invoices/:invoice_id`.
///
/// The enums arrive as raw strings so an unknown value is reported as a field error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct InvoiceRequest {
    /// `CARD`, `CASH` or empty.
    pub payment_method: Option<String>,
    /// `PENDING` or `PAID`.
    pub payment_status: Option<String>,
    pub payment_due_date: Option<DateTime<Utc>>,
    pub appointment_id: Option<String>,
    pub prescription_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_due_date: Option<DateTime<Utc>>,
    pub appointment_id: Option<String>,
    pub prescription_id: Option<String>,
}

impl InvoiceRequest {
    /// An empty `payment_method` means "not chosen yet".
    fn payment_method(&self, v: &mut Validator) -> Option<PaymentMethod> {
        let raw = self.payment_method.as_deref().filter(|m| !m.trim().is_empty());
        v.parse_enum("payment_method", raw, PaymentMethod::ALLOWED)
    }

    fn payment_status(&self, v: &mut Validator) -> Option<PaymentStatus> {
        v.parse_enum(
            "payment_status",
            self.payment_status.as_deref(),
            PaymentStatus::ALLOWED,
        )
    }

    pub fn validate_new(&self) -> Result<NewInvoice, ValidationErrors> {
        let mut v = Validator::new();
        let payment_method = self.payment_method(&mut v);
        let payment_status = match self.payment_status.as_deref() {
            None => {
                v.reject("payment_status", "is required");
                None
            }
            Some(_) => self.payment_status(&mut v),
        };
        let appointment_id =
            optional_reference(&mut v, "appointment_id", self.appointment_id.as_deref());
        let prescription_id =
            optional_reference(&mut v, "prescription_id", self.prescription_id.as_deref());
        v.finish()?;

        Ok(NewInvoice {
            payment_method,
            payment_status: payment_status.unwrap_or_default(),
            payment_due_date: self.payment_due_date,
            appointment_id,
            prescription_id,
        })
    }

    pub fn validate_update(&self) -> Result<FieldSet, ValidationErrors> {
        let mut v = Validator::new();
        let payment_method = self.payment_method(&mut v);
        let payment_status = self.payment_status(&mut v);
        let appointment_id =
            optional_reference(&mut v, "appointment_id", self.appointment_id.as_deref());
        let prescription_id =
            optional_reference(&mut v, "prescription_id", self.prescription_id.as_deref());
        v.finish()?;

        let mut fields = FieldSet::new();
        fields
            .set_if_present("payment_method", payment_method.map(|m| m.as_str()))
            .set_if_present("payment_status", payment_status.map(|s| s.as_str()))
            .set_if_present("payment_due_date", self.payment_due_date.map(timestamp_value))
            .set_if_present("appointment_id", appointment_id)
            .set_if_present("prescription_id", prescription_id);
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> InvoiceRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_invoice_requires_status() {
        let errs = request(json!({ "payment_method": "CARD" }))
            .validate_new()
            .unwrap_err();
        assert!(errs.contains("payment_status"));
    }

    #[test]
    fn test_empty_method_is_accepted() {
        let invoice = request(json!({ "payment_method": "", "payment_status": "PAID" }))
            .validate_new()
            .unwrap();
        assert_eq!(invoice.payment_method, None);
        assert_eq!(invoice.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_unknown_enum_values_are_field_errors() {
        let errs = request(json!({ "payment_method": "CHEQUE", "payment_status": "LATE" }))
            .validate_update()
            .unwrap_err();
        assert!(errs.contains("payment_method"));
        assert!(errs.contains("payment_status"));
        assert_eq!(
            errs.fields()[0].message,
            "must be one of CARD, CASH"
        );
    }

    #[test]
    fn test_update_stores_wire_spelling() {
        let fields = request(json!({ "payment_status": "PAID" }))
            .validate_update()
            .unwrap();
        assert_eq!(fields.get("payment_status"), Some(&json!("PAID")));
    }

    #[test]
    fn test_stored_invoice_round_trips_enums() {
        let invoice: Invoice = serde_json::from_value(json!({
            "_id": "i1",
            "invoice_id": "i1",
            "payment_method": "CASH",
            "payment_status": "PENDING"
        }))
        .unwrap();
        assert_eq!(invoice.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(invoice.payment_status, PaymentStatus::Pending);
    }
}
