use crate::error::{EstateLedgerError, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $description:literal) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(transparent)]
        #[schemars(description = $description)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(RecordId, "Opaque unique identifier of a ledger record, assigned by the record store");
define_id!(OwnerId, "Opaque unique identifier of an owner, assigned by the record store");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    #[schemars(description = "Money received into the shared account (dues payments, other income). Adds to the balance.")]
    Income,

    #[schemars(description = "Money paid out of the shared account. Subtracts from the balance.")]
    Expense,
}

impl RecordKind {
    /// Applies the sign of this kind to an amount.
    pub fn signed(self, amount: u64) -> i64 {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        match self {
            RecordKind::Income => amount,
            RecordKind::Expense => -amount,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Income => f.write_str("INCOME"),
            RecordKind::Expense => f.write_str("EXPENSE"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = EstateLedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(RecordKind::Income),
            "EXPENSE" => Ok(RecordKind::Expense),
            _ => Err(EstateLedgerError::InvalidRecordKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonetaryRecord {
    pub id: RecordId,

    pub kind: RecordKind,

    #[schemars(description = "Amount in the smallest currency unit. Always non-negative; the sign comes from `kind`.")]
    pub amount: u64,

    #[schemars(description = "Calendar date in YYYY-MM-DD format. Time of day is not recorded.")]
    pub occurred_on: NaiveDate,

    #[serde(default)]
    #[schemars(description = "Free-text description shown in the ledger.")]
    pub description: String,

    #[serde(default)]
    #[schemars(
        description = "Expense category label (e.g. 'Wages', 'Bank Charges'). Only meaningful for EXPENSE records; missing or unknown labels are reported as miscellaneous."
    )]
    pub category: Option<String>,

    #[serde(default)]
    #[schemars(
        description = "Owner this dues payment was received from. Only present on INCOME records. The owner may since have been removed; the record is kept either way."
    )]
    pub owner_ref: Option<OwnerId>,
}

impl MonetaryRecord {
    pub fn income(id: impl Into<RecordId>, amount: u64, occurred_on: NaiveDate) -> Self {
        Self {
            id: id.into(),
            kind: RecordKind::Income,
            amount,
            occurred_on,
            description: String::new(),
            category: None,
            owner_ref: None,
        }
    }

    pub fn expense(id: impl Into<RecordId>, amount: u64, occurred_on: NaiveDate) -> Self {
        Self {
            id: id.into(),
            kind: RecordKind::Expense,
            amount,
            occurred_on,
            description: String::new(),
            category: None,
            owner_ref: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn paid_by(mut self, owner: impl Into<OwnerId>) -> Self {
        self.owner_ref = Some(owner.into());
        self
    }

    pub fn signed_amount(&self) -> i64 {
        self.kind.signed(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.kind == RecordKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == RecordKind::Expense
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Owner {
    pub id: OwnerId,

    #[serde(default)]
    #[schemars(description = "Display name of the owner or resident.")]
    pub name: String,

    #[schemars(
        description = "Unit identifier as written by the administrator, e.g. '7' or a range such as '2-5'. Not interpreted by the engine."
    )]
    pub unit_label: String,

    #[schemars(
        description = "Dues owed for every elapsed month, in the smallest currency unit. Zero means no dues are required."
    )]
    pub monthly_obligation: u64,
}

impl Owner {
    pub fn new(id: impl Into<OwnerId>, unit_label: impl Into<String>, monthly_obligation: u64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            unit_label: unit_label.into(),
            monthly_obligation,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Everything a caller fetched from the record store for one computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LedgerSnapshot {
    #[serde(default)]
    #[schemars(description = "Ledger records, in any order. Include all history before the reporting window so the carried-forward balance is complete.")]
    pub records: Vec<MonetaryRecord>,

    #[serde(default)]
    #[schemars(description = "Current owner registry.")]
    pub owners: Vec<Owner>,
}

impl LedgerSnapshot {
    pub fn new(records: Vec<MonetaryRecord>, owners: Vec<Owner>) -> Self {
        Self { records, owners }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks the invariants the engine assumes instead of re-checking them:
    /// ids are unique and expenses never point at an owner.
    pub fn validate(&self) -> Result<()> {
        let mut record_ids = HashSet::new();
        for record in &self.records {
            if !record_ids.insert(&record.id) {
                return Err(EstateLedgerError::ValidationError {
                    entity: format!("record {}", record.id),
                    details: "duplicate record id".to_string(),
                });
            }

            if record.is_expense() && record.owner_ref.is_some() {
                return Err(EstateLedgerError::ValidationError {
                    entity: format!("record {}", record.id),
                    details: "expense records cannot reference an owner".to_string(),
                });
            }
        }

        let mut owner_ids = HashSet::new();
        for owner in &self.owners {
            if !owner_ids.insert(&owner.id) {
                return Err(EstateLedgerError::ValidationError {
                    entity: format!("owner {}", owner.id),
                    details: "duplicate owner id".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LedgerSnapshot)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = LedgerSnapshot::schema_as_json().unwrap();
        assert!(schema_json.contains("records"));
        assert!(schema_json.contains("owners"));
        assert!(schema_json.contains("monthly_obligation"));
        assert!(schema_json.contains("occurred_on"));
    }

    #[test]
    fn test_record_kind_wire_format() {
        let record = MonetaryRecord::income("r1", 500, date(2024, 1, 10)).paid_by("o1");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"kind\":\"INCOME\""));
        assert!(json.contains("\"owner_ref\":\"o1\""));
        assert!(json.contains("\"occurred_on\":\"2024-01-10\""));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id":"r9","kind":"EXPENSE","amount":200,"occurred_on":"2024-01-15"}"#;
        let record: MonetaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, RecordKind::Expense);
        assert_eq!(record.category, None);
        assert_eq!(record.owner_ref, None);
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_negative_amount_rejected_by_type() {
        let json = r#"{"id":"r9","kind":"INCOME","amount":-5,"occurred_on":"2024-01-15"}"#;
        assert!(serde_json::from_str::<MonetaryRecord>(json).is_err());
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(MonetaryRecord::income("a", 500, date(2024, 1, 1)).signed_amount(), 500);
        assert_eq!(MonetaryRecord::expense("b", 200, date(2024, 1, 1)).signed_amount(), -200);
    }

    #[test]
    fn test_record_kind_from_str() {
        assert_eq!("INCOME".parse::<RecordKind>().unwrap(), RecordKind::Income);
        assert_eq!("expense".parse::<RecordKind>().unwrap(), RecordKind::Expense);
        assert!("TRANSFER".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_record_ids() {
        let snapshot = LedgerSnapshot::new(
            vec![
                MonetaryRecord::income("dup", 1, date(2024, 1, 1)),
                MonetaryRecord::expense("dup", 1, date(2024, 1, 2)),
            ],
            vec![],
        );
        assert!(matches!(
            snapshot.validate(),
            Err(EstateLedgerError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_expense_with_owner() {
        let snapshot = LedgerSnapshot::new(
            vec![MonetaryRecord::expense("e1", 10, date(2024, 1, 1)).paid_by("o1")],
            vec![],
        );
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_owner_ids() {
        let snapshot = LedgerSnapshot::new(
            vec![],
            vec![Owner::new("o1", "1", 100), Owner::new("o1", "2", 100)],
        );
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_dangling_owner_reference_is_valid() {
        let snapshot = LedgerSnapshot::new(
            vec![MonetaryRecord::income("r1", 10, date(2024, 1, 1)).paid_by("removed-owner")],
            vec![Owner::new("o1", "1", 100)],
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{
            "records": [
                {"id":"r1","kind":"INCOME","amount":500,"occurred_on":"2024-01-10","owner_ref":"o1"},
                {"id":"r2","kind":"EXPENSE","amount":200,"occurred_on":"2024-01-15","category":"Wages"}
            ],
            "owners": [
                {"id":"o1","name":"Made","unit_label":"2-5","monthly_obligation":1300000}
            ]
        }"#;
        let snapshot = LedgerSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.owners[0].unit_label, "2-5");

        let bad = r#"{"records":[{"id":"r1","kind":"EXPENSE","amount":1,"occurred_on":"2024-01-10","owner_ref":"o1"}]}"#;
        assert!(LedgerSnapshot::from_json(bad).is_err());
    }
}
