use crate::error::{EstateLedgerError, Result};
use crate::schema::{LedgerSnapshot, MonetaryRecord, Owner, OwnerId, RecordId, RecordKind};
use crate::utils::parse_calendar_date;
use serde::{Deserialize, Serialize};

/// A transaction row as submitted by the admin forms: every field is text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransactionRow {
    pub id: String,
    pub kind: String,
    pub amount: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOwnerRow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit_number: Option<String>,
    #[serde(default)]
    pub monthly_dues: Option<String>,
}

/// Parses a whole amount in the smallest currency unit.
///
/// `"1300000"` and `"1300000.00"` are accepted; negative, fractional and
/// non-numeric values are not.
pub fn parse_amount(field: &'static str, value: &str) -> Result<u64> {
    let invalid = || EstateLedgerError::InvalidAmount {
        field,
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let whole = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return Err(invalid()),
        None => trimmed,
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    whole.parse::<u64>().map_err(|_| invalid())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn convert_transaction_row(row: &RawTransactionRow) -> Result<MonetaryRecord> {
    let kind: RecordKind = row.kind.parse()?;
    let amount = parse_amount("amount", &row.amount)?;
    let occurred_on = parse_calendar_date(&row.date)?;
    let owner_ref = non_empty(row.owner_id.as_deref()).map(OwnerId::from);

    if kind == RecordKind::Expense && owner_ref.is_some() {
        return Err(EstateLedgerError::ValidationError {
            entity: format!("transaction {}", row.id),
            details: "expense rows cannot reference an owner".to_string(),
        });
    }

    Ok(MonetaryRecord {
        id: RecordId::new(row.id.clone()),
        kind,
        amount,
        occurred_on,
        description: row.description.clone(),
        category: non_empty(row.category.as_deref()),
        owner_ref,
    })
}

/// Missing or blank dues mean the owner pays nothing.
pub fn convert_owner_row(row: &RawOwnerRow) -> Result<Owner> {
    let monthly_obligation = match non_empty(row.monthly_dues.as_deref()) {
        Some(dues) => parse_amount("monthly_dues", &dues)?,
        None => 0,
    };

    Ok(Owner {
        id: OwnerId::new(row.id.clone()),
        name: row.name.clone(),
        unit_label: row.unit_number.clone().unwrap_or_default(),
        monthly_obligation,
    })
}

pub fn convert_rows_to_snapshot(
    transactions: &[RawTransactionRow],
    owners: &[RawOwnerRow],
) -> Result<LedgerSnapshot> {
    let records = transactions
        .iter()
        .map(convert_transaction_row)
        .collect::<Result<Vec<_>>>()?;
    let owners = owners
        .iter()
        .map(convert_owner_row)
        .collect::<Result<Vec<_>>>()?;

    let snapshot = LedgerSnapshot::new(records, owners);
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: &str, kind: &str, amount: &str, date: &str) -> RawTransactionRow {
        RawTransactionRow {
            id: id.to_string(),
            kind: kind.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", "1300000").unwrap(), 1_300_000);
        assert_eq!(parse_amount("amount", " 500 ").unwrap(), 500);
        assert_eq!(parse_amount("amount", "1300000.00").unwrap(), 1_300_000);
        assert_eq!(parse_amount("amount", "0").unwrap(), 0);

        assert!(parse_amount("amount", "-5").is_err());
        assert!(parse_amount("amount", "12.5").is_err());
        assert!(parse_amount("amount", "").is_err());
        assert!(parse_amount("amount", ".0").is_err());
        assert!(parse_amount("amount", "1e6").is_err());
        assert!(parse_amount("amount", "1,000").is_err());
    }

    #[test]
    fn test_convert_income_with_owner() {
        let mut raw = row("t1", "INCOME", "1300000", "2024-01-10T00:00:00.000Z");
        raw.owner_id = Some("o1".to_string());
        raw.description = "January dues".to_string();

        let record = convert_transaction_row(&raw).unwrap();

        assert_eq!(record.kind, RecordKind::Income);
        assert_eq!(record.amount, 1_300_000);
        assert_eq!(record.occurred_on, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(record.owner_ref, Some(OwnerId::new("o1")));
        assert_eq!(record.description, "January dues");
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut raw = row("t2", "expense", "200", "2024-01-15");
        raw.category = Some("".to_string());
        raw.owner_id = Some("  ".to_string());

        let record = convert_transaction_row(&raw).unwrap();

        assert_eq!(record.kind, RecordKind::Expense);
        assert_eq!(record.category, None);
        assert_eq!(record.owner_ref, None);
    }

    #[test]
    fn test_expense_with_owner_rejected() {
        let mut raw = row("t3", "EXPENSE", "200", "2024-01-15");
        raw.owner_id = Some("o1".to_string());

        assert!(matches!(
            convert_transaction_row(&raw),
            Err(EstateLedgerError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_bad_rows_rejected() {
        assert!(matches!(
            convert_transaction_row(&row("x", "TRANSFER", "1", "2024-01-01")),
            Err(EstateLedgerError::InvalidRecordKind(_))
        ));
        assert!(matches!(
            convert_transaction_row(&row("x", "INCOME", "-1", "2024-01-01")),
            Err(EstateLedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            convert_transaction_row(&row("x", "INCOME", "1", "01/01/2024")),
            Err(EstateLedgerError::DateError(_))
        ));
    }

    #[test]
    fn test_owner_dues_default_to_zero() {
        let owner = convert_owner_row(&RawOwnerRow {
            id: "o1".to_string(),
            name: "Made".to_string(),
            unit_number: Some("2-5".to_string()),
            monthly_dues: None,
        })
        .unwrap();
        assert_eq!(owner.monthly_obligation, 0);
        assert_eq!(owner.unit_label, "2-5");

        let blank = convert_owner_row(&RawOwnerRow {
            id: "o2".to_string(),
            monthly_dues: Some(" ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(blank.monthly_obligation, 0);
        assert_eq!(blank.unit_label, "");

        let invalid = convert_owner_row(&RawOwnerRow {
            id: "o3".to_string(),
            monthly_dues: Some("lots".to_string()),
            ..Default::default()
        });
        assert!(invalid.is_err());
    }

    #[test]
    fn test_convert_rows_to_snapshot_validates() {
        let transactions = vec![
            row("t1", "INCOME", "500", "2024-01-10"),
            row("t1", "EXPENSE", "200", "2024-01-15"),
        ];
        assert!(convert_rows_to_snapshot(&transactions, &[]).is_err());

        let transactions = vec![
            row("t1", "INCOME", "500", "2024-01-10"),
            row("t2", "EXPENSE", "200", "2024-01-15"),
        ];
        let owners = vec![RawOwnerRow {
            id: "o1".to_string(),
            monthly_dues: Some("1000".to_string()),
            ..Default::default()
        }];
        let snapshot = convert_rows_to_snapshot(&transactions, &owners).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.owners[0].monthly_obligation, 1_000);
    }
}
