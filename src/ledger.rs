use crate::category::ExpenseCategory;
use crate::period::Period;
use crate::schema::MonetaryRecord;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type CategoryTotals = BTreeMap<ExpenseCategory, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub record: MonetaryRecord,
    /// Balance after this row, seeded by the carried-forward balance.
    pub running_balance: i64,
    /// Expense column for this row; `None` for income.
    pub category: Option<ExpenseCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerView {
    pub window_start: NaiveDate,
    /// Exclusive.
    pub window_end: NaiveDate,
    /// Net of everything dated before `window_start`.
    pub carried_forward: i64,
    pub rows: Vec<LedgerRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub opening_balance: i64,
    pub total_income: u64,
    pub total_expenses: u64,
    pub net: i64,
    pub closing_balance: i64,
}

/// Rebuilds the shared account for one half-open date window `[start, end)`.
pub struct LedgerAggregator {
    window_start: NaiveDate,
    window_end: NaiveDate,
}

impl LedgerAggregator {
    pub fn new(window_start: NaiveDate, window_end: NaiveDate) -> Self {
        Self {
            window_start,
            window_end,
        }
    }

    pub fn for_period(period: &Period) -> Self {
        let (start, end) = period.window();
        Self::new(start, end)
    }

    pub fn aggregate(&self, records: &[MonetaryRecord]) -> LedgerView {
        let carried_forward = self.carried_forward(records);

        let mut in_window: Vec<&MonetaryRecord> = records
            .iter()
            .filter(|r| self.window_start <= r.occurred_on && r.occurred_on < self.window_end)
            .collect();

        // Stable; the id tie-break keeps same-day rows independent of input order.
        in_window.sort_by(|a, b| {
            a.occurred_on
                .cmp(&b.occurred_on)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut balance = carried_forward;
        let rows: Vec<LedgerRow> = in_window
            .into_iter()
            .map(|record| {
                balance = balance.saturating_add(record.signed_amount());
                LedgerRow {
                    record: record.clone(),
                    running_balance: balance,
                    category: record
                        .is_expense()
                        .then(|| ExpenseCategory::classify(record.category.as_deref())),
                }
            })
            .collect();

        debug!(
            "Aggregated {} of {} records for window {}..{} (carried forward {})",
            rows.len(),
            records.len(),
            self.window_start,
            self.window_end,
            carried_forward
        );

        LedgerView {
            window_start: self.window_start,
            window_end: self.window_end,
            carried_forward,
            rows,
        }
    }

    // Bounded by both edges so a reversed window never pulls in later records.
    fn carried_forward(&self, records: &[MonetaryRecord]) -> i64 {
        let cutoff = self.window_start.min(self.window_end);
        records
            .iter()
            .filter(|r| r.occurred_on < cutoff)
            .fold(0i64, |acc, r| acc.saturating_add(r.signed_amount()))
    }
}

impl LedgerView {
    /// Running balance after the last row, or the carried-forward balance
    /// when the window is empty.
    pub fn closing_balance(&self) -> i64 {
        self.rows
            .last()
            .map(|row| row.running_balance)
            .unwrap_or(self.carried_forward)
    }

    pub fn total_income(&self) -> u64 {
        self.rows
            .iter()
            .filter(|row| row.record.is_income())
            .fold(0u64, |acc, row| acc.saturating_add(row.record.amount))
    }

    pub fn total_expenses(&self) -> u64 {
        self.rows
            .iter()
            .filter(|row| row.record.is_expense())
            .fold(0u64, |acc, row| acc.saturating_add(row.record.amount))
    }

    pub fn totals(&self) -> PeriodTotals {
        let total_income = self.total_income();
        let total_expenses = self.total_expenses();
        let net = self
            .rows
            .iter()
            .fold(0i64, |acc, row| acc.saturating_add(row.record.signed_amount()));

        PeriodTotals {
            opening_balance: self.carried_forward,
            total_income,
            total_expenses,
            net,
            closing_balance: self.closing_balance(),
        }
    }

    /// Expense totals per column. Every category is present, zero if unused.
    pub fn category_totals(&self) -> CategoryTotals {
        let mut totals: CategoryTotals = ExpenseCategory::ALL
            .into_iter()
            .map(|category| (category, 0))
            .collect();

        for row in &self.rows {
            if let Some(category) = row.category {
                let entry = totals.entry(category).or_default();
                *entry = entry.saturating_add(row.record.amount);
            }
        }

        totals
    }

    pub fn expense_rows(&self, category: ExpenseCategory) -> impl Iterator<Item = &LedgerRow> {
        self.rows
            .iter()
            .filter(move |row| row.category == Some(category))
    }
}

pub fn aggregate(
    records: &[MonetaryRecord],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> LedgerView {
    LedgerAggregator::new(window_start, window_end).aggregate(records)
}

pub fn aggregate_period(records: &[MonetaryRecord], period: &Period) -> LedgerView {
    LedgerAggregator::for_period(period).aggregate(records)
}
