//! # Estate Ledger
//!
//! Bookkeeping engine for a shared property account: it rebuilds the running
//! balance of the common income/expense ledger and works out how much each
//! unit owner is behind on their monthly dues.
//!
//! ## Core Concepts
//!
//! - **Carried-forward balance**: net of every record dated before the reporting window
//! - **Running balance**: the carried-forward balance plus each row in date order
//! - **Expense columns**: every expense falls in exactly one [`ExpenseCategory`], with
//!   `Miscellaneous` catching unlabelled or unknown ones
//! - **Elapsed months**: how many months of a period are due as of an explicit `today`
//! - **Arrears**: prorated obligation minus payments, never below zero
//!
//! Everything is recomputed from the inputs on each call. Nothing reads the
//! clock and nothing is cached.
//!
//! ## Example
//!
//! ```rust,ignore
//! use estate_ledger::*;
//! use chrono::NaiveDate;
//!
//! let snapshot = LedgerSnapshot::new(
//!     vec![
//!         MonetaryRecord::income("t1", 1_300_000, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
//!             .paid_by("villa-7"),
//!         MonetaryRecord::expense("t2", 250_000, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
//!             .with_category("Wages"),
//!     ],
//!     vec![Owner::new("villa-7", "7", 1_300_000)],
//! );
//!
//! let january: Period = "2024-01".parse()?;
//! let ledger = EstateLedgerProcessor::ledger(&snapshot, &january)?;
//! let arrears = EstateLedgerProcessor::arrears(
//!     &snapshot,
//!     &Period::year(2024)?,
//!     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//! )?;
//! ```

pub mod category;
pub mod dues;
pub mod error;
pub mod ingestion;
pub mod ledger;
pub mod period;
pub mod schema;
pub mod utils;

pub use category::ExpenseCategory;
pub use dues::{
    payments_for, reconcile, reconcile_all, ArrearsReport, DuesReconciler, DuesStatus,
    OwnerDuesLine,
};
pub use error::{EstateLedgerError, Result};
pub use ingestion::*;
pub use ledger::{
    aggregate, aggregate_period, CategoryTotals, LedgerAggregator, LedgerRow, LedgerView,
    PeriodTotals,
};
pub use period::{Period, PeriodKind};
pub use schema::*;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// What the dashboard shows for one period: ledger totals next to the owners
/// who still owe dues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub period: Period,
    pub totals: PeriodTotals,
    pub unpaid: Vec<OwnerDuesLine>,
    pub total_owed: u64,
}

pub struct EstateLedgerProcessor;

impl EstateLedgerProcessor {
    pub fn ledger(snapshot: &LedgerSnapshot, period: &Period) -> Result<LedgerView> {
        snapshot.validate()?;

        info!(
            "Building ledger for {} from {} records",
            period,
            snapshot.records.len()
        );

        let view = aggregate_period(&snapshot.records, period);

        debug!(
            "Ledger {} has {} rows, opening {}, closing {}",
            period,
            view.rows.len(),
            view.carried_forward,
            view.closing_balance()
        );

        Ok(view)
    }

    pub fn arrears(
        snapshot: &LedgerSnapshot,
        period: &Period,
        today: NaiveDate,
    ) -> Result<ArrearsReport> {
        snapshot.validate()?;

        info!(
            "Reconciling dues for {} owners over {} as of {}",
            snapshot.owners.len(),
            period,
            today
        );

        Ok(reconcile_all(&snapshot.owners, &snapshot.records, period, today))
    }

    pub fn dashboard(
        snapshot: &LedgerSnapshot,
        period: &Period,
        today: NaiveDate,
    ) -> Result<DashboardSummary> {
        let view = Self::ledger(snapshot, period)?;
        let report = Self::arrears(snapshot, period, today)?;

        let unpaid: Vec<OwnerDuesLine> = report.unpaid().cloned().collect();
        if !unpaid.is_empty() {
            debug!("{} owners have unpaid dues for {}", unpaid.len(), period);
        }

        Ok(DashboardSummary {
            period: *period,
            totals: view.totals(),
            unpaid,
            total_owed: report.total_owed,
        })
    }
}

pub fn ledger_for_period(snapshot: &LedgerSnapshot, period: &Period) -> Result<LedgerView> {
    EstateLedgerProcessor::ledger(snapshot, period)
}

pub fn arrears_for_period(
    snapshot: &LedgerSnapshot,
    period: &Period,
    today: NaiveDate,
) -> Result<ArrearsReport> {
    EstateLedgerProcessor::arrears(snapshot, period, today)
}

pub fn dashboard_summary(
    snapshot: &LedgerSnapshot,
    period: &Period,
    today: NaiveDate,
) -> Result<DashboardSummary> {
    EstateLedgerProcessor::dashboard(snapshot, period, today)
}
