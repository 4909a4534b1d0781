use crate::period::Period;
use crate::schema::{MonetaryRecord, Owner, OwnerId};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dues position of one owner for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuesStatus {
    pub owner_id: OwnerId,
    pub months_elapsed: u32,
    /// `monthly_obligation × months_elapsed`.
    pub expected: u64,
    pub paid: u64,
    /// Shortfall, never negative. Overpayment is not carried as credit.
    pub owed: u64,
}

impl DuesStatus {
    pub fn is_settled(&self) -> bool {
        self.owed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDuesLine {
    pub owner: Owner,
    pub status: DuesStatus,
    /// Payments bucketed by calendar month, January first.
    pub paid_by_month: [u64; 12],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrearsReport {
    pub period: Period,
    pub as_of: NaiveDate,
    /// One line per owner, in registry order.
    pub lines: Vec<OwnerDuesLine>,
    /// Column sums of `paid_by_month` across all owners.
    pub monthly_totals: [u64; 12],
    pub total_paid: u64,
    pub total_owed: u64,
    /// Dues income in the period whose owner is no longer in the registry.
    pub unattributed_paid: u64,
}

impl ArrearsReport {
    /// Owners with something outstanding, for the unpaid-dues panel.
    pub fn unpaid(&self) -> impl Iterator<Item = &OwnerDuesLine> {
        self.lines.iter().filter(|line| line.status.owed > 0)
    }

    pub fn line_for(&self, owner_id: &OwnerId) -> Option<&OwnerDuesLine> {
        self.lines.iter().find(|line| &line.owner.id == owner_id)
    }
}

/// Computes one owner's dues position.
///
/// `payments` is the owner's income for `period`, already selected by the
/// caller (see [`payments_for`]); every amount in it counts as paid.
pub fn reconcile<'r, I>(owner: &Owner, payments: I, period: &Period, today: NaiveDate) -> DuesStatus
where
    I: IntoIterator<Item = &'r MonetaryRecord>,
{
    let paid = payments
        .into_iter()
        .fold(0u64, |acc, payment| acc.saturating_add(payment.amount));

    let months_elapsed = period.months_elapsed(today);
    let expected = owner
        .monthly_obligation
        .saturating_mul(u64::from(months_elapsed));
    let owed = expected.saturating_sub(paid);

    DuesStatus {
        owner_id: owner.id.clone(),
        months_elapsed,
        expected,
        paid,
        owed,
    }
}

/// Income records attributed to `owner_id` and dated inside `period`.
pub fn payments_for<'r>(
    owner_id: &OwnerId,
    records: &'r [MonetaryRecord],
    period: &Period,
) -> Vec<&'r MonetaryRecord> {
    records
        .iter()
        .filter(|r| is_dues_payment(r, period) && r.owner_ref.as_ref() == Some(owner_id))
        .collect()
}

fn is_dues_payment(record: &MonetaryRecord, period: &Period) -> bool {
    record.is_income() && record.owner_ref.is_some() && period.contains(record.occurred_on)
}

fn bucket_by_month<'r, I>(payments: I) -> [u64; 12]
where
    I: IntoIterator<Item = &'r MonetaryRecord>,
{
    let mut buckets = [0u64; 12];
    for payment in payments {
        let slot = &mut buckets[payment.occurred_on.month0() as usize];
        *slot = slot.saturating_add(payment.amount);
    }
    buckets
}

/// Reconciles every owner in a registry against one set of ledger records.
pub struct DuesReconciler<'a> {
    owners: &'a [Owner],
    today: NaiveDate,
}

impl<'a> DuesReconciler<'a> {
    pub fn new(owners: &'a [Owner], today: NaiveDate) -> Self {
        Self { owners, today }
    }

    pub fn reconcile_all(&self, records: &[MonetaryRecord], period: &Period) -> ArrearsReport {
        let owner_index = self.index_owners();

        let mut payments_by_owner: Vec<Vec<&MonetaryRecord>> = vec![Vec::new(); self.owners.len()];
        let mut unattributed_paid = 0u64;

        for record in records.iter().filter(|r| is_dues_payment(r, period)) {
            let owner_slot = record
                .owner_ref
                .as_ref()
                .and_then(|owner_id| owner_index.get(owner_id));

            match owner_slot {
                Some(&idx) => payments_by_owner[idx].push(record),
                None => unattributed_paid = unattributed_paid.saturating_add(record.amount),
            }
        }

        let lines: Vec<OwnerDuesLine> = self
            .owners
            .iter()
            .zip(payments_by_owner)
            .map(|(owner, payments)| OwnerDuesLine {
                owner: owner.clone(),
                status: reconcile(owner, payments.iter().copied(), period, self.today),
                paid_by_month: bucket_by_month(payments.iter().copied()),
            })
            .collect();

        let mut monthly_totals = [0u64; 12];
        for line in &lines {
            for (total, paid) in monthly_totals.iter_mut().zip(line.paid_by_month) {
                *total = total.saturating_add(paid);
            }
        }

        let total_paid = lines
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.status.paid));
        let total_owed = lines
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.status.owed));

        if unattributed_paid > 0 {
            debug!(
                "{} of dues income in {} references owners missing from the registry",
                unattributed_paid, period
            );
        }
        debug!(
            "Reconciled {} owners for {} as of {}: paid {}, owed {}",
            lines.len(),
            period,
            self.today,
            total_paid,
            total_owed
        );

        ArrearsReport {
            period: *period,
            as_of: self.today,
            lines,
            monthly_totals,
            total_paid,
            total_owed,
            unattributed_paid,
        }
    }

    // First occurrence wins if an id repeats; LedgerSnapshot::validate rejects that case.
    fn index_owners(&self) -> HashMap<&'a OwnerId, usize> {
        let mut index = HashMap::with_capacity(self.owners.len());
        for (idx, owner) in self.owners.iter().enumerate() {
            index.entry(&owner.id).or_insert(idx);
        }
        index
    }
}

pub fn reconcile_all(
    owners: &[Owner],
    records: &[MonetaryRecord],
    period: &Period,
    today: NaiveDate,
) -> ArrearsReport {
    DuesReconciler::new(owners, today).reconcile_all(records, period)
}
