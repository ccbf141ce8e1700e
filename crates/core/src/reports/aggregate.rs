//! Generic group-by-and-sum over financial records.
//!
//! Every statistics and report view goes through [`aggregate`]. Results are
//! keyed in a `BTreeMap` so that iteration order, and therefore serialized
//! output, only depends on the input.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::error::ReportError;
use crate::records::FinancialRecord;

/// Groups records by `key_fn` and sums their amounts per key.
///
/// Keys with no records are absent from the result. An empty input yields an
/// empty map.
///
/// # Errors
///
/// Returns `ReportError::InvalidRecord` if any record has no amount and
/// `ReportError::AmountOverflow` if a total leaves the decimal range. No
/// partial result is returned.
pub fn aggregate<'a, R, K, I, F>(records: I, key_fn: F) -> Result<BTreeMap<K, Decimal>, ReportError>
where
    R: FinancialRecord + 'a,
    K: Ord,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&R) -> K,
{
    let mut totals = BTreeMap::new();
    for record in records {
        let amount = require_amount(record)?;
        let total = totals.entry(key_fn(record)).or_insert(Decimal::ZERO);
        *total = add(*total, amount, record)?;
    }
    Ok(totals)
}

/// Sums the amounts of all records.
///
/// # Errors
///
/// Returns `ReportError::InvalidRecord` if any record has no amount and
/// `ReportError::AmountOverflow` if the total leaves the decimal range.
pub fn sum_amounts<'a, R, I>(records: I) -> Result<Decimal, ReportError>
where
    R: FinancialRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records.into_iter().try_fold(Decimal::ZERO, |acc, record| {
        add(acc, require_amount(record)?, record)
    })
}

/// Counts records per key. Amounts are not inspected.
pub fn count_by<'a, R, K, I, F>(records: I, key_fn: F) -> BTreeMap<K, u64>
where
    R: 'a,
    K: Ord,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&R) -> K,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key_fn(record)).or_insert(0) += 1;
    }
    counts
}

fn add<R: FinancialRecord>(total: Decimal, amount: Decimal, record: &R) -> Result<Decimal, ReportError> {
    total
        .checked_add(amount)
        .ok_or(ReportError::AmountOverflow {
            record_id: record.record_id(),
        })
}

fn require_amount<R: FinancialRecord>(record: &R) -> Result<Decimal, ReportError> {
    record.amount().ok_or(ReportError::InvalidRecord {
        record_id: record.record_id(),
        field: "amount",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BudgetItemRecord, CostType};
    use buildcost_shared::types::{BudgetId, BudgetItemId, ProjectId};
    use rust_decimal_macros::dec;

    fn item(cost_type: CostType, amount: Option<Decimal>) -> BudgetItemRecord {
        BudgetItemRecord {
            id: BudgetItemId::new(),
            budget_id: BudgetId::new(),
            project_id: ProjectId::new(),
            cost_type,
            subcategory: "line".to_string(),
            amount,
        }
    }

    #[test]
    fn test_aggregate_empty_is_empty() {
        let records: Vec<BudgetItemRecord> = Vec::new();
        let totals = aggregate(&records, FinancialRecord::cost_type).unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn test_aggregate_groups_and_sums() {
        let records = vec![
            item(CostType::Labor, Some(dec!(100.50))),
            item(CostType::Material, Some(dec!(40))),
            item(CostType::Labor, Some(dec!(9.50))),
        ];
        let totals = aggregate(&records, FinancialRecord::cost_type).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&CostType::Labor], dec!(110.00));
        assert_eq!(totals[&CostType::Material], dec!(40));
    }

    #[test]
    fn test_missing_amount_fails_whole_aggregation() {
        let bad = item(CostType::Equipment, None);
        let bad_id = bad.id.into_inner();
        let records = vec![item(CostType::Labor, Some(dec!(1))), bad];

        assert_eq!(
            aggregate(&records, FinancialRecord::cost_type),
            Err(ReportError::InvalidRecord {
                record_id: bad_id,
                field: "amount",
            })
        );
        assert!(sum_amounts(&records).is_err());
    }

    #[test]
    fn test_sum_amounts() {
        let records = vec![
            item(CostType::Labor, Some(dec!(0.10))),
            item(CostType::Labor, Some(dec!(0.20))),
        ];
        assert_eq!(sum_amounts(&records).unwrap(), dec!(0.30));
        assert_eq!(sum_amounts::<BudgetItemRecord, _>(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let second = item(CostType::Labor, Some(Decimal::MAX));
        let second_id = second.id.into_inner();
        let records = vec![item(CostType::Labor, Some(Decimal::MAX)), second];

        assert_eq!(
            aggregate(&records, FinancialRecord::cost_type),
            Err(ReportError::AmountOverflow {
                record_id: second_id,
            })
        );
        assert_eq!(
            sum_amounts(&records),
            Err(ReportError::AmountOverflow {
                record_id: second_id,
            })
        );
    }

    #[test]
    fn test_count_by_ignores_amounts() {
        let records = vec![
            item(CostType::Labor, None),
            item(CostType::Labor, Some(dec!(5))),
            item(CostType::Other, None),
        ];
        let counts = count_by(&records, |r| r.cost_type);
        assert_eq!(counts[&CostType::Labor], 2);
        assert_eq!(counts[&CostType::Other], 1);
    }
}
