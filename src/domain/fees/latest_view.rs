use super::fee_row::{FeeColumns, FeeKey, FeeRow, RowRejection};
use super::table::TabularData;
use crate::domain::errors::FeeTableError;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// An operation type available to a fee group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    pub abbreviation: String,
    pub description: String,
}

/// One row per [`FeeKey`]: the non-voided, dated row with the latest
/// effective date. Ties on the date keep the row that came first in the
/// source table.
///
/// Rows are held in presentation order (group, operation description,
/// instrument type, currency). The view is immutable; a reload builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestFeeView {
    rows: Vec<FeeRow>,
}

impl LatestFeeView {
    pub fn build(raw: &TabularData) -> Result<Self, FeeTableError> {
        let columns = FeeColumns::resolve(raw)?;

        let mut latest: HashMap<FeeKey, FeeRow> = HashMap::new();
        let mut voided = 0usize;
        let mut undated = 0usize;

        for record in raw.rows() {
            let row = match columns.parse_row(record) {
                Ok(row) => row,
                Err(RowRejection::Voided) => {
                    voided += 1;
                    continue;
                }
                Err(RowRejection::Undated) => {
                    undated += 1;
                    continue;
                }
            };

            match latest.entry(row.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(mut slot) => {
                    // Strictly later only: equal dates keep the first row seen
                    if row.effective_date > slot.get().effective_date {
                        slot.insert(row);
                    }
                }
            }
        }

        let mut rows: Vec<FeeRow> = latest.into_values().collect();
        rows.sort_by(|a, b| {
            (
                &a.fee_group,
                &a.operation_description,
                &a.instrument_type,
                &a.currency_symbol,
                &a.operation_abbreviation,
            )
                .cmp(&(
                    &b.fee_group,
                    &b.operation_description,
                    &b.instrument_type,
                    &b.currency_symbol,
                    &b.operation_abbreviation,
                ))
        });

        debug!(
            "Latest fee view built: {} raw rows, {} voided, {} undated, {} keys",
            raw.len(),
            voided,
            undated,
            rows.len()
        );

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeeRow> {
        self.rows.iter()
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.rows.iter().any(|r| r.fee_group == group)
    }

    /// Distinct fee groups, sorted.
    pub fn groups(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.fee_group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn for_operation<'a, 'k>(
        &'a self,
        group: &'k str,
        op_abbr: &'k str,
    ) -> impl Iterator<Item = &'a FeeRow> + use<'a, 'k> {
        self.rows
            .iter()
            .filter(move |r| r.fee_group == group && r.operation_abbreviation == op_abbr)
    }

    /// Distinct operations of a group, sorted by description.
    pub fn list_operations(&self, group: &str) -> Vec<Operation> {
        let pairs: BTreeSet<(&str, &str)> = self
            .rows
            .iter()
            .filter(|r| r.fee_group == group)
            .map(|r| (r.operation_description.as_str(), r.operation_abbreviation.as_str()))
            .collect();

        pairs
            .into_iter()
            .map(|(description, abbreviation)| Operation {
                abbreviation: abbreviation.to_string(),
                description: description.to_string(),
            })
            .collect()
    }

    pub fn list_instrument_types(&self, group: &str, op_abbr: &str) -> Vec<String> {
        sorted_non_empty(self.for_operation(group, op_abbr).map(|r| r.instrument_type.as_str()))
    }

    /// Currencies offered for an operation before the instrument type is chosen.
    pub fn list_currencies_for_operation(&self, group: &str, op_abbr: &str) -> Vec<String> {
        sorted_non_empty(self.for_operation(group, op_abbr).map(|r| r.currency_symbol.as_str()))
    }

    pub fn list_currencies(&self, group: &str, op_abbr: &str, instrument_type: &str) -> Vec<String> {
        sorted_non_empty(
            self.for_operation(group, op_abbr)
                .filter(|r| r.instrument_type == instrument_type)
                .map(|r| r.currency_symbol.as_str()),
        )
    }

    pub fn find_fee(
        &self,
        group: &str,
        op_abbr: &str,
        instrument_type: &str,
        currency: &str,
    ) -> Option<&FeeRow> {
        self.rows
            .iter()
            .find(|r| r.matches(group, op_abbr, instrument_type, currency))
    }

    /// Current fee of every instrument type for (group, operation, currency),
    /// sorted by instrument type. Empty when nothing matches.
    pub fn list_fees_by_currency(&self, group: &str, op_abbr: &str, currency: &str) -> Vec<&FeeRow> {
        let mut fees: Vec<&FeeRow> = self
            .for_operation(group, op_abbr)
            .filter(|r| r.currency_symbol == currency)
            .collect();
        fees.sort_by(|a, b| a.instrument_type.cmp(&b.instrument_type));
        fees
    }
}

fn sorted_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
