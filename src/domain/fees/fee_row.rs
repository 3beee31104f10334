use super::table::{TableRow, TabularData};
use crate::domain::errors::FeeTableError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

// ===== Column names =====

pub const COL_FEE_GROUP: &str = "Grupo de Arancel";
pub const COL_OPERATION_ABBR: &str = "Tipo de Operación (Abreviatura)";
pub const COL_OPERATION_DESC: &str = "Tipo de Operación (Descripción)";
pub const COL_INSTRUMENT_TYPE: &str = "Tipo de Especie";
pub const COL_CURRENCY_SYMBOL: &str = "Moneda (Símbolo)";
pub const COL_CURRENCY_DESC: &str = "Moneda (Descripción)";
pub const COL_FEE_PERCENTAGE: &str = "Arancel (Porcentaje)";
pub const COL_FEE_MINIMUM: &str = "Arancel (Mínimo)";
pub const COL_FEE_CHARGE_CURRENCY: &str = "Arancel (Cobro en Moneda de la Aplicación)";
pub const COL_IS_VOIDED: &str = "Está Anulado";
pub const COL_EFFECTIVE_DATE: &str = "Fecha de Vigencia";

/// Columns every fee table must carry, in source order.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    COL_FEE_GROUP,
    COL_OPERATION_ABBR,
    COL_OPERATION_DESC,
    COL_INSTRUMENT_TYPE,
    COL_CURRENCY_SYMBOL,
    COL_CURRENCY_DESC,
    COL_FEE_PERCENTAGE,
    COL_FEE_MINIMUM,
    COL_FEE_CHARGE_CURRENCY,
    COL_IS_VOIDED,
    COL_EFFECTIVE_DATE,
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

// ===== Types =====

/// Composite key of a fee entry. Only unique inside a [`super::LatestFeeView`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeeKey {
    pub fee_group: String,
    pub operation_abbreviation: String,
    pub instrument_type: String,
    pub currency_symbol: String,
}

/// One historical fee entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeRow {
    pub fee_group: String,
    pub operation_abbreviation: String,
    pub operation_description: String,
    pub instrument_type: String,
    pub currency_symbol: String,
    pub currency_description: String,
    pub fee_percentage: Option<Decimal>,
    pub fee_minimum: Option<Decimal>,
    pub fee_charge_currency: String,
    pub is_voided: bool,
    pub effective_date: NaiveDateTime,
}

impl FeeRow {
    pub fn key(&self) -> FeeKey {
        FeeKey {
            fee_group: self.fee_group.clone(),
            operation_abbreviation: self.operation_abbreviation.clone(),
            instrument_type: self.instrument_type.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }

    pub fn matches(&self, group: &str, op_abbr: &str, instrument_type: &str, currency: &str) -> bool {
        self.fee_group == group
            && self.operation_abbreviation == op_abbr
            && self.instrument_type == instrument_type
            && self.currency_symbol == currency
    }

    /// Effective date as `YYYY-MM-DD`.
    pub fn effective_date_iso(&self) -> String {
        self.effective_date.date().format("%Y-%m-%d").to_string()
    }
}

/// Why a raw row never reaches the latest view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    Voided,
    Undated,
}

/// Positions of the required columns inside a [`TabularData`].
#[derive(Debug, Clone, Copy)]
pub struct FeeColumns {
    idx: [usize; 11],
}

impl FeeColumns {
    pub fn resolve(table: &TabularData) -> Result<Self, FeeTableError> {
        let mut idx = [0usize; 11];
        let mut missing = Vec::new();

        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            match table.column_index(name) {
                Some(i) => idx[slot] = i,
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(FeeTableError::Schema { missing });
        }
        Ok(Self { idx })
    }

    /// Parse one raw row, rejecting voided rows first and undated rows second.
    pub fn parse_row(&self, row: TableRow<'_>) -> Result<FeeRow, RowRejection> {
        let cell = |slot: usize| row.cell(self.idx[slot]);

        if parse_voided_flag(cell(9)) != 0 {
            return Err(RowRejection::Voided);
        }
        let effective_date = parse_effective_date(cell(10)).ok_or(RowRejection::Undated)?;

        Ok(FeeRow {
            fee_group: cell(0).to_string(),
            operation_abbreviation: cell(1).to_string(),
            operation_description: cell(2).to_string(),
            instrument_type: cell(3).to_string(),
            currency_symbol: cell(4).to_string(),
            currency_description: cell(5).to_string(),
            fee_percentage: parse_decimal_cell(cell(6)),
            fee_minimum: parse_decimal_cell(cell(7)),
            fee_charge_currency: cell(8).to_string(),
            is_voided: false,
            effective_date,
        })
    }
}

// ===== Cell coercion =====

/// Numeric coercion of the voided flag: integer part of any number, 0 otherwise.
pub fn parse_voided_flag(raw: &str) -> i64 {
    let value = raw.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        })
        .unwrap_or(0)
}

/// Slash and dash dates with the year last are read day-first (`01/03/2024` is
/// 1 March), unlike pandas' month-first default; fee tables come from es-AR exports.
pub fn parse_effective_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn parse_decimal_cell(raw: &str) -> Option<Decimal> {
    let value = raw.trim().trim_end_matches('%').trim_end();
    if value.is_empty() {
        return None;
    }

    // "0,25" from es-AR exports
    let normalized = if value.contains(',') && !value.contains('.') {
        value.replace(',', ".")
    } else {
        value.to_string()
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}
