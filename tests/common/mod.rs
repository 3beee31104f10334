#![allow(dead_code)]

use aranceles::domain::fees::{REQUIRED_COLUMNS, TabularData};

pub const HEADER: &str = "Grupo de Arancel,Tipo de Operación (Abreviatura),Tipo de Operación (Descripción),Tipo de Especie,Moneda (Símbolo),Moneda (Descripción),Arancel (Porcentaje),Arancel (Mínimo),Arancel (Cobro en Moneda de la Aplicación),Está Anulado,Fecha de Vigencia";

/// A fee row in source column order.
pub fn fee(
    group: &str,
    op: &str,
    instrument: &str,
    currency: &str,
    pct: &str,
    voided: &str,
    date: &str,
) -> Vec<String> {
    let description = match op {
        "CV" => "Compra/Venta",
        "CAU" => "Caución",
        _ => "Otra",
    };
    let currency_desc = match currency {
        "ARS" => "Pesos",
        "USD" => "Dólar MEP",
        _ => "Otra",
    };
    [
        group,
        op,
        description,
        instrument,
        currency,
        currency_desc,
        pct,
        "100",
        "N",
        voided,
        date,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn fee_table(rows: Vec<Vec<String>>) -> TabularData {
    TabularData::new(REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// Fee schedule with history, voided rows and undated rows.
pub fn sample_table() -> TabularData {
    fee_table(vec![
        fee("Grupo X", "CV", "Acciones", "ARS", "0.6", "0", "2023-01-01"),
        fee("Grupo X", "CV", "Acciones", "ARS", "0.5", "0", "2024-06-15"),
        fee("Grupo X", "CV", "Bonos", "USD", "0.3", "1", "2024-01-01"),
        fee("Grupo X", "CV", "Bonos", "ARS", "0.25", "0", "2022-03-01"),
        fee("Grupo X", "CAU", "Cauciones", "ARS", "1.5", "0", "2024-02-01"),
        fee("Grupo 7 PM Personal", "CV", "Acciones", "ARS", "0.4", "0", "2024-01-01"),
        fee("Grupo 7 PM Personal", "CV", "Cedears", "ARS", "0.45", "0", "01/03/2024"),
        fee("Grupo 7 PM Personal", "CV", "Cedears", "USD", "0.45", "0", ""),
        fee("Standard", "CAU", "Cauciones", "ARS", "2.5", "0", "2024-01-01"),
    ])
}
