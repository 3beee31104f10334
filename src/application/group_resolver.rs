//! Fee-group code lookup inside an ESCO account detail record.
//!
//! The record shape varies between API versions, so the code is searched for
//! anywhere in the JSON tree. Keys are compared lower-cased against two sets:
//! the operation-burse group (`codGrupoArOperBurs` and its spellings) and, only
//! when that is absent everywhere, the accrual group (`codGrupoArAcr`).

use serde_json::Value;
use tracing::debug;

const PRIMARY_GROUP_KEYS: &[&str] = &["codgrupoaroperburs", "cod_grupo_ar_oper_burs", "grupoaroperburs"];

const FALLBACK_GROUP_KEYS: &[&str] = &["codgrupoaracr", "cod_grupo_ar_acr", "grupoaracr"];

/// Which key set produced the group code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCodeSource {
    OperBurs,
    Accrual,
}

pub fn resolve_group_code(record: &Value) -> Option<i64> {
    locate_group_code(record).map(|(code, _)| code)
}

/// Primary match anywhere in the tree beats any fallback match.
pub fn locate_group_code(record: &Value) -> Option<(i64, GroupCodeSource)> {
    if let Some(code) = find_code(record, PRIMARY_GROUP_KEYS) {
        return Some((code, GroupCodeSource::OperBurs));
    }

    let code = find_code(record, FALLBACK_GROUP_KEYS)?;
    debug!("No OperBurs group code in account record, using accrual group {}", code);
    Some((code, GroupCodeSource::Accrual))
}

/// Depth-first, keys of an object are checked before its values are visited.
fn find_code(node: &Value, keys: &[&str]) -> Option<i64> {
    match node {
        Value::Object(map) => map
            .iter()
            .filter(|(k, _)| keys.contains(&k.to_lowercase().as_str()))
            .find_map(|(_, v)| as_group_code(v))
            .or_else(|| map.values().find_map(|v| find_code(v, keys))),
        Value::Array(items) => items.iter().find_map(|v| find_code(v, keys)),
        _ => None,
    }
}

fn as_group_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
