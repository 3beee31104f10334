use std::borrow::Cow;

/// ESCO fee-group codes and the group names used in the fee table.
const FEE_GROUPS: &[(i64, &str)] = &[
    (1, "Standard"),
    (2, "Cartera Propia"),
    (3, "Grupo FCI"),
    (4, "Grupo 4 NA"),
    (5, "Grupo 5 IP"),
    (6, "Grupo 6 PM"),
    (7, "Grupo 7 PM Personal"),
    (8, "Grupo Contrapartes"),
    (9, "Grupo  Ctte 2020"),
    (10, "Grupo Ctte 2114"),
    (11, "Grupo Cartera Ppia ampliada"),
    (12, "Grupo Ctte 3321"),
    (13, "Grupo Standard Caucion 2.5"),
    (14, "Grupo Ctte 3484"),
    (15, "Grupo Ctte 2766"),
    (17, "Comitentes Corti"),
    (18, "Grupo 4% Caucion"),
    (19, "Grupo Cordoba"),
    (20, "Grupo Ctte 3633"),
    (21, "Grupo Ctte 2634"),
    (22, "Grupo 5% Caucion"),
    (23, "Grupo Op 0.25%"),
    (24, "Grupo 3500 2.25% caución"),
    (25, "Grupo 1.5% Caución"),
    (26, "Grupo Ctte 3732"),
];

pub fn fee_group_name(code: i64) -> Option<&'static str> {
    FEE_GROUPS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Group name for a code; unknown codes get a generic label instead of failing.
pub fn describe_fee_group(code: i64) -> Cow<'static, str> {
    match fee_group_name(code) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("Grupo código {}", code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(describe_fee_group(1), "Standard");
        assert_eq!(describe_fee_group(7), "Grupo 7 PM Personal");
        assert_eq!(describe_fee_group(9), "Grupo  Ctte 2020");
    }

    #[test]
    fn test_unknown_code_gets_generic_label() {
        assert_eq!(fee_group_name(16), None);
        assert_eq!(describe_fee_group(16), "Grupo código 16");
        assert_eq!(describe_fee_group(-3), "Grupo código -3");
    }
}
