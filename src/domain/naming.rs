use crate::domain::model::OutputRecord;

/// Danish display names: "black" -> "sort", "Black" -> "Sort". Case-sensitive on purpose.
pub fn normalize_name(name: &str) -> String {
    name.replace("black", "sort").replace("Black", "Sort")
}

pub fn normalize_names(records: &mut [OutputRecord]) {
    for record in records.iter_mut() {
        record.name = normalize_name(&record.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Money;
    use rust_decimal::Decimal;

    #[test]
    fn test_normalize_name() {
        assert_eq!(
            normalize_name("Chair Black edition black trim"),
            "Chair Sort edition sort trim"
        );
        assert_eq!(normalize_name("blackblack"), "sortsort");
    }

    #[test]
    fn test_other_casings_are_untouched() {
        assert_eq!(normalize_name("BLACK bLack"), "BLACK bLack");
        assert_eq!(normalize_name("White table"), "White table");
    }

    #[test]
    fn test_normalize_name_is_idempotent() {
        for name in ["Black", "blackened Blackboard", "", "sort", "Lamp BLACK/black"] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_normalize_names_updates_batch() {
        let mut records = vec![OutputRecord {
            item_code: "A1".to_string(),
            name: "Black lamp".to_string(),
            cost: Money::new(Decimal::ONE, "DKK"),
            sale_price: Money::new(Decimal::ONE, "DKK"),
        }];
        normalize_names(&mut records);
        assert_eq!(records[0].name, "Sort lamp");
        assert_eq!(records[0].item_code, "A1");
    }
}
