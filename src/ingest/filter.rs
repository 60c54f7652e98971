use crate::report::DriverRecord;

pub fn filter_valid(records: Vec<DriverRecord>) -> Vec<DriverRecord> {
    records.into_iter().filter(is_real_record).collect()
}

fn is_real_record(record: &DriverRecord) -> bool {
    let first = record.first_name_token.trim();
    let last = record.last_name_token.trim();

    if first.is_empty() && last.is_empty() {
        return false;
    }

    let first = first.to_lowercase();
    let last = last.to_lowercase();

    !(first.contains("first")
        || first.contains("last")
        || last.contains("first")
        || last.contains("last"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Hours, RiskMetrics, RiskRating};

    fn record(first: &str, last: &str) -> DriverRecord {
        DriverRecord {
            first_name_token: first.to_string(),
            last_name_token: last.to_string(),
            station: "DX7".to_string(),
            total_trips: 1.0,
            total_km: 1.0,
            total_hours: Hours::Decimal(1.0),
            overall_rating: String::new(),
            risk_metrics: RiskMetrics {
                acceleration: RiskRating::Unrated,
                braking: RiskRating::Unrated,
                cornering: RiskRating::Unrated,
                speeding: RiskRating::Unrated,
                seatbelt: RiskRating::Unrated,
                following: RiskRating::Unrated,
                distraction: RiskRating::Unrated,
            },
            matched: None,
        }
    }

    #[test]
    fn residual_header_tokens_are_dropped() {
        let records = vec![
            record("Driver First Name", "Driver Last Name"),
            record("FIRST", "x"),
            record("abc==", "def=="),
        ];

        let kept = filter_valid(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].first_name_token, "abc==");
    }

    #[test]
    fn records_with_both_tokens_empty_are_dropped() {
        let records = vec![record("", ""), record("abc==", "")];

        let kept = filter_valid(records);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let records = vec![
            record("tok1", ""),
            record("", "tok2"),
            record("Driver First Name", ""),
            record("tok3", "tok4"),
        ];

        let once = filter_valid(records);
        let tokens: Vec<&str> = once
            .iter()
            .map(|record| record.first_name_token.as_str())
            .collect();
        assert_eq!(tokens, ["tok1", "", "tok3"]);

        let twice = filter_valid(once.clone());
        assert_eq!(twice, once);
    }
}
