use serde_json::Value;

use crate::grid::CellValue;
use crate::ingest::header::{ColumnMapping, Field};
use crate::ingest::rows::MappedRow;
use crate::report::{DriverRecord, Hours, RiskMetrics, RiskRating};

pub fn normalize_row(row: &MappedRow, mapping: &ColumnMapping) -> DriverRecord {
    DriverRecord {
        first_name_token: text_field(row, Field::FirstName),
        last_name_token: text_field(row, Field::LastName),
        station: normalize_station(&text_field(row, Field::Station)),
        total_trips: numeric_field(row, Field::TotalTrips),
        total_km: extract_distance(row, mapping),
        total_hours: normalize_hours(row.field(Field::TotalHours)),
        overall_rating: text_field(row, Field::OverallRating),
        risk_metrics: RiskMetrics {
            acceleration: risk_metric(row, Field::Acceleration),
            braking: risk_metric(row, Field::Braking),
            cornering: risk_metric(row, Field::Cornering),
            speeding: risk_metric(row, Field::Speeding),
            seatbelt: risk_metric(row, Field::Seatbelt),
            following: risk_metric(row, Field::FollowingDistance),
            distraction: risk_metric(row, Field::Distraction),
        },
        matched: None,
    }
}

fn text_field(row: &MappedRow, field: Field) -> String {
    row.field(field).map(CellValue::to_text).unwrap_or_default()
}

fn numeric_field(row: &MappedRow, field: Field) -> f64 {
    row.field(field).map(clean_numeric).unwrap_or(0.0)
}

fn normalize_station(station: &str) -> String {
    if station.to_lowercase().contains("unassigned") {
        "UNASSIGNED".to_string()
    } else {
        station.to_string()
    }
}

pub fn clean_numeric(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Null => 0.0,
        CellValue::Number(number) => *number,
        CellValue::Text(text) => clean_numeric_text(text),
        CellValue::Structured(_) => 0.0,
    }
}

fn clean_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }

    let kept: String = trimmed
        .chars()
        .filter(|character| character.is_ascii_digit() || matches!(character, '.' | ',' | '-'))
        .collect();

    kept.replace(',', ".").parse().unwrap_or(0.0)
}

pub fn normalize_hours(cell: Option<&CellValue>) -> Hours {
    match cell {
        Some(CellValue::Text(text)) if text.contains(':') => Hours::Clock(text.trim().to_string()),
        Some(value) => Hours::Decimal(clean_numeric(value)),
        None => Hours::Decimal(0.0),
    }
}

const MILES_TO_KM: f64 = 1.60934;

type DistanceSource = fn(&MappedRow, &ColumnMapping) -> Option<f64>;

const DISTANCE_SOURCES: [DistanceSource; 4] = [
    mapped_kilometers,
    converted_miles,
    positional_kilometers,
    scanned_kilometers,
];

pub fn extract_distance(row: &MappedRow, mapping: &ColumnMapping) -> f64 {
    DISTANCE_SOURCES
        .iter()
        .find_map(|source| source(row, mapping))
        .unwrap_or(0.0)
}

fn mapped_kilometers(row: &MappedRow, _mapping: &ColumnMapping) -> Option<f64> {
    let cell = row.field(Field::TotalKm)?;
    if cell.is_empty() {
        return None;
    }
    Some(clean_numeric(cell))
}

fn converted_miles(row: &MappedRow, mapping: &ColumnMapping) -> Option<f64> {
    for (key, cell) in row.extras() {
        let label = mapping.label(key).unwrap_or(key);
        if !label.to_lowercase().contains("mile") {
            continue;
        }

        let miles = clean_numeric(cell);
        if miles != 0.0 {
            return Some(miles * MILES_TO_KM);
        }
    }

    None
}

fn positional_kilometers(row: &MappedRow, _mapping: &ColumnMapping) -> Option<f64> {
    let letter = Field::TotalKm.letter_fallback()?;
    let value = clean_numeric(row.extra(letter)?);
    (value != 0.0).then_some(value)
}

fn scanned_kilometers(row: &MappedRow, mapping: &ColumnMapping) -> Option<f64> {
    for (key, cell) in row.extras() {
        let label = mapping.label(key).unwrap_or(key).to_lowercase();
        if !(label.contains("km") || label.contains("kilometer") || label.contains("distance")) {
            continue;
        }

        let value = clean_numeric(cell);
        if value != 0.0 {
            return Some(value);
        }
    }

    None
}

fn risk_metric(row: &MappedRow, field: Field) -> RiskRating {
    let mapped = row.field(field).filter(|cell| !cell.is_empty());
    let cell = mapped.or_else(|| {
        field
            .letter_fallback()
            .and_then(|letter| row.extra(letter))
    });

    normalize_risk(cell)
}

pub fn normalize_risk(cell: Option<&CellValue>) -> RiskRating {
    match cell {
        None | Some(CellValue::Null) => RiskRating::Unrated,
        Some(CellValue::Number(number)) => bucket_numeric(*number),
        Some(CellValue::Text(text)) => bucket_text(text),
        Some(CellValue::Structured(map)) => bucket_structured(map),
    }
}

fn bucket_numeric(value: f64) -> RiskRating {
    if value <= 0.0 {
        RiskRating::Unrated
    } else if value <= 3.0 {
        RiskRating::Low
    } else if value <= 5.0 {
        RiskRating::Medium
    } else {
        RiskRating::High
    }
}

fn bucket_text(text: &str) -> RiskRating {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return RiskRating::Unrated;
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        return bucket_numeric(value);
    }

    let lowered = trimmed.to_lowercase();

    if lowered == "yes" || lowered == "ja" {
        return RiskRating::High;
    }
    if lowered == "no" || lowered == "nein" {
        return RiskRating::Low;
    }

    if lowered.contains("low") || lowered.contains("niedrig") {
        return RiskRating::Low;
    }
    if lowered.contains("med") || lowered.contains("mittel") {
        return RiskRating::Medium;
    }
    if lowered.contains("high") || lowered.contains("hoch") {
        return RiskRating::High;
    }

    RiskRating::Other(trimmed.to_string())
}

fn bucket_structured(map: &serde_json::Map<String, Value>) -> RiskRating {
    for probe in ["text", "value", "result"] {
        match map.get(probe) {
            Some(Value::String(text)) => return bucket_text(text),
            Some(Value::Number(number)) => {
                if let Some(value) = number.as_f64() {
                    return bucket_numeric(value);
                }
            }
            _ => {}
        }
    }

    let dump = Value::Object(map.clone()).to_string();
    let lowered = dump.to_lowercase();
    if lowered.contains("low") {
        return RiskRating::Low;
    }
    if lowered.contains("medium") {
        return RiskRating::Medium;
    }
    if lowered.contains("high") {
        return RiskRating::High;
    }

    RiskRating::Other(dump)
}
