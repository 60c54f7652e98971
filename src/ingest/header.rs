use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::error::IngestError;
use crate::grid::{RawGrid, RawRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Station,
    TotalTrips,
    TotalKm,
    TotalHours,
    OverallRating,
    Acceleration,
    Braking,
    Cornering,
    Speeding,
    Seatbelt,
    FollowingDistance,
    Distraction,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::FirstName,
        Field::LastName,
        Field::Station,
        Field::TotalTrips,
        Field::TotalKm,
        Field::TotalHours,
        Field::OverallRating,
        Field::Acceleration,
        Field::Braking,
        Field::Cornering,
        Field::Speeding,
        Field::Seatbelt,
        Field::FollowingDistance,
        Field::Distraction,
    ];

    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::FirstName => &["driver first name", "first name", "firstname"],
            Field::LastName => &["driver last name", "last name", "lastname"],
            Field::Station => &["station", "depot"],
            Field::TotalTrips => &["total trips", "trips"],
            Field::TotalKm => &[
                "total driver km",
                "total km",
                "total kilometers",
                "total distance",
            ],
            Field::TotalHours => &["total hours", "total drive time", "hours"],
            Field::OverallRating => &["overall rating", "overall score", "overall"],
            Field::Acceleration => &["acceleration", "accel"],
            Field::Braking => &["braking", "brake"],
            Field::Cornering => &["cornering"],
            Field::Speeding => &["speeding", "speed"],
            Field::Seatbelt => &["seatbelt", "seat belt"],
            Field::FollowingDistance => &["following distance", "following", "tailgating"],
            Field::Distraction => &["distraction", "phone usage"],
        }
    }

    pub fn letter_fallback(self) -> Option<&'static str> {
        match self {
            Field::FirstName => Some("A"),
            Field::LastName => Some("B"),
            Field::OverallRating => Some("C"),
            Field::Station => Some("D"),
            Field::TotalTrips => Some("E"),
            Field::TotalKm => Some("F"),
            Field::TotalHours => Some("G"),
            Field::Acceleration => Some("H"),
            Field::Braking => Some("I"),
            Field::Cornering => Some("J"),
            Field::Speeding => Some("K"),
            Field::Seatbelt => Some("L"),
            Field::FollowingDistance => Some("M"),
            Field::Distraction => Some("N"),
        }
    }
}

const MAPPER_FALLBACK_FIELDS: [Field; 6] = [
    Field::FirstName,
    Field::LastName,
    Field::Station,
    Field::TotalTrips,
    Field::TotalHours,
    Field::OverallRating,
];

#[derive(Debug, Clone)]
pub struct ColumnMapping {
    header_row: usize,
    columns: HashMap<Field, String>,
    reverse: HashMap<String, Field>,
    labels: BTreeMap<String, String>,
}

impl ColumnMapping {
    pub fn header_row(&self) -> usize {
        self.header_row
    }

    pub fn column(&self, field: Field) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn field_for(&self, key: &str) -> Option<Field> {
        self.reverse.get(key).copied()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn mapped_count(&self) -> usize {
        self.columns.len()
    }
}

pub fn detect_header(grid: &RawGrid, file_name: &str) -> Result<ColumnMapping, IngestError> {
    for (index, row) in grid.rows.iter().enumerate() {
        if !is_header_row(row) {
            continue;
        }

        let mapping = build_mapping(index, row);
        debug!(
            file = %file_name,
            header_row = index,
            mapped = mapping.mapped_count(),
            "header row located"
        );
        return Ok(mapping);
    }

    Err(IngestError::MissingHeader {
        file_name: file_name.to_string(),
        rows_scanned: grid.rows.len(),
    })
}

fn is_header_row(row: &RawRow) -> bool {
    let labels: Vec<String> = row
        .values()
        .map(|cell| normalize_label(&cell.to_text()))
        .collect();

    let field_present = |field: Field| {
        labels.iter().any(|label| {
            field
                .synonyms()
                .iter()
                .any(|synonym| label.contains(synonym))
        })
    };

    if field_present(Field::FirstName) {
        return true;
    }

    Field::ALL
        .into_iter()
        .filter(|field| field_present(*field))
        .count()
        >= 3
}

fn build_mapping(header_row: usize, row: &RawRow) -> ColumnMapping {
    let labels: BTreeMap<String, String> = row
        .iter()
        .map(|(key, cell)| (key.clone(), normalize_label(&cell.to_text())))
        .collect();

    let mut columns: HashMap<Field, String> = HashMap::new();
    let mut claimed: HashSet<&str> = HashSet::new();

    for field in Field::ALL {
        'synonyms: for synonym in field.synonyms() {
            for (key, label) in &labels {
                if label.is_empty() || claimed.contains(key.as_str()) {
                    continue;
                }
                if label.contains(synonym) {
                    columns.insert(field, key.clone());
                    claimed.insert(key.as_str());
                    break 'synonyms;
                }
            }
        }
    }

    for field in MAPPER_FALLBACK_FIELDS {
        if columns.contains_key(&field) {
            continue;
        }
        let Some(letter) = field.letter_fallback() else {
            continue;
        };
        if row.contains_key(letter) && !claimed.contains(letter) {
            columns.insert(field, letter.to_string());
            claimed.insert(letter);
        }
    }

    let reverse = columns
        .iter()
        .map(|(field, key)| (key.clone(), *field))
        .collect();

    ColumnMapping {
        header_row,
        columns,
        reverse,
        labels,
    }
}

fn normalize_label(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
