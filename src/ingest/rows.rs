use std::collections::{BTreeMap, HashMap};

use crate::grid::{CellValue, RawGrid, RawRow};
use crate::ingest::header::{ColumnMapping, Field};

#[derive(Debug, Clone)]
pub struct MappedRow {
    fields: HashMap<Field, CellValue>,
    extras: BTreeMap<String, CellValue>,
}

impl MappedRow {
    pub fn field(&self, field: Field) -> Option<&CellValue> {
        self.fields.get(&field)
    }

    pub fn extra(&self, key: &str) -> Option<&CellValue> {
        self.extras.get(key)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.extras.iter().map(|(key, cell)| (key.as_str(), cell))
    }
}

pub fn transform_rows(grid: &RawGrid, mapping: &ColumnMapping) -> Vec<MappedRow> {
    grid.rows
        .iter()
        .skip(mapping.header_row() + 1)
        .filter(|row| is_data_row(row, mapping))
        .map(|row| map_row(row, mapping))
        .collect()
}

fn is_data_row(row: &RawRow, mapping: &ColumnMapping) -> bool {
    let identity_present = [Field::FirstName, Field::LastName, Field::Station]
        .into_iter()
        .any(|field| {
            mapping
                .column(field)
                .and_then(|key| row.get(key))
                .map(|cell| !cell.is_empty())
                .unwrap_or(false)
        });
    if !identity_present {
        return false;
    }

    let first_name = mapping
        .column(Field::FirstName)
        .and_then(|key| row.get(key))
        .map(|cell| cell.to_text().to_lowercase())
        .unwrap_or_default();

    !first_name.contains("first")
}

fn map_row(row: &RawRow, mapping: &ColumnMapping) -> MappedRow {
    let mut fields = HashMap::new();
    let mut extras = BTreeMap::new();

    for (key, cell) in row {
        match mapping.field_for(key) {
            Some(field) => {
                fields.insert(field, cell.clone());
            }
            None => {
                extras.insert(key.clone(), cell.clone());
            }
        }
    }

    MappedRow { fields, extras }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::header::detect_header;

    fn letter_row(values: &[&str]) -> RawRow {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let key = char::from(b'A' + index as u8).to_string();
                (key, CellValue::from(*value))
            })
            .collect()
    }

    fn grid_with_rows(data_rows: &[&[&str]]) -> (RawGrid, ColumnMapping) {
        let mut rows = vec![letter_row(&[
            "Driver First Name",
            "Driver Last Name",
            "Station",
            "Total Trips",
        ])];
        rows.extend(data_rows.iter().map(|values| letter_row(values)));

        let grid = RawGrid::new(rows);
        let mapping = detect_header(&grid, "report.xlsx").unwrap();
        (grid, mapping)
    }

    #[test]
    fn rows_after_the_header_are_rekeyed_to_fields() {
        let (grid, mapping) = grid_with_rows(&[&["abc==", "def==", "DX7", "12"]]);

        let rows = transform_rows(&grid, &mapping);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].field(Field::FirstName),
            Some(&CellValue::from("abc=="))
        );
        assert_eq!(rows[0].field(Field::Station), Some(&CellValue::from("DX7")));
    }

    #[test]
    fn rows_without_any_identity_field_are_dropped() {
        let (grid, mapping) = grid_with_rows(&[
            &["", "", "", "99"],
            &["abc==", "", "", "12"],
        ]);

        let rows = transform_rows(&grid, &mapping);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn repeated_header_remnants_are_dropped() {
        let (grid, mapping) = grid_with_rows(&[
            &["Driver First Name", "Driver Last Name", "Station", "Total Trips"],
            &["abc==", "def==", "DX7", "12"],
        ]);

        let rows = transform_rows(&grid, &mapping);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].field(Field::FirstName),
            Some(&CellValue::from("abc=="))
        );
    }

    #[test]
    fn unclaimed_columns_are_kept_as_extras() {
        let mut rows = vec![letter_row(&[
            "Driver First Name",
            "Driver Last Name",
            "Station",
            "Total Trips",
            "Custom Column",
        ])];
        rows.push(letter_row(&["abc==", "def==", "DX7", "12", "extra"]));

        let grid = RawGrid::new(rows);
        let mapping = detect_header(&grid, "report.xlsx").unwrap();
        let mapped = transform_rows(&grid, &mapping);

        assert_eq!(mapped[0].extra("E"), Some(&CellValue::from("extra")));
    }
}
