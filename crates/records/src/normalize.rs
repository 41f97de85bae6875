use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::debug;

use crate::model::{is_artefact_class, map_lift, split_division, RawRow, Record};

/// Source column names (after header trimming).
pub mod columns {
    pub const FULL_NAME: &str = "Full Name";
    pub const WEIGHT: &str = "Weight";
    pub const CLASS: &str = "Class";
    pub const DIVISION: &str = "Division";
    pub const LIFT: &str = "Lift";
    pub const RECORD_TYPE: &str = "Record Type";
    pub const RECORD_NAME: &str = "Record Name";
    pub const SEX: &str = "Sex";
    pub const EQUIPMENT: &str = "Equipment";
    pub const DATE: &str = "Date";
    pub const LOCATION: &str = "Location";
    /// Older exports label the location column `Event`.
    pub const EVENT: &str = "Event";

    /// Columns without which no row can survive normalization.
    pub const REQUIRED: [&str; 3] = [FULL_NAME, WEIGHT, CLASS];
}

/// Normalize raw rows into records, silently dropping invalid ones.
pub fn normalize(raw_rows: &[RawRow]) -> Vec<Record> {
    let mut records = Vec::with_capacity(raw_rows.len());
    for row in raw_rows {
        if let Some(record) = normalize_row(row) {
            records.push(record);
        }
    }

    let dropped = raw_rows.len() - records.len();
    if dropped > 0 {
        debug!("normalize: kept {} rows, dropped {dropped}", records.len());
    }
    records
}

/// Normalize one row. `None` means the row is noise (no name, no numeric
/// weight, or an artefact weight class).
pub fn normalize_row(row: &RawRow) -> Option<Record> {
    let fields = TrimmedRow::new(row);

    let full_name = fields.get(columns::FULL_NAME);
    if full_name.is_empty() {
        return None;
    }

    let weight = parse_weight(fields.get(columns::WEIGHT))?;

    let weight_class = fields.get(columns::CLASS);
    if is_artefact_class(weight_class) {
        return None;
    }

    let division_raw = fields.get(columns::DIVISION);
    let (division_base, testing_status) = split_division(division_raw);

    let event_location = match fields.lookup(columns::LOCATION) {
        Some(v) => v,
        None => fields.get(columns::EVENT),
    };

    Some(Record {
        full_name: full_name.to_string(),
        weight,
        weight_class: weight_class.to_string(),
        division_raw: division_raw.to_string(),
        division_base,
        testing_status,
        lift: map_lift(fields.get(columns::LIFT)),
        record_type: fields.get(columns::RECORD_TYPE).to_string(),
        record_name: fields.get(columns::RECORD_NAME).to_string(),
        sex: fields.get(columns::SEX).to_string(),
        equipment: fields.get(columns::EQUIPMENT).to_string(),
        date: fields.get(columns::DATE).to_string(),
        event_location: event_location.to_string(),
    })
}

fn parse_weight(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Row view with trimmed column names and trimmed values.
///
/// When several raw keys trim to the same name, the one already trimmed wins,
/// then the smallest raw key.
struct TrimmedRow<'a> {
    fields: HashMap<&'a str, (&'a str, &'a str)>,
}

impl<'a> TrimmedRow<'a> {
    fn new(row: &'a RawRow) -> Self {
        let mut fields: HashMap<&'a str, (&'a str, &'a str)> = HashMap::with_capacity(row.len());
        for (raw_key, value) in row {
            let key = raw_key.trim();
            let rank = |raw: &str| (raw != key, raw.to_string());
            match fields.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert((raw_key.as_str(), value.trim()));
                }
                Entry::Occupied(mut slot) => {
                    if rank(raw_key) < rank(slot.get().0) {
                        slot.insert((raw_key.as_str(), value.trim()));
                    }
                }
            }
        }
        Self { fields }
    }

    fn lookup(&self, column: &str) -> Option<&'a str> {
        self.fields.get(column).map(|&(_, value)| value)
    }

    /// Cell value, or empty string when the column is absent.
    fn get(&self, column: &str) -> &'a str {
        self.lookup(column).unwrap_or("")
    }
}
