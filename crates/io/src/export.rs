//! Output shapes: summary rows for display and the flattened CSV export.

use serde::Serialize;

use liftboard_records::Record;

use crate::error::IoError;

/// Column headers of the summary table, in display order.
pub const SUMMARY_HEADERS: [&str; 9] = [
    "Class", "Lift", "Weight", "Name", "Division", "Testing", "Equipment", "Date", "Event",
];

/// Column headers of the filtered-records export.
pub const EXPORT_HEADERS: [&str; 13] = [
    "Full Name",
    "Weight",
    "Class",
    "Division",
    "Division Base",
    "Testing",
    "Lift",
    "Record Type",
    "Record Name",
    "Sex",
    "Equipment",
    "Date",
    "Location",
];

/// One row of the best-per-group table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub class: String,
    pub lift: String,
    pub weight: f64,
    pub name: String,
    pub division: String,
    pub testing: String,
    pub equipment: String,
    pub date: String,
    pub event: String,
}

impl From<&Record> for SummaryRow {
    fn from(r: &Record) -> Self {
        Self {
            class: r.weight_class.clone(),
            lift: r.lift.clone(),
            weight: r.weight,
            name: r.full_name.clone(),
            division: r.division_base.clone(),
            testing: r.testing_status.label().to_string(),
            equipment: r.equipment.clone(),
            date: r.date.clone(),
            event: r.event_location.clone(),
        }
    }
}

impl SummaryRow {
    /// Display strings, aligned with `SUMMARY_HEADERS`.
    pub fn cells(&self) -> [String; 9] {
        [
            self.class.clone(),
            self.lift.clone(),
            format_weight(self.weight),
            self.name.clone(),
            self.division.clone(),
            self.testing.clone(),
            self.equipment.clone(),
            self.date.clone(),
            self.event.clone(),
        ]
    }
}

pub fn summary_rows(records: &[&Record]) -> Vec<SummaryRow> {
    records.iter().map(|r| SummaryRow::from(*r)).collect()
}

/// `250.0` → `"250"`, `102.5` → `"102.5"`.
pub fn format_weight(weight: f64) -> String {
    format!("{weight}")
}

fn export_cells(r: &Record) -> [String; 13] {
    [
        r.full_name.clone(),
        format_weight(r.weight),
        r.weight_class.clone(),
        r.division_raw.clone(),
        r.division_base.clone(),
        r.testing_status.label().to_string(),
        r.lift.clone(),
        r.record_type.clone(),
        r.record_name.clone(),
        r.sex.clone(),
        r.equipment.clone(),
        r.date.clone(),
        r.event_location.clone(),
    ]
}

/// Flatten filtered records to CSV text (header + one line per record).
pub fn records_to_csv(records: &[&Record]) -> Result<String, IoError> {
    write_csv(&EXPORT_HEADERS, records.iter().map(|r| export_cells(r)))
}

pub fn summary_to_csv(rows: &[SummaryRow]) -> Result<String, IoError> {
    write_csv(&SUMMARY_HEADERS, rows.iter().map(SummaryRow::cells))
}

fn write_csv<const N: usize>(
    headers: &[&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<String, IoError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| IoError::Write(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| IoError::Write(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| IoError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IoError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftboard_records::TestingStatus;

    fn record() -> Record {
        Record {
            full_name: "Smith, June".into(),
            weight: 250.0,
            weight_class: "90".into(),
            division_raw: "JuniorDT".into(),
            division_base: "Junior".into(),
            testing_status: TestingStatus::Tested,
            lift: "Squat".into(),
            record_type: "Full Power".into(),
            record_name: "British".into(),
            sex: "F".into(),
            equipment: "Raw".into(),
            date: "2024-03-02".into(),
            event_location: "Leeds".into(),
        }
    }

    #[test]
    fn weight_formatting() {
        assert_eq!(format_weight(250.0), "250");
        assert_eq!(format_weight(102.5), "102.5");
    }

    #[test]
    fn summary_row_fields() {
        let r = record();
        let row = SummaryRow::from(&r);
        assert_eq!(
            row.cells(),
            ["90", "Squat", "250", "Smith, June", "Junior", "Tested", "Raw", "2024-03-02", "Leeds"]
                .map(String::from)
        );
    }

    #[test]
    fn export_quotes_and_headers() {
        let r = record();
        let csv = records_to_csv(&[&r]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Full Name,Weight,Class,Division,Division Base,Testing,Lift,Record Type,Record Name,Sex,Equipment,Date,Location"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"Smith, June\",250,90,JuniorDT,Junior,Tested,Squat,Full Power,British,F,Raw,2024-03-02,Leeds"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_export_has_header_only() {
        let csv = summary_to_csv(&[]).unwrap();
        assert_eq!(csv, "Class,Lift,Weight,Name,Division,Testing,Equipment,Date,Event\n");
    }
}
