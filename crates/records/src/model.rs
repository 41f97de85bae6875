use std::collections::HashMap;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Weight-class values that are spreadsheet artefacts, not real classes.
pub const INVALID_WEIGHT_CLASSES: [&str; 5] = ["736", "737", "738", "739", "cell"];

/// Canonical lift labels in display order.
pub const LIFT_ORDER: [&str; 4] = ["Squat", "Bench", "Deadlift", "Total"];

/// Division suffix marking a drug-tested division (`JuniorDT`).
pub const TESTED_SUFFIX: &str = "DT";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One source row before normalization: column name → cell text.
pub type RawRow = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestingStatus {
    Tested,
    #[default]
    Untested,
}

impl TestingStatus {
    /// Tested iff the raw division ends with `DT`.
    pub fn from_division(raw: &str) -> Self {
        if raw.ends_with(TESTED_SUFFIX) {
            Self::Tested
        } else {
            Self::Untested
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tested => "Tested",
            Self::Untested => "Untested",
        }
    }
}

impl std::fmt::Display for TestingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestingStatus {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tested" | "dt" => Ok(Self::Tested),
            "untested" | "ut" => Ok(Self::Untested),
            _ => Err(SelectionError::UnknownTestingStatus(s.to_string())),
        }
    }
}

/// A normalized competition record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub full_name: String,
    pub weight: f64,
    pub weight_class: String,
    pub division_raw: String,
    pub division_base: String,
    pub testing_status: TestingStatus,
    pub lift: String,
    pub record_type: String,
    pub record_name: String,
    pub sex: String,
    pub equipment: String,
    pub date: String,
    pub event_location: String,
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Map a lift code (`S`, `B`, `D`, `T`, `Total`) to its label.
/// Unknown codes pass through unchanged.
pub fn map_lift(code: &str) -> String {
    match code {
        "S" => "Squat",
        "B" => "Bench",
        "D" => "Deadlift",
        "T" | "Total" => "Total",
        other => other,
    }
    .to_string()
}

/// Position of a lift label in `LIFT_ORDER`; unknown labels rank last.
pub fn lift_rank(lift: &str) -> usize {
    LIFT_ORDER
        .iter()
        .position(|l| *l == lift)
        .unwrap_or(LIFT_ORDER.len())
}

/// Split a trimmed raw division into its base name and testing status.
///
/// `"JuniorDT"` → (`"Junior"`, Tested). A bare `"DT"` yields an empty base.
pub fn split_division(raw: &str) -> (String, TestingStatus) {
    match raw.strip_suffix(TESTED_SUFFIX) {
        Some(base) => (base.to_string(), TestingStatus::Tested),
        None => (raw.to_string(), TestingStatus::Untested),
    }
}

pub fn is_artefact_class(class: &str) -> bool {
    INVALID_WEIGHT_CLASSES.contains(&class)
}

// ---------------------------------------------------------------------------
// Weight-class ordering
// ---------------------------------------------------------------------------

/// Sort key for weight classes.
///
/// Numeric classes come first in ascending value (ties broken by text), then
/// every class that does not parse as a finite number, by text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClassKey<'a> {
    Numeric(OrderedFloat<f64>, &'a str),
    Text(&'a str),
}

pub fn class_key(class: &str) -> ClassKey<'_> {
    match class.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => ClassKey::Numeric(OrderedFloat(v), class),
        _ => ClassKey::Text(class),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_suffix_rule() {
        assert_eq!(split_division("JuniorDT"), ("Junior".to_string(), TestingStatus::Tested));
        assert_eq!(split_division("Open"), ("Open".to_string(), TestingStatus::Untested));
        assert_eq!(split_division("DT"), (String::new(), TestingStatus::Tested));
        // Only one suffix is stripped
        assert_eq!(split_division("M40-49DTDT").0, "M40-49DT");
    }

    #[test]
    fn lift_codes() {
        assert_eq!(map_lift("S"), "Squat");
        assert_eq!(map_lift("B"), "Bench");
        assert_eq!(map_lift("D"), "Deadlift");
        assert_eq!(map_lift("T"), "Total");
        assert_eq!(map_lift("Total"), "Total");
        assert_eq!(map_lift("X"), "X");
        assert_eq!(map_lift(""), "");
    }

    #[test]
    fn lift_rank_puts_unknown_last() {
        assert!(lift_rank("Squat") < lift_rank("Bench"));
        assert!(lift_rank("Deadlift") < lift_rank("Total"));
        assert!(lift_rank("Total") < lift_rank("Strict Curl"));
        assert_eq!(lift_rank(""), LIFT_ORDER.len());
    }

    #[test]
    fn class_key_orders_numeric_before_text() {
        let mut classes = vec!["140+", "90", "cell2", "56", "100", "82.5"];
        classes.sort_by(|a, b| class_key(a).cmp(&class_key(b)));
        assert_eq!(classes, vec!["56", "82.5", "90", "100", "140+", "cell2"]);
    }

    #[test]
    fn class_key_treats_nan_and_inf_as_text() {
        assert_eq!(class_key("NaN"), ClassKey::Text("NaN"));
        assert_eq!(class_key("inf"), ClassKey::Text("inf"));
    }

    #[test]
    fn testing_status_parse() {
        assert_eq!("tested".parse::<TestingStatus>().unwrap(), TestingStatus::Tested);
        assert_eq!(" Untested ".parse::<TestingStatus>().unwrap(), TestingStatus::Untested);
        assert!("maybe".parse::<TestingStatus>().is_err());
    }
}
