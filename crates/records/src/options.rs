//! Choices offered by each selection control.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::filter::{division_group, Discipline, DivisionGrouping, NONE_LABEL};
use crate::model::{class_key, Record, TestingStatus};

/// Divisions listed first, in this order, when present.
pub const DIVISION_PRIORITY: [&str; 12] = [
    "T14-15", "T16-17", "T18-19", "Teen", "Junior", "Open", "Opens", "M40-49", "M50-59", "M60-69",
    "M70-79", "Masters",
];

/// Values for every selection control, without the `All` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOptions {
    pub discipline: Vec<String>,
    pub sex: Vec<String>,
    pub division: Vec<String>,
    pub testing: Vec<String>,
    pub equipment: Vec<String>,
    pub weight_class: Vec<String>,
}

pub fn selection_options(records: &[Record], grouping: DivisionGrouping) -> SelectionOptions {
    let divisions = records.iter().map(|r| match grouping {
        DivisionGrouping::Base => r.division_base.as_str(),
        DivisionGrouping::Grouped => division_group(&r.division_base),
    });

    SelectionOptions {
        discipline: Discipline::labels()[1..].iter().map(|s| s.to_string()).collect(),
        sex: sorted_distinct(records.iter().map(|r| r.sex.as_str())),
        division: order_divisions(divisions),
        testing: [TestingStatus::Tested, TestingStatus::Untested]
            .iter()
            .map(|t| t.label().to_string())
            .collect(),
        equipment: sorted_distinct(records.iter().map(|r| r.equipment.as_str())),
        weight_class: order_weight_classes(records.iter().map(|r| r.weight_class.as_str())),
    }
}

/// Distinct non-empty values, ascending.
fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct divisions: priority names first, then the rest in first-seen order,
/// then `(none)` if any division is empty.
pub fn order_divisions<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut first_seen = Vec::new();
    for v in values {
        if seen.insert(v) && !v.is_empty() {
            first_seen.push(v);
        }
    }

    let mut ordered: Vec<String> = DIVISION_PRIORITY
        .iter()
        .filter(|p| seen.contains(*p))
        .map(|p| p.to_string())
        .collect();
    ordered.extend(
        first_seen
            .into_iter()
            .filter(|v| !DIVISION_PRIORITY.contains(v))
            .map(str::to_string),
    );
    if seen.contains("") {
        ordered.push(NONE_LABEL.to_string());
    }
    ordered
}

/// Distinct weight classes: numeric ascending, then non-numeric by text,
/// then `(none)` if any class is empty.
pub fn order_weight_classes<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let distinct: HashSet<&str> = values.into_iter().collect();
    let mut classes: Vec<&str> = distinct.iter().copied().filter(|v| !v.is_empty()).collect();
    classes.sort_by(|a, b| class_key(a).cmp(&class_key(b)));

    let mut ordered: Vec<String> = classes.into_iter().map(str::to_string).collect();
    if distinct.contains("") {
        ordered.push(NONE_LABEL.to_string());
    }
    ordered
}
