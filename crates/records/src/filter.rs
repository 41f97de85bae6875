//! Selection model and the record filter.
//!
//! Every predicate is independent; a record is kept when all of them hold.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::model::{Record, TestingStatus};

/// Sentinel a selection control uses for "no constraint".
pub const ALL: &str = "All";

/// Label under which an empty division or weight class is offered and selected.
pub const NONE_LABEL: &str = "(none)";

// ---------------------------------------------------------------------------
// Choice enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    #[default]
    All,
    FullPower,
    SingleLifts,
}

impl Discipline {
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::FullPower => "Full Power",
            Self::SingleLifts => "Single Lifts",
        }
    }

    pub fn labels() -> [&'static str; 3] {
        [Self::All.label(), Self::FullPower.label(), Self::SingleLifts.label()]
    }
}

impl FromStr for Discipline {
    type Err = SelectionError;

    /// Accepts labels and their compact forms: `Full Power`, `full-power`, `fullpower`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match compact.as_str() {
            "" | "all" => Ok(Self::All),
            "fullpower" => Ok(Self::FullPower),
            "singlelifts" | "single" => Ok(Self::SingleLifts),
            _ => Err(SelectionError::UnknownDiscipline(s.to_string())),
        }
    }
}

/// How free-text search is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// The whole text is a substring of the name or record name.
    #[default]
    Substring,
    /// Every whitespace token occurs in at least one searchable field.
    Tokens,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Tokens => "tokens",
        }
    }
}

impl FromStr for SearchMode {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "tokens" => Ok(Self::Tokens),
            _ => Err(SelectionError::UnknownSearchMode(s.to_string())),
        }
    }
}

/// Granularity of the division filter and its option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionGrouping {
    /// Match on `division_base` as recorded.
    #[default]
    Base,
    /// Match on the coarse Teen / Junior / Opens / Masters bucket.
    Grouped,
}

impl DivisionGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Grouped => "grouped",
        }
    }
}

impl FromStr for DivisionGrouping {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "grouped" => Ok(Self::Grouped),
            _ => Err(SelectionError::UnknownGrouping(s.to_string())),
        }
    }
}

/// Coarse division bucket for a base division name.
///
/// Rules apply in order; names matching none are their own group.
pub fn division_group(base: &str) -> &str {
    let lower = base.to_lowercase();
    if base.starts_with('T') {
        "Teen"
    } else if lower.contains("junior") {
        "Junior"
    } else if lower.contains("open") {
        "Opens"
    } else if base.starts_with('M') || lower.contains("master") {
        "Masters"
    } else {
        base
    }
}

/// Interpret a control value: absent, blank, or `All` means no constraint;
/// `(none)` selects the empty value.
pub fn choice(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case(ALL) {
        None
    } else if v.eq_ignore_ascii_case(NONE_LABEL) {
        Some(String::new())
    } else {
        Some(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The current state of every filter control.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub discipline: Discipline,
    pub sex: Option<String>,
    pub division: Option<String>,
    pub testing: Option<TestingStatus>,
    pub equipment: Option<String>,
    pub weight_class: Option<String>,
    pub search: String,
    pub search_mode: SearchMode,
    pub division_grouping: DivisionGrouping,
}

impl Selection {
    /// True when no filter is active. Search and grouping modes don't count.
    pub fn is_default(&self) -> bool {
        self.discipline == Discipline::All
            && self.sex.is_none()
            && self.division.is_none()
            && self.testing.is_none()
            && self.equipment.is_none()
            && self.weight_class.is_none()
            && self.search.trim().is_empty()
    }

    /// Set one field from a textual control value. `All` clears enumerated fields.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SelectionError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "discipline" => self.discipline = value.parse()?,
            "sex" => self.sex = choice(Some(value)),
            "division" => self.division = choice(Some(value)),
            "testing" | "testing_status" => {
                self.testing = match choice(Some(value)) {
                    Some(v) => Some(v.parse()?),
                    None => None,
                }
            }
            "equipment" => self.equipment = choice(Some(value)),
            "class" | "weight_class" => self.weight_class = choice(Some(value)),
            "search" => self.search = value.trim().to_string(),
            "search_mode" | "mode" => self.search_mode = value.parse()?,
            "grouping" | "division_grouping" => self.division_grouping = value.parse()?,
            other => return Err(SelectionError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Clear every filter, keeping the search and grouping modes.
    pub fn reset(&mut self) {
        *self = Self {
            search_mode: self.search_mode,
            division_grouping: self.division_grouping,
            ..Self::default()
        };
    }

    /// Prepare the selection for matching many records.
    pub fn matcher(&self) -> Matcher<'_> {
        let search = self.search.trim().to_lowercase();
        let tokens = match self.search_mode {
            SearchMode::Tokens => search.split_whitespace().map(str::to_string).collect(),
            SearchMode::Substring => Vec::new(),
        };
        Matcher {
            selection: self,
            search,
            tokens,
        }
    }
}

/// A selection with its search text pre-lowercased.
pub struct Matcher<'s> {
    selection: &'s Selection,
    search: String,
    tokens: Vec<String>,
}

impl Matcher<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        let sel = self.selection;
        discipline_matches(sel.discipline, record)
            && eq_or_all(&sel.sex, &record.sex)
            && self.division_matches(record)
            && sel.testing.map_or(true, |t| t == record.testing_status)
            && eq_or_all(&sel.equipment, &record.equipment)
            && eq_or_all(&sel.weight_class, &record.weight_class)
            && self.search_matches(record)
    }

    fn division_matches(&self, record: &Record) -> bool {
        let Some(wanted) = self.selection.division.as_deref() else {
            return true;
        };
        match self.selection.division_grouping {
            DivisionGrouping::Base => record.division_base == wanted,
            DivisionGrouping::Grouped => division_group(&record.division_base) == wanted,
        }
    }

    fn search_matches(&self, record: &Record) -> bool {
        if self.search.is_empty() {
            return true;
        }
        match self.selection.search_mode {
            SearchMode::Substring => {
                contains_lower(&record.full_name, &self.search)
                    || contains_lower(&record.record_name, &self.search)
            }
            SearchMode::Tokens => {
                let fields = [
                    record.full_name.as_str(),
                    record.record_name.as_str(),
                    record.weight_class.as_str(),
                    record.division_base.as_str(),
                    record.equipment.as_str(),
                    record.testing_status.label(),
                ];
                self.tokens
                    .iter()
                    .all(|t| fields.iter().any(|f| contains_lower(f, t)))
            }
        }
    }
}

fn eq_or_all(wanted: &Option<String>, value: &str) -> bool {
    wanted.as_deref().map_or(true, |w| w == value)
}

/// Case-insensitive containment; `needle` is already lowercase.
fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn discipline_matches(discipline: Discipline, record: &Record) -> bool {
    match discipline {
        Discipline::All => true,
        Discipline::FullPower => !contains_lower(&record.record_type, "single"),
        Discipline::SingleLifts => {
            let record_type = record.record_type.to_lowercase();
            let single_type = ["single", "bench only", "deadlift only"]
                .iter()
                .any(|p| record_type.contains(p));
            single_type && matches!(record.lift.as_str(), "Bench" | "Deadlift")
        }
    }
}

/// Records matching every active predicate, in their original order.
pub fn apply_filter<'a>(records: &'a [Record], selection: &Selection) -> Vec<&'a Record> {
    let matcher = selection.matcher();
    records.iter().filter(|r| matcher.matches(r)).collect()
}
