//! One-shot query commands: `best`, `filter`, `options`.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::{debug, info};

use liftboard_config::Settings;
use liftboard_io::export::{records_to_csv, summary_rows, summary_to_csv};
use liftboard_io::logo::load_logo;
use liftboard_io::RecordCache;
use liftboard_records::{
    apply_filter, best_per_class_and_lift, selection_options, DivisionGrouping, Record, Selection,
};

use crate::render::{self, SummaryReport};
use crate::CliError;

/// Shown instead of results while no filter is chosen.
pub const HOME_PROMPT: &str =
    "Choose a division, testing status or another filter to see records (or pass --all).";

/// Shown when a selection leaves nothing to summarise.
pub const NO_MATCH: &str = "No records match the selected filters.";

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Records CSV (default: $LIFTBOARD_CSV, then [data] csv in the config)
    #[arg(value_name = "CSV", env = "LIFTBOARD_CSV")]
    pub input: Option<PathBuf>,
}

impl SourceArgs {
    pub fn resolve(&self, settings: &Settings) -> Result<PathBuf, CliError> {
        self.input
            .clone()
            .or_else(|| settings.data.csv.clone())
            .ok_or_else(|| {
                CliError::args("no records file given")
                    .with_hint("pass a CSV path, set LIFTBOARD_CSV, or set [data] csv in the config")
            })
    }
}

/// Filter flags shared by `best` and `filter`. Omitted or `All` means no constraint;
/// `(none)` selects an empty division or class.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Full Power, Single Lifts or All
    #[arg(long, value_name = "DISCIPLINE")]
    pub discipline: Option<String>,

    /// Sex as written in the sheet (e.g. M, F)
    #[arg(long)]
    pub sex: Option<String>,

    /// Division (base name, or group name with --group-divisions)
    #[arg(long)]
    pub division: Option<String>,

    /// Tested or Untested
    #[arg(long, value_name = "STATUS")]
    pub testing: Option<String>,

    /// Equipment as written in the sheet
    #[arg(long)]
    pub equipment: Option<String>,

    /// Weight class (e.g. 90, 140+)
    #[arg(long = "class", value_name = "CLASS")]
    pub weight_class: Option<String>,

    /// Case-insensitive search over lifter and record names (tokens mode also
    /// checks class, division, equipment and testing status)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// substring (default) or tokens (every word must appear)
    #[arg(long, value_name = "MODE")]
    pub search_mode: Option<String>,

    /// Match --division against coarse groups (Teen, Junior, Opens, Masters)
    #[arg(long)]
    pub group_divisions: bool,
}

impl FilterArgs {
    /// Build a selection on top of the configured modes.
    pub fn selection(&self, settings: &Settings) -> Result<Selection, CliError> {
        let mut selection = Selection {
            search_mode: settings.query.search_mode,
            division_grouping: settings.query.division_grouping,
            ..Selection::default()
        };
        if self.group_divisions {
            selection.division_grouping = DivisionGrouping::Grouped;
        }

        let fields = [
            ("discipline", &self.discipline),
            ("sex", &self.sex),
            ("division", &self.division),
            ("testing", &self.testing),
            ("equipment", &self.equipment),
            ("class", &self.weight_class),
            ("search", &self.search),
            ("search_mode", &self.search_mode),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                selection.set(key, value).map_err(CliError::selection)?;
            }
        }
        Ok(selection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Load the source through a fresh cache. One-shot commands read the file once.
fn load(settings: &Settings, path: &Path) -> Result<std::sync::Arc<Vec<Record>>, CliError> {
    let mut cache = RecordCache::new(settings.data.encoding);
    cache.load(path).map_err(CliError::source)
}

pub fn cmd_best(
    settings: &Settings,
    source: SourceArgs,
    filters: FilterArgs,
    format: OutputFormat,
    output: Option<PathBuf>,
    all: bool,
) -> Result<(), CliError> {
    let selection = filters.selection(settings)?;
    let path = source.resolve(settings)?;
    let records = load(settings, &path)?;

    if settings.display.require_filter && selection.is_default() && !all {
        debug!("no filter chosen, showing prompt");
        eprintln!("{}", HOME_PROMPT);
        return Ok(());
    }

    let filtered = apply_filter(&records, &selection);
    let best = best_per_class_and_lift(filtered.iter().copied());
    let rows = summary_rows(&best);
    info!(
        "{} records, {} match, {} summary rows",
        records.len(),
        filtered.len(),
        rows.len()
    );

    if rows.is_empty() && format == OutputFormat::Table {
        eprintln!("{}", NO_MATCH);
        return Ok(());
    }

    let report = SummaryReport::new(settings, &path, &selection, records.len(), filtered.len(), &rows);
    let text = match format {
        OutputFormat::Table => render::table(&rows),
        OutputFormat::Csv => summary_to_csv(&rows).map_err(|e| CliError::write(e.to_string()))?,
        OutputFormat::Json => render::json(&report)?,
        OutputFormat::Html => {
            let logo = settings.data.logo.as_deref().and_then(load_logo);
            render::html(&report, logo.as_ref())
        }
    };
    write_output(output.as_deref(), &text)
}

pub fn cmd_filter(
    settings: &Settings,
    source: SourceArgs,
    filters: FilterArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let selection = filters.selection(settings)?;
    let path = source.resolve(settings)?;
    let records = load(settings, &path)?;

    let filtered = apply_filter(&records, &selection);
    info!("{} of {} records match", filtered.len(), records.len());

    let text = match format {
        ExportFormat::Csv => records_to_csv(&filtered).map_err(|e| CliError::write(e.to_string()))?,
        ExportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&filtered)
                .map_err(|e| CliError::other(format!("JSON encoding failed: {}", e)))?;
            json.push('\n');
            json
        }
    };
    write_output(output.as_deref(), &text)
}

pub fn cmd_options(
    settings: &Settings,
    source: SourceArgs,
    group_divisions: bool,
    json: bool,
) -> Result<(), CliError> {
    let path = source.resolve(settings)?;
    let records = load(settings, &path)?;

    let grouping = if group_divisions {
        DivisionGrouping::Grouped
    } else {
        settings.query.division_grouping
    };
    let options = selection_options(&records, grouping);

    let text = if json {
        let mut json = serde_json::to_string_pretty(&options)
            .map_err(|e| CliError::other(format!("JSON encoding failed: {}", e)))?;
        json.push('\n');
        json
    } else {
        render::options(&options)
    };
    write_output(None, &text)
}

/// Write to `path`, or stdout when it is absent or `-`.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::write(p, text)
            .map_err(|e| CliError::write(format!("cannot write {}: {}", p.display(), e))),
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::write(format!("cannot write to stdout: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftboard_records::{Discipline, SearchMode, TestingStatus};

    #[test]
    fn selection_from_flags() {
        let args = FilterArgs {
            discipline: Some("single-lifts".into()),
            sex: Some("F".into()),
            testing: Some("tested".into()),
            weight_class: Some("All".into()),
            search: Some("  jun ".into()),
            ..FilterArgs::default()
        };
        let sel = args.selection(&Settings::default()).unwrap();
        assert_eq!(sel.discipline, Discipline::SingleLifts);
        assert_eq!(sel.sex.as_deref(), Some("F"));
        assert_eq!(sel.testing, Some(TestingStatus::Tested));
        assert_eq!(sel.weight_class, None);
        assert_eq!(sel.search, "jun");
        assert!(!sel.is_default());
    }

    #[test]
    fn selection_inherits_configured_modes() {
        let mut settings = Settings::default();
        settings.query.search_mode = SearchMode::Tokens;
        let sel = FilterArgs::default().selection(&settings).unwrap();
        assert_eq!(sel.search_mode, SearchMode::Tokens);
        assert_eq!(sel.division_grouping, DivisionGrouping::Base);
        assert!(sel.is_default());

        let args = FilterArgs {
            group_divisions: true,
            search_mode: Some("substring".into()),
            ..FilterArgs::default()
        };
        let sel = args.selection(&settings).unwrap();
        assert_eq!(sel.division_grouping, DivisionGrouping::Grouped);
        assert_eq!(sel.search_mode, SearchMode::Substring);
    }

    #[test]
    fn bad_flag_value_is_usage_error() {
        let args = FilterArgs {
            testing: Some("maybe".into()),
            ..FilterArgs::default()
        };
        let err = args.selection(&Settings::default()).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }

    #[test]
    fn source_falls_back_to_config() {
        let mut settings = Settings::default();
        assert_eq!(
            SourceArgs::default().resolve(&settings).unwrap_err().code,
            crate::exit_codes::EXIT_USAGE
        );

        settings.data.csv = Some(PathBuf::from("/srv/records.csv"));
        assert_eq!(
            SourceArgs::default().resolve(&settings).unwrap(),
            PathBuf::from("/srv/records.csv")
        );

        let explicit = SourceArgs {
            input: Some(PathBuf::from("mine.csv")),
        };
        assert_eq!(explicit.resolve(&settings).unwrap(), PathBuf::from("mine.csv"));
    }
}
