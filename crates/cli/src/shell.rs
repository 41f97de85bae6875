//! Interactive session: one selection, edited a line at a time.
//!
//! Every filter change re-runs the query against the cached record set. The
//! source is re-read only when the file changes on disk.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use liftboard_config::Settings;
use liftboard_io::export::{records_to_csv, summary_rows};
use liftboard_io::RecordCache;
use liftboard_records::filter::ALL;
use liftboard_records::{
    apply_filter, best_per_class_and_lift, selection_options, Record, Selection, NONE_LABEL,
};

use crate::query::{SourceArgs, HOME_PROMPT, NO_MATCH};
use crate::render;
use crate::CliError;

const HELP: &str = "\
Set a filter with key=value (All clears it, (none) picks an empty value):
  discipline  sex  division  testing  equipment  class  search
  mode=substring|tokens   grouping=base|grouped
Commands:
  show            summary table for the current filters
  rows            number of matching records
  filters         current selection
  options         values each filter accepts
  export <file>   write matching records as CSV
  reset           clear every filter
  help            this text
  quit            leave the shell
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    source: PathBuf,
    cache: RecordCache,
    selection: Selection,
    require_filter: bool,
}

impl Session {
    pub fn new(settings: &Settings, source: PathBuf) -> Self {
        Self {
            source,
            cache: RecordCache::new(settings.data.encoding),
            selection: Selection {
                search_mode: settings.query.search_mode,
                division_grouping: settings.query.division_grouping,
                ..Selection::default()
            },
            require_filter: settings.display.require_filter,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn records(&mut self) -> Result<Arc<Vec<Record>>, CliError> {
        self.cache.load(&self.source).map_err(CliError::source)
    }

    /// Run one input line. Bad input and reload failures are reported to
    /// `out`; only failing to write `out` ends the session with an error.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<Flow, CliError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        debug!("shell input: {}", line);

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let result = match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => emit(out, HELP),
            "show" => self.show(out),
            "rows" => self.rows(out),
            "filters" => self.filters(out),
            "options" => self.options(out),
            "reset" => {
                self.selection.reset();
                self.show(out)
            }
            "export" => self.export(rest, out),
            _ => match line.split_once('=') {
                Some((key, value)) => match self.selection.set(key, value) {
                    Ok(()) => self.show(out),
                    Err(e) => Err(CliError::selection(e)),
                },
                None => Err(CliError::args(format!(
                    "unknown command '{}' (type help)",
                    command
                ))),
            },
        };

        match result {
            Ok(()) => Ok(Flow::Continue),
            Err(e) if e.code == crate::exit_codes::EXIT_WRITE => Err(e),
            Err(e) => {
                emit(out, &format!("error: {}\n", e.message))?;
                if let Some(hint) = e.hint {
                    emit(out, &format!("hint:  {}\n", hint))?;
                }
                Ok(Flow::Continue)
            }
        }
    }

    fn show(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        let records = self.records()?;
        if self.require_filter && self.selection.is_default() {
            return emit(out, &format!("{}\n", HOME_PROMPT));
        }
        let filtered = apply_filter(&records, &self.selection);
        let best = best_per_class_and_lift(filtered.iter().copied());
        if best.is_empty() {
            return emit(out, &format!("{}\n", NO_MATCH));
        }
        emit(out, &render::table(&summary_rows(&best)))
    }

    fn rows(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        let records = self.records()?;
        let matched = apply_filter(&records, &self.selection).len();
        emit(out, &format!("{} of {} records match\n", matched, records.len()))
    }

    fn filters(&self, out: &mut impl Write) -> Result<(), CliError> {
        let s = self.selection();
        // Printed values are accepted back by key=value
        let show = |v: &Option<String>| match v.as_deref() {
            None => ALL.to_string(),
            Some("") => NONE_LABEL.to_string(),
            Some(v) => v.to_string(),
        };
        let text = format!(
            "discipline={}\nsex={}\ndivision={}\ntesting={}\nequipment={}\nclass={}\nsearch={}\nmode={}\ngrouping={}\n",
            s.discipline.label(),
            show(&s.sex),
            show(&s.division),
            s.testing.map_or(ALL, |t| t.label()),
            show(&s.equipment),
            show(&s.weight_class),
            s.search,
            s.search_mode.as_str(),
            s.division_grouping.as_str(),
        );
        emit(out, &text)
    }

    fn options(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        let records = self.records()?;
        let options = selection_options(&records, self.selection.division_grouping);
        emit(out, &render::options(&options))
    }

    fn export(&mut self, target: &str, out: &mut impl Write) -> Result<(), CliError> {
        if target.is_empty() {
            return Err(CliError::args("export needs a file name"));
        }
        let records = self.records()?;
        let filtered = apply_filter(&records, &self.selection);
        let text = records_to_csv(&filtered).map_err(|e| CliError::other(e.to_string()))?;
        // A failed export is reported in the session, not fatal
        std::fs::write(target, text)
            .map_err(|e| CliError::other(format!("cannot write {}: {}", target, e)))?;
        emit(out, &format!("wrote {} records to {}\n", filtered.len(), target))
    }
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), CliError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| CliError::write(format!("cannot write output: {}", e)))
}

pub fn cmd_shell(settings: &Settings, source: SourceArgs) -> Result<(), CliError> {
    let path = source.resolve(settings)?;
    let mut session = Session::new(settings, path.clone());

    // An unreadable source ends the session before it starts
    let count = session.records()?.len();
    eprintln!(
        "Loaded {} records from {}. Type help for commands.",
        count,
        path.display()
    );

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    if !interactive {
        debug!("stdin is not a terminal, reading commands without a prompt");
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            eprint!("> ");
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!("stopped reading input: {}", e);
                break;
            }
            None => break,
        };
        if session.handle(&line, &mut stdout)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftboard_records::TestingStatus;

    const CSV: &str = "\
Full Name,Weight,Class,Division,Lift,Record Type,Sex,Equipment,Location
Ann Lee,120,63,JuniorDT,S,Full Power,F,Raw,Leeds
Ann Lee,125,63,JuniorDT,S,Full Power,F,Raw,York
Bo Ray,200,90,Open,D,Single Lifts,M,Raw,Hull
";

    fn session(csv: &str) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        std::fs::write(&path, csv).unwrap();
        let session = Session::new(&Settings::default(), path);
        (dir, session)
    }

    fn run(session: &mut Session, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = session.handle(line, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn default_selection_prompts() {
        let (_dir, mut s) = session(CSV);
        let (_, text) = run(&mut s, "show");
        assert_eq!(text.trim_end(), HOME_PROMPT);
    }

    #[test]
    fn setting_a_filter_shows_best() {
        let (_dir, mut s) = session(CSV);
        let (flow, text) = run(&mut s, "testing=Tested");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(s.selection().testing, Some(TestingStatus::Tested));
        assert!(text.starts_with("Class"));
        assert!(text.contains("125"));
        assert!(!text.contains("Bo Ray"));
        // Lower Squat by the same lifter is not the best
        assert!(!text.contains(" 120 "));
    }

    #[test]
    fn bad_value_keeps_session() {
        let (_dir, mut s) = session(CSV);
        let (flow, text) = run(&mut s, "testing=maybe");
        assert_eq!(flow, Flow::Continue);
        assert!(text.starts_with("error: "));
        assert_eq!(s.selection().testing, None);

        let (_, text) = run(&mut s, "frobnicate");
        assert!(text.contains("unknown command 'frobnicate'"));
    }

    #[test]
    fn no_match_message() {
        let (_dir, mut s) = session(CSV);
        let (_, text) = run(&mut s, "search=nobody");
        assert_eq!(text.trim_end(), NO_MATCH);
    }

    #[test]
    fn reset_and_rows() {
        let (_dir, mut s) = session(CSV);
        run(&mut s, "sex=M");
        let (_, text) = run(&mut s, "rows");
        assert_eq!(text, "1 of 3 records match\n");

        let (_, text) = run(&mut s, "reset");
        assert_eq!(text.trim_end(), HOME_PROMPT);
        let (_, text) = run(&mut s, "rows");
        assert_eq!(text, "3 of 3 records match\n");
    }

    #[test]
    fn export_writes_filtered_csv() {
        let (dir, mut s) = session(CSV);
        run(&mut s, "sex=F");
        let target = dir.path().join("out.csv");
        let (_, text) = run(&mut s, &format!("export {}", target.display()));
        assert!(text.starts_with("wrote 2 records"));
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.starts_with("Full Name,Weight,Class"));
    }

    #[test]
    fn filters_listing_reads_back() {
        let (_dir, mut s) = session(CSV);
        run(&mut s, "mode=tokens");
        run(&mut s, "grouping=grouped");
        run(&mut s, "division=(none)");
        run(&mut s, "sex=F");
        let (_, text) = run(&mut s, "filters");
        assert!(text.contains("mode=tokens\n"));
        assert!(text.contains("grouping=grouped\n"));
        assert!(text.contains("division=(none)\n"));
        assert!(text.contains("class=All\n"));

        // Feeding every line back yields the same selection
        let before = s.selection().clone();
        let (_dir2, mut other) = session(CSV);
        for line in text.lines() {
            other.handle(line, &mut Vec::new()).unwrap();
        }
        assert_eq!(other.selection(), &before);
    }

    #[test]
    fn quit_ends_session() {
        let (_dir, mut s) = session(CSV);
        assert_eq!(run(&mut s, "quit").0, Flow::Quit);
        assert_eq!(run(&mut s, "  ").0, Flow::Continue);
    }

    #[test]
    fn edited_file_is_picked_up() {
        let (dir, mut s) = session(CSV);
        run(&mut s, "sex=M");
        let more = format!("{}Cy Dee,210,90,Open,D,Single Lifts,M,Raw,Hull\n", CSV);
        std::fs::write(dir.path().join("records.csv"), more).unwrap();
        let (_, text) = run(&mut s, "show");
        assert!(text.contains("Cy Dee"));
        assert!(!text.contains("Bo Ray"));
    }
}
