// Records CSV import

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use liftboard_records::normalize::columns;
use liftboard_records::{normalize, RawRow, Record};

use crate::error::IoError;

/// How source bytes are decoded to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// UTF-8, falling back to Windows-1252 (Excel exports) on invalid bytes.
    #[default]
    Auto,
    /// Strict UTF-8; invalid bytes are a fatal error.
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "windows-1252")]
    Windows1252,
}

/// Read, decode, parse and normalize a records file.
pub fn load_records(path: &Path, encoding: TextEncoding) -> Result<Vec<Record>, IoError> {
    let content = read_file_as_text(path, encoding)?;
    let rows = read_raw_rows(&content)?;
    let records = normalize(&rows);
    info!(
        "loaded {} records from {} ({} rows)",
        records.len(),
        path.display(),
        rows.len()
    );
    Ok(records)
}

/// Read a file and decode it to text.
pub fn read_file_as_text(path: &Path, encoding: TextEncoding) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let text = match encoding {
        TextEncoding::Windows1252 => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
        TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| IoError::Decode {
            path: path.display().to_string(),
            encoding: "UTF-8",
        })?,
        // Try UTF-8 first; on failure, recover the buffer from the error
        TextEncoding::Auto => match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
                let bytes = e.into_bytes();
                let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
                decoded.into_owned()
            }
        },
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Delimiters tried on the header line. Comma is last so it wins ties.
const DELIMITERS: [u8; 4] = [b'|', b'\t', b';', b','];

/// Pick the delimiter that splits the header line into the most required
/// columns, then into the most fields. Comma when nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    DELIMITERS
        .into_iter()
        .max_by_key(|&delimiter| header_score(header, delimiter))
        .unwrap_or(b',')
}

/// (required columns found, field count) for `header` split on `delimiter`.
fn header_score(header: &str, delimiter: u8) -> (usize, usize) {
    let fields: Vec<String> = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_reader(header.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map(|r| r.iter().map(|f| f.trim().to_string()).collect())
        .unwrap_or_default();
    let required = columns::REQUIRED
        .iter()
        .filter(|c| fields.iter().any(|f| f == *c))
        .count();
    (required, fields.len())
}

/// Parse CSV text into header-keyed raw rows.
///
/// Header names are trimmed. Short rows leave their missing cells absent;
/// rows the CSV reader rejects are skipped.
pub fn read_raw_rows(content: &str) -> Result<Vec<RawRow>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(IoError::MissingColumn {
                column: required.to_string(),
                available: headers.iter().filter(|h| !h.is_empty()).cloned().collect(),
            });
        }
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping unreadable CSV row: {e}");
                skipped += 1;
                continue;
            }
        };

        let mut row = RawRow::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(record.iter()) {
            if header.is_empty() {
                continue;
            }
            // First column wins when a header repeats
            row.entry(header.clone()).or_insert_with(|| value.to_string());
        }
        rows.push(row);
    }

    if skipped > 0 {
        debug!("skipped {skipped} unreadable CSV rows");
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Full Name ,Weight, Class ,Division,Lift,Record Type,Record Name,Sex,Equipment,Date,Location
June Smith,102.5,90,JuniorDT,B,Single Lift,British Record,F,Raw,2024-03-02,Leeds
,100,90,Open,S,Full Power,,M,Raw,2024-03-02,Leeds
";

    #[test]
    fn headers_are_trimmed() {
        let rows = read_raw_rows(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Full Name"], "June Smith");
        assert_eq!(rows[0]["Class"], "90");
    }

    #[test]
    fn ragged_rows_are_kept() {
        let csv = "Full Name,Weight,Class,Division\nA,100,90\nB,110,90,Open,extra\n";
        let rows = read_raw_rows(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].contains_key("Division"));
        assert_eq!(rows[1]["Division"], "Open");
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "Name,Weight,Class\nA,100,90\n";
        let err = read_raw_rows(csv).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "Full Name"));
        assert!(err.to_string().contains("found: Name, Weight, Class"));
    }

    #[test]
    fn semicolon_delimiter_is_sniffed() {
        let csv = "Full Name;Weight;Class\nA;100;90\nB;110;100\n";
        assert_eq!(sniff_delimiter(csv), b';');
        let rows = read_raw_rows(csv).unwrap();
        assert_eq!(rows[1]["Weight"], "110");
    }

    #[test]
    fn delimiter_follows_required_header() {
        // Commas inside names would win a field count; the header decides
        let csv = "Full Name\tWeight\tClass\nSmith, June, Jr\t100\t90\n";
        assert_eq!(sniff_delimiter(csv), b'\t');
        assert_eq!(sniff_delimiter("Full Name|Weight|Class|Note, extra\n"), b'|');
        // Quoted commas in the header do not split it
        assert_eq!(sniff_delimiter("\"Full Name, as entered\";Weight;Class\n"), b';');
    }

    #[test]
    fn comma_is_default_delimiter() {
        assert_eq!(sniff_delimiter(""), b',');
        assert_eq!(sniff_delimiter("single column\nvalue\n"), b',');
    }

    #[test]
    fn bom_is_stripped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{feff}Full Name,Weight,Class\nA,100,90\n".as_bytes()).unwrap();
        let text = read_file_as_text(file.path(), TextEncoding::Auto).unwrap();
        assert!(text.starts_with("Full Name"));
    }

    #[test]
    fn windows_1252_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "Zoë" in Windows-1252
        file.write_all(b"Full Name,Weight,Class\nZo\xEB,100,90\n").unwrap();

        let text = read_file_as_text(file.path(), TextEncoding::Auto).unwrap();
        assert!(text.contains("Zoë"));

        let err = read_file_as_text(file.path(), TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, IoError::Decode { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_records(Path::new("/no/such/records.csv"), TextEncoding::Auto).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn load_normalizes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let records = load_records(file.path(), TextEncoding::Auto).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "June Smith");
        assert_eq!(records[0].lift, "Bench");
        assert_eq!(records[0].event_location, "Leeds");
    }
}
