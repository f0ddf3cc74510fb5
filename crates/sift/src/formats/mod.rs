// ABOUTME: Output serializers for extracted records.
// ABOUTME: JSON arrays of flat objects, or CSV with the sorted union of all columns as header.

//! Output format conversion module.
//!
//! Records are written either as a JSON array (provenance markers inlined as
//! integers) or as CSV. CSV needs one header for records of varying shape, so
//! it uses every column seen in any record, sorted, and leaves missing cells
//! empty. List-valued cells are written as JSON arrays.

use std::collections::BTreeSet;
use std::fmt;

use crate::record::Record;

/// Output formats for a record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// Picks a format from a file extension; `None` for unknown extensions.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        write!(f, "{}", s)
    }
}

/// Serializes records as a JSON array.
pub fn to_json(records: &[Record], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    }
}

/// Sorted union of all column names across `records`.
pub fn csv_header(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(Record::columns)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Serializes records as CSV. An empty input produces an empty string.
pub fn to_csv(records: &[Record]) -> Result<String, csv::Error> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let header = csv_header(records);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for record in records {
        writer.write_record(
            header
                .iter()
                .map(|column| record.cell(column).unwrap_or_default()),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Provenance;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Record> {
        let mut a = Record::with_provenance(Provenance::Table { table: 0 });
        a.insert("Name", "Alice");
        a.insert("Score", "10");
        let mut b = Record::with_provenance(Provenance::Table { table: 1 });
        b.insert("Name", "Bob, Jr.");
        b.insert("City", "Oslo");
        vec![a, b]
    }

    #[test]
    fn csv_uses_sorted_union_header() {
        let csv = to_csv(&sample()).unwrap();
        let expected = "City,Name,Score,_table_index\n\
                        ,Alice,10,0\n\
                        Oslo,\"Bob, Jr.\",,1\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn marker_named_column_keeps_both_values() {
        let mut rec = Record::with_provenance(Provenance::Table { table: 3 });
        rec.insert("_table_index", "x");
        rec.insert("Name", "a");

        assert_eq!(
            to_csv(&[rec.clone()]).unwrap(),
            "Name,_table_index,_table_index_field
a,3,x
"
        );
        assert_eq!(
            to_json(&[rec], false).unwrap(),
            r#"[{"_table_index_field":"x","Name":"a","_table_index":3}]"#
        );
    }

    #[test]
    fn csv_of_nothing_is_empty() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn csv_encodes_lists_as_json() {
        let mut rec = Record::new();
        rec.insert("images", vec!["/a.png".to_string()]);
        let csv = to_csv(&[rec]).unwrap();
        assert_eq!(csv, "images\n\"[\"\"/a.png\"\"]\"\n");
    }

    #[test]
    fn json_is_an_array_of_flat_objects() {
        let json = to_json(&sample(), false).unwrap();
        assert_eq!(
            json,
            r#"[{"Name":"Alice","Score":"10","_table_index":0},{"Name":"Bob, Jr.","City":"Oslo","_table_index":1}]"#
        );
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_extension("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_extension("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_extension("xlsx"), None);
    }
}
