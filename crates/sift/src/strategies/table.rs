// ABOUTME: Table strategy turning each data row of each HTML table into a record.
// ABOUTME: The first row supplies the field names; Column_N names are synthesized when it is blank.

use crate::dom::{text_of, Page, Scope};
use crate::record::{Provenance, Record};

const CELLS: &[&str] = &["th", "td"];

/// Field names from a header row; `Column_1..Column_N` when every cell is blank.
fn header_names(cells: &[String]) -> Vec<String> {
    if cells.iter().all(|c| c.is_empty()) {
        (1..=cells.len()).map(|i| format!("Column_{i}")).collect()
    } else {
        cells.to_vec()
    }
}

pub fn extract(page: &Page) -> Vec<Record> {
    let mut records = Vec::new();

    for (table_index, table) in page.scope().find_all_by_tag(&["table"]).enumerate() {
        let rows: Vec<_> = Scope::within(table).find_all_by_tag(&["tr"]).collect();
        if rows.len() < 2 {
            continue;
        }

        let header_cells: Vec<String> = Scope::within(rows[0])
            .find_all_by_tag(CELLS)
            .map(text_of)
            .collect();
        let headers = header_names(&header_cells);

        for row in &rows[1..] {
            let cells: Vec<String> = Scope::within(*row)
                .find_all_by_tag(CELLS)
                .map(text_of)
                .collect();
            if cells.is_empty() {
                continue;
            }

            let mut record = Record::with_provenance(Provenance::Table { table: table_index });
            for (name, value) in headers.iter().zip(cells) {
                // blank header cells cannot name a field
                if !name.is_empty() {
                    record.insert(name.as_str(), value);
                }
            }

            if record.has_content() {
                records.push(record);
            }
        }
    }

    records
}
