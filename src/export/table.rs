/// Export table: one row per labelled item

use std::collections::BTreeMap;

use crate::data::item::ItemId;
use crate::session::label::StormLabel;

pub const CSV_HEADER: [&str; 3] = ["storm_ID", "frame_no", "user_label"];

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub storm_id: i64,
    pub frame_no: i64,
    pub user_label: StormLabel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub rows: Vec<ExportRow>,
}

impl ExportTable {
    /// Flatten the label mapping, ordered by item id
    pub fn from_labels(labels: &BTreeMap<ItemId, StormLabel>) -> Self {
        let rows = labels
            .iter()
            .map(|(id, label)| ExportRow {
                storm_id: id.storm_id,
                frame_no: id.frame_no,
                user_label: *label,
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// CSV text: header line plus one line per row
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&CSV_HEADER.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{}\n",
                row.storm_id,
                row.frame_no,
                csv_field(row.user_label.label())
            ));
        }
        out
    }
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_is_header_only() {
        let table = ExportTable::from_labels(&BTreeMap::new());
        assert!(table.is_empty());
        assert_eq!(table.to_csv(), "storm_ID,frame_no,user_label\n");
    }

    #[test]
    fn test_row_count_matches_mapping() {
        let mut labels = BTreeMap::new();
        labels.insert(ItemId::new(7, 2), StormLabel::LargeCircular);
        labels.insert(ItemId::new(3, 11), StormLabel::NoOrganisation);
        labels.insert(ItemId::new(7, 1), StormLabel::LargeCircular);

        let table = ExportTable::from_labels(&labels);
        assert_eq!(table.len(), labels.len());
        assert_eq!(table.rows[0].storm_id, 3);
        assert_eq!(table.rows[1].frame_no, 1);

        let csv = table.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "3,11,No Organisation");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Large Circular"), "Large Circular");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
