pub mod table;
pub mod upload;

use std::collections::BTreeMap;
use std::path::Path;

use crate::data::item::ItemId;
use crate::error::Result;
use crate::session::label::StormLabel;
use table::ExportTable;

/// Write an export table as CSV
pub fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    std::fs::write(path, table.to_csv())?;
    log::debug!("Wrote {} label rows to {}", table.len(), path.display());
    Ok(())
}

/// Rebuild the table from the label mapping and rewrite the local CSV
pub fn refresh_local(labels: &BTreeMap<ItemId, StormLabel>, path: &Path) -> Result<ExportTable> {
    let table = ExportTable::from_labels(labels);
    write_csv(&table, path)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::five_items;
    use crate::session::{ReviewAction, Session};

    #[test]
    fn test_no_selection_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storm_labels.csv");
        let session = Session::new(five_items()).unwrap();

        let table = refresh_local(session.labels(), &path).unwrap();
        assert_eq!(table.len(), 0);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["storm_ID,frame_no,user_label"]);
    }

    #[test]
    fn test_all_items_labelled_writes_five_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storm_labels.csv");
        let mut session = Session::new(five_items()).unwrap();
        for _ in 0..5 {
            session.apply(ReviewAction::Select(StormLabel::LargeCircular));
            session.apply(ReviewAction::Next);
        }
        assert_eq!(session.progress(), 1.0);

        refresh_local(session.labels(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "storm_ID,frame_no,user_label");
        assert_eq!(lines[1], "100,0,Large Circular");
        assert_eq!(lines[5], "104,4,Large Circular");
    }

    #[test]
    fn test_submit_through_stub_sink() {
        use upload::tests::RecordingSink;
        use upload::ExportSink;

        let mut session = Session::new(five_items()).unwrap();
        session.apply(ReviewAction::Select(StormLabel::NoneOfTheAbove));
        let table = ExportTable::from_labels(session.labels());

        let sink = RecordingSink::default();
        sink.submit_export(&table).unwrap();
        assert_eq!(sink.submitted.borrow().len(), 1);
        assert_eq!(sink.submitted.borrow()[0].len(), 1);

        let failing = RecordingSink {
            fail: true,
            ..Default::default()
        };
        assert!(failing.submit_export(&table).is_err());
    }
}
