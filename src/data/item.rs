/// Storm image items and their filename-derived identifiers
///
/// Items are `.npy` arrays named `<prefix>_<stormId>_<prefix2>_<frameNo>.npy`,
/// e.g. `storm_1042_frame_7.npy`. The two embedded integers form the item id.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{LabelerError, Result};

/// Composite identifier of one storm frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId {
    pub storm_id: i64,
    pub frame_no: i64,
}

impl ItemId {
    pub fn new(storm_id: i64, frame_no: i64) -> Self {
        Self { storm_id, frame_no }
    }
}

/// Tuple form, e.g. `(1042, 7)`
impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.storm_id, self.frame_no)
    }
}

impl FromStr for ItemId {
    type Err = LabelerError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| LabelerError::InvalidItemId(s.to_string()))?;
        let (storm, frame) = inner
            .split_once(',')
            .ok_or_else(|| LabelerError::InvalidItemId(s.to_string()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| LabelerError::InvalidItemId(s.to_string()))
        };
        Ok(Self::new(parse(storm)?, parse(frame)?))
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One labelable array file
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub path: PathBuf,
}

impl Item {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

fn parse_segment(name: &str, segment: &str) -> Result<i64> {
    segment.parse::<i64>().map_err(|_| {
        LabelerError::invalid_filename(name, format!("'{}' is not an integer", segment))
    })
}

/// Extract `(stormId, frameNo)` from an item filename.
///
/// Segment 1 holds the storm id and segment 3 (extension removed) the frame
/// number. Any directory part of `filename` is ignored.
pub fn parse_item_id(filename: &str) -> Result<ItemId> {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());

    let segments: Vec<&str> = name.split('_').collect();
    if segments.len() < 4 {
        return Err(LabelerError::invalid_filename(
            &name,
            format!("expected at least 4 '_'-separated segments, found {}", segments.len()),
        ));
    }

    let frame = segments[3]
        .split_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(segments[3]);

    Ok(ItemId::new(
        parse_segment(&name, segments[1])?,
        parse_segment(&name, frame)?,
    ))
}

/// List the `.npy` items of a directory, sorted by file name and truncated to
/// `limit` entries. Fails on the first malformed item name.
pub fn list_items(dir: &Path, limit: usize) -> Result<Vec<Item>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let p = entry?.path();
        if !p.is_file() {
            continue;
        }
        let ext = p
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if ext == "npy" {
            paths.push(p);
        }
    }
    paths.sort();
    paths.truncate(limit);

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let id = parse_item_id(&name)?;
        items.push(Item { id, path });
    }

    if items.is_empty() {
        return Err(LabelerError::EmptyItemList(dir.to_path_buf()));
    }
    log::info!("Listed {} items from {}", items.len(), dir.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documented_names() {
        let id = parse_item_id("storm_1042_frame_7.npy").unwrap();
        assert_eq!(id, ItemId::new(1042, 7));

        let id = parse_item_id("mcs_3_t_120.npy").unwrap();
        assert_eq!(id.storm_id, 3);
        assert_eq!(id.frame_no, 120);

        // directory part is ignored
        let id = parse_item_id("storm_images_cleaned/storm_9_frame_0.npy").unwrap();
        assert_eq!(id, ItemId::new(9, 0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            parse_item_id("storm_12.npy"),
            Err(LabelerError::InvalidFilename { .. })
        ));
        assert!(parse_item_id("storm_abc_frame_7.npy").is_err());
        assert!(parse_item_id("storm_1_frame_x.npy").is_err());
    }

    #[test]
    fn test_id_string_form_roundtrip() {
        let id = ItemId::new(1042, 7);
        assert_eq!(id.to_string(), "(1042, 7)");
        assert_eq!("(1042, 7)".parse::<ItemId>().unwrap(), id);
        assert!("1042, 7".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_list_items_sorted_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "storm_5_frame_2.npy",
            "storm_1_frame_1.npy",
            "storm_3_frame_9.npy",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let items = list_items(dir.path(), 2).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::new(1, 1));
        assert_eq!(items[1].id, ItemId::new(3, 9));
        assert_eq!(items[0].file_name(), "storm_1_frame_1.npy");
    }

    #[test]
    fn test_list_items_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            list_items(dir.path(), 5),
            Err(LabelerError::EmptyItemList(_))
        ));
    }

    #[test]
    fn test_list_items_aborts_on_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.npy"), b"").unwrap();
        assert!(list_items(dir.path(), 5).is_err());
    }
}
