use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the firmware for both requests and responses.
///
/// It carries no timezone designator; the firmware expects and emits
/// wall-clock time, so values are interpreted in the local timezone of
/// this process.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Type of directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "f")]
    File,
    #[serde(rename = "d")]
    Directory,
}

/// One element of a directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Whether this entry is a file or a directory
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Name of the file or directory, unique within its parent
    pub name: String,
    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,
    /// Last modification time
    #[serde(rename = "date", with = "local_timestamp")]
    pub modified: DateTime<Local>,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Metadata for a single file as reported by the file info endpoint.
///
/// The print-job fields are pass-through data filled in by whatever
/// application generated the file; they default to zero/empty when the
/// firmware omits them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Size of the file in bytes
    #[serde(default)]
    pub size: u64,
    /// Last modification time
    #[serde(with = "local_timestamp")]
    pub last_modified: DateTime<Local>,
    /// Object height in mm for a job file
    #[serde(default)]
    pub height: f64,
    /// First layer height in mm for a job file
    #[serde(default)]
    pub first_layer_height: f64,
    /// Layer height in mm for a job file
    #[serde(default)]
    pub layer_height: f64,
    /// Print time in seconds for a job file
    #[serde(default)]
    pub print_time: u64,
    /// Used filament lengths in mm
    #[serde(default)]
    pub filament: Vec<f64>,
    /// Which application created the job file
    #[serde(default)]
    pub generated_by: String,
}

/// The current wall-clock time formatted the way the firmware expects it.
pub(crate) fn now_string() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

/// Serde helpers for the firmware's timezone-less timestamp strings.
pub(crate) mod local_timestamp {
    use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S>(value: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, TIME_FORMAT)
            .map_err(serde::de::Error::custom)?;
        // The wire format has no timezone, so assume local time. A DST gap
        // can make a wall-clock time unrepresentable; an overlap makes it
        // ambiguous, in which case the earlier instant wins.
        match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
            LocalResult::None => Err(serde::de::Error::custom(format!(
                "timestamp {} does not exist in the local timezone",
                raw
            ))),
        }
    }
}
