use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::QueryRecord;

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Name for the file offered right after a recommendation is generated.
pub fn recommendation_file_name(record: &QueryRecord) -> String {
    format!(
        "farming_recommendations_{}_{}.txt",
        sanitize(&record.crop),
        record.timestamp.format("%Y%m%d")
    )
}

/// Name for a file downloaded from the history list.
pub fn history_file_name(record: &QueryRecord) -> String {
    format!(
        "recommendation_{}_{}.txt",
        sanitize(&record.crop),
        record.timestamp.format("%Y-%m-%d_%H-%M-%S")
    )
}

// Keeps the name safe inside a Content-Disposition header.
fn sanitize(crop: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(crop, "_").into_owned()
}
