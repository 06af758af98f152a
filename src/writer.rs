use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::course::{CourseRecord, CourseRow};
use crate::error::WriteError;

const HEADER: [&str; 6] = ["title", "link", "lang", "start_date", "duration_weeks", "rating"];

/// Write a header row and one row per record. Absent values become
/// `Unknown`. `.tsv` paths get tabs, anything else commas. An existing file
/// is never replaced, and a failed write leaves no file behind.
pub fn write_courses(path: &Path, courses: &[CourseRecord]) -> Result<usize, WriteError> {
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };

    write_new(path, |file| {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(file);

        if courses.is_empty() {
            // serialize() writes headers lazily; emit them explicitly for empty output
            wtr.write_record(HEADER)?;
        }
        for c in courses {
            wtr.serialize(CourseRow::from(c))?;
        }
        wtr.flush().map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;

    info!("Wrote {} rows to {}", courses.len(), path.display());
    Ok(courses.len())
}

/// Create `path` (it must not exist) and fill it. If filling fails the
/// half-written file is removed so a rerun is not refused.
fn write_new<F>(path: &Path, fill: F) -> Result<(), WriteError>
where
    F: FnOnce(&File) -> Result<(), WriteError>,
{
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => WriteError::AlreadyExists(path.to_path_buf()),
            _ => WriteError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    let result = fill(&file);
    drop(file);
    if let Err(e) = &result {
        warn!("Removing incomplete {}: {}", path.display(), e);
        if let Err(rm) = fs::remove_file(path) {
            warn!("Could not remove {}: {}", path.display(), rm);
        }
    }
    result
}
