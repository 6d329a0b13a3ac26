//! CSV report output.
//!
//! Each report type gets its own file and writer, keyed by `TypeId`. Rows
//! are flushed as they are sent so a run killed mid-way still leaves usable
//! output behind.

use csv::Writer;
use std::any::TypeId;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use crate::error::EpisimError;

pub trait Report: 'static {
    // Returns report type
    fn type_id(&self) -> TypeId;
    // Serializes the data with the correct writer
    fn serialize(&self, writer: &mut Writer<File>);
}

/// Use this macro to define a unique report type
#[macro_export]
macro_rules! define_report {
    ($name:ident) => {
        impl $crate::report::Report for $name {
            fn type_id(&self) -> std::any::TypeId {
                std::any::TypeId::of::<$name>()
            }

            fn serialize(&self, writer: &mut $crate::csv::Writer<std::fs::File>) {
                writer.serialize(self).unwrap();
            }
        }
    };
}

// Checks that the path is valid. Creates the file and all parent directories
// if they do not exist. Returns the file if successful. Called by `add_report`
fn generate_validate_filepath(path: &Path) -> Result<File, EpisimError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            create_dir_all(path.parent().expect("Either root or empty path provided"))?;
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(EpisimError::ReportError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

/// Maps report types to their open file writers.
#[derive(Default)]
pub struct ReportWriters {
    file_writers: HashMap<TypeId, Writer<File>>,
}

impl ReportWriters {
    /// Call `add_report` with each report type, passing the complete path
    /// the report should be written to.
    ///
    /// # Errors
    ///
    /// Returns an `EpisimError` detailing what may have gone wrong
    pub fn add_report<T: Report + 'static>(&mut self, path: &Path) -> Result<(), EpisimError> {
        let file = generate_validate_filepath(path)?;
        let writer = Writer::from_writer(file);
        self.file_writers.insert(TypeId::of::<T>(), writer);
        Ok(())
    }

    /// True if a writer has been registered for the report type.
    #[must_use]
    pub fn has_report<T: Report + 'static>(&self) -> bool {
        self.file_writers.contains_key(&TypeId::of::<T>())
    }

    /// Write a new row with columns following items in the report struct
    /// to the report file associated with the report type struct.
    ///
    /// # Panics
    ///
    /// Panics if no report of this type has been added.
    pub fn send_report<T: Report>(&mut self, report: T) {
        let writer = self
            .file_writers
            .get_mut(&report.type_id())
            .expect("No writer found for the report type");
        report.serialize(writer);
        writer.flush().expect("Failed to flush writer");
    }
}
