//! This module defines the error type for this program.
//!
//! Only structural problems are errors. Anomalies inside a well-formed process
//! (unknown signals, dangling flows, duplicate ids) are absorbed into the model.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Error when an IO operation fails
    #[error("Error opening file: {0}")]
    Io(#[from] std::io::Error),
    /// Error when the XML reader rejects the document
    #[error("Error parsing XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Error when the element tree cannot be assembled
    #[error("Malformed XML document: {0}")]
    Malformed(String),
    /// Error when the document declares no process
    #[error("No <process> element found in the BPMN document")]
    NoProcess,
}

pub type Result<T> = std::result::Result<T, Error>;
