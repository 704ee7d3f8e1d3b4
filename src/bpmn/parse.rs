//! This module is responsible for parsing BPMN 2.0 XML files into a process model.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::model::ProcessModel;
use super::xml::read_document;

/// Parse a BPMN document from any buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ProcessModel> {
    let document = read_document(reader)?;
    ProcessModel::from_document(&document)
}

/// Parse a BPMN document held in memory
pub fn parse_str(xml: &str) -> Result<ProcessModel> {
    parse_reader(xml.as_bytes())
}

/// Open and parse a `.bpmn` file
pub fn parse_file(path: impl AsRef<Path>) -> Result<ProcessModel> {
    let file = File::open(path).map(BufReader::new)?;
    parse_reader(file)
}

impl FromStr for ProcessModel {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        parse_str(s)
    }
}
