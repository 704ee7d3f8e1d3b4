pub mod error;
pub mod bpmn;
pub mod flow;
pub mod logging;
pub mod report;

pub use error::*;
pub use crate::bpmn::{parse_file, parse_reader, parse_str, Event, Node, ProcessModel, SequenceFlow, Task};
pub use crate::flow::{reconstruct, FlowOutcome, OrderedFlow};
pub use crate::report::Report;
