//! A summary of an analyzed process: its tasks, events, start and end, and the reconstructed flow.
//! It renders as a console report through `Display` and as JSON through `Serialize`.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use crate::bpmn::{Event, Node, ProcessModel, Task};
use crate::flow::{reconstruct, FlowOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub process: Option<&'a str>,
    pub tasks: Vec<&'a Task>,
    pub events: Vec<&'a Event>,
    pub start: Option<&'a Node>,
    pub end: Option<&'a Node>,
    /// Node ids of the reconstructed flow
    pub flow: Vec<&'a str>,
    pub outcome: FlowOutcome<'a>,
}

impl<'a> Report<'a> {
    pub fn new(model: &'a ProcessModel) -> Self {
        let flow = reconstruct(model);
        Self {
            process: model.process_id(),
            tasks: model.tasks().collect(),
            events: model.events().collect(),
            start: model.start(),
            end: model.end(),
            flow: flow.ids(),
            outcome: flow.outcome,
        }
    }
}

/// Prints a boundary event as `ID (Name)`, or the fallback if there is none
fn write_boundary(f: &mut Formatter<'_>, label: &str, node: Option<&Node>, missing: &str) -> FmtResult {
    match node {
        Some(node) => writeln!(f, "{}: {} ({})", label, node.id(), node.name()),
        None => writeln!(f, "{}", missing),
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "--- Tasks ---")?;
        if self.tasks.is_empty() {
            writeln!(f, "No tasks found.")?;
        }
        for task in &self.tasks {
            writeln!(f, "  - ID: {:<25} | Type: {:<15} | Name: {}", task.id, task.kind.as_str(), task.name)?;
        }

        writeln!(f, "\n--- Events ---")?;
        if self.events.is_empty() {
            writeln!(f, "No events found.")?;
        }
        for event in &self.events {
            write!(f, "  - ID: {:<25} | Type: {:<25} | Name: {}", event.id, event.kind.as_str(), event.name)?;
            if let Some(signal) = &event.signal_name {
                write!(f, " (Signal: {})", signal)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n--- Start and End ---")?;
        write_boundary(f, "Start event", self.start, "No start event found.")?;
        write_boundary(f, "End event  ", self.end, "No end event found.")?;

        writeln!(f, "\n--- Process Sequence ---")?;
        if self.flow.is_empty() {
            writeln!(f, "Unable to determine the process flow.")
        } else {
            writeln!(f, "{}", self.flow.join(" -> "))
        }
    }
}
