//! This module defines the data structures for BPMN process diagrams and provides a parser for BPMN 2.0 XML files.

mod classify;
mod model;
mod parse;
mod signal;
pub mod xml;

pub use classify::{classify, Classified};
pub use model::{ProcessModel, ProcessModelBuilder};
pub use parse::{parse_file, parse_reader, parse_str};
pub use signal::SignalCatalog;

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// Supported BPMN task types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Task,
    UserTask,
    ServiceTask,
    SendTask,
    ReceiveTask,
    ManualTask,
    BusinessRuleTask,
    ScriptTask,
}

impl TaskKind {
    /// The BPMN tag this kind is declared with
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Task => "task",
            TaskKind::UserTask => "userTask",
            TaskKind::ServiceTask => "serviceTask",
            TaskKind::SendTask => "sendTask",
            TaskKind::ReceiveTask => "receiveTask",
            TaskKind::ManualTask => "manualTask",
            TaskKind::BusinessRuleTask => "businessRuleTask",
            TaskKind::ScriptTask => "scriptTask",
        }
    }
}

/// Supported BPMN event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    #[serde(rename = "startEvent")]
    Start,
    #[serde(rename = "endEvent")]
    End,
    #[serde(rename = "intermediateCatchEvent")]
    IntermediateCatch,
}

impl EventKind {
    /// The BPMN tag this kind is declared with
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "startEvent",
            EventKind::End => "endEvent",
            EventKind::IntermediateCatch => "intermediateCatchEvent",
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A unit of work in the process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub kind: TaskKind,
}

/// Something that happens in the process.
/// Catch events may wait for a signal, whose display name is kept in `signal_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub kind: EventKind,
    /// `None` when the event has no signal definition at all,
    /// a placeholder text when it references an unknown signal
    pub signal_name: Option<String>,
}

/// Any element that can be connected by a sequence flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Node {
    Task(Task),
    Event(Event),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Task(task) => &task.id,
            Node::Event(event) => &event.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Task(task) => &task.name,
            Node::Event(event) => &event.name,
        }
    }

    /// The BPMN tag of the node, e.g. `userTask` or `startEvent`
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Task(task) => task.kind.as_str(),
            Node::Event(event) => event.kind.as_str(),
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Node::Task(task) => Some(task),
            Node::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Node::Event(event) => Some(event),
            Node::Task(_) => None,
        }
    }

    /// Returns the event kind if this node is an event of that kind
    fn event_kind(&self) -> Option<EventKind> {
        self.as_event().map(|event| event.kind)
    }
}

/// Nodes are displayed as Kind[ID=.., Name=..], with the signal appended for catch events
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Node::Task(task) => write!(f, "Task[ID={}, Name={}, Type={}]", task.id, task.name, task.kind),
            Node::Event(event) => {
                write!(f, "Event[ID={}, Name={}, Type={}]", event.id, event.name, event.kind)?;
                match &event.signal_name {
                    Some(signal) if !signal.is_empty() => write!(f, " (Signal: {})", signal),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// A sequence flow connects a source element to a target element.
/// The references are plain ids and are only resolved when the flow is walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceFlow {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_node_accessors() {
        let node = Node::Event(Event {
            id: "Catch".to_string(),
            name: "Wait".to_string(),
            kind: EventKind::IntermediateCatch,
            signal_name: Some("Alert".to_string()),
        });
        assert_eq!(node.id(), "Catch");
        assert_eq!(node.name(), "Wait");
        assert_eq!(node.kind(), "intermediateCatchEvent");
        assert!(node.as_task().is_none());
        assert_eq!(node.to_string(), "Event[ID=Catch, Name=Wait, Type=intermediateCatchEvent] (Signal: Alert)");
    }

    #[test]
    fn test_kinds_serialize_as_bpmn_tags() -> Result<(), serde_json::Error> {
        let task = Node::Task(Task {
            id: "B".to_string(),
            name: "Review".to_string(),
            kind: TaskKind::BusinessRuleTask,
        });
        let json = serde_json::to_value(&task)?;
        assert_eq!(json["category"], "task");
        assert_eq!(json["kind"], "businessRuleTask");
        assert_eq!(serde_json::to_value(EventKind::IntermediateCatch)?, "intermediateCatchEvent");
        Ok(())
    }
}
