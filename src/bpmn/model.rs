//! The process model: every node of one process, the sequence flows between them,
//! and the designated start and end events.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

use super::classify::{classify, Classified};
use super::signal::SignalCatalog;
use super::xml::XmlElement;
use super::{Event, EventKind, Node, SequenceFlow, Task};

/// Collects classified elements one at a time, then freezes them into a [`ProcessModel`].
/// Duplicate node ids and repeated start/end events overwrite what came before.
#[derive(Debug, Default)]
pub struct ProcessModelBuilder {
    process_id: Option<String>,
    nodes: IndexMap<String, Node, ahash::RandomState>,
    flows: Vec<SequenceFlow>,
    start: Option<Node>,
    end: Option<Node>,
}

impl ProcessModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_id(mut self, id: impl Into<String>) -> Self {
        self.process_id = Some(id.into());
        self
    }

    /// Fold one classified element into the model under construction
    pub fn add(&mut self, classified: Classified) {
        match classified {
            Classified::Node(node) => self.add_node(node),
            Classified::Flow(flow) => self.flows.push(flow),
        }
    }

    /// Builder-style variant of [`add`](Self::add), handy for assembling models by hand
    pub fn with(mut self, classified: Classified) -> Self {
        self.add(classified);
        self
    }

    fn add_node(&mut self, node: Node) {
        // Start and end events are remembered as they were declared,
        // even if a later element reuses their id
        match node.event_kind() {
            Some(EventKind::Start) => {
                if let Some(previous) = self.start.replace(node.clone()) {
                    debug!(previous = previous.id(), current = node.id(), "replacing start event");
                }
            }
            Some(EventKind::End) => {
                if let Some(previous) = self.end.replace(node.clone()) {
                    debug!(previous = previous.id(), current = node.id(), "replacing end event");
                }
            }
            _ => {}
        }
        if let Some(previous) = self.nodes.insert(node.id().to_string(), node) {
            debug!(id = previous.id(), kind = previous.kind(), "overwriting node with duplicate id");
        }
    }

    /// Freeze the builder. The flows are indexed by their source for the flow reconstruction.
    pub fn build(self) -> ProcessModel {
        let mut outgoing: HashMap<String, Vec<usize>, ahash::RandomState> = HashMap::default();
        for (index, flow) in self.flows.iter().enumerate() {
            outgoing.entry(flow.source_ref.clone()).or_default().push(index);
        }
        ProcessModel {
            process_id: self.process_id,
            nodes: self.nodes,
            flows: self.flows,
            outgoing,
            start: self.start,
            end: self.end,
        }
    }
}

/// A fully built, immutable BPMN process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessModel {
    process_id: Option<String>,
    /// Nodes by id, in the order their id was first declared
    nodes: IndexMap<String, Node, ahash::RandomState>,
    /// Sequence flows in document order
    flows: Vec<SequenceFlow>,
    /// Indices into `flows`, grouped by source id, in document order
    outgoing: HashMap<String, Vec<usize>, ahash::RandomState>,
    start: Option<Node>,
    end: Option<Node>,
}

impl ProcessModel {
    /// Build the model from a parsed BPMN document.
    /// Fails if the document contains neither a `bpmn:process` nor a `process` element.
    pub fn from_document(document: &XmlElement) -> Result<Self> {
        let process = document.find_bpmn("process").ok_or(Error::NoProcess)?;
        // Signals may be referenced before they are declared, so collect them up front
        let signals = SignalCatalog::build(document);

        let mut builder = ProcessModelBuilder::new();
        builder.process_id = process.attribute("id").map(str::to_string);
        for classified in process.children.iter().filter_map(|child| classify(child, &signals)) {
            builder.add(classified);
        }
        let model = builder.build();

        debug!(
            process = model.process_id().unwrap_or_default(),
            nodes = model.nodes.len(),
            flows = model.flows.len(),
            signals = signals.len(),
            "built process model"
        );
        Ok(model)
    }

    pub fn process_id(&self) -> Option<&str> {
        self.process_id.as_deref()
    }

    /// All nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.nodes().filter_map(Node::as_task)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.nodes().filter_map(Node::as_event)
    }

    /// All sequence flows in document order
    pub fn flows(&self) -> &[SequenceFlow] {
        &self.flows
    }

    /// The sequence flows leaving the given node, in document order
    pub fn outgoing<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a SequenceFlow> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(|&index| &self.flows[index])
    }

    pub fn start(&self) -> Option<&Node> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&Node> {
        self.end.as_ref()
    }
}
