//! This module reconstructs the ordered flow of a process by walking its sequence flows
//! from the start event towards the end event.
//!
//! Gateways are not modelled: whenever a node has several outgoing flows, the one declared
//! first in the document is taken. Every flow is followed at most once, so cycles cannot
//! keep the walk going forever.

use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use tracing::debug;

use crate::bpmn::{Node, ProcessModel, SequenceFlow};

/// Why the walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlowOutcome<'a> {
    /// The process has no start event, so there is nothing to walk
    NoStart,
    /// The walk arrived at the end event
    ReachedEnd,
    /// The node has no outgoing flow left to follow
    NoOutgoingFlow { node: &'a str },
    /// The flow points at an id that is not a node of the process
    DanglingTarget { flow: &'a str, target: &'a str },
}

/// Display the outcome as a short sentence
impl Display for FlowOutcome<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FlowOutcome::NoStart => write!(f, "no start event"),
            FlowOutcome::ReachedEnd => write!(f, "reached the end event"),
            FlowOutcome::NoOutgoingFlow { node } => write!(f, "no outgoing flow left from {}", node),
            FlowOutcome::DanglingTarget { flow, target } => {
                write!(f, "flow {} points to unknown node {}", flow, target)
            }
        }
    }
}

/// The result of a flow reconstruction: the visited nodes in order,
/// the sequence flows taken between them, and why the walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedFlow<'a> {
    pub nodes: Vec<&'a Node>,
    pub flows: Vec<&'a SequenceFlow>,
    pub outcome: FlowOutcome<'a>,
}

impl<'a> OrderedFlow<'a> {
    /// The ids of the visited nodes, in order
    pub fn ids(&self) -> Vec<&'a str> {
        self.nodes.iter().map(|node| node.id()).collect()
    }

    /// True if the walk made it from the start event to the end event
    pub fn is_complete(&self) -> bool {
        self.outcome == FlowOutcome::ReachedEnd
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Walk the process from its start event, always taking the first unused outgoing flow,
/// until the end event is reached or no flow can be followed.
/// This never fails: a broken or branching process simply yields a shorter path.
pub fn reconstruct(model: &ProcessModel) -> OrderedFlow<'_> {
    let Some(start) = model.start() else {
        debug!("process has no start event, flow is empty");
        return OrderedFlow {
            nodes: Vec::new(),
            flows: Vec::new(),
            outcome: FlowOutcome::NoStart,
        };
    };
    let end_id = model.end().map(Node::id);

    let mut nodes = Vec::new();
    let mut flows = Vec::new();
    let mut visited: HashSet<&str, ahash::RandomState> = HashSet::default();
    let mut current = start;

    let outcome = loop {
        nodes.push(current);
        if end_id == Some(current.id()) {
            break FlowOutcome::ReachedEnd;
        }
        let Some(flow) = model
            .outgoing(current.id())
            .find(|flow| !visited.contains(flow.id.as_str()))
        else {
            break FlowOutcome::NoOutgoingFlow { node: current.id() };
        };
        visited.insert(flow.id.as_str());
        flows.push(flow);
        match model.node(&flow.target_ref) {
            Some(next) => current = next,
            None => {
                break FlowOutcome::DanglingTarget {
                    flow: &flow.id,
                    target: &flow.target_ref,
                }
            }
        }
    };

    debug!(nodes = nodes.len(), flows = flows.len(), %outcome, "reconstructed process flow");
    OrderedFlow { nodes, flows, outcome }
}

impl ProcessModel {
    /// Shorthand for [`reconstruct`]
    pub fn ordered_flow(&self) -> OrderedFlow<'_> {
        reconstruct(self)
    }
}
