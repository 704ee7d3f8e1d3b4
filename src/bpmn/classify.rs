//! Turns the raw children of a `<process>` element into typed nodes and sequence flows.

use tracing::trace;

use super::signal::SignalCatalog;
use super::xml::XmlElement;
use super::{Event, EventKind, Node, SequenceFlow, Task, TaskKind};

/// What a single process child turns into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Node(Node),
    Flow(SequenceFlow),
}

/// Builds the classification result for one element
type Constructor = fn(&XmlElement, &SignalCatalog) -> Classified;

/// Every task type is built the same way, only the kind differs.
/// This macro generates one constructor per task kind.
macro_rules! task_constructors {
    ($($name:ident => $kind:expr),*) => {$(
        fn $name(element: &XmlElement, _: &SignalCatalog) -> Classified {
            Classified::Node(Node::Task(Task {
                id: element.attribute_or_empty("id"),
                name: element.attribute_or_empty("name"),
                kind: $kind,
            }))
        }
    )*};
}

task_constructors!(
    task => TaskKind::Task,
    user_task => TaskKind::UserTask,
    service_task => TaskKind::ServiceTask,
    send_task => TaskKind::SendTask,
    receive_task => TaskKind::ReceiveTask,
    manual_task => TaskKind::ManualTask,
    business_rule_task => TaskKind::BusinessRuleTask,
    script_task => TaskKind::ScriptTask
);

fn event(element: &XmlElement, kind: EventKind, signal_name: Option<String>) -> Classified {
    Classified::Node(Node::Event(Event {
        id: element.attribute_or_empty("id"),
        name: element.attribute_or_empty("name"),
        kind,
        signal_name,
    }))
}

fn start_event(element: &XmlElement, _: &SignalCatalog) -> Classified {
    event(element, EventKind::Start, None)
}

fn end_event(element: &XmlElement, _: &SignalCatalog) -> Classified {
    event(element, EventKind::End, None)
}

fn intermediate_catch_event(element: &XmlElement, signals: &SignalCatalog) -> Classified {
    event(element, EventKind::IntermediateCatch, signal_name(element, signals))
}

fn sequence_flow(element: &XmlElement, _: &SignalCatalog) -> Classified {
    Classified::Flow(SequenceFlow {
        id: element.attribute_or_empty("id"),
        source_ref: element.attribute_or_empty("sourceRef"),
        target_ref: element.attribute_or_empty("targetRef"),
    })
}

/// Supported process children, keyed by their tag without the `bpmn:` prefix.
/// New task or event types only need a new entry here.
const CONSTRUCTORS: &[(&str, Constructor)] = &[
    ("startEvent", start_event),
    ("endEvent", end_event),
    ("intermediateCatchEvent", intermediate_catch_event),
    ("task", task),
    ("userTask", user_task),
    ("serviceTask", service_task),
    ("sendTask", send_task),
    ("receiveTask", receive_task),
    ("manualTask", manual_task),
    ("businessRuleTask", business_rule_task),
    ("scriptTask", script_task),
    ("sequenceFlow", sequence_flow),
];

/// Classify one child of the process element.
/// Unsupported elements (gateways, data objects, extension elements, ...) yield `None`.
pub fn classify(element: &XmlElement, signals: &SignalCatalog) -> Option<Classified> {
    let constructor = element.bpmn_name().and_then(|tag| {
        CONSTRUCTORS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, constructor)| constructor)
    });
    match constructor {
        Some(constructor) => Some(constructor(element, signals)),
        None => {
            trace!(element = %element.name, "ignoring unsupported element");
            None
        }
    }
}

/// The name of the signal a catch event waits for.
/// `None` if the event has no signal definition.
fn signal_name(element: &XmlElement, signals: &SignalCatalog) -> Option<String> {
    let definition = element.find_bpmn("signalEventDefinition")?;
    Some(signals.resolve(definition.attribute("signalRef").unwrap_or_default()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn catalog() -> SignalCatalog {
        [("Sig1", "Alert")].into_iter().collect()
    }

    fn catch_event(signal_ref: Option<&str>) -> XmlElement {
        let mut element = XmlElement::new("bpmn:intermediateCatchEvent")
            .with_attribute("id", "Catch")
            .with_attribute("name", "Wait");
        if let Some(signal_ref) = signal_ref {
            element = element.with_child(
                XmlElement::new("bpmn:signalEventDefinition").with_attribute("signalRef", signal_ref),
            );
        }
        element
    }

    fn signal_of(classified: Option<Classified>) -> Option<String> {
        match classified {
            Some(Classified::Node(Node::Event(event))) => event.signal_name,
            other => panic!("expected an event, got {:?}", other),
        }
    }

    #[test]
    fn test_both_spellings_classify_the_same() {
        let namespaced = XmlElement::new("bpmn:userTask")
            .with_attribute("id", "B")
            .with_attribute("name", "Review");
        let bare = XmlElement::new("userTask")
            .with_attribute("id", "B")
            .with_attribute("name", "Review");
        let expected = Classified::Node(Node::Task(Task {
            id: "B".to_string(),
            name: "Review".to_string(),
            kind: TaskKind::UserTask,
        }));
        assert_eq!(classify(&namespaced, &catalog()), Some(expected.clone()));
        assert_eq!(classify(&bare, &catalog()), Some(expected));
    }

    #[test]
    fn test_sequence_flow() {
        let element = XmlElement::new("sequenceFlow")
            .with_attribute("id", "F1")
            .with_attribute("sourceRef", "A")
            .with_attribute("targetRef", "B");
        let expected = Classified::Flow(SequenceFlow {
            id: "F1".to_string(),
            source_ref: "A".to_string(),
            target_ref: "B".to_string(),
        });
        assert_eq!(classify(&element, &catalog()), Some(expected));
    }

    #[test]
    fn test_missing_attributes_read_as_empty() {
        let classified = classify(&XmlElement::new("bpmn:serviceTask"), &catalog());
        match classified {
            Some(Classified::Node(node)) => {
                assert_eq!(node.id(), "");
                assert_eq!(node.name(), "");
                assert_eq!(node.kind(), "serviceTask");
            }
            other => panic!("expected a node, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_elements_are_ignored() {
        for name in ["bpmn:exclusiveGateway", "parallelGateway", "bpmndi:BPMNShape", "other:userTask"] {
            assert_eq!(classify(&XmlElement::new(name), &catalog()), None, "{}", name);
        }
    }

    #[test]
    fn test_signal_resolution() {
        assert_eq!(signal_of(classify(&catch_event(Some("Sig1")), &catalog())).as_deref(), Some("Alert"));

        let unresolved = signal_of(classify(&catch_event(Some("SigX")), &catalog()));
        assert!(unresolved.is_some_and(|name| name.contains("SigX")));

        assert_eq!(signal_of(classify(&catch_event(None), &catalog())), None);
    }

    #[test]
    fn test_bare_signal_definition() {
        let element = XmlElement::new("intermediateCatchEvent")
            .with_attribute("id", "Catch")
            .with_child(XmlElement::new("signalEventDefinition").with_attribute("signalRef", "Sig1"));
        assert_eq!(signal_of(classify(&element, &catalog())).as_deref(), Some("Alert"));
    }

    #[test]
    fn test_start_and_end_carry_no_signal() {
        let start = XmlElement::new("bpmn:startEvent")
            .with_attribute("id", "A")
            .with_child(XmlElement::new("bpmn:signalEventDefinition").with_attribute("signalRef", "Sig1"));
        assert_eq!(signal_of(classify(&start, &catalog())), None);
    }
}
