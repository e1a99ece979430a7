//! Cross-object behavior of the proxy layer against recording mock loaders:
//! lazy resolution, write-through collection edits, rejected edit kinds,
//! path-derived parents and check-in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use afclient::connection::{Connection, Loaders};
use afclient::error::{AfError, ChangeKind};
use afclient::loaders::{
    AttributeLoader, AttributeQuery, ElementLoader, ElementQuery, EventFrameLoader, FrameQuery,
    FrameSeed, NewObject, ObjectPatch, ObjectSeed, TemplateLoader, UnitLoader, UnitSeed,
};
use afclient::{AfAttribute, AfElement};

fn seed(id: &str, name: &str, path: &str) -> ObjectSeed {
    ObjectSeed {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        path: path.to_string(),
    }
}

/// Shared call journal; entries are formatted calls like `delete(C7)`.
#[derive(Default)]
struct Log {
    entries: Mutex<Vec<String>>,
}

impl Log {
    fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    fn count_of(&self, prefix: &str) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

#[derive(Default)]
struct MockElementLoader {
    log: Arc<Log>,
    by_id: HashMap<String, ObjectSeed>,
    by_path: HashMap<String, ObjectSeed>,
    children: HashMap<String, Vec<ObjectSeed>>,
    attributes: HashMap<String, Vec<ObjectSeed>>,
    template: Option<String>,
    children_calls: AtomicUsize,
    fail_delete: bool,
}

impl ElementLoader for MockElementLoader {
    fn find(&self, id: &str) -> Result<ObjectSeed, AfError> {
        self.log.push(format!("find({})", id));
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| AfError::NotFound(id.to_string()))
    }

    fn find_by_path(&self, path: &str) -> Result<ObjectSeed, AfError> {
        self.log.push(format!("find_by_path({})", path));
        self.by_path
            .get(path)
            .cloned()
            .ok_or_else(|| AfError::NotFound(path.to_string()))
    }

    fn update(&self, patch: &ObjectPatch) -> Result<bool, AfError> {
        self.log
            .push(format!("update({}, {})", patch.id, patch.name));
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool, AfError> {
        self.log.push(format!("delete({})", id));
        if self.fail_delete {
            return Err(AfError::Transport("backend unreachable".to_string()));
        }
        Ok(true)
    }

    fn categories(&self, _id: &str) -> Result<Vec<String>, AfError> {
        Ok(vec!["Rotating".to_string()])
    }

    fn template_name(&self, _id: &str) -> Result<Option<String>, AfError> {
        Ok(self.template.clone())
    }

    fn children(&self, id: &str, _query: &ElementQuery) -> Result<Vec<ObjectSeed>, AfError> {
        self.children_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("children({})", id));
        Ok(self.children.get(id).cloned().unwrap_or_default())
    }

    fn attributes(&self, id: &str, _query: &AttributeQuery) -> Result<Vec<ObjectSeed>, AfError> {
        self.log.push(format!("attributes({})", id));
        Ok(self.attributes.get(id).cloned().unwrap_or_default())
    }

    fn create_child(&self, parent_id: &str, child: &NewObject) -> Result<bool, AfError> {
        self.log
            .push(format!("create_child({}, {})", parent_id, child.name));
        Ok(true)
    }
}

#[derive(Default)]
struct MockAttributeLoader {
    log: Arc<Log>,
    fail_create: bool,
}

impl AttributeLoader for MockAttributeLoader {
    fn find(&self, id: &str) -> Result<ObjectSeed, AfError> {
        Err(AfError::NotFound(id.to_string()))
    }

    fn update(&self, patch: &ObjectPatch) -> Result<bool, AfError> {
        self.log.push(format!("attr_update({})", patch.id));
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool, AfError> {
        self.log.push(format!("attr_delete({})", id));
        Ok(true)
    }

    fn create(&self, owner_id: &str, attribute: &NewObject) -> Result<bool, AfError> {
        self.log
            .push(format!("attr_create({}, {})", owner_id, attribute.name));
        if self.fail_create {
            return Err(AfError::Transport("backend unreachable".to_string()));
        }
        Ok(true)
    }
}

struct MockTemplateLoader {
    log: Arc<Log>,
}

impl TemplateLoader for MockTemplateLoader {
    fn find(&self, id: &str) -> Result<ObjectSeed, AfError> {
        self.log.push(format!("template_find({})", id));
        Ok(seed("T1", id, &format!(r"Templates\{}", id)))
    }

    fn find_by_path(&self, path: &str) -> Result<ObjectSeed, AfError> {
        Err(AfError::NotFound(path.to_string()))
    }

    fn update(&self, _patch: &ObjectPatch) -> Result<bool, AfError> {
        Ok(true)
    }

    fn delete(&self, _id: &str) -> Result<bool, AfError> {
        Ok(true)
    }

    fn categories(&self, _id: &str) -> Result<Vec<String>, AfError> {
        Ok(Vec::new())
    }

    fn is_extendible(&self, _id: &str) -> Result<bool, AfError> {
        Ok(false)
    }

    fn attribute_templates(&self, _id: &str) -> Result<Vec<ObjectSeed>, AfError> {
        Ok(Vec::new())
    }

    fn create_attribute_template(
        &self,
        _template_id: &str,
        _template: &NewObject,
    ) -> Result<bool, AfError> {
        Ok(true)
    }

    fn delete_attribute_template(&self, _id: &str) -> Result<bool, AfError> {
        Ok(true)
    }
}

struct StubFrameLoader;

impl EventFrameLoader for StubFrameLoader {
    fn find(&self, id: &str) -> Result<FrameSeed, AfError> {
        Err(AfError::NotFound(id.to_string()))
    }

    fn find_by_path(&self, path: &str) -> Result<FrameSeed, AfError> {
        Err(AfError::NotFound(path.to_string()))
    }

    fn update(&self, _patch: &ObjectPatch) -> Result<bool, AfError> {
        Ok(true)
    }

    fn delete(&self, _id: &str) -> Result<bool, AfError> {
        Ok(true)
    }

    fn categories(&self, _id: &str) -> Result<Vec<String>, AfError> {
        Ok(Vec::new())
    }

    fn template_name(&self, _id: &str) -> Result<Option<String>, AfError> {
        Ok(None)
    }

    fn child_frames(&self, _id: &str, _query: &FrameQuery) -> Result<Vec<FrameSeed>, AfError> {
        Ok(Vec::new())
    }

    fn attributes(&self, _id: &str, _query: &AttributeQuery) -> Result<Vec<ObjectSeed>, AfError> {
        Ok(Vec::new())
    }

    fn referenced_elements(&self, _id: &str) -> Result<Vec<ObjectSeed>, AfError> {
        Ok(Vec::new())
    }

    fn create_child(&self, _parent_id: &str, _frame: &NewObject) -> Result<bool, AfError> {
        Ok(true)
    }

    fn create_attribute(&self, _owner_id: &str, _attribute: &NewObject) -> Result<bool, AfError> {
        Ok(true)
    }

    fn capture_values(&self, _id: &str) -> Result<bool, AfError> {
        Ok(true)
    }
}

struct StubUnitLoader;

impl UnitLoader for StubUnitLoader {
    fn find(&self, id: &str) -> Result<UnitSeed, AfError> {
        Err(AfError::NotFound(id.to_string()))
    }

    fn find_by_path(&self, path: &str) -> Result<UnitSeed, AfError> {
        Err(AfError::NotFound(path.to_string()))
    }

    fn update(&self, _patch: &ObjectPatch) -> Result<bool, AfError> {
        Ok(true)
    }

    fn delete(&self, _id: &str) -> Result<bool, AfError> {
        Ok(true)
    }
}

struct Fixture {
    log: Arc<Log>,
    elements: Arc<MockElementLoader>,
    connection: Arc<Connection>,
}

impl Fixture {
    fn new(configure: impl FnOnce(&mut MockElementLoader, &mut MockAttributeLoader)) -> Self {
        let log = Arc::new(Log::default());
        let mut elements = MockElementLoader {
            log: Arc::clone(&log),
            ..MockElementLoader::default()
        };
        let mut attributes = MockAttributeLoader {
            log: Arc::clone(&log),
            ..MockAttributeLoader::default()
        };
        configure(&mut elements, &mut attributes);

        let elements = Arc::new(elements);
        let connection = Connection::new(Loaders {
            elements: Arc::clone(&elements) as Arc<dyn ElementLoader>,
            event_frames: Arc::new(StubFrameLoader),
            attributes: Arc::new(attributes),
            templates: Arc::new(MockTemplateLoader {
                log: Arc::clone(&log),
            }),
            units: Arc::new(StubUnitLoader),
        });

        Fixture {
            log,
            elements,
            connection,
        }
    }
}

#[test]
fn add_attribute_propagates_one_create() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let attributes = element.attributes().unwrap();
    assert!(attributes.is_empty());

    let pressure = AfAttribute::draft(&fixture.connection, "Pressure", "Discharge pressure");
    attributes.add(pressure.clone()).unwrap();

    assert_eq!(fixture.log.count_of("attr_create("), 1);
    assert!(fixture
        .log
        .entries()
        .contains(&"attr_create(E1, Pressure)".to_string()));
    assert!(attributes.contains(&pressure));
    assert_eq!(attributes.len(), 1);
}

#[test]
fn remove_child_propagates_one_delete() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        elements.children.insert(
            "E1".to_string(),
            vec![
                seed("C7", "Impeller", r"Plant\Pump01\Impeller"),
                seed("C8", "Motor", r"Plant\Pump01\Motor"),
            ],
        );
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let children = element.children().unwrap();
    assert_eq!(children.len(), 2);

    let impeller = children.get(0).unwrap();
    assert_eq!(impeller.id(), "C7");
    assert!(children.remove(&impeller).unwrap());

    assert_eq!(fixture.log.count_of("delete("), 1);
    assert!(fixture.log.entries().contains(&"delete(C7)".to_string()));
    assert!(!children.contains(&impeller));
    assert_eq!(children.len(), 1);
}

#[test]
fn failed_delete_rolls_back_and_keeps_order() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        elements.children.insert(
            "E1".to_string(),
            vec![
                seed("C7", "Impeller", r"Plant\Pump01\Impeller"),
                seed("C8", "Motor", r"Plant\Pump01\Motor"),
            ],
        );
        elements.fail_delete = true;
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let children = element.children().unwrap();
    let impeller = children.get(0).unwrap();

    let err = children.remove(&impeller).unwrap_err();
    assert!(matches!(err, AfError::Transport(_)));

    let ids: Vec<_> = children.items().iter().map(|c| c.id().to_string()).collect();
    assert_eq!(ids, ["C7", "C8"]);
}

#[test]
fn failed_create_rolls_back_add() {
    let fixture = Fixture::new(|elements, attributes| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        attributes.fail_create = true;
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let attributes = element.attributes().unwrap();

    let draft = AfAttribute::draft(&fixture.connection, "Pressure", "");
    let err = attributes.add(draft).unwrap_err();
    assert!(matches!(err, AfError::Transport(_)));
    assert!(attributes.is_empty());
}

#[test]
fn unsupported_edits_are_rejected_and_state_is_unchanged() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        elements.children.insert(
            "E1".to_string(),
            vec![
                seed("A", "A", r"Plant\Pump01\A"),
                seed("B", "B", r"Plant\Pump01\B"),
            ],
        );
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let children = element.children().unwrap();

    let err = children.move_item(0, 1).unwrap_err();
    assert!(matches!(err, AfError::Unsupported(ChangeKind::Move)));

    let err = children.clear().unwrap_err();
    assert!(matches!(err, AfError::Unsupported(ChangeKind::Reset)));

    let replacement = AfElement::draft(&fixture.connection, "X", "");
    let err = children.replace(0, replacement).unwrap_err();
    assert!(matches!(err, AfError::Unsupported(ChangeKind::Replace)));

    let ids: Vec<_> = children.items().iter().map(|c| c.id().to_string()).collect();
    assert_eq!(ids, ["A", "B"]);
    // No remote call was attempted for any of the rejected edits.
    assert_eq!(fixture.log.count_of("delete("), 0);
    assert_eq!(fixture.log.count_of("create_child("), 0);
}

#[test]
fn parent_resolves_by_truncated_path() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "B", r"Root\A\B"));
        elements
            .by_path
            .insert(r"Root\A".to_string(), seed("E0", "A", r"Root\A"));
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let parent = element.parent().unwrap();
    assert_eq!(parent.id(), "E0");
    assert_eq!(parent.path(), r"Root\A");
    assert!(fixture
        .log
        .entries()
        .contains(&r"find_by_path(Root\A)".to_string()));

    // Cached: a second access issues no further lookup.
    element.parent().unwrap();
    assert_eq!(fixture.log.count_of("find_by_path("), 1);
}

#[test]
fn root_element_has_no_parent() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("R".to_string(), seed("R", "Root", "Root"));
    });

    let element = AfElement::find(&fixture.connection, "R").unwrap();
    let err = element.parent().unwrap_err();
    assert!(matches!(err, AfError::NoParent(_)));
    // The invariant is caught locally; no lookup reaches the backend.
    assert_eq!(fixture.log.count_of("find_by_path("), 0);
}

#[test]
fn relationships_load_lazily_and_once() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        elements
            .children
            .insert("E1".to_string(), vec![seed("C1", "C1", r"Plant\Pump01\C1")]);
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    assert_eq!(fixture.elements.children_calls.load(Ordering::SeqCst), 0);

    element.children().unwrap();
    element.children().unwrap();
    assert_eq!(fixture.elements.children_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn independently_fetched_proxies_do_not_share_caches() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        elements
            .children
            .insert("E1".to_string(), vec![seed("C1", "C1", r"Plant\Pump01\C1")]);
    });

    let first = AfElement::find(&fixture.connection, "E1").unwrap();
    let second = AfElement::find(&fixture.connection, "E1").unwrap();

    let first_children = first.children().unwrap();
    let second_children = second.children().unwrap();
    assert_eq!(fixture.elements.children_calls.load(Ordering::SeqCst), 2);

    let child = first_children.get(0).unwrap();
    first_children.remove(&child).unwrap();
    assert!(first_children.is_empty());
    // The other proxy's cached collection is untouched.
    assert_eq!(second_children.len(), 1);

    // A clone, by contrast, shares the same cache.
    let clone = first.clone();
    clone.children().unwrap();
    assert_eq!(fixture.elements.children_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn check_in_pushes_scalars_via_update() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    element.set_name("Pump01-renamed");
    assert!(element.check_in().unwrap());

    assert!(fixture
        .log
        .entries()
        .contains(&"update(E1, Pump01-renamed)".to_string()));
}

#[test]
fn template_resolves_through_template_loader() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
        elements.template = Some("PumpTemplate".to_string());
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let template = element.template().unwrap().unwrap();
    assert_eq!(template.name(), "PumpTemplate");
    assert!(fixture
        .log
        .entries()
        .contains(&"template_find(PumpTemplate)".to_string()));
}

#[test]
fn add_child_propagates_create_with_parent_id() {
    let fixture = Fixture::new(|elements, _| {
        elements
            .by_id
            .insert("E1".to_string(), seed("E1", "Pump01", r"Plant\Pump01"));
    });

    let element = AfElement::find(&fixture.connection, "E1").unwrap();
    let children = element.children().unwrap();

    let draft = AfElement::draft(&fixture.connection, "Seal", "Mechanical seal");
    children.add(draft).unwrap();

    assert!(fixture
        .log
        .entries()
        .contains(&"create_child(E1, Seal)".to_string()));
    assert_eq!(children.len(), 1);
}
