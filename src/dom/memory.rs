use std::collections::BTreeMap;

use super::document::{Document, ElementId, ElementSpec};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<String>,
    hidden: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn from_spec(spec: ElementSpec, parent: Option<ElementId>) -> Self {
        let value = match spec.tag.as_str() {
            "input" | "textarea" | "select" => Some(String::new()),
            _ => None,
        };
        let mut classes = Vec::new();
        for class in spec.classes {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        Self {
            tag: spec.tag,
            classes,
            attrs: spec.attrs.into_iter().collect(),
            text: spec.text,
            value,
            hidden: false,
            parent,
            children: Vec::new(),
        }
    }
}

/// Arena-backed element tree.
///
/// Slots of removed elements stay `None` so stale [`ElementId`]s resolve to
/// nothing instead of to a different element.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Option<Node>>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    location_path: String,
    active: Option<ElementId>,
    scroll_locked: bool,
}

impl MemoryDocument {
    pub fn new(location_path: impl Into<String>) -> Self {
        let mut doc = Self {
            nodes: vec![Some(Node::from_spec(ElementSpec::new("html"), None))],
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
            location_path: location_path.into(),
            active: None,
            scroll_locked: false,
        };
        let root = doc.root;
        doc.head = doc.push_node(root, ElementSpec::new("head"));
        doc.body = doc.push_node(root, ElementSpec::new("body"));
        let (head, body) = (doc.head, doc.body);
        if let Some(node) = doc.node_mut(root) {
            node.children.extend([head, body]);
        }
        doc
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn classes(&self, id: ElementId) -> &[String] {
        self.node(id).map(|node| node.classes.as_slice()).unwrap_or(&[])
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn push_node(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(Node::from_spec(spec, Some(parent))));
        id
    }

    fn detach_subtree(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
            }
            if self.active == Some(current) {
                self.active = None;
            }
        }
    }
}

impl Document for MemoryDocument {
    fn root(&self) -> ElementId {
        self.root
    }

    fn head(&self) -> ElementId {
        self.head
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn location_path(&self) -> &str {
        &self.location_path
    }

    fn exists(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    fn tag(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|node| node.parent)
    }

    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn attr(&self, id: ElementId, name: &str) -> Option<String> {
        self.node(id).and_then(|node| node.attrs.get(name).cloned())
    }

    fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attr(&mut self, id: ElementId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.remove(name);
        }
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node(id)
            .is_some_and(|node| node.classes.iter().any(|own| own == class))
    }

    fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.node_mut(id)
            && !node.classes.iter().any(|own| own == class)
        {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.retain(|own| own != class);
        }
    }

    fn own_text(&self, id: ElementId) -> Option<&str> {
        self.node(id).and_then(|node| node.text.as_deref())
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.to_string());
        }
    }

    fn value(&self, id: ElementId) -> Option<String> {
        self.node(id).and_then(|node| node.value.clone())
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.value = Some(value.to_string());
        }
    }

    fn is_hidden(&self, id: ElementId) -> bool {
        self.node(id).is_none_or(|node| node.hidden)
    }

    fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(node) = self.node_mut(id) {
            node.hidden = hidden;
        }
    }

    fn append_child(&mut self, parent: ElementId, spec: ElementSpec) -> Option<ElementId> {
        if !self.exists(parent) {
            return None;
        }
        let id = self.push_node(parent, spec);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        Some(id)
    }

    fn insert_before(&mut self, reference: ElementId, spec: ElementSpec) -> Option<ElementId> {
        let parent = self.parent(reference)?;
        let id = self.push_node(parent, spec);
        let parent_node = self.node_mut(parent)?;
        let position = parent_node
            .children
            .iter()
            .position(|child| *child == reference)
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(position, id);
        Some(id)
    }

    fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || !self.exists(id) {
            return false;
        }
        if let Some(parent) = self.parent(id)
            && let Some(parent_node) = self.node_mut(parent)
        {
            parent_node.children.retain(|child| *child != id);
        }
        self.detach_subtree(id);
        true
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.filter(|id| self.exists(*id))
    }

    fn focus(&mut self, id: ElementId) -> bool {
        if !self.exists(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}
