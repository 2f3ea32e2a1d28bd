use super::selector::Selector;

/// Handle to an element owned by a [`Document`].
///
/// Ids are never reused, so a handle to a removed element stays a harmless
/// dangling lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Rendering boundary between the interaction core and a concrete UI.
///
/// Implementations provide the primitive element operations; queries,
/// matching and `closest` come for free on top of them.
pub trait Document {
    fn root(&self) -> ElementId;
    fn head(&self) -> ElementId;
    fn body(&self) -> ElementId;

    /// Path component of the current location, e.g. `/pets.html`.
    fn location_path(&self) -> &str;

    fn exists(&self, id: ElementId) -> bool;
    fn tag(&self, id: ElementId) -> Option<&str>;
    fn parent(&self, id: ElementId) -> Option<ElementId>;
    fn children(&self, id: ElementId) -> Vec<ElementId>;

    fn attr(&self, id: ElementId, name: &str) -> Option<String>;
    fn set_attr(&mut self, id: ElementId, name: &str, value: &str);
    fn remove_attr(&mut self, id: ElementId, name: &str);

    fn has_class(&self, id: ElementId, class: &str) -> bool;
    fn add_class(&mut self, id: ElementId, class: &str);
    fn remove_class(&mut self, id: ElementId, class: &str);

    /// Element's own text, without descendants.
    fn own_text(&self, id: ElementId) -> Option<&str>;
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Current value of a form control.
    fn value(&self, id: ElementId) -> Option<String>;
    fn set_value(&mut self, id: ElementId, value: &str);

    fn is_hidden(&self, id: ElementId) -> bool;
    fn set_hidden(&mut self, id: ElementId, hidden: bool);

    fn append_child(&mut self, parent: ElementId, spec: ElementSpec) -> Option<ElementId>;
    fn insert_before(&mut self, reference: ElementId, spec: ElementSpec) -> Option<ElementId>;
    /// Removes the element and its subtree. Returns `false` when it was
    /// already gone.
    fn remove(&mut self, id: ElementId) -> bool;

    fn active_element(&self) -> Option<ElementId>;
    /// Moves focus. Returns `false` (and leaves focus alone) when the element
    /// no longer exists.
    fn focus(&mut self, id: ElementId) -> bool;

    fn scroll_locked(&self) -> bool;
    fn set_scroll_locked(&mut self, locked: bool);

    fn prepend_child(&mut self, parent: ElementId, spec: ElementSpec) -> Option<ElementId> {
        match self.children(parent).first().copied() {
            Some(first) => self.insert_before(first, spec),
            None => self.append_child(parent, spec),
        }
    }

    fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Concatenated text of the element and all its descendants, in order.
    fn text_content(&self, id: ElementId) -> String {
        let mut parts = Vec::new();
        collect_text(self, id, &mut parts);
        parts.join(" ")
    }

    fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        match selector {
            Selector::Tag(tag) => self.tag(id).is_some_and(|own| own.eq_ignore_ascii_case(tag)),
            Selector::Class(class) => self.has_class(id, class),
            Selector::Id(expected) => self.attr(id, "id").as_deref() == Some(expected.as_str()),
            Selector::Attr { name, value } => match (self.attr(id, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            },
            Selector::All(parts) => parts.iter().all(|part| self.matches(id, part)),
            Selector::Any(parts) => parts.iter().any(|part| self.matches(id, part)),
            Selector::Descendant { ancestor, target } => {
                if !self.matches(id, target) {
                    return false;
                }
                let mut cursor = self.parent(id);
                while let Some(current) = cursor {
                    if self.matches(current, ancestor) {
                        return true;
                    }
                    cursor = self.parent(current);
                }
                false
            }
        }
    }

    /// Every matching element in document order.
    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.query_within(self.root(), selector)
    }

    fn query(&self, selector: &Selector) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Matching descendants of `scope` (excluding `scope`) in document order.
    fn query_within(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            if self.matches(id, selector) {
                found.push(id);
            }
            stack.extend(self.children(id).into_iter().rev());
        }
        found
    }

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, id: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut cursor = Some(id).filter(|id| self.exists(*id));
        while let Some(current) = cursor {
            if self.matches(current, selector) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Neither the element nor any ancestor is hidden.
    fn is_displayed(&self, id: ElementId) -> bool {
        let mut cursor = Some(id).filter(|id| self.exists(*id));
        if cursor.is_none() {
            return false;
        }
        while let Some(current) = cursor {
            if self.is_hidden(current) {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }

    fn is_inside(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

fn collect_text<D: Document + ?Sized>(doc: &D, id: ElementId, parts: &mut Vec<String>) {
    if let Some(text) = doc.own_text(id) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
    for child in doc.children(id) {
        collect_text(doc, child, parts);
    }
}
