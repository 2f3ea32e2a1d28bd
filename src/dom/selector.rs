/// Structural element matcher understood by every [`Document`](super::Document).
///
/// Covers the subset of CSS selectors the site needs: tag, class, id,
/// attribute presence/equality, compounds, selector lists and descendant
/// combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    Id(String),
    Attr { name: String, value: Option<String> },
    /// Compound selector: every part must match the same element.
    All(Vec<Selector>),
    /// Selector list: any part may match.
    Any(Vec<Selector>),
    Descendant {
        ancestor: Box<Selector>,
        target: Box<Selector>,
    },
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn has_attr(name: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: None,
        }
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn any(parts: impl IntoIterator<Item = Selector>) -> Self {
        Self::Any(parts.into_iter().collect())
    }

    pub fn and(self, other: Selector) -> Self {
        match self {
            Self::All(mut parts) => {
                parts.push(other);
                Self::All(parts)
            }
            first => Self::All(vec![first, other]),
        }
    }

    /// `ancestor target` in CSS terms.
    pub fn within(self, ancestor: Selector) -> Self {
        Self::Descendant {
            ancestor: Box::new(ancestor),
            target: Box::new(self),
        }
    }
}
