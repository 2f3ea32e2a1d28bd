use crate::dom::{Document, ElementId, ElementSpec, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxImage {
    pub src: String,
    pub alt: String,
}

impl LightboxImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Maps any signed index onto `0..len`. `len` must be non-zero.
pub fn wrap_index(index: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    let len = len as isize;
    index.rem_euclid(len) as usize
}

/// Image carousel state. `current` is always a valid index while open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightboxState {
    images: Vec<LightboxImage>,
    current: usize,
    open: bool,
}

impl LightboxState {
    /// Returns `false` and stays closed for an empty collection.
    pub fn open_at(&mut self, images: Vec<LightboxImage>, index: isize) -> bool {
        if images.is_empty() {
            return false;
        }
        self.current = wrap_index(index, images.len());
        self.images = images;
        self.open = true;
        true
    }

    pub fn next(&mut self) -> Option<&LightboxImage> {
        self.step(1)
    }

    pub fn previous(&mut self) -> Option<&LightboxImage> {
        self.step(-1)
    }

    pub fn close(&mut self) {
        self.images.clear();
        self.current = 0;
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current(&self) -> Option<&LightboxImage> {
        if !self.open {
            return None;
        }
        self.images.get(self.current)
    }

    fn step(&mut self, delta: isize) -> Option<&LightboxImage> {
        if !self.open || self.images.is_empty() {
            return None;
        }
        self.current = wrap_index(self.current as isize + delta, self.images.len());
        self.images.get(self.current)
    }
}

/// Elements of the page-wide `#lightbox` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LightboxView {
    pub root: ElementId,
    pub image: ElementId,
    pub close: ElementId,
    pub prev: ElementId,
    pub next: ElementId,
}

impl LightboxView {
    /// Reuses an existing `#lightbox` or creates it once at the end of body.
    pub(crate) fn ensure(doc: &mut dyn Document) -> Option<Self> {
        if let Some(view) = Self::find(doc) {
            return Some(view);
        }

        let body = doc.body();
        let root = doc.append_child(
            body,
            ElementSpec::new("div").class("lightbox").id("lightbox"),
        )?;
        let close = doc.append_child(
            root,
            ElementSpec::new("button")
                .class("lightbox-close")
                .attr("aria-label", "Close lightbox")
                .text("×"),
        )?;
        let nav = doc.append_child(root, ElementSpec::new("div").class("lightbox-nav"))?;
        let prev = doc.append_child(
            nav,
            ElementSpec::new("button")
                .class("lightbox-prev")
                .attr("aria-label", "Previous image")
                .text("‹"),
        )?;
        let next = doc.append_child(
            nav,
            ElementSpec::new("button")
                .class("lightbox-next")
                .attr("aria-label", "Next image")
                .text("›"),
        )?;
        let content = doc.append_child(root, ElementSpec::new("div").class("lightbox-content"))?;
        let image = doc.append_child(
            content,
            ElementSpec::new("img")
                .class("lightbox-img")
                .attr("src", "")
                .attr("alt", ""),
        )?;

        Some(Self {
            root,
            image,
            close,
            prev,
            next,
        })
    }

    fn find(doc: &dyn Document) -> Option<Self> {
        let root = doc.query(&Selector::id("lightbox"))?;
        let first = |class: &str| {
            doc.query_within(root, &Selector::class(class))
                .into_iter()
                .next()
        };
        Some(Self {
            root,
            image: first("lightbox-img")?,
            close: first("lightbox-close")?,
            prev: first("lightbox-prev")?,
            next: first("lightbox-next")?,
        })
    }

    pub(crate) fn show(&self, doc: &mut dyn Document, image: &LightboxImage) {
        doc.set_attr(self.image, "src", &image.src);
        doc.set_attr(self.image, "alt", &image.alt);
    }
}
