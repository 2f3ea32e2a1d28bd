use crate::dom::{Document, ElementId, ElementSpec};

pub const DEFAULT_TITLE: &str = "Notice";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBlock {
    Paragraph(String),
    /// `<p><strong>label</strong> value</p>`
    Labelled { label: String, value: String },
}

/// Structured modal body: a heading plus paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub blocks: Vec<ModalBlock>,
}

impl ModalContent {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            blocks: vec![ModalBlock::Paragraph(message.into())],
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(ModalBlock::Paragraph(text.into()));
        self
    }

    pub fn labelled(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.blocks.push(ModalBlock::Labelled {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn plain_text(&self) -> String {
        let mut lines = vec![self.title.clone()];
        for block in &self.blocks {
            match block {
                ModalBlock::Paragraph(text) => lines.push(text.clone()),
                ModalBlock::Labelled { label, value } => lines.push(format!("{label} {value}")),
            }
        }
        lines.join("\n")
    }
}

impl From<&str> for ModalContent {
    fn from(message: &str) -> Self {
        Self::notice(message)
    }
}

impl From<String> for ModalContent {
    fn from(message: String) -> Self {
        Self::notice(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub content: ModalContent,
    pub overlay: ElementId,
    pub panel: ElementId,
    pub close_button: ElementId,
    /// Lookup key only; the element may be gone by the time the modal closes.
    pub previously_focused: Option<ElementId>,
}

/// Builds the overlay subtree under `<body>`, focuses the close control and
/// locks scrolling. `None` when the document has no body to mount into.
pub(crate) fn mount(
    doc: &mut dyn Document,
    content: ModalContent,
    previously_focused: Option<ElementId>,
) -> Option<ModalState> {
    let body = doc.body();
    let overlay = doc.append_child(body, ElementSpec::new("div").class("modal-overlay"))?;
    let panel = doc.append_child(
        overlay,
        ElementSpec::new("div")
            .class("modal-content")
            .attr("role", "dialog")
            .attr("aria-labelledby", "modal-title")
            .attr("aria-modal", "true"),
    )?;
    doc.append_child(
        panel,
        ElementSpec::new("h3").id("modal-title").text(&content.title),
    )?;
    for block in &content.blocks {
        match block {
            ModalBlock::Paragraph(text) => {
                doc.append_child(panel, ElementSpec::new("p").text(text))?;
            }
            ModalBlock::Labelled { label, value } => {
                let paragraph = doc.append_child(panel, ElementSpec::new("p"))?;
                doc.append_child(paragraph, ElementSpec::new("strong").text(label))?;
                doc.append_child(paragraph, ElementSpec::new("span").text(value))?;
            }
        }
    }
    let close_button = doc.append_child(
        panel,
        ElementSpec::new("button")
            .class("btn")
            .class("modal-close")
            .text("Close"),
    )?;

    doc.focus(close_button);
    doc.set_scroll_locked(true);

    Some(ModalState {
        content,
        overlay,
        panel,
        close_button,
        previously_focused,
    })
}

pub(crate) fn unmount(doc: &mut dyn Document, state: &ModalState, restore_focus: bool) {
    doc.remove(state.overlay);
    doc.set_scroll_locked(false);
    if restore_focus && let Some(previous) = state.previously_focused {
        // A vanished element simply keeps focus unset.
        doc.focus(previous);
    }
}
