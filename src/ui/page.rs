use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::animate::ANIMATE_CLASS;
use crate::cards::any_card;
use crate::dom::{Document, ElementId, Selector};
use crate::site::overlay_surface;

use super::text::{pad_to_width, truncate_to_width, wrap_text};

const CONTROL_WIDTH: usize = 36;
const CARD_INDENT: usize = 2;

/// Lines an element occupies in the laid-out page, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extent {
    pub element: ElementId,
    pub first: usize,
    pub last: usize,
}

#[derive(Debug, Default)]
pub(crate) struct PageLayout {
    pub lines: Vec<Line<'static>>,
    pub extents: Vec<Extent>,
}

impl PageLayout {
    pub(crate) fn extent(&self, element: ElementId) -> Option<Extent> {
        self.extents
            .iter()
            .find(|extent| extent.element == element)
            .copied()
    }

    /// Elements with at least one line inside `[scroll, scroll + height)`.
    pub(crate) fn visible(&self, scroll: usize, height: usize) -> Vec<ElementId> {
        let end = scroll.saturating_add(height);
        self.extents
            .iter()
            .filter(|extent| extent.last >= scroll && extent.first < end)
            .map(|extent| extent.element)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Interaction state the page drawing depends on.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RenderHints {
    pub focused: Option<ElementId>,
    /// Caret position, in characters, of the text control being edited.
    pub caret: Option<usize>,
}

pub(crate) fn layout_page(doc: &dyn Document, width: u16, hints: RenderHints) -> PageLayout {
    let mut writer = PageWriter {
        doc,
        width: usize::from(width).max(1),
        hints,
        layout: PageLayout::default(),
    };
    for child in doc.children(doc.body()) {
        writer.element(child, 0);
    }
    writer.layout
}

struct PageWriter<'a> {
    doc: &'a dyn Document,
    width: usize,
    hints: RenderHints,
    layout: PageLayout,
}

impl PageWriter<'_> {
    fn element(&mut self, id: ElementId, indent: usize) {
        let doc = self.doc;
        if doc.is_hidden(id) || doc.matches(id, &overlay_surface()) {
            return;
        }
        let tag = doc.tag(id).unwrap_or_default().to_ascii_lowercase();
        if matches!(tag.as_str(), "head" | "script" | "title" | "option") {
            return;
        }
        if doc.has_class(id, "faq-answer") && !doc.has_class(id, "open") {
            return;
        }

        let first = self.layout.lines.len();
        let inline_row = tag == "nav"
            || doc.has_class(id, "enquiry-tabs")
            || doc.has_class(id, "search-container")
            || doc.has_class(id, "stat");
        if inline_row {
            self.inline_row(id, indent);
        } else {
            match tag.as_str() {
                "input" | "textarea" => self.text_control(id, indent),
                "select" => self.select(id, indent),
                "button" => self.button(id, indent),
                "a" => {
                    let span = self.link_span(id);
                    self.push(indent, vec![span]);
                }
                "img" => self.image(id, indent),
                "iframe" => self.embed(id, indent),
                _ => self.block(id, &tag, indent),
            }
        }

        let produced = self.layout.lines.len();
        if produced == first {
            return;
        }
        let extent = Extent {
            element: id,
            first,
            last: produced - 1,
        };
        self.layout.extents.push(extent);

        if doc.attr(id, "data-animate").is_some() && !doc.has_class(id, ANIMATE_CLASS) {
            for line in &mut self.layout.lines[first..produced] {
                line.style = line.style.add_modifier(Modifier::DIM);
            }
        }
        if self.hints.focused == Some(id) && doc.matches(id, &any_card()) {
            for line in &mut self.layout.lines[first..produced] {
                line.spans
                    .insert(0, Span::styled("▌", Style::default().fg(Color::Yellow)));
            }
        }
    }

    fn block(&mut self, id: ElementId, tag: &str, indent: usize) {
        let doc = self.doc;
        let is_card = doc.matches(id, &any_card());
        if matches!(tag, "h2" | "section") || is_card || doc.has_class(id, "form-group") {
            self.blank();
        }

        if let Some(text) = doc.own_text(id).map(str::trim).filter(|text| !text.is_empty()) {
            let style = self.text_style(id, tag);
            let prefix = if doc.has_class(id, "faq-question") {
                match doc.attr(id, "aria-expanded").as_deref() {
                    Some("true") => "▾ ",
                    _ => "▸ ",
                }
            } else if doc.has_class(id, "field-error") {
                "! "
            } else {
                ""
            };
            let focused = self.hints.focused == Some(id);
            let available = self.width.saturating_sub(indent + prefix.len()).max(8);
            for (index, line) in wrap_text(text, available).into_iter().enumerate() {
                let lead = if index == 0 { prefix } else { "  " };
                let lead = if prefix.is_empty() { "" } else { lead };
                let mut style = style;
                if focused {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                self.push(
                    indent,
                    vec![Span::styled(lead.to_string(), style), Span::styled(line, style)],
                );
            }
        }

        let child_indent = if is_card { indent + CARD_INDENT } else { indent };
        for child in doc.children(id) {
            self.element(child, child_indent);
        }
    }

    fn text_style(&self, id: ElementId, tag: &str) -> Style {
        let doc = self.doc;
        let base = Style::default();
        match tag {
            "h1" => base.fg(Color::Cyan).add_modifier(Modifier::BOLD),
            "h2" => base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            "h3" | "strong" => base.add_modifier(Modifier::BOLD),
            "label" => base.fg(Color::Gray),
            _ if doc.has_class(id, "field-error") => base.fg(Color::Red),
            _ if doc.has_class(id, "no-results") => {
                base.fg(Color::Yellow).add_modifier(Modifier::ITALIC)
            }
            _ if doc.has_class(id, "faq-question") => base.add_modifier(Modifier::BOLD),
            _ if doc.has_class(id, "tagline") => base.add_modifier(Modifier::ITALIC),
            _ => base,
        }
    }

    fn inline_row(&mut self, id: ElementId, indent: usize) {
        let doc = self.doc;
        let mut spans = Vec::new();
        let mut members = Vec::new();
        for child in doc.children(id) {
            if doc.is_hidden(child) {
                continue;
            }
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            let tag = doc.tag(child).unwrap_or_default().to_ascii_lowercase();
            members.push(child);
            if let (true, Some(caret)) = (self.hints.focused == Some(child), self.hints.caret) {
                let value = doc.value(child).unwrap_or_default();
                spans.extend(caret_spans(&value, caret, CONTROL_WIDTH / 2 - 2));
                continue;
            }
            let span = match tag.as_str() {
                "a" => self.link_span(child),
                "button" => self.button_span(child),
                "input" => self.text_control_span(child, CONTROL_WIDTH / 2),
                _ => {
                    let style = if doc.has_class(child, "stat-number") {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Span::styled(doc.text_content(child), style)
                }
            };
            spans.push(span);
        }
        if spans.is_empty() {
            return;
        }
        let line = self.layout.lines.len();
        self.push(indent, spans);
        for member in members {
            self.layout.extents.push(Extent {
                element: member,
                first: line,
                last: line,
            });
        }
    }

    fn link_span(&self, id: ElementId) -> Span<'static> {
        let doc = self.doc;
        let mut style = Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED);
        if doc.has_class(id, "active") {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if self.hints.focused == Some(id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Span::styled(doc.text_content(id), style)
    }

    fn button_span(&self, id: ElementId) -> Span<'static> {
        let doc = self.doc;
        let mut style = Style::default().fg(Color::Green);
        if doc.has_class(id, "active") {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if doc.attr(id, "disabled").is_some() {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.hints.focused == Some(id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Span::styled(format!("[ {} ]", doc.text_content(id)), style)
    }

    fn button(&mut self, id: ElementId, indent: usize) {
        let span = self.button_span(id);
        self.push(indent, vec![span]);
    }

    fn text_control_span(&self, id: ElementId, width: usize) -> Span<'static> {
        let doc = self.doc;
        let focused = self.hints.focused == Some(id);
        let value = doc.value(id).unwrap_or_default();
        let invalid = doc.attr(id, "aria-invalid").is_some();
        let frame = if invalid {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        let (shown, style) = if value.is_empty() && !focused {
            let placeholder = doc.attr(id, "placeholder").unwrap_or_default();
            (placeholder, frame.add_modifier(Modifier::DIM))
        } else {
            (value, frame)
        };
        let style = if focused {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        };
        let inner = width.saturating_sub(2).max(4);
        Span::styled(
            format!("[{}]", pad_to_width(&truncate_to_width(&shown, inner), inner)),
            style,
        )
    }

    fn text_control(&mut self, id: ElementId, indent: usize) {
        let width = self.width.saturating_sub(indent).clamp(8, CONTROL_WIDTH);
        let focused = self.hints.focused == Some(id);
        match (focused, self.hints.caret) {
            (true, Some(caret)) => {
                let value = self.doc.value(id).unwrap_or_default();
                let spans = caret_spans(&value, caret, width.saturating_sub(2).max(4));
                self.push(indent, spans);
            }
            _ => {
                let span = self.text_control_span(id, width);
                self.push(indent, vec![span]);
            }
        }
    }

    fn select(&mut self, id: ElementId, indent: usize) {
        let doc = self.doc;
        let value = doc.value(id).unwrap_or_default();
        let options = doc.query_within(id, &Selector::tag("option"));
        let label = options
            .iter()
            .find(|option| doc.attr(**option, "value").unwrap_or_default() == value)
            .or(options.first())
            .map(|option| doc.text_content(*option))
            .unwrap_or_default();
        let mut style = if doc.attr(id, "aria-invalid").is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        if value.is_empty() {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.hints.focused == Some(id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        self.push(indent, vec![Span::styled(format!("‹ {label} ›"), style)]);
    }

    fn image(&mut self, id: ElementId, indent: usize) {
        let doc = self.doc;
        let alt = doc.attr(id, "alt").unwrap_or_default();
        let src = doc.attr(id, "src").unwrap_or_default();
        let mut style = Style::default().fg(Color::Magenta);
        if self.hints.focused == Some(id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let detail = if src.is_empty() {
            "loading".to_string()
        } else {
            truncate_to_width(&src, self.width.saturating_sub(indent + alt.len() + 12))
        };
        self.push(
            indent,
            vec![
                Span::styled(format!("[image] {alt}"), style),
                Span::styled(format!(" ({detail})"), Style::default().add_modifier(Modifier::DIM)),
            ],
        );
    }

    fn embed(&mut self, id: ElementId, indent: usize) {
        let title = self.doc.attr(id, "title").unwrap_or_default();
        let style = Style::default().fg(Color::Magenta);
        self.push(indent, vec![Span::styled(format!("[embed] {title}"), style)]);
    }

    fn blank(&mut self) {
        if self
            .layout
            .lines
            .last()
            .is_some_and(|line| line.width() > 0)
        {
            self.layout.lines.push(Line::default());
        }
    }

    fn push(&mut self, indent: usize, mut spans: Vec<Span<'static>>) {
        if indent > 0 {
            spans.insert(0, Span::raw(" ".repeat(indent)));
        }
        self.layout.lines.push(Line::from(spans));
    }
}

/// Draws the slice of `layout` starting at line `scroll`.
pub(crate) fn draw_page(frame: &mut Frame<'_>, area: Rect, layout: &PageLayout, scroll: usize) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let lines: Vec<Line<'static>> = layout
        .lines
        .iter()
        .skip(scroll)
        .take(usize::from(area.height))
        .cloned()
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Text control with a software caret on the character at `caret`.
pub(crate) fn caret_spans(value: &str, caret: usize, width: usize) -> Vec<Span<'static>> {
    let chars: Vec<char> = value.chars().collect();
    let caret = caret.min(chars.len());
    let start = if caret >= width {
        caret + 1 - width
    } else {
        0
    };
    let mut visible: Vec<char> = chars.iter().skip(start).take(width).copied().collect();
    if visible.len() < width {
        visible.extend(std::iter::repeat_n(' ', width - visible.len()));
    }
    let caret_idx = (caret - start).min(width.saturating_sub(1));

    let mut spans = vec![Span::raw("[")];
    for (idx, ch) in visible.into_iter().enumerate() {
        if idx == caret_idx {
            spans.push(Span::styled(
                ch.to_string(),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    spans.push(Span::raw("]"));
    spans
}

#[cfg(test)]
mod tests {
    use ratatui::style::Modifier;

    use super::{PageLayout, RenderHints, caret_spans, layout_page};
    use crate::dom::{Document, ElementSpec, MemoryDocument, Selector};

    fn plain(layout: &PageLayout) -> Vec<String> {
        layout
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    fn pets_page() -> MemoryDocument {
        let mut doc = MemoryDocument::new("/pets.html");
        let body = doc.body();
        let gallery = doc
            .append_child(body, ElementSpec::new("div").class("pet-gallery"))
            .expect("body exists");
        for name in ["Joe", "Grace"] {
            let card = doc
                .append_child(gallery, ElementSpec::new("div").class("pet-card"))
                .expect("gallery exists");
            doc.append_child(card, ElementSpec::new("h3").text(name))
                .expect("card exists");
            doc.append_child(
                card,
                ElementSpec::new("button")
                    .class("btn")
                    .text(format!("Adopt {name}")),
            )
            .expect("card exists");
        }
        doc
    }

    #[test]
    fn hidden_cards_are_not_laid_out() {
        let mut doc = pets_page();
        let text = plain(&layout_page(&doc, 40, RenderHints::default()));
        assert!(text.iter().any(|line| line.contains("Grace")));

        let cards = doc.query_all(&Selector::class("pet-card"));
        doc.set_hidden(cards[1], true);
        let layout = layout_page(&doc, 40, RenderHints::default());
        assert!(!plain(&layout).iter().any(|line| line.contains("Grace")));
        assert!(layout.extent(cards[1]).is_none());
        assert!(layout.extent(cards[0]).is_some());
    }

    #[test]
    fn extents_cover_the_lines_of_each_element() {
        let doc = pets_page();
        let layout = layout_page(&doc, 40, RenderHints::default());
        let cards = doc.query_all(&Selector::class("pet-card"));
        let first = layout.extent(cards[0]).expect("first card laid out");
        let second = layout.extent(cards[1]).expect("second card laid out");
        assert!(first.last < second.first);
        let visible = layout.visible(second.first, 1);
        assert!(visible.contains(&cards[1]));
        assert!(!visible.contains(&cards[0]));
        assert!(layout.visible(layout.len(), 5).is_empty());
    }

    #[test]
    fn focused_button_is_reversed() {
        let doc = pets_page();
        let button = doc.query_all(&Selector::tag("button"))[0];
        let layout = layout_page(
            &doc,
            40,
            RenderHints {
                focused: Some(button),
                caret: None,
            },
        );
        let extent = layout.extent(button).expect("button laid out");
        let line = &layout.lines[extent.first];
        let span = line
            .spans
            .iter()
            .find(|span| span.content.contains("Adopt Joe"))
            .expect("button label rendered");
        assert!(span.style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn caret_sits_on_the_character_after_the_cursor() {
        let spans = caret_spans("abc", 1, 6);
        assert_eq!(spans[2].content.as_ref(), "b");
        assert!(spans[2].style.add_modifier.contains(Modifier::REVERSED));

        let spans = caret_spans("abcdefgh", 8, 4);
        let shown: String = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(shown, "[fgh ]");
    }
}
