use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::dom::{Document, ElementId, Selector};
use crate::overlay::{LightboxState, ModalBlock, ModalState};

use super::layout::centered_rect;

pub(crate) fn draw_modal_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    modal: &ModalState,
    focused: Option<ElementId>,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut lines = Vec::new();
    for block in &modal.content.blocks {
        match block {
            ModalBlock::Paragraph(text) => lines.push(Line::from(text.clone())),
            ModalBlock::Labelled { label, value } => lines.push(Line::from(vec![
                Span::styled(label.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::raw(value.clone()),
            ])),
        }
        lines.push(Line::default());
    }

    let popup_width = area.width.min(64);
    let text_width = popup_width.saturating_sub(2).max(1);
    let body_height = lines.iter().fold(0u16, |total, line| {
        let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
        total.saturating_add(width.div_ceil(text_width).max(1))
    });
    let popup_height = body_height.saturating_add(3).max(5).min(area.height);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", modal.content.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[0]);

    let mut close_style = Style::default().fg(Color::Green);
    if focused == Some(modal.close_button) {
        close_style = close_style.add_modifier(Modifier::REVERSED);
    }
    frame.render_widget(
        Paragraph::new(Span::styled("[ Close ]", close_style)).alignment(Alignment::Center),
        chunks[1],
    );
}

pub(crate) fn draw_lightbox_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    doc: &dyn Document,
    root: ElementId,
    lightbox: &LightboxState,
    focused: Option<ElementId>,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let Some(image) = lightbox.current() else {
        return;
    };

    let popup_width = area.width.saturating_sub(4).max(1);
    let popup_height = area.height.min(9);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(
            " Image {} of {} ",
            lightbox.current_index() + 1,
            lightbox.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let control = |class: &str, label: &str| {
        let element = doc
            .query_within(root, &Selector::class(class))
            .into_iter()
            .next();
        let mut style = Style::default().fg(Color::Green);
        if focused.is_some() && element == focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Span::styled(format!("[ {label} ]"), style)
    };

    let lines = vec![
        Line::from(Span::styled(
            image.alt.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            image.src.clone(),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::default(),
        Line::from(vec![
            control("lightbox-prev", "‹ Prev"),
            Span::raw("  "),
            control("lightbox-next", "Next ›"),
            Span::raw("  "),
            control("lightbox-close", "× Close"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
