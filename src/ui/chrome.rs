use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::input::Mode;
use crate::interaction::InteractionEvent;

use super::layout::UiLayout;
use super::text::truncate_to_width;

/// What the status bar shows for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct StatusInfo<'a> {
    pub page_title: &'a str,
    pub location: &'a str,
    pub mode: Mode,
    pub overlay_open: bool,
    pub message: &'a str,
    pub scroll: usize,
    pub total_lines: usize,
    pub last_interaction: Option<&'a InteractionEvent>,
}

pub fn draw_chrome(
    frame: &mut Frame<'_>,
    layout: UiLayout,
    info: &StatusInfo<'_>,
    debug_status_visible: bool,
) {
    if layout.status.width == 0 || layout.status.height == 0 {
        return;
    }

    let mode = match (info.mode, info.overlay_open) {
        (_, true) => "OVERLAY",
        (Mode::Edit, false) => "EDIT",
        (Mode::Browse, false) => "BROWSE",
    };
    let hints = match info.mode {
        Mode::Edit => "Tab next  Enter submit  Esc leave",
        Mode::Browse => "Tab next  Enter open  j/k scroll  q quit",
    };
    let position = if info.total_lines == 0 {
        "-".to_string()
    } else {
        format!(
            "{}/{}",
            info.scroll.saturating_add(1).min(info.total_lines),
            info.total_lines
        )
    };

    let width = usize::from(layout.status.width);
    let left = format!(" {} | {} | {mode} | {position} ", info.page_title, info.location);
    let right = if info.message.is_empty() {
        hints.to_string()
    } else {
        info.message.to_string()
    };
    let right = truncate_to_width(&right, width.saturating_sub(left.chars().count()));

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            left,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(right, Style::default().add_modifier(Modifier::DIM)),
    ]));
    let top = Rect::new(layout.status.x, layout.status.y, layout.status.width, 1);
    frame.render_widget(status, top);

    if !debug_status_visible || layout.status.height < 2 {
        return;
    }
    let debug_text = match info.last_interaction {
        Some(event) => format!(
            "last={} | details={} | page={} | at={}",
            event.kind, event.details, event.page, event.timestamp
        ),
        None => "last=-".to_string(),
    };
    let bottom = Rect::new(
        layout.status.x,
        layout.status.y + 1,
        layout.status.width,
        layout.status.height - 1,
    );
    frame.render_widget(
        Paragraph::new(truncate_to_width(&debug_text, width)),
        bottom,
    );
}
