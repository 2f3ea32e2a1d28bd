use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub page: Rect,
    pub status: Rect,
}

/// Page viewport on top, status bar below. The debug bar adds a second row
/// with the latest tracked interaction.
pub fn split_layout(area: Rect, debug_status_visible: bool) -> UiLayout {
    let status_height = if debug_status_visible { 2 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(status_height)])
        .split(area);

    UiLayout {
        page: chunks[0],
        status: chunks[1],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
