//! UI rendering using ratatui

use cloakdiff_core::Side;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Geometry, Phase, COPIED_LABEL, COPY_LABEL};

/// Primary accent color
pub(super) const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
pub(super) const SECONDARY: Color = Color::DarkGray;
/// Highlight color for code and the active divider
pub(super) const HIGHLIGHT: Color = Color::Yellow;
/// Success color
pub(super) const SUCCESS: Color = Color::Green;
/// Dim text color
pub(super) const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let geometry = Geometry::compute(frame.area(), app.layout());

    match &app.phase {
        Phase::Loading => render_loading(frame, app, geometry.body),
        Phase::Failed(message) => render_failure(frame, message, geometry.body),
        Phase::Ready => {
            for side in Side::BOTH {
                render_pane(frame, app, side, geometry.pane(side));
            }
            render_divider(frame, app, geometry.divider);
        }
    }

    render_status_bar(frame, app, geometry.status);
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading comparison…",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(app.target_description(), Style::default().fg(DIM))),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SECONDARY)),
        );
    frame.render_widget(paragraph, area);
}

fn render_failure(frame: &mut Frame, message: &str, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Could not load the comparison",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("r retry · q quit", Style::default().fg(DIM))),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .title_style(Style::default().fg(Color::Red))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(paragraph, area);
}

/// Render one pane: header with label, kind badge and copy button; scrolled body
fn render_pane(frame: &mut Frame, app: &App, side: Side, area: Rect) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let pane = session.pane(side);
    let is_focused = app.focus == side;
    let copied = session.ack().is_copied(side);

    let border_style = if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(SECONDARY)
    };
    let label_style = if is_focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", pane.label()), label_style),
        Span::styled(format!("[{}] ", pane.kind().badge()), Style::default().fg(DIM)),
    ]);
    let button = if copied {
        Span::styled(
            COPIED_LABEL,
            Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(COPY_LABEL, Style::default().fg(HIGHLIGHT))
    };

    let block = Block::default()
        .title(title)
        .title(Line::from(button).right_aligned())
        .borders(Borders::ALL)
        .border_style(border_style);

    let scroll = u16::try_from(pane.scroll()).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(app.body(side).clone())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_divider(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.layout().is_dragging() {
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(SECONDARY)
    };
    let lines: Vec<Line> = (0..area.height)
        .map(|_| Line::from(Span::styled("┃", style)))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (mode, mode_color) = match app.phase {
        Phase::Loading => (" LOADING ", HIGHLIGHT),
        Phase::Failed(_) => (" ERROR ", Color::Red),
        Phase::Ready if app.layout().is_dragging() => (" RESIZE ", HIGHLIGHT),
        Phase::Ready => (" VIEW ", ACCENT),
    };

    let mut spans = vec![Span::styled(
        mode,
        Style::default()
            .fg(Color::Black)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(scenario) = &app.scenario {
        spans.push(Span::styled(
            format!(" sample:{scenario} "),
            Style::default().fg(ACCENT),
        ));
    }

    let ratio = app.layout().ratio();
    spans.push(Span::styled(
        format!(" split {:.0}/{:.0} ", ratio * 100.0, (1.0 - ratio) * 100.0),
        Style::default().fg(Color::White),
    ));

    if let Some(msg) = &app.status_message {
        spans.push(Span::styled(format!(" {msg} "), Style::default().fg(SUCCESS)));
    }

    let hints = if app.scenario.is_some() {
        " c copy · tab focus · </>/= split · s sample · q quit"
    } else {
        " c copy · tab focus · </>/= split · q quit"
    };
    spans.push(Span::styled(hints, Style::default().fg(DIM)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
