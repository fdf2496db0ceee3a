use dermis_oracle::{Oracle, Verdict};
use dermis_timeline::TimelineBackend;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{AppMode, CompareSlot, DermApp};
use crate::report::{
    DISCLAIMER, DetailCategory, NEED_TWO_PHOTOS, format_captured, render_history_line, summary,
};

const WORKFLOW: [&str; 3] = [
    "Capture a clear photo of the skin area",
    "AI verification & pattern benchmarking",
    "Get comprehensive care report",
];

const BUSY_PHRASES: [&str; 3] = ["Scanning Textures", "Verifying Patterns", "Matching Records"];

// Event loop ticks per busy phrase.
const PHRASE_TICKS: usize = 40;

pub fn render<O, B>(frame: &mut Frame, app: &DermApp<O, B>)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Screen
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.mode {
        AppMode::Home => render_home(frame, app, chunks[1]),
        AppMode::Capture => render_capture(frame, app, chunks[1]),
        AppMode::Analyzing => render_busy(frame, app, chunks[1], "Analyzing photo"),
        AppMode::Result | AppMode::Detail => render_result(frame, app, chunks[1]),
        AppMode::History => render_history(frame, app, chunks[1]),
        AppMode::Compare => render_compare(frame, app, chunks[1]),
        AppMode::Comparing => render_busy(frame, app, chunks[1], "Analyzing progress"),
    }

    render_notice(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    if app.mode == AppMode::Detail {
        render_detail_popup(frame, app);
    }
}

fn render_header<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let title = format!(
        "derm - {}  [{} photos]",
        app.model(),
        app.timeline.len()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(header, area);
}

fn render_home<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let mut lines = vec![
        Line::from(Span::styled(
            "Smart Skin Tracking.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Workflow", Style::default().fg(Color::DarkGray))),
    ];

    for (i, step) in WORKFLOW.iter().enumerate() {
        lines.push(Line::from(format!("  {}. {}", i + 1, step)));
    }

    lines.push(Line::from(""));
    match app.timeline.last() {
        Some(last) => lines.push(Line::from(format!(
            "Last scan: {} ({})",
            last.label(),
            format_captured(last)
        ))),
        None => lines.push(Line::from("No scans yet.")),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        DISCLAIMER,
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Home"))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_capture<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input_block = Block::default().borders(Borders::ALL).title("Photo path");

    let (display_text, style) = if app.input.is_empty() {
        (
            "Type the path of a jpg, png, webp or heic photo...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.input.clone(), Style::default())
    };

    frame.render_widget(
        Paragraph::new(display_text).style(style).block(input_block),
        chunks[0],
    );

    let cursor_x = app.input[..app.cursor_pos].chars().count() as u16;
    frame.set_cursor_position((chunks[0].x + 1 + cursor_x, chunks[0].y + 1));

    let hint = Paragraph::new("Use a clear, well-lit close-up of the affected area.")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false });
    frame.render_widget(hint, chunks[1]);
}

fn render_busy<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect, title: &str)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let phrase = BUSY_PHRASES[(app.tick / PHRASE_TICKS) % BUSY_PHRASES.len()];
    let dots = ".".repeat((app.tick / 10) % 4);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{}", phrase, dots),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let paragraph =
        Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(paragraph, area);
}

fn render_result<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let Some(entry) = app.viewed_entry() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Scan - {}", format_captured(entry)));

    let Some(analysis) = entry.analysis() else {
        let paragraph = Paragraph::new("No analysis stored for this photo.").block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let (title, text) = summary(analysis);
    let mut lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(text.to_string()),
        Line::from(""),
    ];

    if let Verdict::Condition(report) = analysis.verdict() {
        for (i, category) in DetailCategory::ALL.iter().enumerate() {
            let points = category.points(&report);
            let preview = points.first().copied().unwrap_or("-");
            let selected = i == app.category_selected;

            let style = if selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if selected { "> " } else { "  " };

            lines.push(Line::from(vec![
                Span::styled(format!("{}{:<20}", marker, category.title()), style),
                Span::styled(
                    format!(" {} ({})", preview, points.len()),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            DISCLAIMER,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_detail_popup<O, B>(frame: &mut Frame, app: &DermApp<O, B>)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let Some(analysis) = app.viewed_entry().and_then(|e| e.analysis()) else {
        return;
    };
    let Verdict::Condition(report) = analysis.verdict() else {
        return;
    };

    let category = app.selected_category();
    let items: Vec<ListItem> = category
        .points(&report)
        .into_iter()
        .map(|point| ListItem::new(format!("- {}", point)))
        .collect();

    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} - {}", report.title(), category.title())),
    );

    frame.render_widget(list, area);
}

fn render_history<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let block = Block::default().borders(Borders::ALL).title("Scan Archives");

    if app.timeline.is_empty() {
        frame.render_widget(Paragraph::new("No scans yet.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .timeline
        .load_all()
        .iter()
        .enumerate()
        .map(|(i, entry)| ListItem::new(render_history_line(i, entry)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.history_selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_compare<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let block = Block::default().borders(Borders::ALL).title("Progression Mapping");

    let Some(selection) = app.selection else {
        let paragraph = Paragraph::new(NEED_TWO_PHOTOS)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let slot_line = |name: &str, slot: CompareSlot, index: usize| {
        let focused = app.compare_slot == slot;
        let description = app
            .timeline
            .get(index)
            .map(|e| format!("#{} {} - {}", index, format_captured(e), e.label()))
            .unwrap_or_default();
        let style = if focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{}{:<9}", if focused { "> " } else { "  " }, name), style),
            Span::raw(format!("< {} >", description)),
        ])
    };

    let mut lines = vec![
        slot_line("Baseline", CompareSlot::Baseline, selection.baseline),
        slot_line("Current", CompareSlot::Current, selection.current),
        Line::from(""),
    ];

    match &app.narrative {
        Some(narrative) => {
            lines.push(Line::from(Span::styled(
                "Progress Log",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.extend(narrative.lines().map(|l| Line::from(l.to_string())));
        }
        None => lines.push(Line::from(Span::styled(
            "Press Enter to analyze progress.",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_notice<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    if let Some(ref notice) = app.notice {
        let paragraph = Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
    }
}

fn render_status_bar<O, B>(frame: &mut Frame, app: &DermApp<O, B>, area: Rect)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    let status = match app.mode {
        AppMode::Home => "n: New scan  h: History  c: Compare  q: Quit",
        AppMode::Capture => "Enter: Analyze  Esc: Back",
        AppMode::Analyzing | AppMode::Comparing => "Waiting for response...  Esc: Cancel",
        AppMode::Result if app.has_details() => "↑/↓: Category  Enter: Details  n: New scan  Esc: Back",
        AppMode::Result => "n: New scan  Esc: Back",
        AppMode::Detail => "Esc: Close",
        AppMode::History => "↑/↓: Navigate  Enter: Open  c: Compare  Esc: Back",
        AppMode::Compare => "Tab: Switch side  ←/→: Pick photo  Enter: Analyze progress  Esc: Back",
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status_bar, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
