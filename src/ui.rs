//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads state: the controller's [`Snapshot`] and the UI-side [`App`].

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap},
};
use std::{collections::BTreeMap, path::Path, sync::LazyLock};

use crate::app::App;
use crate::config::Settings;
use crate::playback::{Snapshot, TransportState, View};
use crate::resources::CoverArt;
use crate::theme::{PALETTES, Palette};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("space", "play/pause");
    map.insert("n/p", "next/prev song");
    // h/l is filled dynamically from config.
    map.insert("tab", "switch view");
    map.insert("r", "rescan");
    map.insert("+/-", "volume");
    map.insert("1-6", "palette");
    map.insert("esc", "dismiss");
    map.insert("q", "quit");
    map
});

/// Render the controls help text for `view`, incorporating the seek step.
fn controls_text(view: View, seek_step: f64) -> String {
    let order: &[&str] = match view {
        View::Playback => &["j/k", "enter", "space", "n/p", "h/l", "tab", "r", "q"],
        View::Settings => &["+/-", "1-6", "space", "n/p", "tab", "q"],
        View::About => &["space", "n/p", "tab", "esc", "q"],
    };
    order
        .iter()
        .filter_map(|k| {
            if *k == "h/l" {
                Some(format!("[h/l] seek -/+{seek_step}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `MM:SS`, truncating partial seconds.
pub fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Fraction of the track played, in `0.0..=1.0`. Zero while the duration is unknown.
pub fn progress_ratio(position: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (position / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// One-line description of embedded art, e.g. `image/jpeg, 12 KiB`.
fn cover_summary(art: &CoverArt) -> String {
    let mime = art.mime.as_deref().unwrap_or("unknown type");
    let size = art.data.len();
    if size < 1024 {
        format!("{mime}, {size} B")
    } else {
        format!("{mime}, {} KiB", size / 1024)
    }
}

fn transport_label(state: TransportState) -> &'static str {
    match state {
        TransportState::Idle => "Stopped",
        TransportState::Loading => "Loading",
        TransportState::Paused => "Paused",
        TransportState::Playing => "Playing",
    }
}

fn bordered(title: &str, palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent_color()))
        .title(format!(" {title} "))
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    snap: &Snapshot<'_>,
    settings: &Settings,
    log_path: Option<&Path>,
) {
    let palette = app.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background_color())),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header: one tab per view.
    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.title())).collect();
    let selected = View::ALL.iter().position(|v| *v == snap.active_view);
    let header = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(palette.accent_color())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider("|")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent_color()))
                .title(settings.ui.header_text.as_str())
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match snap.active_view {
        View::Playback => draw_playback(frame, chunks[1], app, snap, &palette),
        View::Settings => draw_settings(frame, chunks[1], app, snap, &palette),
        View::About => draw_about(frame, chunks[1], app, snap, log_path, &palette),
    }

    let footer_text = match (&app.status, snap.notice) {
        (_, Some(notice)) => Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        (Some(status), None) => Line::from(status.as_str()),
        (None, None) => Line::from(controls_text(
            snap.active_view,
            settings.playback.seek_step_seconds,
        )),
    };
    let footer = Paragraph::new(footer_text)
        .block(bordered("controls", &palette))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);
}

fn draw_playback(frame: &mut Frame, area: Rect, app: &App, snap: &Snapshot<'_>, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    // Now-playing card
    let card = match (snap.current, snap.current_index) {
        (Some(track), Some(idx)) => {
            let cover = if snap.cover.is_some() { "[art] " } else { "" };
            vec![
                Line::from(vec![
                    Span::raw(cover),
                    Span::styled(
                        app.display_title(idx).to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(format!("{} • {}", track.artist, track.album)),
            ]
        }
        _ => vec![Line::from("Nothing selected")],
    };
    let card = Paragraph::new(card)
        .block(bordered(transport_label(snap.transport), palette))
        .wrap(Wrap { trim: true });
    frame.render_widget(card, chunks[0]);

    // Progress
    let label = format!(
        "{} / {}",
        format_mmss(snap.position),
        format_mmss(snap.duration)
    );
    let gauge = Gauge::default()
        .block(bordered("progress", palette))
        .gauge_style(Style::default().fg(palette.accent_color()))
        .ratio(progress_ratio(snap.position, snap.duration))
        .label(label);
    frame.render_widget(gauge, chunks[1]);

    // Track list. Only build items for the visible window.
    let total = app.track_count();
    let list_height = chunks[2].height.saturating_sub(2) as usize;
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let mut start = app.selected.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height)
    };

    let items: Vec<ListItem> = (start..end)
        .map(|i| {
            let marker = if Some(i) == snap.current_index {
                match snap.transport {
                    TransportState::Playing => "▶ ",
                    _ => "■ ",
                }
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{}", app.display_title(i)))
        })
        .collect();

    let title = format!("tracks ({}) {}", snap.queue.len(), app.current_dir.display());
    let list = List::new(items)
        .block(bordered(&title, palette))
        .highlight_style(
            Style::default()
                .fg(palette.accent_color())
                .add_modifier(Modifier::REVERSED),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected - start));
    }
    frame.render_stateful_widget(list, chunks[2], &mut state);
}

fn draw_settings(frame: &mut Frame, area: Rect, app: &App, snap: &Snapshot<'_>, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let percent = (snap.volume * 100.0).round() as u16;
    let volume = Gauge::default()
        .block(bordered("volume", palette))
        .gauge_style(Style::default().fg(palette.accent_color()))
        .percent(percent.min(100))
        .label(format!("{percent}%"));
    frame.render_widget(volume, chunks[0]);

    let lines: Vec<Line> = PALETTES
        .iter()
        .map(|p| {
            let marker = if p.id == app.palette().id { "> " } else { "  " };
            Line::from(vec![
                Span::raw(format!("{marker}[{}] ", p.id)),
                Span::styled("  ", Style::default().bg(p.accent_color())),
                Span::styled("  ", Style::default().bg(p.background_color())),
                Span::raw(format!(" {} / {}", p.accent, p.background)),
            ])
        })
        .collect();
    let palettes = Paragraph::new(lines).block(bordered("palette", palette));
    frame.render_widget(palettes, chunks[1]);
}

fn draw_about(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    snap: &Snapshot<'_>,
    log_path: Option<&Path>,
    palette: &Palette,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("allegro {}", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(env!("CARGO_PKG_DESCRIPTION")),
        Line::from(""),
        Line::from(format!("Folder: {}", app.current_dir.display())),
    ];
    if let Some(track) = snap.current {
        lines.push(Line::from(format!("Current file: {}", track.file.path.display())));
    }
    if let Some(art) = snap.cover {
        lines.push(Line::from(format!("Cover art: {}", cover_summary(art))));
    }
    if let Some(path) = log_path {
        lines.push(Line::from(format!("Log: {}", path.display())));
    }
    let about = Paragraph::new(lines)
        .block(bordered("about", palette))
        .wrap(Wrap { trim: true });
    frame.render_widget(about, area);
}
