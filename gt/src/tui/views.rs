//! TUI views and rendering
//!
//! Draws the UI from AppState. The only state rendering touches is the
//! active table's scroll offset, which depends on the pane height.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};
use tracing::trace;

use crate::tracker::{HistoryRow, NoticeLevel};

use super::state::{AppState, InteractionMode, PICKER_STATUSES, StatusPicker};

mod colors {
    use ratatui::style::Color;

    pub const ACTIVE: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const COMPLETE: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const ABANDONED: Color = Color::Rgb(255, 215, 0); // Gold
    pub const EXPIRED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
    pub const INFO: Color = Color::Rgb(100, 149, 237); // Cornflower blue
}

/// Render the whole UI
pub fn render(state: &mut AppState, frame: &mut Frame) {
    trace!(?state.interaction_mode, "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Goal input
            Constraint::Min(6),    // Active goals
            Constraint::Length(8), // History
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    render_goal_input(state, frame, chunks[1]);
    render_active_goals(state, frame, chunks[2]);
    render_history(state, frame, chunks[3]);
    render_notice(state, frame, chunks[4]);
    render_footer(frame, chunks[5]);

    match &state.interaction_mode {
        InteractionMode::Help => render_help_overlay(frame, frame.area()),
        InteractionMode::StatusSelect(picker) => render_status_picker(picker, frame, frame.area()),
        InteractionMode::ConfirmQuit(yes) => render_confirm_quit(*yes, frame, frame.area()),
        _ => {}
    }
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " Goal Tracker",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("Active: {}", state.view.active.len()),
            Style::default().fg(colors::ACTIVE),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Completed: {}", state.view.completed.len()),
            Style::default().fg(colors::COMPLETE),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Abandoned: {}", state.view.abandoned.len()),
            Style::default().fg(colors::ABANDONED),
        ),
    ];

    if state.interpreting {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "Interpreting…",
            Style::default().fg(colors::INFO).add_modifier(Modifier::ITALIC),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_goal_input(state: &AppState, frame: &mut Frame, area: Rect) {
    let (content, border) = match &state.interaction_mode {
        InteractionMode::GoalInput(text) => (
            Line::from(vec![
                Span::raw(" "),
                Span::raw(text.as_str()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                Span::styled("  (Enter to add, Esc to cancel)", Style::default().fg(colors::DIM)),
            ]),
            Style::default().fg(colors::KEYBIND),
        ),
        _ => (
            Line::from(Span::styled(
                " Press [a] and describe your goal and duration, e.g. \"finish report in 45 minutes\"",
                Style::default().fg(colors::DIM),
            )),
            Style::default(),
        ),
    };

    let title = if state.interpreting {
        " Create a New Goal (Interpreting…) "
    } else {
        " Create a New Goal "
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );
    frame.render_widget(input, area);
}

fn render_active_goals(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let total = state.view.active.len();
    trace!(count = total, "render_active_goals: called");
    let selected = state.selection.selected_index;

    // Keep the selection visible: -2 for borders, -1 for the header row
    let inner_height = area.height.saturating_sub(3) as usize;
    let scroll_offset = state.selection.scroll_to_selected(inner_height, total);

    let rows: Vec<Row> = state
        .view
        .active
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(inner_height)
        .map(|(i, goal)| {
            let mut style = if goal.expired {
                Style::default().fg(colors::EXPIRED)
            } else {
                Style::default()
            };
            if i == selected {
                style = style.bg(colors::SELECTED_BG);
            }

            Row::new(vec![
                goal.name.clone(),
                goal.start.clone(),
                goal.end.clone(),
                goal.left.clone(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(50),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let title = if total > inner_height {
        format!(
            " Active Goals ({}) showing {}-{} ",
            total,
            scroll_offset + 1,
            (scroll_offset + inner_height).min(total)
        )
    } else {
        format!(" Active Goals ({}) ", total)
    };

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["GOAL", "START", "END", "TIME LEFT"])
                .style(Style::default().add_modifier(Modifier::BOLD).fg(colors::HEADER)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(colors::HEADER)),
        );

    frame.render_widget(table, area);

    if state.view.active.is_empty() {
        render_empty_message(frame, area, "No active goals. Press [a] to add one.");
    }
}

fn render_history(state: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Goal History ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    render_history_list("Completed", &state.view.completed, colors::COMPLETE, frame, halves[0]);
    render_history_list("Abandoned", &state.view.abandoned, colors::ABANDONED, frame, halves[1]);
}

fn render_history_list(label: &str, rows: &[HistoryRow], color: Color, frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        format!("{} Goals", label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];

    if rows.is_empty() {
        lines.push(Line::from(Span::styled("  none yet", Style::default().fg(colors::DIM))));
    }

    // Newest goals win; the rest collapse into one line under the title
    let capacity = (area.height as usize).saturating_sub(1);
    let shown = if rows.len() > capacity {
        let shown = capacity.saturating_sub(1);
        lines.push(Line::from(Span::styled(
            format!("  +{} more", rows.len() - shown),
            Style::default().fg(colors::DIM),
        )));
        shown
    } else {
        rows.len()
    };
    for row in &rows[rows.len() - shown..] {
        lines.push(Line::from(format!("  {} ({} at: {})", row.name, label, row.at)));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_notice(state: &AppState, frame: &mut Frame, area: Rect) {
    let Some(notice) = &state.notice else {
        return;
    };

    let color = match notice.level {
        NoticeLevel::Success => colors::COMPLETE,
        NoticeLevel::Info => colors::INFO,
        NoticeLevel::Warning => colors::ABANDONED,
        NoticeLevel::Error => colors::EXPIRED,
    };

    let line = Paragraph::new(Line::from(Span::styled(
        format!(" {}", notice.text),
        Style::default().fg(color),
    )));
    frame.render_widget(line, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let keybinds = [
        ("[a]", "Add Goal"),
        ("[↑↓]", "Select"),
        ("[u]", "Update Status"),
        ("[r]", "Refresh"),
        ("[?]", "Help"),
        ("[q]", "Quit"),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in keybinds {
        spans.push(Span::styled(
            key,
            Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {} ", action)));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let section = |title: &'static str| Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        section("Goals"),
        key_line("a/n/i", "Describe a new goal and its duration"),
        key_line("u/Enter", "Update status of the selected goal"),
        key_line("r", "Refresh countdowns now"),
        Line::from(""),
        section("Navigation"),
        key_line("j/↓", "Move down"),
        key_line("k/↑", "Move up"),
        Line::from(""),
        section("Global"),
        key_line("?/F1", "Toggle help"),
        key_line("q", "Quit"),
        key_line("Ctrl-C", "Quit immediately"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

fn render_status_picker(picker: &StatusPicker, frame: &mut Frame, area: Rect) {
    trace!(index = picker.index, "render_status_picker: called");
    let popup_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup_area);

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" Goal: "),
            Span::styled(picker.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    for (i, status) in PICKER_STATUSES.iter().enumerate() {
        let (marker, style) = if i == picker.selected {
            (
                "▶ ",
                Style::default()
                    .fg(Color::Black)
                    .bg(colors::KEYBIND)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default())
        };
        content.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{}{:<10}", marker, status), style),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        " ↑↓: choose  Enter: Confirm Status Update  Esc: cancel",
        Style::default().fg(colors::DIM),
    )));

    let dialog = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Update Goal Status ")
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(dialog, popup_area);
}

fn render_confirm_quit(yes_selected: bool, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let yes_style = if yes_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let no_style = if !yes_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    };

    let content = vec![
        Line::from(""),
        Line::from("Goals are not saved. Quit and lose active goals?"),
        Line::from(""),
        Line::from(vec![
            Span::styled(" No ", no_style),
            Span::raw("    "),
            Span::styled(" Yes ", yes_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Tab/←→: switch  Enter: confirm  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(dialog, popup_area);
}

fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    let inner = area.inner(Margin {
        horizontal: 2,
        vertical: 2,
    });

    let empty = Paragraph::new(message)
        .style(Style::default().fg(colors::DIM))
        .alignment(Alignment::Center);

    frame.render_widget(empty, inner);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{ActiveGoalRow, Notice, TrackerView};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(state, frame)).unwrap();
        buffer_text(&terminal)
    }

    fn sample_state() -> AppState {
        let mut state = AppState::new();
        state.set_view(TrackerView {
            active: vec![ActiveGoalRow {
                index: 0,
                name: "finish report".to_string(),
                start: "09:00 AM".to_string(),
                end: "09:45 AM".to_string(),
                left: "00:44:59".to_string(),
                expired: false,
            }],
            completed: vec![HistoryRow {
                name: "walk".to_string(),
                at: "08:30 AM".to_string(),
            }],
            abandoned: vec![],
        });
        state
    }

    #[test]
    fn test_render_main_screen() {
        let mut state = sample_state();
        state.set_notice(Notice::success("Goal 'finish report' added successfully for 45 minutes!"));
        let text = draw(&mut state);

        assert!(text.contains("Create a New Goal"));
        assert!(text.contains("Active Goals (1)"));
        assert!(text.contains("finish report"));
        assert!(text.contains("00:44:59"));
        assert!(text.contains("walk (Completed at: 08:30 AM)"));
        assert!(text.contains("added successfully for 45 minutes!"));
    }

    #[test]
    fn test_render_interpreting_indicator() {
        let mut state = AppState::new();
        state.interpreting = true;
        assert!(draw(&mut state).contains("Interpreting…"));
    }

    #[test]
    fn test_render_status_picker() {
        let mut state = sample_state();
        state.interaction_mode = InteractionMode::StatusSelect(StatusPicker {
            index: 0,
            name: "finish report".to_string(),
            selected: 1,
        });
        let text = draw(&mut state);
        assert!(text.contains("Update Goal Status"));
        assert!(text.contains("Abandoned"));
        assert!(text.contains("Deleted"));
    }

    fn overflowing_state() -> AppState {
        let mut state = AppState::new();
        let active = (0..20)
            .map(|index| ActiveGoalRow {
                index,
                name: format!("goal-number-{:02}", index),
                start: "09:00 AM".to_string(),
                end: "10:00 AM".to_string(),
                left: "00:30:00".to_string(),
                expired: false,
            })
            .collect();
        let completed = (0..8)
            .map(|i| HistoryRow {
                name: format!("done-{:02}", i),
                at: "08:30 AM".to_string(),
            })
            .collect();
        state.set_view(TrackerView {
            active,
            completed,
            abandoned: vec![],
        });
        state
    }

    #[test]
    fn test_active_table_follows_selection() {
        let mut state = overflowing_state();
        state.selection.selected_index = 19;
        let text = draw(&mut state);

        assert!(text.contains("goal-number-19"));
        assert!(!text.contains("goal-number-00"));
        assert!(text.contains("Active Goals (20) showing"));
        assert!(state.selection.scroll_offset > 0);

        // Back to the top scrolls the window up again
        state.selection.selected_index = 0;
        let text = draw(&mut state);
        assert!(text.contains("goal-number-00"));
        assert!(!text.contains("goal-number-19"));
        assert_eq!(state.selection.scroll_offset, 0);
    }

    #[test]
    fn test_history_overflow_keeps_newest() {
        let mut state = overflowing_state();
        let text = draw(&mut state);

        assert!(text.contains("done-07 (Completed at: 08:30 AM)"));
        assert!(!text.contains("done-00"));
        assert!(text.contains("+4 more"));
        assert!(text.contains("none yet"));
    }
}
