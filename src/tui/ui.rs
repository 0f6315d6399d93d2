use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};
use chrono::Local;
use famly::models::Family;
use famly::planner::{current_week_dates, meals_planned_in};
use famly::schedule::reset_label;
use famly::stats::{progress_ratio, summarize, unchecked_count};
use super::app::{App, InputMode, Screen, Status, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Dashboard
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let Some(family) = app.family().cloned() else {
        f.render_widget(Paragraph::new("No current family."), chunks[1]);
        return;
    };

    render_dashboard(f, app, &family, chunks[0]);

    let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let highlight = Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray);

    match app.screen {
        Screen::Lists => {
            let now = Local::now();
            let (rows, widths, header, title): (Vec<Row>, Vec<Constraint>, Vec<&str>, String) = match app.view_mode {
                ViewMode::Tasks => (
                    family.task_lists.iter().map(|l| {
                        let left = unchecked_count(l);
                        Row::new(vec![
                            Cell::from(l.id.to_string()),
                            Cell::from(l.title.clone()),
                            Cell::from(format!("{}/{}", left, l.items.len())),
                            Cell::from(l.reset_interval.to_string()),
                            Cell::from(reset_label(&now, l.reset_interval)),
                        ]).style(left_style(left))
                    }).collect(),
                    vec![Constraint::Length(4), Constraint::Min(20), Constraint::Length(8), Constraint::Length(9), Constraint::Length(24)],
                    vec!["ID", "Title", "Left", "Interval", "Reset"],
                    format!("{} - Task Lists", family.name),
                ),
                ViewMode::Shopping => (
                    family.shopping_lists.iter().map(|l| {
                        let left = unchecked_count(l);
                        Row::new(vec![
                            Cell::from(l.id.to_string()),
                            Cell::from(l.title.clone()),
                            Cell::from(format!("{}/{}", left, l.items.len())),
                        ]).style(left_style(left))
                    }).collect(),
                    vec![Constraint::Length(4), Constraint::Min(20), Constraint::Length(8)],
                    vec!["ID", "Title", "To Buy"],
                    format!("{} - Shopping Lists", family.name),
                ),
            };

            let table = Table::new(rows, widths)
                .header(Row::new(header).style(header_style).bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title(title))
                .row_highlight_style(highlight)
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[1], &mut app.list_state);
        }
        Screen::Items(_) => {
            let (title, rows): (String, Vec<Row>) = match app.open_items() {
                Some((title, items)) => (
                    title.to_string(),
                    items.iter().map(|i| {
                        let (mark, color) = if i.is_checked { ("[x]", Color::Green) } else { ("[ ]", Color::Yellow) };
                        Row::new(vec![Cell::from(mark), Cell::from(i.name.clone())])
                            .style(Style::default().fg(color))
                    }).collect(),
                ),
                None => (String::new(), Vec::new()),
            };

            let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(20)])
                .header(Row::new(vec!["", "Item"]).style(header_style).bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title(title))
                .row_highlight_style(highlight)
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[1], &mut app.item_state);
        }
    }

    let help_text = match (&app.input_mode, &app.status) {
        (InputMode::Adding, _) => "Enter: Save | Esc: Cancel".to_string(),
        (InputMode::Normal, Some(status)) => status.text().to_string(),
        (InputMode::Normal, None) => match app.screen {
            Screen::Lists => "q: Quit | Enter: Open | a: Add List | d: Del | v: Switch Tasks/Shopping | x: Reset Due".to_string(),
            Screen::Items(_) => "q: Quit | Esc: Back | Space: Check | a: Add Item | d: Del".to_string(),
        },
    };

    let help = Paragraph::new(help_text)
        .style(help_style(app.status.as_ref()))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match (app.screen, app.view_mode) {
            (Screen::Lists, ViewMode::Tasks) => "Add Task List: Enter Title",
            (Screen::Lists, ViewMode::Shopping) => "Add Shopping List: Enter Title",
            (Screen::Items(_), ViewMode::Tasks) => "Add Task: Enter Name",
            (Screen::Items(_), ViewMode::Shopping) => "Add Item: Enter Name",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn help_style(status: Option<&Status>) -> Style {
    match status {
        Some(Status::Error(_)) => Style::default().fg(Color::Red),
        Some(Status::Info(_)) => Style::default().fg(Color::Green),
        None => Style::default().fg(Color::Gray),
    }
}

fn left_style(left: usize) -> Style {
    if left > 0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    }
}

/// Progress of the current view plus the household counters.
fn render_dashboard(f: &mut Frame, app: &App, family: &Family, area: Rect) {
    let (ratio, kind) = match app.view_mode {
        ViewMode::Tasks => (progress_ratio(&family.task_lists), "Tasks"),
        ViewMode::Shopping => (progress_ratio(&family.shopping_lists), "Shopping"),
    };
    let shopping = summarize(&family.shopping_lists);
    let tasks = summarize(&family.task_lists);
    let week = current_week_dates(Local::now().date_naive());
    let title = format!(
        "To buy: {} | Tasks due: {} | Meals this week: {}/7 | Join code: {}",
        shopping.unchecked_items,
        tasks.unchecked_items,
        meals_planned_in(&family.meal_plans, &week),
        family.join_code,
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!("{} {:.0}% done", kind, ratio * 100.0));

    f.render_widget(gauge, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let pad = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(height),
            Constraint::Length(pad),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_style_separates_errors_from_confirmations() {
        let done = Status::Info("Reset 2 task list(s)".into());
        let failed = Status::Error("no current family".into());
        assert_eq!(help_style(Some(&done)).fg, Some(Color::Green));
        assert_eq!(help_style(Some(&failed)).fg, Some(Color::Red));
        assert_eq!(help_style(None).fg, Some(Color::Gray));
        assert_eq!(done.text(), "Reset 2 task list(s)");
    }
}
