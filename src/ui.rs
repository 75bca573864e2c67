use crate::app::{App, Focus, Tab};
use crate::calendar::MonthView;
use crate::text_input::TextInput;
use color_eyre::Result;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI { terminal })
    }

    pub fn display(&mut self, app: &App) -> Result<()> {
        self.terminal.draw(|f| render(f, app))?;
        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(chunks[1]);

    render_calendar(f, app, body[0]);
    match app.tab {
        Tab::Journal => render_journal(f, app, body[1]),
        Tab::Notes => render_notes(f, app, body[1]),
    }

    let status = Paragraph::new(app.status_line()).style(status_style(app));
    f.render_widget(status, chunks[2]);

    let controls = Paragraph::new(controls_line(app))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(controls, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let title = Paragraph::new("Personal Journal")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, halves[0]);

    let selected = match app.tab {
        Tab::Journal => 0,
        Tab::Notes => 1,
    };
    let tabs = Tabs::new(vec!["F1 Journal", "F2 Notes"])
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(tabs, halves[1]);
}

fn render_calendar(f: &mut Frame, app: &App, area: Rect) {
    let view = app.month_view();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(4)])
        .split(area);

    let grid = Paragraph::new(calendar_lines(&view)).block(framed(
        view.title(),
        app.focus == Focus::Calendar,
    ));
    f.render_widget(grid, chunks[0]);

    let progress = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} / {}", view.journaled(), view.days.len()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("days journaled this month"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Monthly Progress"));
    f.render_widget(progress, chunks[1]);
}

fn calendar_lines(view: &MonthView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Su Mo Tu We Th Fr Sa",
        Style::default().fg(Color::DarkGray),
    ))];
    for week in view.weeks() {
        let spans: Vec<Span> = week
            .into_iter()
            .map(|cell| match cell {
                None => Span::raw("   "),
                Some(day) => {
                    let mut style = Style::default();
                    if day.has_entry {
                        style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                    }
                    if day.is_today {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    if day.is_selected {
                        style = style.fg(Color::White).bg(Color::Blue);
                    }
                    Span::styled(format!("{:>2} ", day.date.format("%-d")), style)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn render_journal(f: &mut Frame, app: &App, area: Rect) {
    let results = app.search_results();
    let results_height = if results.is_empty() {
        0
    } else {
        results.len().min(5) as u16 + 2
    };
    let images_height = (app.editor.attachments.images().len()
        + app.editor.attachments.pending().count())
    .clamp(1, 4) as u16
        + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(results_height),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(images_height),
            Constraint::Min(5),
        ])
        .split(area);

    let search = Paragraph::new(single_line(&app.search, chunks[0], app.focus == Focus::Search))
        .block(framed("Search entries", app.focus == Focus::Search));
    f.render_widget(search, chunks[0]);

    if !results.is_empty() {
        let items: Vec<ListItem> = results
            .iter()
            .map(|e| {
                ListItem::new(Line::from(Span::raw(format!(
                    "[{}] {}",
                    e.day(),
                    if e.title.is_empty() {
                        e.content.lines().next().unwrap_or("")
                    } else {
                        e.title.as_str()
                    }
                ))))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!("Results ({})", results.len())))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        f.render_stateful_widget(
            list,
            chunks[1],
            &mut ListState::default().with_selected(Some(app.result_index)),
        );
    }

    let date = Paragraph::new(app.editor.day.format("%A, %B %-d, %Y").to_string()).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(date, chunks[2]);

    let title = Paragraph::new(single_line(&app.editor.title, chunks[3], app.focus == Focus::Title))
        .block(framed("Title", app.focus == Focus::Title));
    f.render_widget(title, chunks[3]);

    render_images(f, app, chunks[4]);

    let content = if app.focus == Focus::Content {
        app.editor.content.with_cursor()
    } else {
        app.editor.content.value().to_string()
    };
    let content = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(framed("Entry", app.focus == Focus::Content));
    f.render_widget(content, chunks[5]);
}

fn render_images(f: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Images | Focus::ImagePath);
    if app.focus == Focus::ImagePath {
        let prompt = Paragraph::new(single_line(&app.editor.path, area, true))
            .block(framed("Image file path (Enter to upload)", true));
        f.render_widget(prompt, area);
        return;
    }

    let mut items: Vec<ListItem> = app
        .editor
        .attachments
        .images()
        .iter()
        .map(|url| ListItem::new(url.as_str()))
        .collect();
    items.extend(app.editor.attachments.pending().map(|label| {
        ListItem::new(Span::styled(
            format!("uploading {label}..."),
            Style::default().fg(Color::DarkGray),
        ))
    }));
    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "no images",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let list = List::new(items)
        .block(framed("Images", focused))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let selected = (focused && !app.editor.attachments.images().is_empty())
        .then_some(app.editor.image_cursor);
    f.render_stateful_widget(list, area, &mut ListState::default().with_selected(selected));
}

fn render_notes(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(8),
        ])
        .split(area);

    let editor = &app.note_editor;
    let title = Paragraph::new(single_line(&editor.title, chunks[0], app.focus == Focus::Title))
        .block(framed("Quick note title", app.focus == Focus::Title));
    f.render_widget(title, chunks[0]);

    let content = if app.focus == Focus::Content {
        editor.content.with_cursor()
    } else {
        editor.content.value().to_string()
    };
    let content = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(framed("Write a quick note...", app.focus == Focus::Content));
    f.render_widget(content, chunks[1]);

    let items: Vec<ListItem> = app
        .notes
        .iter()
        .rev()
        .map(|n| {
            ListItem::new(Line::from(Span::raw(format!(
                "[{}] {}",
                n.created_at.format("%Y-%m-%d %H:%M"),
                if n.title.is_empty() {
                    n.content.lines().next().unwrap_or("")
                } else {
                    n.title.as_str()
                }
            ))))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Notes"));
    f.render_widget(list, chunks[2]);
}

fn single_line(input: &TextInput, area: Rect, focused: bool) -> String {
    if focused {
        input.visible_tail(area.width.saturating_sub(2) as usize)
    } else {
        input.value().to_string()
    }
}

fn framed<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn status_style(app: &App) -> Style {
    if app.status_line().contains("failed") || app.status_line().contains("not ") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

fn controls_line(app: &App) -> Line<'static> {
    let keys: &[(&str, &str)] = match app.focus {
        Focus::Calendar => &[
            ("arrows", " day/week, "),
            ("PgUp/PgDn", " month, "),
            ("t", " today, "),
            ("/", " search, "),
            ("Enter", " edit, "),
            ("q", " quit"),
        ],
        Focus::Search => &[
            ("Up/Down", " pick, "),
            ("Enter", " open day, "),
            ("Esc", " back"),
        ],
        Focus::Title | Focus::Content => &[
            ("Ctrl-S", " save, "),
            ("Tab", " next field, "),
            ("Esc", " back"),
        ],
        Focus::Images => &[
            ("a", " attach, "),
            ("d", " detach, "),
            ("Ctrl-S", " save, "),
            ("Esc", " back"),
        ],
        Focus::ImagePath => &[("Enter", " upload, "), ("Esc", " cancel")],
    };
    let mut spans = vec![Span::raw("Press ")];
    for (key, action) in keys {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(action.to_string()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::entry_on;
    use crate::entry_store::EntryStore;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for (i, cell) in buffer.content.iter().enumerate() {
            text.push_str(cell.symbol());
            if (i + 1) % width == 0 {
                text.push('\n');
            }
        }
        text
    }

    fn app() -> App {
        let store = EntryStore::from_entries(vec![
            entry_on("a", "Beach", "Sun", 2024, 5, 1),
            entry_on("b", "Work", "Meetings", 2024, 5, 2),
        ]);
        App::new(store, Vec::new(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), 1024)
    }

    #[test]
    fn journal_screen_shows_month_progress_and_entry() {
        let text = screen(&app());
        assert!(text.contains("May 2024"));
        assert!(text.contains("2 / 31"));
        assert!(text.contains("Thursday, May 2, 2024"));
        assert!(text.contains("Work"));
        assert!(text.contains("Meetings"));
    }

    #[test]
    fn search_hits_are_listed() {
        let mut app = app();
        app.search.set("beach");
        let text = screen(&app);
        assert!(text.contains("Results (1)"));
        assert!(text.contains("[2024-05-01] Beach"));
    }

    #[test]
    fn notes_tab_renders_its_editor() {
        let mut app = app();
        app.switch_tab(Tab::Notes);
        let text = screen(&app);
        assert!(text.contains("Quick note title"));
        assert!(!text.contains("Search entries"));
    }
}
