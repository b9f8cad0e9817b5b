use crate::aggregate::{memo_totals, recent_trend, TrendView, TOP_MEMO_BUCKETS};
use crate::cart::{Cart, CartError};
use crate::ledger::{HistoryLedger, HistoryRecord};
use crate::parser::parse_price;
use crate::settings::{Settings, SettingsStore};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Calc,
    History,
    Chart,
    Settings,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Calc => Page::History,
            Page::History => Page::Chart,
            Page::Chart => Page::Settings,
            Page::Settings => Page::Calc,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Calc => Page::Settings,
            Page::History => Page::Calc,
            Page::Chart => Page::History,
            Page::Settings => Page::Chart,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Calc => "Calc",
            Page::History => "History",
            Page::Chart => "Chart",
            Page::Settings => "Settings",
        }
    }
}

/// Which text box currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Price,
    Memo,
    TaxRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
}

/// One-line user feedback shown in the status bar, the TUI equivalent of
/// the success / info / warning messages of the original tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Info, text: text.into() }
    }

    fn success(text: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Success, text: text.into() }
    }

    fn warning(text: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Warning, text: text.into() }
    }
}

const WINDOW_MIN: usize = 5;
const WINDOW_MAX: usize = 50;
const WINDOW_DEFAULT: usize = 15;

pub struct App {
    pub cart: Cart,
    pub settings: Settings,
    pub settings_store: SettingsStore,
    pub ledger: HistoryLedger,
    pub history: Vec<HistoryRecord>,
    pub current_page: Page,
    pub editing: Option<InputField>,
    pub price_input: String,
    pub memo_input: String,
    pub tax_input: String,
    pub chart_window: usize,
    pub confirm_delete: bool,
    pub notice: Option<Notice>,
    pub history_state: TableState,
}

impl App {
    pub fn new(settings_store: SettingsStore, ledger: HistoryLedger) -> Result<Self> {
        let settings = settings_store.load();
        let history = ledger.read_all()?;

        let mut history_state = TableState::default();
        if !history.is_empty() {
            history_state.select(Some(history.len() - 1));
        }

        Ok(Self {
            cart: Cart::new(),
            settings,
            settings_store,
            ledger,
            history,
            current_page: Page::Calc,
            editing: None,
            price_input: String::new(),
            memo_input: String::new(),
            tax_input: String::new(),
            chart_window: WINDOW_DEFAULT,
            confirm_delete: false,
            notice: None,
            history_state,
        })
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.confirm_delete = false;
        self.editing = None;
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.confirm_delete = false;
        self.editing = None;
    }

    /// Parse and add the current price input. Invalid text is skipped with
    /// a warning, never an error.
    pub fn submit_price(&mut self) {
        let text = self.price_input.clone();
        self.price_input.clear();

        match parse_price(&text) {
            Some(value) => {
                self.cart.add(value);
                self.notice = Some(Notice::success(format!("Added {:.2}", value)));
            }
            None => {
                self.notice = Some(Notice::warning("Not a readable number, skipped"));
            }
        }
    }

    pub fn undo(&mut self) {
        match self.cart.undo() {
            Ok(removed) => {
                self.notice = Some(Notice::info(format!("Removed {:.2}", removed)));
            }
            Err(CartError::Empty) => {
                self.notice = Some(Notice::warning("Nothing to undo"));
            }
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.notice = Some(Notice::info("Cart cleared"));
    }

    /// Commit the current cart to the ledger with the memo as its label.
    pub fn save_to_history(&mut self) {
        if self.cart.is_empty() {
            self.notice = Some(Notice::warning("Cart is empty, nothing to save"));
            return;
        }

        let record = self.cart.to_record(self.settings.tax_rate, self.memo_input.trim());
        match self.ledger.append(&record) {
            Ok(()) => {
                self.notice = Some(Notice::success("Saved to history"));
                self.reload_history();
            }
            Err(err) => {
                self.notice = Some(Notice::warning(format!("Save failed: {}", err)));
            }
        }
    }

    /// Two-step destructive delete: first call arms, second call erases.
    pub fn delete_history(&mut self) {
        if !self.confirm_delete {
            self.confirm_delete = true;
            self.notice = Some(Notice::warning(
                "Delete ALL history? This cannot be undone. Press y to confirm, n to cancel",
            ));
            return;
        }

        self.confirm_delete = false;
        match self.ledger.clear() {
            Ok(true) => {
                self.notice = Some(Notice::success("History deleted"));
                self.reload_history();
            }
            Ok(false) => {
                self.notice = Some(Notice::info("No history file yet"));
            }
            Err(err) => {
                self.notice = Some(Notice::warning(format!("Delete failed: {}", err)));
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        if self.confirm_delete {
            self.confirm_delete = false;
            self.notice = Some(Notice::info("Delete cancelled"));
        }
    }

    /// Parse the tax input as a percentage (0-100) and persist it.
    pub fn apply_tax_input(&mut self) {
        let text = self.tax_input.clone();
        self.tax_input.clear();

        let pct = match text.trim().parse::<f64>() {
            Ok(p) if (0.0..=100.0).contains(&p) => p,
            _ => {
                self.notice = Some(Notice::warning("Tax rate must be a number from 0 to 100"));
                return;
            }
        };

        self.settings.tax_rate = pct / 100.0;
        match self.settings_store.save(&self.settings) {
            Ok(()) => {
                self.notice = Some(Notice::success(format!("Tax rate saved: {:.1}%", pct)));
            }
            Err(err) => {
                self.notice = Some(Notice::warning(format!("Save failed: {}", err)));
            }
        }
    }

    pub fn widen_window(&mut self) {
        if self.chart_window < WINDOW_MAX {
            self.chart_window += 1;
        }
    }

    pub fn narrow_window(&mut self) {
        if self.chart_window > WINDOW_MIN {
            self.chart_window -= 1;
        }
    }

    fn reload_history(&mut self) {
        match self.ledger.read_all() {
            Ok(history) => {
                self.history = history;
                if self.history.is_empty() {
                    self.history_state.select(None);
                } else {
                    self.history_state.select(Some(self.history.len() - 1));
                }
            }
            Err(err) => {
                self.notice = Some(Notice::warning(format!("History reload failed: {}", err)));
            }
        }
    }

    pub fn next_row(&mut self) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.history_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.history_state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Text boxes capture keystrokes while editing
            if let Some(field) = app.editing {
                match key.code {
                    KeyCode::Enter => {
                        app.editing = None;
                        match field {
                            InputField::Price => {
                                app.submit_price();
                                // Keep the box focused: prices are entered in runs
                                app.editing = Some(InputField::Price);
                            }
                            InputField::Memo => {}
                            InputField::TaxRate => app.apply_tax_input(),
                        }
                    }
                    KeyCode::Esc => {
                        app.editing = None;
                    }
                    KeyCode::Backspace => {
                        input_buffer(app, field).pop();
                    }
                    KeyCode::Char(c) => {
                        input_buffer(app, field).push(c);
                    }
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),

                // Calc page
                KeyCode::Char('i') | KeyCode::Enter if app.current_page == Page::Calc => {
                    app.editing = Some(InputField::Price);
                }
                KeyCode::Char('m') if app.current_page == Page::Calc => {
                    app.editing = Some(InputField::Memo);
                }
                KeyCode::Char('u') if app.current_page == Page::Calc => app.undo(),
                KeyCode::Char('s') if app.current_page == Page::Calc => app.save_to_history(),
                KeyCode::Char('c') if app.current_page == Page::Calc => app.clear_cart(),

                // History page
                KeyCode::Char('d') if app.current_page == Page::History && !app.confirm_delete => {
                    app.delete_history()
                }
                KeyCode::Char('y') if app.current_page == Page::History && app.confirm_delete => {
                    app.delete_history()
                }
                KeyCode::Char('n') if app.current_page == Page::History => app.cancel_delete(),
                KeyCode::Down | KeyCode::Char('j') if app.current_page == Page::History => {
                    app.next_row()
                }
                KeyCode::Up | KeyCode::Char('k') if app.current_page == Page::History => {
                    app.previous_row()
                }

                // Chart page
                KeyCode::Char('+') | KeyCode::Right if app.current_page == Page::Chart => {
                    app.widen_window()
                }
                KeyCode::Char('-') | KeyCode::Left if app.current_page == Page::Chart => {
                    app.narrow_window()
                }

                // Settings page
                KeyCode::Char('t') | KeyCode::Enter if app.current_page == Page::Settings => {
                    app.editing = Some(InputField::TaxRate);
                }

                _ => {}
            }
        }
    }
}

fn input_buffer(app: &mut App, field: InputField) -> &mut String {
    match field {
        InputField::Price => &mut app.price_input,
        InputField::Memo => &mut app.memo_input,
        InputField::TaxRate => &mut app.tax_input,
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Calc => render_calc(f, chunks[1], app),
        Page::History => render_history(f, chunks[1], app),
        Page::Chart => render_chart(f, chunks[1], app),
        Page::Settings => render_settings(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Calc, Page::History, Page::Chart, Page::Settings];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Tax: {:.1}%", app.settings.tax_rate * 100.0),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Saved tallies: {}", app.history.len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 🛒 Shopping Calc "),
    );

    f.render_widget(header, area);
}

fn render_calc(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Price input
            Constraint::Length(3), // Memo input
            Constraint::Min(0),    // Price list + totals
        ])
        .split(area);

    render_input_box(
        f,
        chunks[0],
        " Price (Enter to add, e.g. 120 / 980.5 / 1,200) ",
        &app.price_input,
        app.editing == Some(InputField::Price),
    );
    render_input_box(
        f,
        chunks[1],
        " Memo (store / category / items) ",
        &app.memo_input,
        app.editing == Some(InputField::Memo),
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    // Entered prices, most recent last
    let items: Vec<ListItem> = app
        .cart
        .prices()
        .iter()
        .enumerate()
        .map(|(i, price)| ListItem::new(format!("{:>3}. {:>12.2}", i + 1, price)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Entered prices ({}) ", app.cart.len())),
    );
    f.render_widget(list, body[0]);

    let subtotal = app.cart.subtotal();
    let total = app.cart.total(app.settings.tax_rate);

    let summary_lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Subtotal:  "),
            Span::styled(
                format!("{:>12.2}", subtotal),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Total:     "),
            Span::styled(
                format!("{:>12.2}", total),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("  (incl. tax "),
            Span::styled(
                format!("{:.1}%", app.settings.tax_rate * 100.0),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(")"),
        ]),
    ];

    let summary = Paragraph::new(summary_lines)
        .block(Block::default().borders(Borders::ALL).title(" Totals "));
    f.render_widget(summary, body[1]);
}

fn render_input_box(f: &mut Frame, area: Rect, title: &str, value: &str, active: bool) {
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let shown = if active {
        format!("{}█", value)
    } else {
        value.to_string()
    };

    let input = Paragraph::new(shown).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title),
    );
    f.render_widget(input, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Datetime", "Count", "Subtotal", "Tax", "Total", "Memo"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.history.iter().map(|record| {
        let cells = vec![
            Cell::from(record.datetime.clone()),
            Cell::from(format!("{}", record.count)),
            Cell::from(format!("{:.2}", record.subtotal)),
            Cell::from(format!("{:.1}%", record.tax_rate * 100.0)),
            Cell::from(format!("{:.2}", record.total)).style(Style::default().fg(Color::Green)),
            Cell::from(truncate(&record.memo, 28)),
        ];
        Row::new(cells).height(1)
    });

    // The CSV is exportable verbatim, so show where it lives
    let title = if app.confirm_delete {
        " History — ⚠ press y to DELETE ALL, n to cancel ".to_string()
    } else {
        format!(" History — {} ", app.ledger.path().display())
    };

    let border_color = if app.confirm_delete { Color::Red } else { Color::White };

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(30),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.history_state);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(32), // Current session prices
            Constraint::Percentage(36), // Trend + windowed records
            Constraint::Percentage(32), // Totals by memo
        ])
        .split(area);

    render_session_chart(f, chunks[0], app);

    // Recent totals, oldest to newest. Bars cannot carry the memos, so the
    // windowed records are listed next to the chart.
    let trend = recent_trend(&app.history, app.chart_window);

    let trend_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    let trend_data: Vec<(String, u64)> = trend
        .labels
        .iter()
        .zip(&trend.totals)
        .map(|(label, total)| (label.clone(), total.round().max(0.0) as u64))
        .collect();
    let trend_refs: Vec<(&str, u64)> = trend_data
        .iter()
        .map(|(label, v)| (label.as_str(), *v))
        .collect();

    let trend_chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Total trend (last {}) — +/- window ", app.chart_window)),
        )
        .data(&trend_refs)
        .bar_width(12)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(trend_chart, trend_area[0]);

    let items: Vec<ListItem> = trend_lines(&trend)
        .into_iter()
        .map(ListItem::new)
        .collect();
    let records_list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Windowed records "),
    );
    f.render_widget(records_list, trend_area[1]);

    // Whole-ledger totals grouped by memo
    let buckets = memo_totals(&app.history);
    let memo_data: Vec<(String, u64)> = buckets
        .iter()
        .map(|b| (truncate(&b.memo, 12), b.total.round().max(0.0) as u64))
        .collect();
    let memo_refs: Vec<(&str, u64)> = memo_data
        .iter()
        .map(|(label, v)| (label.as_str(), *v))
        .collect();

    let memo_chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Total by memo (top {}) ", TOP_MEMO_BUCKETS)),
        )
        .data(&memo_refs)
        .bar_width(13)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));
    f.render_widget(memo_chart, chunks[2]);
}

fn render_session_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" This session ({} prices) ", app.cart.len());

    if app.cart.is_empty() {
        let empty = Paragraph::new("No prices yet. Add some on the Calc page.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let session_data: Vec<(String, u64)> = app
        .cart
        .prices()
        .iter()
        .enumerate()
        .map(|(i, price)| (format!("#{}", i + 1), price.round().max(0.0) as u64))
        .collect();
    let session_refs: Vec<(&str, u64)> = session_data
        .iter()
        .map(|(label, v)| (label.as_str(), *v))
        .collect();

    let session_chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&session_refs)
        .bar_width(8)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    f.render_widget(session_chart, area);
}

/// One line per windowed record: short label, total, and its memo.
fn trend_lines(view: &TrendView) -> Vec<String> {
    view.labels
        .iter()
        .zip(&view.totals)
        .zip(&view.memos)
        .map(|((label, total), memo)| {
            if memo.is_empty() {
                format!("{}  {:>9.2}", label, total)
            } else {
                format!("{}  {:>9.2}  {}", label, total, truncate(memo, 14))
            }
        })
        .collect()
}

fn render_settings(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let current = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Current tax rate: "),
            Span::styled(
                format!("{:.1}%", app.settings.tax_rate * 100.0),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Settings "));
    f.render_widget(current, chunks[0]);

    render_input_box(
        f,
        chunks[1],
        " New tax rate in % (Enter to save) ",
        &app.tax_input,
        app.editing == Some(InputField::TaxRate),
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(notice) = &app.notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Success => Color::Green,
            NoticeKind::Warning => Color::Red,
        };
        status_spans.push(Span::styled(
            format!(" {} ", notice.text),
            Style::default().fg(color),
        ));
        status_spans.push(Span::raw("| "));
    }

    let hints: &[(&str, &str)] = if app.editing.is_some() {
        &[("Enter", "Commit"), ("Esc", "Done")]
    } else {
        match app.current_page {
            Page::Calc => &[
                ("Enter", "Type price"),
                ("m", "Memo"),
                ("u", "Undo"),
                ("s", "Save"),
                ("c", "Clear"),
                ("Tab", "Page"),
                ("q", "Quit"),
            ],
            Page::History => &[
                ("d", "Delete all"),
                ("↑/↓", "Nav"),
                ("Tab", "Page"),
                ("q", "Quit"),
            ],
            Page::Chart => &[("+/-", "Window"), ("Tab", "Page"), ("q", "Quit")],
            Page::Settings => &[("Enter", "Edit rate"), ("Tab", "Page"), ("q", "Quit")],
        }
    };

    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            status_spans.push(Span::raw(" | "));
        }
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", action)));
    }

    let status = Paragraph::new(vec![Line::from(status_spans)])
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_app(dir: &std::path::Path) -> App {
        App::new(SettingsStore::new(dir), HistoryLedger::new(dir)).unwrap()
    }

    #[test]
    fn test_submit_price_adds_valid_input() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.price_input = "1,200".to_string();
        app.submit_price();

        assert_eq!(app.cart.prices(), &[1200.0]);
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Success);
        assert!(app.price_input.is_empty());
    }

    #[test]
    fn test_submit_price_skips_invalid_input() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.price_input = "abc".to_string();
        app.submit_price();

        assert!(app.cart.is_empty());
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Warning);
    }

    #[test]
    fn test_undo_on_empty_cart_is_a_notice() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.undo();
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Warning);
    }

    #[test]
    fn test_save_to_history_appends_and_reloads() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.cart.add(100.0);
        app.cart.add(200.0);
        app.memo_input = "  market  ".to_string();
        app.save_to_history();

        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].memo, "market");
        assert_eq!(app.history[0].count, 2);
    }

    #[test]
    fn test_save_empty_cart_is_refused() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.save_to_history();
        assert!(app.history.is_empty());
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Warning);
    }

    #[test]
    fn test_delete_history_requires_confirmation() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.cart.add(10.0);
        app.save_to_history();
        assert_eq!(app.history.len(), 1);

        // First call only arms
        app.delete_history();
        assert!(app.confirm_delete);
        assert_eq!(app.history.len(), 1);

        // Second call erases
        app.delete_history();
        assert!(!app.confirm_delete);
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_delete_history_without_file() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.delete_history();
        app.delete_history();
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Info);
    }

    #[test]
    fn test_apply_tax_input_persists_fraction() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.tax_input = "8".to_string();
        app.apply_tax_input();

        assert!((app.settings.tax_rate - 0.08).abs() < 1e-9);
        assert!((app.settings_store.load().tax_rate - 0.08).abs() < 1e-9);
    }

    #[test]
    fn test_apply_tax_input_rejects_out_of_range() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.tax_input = "150".to_string();
        app.apply_tax_input();
        assert_eq!(app.settings.tax_rate, 0.10);

        app.tax_input = "-1".to_string();
        app.apply_tax_input();
        assert_eq!(app.settings.tax_rate, 0.10);
    }

    #[test]
    fn test_chart_window_clamped() {
        let tmp = tempdir().unwrap();
        let mut app = test_app(tmp.path());

        for _ in 0..100 {
            app.narrow_window();
        }
        assert_eq!(app.chart_window, WINDOW_MIN);

        for _ in 0..100 {
            app.widen_window();
        }
        assert_eq!(app.chart_window, WINDOW_MAX);
    }

    #[test]
    fn test_trend_lines_surface_memos() {
        let view = TrendView {
            labels: vec!["01-31 23:10".to_string(), "02-01 09:30".to_string()],
            totals: vec![330.0, 120.5],
            memos: vec!["supermarket".to_string(), String::new()],
        };

        let lines = trend_lines(&view);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("supermarket"));
        assert!(lines[0].contains("330.00"));
        assert!(lines[1].starts_with("02-01 09:30"));
        assert!(!lines[1].contains("(no memo)"));
    }

    #[test]
    fn test_trend_lines_truncate_long_memos() {
        let view = TrendView {
            labels: vec!["01-31 23:10".to_string()],
            totals: vec![10.0],
            memos: vec!["a very long memo that keeps going".to_string()],
        };

        let lines = trend_lines(&view);
        assert!(lines[0].contains('…'));
        assert!(!lines[0].contains("keeps going"));
    }

    #[test]
    fn test_page_cycle_round_trips() {
        let mut page = Page::Calc;
        for _ in 0..4 {
            page = page.next();
        }
        assert_eq!(page, Page::Calc);
        assert_eq!(Page::Calc.previous(), Page::Settings);
    }
}
