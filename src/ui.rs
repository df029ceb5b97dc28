use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use presence_check::{Identity, Labels, MatchOutcome, MatchStats, Presence, TextRecord, TokenSet};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

// Terminal counterparts of the report's light green / light red
const MATCHED_COLOR: Color = Color::LightGreen;
const UNMATCHED_COLOR: Color = Color::LightRed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Records,
    Roster,
    Summary,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Records => Page::Roster,
            Page::Roster => Page::Summary,
            Page::Summary => Page::Records,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Records => Page::Summary,
            Page::Roster => Page::Records,
            Page::Summary => Page::Roster,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Records => "Records",
            Page::Roster => "Roster",
            Page::Summary => "Summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    All,
    Matched,
    Unmatched,
}

impl FilterType {
    fn accepts(&self, presence: Presence) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Matched => presence.is_matched(),
            FilterType::Unmatched => !presence.is_matched(),
        }
    }
}

pub struct App {
    pub records: Vec<TextRecord>,
    pub identities: Vec<Identity>,
    pub labels: Labels,
    pub stats: MatchStats,
    /// Indices into `records` that pass the active filter
    pub visible: Vec<usize>,
    pub state: TableState,
    pub roster_state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub filter: FilterType,
}

impl App {
    pub fn new(records: Vec<TextRecord>, identities: Vec<Identity>, labels: Labels) -> Self {
        let stats = MatchStats::from_records(&records);

        let mut roster_state = TableState::default();
        if !identities.is_empty() {
            roster_state.select(Some(0));
        }

        let mut app = Self {
            records,
            identities,
            labels,
            stats,
            visible: Vec::new(),
            state: TableState::default(),
            roster_state,
            current_page: Page::Records,
            show_detail: false,
            filter: FilterType::All,
        };
        app.apply_filter(FilterType::All);
        app
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_record(&self) -> Option<&TextRecord> {
        self.state
            .selected()
            .and_then(|i| self.visible.get(i))
            .and_then(|&idx| self.records.get(idx))
    }

    pub fn apply_filter(&mut self, filter: FilterType) {
        self.filter = filter;
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.accepts(r.presence()))
            .map(|(i, _)| i)
            .collect();

        // Reset selection to first item
        if !self.visible.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// How many records each identity flipped, in roster order
    pub fn roster_hits(&self) -> Vec<usize> {
        let mut hits = vec![0; self.identities.len()];
        for outcome in self.records.iter().filter_map(TextRecord::outcome) {
            if let Some(count) = hits.get_mut(outcome.identity_index) {
                *count += 1;
            }
        }
        hits
    }

    fn active_len(&self) -> usize {
        match self.current_page {
            Page::Roster => self.identities.len(),
            _ => self.visible.len(),
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Roster => &mut self.roster_state,
            _ => &mut self.state,
        }
    }

    pub fn next(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let state = self.active_state();
        let i = state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        state.select(Some(i));
    }

    fn select_last(&mut self) {
        let len = self.active_len();
        if len > 0 {
            self.active_state().select(Some(len - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('a') => app.apply_filter(FilterType::All),
                KeyCode::Char('m') => app.apply_filter(FilterType::Matched),
                KeyCode::Char('u') => app.apply_filter(FilterType::Unmatched),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.active_state().select(Some(0)),
                KeyCode::End => app.select_last(),
                _ => {}
            }
        }
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

    if app.show_detail && app.current_page == Page::Records {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_records(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Records => render_records(f, chunks[1], app),
            Page::Roster => render_roster(f, chunks[1], app),
            Page::Summary => render_summary(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Records, Page::Roster, Page::Summary].iter().enumerate() {
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

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", app.stats.total),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{}: {}", app.labels.matched, app.stats.matched),
        Style::default().fg(MATCHED_COLOR),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("{}: {}", app.labels.unmatched, app.stats.unmatched),
        Style::default().fg(UNMATCHED_COLOR),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_records(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.visible.iter().filter_map(|&idx| app.records.get(idx)).map(|record| {
        let presence = record.presence();
        let color = if presence.is_matched() {
            MATCHED_COLOR
        } else {
            UNMATCHED_COLOR
        };
        let text = record.text.as_deref().unwrap_or("").replace('\n', " ");

        let cells = vec![
            Cell::from(format!("{}", record.row + 1)),
            Cell::from(truncate(&text, 80)),
            Cell::from(app.labels.for_presence(presence).to_string())
                .style(Style::default().add_modifier(Modifier::BOLD)),
        ];

        Row::new(cells).style(Style::default().fg(color)).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(header_row(&["Row", "Text", "Presence"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Records "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_roster(f: &mut Frame, area: Rect, app: &mut App) {
    let hits = app.roster_hits();
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    let rows = app.identities.iter().zip(hits).map(|(identity, count)| {
        let color = if count > 0 { MATCHED_COLOR } else { Color::White };

        let cells = vec![
            Cell::from(field(&identity.id)),
            Cell::from(truncate(&field(&identity.email), 30)),
            Cell::from(truncate(&field(&identity.name_first_last), 28)),
            Cell::from(truncate(&field(&identity.name_last_first), 28)),
            Cell::from(format!("{}", count)).style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(32),
            Constraint::Length(30),
            Constraint::Length(30),
            Constraint::Length(8),
        ],
    )
    .header(header_row(&["Id", "Email", "First Last", "Last First", "Hits"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Roster - records flipped per identity "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.roster_state);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Records:    ", label),
            Span::raw(format!("{}", app.stats.total)),
        ]),
        Line::from(vec![
            Span::styled("  Identities: ", label),
            Span::raw(format!("{}", app.identities.len())),
        ]),
        Line::from(vec![
            Span::styled("  Matched:    ", label),
            Span::styled(
                format!("{} ({:.1}%)", app.stats.matched, app.stats.match_rate() * 100.0),
                Style::default().fg(MATCHED_COLOR),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Unmatched:  ", label),
            Span::styled(
                format!("{}", app.stats.unmatched),
                Style::default().fg(UNMATCHED_COLOR),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  MATCHES BY RULE",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
    ];

    for (rule, count) in &app.stats.by_rule {
        let marker = if rule.is_identity_independent() { " *" } else { "" };
        content.push(Line::from(vec![
            Span::raw(format!("  {:>6}  ", count)),
            Span::raw(format!("{}{}", rule.description(), marker)),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  * fires without looking at the identity's own id/email",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let filter_name = match app.filter {
        FilterType::All => "all",
        FilterType::Matched => app.labels.matched.as_str(),
        FilterType::Unmatched => app.labels.unmatched.as_str(),
    };

    let key = Style::default().fg(Color::Yellow);
    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.visible.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled(format!("Filter: {}", filter_name), Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled("a/m/u", key),
        Span::raw(" Filter | "),
        Span::styled("Enter", key),
        Span::raw(" Details | "),
        Span::styled("Tab", key),
        Span::raw(" Page | "),
        Span::styled("↑/↓", key),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Record Details ");

    let record = match app.selected_record() {
        Some(r) => r,
        None => {
            f.render_widget(Paragraph::new("No record selected").block(block), area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let tokens: TokenSet = record.tokens();
    let presence = record.presence();

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Row: ", label),
            Span::raw(format!("{}", record.row + 1)),
        ]),
        Line::from(vec![
            Span::styled("  Presence: ", label),
            Span::styled(
                app.labels.for_presence(presence).to_string(),
                Style::default()
                    .fg(if presence.is_matched() { MATCHED_COLOR } else { UNMATCHED_COLOR })
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    if let Some(MatchOutcome { identity_index, rule }) = record.outcome() {
        let who = app
            .identities
            .get(identity_index)
            .map(Identity::display_name)
            .unwrap_or_else(|| format!("#{}", identity_index));
        content.push(Line::from(vec![
            Span::styled("  Identity: ", label),
            Span::raw(who),
        ]));
        content.push(Line::from(vec![
            Span::styled("  Rule: ", label),
            Span::raw(rule.description()),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from("  ─────────────────────────────────────"));
    content.push(Line::from(vec![
        Span::styled("  Numbers: ", label),
        Span::raw(tokens.numbers.join(", ")),
    ]));
    content.push(Line::from(vec![
        Span::styled("  Emails: ", label),
        Span::raw(tokens.emails.join(", ")),
    ]));
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  TEXT",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )]));
    content.push(Line::from(""));
    for line in wrap_text(record.text.as_deref().unwrap_or(""), 40) {
        content.push(Line::from(Span::styled(
            format!("  {}", line),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty() && current_line.chars().count() + word.chars().count() + 1 > width {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
