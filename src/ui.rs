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
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use zeropoint_node::{archetype, GatewayKind, HarmonicMatrix, MatrixRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Cells,
    Grid,
    Gateways,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Cells => Page::Grid,
            Page::Grid => Page::Gateways,
            Page::Gateways => Page::Cells,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Cells => Page::Gateways,
            Page::Grid => Page::Cells,
            Page::Gateways => Page::Grid,
        }
    }
}

pub struct App {
    pub matrix: HarmonicMatrix,
    pub filtered: Vec<MatrixRow>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub active_filter: Option<GatewayKind>,
}

impl App {
    pub fn new(matrix: HarmonicMatrix) -> Self {
        let mut state = TableState::default();
        if !matrix.is_empty() {
            state.select(Some(0));
        }

        let filtered = matrix.rows.clone();

        Self {
            matrix,
            filtered,
            state,
            current_page: Page::Cells,
            show_detail: false,
            active_filter: None,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_row(&self) -> Option<&MatrixRow> {
        self.state.selected().and_then(|i| self.filtered.get(i))
    }

    pub fn apply_filter(&mut self, gate: GatewayKind) {
        self.active_filter = Some(gate);
        self.filtered = self
            .matrix
            .rows
            .iter()
            .filter(|r| r.gateways.contains(&gate))
            .cloned()
            .collect();
        self.reset_selection();
    }

    pub fn clear_filter(&mut self) {
        self.active_filter = None;
        self.filtered = self.matrix.rows.clone();
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.state
            .select(if self.filtered.is_empty() { None } else { Some(0) });
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 10).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(10));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.filtered.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.filtered.is_empty() {
            self.state.select(Some(self.filtered.len() - 1));
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
                        app.current_page = app.current_page.previous();
                    } else {
                        app.current_page = app.current_page.next();
                    }
                }
                KeyCode::BackTab => app.current_page = app.current_page.previous(),
                KeyCode::Char('c') => {
                    app.clear_filter();
                    app.current_page = Page::Cells;
                }
                KeyCode::Char(c @ '1'..='6') if app.current_page == Page::Gateways => {
                    let index = c as usize - '1' as usize;
                    app.apply_filter(GatewayKind::ALL[index]);
                    app.current_page = Page::Cells;
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
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

    if app.show_detail && app.current_page == Page::Cells {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_cells(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Cells => render_cells(f, chunks[1], app),
            Page::Grid => render_grid_page(f, chunks[1], app),
            Page::Gateways => render_gateways(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn result_color(result: u8) -> Color {
    match result {
        3 | 6 => Color::Cyan,
        9 => Color::Yellow,
        _ => Color::White,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [
        (Page::Cells, "Cells"),
        (Page::Grid, "Grid"),
        (Page::Gateways, "Gateways"),
    ];

    let mut tab_spans = vec![];
    for (i, (page, name)) in pages.iter().enumerate() {
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

        tab_spans.push(Span::styled(*name, style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.matrix.summary(),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_cells(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["A", "B", "Result", "Narrative", "Gateways"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered.iter().map(|row| {
        let color = result_color(row.result);
        Row::new(vec![
            Cell::from(row.a.to_string()),
            Cell::from(row.b.to_string()),
            Cell::from(row.result.to_string()).style(Style::default().fg(color)),
            Cell::from(row.narrative()),
            Cell::from(row.gateway_labels().join(", ")),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(38),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Harmonic Matrix "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_grid_page(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    let mut header = vec![Span::raw("     ")];
    for b in app.matrix.col_range.iter() {
        header.push(Span::styled(
            format!("{:>3}", b),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::from(header));

    for (a, results) in app.matrix.row_range.iter().zip(app.matrix.grid()) {
        let mut spans = vec![Span::styled(
            format!("{:>3} |", a),
            Style::default().fg(Color::Yellow),
        )];
        for r in results {
            spans.push(Span::styled(
                format!("{:>3}", r),
                Style::default().fg(result_color(r)),
            ));
        }
        lines.push(Line::from(spans));
    }

    let grid = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Grid (3/6 cyan, 9 yellow) "),
    );
    f.render_widget(grid, area);
}

fn render_gateways(f: &mut Frame, area: Rect, app: &App) {
    let census = app.matrix.gateway_census();
    let mut lines = vec![Line::from(""), Line::from("  Press a number to filter cells:"), Line::from("")];

    for (i, gate) in GatewayKind::ALL.iter().enumerate() {
        let count = census.get(gate).copied().unwrap_or(0);
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", i + 1), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:<16}", gate.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:>4} cells  ", count)),
            Span::styled(gate.description(), Style::default().fg(Color::DarkGray)),
        ]));
    }

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Gateways "));
    f.render_widget(panel, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    if let Some(row) = app.selected_row() {
        lines.push(Line::from(Span::styled(
            format!("{} + {} → {}", row.a, row.b, row.result),
            Style::default()
                .fg(result_color(row.result))
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        for (label, digit) in [("A", row.a), ("B", row.b), ("Result", row.result as i64)] {
            let text = match archetype(digit) {
                Some(a) => format!("{:<7}{} · {}: {}", label, a.digit, a.name, a.meaning),
                None => format!("{:<7}{}", label, digit),
            };
            lines.push(Line::from(text));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Gateways",
            Style::default().fg(Color::Yellow),
        )));
        if row.gateways.is_empty() {
            lines.push(Line::from("  (none)"));
        }
        for gate in &row.gateways {
            lines.push(Line::from(format!("  • {}: {}", gate.label(), gate.description())));
        }
    } else {
        lines.push(Line::from("No cell selected"));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Detail "),
    );
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Cell: {}/{} ", selected, app.filtered.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(gate) = app.active_filter {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", gate.label()),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    for (key, action) in [("Enter", " Details"), ("Tab", " Page"), ("↑/↓", " Nav"), ("PgUp/PgDn", " Fast")] {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(action));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
