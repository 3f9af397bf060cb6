use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Row, Table as GridWidget, Tabs, Wrap,
    },
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::analytics::{Loaded, PREVIEW_ROWS};
use crate::app::input::InputBuffer;
use crate::app::task::TaskPane;
use crate::app::{App, Notice, Tab};
use crate::strings::{
    build_status_line, input_title, preview_title, subtitle, ANALYTICS_HEADING, APP_TITLE,
    CSV_HINT, TITLE_CSV_PATH, TITLE_METRICS, TITLE_RESPONSE, TITLE_TABS,
};
use crate::theme::THEME;

const INPUT_MAX_LINES: u16 = 6;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_tabs(f, chunks[0], app);
    match app.active_pane() {
        Some(pane) => draw_task(f, chunks[1], pane),
        None => draw_analytics(f, chunks[1], app),
    }
    draw_status(f, chunks[2], app);
}

fn heading_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(APP_TITLE, heading_style()))
        .title(Line::from(subtitle(&app.model_label)).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border_inactive));
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .block(block.title_bottom(TITLE_TABS))
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(THEME.tab_selected_fg)
                .bg(THEME.tab_selected_bg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_task(f: &mut Frame, area: Rect, pane: &TaskPane) {
    let inner_width = area.width.saturating_sub(2);
    let input_lines = (measure_total_lines(&pane.input.text, inner_width) as u16)
        .clamp(1, INPUT_MAX_LINES);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(input_lines + 2),
            Constraint::Min(3),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(pane.task.heading(), heading_style())),
        chunks[0],
    );
    draw_input(
        f,
        chunks[1],
        &pane.input,
        &input_title(pane.task.field_label(), pane.task.action()),
        pane.task.placeholder(),
    );

    let (border, body) = match &pane.notice {
        Some(n) => {
            let color = THEME.notice_color(n);
            (color, Paragraph::new(n.text().to_string()).style(Style::default().fg(color)))
        }
        None => (THEME.border_inactive, Paragraph::new("")),
    };
    let block = Block::default()
        .title(TITLE_RESPONSE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(
        body.block(block)
            .wrap(Wrap { trim: false })
            .scroll((pane.scroll, 0)),
        chunks[2],
    );
}

fn draw_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let color = THEME.notice_color(notice);
    let para = Paragraph::new(notice.text().to_string())
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_analytics(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(ANALYTICS_HEADING, heading_style())),
        chunks[0],
    );
    draw_input(f, chunks[1], &app.analytics.input, TITLE_CSV_PATH, CSV_HINT);
    draw_notice(f, chunks[2], &app.analytics.notice);

    let Some(loaded) = &app.analytics.loaded else {
        return;
    };
    let shown = loaded.table.preview(PREVIEW_ROWS).len() as u16;
    let rest = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(shown + 3), Constraint::Min(6)])
        .split(chunks[3]);
    draw_preview(f, rest[0], loaded);

    if loaded.numeric.is_empty() {
        return;
    }
    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(rest[1]);
    draw_metrics(f, lower[0], loaded);
    draw_chart(f, lower[1], loaded);
}

fn draw_preview(f: &mut Frame, area: Rect, loaded: &Loaded) {
    let headers = loaded.table.headers();
    let cols = headers.len().max(1) as u32;
    let widths = (0..cols).map(|_| Constraint::Ratio(1, cols));
    let header = Row::new(headers.iter().map(|h| Cell::from(h.as_str())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let preview = loaded.table.preview(PREVIEW_ROWS);
    let rows = preview
        .iter()
        .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));
    let title = preview_title(&loaded.path, preview.len(), loaded.table.row_count());
    let table = GridWidget::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(THEME.border_inactive)),
    );
    f.render_widget(table, area);
}

fn draw_metrics(f: &mut Frame, area: Rect, loaded: &Loaded) {
    let items: Vec<ListItem> = loaded
        .numeric
        .iter()
        .map(|c| ListItem::new(c.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(TITLE_METRICS)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.border_focus)),
        )
        .highlight_style(
            Style::default()
                .fg(THEME.tab_selected_fg)
                .bg(THEME.tab_selected_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(loaded.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_chart(f: &mut Frame, area: Rect, loaded: &Loaded) {
    let Some(series) = &loaded.series else {
        return;
    };
    let ([x0, x1], [y0, y1]) = series.bounds();
    let dataset = Dataset::default()
        .name(series.column.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(THEME.chart_line))
        .data(&series.points);
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", series.title()), heading_style()))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("row")
                .style(Style::default().fg(Color::Gray))
                .bounds([x0, x1])
                .labels([
                    format!("{:.0}", x0),
                    format!("{:.0}", (x0 + x1) / 2.0),
                    format!("{:.0}", x1),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(series.column.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([y0, y1])
                .labels([
                    format!("{:.1}", y0),
                    format!("{:.1}", (y0 + y1) / 2.0),
                    format!("{:.1}", y1),
                ]),
        );
    f.render_widget(chart, area);
}

fn draw_input(f: &mut Frame, area: Rect, input: &InputBuffer, title: &str, hint: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border_focus));
    let inner_width = area.width.saturating_sub(2);
    let visible_lines = area.height.saturating_sub(2).max(1);
    let graphemes: Vec<&str> = input.text.graphemes(true).collect();
    let upto = input.cursor.min(graphemes.len());
    let (line_idx, col_width) = measure_prefix_line_col(&graphemes, upto, inner_width);
    let offset_y = line_idx.saturating_sub(visible_lines.saturating_sub(1));

    let para = if input.is_empty() {
        let hint = Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(hint).block(block).wrap(Wrap { trim: false })
    } else {
        Paragraph::new(input.text.clone())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((offset_y, 0))
    };
    f.render_widget(para, area);

    let cursor_x = area.x + 1 + col_width;
    let cursor_y = area.y + 1 + line_idx.saturating_sub(offset_y);
    f.set_cursor_position(Position::new(cursor_x, cursor_y));
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let input = app.active_input();
    let graphemes: Vec<&str> = input.text.graphemes(true).collect();
    let upto = input.cursor.min(graphemes.len());
    let (line_idx, col_width) =
        measure_prefix_line_col(&graphemes, upto, area.width.saturating_sub(2));
    let tips = build_status_line(
        &app.model_label,
        app.tab.title(),
        line_idx + 1,
        col_width + 1,
        app.pending_count(),
        area.width.saturating_sub(2),
    );
    let help = Span::styled(tips, Style::default().fg(Color::DarkGray));
    let para = Paragraph::new(Line::from(vec![help])).block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn measure_total_lines(s: &str, width: u16) -> usize {
    if width == 0 {
        return 1;
    }
    let mut lines = 1usize;
    let mut col = 0usize;
    for g in s.graphemes(true) {
        if g == "\n" {
            lines += 1;
            col = 0;
            continue;
        }
        let w = UnicodeWidthStr::width(g);
        if col + w > width as usize {
            lines += 1;
            col = 0;
        }
        col += w;
    }
    lines
}

fn measure_prefix_line_col(graphemes: &[&str], upto: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let mut line = 0usize;
    let mut col = 0usize;
    for g in graphemes.iter().take(upto) {
        if *g == "\n" {
            line += 1;
            col = 0;
            continue;
        }
        let w = UnicodeWidthStr::width(*g);
        if col + w > width as usize {
            line += 1;
            col = 0;
        }
        col += w;
    }
    (line as u16, col as u16)
}
