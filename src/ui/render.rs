//! 界面渲染
//!
//! 根据 UiState 绘制单条记录卡片：标题栏显示阶段与批内计数，主体为书名、作者、
//! ISBN、简介（按宽度换行）与分类高亮行，底部为状态/通知行与快捷键提示。

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::{ReviewPhase, UiState};
use crate::store::Classification;

/// 将内容按宽度换行，支持 UTF-8（按字符数，避免在 UTF-8 中间截断）
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    for para in s.split('\n') {
        let mut line = String::new();
        for ch in para.chars() {
            if line.chars().count() >= width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// 分类行：当前取值高亮，其余置灰
fn classification_spans(current: Classification) -> Vec<Span<'static>> {
    let paint = |label: &'static str, kind: Classification| {
        if current == kind {
            Span::styled(
                label,
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };
    vec![
        paint("[y] Yes", Classification::Yes),
        Span::raw("   "),
        paint("[n] No", Classification::No),
        Span::raw("   "),
        paint("[u] Unknown", Classification::Unknown),
    ]
}

/// 绘制一帧：上方记录卡片，下方状态/通知行
pub fn draw(f: &mut Frame, state: &UiState, notice: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(f.area());

    draw_card(f, state, chunks[0]);
    draw_status(f, state, notice, chunks[1]);
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
        Span::raw(value.to_string()),
    ])
}

fn draw_card(f: &mut Frame, state: &UiState, area: Rect) {
    let phase_str = match state.phase {
        ReviewPhase::Loading => "加载中…".to_string(),
        ReviewPhase::Reviewing => match state.position {
            Some(pos) => format!("{} / {}", pos + 1, state.batch_len),
            None => "无记录".to_string(),
        },
        ReviewPhase::Exhausted => "已全部看完".to_string(),
    };
    let title = format!(" Books Collection │ {} ", phase_str);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let content_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(record) = &state.current {
        lines.push(Line::from(Span::styled(
            record.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::raw("")));
        lines.push(field_line("Author", &record.author));
        lines.push(field_line("ISBN", &record.isbn));
        lines.push(Line::from(Span::styled(
            "Synopsis:",
            Style::default().fg(Color::Cyan),
        )));
        for line in wrap_text(&record.synopsis, content_width.max(40)) {
            lines.push(Line::from(Span::raw(line)));
        }
        lines.push(Line::from(Span::raw("")));
        lines.push(Line::from(Span::raw("Looks like a biography?")));
        lines.push(Line::from(classification_spans(record.is_biography)));
    } else {
        let hint = match state.phase {
            ReviewPhase::Loading => "Loading records…",
            _ => "No record at this position",
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
        if let Some(resume) = state.resume_hint {
            lines.push(Line::from(Span::styled(
                format!("Last session stopped at record {}", resume + 1),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_status(f: &mut Frame, state: &UiState, notice: Option<&str>, area: Rect) {
    let (text, color) = match notice {
        Some(n) => (format!(" {} ", n), Color::Green),
        None if state.batch_len > 0 => (
            format!(" Total books: {} ", state.batch_len),
            Color::DarkGray,
        ),
        None => (String::new(), Color::DarkGray),
    };
    let hint = " y 是 │ n 否 │ u 不确定 │ →/空格 下一条 │ q 退出 ";
    let block = Block::default()
        .title_bottom(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    let paragraph =
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color)))).block(block);
    f.render_widget(paragraph, area);
}
