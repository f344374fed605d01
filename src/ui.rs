// ============================================
// src/ui.rs
// 画面描画
// ============================================

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, Dialog, Feedback};
use crate::quiz::{COLUMNS, ChoiceCount};

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    // 枠線を描画
    let block = Block::default().borders(Borders::ALL).title("Road Sign Quiz");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] 問題番号
            Constraint::Length(1), // [1] ステータス
            Constraint::Length(5), // [2] 標識
            Constraint::Length(1), // [3] 正解/不正解
            Constraint::Min(3),    // [4] 選択肢
            Constraint::Length(1), // [5] 操作説明
        ])
        .split(inner_area);

    // 0. 問題番号と成績
    f.render_widget(
        Paragraph::new(app.question_label())
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[0],
    );
    if let Some(session) = &app.session {
        let score = format!(
            "{} correct / {} guesses  ({} choices)",
            session.correct_answers(),
            session.total_guesses(),
            session.choices()
        );
        f.render_widget(
            Paragraph::new(score)
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned(),
            chunks[0],
        );
    }

    // 1. ステータス (エラーなど)
    if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(status.as_str())
                .style(Style::default().fg(Color::Yellow))
                .centered(),
            chunks[1],
        );
    }

    draw_sign(f, app, chunks[2]);

    // 3. 正解/不正解
    let feedback = match &app.feedback {
        Feedback::None => Line::from(""),
        Feedback::Correct(name) => {
            let waiting = app.session.as_ref().is_some_and(|s| s.advance_pending());
            let text = if waiting { format!("{name}!  ...") } else { format!("{name}!") };
            Line::from(text).style(Style::default().fg(Color::Green).bold())
        }
        Feedback::Incorrect => {
            Line::from("Incorrect!").style(Style::default().fg(Color::Red).bold())
        }
    };
    f.render_widget(Paragraph::new(feedback).centered(), chunks[3]);

    draw_choices(f, app, chunks[4]);

    let help = if app.is_finished() {
        "Enter: reset quiz  c: choices  t: sign types  Esc: quit"
    } else {
        "←↑↓→/1-9: choose  Enter: answer  c: choices  t: sign types  Esc: quit"
    };
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[5],
    );

    match app.dialog {
        Dialog::None => {}
        Dialog::Choices { selected } => draw_choices_dialog(f, selected),
        Dialog::SignTypes { selected } => draw_sign_types_dialog(f, app, selected),
        Dialog::Finished(stats) => {
            let text = vec![
                Line::from(format!(
                    "{} guesses, {:.02}% correct",
                    stats.total_guesses,
                    stats.accuracy()
                )),
                Line::from(""),
                Line::from("[Enter] Reset Quiz").style(Style::default().fg(Color::Cyan)),
            ];
            draw_popup(f, "Reset Quiz", text, 40, 5);
        }
    }
}

/// 標識の表示 (不正解の間は左右に揺らす)
fn draw_sign(f: &mut Frame, app: &App, area: Rect) {
    let Some(session) = &app.session else {
        return;
    };

    let mut panel = area.inner(Margin::new(2, 0));
    if app.is_shaking() && app.shake_frame % 2 == 1 {
        panel.x += 1;
    }

    let border = if app.is_shaking() { Color::Red } else { Color::Gray };
    let image = match app.image_len {
        Some(0) | None => "(no image)".to_string(),
        Some(len) => format!("image: {len} bytes"),
    };
    let text = vec![
        Line::from(session.current().sign_type.as_str()).style(Style::default().fg(Color::Yellow)),
        Line::from(""),
        Line::from(image).style(Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(
        Paragraph::new(text).centered().block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title("Sign"),
        ),
        panel,
    );
}

/// 選択肢のボタン (rows × 3)
fn draw_choices(f: &mut Frame, app: &App, area: Rect) {
    let Some(session) = &app.session else {
        return;
    };
    let board = session.board();

    let rows = Layout::vertical(vec![Constraint::Length(3); board.rows()]).split(area);
    for (row, row_area) in rows.iter().enumerate() {
        let columns = Layout::horizontal([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(*row_area);

        for (column, name) in board.row(row).iter().enumerate() {
            let slot = row * COLUMNS + column;
            let disabled = app.disabled.get(slot).copied().unwrap_or(true);

            let answered = matches!(app.feedback, Feedback::Correct(_));
            let mut style = if answered && slot == board.correct_slot() {
                Style::default().fg(Color::Green).bold()
            } else if disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            if slot == app.cursor && app.dialog == Dialog::None {
                style = style.reversed();
            }

            let label = vec![
                Span::raw(format!("{} ", slot + 1)).dark_gray(),
                Span::raw(name.as_str()),
            ];
            f.render_widget(
                Paragraph::new(Line::from(label)).style(style).centered().block(
                    Block::default().borders(Borders::ALL),
                ),
                columns[column],
            );
        }
    }
}

fn draw_choices_dialog(f: &mut Frame, selected: usize) {
    let lines: Vec<Line> = ChoiceCount::ALL
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let line = Line::from(format!("{count}"));
            if i == selected { line.reversed() } else { line }
        })
        .collect();
    draw_popup(f, "Select Number of Choices", lines, 30, ChoiceCount::ALL.len() as u16);
}

fn draw_sign_types_dialog(f: &mut Frame, app: &App, selected: usize) {
    let mut lines: Vec<Line> = app
        .sign_types
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mark = if t.enabled { "[x]" } else { "[ ]" };
            let line = Line::from(format!("{mark} {}", t.name));
            if i == selected { line.reversed() } else { line }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(
        Line::from("[Space] toggle  [Enter] Reset Quiz").style(Style::default().fg(Color::Cyan)),
    );
    let height = lines.len() as u16;
    draw_popup(f, "Select Sign Types", lines, 40, height);
}

/// 画面中央にダイアログを出す
fn draw_popup(f: &mut Frame, title: &str, lines: Vec<Line>, width: u16, height: u16) {
    let area = f.area();
    let width = (width + 2).min(area.width);
    let height = (height + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .centered()
            .block(Block::default().borders(Borders::ALL).title(title.to_string())),
        popup,
    );
}
