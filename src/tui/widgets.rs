//! # UI Widgets Module
//!
//! This module contains functions for drawing the different UI components
//! (widgets) on the screen: the board with its highlight and piece layers,
//! the animation overlay, the info and move-list panels, and the modal
//! endgame dialog.

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::symbols::border;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::app::{App, AppMode, Phase};
use crate::grid::{Corner, HighlightVisual, Shade, Square, SquareGrid};
use crate::rules::{EndgameKind, PieceColor, Position};
use crate::tui::layout;

const LIGHT_SQUARE: Color = Color::Rgb(240, 217, 181);
const DARK_SQUARE: Color = Color::Rgb(181, 136, 99);
const ORIGIN_BG: Color = Color::Rgb(246, 246, 105);
const LAST_MOVE_BG: Color = Color::Rgb(205, 210, 106);
const CAPTURE_BG: Color = Color::Rgb(219, 118, 99);
const CHECK_BG: Color = Color::Rgb(231, 72, 86);
const TARGET_DOT: Color = Color::Rgb(90, 90, 90);

pub fn render(app: &App, frame: &mut Frame, now: Instant) {
    let area = frame.size();
    if area.width < layout::MIN_WIDTH || area.height < layout::MIN_HEIGHT {
        let hint = Paragraph::new(format!(
            "Terminal too small: need at least {}x{}",
            layout::MIN_WIDTH,
            layout::MIN_HEIGHT
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }

    let (board_panel, side_panel) = layout::split_main(area);
    draw_board(frame, app, board_panel, now);
    draw_side(frame, app, side_panel);

    if app.mode == AppMode::GameOver {
        draw_endgame_dialog(frame, app, area);
    }
}

fn draw_board(frame: &mut Frame, app: &App, panel: Rect, now: Instant) {
    let board_frame = layout::board_frame(panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(frame_corners(&app.grid));
    frame.render_widget(block, board_frame);

    for pos in Position::all() {
        let square = app.grid.square(pos);
        let rect = layout::square_rect(board_frame, pos);
        let (text, style) = square_appearance(square);
        let lines = vec![Line::from(Span::styled(text, style)), Line::from("")];
        frame.render_widget(Paragraph::new(lines).style(style), rect);
    }

    draw_labels(frame, board_frame);

    // The transient overlay of the moving piece, above everything else.
    if let Some(overlay) = app.animator.overlay(now) {
        let (x, y) = layout::overlay_cell(board_frame, overlay.row, overlay.col);
        let style = Style::default()
            .fg(piece_fg(overlay.piece.color))
            .add_modifier(Modifier::BOLD);
        let glyph = Paragraph::new(Span::styled(overlay.piece.glyph.to_string(), style));
        frame.render_widget(glyph, Rect::new(x, y, 1, 1));
    }
}

/// Symbol and style for one square, derived from its two visual layers.
fn square_appearance(square: &Square) -> (String, Style) {
    let shade_bg = match square.shade() {
        Shade::Light => LIGHT_SQUARE,
        Shade::Dark => DARK_SQUARE,
    };
    let bg = match square.highlight() {
        Some(HighlightVisual::SelectedOrigin) => ORIGIN_BG,
        Some(HighlightVisual::CaptureTarget) => CAPTURE_BG,
        Some(HighlightVisual::LastMove) => LAST_MOVE_BG,
        Some(HighlightVisual::Check) => CHECK_BG,
        Some(HighlightVisual::QuietTarget) | None => shade_bg,
    };

    match square.piece() {
        Some(piece) => {
            let style = Style::default().bg(bg).fg(piece_fg(piece.color));
            (format!(" {}  ", piece.glyph), style)
        }
        None => {
            // Quiet destinations show a dot marker in the empty square.
            if square.highlight() == Some(HighlightVisual::QuietTarget) {
                (" ·  ".to_string(), Style::default().bg(bg).fg(TARGET_DOT))
            } else {
                ("    ".to_string(), Style::default().bg(bg))
            }
        }
    }
}

fn piece_fg(color: PieceColor) -> Color {
    match color {
        PieceColor::White => Color::White,
        PieceColor::Black => Color::Black,
    }
}

/// Border set for the board frame. The four frame corners take their
/// shape from the corner decor of the four corner squares.
fn frame_corners(grid: &SquareGrid) -> border::Set {
    let pick = |pos: Position, corner: Corner, plain: &'static str, rounded: &'static str| {
        if grid.square(pos).corner() == Some(corner) {
            rounded
        } else {
            plain
        }
    };
    border::Set {
        top_left: pick(
            Position::new(0, 7),
            Corner::TopLeft,
            border::PLAIN.top_left,
            border::ROUNDED.top_left,
        ),
        top_right: pick(
            Position::new(7, 7),
            Corner::TopRight,
            border::PLAIN.top_right,
            border::ROUNDED.top_right,
        ),
        bottom_left: pick(
            Position::new(0, 0),
            Corner::BottomLeft,
            border::PLAIN.bottom_left,
            border::ROUNDED.bottom_left,
        ),
        bottom_right: pick(
            Position::new(7, 0),
            Corner::BottomRight,
            border::PLAIN.bottom_right,
            border::ROUNDED.bottom_right,
        ),
        ..border::PLAIN
    }
}

/// File letters under the board, rank digits to its right.
fn draw_labels(frame: &mut Frame, board_frame: Rect) {
    let label_style = Style::default().fg(Color::DarkGray);

    let files: String = (0..layout::BOARD_FRAME_WIDTH)
        .map(|i| {
            if i >= 2 && (i - 2) % layout::SQUARE_WIDTH == 0 && (i - 2) / layout::SQUARE_WIDTH < 8 {
                (b'a' + ((i - 2) / layout::SQUARE_WIDTH) as u8) as char
            } else {
                ' '
            }
        })
        .collect();
    let files_rect = Rect::new(
        board_frame.x,
        board_frame.y + layout::BOARD_FRAME_HEIGHT,
        layout::BOARD_FRAME_WIDTH,
        1,
    );
    frame.render_widget(Paragraph::new(files).style(label_style), files_rect);

    for row in 0..8u16 {
        let digit = (8 - row).to_string();
        let rect = Rect::new(
            board_frame.x + layout::BOARD_FRAME_WIDTH,
            board_frame.y + 1 + row * layout::SQUARE_HEIGHT,
            1,
            1,
        );
        frame.render_widget(Paragraph::new(digit).style(label_style), rect);
    }
}

fn draw_side(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .split(area);

    draw_game_info(frame, app, chunks[0]);
    draw_move_history(frame, app, chunks[1]);
    draw_notice(frame, app, chunks[2]);
}

fn draw_game_info(frame: &mut Frame, app: &App, area: Rect) {
    let mut text = vec![Line::from(format!("Turn: {}", app.rules().side_to_move()))];

    match app.phase() {
        Phase::Animating => text.push(Line::from("Moving...")),
        Phase::Selected => text.push(Line::from("Pick a highlighted square")),
        Phase::Idle => text.push(Line::from("Click a piece to select it")),
    }

    let to_move = app.rules().side_to_move();
    if app.rules().in_check(to_move) {
        text.push(Line::from(Span::styled(
            format!("{} is in check!", to_move),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(end) = app.endgame() {
        text.push(Line::from(Span::styled(
            endgame_text(end.kind, end.winner),
            Style::default().fg(Color::Yellow),
        )));
    }

    text.push(Line::from(""));
    text.push(Line::from("q quit  n new game  f FEN  p moves"));

    let info = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Game"))
        .wrap(Wrap { trim: true });
    frame.render_widget(info, area);
}

fn draw_move_history(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .move_history
        .iter()
        .map(|entry| ListItem::new(format!("{:>3}. {}", entry.number, entry.san)))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(list, area);
}

fn draw_notice(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.notice.as_deref().unwrap_or("");
    let notice = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Export"))
        .wrap(Wrap { trim: true });
    frame.render_widget(notice, area);
}

fn endgame_text(kind: EndgameKind, winner: Option<PieceColor>) -> String {
    match (kind, winner) {
        (EndgameKind::Checkmate, Some(side)) => format!("Checkmate! {} won.", side),
        (kind, _) => format!("Game ended due to {}.", kind),
    }
}

fn draw_endgame_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let end = match app.endgame() {
        Some(end) => *end,
        None => return,
    };

    let dialog = centered_rect(44, 7, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            endgame_text(end.kind, end.winner),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" - New Game   "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" - Close"),
        ]),
    ];
    let dialog_widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Game Ended"));
    frame.render_widget(dialog_widget, dialog);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
