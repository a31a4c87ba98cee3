//! # Rules Engine Adapter
//!
//! Adapts the `shakmaty` chess library to the [`Rules`] trait. All chess
//! semantics (move legality, check and endgame detection, SAN, FEN) live
//! in the library; this module only translates between its types and the
//! controller's domain types.
//!
//! Promotion is resolved to a queen automatically: the board UI has no
//! promotion picker, so under-promotions are filtered out of the
//! legal-move query and the queen line is the one that commits.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, File, Move as EngineMove, Position as _, Rank,
    Role, Square,
};

use crate::rules::{
    Endgame, EndgameKind, IllegalMove, Move, Piece, PieceColor, PieceKind, Position, Rules,
};

/// Startup error for a rejected `--fen` argument.
#[derive(Debug)]
pub struct InvalidFen(String);

impl std::fmt::Display for InvalidFen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid FEN: {}", self.0)
    }
}

impl std::error::Error for InvalidFen {}

/// The authoritative board model: a `shakmaty` position plus the SAN
/// history of the moves applied to it.
pub struct ChessEngine {
    pos: Chess,
    sans: Vec<String>,
}

impl ChessEngine {
    /// Standard starting position.
    pub fn new() -> Self {
        Self {
            pos: Chess::default(),
            sans: Vec::new(),
        }
    }

    /// Position parsed from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, InvalidFen> {
        let parsed: Fen = fen.parse().map_err(|e| InvalidFen(format!("{}", e)))?;
        let pos = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| InvalidFen(format!("{}", e)))?;
        Ok(Self {
            pos,
            sans: Vec::new(),
        })
    }
}

impl Default for ChessEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_square(pos: Position) -> Square {
    Square::from_coords(File::new(pos.file() as u32), Rank::new(pos.rank() as u32))
}

fn from_square(sq: Square) -> Position {
    Position::new(u32::from(sq.file()) as u8, u32::from(sq.rank()) as u8)
}

fn color_from(color: Color) -> PieceColor {
    match color {
        Color::White => PieceColor::White,
        Color::Black => PieceColor::Black,
    }
}

fn color_to(color: PieceColor) -> Color {
    match color {
        PieceColor::White => Color::White,
        PieceColor::Black => Color::Black,
    }
}

fn kind_from(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

/// Click endpoints of an engine move. For castling the user clicks the
/// king's two-square destination (g- or c-file), not the rook.
fn endpoints(m: &EngineMove) -> Option<(Square, Square)> {
    match m {
        EngineMove::Normal { from, to, .. } => Some((*from, *to)),
        EngineMove::EnPassant { from, to } => Some((*from, *to)),
        EngineMove::Castle { king, rook } => {
            let file = if rook.file() == File::H {
                File::G
            } else {
                File::C
            };
            Some((*king, Square::from_coords(file, rook.rank())))
        }
        EngineMove::Put { .. } => None,
    }
}

fn captured(m: &EngineMove) -> Option<PieceKind> {
    match m {
        EngineMove::Normal { capture, .. } => capture.map(kind_from),
        EngineMove::EnPassant { .. } => Some(PieceKind::Pawn),
        _ => None,
    }
}

/// Skip under-promotions so each destination square maps to one move.
fn is_underpromotion(m: &EngineMove) -> bool {
    matches!(m, EngineMove::Normal { promotion: Some(promo), .. } if *promo != Role::Queen)
}

impl Rules for ChessEngine {
    fn side_to_move(&self) -> PieceColor {
        color_from(self.pos.turn())
    }

    fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.pos.board().piece_at(to_square(pos)).map(|p| Piece {
            color: color_from(p.color),
            kind: kind_from(p.role),
        })
    }

    fn legal_moves_from(&self, from: Position) -> Vec<Move> {
        let from_sq = to_square(from);
        let mut moves = Vec::new();
        for m in &self.pos.legal_moves() {
            let (mf, mt) = match endpoints(m) {
                Some(e) => e,
                None => continue,
            };
            if mf != from_sq || is_underpromotion(m) {
                continue;
            }
            moves.push(Move {
                from,
                to: from_square(mt),
                capture: captured(m),
                castling: matches!(m, EngineMove::Castle { .. }),
                san: SanPlus::from_move(self.pos.clone(), m).to_string(),
            });
        }
        moves
    }

    fn apply(&mut self, mv: &Move) -> Result<(), IllegalMove> {
        let from_sq = to_square(mv.from);
        let to_sq = to_square(mv.to);
        for m in &self.pos.legal_moves() {
            let (mf, mt) = match endpoints(m) {
                Some(e) => e,
                None => continue,
            };
            if mf != from_sq || mt != to_sq || is_underpromotion(m) {
                continue;
            }
            self.pos = self.pos.clone().play(m).map_err(|_| IllegalMove)?;
            self.sans.push(mv.san.clone());
            return Ok(());
        }
        Err(IllegalMove)
    }

    fn in_check(&self, color: PieceColor) -> bool {
        // Only the side to move can legally stand in check.
        color == self.side_to_move() && self.pos.is_check()
    }

    fn king_square(&self, color: PieceColor) -> Option<Position> {
        self.pos.board().king_of(color_to(color)).map(from_square)
    }

    fn endgame(&self) -> Option<Endgame> {
        if self.pos.is_checkmate() {
            Some(Endgame {
                kind: EndgameKind::Checkmate,
                winner: Some(self.side_to_move().opponent()),
            })
        } else if self.pos.is_stalemate() {
            Some(Endgame {
                kind: EndgameKind::Stalemate,
                winner: None,
            })
        } else if self.pos.is_insufficient_material() {
            Some(Endgame {
                kind: EndgameKind::InsufficientMaterial,
                winner: None,
            })
        } else if self.pos.halfmoves() >= 100 {
            Some(Endgame {
                kind: EndgameKind::FiftyMoveRule,
                winner: None,
            })
        } else {
            None
        }
    }

    fn fen(&self) -> String {
        Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string()
    }

    fn movetext(&self) -> String {
        let mut out = String::new();
        for (i, san) in self.sans.iter().enumerate() {
            if i % 2 == 0 {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&format!("{}.", i / 2 + 1));
            }
            out.push(' ');
            out.push_str(san);
        }
        out
    }
}
