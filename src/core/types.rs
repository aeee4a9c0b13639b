// Ficheiro: src/core/types.rs
// Descrição: Tipos fundamentais do motor adaptativo (rating, tiers, resultado da seleção).

use chess::{ChessMove, Color, File, Piece, Square};
use std::fmt;

/// Rating de força do motor. Sempre dentro de [400, 3000]: a construção faz clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u16);

impl Rating {
    pub const MIN: Rating = Rating(400);
    pub const MAX: Rating = Rating(3000);

    /// Cria um rating, fazendo clamp silencioso para a faixa válida.
    pub fn new(value: i32) -> Self {
        Rating(value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(1500)
    }
}

impl From<i32> for Rating {
    fn from(value: i32) -> Self {
        Rating::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Escada de políticas heurísticas, da mais forte para a mais fraca.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Expert,
    Strong,
    Intermediate,
    Beginner,
    Random,
}

impl Tier {
    /// Mapeia o rating para o tier. `Random` nunca sai daqui: é só fallback.
    pub fn from_rating(rating: Rating) -> Self {
        match rating.get() {
            2500..=u16::MAX => Tier::Expert,
            1800..=2499 => Tier::Strong,
            1200..=1799 => Tier::Intermediate,
            _ => Tier::Beginner,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Expert => "expert",
            Tier::Strong => "strong",
            Tier::Intermediate => "intermediate",
            Tier::Beginner => "beginner",
            Tier::Random => "random",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resultado de uma seleção de lance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSelection {
    Move(ChessMove),
    /// Posição terminal: não há lances legais. Resultado esperado, não é erro.
    NoLegalMove,
}

impl MoveSelection {
    pub fn as_move(self) -> Option<ChessMove> {
        match self {
            MoveSelection::Move(mv) => Some(mv),
            MoveSelection::NoLegalMove => None,
        }
    }

    pub fn is_no_legal_move(self) -> bool {
        matches!(self, MoveSelection::NoLegalMove)
    }
}

impl From<Option<ChessMove>> for MoveSelection {
    fn from(mv: Option<ChessMove>) -> Self {
        mv.map_or(MoveSelection::NoLegalMove, MoveSelection::Move)
    }
}

impl fmt::Display for MoveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSelection::Move(mv) => write!(f, "{}", mv),
            MoveSelection::NoLegalMove => f.write_str("(none)"),
        }
    }
}

/// Valor material relativo (peão = 1). O rei não conta.
pub fn piece_value(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 3.0,
        Piece::Bishop => 3.0,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King => 0.0,
    }
}

/// As quatro casas centrais: d4, e4, d5, e5.
pub const CENTER_SQUARES: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

pub fn is_center(square: Square) -> bool {
    CENTER_SQUARES.contains(&square)
}

/// Casas de rei rocado (g e c na primeira fila de cada cor).
pub fn castled_king_squares(color: Color) -> [Square; 2] {
    let rank = color.to_my_backrank();
    [
        Square::make_square(rank, File::G),
        Square::make_square(rank, File::C),
    ]
}

/// Casas iniciais de cavalos e bispos, derivadas da fila de fundo de cada cor.
pub fn minor_piece_home_squares(color: Color, piece: Piece) -> Option<[Square; 2]> {
    let files = match piece {
        Piece::Knight => [File::B, File::G],
        Piece::Bishop => [File::C, File::F],
        _ => return None,
    };
    let rank = color.to_my_backrank();
    Some(files.map(|file| Square::make_square(rank, file)))
}
