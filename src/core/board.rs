// Ficheiro: src/core/board.rs
// Descrição: Adaptador sobre o crate `chess` (autoridade de regras) com make/unmake em pilha.

use super::error::{EngineError, Result};
use chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, Board,
    BoardStatus, ChessMove, Color, MoveGen, Piece, Square, EMPTY,
};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// Posição de jogo. O motor só lê, e toda mutação passa por `apply`/`undo` aninhados.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    // Tabuleiros anteriores, um por `apply` ainda não desfeito
    undo_stack: Vec<Board>,
}

impl Position {
    /// Posição inicial padrão.
    pub fn new() -> Self {
        Self::from_board(Board::default())
    }

    pub fn from_board(board: Board) -> Self {
        Position {
            board,
            undo_stack: Vec::with_capacity(16),
        }
    }

    /// Cria uma posição a partir de uma string FEN.
    pub fn from_fen(fen: &str) -> Result<Self> {
        Board::from_str(fen.trim())
            .map(Self::from_board)
            .map_err(|e| EngineError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn hash(&self) -> u64 {
        self.board.get_hash()
    }

    /// Número de lances aplicados e ainda não desfeitos.
    pub fn pending_undos(&self) -> usize {
        self.undo_stack.len()
    }

    /// Lances legais na ordem de enumeração da autoridade de regras.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    pub fn is_legal(&self, mv: ChessMove) -> bool {
        MoveGen::new_legal(&self.board).any(|m| m == mv)
    }

    /// Procura o lance legal cuja notação UCI é `uci` (ex.: "e2e4", "e7e8q").
    pub fn find_uci(&self, uci: &str) -> Result<ChessMove> {
        let uci = uci.trim().to_ascii_lowercase();
        if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
            return Err(EngineError::InvalidMove(uci));
        }
        MoveGen::new_legal(&self.board)
            .find(|m| m.to_string() == uci)
            .ok_or(EngineError::IllegalMove(uci))
    }

    pub fn piece_on(&self, square: Square) -> Option<(Piece, Color)> {
        self.board.piece_on(square).zip(self.board.color_on(square))
    }

    /// Captura normal ou en passant (peão que muda de coluna).
    pub fn is_capture(&self, mv: ChessMove) -> bool {
        let dest = mv.get_dest();
        if self.board.color_on(dest) == Some(!self.board.side_to_move()) {
            return true;
        }
        self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && mv.get_source().get_file() != dest.get_file()
    }

    /// Simula o lance e desfaz logo em seguida.
    pub fn gives_check(&mut self, mv: ChessMove) -> bool {
        self.play(mv).is_check()
    }

    /// Simula o lance e verifica se ele dá mate.
    pub fn gives_checkmate(&mut self, mv: ChessMove) -> bool {
        self.play(mv).is_checkmate()
    }

    /// O lado a jogar está em xeque.
    pub fn is_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    /// Verifica se o rei da cor dada está atacado, independente de quem joga.
    pub fn king_in_check(&self, color: Color) -> bool {
        self.is_square_attacked_by(self.board.king_square(color), !color)
    }

    /// Verifica se uma casa é atacada por peças da cor especificada
    pub fn is_square_attacked_by(&self, square: Square, attacking_color: Color) -> bool {
        let board = &self.board;
        let attackers = *board.color_combined(attacking_color);
        if attackers == EMPTY {
            return false;
        }

        let occupied = *board.combined();
        let pawns = *board.pieces(Piece::Pawn) & attackers;
        if get_pawn_attacks(square, !attacking_color, pawns) != EMPTY {
            return true;
        }

        if get_knight_moves(square) & *board.pieces(Piece::Knight) & attackers != EMPTY {
            return true;
        }

        if get_king_moves(square) & *board.pieces(Piece::King) & attackers != EMPTY {
            return true;
        }

        let queens = *board.pieces(Piece::Queen);
        let diagonal = (*board.pieces(Piece::Bishop) | queens) & attackers;
        if get_bishop_moves(square, occupied) & diagonal != EMPTY {
            return true;
        }

        let straight = (*board.pieces(Piece::Rook) | queens) & attackers;
        get_rook_moves(square, occupied) & straight != EMPTY
    }

    pub fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    /// Verifica se há empate por material insuficiente
    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let piece_count = board.combined().popcnt();

        // Rei contra rei
        if piece_count == 2 {
            return true;
        }

        let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }

        let knights = *board.pieces(Piece::Knight);
        let bishops = *board.pieces(Piece::Bishop);

        // Rei + peça menor contra rei
        if piece_count == 3 {
            return (knights | bishops).popcnt() == 1;
        }

        // Só bispos, de qualquer lado, todos na mesma cor de casa
        if knights != EMPTY {
            return false;
        }
        let mut shades = bishops.map(square_shade);
        match shades.next() {
            Some(first) => shades.all(|shade| shade == first),
            None => false,
        }
    }

    /// Posição terminal: sem lances legais ou material insuficiente.
    pub fn is_terminal(&self) -> bool {
        self.board.status() != BoardStatus::Ongoing || self.is_insufficient_material()
    }

    /// Aplica o lance guardando o tabuleiro anterior. Deve ser pareado com `undo`.
    pub fn apply(&mut self, mv: ChessMove) {
        self.undo_stack.push(self.board);
        self.board = self.board.make_move_new(mv);
    }

    /// Desfaz o último `apply`. Retorna `false` se não havia nada a desfazer.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.board = previous;
                true
            }
            None => false,
        }
    }

    /// Aplica o lance e devolve um guard que desfaz no `Drop`, em qualquer caminho de saída.
    pub fn play(&mut self, mv: ChessMove) -> Applied<'_> {
        self.apply(mv);
        Applied { position: self }
    }

    /// Avança a partida de forma permanente (sem entrada na pilha de undo).
    pub fn advance(&mut self, mv: ChessMove) {
        debug_assert!(self.undo_stack.is_empty(), "advance inside a scoped search");
        self.board = self.board.make_move_new(mv);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(fen: &str) -> Result<Self> {
        Position::from_fen(fen)
    }
}

/// Guard de um lance aplicado. Desfaz o lance quando sai de escopo.
pub struct Applied<'a> {
    position: &'a mut Position,
}

impl Deref for Applied<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for Applied<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for Applied<'_> {
    fn drop(&mut self) {
        self.position.undo();
    }
}

fn square_shade(square: Square) -> usize {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2
}
