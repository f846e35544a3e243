use crate::bitboard::{BitBoard, Square};
use crate::position::{Piece, Side};

pub trait GenerateLeapingAttacks {
    fn knight_king_attacks(&self, piece: Piece, square: Square) -> BitBoard;
    fn pawn_pushes(&self, square: Square, side: Side) -> BitBoard;
    fn pawn_attacks(&self, square: Square, side: Side) -> BitBoard;
}

pub trait GenerateSlidingAttacks {
    fn attacks(&self, piece: Piece, square: Square, occupancy: BitBoard) -> BitBoard;
}
