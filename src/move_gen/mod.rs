pub mod leaping;
pub mod magic;
pub mod sliding;
mod traits;

use crate::bitboard::{BitBoard, Direction, Square};
use crate::masks::rank_mask;
use crate::position::{Piece, Side};

use self::leaping::LEAPING_ATTACKS;
use self::sliding::SLIDING_TABLES;
pub use self::sliding::SlidingTables;
pub use self::traits::{GenerateLeapingAttacks, GenerateSlidingAttacks};

/// Pseudo-legal destination squares for `piece` of `side` standing on
/// `square`, given both sides' occupancy. Never includes own-occupied
/// squares; castling, en passant and promotion destinations are not
/// generated.
pub fn attacks(
    piece: Piece,
    square: Square,
    side: Side,
    own_occupancy: BitBoard,
    opp_occupancy: BitBoard,
) -> BitBoard {
    match piece {
        Piece::Pawn => pawn_attacks(square, side, own_occupancy, opp_occupancy),
        Piece::Knight | Piece::King => {
            LEAPING_ATTACKS.knight_king_attacks(piece, square) & !own_occupancy
        }
        Piece::Bishop | Piece::Rook | Piece::Queen => {
            SLIDING_TABLES.attacks(piece, square, own_occupancy | opp_occupancy) & !own_occupancy
        }
    }
}

fn pawn_attacks(
    square: Square,
    side: Side,
    own_occupancy: BitBoard,
    opp_occupancy: BitBoard,
) -> BitBoard {
    let all_occupancy = own_occupancy | opp_occupancy;
    let (push_dir, start_rank, back_rank) = match side {
        Side::White => (Direction::IncRank, 1, 7),
        Side::Black => (Direction::DecRank, 6, 0),
    };

    let single = BitBoard::from_square(square).shift(push_dir) & !all_occupancy;
    let mut moves = single;
    // A double push needs both squares empty; a blocked single push blocks it.
    if square.rank() == start_rank && !single.is_empty() {
        moves |= single.shift(push_dir) & !all_occupancy;
    }

    // Captures only onto opponent squares. Back-rank targets are dropped:
    // without promotion a pawn never moves there.
    moves | (LEAPING_ATTACKS.pawn_attacks(square, side) & opp_occupancy & !rank_mask(back_rank))
}
