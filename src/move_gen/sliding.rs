use std::sync::LazyLock;
use std::time::Instant;

use crate::bitboard::{BitBoard, Direction, Square};
use crate::masks::{file_mask, rank_mask};
use crate::position::Piece;

use super::traits::GenerateSlidingAttacks;

const ROOK_DIRS: [&[Direction]; 4] = [
    &[Direction::IncRank],
    &[Direction::DecRank],
    &[Direction::IncFile],
    &[Direction::DecFile],
];

const BISHOP_DIRS: [&[Direction]; 4] = [
    &[Direction::IncRank, Direction::IncFile],
    &[Direction::IncRank, Direction::DecFile],
    &[Direction::DecRank, Direction::IncFile],
    &[Direction::DecRank, Direction::DecFile],
];

fn slide_attacks(square: Square, blockers: BitBoard, dirs: &[&[Direction]]) -> BitBoard {
    let mut attacks = BitBoard::empty();
    for dir_steps in dirs {
        let mut bb = BitBoard::from_square(square);
        loop {
            for &dir in *dir_steps {
                bb = bb.shift(dir);
            }
            if bb.is_empty() {
                break;
            }
            attacks |= bb;
            // Rays stop at, and include, the first blocker.
            if !(bb & blockers).is_empty() {
                break;
            }
        }
    }
    attacks
}

pub(crate) fn rook_attacks_slow(square: Square, blockers: BitBoard) -> BitBoard {
    slide_attacks(square, blockers, &ROOK_DIRS)
}

pub(crate) fn bishop_attacks_slow(square: Square, blockers: BitBoard) -> BitBoard {
    slide_attacks(square, blockers, &BISHOP_DIRS)
}

/// Rook blocker squares that can change the attack set: the rook's rank and
/// file minus the board edges and the rook's own square. At most 12 bits.
pub(crate) fn rook_relevant_mask(square: Square) -> BitBoard {
    let (rank, file) = square.to_rank_file();
    let rank_part = rank_mask(rank as i8) & !(file_mask(0) | file_mask(7));
    let file_part = file_mask(file as i8) & !(rank_mask(0) | rank_mask(7));
    (rank_part | file_part) & !BitBoard::from_square(square)
}

/// Bishop equivalent of [`rook_relevant_mask`]. At most 9 bits.
pub(crate) fn bishop_relevant_mask(square: Square) -> BitBoard {
    let edges = rank_mask(0) | rank_mask(7) | file_mask(0) | file_mask(7);
    bishop_attacks_slow(square, BitBoard::empty()) & !edges
}

struct SquareTable {
    mask: BitBoard,
    attacks: Vec<BitBoard>,
}

impl SquareTable {
    fn lookup(&self, occupancy: BitBoard) -> BitBoard {
        self.attacks[occupancy.extract_index(self.mask)]
    }
}

fn build_square_table(
    square: Square,
    relevant_mask: fn(Square) -> BitBoard,
    attacks_slow: fn(Square, BitBoard) -> BitBoard,
) -> SquareTable {
    let mask = relevant_mask(square);
    let mut attacks = vec![BitBoard::empty(); 1 << mask.num_squares_set()];

    // Carry-ripple enumeration visits every subset of the mask exactly once,
    // ending back at the empty set.
    let mut subset = BitBoard::empty();
    loop {
        attacks[subset.extract_index(mask)] = attacks_slow(square, subset);
        subset = (subset - mask) & mask;
        if subset.is_empty() {
            break;
        }
    }

    SquareTable { mask, attacks }
}

/// Rook and bishop attack tables for every square, indexed by the PEXT of the
/// occupancy over the square's relevant mask.
///
/// Read-only after construction. Most callers use the process-wide
/// [`SLIDING_TABLES`]; `build` exists for callers that want to own a copy.
pub struct SlidingTables {
    rook: [SquareTable; 64],
    bishop: [SquareTable; 64],
}

impl SlidingTables {
    pub fn build() -> Self {
        let start = Instant::now();
        let tables = SlidingTables {
            rook: std::array::from_fn(|idx| {
                build_square_table(
                    Square::from_idx(idx as u8),
                    rook_relevant_mask,
                    rook_attacks_slow,
                )
            }),
            bishop: std::array::from_fn(|idx| {
                build_square_table(
                    Square::from_idx(idx as u8),
                    bishop_relevant_mask,
                    bishop_attacks_slow,
                )
            }),
        };
        log::debug!(
            "built sliding attack tables in {:?}",
            start.elapsed()
        );
        tables
    }
}

impl GenerateSlidingAttacks for SlidingTables {
    fn attacks(&self, piece: Piece, square: Square, occupancy: BitBoard) -> BitBoard {
        match piece {
            Piece::Rook => self.rook[square as usize].lookup(occupancy),
            Piece::Bishop => self.bishop[square as usize].lookup(occupancy),
            Piece::Queen => {
                self.rook[square as usize].lookup(occupancy)
                    | self.bishop[square as usize].lookup(occupancy)
            }
            _ => panic!(
                "piece type: want [bishop, rook, queen], got {}",
                piece
            ),
        }
    }
}

pub(crate) static SLIDING_TABLES: LazyLock<SlidingTables> = LazyLock::new(SlidingTables::build);
