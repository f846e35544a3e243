use crate::bitboard::{BitBoard, Direction, Square};
use crate::position::{Piece, Side};

use super::traits::GenerateLeapingAttacks;

struct SquareAttackTable([BitBoard; 64]);

impl SquareAttackTable {
    const fn get_bitboard(&self, square: Square) -> BitBoard {
        self.0[square as usize]
    }
}

struct SidedSquareAttackTable {
    white: SquareAttackTable,
    black: SquareAttackTable,
}

impl SidedSquareAttackTable {
    fn get_table(&self, side: Side) -> &SquareAttackTable {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }
}

#[derive(Clone, Copy)]
pub struct LeapingAttacks;

impl GenerateLeapingAttacks for LeapingAttacks {
    fn knight_king_attacks(&self, piece: Piece, square: Square) -> BitBoard {
        match piece {
            Piece::Knight => KNIGHT_ATKS.get_bitboard(square),
            Piece::King => KING_ATKS.get_bitboard(square),
            _ => panic!("piece type: want [knight, king], got {}", piece.to_string()),
        }
    }

    fn pawn_pushes(&self, square: Square, side: Side) -> BitBoard {
        PAWN_PUSHES.get_table(side).get_bitboard(square)
    }

    fn pawn_attacks(&self, square: Square, side: Side) -> BitBoard {
        PAWN_ATKS.get_table(side).get_bitboard(square)
    }
}

const fn calc_square_attack_table(dirs: &[&[Direction]]) -> SquareAttackTable {
    let mut bbs = [BitBoard::empty(); 64];

    let mut bb_idx = 0;

    while bb_idx < bbs.len() {
        let sq = Square::from_idx(bb_idx as u8);

        let mut sq_bb = BitBoard::empty();

        let mut dirs_idx = 0;
        while dirs_idx < dirs.len() {
            let dirs = dirs[dirs_idx];

            let mut dir_sq_bb = BitBoard::from_square(sq);
            let mut curr_dir_idx = 0;

            while curr_dir_idx < dirs.len() {
                let curr_dir = dirs[curr_dir_idx];
                dir_sq_bb = dir_sq_bb.shift(curr_dir);
                // If a shift goes out of bounds, then we break early
                if dir_sq_bb.is_empty() {
                    break;
                }
                curr_dir_idx += 1;
            }
            sq_bb = sq_bb.const_bit_or(dir_sq_bb);
            dirs_idx += 1;
        }
        bbs[bb_idx] = sq_bb;
        bb_idx += 1;
    }

    SquareAttackTable(bbs)
}

const fn calc_pawn_pushes_tables() -> SidedSquareAttackTable {
    // Adds double pushes for the 2nd rank for white and the 7th for black
    let mut moves = SidedSquareAttackTable {
        white: calc_square_attack_table(&[&[Direction::IncRank]]),
        black: calc_square_attack_table(&[&[Direction::DecRank]]),
    };

    let mut white_idx = 8;
    const WHITE_END_IDX: usize = 16;
    while white_idx < WHITE_END_IDX {
        let single = moves.white.0[white_idx];
        moves.white.0[white_idx] = single.const_bit_or(single.shift(Direction::IncRank));
        white_idx += 1;
    }

    let mut black_idx = 48;
    const BLACK_END_IDX: usize = 56;
    while black_idx < BLACK_END_IDX {
        let single = moves.black.0[black_idx];
        moves.black.0[black_idx] = single.const_bit_or(single.shift(Direction::DecRank));
        black_idx += 1;
    }

    moves
}

static PAWN_PUSHES: SidedSquareAttackTable = calc_pawn_pushes_tables();

static PAWN_ATKS: SidedSquareAttackTable = SidedSquareAttackTable {
    white: calc_square_attack_table(&[
        &[Direction::IncRank, Direction::IncFile],
        &[Direction::IncRank, Direction::DecFile],
    ]),
    black: calc_square_attack_table(&[
        &[Direction::DecRank, Direction::IncFile],
        &[Direction::DecRank, Direction::DecFile],
    ]),
};

static KNIGHT_ATKS: SquareAttackTable = calc_square_attack_table(&[
    &[Direction::IncRank, Direction::IncRank, Direction::IncFile],
    &[Direction::IncRank, Direction::IncRank, Direction::DecFile],
    &[Direction::DecRank, Direction::DecRank, Direction::IncFile],
    &[Direction::DecRank, Direction::DecRank, Direction::DecFile],
    &[Direction::IncRank, Direction::IncFile, Direction::IncFile],
    &[Direction::IncRank, Direction::DecFile, Direction::DecFile],
    &[Direction::DecRank, Direction::IncFile, Direction::IncFile],
    &[Direction::DecRank, Direction::DecFile, Direction::DecFile],
]);

static KING_ATKS: SquareAttackTable = calc_square_attack_table(&[
    &[Direction::IncRank],
    &[Direction::IncFile],
    &[Direction::DecFile],
    &[Direction::DecRank],
    &[Direction::IncRank, Direction::IncFile],
    &[Direction::IncRank, Direction::DecFile],
    &[Direction::DecRank, Direction::IncFile],
    &[Direction::DecRank, Direction::DecFile],
]);

pub(crate) static LEAPING_ATTACKS: LeapingAttacks = LeapingAttacks {};

#[cfg(test)]
mod tests {
    use super::Square::*;
    use super::*;
    use test_case::test_case;

    #[test_case(D4, BitBoard::from_squares(&[B5, C6, E6, F5, B3, C2, E2, F3]) ; "center")]
    #[test_case(A8, BitBoard::from_squares(&[B6, C7]) ; "corner")]
    #[test_case(A4, BitBoard::from_squares(&[B6, C5, C3, B2]) ; "edge")]
    fn test_knight_atks(square: Square, want: BitBoard) {
        let got = KNIGHT_ATKS.get_bitboard(square);
        assert_eq!(got, want);
    }

    #[test_case(D4, BitBoard::from_squares(&[C5, D5, E5, C4, E4, C3, D3, E3]) ; "center")]
    #[test_case(A8, BitBoard::from_squares(&[A7, B7, B8]) ; "corner")]
    #[test_case(C1, BitBoard::from_squares(&[B1, B2, C2, D2, D1]) ; "edge")]
    fn test_king_atks(square: Square, want: BitBoard) {
        let got = KING_ATKS.get_bitboard(square);
        assert_eq!(got, want);
    }

    #[test_case(D2, Side::White, BitBoard::from_squares(&[D3, D4]) ; "white double")]
    #[test_case(B3, Side::White, BitBoard::from_squares(&[B4]) ; "white single")]
    #[test_case(G7, Side::White, BitBoard::from_squares(&[G8]) ; "white single edge")]
    #[test_case(G8, Side::White, BitBoard::from_squares(&[]) ; "white edge")]
    #[test_case(D7, Side::Black, BitBoard::from_squares(&[D6, D5]) ; "black double")]
    #[test_case(B6, Side::Black, BitBoard::from_squares(&[B5]) ; "black single")]
    #[test_case(G2, Side::Black, BitBoard::from_squares(&[G1]) ; "black single edge")]
    #[test_case(G1, Side::Black, BitBoard::from_squares(&[]) ; "black edge")]
    fn test_pawn_pushes(square: Square, side: Side, want: BitBoard) {
        let got = PAWN_PUSHES.get_table(side).get_bitboard(square);
        assert_eq!(got, want);
    }

    #[test_case(D2, Side::White, BitBoard::from_squares(&[C3, E3]) ; "white")]
    #[test_case(A7, Side::White, BitBoard::from_squares(&[B8]) ; "white edge")]
    #[test_case(D7, Side::Black, BitBoard::from_squares(&[C6, E6]) ; "black")]
    #[test_case(A2, Side::Black, BitBoard::from_squares(&[B1]) ; "black edge")]
    fn test_pawn_atks(square: Square, side: Side, want: BitBoard) {
        let got = PAWN_ATKS.get_table(side).get_bitboard(square);
        assert_eq!(got, want);
    }
}
