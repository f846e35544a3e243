//! Rank, file and diagonal geometry tables.
//!
//! Out-of-range rank/file indices clamp to an empty board so callers doing
//! neighbor arithmetic near the edges need no bounds checks.

use crate::bitboard::BitBoard;

const fn calc_rank_masks() -> [BitBoard; 8] {
    let mut masks = [BitBoard::empty(); 8];
    let mut rank = 0;
    while rank < 8 {
        masks[rank] = BitBoard::from_val(0xFFu64 << (rank * 8));
        rank += 1;
    }
    masks
}

const fn calc_file_masks() -> [BitBoard; 8] {
    let mut masks = [BitBoard::empty(); 8];
    let mut file = 0;
    while file < 8 {
        masks[file] = BitBoard::from_val(0x0101010101010101u64 << file);
        file += 1;
    }
    masks
}

// Diagonals are indexed by file + rank, anti diagonals by (7 - file) + rank.
// 15 of each; corner diagonals are single squares.
const fn calc_diagonal_masks() -> [BitBoard; 15] {
    let mut masks = [BitBoard::empty(); 15];
    let mut sq = 0u64;
    while sq < 64 {
        let (rank, file) = (sq / 8, sq % 8);
        let idx = (file + rank) as usize;
        masks[idx] = masks[idx].const_bit_or(BitBoard::from_val(1 << sq));
        sq += 1;
    }
    masks
}

const fn calc_anti_diagonal_masks() -> [BitBoard; 15] {
    let mut masks = [BitBoard::empty(); 15];
    let mut sq = 0u64;
    while sq < 64 {
        let (rank, file) = (sq / 8, sq % 8);
        let idx = ((7 - file) + rank) as usize;
        masks[idx] = masks[idx].const_bit_or(BitBoard::from_val(1 << sq));
        sq += 1;
    }
    masks
}

const RANK_MASKS: [BitBoard; 8] = calc_rank_masks();
const FILE_MASKS: [BitBoard; 8] = calc_file_masks();
const DIAGONAL_MASKS: [BitBoard; 15] = calc_diagonal_masks();
const ANTI_DIAGONAL_MASKS: [BitBoard; 15] = calc_anti_diagonal_masks();

pub const fn rank_mask(rank: i8) -> BitBoard {
    if rank < 0 || rank > 7 {
        return BitBoard::empty();
    }
    RANK_MASKS[rank as usize]
}

pub const fn file_mask(file: i8) -> BitBoard {
    if file < 0 || file > 7 {
        return BitBoard::empty();
    }
    FILE_MASKS[file as usize]
}

pub const fn diagonal_mask(file: u8, rank: u8) -> BitBoard {
    DIAGONAL_MASKS[(file + rank) as usize]
}

pub const fn anti_diagonal_mask(file: u8, rank: u8) -> BitBoard {
    ANTI_DIAGONAL_MASKS[((7 - file) + rank) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::{self, *};
    use test_case::test_case;

    #[test_case(0, BitBoard::from_squares(&[A1, B1, C1, D1, E1, F1, G1, H1]) ; "rank 1")]
    #[test_case(7, BitBoard::from_squares(&[A8, B8, C8, D8, E8, F8, G8, H8]) ; "rank 8")]
    #[test_case(-1, BitBoard::empty() ; "below")]
    #[test_case(8, BitBoard::empty() ; "above")]
    fn test_rank_mask(rank: i8, want: BitBoard) {
        assert_eq!(rank_mask(rank), want);
    }

    #[test_case(0, BitBoard::from_squares(&[A1, A2, A3, A4, A5, A6, A7, A8]) ; "a file")]
    #[test_case(7, BitBoard::from_squares(&[H1, H2, H3, H4, H5, H6, H7, H8]) ; "h file")]
    #[test_case(-1, BitBoard::empty() ; "below")]
    #[test_case(8, BitBoard::empty() ; "above")]
    fn test_file_mask(file: i8, want: BitBoard) {
        assert_eq!(file_mask(file), want);
    }

    #[test_case(A1, BitBoard::from_square(A1) ; "corner a1")]
    #[test_case(D4, BitBoard::from_squares(&[A7, B6, C5, D4, E3, F2, G1]) ; "d4")]
    #[test_case(H1, BitBoard::from_squares(&[A8, B7, C6, D5, E4, F3, G2, H1]) ; "long")]
    fn test_diagonal_mask(sq: Square, want: BitBoard) {
        let (rank, file) = sq.to_rank_file();
        assert_eq!(diagonal_mask(file, rank), want);
    }

    #[test_case(H1, BitBoard::from_square(H1) ; "corner h1")]
    #[test_case(D4, BitBoard::from_squares(&[A1, B2, C3, D4, E5, F6, G7, H8]) ; "long")]
    #[test_case(B7, BitBoard::from_squares(&[A6, B7, C8]) ; "short")]
    fn test_anti_diagonal_mask(sq: Square, want: BitBoard) {
        let (rank, file) = sq.to_rank_file();
        assert_eq!(anti_diagonal_mask(file, rank), want);
    }

    #[test]
    fn test_every_square_on_one_diagonal_of_each_kind() {
        use strum::IntoEnumIterator;
        for sq in Square::iter() {
            let (rank, file) = sq.to_rank_file();
            assert!(diagonal_mask(file, rank).is_square_set(sq));
            assert!(anti_diagonal_mask(file, rank).is_square_set(sq));
        }
    }
}
