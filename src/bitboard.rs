use std::fmt;
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Sub, SubAssign,
};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, FromRepr, Display, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    pub const fn to_rank_file(self) -> (u8, u8) {
        (self as u8 / 8, self as u8 % 8)
    }

    pub const fn rank(self) -> u8 {
        self as u8 / 8
    }

    pub const fn file(self) -> u8 {
        self as u8 % 8
    }

    pub(crate) const fn from_idx(idx: u8) -> Square {
        match Square::from_repr(idx) {
            Some(sq) => sq,
            None => panic!("square index out of bounds"),
        }
    }

    #[rustfmt::skip]
    pub fn list_white_perspective() -> [Square; 64] {
        [
            Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
            Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
            Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
            Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
            Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
            Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
            Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
            Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
        ]
    }
}

#[repr(isize)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Direction {
    IncRank = 8,
    IncFile = 1,
    DecRank = -8,
    DecFile = -1,
}

/// Compresses the bits of `value` selected by `mask` into the low bits of the
/// result, preserving mask-bit order. Software form of the PEXT instruction.
pub(crate) const fn pext(value: u64, mask: u64) -> u64 {
    let mut result = 0u64;
    let mut remaining = mask;
    let mut out_bit = 0;
    while remaining != 0 {
        let lsb = remaining & remaining.wrapping_neg();
        if value & lsb != 0 {
            result |= 1u64 << out_bit;
        }
        remaining &= remaining - 1;
        out_bit += 1;
    }
    result
}

/// Inverse of [`pext`]: scatters the low bits of `value` over the set bits of
/// `mask`.
pub(crate) const fn pdep(value: u64, mask: u64) -> u64 {
    let mut result = 0u64;
    let mut remaining = mask;
    let mut in_bit = 0;
    while remaining != 0 {
        let lsb = remaining & remaining.wrapping_neg();
        if value & (1u64 << in_bit) != 0 {
            result |= lsb;
        }
        remaining &= remaining - 1;
        in_bit += 1;
    }
    result
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, Deserialize, Serialize)]
pub struct BitBoard(u64);

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub const fn full() -> Self {
        BitBoard(u64::MAX)
    }

    pub const fn from_square(square: Square) -> Self {
        BitBoard(1 << (square as u8))
    }

    pub fn from_squares(squares: &[Square]) -> Self {
        BitBoard(squares.iter().fold(0, |board, sq| board | 1 << (*sq as u8)))
    }

    pub const fn from_val(val: u64) -> Self {
        BitBoard(val)
    }

    pub const fn to_val(self) -> u64 {
        self.0
    }

    pub fn to_squares(mut self) -> Vec<Square> {
        let mut sqs = Vec::with_capacity(self.num_squares_set() as usize);
        while self.0 != 0 {
            sqs.push(self.pop_lsb());
        }
        sqs
    }

    pub(crate) fn move_piece(&mut self, src: Square, dest: Square) {
        self.clear_square(src);
        self.set_square(dest);
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square as u64
    }

    pub(crate) fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square as u64)
    }

    pub fn is_square_set(&self, square: Square) -> bool {
        self.0 & 1 << (square as u64) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub(crate) const fn shift(mut self, dir: Direction) -> BitBoard {
        const EAST_SHIFT_MASK: u64 = 0x7F7F7F7F7F7F7F7F;
        const WEST_SHIFT_MASK: u64 = 0xFEFEFEFEFEFEFEFE;
        match dir {
            Direction::IncFile => self.0 &= EAST_SHIFT_MASK,
            Direction::DecFile => self.0 &= WEST_SHIFT_MASK,
            _ => (),
        }
        let shift_amt = dir as isize;
        if shift_amt >= 0 {
            self.0 <<= shift_amt
        } else {
            self.0 >>= -shift_amt
        }
        self
    }

    pub(crate) fn get_lsb(&self) -> Square {
        debug_assert!(self.0 != 0, "want != 0, got 0");
        let idx = self.0.trailing_zeros() as u8;
        Square::from_idx(idx)
    }

    pub(crate) fn pop_lsb(&mut self) -> Square {
        let lsb = self.get_lsb();
        self.0 &= self.0 - 1;
        lsb
    }

    pub const fn isolate_lsb(self) -> BitBoard {
        BitBoard(self.0 & self.0.wrapping_neg())
    }

    pub const fn clear_lsb(self) -> BitBoard {
        BitBoard(self.0 & self.0.wrapping_sub(1))
    }

    pub fn num_squares_set(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Dense index of this occupancy within `mask`, per [`pext`].
    pub(crate) const fn extract_index(self, mask: BitBoard) -> usize {
        pext(self.0, mask.0) as usize
    }

    pub(crate) const fn const_bit_or(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;

    fn bitxor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 ^ other.0)
    }
}

impl BitXorAssign for BitBoard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> Self::Output {
        BitBoard(!self.0)
    }
}

impl Sub for BitBoard {
    type Output = BitBoard;

    fn sub(self, other: BitBoard) -> Self::Output {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for BitBoard {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);

        for rank in (0..8).rev() {
            for file in 0..8 {
                let square = Square::from_idx(rank * 8 + file);
                board_str.push(if self.is_square_set(square) { 'X' } else { '.' });
            }
            if rank != 0 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}

#[cfg(test)]
mod tests {
    use super::Square::*;
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test]
    fn test_bitboard_from_squares() {
        let got = BitBoard::from_squares(&[A1, A2, E4]);
        let want = BitBoard(0b0000000000000000000000000000000000010000000000000000000100000001);
        assert_eq!(got, want);
    }

    #[test]
    fn test_debug() {
        let got = BitBoard::from_squares(&[A8, B7, C6, D5, E4, F3, G2, H1]);
        let want = "X.......\n.X......\n..X.....\n...X....\n....X...\n.....X..\n......X.\n.......X";
        assert_eq!(format!("{:?}", got), want);
    }

    #[test_case([B8, G6, A4, F1] ; "first")]
    fn test_is_square_set(piece_squares: [Square; 4]) {
        let all_other_squares: Vec<Square> = Square::iter()
            .filter(|s| !piece_squares.contains(s))
            .collect();

        let bb = BitBoard::from_squares(&piece_squares);
        let inv_bb = BitBoard::from_squares(&all_other_squares);

        for sq in Square::iter() {
            if piece_squares.contains(&sq) {
                assert!(bb.is_square_set(sq));
                assert!(!inv_bb.is_square_set(sq));
            } else {
                assert!(!bb.is_square_set(sq));
                assert!(inv_bb.is_square_set(sq));
            }
        }
    }

    #[test_case(BitBoard::from_square(D4), &[Direction::IncRank], BitBoard::from_square(D5) ; "n")]
    #[test_case(BitBoard::from_square(D4), &[Direction::DecRank], BitBoard::from_square(D3) ; "s")]
    #[test_case(BitBoard::from_square(D4), &[Direction::IncFile], BitBoard::from_square(E4) ; "e")]
    #[test_case(BitBoard::from_square(D4), &[Direction::DecFile], BitBoard::from_square(C4) ; "w")]
    #[test_case(BitBoard::from_square(D4), &[Direction::IncRank, Direction::IncFile], BitBoard::from_square(E5) ; "ne")]
    #[test_case(BitBoard::from_square(A6), &[Direction::DecFile], BitBoard::empty() ; "wrap w")]
    #[test_case(BitBoard::from_square(H3), &[Direction::IncFile], BitBoard::empty() ; "wrap e")]
    #[test_case(BitBoard::from_square(A2), &[Direction::DecRank, Direction::DecFile], BitBoard::empty() ; "wrap sw")]
    #[test_case(BitBoard::from_square(H7), &[Direction::IncRank, Direction::IncFile], BitBoard::empty() ; "wrap ne")]
    fn test_shift(mut inp: BitBoard, shift_dirs: &[Direction], want: BitBoard) {
        for &shift_dir in shift_dirs {
            inp = inp.shift(shift_dir);
        }
        assert_eq!(inp, want);
    }

    #[test_case(BitBoard(0b1001000), D1, BitBoard(0b1000000) ; "D1")]
    #[test_case(BitBoard(0b1000000), G1, BitBoard(0b0000000) ; "G1")]
    fn test_pop_lsb(mut inp: BitBoard, lsb_want: Square, res_want: BitBoard) {
        let lsb_got = inp.pop_lsb();
        assert_eq!(lsb_got, lsb_want);
        assert_eq!(inp, res_want);
    }

    #[test_case(0, 0xFF00, 0 ; "zero value")]
    #[test_case(0xFF00, 0xFF00, 0xFF ; "full mask")]
    #[test_case(0b1010_0000, 0b1111_0000, 0b1010 ; "partial")]
    #[test_case(0x8000000000000000, 0x8000000000000001, 0b10 ; "ends")]
    fn test_pext(value: u64, mask: u64, want: u64) {
        assert_eq!(pext(value, mask), want);
    }

    // pdep must reconstruct exactly what pext compressed, for every value
    // contained in the mask.
    #[test_case(0x0000_0000_0F0F_1234)]
    #[test_case(0x8100_0000_0000_0081)]
    #[test_case(0x0101_0101_0101_0101)]
    fn test_pext_pdep_round_trip(mask: u64) {
        let n = mask.count_ones();
        for idx in 0..(1u64 << n) {
            let value = pdep(idx, mask);
            assert_eq!(value & !mask, 0);
            assert_eq!(pext(value, mask), idx);
        }
    }

    #[test]
    fn test_isolate_and_clear_lsb() {
        let bb = BitBoard(0b1011000);
        assert_eq!(bb.isolate_lsb(), BitBoard(0b0001000));
        assert_eq!(bb.clear_lsb(), BitBoard(0b1010000));
    }
}
