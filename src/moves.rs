use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::bitboard::Square;
use crate::position::Piece;

const DEST_MASK: u16 = 0b0000_0000_0011_1111;
const SRC_MASK: u16 = 0b0000_1111_1100_0000;
const PIECE_MASK: u16 = 0b0111_0000_0000_0000;
const CAPTURE_MASK: u16 = 0b1000_0000_0000_0000;

const SRC_SHIFT: u16 = 6;
const PIECE_SHIFT: u16 = 12;

/// A move packed into 16 bits: destination square in bits 0-5, source square
/// in bits 6-11, piece kind in bits 12-14, capture flag in bit 15.
///
/// Construction performs no validation against any position; a `Move` is just
/// the claim "this piece goes from here to there".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    pub fn new(piece: Piece, src: Square, dest: Square) -> Move {
        Move(
            (dest as u16)
                | (src as u16) << SRC_SHIFT
                | (piece as u16) << PIECE_SHIFT,
        )
    }

    pub fn new_capture(piece: Piece, src: Square, dest: Square) -> Move {
        Move(Move::new(piece, src, dest).0 | CAPTURE_MASK)
    }

    pub fn src(self) -> Square {
        Square::from_idx(((self.0 & SRC_MASK) >> SRC_SHIFT) as u8)
    }

    pub fn dest(self) -> Square {
        Square::from_idx((self.0 & DEST_MASK) as u8)
    }

    pub fn piece(self) -> Piece {
        // 3 bits cover ordinals 0..=5 with two unused encodings; the
        // constructors and Deserialize only ever store valid ordinals.
        let piece_bits = ((self.0 & PIECE_MASK) >> PIECE_SHIFT) as u8;
        Piece::from_repr(piece_bits)
            .unwrap_or_else(|| panic!("piece bits: want 0..=5, got {}", piece_bits))
    }

    pub fn is_capture(self) -> bool {
        self.0 & CAPTURE_MASK != 0
    }

    pub fn set_capture(&mut self, capture: bool) {
        if capture {
            self.0 |= CAPTURE_MASK;
        } else {
            self.0 &= !CAPTURE_MASK;
        }
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

// The raw u16 admits two piece encodings no constructor produces; reject
// them at the boundary so `piece()` stays total.
impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let val = u16::deserialize(deserializer)?;
        let piece_bits = ((val & PIECE_MASK) >> PIECE_SHIFT) as u8;
        if Piece::from_repr(piece_bits).is_none() {
            return Err(de::Error::custom(format!(
                "piece bits: want 0..=5, got {}",
                piece_bits
            )));
        }
        Ok(Move(val))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.piece(),
            self.src(),
            if self.is_capture() { "x" } else { "-" },
            self.dest()
        )
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(Piece::Knight, G1, F3, false ; "knight development")]
    #[test_case(Piece::Pawn, E2, E4, false ; "double push")]
    #[test_case(Piece::Queen, D1, D8, true ; "queen capture")]
    #[test_case(Piece::King, A1, H8, true ; "extremes")]
    fn test_move_round_trip(piece: Piece, src: Square, dest: Square, capture: bool) {
        let mve = if capture {
            Move::new_capture(piece, src, dest)
        } else {
            Move::new(piece, src, dest)
        };
        assert_eq!(mve.piece(), piece);
        assert_eq!(mve.src(), src);
        assert_eq!(mve.dest(), dest);
        assert_eq!(mve.is_capture(), capture);
    }

    #[test]
    fn test_all_fields_lossless() {
        for piece in Piece::iter() {
            for src in [A1, D4, H8] {
                for dest in [A8, E5, H1] {
                    let mve = Move::new(piece, src, dest);
                    assert_eq!((mve.piece(), mve.src(), mve.dest()), (piece, src, dest));
                    assert!(!mve.is_capture());
                }
            }
        }
    }

    #[test]
    fn test_set_capture() {
        let mut mve = Move::new(Piece::Rook, A1, A8);
        mve.set_capture(true);
        assert!(mve.is_capture());
        assert_eq!((mve.piece(), mve.src(), mve.dest()), (Piece::Rook, A1, A8));
        mve.set_capture(false);
        assert!(!mve.is_capture());
    }

    #[test]
    fn test_deserialize_rejects_invalid_piece_bits() {
        use serde::de::value::Error as DeError;
        use serde::de::IntoDeserializer;

        // Piece ordinal 6 is one of the two encodings no constructor emits.
        let invalid: u16 = 6 << PIECE_SHIFT;
        let got: Result<Move, DeError> = Move::deserialize(invalid.into_deserializer());
        assert!(got.is_err());

        let valid = Move::new_capture(Piece::Queen, A1, H8);
        let round: Result<Move, DeError> = Move::deserialize(valid.0.into_deserializer());
        assert_eq!(round.unwrap(), valid);
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::new(Piece::Knight, G1, F3).to_string(), "KnightG1-F3");
        assert!(Move::new_capture(Piece::Pawn, E4, D5).to_string().contains('x'));
    }
}
