use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, FromRepr};

use crate::bitboard::Square::*;
use crate::bitboard::{BitBoard, Square};
use crate::move_gen::attacks;
use crate::moves::Move;

mod fen;

pub use fen::FenParseError;

#[derive(thiserror::Error, Debug)]
pub enum PositionError {
    #[error("char -> piece: got {0}")]
    FromCharPiece(char),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MoveApplyError {
    #[error("no {0} of side {1} at {2}")]
    PieceDoesNotExist(Piece, Side, Square),

    #[error("{0} is not to move, for move: {1}")]
    PieceWrongSide(Side, String),

    #[error("{0} of side {1} is already at {2}")]
    PieceAlreadyOnThisSquare(Piece, Side, Square),

    #[error("capture move but nothing to capture at {0}")]
    NoPieceToCapture(Square),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        if self == Side::White {
            Side::Black
        } else {
            Side::White
        }
    }
}

#[derive(
    Debug, PartialEq, Eq, EnumIter, FromRepr, Clone, Copy, Display, Hash, Deserialize, Serialize,
)]
#[repr(u8)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<Piece> for char {
    fn from(piece: Piece) -> char {
        match piece {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = PositionError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'p' => Ok(Piece::Pawn),
            'n' => Ok(Piece::Knight),
            'b' => Ok(Piece::Bishop),
            'r' => Ok(Piece::Rook),
            'q' => Ok(Piece::Queen),
            'k' => Ok(Piece::King),
            _ => Err(PositionError::FromCharPiece(value)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct Sides {
    white: BitBoard,
    black: BitBoard,
}

impl Sides {
    fn new() -> Self {
        Self {
            white: BitBoard::empty(),
            black: BitBoard::empty(),
        }
    }

    pub(crate) fn get(&self, side: Side) -> BitBoard {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut BitBoard {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct Pieces {
    pawns: Sides,
    knights: Sides,
    bishops: Sides,
    rooks: Sides,
    queens: Sides,
    kings: Sides,
}

impl Pieces {
    fn new() -> Self {
        Self {
            pawns: Sides::new(),
            knights: Sides::new(),
            bishops: Sides::new(),
            rooks: Sides::new(),
            queens: Sides::new(),
            kings: Sides::new(),
        }
    }

    fn start() -> Self {
        Self {
            pawns: Sides {
                white: BitBoard::from_squares(&[A2, B2, C2, D2, E2, F2, G2, H2]),
                black: BitBoard::from_squares(&[A7, B7, C7, D7, E7, F7, G7, H7]),
            },
            knights: Sides {
                white: BitBoard::from_squares(&[B1, G1]),
                black: BitBoard::from_squares(&[B8, G8]),
            },
            bishops: Sides {
                white: BitBoard::from_squares(&[C1, F1]),
                black: BitBoard::from_squares(&[C8, F8]),
            },
            rooks: Sides {
                white: BitBoard::from_squares(&[A1, H1]),
                black: BitBoard::from_squares(&[A8, H8]),
            },
            queens: Sides {
                white: BitBoard::from_squares(&[D1]),
                black: BitBoard::from_squares(&[D8]),
            },
            kings: Sides {
                white: BitBoard::from_squares(&[E1]),
                black: BitBoard::from_squares(&[E8]),
            },
        }
    }

    pub(crate) fn get(&self, piece: Piece) -> &Sides {
        match piece {
            Piece::Pawn => &self.pawns,
            Piece::Knight => &self.knights,
            Piece::Bishop => &self.bishops,
            Piece::Rook => &self.rooks,
            Piece::Queen => &self.queens,
            Piece::King => &self.kings,
        }
    }

    fn get_mut(&mut self, piece: Piece) -> &mut Sides {
        match piece {
            Piece::Pawn => &mut self.pawns,
            Piece::Knight => &mut self.knights,
            Piece::Bishop => &mut self.bishops,
            Piece::Rook => &mut self.rooks,
            Piece::Queen => &mut self.queens,
            Piece::King => &mut self.kings,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    fn start() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    pub(crate) fn new(
        white_king_side: bool,
        white_queen_side: bool,
        black_king_side: bool,
        black_queen_side: bool,
    ) -> Self {
        Self {
            white_king_side,
            white_queen_side,
            black_king_side,
            black_queen_side,
        }
    }
}

/// Non-board state. Castling rights and the en passant target are carried
/// (parsed from FEN, reported back out) but never consumed by move
/// generation or application.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct State {
    pub to_move: Side,
    pub en_passant_target: Option<Square>,
    pub castling_rights: CastlingRights,
}

impl State {
    fn start() -> Self {
        Self {
            to_move: Side::White,
            en_passant_target: None,
            castling_rights: CastlingRights::start(),
        }
    }
}

/// Which sides a [`MoveIterator`] enumerates moves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideFilter {
    White,
    Black,
    Both,
}

impl SideFilter {
    fn first_side(self) -> Side {
        match self {
            SideFilter::Black => Side::Black,
            SideFilter::White | SideFilter::Both => Side::White,
        }
    }
}

impl From<Side> for SideFilter {
    fn from(side: Side) -> SideFilter {
        match side {
            Side::White => SideFilter::White,
            Side::Black => SideFilter::Black,
        }
    }
}

#[derive(Clone, Eq, Deserialize, Serialize)]
pub struct Position {
    pub state: State,
    pub(crate) pieces: Pieces,
}

impl Position {
    pub fn start() -> Self {
        Self {
            state: State::start(),
            pieces: Pieces::start(),
        }
    }

    pub fn has_piece(&self, piece: Piece, square: Square, side: Side) -> bool {
        self.pieces.get(piece).get(side).is_square_set(square)
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Side)> {
        for piece in Piece::iter() {
            let sides = self.pieces.get(piece);
            if sides.white.is_square_set(square) {
                return Some((piece, Side::White));
            } else if sides.black.is_square_set(square) {
                return Some((piece, Side::Black));
            }
        }

        None
    }

    /// Union of one side's piece boards, recomputed on demand.
    pub fn occupancy(&self, side: Side) -> BitBoard {
        Piece::iter().fold(BitBoard::empty(), |occ, piece| {
            occ | self.pieces.get(piece).get(side)
        })
    }

    pub fn all_occupancy(&self) -> BitBoard {
        self.occupancy(Side::White) | self.occupancy(Side::Black)
    }

    /// Applies `mve` after validating it fully against the current position.
    /// On any error the position is left bit-for-bit untouched.
    pub fn apply_move(&mut self, mve: Move) -> Result<(), MoveApplyError> {
        let piece = mve.piece();
        let side = self.state.to_move;

        if !self.has_piece(piece, mve.src(), side) {
            // Distinguish a piece of the wrong side from no piece at all.
            if self.has_piece(piece, mve.src(), side.opposite_side()) {
                return Err(MoveApplyError::PieceWrongSide(
                    side.opposite_side(),
                    mve.to_string(),
                ));
            }
            return Err(MoveApplyError::PieceDoesNotExist(piece, side, mve.src()));
        }

        if self.has_piece(piece, mve.dest(), side) {
            return Err(MoveApplyError::PieceAlreadyOnThisSquare(
                piece,
                side,
                mve.dest(),
            ));
        }

        if mve.is_capture()
            && !self
                .occupancy(side.opposite_side())
                .is_square_set(mve.dest())
        {
            return Err(MoveApplyError::NoPieceToCapture(mve.dest()));
        }

        self.apply_move_unchecked(mve);
        Ok(())
    }

    /// [`Self::apply_move`] without the validation, for callers that only
    /// feed moves straight out of the generator.
    pub fn apply_move_unchecked(&mut self, mve: Move) {
        let piece = mve.piece();
        let side = self.state.to_move;

        debug_assert!(
            self.has_piece(piece, mve.src(), side),
            "no {} of side {} at {}\n{}",
            piece,
            side,
            mve.src(),
            self
        );

        if mve.is_capture() {
            let opp = side.opposite_side();
            debug_assert!(
                self.occupancy(opp).is_square_set(mve.dest()),
                "capture move but nothing to capture at {}\n{}",
                mve.dest(),
                self
            );
            for opp_piece in Piece::iter() {
                self.pieces
                    .get_mut(opp_piece)
                    .get_mut(opp)
                    .clear_square(mve.dest());
            }
        }

        self.pieces
            .get_mut(piece)
            .get_mut(side)
            .move_piece(mve.src(), mve.dest());

        self.state.to_move = side.opposite_side();
    }

    /// All squares `side` attacks or can move to, pseudo-legally.
    pub fn attacked_squares(&self, side: Side) -> BitBoard {
        let own_occ = self.occupancy(side);
        let opp_occ = self.occupancy(side.opposite_side());

        let mut attacked = BitBoard::empty();
        for piece in Piece::iter() {
            let mut pieces_bb = self.pieces.get(piece).get(side);
            while !pieces_bb.is_empty() {
                let sq = pieces_bb.pop_lsb();
                attacked |= attacks(piece, sq, side, own_occ, opp_occ);
            }
        }
        attacked
    }

    /// Whether `side`'s king stands on a square the opponent attacks.
    pub fn is_in_check(&self, side: Side) -> bool {
        let king = self.pieces.kings.get(side);
        !(self.attacked_squares(side.opposite_side()) & king).is_empty()
    }

    /// Cheap check test after applying `last_move`: does the piece that just
    /// moved attack the opposing king from its new square?
    ///
    /// Misses discovered checks, where the check comes from a piece other
    /// than the one that moved. [`Self::is_in_check`] is the complete test.
    pub fn is_in_check_after_move(&self, last_move: Move) -> bool {
        let mover = self.state.to_move.opposite_side();
        let own_occ = self.occupancy(mover);
        let opp_occ = self.occupancy(self.state.to_move);

        let atks = attacks(last_move.piece(), last_move.dest(), mover, own_occ, opp_occ);
        !(atks & self.pieces.kings.get(self.state.to_move)).is_empty()
    }

    /// Restartable pseudo-legal move enumeration. Exhausting the iterator
    /// leaves it reset, so driving it again yields the identical sequence.
    pub fn moves(&self, filter: SideFilter) -> MoveIterator<'_> {
        MoveIterator::new(self, filter)
    }

    /// The side to move's pseudo-legal moves, collected.
    ///
    /// A side with n pieces has at most n * (64 - n) destinations, since
    /// destinations never include own-occupied squares; that peaks at 1024
    /// for n = 32, so the capacity holds for any position with 12 disjoint
    /// piece boards.
    pub fn gen_moves(&self) -> ArrayVec<Move, 1024> {
        self.moves(self.state.to_move.into()).collect()
    }
}

// En-passant target and castling rights are carried but don't affect the
// board, so equality includes them deliberately: two positions differing
// only there still parse/print differently.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.pieces == other.pieces
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);
        Square::list_white_perspective()
            .into_iter()
            .enumerate()
            .for_each(|(idx, square)| {
                let ch = match self.piece_at(square) {
                    Some((p, Side::White)) => char::from(p).to_ascii_uppercase(),
                    Some((p, Side::Black)) => char::from(p),
                    None => '.',
                };

                board_str.push(ch);
                if (idx + 1) % 8 == 0 && idx != 63 {
                    board_str.push('\n');
                }
            });
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Cursor over a position's pseudo-legal moves: piece kind outer, side
/// inner (under the filter), then each piece of that kind, then each of its
/// destination squares.
pub struct MoveIterator<'a> {
    position: &'a Position,
    filter: SideFilter,
    piece: Piece,
    side: Side,
    remaining_pieces: BitBoard,
    current_src: Option<Square>,
    remaining_dests: BitBoard,
    own_occ: BitBoard,
    opp_occ: BitBoard,
}

impl<'a> MoveIterator<'a> {
    fn new(position: &'a Position, filter: SideFilter) -> Self {
        let mut it = MoveIterator {
            position,
            filter,
            piece: Piece::Pawn,
            side: filter.first_side(),
            remaining_pieces: BitBoard::empty(),
            current_src: None,
            remaining_dests: BitBoard::empty(),
            own_occ: BitBoard::empty(),
            opp_occ: BitBoard::empty(),
        };
        it.reset();
        it
    }

    fn reset(&mut self) {
        self.piece = Piece::Pawn;
        self.side = self.filter.first_side();
        self.current_src = None;
        self.remaining_dests = BitBoard::empty();
        self.load_slot();
    }

    fn load_slot(&mut self) {
        self.remaining_pieces = self.position.pieces.get(self.piece).get(self.side);
        self.own_occ = self.position.occupancy(self.side);
        self.opp_occ = self.position.occupancy(self.side.opposite_side());
    }

    // Moves the cursor to the next (piece kind, side) slot; false once every
    // slot has been visited.
    fn advance_slot(&mut self) -> bool {
        if self.filter == SideFilter::Both && self.side == Side::White {
            self.side = Side::Black;
            self.load_slot();
            return true;
        }

        match Piece::from_repr(self.piece as u8 + 1) {
            Some(next_piece) => {
                self.piece = next_piece;
                self.side = self.filter.first_side();
                self.load_slot();
                true
            }
            None => false,
        }
    }
}

impl Iterator for MoveIterator<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            if let Some(src) = self.current_src {
                if !self.remaining_dests.is_empty() {
                    let dest = self.remaining_dests.pop_lsb();
                    let mve = if self.opp_occ.is_square_set(dest) {
                        Move::new_capture(self.piece, src, dest)
                    } else {
                        Move::new(self.piece, src, dest)
                    };
                    return Some(mve);
                }
                self.current_src = None;
            }

            if !self.remaining_pieces.is_empty() {
                let src = self.remaining_pieces.pop_lsb();
                self.current_src = Some(src);
                self.remaining_dests =
                    attacks(self.piece, src, self.side, self.own_occ, self.opp_occ);
                continue;
            }

            if !self.advance_slot() {
                self.reset();
                return None;
            }
        }
    }
}
