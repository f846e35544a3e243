use std::str::FromStr;

use crate::bitboard::Square::*;
use crate::bitboard::Square;
use crate::position::{CastlingRights, Piece, Pieces, Position, Side, State};

#[derive(thiserror::Error, Debug)]
pub enum FenParseError {
    #[error("num fields: want >= 4 got {0}")]
    NumFields(usize),

    #[error("piece placement: got {0}, err at {1}")]
    PiecePlacement(String, usize),

    #[error("side to move: want 'w'|'b' got {0}")]
    SideToMove(String),

    #[error("castling rights given: got {0}, err at idx {1}")]
    CastlingRights(String, usize),

    #[error("en passant target: got {0}")]
    EnPassantTarget(String),
}

impl Position {
    /// Parses the first four FEN fields. The halfmove clock and fullmove
    /// counter may be present but are not tracked.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let fields = fen.split(' ').collect::<Vec<&str>>();

        if fields.len() < 4 {
            Err(FenParseError::NumFields(fields.len()))?
        }

        let pieces = pieces_from_fen(fields[0])?;

        let to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            _ => Err(FenParseError::SideToMove(String::from(fields[1])))?,
        };

        let state = State {
            castling_rights: castling_rights_from_fen(fields[2])?,
            en_passant_target: en_passant_target_from_fen(fields[3])?,
            to_move,
        };

        Ok(Position { state, pieces })
    }

    pub fn to_fen(&self) -> String {
        let mut pieces = String::with_capacity(64);
        let mut curr_empty_count = 0;

        for (idx, &sq) in FEN_SQUARE_ORDER.iter().enumerate() {
            if let Some((piece, side)) = self.piece_at(sq) {
                if curr_empty_count != 0 {
                    pieces += &curr_empty_count.to_string();
                    curr_empty_count = 0;
                }
                let piece_char: char = if side == Side::White {
                    char::from(piece).to_ascii_uppercase()
                } else {
                    char::from(piece)
                };
                pieces.push(piece_char);
            } else {
                curr_empty_count += 1;
            }
            if (idx + 1) % 8 == 0 {
                if curr_empty_count != 0 {
                    pieces += &curr_empty_count.to_string();
                    curr_empty_count = 0;
                }
                if idx != 63 {
                    pieces += "/";
                }
            }
        }

        let side_to_move_char = if self.state.to_move == Side::White {
            'w'
        } else {
            'b'
        };

        let mut castling_rights = String::with_capacity(4);

        if self.state.castling_rights.white_king_side {
            castling_rights += "K";
        }
        if self.state.castling_rights.white_queen_side {
            castling_rights += "Q";
        }
        if self.state.castling_rights.black_king_side {
            castling_rights += "k";
        }
        if self.state.castling_rights.black_queen_side {
            castling_rights += "q";
        }

        if castling_rights.is_empty() {
            castling_rights += "-";
        }

        let en_passant = if let Some(ep_target) = self.state.en_passant_target {
            ep_target.to_string().to_ascii_lowercase()
        } else {
            "-".to_string()
        };

        // The clocks aren't tracked, so they print at their starting values.
        format!(
            "{} {} {} {} 0 1",
            pieces, side_to_move_char, castling_rights, en_passant
        )
    }
}

fn castling_rights_from_fen(castling_rights_str: &str) -> Result<CastlingRights, FenParseError> {
    if castling_rights_str.is_empty() || castling_rights_str == "-" {
        return Ok(CastlingRights::new(false, false, false, false));
    }

    let mut white_king_side = false;
    let mut white_queen_side = false;
    let mut black_king_side = false;
    let mut black_queen_side = false;

    for (idx, ch) in castling_rights_str.chars().enumerate() {
        let flag = match ch {
            'K' => &mut white_king_side,
            'Q' => &mut white_queen_side,
            'k' => &mut black_king_side,
            'q' => &mut black_queen_side,
            _ => {
                return Err(FenParseError::CastlingRights(
                    castling_rights_str.to_string(),
                    idx,
                ));
            }
        };
        if *flag {
            return Err(FenParseError::CastlingRights(
                castling_rights_str.to_string(),
                idx,
            ));
        }
        *flag = true;
    }

    Ok(CastlingRights::new(
        white_king_side,
        white_queen_side,
        black_king_side,
        black_queen_side,
    ))
}

fn en_passant_target_from_fen(
    en_passant_target_str: &str,
) -> Result<Option<Square>, FenParseError> {
    if en_passant_target_str == "-" {
        return Ok(None);
    }

    // FEN uses lowercase letters for square names, Square uses uppercase
    Square::from_str(&en_passant_target_str.to_uppercase())
        .map_err(|_| FenParseError::EnPassantTarget(en_passant_target_str.to_string()))
        .map(Some)
}

const FEN_SQUARE_ORDER: [Square; 64] = [
    A8, B8, C8, D8, E8, F8, G8, H8, A7, B7, C7, D7, E7, F7, G7, H7, A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5, A4, B4, C4, D4, E4, F4, G4, H4, A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2, A1, B1, C1, D1, E1, F1, G1, H1,
];

fn pieces_from_fen(pieces_str: &str) -> Result<Pieces, FenParseError> {
    let mut pieces = Pieces::new();
    let mut sq_idx = 0;

    for (ch_idx, ch) in pieces_str.chars().enumerate() {
        if let Ok(piece) = Piece::try_from(ch.to_ascii_lowercase()) {
            if sq_idx >= 64 {
                Err(FenParseError::PiecePlacement(
                    pieces_str.to_string(),
                    ch_idx,
                ))?
            }
            let square = FEN_SQUARE_ORDER[sq_idx];
            let side = if ch.is_uppercase() {
                Side::White
            } else {
                Side::Black
            };

            pieces.get_mut(piece).get_mut(side).set_square(square);

            sq_idx += 1;
        } else if let Some(digit) = ch.to_digit(10) {
            sq_idx += digit as usize;
        } else if ch == '/' {
            // pass
        } else {
            Err(FenParseError::PiecePlacement(
                pieces_str.to_string(),
                ch_idx,
            ))?
        }
    }

    Ok(pieces)
}
