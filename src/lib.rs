pub mod bitboard;
pub mod masks;
pub mod move_gen;
pub mod moves;
pub mod perft;
pub mod position;

pub use bitboard::{BitBoard, Square};
pub use move_gen::{attacks, GenerateLeapingAttacks, GenerateSlidingAttacks, SlidingTables};
pub use moves::Move;
pub use perft::{perft, perft_report};
pub use position::{
    FenParseError, MoveApplyError, MoveIterator, Piece, Position, Side, SideFilter,
};
