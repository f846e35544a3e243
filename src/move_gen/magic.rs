//! Offline search for magic multipliers, an alternative to PEXT indexing for
//! the sliding attack tables. Not used at runtime; each square's search is
//! independent so callers can run them in parallel.

use rand::Rng;

use crate::bitboard::{pdep, BitBoard, Square};
use crate::position::Piece;

use super::sliding::{
    bishop_attacks_slow, bishop_relevant_mask, rook_attacks_slow, rook_relevant_mask,
};

const MAX_TABLE_ENTRIES: usize = 1 << 12;

// Magic candidates want few set bits; AND-ing three samples leaves ~1/8 of
// the bits set.
fn sparse_random(rng: &mut impl Rng) -> u64 {
    rng.random::<u64>() & rng.random::<u64>() & rng.random::<u64>()
}

/// Searches for a multiplier that hashes every blocker subset of `square`'s
/// relevant mask into a `2^relevant_bits`-entry table without destructive
/// collisions (two subsets may share a slot only if they produce the same
/// attack set). Returns `None` if no candidate works within `iterations`
/// samples.
pub fn find_magic(
    square: Square,
    relevant_bits: u8,
    iterations: u32,
    piece: Piece,
) -> Option<u64> {
    let (mask, attacks_slow): (BitBoard, fn(Square, BitBoard) -> BitBoard) = match piece {
        Piece::Rook => (rook_relevant_mask(square), rook_attacks_slow),
        Piece::Bishop => (bishop_relevant_mask(square), bishop_attacks_slow),
        _ => panic!("piece type: want [bishop, rook], got {}", piece),
    };

    let num_subsets = 1usize << mask.num_squares_set();
    let occupancies: Vec<BitBoard> = (0..num_subsets)
        .map(|idx| BitBoard::from_val(pdep(idx as u64, mask.to_val())))
        .collect();
    let attack_sets: Vec<BitBoard> = occupancies
        .iter()
        .map(|&occ| attacks_slow(square, occ))
        .collect();

    let shift = 64 - u32::from(relevant_bits);
    let mut rng = rand::rng();
    let mut table = vec![BitBoard::empty(); MAX_TABLE_ENTRIES];
    let mut stamp = vec![0u32; MAX_TABLE_ENTRIES];

    'candidates: for trial in 1..=iterations {
        let magic = sparse_random(&mut rng);
        // Candidates that map too little of the mask into the top byte
        // collide almost always; skip them without filling the table.
        if (mask.to_val().wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        for (occ, &atk) in occupancies.iter().zip(&attack_sets) {
            let idx = (occ.to_val().wrapping_mul(magic) >> shift) as usize;
            if stamp[idx] == trial && table[idx] != atk {
                continue 'candidates;
            }
            table[idx] = atk;
            stamp[idx] = trial;
        }

        log::debug!("found magic for {} on {} after {} trials", piece, square, trial);
        return Some(magic);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::Square::*;
    use super::*;
    use test_case::test_case;

    fn assert_collision_free(square: Square, piece: Piece, relevant_bits: u8, magic: u64) {
        let (mask, attacks_slow): (BitBoard, fn(Square, BitBoard) -> BitBoard) = match piece {
            Piece::Rook => (rook_relevant_mask(square), rook_attacks_slow),
            Piece::Bishop => (bishop_relevant_mask(square), bishop_attacks_slow),
            _ => unreachable!(),
        };
        let shift = 64 - u32::from(relevant_bits);
        let mut table = vec![None; 1 << relevant_bits];

        for idx in 0..(1u64 << mask.num_squares_set()) {
            let occ = pdep(idx, mask.to_val());
            let atk = attacks_slow(square, BitBoard::from_val(occ));
            let slot = (occ.wrapping_mul(magic) >> shift) as usize;
            match table[slot] {
                Some(existing) => assert_eq!(existing, atk),
                None => table[slot] = Some(atk),
            }
        }
    }

    #[test_case(D4, Piece::Bishop, 9 ; "bishop center")]
    #[test_case(A1, Piece::Bishop, 9 ; "bishop corner")]
    fn test_find_bishop_magic(square: Square, piece: Piece, relevant_bits: u8) {
        let magic = find_magic(square, relevant_bits, 10_000_000, piece)
            .expect("no magic found within iteration budget");
        assert_collision_free(square, piece, relevant_bits, magic);
    }

    #[test]
    fn test_find_rook_magic() {
        let magic = find_magic(A1, 12, 100_000_000, Piece::Rook)
            .expect("no magic found within iteration budget");
        assert_collision_free(A1, Piece::Rook, 12, magic);
    }

    #[test]
    fn test_zero_iterations_finds_nothing() {
        assert_eq!(find_magic(D4, 12, 0, Piece::Rook), None);
    }
}
