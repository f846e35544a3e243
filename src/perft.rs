use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use tabled::{Table, Tabled};

use crate::position::Position;

/// Counts the nodes of the pseudo-legal move tree: depth 0 is 0, depth 1 is
/// the number of moves for the side to move, deeper depths sum over each
/// move's subtree. Every branch works on its own copy of the position; moves
/// are drawn from the iterator without materializing them.
pub fn perft(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 0;
    }

    let moves = position.moves(position.state.to_move.into());
    if depth == 1 {
        return moves.count() as u64;
    }

    moves
        .map(|mve| {
            let mut move_position = position.clone();
            move_position.apply_move_unchecked(mve);
            perft(&move_position, depth - 1)
        })
        .sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub depth: usize,
    pub nodes: u64,
}

pub struct PerftReport {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl Display for PerftReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

/// [`perft`] with per-depth node counts and timing.
pub fn perft_report(position: &Position, depth: usize) -> PerftReport {
    let mut nodes_per_depth = vec![0u64; depth];

    let start = Instant::now();
    if depth > 0 {
        perft_depths(position, &mut nodes_per_depth, 0);
    }
    let time_elapsed = start.elapsed();

    let depth_results = nodes_per_depth
        .iter()
        .enumerate()
        .map(|(idx, &nodes)| PerftDepthResult {
            depth: idx + 1,
            nodes,
        })
        .collect::<Vec<_>>();

    let tot_nodes: u64 = nodes_per_depth.iter().sum();
    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64();

    log::debug!(
        "perft to depth {}: {} nodes in {:?}",
        depth,
        tot_nodes,
        time_elapsed
    );

    PerftReport {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_depths(position: &Position, nodes_per_depth: &mut [u64], curr_depth: usize) {
    let at_last_depth = curr_depth + 1 == nodes_per_depth.len();
    let mut num_moves = 0u64;

    for mve in position.moves(position.state.to_move.into()) {
        num_moves += 1;
        if !at_last_depth {
            let mut move_position = position.clone();
            move_position.apply_move_unchecked(mve);
            perft_depths(&move_position, nodes_per_depth, curr_depth + 1);
        }
    }

    nodes_per_depth[curr_depth] += num_moves;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0 ; "depth 0")]
    #[test_case(1, 20 ; "depth 1")]
    #[test_case(2, 400 ; "depth 2")]
    fn test_perft_start_position(depth: usize, want: u64) {
        assert_eq!(perft(&Position::start(), depth), want);
    }

    #[test]
    fn test_perft_report_matches_perft() {
        let position = Position::start();
        let report = perft_report(&position, 2);

        assert_eq!(report.depth_results.len(), 2);
        assert_eq!(report.depth_results[0].nodes, perft(&position, 1));
        assert_eq!(report.depth_results[1].nodes, perft(&position, 2));
        assert_eq!(report.tot_nodes, 420);
    }

    #[test]
    fn test_perft_report_depth_zero() {
        let report = perft_report(&Position::start(), 0);
        assert_eq!(report.tot_nodes, 0);
        assert!(report.depth_results.is_empty());
    }
}
