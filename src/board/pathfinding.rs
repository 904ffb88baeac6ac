//! A* pathfinding over the board topology
//!
//! Paths ignore square colors and occupancy: the pathfinder measures
//! pure travel distance, which is what the gauge charges for a
//! completed move and what the AI uses to rank destinations. The
//! heuristic is topology-aware. Inside a single arm the estimate is
//! plain Chebyshev distance (diagonal steps exist). Across arms a pawn
//! must first climb into the inner circle, travel around it, and climb
//! back out, so the estimate is the maximum of three lower bounds: the
//! minimal lateral distance around the circumference (derived from a
//! per-search table of clockwise arm gaps), the radial distance, and
//! the combined climb both endpoints need to reach the circle. Every
//! bound changes by at most one hop per step, so the heuristic never
//! overestimates.

use crate::board::{Board, Coord};
use crate::cards::MovementKind;
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Cost charged per board hop
pub const STEP_COST: u32 = 10;

/// Clockwise arm-to-arm gap table, built once per search
struct BranchTable {
    arm_count: u32,
    arm_width: u32,
    inner_rows: u32,
    clockwise: Vec<u32>,
}

impl BranchTable {
    fn new(board: &Board) -> Self {
        let n = board.arm_count();
        let clockwise = (0..n * n)
            .map(|i| {
                let (a, b) = (i / n, i % n);
                (b + n - a) % n
            })
            .collect();
        BranchTable {
            arm_count: n,
            arm_width: board.arm_width(),
            inner_rows: board.inner_rows(),
            clockwise,
        }
    }

    /// Minimal lateral travel between two columns on different arms,
    /// in either direction around the circumference
    fn lateral(&self, xa: u32, xb: u32) -> u32 {
        let (arm_a, arm_b) = (xa / self.arm_width, xb / self.arm_width);
        let (offset_a, offset_b) = ((xa % self.arm_width) as i64, (xb % self.arm_width) as i64);
        let gap_cw = self.clockwise[(arm_a * self.arm_count + arm_b) as usize] as i64;
        let gap_ccw = self.clockwise[(arm_b * self.arm_count + arm_a) as usize] as i64;
        let width = self.arm_width as i64;
        let clockwise = gap_cw * width + offset_b - offset_a;
        let counter = gap_ccw * width + offset_a - offset_b;
        clockwise.min(counter) as u32
    }

    fn estimate(&self, board: &Board, from: Coord, to: Coord) -> u32 {
        let dy = from.y.abs_diff(to.y);
        if board.arm_of(from.x) == board.arm_of(to.x) {
            return STEP_COST * from.x.abs_diff(to.x).max(dy);
        }
        // Hops needed to climb from an arm row into the circle
        let rise = |y: u32| (y + 1).saturating_sub(self.inner_rows);
        let climbs = rise(from.y) + rise(to.y);
        STEP_COST * self.lateral(from.x, to.x).max(dy).max(climbs)
    }
}

fn successors(board: &Board, from: Coord, movements: &[MovementKind]) -> SmallVec<[Coord; 16]> {
    let mut result = SmallVec::new();
    for kind in movements {
        match kind {
            MovementKind::Line => result.extend(board.line_adjacent(from)),
            MovementKind::Diagonal => result.extend(board.diagonal_adjacent(from)),
            MovementKind::Knight => result.extend(board.knight_jumps(from)),
        }
    }
    result
}

/// Shortest path between two squares, both endpoints included
///
/// Returns `None` when either coordinate is off the board or no route
/// exists for the given movement kinds.
pub fn shortest_path(
    board: &Board,
    start: Coord,
    goal: Coord,
    movements: &[MovementKind],
) -> Option<Vec<Coord>> {
    // Wrapped x inputs collapse onto their canonical square here, so
    // the arena indices and the heuristic only ever see coordinates
    // inside the grid.
    let start = board.square_at(start)?.coord();
    let goal = board.square_at(goal)?.coord();
    if start == goal {
        return Some(vec![start]);
    }

    let table = BranchTable::new(board);
    // A knight jump covers more than one hop of estimate, which would
    // break admissibility; fall back to uniform-cost search.
    let use_estimate = !movements.contains(&MovementKind::Knight);
    let h = |c: Coord| {
        if use_estimate {
            table.estimate(board, c, goal)
        } else {
            0
        }
    };

    let mut dist = vec![u32::MAX; board.square_count()];
    let mut prev: Vec<Option<Coord>> = vec![None; board.square_count()];
    dist[board.index_of(start)] = 0;

    let mut heap: BinaryHeap<Reverse<(u32, Coord)>> = BinaryHeap::new();
    heap.push(Reverse((h(start), start)));

    while let Some(Reverse((estimate, coord))) = heap.pop() {
        let index = board.index_of(coord);
        if estimate > dist[index].saturating_add(h(coord)) {
            continue;
        }
        if coord == goal {
            break;
        }

        for next in successors(board, coord, movements) {
            let next_index = board.index_of(next);
            let candidate = dist[index] + STEP_COST;
            if candidate < dist[next_index] {
                dist[next_index] = candidate;
                prev[next_index] = Some(coord);
                heap.push(Reverse((candidate + h(next), next)));
            }
        }
    }

    if prev[board.index_of(goal)].is_none() {
        return None;
    }

    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        cur = prev[board.index_of(cur)]?;
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

/// Path length in hops, `None` when unreachable
pub fn distance(board: &Board, start: Coord, goal: Coord, movements: &[MovementKind]) -> Option<u32> {
    shortest_path(board, start, goal, movements).map(|path| (path.len() - 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;

    const WALK: [MovementKind; 2] = [MovementKind::Line, MovementKind::Diagonal];

    fn standard_board() -> Board {
        Board::new(&BoardConfig::standard()).unwrap()
    }

    #[test]
    fn test_trivial_paths() {
        let board = standard_board();

        let path = shortest_path(&board, Coord::new(6, 7), Coord::new(6, 7), &WALK).unwrap();
        assert_eq!(path, vec![Coord::new(6, 7)]);
        assert_eq!(
            distance(&board, Coord::new(6, 7), Coord::new(6, 6), &WALK),
            Some(1)
        );
    }

    #[test]
    fn test_wraps_around_the_seam() {
        let board = standard_board();

        assert_eq!(
            distance(&board, Coord::new(30, 0), Coord::new(1, 0), &WALK),
            Some(3)
        );
    }

    #[test]
    fn test_arm_boundary_forces_the_long_way_round() {
        let board = standard_board();

        // (7,7) and (8,7) touch across an arm boundary; the only route
        // climbs into the circle and back down.
        let d = distance(&board, Coord::new(7, 7), Coord::new(8, 7), &WALK).unwrap();
        assert_eq!(d, 12);

        let path = shortest_path(&board, Coord::new(7, 7), Coord::new(8, 7), &WALK).unwrap();
        assert_eq!(path.len() as u32, d + 1);
        assert_eq!(path[0], Coord::new(7, 7));
        assert_eq!(path[path.len() - 1], Coord::new(8, 7));
        // Consecutive path squares must be adjacent on the board.
        for pair in path.windows(2) {
            assert!(board.adjacent(pair[0]).contains(&pair[1]));
        }
    }

    #[test]
    fn test_wrapped_inputs_collapse_to_canonical_squares() {
        let board = standard_board();

        // x past the circumference names the same square as x mod 32;
        // the returned path only holds canonical coordinates.
        assert_eq!(
            distance(&board, Coord::new(38, 7), Coord::new(6, 6), &WALK),
            Some(1)
        );
        let path = shortest_path(&board, Coord::new(38, 7), Coord::new(6, 6), &WALK).unwrap();
        assert_eq!(path[0], Coord::new(6, 7));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let board = standard_board();
        let pairs = [
            (Coord::new(6, 7), Coord::new(22, 7)),
            (Coord::new(0, 0), Coord::new(17, 5)),
            (Coord::new(3, 4), Coord::new(28, 6)),
        ];

        for (a, b) in pairs {
            assert_eq!(
                distance(&board, a, b, &WALK),
                distance(&board, b, a, &WALK)
            );
        }
    }

    #[test]
    fn test_knight_only_search() {
        let board = standard_board();

        assert_eq!(
            distance(&board, Coord::new(0, 0), Coord::new(2, 1), &[MovementKind::Knight]),
            Some(1)
        );
    }

    #[test]
    fn test_line_only_matches_manhattan_inside_an_arm() {
        let board = standard_board();

        assert_eq!(
            distance(&board, Coord::new(2, 7), Coord::new(5, 4), &[MovementKind::Line]),
            Some(6)
        );
        assert_eq!(
            distance(&board, Coord::new(2, 7), Coord::new(5, 4), &WALK),
            Some(3)
        );
    }

    #[test]
    fn test_off_board_goal_is_unreachable() {
        let board = standard_board();

        assert!(shortest_path(&board, Coord::new(0, 0), Coord::new(0, 9), &WALK).is_none());
    }
}
