// This file is part of the syzygy-probe library.
// Copyright (C) 2026 The syzygy-probe developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Ranks and scores of root moves.
//!
//! A DTZ value here is counted in plies from the root position: positive if
//! the side to move at the root wins, negative if it loses, `0` for draws.
//! Values beyond 100 (in absolute terms) are decided only when ignoring the
//! 50-move rule.

use std::cmp::{max, min, Reverse};

use crate::types::Outcome;

/// Rank of a win that is certain to be achieved within the 50-move rule.
pub const MAX_DTZ: i32 = 1 << 18;

/// Score of a pawn.
pub const VALUE_PAWN: i32 = 100;

/// Score of a mate at the root.
pub const VALUE_MATE: i32 = 32000;

/// Plies reserved for mate scores found by the search.
pub const MAX_MATE_PLY: i32 = 255;

pub const VALUE_DRAW: i32 = 0;

/// Score of a tablebase win, just below any mate score.
pub const VALUE_TB_WIN: i32 = VALUE_MATE - MAX_MATE_PLY - 1;

/// DTZ of a zeroing move that leads to a position with the given outcome
/// for the side that made the move.
pub const fn dtz_before_zeroing(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Loss => -1,
        Outcome::BlessedLoss => -101,
        Outcome::Draw => 0,
        Outcome::CursedWin => 101,
        Outcome::Win => 1,
    }
}

/// Outcome of a DTZ value when `rule50` half-moves have already been played
/// since the last zeroing move.
pub const fn dtz_to_outcome(rule50: u32, dtz: i32) -> Outcome {
    let rule50 = rule50 as i64;
    let dtz = dtz as i64;
    if dtz > 0 {
        if dtz + rule50 <= 100 {
            Outcome::Win
        } else {
            Outcome::CursedWin
        }
    } else if dtz < 0 {
        if -dtz + rule50 <= 100 {
            Outcome::Loss
        } else {
            Outcome::BlessedLoss
        }
    } else {
        Outcome::Draw
    }
}

/// Ranks a root move by its DTZ.
///
/// Wins that are reached within the 50-move rule rank [`MAX_DTZ`], unless
/// the position already repeated. Slower wins rank lower the more plies
/// they need, but always above draws. Losses are ranked `-MAX_DTZ`, unless
/// a 50-move draw is in sight, and always below draws.
pub const fn dtz_rank(dtz: i32, rule50: u32, has_repeated: bool) -> i32 {
    let cnt50 = rule50 as i64;
    let dtz = dtz as i64;
    let max = MAX_DTZ as i64;
    let rank = if dtz > 0 {
        if dtz + cnt50 <= 99 && !has_repeated {
            max
        } else {
            clamp(max - (dtz + cnt50), 1, max)
        }
    } else if dtz < 0 {
        if -dtz * 2 + cnt50 < 100 {
            -max
        } else {
            clamp(-max + (-dtz + cnt50), -max, -1)
        }
    } else {
        0
    };
    rank as i32
}

const fn clamp(v: i64, min: i64, max: i64) -> i64 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// DTZ from the root of a move that does not zero the half-move clock,
/// given the DTZ of the position after it (from the opponent's point of
/// view).
pub const fn dtz_before_move(dtz_after: i32) -> i32 {
    let v = dtz_after.saturating_neg();
    v.saturating_add(v.signum())
}

/// Score to display for a rank from [`dtz_rank()`].
///
/// With the 50-move rule, ranks of at least `MAX_DTZ - 100` are certain
/// wins. Cursed wins get at least 3 centipawns, growing as the position gets
/// closer to a real win. Without the 50-move rule, every positive rank is a
/// win.
pub fn dtz_score(rank: i32, use_rule50: bool) -> i32 {
    let bound = if use_rule50 { MAX_DTZ - 100 } else { 1 };
    if rank >= bound {
        VALUE_TB_WIN
    } else if rank > 0 {
        max(3, rank - (MAX_DTZ - 200)) * VALUE_PAWN / 200
    } else if rank == 0 {
        VALUE_DRAW
    } else if rank > -bound {
        min(-3, rank + (MAX_DTZ - 200)) * VALUE_PAWN / 200
    } else {
        -VALUE_TB_WIN
    }
}

/// Without the 50-move rule, cursed wins and blessed losses are real.
pub const fn wdl_outcome(outcome: Outcome, use_rule50: bool) -> Outcome {
    if use_rule50 {
        return outcome;
    }
    match outcome {
        Outcome::Loss | Outcome::BlessedLoss => Outcome::Loss,
        Outcome::Draw => Outcome::Draw,
        Outcome::CursedWin | Outcome::Win => Outcome::Win,
    }
}

/// Ranks a root move by the outcome after playing it.
pub const fn wdl_rank(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Loss => -MAX_DTZ,
        Outcome::BlessedLoss => -MAX_DTZ + 101,
        Outcome::Draw => 0,
        Outcome::CursedWin => MAX_DTZ - 101,
        Outcome::Win => MAX_DTZ,
    }
}

pub const fn wdl_score(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Loss => -VALUE_TB_WIN,
        Outcome::BlessedLoss => VALUE_DRAW - 2,
        Outcome::Draw => VALUE_DRAW,
        Outcome::CursedWin => VALUE_DRAW + 2,
        Outcome::Win => VALUE_TB_WIN,
    }
}

/// Orders root moves from best to worst rank. Moves with equal rank keep
/// their relative order.
pub fn sort_by_rank<T, F>(moves: &mut [T], mut rank: F)
where
    F: FnMut(&T) -> i32,
{
    moves.sort_by_key(|m| Reverse(rank(m)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtz_to_outcome() {
        assert_eq!(dtz_to_outcome(0, 0), Outcome::Draw);
        assert_eq!(dtz_to_outcome(0, 1), Outcome::Win);
        assert_eq!(dtz_to_outcome(0, 100), Outcome::Win);
        assert_eq!(dtz_to_outcome(0, 101), Outcome::CursedWin);
        assert_eq!(dtz_to_outcome(50, 51), Outcome::CursedWin);
        assert_eq!(dtz_to_outcome(0, -1), Outcome::Loss);
        assert_eq!(dtz_to_outcome(0, -101), Outcome::BlessedLoss);
        assert_eq!(dtz_to_outcome(99, -2), Outcome::BlessedLoss);
    }

    #[test]
    fn test_dtz_before_zeroing() {
        for outcome in Outcome::ALL {
            assert_eq!(dtz_to_outcome(0, dtz_before_zeroing(outcome)), outcome);
        }
    }

    #[test]
    fn test_dtz_rank() {
        assert_eq!(dtz_rank(0, 0, false), 0);
        assert_eq!(dtz_rank(1, 0, false), MAX_DTZ);
        assert_eq!(dtz_rank(99, 0, false), MAX_DTZ);
        assert_eq!(dtz_rank(5, 0, true), MAX_DTZ - 5);
        assert_eq!(dtz_rank(101, 0, false), MAX_DTZ - 101);
        assert_eq!(dtz_rank(40, 60, false), MAX_DTZ - 100);
        assert_eq!(dtz_rank(-1, 0, false), -MAX_DTZ);
        assert_eq!(dtz_rank(-49, 0, false), -MAX_DTZ);
        assert_eq!(dtz_rank(-50, 0, false), -MAX_DTZ + 50);
        assert_eq!(dtz_rank(-10, 90, false), -MAX_DTZ + 100);
    }

    #[test]
    fn test_dtz_rank_huge_clock() {
        assert_eq!(dtz_rank(1, u32::MAX, false), 1);
        assert_eq!(dtz_rank(1, i32::MAX as u32, false), 1);
        assert_eq!(dtz_rank(1, 3_000_000_000, true), 1);
        assert_eq!(dtz_rank(-1, u32::MAX, false), -1);
        assert_eq!(dtz_rank(-4000, i32::MAX as u32, false), -1);
        assert_eq!(dtz_rank(i32::MAX, u32::MAX, false), 1);
        assert_eq!(dtz_rank(i32::MIN + 1, 0, false), -1);
        assert!(dtz_score(dtz_rank(1, u32::MAX, false), true) > 0);
        assert!(dtz_score(dtz_rank(-1, u32::MAX, false), true) < 0);
    }

    #[test]
    fn test_dtz_before_move() {
        // Opponent is lost in 5 plies, so the root wins in 6.
        assert_eq!(dtz_before_move(-5), 6);
        // Opponent wins in 3 plies, so the root loses in 4.
        assert_eq!(dtz_before_move(3), -4);
        assert_eq!(dtz_before_move(-101), 102);
        assert_eq!(dtz_before_move(0), 0);
        assert_eq!(dtz_to_outcome(0, dtz_before_move(-99)), Outcome::Win);
        assert_eq!(dtz_to_outcome(0, dtz_before_move(-100)), Outcome::CursedWin);
    }

    #[test]
    fn test_dtz_before_zeroing_after_capture() {
        // A capture into a lost position wins at once.
        assert_eq!(dtz_before_zeroing(-Outcome::Loss), 1);
        assert_eq!(dtz_before_zeroing(-Outcome::BlessedLoss), 101);
        assert_eq!(dtz_before_zeroing(-Outcome::Win), -1);
        assert_eq!(dtz_before_zeroing(-Outcome::CursedWin), -101);
    }

    #[test]
    fn test_dtz_score() {
        assert_eq!(dtz_score(MAX_DTZ, true), VALUE_TB_WIN);
        assert_eq!(dtz_score(MAX_DTZ - 100, true), VALUE_TB_WIN);
        assert_eq!(dtz_score(MAX_DTZ - 101, true), 49);
        assert_eq!(dtz_score(MAX_DTZ - 199, true), 1);
        assert_eq!(dtz_score(MAX_DTZ - 300, true), 1);
        assert_eq!(dtz_score(0, true), VALUE_DRAW);
        assert_eq!(dtz_score(-MAX_DTZ + 101, true), -49);
        assert_eq!(dtz_score(-MAX_DTZ, true), -VALUE_TB_WIN);

        assert_eq!(dtz_score(MAX_DTZ - 101, false), VALUE_TB_WIN);
        assert_eq!(dtz_score(-MAX_DTZ + 101, false), -VALUE_TB_WIN);
    }

    #[test]
    fn test_cursed_scores_stay_small() {
        for rank in 1..(MAX_DTZ - 100) {
            let score = dtz_score(rank, true);
            assert!((0..50).contains(&score), "rank {rank} score {score}");
            assert!(dtz_score(-rank, true) <= 0);
        }
    }

    #[test]
    fn test_wdl_tables() {
        assert_eq!(wdl_rank(Outcome::Win), MAX_DTZ);
        assert_eq!(wdl_rank(Outcome::CursedWin), MAX_DTZ - 101);
        assert_eq!(wdl_score(Outcome::Loss), -31744);
        assert_eq!(wdl_score(Outcome::BlessedLoss), -2);
        assert_eq!(wdl_outcome(Outcome::CursedWin, false), Outcome::Win);
        assert_eq!(wdl_outcome(Outcome::BlessedLoss, false), Outcome::Loss);
        assert_eq!(wdl_outcome(Outcome::CursedWin, true), Outcome::CursedWin);
        for outcome in Outcome::ALL {
            assert_eq!(wdl_rank(-outcome), -wdl_rank(outcome));
            assert_eq!(wdl_score(-outcome), -wdl_score(outcome));
        }
    }

    #[test]
    fn test_sort_by_rank_is_stable() {
        let mut moves = [(0, 'a'), (5, 'b'), (0, 'c'), (MAX_DTZ, 'd'), (5, 'e')];
        sort_by_rank(&mut moves, |&(rank, _)| rank);
        let order: String = moves.iter().map(|&(_, name)| name).collect();
        assert_eq!(order, "dbeac");
    }
}
