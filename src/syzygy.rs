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

use std::{
    env, fmt,
    hash::{Hash as _, Hasher as _},
    io,
    path::Path,
};

use arrayvec::ArrayVec;
use rustc_hash::FxHasher;
use shakmaty::{Chess, Move, Position as _};
use shakmaty_syzygy::Tablebase as Tables;
use tracing::{debug, info};

use crate::{
    engine::{ProbeEngine, RawResults, RawRootMove, RawRootMoves, RESULT_FAILED},
    errors::{EngineError, EngineResult, InitError},
    moves::CompactMove,
    position::PositionDescriptor,
    ranking,
    result::ProbeResult,
    types::{Outcome, MAX_MOVES},
};

/// A [`ProbeEngine`] reading Syzygy tables with `shakmaty-syzygy`.
///
/// Tables are opened lazily on first probe. All probes take `&self` and may
/// run concurrently.
pub struct SyzygyEngine {
    tables: Tables<Chess>,
}

impl Default for SyzygyEngine {
    fn default() -> SyzygyEngine {
        SyzygyEngine::new()
    }
}

impl fmt::Debug for SyzygyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyzygyEngine")
            .field("max_pieces", &self.tables.max_pieces())
            .finish_non_exhaustive()
    }
}

impl SyzygyEngine {
    /// Creates an engine without any tables.
    pub fn new() -> SyzygyEngine {
        SyzygyEngine {
            tables: Tables::new(),
        }
    }

    /// Creates an engine that memory maps table files.
    ///
    /// # Safety
    ///
    /// Table files must not be modified or truncated while the engine is
    /// alive.
    #[cfg(feature = "mmap")]
    pub unsafe fn with_mmap_filesystem() -> SyzygyEngine {
        SyzygyEngine {
            tables: unsafe { Tables::with_mmap_filesystem() },
        }
    }

    /// Adds all tables in a directory. Returns the number of tables added.
    ///
    /// # Errors
    ///
    /// Errors if the directory cannot be listed.
    pub fn add_directory<P: AsRef<Path>>(&mut self, path: P) -> io::Result<usize> {
        self.tables.add_directory(path)
    }

    /// Adds all tables in each directory of a search path, separated like
    /// `PATH` on the current platform. Empty components and `<empty>` are
    /// skipped. Returns the total number of tables added.
    ///
    /// # Errors
    ///
    /// Stops at the first directory that cannot be listed.
    pub fn add_path(&mut self, path: &str) -> Result<usize, InitError> {
        let mut total = 0;
        for dir in env::split_paths(path) {
            if dir.as_os_str().is_empty() || dir == Path::new("<empty>") {
                continue;
            }
            let added = self
                .add_directory(&dir)
                .map_err(|error| InitError::Read {
                    path: dir.clone(),
                    error,
                })?;
            info!(path = %dir.display(), tables = added, "added tablebase directory");
            total += added;
        }
        Ok(total)
    }

    fn position(&self, desc: &PositionDescriptor) -> EngineResult<Chess> {
        if !desc.castling.is_empty() {
            return Err(EngineError::Castling);
        }
        Ok(desc.to_chess()?)
    }

    fn wdl_after_zeroing(&self, pos: &Chess) -> EngineResult<Outcome> {
        Ok(Outcome::from(self.tables.probe_wdl_after_zeroing(pos)?))
    }

    fn dtz(&self, pos: &Chess) -> EngineResult<i32> {
        Ok(self.tables.probe_dtz(pos)?.ignore_rounding().0)
    }

    /// DTZ of the root after a move, counted from the root.
    fn dtz_after(&self, after: &Chess, zeroing: bool) -> EngineResult<i32> {
        if after.is_checkmate() {
            return Ok(1);
        }
        if zeroing {
            Ok(ranking::dtz_before_zeroing(-self.wdl_after_zeroing(after)?))
        } else {
            Ok(ranking::dtz_before_move(self.dtz(after)?))
        }
    }

    fn try_probe_wdl(&self, desc: &PositionDescriptor) -> EngineResult<ProbeResult> {
        if desc.rule50 != 0 {
            return Err(EngineError::HalfmoveClock {
                halfmoves: desc.rule50,
            });
        }
        let pos = self.position(desc)?;
        Ok(ProbeResult::from_outcome(self.wdl_after_zeroing(&pos)?))
    }

    fn try_probe_root(
        &self,
        desc: &PositionDescriptor,
        results: Option<&mut RawResults>,
    ) -> EngineResult<ProbeResult> {
        let pos = self.position(desc)?;
        let moves = pos.legal_moves();

        let mut scored: ArrayVec<(&Move, i32), MAX_MOVES> = ArrayVec::new();
        let dtz = if moves.is_empty() {
            0
        } else {
            let dtz = self.dtz(&pos)?;
            for m in &moves {
                let mut after = pos.clone();
                after.play_unchecked(m);
                scored.push((m, self.dtz_after(&after, m.is_zeroing())?));
            }
            dtz
        };

        if let Some(results) = results {
            results.clear();
            for &(m, v) in &scored {
                results.push(root_result(desc.rule50, m, v)?.bits());
            }
            let _ = results.try_push(RESULT_FAILED);
        }

        if moves.is_empty() {
            return Ok(if pos.is_checkmate() {
                ProbeResult::CHECKMATE
            } else {
                ProbeResult::STALEMATE
            });
        }

        let values: ArrayVec<i32, MAX_MOVES> = scored.iter().map(|&(_, v)| v).collect();
        let mut hasher = FxHasher::default();
        desc.hash(&mut hasher);
        let &(m, _) = select_best(dtz, &values, hasher.finish())
            .and_then(|i| scored.get(i))
            .ok_or(EngineError::NoBestMove)?;
        root_result(desc.rule50, m, dtz)
    }

    fn try_probe_root_dtz(
        &self,
        desc: &PositionDescriptor,
        has_repeated: bool,
        use_rule50: bool,
        out: &mut RawRootMoves,
    ) -> EngineResult<()> {
        let pos = self.position(desc)?;
        out.clear();
        for m in &pos.legal_moves() {
            let mut after = pos.clone();
            after.play_unchecked(m);
            let v = self.dtz_after(&after, m.is_zeroing())?;
            let rank = ranking::dtz_rank(v, desc.rule50, has_repeated);
            out.push(root_move(m, rank, ranking::dtz_score(rank, use_rule50))?);
        }
        ranking::sort_by_rank(out, |m| m.rank);
        Ok(())
    }

    fn try_probe_root_wdl(
        &self,
        desc: &PositionDescriptor,
        use_rule50: bool,
        out: &mut RawRootMoves,
    ) -> EngineResult<()> {
        let pos = self.position(desc)?;
        out.clear();
        for m in &pos.legal_moves() {
            let mut after = pos.clone();
            after.play_unchecked(m);
            let outcome = ranking::wdl_outcome(-self.wdl_after_zeroing(&after)?, use_rule50);
            out.push(root_move(m, ranking::wdl_rank(outcome), ranking::wdl_score(outcome))?);
        }
        ranking::sort_by_rank(out, |m| m.rank);
        Ok(())
    }
}

/// Index of the move to suggest at the root, given the DTZ of the root and
/// the DTZ from the root of each move.
///
/// Takes the fastest win or the slowest loss. In a drawn root, `seed` picks
/// one of the drawing moves.
fn select_best(dtz: i32, values: &[i32], seed: u64) -> Option<usize> {
    let candidates = values.iter().copied().enumerate();
    if dtz > 0 {
        candidates
            .filter(|&(_, v)| v > 0)
            .min_by_key(|&(_, v)| v)
            .map(|(i, _)| i)
    } else if dtz < 0 {
        candidates
            .filter(|&(_, v)| v < 0)
            .min_by_key(|&(_, v)| v)
            .map(|(i, _)| i)
    } else {
        let draws = values.iter().filter(|&&v| v == 0).count() as u64;
        if draws == 0 {
            return None;
        }
        candidates
            .filter(|&(_, v)| v == 0)
            .nth((seed % draws) as usize)
            .map(|(i, _)| i)
    }
}

/// Result for a move with the given DTZ from the root.
fn root_result(rule50: u32, m: &Move, dtz: i32) -> EngineResult<ProbeResult> {
    let compact = CompactMove::from_move(m).ok_or(EngineError::UnsupportedMove)?;
    Ok(ProbeResult::from_outcome(ranking::dtz_to_outcome(rule50, dtz))
        .with_from(compact.from())
        .with_to(compact.to())
        .with_promotion(compact.promotion())
        .with_ep(m.is_en_passant())
        .with_dtz(dtz.unsigned_abs()))
}

fn root_move(m: &Move, rank: i32, score: i32) -> EngineResult<RawRootMove> {
    let mv = CompactMove::from_move(m)
        .ok_or(EngineError::UnsupportedMove)?
        .bits();
    Ok(RawRootMove {
        mv,
        pv: vec![mv],
        score,
        rank,
    })
}

impl ProbeEngine for SyzygyEngine {
    fn max_pieces(&self) -> usize {
        self.tables.max_pieces()
    }

    fn probe_wdl(&self, pos: &PositionDescriptor) -> u32 {
        match self.try_probe_wdl(pos) {
            Ok(res) => res.bits(),
            Err(error) => {
                debug!(%error, "wdl probe failed");
                RESULT_FAILED
            }
        }
    }

    fn probe_root(&self, pos: &PositionDescriptor, results: Option<&mut RawResults>) -> u32 {
        match self.try_probe_root(pos, results) {
            Ok(res) => res.bits(),
            Err(error) => {
                debug!(%error, "root probe failed");
                RESULT_FAILED
            }
        }
    }

    fn probe_root_dtz(
        &self,
        pos: &PositionDescriptor,
        has_repeated: bool,
        use_rule50: bool,
        moves: &mut RawRootMoves,
    ) -> bool {
        match self.try_probe_root_dtz(pos, has_repeated, use_rule50, moves) {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "dtz root ranking failed");
                false
            }
        }
    }

    fn probe_root_wdl(
        &self,
        pos: &PositionDescriptor,
        use_rule50: bool,
        moves: &mut RawRootMoves,
    ) -> bool {
        match self.try_probe_root_wdl(pos, use_rule50, moves) {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "wdl root ranking failed");
                false
            }
        }
    }
}
