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

//! The interface of a table reading engine.
//!
//! Engines exchange raw integers: `u32` packed results (see
//! [`ProbeResult`](crate::ProbeResult) for the layout) and `u16` packed
//! moves (see [`CompactMove`](crate::CompactMove)). The
//! [`Tablebase`](crate::Tablebase) validates and decodes them.

use arrayvec::ArrayVec;

use crate::{position::PositionDescriptor, types::MAX_MOVES};

/// Raw bits of [`ProbeResult::FAILURE`](crate::ProbeResult::FAILURE).
pub const RESULT_FAILED: u32 = 0xffff_ffff;

/// One raw result per legal move, terminated by [`RESULT_FAILED`] if
/// shorter than the capacity.
pub type RawResults = ArrayVec<u32, MAX_MOVES>;

/// A root move in the engine's native representation.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct RawRootMove {
    pub mv: u16,
    /// Principal variation, starting with `mv`.
    pub pv: Vec<u16>,
    pub score: i32,
    pub rank: i32,
}

pub type RawRootMoves = ArrayVec<RawRootMove, MAX_MOVES>;

/// A table reading engine.
///
/// [`ProbeEngine::probe_wdl()`] must be safe to call from many threads at
/// once. The root probes are called at most once per search, before parallel
/// search starts.
pub trait ProbeEngine: Send + Sync {
    /// Largest number of pieces for which probes can succeed.
    fn max_pieces(&self) -> usize;

    /// Probes the WDL value of a position. Returns a raw result with only
    /// the outcome set, or [`RESULT_FAILED`].
    fn probe_wdl(&self, pos: &PositionDescriptor) -> u32;

    /// Probes the DTZ value of the root position and suggests a move that
    /// preserves the WDL value.
    ///
    /// If `results` is given, it is filled with one raw result per legal
    /// move followed by a [`RESULT_FAILED`] terminator.
    fn probe_root(&self, pos: &PositionDescriptor, results: Option<&mut RawResults>) -> u32;

    /// Ranks all legal root moves with DTZ tables. Returns `false` if any
    /// probe failed, in which case the contents of `moves` are unspecified.
    fn probe_root_dtz(
        &self,
        pos: &PositionDescriptor,
        has_repeated: bool,
        use_rule50: bool,
        moves: &mut RawRootMoves,
    ) -> bool;

    /// Ranks all legal root moves with WDL tables only. Returns `false` if
    /// any probe failed, in which case the contents of `moves` are
    /// unspecified.
    fn probe_root_wdl(
        &self,
        pos: &PositionDescriptor,
        use_rule50: bool,
        moves: &mut RawRootMoves,
    ) -> bool;
}
