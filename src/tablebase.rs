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

use tracing::{debug, info, warn};

use crate::{
    engine::{ProbeEngine, RawResults, RawRootMove, RawRootMoves, RESULT_FAILED},
    errors::{InitError, InvalidBits},
    moves::CompactMove,
    position::PositionDescriptor,
    result::ProbeResult,
    syzygy::SyzygyEngine,
};

/// A legal move at the root, ranked by a tablebase.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RootMove {
    /// The move.
    pub mv: CompactMove,
    /// Principal variation, starting with [`RootMove::mv`].
    pub pv: Vec<CompactMove>,
    /// Score for display, in centipawns or tablebase win/loss values.
    pub score: i32,
    /// Higher is better. Use it to order or filter root moves.
    pub rank: i32,
}

impl TryFrom<&RawRootMove> for RootMove {
    type Error = InvalidBits;

    fn try_from(raw: &RawRootMove) -> Result<RootMove, InvalidBits> {
        Ok(RootMove {
            mv: CompactMove::try_from(raw.mv)?,
            pv: raw
                .pv
                .iter()
                .map(|&m| CompactMove::try_from(m))
                .collect::<Result<_, _>>()?,
            score: raw.score,
            rank: raw.rank,
        })
    }
}

/// A handle to opened Syzygy tablebases.
///
/// Dropping the handle (or calling [`Tablebase::uninitialize()`]) releases
/// all tables.
///
/// # Example
///
/// ```no_run
/// use shakmaty::{fen::Fen, CastlingMode, Chess};
/// use syzygy_probe::{Outcome, PositionDescriptor, Tablebase};
///
/// let tables = Tablebase::initialize("/opt/syzygy/regular:/opt/syzygy/pawnful")?;
///
/// let pos: Chess = "8/8/8/5N2/8/p7/8/2NK3k w - - 0 1"
///     .parse::<Fen>()?
///     .into_position(CastlingMode::Standard)?;
///
/// let res = tables.probe_wdl(&PositionDescriptor::from_position(&pos));
/// assert_eq!(res.outcome(), Some(Outcome::Win));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Tablebase<E = SyzygyEngine> {
    engine: E,
}

impl Tablebase<SyzygyEngine> {
    /// Opens all tables found in a search path.
    ///
    /// Directories are separated like `PATH` on the current platform (`:` on
    /// Unix, `;` on Windows). An empty path, or the path `<empty>`, is
    /// valid and opens no tables.
    ///
    /// # Errors
    ///
    /// Errors if a directory of the search path cannot be listed.
    pub fn initialize(path: &str) -> Result<Tablebase, InitError> {
        let mut engine = SyzygyEngine::new();
        let tables = engine.add_path(path)?;
        info!(tables, max_pieces = engine.max_pieces(), "tablebase initialized");
        Ok(Tablebase { engine })
    }

    /// Like [`Tablebase::initialize()`], but memory maps table files.
    ///
    /// # Safety
    ///
    /// Table files must not be modified or truncated while the handle is
    /// alive.
    ///
    /// # Errors
    ///
    /// Errors if a directory of the search path cannot be listed.
    #[cfg(feature = "mmap")]
    pub unsafe fn initialize_mmap(path: &str) -> Result<Tablebase, InitError> {
        let mut engine = unsafe { SyzygyEngine::with_mmap_filesystem() };
        let tables = engine.add_path(path)?;
        info!(tables, max_pieces = engine.max_pieces(), "tablebase initialized with mmap");
        Ok(Tablebase { engine })
    }
}

impl<E: ProbeEngine> Tablebase<E> {
    /// Uses the given engine to read tables.
    pub fn with_engine(engine: E) -> Tablebase<E> {
        Tablebase { engine }
    }

    /// Releases all tables.
    pub fn uninitialize(self) {
        debug!(max_pieces = self.engine.max_pieces(), "tablebase released");
    }

    /// The engine reading the tables.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Largest number of pieces for which probes can succeed. Positions
    /// with more pieces should not be probed.
    pub fn max_pieces(&self) -> usize {
        self.engine.max_pieces()
    }

    /// Probes the WDL value of a position right after a zeroing move.
    ///
    /// Only the outcome of the result is meaningful. Returns
    /// [`ProbeResult::FAILURE`] if the half-move clock is not zero, if the
    /// position has castling rights, or if a table is missing.
    ///
    /// Safe to call concurrently from many search threads.
    pub fn probe_wdl(&self, pos: &PositionDescriptor) -> ProbeResult {
        validate(self.engine.probe_wdl(pos))
    }

    /// Probes the DTZ value of the root position and suggests a move that
    /// preserves the WDL value.
    ///
    /// If `alternatives` is given, it is replaced with one result for each
    /// legal move: the outcome and DTZ after playing it. It is left empty
    /// if the probe fails, or if there are no legal moves.
    ///
    /// Returns [`ProbeResult::CHECKMATE`] or [`ProbeResult::STALEMATE`]
    /// (with no move) if there are no legal moves.
    pub fn probe_root(
        &self,
        pos: &PositionDescriptor,
        alternatives: Option<&mut Vec<ProbeResult>>,
    ) -> ProbeResult {
        let Some(alternatives) = alternatives else {
            return validate(self.engine.probe_root(pos, None));
        };

        alternatives.clear();
        let mut raw = RawResults::new();
        let res = validate(self.engine.probe_root(pos, Some(&mut raw)));
        if res.is_failure() {
            return res;
        }

        for &bits in raw.iter().take_while(|&&bits| bits != RESULT_FAILED) {
            match ProbeResult::try_from(bits) {
                Ok(alt) => alternatives.push(alt),
                Err(err) => {
                    warn!(%err, "discarding root probe");
                    alternatives.clear();
                    return ProbeResult::FAILURE;
                }
            }
        }
        res
    }

    /// Ranks all legal root moves with DTZ tables, best first.
    ///
    /// Moves that keep a win within the 50-move rule (and without a prior
    /// repetition if `has_repeated`) rank highest. Use `use_rule50 = false`
    /// to score cursed wins as wins.
    ///
    /// `moves` is replaced with the ranked moves. Returns `false` and leaves
    /// `moves` empty if any probe failed.
    pub fn probe_root_dtz(
        &self,
        pos: &PositionDescriptor,
        has_repeated: bool,
        use_rule50: bool,
        moves: &mut Vec<RootMove>,
    ) -> bool {
        let mut raw = RawRootMoves::new();
        let ok = self
            .engine
            .probe_root_dtz(pos, has_repeated, use_rule50, &mut raw);
        transcribe(ok, &raw, moves)
    }

    /// Ranks all legal root moves with WDL tables only, best first. Use
    /// when DTZ tables are not available.
    ///
    /// `moves` is replaced with the ranked moves. Returns `false` and leaves
    /// `moves` empty if any probe failed.
    pub fn probe_root_wdl(
        &self,
        pos: &PositionDescriptor,
        use_rule50: bool,
        moves: &mut Vec<RootMove>,
    ) -> bool {
        let mut raw = RawRootMoves::new();
        let ok = self.engine.probe_root_wdl(pos, use_rule50, &mut raw);
        transcribe(ok, &raw, moves)
    }
}

fn validate(bits: u32) -> ProbeResult {
    ProbeResult::try_from(bits).unwrap_or_else(|err| {
        warn!(%err, "discarding probe result");
        ProbeResult::FAILURE
    })
}

fn transcribe(ok: bool, raw: &[RawRootMove], moves: &mut Vec<RootMove>) -> bool {
    moves.clear();
    if !ok {
        return false;
    }
    match raw.iter().map(RootMove::try_from).collect::<Result<Vec<_>, _>>() {
        Ok(ranked) => {
            *moves = ranked;
            true
        }
        Err(err) => {
            warn!(%err, "discarding root move ranking");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::Square;

    use super::*;
    use crate::types::{Outcome, Promotion};

    /// Replays canned answers.
    #[derive(Debug, Default)]
    struct ScriptedEngine {
        wdl: u32,
        root: u32,
        results: Vec<u32>,
        root_moves: Option<Vec<RawRootMove>>,
    }

    impl ProbeEngine for ScriptedEngine {
        fn max_pieces(&self) -> usize {
            5
        }

        fn probe_wdl(&self, _pos: &PositionDescriptor) -> u32 {
            self.wdl
        }

        fn probe_root(&self, _pos: &PositionDescriptor, results: Option<&mut RawResults>) -> u32 {
            if let Some(results) = results {
                results.clear();
                results.extend(self.results.iter().copied());
            }
            self.root
        }

        fn probe_root_dtz(
            &self,
            _pos: &PositionDescriptor,
            _has_repeated: bool,
            _use_rule50: bool,
            moves: &mut RawRootMoves,
        ) -> bool {
            moves.clear();
            match self.root_moves {
                Some(ref scripted) => {
                    moves.extend(scripted.iter().cloned());
                    true
                }
                None => {
                    // Partially filled, then failed.
                    moves.push(RawRootMove::default());
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
            self.probe_root_dtz(pos, false, use_rule50, moves)
        }
    }

    fn raw_move(from: Square, to: Square) -> u16 {
        CompactMove::new(from, to, Promotion::None).bits()
    }

    fn stale_root_move() -> RootMove {
        RootMove {
            mv: CompactMove::new(Square::A1, Square::A2, Promotion::None),
            pv: Vec::new(),
            score: 1,
            rank: 1,
        }
    }

    #[test]
    fn test_probe_wdl_validates() {
        let pos = PositionDescriptor::default();

        let tables = Tablebase::with_engine(ScriptedEngine {
            wdl: ProbeResult::WIN.bits(),
            ..ScriptedEngine::default()
        });
        assert_eq!(tables.probe_wdl(&pos), ProbeResult::WIN);
        assert_eq!(tables.max_pieces(), 5);
        assert_eq!(tables.engine().wdl, ProbeResult::WIN.bits());

        let tables = Tablebase::with_engine(ScriptedEngine {
            wdl: 7,
            ..ScriptedEngine::default()
        });
        assert_eq!(tables.probe_wdl(&pos), ProbeResult::FAILURE);
    }

    #[test]
    fn test_probe_root_alternatives() {
        let best = ProbeResult::from_outcome(Outcome::Win)
            .with_from(Square::E7)
            .with_to(Square::E8)
            .with_promotion(Promotion::Queen)
            .with_dtz(1);
        let other = ProbeResult::from_outcome(Outcome::Draw)
            .with_from(Square::E7)
            .with_to(Square::E8)
            .with_promotion(Promotion::Knight);
        let tables = Tablebase::with_engine(ScriptedEngine {
            root: best.bits(),
            results: vec![best.bits(), other.bits(), RESULT_FAILED, best.bits()],
            ..ScriptedEngine::default()
        });

        let pos = PositionDescriptor::default();
        let mut alternatives = vec![ProbeResult::LOSS; 3];
        assert_eq!(tables.probe_root(&pos, Some(&mut alternatives)), best);
        assert_eq!(alternatives, vec![best, other]);

        assert_eq!(tables.probe_root(&pos, None), best);
    }

    #[test]
    fn test_probe_root_failure_clears() {
        let tables = Tablebase::with_engine(ScriptedEngine {
            root: RESULT_FAILED,
            results: vec![ProbeResult::DRAW.bits(), RESULT_FAILED],
            ..ScriptedEngine::default()
        });

        let mut alternatives = vec![ProbeResult::WIN];
        let res = tables.probe_root(&PositionDescriptor::default(), Some(&mut alternatives));
        assert!(res.is_failure());
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_probe_root_invalid_alternative() {
        let tables = Tablebase::with_engine(ScriptedEngine {
            root: ProbeResult::DRAW.bits(),
            results: vec![ProbeResult::DRAW.bits(), 0x0007_0002, RESULT_FAILED],
            ..ScriptedEngine::default()
        });

        let mut alternatives = Vec::new();
        let res = tables.probe_root(&PositionDescriptor::default(), Some(&mut alternatives));
        assert!(res.is_failure());
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_probe_root_dtz_transcribes() {
        let e2e4 = raw_move(Square::E2, Square::E4);
        let d2d4 = raw_move(Square::D2, Square::D4);
        let tables = Tablebase::with_engine(ScriptedEngine {
            root_moves: Some(vec![
                RawRootMove {
                    mv: e2e4,
                    pv: vec![e2e4, d2d4],
                    score: 31744,
                    rank: 1 << 18,
                },
                RawRootMove {
                    mv: d2d4,
                    pv: vec![d2d4],
                    score: 0,
                    rank: 0,
                },
            ]),
            ..ScriptedEngine::default()
        });

        let mut moves = vec![stale_root_move()];
        assert!(tables.probe_root_dtz(&PositionDescriptor::default(), false, true, &mut moves));
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].mv.to_string(), "e2e4");
        assert_eq!(
            moves[0].pv.iter().map(|m| m.bits()).collect::<Vec<_>>(),
            vec![e2e4, d2d4]
        );
        assert_eq!(moves[0].score, 31744);
        assert_eq!(moves[1].rank, 0);
    }

    #[test]
    fn test_failed_ranking_is_empty() {
        let tables = Tablebase::with_engine(ScriptedEngine::default());
        let pos = PositionDescriptor::default();

        let mut moves = vec![stale_root_move()];
        assert!(!tables.probe_root_dtz(&pos, false, true, &mut moves));
        assert!(moves.is_empty());

        let mut moves = vec![stale_root_move()];
        assert!(!tables.probe_root_wdl(&pos, true, &mut moves));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_invalid_ranking_is_empty() {
        let tables = Tablebase::with_engine(ScriptedEngine {
            root_moves: Some(vec![RawRootMove {
                mv: raw_move(Square::A1, Square::A2),
                pv: vec![0xf000],
                score: 0,
                rank: 0,
            }]),
            ..ScriptedEngine::default()
        });

        let mut moves = vec![stale_root_move()];
        assert!(!tables.probe_root_wdl(&PositionDescriptor::default(), false, &mut moves));
        assert!(moves.is_empty());
    }
}
