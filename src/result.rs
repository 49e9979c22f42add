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

//! The packed probe result.
//!
//! ```text
//! 31        20 19 18  16 15    10 9      4 3      0
//! +-----------+--+------+--------+--------+--------+
//! |    dtz    |ep| prom |  from  |   to   |outcome |
//! +-----------+--+------+--------+--------+--------+
//! ```

use std::fmt;

use shakmaty::Square;

use crate::{
    errors::InvalidBits,
    types::{Outcome, Promotion},
};

const OUTCOME_MASK: u32 = 0x0000_000f;
const OUTCOME_SHIFT: u32 = 0;
const TO_MASK: u32 = 0x0000_03f0;
const TO_SHIFT: u32 = 4;
const FROM_MASK: u32 = 0x0000_fc00;
const FROM_SHIFT: u32 = 10;
const PROMOTION_MASK: u32 = 0x0007_0000;
const PROMOTION_SHIFT: u32 = 16;
const EP_MASK: u32 = 0x0008_0000;
const EP_SHIFT: u32 = 19;
const DTZ_MASK: u32 = 0xfff0_0000;
const DTZ_SHIFT: u32 = 20;

/// Result of a tablebase probe, packed into a single `u32`.
///
/// Two results are equal if and only if their raw bits are equal, so a
/// result can be compared against [`ProbeResult::WIN`],
/// [`ProbeResult::DRAW`], [`ProbeResult::LOSS`] and
/// [`ProbeResult::FAILURE`] without decoding.
///
/// Results of [`Tablebase::probe_wdl()`](crate::Tablebase::probe_wdl) carry
/// only an outcome. The move, en passant and DTZ fields are meaningful only
/// for results of
/// [`Tablebase::probe_root()`](crate::Tablebase::probe_root).
///
/// # Examples
///
/// ```
/// use shakmaty::Square;
/// use syzygy_probe::{Outcome, Promotion, ProbeResult};
///
/// let res = ProbeResult::DRAW
///     .with_outcome(Outcome::Win)
///     .with_from(Square::E7)
///     .with_to(Square::E8)
///     .with_promotion(Promotion::Queen)
///     .with_dtz(3);
///
/// assert_eq!(res.outcome(), Some(Outcome::Win));
/// assert_eq!(res.from(), Square::E7);
/// assert_eq!(res.to(), Square::E8);
/// assert_eq!(res.promotion(), Promotion::Queen);
/// assert!(!res.is_en_passant());
/// assert_eq!(res.dtz(), 3);
/// assert_ne!(res, ProbeResult::WIN);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProbeResult(u32);

impl ProbeResult {
    /// Largest distance to zero that fits in the result.
    pub const MAX_DTZ: u32 = DTZ_MASK >> DTZ_SHIFT;

    /// Reserved bit pattern of a failed probe. It is never produced by
    /// combining valid fields, because its outcome field is out of range.
    pub const FAILURE: ProbeResult = ProbeResult(0xffff_ffff);

    pub const WIN: ProbeResult = ProbeResult::from_outcome(Outcome::Win);
    pub const DRAW: ProbeResult = ProbeResult::from_outcome(Outcome::Draw);
    pub const LOSS: ProbeResult = ProbeResult::from_outcome(Outcome::Loss);

    /// Root probe result when the side to move is checkmated.
    ///
    /// Same bits as [`ProbeResult::WIN`] (a win without a move), as in
    /// Fathom's `TB_RESULT_CHECKMATE`. Compare against this constant rather
    /// than reading the outcome.
    pub const CHECKMATE: ProbeResult = ProbeResult::WIN;

    /// Root probe result when the side to move is stalemated. Same bits as
    /// [`ProbeResult::DRAW`]: a draw without a move.
    pub const STALEMATE: ProbeResult = ProbeResult::DRAW;

    /// A result with the given outcome and all other fields zero.
    pub const fn from_outcome(outcome: Outcome) -> ProbeResult {
        ProbeResult(0).with_outcome(outcome)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Checks if this is the [`ProbeResult::FAILURE`] sentinel.
    pub const fn is_failure(self) -> bool {
        self.0 == ProbeResult::FAILURE.0
    }

    #[inline]
    const fn with_field(self, mask: u32, shift: u32, value: u32) -> ProbeResult {
        ProbeResult((self.0 & !mask) | ((value << shift) & mask))
    }

    #[inline]
    const fn field(self, mask: u32, shift: u32) -> u32 {
        (self.0 & mask) >> shift
    }

    /// Gets the outcome, or `None` for [`ProbeResult::FAILURE`].
    pub const fn outcome(self) -> Option<Outcome> {
        Outcome::from_bits(self.field(OUTCOME_MASK, OUTCOME_SHIFT))
    }

    #[must_use]
    pub const fn with_outcome(self, outcome: Outcome) -> ProbeResult {
        self.with_field(OUTCOME_MASK, OUTCOME_SHIFT, outcome as u32)
    }

    /// Origin square of the suggested move.
    pub const fn from(self) -> Square {
        square(self.field(FROM_MASK, FROM_SHIFT))
    }

    #[must_use]
    pub const fn with_from(self, from: Square) -> ProbeResult {
        self.with_field(FROM_MASK, FROM_SHIFT, from as u32)
    }

    /// Target square of the suggested move.
    pub const fn to(self) -> Square {
        square(self.field(TO_MASK, TO_SHIFT))
    }

    #[must_use]
    pub const fn with_to(self, to: Square) -> ProbeResult {
        self.with_field(TO_MASK, TO_SHIFT, to as u32)
    }

    /// Promotion of the suggested move.
    ///
    /// Values outside the enumeration cannot be constructed, except in the
    /// failure sentinel, which reads as [`Promotion::None`].
    pub const fn promotion(self) -> Promotion {
        match Promotion::from_bits(self.field(PROMOTION_MASK, PROMOTION_SHIFT)) {
            Some(promotion) => promotion,
            None => Promotion::None,
        }
    }

    #[must_use]
    pub const fn with_promotion(self, promotion: Promotion) -> ProbeResult {
        self.with_field(PROMOTION_MASK, PROMOTION_SHIFT, promotion as u32)
    }

    /// Checks if the suggested move is an en passant capture.
    pub const fn is_en_passant(self) -> bool {
        self.field(EP_MASK, EP_SHIFT) != 0
    }

    #[must_use]
    pub const fn with_ep(self, ep: bool) -> ProbeResult {
        self.with_field(EP_MASK, EP_SHIFT, ep as u32)
    }

    /// Distance to zero in plies, as an unsigned magnitude.
    pub const fn dtz(self) -> u32 {
        self.field(DTZ_MASK, DTZ_SHIFT)
    }

    /// Sets the distance to zero, saturating at [`ProbeResult::MAX_DTZ`].
    #[must_use]
    pub const fn with_dtz(self, dtz: u32) -> ProbeResult {
        let dtz = if dtz > ProbeResult::MAX_DTZ {
            ProbeResult::MAX_DTZ
        } else {
            dtz
        };
        self.with_field(DTZ_MASK, DTZ_SHIFT, dtz)
    }
}

const fn square(index: u32) -> Square {
    // Callers pass 6 bit fields.
    Square::ALL[(index & 0x3f) as usize]
}

impl TryFrom<u32> for ProbeResult {
    type Error = InvalidBits;

    /// Validates a raw result as produced by a probe engine.
    fn try_from(bits: u32) -> Result<ProbeResult, InvalidBits> {
        let res = ProbeResult(bits);
        if res.is_failure()
            || (res.outcome().is_some()
                && res.field(PROMOTION_MASK, PROMOTION_SHIFT) <= Promotion::MAX)
        {
            Ok(res)
        } else {
            Err(InvalidBits { bits })
        }
    }
}

impl From<ProbeResult> for u32 {
    #[inline]
    fn from(res: ProbeResult) -> u32 {
        res.0
    }
}

impl fmt::Debug for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_failure() {
            return f.write_str("ProbeResult::FAILURE");
        }
        f.debug_struct("ProbeResult")
            .field("outcome", &self.outcome())
            .field("from", &self.from())
            .field("to", &self.to())
            .field("promotion", &self.promotion())
            .field("ep", &self.is_en_passant())
            .field("dtz", &self.dtz())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(
        outcome: Outcome,
        from: Square,
        to: Square,
        promotion: Promotion,
        ep: bool,
        dtz: u32,
    ) -> ProbeResult {
        ProbeResult::FAILURE
            .with_outcome(outcome)
            .with_from(from)
            .with_to(to)
            .with_promotion(promotion)
            .with_ep(ep)
            .with_dtz(dtz)
    }

    #[test]
    fn test_constants() {
        for (res, outcome) in [
            (ProbeResult::WIN, Outcome::Win),
            (ProbeResult::DRAW, Outcome::Draw),
            (ProbeResult::LOSS, Outcome::Loss),
        ] {
            assert_eq!(res.outcome(), Some(outcome));
            assert_eq!(res.from(), Square::A1);
            assert_eq!(res.to(), Square::A1);
            assert_eq!(res.promotion(), Promotion::None);
            assert!(!res.is_en_passant());
            assert_eq!(res.dtz(), 0);
        }
        assert_eq!(ProbeResult::WIN.bits(), 4);
        assert_eq!(ProbeResult::DRAW.bits(), 2);
        assert_eq!(ProbeResult::LOSS.bits(), 0);
        assert_eq!(ProbeResult::FAILURE.outcome(), None);
    }

    #[test]
    fn test_no_move_constants() {
        assert_eq!(ProbeResult::CHECKMATE.bits(), 4);
        assert_eq!(ProbeResult::STALEMATE.bits(), 2);
        assert_ne!(ProbeResult::CHECKMATE, ProbeResult::FAILURE);
        assert_ne!(ProbeResult::STALEMATE, ProbeResult::FAILURE);
        assert_ne!(ProbeResult::CHECKMATE, ProbeResult::STALEMATE);
    }

    #[test]
    fn test_bit_layout() {
        let res = encode(Outcome::Win, Square::E7, Square::E8, Promotion::Queen, false, 1);
        assert_eq!(
            res.bits(),
            4 | (u32::from(Square::E8) << 4)
                | (u32::from(Square::E7) << 10)
                | (1 << 16)
                | (1 << 20)
        );
    }

    #[test]
    fn test_failure_is_distinct() {
        // All fields at their maximum.
        let res = encode(Outcome::Win, Square::H8, Square::H8, Promotion::Knight, true, 5000);
        assert_eq!(res.outcome(), Some(Outcome::Win));
        assert_eq!(res.dtz(), ProbeResult::MAX_DTZ);
        assert_ne!(res, ProbeResult::FAILURE);
        assert_eq!(ProbeResult::try_from(res.bits()), Ok(res));

        for outcome in Outcome::ALL {
            let res = ProbeResult::FAILURE.with_outcome(outcome);
            assert_eq!(res.outcome(), Some(outcome));
            assert_ne!(res, ProbeResult::FAILURE);
            assert!(!res.is_failure());
        }
    }

    #[test]
    fn test_all_field_combinations() {
        let promotions = [
            Promotion::None,
            Promotion::Queen,
            Promotion::Rook,
            Promotion::Bishop,
            Promotion::Knight,
        ];
        let dtzs = [
            0,
            1,
            2,
            99,
            100,
            101,
            1000,
            2048,
            ProbeResult::MAX_DTZ - 1,
            ProbeResult::MAX_DTZ,
        ];

        for outcome in Outcome::ALL {
            for promotion in promotions {
                for ep in [false, true] {
                    for (i, from) in Square::ALL.into_iter().enumerate() {
                        let to = Square::ALL[(i * 37 + 11) % 64];
                        let dtz = dtzs[i % dtzs.len()];
                        let res = encode(outcome, from, to, promotion, ep, dtz);
                        assert_eq!(res.outcome(), Some(outcome));
                        assert_eq!(res.from(), from);
                        assert_eq!(res.to(), to);
                        assert_eq!(res.promotion(), promotion);
                        assert_eq!(res.is_en_passant(), ep);
                        assert_eq!(res.dtz(), dtz);
                        assert!(!res.is_failure());
                        assert_eq!(ProbeResult::try_from(res.bits()), Ok(res));
                    }
                }
            }
        }
    }

    #[test]
    fn test_setters_are_independent() {
        let res = encode(Outcome::CursedWin, Square::G2, Square::C6, Promotion::Rook, true, 77);
        assert_eq!(res.with_dtz(78).from(), Square::G2);
        assert_eq!(res.with_from(Square::A1).to(), Square::C6);
        assert_eq!(res.with_ep(false).promotion(), Promotion::Rook);
        assert_eq!(res.with_outcome(Outcome::Loss).dtz(), 77);
        assert!(res.with_promotion(Promotion::None).is_en_passant());
    }

    #[test]
    fn test_equality_is_bitwise() {
        let a = ProbeResult::WIN.with_dtz(5);
        let b = ProbeResult::WIN.with_dtz(6);
        assert_ne!(a, b);
        assert_eq!(a.outcome(), b.outcome());
        assert_ne!(a, ProbeResult::WIN);
        assert_eq!(a.with_dtz(0), ProbeResult::WIN);
    }

    #[test]
    fn test_dtz_saturates() {
        assert_eq!(ProbeResult::MAX_DTZ, 4095);
        let res = ProbeResult::LOSS.with_dtz(5000);
        assert_eq!(res.dtz(), ProbeResult::MAX_DTZ);
        assert_eq!(res.outcome(), Some(Outcome::Loss));
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(ProbeResult::try_from(0xffff_ffff), Ok(ProbeResult::FAILURE));
        assert_eq!(ProbeResult::try_from(5), Err(InvalidBits { bits: 5 }));
        assert_eq!(
            ProbeResult::try_from(2 | (5 << 16)),
            Err(InvalidBits { bits: 2 | (5 << 16) })
        );
        assert_eq!(ProbeResult::try_from(2), Ok(ProbeResult::DRAW));
    }
}
