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

use std::fmt;

use shakmaty::{Move, Square};

use crate::{errors::InvalidBits, types::Promotion};

const TO_MASK: u16 = 0x003f;
const FROM_SHIFT: u16 = 6;
const PROMOTION_SHIFT: u16 = 12;

/// A move packed into 16 bits: target square in bits 0-5, origin square in
/// bits 6-11 and [`Promotion`] in bits 12-15.
///
/// Only produced by the tablebase. Callers can read it, but not build one
/// from fields.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct CompactMove(u16);

impl CompactMove {
    pub(crate) const fn new(from: Square, to: Square, promotion: Promotion) -> CompactMove {
        CompactMove(
            (to as u16) | ((from as u16) << FROM_SHIFT) | ((promotion as u16) << PROMOTION_SHIFT),
        )
    }

    /// Packs a legal move. Castling is encoded king to rook, drops are not
    /// supported (no origin square) and yield `None`.
    pub(crate) fn from_move(m: &Move) -> Option<CompactMove> {
        Some(CompactMove::new(
            m.from()?,
            m.to(),
            Promotion::from_role(m.promotion()),
        ))
    }

    /// Raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn from(self) -> Square {
        Square::ALL[((self.0 >> FROM_SHIFT) & TO_MASK) as usize]
    }

    pub const fn to(self) -> Square {
        Square::ALL[(self.0 & TO_MASK) as usize]
    }

    pub const fn promotion(self) -> Promotion {
        match Promotion::from_bits((self.0 >> PROMOTION_SHIFT) as u32) {
            Some(promotion) => promotion,
            None => Promotion::None,
        }
    }
}

impl TryFrom<u16> for CompactMove {
    type Error = InvalidBits;

    /// Validates a raw move as produced by a probe engine.
    fn try_from(bits: u16) -> Result<CompactMove, InvalidBits> {
        if u32::from(bits >> PROMOTION_SHIFT) <= Promotion::MAX {
            Ok(CompactMove(bits))
        } else {
            Err(InvalidBits {
                bits: u32::from(bits),
            })
        }
    }
}

impl From<CompactMove> for u16 {
    #[inline]
    fn from(m: CompactMove) -> u16 {
        m.0
    }
}

impl fmt::Display for CompactMove {
    /// Formats the move in UCI notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        match self.promotion().role() {
            Some(role) => write!(f, "{}", role.char()),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for CompactMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactMove({self})")
    }
}
