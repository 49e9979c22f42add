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

use std::{fmt, ops::Neg};

use shakmaty::Role;
use shakmaty_syzygy::Wdl;

/// Maximum number of legal moves in any position, rounded up. Bounds the
/// raw buffers exchanged with a [`ProbeEngine`](crate::ProbeEngine).
pub const MAX_MOVES: usize = 256;

/// Outcome of a position under optimal play, from the point of view of the
/// side to move.
///
/// The discriminants are the values stored in the outcome field of a
/// [`ProbeResult`](crate::ProbeResult).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum Outcome {
    /// Unconditional loss.
    Loss = 0,
    /// Loss that can be saved by the 50-move rule.
    BlessedLoss = 1,
    /// Unconditional draw.
    Draw = 2,
    /// Win that is spoiled by the 50-move rule.
    CursedWin = 3,
    /// Unconditional win.
    Win = 4,
}

impl Outcome {
    /// All outcomes, from worst to best.
    pub const ALL: [Outcome; 5] = [
        Outcome::Loss,
        Outcome::BlessedLoss,
        Outcome::Draw,
        Outcome::CursedWin,
        Outcome::Win,
    ];

    /// Gets the outcome with the given field value, or `None` if it is out
    /// of range.
    pub const fn from_bits(bits: u32) -> Option<Outcome> {
        Some(match bits {
            0 => Outcome::Loss,
            1 => Outcome::BlessedLoss,
            2 => Outcome::Draw,
            3 => Outcome::CursedWin,
            4 => Outcome::Win,
            _ => return None,
        })
    }

    /// The outcome as a signed value in `-2..=2`, with `0` for draws.
    pub const fn signum_value(self) -> i32 {
        self as i32 - 2
    }

    pub(crate) const fn from_signum_value(v: i32) -> Outcome {
        match v {
            i32::MIN..=-2 => Outcome::Loss,
            -1 => Outcome::BlessedLoss,
            0 => Outcome::Draw,
            1 => Outcome::CursedWin,
            _ => Outcome::Win,
        }
    }
}

impl From<Wdl> for Outcome {
    fn from(wdl: Wdl) -> Outcome {
        match wdl {
            Wdl::Loss => Outcome::Loss,
            Wdl::BlessedLoss => Outcome::BlessedLoss,
            Wdl::Draw => Outcome::Draw,
            Wdl::CursedWin => Outcome::CursedWin,
            Wdl::Win => Outcome::Win,
        }
    }
}

impl Neg for Outcome {
    type Output = Outcome;

    fn neg(self) -> Outcome {
        Outcome::from_signum_value(-self.signum_value())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Loss => "loss",
            Outcome::BlessedLoss => "blessed-loss",
            Outcome::Draw => "draw",
            Outcome::CursedWin => "cursed-win",
            Outcome::Win => "win",
        })
    }
}

/// Promotion piece of a move.
///
/// Uses the same values in [`ProbeResult`](crate::ProbeResult) and
/// [`CompactMove`](crate::CompactMove), so the fields are interchangeable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(u8)]
pub enum Promotion {
    /// Not a promotion.
    #[default]
    None = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
}

impl Promotion {
    /// Largest valid field value.
    pub const MAX: u32 = Promotion::Knight as u32;

    /// Gets the promotion with the given field value, or `None` if it is
    /// out of range.
    pub const fn from_bits(bits: u32) -> Option<Promotion> {
        Some(match bits {
            0 => Promotion::None,
            1 => Promotion::Queen,
            2 => Promotion::Rook,
            3 => Promotion::Bishop,
            4 => Promotion::Knight,
            _ => return None,
        })
    }

    /// Converts from the promotion role of a move.
    ///
    /// Roles that cannot be promoted to (pawn, king) map to
    /// [`Promotion::None`].
    pub const fn from_role(role: Option<Role>) -> Promotion {
        match role {
            Some(Role::Queen) => Promotion::Queen,
            Some(Role::Rook) => Promotion::Rook,
            Some(Role::Bishop) => Promotion::Bishop,
            Some(Role::Knight) => Promotion::Knight,
            _ => Promotion::None,
        }
    }

    /// The role promoted to, if any.
    pub const fn role(self) -> Option<Role> {
        match self {
            Promotion::None => None,
            Promotion::Queen => Some(Role::Queen),
            Promotion::Rook => Some(Role::Rook),
            Promotion::Bishop => Some(Role::Bishop),
            Promotion::Knight => Some(Role::Knight),
        }
    }
}
