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

use bitflags::bitflags;
use shakmaty::{
    Bitboard, Board, Castles, CastlingMode, CastlingSide, Chess, Color, EnPassantMode,
    FromSetup as _, Piece, Position, Role, Setup, Square,
};

use crate::errors::DescriptorError;

bitflags! {
    /// Castling rights, with the bit values of the Fathom probing API.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct Castling: u32 {
        /// White can castle king side.
        const WHITE_KING_SIDE = 0x1;
        /// White can castle queen side.
        const WHITE_QUEEN_SIDE = 0x2;
        /// Black can castle king side.
        const BLACK_KING_SIDE = 0x4;
        /// Black can castle queen side.
        const BLACK_QUEEN_SIDE = 0x8;
    }
}

impl Castling {
    /// Rook squares corresponding to the castling rights, in standard chess.
    pub fn rooks(self) -> Bitboard {
        let mut rooks = Bitboard::EMPTY;
        for (flag, sq) in [
            (Castling::WHITE_KING_SIDE, Square::H1),
            (Castling::WHITE_QUEEN_SIDE, Square::A1),
            (Castling::BLACK_KING_SIDE, Square::H8),
            (Castling::BLACK_QUEEN_SIDE, Square::A8),
        ] {
            if self.contains(flag) {
                rooks.add(sq);
            }
        }
        rooks
    }

    /// Castling rights of a position. Rights with a rook on any file
    /// (as in Chess960) map to the flag of their side.
    fn from_castles(castles: &Castles) -> Castling {
        let mut castling = Castling::empty();
        for (flag, color, side) in [
            (Castling::WHITE_KING_SIDE, Color::White, CastlingSide::KingSide),
            (Castling::WHITE_QUEEN_SIDE, Color::White, CastlingSide::QueenSide),
            (Castling::BLACK_KING_SIDE, Color::Black, CastlingSide::KingSide),
            (Castling::BLACK_QUEEN_SIDE, Color::Black, CastlingSide::QueenSide),
        ] {
            castling.set(flag, castles.has(color, side));
        }
        castling
    }
}

/// The position to probe, in the calling convention of the probing API:
/// one bitboard per color and per role, plus game state.
///
/// Probes only read it and never retain it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PositionDescriptor {
    pub white: u64,
    pub black: u64,
    pub kings: u64,
    pub queens: u64,
    pub rooks: u64,
    pub bishops: u64,
    pub knights: u64,
    pub pawns: u64,
    /// Half-move clock for the 50-move rule.
    pub rule50: u32,
    /// Castling rights. Positions with castling rights cannot be probed.
    pub castling: Castling,
    /// En passant target square, or `0` if there is none.
    pub ep: u32,
    /// `true` if it is white to move.
    pub turn: bool,
}

impl PositionDescriptor {
    /// Describes a position, e.g., one parsed from a FEN.
    ///
    /// Only an en passant square with a legal en passant capture is
    /// recorded.
    pub fn from_position<P: Position>(pos: &P) -> PositionDescriptor {
        let board = pos.board();
        PositionDescriptor {
            white: board.white().0,
            black: board.black().0,
            kings: board.kings().0,
            queens: board.queens().0,
            rooks: board.rooks().0,
            bishops: board.bishops().0,
            knights: board.knights().0,
            pawns: board.pawns().0,
            rule50: pos.halfmoves(),
            castling: Castling::from_castles(pos.castles()),
            ep: pos
                .ep_square(EnPassantMode::Legal)
                .map_or(0, u32::from),
            turn: pos.turn() == Color::White,
        }
    }

    /// All occupied squares.
    pub fn occupied(&self) -> Bitboard {
        Bitboard(self.white | self.black)
    }

    /// Number of pieces on the board, to compare against
    /// [`Tablebase::max_pieces()`](crate::Tablebase::max_pieces).
    pub fn piece_count(&self) -> usize {
        self.occupied().count()
    }

    fn board(&self) -> Result<Board, DescriptorError> {
        let roles = [
            (Role::King, self.kings),
            (Role::Queen, self.queens),
            (Role::Rook, self.rooks),
            (Role::Bishop, self.bishops),
            (Role::Knight, self.knights),
            (Role::Pawn, self.pawns),
        ];

        if self.white & self.black != 0
            || roles.iter().map(|(_, bb)| bb).fold(0, |acc, bb| acc | bb) != self.white | self.black
            || roles.iter().map(|(_, bb)| bb.count_ones()).sum::<u32>()
                != (self.white | self.black).count_ones()
        {
            return Err(DescriptorError::Bitboards);
        }

        let mut board = Board::empty();
        for (role, bb) in roles {
            for sq in Bitboard(bb) {
                let color = Color::from_white(Bitboard(self.white).contains(sq));
                board.set_piece_at(sq, Piece { color, role });
            }
        }
        Ok(board)
    }

    /// Builds the position, for move generation.
    ///
    /// # Errors
    ///
    /// Errors if the bitboards overlap or disagree with each other, or if
    /// they do not describe a legal position.
    pub fn to_chess(&self) -> Result<Chess, DescriptorError> {
        let ep_square = match self.ep {
            0 => None,
            ep => Some(Square::try_from(ep).map_err(|_| DescriptorError::Bitboards)?),
        };

        let mut setup = Setup::empty();
        setup.board = self.board()?;
        setup.turn = Color::from_white(self.turn);
        setup.castling_rights = self.castling.rooks();
        setup.ep_square = ep_square;
        setup.halfmoves = self.rule50;

        Ok(Chess::from_setup(setup, CastlingMode::Standard)?)
    }
}
