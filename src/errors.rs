use std::{error::Error, fmt, io, path::PathBuf};

use shakmaty::{Chess, PositionError};
use shakmaty_syzygy::SyzygyError;

/// Error when opening tablebase directories.
#[derive(Debug)]
pub enum InitError {
    /// A component of the search path could not be listed.
    Read {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        error: io::Error,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Read { path, error } => {
                write!(f, "could not read tablebase directory {}: {error}", path.display())
            }
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InitError::Read { error, .. } => Some(error),
        }
    }
}

/// Error when a raw value received from a probe engine does not decode.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidBits {
    pub(crate) bits: u32,
}

impl InvalidBits {
    /// The offending raw value.
    pub fn bits(&self) -> u32 {
        self.bits
    }
}

impl fmt::Display for InvalidBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid packed tablebase value: {:#x}", self.bits)
    }
}

impl Error for InvalidBits {}

/// Error when a [`PositionDescriptor`](crate::PositionDescriptor) does not
/// describe a legal chess position.
#[derive(Debug)]
pub enum DescriptorError {
    /// Bitboards do not describe a consistent board, or the en passant
    /// square is out of range.
    Bitboards,
    /// Bitboards describe a board, but not a legal position.
    Position(Box<PositionError<Chess>>),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::Bitboards => f.write_str("inconsistent bitboards"),
            DescriptorError::Position(error) => write!(f, "illegal position: {error}"),
        }
    }
}

impl Error for DescriptorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DescriptorError::Bitboards => None,
            DescriptorError::Position(error) => Some(error.as_ref()),
        }
    }
}

impl From<PositionError<Chess>> for DescriptorError {
    fn from(error: PositionError<Chess>) -> DescriptorError {
        DescriptorError::Position(Box::new(error))
    }
}

/// Reason a [`SyzygyEngine`](crate::SyzygyEngine) probe failed.
///
/// Never leaves the engine: at the [`ProbeEngine`](crate::ProbeEngine)
/// boundary it becomes the failure sentinel, after being logged.
#[derive(Debug)]
pub(crate) enum EngineError {
    /// Position has castling rights. Tables do not contain such positions.
    Castling,
    /// Half-move clock is not zero, but the probe requires a position right
    /// after a zeroing move.
    HalfmoveClock { halfmoves: u32 },
    Descriptor(DescriptorError),
    /// The table reader failed.
    Syzygy(SyzygyError),
    /// No move achieves the reported value.
    NoBestMove,
    /// Move without an origin square.
    UnsupportedMove,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Castling => f.write_str("position has castling rights"),
            EngineError::HalfmoveClock { halfmoves } => {
                write!(f, "wdl probe requires halfmove clock 0, got {halfmoves}")
            }
            EngineError::Descriptor(error) => error.fmt(f),
            EngineError::Syzygy(error) => error.fmt(f),
            EngineError::NoBestMove => f.write_str("no move preserves the tablebase value"),
            EngineError::UnsupportedMove => f.write_str("move has no origin square"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Descriptor(error) => Some(error),
            EngineError::Syzygy(error) => Some(error),
            _ => None,
        }
    }
}

impl From<SyzygyError> for EngineError {
    fn from(error: SyzygyError) -> EngineError {
        EngineError::Syzygy(error)
    }
}

impl From<DescriptorError> for EngineError {
    fn from(error: DescriptorError) -> EngineError {
        EngineError::Descriptor(error)
    }
}

pub(crate) type EngineResult<T> = Result<T, EngineError>;
