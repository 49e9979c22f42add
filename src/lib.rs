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

//! Probe Syzygy endgame tablebases through a compact, Fathom compatible
//! interface, for use by game-tree search engines.
//!
//! Results are packed into a single [`ProbeResult`] (`u32`): outcome,
//! suggested move and distance to zeroing, with a distinct
//! [`ProbeResult::FAILURE`] sentinel.
//!
//! ```no_run
//! use shakmaty::{fen::Fen, CastlingMode, Chess};
//! use syzygy_probe::{Outcome, PositionDescriptor, Tablebase};
//!
//! let tables = Tablebase::initialize("/opt/syzygy")?;
//!
//! let pos: Chess = "8/8/8/8/B7/N7/K2k4/8 b - - 0 1"
//!     .parse::<Fen>()?
//!     .into_position(CastlingMode::Standard)?;
//! let desc = PositionDescriptor::from_position(&pos);
//!
//! // Inside the search.
//! let res = tables.probe_wdl(&desc);
//! assert_eq!(res.outcome(), Some(Outcome::Loss));
//!
//! // At the root.
//! let res = tables.probe_root(&desc, None);
//! println!("best move {}{}, dtz {}", res.from(), res.to(), res.dtz());
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! Search engines can instead rank all root moves at once with
//! [`Tablebase::probe_root_dtz()`] (or [`Tablebase::probe_root_wdl()`] if
//! DTZ tables are missing).
//!
//! # Feature flags
//!
//! * `mmap`: Adds [`Tablebase::initialize_mmap()`] and
//!   [`SyzygyEngine::with_mmap_filesystem()`], which memory map table files
//!   instead of reading them.
//!
//! # Logging
//!
//! Events are emitted with [`tracing`](https://docs.rs/tracing). Probe
//! failures are logged at debug level, with their cause.

#![doc(html_root_url = "https://docs.rs/syzygy-probe/0.1.0")]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod errors;
mod moves;
mod position;
mod result;
mod syzygy;
mod tablebase;
mod types;

pub mod engine;
pub mod ranking;

pub use engine::ProbeEngine;
pub use errors::{DescriptorError, InitError, InvalidBits};
pub use moves::CompactMove;
pub use position::{Castling, PositionDescriptor};
pub use result::ProbeResult;
pub use syzygy::SyzygyEngine;
pub use tablebase::{RootMove, Tablebase};
pub use types::{Outcome, Promotion, MAX_MOVES};
