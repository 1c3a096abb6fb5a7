//! Binary save format for Seashell game state.
//!
//! Persists the [`GameState`](seashell_core::GameState) aggregate so a game
//! can be resumed through `EngineConfig::initial_state`.
//!
//! # Format
//!
//! ```text
//! [MAGIC "SHEL"] [VERSION u8] [BODY_LEN u32] [BODY] [CHECKSUM u64]
//!
//! BODY = [stashed_money u64] [worker_count u32]
//!        worker_count × ([job_id u8] [level u32])
//! ```
//!
//! All integers are little-endian. Workers are stored in purchase order.
//! The per-job tiers are not stored: they are rebuilt from the catalog
//! on load, and the rebuilt state is validated against it. The checksum
//! is FNV-1a over the body bytes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;
pub mod reader;
pub mod writer;

pub use error::SaveError;
pub use hash::checksum;
pub use reader::{load_from_path, load_or_default, load_state};
pub use writer::{save_state, save_to_path};

/// Magic bytes at the start of every save.
pub const MAGIC: [u8; 4] = *b"SHEL";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Largest body a reader accepts. Five workers need 44 bytes.
pub const MAX_BODY_LEN: u32 = 4096;
