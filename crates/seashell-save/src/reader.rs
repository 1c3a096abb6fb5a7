//! Save reading.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use seashell_core::{Catalog, GameState};

use crate::codec::{decode_body, decode_header, read_u32_le, read_u64_le};
use crate::error::SaveError;
use crate::hash::checksum;
use crate::MAX_BODY_LEN;

/// Read a save from `r` and rebuild the aggregate against `catalog`.
pub fn load_state<R: Read>(mut r: R, catalog: &Catalog) -> Result<GameState, SaveError> {
    decode_header(&mut r)?;
    let len = read_u32_le(&mut r)?;
    if len > MAX_BODY_LEN {
        return Err(SaveError::Malformed {
            detail: format!("body length {len} exceeds {MAX_BODY_LEN}"),
        });
    }
    let mut body = vec![0u8; len as usize];
    r.read_exact(&mut body)?;
    let stored = read_u64_le(&mut r)?;
    let computed = checksum(&body);
    if stored != computed {
        return Err(SaveError::ChecksumMismatch { stored, computed });
    }
    decode_body(&body, catalog)
}

/// Like [`load_state`], but any failure yields the fresh-game state.
///
/// The failure is logged at `warn` level.
pub fn load_or_default<R: Read>(r: R, catalog: &Catalog) -> GameState {
    match load_state(r, catalog) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "save unreadable, starting fresh");
            GameState::initial(catalog)
        }
    }
}

/// Load the save at `path`.
///
/// A missing file is not an error: it yields the fresh-game state. Any
/// other failure is returned.
pub fn load_from_path(path: impl AsRef<Path>, catalog: &Catalog) -> Result<GameState, SaveError> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => load_state(bytes.as_slice(), catalog),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no save found");
            Ok(GameState::initial(catalog))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::save_state;
    use seashell_core::JobId;
    use seashell_test_utils::{owning_state, scenario_catalog};

    fn saved_bytes() -> (Catalog, GameState, Vec<u8>) {
        let catalog = scenario_catalog();
        let state = owning_state(&catalog, 1234, &[JobId::DOUBLE_ROOM, JobId::ROOM]);
        let mut buf = Vec::new();
        save_state(&mut buf, &state).unwrap();
        (catalog, state, buf)
    }

    #[test]
    fn round_trip_restores_equal_state() {
        let (catalog, state, buf) = saved_bytes();
        assert_eq!(load_state(buf.as_slice(), &catalog).unwrap(), state);
    }

    #[test]
    fn flipped_body_byte_fails_checksum() {
        let (catalog, _, mut buf) = saved_bytes();
        // First byte of the body (after magic, version and length).
        buf[9] ^= 0xFF;
        assert!(matches!(
            load_state(buf.as_slice(), &catalog),
            Err(SaveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn truncated_input_is_io_error() {
        let (catalog, _, buf) = saved_bytes();
        for cut in [0, 3, 5, 9, buf.len() - 1] {
            assert!(
                matches!(
                    load_state(&buf[..cut], &catalog),
                    Err(SaveError::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof
                ),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn oversized_length_rejected_before_allocating() {
        let mut buf = b"SHEL\x01".to_vec();
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            load_state(buf.as_slice(), &scenario_catalog()),
            Err(SaveError::Malformed { .. })
        ));
    }

    #[test]
    fn garbage_loads_default() {
        let catalog = scenario_catalog();
        let state = load_or_default(&b"not a save at all"[..], &catalog);
        assert_eq!(state, GameState::initial(&catalog));
        let empty = load_or_default(&[][..], &catalog);
        assert_eq!(empty, GameState::initial(&catalog));
    }
}
