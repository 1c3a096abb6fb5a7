//! Save writing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use seashell_core::GameState;

use crate::codec::{encode_body, encode_header, write_u32_le, write_u64_le};
use crate::error::SaveError;
use crate::hash::checksum;

/// Write `state` to `w` in the save format.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use a `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use seashell_core::{Catalog, GameState};
/// use seashell_save::{load_state, save_state};
///
/// let catalog = Catalog::standard();
/// let state = GameState::initial(&catalog);
/// let mut buf = Vec::new();
/// save_state(&mut buf, &state).unwrap();
/// assert_eq!(load_state(buf.as_slice(), &catalog).unwrap(), state);
/// ```
pub fn save_state<W: Write>(mut w: W, state: &GameState) -> Result<(), SaveError> {
    let body = encode_body(state)?;
    encode_header(&mut w)?;
    write_u32_le(&mut w, body.len() as u32)?;
    w.write_all(&body)?;
    write_u64_le(&mut w, checksum(&body))?;
    w.flush()?;
    Ok(())
}

/// Write `state` to `path`, replacing any previous save.
///
/// The bytes go to a sibling file named `<path>.tmp` first and are
/// renamed into place, so a crash mid-write leaves the old save intact.
pub fn save_to_path(path: impl AsRef<Path>, state: &GameState) -> Result<(), SaveError> {
    let path = path.as_ref();
    let tmp = tmp_path(path);
    let mut buf = Vec::new();
    save_state(&mut buf, state)?;
    fs::write(&tmp, &buf)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), bytes = buf.len(), "game saved");
    Ok(())
}

/// `path` with `.tmp` appended, never equal to `path` itself.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
