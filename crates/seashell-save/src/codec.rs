//! Binary encode/decode for the save format.
//!
//! All integers are little-endian. No compression, no alignment padding,
//! no self-describing schema.

use std::io::{Read, Write};

use seashell_core::{Catalog, GameState, JobId, Level, Shells, Worker};

use crate::error::SaveError;
use crate::{FORMAT_VERSION, MAGIC};

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), SaveError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), SaveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), SaveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, SaveError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, SaveError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, SaveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

// ── Header ──────────────────────────────────────────────────────

/// Write magic and version.
pub fn encode_header(w: &mut dyn Write) -> Result<(), SaveError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)
}

/// Read and check magic and version.
pub fn decode_header(r: &mut dyn Read) -> Result<(), SaveError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(SaveError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(SaveError::UnsupportedVersion { found: version });
    }
    Ok(())
}

// ── Body ────────────────────────────────────────────────────────

/// Encode the persisted part of `state`.
pub fn encode_body(state: &GameState) -> Result<Vec<u8>, SaveError> {
    let mut body = Vec::with_capacity(12 + state.workers.len() * 5);
    write_u64_le(&mut body, state.stashed_money.get())?;
    write_u32_le(&mut body, state.workers.len() as u32)?;
    for worker in state.workers.values() {
        write_u8(&mut body, worker.job_id.get())?;
        write_u32_le(&mut body, worker.level.get())?;
    }
    Ok(body)
}

/// Decode a body and rebuild the full aggregate from `catalog`.
///
/// The result is validated: levels past the catalog ceiling fail with
/// [`SaveError::State`].
pub fn decode_body(mut body: &[u8], catalog: &Catalog) -> Result<GameState, SaveError> {
    let r: &mut dyn Read = &mut body;
    let money = read_u64_le(r)?;
    let count = read_u32_le(r)?;
    if count as usize > JobId::ALL.len() {
        return Err(malformed(format!("{count} workers, at most {} jobs exist", JobId::ALL.len())));
    }

    let mut state = GameState::initial(catalog);
    state.stashed_money = Shells::new(money);
    for _ in 0..count {
        let raw_job = read_u8(r)?;
        let raw_level = read_u32_le(r)?;
        let job = JobId::new(raw_job).map_err(|e| malformed(e.to_string()))?;
        let level =
            Level::new(raw_level).ok_or_else(|| malformed(format!("job {job} has level 0")))?;
        if state.already_bought(job) {
            return Err(malformed(format!("job {job} stored twice")));
        }
        state.workers.insert(job, Worker { job_id: job, level });
        state
            .refresh_job(catalog, job, level)
            .map_err(seashell_core::StateError::from)?;
    }
    if !body.is_empty() {
        return Err(malformed(format!("{} trailing bytes in body", body.len())));
    }
    state.validate(catalog)?;
    Ok(state)
}

fn malformed(detail: String) -> SaveError {
    SaveError::Malformed { detail }
}
