// ---------------------------------------------------------------------------
// snapshot – checksummed binary form of a KPI document
// ---------------------------------------------------------------------------
//
// Layout (16-byte header, little-endian):
//   [0..4]   Magic bytes: "KPIS"
//   [4..8]   Format version (u32)
//   [8..12]  Payload length (u32)
//   [12..16] xxHash32 checksum of the payload
//   [16..]   bitcode-encoded Vec<SnapshotEntry>
//
// Payloads travel as JSON text inside the bitcode frame, so section types can
// evolve without touching the snapshot format.

use bevy::log::warn;
use bitcode::{Decode, Encode};
use xxhash_rust::xxh32::xxh32;

use super::document::{KpiDocument, KpiEntry};
use crate::error::PlanningError;

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"KPIS";

pub const SNAPSHOT_HEADER_SIZE: usize = 16;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

const XXHASH_SEED: u32 = 0;

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct SnapshotEntry {
    key: String,
    version: u32,
    revision: u64,
    payload: String,
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl KpiDocument {
    /// Encode the whole document, revisions included.
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, PlanningError> {
        let entries = self
            .iter_entries()
            .map(|(key, entry)| {
                Ok(SnapshotEntry {
                    key: key.clone(),
                    version: entry.version,
                    revision: entry.revision,
                    payload: serde_json::to_string(&entry.payload)?,
                })
            })
            .collect::<Result<Vec<_>, PlanningError>>()?;
        let payload = bitcode::encode(&entries);

        let mut out = Vec::with_capacity(SNAPSHOT_HEADER_SIZE + payload.len());
        out.extend_from_slice(&SNAPSHOT_MAGIC);
        out.extend_from_slice(&SNAPSHOT_FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&xxh32(&payload, XXHASH_SEED).to_le_bytes());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Decode a snapshot written by [`to_snapshot_bytes`](Self::to_snapshot_bytes).
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::Snapshot` if:
    /// - the buffer is shorter than the header or lacks the magic bytes
    /// - the format version is newer than this build understands
    /// - the payload length or checksum does not match
    /// - the payload cannot be decoded
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, PlanningError> {
        if bytes.len() < SNAPSHOT_HEADER_SIZE {
            return Err(PlanningError::Snapshot(format!(
                "snapshot is too short ({} bytes, need at least {})",
                bytes.len(),
                SNAPSHOT_HEADER_SIZE
            )));
        }
        if bytes[..4] != SNAPSHOT_MAGIC {
            return Err(PlanningError::Snapshot(
                "missing KPIS magic bytes".to_string(),
            ));
        }
        let version = read_u32(bytes, 4);
        if version > SNAPSHOT_FORMAT_VERSION {
            return Err(PlanningError::Snapshot(format!(
                "snapshot format version {version} is newer than supported version {SNAPSHOT_FORMAT_VERSION}"
            )));
        }
        let length = read_u32(bytes, 8) as usize;
        let checksum = read_u32(bytes, 12);
        let payload = &bytes[SNAPSHOT_HEADER_SIZE..];
        if payload.len() != length {
            return Err(PlanningError::Snapshot(format!(
                "payload length mismatch (header says {length}, found {})",
                payload.len()
            )));
        }
        let computed = xxh32(payload, XXHASH_SEED);
        if computed != checksum {
            warn!(
                "KPI snapshot checksum mismatch: expected {:#010X}, got {:#010X}",
                checksum, computed
            );
            return Err(PlanningError::Snapshot(format!(
                "checksum mismatch (expected {checksum:#010X}, got {computed:#010X})"
            )));
        }

        let entries: Vec<SnapshotEntry> = bitcode::decode(payload)?;
        let mut document = KpiDocument::new();
        for entry in entries {
            let payload = serde_json::from_str(&entry.payload)?;
            document.insert_entry(
                entry.key,
                KpiEntry {
                    version: entry.version,
                    revision: entry.revision,
                    payload,
                },
            );
        }
        Ok(document)
    }
}
