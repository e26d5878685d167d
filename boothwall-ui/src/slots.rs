//! Three-slot display ring buffer
//!
//! Incoming photos are assigned to one of three public display slots, either
//! round-robin via a shared cursor or to an explicitly requested slot. A
//! publish copies the source bytes to a uniquely named temp file inside the
//! slot directory and atomically renames it over the canonical name, so
//! readers of the public path never observe a half-written photo.
//!
//! Slot selection, the copy+rename, cursor advancement, and state mutation
//! are all serialized under one mutex. Holding the lock across the copy keeps
//! publish ordering and per-slot versions strict; call volume is at most a
//! few publishes per second, so throughput is not a concern.

use boothwall_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Valid display slot ids
pub const SLOT_IDS: [u8; 3] = [1, 2, 3];

/// One display slot's published state
#[derive(Debug, Clone, Default)]
struct SlotState {
    photo_url: Option<String>,
    photo_id: Option<String>,
    version: u64,
    updated_at: Option<DateTime<Utc>>,
}

/// Read-only copy of one slot's state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSnapshot {
    pub slot: u8,
    /// Public URL of the published photo, stable across publishes to the slot
    pub photo_url: Option<String>,
    pub photo_id: Option<String>,
    /// Strictly increasing per successful publish; lets consumers detect change
    pub version: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

struct RingState {
    cursor: u64,
    slots: [SlotState; 3],
}

/// Ring buffer of the three public display slots
pub struct SlotRing {
    photos_dir: PathBuf,
    state: Mutex<RingState>,
}

impl SlotRing {
    /// `photos_dir` is the parent of the `Display{1,2,3}` slot directories
    pub fn new(photos_dir: PathBuf) -> Self {
        Self {
            photos_dir,
            state: Mutex::new(RingState {
                cursor: 0,
                slots: Default::default(),
            }),
        }
    }

    /// Publish a photo into a slot
    ///
    /// Without an explicit slot the shared cursor picks the target, visiting
    /// 1,2,3,1,... in order. The cursor advances on every successful publish,
    /// explicit ones included, so explicit assignments perturb the rotation
    /// (intentional; see DESIGN notes). A failed copy leaves the slot's prior
    /// published state untouched and removes the temp file best-effort.
    pub fn publish(&self, source: &Path, explicit_slot: Option<u8>) -> Result<SlotSnapshot> {
        if !source.is_file() {
            return Err(Error::NotFound(format!(
                "Source photo not found or unreadable: {}",
                source.display()
            )));
        }
        if let Some(slot) = explicit_slot {
            if !SLOT_IDS.contains(&slot) {
                return Err(Error::InvalidInput(format!(
                    "slot must be 1, 2, or 3 (got {})",
                    slot
                )));
            }
        }

        let mut state = self.state.lock().unwrap();
        let slot = explicit_slot.unwrap_or(((state.cursor % 3) as u8) + 1);
        let dest_name = self.copy_into_slot(source, slot)?;

        let entry = &mut state.slots[(slot - 1) as usize];
        entry.version += 1;
        entry.photo_url = Some(format!("/static/photos/Display{}/{}", slot, dest_name));
        entry.photo_id = Some(dest_name);
        entry.updated_at = Some(Utc::now());
        state.cursor += 1;

        Ok(snapshot_of(slot, &state.slots[(slot - 1) as usize]))
    }

    /// Read-only snapshot of one slot
    pub fn get(&self, slot: u8) -> Result<SlotSnapshot> {
        if !SLOT_IDS.contains(&slot) {
            return Err(Error::NotFound(format!("Unknown slot: {}", slot)));
        }
        let state = self.state.lock().unwrap();
        Ok(snapshot_of(slot, &state.slots[(slot - 1) as usize]))
    }

    /// Copy the source bytes under a unique temp name, then atomically rename
    /// onto the slot's canonical `photo-<slot><ext>` destination. The rename
    /// replaces any previous photo in one filesystem operation.
    fn copy_into_slot(&self, source: &Path, slot: u8) -> Result<String> {
        let slot_dir = self.photos_dir.join(format!("Display{}", slot));
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let dest_name = format!("photo-{}.{}", slot, ext);
        let dest_path = slot_dir.join(&dest_name);
        let tmp_path = slot_dir.join(format!(".tmp-{}.{}", Uuid::new_v4().simple(), ext));

        let copied = std::fs::copy(source, &tmp_path)
            .and_then(|_| std::fs::rename(&tmp_path, &dest_path));
        if let Err(e) = copied {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(Error::Io(e));
        }

        Ok(dest_name)
    }
}

fn snapshot_of(slot: u8, state: &SlotState) -> SlotSnapshot {
    SlotSnapshot {
        slot,
        photo_url: state.photo_url.clone(),
        photo_id: state.photo_id.clone(),
        version: state.version,
        updated_at: state.updated_at,
    }
}
