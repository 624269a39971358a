// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Save state serialization
//!
//! A save state captures the whole drawing processor plus the interrupt
//! latch, so a state taken in the middle of a primitive resumes and
//! produces exactly the same framebuffer as an uninterrupted run.
//!
//! # Save State Format
//!
//! States are encoded with bincode (standard configuration). The state
//! includes:
//! - Metadata (timestamp, frame count, free-form label)
//! - VDP1 memory (VRAM and both framebuffer planes)
//! - VDP1 registers, clip and local coordinate state
//! - Command processor position, return address, cycle counter and the
//!   suspended primitive, if any
//! - Erase and display timing state
//! - Interrupt status and mask
//!
//! # Version Compatibility
//!
//! Loading a state written with a different [`SAVE_STATE_VERSION`] fails
//! with [`EmulatorError::IncompatibleSaveState`].
//!
//! # Example
//!
//! ```no_run
//! use satvdp::core::save_state::SaveState;
//! use satvdp::core::System;
//!
//! let mut system = System::new();
//! system.run_frame();
//!
//! let state = SaveState::from_system(&system);
//! state.save_to_file("frame.state").unwrap();
//!
//! let loaded = SaveState::load_from_file("frame.state").unwrap();
//! loaded.apply_to_system(&mut system).unwrap();
//! ```

use super::error::{EmulatorError, Result};
use super::interrupt::InterruptState;
use super::system::System;
use super::vdp1::{ClipState, DisplayState, FrameBuffers, ProcessorState, Registers};
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Save state version for compatibility checking
///
/// Increment whenever the encoded layout changes.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete save state
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    /// Save state metadata
    pub metadata: SaveStateMetadata,

    /// Drawing processor state
    pub vdp1: Vdp1State,

    /// Interrupt latch state
    pub interrupts: InterruptState,
}

/// Save state metadata
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Frames run by the harness at save time
    pub frame_count: u64,

    /// Free-form description
    pub label: String,
}

/// Drawing processor state
///
/// Produced by [`Vdp1::save_state`](crate::core::Vdp1::save_state) and
/// consumed by [`Vdp1::load_state`](crate::core::Vdp1::load_state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Vdp1State {
    /// VRAM contents (0x40000 half-words)
    pub vram: Vec<u16>,

    /// Both framebuffer planes and the draw-plane selector
    pub framebuffers: FrameBuffers,

    /// Register file
    pub registers: Registers,

    /// System/user clip and local coordinates
    pub clip: ClipState,

    /// Command processor, including any suspended primitive
    pub processor: ProcessorState,

    /// Blanking, swap and erase state
    pub display: DisplayState,
}

impl SaveState {
    /// Capture the current state of a system
    ///
    /// # Arguments
    ///
    /// * `system` - System to capture
    ///
    /// # Returns
    ///
    /// A save state stamped with the current time
    pub fn from_system(system: &System) -> Self {
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                frame_count: system.frame_count(),
                label: String::new(),
            },
            vdp1: system.vdp1().save_state(),
            interrupts: system.interrupts().state(),
        }
    }

    /// Attach a label to the metadata
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.metadata.label = label.into();
        self
    }

    /// Restore this state into a system
    ///
    /// # Errors
    ///
    /// Returns `InvalidImageSize` if VRAM or a plane has the wrong size.
    pub fn apply_to_system(&self, system: &mut System) -> Result<()> {
        system.vdp1_mut().load_state(self.vdp1.clone())?;
        system.interrupts_mut().restore(self.interrupts);
        system.set_frame_count(self.metadata.frame_count);
        log::info!(
            "Save state restored (frame {}, taken {})",
            self.metadata.frame_count,
            self.metadata.timestamp
        );
        Ok(())
    }

    /// Encode to bytes
    ///
    /// # Errors
    ///
    /// Returns `SaveStateEncode` if bincode fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    /// Decode from bytes and check the version
    ///
    /// # Errors
    ///
    /// Returns `SaveStateDecode` on malformed input and
    /// `IncompatibleSaveState` on a version mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _): (SaveState, usize) =
            bincode::decode_from_slice(bytes, config::standard())?;

        if state.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::IncompatibleSaveState {
                expected: SAVE_STATE_VERSION,
                got: state.version,
            });
        }

        Ok(state)
    }

    /// Save state to file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to save file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or encoding fails.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&encoded)?;
        log::debug!(
            "Save state written to {} ({} bytes)",
            path.as_ref().display(),
            encoded.len()
        );
        Ok(())
    }

    /// Load state from file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to save file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, decoding fails or the
    /// version is incompatible.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }
}
