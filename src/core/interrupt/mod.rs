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

//! System control unit interrupt latch
//!
//! The drawing processor raises a single interrupt line when a command
//! list finishes. This module models the host-side latch that collects
//! that line together with the video timing sources the scanline harness
//! drives.
//!
//! ## Registers
//!
//! - **IST** (interrupt status): a bit is set when its source fires.
//!   Writing a 0 to a bit clears it, writing a 1 leaves it alone.
//! - **IMS** (interrupt mask): a 1 bit blocks the source from reaching
//!   the host CPU. All sources start masked.
//!
//! ## Interrupt Sources (Bit Positions)
//!
//! ```text
//! Bit  | Source          | Description
//! -----|-----------------|----------------------------------
//! 0    | VBLANK_IN       | Vertical blank start
//! 1    | VBLANK_OUT      | Vertical blank end
//! 2    | HBLANK_IN       | Horizontal blank start
//! 3    | TIMER0          | Timer 0 compare
//! 4    | TIMER1          | Timer 1 compare
//! 5    | DSP_END         | DSP program end
//! 6    | SOUND_REQUEST   | Sound CPU request
//! 7    | SYSTEM_MANAGER  | System manager
//! 8    | PAD             | Pad interrupt
//! 9    | DMA2_END        | Level 2 DMA end
//! 10   | DMA1_END        | Level 1 DMA end
//! 11   | DMA0_END        | Level 0 DMA end
//! 12   | DMA_ILLEGAL     | DMA illegal access
//! 13   | SPRITE_DRAW_END | Drawing processor command list end
//! ```

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Interrupt source bit flags
///
/// Bit positions shared by the status and mask registers.
pub mod interrupts {
    /// Vertical blank start (bit 0)
    pub const VBLANK_IN: u32 = 1 << 0;

    /// Vertical blank end (bit 1)
    pub const VBLANK_OUT: u32 = 1 << 1;

    /// Horizontal blank start (bit 2)
    pub const HBLANK_IN: u32 = 1 << 2;

    /// Timer 0 (bit 3)
    pub const TIMER0: u32 = 1 << 3;

    /// Timer 1 (bit 4)
    pub const TIMER1: u32 = 1 << 4;

    /// DSP end (bit 5)
    pub const DSP_END: u32 = 1 << 5;

    /// Sound request (bit 6)
    pub const SOUND_REQUEST: u32 = 1 << 6;

    /// System manager (bit 7)
    pub const SYSTEM_MANAGER: u32 = 1 << 7;

    /// Pad (bit 8)
    pub const PAD: u32 = 1 << 8;

    /// Level 2 DMA end (bit 9)
    pub const DMA2_END: u32 = 1 << 9;

    /// Level 1 DMA end (bit 10)
    pub const DMA1_END: u32 = 1 << 10;

    /// Level 0 DMA end (bit 11)
    pub const DMA0_END: u32 = 1 << 11;

    /// DMA illegal (bit 12)
    pub const DMA_ILLEGAL: u32 = 1 << 12;

    /// Sprite draw end (bit 13)
    pub const SPRITE_DRAW_END: u32 = 1 << 13;

    /// Every implemented source
    pub const ALL: u32 = (1 << 14) - 1;
}

/// Serializable copy of the latch registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct InterruptState {
    /// Interrupt status bits
    pub status: u32,
    /// Interrupt mask bits (1 = masked)
    pub mask: u32,
}

/// Interrupt latch
///
/// # Example
///
/// ```
/// use satvdp::core::interrupt::{InterruptController, interrupts};
///
/// let mut ic = InterruptController::new();
/// ic.request(interrupts::SPRITE_DRAW_END);
///
/// // Everything starts masked
/// assert!(!ic.is_pending());
///
/// ic.write_mask(interrupts::ALL & !interrupts::SPRITE_DRAW_END);
/// assert!(ic.is_pending());
///
/// // Writing 0 to the bit clears it
/// ic.write_status(!interrupts::SPRITE_DRAW_END);
/// assert!(!ic.is_pending());
/// ```
#[derive(Debug, Clone)]
pub struct InterruptController {
    /// Latched sources
    status: u32,

    /// 1 = source blocked
    mask: u32,
}

impl InterruptController {
    /// Create a new controller with nothing latched and every source masked
    ///
    /// # Example
    ///
    /// ```
    /// use satvdp::core::interrupt::{InterruptController, interrupts};
    ///
    /// let ic = InterruptController::new();
    /// assert_eq!(ic.read_status(), 0);
    /// assert_eq!(ic.read_mask(), interrupts::ALL);
    /// ```
    pub fn new() -> Self {
        Self {
            status: 0,
            mask: interrupts::ALL,
        }
    }

    /// Latch one or more sources
    ///
    /// # Arguments
    ///
    /// * `interrupt` - Source bit(s) to set
    pub fn request(&mut self, interrupt: u32) {
        self.status |= interrupt & interrupts::ALL;
        log::trace!(
            "IRQ requested: 0x{:04X}, status=0x{:04X}",
            interrupt,
            self.status
        );
    }

    /// Clear the given source bits
    ///
    /// # Arguments
    ///
    /// * `bits` - Bits to clear (1 bits are cleared)
    pub fn acknowledge(&mut self, bits: u32) {
        self.status &= !bits;
        log::trace!("IRQ acknowledged, status=0x{:04X}", self.status);
    }

    /// Returns true if any latched source is unmasked
    pub fn is_pending(&self) -> bool {
        (self.status & !self.mask) != 0
    }

    /// Highest priority pending source, if any
    ///
    /// Lower bit numbers win, matching the fixed priority order of the
    /// sources above.
    ///
    /// # Returns
    ///
    /// The single bit of the winning source
    pub fn highest_pending(&self) -> Option<u32> {
        let active = self.status & !self.mask;
        if active == 0 {
            None
        } else {
            Some(active & active.wrapping_neg())
        }
    }

    /// Read the status register
    pub fn read_status(&self) -> u32 {
        self.status
    }

    /// Write the status register
    ///
    /// Bits written as 0 are cleared, bits written as 1 keep their value.
    pub fn write_status(&mut self, value: u32) {
        self.status &= value;
    }

    /// Read the mask register
    pub fn read_mask(&self) -> u32 {
        self.mask
    }

    /// Write the mask register
    pub fn write_mask(&mut self, value: u32) {
        self.mask = value & interrupts::ALL;
        log::debug!("IRQ mask set: 0x{:04X}", self.mask);
    }

    /// Capture the registers for a save state
    pub fn state(&self) -> InterruptState {
        InterruptState {
            status: self.status,
            mask: self.mask,
        }
    }

    /// Restore the registers from a save state
    pub fn restore(&mut self, state: InterruptState) {
        self.status = state.status & interrupts::ALL;
        self.mask = state.mask & interrupts::ALL;
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
