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

//! VDP1 register definitions
//!
//! Register indices are half-word offsets into the register window at bus
//! offset 0x100000. Registers are stored as raw values; the flag types below
//! give them names.

use bincode::{Decode, Encode};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// TV mode selection (write-only, 0x00)
pub const REG_TVMR: u32 = 0x0;
/// Frame buffer change mode (write-only, 0x02)
pub const REG_FBCR: u32 = 0x1;
/// Plot trigger (write-only, 0x04)
pub const REG_PTMR: u32 = 0x2;
/// Erase/write data (write-only, 0x06)
pub const REG_EWDR: u32 = 0x3;
/// Erase/write upper-left coordinate (write-only, 0x08)
pub const REG_EWLR: u32 = 0x4;
/// Erase/write lower-right coordinate (write-only, 0x0A)
pub const REG_EWRR: u32 = 0x5;
/// Draw forced termination (write-only, 0x0C)
pub const REG_ENDR: u32 = 0x6;
/// Transfer end status (read-only, 0x10)
pub const REG_EDSR: u32 = 0x8;
/// Last operation command address (read-only, 0x12)
pub const REG_LOPR: u32 = 0x9;
/// Current operation command address (read-only, 0x14)
pub const REG_COPR: u32 = 0xA;
/// Mode status (read-only, 0x16)
pub const REG_MODR: u32 = 0xB;

bitflags! {
    /// TVMR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Tvmr: u8 {
        /// 8 bits per pixel framebuffer
        const BPP8 = 0x01;
        /// Rotation framebuffer (512x512 in 8bpp)
        const ROTATE = 0x02;
        /// High definition television mode
        const HDTV = 0x04;
        /// Erase during v-blank
        const VBE = 0x08;
    }
}

bitflags! {
    /// FBCR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fbcr: u8 {
        /// Frame change trigger
        const FCT = 0x01;
        /// Frame change mode (manual when set)
        const FCM = 0x02;
        /// Double interlace draw line (odd lines when set)
        const DIL = 0x04;
        /// Double interlace enable
        const DIE = 0x08;
        /// Even/odd coordinate select for high-speed shrink
        const EOS = 0x10;
    }
}

bitflags! {
    /// PTMR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ptmr: u8 {
        /// Start drawing immediately
        const START = 0x01;
        /// Start drawing automatically on every frame change
        const AUTO = 0x02;
    }
}

bitflags! {
    /// EDSR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Edsr: u8 {
        /// Drawing of the previous frame ended
        const BEF = 0x01;
        /// Drawing of the current frame ended
        const CEF = 0x02;
    }
}

/// VDP1 register file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Registers {
    /// TV mode selection (4 bits)
    pub tvmr: u8,
    /// Frame buffer change mode (5 bits)
    pub fbcr: u8,
    /// Plot trigger mode (2 bits)
    pub ptmr: u8,
    /// Erase fill value
    pub ewdr: u16,
    /// Erase upper-left corner (X in units of 8 at bits 14-9, Y at bits 8-0)
    pub ewlr: u16,
    /// Erase lower-right corner (X in units of 8 at bits 15-9, Y at bits 8-0)
    pub ewrr: u16,
    /// Transfer end status
    pub edsr: u8,
    /// Address of the command at which the previous frame's drawing stopped
    pub lopr: u16,
}

impl Registers {
    /// TVMR as flags
    pub fn tv_mode(&self) -> Tvmr {
        Tvmr::from_bits_truncate(self.tvmr)
    }

    /// FBCR as flags
    pub fn fb_control(&self) -> Fbcr {
        Fbcr::from_bits_truncate(self.fbcr)
    }

    /// PTMR as flags
    pub fn plot_trigger(&self) -> Ptmr {
        Ptmr::from_bits_truncate(self.ptmr)
    }

    /// EDSR as flags
    pub fn end_status(&self) -> Edsr {
        Edsr::from_bits_truncate(self.edsr)
    }

    /// Framebuffer is 8 bits per pixel
    pub fn is_8bpp(&self) -> bool {
        self.tv_mode().contains(Tvmr::BPP8)
    }

    /// Framebuffer is 8bpp rotation mode (512x512 bytes)
    pub fn is_rot8(&self) -> bool {
        self.tv_mode().contains(Tvmr::BPP8 | Tvmr::ROTATE)
    }

    /// MODR value: version 1, PTM bit 1, FBCR bits 4-1 and TVMR
    pub fn mode_status(&self) -> u16 {
        (1 << 12)
            | (((self.ptmr & 0x2) as u16) << 7)
            | (((self.fbcr & 0x1E) as u16) << 3)
            | self.tvmr as u16
    }
}
