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

//! VDP1 type definitions
//!
//! Command records as read from VRAM, their decoded control/mode fields, and
//! the vertex type every primitive is reduced to before rasterization.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Sign-extend the low `bits` bits of `value`
///
/// # Examples
///
/// ```
/// use satvdp::core::vdp1::sign_extend;
///
/// assert_eq!(sign_extend(13, 0x1FFF), -1);
/// assert_eq!(sign_extend(11, 0x3FF), 1023);
/// assert_eq!(sign_extend(11, 0x400), -1024);
/// ```
#[inline(always)]
pub fn sign_extend(bits: u32, value: i32) -> i32 {
    let shift = 32 - bits;
    (value << shift) >> shift
}

/// One endpoint handed to the line rasterizer
///
/// Coordinates are 13-bit quantities (already offset by the local origin),
/// `g` is a 5-5-5 Gouraud color and `t` the texel index along the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LineVertex {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
    /// Gouraud color (5-5-5, 0x10 per channel is neutral)
    pub g: u16,
    /// Texel index
    pub t: i32,
}

impl LineVertex {
    /// Create a vertex at (x, y) with no shading or texture data
    pub fn at(x: i32, y: i32) -> Self {
        Self { x, y, g: 0, t: 0 }
    }
}

/// Command opcode (CMDCTRL bits 3-0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 0x0: Sprite drawn at its natural size
    NormalSprite,
    /// 0x1: Sprite stretched to a rectangle
    ScaledSprite,
    /// 0x2/0x3: Sprite mapped onto four arbitrary corners
    DistortedSprite,
    /// 0x4: Untextured quadrilateral
    Polygon,
    /// 0x5/0x7: Closed four-segment line loop
    Polyline,
    /// 0x6: Single line segment
    Line,
    /// 0x8/0xB: Set user clipping rectangle
    SetUserClip,
    /// 0x9: Set system clipping corner
    SetSystemClip,
    /// 0xA: Set local coordinate origin
    SetLocalCoordinate,
}

impl Opcode {
    /// Decode the opcode nibble
    ///
    /// Returns `None` for 0xC-0xF, which the hardware treats as a lockup.
    pub fn decode(value: u16) -> Option<Self> {
        match value & 0xF {
            0x0 => Some(Opcode::NormalSprite),
            0x1 => Some(Opcode::ScaledSprite),
            0x2 | 0x3 => Some(Opcode::DistortedSprite),
            0x4 => Some(Opcode::Polygon),
            0x5 | 0x7 => Some(Opcode::Polyline),
            0x6 => Some(Opcode::Line),
            0x8 | 0xB => Some(Opcode::SetUserClip),
            0x9 => Some(Opcode::SetSystemClip),
            0xA => Some(Opcode::SetLocalCoordinate),
            _ => None,
        }
    }

    /// Whether the opcode draws (and may therefore leave a snapshot behind)
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            Opcode::SetUserClip | Opcode::SetSystemClip | Opcode::SetLocalCoordinate
        )
    }
}

/// Command list branch mode (CMDCTRL bits 13-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpMode {
    /// Continue with the next record
    Next,
    /// Continue at CMDLINK
    Assign,
    /// Save the next address in the return register, continue at CMDLINK
    Call,
    /// Continue at the saved address if there is one
    Return,
}

impl JumpMode {
    /// Decode from a CMDCTRL value
    pub fn from_control(control: u16) -> Self {
        match (control >> 12) & 0x3 {
            0 => JumpMode::Next,
            1 => JumpMode::Assign,
            2 => JumpMode::Call,
            _ => JumpMode::Return,
        }
    }
}

/// Color calculation (CMDPMOD bits 1-0, Gouraud in bit 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCalc {
    /// Overwrite the destination
    Replace,
    /// Halve the destination when its MSB is set
    Shadow,
    /// Halve the source
    HalfLuminance,
    /// Average source and destination when the destination MSB is set
    HalfTransparency,
}

/// Texture color mode (CMDPMOD bits 5-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ColorMode {
    /// 4bpp, 16-color bank
    Bank16,
    /// 4bpp through a 16-entry lookup table
    Lookup16,
    /// 8bpp, 64-color bank
    Bank64,
    /// 8bpp, 128-color bank
    Bank128,
    /// 8bpp, 256-color bank
    Bank256,
    /// 16bpp RGB
    Rgb,
    /// Modes 6 and 7 read VRAM word 0 for every texel
    Invalid,
}

impl ColorMode {
    /// Decode from a CMDPMOD value
    pub fn from_mode(mode: u16) -> Self {
        match (mode >> 3) & 0x7 {
            0 => ColorMode::Bank16,
            1 => ColorMode::Lookup16,
            2 => ColorMode::Bank64,
            3 => ColorMode::Bank128,
            4 => ColorMode::Bank256,
            5 => ColorMode::Rgb,
            _ => ColorMode::Invalid,
        }
    }

    /// log2 of texels per VRAM word, used to size a sprite row in words
    pub fn row_shift(self) -> u32 {
        match self {
            ColorMode::Bank16 | ColorMode::Lookup16 => 2,
            ColorMode::Bank64 | ColorMode::Bank128 | ColorMode::Bank256 => 1,
            ColorMode::Rgb | ColorMode::Invalid => 0,
        }
    }
}

/// Per-pixel clip selection (CMDPMOD bits 10-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    /// System clip only
    System,
    /// Draw only inside the user rectangle (and the system clip)
    InsideUser,
    /// Draw only outside the user rectangle (but inside the system clip)
    OutsideUser,
}

/// Decoded CMDPMOD draw mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct DrawMode(pub u16);

impl DrawMode {
    /// Force the destination MSB instead of drawing color
    pub fn msb_on(self) -> bool {
        self.0 & 0x8000 != 0
    }

    /// High-speed shrink
    pub fn high_speed_shrink(self) -> bool {
        self.0 & 0x1000 != 0
    }

    /// Pre-clipping disable
    pub fn pre_clip_disabled(self) -> bool {
        self.0 & 0x0800 != 0
    }

    /// Clip selection
    pub fn clip_mode(self) -> ClipMode {
        match (self.0 >> 9) & 0x3 {
            0b10 => ClipMode::InsideUser,
            0b11 => ClipMode::OutsideUser,
            _ => ClipMode::System,
        }
    }

    /// Mesh (checkerboard) transparency
    pub fn mesh(self) -> bool {
        self.0 & 0x0100 != 0
    }

    /// End code disable
    pub fn end_code_disabled(self) -> bool {
        self.0 & 0x0080 != 0
    }

    /// Transparent pixel disable
    pub fn transparent_pixel_disabled(self) -> bool {
        self.0 & 0x0040 != 0
    }

    /// Texture color mode
    pub fn color_mode(self) -> ColorMode {
        ColorMode::from_mode(self.0)
    }

    /// Color calculation
    pub fn color_calc(self) -> ColorCalc {
        match self.0 & 0x3 {
            0 => ColorCalc::Replace,
            1 => ColorCalc::Shadow,
            2 => ColorCalc::HalfLuminance,
            _ => ColorCalc::HalfTransparency,
        }
    }

    /// Gouraud shading; suppressed while MSB-on is set
    pub fn gouraud(self) -> bool {
        (self.0 & 0x8004) == 0x0004
    }
}

/// A 16 half-word command record fetched from VRAM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct CommandRecord(pub [u16; 16]);

impl CommandRecord {
    /// Half-words per record
    pub const WORDS: u32 = 0x10;

    /// Read a record starting at VRAM word address `addr`
    ///
    /// Reads wrap at the end of VRAM.
    pub fn fetch(vram: &[u16], addr: u32) -> Self {
        let mut data = [0u16; 16];
        let mask = vram.len() as u32 - 1;
        for (i, word) in data.iter_mut().enumerate() {
            *word = vram[((addr + i as u32) & mask) as usize];
        }
        Self(data)
    }

    /// CMDCTRL
    pub fn control(&self) -> u16 {
        self.0[0x0]
    }

    /// CMDLINK converted to a VRAM word address
    pub fn link(&self) -> u32 {
        ((self.0[0x1] as u32) << 2) & !0xF
    }

    /// CMDPMOD
    pub fn mode(&self) -> DrawMode {
        DrawMode(self.0[0x2])
    }

    /// CMDCOLR
    pub fn color(&self) -> u16 {
        self.0[0x3]
    }

    /// CMDSRCA converted to a VRAM word address
    pub fn source(&self) -> u32 {
        (self.0[0x4] as u32) << 2
    }

    /// Sprite width in texels (CMDSIZE bits 13-8, in units of 8)
    pub fn width(&self) -> i32 {
        (((self.0[0x5] >> 8) & 0x3F) as i32) << 3
    }

    /// Sprite height in texels (CMDSIZE bits 7-0)
    pub fn height(&self) -> i32 {
        (self.0[0x5] & 0xFF) as i32
    }

    /// Vertex `index` (0 = A .. 3 = D) as 13-bit signed coordinates
    pub fn vertex(&self, index: usize) -> (i32, i32) {
        let x = sign_extend(13, (self.0[0x6 + index * 2] & 0x1FFF) as i32);
        let y = sign_extend(13, (self.0[0x7 + index * 2] & 0x1FFF) as i32);
        (x, y)
    }

    /// CMDGRDA converted to a VRAM word address
    pub fn gouraud_table(&self) -> u32 {
        (self.0[0xE] as u32) << 2
    }

    /// End-of-list bit
    pub fn is_end(&self) -> bool {
        self.control() & 0x8000 != 0
    }

    /// Skip bit (record is inert, only its branch is taken)
    pub fn is_skip(&self) -> bool {
        self.control() & 0x4000 != 0
    }

    /// Horizontal texture flip
    pub fn h_flip(&self) -> bool {
        self.control() & 0x0010 != 0
    }

    /// Vertical texture flip
    pub fn v_flip(&self) -> bool {
        self.control() & 0x0020 != 0
    }

    /// Zoom point nibble for scaled sprites
    pub fn zoom_point(&self) -> u16 {
        (self.control() >> 8) & 0xF
    }
}
