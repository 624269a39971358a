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

//! Texture sampling
//!
//! Sprites read texels from VRAM in one of six color modes. Palette modes
//! pack 2 or 4 texels per half-word, most significant first. A reserved
//! all-ones index (or an RGB value with the top bits `01`) is the end code.

use super::super::types::{ColorMode, CommandRecord};
use super::super::VRAM_MASK;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// One sampled texel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texel {
    /// Resolved 16-bit color (bank OR index, LUT entry, or RGB)
    pub color: u16,
    /// Texel must not be written
    pub transparent: bool,
    /// Texel was an end code
    pub end_code: bool,
}

impl Texel {
    const END_CODE: Texel = Texel {
        color: 0,
        transparent: true,
        end_code: true,
    };

    fn opaque_unless(color: u16, transparent: bool) -> Self {
        Self {
            color,
            transparent,
            end_code: false,
        }
    }
}

/// Per-primitive texture addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TextureParams {
    /// Color mode
    pub color_mode: ColorMode,
    /// VRAM word address of the current texture row
    pub base: u32,
    /// Color bank bits ORed into palette indices
    pub bank: u16,
    /// Color lookup table (LUT mode only)
    pub clut: [u16; 16],
    /// End codes are treated as ordinary texels
    pub end_code_disabled: bool,
    /// Index 0 is drawn instead of being transparent
    pub transparent_disabled: bool,
}

impl TextureParams {
    /// Build texture parameters for a sprite command
    ///
    /// LUT mode copies its 16-entry table from VRAM here, once per primitive.
    pub fn from_record(record: &CommandRecord, vram: &[u16]) -> Self {
        let mode = record.mode();
        let color_mode = mode.color_mode();
        let colr = record.color();

        let bank = match color_mode {
            ColorMode::Bank16 => colr & 0xFFF0,
            ColorMode::Bank64 => colr & 0xFFC0,
            ColorMode::Bank128 => colr & 0xFF80,
            ColorMode::Bank256 => colr & 0xFF00,
            _ => 0,
        };

        let mut clut = [0u16; 16];
        if color_mode == ColorMode::Lookup16 {
            let clut_base = (colr as u32) << 2;
            for (i, entry) in clut.iter_mut().enumerate() {
                *entry = vram[((clut_base + i as u32) & VRAM_MASK) as usize];
            }
        }

        Self {
            color_mode,
            base: record.source(),
            bank,
            clut,
            end_code_disabled: mode.end_code_disabled(),
            transparent_disabled: mode.transparent_pixel_disabled(),
        }
    }

    /// Sample texel `x` of the current row
    pub fn fetch(&self, vram: &[u16], x: i32) -> Texel {
        let x = x as u32;
        let word = |offset: u32| vram[(self.base.wrapping_add(offset) & VRAM_MASK) as usize];

        match self.color_mode {
            ColorMode::Bank16 | ColorMode::Lookup16 => {
                let index = (word(x >> 2) >> (((x & 0x3) ^ 0x3) << 2)) & 0xF;
                if !self.end_code_disabled && index == 0xF {
                    return Texel::END_CODE;
                }

                let transparent = !self.transparent_disabled && index == 0;
                let color = if self.color_mode == ColorMode::Lookup16 {
                    self.clut[index as usize]
                } else {
                    self.bank | index
                };
                Texel::opaque_unless(color, transparent)
            }
            ColorMode::Bank64 | ColorMode::Bank128 | ColorMode::Bank256 => {
                let index = (word(x >> 1) >> (((x & 0x1) ^ 0x1) << 3)) & 0xFF;
                if !self.end_code_disabled && index == 0xFF {
                    return Texel::END_CODE;
                }

                let mask = match self.color_mode {
                    ColorMode::Bank64 => 0x3F,
                    ColorMode::Bank128 => 0x7F,
                    _ => 0xFF,
                };
                let transparent = !self.transparent_disabled && index == 0;
                Texel::opaque_unless(self.bank | (index & mask), transparent)
            }
            ColorMode::Rgb | ColorMode::Invalid => {
                let value = if self.color_mode == ColorMode::Rgb {
                    word(x)
                } else {
                    vram[0]
                };
                if !self.end_code_disabled && (value & 0xC000) == 0x4000 {
                    return Texel::END_CODE;
                }

                let transparent = !self.transparent_disabled && value < 0x4000;
                Texel::opaque_unless(value, transparent)
            }
        }
    }
}
