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

//! Pixel compositor
//!
//! The final stage of every primitive: interlace row selection, mesh, MSB-on,
//! Gouraud shading, color calculation and the framebuffer write. Returns the
//! extra cycles the write costs on top of the pixel step.

use super::super::registers::Fbcr;
use super::super::timing::{READ_SURCHARGE, WRITE_16BPP, WRITE_8BPP};
use super::super::types::{ColorCalc, DrawMode};
use super::super::Vdp1;
use super::stepper::apply_gouraud;

/// Half-words per framebuffer row
pub const FB_ROW_WORDS: usize = 512;

/// Shadow: halve the destination if it is an RGB pixel
#[inline(always)]
pub fn shadow(bg: u16) -> u16 {
    if bg & 0x8000 != 0 {
        ((bg & 0x7BDE) >> 1) | 0x8000
    } else {
        bg
    }
}

/// Half-luminance: halve the source, keeping its MSB
#[inline(always)]
pub fn half_luminance(pixel: u16) -> u16 {
    ((pixel & 0x7BDE) >> 1) | (pixel & 0x8000)
}

/// Half-transparency: average with the destination if it is an RGB pixel
///
/// # Examples
///
/// ```
/// use satvdp::core::vdp1::half_transparency;
///
/// assert_eq!(half_transparency(0x801F, 0x8000), 0x800F);
/// // A palette destination is simply overwritten
/// assert_eq!(half_transparency(0x801F, 0x0010), 0x801F);
/// ```
#[inline(always)]
pub fn half_transparency(pixel: u16, bg: u16) -> u16 {
    if bg & 0x8000 != 0 {
        let (p, b) = (pixel as u32, bg as u32);
        (((p + b) - ((p ^ b) & 0x8421)) >> 1) as u16
    } else {
        pixel
    }
}

impl Vdp1 {
    /// Write one visible pixel to the draw plane
    ///
    /// # Arguments
    ///
    /// * `mode` - Draw mode of the primitive
    /// * `x`, `y` - Pixel position, already clip-tested
    /// * `color` - Raw texel or flat color
    /// * `gouraud` - Interpolated Gouraud color, when shading is enabled
    ///
    /// # Returns
    ///
    /// Cycles charged for the write (0 when nothing is written)
    #[inline(always)]
    pub(in crate::core::vdp1) fn plot_pixel(
        &mut self,
        mode: DrawMode,
        x: i32,
        y: i32,
        color: u16,
        gouraud: Option<u16>,
    ) -> i32 {
        let fbcr = self.regs.fb_control();
        let row = if fbcr.contains(Fbcr::DIE) {
            if ((y & 1) != 0) != fbcr.contains(Fbcr::DIL) {
                return 0;
            }
            ((y >> 1) & 0xFF) as usize
        } else {
            (y & 0xFF) as usize
        };

        if mode.mesh() && ((x ^ y) & 1) != 0 {
            return 0;
        }

        if self.regs.is_8bpp() {
            let byte = if self.regs.is_rot8() {
                ((x & 0x1FF) | ((y & 0x100) << 1)) as usize
            } else {
                (x & 0x3FF) as usize
            };
            let index = row * FB_ROW_WORDS + (byte >> 1);
            let shift = ((byte & 1) ^ 1) << 3;
            let plane = self.fb.draw_mut();
            let old = ((plane[index] >> shift) & 0xFF) as u8;

            let (value, cost) = if mode.msb_on() {
                (old | 0x80, WRITE_8BPP + READ_SURCHARGE)
            } else {
                (color as u8, WRITE_8BPP)
            };
            plane[index] = (plane[index] & !(0xFF << shift)) | ((value as u16) << shift);
            return cost;
        }

        let index = row * FB_ROW_WORDS + (x & 0x1FF) as usize;
        let plane = self.fb.draw_mut();
        let bg = plane[index];

        if mode.msb_on() {
            plane[index] = bg | 0x8000;
            return WRITE_16BPP + READ_SURCHARGE;
        }

        let pixel = match gouraud {
            Some(g) => apply_gouraud(color, g),
            None => color,
        };

        let (value, cost) = match mode.color_calc() {
            ColorCalc::Replace => (pixel, WRITE_16BPP),
            ColorCalc::Shadow => (shadow(bg), WRITE_16BPP + READ_SURCHARGE),
            ColorCalc::HalfLuminance => (half_luminance(pixel), WRITE_16BPP),
            ColorCalc::HalfTransparency => {
                (half_transparency(pixel, bg), WRITE_16BPP + READ_SURCHARGE)
            }
        };
        plane[index] = value;
        cost
    }
}
