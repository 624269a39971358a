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

//! VDP1 (sprite drawing processor) implementation
//!
//! This module implements the drawing half of the Saturn's video hardware.
//! The VDP1 is responsible for:
//! - Executing a command list stored in its 512 KiB VRAM
//! - Rasterizing sprites, polygons, polylines and lines into a framebuffer
//! - Double-buffering two framebuffer planes, swapped at v-blank
//! - Erasing the displayed plane ahead of the next frame
//!
//! # Bus Layout
//!
//! | Offset | Region |
//! |---|---|
//! | 0x000000-0x07FFFF | VRAM (command lists, textures, lookup tables) |
//! | 0x080000-0x0FFFFF | Draw framebuffer plane |
//! | 0x100000-0x10001F | Registers |
//!
//! # Timing
//!
//! Drawing is budgeted in cycles. The scheduler calls [`Vdp1::advance`] with
//! the current timestamp; the processor runs until the credited cycles are
//! spent and returns when it wants to be called again. A primitive that does
//! not fit in the budget is suspended in a [`ResumableSnapshot`] and picked
//! up on a later call.
//!
//! # Framebuffer Format
//!
//! Each plane is 512x256 half-words. In 16bpp mode bit 15 marks an RGB pixel
//! (5-5-5, red in the low bits); otherwise the value is a palette index. In
//! 8bpp mode each half-word holds two pixels, high byte first.

mod clip;
mod commands;
mod framebuffer;
mod processor;
mod registers;
mod render;
mod snapshot;
#[cfg(test)]
mod tests;
mod timing;
mod types;

pub use clip::{ClipState, PixelClip};
pub use framebuffer::{DisplayState, EraseParams, FrameBuffers, RotationWalk, FB_WORDS};
pub use processor::{Phase, ProcessorState};
pub use registers::*;
pub use render::{
    apply_gouraud, edge_span, half_luminance, half_transparency, shadow, EdgeStepper,
    GouraudStepper, LineInner, LineParams, LinearStepper, Texel, TextureParams, FB_ROW_WORDS,
};
pub use snapshot::{
    LineSnapshot, PolygonSnapshot, QuadWalk, ResumableSnapshot, SpriteRows, SpriteSnapshot,
};
pub use types::*;

use crate::core::config::Vdp1Config;
use crate::core::error::{EmulatorError, Result};
use crate::core::save_state::Vdp1State;

/// VRAM size in half-words
pub const VRAM_WORDS: usize = 0x40000;

/// VRAM size in bytes
pub const VRAM_BYTES: usize = VRAM_WORDS * 2;

/// Mask applied to every VRAM half-word address
pub const VRAM_MASK: u32 = 0x3FFFF;

/// Bus offset of the framebuffer window
const FB_WINDOW: u32 = 0x80000;

/// Bus offset of the register window
const REG_WINDOW: u32 = 0x100000;

/// VDP1 state
///
/// Owns VRAM, both framebuffer planes, the register file and the command
/// processor. All state lives here; there is no global hardware state.
///
/// # Examples
///
/// ```
/// use satvdp::core::Vdp1;
///
/// let mut vdp1 = Vdp1::new();
///
/// // Command list: a single end record
/// vdp1.write16(0x000000, 0x8000);
///
/// // PTMR = 1: start drawing
/// vdp1.write16(0x100004, 0x0001);
/// vdp1.advance(100);
///
/// assert!(!vdp1.is_drawing());
/// assert!(vdp1.take_draw_end_irq());
/// assert_eq!(vdp1.read16(0x100010) & 0x2, 0x2); // EDSR.CEF
/// ```
pub struct Vdp1 {
    /// Timing configuration
    pub(in crate::core::vdp1) config: Vdp1Config,

    /// VRAM: 0x40000 half-words holding command lists, textures and tables
    pub(in crate::core::vdp1) vram: Vec<u16>,

    /// Draw and display planes
    pub(in crate::core::vdp1) fb: FrameBuffers,

    /// Register file
    pub(in crate::core::vdp1) regs: Registers,

    /// Clip rectangles and local origin
    pub(in crate::core::vdp1) clip: ClipState,

    /// Command processor
    pub(in crate::core::vdp1) processor: ProcessorState,

    /// Blanking, frame change and erase
    pub(in crate::core::vdp1) display: DisplayState,
}

impl Vdp1 {
    /// Create a powered-up VDP1 with the default configuration
    pub fn new() -> Self {
        Self::with_config(Vdp1Config::default())
    }

    /// Create a powered-up VDP1
    ///
    /// VRAM holds the power-on pattern and both planes are filled with 0xFFFF.
    /// Non-positive timing values in `config` are clamped to 1.
    pub fn with_config(config: Vdp1Config) -> Self {
        let mut vdp1 = Self {
            config: config.sanitized(),
            vram: vec![0; VRAM_WORDS],
            fb: FrameBuffers::new(0xFFFF),
            regs: Registers::default(),
            clip: ClipState::default(),
            processor: ProcessorState::default(),
            display: DisplayState::default(),
        };
        vdp1.reset(true);
        vdp1
    }

    /// Reset the VDP1
    ///
    /// A power-up reset also restores memory and the clip state; a soft
    /// reset keeps VRAM, both planes and the clip rectangles.
    pub fn reset(&mut self, powering_up: bool) {
        if powering_up {
            for (i, word) in self.vram.iter_mut().enumerate() {
                *word = if i & 0xF == 0 {
                    0x8000
                } else if i & 0x1 != 0 {
                    0x5555
                } else {
                    0xAAAA
                };
            }
            self.fb = FrameBuffers::new(0xFFFF);
            self.clip = ClipState::default();
            self.regs.ewdr = 0;
            self.regs.ewlr = 0;
            self.regs.ewrr = 0;
        }

        self.fb.reset_selection();
        self.regs.tvmr = 0;
        self.regs.fbcr = 0;
        self.regs.ptmr = 0;
        self.regs.edsr = 0;
        self.regs.lopr = 0;

        let last_ts = self.processor.last_ts;
        self.processor = ProcessorState {
            last_ts,
            ..Default::default()
        };

        let (hblank, vblank) = (self.display.hblank, self.display.vblank);
        self.display = DisplayState {
            hblank,
            vblank,
            ..Default::default()
        };
    }

    /// Timing configuration
    pub fn config(&self) -> &Vdp1Config {
        &self.config
    }

    /// Replace the timing configuration, clamping non-positive values to 1
    pub fn set_config(&mut self, config: Vdp1Config) {
        self.config = config.sanitized();
    }

    /// Whether a command list is being executed
    pub fn is_drawing(&self) -> bool {
        self.processor.drawing_active
    }

    /// Collect the draw-end interrupt pulse
    ///
    /// Returns `true` once per completed command list.
    pub fn take_draw_end_irq(&mut self) -> bool {
        std::mem::take(&mut self.processor.draw_end_irq)
    }

    /// Register file
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Clip rectangles and local origin
    pub fn clip_state(&self) -> &ClipState {
        &self.clip
    }

    /// VRAM word address of the current command record
    pub fn command_address(&self) -> u32 {
        self.processor.cur_addr
    }

    /// Saved return address, if a call is outstanding
    pub fn return_address(&self) -> Option<u32> {
        self.processor.ret_addr
    }

    /// Suspended primitive, if any
    pub fn snapshot(&self) -> Option<&ResumableSnapshot> {
        self.processor.snapshot.as_ref()
    }

    /// Cycles left in the budget
    pub fn cycle_counter(&self) -> i32 {
        self.processor.cycle_counter
    }

    /// VRAM contents
    pub fn vram(&self) -> &[u16] {
        &self.vram
    }

    /// Plane currently drawn into
    pub fn draw_plane(&self) -> &[u16] {
        self.fb.draw()
    }

    /// Plane currently displayed
    pub fn display_plane(&self) -> &[u16] {
        self.fb.display()
    }

    /// 16bpp pixel of the draw plane
    pub fn draw_plane_pixel(&self, x: usize, y: usize) -> u16 {
        self.fb.draw()[(y & 0xFF) * FB_ROW_WORDS + (x & 0x1FF)]
    }

    /// 16bpp pixel of the display plane
    pub fn display_plane_pixel(&self, x: usize, y: usize) -> u16 {
        self.fb.display()[(y & 0xFF) * FB_ROW_WORDS + (x & 0x1FF)]
    }

    /// Load a big-endian VRAM image starting at address 0
    ///
    /// Images shorter than VRAM leave the remainder untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidImageSize` if the image is larger than VRAM or has
    /// an odd length.
    pub fn load_vram_image(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > VRAM_BYTES || image.len() % 2 != 0 {
            return Err(EmulatorError::InvalidImageSize {
                expected: VRAM_BYTES,
                got: image.len(),
            });
        }

        for (word, bytes) in self.vram.iter_mut().zip(image.chunks_exact(2)) {
            *word = u16::from_be_bytes([bytes[0], bytes[1]]);
        }
        log::info!("Loaded {} bytes into VDP1 VRAM", image.len());
        Ok(())
    }

    /// Framebuffer window address after the 8bpp rotation remap
    fn fb_address(&self, addr: u32) -> u32 {
        if self.regs.is_rot8() {
            (addr & 0x1FF) | ((addr << 1) & 0x3FC00) | ((addr >> 8) & 0x200)
        } else {
            addr
        }
    }

    /// Read a half-word from the VDP1 bus
    ///
    /// # Arguments
    ///
    /// * `addr` - Offset within the VDP1 window (bit 0 ignored)
    pub fn read16(&self, addr: u32) -> u16 {
        let addr = addr & 0x1FFFFE;

        if addr < FB_WINDOW {
            return self.vram[(addr >> 1) as usize];
        }

        if addr < REG_WINDOW {
            let fba = self.fb_address(addr);
            return self.fb.draw()[((fba >> 1) & 0x1FFFF) as usize];
        }

        self.read_register((addr - REG_WINDOW) >> 1)
    }

    /// Read a byte from the VDP1 bus
    pub fn read8(&self, addr: u32) -> u8 {
        let word = self.read16(addr);
        (word >> (((addr & 1) ^ 1) << 3)) as u8
    }

    /// Write a half-word to the VDP1 bus
    ///
    /// Callers advance the processor to the current time first so that
    /// register writes take effect at the right moment.
    pub fn write16(&mut self, addr: u32, value: u16) {
        let addr = addr & 0x1FFFFE;

        if addr < FB_WINDOW {
            self.vram[(addr >> 1) as usize] = value;
            return;
        }

        if addr < REG_WINDOW {
            let fba = self.fb_address(addr);
            self.fb.draw_mut()[((fba >> 1) & 0x1FFFF) as usize] = value;
            return;
        }

        self.write_register((addr - REG_WINDOW) >> 1, value);
    }

    /// Write a byte to the VDP1 bus
    ///
    /// Byte writes to the register window act as half-word writes with the
    /// byte on both lanes.
    pub fn write8(&mut self, addr: u32, value: u8) {
        let addr = addr & 0x1FFFFF;
        let shift = ((addr & 1) ^ 1) << 3;
        let merge = |word: u16| (word & !(0xFF << shift)) | ((value as u16) << shift);

        if addr < FB_WINDOW {
            let index = (addr >> 1) as usize;
            self.vram[index] = merge(self.vram[index]);
            return;
        }

        if addr < REG_WINDOW {
            let fba = self.fb_address(addr);
            let index = ((fba >> 1) & 0x1FFFF) as usize;
            let plane = self.fb.draw_mut();
            plane[index] = merge(plane[index]);
            return;
        }

        log::warn!("VDP1 8-bit register write to 0x{:06X}", addr);
        self.write_register((addr - REG_WINDOW) >> 1, u16::from_be_bytes([value, value]));
    }

    /// Write register `index` (half-word offset into the register window)
    pub fn write_register(&mut self, index: u32, value: u16) {
        log::trace!("VDP1 register write: 0x{:02X} = 0x{:04X}", index << 1, value);

        match index {
            REG_TVMR => self.regs.tvmr = (value & 0xF) as u8,
            REG_FBCR => {
                self.regs.fbcr = (value & 0x1F) as u8;
                self.display.manual_pending |= Fbcr::from_bits_truncate(value as u8)
                    .contains(Fbcr::FCM);
            }
            REG_PTMR => {
                self.regs.ptmr = (value & 0x3) as u8;
                if Ptmr::from_bits_truncate(value as u8).contains(Ptmr::START) {
                    self.start_drawing();
                }
            }
            REG_EWDR => self.regs.ewdr = value,
            REG_EWLR => self.regs.ewlr = value & 0x7FFF,
            REG_EWRR => self.regs.ewrr = value,
            REG_ENDR => self.force_terminate(),
            _ => log::warn!(
                "VDP1 unknown register write: 0x{:02X} = 0x{:04X}",
                index << 1,
                value
            ),
        }
    }

    /// Read register `index` (half-word offset into the register window)
    pub fn read_register(&self, index: u32) -> u16 {
        match index {
            REG_EDSR => self.regs.edsr as u16,
            REG_LOPR => self.regs.lopr,
            REG_COPR => (self.processor.cur_addr >> 2) as u16,
            REG_MODR => self.regs.mode_status(),
            _ => {
                log::warn!("VDP1 unknown register read: 0x{:02X}", index << 1);
                0
            }
        }
    }

    /// Capture the complete VDP1 state
    pub fn save_state(&self) -> Vdp1State {
        Vdp1State {
            vram: self.vram.clone(),
            framebuffers: self.fb.clone(),
            registers: self.regs.clone(),
            clip: self.clip.clone(),
            processor: self.processor.clone(),
            display: self.display.clone(),
        }
    }

    /// Restore a state captured by [`Vdp1::save_state`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidImageSize` if VRAM or a framebuffer plane has the
    /// wrong size.
    pub fn load_state(&mut self, state: Vdp1State) -> Result<()> {
        if state.vram.len() != VRAM_WORDS {
            return Err(EmulatorError::InvalidImageSize {
                expected: VRAM_BYTES,
                got: state.vram.len() * 2,
            });
        }
        if !state.framebuffers.is_well_formed() {
            return Err(EmulatorError::InvalidImageSize {
                expected: FB_WORDS * 2,
                got: state.framebuffers.draw().len() * 2,
            });
        }

        self.vram = state.vram;
        self.fb = state.framebuffers;
        self.regs = state.registers;
        self.clip = state.clip;
        self.processor = state.processor;
        self.display = state.display;
        Ok(())
    }
}

impl Default for Vdp1 {
    fn default() -> Self {
        Self::new()
    }
}
