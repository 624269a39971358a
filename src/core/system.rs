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

//! System integration module
//!
//! A minimal scanline scheduler standing in for the rest of the console.
//! It drives [`Vdp1::advance`] at the times the processor asks for,
//! delivers h-blank/v-blank edges, reads out each visible line and
//! forwards the drawing-end pulse to the interrupt latch.
//!
//! # Frame Layout
//!
//! ```text
//! line 0..224    visible, h-blank starts HBLANK_START cycles into the line
//! line 224..263  v-blank
//! ```

use super::config::Vdp1Config;
use super::interrupt::{interrupts, InterruptController};
use super::vdp1::Vdp1;

/// Lines per frame (NTSC)
pub const LINES_PER_FRAME: u32 = 263;

/// First v-blank line
pub const VISIBLE_LINES: u32 = 224;

/// Drawing cycles per line
pub const CYCLES_PER_LINE: i64 = 1820;

/// Cycle within a line at which h-blank begins
pub const HBLANK_START: i64 = 1400;

/// Drawing cycles per frame
pub const CYCLES_PER_FRAME: i64 = CYCLES_PER_LINE * LINES_PER_FRAME as i64;

/// Pixels captured per visible line
pub const DISPLAY_WIDTH: usize = 320;

/// Scanline harness around one VDP1
///
/// # Example
///
/// ```
/// use satvdp::core::System;
/// use satvdp::core::vdp1::REG_PTMR;
///
/// let mut system = System::new();
/// system.vdp1_mut().write16(0, 0x8000);
/// system.vdp1_mut().write_register(REG_PTMR, 1);
///
/// system.run_frame();
/// assert_eq!(system.frame_count(), 1);
/// assert!(!system.vdp1().is_drawing());
/// ```
pub struct System {
    /// Drawing processor
    vdp1: Vdp1,
    /// Interrupt latch receiving the drawing-end pulse
    interrupts: InterruptController,
    /// Time within the current frame
    timestamp: i64,
    /// Time the VDP1 asked to be advanced at
    next_event: i64,
    /// Completed frames
    frame_count: u64,
    /// Last frame's visible lines, `DISPLAY_WIDTH` half-words each
    display: Vec<u16>,
    /// Whether `display` holds packed 8bpp pairs
    display_8bpp: bool,
}

impl System {
    /// Create a system with the default configuration
    pub fn new() -> Self {
        Self::with_config(Vdp1Config::default())
    }

    /// Create a system around a VDP1 built from `config`
    pub fn with_config(config: Vdp1Config) -> Self {
        Self {
            vdp1: Vdp1::with_config(config),
            interrupts: InterruptController::new(),
            timestamp: 0,
            next_event: 0,
            frame_count: 0,
            display: vec![0; DISPLAY_WIDTH * VISIBLE_LINES as usize],
            display_8bpp: false,
        }
    }

    /// Soft reset: registers and processor reset, memory kept
    pub fn reset(&mut self) {
        self.vdp1.reset(false);
        self.interrupts = InterruptController::new();
        self.timestamp = 0;
        self.next_event = 0;
    }

    /// Run one full frame of lines
    ///
    /// Ends by rebasing all timestamps so each frame starts at zero.
    pub fn run_frame(&mut self) {
        for line in 0..LINES_PER_FRAME {
            let line_start = line as i64 * CYCLES_PER_LINE;
            let vblank = line >= VISIBLE_LINES;

            if line == 0 {
                self.interrupts.request(interrupts::VBLANK_OUT);
            } else if line == VISIBLE_LINES {
                self.interrupts.request(interrupts::VBLANK_IN);
            }
            self.blank_edge(line_start, false, vblank);

            self.run_until(line_start + HBLANK_START);
            self.interrupts.request(interrupts::HBLANK_IN);
            self.blank_edge(line_start + HBLANK_START, true, vblank);

            if !vblank {
                let start = line as usize * DISPLAY_WIDTH;
                let out = &mut self.display[start..start + DISPLAY_WIDTH];
                self.display_8bpp = self.vdp1.read_display_line(line, out, None);
            }

            self.run_until(line_start + CYCLES_PER_LINE);
        }

        self.vdp1.adjust_timestamps(-CYCLES_PER_FRAME);
        self.next_event -= CYCLES_PER_FRAME;
        self.timestamp -= CYCLES_PER_FRAME;
        self.frame_count += 1;
        log::trace!("Frame {} complete", self.frame_count);
    }

    /// Run `count` frames
    pub fn run_frames(&mut self, count: u32) {
        for _ in 0..count {
            self.run_frame();
        }
    }

    /// Advance the VDP1 through every event up to `target`
    fn run_until(&mut self, target: i64) {
        while self.next_event <= target {
            self.next_event = self.vdp1.advance(self.next_event);
            self.poll_draw_end();
        }
        self.timestamp = target;
    }

    /// Deliver a blanking edge and resync the VDP1 event time
    ///
    /// A frame change may start drawing, so the VDP1 is advanced right away.
    fn blank_edge(&mut self, timestamp: i64, hblank: bool, vblank: bool) {
        self.run_until(timestamp);
        self.vdp1.set_hb_vb(timestamp, hblank, vblank);
        self.next_event = self.vdp1.advance(timestamp);
        self.poll_draw_end();
    }

    fn poll_draw_end(&mut self) {
        if self.vdp1.take_draw_end_irq() {
            self.interrupts.request(interrupts::SPRITE_DRAW_END);
        }
    }

    /// Completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Overwrite the frame counter (save state restore)
    pub fn set_frame_count(&mut self, frame_count: u64) {
        self.frame_count = frame_count;
    }

    /// Current time within the frame
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Visible lines captured during the last frame
    ///
    /// # Returns
    ///
    /// `DISPLAY_WIDTH * VISIBLE_LINES` half-words and whether they hold
    /// packed 8bpp pixel pairs
    pub fn display(&self) -> (&[u16], bool) {
        (&self.display, self.display_8bpp)
    }

    /// Drawing processor
    pub fn vdp1(&self) -> &Vdp1 {
        &self.vdp1
    }

    /// Drawing processor (mutable)
    pub fn vdp1_mut(&mut self) -> &mut Vdp1 {
        &mut self.vdp1
    }

    /// Interrupt latch
    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    /// Interrupt latch (mutable)
    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vdp1::{Edsr, REG_EDSR, REG_EWDR, REG_EWRR, REG_FBCR, REG_PTMR};

    #[test]
    fn test_system_initialization() {
        let system = System::new();
        assert_eq!(system.frame_count(), 0);
        assert_eq!(system.timestamp(), 0);
        assert!(!system.vdp1().is_drawing());
    }

    #[test]
    fn test_frame_rebases_timestamps() {
        let mut system = System::new();
        system.run_frames(3);

        assert_eq!(system.frame_count(), 3);
        assert_eq!(system.timestamp(), 0);
    }

    #[test]
    fn test_draw_end_reaches_interrupt_latch() {
        let mut system = System::new();
        system.vdp1_mut().write16(0, 0x8000);
        system.vdp1_mut().write_register(REG_PTMR, 1);

        system.run_frame();

        let status = system.interrupts().read_status();
        assert_ne!(status & interrupts::SPRITE_DRAW_END, 0);
        assert_ne!(status & interrupts::VBLANK_IN, 0);
        assert_ne!(status & interrupts::HBLANK_IN, 0);
    }

    #[test]
    fn test_auto_start_draws_every_frame() {
        let mut system = System::new();
        system.vdp1_mut().write16(0, 0x8000);
        system.vdp1_mut().write_register(REG_PTMR, 2);

        system.run_frame();
        system.interrupts_mut().acknowledge(interrupts::ALL);
        system.run_frame();

        let status = system.interrupts().read_status();
        assert_ne!(status & interrupts::SPRITE_DRAW_END, 0);
        // BEF holds the previous frame's list end, CEF the redraw after the swap
        let edsr = Edsr::from_bits_truncate(system.vdp1().read_register(REG_EDSR) as u8);
        assert!(edsr.contains(Edsr::BEF));
        assert!(edsr.contains(Edsr::CEF));
    }

    #[test]
    fn test_automatic_mode_erases_displayed_plane() {
        let mut system = System::new();
        let vdp1 = system.vdp1_mut();
        vdp1.write_register(REG_FBCR, 0);
        vdp1.write_register(REG_EWDR, 0x1234);
        // Lower right corner (x = 40 * 8, y = 223)
        vdp1.write_register(REG_EWRR, (40 << 9) | 223);

        // One frame to swap and arm the erase, one to run it
        system.run_frames(2);

        // Each line is read out before it is erased
        let (display, packed) = system.display();
        assert!(!packed);
        assert_eq!(display[100 * DISPLAY_WIDTH + 10], 0xFFFF);

        assert_eq!(system.vdp1().display_plane_pixel(5, 5), 0x1234);
        assert_eq!(system.vdp1().display_plane_pixel(319, 223), 0x1234);
        assert_eq!(system.vdp1().display_plane_pixel(330, 5), 0xFFFF);
    }
}
