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

//! Framebuffer pair, frame change and erase
//!
//! One plane is drawn into while the other is displayed. The frame change
//! happens at the end of v-blank, either every frame (automatic mode) or
//! when requested through FBCR (manual mode). Erasing clears a rectangle of
//! the displayed plane, either all at once during v-blank or one line at a
//! time as lines are read out for display.

use super::registers::{Fbcr, Ptmr, Tvmr};
use super::render::FB_ROW_WORDS;
use super::timing::ERASE_PER_8_PIXELS;
use super::Vdp1;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Half-words per framebuffer plane (512 x 256)
pub const FB_WORDS: usize = 0x20000;

/// The two framebuffer planes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FrameBuffers {
    planes: [Vec<u16>; 2],
    draw_which: usize,
}

impl FrameBuffers {
    /// Create two planes filled with `fill`
    pub fn new(fill: u16) -> Self {
        Self {
            planes: [vec![fill; FB_WORDS], vec![fill; FB_WORDS]],
            draw_which: 0,
        }
    }

    /// Index of the plane being drawn into
    pub fn draw_index(&self) -> usize {
        self.draw_which
    }

    /// Plane being drawn into
    pub fn draw(&self) -> &[u16] {
        &self.planes[self.draw_which]
    }

    /// Plane being drawn into, mutably
    pub fn draw_mut(&mut self) -> &mut [u16] {
        &mut self.planes[self.draw_which]
    }

    /// Plane being displayed
    pub fn display(&self) -> &[u16] {
        &self.planes[self.draw_which ^ 1]
    }

    /// Plane being displayed, mutably
    pub fn display_mut(&mut self) -> &mut [u16] {
        &mut self.planes[self.draw_which ^ 1]
    }

    /// Exchange the draw and display planes
    pub fn swap(&mut self) {
        self.draw_which ^= 1;
    }

    /// Whether both planes have the expected size
    pub fn is_well_formed(&self) -> bool {
        self.draw_which < 2 && self.planes.iter().all(|plane| plane.len() == FB_WORDS)
    }

    /// Point the draw plane at plane 0
    pub fn reset_selection(&mut self) {
        self.draw_which = 0;
    }
}

/// Erase rectangle latched at frame change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct EraseParams {
    /// 8bpp rotation layout
    pub rot8: bool,
    /// First line
    pub y_start: u32,
    /// First half-word column
    pub x_start: u32,
    /// Last line (inclusive)
    pub y_end: u32,
    /// Column bound (exclusive, rounded up to the write width)
    pub x_bound: u32,
    /// Fill value (EWDR)
    pub fill: u16,
}

impl EraseParams {
    fn x_mask(&self) -> u32 {
        if self.rot8 {
            0xFF
        } else {
            0x1FF
        }
    }

    /// Plane index of column `x` on line `y`
    fn index(&self, x: u32, y: u32) -> usize {
        let mut row = ((y & 0xFF) as usize) * FB_ROW_WORDS;
        if self.rot8 {
            row += (y & 0x100) as usize;
        }
        row + (x & self.x_mask()) as usize
    }
}

/// Blanking, frame change and erase state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DisplayState {
    /// Current h-blank status
    pub hblank: bool,
    /// Current v-blank status
    pub vblank: bool,
    /// A v-blank edge waits for the next h-blank to take effect
    pub vblank_change_pending: bool,
    /// Manual frame change or erase requested through FBCR
    pub manual_pending: bool,
    /// Erase on the next v-blank (rotation modes)
    pub vblank_erase_pending: bool,
    /// V-blank erase running since `vblank_erase_start`
    pub vblank_erase_active: bool,
    /// Timestamp the v-blank erase started
    pub vblank_erase_start: i64,
    /// Latched erase rectangle
    pub erase: EraseParams,
    /// Next line of the per-line erase
    pub erase_line: Option<u32>,
}

/// Rotation readout walk in 23.9 fixed point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationWalk {
    /// Starting X
    pub x: u32,
    /// Starting Y
    pub y: u32,
    /// X increment per output pixel
    pub x_inc: u32,
    /// Y increment per output pixel
    pub y_inc: u32,
}

impl Vdp1 {
    /// Deliver an h-blank/v-blank status change
    ///
    /// A v-blank edge takes effect at the next h-blank start. Entering
    /// v-blank starts a v-blank erase if one is due; leaving it runs that
    /// erase and then performs the frame change.
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Time of the change in drawing cycles
    /// * `hblank` - New h-blank status
    /// * `vblank` - New v-blank status
    pub fn set_hb_vb(&mut self, timestamp: i64, hblank: bool, vblank: bool) {
        let old_hblank = self.display.hblank;
        let old_vblank = self.display.vblank;
        self.display.hblank = hblank;
        self.display.vblank = vblank;

        if self.display.vblank_change_pending && hblank && !old_hblank {
            self.display.vblank_change_pending = false;

            if vblank {
                self.enter_vblank(timestamp);
            } else {
                self.leave_vblank(timestamp);
            }
        }

        self.display.vblank_change_pending |= old_vblank != vblank;
    }

    fn enter_vblank(&mut self, timestamp: i64) {
        if self.regs.tv_mode().contains(Tvmr::VBE) || self.display.vblank_erase_pending {
            log::debug!(
                "VDP1 v-blank erase start of framebuffer {}",
                self.fb.draw_index() ^ 1
            );
            self.display.vblank_erase_pending = false;
            self.display.vblank_erase_active = true;
            self.display.vblank_erase_start = timestamp;
        }
    }

    fn leave_vblank(&mut self, timestamp: i64) {
        if self.display.vblank_erase_active {
            self.run_vblank_erase(timestamp - self.display.vblank_erase_start);
            self.display.vblank_erase_active = false;
        }

        let fbcr = self.regs.fb_control();
        let manual = fbcr.contains(Fbcr::FCM);
        let pending = self.display.manual_pending;

        if !manual || (pending && fbcr.contains(Fbcr::FCT)) {
            self.change_frame(timestamp);
        }

        self.display.erase_line = None;
        if !manual || (pending && !fbcr.contains(Fbcr::FCT)) {
            if self.regs.tv_mode().contains(Tvmr::ROTATE) {
                self.display.vblank_erase_pending = true;
            } else {
                self.display.erase_line = Some(self.display.erase.y_start);
            }
        }

        self.display.manual_pending = false;
    }

    /// Erase the displayed plane with a budget of `count` cycles
    fn run_vblank_erase(&mut self, mut count: i64) {
        let erase = self.display.erase;
        let plane = self.fb.display_mut();
        let mut y = erase.y_start;

        'lines: loop {
            let mut x = erase.x_start;
            count -= ERASE_PER_8_PIXELS;

            loop {
                for _ in 0..8 {
                    plane[erase.index(x, y)] = erase.fill;
                    x += 1;
                }

                count -= ERASE_PER_8_PIXELS;
                if count <= 0 {
                    log::warn!("VDP1 v-blank erase ran out of time at line {}", y);
                    break 'lines;
                }
                if x >= erase.x_bound {
                    break;
                }
            }

            y += 1;
            if y > erase.y_end {
                break;
            }
        }
    }

    /// Exchange planes, abort drawing and latch the next erase
    fn change_frame(&mut self, timestamp: i64) {
        if self.processor.drawing_active {
            log::warn!("VDP1 drawing aborted by framebuffer swap");
            self.processor.drawing_active = false;
            self.processor.snapshot = None;
        }

        self.fb.swap();
        log::debug!(
            "VDP1 displayed framebuffer changed to {}",
            self.fb.draw_index() ^ 1
        );

        // CEF moves to BEF
        self.regs.edsr >>= 1;
        self.regs.lopr = (self.processor.cur_addr >> 2) as u16;

        self.display.erase = EraseParams {
            rot8: self.regs.is_rot8(),
            y_start: (self.regs.ewlr & 0x1FF) as u32,
            x_start: (((self.regs.ewlr >> 9) & 0x3F) as u32) << 3,
            y_end: (self.regs.ewrr & 0x1FF) as u32,
            x_bound: (((self.regs.ewrr >> 9) & 0x7F) as u32) << 3,
            fill: self.regs.ewdr,
        };

        if self.regs.plot_trigger().contains(Ptmr::AUTO) {
            self.start_drawing();
            self.advance(timestamp);
        }
    }

    /// Read one line of the displayed plane
    ///
    /// Also performs one step of the per-line erase.
    ///
    /// # Arguments
    ///
    /// * `line` - Display line
    /// * `out` - Destination; its length is the number of pixels read
    /// * `rotation` - Readout walk for the rotation modes
    ///
    /// # Returns
    ///
    /// `true` if `out` holds packed 8bpp pixel pairs rather than 16bpp pixels
    pub fn read_display_line(
        &mut self,
        line: u32,
        out: &mut [u16],
        rotation: Option<RotationWalk>,
    ) -> bool {
        let mut packed = false;
        let tvmr = self.regs.tv_mode();
        let plane = self.fb.display();

        if tvmr.contains(Tvmr::ROTATE) {
            let mut walk = rotation.unwrap_or_default();
            let bpp8 = tvmr.contains(Tvmr::BPP8);

            for pixel in out.iter_mut() {
                let fb_x = walk.x >> 9;
                let fb_y = walk.y >> 9;

                *pixel = if bpp8 {
                    if (fb_x | fb_y) & !0x1FF != 0 {
                        0
                    } else {
                        let byte = ((fb_x & 0x1FF) | ((fb_y & 0x100) << 1)) as usize;
                        let word = plane[((fb_y & 0xFF) as usize) * FB_ROW_WORDS + (byte >> 1)];
                        0xFF00 | ((word >> (((byte & 1) ^ 1) << 3)) & 0xFF)
                    }
                } else if (fb_x & !0x1FF) | (fb_y & !0xFF) != 0 {
                    0
                } else {
                    plane[(fb_y as usize) * FB_ROW_WORDS + fb_x as usize]
                };

                walk.x = walk.x.wrapping_add(walk.x_inc);
                walk.y = walk.y.wrapping_add(walk.y_inc);
            }
        } else {
            let row = ((line & 0xFF) as usize) * FB_ROW_WORDS;
            packed = tvmr.contains(Tvmr::BPP8);
            for (i, pixel) in out.iter_mut().enumerate() {
                *pixel = plane[row + (i % FB_ROW_WORDS)];
            }
        }

        self.erase_next_line();
        packed
    }

    /// One step of the per-line erase, two half-words per write
    fn erase_next_line(&mut self) {
        let erase = self.display.erase;
        let Some(y) = self.display.erase_line.filter(|&y| y <= erase.y_end) else {
            return;
        };

        let plane = self.fb.display_mut();
        let mut x = erase.x_start;
        loop {
            for _ in 0..2 {
                plane[erase.index(x, y)] = erase.fill;
                x += 1;
            }
            if x >= erase.x_bound {
                break;
            }
        }

        self.display.erase_line = Some(y + 1);
    }

    /// Rebase stored timestamps by `delta`
    ///
    /// Used by schedulers that restart their time base every frame.
    pub fn adjust_timestamps(&mut self, delta: i64) {
        self.processor.last_ts += delta;
        if self.display.vblank_erase_active {
            self.display.vblank_erase_start += delta;
        }
    }
}
