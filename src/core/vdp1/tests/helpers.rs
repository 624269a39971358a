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

//! Shared test helpers

use super::super::*;

/// Pure red, RGB pixel
pub const RED: u16 = 0x801F;
/// Pure blue, RGB pixel
pub const BLUE: u16 = 0xFC00;

pub const OP_NORMAL_SPRITE: u16 = 0x0;
pub const OP_SCALED_SPRITE: u16 = 0x1;
pub const OP_POLYGON: u16 = 0x4;
pub const OP_POLYLINE: u16 = 0x5;
pub const OP_LINE: u16 = 0x6;
pub const OP_USER_CLIP: u16 = 0x8;
pub const OP_SYSTEM_CLIP: u16 = 0x9;
pub const OP_LOCAL_COORD: u16 = 0xA;

pub const JUMP_ASSIGN: u16 = 0x1000;
pub const JUMP_CALL: u16 = 0x2000;
pub const JUMP_RETURN: u16 = 0x3000;
pub const SKIP: u16 = 0x4000;

/// CMDPMOD: RGB texture
pub const MODE_RGB: u16 = 5 << 3;
/// CMDPMOD: draw inside the user rectangle only
pub const MODE_INSIDE_USER: u16 = 0x0400;
/// CMDPMOD: draw outside the user rectangle only
pub const MODE_OUTSIDE_USER: u16 = 0x0600;

/// Command record builder
#[derive(Debug, Clone, Copy, Default)]
pub struct Cmd(pub [u16; 16]);

impl Cmd {
    pub fn new(opcode: u16) -> Self {
        let mut words = [0u16; 16];
        words[0] = opcode;
        Cmd(words)
    }

    pub fn end() -> Self {
        Cmd::new(0x8000)
    }

    pub fn control(mut self, bits: u16) -> Self {
        self.0[0] |= bits;
        self
    }

    /// Branch target as a VRAM word address
    pub fn link(mut self, addr: u32) -> Self {
        self.0[1] = (addr >> 2) as u16;
        self
    }

    pub fn mode(mut self, mode: u16) -> Self {
        self.0[2] = mode;
        self
    }

    pub fn color(mut self, color: u16) -> Self {
        self.0[3] = color;
        self
    }

    /// Texture base as a VRAM word address
    pub fn source(mut self, addr: u32) -> Self {
        self.0[4] = (addr >> 2) as u16;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.0[5] = ((width / 8) << 8) | height;
        self
    }

    pub fn vertex(mut self, index: usize, x: i32, y: i32) -> Self {
        self.0[6 + index * 2] = x as u16;
        self.0[7 + index * 2] = y as u16;
        self
    }

    /// Gouraud table as a VRAM word address
    pub fn gouraud(mut self, addr: u32) -> Self {
        self.0[0xE] = (addr >> 2) as u16;
        self
    }
}

/// Line command from A to B
pub fn line(color: u16, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) -> Cmd {
    Cmd::new(OP_LINE)
        .color(color)
        .vertex(0, x0, y0)
        .vertex(1, x1, y1)
}

/// Flat polygon with corners A, B, C, D
pub fn polygon(color: u16, corners: [(i32, i32); 4]) -> Cmd {
    corners
        .iter()
        .enumerate()
        .fold(Cmd::new(OP_POLYGON).color(color), |cmd, (i, &(x, y))| {
            cmd.vertex(i, x, y)
        })
}

/// Axis-aligned flat polygon covering `(x0, y0)..=(x1, y1)`
pub fn rect(color: u16, x0: i32, y0: i32, x1: i32, y1: i32) -> Cmd {
    polygon(color, [(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Write a record at VRAM word address `addr`
pub fn write_command(vdp1: &mut Vdp1, addr: u32, cmd: Cmd) {
    write_words(vdp1, addr, &cmd.0);
}

/// Write consecutive records starting at address 0
pub fn write_list(vdp1: &mut Vdp1, cmds: &[Cmd]) {
    for (i, cmd) in cmds.iter().enumerate() {
        write_command(vdp1, i as u32 * CommandRecord::WORDS, *cmd);
    }
}

/// Write half-words at VRAM word address `addr`
pub fn write_words(vdp1: &mut Vdp1, addr: u32, words: &[u16]) {
    for (i, &word) in words.iter().enumerate() {
        vdp1.write16((addr + i as u32) << 1, word);
    }
}

/// Start drawing and advance until the list finishes
///
/// # Returns
///
/// The timestamp of the last `advance` call
pub fn run_to_completion(vdp1: &mut Vdp1, start: i64) -> i64 {
    vdp1.write_register(REG_PTMR, 1);

    let mut ts = start;
    for _ in 0..1_000_000 {
        ts = vdp1.advance(ts);
        if !vdp1.is_drawing() {
            return ts;
        }
    }
    panic!("command list did not finish");
}

/// Fresh VDP1 that has drawn `cmds`
pub fn draw(cmds: &[Cmd]) -> Vdp1 {
    let mut vdp1 = Vdp1::new();
    write_list(&mut vdp1, cmds);
    run_to_completion(&mut vdp1, 0);
    vdp1
}

/// Number of draw-plane pixels equal to `value`
pub fn count_pixels(vdp1: &Vdp1, value: u16) -> usize {
    vdp1.draw_plane().iter().filter(|&&p| p == value).count()
}

/// Draw-plane coordinates of every pixel equal to `value`
pub fn pixels_with(vdp1: &Vdp1, value: u16) -> Vec<(usize, usize)> {
    vdp1.draw_plane()
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p == value)
        .map(|(i, _)| (i % FB_ROW_WORDS, i / FB_ROW_WORDS))
        .collect()
}

/// Walk the blanking signals through one v-blank period
///
/// The v-blank erase, if any, gets `erase_budget` cycles.
pub fn pass_vblank(vdp1: &mut Vdp1, ts: i64, erase_budget: i64) {
    vdp1.set_hb_vb(ts, false, true);
    vdp1.set_hb_vb(ts, true, true);
    vdp1.set_hb_vb(ts + erase_budget, false, false);
    vdp1.set_hb_vb(ts + erase_budget, true, false);
}
