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

//! Command-list fixtures built through the public API only

use satvdp::core::system::System;
use satvdp::core::vdp1::REG_PTMR;
use satvdp::core::Vdp1Config;

/// One 16 half-word command record
pub type Record = [u16; 16];

/// RGB color mode in CMDPMOD
#[allow(dead_code)]
pub const MODE_RGB: u16 = 5 << 3;

/// End-of-list record
#[allow(dead_code)]
pub fn end() -> Record {
    let mut record = [0; 16];
    record[0] = 0x8000;
    record
}

/// Flat polygon with corners A, B, C, D
#[allow(dead_code)]
pub fn polygon(color: u16, corners: [(i16, i16); 4]) -> Record {
    let mut record = [0; 16];
    record[0] = 0x0004;
    record[3] = color;
    for (i, (x, y)) in corners.iter().enumerate() {
        record[6 + 2 * i] = *x as u16;
        record[7 + 2 * i] = *y as u16;
    }
    record
}

/// Axis-aligned rectangle as a polygon
#[allow(dead_code)]
pub fn rect(color: u16, x0: i16, y0: i16, x1: i16, y1: i16) -> Record {
    polygon(color, [(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Unscaled sprite at (x, y) reading `width` x `height` texels at word `source`
#[allow(dead_code)]
pub fn normal_sprite(mode: u16, source: u32, width: u16, height: u16, x: i16, y: i16) -> Record {
    let mut record = [0; 16];
    record[2] = mode;
    record[4] = (source >> 2) as u16;
    record[5] = ((width >> 3) << 8) | height;
    record[6] = x as u16;
    record[7] = y as u16;
    record
}

/// Big-endian VRAM image with `records` at address 0 and `data` blocks at their word addresses
#[allow(dead_code)]
pub fn vram_image(records: &[Record], data: &[(u32, &[u16])]) -> Vec<u8> {
    let mut words = vec![0u16; 0x4000];
    for (i, record) in records.iter().enumerate() {
        words[i * 16..i * 16 + 16].copy_from_slice(record);
    }
    for (addr, block) in data {
        let start = *addr as usize;
        words[start..start + block.len()].copy_from_slice(block);
    }
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

/// System with `records` loaded and the plot trigger set to `ptmr`
#[allow(dead_code)]
pub fn create_system_with_list(config: Vdp1Config, records: &[Record], ptmr: u16) -> System {
    let mut system = System::with_config(config);
    system
        .vdp1_mut()
        .load_vram_image(&vram_image(records, &[]))
        .expect("Failed to load VRAM image");
    system.vdp1_mut().write_register(REG_PTMR, ptmr);
    system
}
