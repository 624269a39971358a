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

//! Custom assertions for VDP1 testing

use satvdp::core::interrupt::InterruptController;
use satvdp::core::system::{System, DISPLAY_WIDTH};
use satvdp::core::vdp1::Vdp1;

/// Assert the captured display has `expected` at (x, y)
#[allow(dead_code)]
pub fn assert_display_pixel(system: &System, x: usize, y: usize, expected: u16) {
    let (display, _) = system.display();
    let actual = display[y * DISPLAY_WIDTH + x];
    assert_eq!(
        actual, expected,
        "Display at ({}, {}) mismatch: expected 0x{:04X}, got 0x{:04X}",
        x, y, expected, actual
    );
}

/// Assert the draw plane has `expected` at (x, y)
#[allow(dead_code)]
pub fn assert_draw_pixel(vdp1: &Vdp1, x: usize, y: usize, expected: u16) {
    let actual = vdp1.draw_plane_pixel(x, y);
    assert_eq!(
        actual, expected,
        "Draw plane at ({}, {}) mismatch: expected 0x{:04X}, got 0x{:04X}",
        x, y, expected, actual
    );
}

/// Assert an interrupt source is latched
#[allow(dead_code)]
pub fn assert_interrupt_raised(interrupts: &InterruptController, source: u32) {
    assert_ne!(
        interrupts.read_status() & source,
        0,
        "Interrupt 0x{:04X} not raised (status 0x{:04X})",
        source,
        interrupts.read_status()
    );
}
