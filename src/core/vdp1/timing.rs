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

//! Drawing cycle costs
//!
//! Every micro-operation of the drawing processor is charged against the
//! cycle counter using these costs.

/// Fetching one 16 half-word command record
pub const COMMAND_FETCH: i32 = 16;

/// Clip, system clip and local coordinate commands
pub const CONTROL_COMMAND: i32 = 0;

/// Per-primitive setup for sprites, polygons and lines
pub const PRIMITIVE_SETUP: i32 = 16;

/// Loading a 16-entry color lookup table
pub const CLUT_LOAD: i32 = 16;

/// Line pre-clipping test
pub const LINE_PRECLIP: i32 = 4;

/// Per-line setup
pub const LINE_SETUP: i32 = 8;

/// Each candidate pixel step, clipped or not
pub const PIXEL_STEP: i32 = 1;

/// Additional cost of a 16bpp framebuffer write
pub const WRITE_16BPP: i32 = 1;

/// Additional cost of an 8bpp framebuffer write
pub const WRITE_8BPP: i32 = 2;

/// Read-modify-write surcharge (MSB-on, shadow, half-transparency)
pub const READ_SURCHARGE: i32 = 5;

/// Each texel fetched from VRAM
pub const TEXEL_FETCH: i32 = 1;

/// V-blank erase cost per 8 pixels
pub const ERASE_PER_8_PIXELS: i64 = 8;
