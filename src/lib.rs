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

//! Sega Saturn VDP1 emulation core library
//!
//! This library provides the drawing processor of the Saturn's sprite/polygon
//! chip: command list execution, the line rasterizer shared by every primitive,
//! the two framebuffers, and the cycle budget that lets drawing span several
//! scheduler calls.
//!
//! # Example
//!
//! ```
//! use satvdp::core::vdp1::Vdp1;
//!
//! let mut vdp1 = Vdp1::new();
//!
//! // An empty list: a single end-of-list record at address 0
//! vdp1.write16(0x00000, 0x8000);
//!
//! // Start drawing (PTMR = 1) and let the processor run
//! vdp1.write16(0x100004, 0x0001);
//! vdp1.advance(1000);
//!
//! assert!(!vdp1.is_drawing());
//! ```

pub mod core;
