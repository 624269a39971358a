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

//! Core emulation components
//!
//! This module contains the hardware emulation components:
//! - VDP1 (sprite/polygon drawing processor)
//! - Interrupt controller (drawing-end signal sink)
//! - System integration (scanline scheduler harness)
//! - Configuration and save states

pub mod config;
pub mod error;
pub mod interrupt;
pub mod save_state;
pub mod system;
pub mod vdp1;

// Re-export commonly used types
pub use config::Vdp1Config;
pub use error::{EmulatorError, Result};
pub use interrupt::InterruptController;
pub use system::System;
pub use vdp1::Vdp1;
