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

//! VDP1 configuration
//!
//! Tunables that shape drawing timing. The defaults reproduce the reference
//! behavior; the suspend threshold and end-code tolerance are empirically
//! tuned rather than documented hardware values, so they stay configurable.
//!
//! # Example
//!
//! ```
//! use satvdp::core::config::Vdp1Config;
//!
//! let config = Vdp1Config::from_toml_str("line_suspend_threshold = 500").unwrap();
//! assert_eq!(config.line_suspend_threshold, 500);
//! assert_eq!(config.end_code_tolerance, 2);
//! ```

use super::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Drawing timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vdp1Config {
    /// Maximum cycles credited per `advance` call, and the re-arm interval
    /// returned while drawing is active
    pub update_granularity: i32,

    /// Re-arm interval returned while the processor is idle
    pub idle_granularity: i32,

    /// Cycles a single primitive resume may spend before the line rasterizer
    /// suspends mid-line
    pub line_suspend_threshold: i32,

    /// End codes tolerated on one textured line before its fetch aborts
    pub end_code_tolerance: i32,

    /// Give every `advance` call an effectively unlimited budget
    pub instant_draw: bool,
}

impl Vdp1Config {
    /// Budget used for every call when `instant_draw` is set
    pub const INSTANT_DRAW_BUDGET: i32 = 1_000_000;

    /// Parse a configuration from TOML text
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        log::info!("Loaded VDP1 config from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Clamp values that would stall the processor
    pub(crate) fn sanitized(mut self) -> Self {
        if self.update_granularity < 1 {
            log::warn!(
                "update_granularity {} is not positive, using 1",
                self.update_granularity
            );
            self.update_granularity = 1;
        }
        if self.idle_granularity < 1 {
            self.idle_granularity = 1;
        }
        if self.line_suspend_threshold < 1 {
            log::warn!(
                "line_suspend_threshold {} is not positive, using 1",
                self.line_suspend_threshold
            );
            self.line_suspend_threshold = 1;
        }
        if self.end_code_tolerance < 1 {
            self.end_code_tolerance = 1;
        }
        self
    }
}

impl Default for Vdp1Config {
    fn default() -> Self {
        Self {
            update_granularity: 263,
            idle_granularity: 1019,
            line_suspend_threshold: 1000,
            end_code_tolerance: 2,
            instant_draw: false,
        }
    }
}
