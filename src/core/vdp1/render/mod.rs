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

//! Render pipeline
//!
//! Steppers feed the line rasterizer, which hands visible pixels to the
//! compositor. Texture sampling sits beside the rasterizer.

mod line;
mod pixel;
mod stepper;
mod texture;

pub use line::{LineInner, LineParams, LineProgress};
pub use pixel::{half_luminance, half_transparency, shadow, FB_ROW_WORDS};
pub use stepper::{apply_gouraud, edge_span, EdgeStepper, GouraudStepper, LinearStepper};
pub use texture::{Texel, TextureParams};
