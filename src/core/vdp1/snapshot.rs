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

//! Resumable primitive state
//!
//! When a primitive runs out of cycles it leaves one of these behind. The
//! command processor holds at most one, and never fetches the next command
//! while it exists.

use super::render::{EdgeStepper, LineInner, LineParams, LinearStepper};
use super::types::LineVertex;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A suspended primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ResumableSnapshot {
    /// Line or polyline
    Line(LineSnapshot),
    /// Normal, scaled or distorted sprite
    Sprite(SpriteSnapshot),
    /// Untextured polygon
    Polygon(PolygonSnapshot),
}

/// Line and polyline progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LineSnapshot {
    /// Shared line parameters
    pub params: LineParams,
    /// Vertices A..D (only A and B are used by a single line)
    pub vertices: [LineVertex; 4],
    /// Number of segments (1 for a line, 4 for a closed polyline)
    pub segments: u8,
    /// Segment being drawn
    pub index: u8,
    /// Line in progress
    pub inner: Option<LineInner>,
}

impl LineSnapshot {
    /// Endpoints of segment `index`; polylines close back to vertex A
    pub fn segment(&self, index: u8) -> (LineVertex, LineVertex) {
        let i = index as usize;
        (self.vertices[i], self.vertices[(i + 1) % 4])
    }
}

/// Walk down the two long edges of a quadrilateral
///
/// Each iteration draws one line between the current positions of the
/// A→D and B→C edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct QuadWalk {
    /// Shared line parameters (texture base is updated per row)
    pub params: LineParams,
    /// Edge from A to D
    pub left: EdgeStepper,
    /// Edge from B to C
    pub right: EdgeStepper,
    /// Texel index at the left end of each line
    pub t_left: i32,
    /// Texel index at the right end of each line
    pub t_right: i32,
    /// Lines still to be drawn
    pub remaining: i32,
    /// Line in progress
    pub inner: Option<LineInner>,
}

impl QuadWalk {
    /// Endpoints of the current line
    pub fn endpoints(&self) -> (LineVertex, LineVertex) {
        let mut p0 = self.left.vertex();
        let mut p1 = self.right.vertex();
        p0.t = self.t_left;
        p1.t = self.t_right;
        (p0, p1)
    }
}

/// Texture row selection for sprites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SpriteRows {
    /// Row index walker (0..h-1, reversed by vertical flip)
    pub stepper: LinearStepper,
    /// VRAM word address of texture row 0
    pub source: u32,
    /// Sprite width in texels
    pub width: i32,
    /// log2 of texels per VRAM word
    pub shift: u32,
}

impl SpriteRows {
    /// VRAM word address of the current row
    pub fn row_base(&self) -> u32 {
        let row = self.stepper.current().max(0) as u32;
        self.source.wrapping_add((row * self.width as u32) >> self.shift)
    }
}

/// Sprite progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SpriteSnapshot {
    /// Edge walk
    pub walk: QuadWalk,
    /// Texture rows
    pub rows: SpriteRows,
}

/// Polygon progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PolygonSnapshot {
    /// Edge walk
    pub walk: QuadWalk,
}
