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

//! Sprite commands
//!
//! Normal, scaled and distorted sprites all reduce to four corners walked
//! as a quadrilateral. Each line of the walk samples one texture row; the row
//! walker and the per-line texel walker stretch or shrink the texture onto
//! whatever geometry the corners describe.

use super::super::render::{LineParams, LinearStepper, TextureParams};
use super::super::snapshot::{ResumableSnapshot, SpriteRows, SpriteSnapshot};
use super::super::timing::{CLUT_LOAD, PRIMITIVE_SETUP};
use super::super::types::{ColorMode, CommandRecord, LineVertex};
use super::super::Vdp1;

/// Span of a scaled sprite along one axis for a zoom point anchor
///
/// Anchor 1 is the upper/left edge, 2 the center and 3 the lower/right
/// edge. The reserved value 0 behaves like 1.
fn anchored_span(origin: i32, size: i32, anchor: u16) -> (i32, i32) {
    match anchor & 0x3 {
        2 => (origin - size / 2, origin + (size + 1) / 2),
        3 => (origin - size, origin),
        _ => (origin, origin + size),
    }
}

/// Corners A, B, C, D of an axis-aligned box
fn box_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> [LineVertex; 4] {
    [
        LineVertex::at(x0, y0),
        LineVertex::at(x1, y0),
        LineVertex::at(x1, y1),
        LineVertex::at(x0, y1),
    ]
}

impl Vdp1 {
    /// Command 0x0: sprite at its texture size
    pub(super) fn begin_normal_sprite(
        &mut self,
        record: &CommandRecord,
    ) -> (Option<ResumableSnapshot>, i32) {
        let (x, y) = self.clip.localize(record.vertex(0));
        let corners = box_corners(x, y, x + record.width() - 1, y + record.height() - 1);
        self.begin_sprite(record, corners)
    }

    /// Command 0x1: sprite stretched to a box
    ///
    /// Zoom point 0 takes the box from corners A and C; otherwise vertex A
    /// is the anchor and vertex B holds the display width and height.
    pub(super) fn begin_scaled_sprite(
        &mut self,
        record: &CommandRecord,
    ) -> (Option<ResumableSnapshot>, i32) {
        let (xa, ya) = self.clip.localize(record.vertex(0));
        let zoom_point = record.zoom_point();

        let corners = if zoom_point == 0 {
            let (xc, yc) = self.clip.localize(record.vertex(2));
            box_corners(xa, ya, xc, yc)
        } else {
            let (width, height) = record.vertex(1);
            let (x0, x1) = anchored_span(xa, width, zoom_point);
            let (y0, y1) = anchored_span(ya, height, zoom_point >> 2);
            box_corners(x0, y0, x1, y1)
        };

        self.begin_sprite(record, corners)
    }

    /// Command 0x2/0x3: sprite mapped onto four arbitrary corners
    pub(super) fn begin_distorted_sprite(
        &mut self,
        record: &CommandRecord,
    ) -> (Option<ResumableSnapshot>, i32) {
        let corners = self.local_vertices(record);
        self.begin_sprite(record, corners)
    }

    fn begin_sprite(
        &mut self,
        record: &CommandRecord,
        mut corners: [LineVertex; 4],
    ) -> (Option<ResumableSnapshot>, i32) {
        let mode = record.mode();
        let color_mode = mode.color_mode();
        let (width, height) = (record.width(), record.height());

        let mut cost = PRIMITIVE_SETUP;
        if color_mode == ColorMode::Lookup16 {
            cost += CLUT_LOAD;
        }

        if width == 0 || height == 0 {
            log::trace!("VDP1 sprite with zero size skipped");
            return (None, cost);
        }

        let params = LineParams {
            mode,
            color: record.color(),
            anti_alias: true,
            texture: Some(TextureParams::from_record(record, &self.vram)),
        };

        self.shade_corners(record, &mut corners);
        if self.quad_rejected(&params, &corners) {
            log::trace!("VDP1 sprite rejected by bounding box");
            return (None, cost);
        }

        let (t_left, t_right) = if record.h_flip() {
            (width - 1, 0)
        } else {
            (0, width - 1)
        };
        let (row_first, row_last) = if record.v_flip() {
            (height - 1, 0)
        } else {
            (0, height - 1)
        };

        let walk = Self::quad_walk(params, &corners, t_left, t_right);
        let rows = SpriteRows {
            stepper: LinearStepper::new(walk.remaining, row_first, row_last),
            source: record.source(),
            width,
            shift: color_mode.row_shift(),
        };

        (
            Some(ResumableSnapshot::Sprite(SpriteSnapshot { walk, rows })),
            cost,
        )
    }
}
