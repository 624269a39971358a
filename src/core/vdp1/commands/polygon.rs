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

//! Polygon command
//!
//! A polygon is drawn as a stack of anti-aliased lines between its A→D and
//! B→C edges, not as a scanline fill. Thin or twisted polygons show the same
//! gaps and overdraw the hardware does.

use super::super::render::LineParams;
use super::super::snapshot::{PolygonSnapshot, ResumableSnapshot};
use super::super::timing::PRIMITIVE_SETUP;
use super::super::types::CommandRecord;
use super::super::Vdp1;

impl Vdp1 {
    /// Command 0x4: untextured quadrilateral
    pub(super) fn begin_polygon(
        &mut self,
        record: &CommandRecord,
    ) -> (Option<ResumableSnapshot>, i32) {
        let params = LineParams {
            mode: record.mode(),
            color: record.color(),
            anti_alias: true,
            texture: None,
        };

        let mut corners = self.local_vertices(record);
        self.shade_corners(record, &mut corners);

        if self.quad_rejected(&params, &corners) {
            log::trace!("VDP1 polygon rejected by bounding box");
            return (None, PRIMITIVE_SETUP);
        }

        let walk = Self::quad_walk(params, &corners, 0, 0);
        (
            Some(ResumableSnapshot::Polygon(PolygonSnapshot { walk })),
            PRIMITIVE_SETUP,
        )
    }
}
