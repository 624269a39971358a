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

//! Command execution
//!
//! Control commands take effect immediately. Drawing commands are split in
//! two: a setup that builds a `ResumableSnapshot` and returns its cost, and
//! a resume that advances the snapshot by up to one suspend threshold's
//! worth of cycles per call.

mod control;
mod line;
mod polygon;
mod sprite;

use super::render::{edge_span, EdgeStepper, LineParams, LineProgress};
use super::snapshot::{QuadWalk, ResumableSnapshot, SpriteRows};
use super::types::{CommandRecord, LineVertex, Opcode};
use super::{Vdp1, VRAM_MASK};

/// Cycles spent by one resume call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeStep {
    /// Cycles consumed
    pub cycles: i32,
    /// Primitive has finished
    pub done: bool,
}

impl ResumeStep {
    fn done(cycles: i32) -> Self {
        Self { cycles, done: true }
    }

    fn pending(cycles: i32) -> Self {
        Self {
            cycles,
            done: false,
        }
    }
}

impl Vdp1 {
    /// Execute the setup of the command in `record`
    ///
    /// Control commands apply their effect here. Drawing commands leave their
    /// snapshot in the processor (unless rejected outright).
    ///
    /// # Returns
    ///
    /// Setup cycles
    pub(in crate::core::vdp1) fn begin_command(
        &mut self,
        opcode: Opcode,
        record: &CommandRecord,
    ) -> i32 {
        log::trace!(
            "VDP1 command {:?} @ 0x{:05X}: ctrl=0x{:04X} pmod=0x{:04X} colr=0x{:04X}",
            opcode,
            self.processor.cur_addr,
            record.control(),
            record.mode().0,
            record.color()
        );

        let (snapshot, cost) = match opcode {
            Opcode::SetUserClip => (None, self.cmd_set_user_clip(record)),
            Opcode::SetSystemClip => (None, self.cmd_set_system_clip(record)),
            Opcode::SetLocalCoordinate => (None, self.cmd_set_local_coordinate(record)),
            Opcode::NormalSprite => self.begin_normal_sprite(record),
            Opcode::ScaledSprite => self.begin_scaled_sprite(record),
            Opcode::DistortedSprite => self.begin_distorted_sprite(record),
            Opcode::Polygon => self.begin_polygon(record),
            Opcode::Polyline => self.begin_polyline(record),
            Opcode::Line => self.begin_line(record),
        };

        self.processor.snapshot = snapshot;
        cost
    }

    /// Advance the suspended primitive, if any
    pub(in crate::core::vdp1) fn resume_primitive(&mut self) -> ResumeStep {
        let Some(mut snapshot) = self.processor.snapshot.take() else {
            return ResumeStep::done(0);
        };

        let step = match &mut snapshot {
            ResumableSnapshot::Line(line) => self.resume_lines(line),
            ResumableSnapshot::Sprite(sprite) => {
                self.resume_quad(&mut sprite.walk, Some(&mut sprite.rows))
            }
            ResumableSnapshot::Polygon(polygon) => self.resume_quad(&mut polygon.walk, None),
        };

        if !step.done {
            self.processor.snapshot = Some(snapshot);
        }
        step
    }

    /// Read the four Gouraud colors at CMDGRDA
    fn gouraud_table(&self, record: &CommandRecord) -> [u16; 4] {
        let base = record.gouraud_table();
        std::array::from_fn(|i| self.vram[((base + i as u32) & VRAM_MASK) as usize])
    }

    /// Offset the four command vertices by the local origin
    fn local_vertices(&self, record: &CommandRecord) -> [LineVertex; 4] {
        std::array::from_fn(|i| {
            let (x, y) = self.clip.localize(record.vertex(i));
            LineVertex::at(x, y)
        })
    }

    /// Attach Gouraud colors to the corners when shading is enabled
    fn shade_corners(&self, record: &CommandRecord, corners: &mut [LineVertex; 4]) {
        if record.mode().gouraud() {
            let table = self.gouraud_table(record);
            for (corner, g) in corners.iter_mut().zip(table) {
                corner.g = g;
            }
        }
    }

    /// Whether a quadrilateral can be discarded without walking it
    fn quad_rejected(&self, params: &LineParams, corners: &[LineVertex; 4]) -> bool {
        if params.mode.pre_clip_disabled() {
            return false;
        }

        let points = corners.map(|c| (c.x, c.y));
        self.clip.all_beyond_one_edge(params.mode.clip_mode(), &points)
    }

    /// Build the edge walk for a quadrilateral with corners A, B, C, D
    fn quad_walk(
        params: LineParams,
        corners: &[LineVertex; 4],
        t_left: i32,
        t_right: i32,
    ) -> QuadWalk {
        let [a, b, c, d] = corners;
        let dmax = edge_span(a, d).max(edge_span(b, c));
        let gouraud = params.mode.gouraud();

        QuadWalk {
            params,
            left: EdgeStepper::new(a, d, dmax, gouraud),
            right: EdgeStepper::new(b, c, dmax, gouraud),
            t_left,
            t_right,
            remaining: dmax + 1,
            inner: None,
        }
    }

    /// Draw the lines of a quadrilateral walk
    fn resume_quad(
        &mut self,
        walk: &mut QuadWalk,
        mut rows: Option<&mut SpriteRows>,
    ) -> ResumeStep {
        let threshold = self.config.line_suspend_threshold;
        let mut cycles = 0;

        while walk.remaining > 0 {
            if walk.inner.is_none() {
                if let (Some(rows), Some(texture)) =
                    (rows.as_mut(), walk.params.texture.as_mut())
                {
                    rows.stepper.settle();
                    texture.base = rows.row_base();
                }
            }

            let (p0, p1) = walk.endpoints();
            let params = walk.params;
            let progress = self.run_line(&params, &mut walk.inner, p0, p1, &mut cycles);
            if progress == LineProgress::Suspended {
                return ResumeStep::pending(cycles);
            }

            if let Some(rows) = rows.as_mut() {
                rows.stepper.add_error();
            }
            walk.left.step();
            walk.right.step();
            walk.remaining -= 1;

            if cycles >= threshold && walk.remaining > 0 {
                return ResumeStep::pending(cycles);
            }
        }

        ResumeStep::done(cycles)
    }
}
