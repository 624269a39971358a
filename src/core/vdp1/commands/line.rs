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

//! Line and polyline commands
//!
//! Each segment is handed to the line rasterizer independently, without
//! anti-aliasing. A polyline is a closed loop A→B→C→D→A.

use super::super::render::{LineParams, LineProgress};
use super::super::snapshot::{LineSnapshot, ResumableSnapshot};
use super::super::timing::PRIMITIVE_SETUP;
use super::super::types::CommandRecord;
use super::super::Vdp1;
use super::ResumeStep;

impl Vdp1 {
    /// Command 0x6: single line from A to B
    pub(super) fn begin_line(
        &mut self,
        record: &CommandRecord,
    ) -> (Option<ResumableSnapshot>, i32) {
        self.begin_segments(record, 1)
    }

    /// Command 0x5/0x7: closed polyline through A, B, C, D
    pub(super) fn begin_polyline(
        &mut self,
        record: &CommandRecord,
    ) -> (Option<ResumableSnapshot>, i32) {
        self.begin_segments(record, 4)
    }

    fn begin_segments(
        &mut self,
        record: &CommandRecord,
        segments: u8,
    ) -> (Option<ResumableSnapshot>, i32) {
        let mut vertices = self.local_vertices(record);
        self.shade_corners(record, &mut vertices);

        let snapshot = LineSnapshot {
            params: LineParams {
                mode: record.mode(),
                color: record.color(),
                anti_alias: false,
                texture: None,
            },
            vertices,
            segments,
            index: 0,
            inner: None,
        };

        (Some(ResumableSnapshot::Line(snapshot)), PRIMITIVE_SETUP)
    }

    /// Draw the remaining segments of a line or polyline
    pub(super) fn resume_lines(&mut self, line: &mut LineSnapshot) -> ResumeStep {
        let threshold = self.config.line_suspend_threshold;
        let mut cycles = 0;

        while line.index < line.segments {
            let (p0, p1) = line.segment(line.index);
            let params = line.params;
            let progress = self.run_line(&params, &mut line.inner, p0, p1, &mut cycles);
            if progress == LineProgress::Suspended {
                return ResumeStep::pending(cycles);
            }

            line.index += 1;
            if cycles >= threshold && line.index < line.segments {
                return ResumeStep::pending(cycles);
            }
        }

        ResumeStep::done(cycles)
    }
}
