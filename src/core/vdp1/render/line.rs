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

//! Line rasterizer
//!
//! Every primitive reduces to calls into this routine. A line walks its
//! major axis one pixel per step, with the minor axis driven by an error
//! accumulator. Anti-aliased lines plot one extra fringe pixel each time the
//! minor axis moves. Textured lines walk the texel index in lock-step, and
//! the walk may be suspended mid-line and resumed from a saved `LineInner`.

use super::super::clip::PixelClip;
use super::super::registers::Fbcr;
use super::super::timing::{LINE_PRECLIP, LINE_SETUP, PIXEL_STEP, TEXEL_FETCH};
use super::super::types::{sign_extend, ClipMode, DrawMode, LineVertex};
use super::super::Vdp1;
use super::stepper::{wrap_error, GouraudStepper, LinearStepper};
use super::texture::TextureParams;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Parameters shared by every line of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LineParams {
    /// Draw mode (CMDPMOD)
    pub mode: DrawMode,
    /// Flat color for untextured primitives
    pub color: u16,
    /// Plot fringe pixels on minor-axis steps
    pub anti_alias: bool,
    /// Texture addressing for textured primitives
    pub texture: Option<TextureParams>,
}

/// Outcome of running a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineProgress {
    /// Line is complete (or was cut short by clipping or end codes)
    Finished,
    /// Cycle threshold reached; the `LineInner` must be resumed later
    Suspended,
}

/// State of a line in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LineInner {
    x: i32,
    y: i32,
    x_inc: i32,
    y_inc: i32,
    aa_x: i32,
    aa_y: i32,
    major_y: bool,
    remaining: i32,
    error: i32,
    error_inc: i32,
    error_adj: i32,
    error_cmp: i32,
    drawn_all_clipped: bool,
    texel_color: u16,
    texel_transparent: bool,
    tex: LinearStepper,
    end_codes_left: i32,
    gouraud: Option<GouraudStepper>,
}

impl LineInner {
    /// Pixels still to be stepped
    pub fn remaining(&self) -> i32 {
        self.remaining
    }
}

/// Fringe pixel offset for an anti-aliased line
///
/// The fringe sits on the side the minor axis is about to move away from,
/// so that diagonal steps are closed without gaps.
fn fringe_offset(major_y: bool, x_inc: i32, y_inc: i32) -> (i32, i32) {
    match (major_y, x_inc > 0, y_inc > 0) {
        (true, false, false) => (-1, 1),
        (true, true, false) => (0, 0),
        (true, true, true) => (1, -1),
        (true, false, true) => (0, 0),
        (false, true, false) => (-1, -1),
        (false, false, true) => (1, 1),
        (false, _, _) => (0, 0),
    }
}

#[inline(always)]
fn to_screen(coord: i32) -> i32 {
    sign_extend(11, coord & 0x7FF)
}

impl Vdp1 {
    /// Prepare a line from `p0` to `p1`
    ///
    /// Applies pre-clipping (unless disabled by the draw mode), computes the
    /// stepping terms and fetches the first texel.
    ///
    /// # Returns
    ///
    /// The line state and the setup cycles
    pub(in crate::core::vdp1) fn setup_line(
        &self,
        params: &LineParams,
        mut p0: LineVertex,
        mut p1: LineVertex,
    ) -> (LineInner, i32) {
        let mode = params.mode;
        let mut cost = LINE_SETUP;

        for p in [&mut p0, &mut p1] {
            p.x = sign_extend(13, p.x & 0x1FFF);
            p.y = sign_extend(13, p.y & 0x1FFF);
        }

        if !mode.pre_clip_disabled() {
            cost += LINE_PRECLIP;

            let clip_mode = mode.clip_mode();
            let (x0, _, x1, _) = self.clip.preclip_bounds(clip_mode);
            if self
                .clip
                .all_beyond_one_edge(clip_mode, &[(p0.x, p0.y), (p1.x, p1.y)])
            {
                // Reduced to a single point rather than dropped
                p1 = p0;
            } else if p0.y == p1.y {
                // Horizontal lines are drawn from the end nearer the clip region,
                // compared as unsigned 13-bit values
                let start_x = p0.x & 0x1FFF;
                let start_outside = match clip_mode {
                    ClipMode::InsideUser => start_x < x0 || start_x > x1,
                    _ => start_x > x1,
                };
                if start_outside {
                    std::mem::swap(&mut p0, &mut p1);
                }
            }
        }

        let dx = sign_extend(13, p1.x - p0.x);
        let dy = sign_extend(13, p1.y - p0.y);
        let span = dx.abs().max(dy.abs());
        let x_inc = if dx >= 0 { 1 } else { -1 };
        let y_inc = if dy >= 0 { 1 } else { -1 };
        let major_y = dy.abs() > dx.abs();
        let aa = params.anti_alias;

        let (major_delta, minor_abs) = if major_y {
            (dy, dx.abs())
        } else {
            (dx, dy.abs())
        };
        let error_inc = 2 * minor_abs;
        let mut error = -major_delta.abs() - 1 - error_inc;
        let mut error_cmp = if major_delta < 0 && !aa { -1 } else { 0 };
        if aa {
            error += 1;
            error_cmp += 1;
        }

        // Start one major step behind p0
        let (x, y) = if major_y {
            (p0.x, p0.y - y_inc)
        } else {
            (p0.x - x_inc, p0.y)
        };
        let (aa_x, aa_y) = fringe_offset(major_y, x_inc, y_inc);

        let gouraud = mode
            .gouraud()
            .then(|| GouraudStepper::new(span + 1, p0.g, p1.g));

        let mut inner = LineInner {
            x,
            y,
            x_inc,
            y_inc,
            aa_x,
            aa_y,
            major_y,
            remaining: span + 1,
            error: wrap_error(error),
            error_inc: wrap_error(error_inc),
            error_adj: wrap_error(-2 * major_delta.abs()),
            error_cmp,
            drawn_all_clipped: true,
            texel_color: params.color,
            texel_transparent: false,
            tex: LinearStepper::default(),
            end_codes_left: 0,
            gouraud,
        };

        if let Some(texture) = params.texture.as_ref() {
            inner.end_codes_left = self.config.end_code_tolerance;

            if mode.high_speed_shrink() && span < (p1.t - p0.t).abs() {
                let eos = self.regs.fb_control().contains(Fbcr::EOS) as i32;
                inner.end_codes_left = i32::MAX;
                inner.tex = LinearStepper::with_scale(span + 1, p0.t >> 1, p1.t >> 1, 2, eos);
            } else {
                inner.tex = LinearStepper::new(span + 1, p0.t, p1.t);
            }

            let texel = texture.fetch(&self.vram, inner.tex.current());
            inner.texel_color = texel.color;
            inner.texel_transparent = texel.transparent;
            if texel.end_code {
                inner.end_codes_left -= 1;
            }
            cost += TEXEL_FETCH;
        }

        (inner, cost)
    }

    /// Run a line until it finishes or `cycles` reaches the suspend threshold
    ///
    /// `cycles` accumulates the cost of the current resume call.
    pub(in crate::core::vdp1) fn draw_line_inner(
        &mut self,
        params: &LineParams,
        inner: &mut LineInner,
        cycles: &mut i32,
    ) -> LineProgress {
        let mode = params.mode;
        let clip_mode = mode.clip_mode();
        let threshold = self.config.line_suspend_threshold;

        loop {
            if let Some(texture) = params.texture.as_ref() {
                while inner.tex.pending() {
                    let texel = texture.fetch(&self.vram, inner.tex.advance_pending());
                    inner.texel_color = texel.color;
                    inner.texel_transparent = texel.transparent;
                    if texel.end_code {
                        inner.end_codes_left -= 1;
                    }
                    *cycles += TEXEL_FETCH;
                }

                if inner.end_codes_left <= 0 {
                    return LineProgress::Finished;
                }
            }

            let gouraud = inner.gouraud.map(|g| g.current());

            if inner.major_y {
                inner.y += inner.y_inc;
            } else {
                inner.x += inner.x_inc;
            }
            inner.error = wrap_error(inner.error + inner.error_inc);

            if inner.error >= inner.error_cmp {
                inner.error = wrap_error(inner.error + inner.error_adj);

                if params.anti_alias {
                    let fx = to_screen(inner.x + inner.aa_x);
                    let fy = to_screen(inner.y + inner.aa_y);
                    *cycles += PIXEL_STEP;
                    if self.clip.classify(clip_mode, fx, fy) == PixelClip::Visible
                        && !inner.texel_transparent
                    {
                        *cycles += self.plot_pixel(mode, fx, fy, inner.texel_color, gouraud);
                    }
                }

                if inner.major_y {
                    inner.x += inner.x_inc;
                } else {
                    inner.y += inner.y_inc;
                }
            }

            let (sx, sy) = (to_screen(inner.x), to_screen(inner.y));
            *cycles += PIXEL_STEP;
            match self.clip.classify(clip_mode, sx, sy) {
                PixelClip::Visible => {
                    inner.drawn_all_clipped = false;
                    if !inner.texel_transparent {
                        *cycles += self.plot_pixel(mode, sx, sy, inner.texel_color, gouraud);
                    }
                }
                PixelClip::Masked => {}
                PixelClip::Outside => {
                    // Left the clip region after drawing into it
                    if !inner.drawn_all_clipped {
                        return LineProgress::Finished;
                    }
                }
            }

            if params.texture.is_some() {
                inner.tex.add_error();
            }
            if let Some(g) = inner.gouraud.as_mut() {
                g.step();
            }

            inner.remaining -= 1;
            if inner.remaining <= 0 {
                return LineProgress::Finished;
            }

            if *cycles >= threshold {
                return LineProgress::Suspended;
            }
        }
    }

    /// Start or continue the line held in `slot`
    ///
    /// A fresh line is set up when `slot` is empty; `slot` is cleared again
    /// once the line finishes.
    pub(in crate::core::vdp1) fn run_line(
        &mut self,
        params: &LineParams,
        slot: &mut Option<LineInner>,
        p0: LineVertex,
        p1: LineVertex,
        cycles: &mut i32,
    ) -> LineProgress {
        if slot.is_none() {
            let (inner, cost) = self.setup_line(params, p0, p1);
            *cycles += cost;
            *slot = Some(inner);
        }

        let progress = match slot.as_mut() {
            Some(inner) => self.draw_line_inner(params, inner, cycles),
            None => LineProgress::Finished,
        };

        if progress == LineProgress::Finished {
            *slot = None;
        }
        progress
    }
}
