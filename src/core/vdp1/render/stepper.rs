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

//! Incremental integer walkers
//!
//! Every primitive is driven by error-accumulator stepping: a geometric walk
//! along an edge, and linear interpolators that spread a value range (texel
//! index, Gouraud channel) over a number of steps. No floating point is used;
//! tie-breaks follow the `error >= cmp` rule exactly. Geometric error terms
//! are 13-bit two's complement and wrap like the hardware's accumulators.

use super::super::types::{sign_extend, LineVertex};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Spreads `start..=end` over `length` steps
///
/// The walker is lazy: `add_error` accumulates after each step, and the
/// caller drains pending increments with `advance_pending` before the next
/// step. When the range is longer than the step count (shrinking), several
/// increments may be pending at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LinearStepper {
    value: i32,
    inc: i32,
    error: i32,
    error_inc: i32,
    error_adj: i32,
}

impl LinearStepper {
    /// Create a walker from `start` to `end` over `length` steps
    ///
    /// # Examples
    ///
    /// ```
    /// use satvdp::core::vdp1::LinearStepper;
    ///
    /// // Magnify two values over four steps: 0, 0, 1, 1
    /// let mut stepper = LinearStepper::new(4, 0, 1);
    /// let mut seen = Vec::new();
    /// for _ in 0..4 {
    ///     stepper.settle();
    ///     seen.push(stepper.current());
    ///     stepper.add_error();
    /// }
    /// assert_eq!(seen, vec![0, 0, 1, 1]);
    /// ```
    pub fn new(length: i32, start: i32, end: i32) -> Self {
        Self::with_scale(length, start, end, 1, 0)
    }

    /// Create a walker whose value is `index * scale | fudge`
    ///
    /// Used by high-speed shrink, which walks every other texel.
    pub fn with_scale(length: i32, start: i32, end: i32, scale: i32, fudge: i32) -> Self {
        let delta = end - start;
        let abs_delta = delta.abs();
        let neg = (delta < 0) as i32;
        let length = length.max(1);

        let (error, error_inc, error_adj) = if length <= abs_delta {
            (
                abs_delta + 1 - 2 * length - neg,
                2 * (abs_delta + 1),
                2 * length,
            )
        } else {
            (-length + neg, 2 * abs_delta, 2 * (length - 1))
        };

        Self {
            value: (start * scale) | fudge,
            inc: if delta < 0 { -scale } else { scale },
            error,
            error_inc,
            error_adj,
        }
    }

    /// Current value
    #[inline(always)]
    pub fn current(&self) -> i32 {
        self.value
    }

    /// Whether an increment is waiting to be applied
    #[inline(always)]
    pub fn pending(&self) -> bool {
        self.error >= 0
    }

    /// Apply one pending increment and return the new value
    #[inline(always)]
    pub fn advance_pending(&mut self) -> i32 {
        self.value += self.inc;
        self.error -= self.error_adj;
        self.value
    }

    /// Accumulate the error for one step
    #[inline(always)]
    pub fn add_error(&mut self) {
        self.error += self.error_inc;
    }

    /// Apply every pending increment
    #[inline(always)]
    pub fn settle(&mut self) {
        while self.pending() {
            self.advance_pending();
        }
    }
}

/// Interpolates a 5-5-5 Gouraud color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct GouraudStepper {
    channels: [LinearStepper; 3],
}

impl GouraudStepper {
    /// Interpolate from `g0` to `g1` over `length` steps
    pub fn new(length: i32, g0: u16, g1: u16) -> Self {
        let channel = |shift: u32| {
            let start = ((g0 >> shift) & 0x1F) as i32;
            let end = ((g1 >> shift) & 0x1F) as i32;
            let mut stepper = LinearStepper::new(length, start, end);
            stepper.settle();
            stepper
        };

        Self {
            channels: [channel(0), channel(5), channel(10)],
        }
    }

    /// Current color
    pub fn current(&self) -> u16 {
        let [r, g, b] = self.channels;
        ((b.current() as u16) << 10) | ((g.current() as u16) << 5) | r.current() as u16
    }

    /// Advance one step
    #[inline(always)]
    pub fn step(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.add_error();
            channel.settle();
        }
    }
}

/// Apply a Gouraud color to a 5-5-5 pixel
///
/// Each channel is offset by `g - 16` and clamped; the MSB is preserved.
///
/// # Examples
///
/// ```
/// use satvdp::core::vdp1::apply_gouraud;
///
/// // 0x10 per channel is neutral
/// assert_eq!(apply_gouraud(0x8421, 0x4210), 0x8421);
/// // Saturates at both ends
/// assert_eq!(apply_gouraud(0x001F, 0x001F), 0x001F);
/// assert_eq!(apply_gouraud(0x0001, 0x0000), 0x0000);
/// ```
#[inline(always)]
pub fn apply_gouraud(pixel: u16, gouraud: u16) -> u16 {
    let mut out = pixel & 0x8000;
    for shift in [0u32, 5, 10] {
        let sum = ((pixel >> shift) & 0x1F) as i32 + ((gouraud >> shift) & 0x1F) as i32 - 16;
        out |= (sum.clamp(0, 31) as u16) << shift;
    }
    out
}

/// Reduce an error term to 13-bit two's complement
#[inline(always)]
pub fn wrap_error(value: i32) -> i32 {
    sign_extend(13, value & 0x1FFF)
}

/// Number of major-axis steps between two vertices (13-bit deltas)
pub fn edge_span(p0: &LineVertex, p1: &LineVertex) -> i32 {
    let dx = sign_extend(13, p1.x - p0.x);
    let dy = sign_extend(13, p1.y - p0.y);
    dx.abs().max(dy.abs())
}

/// One axis of an edge walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
struct AxisStepper {
    inc: i32,
    error: i32,
    error_inc: i32,
    error_adj: i32,
    error_cmp: i32,
}

impl AxisStepper {
    fn new(delta: i32, span: i32, cmp_negative: bool) -> Self {
        Self {
            inc: if delta >= 0 { 1 } else { -1 },
            error: wrap_error(-span - 1),
            error_inc: wrap_error(2 * delta.abs()),
            error_adj: wrap_error(-2 * span),
            error_cmp: if cmp_negative { -1 } else { 0 },
        }
    }

    /// Returns the coordinate increment for this step (0 or +-1)
    #[inline(always)]
    fn step(&mut self) -> i32 {
        self.error = wrap_error(self.error + self.error_inc);
        if self.error >= self.error_cmp {
            self.error = wrap_error(self.error + self.error_adj);
            self.inc
        } else {
            0
        }
    }
}

/// Walks one edge of a quadrilateral
///
/// The edge covers `span` steps but is stretched over `dmax` iterations
/// (the longer of the two edges of the quad), so the outer `d` accumulator
/// decides on which iterations the edge actually moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct EdgeStepper {
    /// Current X
    pub x: i32,
    /// Current Y
    pub y: i32,
    x_axis: AxisStepper,
    y_axis: AxisStepper,
    d_axis: AxisStepper,
    gouraud: Option<GouraudStepper>,
}

impl EdgeStepper {
    /// Set up an edge from `p0` to `p1` walked over `dmax` iterations
    pub fn new(p0: &LineVertex, p1: &LineVertex, dmax: i32, gouraud: bool) -> Self {
        let dx = sign_extend(13, p1.x - p0.x);
        let dy = sign_extend(13, p1.y - p0.y);
        let span = dx.abs().max(dy.abs());
        let major = if dy.abs() > dx.abs() { dy } else { dx };

        Self {
            x: p0.x,
            y: p0.y,
            x_axis: AxisStepper::new(dx, span, dy < 0),
            y_axis: AxisStepper::new(dy, span, dx < 0),
            d_axis: AxisStepper::new(span, dmax, major < 0),
            gouraud: gouraud.then(|| GouraudStepper::new(span + 1, p0.g, p1.g)),
        }
    }

    /// Advance one iteration
    #[inline(always)]
    pub fn step(&mut self) {
        if self.d_axis.step() == 0 {
            return;
        }

        self.x += self.x_axis.step();
        self.y += self.y_axis.step();
        if let Some(g) = self.gouraud.as_mut() {
            g.step();
        }
    }

    /// Current position (and color) as a line endpoint
    pub fn vertex(&self) -> LineVertex {
        LineVertex {
            x: self.x,
            y: self.y,
            g: self.gouraud.map_or(0, |g| g.current()),
            t: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(mut stepper: LinearStepper, length: i32) -> Vec<i32> {
        let mut out = Vec::new();
        for _ in 0..length {
            stepper.settle();
            out.push(stepper.current());
            stepper.add_error();
        }
        out
    }

    #[test]
    fn test_linear_identity() {
        assert_eq!(walk(LinearStepper::new(4, 0, 3), 4), vec![0, 1, 2, 3]);
        assert_eq!(walk(LinearStepper::new(4, 3, 0), 4), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_linear_magnify_symmetric() {
        assert_eq!(walk(LinearStepper::new(4, 0, 1), 4), vec![0, 0, 1, 1]);
        assert_eq!(walk(LinearStepper::new(4, 1, 0), 4), vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_linear_magnify_reaches_end() {
        for length in 2..40 {
            for end in 0..length {
                let values = walk(LinearStepper::new(length, 0, end), length);
                assert_eq!(values[0], 0, "length={} end={}", length, end);
                assert_eq!(*values.last().unwrap(), end, "length={} end={}", length, end);
                assert!(values.windows(2).all(|w| w[1] - w[0] <= 1));
            }
        }
    }

    #[test]
    fn test_linear_shrink_stays_in_range() {
        for length in 1..20 {
            for end in length..80 {
                let values = walk(LinearStepper::new(length, 0, end), length);
                assert!(values.iter().all(|&v| (0..=end).contains(&v)));
                assert!(values.windows(2).all(|w| w[1] > w[0]));
            }
        }
    }

    #[test]
    fn test_scaled_walk_keeps_fudge_bit() {
        let values = walk(LinearStepper::with_scale(4, 0, 3, 2, 1), 4);
        assert_eq!(values, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_gouraud_interpolation() {
        let mut g = GouraudStepper::new(3, 0x0000, 0x0842);
        assert_eq!(g.current(), 0x0000);
        g.step();
        assert_eq!(g.current(), 0x0421);
        g.step();
        assert_eq!(g.current(), 0x0842);
    }

    #[test]
    fn test_edge_reaches_endpoint() {
        let p0 = LineVertex::at(0, 0);
        for (ex, ey) in [(7, 3), (-5, 9), (0, -4), (10, 10), (-6, -2)] {
            let p1 = LineVertex::at(ex, ey);
            let span = edge_span(&p0, &p1);
            for dmax in span..span + 5 {
                let mut edge = EdgeStepper::new(&p0, &p1, dmax, false);
                for _ in 0..dmax {
                    edge.step();
                }
                assert_eq!((edge.x, edge.y), (ex, ey), "dmax={}", dmax);
            }
        }
    }

    #[test]
    fn test_edge_error_wraps_at_13_bits() {
        // 2 * 2500 overflows the 13-bit error, so the minor axis catches up
        let (p0, p1) = (LineVertex::at(0, 0), LineVertex::at(2500, 300));
        let mut edge = EdgeStepper::new(&p0, &p1, 2500, false);
        for _ in 0..14 {
            edge.step();
        }
        assert_eq!((edge.x, edge.y), (14, 3));
    }

    #[test]
    fn test_wrap_error() {
        assert_eq!(wrap_error(4095), 4095);
        assert_eq!(wrap_error(4096), -4096);
        assert_eq!(wrap_error(-5000), 3192);
    }

    #[test]
    fn test_edge_stationary() {
        let p = LineVertex::at(5, 5);
        let mut edge = EdgeStepper::new(&p, &p, 8, false);
        for _ in 0..8 {
            edge.step();
        }
        assert_eq!((edge.x, edge.y), (5, 5));
    }
}
