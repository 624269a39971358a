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

//! Clipping and local coordinate state
//!
//! The system clip rectangle always starts at (0, 0). The user clip
//! rectangle is selected per primitive by the draw mode, either as the only
//! visible region or as a hole cut out of the system region.

use super::types::{sign_extend, ClipMode, CommandRecord};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Largest 13-bit clip coordinate
const CLIP_MAX: i32 = 0x1FFF;

/// Result of the per-pixel clip test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClip {
    /// Pixel may be written
    Visible,
    /// Pixel lies inside the user rectangle while drawing outside it
    ///
    /// Not written, but does not end the line either.
    Masked,
    /// Pixel lies outside the active clip region
    Outside,
}

/// Clip rectangles and local origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ClipState {
    /// System clip lower-right X
    pub system_x: i32,
    /// System clip lower-right Y
    pub system_y: i32,
    /// User clip upper-left X
    pub user_x0: i32,
    /// User clip upper-left Y
    pub user_y0: i32,
    /// User clip lower-right X
    pub user_x1: i32,
    /// User clip lower-right Y
    pub user_y1: i32,
    /// Local coordinate origin X
    pub local_x: i32,
    /// Local coordinate origin Y
    pub local_y: i32,
}

impl Default for ClipState {
    fn default() -> Self {
        Self {
            system_x: CLIP_MAX,
            system_y: CLIP_MAX,
            user_x0: 0,
            user_y0: 0,
            user_x1: CLIP_MAX,
            user_y1: CLIP_MAX,
            local_x: 0,
            local_y: 0,
        }
    }
}

impl ClipState {
    /// Load the user clip rectangle from words 6, 7, 0xA and 0xB
    pub fn set_user(&mut self, record: &CommandRecord) {
        self.user_x0 = (record.0[0x6] & 0x1FFF) as i32;
        self.user_y0 = (record.0[0x7] & 0x1FFF) as i32;
        self.user_x1 = (record.0[0xA] & 0x1FFF) as i32;
        self.user_y1 = (record.0[0xB] & 0x1FFF) as i32;
    }

    /// Load the system clip corner from words 0xA and 0xB
    pub fn set_system(&mut self, record: &CommandRecord) {
        self.system_x = (record.0[0xA] & 0x1FFF) as i32;
        self.system_y = (record.0[0xB] & 0x1FFF) as i32;
    }

    /// Load the local origin from words 6 and 7 (11-bit signed)
    pub fn set_local(&mut self, record: &CommandRecord) {
        self.local_x = sign_extend(11, (record.0[0x6] & 0x7FF) as i32);
        self.local_y = sign_extend(11, (record.0[0x7] & 0x7FF) as i32);
    }

    /// Offset a command vertex by the local origin
    pub fn localize(&self, (x, y): (i32, i32)) -> (i32, i32) {
        (x + self.local_x, y + self.local_y)
    }

    #[inline(always)]
    fn inside_system(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x <= self.system_x && y <= self.system_y
    }

    #[inline(always)]
    fn inside_user(&self, x: i32, y: i32) -> bool {
        x >= self.user_x0 && y >= self.user_y0 && x <= self.user_x1 && y <= self.user_y1
    }

    /// Classify one pixel against the clip region selected by `mode`
    #[inline(always)]
    pub fn classify(&self, mode: ClipMode, x: i32, y: i32) -> PixelClip {
        if !self.inside_system(x, y) {
            return PixelClip::Outside;
        }

        match mode {
            ClipMode::System => PixelClip::Visible,
            ClipMode::InsideUser if self.inside_user(x, y) => PixelClip::Visible,
            ClipMode::InsideUser => PixelClip::Outside,
            ClipMode::OutsideUser if self.inside_user(x, y) => PixelClip::Masked,
            ClipMode::OutsideUser => PixelClip::Visible,
        }
    }

    /// Rectangle `(x0, y0, x1, y1)` used for pre-clipping and bounding-box rejection
    ///
    /// Drawing inside the user rectangle pre-clips against that rectangle
    /// alone; every other mode pre-clips against the system rectangle.
    pub fn preclip_bounds(&self, mode: ClipMode) -> (i32, i32, i32, i32) {
        match mode {
            ClipMode::InsideUser => (self.user_x0, self.user_y0, self.user_x1, self.user_y1),
            _ => (0, 0, self.system_x, self.system_y),
        }
    }

    /// Whether every point lies beyond the same edge of the pre-clip rectangle
    pub fn all_beyond_one_edge(&self, mode: ClipMode, points: &[(i32, i32)]) -> bool {
        let (x0, y0, x1, y1) = self.preclip_bounds(mode);

        points.iter().all(|&(x, _)| x < x0)
            || points.iter().all(|&(x, _)| x > x1)
            || points.iter().all(|&(_, y)| y < y0)
            || points.iter().all(|&(_, y)| y > y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_with_user(x0: i32, y0: i32, x1: i32, y1: i32) -> ClipState {
        ClipState {
            system_x: 319,
            system_y: 223,
            user_x0: x0,
            user_y0: y0,
            user_x1: x1,
            user_y1: y1,
            ..Default::default()
        }
    }

    #[test]
    fn test_system_clip_bounds() {
        let clip = clip_with_user(0, 0, 0, 0);
        assert_eq!(clip.classify(ClipMode::System, 0, 0), PixelClip::Visible);
        assert_eq!(clip.classify(ClipMode::System, 319, 223), PixelClip::Visible);
        assert_eq!(clip.classify(ClipMode::System, 320, 0), PixelClip::Outside);
        assert_eq!(clip.classify(ClipMode::System, -1, 5), PixelClip::Outside);
    }

    #[test]
    fn test_user_clip_modes() {
        let clip = clip_with_user(10, 10, 20, 20);

        assert_eq!(clip.classify(ClipMode::InsideUser, 15, 15), PixelClip::Visible);
        assert_eq!(clip.classify(ClipMode::InsideUser, 5, 15), PixelClip::Outside);

        assert_eq!(clip.classify(ClipMode::OutsideUser, 15, 15), PixelClip::Masked);
        assert_eq!(clip.classify(ClipMode::OutsideUser, 5, 15), PixelClip::Visible);
        // Still bounded by the system rectangle
        assert_eq!(clip.classify(ClipMode::OutsideUser, 400, 15), PixelClip::Outside);
    }

    #[test]
    fn test_clip_commands() {
        let mut words = [0u16; 16];
        words[0x6] = 0x07FF;
        words[0x7] = 0x0010;
        words[0xA] = 0x013F;
        words[0xB] = 0x00DF;
        let record = CommandRecord(words);

        let mut clip = ClipState::default();
        clip.set_system(&record);
        clip.set_user(&record);
        clip.set_local(&record);

        assert_eq!((clip.system_x, clip.system_y), (319, 223));
        assert_eq!((clip.user_x0, clip.user_y0), (0x7FF, 0x10));
        assert_eq!((clip.local_x, clip.local_y), (-1, 16));
        assert_eq!(clip.localize((10, 10)), (9, 26));
    }

    #[test]
    fn test_all_beyond_one_edge() {
        let clip = clip_with_user(10, 10, 20, 20);
        assert!(clip.all_beyond_one_edge(ClipMode::System, &[(-5, 0), (-1, 100)]));
        assert!(!clip.all_beyond_one_edge(ClipMode::System, &[(-5, 0), (5, 100)]));
        assert!(clip.all_beyond_one_edge(ClipMode::InsideUser, &[(0, 0), (5, 100)]));
    }
}
