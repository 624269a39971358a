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

//! Clipping and local coordinate commands

use super::super::timing::CONTROL_COMMAND;
use super::super::types::CommandRecord;
use super::super::Vdp1;

impl Vdp1 {
    /// Command 0x8/0xB: set the user clipping rectangle
    pub(super) fn cmd_set_user_clip(&mut self, record: &CommandRecord) -> i32 {
        self.clip.set_user(record);
        log::trace!(
            "VDP1 user clip ({}, {})-({}, {})",
            self.clip.user_x0,
            self.clip.user_y0,
            self.clip.user_x1,
            self.clip.user_y1
        );
        CONTROL_COMMAND
    }

    /// Command 0x9: set the system clipping corner
    pub(super) fn cmd_set_system_clip(&mut self, record: &CommandRecord) -> i32 {
        self.clip.set_system(record);
        log::trace!(
            "VDP1 system clip ({}, {})",
            self.clip.system_x,
            self.clip.system_y
        );
        CONTROL_COMMAND
    }

    /// Command 0xA: set the local coordinate origin
    pub(super) fn cmd_set_local_coordinate(&mut self, record: &CommandRecord) -> i32 {
        self.clip.set_local(record);
        log::trace!(
            "VDP1 local origin ({}, {})",
            self.clip.local_x,
            self.clip.local_y
        );
        CONTROL_COMMAND
    }
}
