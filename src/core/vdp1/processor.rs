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

//! Command processor
//!
//! A cycle-budgeted state machine over the command list:
//!
//! ```text
//! Fetch → Dispatch → (Primitive)* → Branch → Fetch ...
//! ```
//!
//! `advance` credits the elapsed time to the cycle counter and runs the
//! machine until the counter is exhausted, the list ends, or a malformed
//! command stops the processor. The counter is checked before every step,
//! so the machine can stop at any phase boundary and pick up there later.

use super::registers::Edsr;
use super::snapshot::ResumableSnapshot;
use super::timing::COMMAND_FETCH;
use super::types::{CommandRecord, JumpMode, Opcode};
use super::{Vdp1, VRAM_MASK};
use crate::core::config::Vdp1Config;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Processor phase, i.e. where the next `advance` resumes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum Phase {
    /// Read the record at the current address
    #[default]
    Fetch,
    /// Decode and set up the fetched record
    Dispatch,
    /// Continue the primitive held in the snapshot
    Primitive,
    /// Follow the record's jump mode
    Branch,
}

/// Command processor state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ProcessorState {
    /// A command list is being executed
    pub drawing_active: bool,
    /// Resume point
    pub phase: Phase,
    /// VRAM word address of the current record
    pub cur_addr: u32,
    /// One-entry return register for call/return jumps
    pub ret_addr: Option<u32>,
    /// Record being executed
    pub command: CommandRecord,
    /// Cycles available (may go negative after an expensive step)
    pub cycle_counter: i32,
    /// Timestamp of the previous `advance`
    pub last_ts: i64,
    /// Suspended primitive
    pub snapshot: Option<ResumableSnapshot>,
    /// Draw-end interrupt pulse not yet collected
    pub draw_end_irq: bool,
}

impl Vdp1 {
    /// Run the processor up to `timestamp`
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Current time in drawing cycles (non-decreasing)
    ///
    /// # Returns
    ///
    /// The timestamp at which `advance` should next be called
    ///
    /// # Examples
    ///
    /// ```
    /// use satvdp::core::Vdp1;
    ///
    /// let mut vdp1 = Vdp1::new();
    /// // Idle processors ask to be polled at the idle interval
    /// assert_eq!(vdp1.advance(100), 100 + 1019);
    /// ```
    pub fn advance(&mut self, timestamp: i64) -> i64 {
        let mut timestamp = timestamp;
        if timestamp < self.processor.last_ts {
            log::warn!(
                "VDP1 timestamp went backwards: {} < {}",
                timestamp,
                self.processor.last_ts
            );
            timestamp = self.processor.last_ts;
        }

        let elapsed = timestamp - self.processor.last_ts;
        self.processor.last_ts = timestamp;

        let granularity = self.config.update_granularity;
        let credited = (self.processor.cycle_counter as i64 + elapsed).min(granularity as i64);
        self.processor.cycle_counter = credited as i32;

        if self.processor.drawing_active {
            self.run_drawing();
        }

        if self.processor.drawing_active {
            timestamp + granularity.max(-self.processor.cycle_counter) as i64
        } else {
            timestamp + self.config.idle_granularity as i64
        }
    }

    fn run_drawing(&mut self) {
        if self.config.instant_draw {
            self.processor.cycle_counter = Vdp1Config::INSTANT_DRAW_BUDGET;
        }

        while self.processor.cycle_counter > 0 {
            match self.processor.phase {
                Phase::Fetch => {
                    self.processor.command =
                        CommandRecord::fetch(&self.vram, self.processor.cur_addr);
                    self.processor.phase = Phase::Dispatch;
                    self.processor.cycle_counter -= COMMAND_FETCH;
                }
                Phase::Dispatch => {
                    let record = self.processor.command;

                    if record.is_end() {
                        self.finish_drawing();
                        return;
                    }

                    if record.is_skip() {
                        self.processor.phase = Phase::Branch;
                        continue;
                    }

                    let Some(opcode) = Opcode::decode(record.control()) else {
                        log::warn!(
                            "VDP1 malformed command 0x{:04X} at 0x{:05X}, drawing stopped",
                            record.control(),
                            self.processor.cur_addr
                        );
                        self.processor.drawing_active = false;
                        return;
                    };

                    let cost = self.begin_command(opcode, &record);
                    self.processor.phase = if opcode.is_primitive() {
                        Phase::Primitive
                    } else {
                        Phase::Branch
                    };
                    self.processor.cycle_counter -= cost;
                }
                Phase::Primitive => {
                    let step = self.resume_primitive();
                    if step.done {
                        self.processor.phase = Phase::Branch;
                    }
                    self.processor.cycle_counter -= step.cycles;
                }
                Phase::Branch => {
                    self.branch();
                    self.processor.phase = Phase::Fetch;
                }
            }
        }
    }

    /// Move to the next record according to the current record's jump mode
    fn branch(&mut self) {
        let record = self.processor.command;
        let next = (self.processor.cur_addr + CommandRecord::WORDS) & VRAM_MASK;

        self.processor.cur_addr = match JumpMode::from_control(record.control()) {
            JumpMode::Next => next,
            JumpMode::Assign => record.link(),
            JumpMode::Call => {
                // Single entry; a nested call replaces the saved address
                self.processor.ret_addr = Some(next);
                record.link()
            }
            JumpMode::Return => self.processor.ret_addr.take().unwrap_or(next),
        };
    }

    /// End of the command list: raise CEF and the draw-end interrupt
    fn finish_drawing(&mut self) {
        log::debug!(
            "VDP1 drawing finished at 0x{:05X}",
            self.processor.cur_addr
        );
        self.processor.drawing_active = false;
        self.regs.edsr |= Edsr::CEF.bits();
        self.processor.draw_end_irq = true;
    }

    /// Begin executing the command list at address 0
    pub(in crate::core::vdp1) fn start_drawing(&mut self) {
        if self.processor.drawing_active {
            log::warn!("VDP1 drawing interrupted by a new drawing start request");
        }
        log::debug!("VDP1 started drawing to framebuffer {}", self.fb.draw_index());

        self.regs.edsr &= !Edsr::CEF.bits();
        self.processor.cur_addr = 0;
        self.processor.ret_addr = None;
        self.processor.drawing_active = true;
        self.processor.phase = Phase::Fetch;
        self.processor.snapshot = None;
        self.processor.cycle_counter = self.config.update_granularity;
    }

    /// Stop drawing on request (ENDR write)
    pub(in crate::core::vdp1) fn force_terminate(&mut self) {
        if !self.processor.drawing_active {
            return;
        }

        log::warn!("VDP1 drawing forcibly terminated");
        self.processor.drawing_active = false;
        self.processor.snapshot = None;
        self.processor.phase = Phase::Fetch;
        self.processor.cycle_counter = self.processor.cycle_counter.max(0);
    }
}
