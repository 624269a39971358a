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

//! VDP1 module tests
//!
//! Tests are organized into the following modules:
//! - `helpers`: command record builder and run-to-completion driver
//! - `basic`: power-on state, bus access, register surface
//! - `commands`: command list control flow and control commands
//! - `rendering`: lines, polygons, sprites and the pixel compositor
//! - `clipping`: system/user clipping and pre-clipping
//! - `suspend`: cycle budget, suspension and resume equivalence
//! - `framebuffer`: frame change, erase and display readout

mod clipping;
mod helpers;
