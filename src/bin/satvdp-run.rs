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

use clap::Parser;
use log::{error, info};
use satvdp::core::error::Result;
use satvdp::core::save_state::SaveState;
use satvdp::core::system::{System, DISPLAY_WIDTH, VISIBLE_LINES};
use satvdp::core::vdp1::{Registers, REG_PTMR};
use satvdp::core::Vdp1Config;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Saturn VDP1 command list runner
#[derive(Parser)]
#[command(name = "satvdp-run")]
#[command(about = "Run a VDP1 command list and dump the displayed framebuffer", long_about = None)]
struct Args {
    /// Raw big-endian VRAM image holding the command list at address 0
    vram_image: PathBuf,

    /// TOML timing configuration
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short = 'n', long, default_value = "2")]
    frames: u32,

    /// Plot trigger mode (1 = draw once, 2 = draw on every frame change)
    #[arg(short = 'p', long, default_value = "2")]
    ptmr: u16,

    /// Output image (binary PPM)
    #[arg(short = 'o', long, default_value = "frame.ppm")]
    output: PathBuf,

    /// Write a save state after the last frame
    #[arg(short = 's', long)]
    save_state: Option<PathBuf>,

    /// Print a JSON register report
    #[arg(long)]
    json: bool,
}

/// Register summary printed with `--json`
#[derive(Serialize)]
struct Report<'a> {
    frames: u64,
    drawing: bool,
    command_address: u32,
    return_address: Option<u32>,
    registers: &'a Registers,
    interrupt_status: u32,
}

/// Expand a 15-bit RGB pixel (red in the low bits) to 8-bit channels
fn rgb555(pixel: u16) -> [u8; 3] {
    let channel = |shift: u16| (((pixel >> shift) & 0x1F) << 3) as u8;
    [channel(0), channel(5), channel(10)]
}

/// Encode the captured display as a binary PPM
///
/// 16bpp pixels without the RGB flag and 8bpp indices are shown as grey.
fn encode_ppm(display: &[u16], packed_8bpp: bool) -> Vec<u8> {
    let width = if packed_8bpp {
        DISPLAY_WIDTH * 2
    } else {
        DISPLAY_WIDTH
    };
    let mut out = format!("P6\n{} {}\n255\n", width, VISIBLE_LINES).into_bytes();

    for &word in display {
        if packed_8bpp {
            for index in [(word >> 8) as u8, word as u8] {
                out.extend_from_slice(&[index, index, index]);
            }
        } else if word & 0x8000 != 0 {
            out.extend_from_slice(&rgb555(word));
        } else {
            let index = word as u8;
            out.extend_from_slice(&[index, index, index]);
        }
    }
    out
}

fn main() -> Result<()> {
    // Optional .env for log filters
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("satvdp-run v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Vdp1Config::load(path)?,
        None => Vdp1Config::default(),
    };
    let mut system = System::with_config(config);

    info!("Loading VRAM image from: {}", args.vram_image.display());
    let image = fs::read(&args.vram_image)?;
    if let Err(e) = system.vdp1_mut().load_vram_image(&image) {
        error!("Failed to load VRAM image: {}", e);
        return Err(e);
    }

    system.vdp1_mut().write_register(REG_PTMR, args.ptmr & 0x3);

    let log_interval = (args.frames / 10).max(1);
    for frame in 0..args.frames {
        system.run_frame();
        if (frame + 1) % log_interval == 0 {
            info!(
                "Frame {}/{} | drawing: {} | COPR: 0x{:04X}",
                frame + 1,
                args.frames,
                system.vdp1().is_drawing(),
                system.vdp1().command_address() >> 2
            );
        }
    }

    let (display, packed) = system.display();
    let mut file = fs::File::create(&args.output)?;
    file.write_all(&encode_ppm(display, packed))?;
    info!("Wrote {}", args.output.display());

    if let Some(path) = &args.save_state {
        SaveState::from_system(&system)
            .with_label("satvdp-run")
            .save_to_file(path)?;
    }

    if args.json {
        let report = Report {
            frames: system.frame_count(),
            drawing: system.vdp1().is_drawing(),
            command_address: system.vdp1().command_address(),
            return_address: system.vdp1().return_address(),
            registers: system.vdp1().registers(),
            interrupt_status: system.interrupts().read_status(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
