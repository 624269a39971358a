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

//! System/user clipping and pre-clipping

use super::super::*;
use super::helpers::*;
use proptest::prelude::*;

const SYSTEM_X: i32 = 319;
const SYSTEM_Y: i32 = 223;

fn system_clip() -> Cmd {
    Cmd::new(OP_SYSTEM_CLIP).vertex(2, SYSTEM_X, SYSTEM_Y)
}

fn user_clip(x0: i32, y0: i32, x1: i32, y1: i32) -> Cmd {
    Cmd::new(OP_USER_CLIP).vertex(0, x0, y0).vertex(2, x1, y1)
}

/// Pixel predicate for a clip selection, evaluated independently of the
/// rasterizer
fn allowed(mode: u16, user: (i32, i32, i32, i32), x: i32, y: i32) -> bool {
    let inside_system = x <= SYSTEM_X && y <= SYSTEM_Y;
    let (x0, y0, x1, y1) = user;
    let inside_user = x >= x0 && x <= x1 && y >= y0 && y <= y1;

    match mode {
        MODE_INSIDE_USER => inside_system && inside_user,
        MODE_OUTSIDE_USER => inside_system && !inside_user,
        _ => inside_system,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_written_pixels_satisfy_clip(
        mode in prop::sample::select(vec![0u16, MODE_INSIDE_USER, MODE_OUTSIDE_USER]),
        ux0 in 0i32..200, uy0 in 0i32..150,
        uw in 0i32..200, uh in 0i32..150,
        x0 in 0i32..450, y0 in 0i32..250,
        x1 in 0i32..450, y1 in 0i32..250,
        polygon_quad in any::<bool>(),
    ) {
        let user = (ux0, uy0, ux0 + uw, uy0 + uh);
        let primitive = if polygon_quad {
            polygon(RED, [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]).mode(mode)
        } else {
            line(RED, (x0, y0), (x1, y1)).mode(mode)
        };

        let vdp1 = draw(&[
            system_clip(),
            user_clip(user.0, user.1, user.2, user.3),
            primitive,
            Cmd::end(),
        ]);

        for (x, y) in pixels_with(&vdp1, RED) {
            prop_assert!(
                allowed(mode, user, x as i32, y as i32),
                "({}, {}) written outside the clip region",
                x,
                y
            );
        }
    }
}

#[test]
fn test_system_clip_cuts_line() {
    let vdp1 = draw(&[system_clip(), line(RED, (300, 5), (340, 5)), Cmd::end()]);

    assert_eq!(count_pixels(&vdp1, RED), 20);
    assert_eq!(vdp1.draw_plane_pixel(319, 5), RED);
    assert_eq!(vdp1.draw_plane_pixel(320, 5), 0xFFFF);
}

#[test]
fn test_inside_user_clip() {
    let vdp1 = draw(&[
        user_clip(5, 0, 10, 10),
        line(RED, (0, 5), (20, 5)).mode(MODE_INSIDE_USER),
        Cmd::end(),
    ]);

    let expected: Vec<_> = (5..=10).map(|x| (x, 5)).collect();
    assert_eq!(pixels_with(&vdp1, RED), expected);
}

#[test]
fn test_outside_user_clip_masks_rectangle() {
    let vdp1 = draw(&[
        user_clip(5, 0, 10, 10),
        line(RED, (0, 5), (20, 5)).mode(MODE_OUTSIDE_USER),
        Cmd::end(),
    ]);

    assert_eq!(count_pixels(&vdp1, RED), 21 - 6);
    for x in 5..=10 {
        assert_eq!(vdp1.draw_plane_pixel(x, 5), 0xFFFF);
    }
    assert_eq!(vdp1.draw_plane_pixel(11, 5), RED);
}

#[test]
fn test_user_clip_ignored_without_enable() {
    let vdp1 = draw(&[
        user_clip(5, 0, 10, 10),
        line(RED, (0, 5), (20, 5)).mode(0x0200),
        Cmd::end(),
    ]);

    assert_eq!(count_pixels(&vdp1, RED), 21);
}

#[test]
fn test_inside_user_line_starting_inside() {
    let vdp1 = draw(&[
        user_clip(0, 0, 10, 10),
        line(RED, (0, 0), (20, 0)).mode(MODE_INSIDE_USER),
        Cmd::end(),
    ]);

    assert_eq!(count_pixels(&vdp1, RED), 11);
}

#[test]
fn test_preclip_collapses_offscreen_line() {
    // Entirely right of the system clip: reduced to its first point
    let vdp1 = draw(&[system_clip(), line(RED, (400, 5), (420, 50)), Cmd::end()]);
    assert_eq!(count_pixels(&vdp1, RED), 0);

    // With pre-clipping disabled the line is walked but every pixel is clipped
    let vdp1 = draw(&[
        system_clip(),
        line(RED, (400, 5), (420, 50)).mode(0x0800),
        Cmd::end(),
    ]);
    assert_eq!(count_pixels(&vdp1, RED), 0);
}

#[test]
fn test_preclip_rejects_polygon_beyond_edge() {
    let mut vdp1 = Vdp1::new();
    write_list(
        &mut vdp1,
        &[system_clip(), rect(RED, 0, 300, 200, 400), Cmd::end()],
    );

    vdp1.write_register(REG_PTMR, 1);
    vdp1.advance(0);

    // Rejected during setup: no snapshot, list already finished
    assert!(!vdp1.is_drawing());
    assert_eq!(count_pixels(&vdp1, RED), 0);
}

#[test]
fn test_negative_coordinates_are_clipped() {
    let vdp1 = draw(&[line(RED, (-5, 3), (5, 3)), Cmd::end()]);

    let expected: Vec<_> = (0..=5).map(|x| (x, 3)).collect();
    assert_eq!(pixels_with(&vdp1, RED), expected);
}

#[test]
fn test_horizontal_line_left_of_screen_keeps_direction() {
    // Starts at x = -4, which is not beyond the right edge once read as
    // unsigned 13-bit, so the row is walked right to left from x = 3
    let mut vdp1 = Vdp1::new();
    let mut texels: Vec<u16> = (0..8).map(|i| 0x8000 | i).collect();
    texels[5] = 0x7FFF;
    texels[6] = 0x7FFF;
    write_words(&mut vdp1, 0x1000, &texels);
    let sprite = Cmd::new(OP_NORMAL_SPRITE)
        .mode(MODE_RGB)
        .source(0x1000)
        .size(8, 1)
        .vertex(0, -4, 0);
    write_list(&mut vdp1, &[system_clip(), sprite, Cmd::end()]);
    run_to_completion(&mut vdp1, 0);

    // Texels 6 and 5 are end codes and stop the walk after one pixel
    assert_eq!(pixels_with(&vdp1, 0x8007), vec![(3, 0)]);
    for x in 0..3 {
        assert_eq!(vdp1.draw_plane_pixel(x, 0), 0xFFFF, "pixel ({}, 0)", x);
    }
}

#[test]
fn test_long_line_error_wraps() {
    // 2 * 2500 does not fit the 13-bit error term; the wrapped error steps
    // the minor axis early
    let vdp1 = draw(&[system_clip(), line(RED, (0, 0), (2500, 300)), Cmd::end()]);

    assert_eq!(vdp1.draw_plane_pixel(13, 2), RED);
    assert_eq!(vdp1.draw_plane_pixel(14, 3), RED);
    assert_eq!(vdp1.draw_plane_pixel(16, 4), RED);
    assert_eq!(vdp1.draw_plane_pixel(16, 2), 0xFFFF);
    assert_eq!(vdp1.draw_plane_pixel(19, 2), 0xFFFF);
}

#[test]
fn test_line_terminates_after_leaving_clip() {
    use super::super::render::LineProgress;
    use super::super::timing::{LINE_PRECLIP, LINE_SETUP, PIXEL_STEP, WRITE_16BPP};

    let mut vdp1 = Vdp1::new();
    vdp1.clip.system_x = 9;
    let params = LineParams {
        mode: DrawMode(0),
        color: RED,
        anti_alias: false,
        texture: None,
    };

    let mut slot = None;
    let mut cycles = 0;
    let progress = vdp1.run_line(
        &params,
        &mut slot,
        LineVertex::at(0, 0),
        LineVertex::at(100, 0),
        &mut cycles,
    );

    // Ten visible pixels, then one step outside ends the line
    assert_eq!(progress, LineProgress::Finished);
    assert!(slot.is_none());
    assert_eq!(
        cycles,
        LINE_SETUP + LINE_PRECLIP + 10 * (PIXEL_STEP + WRITE_16BPP) + PIXEL_STEP
    );
}
