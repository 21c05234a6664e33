#![warn(unused)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod common;

use common::{dims, random_bytes, rows};
use itertools::iproduct;
use yp::{FilterMode, STRIDE_AUTO};
use yuv_primitives as yp;

const FILTERS: [FilterMode; 4] = [
    FilterMode::None,
    FilterMode::Linear,
    FilterMode::Bilinear,
    FilterMode::Box,
];

const SOURCES: [(i32, i32); 7] = [(1, 1), (2, 2), (3, 5), (8, 8), (17, 9), (64, 3), (40, 32)];
const DESTINATIONS: [(i32, i32); 8] = [
    (1, 1),
    (2, 3),
    (4, 4),
    (9, 17),
    (17, 4),
    (32, 2),
    (16, 16),
    (20, 8),
];

fn scale(
    bpp: usize,
    src: &[u8],
    (src_width, src_height): (i32, i32),
    dst: &mut [u8],
    (dst_width, dst_height): (i32, i32),
    filtering: FilterMode,
) {
    if bpp == 4 {
        yp::argb_scale(
            src,
            STRIDE_AUTO,
            src_width,
            src_height,
            dst,
            STRIDE_AUTO,
            dst_width,
            dst_height,
            filtering,
        )
        .unwrap();
    } else {
        yp::scale_plane(
            src,
            STRIDE_AUTO,
            src_width,
            src_height,
            dst,
            STRIDE_AUTO,
            dst_width,
            dst_height,
            filtering,
        )
        .unwrap();
    }
}

fn identity_ok() {
    for (&bpp, &(width, height), &filtering) in iproduct!(&[1, 4], &SOURCES, &FILTERS) {
        let (w, h) = dims(width, height);
        let src = random_bytes(bpp * w * h);
        let mut dst = vec![0_u8; bpp * w * h];

        scale(bpp, &src, (width, height), &mut dst, (width, height), filtering);
        assert_eq!(src, dst);

        scale(bpp, &src, (width, -height), &mut dst, (width, height), filtering);
        let row = bpp * w;
        let mut flipped = rows(&dst, row, row, h);
        flipped.reverse();
        assert_eq!(rows(&src, row, row, h), flipped);
    }
}

fn solid_color_ok() {
    let color = [12_u8, 200, 77, 255];
    for (&bpp, &src_size, &dst_size, &filtering) in
        iproduct!(&[1, 4], &SOURCES, &DESTINATIONS, &FILTERS)
    {
        let (sw, sh) = dims(src_size.0, src_size.1);
        let (dw, dh) = dims(dst_size.0, dst_size.1);
        let pixel = &color[..bpp];
        let src = pixel.repeat(sw * sh);
        let mut dst = vec![0_u8; bpp * dw * dh];

        scale(bpp, &src, src_size, &mut dst, dst_size, filtering);
        assert!(
            dst.chunks_exact(bpp).all(|p| p == pixel),
            "{src_size:?} -> {dst_size:?} {filtering:?}"
        );
    }
}

fn down2_ok() {
    let src = [0_u8, 4, 8, 12, 4, 8, 12, 16];
    let mut dst = [0_u8; 2];

    scale(1, &src, (4, 2), &mut dst, (2, 1), FilterMode::Box);
    assert_eq!(dst, [4, 12]);

    scale(1, &src, (4, 2), &mut dst, (2, 1), FilterMode::None);
    assert_eq!(dst, [8, 16]);

    scale(1, &src, (4, 2), &mut dst, (2, 1), FilterMode::Linear);
    assert_eq!(dst, [6, 14]);
}

fn upscale_ok() {
    // A horizontal ramp stays monotonic
    let width = 16;
    let src: Vec<u8> = (0..width).map(|x| x * 16).collect();
    for &filtering in &[FilterMode::Linear, FilterMode::Bilinear] {
        let mut dst = vec![0_u8; 4 * 37 * 3];
        let mut argb = Vec::new();
        for &value in &src {
            argb.extend_from_slice(&[value, value, value, 255]);
        }

        scale(4, &argb, (16, 1), &mut dst, (37, 3), filtering);
        for row in dst.chunks_exact(4 * 37) {
            let blue: Vec<u8> = row.chunks_exact(4).map(|p| p[0]).collect();
            assert!(blue.windows(2).all(|pair| pair[0] <= pair[1]));
            assert_eq!(blue[0], 0);
            assert_eq!(blue[36], 240);
        }
    }
}

#[cfg(all(test, not(feature = "test_instruction_sets")))]
mod scale {
    use super::{down2_ok, identity_ok, solid_color_ok, upscale_ok};
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test as test;

    #[test]
    fn identity() {
        identity_ok();
    }

    #[test]
    fn solid_color() {
        solid_color_ok();
    }

    #[test]
    fn down2() {
        down2_ok();
    }

    #[test]
    fn upscale() {
        upscale_ok();
    }
}

#[cfg(all(test, feature = "test_instruction_sets"))]
mod scale {
    use super::*;
    use yp::initialize_with_instruction_set;

    #[test]
    fn coverage() {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        const SETS: [&str; 4] = ["x86", "sse2", "ssse3", "avx2"];
        #[cfg(target_arch = "aarch64")]
        const SETS: [&str; 2] = ["x86", "neon"];
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
        const SETS: [&str; 1] = ["x86"];

        for set in &SETS {
            initialize_with_instruction_set(set);

            identity_ok();
            solid_color_ok();
            down2_ok();
            upscale_ok();
        }
    }
}
