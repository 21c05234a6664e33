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

use common::{dims, random_bytes, rows, HEIGHTS, WIDTHS};
use itertools::iproduct;
use yp::STRIDE_AUTO;
use yuv_primitives as yp;

fn copy_ok() {
    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let src = random_bytes(w * h);
        let dst_stride = w + 3;
        let mut dst = vec![0_u8; dst_stride * h];

        yp::copy_plane(&src, STRIDE_AUTO, &mut dst, dst_stride, width, height).unwrap();
        assert_eq!(rows(&src, w, w, h), rows(&dst, dst_stride, w, h));

        // A negative height writes the destination bottom-up
        yp::copy_plane(&src, STRIDE_AUTO, &mut dst, dst_stride, width, -height).unwrap();
        let mut flipped = rows(&dst, dst_stride, w, h);
        flipped.reverse();
        assert_eq!(rows(&src, w, w, h), flipped);

        let argb = random_bytes(4 * w * h);
        let mut copy = vec![0_u8; 4 * w * h];
        yp::argb_copy(&argb, STRIDE_AUTO, &mut copy, STRIDE_AUTO, width, -height).unwrap();
        let mut flipped = rows(&copy, 4 * w, 4 * w, h);
        flipped.reverse();
        assert_eq!(rows(&argb, 4 * w, 4 * w, h), flipped);
    }
}

fn uyvy_to_i422_ok() {
    let uyvy = [10_u8, 1, 20, 2, 30, 3, 40, 4, 50, 5, 60, 6, 70, 7, 80, 8];
    let mut y = [0_u8; 4];
    let mut u = [0_u8; 2];
    let mut v = [0_u8; 2];

    yp::uyvy_to_i422(&uyvy, 8, &mut y, 2, &mut u, 1, &mut v, 1, 2, -2).unwrap();
    assert_eq!(y, [5, 6, 1, 2]);
    assert_eq!(u, [50, 10]);
    assert_eq!(v, [60, 20]);
}

fn attenuate_ok() {
    let src = [10_u8, 20, 30, 255, 200, 100, 50, 128, 90, 80, 70, 0];
    let mut dst = [0_u8; 12];
    yp::argb_attenuate(&src, STRIDE_AUTO, &mut dst, STRIDE_AUTO, 3, 1).unwrap();
    assert_eq!(dst, [9, 19, 29, 255, 100, 50, 25, 128, 0, 0, 0, 0]);

    let src = [50_u8, 60, 70, 128, 10, 20, 30, 255, 90, 80, 70, 0];
    yp::argb_unattenuate(&src, STRIDE_AUTO, &mut dst, STRIDE_AUTO, 3, 1).unwrap();
    assert_eq!(dst, [100, 120, 140, 128, 10, 20, 30, 255, 90, 80, 70, 0]);

    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let mut argb = random_bytes(4 * w * h);
        for pixel in argb.chunks_exact_mut(4) {
            let alpha = pixel[3].max(1);
            pixel[3] = alpha;
            for value in &mut pixel[..3] {
                *value = (*value).min(alpha);
            }
        }

        let mut premultiplied = vec![0_u8; 4 * w * h];
        yp::argb_attenuate(
            &argb,
            STRIDE_AUTO,
            &mut premultiplied,
            STRIDE_AUTO,
            width,
            height,
        )
        .unwrap();

        for (s, d) in argb.chunks_exact(4).zip(premultiplied.chunks_exact(4)) {
            assert_eq!(d[3], s[3]);
            assert!(d[..3].iter().zip(&s[..3]).all(|(d, s)| d <= s));
        }

        // Unattenuating then attenuating again restores the premultiplied values
        let mut straight = vec![0_u8; 4 * w * h];
        yp::argb_unattenuate(
            &premultiplied,
            STRIDE_AUTO,
            &mut straight,
            STRIDE_AUTO,
            width,
            height,
        )
        .unwrap();
        let mut again = vec![0_u8; 4 * w * h];
        yp::argb_attenuate(&straight, STRIDE_AUTO, &mut again, STRIDE_AUTO, width, height)
            .unwrap();

        for (p, a) in premultiplied.iter().zip(&again) {
            assert!(p.abs_diff(*a) <= 2);
        }
    }
}

fn shuffle_ok() {
    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let src = random_bytes(4 * w * h);
        let mut dst = vec![0_u8; 4 * w * h];
        let shuffler = [2_u8, 1, 0, 3];

        yp::argb_shuffle(
            &src,
            STRIDE_AUTO,
            &mut dst,
            STRIDE_AUTO,
            &shuffler,
            width,
            height,
        )
        .unwrap();

        for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact(4)) {
            assert_eq!(d, [s[2], s[1], s[0], s[3]]);
        }
    }

    let mut image: Vec<u8> = (0..16).collect();
    let src = image.clone();
    yp::argb_shuffle(&src, 8, &mut image, 8, &[3, 3, 0, 1], 2, 2).unwrap();
    assert_eq!(
        image,
        [3, 3, 0, 1, 7, 7, 4, 5, 11, 11, 8, 9, 15, 15, 12, 13]
    );
}

#[cfg(all(test, not(feature = "test_instruction_sets")))]
mod planar {
    use super::{attenuate_ok, copy_ok, shuffle_ok, uyvy_to_i422_ok};
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test as test;

    #[test]
    fn copy() {
        copy_ok();
    }

    #[test]
    fn uyvy_to_i422() {
        uyvy_to_i422_ok();
    }

    #[test]
    fn attenuate() {
        attenuate_ok();
    }

    #[test]
    fn shuffle() {
        shuffle_ok();
    }
}

#[cfg(all(test, feature = "test_instruction_sets"))]
mod planar {
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

            copy_ok();
            uyvy_to_i422_ok();
            attenuate_ok();
            shuffle_ok();
        }
    }
}
