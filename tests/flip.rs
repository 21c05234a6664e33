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
#![allow(clippy::too_many_lines)] // This requires effort to handle

mod common;

use common::{dims, random_bytes, reversed, HEIGHTS, WIDTHS};
use itertools::iproduct;
use yp::{ColorSpace, STRIDE_AUTO};
use yuv_primitives as yp;

/// Converting with a negative height gives the upright result with its rows reversed.
///
/// `convert` receives the destination and the sign to apply to the height.
fn assert_reversed<F>(len: usize, height: usize, mut convert: F)
where
    F: FnMut(&mut [u8], i32),
{
    let mut upright = vec![0_u8; len];
    let mut flipped = vec![0_u8; len];
    convert(&mut upright, 1);
    convert(&mut flipped, -1);
    assert_eq!(flipped, reversed(&upright, height));
}

fn yuv_to_rgb_flip_ok() {
    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let chroma = (w + 1) / 2;
        let y = random_bytes(w * h);
        let u = random_bytes(chroma * h);
        let v = random_bytes(chroma * h);
        let alpha = random_bytes(w * h);
        let constants = ColorSpace::Bt709.yuv_constants();

        assert_reversed(4 * w * h, h, |dst, sign| {
            yp::i422_to_abgr_matrix(
                &y,
                STRIDE_AUTO,
                &u,
                STRIDE_AUTO,
                &v,
                STRIDE_AUTO,
                dst,
                STRIDE_AUTO,
                constants,
                width,
                sign * height,
            )
            .unwrap();
        });

        assert_reversed(4 * w * h, h, |dst, sign| {
            yp::i422_to_rgba_matrix(
                &y,
                STRIDE_AUTO,
                &u,
                STRIDE_AUTO,
                &v,
                STRIDE_AUTO,
                dst,
                STRIDE_AUTO,
                constants,
                width,
                sign * height,
            )
            .unwrap();
        });

        for &attenuate in &[false, true] {
            assert_reversed(4 * w * h, h, |dst, sign| {
                yp::i422_alpha_to_argb_matrix(
                    &y,
                    STRIDE_AUTO,
                    &u,
                    STRIDE_AUTO,
                    &v,
                    STRIDE_AUTO,
                    &alpha,
                    STRIDE_AUTO,
                    dst,
                    STRIDE_AUTO,
                    constants,
                    width,
                    sign * height,
                    attenuate,
                )
                .unwrap();
            });
        }
    }
}

fn rgb_to_yuv_flip_ok() {
    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let chroma = (w + 1) / 2;
        let chroma_height = (h + 1) / 2;
        let argb = random_bytes(4 * w * h);
        let upside_down = reversed(&argb, h);

        let i422 = |src: &[u8], height: i32| {
            let mut y = vec![0_u8; w * h];
            let mut u = vec![0_u8; chroma * h];
            let mut v = vec![0_u8; chroma * h];
            yp::argb_to_i422(
                src,
                STRIDE_AUTO,
                &mut y,
                STRIDE_AUTO,
                &mut u,
                STRIDE_AUTO,
                &mut v,
                STRIDE_AUTO,
                width,
                height,
            )
            .unwrap();

            (y, u, v)
        };

        let upright = i422(&argb, height);
        let flipped = i422(&argb, -height);
        assert_eq!(flipped, i422(&upside_down, height));
        assert_eq!(flipped.0, reversed(&upright.0, h));
        assert_eq!(flipped.1, reversed(&upright.1, h));
        assert_eq!(flipped.2, reversed(&upright.2, h));

        let i420 = |src: &[u8], height: i32| {
            let mut y = vec![0_u8; w * h];
            let mut u = vec![0_u8; chroma * chroma_height];
            let mut v = vec![0_u8; chroma * chroma_height];
            yp::argb_to_i420(
                src,
                STRIDE_AUTO,
                &mut y,
                STRIDE_AUTO,
                &mut u,
                STRIDE_AUTO,
                &mut v,
                STRIDE_AUTO,
                width,
                height,
            )
            .unwrap();

            (y, u, v)
        };

        // Rows are paired from the bottom when the source is read bottom-up
        let flipped = i420(&argb, -height);
        assert_eq!(flipped, i420(&upside_down, height));
        assert_eq!(flipped.0, reversed(&i420(&argb, height).0, h));
        if h % 2 == 1 {
            let last = chroma * (chroma_height - 1);
            assert_eq!(flipped.1[last..], upright.1[..chroma]);
            assert_eq!(flipped.2[last..], upright.2[..chroma]);
        }
    }
}

fn uyvy_flip_ok() {
    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let chroma = (w + 1) / 2;
        let y = random_bytes(w * h);
        let u = random_bytes(chroma * h);
        let v = random_bytes(chroma * h);

        assert_reversed(4 * chroma * h, h, |dst, sign| {
            yp::i422_to_uyvy(
                &y,
                STRIDE_AUTO,
                &u,
                STRIDE_AUTO,
                &v,
                STRIDE_AUTO,
                dst,
                STRIDE_AUTO,
                width,
                sign * height,
            )
            .unwrap();
        });

        let uyvy = random_bytes(4 * chroma * h);
        let planes = |src: &[u8], height: i32| {
            let mut y = vec![0_u8; w * h];
            let mut u = vec![0_u8; chroma * h];
            let mut v = vec![0_u8; chroma * h];
            yp::uyvy_to_i422(
                src,
                STRIDE_AUTO,
                &mut y,
                STRIDE_AUTO,
                &mut u,
                STRIDE_AUTO,
                &mut v,
                STRIDE_AUTO,
                width,
                height,
            )
            .unwrap();

            (y, u, v)
        };

        let upright = planes(&uyvy, height);
        let flipped = planes(&uyvy, -height);
        assert_eq!(flipped, planes(&reversed(&uyvy, h), height));
        assert_eq!(flipped.0, reversed(&upright.0, h));
        assert_eq!(flipped.1, reversed(&upright.1, h));
        assert_eq!(flipped.2, reversed(&upright.2, h));

        let constants = ColorSpace::Bt601.yuv_constants();
        assert_reversed(4 * w * h, h, |dst, sign| {
            yp::uyvy_to_argb_matrix(
                &uyvy,
                STRIDE_AUTO,
                dst,
                STRIDE_AUTO,
                constants,
                width,
                sign * height,
            )
            .unwrap();
        });
    }
}

fn argb_flip_ok() {
    for (&width, &height) in iproduct!(&WIDTHS, &HEIGHTS) {
        let (w, h) = dims(width, height);
        let argb = random_bytes(4 * w * h);

        assert_reversed(4 * w * h, h, |dst, sign| {
            yp::argb_attenuate(&argb, STRIDE_AUTO, dst, STRIDE_AUTO, width, sign * height)
                .unwrap();
        });

        assert_reversed(4 * w * h, h, |dst, sign| {
            yp::argb_unattenuate(&argb, STRIDE_AUTO, dst, STRIDE_AUTO, width, sign * height)
                .unwrap();
        });

        assert_reversed(4 * w * h, h, |dst, sign| {
            yp::argb_shuffle(
                &argb,
                STRIDE_AUTO,
                dst,
                STRIDE_AUTO,
                &[3, 0, 2, 1],
                width,
                sign * height,
            )
            .unwrap();
        });

        // Flipping twice gives back the source
        let identity = [0_u8, 1, 2, 3];
        let mut once = vec![0_u8; 4 * w * h];
        let mut twice = vec![0_u8; 4 * w * h];
        yp::argb_shuffle(&argb, STRIDE_AUTO, &mut once, STRIDE_AUTO, &identity, width, -height)
            .unwrap();
        yp::argb_shuffle(&once, STRIDE_AUTO, &mut twice, STRIDE_AUTO, &identity, width, -height)
            .unwrap();
        assert_eq!(twice, argb);
    }
}

#[cfg(all(test, not(feature = "test_instruction_sets")))]
mod flip {
    use super::{argb_flip_ok, rgb_to_yuv_flip_ok, uyvy_flip_ok, yuv_to_rgb_flip_ok};
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test as test;

    #[test]
    fn yuv_to_rgb() {
        yuv_to_rgb_flip_ok();
    }

    #[test]
    fn rgb_to_yuv() {
        rgb_to_yuv_flip_ok();
    }

    #[test]
    fn uyvy() {
        uyvy_flip_ok();
    }

    #[test]
    fn argb() {
        argb_flip_ok();
    }
}

#[cfg(all(test, feature = "test_instruction_sets"))]
mod flip {
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

            yuv_to_rgb_flip_ok();
            rgb_to_yuv_flip_ok();
            uyvy_flip_ok();
            argb_flip_ok();
        }
    }
}
