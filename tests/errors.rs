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

use itertools::iproduct;
use yp::{ColorSpace, ErrorKind, FilterMode, PixelFormat, STRIDE_AUTO};
use yuv_primitives as yp;

fn yuv_to_rgb_errors() {
    let constants = ColorSpace::Bt601.yuv_constants();
    let y = [0_u8; 64];
    let uv = [0_u8; 32];
    let mut dst = [0_u8; 256];

    let convert = |y: &[u8], y_stride: usize, dst: &mut [u8], width: i32, height: i32| {
        yp::i422_to_argb_matrix(
            y,
            y_stride,
            &uv,
            STRIDE_AUTO,
            &uv,
            STRIDE_AUTO,
            dst,
            STRIDE_AUTO,
            constants,
            width,
            height,
        )
    };

    assert_eq!(convert(&y, STRIDE_AUTO, &mut dst, 8, 8), Ok(()));
    assert_eq!(convert(&[], STRIDE_AUTO, &mut dst, 8, 8), Err(ErrorKind::InvalidValue));
    assert_eq!(convert(&y, STRIDE_AUTO, &mut [], 8, 8), Err(ErrorKind::InvalidValue));
    assert_eq!(convert(&y, 4, &mut dst, 8, 8), Err(ErrorKind::InvalidValue));
    assert_eq!(convert(&y, 16, &mut dst, 8, 8), Err(ErrorKind::NotEnoughData));
    assert_eq!(convert(&y, STRIDE_AUTO, &mut dst[..255], 8, 8), Err(ErrorKind::NotEnoughData));

    for (&width, &height) in iproduct!(&[0, -1, 8], &[0, 8]) {
        if width != 8 || height != 8 {
            assert_eq!(
                convert(&y, STRIDE_AUTO, &mut dst, width, height),
                Err(ErrorKind::InvalidValue)
            );
        }
    }

    // Three bytes per pixel cannot hold a yuv conversion
    let mut rgb = [0_u8; 192];
    assert_eq!(
        yp::i422_to_packed_matrix(
            &y,
            STRIDE_AUTO,
            &uv,
            STRIDE_AUTO,
            &uv,
            STRIDE_AUTO,
            &mut rgb,
            STRIDE_AUTO,
            PixelFormat::Rgb24,
            constants,
            8,
            8,
        ),
        Err(ErrorKind::InvalidOperation)
    );
}

fn rgb_to_yuv_errors() {
    let argb = [0_u8; 4 * 5 * 3];
    let mut y = [0_u8; 15];
    let mut u = [0_u8; 9];
    let mut v = [0_u8; 9];

    assert_eq!(
        yp::argb_to_i422(
            &argb,
            STRIDE_AUTO,
            &mut y,
            STRIDE_AUTO,
            &mut u,
            STRIDE_AUTO,
            &mut v,
            STRIDE_AUTO,
            5,
            3,
        ),
        Ok(())
    );
    assert_eq!(
        yp::argb_to_i422(
            &argb,
            STRIDE_AUTO,
            &mut y,
            STRIDE_AUTO,
            &mut u[..8],
            STRIDE_AUTO,
            &mut v,
            STRIDE_AUTO,
            5,
            3,
        ),
        Err(ErrorKind::NotEnoughData)
    );

    // Chroma of an i420 image has half the rows
    assert_eq!(
        yp::argb_to_i420(
            &argb,
            STRIDE_AUTO,
            &mut y,
            STRIDE_AUTO,
            &mut u[..6],
            STRIDE_AUTO,
            &mut v[..6],
            STRIDE_AUTO,
            5,
            3,
        ),
        Ok(())
    );
    assert_eq!(
        yp::argb_to_i420(
            &argb,
            STRIDE_AUTO,
            &mut y,
            STRIDE_AUTO,
            &mut u[..5],
            STRIDE_AUTO,
            &mut v,
            STRIDE_AUTO,
            5,
            3,
        ),
        Err(ErrorKind::NotEnoughData)
    );
    assert_eq!(
        yp::argb_to_i420(
            &argb,
            19,
            &mut y,
            STRIDE_AUTO,
            &mut u,
            STRIDE_AUTO,
            &mut v,
            STRIDE_AUTO,
            5,
            3,
        ),
        Err(ErrorKind::InvalidValue)
    );

    let mut uyvy = [0_u8; 36];
    assert_eq!(
        yp::argb_to_uyvy(&argb, STRIDE_AUTO, &mut uyvy, STRIDE_AUTO, 5, -3),
        Ok(())
    );
    assert_eq!(
        yp::argb_to_uyvy(&argb, STRIDE_AUTO, &mut uyvy[..35], STRIDE_AUTO, 5, 3),
        Err(ErrorKind::NotEnoughData)
    );
}

fn planar_errors() {
    let src = [7_u8; 64];
    let mut dst = [0_u8; 64];

    assert_eq!(
        yp::copy_plane(&src, STRIDE_AUTO, &mut dst, 7, 8, 8),
        Err(ErrorKind::InvalidValue)
    );
    assert_eq!(
        yp::argb_copy(&src, STRIDE_AUTO, &mut dst, STRIDE_AUTO, 4, 5),
        Err(ErrorKind::NotEnoughData)
    );
    assert_eq!(
        yp::argb_shuffle(&src, STRIDE_AUTO, &mut dst, STRIDE_AUTO, &[0, 1, 2, 4], 4, 4),
        Err(ErrorKind::InvalidValue)
    );

    // Nothing is written when validation fails
    assert!(dst.iter().all(|&x| x == 0));
}

fn scale_errors() {
    let src = [0_u8; 64];
    let mut dst = [0_u8; 64];

    let scale = |src: &[u8], dst: &mut [u8], src_size: (i32, i32), dst_size: (i32, i32)| {
        yp::scale_plane(
            src,
            STRIDE_AUTO,
            src_size.0,
            src_size.1,
            dst,
            STRIDE_AUTO,
            dst_size.0,
            dst_size.1,
            FilterMode::Bilinear,
        )
    };

    assert_eq!(scale(&src, &mut dst, (8, 8), (4, 4)), Ok(()));
    assert_eq!(scale(&src, &mut dst, (8, -8), (4, 4)), Ok(()));
    assert_eq!(scale(&[], &mut dst, (8, 8), (4, 4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (0, 8), (4, 4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (8, 0), (4, 4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (8, 8), (0, 4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (8, 8), (4, -4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (32769, 1), (4, 4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (1, -32769), (4, 4)), Err(ErrorKind::InvalidValue));
    assert_eq!(scale(&src, &mut dst, (8, 8), (9, 8)), Err(ErrorKind::NotEnoughData));

    assert_eq!(
        yp::argb_scale(&src, STRIDE_AUTO, 4, 4, &mut dst, STRIDE_AUTO, 5, 4, FilterMode::Box),
        Err(ErrorKind::NotEnoughData)
    );
}

#[cfg(all(test, not(feature = "test_instruction_sets")))]
mod errors {
    use super::{planar_errors, rgb_to_yuv_errors, scale_errors, yuv_to_rgb_errors};
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test as test;

    #[test]
    fn yuv_to_rgb() {
        yuv_to_rgb_errors();
    }

    #[test]
    fn rgb_to_yuv() {
        rgb_to_yuv_errors();
    }

    #[test]
    fn planar() {
        planar_errors();
    }

    #[test]
    fn scale() {
        scale_errors();
    }
}

#[cfg(all(test, feature = "test_instruction_sets"))]
mod errors {
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

            yuv_to_rgb_errors();
            rgb_to_yuv_errors();
            planar_errors();
            scale_errors();
        }
    }
}
