// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
#![allow(clippy::cast_possible_truncation, clippy::cast_ptr_alignment)]
use crate::color_space::YuvConstants;
use crate::pixel_format::{PackedShuffle, PixelFormatDescriptor};

use core::arch::aarch64::*;
use core::ptr;

/// Loads 4 pixels of 3 or 4 bytes, without touching memory past them
#[inline(always)]
unsafe fn load_pixels_4x(src: *const u8, bpp: usize) -> uint8x16_t {
    if bpp == 4 {
        vld1q_u8(src)
    } else {
        let mut block = [0_u8; 16];
        ptr::copy_nonoverlapping(src, block.as_mut_ptr(), 12);
        vld1q_u8(block.as_ptr())
    }
}

#[inline(always)]
unsafe fn store_pixels_4x(dst: *mut u8, bpp: usize, x: uint8x16_t) {
    if bpp == 4 {
        vst1q_u8(dst, x);
    } else {
        let mut block = [0_u8; 16];
        vst1q_u8(block.as_mut_ptr(), x);
        ptr::copy_nonoverlapping(block.as_ptr(), dst, 12);
    }
}

/// (a * b) >> 16 on unsigned shorts (8-wide)
#[inline(always)]
unsafe fn mulhi_u16(a: uint16x8_t, b: uint16x8_t) -> uint16x8_t {
    let lo = vmull_u16(vget_low_u16(a), vget_low_u16(b));
    let hi = vmull_high_u16(a, b);
    vcombine_u16(vshrn_n_u32(lo, 16), vshrn_n_u32(hi, 16))
}

/// Byte widened to a short and multiplied by 257
#[inline(always)]
unsafe fn times_257(x: uint8x8_t) -> uint16x8_t {
    let x = vmovl_u8(x);
    vorrq_u16(x, vshlq_n_u16(x, 8))
}

/// Doubles 4 chroma samples and centers them
///
/// src: u3 u2 u1 u0
/// res: u3 u3 u2 u2 u1 u1 u0 u0 (16 bits each, minus 128)
#[inline(always)]
unsafe fn upsample_chroma_8x(src: *const u8) -> int16x8_t {
    let x = vreinterpret_u8_u32(vdup_n_u32(src.cast::<u32>().read_unaligned()));
    let x = vmovl_u8(vzip1_u8(x, x));
    vsubq_s16(vreinterpretq_s16_u16(x), vdupq_n_s16(128))
}

#[inline(always)]
unsafe fn i422_to_bgr_8x(
    y: *const u8,
    u: *const u8,
    v: *const u8,
    c: &YuvConstants,
) -> (uint8x8_t, uint8x8_t, uint8x8_t) {
    let y1 = vaddq_s16(
        vreinterpretq_s16_u16(mulhi_u16(times_257(vld1_u8(y)), vdupq_n_u16(c.yg as u16))),
        vdupq_n_s16(c.yb as i16),
    );
    let u = upsample_chroma_8x(u);
    let v = upsample_chroma_8x(v);

    let b = vqaddq_s16(y1, vmulq_n_s16(u, c.ub as i16));
    let g = vqsubq_s16(
        y1,
        vaddq_s16(vmulq_n_s16(u, c.ug as i16), vmulq_n_s16(v, c.vg as i16)),
    );
    let r = vqaddq_s16(y1, vmulq_n_s16(v, c.vr as i16));

    (
        vqshrun_n_s16(b, 6),
        vqshrun_n_s16(g, 6),
        vqshrun_n_s16(r, 6),
    )
}

#[target_feature(enable = "neon")]
pub unsafe fn shuffle_row(src: &[u8], dst: &mut [u8], shuffle: &PackedShuffle, width: usize) {
    debug_assert!(width % 4 == 0 && src.len() >= width * shuffle.src_bpp);
    debug_assert!(dst.len() >= width * shuffle.dst_bpp);

    let lanes = vld1q_u8(shuffle.lanes.as_ptr());
    let fill = vld1q_u8(shuffle.fill.as_ptr());
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(4) {
        let pixels = load_pixels_4x(src.add(x * shuffle.src_bpp), shuffle.src_bpp);
        let pixels = vorrq_u8(vqtbl1q_u8(pixels, lanes), fill);
        store_pixels_4x(dst.add(x * shuffle.dst_bpp), shuffle.dst_bpp, pixels);
    }
}

#[target_feature(enable = "neon")]
pub unsafe fn i422_to_rgb_row(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    debug_assert!(width % 8 == 0 && y.len() >= width && dst.len() >= 4 * width);
    debug_assert!(u.len() >= width / 2 && v.len() >= width / 2);

    let alpha = vdup_n_u8(0xff);
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let (b, g, r) = i422_to_bgr_8x(
            y.as_ptr().add(x),
            u.as_ptr().add(x / 2),
            v.as_ptr().add(x / 2),
            c,
        );

        let mut pixels = [alpha; 4];
        pixels[layout.b] = b;
        pixels[layout.g] = g;
        pixels[layout.r] = r;
        vst4_u8(
            dst.add(4 * x),
            uint8x8x4_t(pixels[0], pixels[1], pixels[2], pixels[3]),
        );
    }
}

#[inline(always)]
unsafe fn attenuate_8x(x: uint8x8_t, alpha: uint16x8_t) -> uint8x8_t {
    vmovn_u16(mulhi_u16(vmovl_u8(x), alpha))
}

#[target_feature(enable = "neon")]
pub unsafe fn attenuate_row(src: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 8 == 0 && src.len() >= 4 * width && dst.len() >= 4 * width);

    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let pixels = vld4_u8(src.add(4 * x));
        let alpha = times_257(pixels.3);
        vst4_u8(
            dst.add(4 * x),
            uint8x8x4_t(
                attenuate_8x(pixels.0, alpha),
                attenuate_8x(pixels.1, alpha),
                attenuate_8x(pixels.2, alpha),
                pixels.3,
            ),
        );
    }
}

#[target_feature(enable = "neon")]
pub unsafe fn interpolate_row(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    fraction: u32,
    width: usize,
) {
    debug_assert!(width % 16 == 0 && src0.len() >= width && src1.len() >= width);
    debug_assert!(dst.len() >= width && fraction < 256);

    if fraction == 0 {
        dst[..width].copy_from_slice(&src0[..width]);
        return;
    }

    let f0 = vdup_n_u8((256 - fraction) as u8);
    let f1 = vdup_n_u8(fraction as u8);
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let a = vld1q_u8(src0.as_ptr().add(x));
        let b = vld1q_u8(src1.as_ptr().add(x));
        let lo = vmlal_u8(vmull_u8(vget_low_u8(a), f0), vget_low_u8(b), f1);
        let hi = vmlal_u8(vmull_u8(vget_high_u8(a), f0), vget_high_u8(b), f1);
        vst1q_u8(
            dst.add(x),
            vcombine_u8(vrshrn_n_u16(lo, 8), vrshrn_n_u16(hi, 8)),
        );
    }
}
