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
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_ptr_alignment
)]
use crate::color_space::YuvConstants;
use crate::pixel_format::{PackedShuffle, PixelFormatDescriptor};

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

pub(super) const fn mm_shuffle(z: i32, y: i32, x: i32, w: i32) -> i32 {
    (z << 6) | (y << 4) | (x << 2) | w
}

macro_rules! zero {
    () => {
        _mm_setzero_si128()
    };
}

macro_rules! even_dwords {
    () => {
        mm_shuffle(2, 0, 2, 0)
    };
}

macro_rules! odd_dwords {
    () => {
        mm_shuffle(3, 1, 3, 1)
    };
}

const U_WEIGHTS: (i16, i16, i16) = (112, -74, -38);
const V_WEIGHTS: (i16, i16, i16) = (-18, -94, 112);
const Y_WEIGHTS: (i16, i16, i16) = (25, 129, 66);

#[inline(always)]
pub(super) unsafe fn loadu(src: *const u8) -> __m128i {
    _mm_loadu_si128(src.cast())
}

#[inline(always)]
pub(super) unsafe fn storeu(dst: *mut u8, x: __m128i) {
    _mm_storeu_si128(dst.cast(), x);
}

#[inline(always)]
pub(super) unsafe fn load4(src: *const u8) -> __m128i {
    _mm_cvtsi32_si128(src.cast::<i32>().read_unaligned())
}

#[inline(always)]
pub(super) unsafe fn load8(src: *const u8) -> __m128i {
    _mm_loadl_epi64(src.cast())
}

#[inline(always)]
unsafe fn store8(dst: *mut u8, x: __m128i) {
    _mm_storel_epi64(dst.cast(), x);
}

/// Loads 4 pixels of 3 or 4 bytes, without touching memory past them
///
/// bpp 3: ---- b3g3r3b2 g2r2b1g1 r1b0g0r0
#[inline(always)]
pub(super) unsafe fn load_pixels_4x(src: *const u8, bpp: usize) -> __m128i {
    if bpp == 4 {
        loadu(src)
    } else {
        _mm_unpacklo_epi64(load8(src), load4(src.add(8)))
    }
}

#[inline(always)]
pub(super) unsafe fn store_pixels_4x(dst: *mut u8, bpp: usize, x: __m128i) {
    if bpp == 4 {
        storeu(dst, x);
    } else {
        store8(dst, x);
        dst.add(8)
            .cast::<i32>()
            .write_unaligned(_mm_cvtsi128_si32(_mm_srli_si128(x, 8)));
    }
}

/// Interleaves four planes of 8 samples into 8 pixels
///
/// c0:  -------- c0_7..c0_0
/// res: c3_7c2_7c1_7c0_7 .. c3_0c2_0c1_0c0_0
#[inline(always)]
unsafe fn store_pixels_8x(dst: *mut u8, c: &[__m128i; 4]) {
    let z = _mm_unpacklo_epi8(c[0], c[1]);
    let w = _mm_unpacklo_epi8(c[2], c[3]);
    storeu(dst, _mm_unpacklo_epi16(z, w));
    storeu(dst.add(16), _mm_unpackhi_epi16(z, w));
}

/// Interleaves four planes of 16 samples into 16 pixels
#[inline(always)]
pub(super) unsafe fn store_pixels_16x(dst: *mut u8, c: &[__m128i; 4]) {
    let z0 = _mm_unpacklo_epi8(c[0], c[1]);
    let z1 = _mm_unpackhi_epi8(c[0], c[1]);
    let w0 = _mm_unpacklo_epi8(c[2], c[3]);
    let w1 = _mm_unpackhi_epi8(c[2], c[3]);
    storeu(dst, _mm_unpacklo_epi16(z0, w0));
    storeu(dst.add(16), _mm_unpackhi_epi16(z0, w0));
    storeu(dst.add(32), _mm_unpacklo_epi16(z1, w1));
    storeu(dst.add(48), _mm_unpackhi_epi16(z1, w1));
}

/// Places blue, green, red and alpha planes at the byte positions of `layout`
#[inline(always)]
pub(super) fn order_channels<T: Copy>(
    layout: &PixelFormatDescriptor,
    b: T,
    g: T,
    r: T,
    a: T,
) -> [T; 4] {
    let mut c = [a; 4];
    c[layout.b] = b;
    c[layout.g] = g;
    c[layout.r] = r;
    c
}

/// Channel weights repeated for two pixels, for use with madd
pub(super) fn pixel_weights(layout: &PixelFormatDescriptor, weights: (i16, i16, i16)) -> [i16; 8] {
    let mut w = [0; 8];
    for pixel in [0, 4] {
        w[pixel + layout.b] = weights.0;
        w[pixel + layout.g] = weights.1;
        w[pixel + layout.r] = weights.2;
    }

    w
}

/// Fixed point ycbcr to rgb (8-wide)
///
/// y257: luma times 257
/// u, v: chroma minus 128
/// res:  blue, green and red times 64, not yet clamped
#[inline(always)]
unsafe fn yuv_to_bgr_8x(
    y257: __m128i,
    u: __m128i,
    v: __m128i,
    c: &YuvConstants,
) -> (__m128i, __m128i, __m128i) {
    let y1 = _mm_add_epi16(
        _mm_mulhi_epu16(y257, _mm_set1_epi16(c.yg as i16)),
        _mm_set1_epi16(c.yb as i16),
    );
    let b = _mm_adds_epi16(y1, _mm_mullo_epi16(u, _mm_set1_epi16(c.ub as i16)));
    let g = _mm_subs_epi16(
        y1,
        _mm_add_epi16(
            _mm_mullo_epi16(u, _mm_set1_epi16(c.ug as i16)),
            _mm_mullo_epi16(v, _mm_set1_epi16(c.vg as i16)),
        ),
    );
    let r = _mm_adds_epi16(y1, _mm_mullo_epi16(v, _mm_set1_epi16(c.vr as i16)));

    (
        _mm_srai_epi16(b, 6),
        _mm_srai_epi16(g, 6),
        _mm_srai_epi16(r, 6),
    )
}

/// Converts 8 pixels of planar 4:2:2 samples, returns blue, green and red bytes
#[inline(always)]
unsafe fn i422_to_bgr_8x(
    y: *const u8,
    u: *const u8,
    v: *const u8,
    c: &YuvConstants,
) -> (__m128i, __m128i, __m128i) {
    let y = load8(y);
    let y257 = _mm_unpacklo_epi8(y, y);

    let bias = _mm_set1_epi16(128);
    let u = load4(u);
    let v = load4(v);
    let u = _mm_sub_epi16(_mm_unpacklo_epi8(_mm_unpacklo_epi8(u, u), zero!()), bias);
    let v = _mm_sub_epi16(_mm_unpacklo_epi8(_mm_unpacklo_epi8(v, v), zero!()), bias);

    let (b, g, r) = yuv_to_bgr_8x(y257, u, v, c);
    (
        _mm_packus_epi16(b, zero!()),
        _mm_packus_epi16(g, zero!()),
        _mm_packus_epi16(r, zero!()),
    )
}

#[target_feature(enable = "ssse3")]
pub unsafe fn shuffle_row(src: &[u8], dst: &mut [u8], shuffle: &PackedShuffle, width: usize) {
    debug_assert!(width % 4 == 0 && src.len() >= width * shuffle.src_bpp);
    debug_assert!(dst.len() >= width * shuffle.dst_bpp);

    let lanes = loadu(shuffle.lanes.as_ptr());
    let fill = loadu(shuffle.fill.as_ptr());
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(4) {
        let pixels = load_pixels_4x(src.add(x * shuffle.src_bpp), shuffle.src_bpp);
        let pixels = _mm_or_si128(_mm_shuffle_epi8(pixels, lanes), fill);
        store_pixels_4x(dst.add(x * shuffle.dst_bpp), shuffle.dst_bpp, pixels);
    }
}

#[target_feature(enable = "sse2")]
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

    let alpha = _mm_set1_epi8(-1);
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let (b, g, r) = i422_to_bgr_8x(
            y.as_ptr().add(x),
            u.as_ptr().add(x / 2),
            v.as_ptr().add(x / 2),
            c,
        );
        store_pixels_8x(dst.add(4 * x), &order_channels(layout, b, g, r, alpha));
    }
}

#[target_feature(enable = "sse2")]
pub unsafe fn i422_alpha_to_argb_row(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    a: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
    width: usize,
) {
    debug_assert!(width % 8 == 0 && y.len() >= width && a.len() >= width);
    debug_assert!(u.len() >= width / 2 && v.len() >= width / 2 && dst.len() >= 4 * width);

    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let (b, g, r) = i422_to_bgr_8x(
            y.as_ptr().add(x),
            u.as_ptr().add(x / 2),
            v.as_ptr().add(x / 2),
            c,
        );
        let alpha = load8(a.as_ptr().add(x));
        store_pixels_8x(dst.add(4 * x), &[b, g, r, alpha]);
    }
}

/// Splits 8 packed 4:2:2 pixels into luma times 257 and centered chroma
///
/// src:  y7v3y6u3 .. y1v0y0u0
/// y257: y7y7 .. y0y0
/// u:    u3 u3 u2 u2 u1 u1 u0 u0 (minus 128)
#[inline(always)]
unsafe fn unpack_uyvy_8x(src: *const u8) -> (__m128i, __m128i, __m128i) {
    let x = loadu(src);
    let y = _mm_srli_epi16(x, 8);
    let y257 = _mm_or_si128(y, _mm_slli_epi16(y, 8));

    let bias = _mm_set1_epi16(128);
    let uv = _mm_and_si128(x, _mm_set1_epi16(0xff));
    let u = _mm_shufflehi_epi16(
        _mm_shufflelo_epi16(uv, mm_shuffle(2, 2, 0, 0)),
        mm_shuffle(2, 2, 0, 0),
    );
    let v = _mm_shufflehi_epi16(
        _mm_shufflelo_epi16(uv, mm_shuffle(3, 3, 1, 1)),
        mm_shuffle(3, 3, 1, 1),
    );

    (y257, _mm_sub_epi16(u, bias), _mm_sub_epi16(v, bias))
}

#[target_feature(enable = "sse2")]
pub unsafe fn uyvy_to_rgb_row(
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    debug_assert!(width % 8 == 0 && src.len() >= 2 * width && dst.len() >= 4 * width);

    let alpha = _mm_set1_epi8(-1);
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let (y257, u, v) = unpack_uyvy_8x(src.add(2 * x));
        let (b, g, r) = yuv_to_bgr_8x(y257, u, v, c);
        let (b, g, r) = (
            _mm_packus_epi16(b, zero!()),
            _mm_packus_epi16(g, zero!()),
            _mm_packus_epi16(r, zero!()),
        );
        store_pixels_8x(dst.add(4 * x), &order_channels(layout, b, g, r, alpha));
    }
}

/// Weighted sum of the channels of 4 pixels
///
/// x:   p3 p2 p1 p0 (8 bits per channel)
/// res: s3 s2 s1 s0 (32 bits each)
#[inline(always)]
unsafe fn dot_4x(x: __m128i, weights: __m128i) -> __m128i {
    let lo = _mm_castsi128_ps(_mm_madd_epi16(_mm_unpacklo_epi8(x, zero!()), weights));
    let hi = _mm_castsi128_ps(_mm_madd_epi16(_mm_unpackhi_epi8(x, zero!()), weights));
    _mm_add_epi32(
        _mm_castps_si128(_mm_shuffle_ps(lo, hi, even_dwords!())),
        _mm_castps_si128(_mm_shuffle_ps(lo, hi, odd_dwords!())),
    )
}

#[inline(always)]
unsafe fn luma_4x(x: __m128i, weights: __m128i) -> __m128i {
    _mm_srli_epi32(_mm_add_epi32(dot_4x(x, weights), _mm_set1_epi32(0x1080)), 8)
}

#[inline(always)]
unsafe fn chroma_4x(x: __m128i, weights: __m128i) -> __m128i {
    _mm_srli_epi32(_mm_add_epi32(dot_4x(x, weights), _mm_set1_epi32(0x8000)), 8)
}

#[target_feature(enable = "sse2")]
pub unsafe fn rgb_to_y_row(
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    width: usize,
) {
    debug_assert!(width % 16 == 0 && src.len() >= 4 * width && dst.len() >= width);

    let weights = loadu(pixel_weights(layout, Y_WEIGHTS).as_ptr().cast());
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let s = src.add(4 * x);
        let y0 = luma_4x(loadu(s), weights);
        let y1 = luma_4x(loadu(s.add(16)), weights);
        let y2 = luma_4x(loadu(s.add(32)), weights);
        let y3 = luma_4x(loadu(s.add(48)), weights);
        let y = _mm_packus_epi16(_mm_packs_epi32(y0, y1), _mm_packs_epi32(y2, y3));
        storeu(dst.add(x), y);
    }
}

/// Averages 2x2 blocks of 8 pixels over two rows
///
/// res: q3 q2 q1 q0 (one pixel per block)
#[inline(always)]
unsafe fn average_blocks_4x(src0: *const u8, src1: *const u8) -> __m128i {
    let a0 = _mm_castsi128_ps(_mm_avg_epu8(loadu(src0), loadu(src1)));
    let a1 = _mm_castsi128_ps(_mm_avg_epu8(loadu(src0.add(16)), loadu(src1.add(16))));
    _mm_avg_epu8(
        _mm_castps_si128(_mm_shuffle_ps(a0, a1, even_dwords!())),
        _mm_castps_si128(_mm_shuffle_ps(a0, a1, odd_dwords!())),
    )
}

#[target_feature(enable = "sse2")]
pub unsafe fn rgb_to_uv_row(
    src0: &[u8],
    src1: &[u8],
    dst_u: &mut [u8],
    dst_v: &mut [u8],
    layout: &PixelFormatDescriptor,
    width: usize,
) {
    debug_assert!(width % 16 == 0 && src0.len() >= 4 * width && src1.len() >= 4 * width);
    debug_assert!(dst_u.len() >= width / 2 && dst_v.len() >= width / 2);

    let u_weights = loadu(pixel_weights(layout, U_WEIGHTS).as_ptr().cast());
    let v_weights = loadu(pixel_weights(layout, V_WEIGHTS).as_ptr().cast());
    let dst_u = dst_u.as_mut_ptr();
    let dst_v = dst_v.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let s0 = src0.as_ptr().add(4 * x);
        let s1 = src1.as_ptr().add(4 * x);
        let q0 = average_blocks_4x(s0, s1);
        let q1 = average_blocks_4x(s0.add(32), s1.add(32));

        let u = _mm_packs_epi32(chroma_4x(q0, u_weights), chroma_4x(q1, u_weights));
        let v = _mm_packs_epi32(chroma_4x(q0, v_weights), chroma_4x(q1, v_weights));
        store8(dst_u.add(x / 2), _mm_packus_epi16(u, zero!()));
        store8(dst_v.add(x / 2), _mm_packus_epi16(v, zero!()));
    }
}

#[target_feature(enable = "sse2")]
pub unsafe fn i422_to_uyvy_row(y: &[u8], u: &[u8], v: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 16 == 0 && y.len() >= width && dst.len() >= 2 * width);
    debug_assert!(u.len() >= width / 2 && v.len() >= width / 2);

    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let luma = loadu(y.as_ptr().add(x));
        let uv = _mm_unpacklo_epi8(load8(u.as_ptr().add(x / 2)), load8(v.as_ptr().add(x / 2)));
        storeu(dst.add(2 * x), _mm_unpacklo_epi8(uv, luma));
        storeu(dst.add(2 * x + 16), _mm_unpackhi_epi8(uv, luma));
    }
}

#[target_feature(enable = "sse2")]
pub unsafe fn uyvy_to_y_row(src: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 16 == 0 && src.len() >= 2 * width && dst.len() >= width);

    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let p0 = _mm_srli_epi16(loadu(src.add(2 * x)), 8);
        let p1 = _mm_srli_epi16(loadu(src.add(2 * x + 16)), 8);
        storeu(dst.add(x), _mm_packus_epi16(p0, p1));
    }
}

#[target_feature(enable = "sse2")]
pub unsafe fn uyvy_to_uv_row(src: &[u8], dst_u: &mut [u8], dst_v: &mut [u8], width: usize) {
    debug_assert!(width % 16 == 0 && src.len() >= 2 * width);
    debug_assert!(dst_u.len() >= width / 2 && dst_v.len() >= width / 2);

    let mask = _mm_set1_epi16(0xff);
    let src = src.as_ptr();
    let dst_u = dst_u.as_mut_ptr();
    let dst_v = dst_v.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let p0 = _mm_and_si128(loadu(src.add(2 * x)), mask);
        let p1 = _mm_and_si128(loadu(src.add(2 * x + 16)), mask);
        let uv = _mm_packus_epi16(p0, p1);
        let u = _mm_packus_epi16(_mm_and_si128(uv, mask), zero!());
        let v = _mm_packus_epi16(_mm_srli_epi16(uv, 8), zero!());
        store8(dst_u.add(x / 2), u);
        store8(dst_v.add(x / 2), v);
    }
}

/// Multiplies the color channels of 2 pixels by their alpha
///
/// x:   a1r1g1b1 a0r0g0b0 (16 bits per channel)
#[inline(always)]
unsafe fn attenuate_2x(x: __m128i) -> __m128i {
    let alpha = _mm_shufflehi_epi16(
        _mm_shufflelo_epi16(x, mm_shuffle(3, 3, 3, 3)),
        mm_shuffle(3, 3, 3, 3),
    );
    _mm_mulhi_epu16(x, _mm_or_si128(alpha, _mm_slli_epi16(alpha, 8)))
}

#[target_feature(enable = "sse2")]
pub unsafe fn attenuate_row(src: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 4 == 0 && src.len() >= 4 * width && dst.len() >= 4 * width);

    let alpha_mask = _mm_set1_epi32(0xff00_0000_u32 as i32);
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(4) {
        let pixels = loadu(src.add(4 * x));
        let lo = attenuate_2x(_mm_unpacklo_epi8(pixels, zero!()));
        let hi = attenuate_2x(_mm_unpackhi_epi8(pixels, zero!()));
        let colors = _mm_andnot_si128(alpha_mask, _mm_packus_epi16(lo, hi));
        storeu(
            dst.add(4 * x),
            _mm_or_si128(colors, _mm_and_si128(pixels, alpha_mask)),
        );
    }
}

/// (a * f0 + b * f1 + 128) >> 8, with f0 + f1 = 256 (8-wide)
#[inline(always)]
unsafe fn blend_8x(a: __m128i, b: __m128i, f0: __m128i, f1: __m128i) -> __m128i {
    let sum = _mm_add_epi16(_mm_mullo_epi16(a, f0), _mm_mullo_epi16(b, f1));
    _mm_srli_epi16(_mm_add_epi16(sum, _mm_set1_epi16(128)), 8)
}

#[target_feature(enable = "sse2")]
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

    let f0 = _mm_set1_epi16((256 - fraction) as i16);
    let f1 = _mm_set1_epi16(fraction as i16);
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let a = loadu(src0.as_ptr().add(x));
        let b = loadu(src1.as_ptr().add(x));
        let lo = blend_8x(_mm_unpacklo_epi8(a, zero!()), _mm_unpacklo_epi8(b, zero!()), f0, f1);
        let hi = blend_8x(_mm_unpackhi_epi8(a, zero!()), _mm_unpackhi_epi8(b, zero!()), f0, f1);
        storeu(dst.add(x), _mm_packus_epi16(lo, hi));
    }
}

/// Loads 8 pixels and splits them into even and odd ones
#[inline(always)]
unsafe fn load_pairs_4x(src: *const u8) -> (__m128, __m128) {
    let p0 = _mm_castsi128_ps(loadu(src));
    let p1 = _mm_castsi128_ps(loadu(src.add(16)));
    (
        _mm_shuffle_ps(p0, p1, even_dwords!()),
        _mm_shuffle_ps(p0, p1, odd_dwords!()),
    )
}

#[target_feature(enable = "sse2")]
pub unsafe fn scale_down2_row(src: &[u8], _: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 4 == 0 && src.len() >= 8 * width && dst.len() >= 4 * width);

    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(4) {
        let (_, odd) = load_pairs_4x(src.as_ptr().add(8 * x));
        storeu(dst.add(4 * x), _mm_castps_si128(odd));
    }
}

#[target_feature(enable = "sse2")]
pub unsafe fn scale_down2_linear_row(src: &[u8], _: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 4 == 0 && src.len() >= 8 * width && dst.len() >= 4 * width);

    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(4) {
        let (even, odd) = load_pairs_4x(src.as_ptr().add(8 * x));
        storeu(
            dst.add(4 * x),
            _mm_avg_epu8(_mm_castps_si128(even), _mm_castps_si128(odd)),
        );
    }
}

/// Rounded average of 2x2 blocks of 4 pixels over two rows
///
/// res: -------- -------- q1 q0 (16 bits per channel)
#[inline(always)]
unsafe fn box_2x(row0: __m128i, row1: __m128i) -> __m128i {
    let lo = _mm_add_epi16(_mm_unpacklo_epi8(row0, zero!()), _mm_unpacklo_epi8(row1, zero!()));
    let hi = _mm_add_epi16(_mm_unpackhi_epi8(row0, zero!()), _mm_unpackhi_epi8(row1, zero!()));
    let lo = _mm_add_epi16(lo, _mm_srli_si128(lo, 8));
    let hi = _mm_add_epi16(hi, _mm_srli_si128(hi, 8));
    _mm_srli_epi16(
        _mm_add_epi16(_mm_unpacklo_epi64(lo, hi), _mm_set1_epi16(2)),
        2,
    )
}

#[target_feature(enable = "sse2")]
pub unsafe fn scale_down2_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 4 == 0 && src0.len() >= 8 * width && src1.len() >= 8 * width);
    debug_assert!(dst.len() >= 4 * width);

    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(4) {
        let s0 = src0.as_ptr().add(8 * x);
        let s1 = src1.as_ptr().add(8 * x);
        let q0 = box_2x(loadu(s0), loadu(s1));
        let q1 = box_2x(loadu(s0.add(16)), loadu(s1.add(16)));
        storeu(dst.add(4 * x), _mm_packus_epi16(q0, q1));
    }
}
