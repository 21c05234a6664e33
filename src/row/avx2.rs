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
use super::sse2::{
    load8, load_pixels_4x, loadu, mm_shuffle, order_channels, pixel_weights, store_pixels_16x,
    store_pixels_4x,
};
use crate::color_space::YuvConstants;
use crate::pixel_format::{PackedShuffle, PixelFormatDescriptor};

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

macro_rules! zero {
    () => {
        _mm256_setzero_si256()
    };
}

const Y_WEIGHTS: (i16, i16, i16) = (25, 129, 66);

#[inline(always)]
unsafe fn loadu256(src: *const u8) -> __m256i {
    _mm256_loadu_si256(src.cast())
}

#[inline(always)]
unsafe fn storeu256(dst: *mut u8, x: __m256i) {
    _mm256_storeu_si256(dst.cast(), x);
}

#[inline(always)]
unsafe fn broadcast(src: *const u8) -> __m256i {
    _mm256_broadcastsi128_si256(loadu(src))
}

/// Packs 16 shorts into 16 bytes, keeping their order
#[inline(always)]
unsafe fn pack_16x(x: __m256i) -> __m128i {
    _mm_packus_epi16(_mm256_castsi256_si128(x), _mm256_extracti128_si256(x, 1))
}

/// Fixed point ycbcr to rgb (16-wide)
#[inline(always)]
unsafe fn yuv_to_bgr_16x(
    y257: __m256i,
    u: __m256i,
    v: __m256i,
    c: &YuvConstants,
) -> (__m128i, __m128i, __m128i) {
    let y1 = _mm256_add_epi16(
        _mm256_mulhi_epu16(y257, _mm256_set1_epi16(c.yg as i16)),
        _mm256_set1_epi16(c.yb as i16),
    );
    let b = _mm256_adds_epi16(y1, _mm256_mullo_epi16(u, _mm256_set1_epi16(c.ub as i16)));
    let g = _mm256_subs_epi16(
        y1,
        _mm256_add_epi16(
            _mm256_mullo_epi16(u, _mm256_set1_epi16(c.ug as i16)),
            _mm256_mullo_epi16(v, _mm256_set1_epi16(c.vg as i16)),
        ),
    );
    let r = _mm256_adds_epi16(y1, _mm256_mullo_epi16(v, _mm256_set1_epi16(c.vr as i16)));

    (
        pack_16x(_mm256_srai_epi16(b, 6)),
        pack_16x(_mm256_srai_epi16(g, 6)),
        pack_16x(_mm256_srai_epi16(r, 6)),
    )
}

/// Doubles 8 chroma samples and centers them
///
/// x:   -------- u7..u0
/// res: u7 u7 .. u0 u0 (16 bits each, minus 128)
#[inline(always)]
unsafe fn upsample_chroma_16x(x: __m128i) -> __m256i {
    _mm256_sub_epi16(
        _mm256_cvtepu8_epi16(_mm_unpacklo_epi8(x, x)),
        _mm256_set1_epi16(128),
    )
}

#[inline(always)]
unsafe fn i422_to_bgr_16x(
    y: *const u8,
    u: *const u8,
    v: *const u8,
    c: &YuvConstants,
) -> (__m128i, __m128i, __m128i) {
    let y = _mm256_cvtepu8_epi16(loadu(y));
    let y257 = _mm256_or_si256(y, _mm256_slli_epi16(y, 8));
    yuv_to_bgr_16x(
        y257,
        upsample_chroma_16x(load8(u)),
        upsample_chroma_16x(load8(v)),
        c,
    )
}

#[target_feature(enable = "avx2")]
pub unsafe fn shuffle_row(src: &[u8], dst: &mut [u8], shuffle: &PackedShuffle, width: usize) {
    debug_assert!(width % 8 == 0 && src.len() >= width * shuffle.src_bpp);
    debug_assert!(dst.len() >= width * shuffle.dst_bpp);

    let lanes = broadcast(shuffle.lanes.as_ptr());
    let fill = broadcast(shuffle.fill.as_ptr());
    let (src_bpp, dst_bpp) = (shuffle.src_bpp, shuffle.dst_bpp);
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let s = src.add(x * src_bpp);
        let pixels = if src_bpp == 4 {
            loadu256(s)
        } else {
            _mm256_inserti128_si256(
                _mm256_castsi128_si256(load_pixels_4x(s, 3)),
                load_pixels_4x(s.add(12), 3),
                1,
            )
        };

        let pixels = _mm256_or_si256(_mm256_shuffle_epi8(pixels, lanes), fill);
        let d = dst.add(x * dst_bpp);
        if dst_bpp == 4 {
            storeu256(d, pixels);
        } else {
            store_pixels_4x(d, 3, _mm256_castsi256_si128(pixels));
            store_pixels_4x(d.add(12), 3, _mm256_extracti128_si256(pixels, 1));
        }
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn i422_to_rgb_row(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    debug_assert!(width % 16 == 0 && y.len() >= width && dst.len() >= 4 * width);
    debug_assert!(u.len() >= width / 2 && v.len() >= width / 2);

    let alpha = _mm_set1_epi8(-1);
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let (b, g, r) = i422_to_bgr_16x(
            y.as_ptr().add(x),
            u.as_ptr().add(x / 2),
            v.as_ptr().add(x / 2),
            c,
        );
        store_pixels_16x(dst.add(4 * x), &order_channels(layout, b, g, r, alpha));
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn i422_alpha_to_argb_row(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    a: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
    width: usize,
) {
    debug_assert!(width % 16 == 0 && y.len() >= width && a.len() >= width);
    debug_assert!(u.len() >= width / 2 && v.len() >= width / 2 && dst.len() >= 4 * width);

    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let (b, g, r) = i422_to_bgr_16x(
            y.as_ptr().add(x),
            u.as_ptr().add(x / 2),
            v.as_ptr().add(x / 2),
            c,
        );
        let alpha = loadu(a.as_ptr().add(x));
        store_pixels_16x(dst.add(4 * x), &[b, g, r, alpha]);
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn uyvy_to_rgb_row(
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    debug_assert!(width % 16 == 0 && src.len() >= 2 * width && dst.len() >= 4 * width);

    let alpha = _mm_set1_epi8(-1);
    let bias = _mm256_set1_epi16(128);
    let mask = _mm256_set1_epi16(0xff);
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(16) {
        let p = loadu256(src.add(2 * x));
        let y = _mm256_srli_epi16(p, 8);
        let y257 = _mm256_or_si256(y, _mm256_slli_epi16(y, 8));
        let uv = _mm256_and_si256(p, mask);
        let u = _mm256_shufflehi_epi16(
            _mm256_shufflelo_epi16(uv, mm_shuffle(2, 2, 0, 0)),
            mm_shuffle(2, 2, 0, 0),
        );
        let v = _mm256_shufflehi_epi16(
            _mm256_shufflelo_epi16(uv, mm_shuffle(3, 3, 1, 1)),
            mm_shuffle(3, 3, 1, 1),
        );

        let (b, g, r) = yuv_to_bgr_16x(
            y257,
            _mm256_sub_epi16(u, bias),
            _mm256_sub_epi16(v, bias),
            c,
        );
        store_pixels_16x(dst.add(4 * x), &order_channels(layout, b, g, r, alpha));
    }
}

/// Luma of 8 pixels
///
/// x:   p7 .. p0 (8 bits per channel)
/// res: y7 .. y0 (32 bits each)
#[inline(always)]
unsafe fn luma_8x(x: __m256i, weights: __m256i) -> __m256i {
    let lo = _mm256_castsi256_ps(_mm256_madd_epi16(_mm256_unpacklo_epi8(x, zero!()), weights));
    let hi = _mm256_castsi256_ps(_mm256_madd_epi16(_mm256_unpackhi_epi8(x, zero!()), weights));
    let sum = _mm256_add_epi32(
        _mm256_castps_si256(_mm256_shuffle_ps(lo, hi, mm_shuffle(2, 0, 2, 0))),
        _mm256_castps_si256(_mm256_shuffle_ps(lo, hi, mm_shuffle(3, 1, 3, 1))),
    );

    _mm256_srli_epi32(_mm256_add_epi32(sum, _mm256_set1_epi32(0x1080)), 8)
}

#[target_feature(enable = "avx2")]
pub unsafe fn rgb_to_y_row(
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    width: usize,
) {
    debug_assert!(width % 32 == 0 && src.len() >= 4 * width && dst.len() >= width);

    let weights = broadcast(pixel_weights(layout, Y_WEIGHTS).as_ptr().cast());
    let order = _mm256_setr_epi32(0, 4, 1, 5, 2, 6, 3, 7);
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(32) {
        let s = src.add(4 * x);
        let y0 = luma_8x(loadu256(s), weights);
        let y1 = luma_8x(loadu256(s.add(32)), weights);
        let y2 = luma_8x(loadu256(s.add(64)), weights);
        let y3 = luma_8x(loadu256(s.add(96)), weights);

        // Lane interleaved: y0-3 y8-11 y16-19 y24-27 | y4-7 y12-15 y20-23 y28-31
        let y = _mm256_packus_epi16(_mm256_packs_epi32(y0, y1), _mm256_packs_epi32(y2, y3));
        storeu256(dst.add(x), _mm256_permutevar8x32_epi32(y, order));
    }
}

/// Multiplies the color channels of 4 pixels by their alpha
#[inline(always)]
unsafe fn attenuate_4x(x: __m256i) -> __m256i {
    let alpha = _mm256_shufflehi_epi16(
        _mm256_shufflelo_epi16(x, mm_shuffle(3, 3, 3, 3)),
        mm_shuffle(3, 3, 3, 3),
    );
    _mm256_mulhi_epu16(x, _mm256_or_si256(alpha, _mm256_slli_epi16(alpha, 8)))
}

#[target_feature(enable = "avx2")]
pub unsafe fn attenuate_row(src: &[u8], dst: &mut [u8], width: usize) {
    debug_assert!(width % 8 == 0 && src.len() >= 4 * width && dst.len() >= 4 * width);

    let alpha_mask = _mm256_set1_epi32(0xff00_0000_u32 as i32);
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(8) {
        let pixels = loadu256(src.add(4 * x));
        let lo = attenuate_4x(_mm256_unpacklo_epi8(pixels, zero!()));
        let hi = attenuate_4x(_mm256_unpackhi_epi8(pixels, zero!()));
        let colors = _mm256_andnot_si256(alpha_mask, _mm256_packus_epi16(lo, hi));
        storeu256(
            dst.add(4 * x),
            _mm256_or_si256(colors, _mm256_and_si256(pixels, alpha_mask)),
        );
    }
}

/// (a * f0 + b * f1 + 128) >> 8, with f0 + f1 = 256 (16-wide)
#[inline(always)]
unsafe fn blend_16x(a: __m256i, b: __m256i, f0: __m256i, f1: __m256i) -> __m256i {
    let sum = _mm256_add_epi16(_mm256_mullo_epi16(a, f0), _mm256_mullo_epi16(b, f1));
    _mm256_srli_epi16(_mm256_add_epi16(sum, _mm256_set1_epi16(128)), 8)
}

#[target_feature(enable = "avx2")]
pub unsafe fn interpolate_row(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    fraction: u32,
    width: usize,
) {
    debug_assert!(width % 32 == 0 && src0.len() >= width && src1.len() >= width);
    debug_assert!(dst.len() >= width && fraction < 256);

    if fraction == 0 {
        dst[..width].copy_from_slice(&src0[..width]);
        return;
    }

    let f0 = _mm256_set1_epi16((256 - fraction) as i16);
    let f1 = _mm256_set1_epi16(fraction as i16);
    let dst = dst.as_mut_ptr();
    for x in (0..width).step_by(32) {
        let a = loadu256(src0.as_ptr().add(x));
        let b = loadu256(src1.as_ptr().add(x));
        let lo = blend_16x(
            _mm256_unpacklo_epi8(a, zero!()),
            _mm256_unpacklo_epi8(b, zero!()),
            f0,
            f1,
        );
        let hi = blend_16x(
            _mm256_unpackhi_epi8(a, zero!()),
            _mm256_unpackhi_epi8(b, zero!()),
            f0,
            f1,
        );
        storeu256(dst.add(x), _mm256_packus_epi16(lo, hi));
    }
}
