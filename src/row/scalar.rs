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
#![allow(clippy::cast_possible_truncation)]
use crate::color_space::{
    avg, rgb_to_u, rgb_to_v, rgb_to_y, yuv_pixel, YuvConstants, DEFAULT_ALPHA,
};
use crate::pixel_format::{PackedShuffle, PixelFormatDescriptor, OPAQUE};

/// Reciprocal of each alpha value in 8.8 fixed point. Zero alpha leaves the color as is.
pub static UNATTENUATE_TABLE: [u16; 256] = unattenuate_table();

const fn unattenuate_table() -> [u16; 256] {
    let mut table = [0_u16; 256];
    table[0] = 0x100;
    table[1] = 0xffff;
    let mut alpha = 2;
    while alpha < 255 {
        table[alpha] = (0x10000 / alpha) as u16;
        alpha += 1;
    }

    table[255] = 0x100;
    table
}

pub fn shuffle_row(src: &[u8], dst: &mut [u8], shuffle: &PackedShuffle, width: usize) {
    let src = src.chunks_exact(shuffle.src_bpp);
    let dst = dst.chunks_exact_mut(shuffle.dst_bpp);
    for (s, d) in src.zip(dst).take(width) {
        for (byte, &index) in d.iter_mut().zip(&shuffle.indices) {
            *byte = if index & OPAQUE == 0 {
                s[index as usize]
            } else {
                DEFAULT_ALPHA
            };
        }
    }
}

#[inline(always)]
fn store_pixel(d: &mut [u8], layout: &PixelFormatDescriptor, bgra: (u8, u8, u8, u8)) {
    d[layout.b] = bgra.0;
    d[layout.g] = bgra.1;
    d[layout.r] = bgra.2;
    if let Some(a) = layout.a {
        d[a] = bgra.3;
    }
}

pub fn i422_to_rgb_row(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    let depth = layout.bytes_per_pixel;
    for (x, d) in dst.chunks_exact_mut(depth).take(width).enumerate() {
        let (b, g, r) = yuv_pixel(y[x], u[x / 2], v[x / 2], c);
        store_pixel(d, layout, (b, g, r, DEFAULT_ALPHA));
    }
}

pub fn i422_alpha_to_argb_row(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    a: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
    width: usize,
) {
    for (x, d) in dst.chunks_exact_mut(4).take(width).enumerate() {
        let (b, g, r) = yuv_pixel(y[x], u[x / 2], v[x / 2], c);
        d[0] = b;
        d[1] = g;
        d[2] = r;
        d[3] = a[x];
    }
}

pub fn uyvy_to_rgb_row(
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    let depth = layout.bytes_per_pixel;
    for (x, d) in dst.chunks_exact_mut(depth).take(width).enumerate() {
        let group = &src[(x / 2) * 4..];
        let (b, g, r) = yuv_pixel(group[1 + 2 * (x % 2)], group[0], group[2], c);
        store_pixel(d, layout, (b, g, r, DEFAULT_ALPHA));
    }
}

pub fn rgb_to_y_row(src: &[u8], dst: &mut [u8], layout: &PixelFormatDescriptor, width: usize) {
    let pixels = src.chunks_exact(layout.bytes_per_pixel);
    for (s, d) in pixels.zip(dst.iter_mut()).take(width) {
        *d = rgb_to_y(s[layout.r], s[layout.g], s[layout.b]);
    }
}

pub fn rgb_to_uv_row(
    src0: &[u8],
    src1: &[u8],
    dst_u: &mut [u8],
    dst_v: &mut [u8],
    layout: &PixelFormatDescriptor,
    width: usize,
) {
    let depth = layout.bytes_per_pixel;
    let channel = |row: &[u8], x: usize, index: usize| row[x * depth + index];
    let average = |x: usize, index: usize| {
        let left = avg(channel(src0, x, index), channel(src1, x, index));
        if x + 1 < width {
            avg(left, avg(channel(src0, x + 1, index), channel(src1, x + 1, index)))
        } else {
            left
        }
    };

    for (i, (u, v)) in dst_u.iter_mut().zip(dst_v.iter_mut()).enumerate() {
        let x = 2 * i;
        if x >= width {
            break;
        }

        let (r, g, b) = (
            average(x, layout.r),
            average(x, layout.g),
            average(x, layout.b),
        );
        *u = rgb_to_u(r, g, b);
        *v = rgb_to_v(r, g, b);
    }
}

pub fn i422_to_uyvy_row(y: &[u8], u: &[u8], v: &[u8], dst: &mut [u8], width: usize) {
    for (i, d) in dst.chunks_exact_mut(4).take((width + 1) / 2).enumerate() {
        d[0] = u[i];
        d[1] = y[2 * i];
        d[2] = v[i];
        d[3] = if 2 * i + 1 < width { y[2 * i + 1] } else { 0 };
    }
}

pub fn uyvy_to_y_row(src: &[u8], dst: &mut [u8], width: usize) {
    for (x, d) in dst.iter_mut().take(width).enumerate() {
        *d = src[2 * x + 1];
    }
}

pub fn uyvy_to_uv_row(src: &[u8], dst_u: &mut [u8], dst_v: &mut [u8], width: usize) {
    let groups = src.chunks_exact(4).take((width + 1) / 2);
    for ((s, u), v) in groups.zip(dst_u.iter_mut()).zip(dst_v.iter_mut()) {
        *u = s[0];
        *v = s[2];
    }
}

#[inline(always)]
fn attenuate(value: u8, alpha: u32) -> u8 {
    ((u32::from(value) * (alpha | (alpha << 8))) >> 16) as u8
}

pub fn attenuate_row(src: &[u8], dst: &mut [u8], width: usize) {
    let pixels = src.chunks_exact(4).zip(dst.chunks_exact_mut(4));
    for (s, d) in pixels.take(width) {
        let alpha = u32::from(s[3]);
        d[0] = attenuate(s[0], alpha);
        d[1] = attenuate(s[1], alpha);
        d[2] = attenuate(s[2], alpha);
        d[3] = s[3];
    }
}

#[inline(always)]
fn unattenuate(value: u8, inverse: u32) -> u8 {
    ((u32::from(value) * inverse) >> 8).min(255) as u8
}

pub fn unattenuate_row(src: &[u8], dst: &mut [u8], width: usize) {
    let pixels = src.chunks_exact(4).zip(dst.chunks_exact_mut(4));
    for (s, d) in pixels.take(width) {
        let inverse = u32::from(UNATTENUATE_TABLE[s[3] as usize]);
        d[0] = unattenuate(s[0], inverse);
        d[1] = unattenuate(s[1], inverse);
        d[2] = unattenuate(s[2], inverse);
        d[3] = s[3];
    }
}

/// Blends two rows byte by byte, `fraction` being the weight of `src1` out of 256.
pub fn interpolate_row(src0: &[u8], src1: &[u8], dst: &mut [u8], fraction: u32, width: usize) {
    if fraction == 0 {
        dst[..width].copy_from_slice(&src0[..width]);
        return;
    }

    let inverse = 256 - fraction;
    for ((d, &a), &b) in dst.iter_mut().zip(src0).zip(src1).take(width) {
        *d = ((u32::from(a) * inverse + u32::from(b) * fraction + 128) >> 8) as u8;
    }
}

pub fn copy_row(src: &[u8], dst: &mut [u8], width: usize) {
    dst[..width].copy_from_slice(&src[..width]);
}

/// Keeps the second pixel of each pair
pub fn scale_down2_row<const BPP: usize>(src: &[u8], _: &[u8], dst: &mut [u8], width: usize) {
    let pairs = src.chunks_exact(2 * BPP).zip(dst.chunks_exact_mut(BPP));
    for (s, d) in pairs.take(width) {
        d.copy_from_slice(&s[BPP..]);
    }
}

pub fn scale_down2_linear_row<const BPP: usize>(
    src: &[u8],
    _: &[u8],
    dst: &mut [u8],
    width: usize,
) {
    let pairs = src.chunks_exact(2 * BPP).zip(dst.chunks_exact_mut(BPP));
    for (s, d) in pairs.take(width) {
        for (c, value) in d.iter_mut().enumerate() {
            *value = avg(s[c], s[BPP + c]);
        }
    }
}

#[inline(always)]
fn box4(a: u8, b: u8, c: u8, d: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + u16::from(c) + u16::from(d) + 2) >> 2) as u8
}

pub fn scale_down2_box_row<const BPP: usize>(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    width: usize,
) {
    let pairs = src0
        .chunks_exact(2 * BPP)
        .zip(src1.chunks_exact(2 * BPP))
        .zip(dst.chunks_exact_mut(BPP));
    for ((s0, s1), d) in pairs.take(width) {
        for (c, value) in d.iter_mut().enumerate() {
            *value = box4(s0[c], s0[BPP + c], s1[c], s1[BPP + c]);
        }
    }
}

/// Picks one pixel every `step`
pub fn scale_down_even_row<const BPP: usize>(
    src: &[u8],
    _: &[u8],
    step: usize,
    dst: &mut [u8],
    width: usize,
) {
    for (x, d) in dst.chunks_exact_mut(BPP).take(width).enumerate() {
        let offset = x * step * BPP;
        d.copy_from_slice(&src[offset..offset + BPP]);
    }
}

/// Averages a 2x2 block every `step` pixels
pub fn scale_down_even_box_row<const BPP: usize>(
    src0: &[u8],
    src1: &[u8],
    step: usize,
    dst: &mut [u8],
    width: usize,
) {
    for (x, d) in dst.chunks_exact_mut(BPP).take(width).enumerate() {
        let offset = x * step * BPP;
        for (c, value) in d.iter_mut().enumerate() {
            let o = offset + c;
            *value = box4(src0[o], src0[o + BPP], src1[o], src1[o + BPP]);
        }
    }
}

/// Nearest column sampling driven by a 16.16 position
#[allow(clippy::cast_sign_loss)]
pub fn scale_cols<const BPP: usize>(src: &[u8], dst: &mut [u8], width: usize, x: i64, dx: i64) {
    let mut x = x;
    for d in dst.chunks_exact_mut(BPP).take(width) {
        let offset = (x >> 16) as usize * BPP;
        d.copy_from_slice(&src[offset..offset + BPP]);
        x += dx;
    }
}

/// Linear blend of the two columns around a 16.16 position
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn scale_filter_cols<const BPP: usize>(
    src: &[u8],
    dst: &mut [u8],
    src_width: usize,
    width: usize,
    x: i64,
    dx: i64,
) {
    let last = src_width - 1;
    let mut x = x;
    for d in dst.chunks_exact_mut(BPP).take(width) {
        let left = ((x >> 16) as usize).min(last);
        let right = (left + 1).min(last);
        let f = ((x >> 9) & 0x7f) as i32;
        for (c, value) in d.iter_mut().enumerate() {
            let a = i32::from(src[left * BPP + c]);
            let b = i32::from(src[right * BPP + c]);
            *value = (a + (((b - a) * f + 64) >> 7)) as u8;
        }

        x += dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_format::PixelFormat;

    #[test]
    fn inverse_table() {
        assert_eq!(UNATTENUATE_TABLE[0], 0x100);
        assert_eq!(UNATTENUATE_TABLE[1], 0xffff);
        assert_eq!(UNATTENUATE_TABLE[2], 0x8000);
        assert_eq!(UNATTENUATE_TABLE[3], 0x5555);
        assert_eq!(UNATTENUATE_TABLE[128], 0x200);
        assert_eq!(UNATTENUATE_TABLE[254], 0x102);
        assert_eq!(UNATTENUATE_TABLE[255], 0x100);
    }

    #[test]
    fn attenuate_then_unattenuate() {
        for alpha in 128..=255_u8 {
            for value in 0..=255_u8 {
                let src = [value, value / 2, 255 - value, alpha];
                let mut premultiplied = [0; 4];
                let mut restored = [0; 4];
                attenuate_row(&src, &mut premultiplied, 1);
                unattenuate_row(&premultiplied, &mut restored, 1);
                assert_eq!(restored[3], alpha);
                for c in 0..3 {
                    let error = (i32::from(restored[c]) - i32::from(src[c])).abs();
                    assert!(error <= 2, "alpha {alpha} value {}", src[c]);
                }
            }
        }
    }

    #[test]
    fn unattenuate_then_attenuate() {
        for alpha in 1..=255_u8 {
            for value in 0..=alpha {
                let src = [value, value, value, alpha];
                let mut straight = [0; 4];
                let mut premultiplied = [0; 4];
                unattenuate_row(&src, &mut straight, 1);
                attenuate_row(&straight, &mut premultiplied, 1);
                assert_eq!(premultiplied[3], alpha);
                assert!((i32::from(premultiplied[0]) - i32::from(value)).abs() <= 1);
            }
        }
    }

    #[test]
    fn interpolation_weights() {
        let src0 = [0_u8, 100, 255, 7];
        let src1 = [255_u8, 50, 255, 8];
        let mut dst = [0; 4];
        interpolate_row(&src0, &src1, &mut dst, 0, 4);
        assert_eq!(dst, src0);
        interpolate_row(&src0, &src1, &mut dst, 128, 4);
        assert_eq!(dst, [128, 75, 255, 8]);
        interpolate_row(&src0, &src1, &mut dst, 64, 4);
        assert_eq!(dst, [64, 88, 255, 7]);
    }

    #[test]
    fn odd_width_chroma() {
        let argb = PixelFormat::Argb.descriptor();
        let row0 = [10_u8, 20, 30, 255, 50, 60, 70, 255, 90, 100, 110, 255];
        let row1 = [12_u8, 22, 32, 255, 52, 62, 72, 255, 91, 101, 111, 255];
        let mut u = [0; 2];
        let mut v = [0; 2];
        rgb_to_uv_row(&row0, &row1, &mut u, &mut v, argb, 3);
        assert_eq!(u[1], rgb_to_u(avg(110, 111), avg(100, 101), avg(90, 91)));
        assert_eq!(v[1], rgb_to_v(avg(110, 111), avg(100, 101), avg(90, 91)));

        let mut uyvy = [0xaa_u8; 8];
        i422_to_uyvy_row(&[1, 2, 3], &[4, 5], &[6, 7], &mut uyvy, 3);
        assert_eq!(uyvy, [4, 1, 6, 2, 5, 3, 7, 0]);

        let mut y = [0; 3];
        uyvy_to_y_row(&uyvy, &mut y, 3);
        assert_eq!(y, [1, 2, 3]);
    }

    #[test]
    fn filter_cols_clamps_right_edge() {
        let src = [0_u8, 128, 255];
        let mut dst = [0; 4];
        scale_filter_cols::<1>(&src, &mut dst, 3, 4, 0x8000, 0x8000);
        // 0.5, 1.0, 1.5 and 2.0
        assert_eq!(dst, [64, 128, 192, 255]);
    }
}
