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
//! Conversions from argb to planar and packed ycbcr, and to the other packed rgb
//! formats.
use crate::geometry::{dst_plane, scratch, src_plane, Dst, Geometry, Src, COALESCE_LIMIT};
use crate::pixel_format::PixelFormat;
use crate::row::{self, CHROMA, LUMA, UYVY};
use crate::tail::Span;
use crate::ErrorKind;

const ARGB: Span = Span::packed(4);

/// Converts an argb image into i422, using limited range BT.601.
///
/// Each chroma sample averages two horizontally adjacent pixels. A negative height
/// reads the source bottom-up.
pub fn argb_to_i422(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_y: &mut [u8],
    dst_stride_y: usize,
    dst_u: &mut [u8],
    dst_stride_u: usize,
    dst_v: &mut [u8],
    dst_stride_v: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_y.is_empty() || dst_u.is_empty() || dst_v.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let y = dst_plane(dst_y, dst_stride_y, LUMA, &geometry)?;
    let u = dst_plane(dst_u, dst_stride_u, CHROMA, &geometry)?;
    let v = dst_plane(dst_v, dst_stride_v, CHROMA, &geometry)?;
    unsafe { argb_to_i422_unchecked(src, [y, u, v], geometry) }
}

pub(crate) unsafe fn argb_to_i422_unchecked(
    src: Src,
    dst: [Dst; 3],
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let src = geometry.orient(src);
    let [y, u, v] = dst;
    geometry.coalesce(
        &[
            (src.stride, ARGB),
            (y.stride, LUMA),
            (u.stride, CHROMA),
            (v.stride, CHROMA),
        ],
        None,
    );

    let width = geometry.width;
    let layout = PixelFormat::Argb.descriptor();
    let capabilities = crate::capabilities();
    let luma = row::RGB_TO_Y.select(capabilities, width);
    let chroma = row::RGB_TO_UV.select(capabilities, width);
    for i in 0..geometry.height {
        let pixels = src.row(i, ARGB.bytes(width));
        row::rgb_to_uv(
            &chroma,
            [pixels, pixels],
            u.row_mut(i, CHROMA.bytes(width)),
            v.row_mut(i, CHROMA.bytes(width)),
            layout,
            width,
        );
        row::rgb_to_y(&luma, pixels, y.row_mut(i, LUMA.bytes(width)), layout, width);
    }

    Ok(())
}

/// Converts an argb image into i420, using limited range BT.601.
///
/// Chroma planes have half the rows of the luma plane, rounded up. Each chroma sample
/// averages a 2x2 block; with an odd height the last row is paired with itself. A
/// negative height reads the source bottom-up.
pub fn argb_to_i420(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_y: &mut [u8],
    dst_stride_y: usize,
    dst_u: &mut [u8],
    dst_stride_u: usize,
    dst_v: &mut [u8],
    dst_stride_v: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_y.is_empty() || dst_u.is_empty() || dst_v.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let chroma_geometry = Geometry {
        height: (geometry.height + 1) / 2,
        ..geometry
    };
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let y = dst_plane(dst_y, dst_stride_y, LUMA, &geometry)?;
    let u = dst_plane(dst_u, dst_stride_u, CHROMA, &chroma_geometry)?;
    let v = dst_plane(dst_v, dst_stride_v, CHROMA, &chroma_geometry)?;
    unsafe { argb_to_i420_unchecked(src, [y, u, v], geometry) }
}

pub(crate) unsafe fn argb_to_i420_unchecked(
    src: Src,
    dst: [Dst; 3],
    geometry: Geometry,
) -> Result<(), ErrorKind> {
    let src = geometry.orient(src);
    let [y, u, v] = dst;

    let width = geometry.width;
    let height = geometry.height;
    let layout = PixelFormat::Argb.descriptor();
    let capabilities = crate::capabilities();
    let luma = row::RGB_TO_Y.select(capabilities, width);
    let chroma = row::RGB_TO_UV.select(capabilities, width);
    for i in (0..height).step_by(2) {
        let top = src.row(i, ARGB.bytes(width));
        let bottom = if i + 1 < height {
            src.row(i + 1, ARGB.bytes(width))
        } else {
            top
        };

        row::rgb_to_uv(
            &chroma,
            [top, bottom],
            u.row_mut(i / 2, CHROMA.bytes(width)),
            v.row_mut(i / 2, CHROMA.bytes(width)),
            layout,
            width,
        );
        row::rgb_to_y(&luma, top, y.row_mut(i, LUMA.bytes(width)), layout, width);
        if i + 1 < height {
            row::rgb_to_y(
                &luma,
                bottom,
                y.row_mut(i + 1, LUMA.bytes(width)),
                layout,
                width,
            );
        }
    }

    Ok(())
}

/// Interleaves an i422 image into packed uyvy.
///
/// A negative height writes the destination bottom-up.
pub fn i422_to_uyvy(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    dst_uyvy: &mut [u8],
    dst_stride_uyvy: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_y.is_empty() || src_u.is_empty() || src_v.is_empty() || dst_uyvy.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let y = src_plane(src_y, src_stride_y, LUMA, &geometry)?;
    let u = src_plane(src_u, src_stride_u, CHROMA, &geometry)?;
    let v = src_plane(src_v, src_stride_v, CHROMA, &geometry)?;
    let dst = dst_plane(dst_uyvy, dst_stride_uyvy, UYVY, &geometry)?;
    unsafe { i422_to_uyvy_unchecked([y, u, v], dst, geometry) }
}

pub(crate) unsafe fn i422_to_uyvy_unchecked(
    planes: [Src; 3],
    dst: Dst,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let dst = geometry.orient(dst);
    let [y, u, v] = planes;
    geometry.coalesce(
        &[
            (y.stride, LUMA),
            (u.stride, CHROMA),
            (v.stride, CHROMA),
            (dst.stride, UYVY),
        ],
        None,
    );

    let width = geometry.width;
    let kernel = row::I422_TO_UYVY.select(crate::capabilities(), width);
    for i in 0..geometry.height {
        row::i422_to_uyvy(
            &kernel,
            [
                y.row(i, LUMA.bytes(width)),
                u.row(i, CHROMA.bytes(width)),
                v.row(i, CHROMA.bytes(width)),
            ],
            dst.row_mut(i, UYVY.bytes(width)),
            width,
        );
    }

    Ok(())
}

/// Converts an argb image into packed uyvy, using limited range BT.601.
///
/// A negative height writes the destination bottom-up.
pub fn argb_to_uyvy(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_uyvy: &mut [u8],
    dst_stride_uyvy: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_uyvy.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let dst = dst_plane(dst_uyvy, dst_stride_uyvy, UYVY, &geometry)?;
    unsafe { argb_to_uyvy_unchecked(src, dst, geometry) }
}

/// Goes through one row of i422 held in scratch memory.
pub(crate) unsafe fn argb_to_uyvy_unchecked(
    src: Src,
    dst: Dst,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let dst = geometry.orient(dst);
    geometry.coalesce(
        &[(src.stride, ARGB), (dst.stride, UYVY)],
        Some(COALESCE_LIMIT),
    );

    let width = geometry.width;
    let aligned = (width + 63) & !63;
    let mut planar = scratch(aligned * 2)?;
    let (luma_row, chroma_rows) = planar.split_at_mut(aligned);
    let (u_row, v_row) = chroma_rows.split_at_mut(aligned / 2);

    let layout = PixelFormat::Argb.descriptor();
    let capabilities = crate::capabilities();
    let luma = row::RGB_TO_Y.select(capabilities, width);
    let chroma = row::RGB_TO_UV.select(capabilities, width);
    let interleave = row::I422_TO_UYVY.select(capabilities, width);
    for i in 0..geometry.height {
        let pixels = src.row(i, ARGB.bytes(width));
        row::rgb_to_uv(&chroma, [pixels, pixels], u_row, v_row, layout, width);
        row::rgb_to_y(&luma, pixels, luma_row, layout, width);
        row::i422_to_uyvy(
            &interleave,
            [&*luma_row, &*u_row, &*v_row],
            dst.row_mut(i, UYVY.bytes(width)),
            width,
        );
    }

    Ok(())
}

packed_conversion!(argb_to_rgba, Argb, Rgba, "Converts an argb image into rgba.");
packed_conversion!(argb_to_bgra, Argb, Bgra, "Converts an argb image into bgra.");
packed_conversion!(argb_to_abgr, Argb, Abgr, "Converts an argb image into abgr.");
packed_conversion!(
    argb_to_rgb24,
    Argb,
    Rgb24,
    "Converts an argb image into rgb24, dropping alpha."
);
packed_conversion!(
    argb_to_raw,
    Argb,
    Raw,
    "Converts an argb image into raw, dropping alpha."
);
