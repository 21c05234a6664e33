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
//! Operations over whole planes that keep the sample layout.
use crate::dispatcher::Registry;
use crate::geometry::{dst_plane, for_each_row, src_plane, Dst, Geometry, Src, COALESCE_LIMIT};
use crate::pixel_format::PackedShuffle;
use crate::row::{self, MapRow, CHROMA, LUMA, UYVY};
use crate::tail::Span;
use crate::ErrorKind;

const ARGB: Span = Span::packed(4);

/// Copies a plane of bytes.
///
/// A negative height writes the destination bottom-up. Copying a plane onto itself
/// does nothing.
pub fn copy_plane(
    src_y: &[u8],
    src_stride_y: usize,
    dst_y: &mut [u8],
    dst_stride_y: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_y.is_empty() || dst_y.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_y, src_stride_y, LUMA, &geometry)?;
    let dst = dst_plane(dst_y, dst_stride_y, LUMA, &geometry)?;
    unsafe { copy_plane_unchecked(src, dst, geometry) }
}

pub(crate) unsafe fn copy_plane_unchecked(
    src: Src,
    dst: Dst,
    geometry: Geometry,
) -> Result<(), ErrorKind> {
    copy_rows(src, geometry.orient(dst), LUMA, geometry)
}

/// Copies an argb image.
///
/// A negative height reads the source bottom-up.
pub fn argb_copy(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_argb.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let dst = dst_plane(dst_argb, dst_stride_argb, ARGB, &geometry)?;
    unsafe { argb_copy_unchecked(src, dst, geometry) }
}

pub(crate) unsafe fn argb_copy_unchecked(
    src: Src,
    dst: Dst,
    geometry: Geometry,
) -> Result<(), ErrorKind> {
    copy_rows(geometry.orient(src), dst, ARGB, geometry)
}

unsafe fn copy_rows(
    src: Src,
    dst: Dst,
    span: Span,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    if src.ptr == dst.ptr.cast_const() && src.stride == dst.stride {
        return Ok(());
    }

    geometry.coalesce(&[(src.stride, span), (dst.stride, span)], None);
    let bytes = span.bytes(geometry.width);
    let kernel = row::COPY.select(crate::capabilities(), bytes);
    for_each_row(src, bytes, dst, bytes, geometry.height, |s, d| {
        row::map(&kernel, s, 1, d, 1, bytes);
    })
}

/// Splits a packed uyvy image into its y, u and v planes.
///
/// Chroma planes hold one sample every two pixels. A negative height reads the
/// source bottom-up.
pub fn uyvy_to_i422(
    src_uyvy: &[u8],
    src_stride_uyvy: usize,
    dst_y: &mut [u8],
    dst_stride_y: usize,
    dst_u: &mut [u8],
    dst_stride_u: usize,
    dst_v: &mut [u8],
    dst_stride_v: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_uyvy.is_empty() || dst_y.is_empty() || dst_u.is_empty() || dst_v.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_uyvy, src_stride_uyvy, UYVY, &geometry)?;
    let y = dst_plane(dst_y, dst_stride_y, LUMA, &geometry)?;
    let u = dst_plane(dst_u, dst_stride_u, CHROMA, &geometry)?;
    let v = dst_plane(dst_v, dst_stride_v, CHROMA, &geometry)?;
    unsafe { uyvy_to_i422_unchecked(src, [y, u, v], geometry) }
}

pub(crate) unsafe fn uyvy_to_i422_unchecked(
    src: Src,
    dst: [Dst; 3],
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let src = geometry.orient(src);
    let [y, u, v] = dst;
    geometry.coalesce(
        &[
            (src.stride, UYVY),
            (y.stride, LUMA),
            (u.stride, CHROMA),
            (v.stride, CHROMA),
        ],
        Some(COALESCE_LIMIT),
    );

    let width = geometry.width;
    let capabilities = crate::capabilities();
    let luma = row::UYVY_TO_Y.select(capabilities, width);
    let chroma = row::UYVY_TO_UV.select(capabilities, width);
    for i in 0..geometry.height {
        let packed = src.row(i, UYVY.bytes(width));
        row::uyvy_to_uv(
            &chroma,
            packed,
            u.row_mut(i, CHROMA.bytes(width)),
            v.row_mut(i, CHROMA.bytes(width)),
            width,
        );
        row::uyvy_to_y(&luma, packed, y.row_mut(i, LUMA.bytes(width)), width);
    }

    Ok(())
}

/// Multiplies the color channels of an argb image by its alpha channel.
///
/// A negative height reads the source bottom-up.
pub fn argb_attenuate(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_argb.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let dst = dst_plane(dst_argb, dst_stride_argb, ARGB, &geometry)?;
    unsafe { map_argb(&row::ATTENUATE, src, dst, geometry) }
}

pub(crate) unsafe fn argb_attenuate_unchecked(
    src: Src,
    dst: Dst,
    geometry: Geometry,
) -> Result<(), ErrorKind> {
    map_argb(&row::ATTENUATE, src, dst, geometry)
}

/// Divides the color channels of a premultiplied argb image by its alpha channel.
///
/// The result is saturated to 255. Fully transparent pixels are copied unchanged. A
/// negative height reads the source bottom-up.
pub fn argb_unattenuate(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_argb.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let dst = dst_plane(dst_argb, dst_stride_argb, ARGB, &geometry)?;
    unsafe { map_argb(&row::UNATTENUATE, src, dst, geometry) }
}

pub(crate) unsafe fn argb_unattenuate_unchecked(
    src: Src,
    dst: Dst,
    geometry: Geometry,
) -> Result<(), ErrorKind> {
    map_argb(&row::UNATTENUATE, src, dst, geometry)
}

unsafe fn map_argb(
    registry: &Registry<MapRow>,
    src: Src,
    dst: Dst,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let src = geometry.orient(src);
    geometry.coalesce(&[(src.stride, ARGB), (dst.stride, ARGB)], None);

    let width = geometry.width;
    let kernel = registry.select(crate::capabilities(), width);
    let bytes = ARGB.bytes(width);
    for_each_row(src, bytes, dst, bytes, geometry.height, |s, d| {
        row::map(&kernel, s, 4, d, 4, width);
    })
}

/// Reorders the four bytes of every pixel.
///
/// Byte `i` of each destination pixel is byte `shuffler[i]` of the source pixel, so
/// `[3, 2, 1, 0]` converts bgra to argb. Indices above 3 are rejected. A negative
/// height reads the source bottom-up.
pub fn argb_shuffle(
    src_argb: &[u8],
    src_stride_argb: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    shuffler: &[u8; 4],
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_argb.is_empty() || dst_argb.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let table = PackedShuffle::from_permutation(shuffler).ok_or(ErrorKind::InvalidValue)?;
    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_argb, src_stride_argb, ARGB, &geometry)?;
    let dst = dst_plane(dst_argb, dst_stride_argb, ARGB, &geometry)?;
    unsafe { shuffle_unchecked(src, dst, &table, geometry) }
}

/// Runs a packed shuffle over a whole image, reading the source bottom-up when the
/// height is negative.
pub(crate) unsafe fn shuffle_unchecked(
    src: Src,
    dst: Dst,
    table: &PackedShuffle,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let src = geometry.orient(src);
    let src_span = Span::packed(table.src_bpp);
    let dst_span = Span::packed(table.dst_bpp);
    geometry.coalesce(&[(src.stride, src_span), (dst.stride, dst_span)], None);

    let width = geometry.width;
    let kernel = row::SHUFFLE.select(crate::capabilities(), width);
    for_each_row(
        src,
        src_span.bytes(width),
        dst,
        dst_span.bytes(width),
        geometry.height,
        |s, d| row::shuffle(&kernel, s, d, table, width),
    )
}
