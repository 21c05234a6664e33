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
//! Conversions producing packed rgb images.
use crate::color_space::{YuvConstants, YUV_I601_CONSTANTS};
use crate::geometry::{dst_plane, scratch, src_plane, Dst, Geometry, Src};
use crate::pixel_format::{PackedShuffle, PixelFormat, PixelFormatDescriptor};
use crate::planar::shuffle_unchecked;
use crate::row::{self, CHROMA, LUMA, UYVY};
use crate::tail::Span;
use crate::ErrorKind;

const ARGB: Span = Span::packed(4);

fn i422_planes(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    geometry: &Geometry,
) -> Result<[Src; 3], ErrorKind> {
    Ok([
        src_plane(src_y, src_stride_y, LUMA, geometry)?,
        src_plane(src_u, src_stride_u, CHROMA, geometry)?,
        src_plane(src_v, src_stride_v, CHROMA, geometry)?,
    ])
}

/// Converts an i422 image into any 32 bits per pixel packed format, using the given
/// ycbcr to rgb transform.
///
/// Alpha, when the destination has it, is set to 255. A negative height writes the
/// destination bottom-up.
///
/// # Errors
/// `InvalidOperation` if `dst_format` does not have four bytes per pixel.
pub fn i422_to_packed_matrix(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_format: PixelFormat,
    yuv_constants: &YuvConstants,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_y.is_empty() || src_u.is_empty() || src_v.is_empty() || dst.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    if dst_format.depth() != 4 {
        return Err(ErrorKind::InvalidOperation);
    }

    let geometry = Geometry::new(width, height)?;
    let planes = i422_planes(
        src_y,
        src_stride_y,
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        &geometry,
    )?;
    let dst = dst_plane(dst, dst_stride, ARGB, &geometry)?;
    unsafe {
        i422_to_packed_unchecked(
            planes,
            dst,
            dst_format.descriptor(),
            yuv_constants,
            geometry,
        )
    }
}

pub(crate) unsafe fn i422_to_packed_unchecked(
    planes: [Src; 3],
    dst: Dst,
    layout: &PixelFormatDescriptor,
    yuv_constants: &YuvConstants,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    debug_assert_eq!(layout.bytes_per_pixel, 4);

    let dst = geometry.orient(dst);
    let [y, u, v] = planes;
    geometry.coalesce(
        &[
            (y.stride, LUMA),
            (u.stride, CHROMA),
            (v.stride, CHROMA),
            (dst.stride, ARGB),
        ],
        None,
    );

    let width = geometry.width;
    let kernel = row::I422_TO_RGB.select(crate::capabilities(), width);
    for i in 0..geometry.height {
        row::i422_to_rgb(
            &kernel,
            [
                y.row(i, LUMA.bytes(width)),
                u.row(i, CHROMA.bytes(width)),
                v.row(i, CHROMA.bytes(width)),
            ],
            dst.row_mut(i, ARGB.bytes(width)),
            layout,
            yuv_constants,
            width,
        );
    }

    Ok(())
}

/// Converts an i422 image into argb, using the given ycbcr to rgb transform.
///
/// A negative height writes the destination bottom-up.
pub fn i422_to_argb_matrix(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    yuv_constants: &YuvConstants,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    i422_to_packed_matrix(
        src_y,
        src_stride_y,
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        dst_argb,
        dst_stride_argb,
        PixelFormat::Argb,
        yuv_constants,
        width,
        height,
    )
}

/// Converts a limited range BT.601 i422 image into argb.
pub fn i422_to_argb(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    i422_to_argb_matrix(
        src_y,
        src_stride_y,
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        dst_argb,
        dst_stride_argb,
        &YUV_I601_CONSTANTS,
        width,
        height,
    )
}

/// Converts an i422 image into abgr, using the given ycbcr to rgb transform.
///
/// A negative height writes the destination bottom-up.
pub fn i422_to_abgr_matrix(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    dst_abgr: &mut [u8],
    dst_stride_abgr: usize,
    yuv_constants: &YuvConstants,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_y.is_empty() || src_u.is_empty() || src_v.is_empty() || dst_abgr.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let planes = i422_planes(
        src_y,
        src_stride_y,
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        &geometry,
    )?;
    let dst = dst_plane(dst_abgr, dst_stride_abgr, ARGB, &geometry)?;
    unsafe { i422_to_abgr_unchecked(planes, dst, yuv_constants, geometry) }
}

/// Runs the argb kernels with the chroma planes and their coefficients swapped, which
/// exchanges blue and red.
pub(crate) unsafe fn i422_to_abgr_unchecked(
    planes: [Src; 3],
    dst: Dst,
    yuv_constants: &YuvConstants,
    geometry: Geometry,
) -> Result<(), ErrorKind> {
    let [y, u, v] = planes;
    i422_to_packed_unchecked(
        [y, v, u],
        dst,
        PixelFormat::Argb.descriptor(),
        &yuv_constants.mirrored(),
        geometry,
    )
}

/// Converts an i422 image into rgba, using the given ycbcr to rgb transform.
///
/// A negative height writes the destination bottom-up.
pub fn i422_to_rgba_matrix(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    dst_rgba: &mut [u8],
    dst_stride_rgba: usize,
    yuv_constants: &YuvConstants,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    i422_to_packed_matrix(
        src_y,
        src_stride_y,
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        dst_rgba,
        dst_stride_rgba,
        PixelFormat::Rgba,
        yuv_constants,
        width,
        height,
    )
}

/// Converts an i422 image with a separate alpha plane into argb.
///
/// When `attenuate` is set the color channels are premultiplied by alpha. A negative
/// height writes the destination bottom-up.
pub fn i422_alpha_to_argb_matrix(
    src_y: &[u8],
    src_stride_y: usize,
    src_u: &[u8],
    src_stride_u: usize,
    src_v: &[u8],
    src_stride_v: usize,
    src_a: &[u8],
    src_stride_a: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    yuv_constants: &YuvConstants,
    width: i32,
    height: i32,
    attenuate: bool,
) -> Result<(), ErrorKind> {
    if src_y.is_empty()
        || src_u.is_empty()
        || src_v.is_empty()
        || src_a.is_empty()
        || dst_argb.is_empty()
    {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let [y, u, v] = i422_planes(
        src_y,
        src_stride_y,
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        &geometry,
    )?;
    let a = src_plane(src_a, src_stride_a, LUMA, &geometry)?;
    let dst = dst_plane(dst_argb, dst_stride_argb, ARGB, &geometry)?;
    unsafe { i422_alpha_to_argb_unchecked([y, u, v, a], dst, yuv_constants, geometry, attenuate) }
}

pub(crate) unsafe fn i422_alpha_to_argb_unchecked(
    planes: [Src; 4],
    dst: Dst,
    yuv_constants: &YuvConstants,
    geometry: Geometry,
    attenuate: bool,
) -> Result<(), ErrorKind> {
    let dst = geometry.orient(dst);
    let [y, u, v, a] = planes;

    let width = geometry.width;
    let bytes = ARGB.bytes(width);
    let capabilities = crate::capabilities();
    let kernel = row::I422_ALPHA_TO_ARGB.select(capabilities, width);
    let mut attenuation = if attenuate {
        Some((row::ATTENUATE.select(capabilities, width), scratch(bytes)?))
    } else {
        None
    };

    for i in 0..geometry.height {
        let planes = [
            y.row(i, LUMA.bytes(width)),
            u.row(i, CHROMA.bytes(width)),
            v.row(i, CHROMA.bytes(width)),
            a.row(i, LUMA.bytes(width)),
        ];
        let out = dst.row_mut(i, bytes);
        match attenuation.as_mut() {
            Some((premultiply, staging)) => {
                row::i422_alpha_to_argb(&kernel, planes, staging, yuv_constants, width);
                row::map(premultiply, staging, 4, out, 4, width);
            }
            None => row::i422_alpha_to_argb(&kernel, planes, out, yuv_constants, width),
        }
    }

    Ok(())
}

/// Converts a packed uyvy image into argb, using the given ycbcr to rgb transform.
///
/// A negative height reads the source bottom-up.
pub fn uyvy_to_argb_matrix(
    src_uyvy: &[u8],
    src_stride_uyvy: usize,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    yuv_constants: &YuvConstants,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src_uyvy.is_empty() || dst_argb.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src_uyvy, src_stride_uyvy, UYVY, &geometry)?;
    let dst = dst_plane(dst_argb, dst_stride_argb, ARGB, &geometry)?;
    unsafe { uyvy_to_argb_unchecked(src, dst, yuv_constants, geometry) }
}

pub(crate) unsafe fn uyvy_to_argb_unchecked(
    src: Src,
    dst: Dst,
    yuv_constants: &YuvConstants,
    mut geometry: Geometry,
) -> Result<(), ErrorKind> {
    let src = geometry.orient(src);
    geometry.coalesce(&[(src.stride, UYVY), (dst.stride, ARGB)], None);

    let width = geometry.width;
    let layout = PixelFormat::Argb.descriptor();
    let kernel = row::UYVY_TO_RGB.select(crate::capabilities(), width);
    for i in 0..geometry.height {
        row::uyvy_to_rgb(
            &kernel,
            src.row(i, UYVY.bytes(width)),
            dst.row_mut(i, ARGB.bytes(width)),
            layout,
            yuv_constants,
            width,
        );
    }

    Ok(())
}

/// Converts between any two packed rgb formats.
///
/// Alpha is dropped when the destination has none, and set to 255 when the source has
/// none. A negative height reads the source bottom-up.
pub fn convert_packed(
    src: &[u8],
    src_stride: usize,
    src_format: PixelFormat,
    dst: &mut [u8],
    dst_stride: usize,
    dst_format: PixelFormat,
    width: i32,
    height: i32,
) -> Result<(), ErrorKind> {
    if src.is_empty() || dst.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = Geometry::new(width, height)?;
    let src = src_plane(src, src_stride, Span::packed(src_format.depth()), &geometry)?;
    let dst = dst_plane(dst, dst_stride, Span::packed(dst_format.depth()), &geometry)?;
    let table = PackedShuffle::between(src_format, dst_format);
    unsafe { shuffle_unchecked(src, dst, &table, geometry) }
}

macro_rules! packed_conversion {
    ($name:ident, $src:ident, $dst:ident, $doc:literal) => {
        paste::paste! {
            #[doc = $doc]
            ///
            /// A negative height reads the source bottom-up.
            pub fn $name(
                [<src_ $src:lower>]: &[u8],
                [<src_stride_ $src:lower>]: usize,
                [<dst_ $dst:lower>]: &mut [u8],
                [<dst_stride_ $dst:lower>]: usize,
                width: i32,
                height: i32,
            ) -> Result<(), $crate::ErrorKind> {
                $crate::convert::convert_packed(
                    [<src_ $src:lower>],
                    [<src_stride_ $src:lower>],
                    $crate::PixelFormat::$src,
                    [<dst_ $dst:lower>],
                    [<dst_stride_ $dst:lower>],
                    $crate::PixelFormat::$dst,
                    width,
                    height,
                )
            }
        }
    };
}

packed_conversion!(bgra_to_argb, Bgra, Argb, "Converts a bgra image into argb.");
packed_conversion!(abgr_to_argb, Abgr, Argb, "Converts an abgr image into argb.");
packed_conversion!(rgba_to_argb, Rgba, Argb, "Converts an rgba image into argb.");
packed_conversion!(
    rgb24_to_argb,
    Rgb24,
    Argb,
    "Converts an rgb24 image into argb, with opaque alpha."
);
packed_conversion!(
    raw_to_argb,
    Raw,
    Argb,
    "Converts a raw image into argb, with opaque alpha."
);
packed_conversion!(
    raw_to_rgba,
    Raw,
    Rgba,
    "Converts a raw image into rgba, with opaque alpha."
);
