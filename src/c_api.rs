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
//! C entry points.
//!
//! Buffers are trusted to be large enough for the geometry they are given with, as in C.
//! Strides are signed byte distances between rows. Every function returns 0 on success and
//! -1 on failure.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
use crate::color_space::{ColorSpace, YuvConstants, YUV_I601_CONSTANTS};
use crate::convert::{
    i422_alpha_to_argb_unchecked, i422_to_abgr_unchecked, i422_to_packed_unchecked,
    uyvy_to_argb_unchecked,
};
use crate::convert_from::{
    argb_to_i420_unchecked, argb_to_i422_unchecked, argb_to_uyvy_unchecked,
    i422_to_uyvy_unchecked,
};
use crate::geometry::{Dst, Geometry, Plane, Src};
use crate::pixel_format::{PackedShuffle, PixelFormat};
use crate::planar::{
    argb_attenuate_unchecked, argb_copy_unchecked, argb_unattenuate_unchecked,
    copy_plane_unchecked, shuffle_unchecked, uyvy_to_i422_unchecked,
};
use crate::scale::{check_dimensions, scale_unchecked, FilterMode};
use crate::{describe_acceleration, ErrorKind};

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

fn status<F>(f: F) -> c_int
where
    F: FnOnce() -> Result<(), ErrorKind>,
{
    match f() {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

// Protect from C null pointers
fn src(ptr: *const u8, stride: i32) -> Result<Src, ErrorKind> {
    if ptr.is_null() {
        Err(ErrorKind::InvalidValue)
    } else {
        Ok(Plane::new(ptr, stride as isize))
    }
}

fn dst(ptr: *mut u8, stride: i32) -> Result<Dst, ErrorKind> {
    if ptr.is_null() {
        Err(ErrorKind::InvalidValue)
    } else {
        Ok(Plane::new(ptr, stride as isize))
    }
}

// C enums are untrusted in the sense you can cast any value to an enum type
fn pixel_format(value: i32) -> Result<PixelFormat, ErrorKind> {
    PixelFormat::try_from(value).map_err(|()| ErrorKind::InvalidValue)
}

unsafe fn constants<'a>(yuv_constants: *const YuvConstants) -> Result<&'a YuvConstants, ErrorKind> {
    yuv_constants.as_ref().ok_or(ErrorKind::InvalidValue)
}

#[no_mangle]
pub extern "C" fn yp_describe_acceleration() -> *mut c_char {
    let acc = describe_acceleration();
    if let Ok(s) = CString::new(acc) {
        s.into_raw()
    } else {
        ptr::null_mut()
    }
}

#[no_mangle]
pub unsafe extern "C" fn yp_unref_string(string: *mut c_char) {
    if !string.is_null() {
        let _unused = CString::from_raw(string);
    }
}

/// Null when `color_space` is not a known color space.
#[no_mangle]
pub extern "C" fn yp_yuv_constants(color_space: i32, mirrored: bool) -> *const YuvConstants {
    match ColorSpace::try_from(color_space) {
        Ok(color_space) if mirrored => color_space.yvu_constants(),
        Ok(color_space) => color_space.yuv_constants(),
        Err(()) => ptr::null(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn yp_copy_plane(
    src_y: *const u8,
    src_stride_y: i32,
    dst_y: *mut u8,
    dst_stride_y: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let (src, dst) = (src(src_y, src_stride_y)?, dst(dst_y, dst_stride_y)?);
        copy_plane_unchecked(src, dst, Geometry::new(width, height)?)
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_copy(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let (src, dst) = (src(src_argb, src_stride_argb)?, dst(dst_argb, dst_stride_argb)?);
        argb_copy_unchecked(src, dst, Geometry::new(width, height)?)
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_uyvy_to_i422(
    src_uyvy: *const u8,
    src_stride_uyvy: i32,
    dst_y: *mut u8,
    dst_stride_y: i32,
    dst_u: *mut u8,
    dst_stride_u: i32,
    dst_v: *mut u8,
    dst_stride_v: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let planes = [
            dst(dst_y, dst_stride_y)?,
            dst(dst_u, dst_stride_u)?,
            dst(dst_v, dst_stride_v)?,
        ];
        uyvy_to_i422_unchecked(
            src(src_uyvy, src_stride_uyvy)?,
            planes,
            Geometry::new(width, height)?,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_attenuate(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let (src, dst) = (src(src_argb, src_stride_argb)?, dst(dst_argb, dst_stride_argb)?);
        argb_attenuate_unchecked(src, dst, Geometry::new(width, height)?)
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_unattenuate(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let (src, dst) = (src(src_argb, src_stride_argb)?, dst(dst_argb, dst_stride_argb)?);
        argb_unattenuate_unchecked(src, dst, Geometry::new(width, height)?)
    })
}

/// `shuffler` points to four channel indices.
#[no_mangle]
pub unsafe extern "C" fn yp_argb_shuffle(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    shuffler: *const [u8; 4],
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let shuffler = shuffler.as_ref().ok_or(ErrorKind::InvalidValue)?;
        let table = PackedShuffle::from_permutation(shuffler).ok_or(ErrorKind::InvalidValue)?;
        let (src, dst) = (src(src_argb, src_stride_argb)?, dst(dst_argb, dst_stride_argb)?);
        shuffle_unchecked(src, dst, &table, Geometry::new(width, height)?)
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_convert_packed(
    src_packed: *const u8,
    src_stride: i32,
    src_format: i32,
    dst_packed: *mut u8,
    dst_stride: i32,
    dst_format: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let table = PackedShuffle::between(pixel_format(src_format)?, pixel_format(dst_format)?);
        let (src, dst) = (src(src_packed, src_stride)?, dst(dst_packed, dst_stride)?);
        shuffle_unchecked(src, dst, &table, Geometry::new(width, height)?)
    })
}

macro_rules! c_packed_conversion {
    ($name:ident, $src:ident, $dst:ident) => {
        paste::paste! {
            #[no_mangle]
            pub unsafe extern "C" fn [<yp_ $name>](
                [<src_ $src:lower>]: *const u8,
                [<src_stride_ $src:lower>]: i32,
                [<dst_ $dst:lower>]: *mut u8,
                [<dst_stride_ $dst:lower>]: i32,
                width: i32,
                height: i32,
            ) -> c_int {
                status(|| {
                    let table = PackedShuffle::between(PixelFormat::$src, PixelFormat::$dst);
                    let src = src([<src_ $src:lower>], [<src_stride_ $src:lower>])?;
                    let dst = dst([<dst_ $dst:lower>], [<dst_stride_ $dst:lower>])?;
                    shuffle_unchecked(src, dst, &table, Geometry::new(width, height)?)
                })
            }
        }
    };
}

c_packed_conversion!(bgra_to_argb, Bgra, Argb);
c_packed_conversion!(abgr_to_argb, Abgr, Argb);
c_packed_conversion!(rgba_to_argb, Rgba, Argb);
c_packed_conversion!(rgb24_to_argb, Rgb24, Argb);
c_packed_conversion!(raw_to_argb, Raw, Argb);
c_packed_conversion!(raw_to_rgba, Raw, Rgba);
c_packed_conversion!(argb_to_rgba, Argb, Rgba);
c_packed_conversion!(argb_to_bgra, Argb, Bgra);
c_packed_conversion!(argb_to_abgr, Argb, Abgr);
c_packed_conversion!(argb_to_rgb24, Argb, Rgb24);
c_packed_conversion!(argb_to_raw, Argb, Raw);

fn i422_planes(
    src_y: *const u8,
    src_stride_y: i32,
    src_u: *const u8,
    src_stride_u: i32,
    src_v: *const u8,
    src_stride_v: i32,
) -> Result<[Src; 3], ErrorKind> {
    Ok([
        src(src_y, src_stride_y)?,
        src(src_u, src_stride_u)?,
        src(src_v, src_stride_v)?,
    ])
}

#[no_mangle]
pub unsafe extern "C" fn yp_i422_to_packed_matrix(
    src_y: *const u8,
    src_stride_y: i32,
    src_u: *const u8,
    src_stride_u: i32,
    src_v: *const u8,
    src_stride_v: i32,
    dst_packed: *mut u8,
    dst_stride: i32,
    dst_format: i32,
    yuv_constants: *const YuvConstants,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let dst_format = pixel_format(dst_format)?;
        if dst_format.depth() != 4 {
            return Err(ErrorKind::InvalidOperation);
        }

        let planes = i422_planes(src_y, src_stride_y, src_u, src_stride_u, src_v, src_stride_v)?;
        i422_to_packed_unchecked(
            planes,
            dst(dst_packed, dst_stride)?,
            dst_format.descriptor(),
            constants(yuv_constants)?,
            Geometry::new(width, height)?,
        )
    })
}

macro_rules! c_i422_conversion {
    ($name:ident, $dst:ident) => {
        paste::paste! {
            #[no_mangle]
            pub unsafe extern "C" fn [<yp_ $name>](
                src_y: *const u8,
                src_stride_y: i32,
                src_u: *const u8,
                src_stride_u: i32,
                src_v: *const u8,
                src_stride_v: i32,
                [<dst_ $dst:lower>]: *mut u8,
                [<dst_stride_ $dst:lower>]: i32,
                yuv_constants: *const YuvConstants,
                width: i32,
                height: i32,
            ) -> c_int {
                yp_i422_to_packed_matrix(
                    src_y,
                    src_stride_y,
                    src_u,
                    src_stride_u,
                    src_v,
                    src_stride_v,
                    [<dst_ $dst:lower>],
                    [<dst_stride_ $dst:lower>],
                    PixelFormat::$dst as i32,
                    yuv_constants,
                    width,
                    height,
                )
            }
        }
    };
}

c_i422_conversion!(i422_to_argb_matrix, Argb);
c_i422_conversion!(i422_to_rgba_matrix, Rgba);

#[no_mangle]
pub unsafe extern "C" fn yp_i422_to_argb(
    src_y: *const u8,
    src_stride_y: i32,
    src_u: *const u8,
    src_stride_u: i32,
    src_v: *const u8,
    src_stride_v: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> c_int {
    yp_i422_to_argb_matrix(
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

#[no_mangle]
pub unsafe extern "C" fn yp_i422_to_abgr_matrix(
    src_y: *const u8,
    src_stride_y: i32,
    src_u: *const u8,
    src_stride_u: i32,
    src_v: *const u8,
    src_stride_v: i32,
    dst_abgr: *mut u8,
    dst_stride_abgr: i32,
    yuv_constants: *const YuvConstants,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let planes = i422_planes(src_y, src_stride_y, src_u, src_stride_u, src_v, src_stride_v)?;
        i422_to_abgr_unchecked(
            planes,
            dst(dst_abgr, dst_stride_abgr)?,
            constants(yuv_constants)?,
            Geometry::new(width, height)?,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_i422_alpha_to_argb_matrix(
    src_y: *const u8,
    src_stride_y: i32,
    src_u: *const u8,
    src_stride_u: i32,
    src_v: *const u8,
    src_stride_v: i32,
    src_a: *const u8,
    src_stride_a: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    yuv_constants: *const YuvConstants,
    width: i32,
    height: i32,
    attenuate: bool,
) -> c_int {
    status(|| {
        let [y, u, v] =
            i422_planes(src_y, src_stride_y, src_u, src_stride_u, src_v, src_stride_v)?;
        i422_alpha_to_argb_unchecked(
            [y, u, v, src(src_a, src_stride_a)?],
            dst(dst_argb, dst_stride_argb)?,
            constants(yuv_constants)?,
            Geometry::new(width, height)?,
            attenuate,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_uyvy_to_argb_matrix(
    src_uyvy: *const u8,
    src_stride_uyvy: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    yuv_constants: *const YuvConstants,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        uyvy_to_argb_unchecked(
            src(src_uyvy, src_stride_uyvy)?,
            dst(dst_argb, dst_stride_argb)?,
            constants(yuv_constants)?,
            Geometry::new(width, height)?,
        )
    })
}

fn i422_dst_planes(
    dst_y: *mut u8,
    dst_stride_y: i32,
    dst_u: *mut u8,
    dst_stride_u: i32,
    dst_v: *mut u8,
    dst_stride_v: i32,
) -> Result<[Dst; 3], ErrorKind> {
    Ok([
        dst(dst_y, dst_stride_y)?,
        dst(dst_u, dst_stride_u)?,
        dst(dst_v, dst_stride_v)?,
    ])
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_to_i422(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_y: *mut u8,
    dst_stride_y: i32,
    dst_u: *mut u8,
    dst_stride_u: i32,
    dst_v: *mut u8,
    dst_stride_v: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let planes = i422_dst_planes(dst_y, dst_stride_y, dst_u, dst_stride_u, dst_v, dst_stride_v)?;
        argb_to_i422_unchecked(
            src(src_argb, src_stride_argb)?,
            planes,
            Geometry::new(width, height)?,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_to_i420(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_y: *mut u8,
    dst_stride_y: i32,
    dst_u: *mut u8,
    dst_stride_u: i32,
    dst_v: *mut u8,
    dst_stride_v: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let planes = i422_dst_planes(dst_y, dst_stride_y, dst_u, dst_stride_u, dst_v, dst_stride_v)?;
        argb_to_i420_unchecked(
            src(src_argb, src_stride_argb)?,
            planes,
            Geometry::new(width, height)?,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_i422_to_uyvy(
    src_y: *const u8,
    src_stride_y: i32,
    src_u: *const u8,
    src_stride_u: i32,
    src_v: *const u8,
    src_stride_v: i32,
    dst_uyvy: *mut u8,
    dst_stride_uyvy: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        let planes = i422_planes(src_y, src_stride_y, src_u, src_stride_u, src_v, src_stride_v)?;
        i422_to_uyvy_unchecked(
            planes,
            dst(dst_uyvy, dst_stride_uyvy)?,
            Geometry::new(width, height)?,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_to_uyvy(
    src_argb: *const u8,
    src_stride_argb: i32,
    dst_uyvy: *mut u8,
    dst_stride_uyvy: i32,
    width: i32,
    height: i32,
) -> c_int {
    status(|| {
        argb_to_uyvy_unchecked(
            src(src_argb, src_stride_argb)?,
            dst(dst_uyvy, dst_stride_uyvy)?,
            Geometry::new(width, height)?,
        )
    })
}

unsafe fn scale<const BPP: usize>(
    src_ptr: *const u8,
    src_stride: i32,
    src_width: i32,
    src_height: i32,
    dst_ptr: *mut u8,
    dst_stride: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: i32,
) -> c_int {
    status(|| {
        let filtering = FilterMode::try_from(filtering).map_err(|()| ErrorKind::InvalidValue)?;
        let (src_geometry, dst_geometry) =
            check_dimensions(src_width, src_height, dst_width, dst_height)?;
        scale_unchecked::<BPP>(
            src(src_ptr, src_stride)?,
            src_geometry,
            dst(dst_ptr, dst_stride)?,
            dst_geometry,
            filtering,
        )
    })
}

#[no_mangle]
pub unsafe extern "C" fn yp_argb_scale(
    src_argb: *const u8,
    src_stride_argb: i32,
    src_width: i32,
    src_height: i32,
    dst_argb: *mut u8,
    dst_stride_argb: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: i32,
) -> c_int {
    scale::<4>(
        src_argb,
        src_stride_argb,
        src_width,
        src_height,
        dst_argb,
        dst_stride_argb,
        dst_width,
        dst_height,
        filtering,
    )
}

#[no_mangle]
pub unsafe extern "C" fn yp_scale_plane(
    src: *const u8,
    src_stride: i32,
    src_width: i32,
    src_height: i32,
    dst: *mut u8,
    dst_stride: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: i32,
) -> c_int {
    scale::<1>(
        src,
        src_stride,
        src_width,
        src_height,
        dst,
        dst_stride,
        dst_width,
        dst_height,
        filtering,
    )
}
