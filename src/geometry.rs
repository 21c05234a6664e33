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
use crate::pixel_format::STRIDE_AUTO;
use crate::tail::Span;
use crate::ErrorKind;

use std::slice;

/// Number of samples above which the paths with a row sized scratch buffer stop
/// merging rows.
pub const COALESCE_LIMIT: usize = 32768;

pub trait Pointer: Copy {
    fn offset_bytes(self, count: isize) -> Self;
    fn address(self) -> usize;
    fn is_null(self) -> bool;
}

impl Pointer for *const u8 {
    #[inline(always)]
    fn offset_bytes(self, count: isize) -> Self {
        self.wrapping_offset(count)
    }

    #[inline(always)]
    fn address(self) -> usize {
        self as usize
    }

    #[inline(always)]
    fn is_null(self) -> bool {
        <*const u8>::is_null(self)
    }
}

impl Pointer for *mut u8 {
    #[inline(always)]
    fn offset_bytes(self, count: isize) -> Self {
        self.wrapping_offset(count)
    }

    #[inline(always)]
    fn address(self) -> usize {
        self as usize
    }

    #[inline(always)]
    fn is_null(self) -> bool {
        <*mut u8>::is_null(self)
    }
}

/// Origin and signed stride of one plane of caller memory.
#[derive(Clone, Copy, Debug)]
pub struct Plane<P> {
    pub ptr: P,
    pub stride: isize,
}

pub type Src = Plane<*const u8>;
pub type Dst = Plane<*mut u8>;

impl<P: Pointer> Plane<P> {
    pub fn new(ptr: P, stride: isize) -> Self {
        Plane { ptr, stride }
    }

    /// Moves the origin to the last row and walks the plane bottom-up.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn flip(self, height: usize) -> Self {
        Plane {
            ptr: self.ptr.offset_bytes((height as isize - 1) * self.stride),
            stride: -self.stride,
        }
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_wrap)]
    fn row_ptr(self, y: usize) -> P {
        self.ptr.offset_bytes(y as isize * self.stride)
    }

    /// Lowest and one past the highest address touched by `height` rows of `len` bytes
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn extent(self, len: usize, height: usize) -> (usize, usize) {
        let first = self.ptr.address();
        let last = self.row_ptr(height - 1).address();
        let (lo, hi) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };

        (lo, hi + len)
    }
}

impl Src {
    /// # Safety
    /// Row `y` must hold `len` readable bytes, not written for the lifetime `'a`.
    #[inline(always)]
    pub unsafe fn row<'a>(self, y: usize, len: usize) -> &'a [u8] {
        slice::from_raw_parts(self.row_ptr(y), len)
    }
}

impl Dst {
    /// # Safety
    /// Row `y` must hold `len` writable bytes, not aliased for the lifetime `'a`.
    #[inline(always)]
    pub unsafe fn row_mut<'a>(self, y: usize, len: usize) -> &'a mut [u8] {
        slice::from_raw_parts_mut(self.row_ptr(y), len)
    }

    pub fn as_src(self) -> Src {
        Plane {
            ptr: self.ptr.cast_const(),
            stride: self.stride,
        }
    }
}

/// Image dimensions once the sign of the height has been taken out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
    pub flipped: bool,
}

impl Geometry {
    #[allow(clippy::cast_sign_loss)]
    pub fn new(width: i32, height: i32) -> Result<Self, ErrorKind> {
        if width <= 0 || height == 0 {
            return Err(ErrorKind::InvalidValue);
        }

        Ok(Geometry {
            width: width as usize,
            height: height.unsigned_abs() as usize,
            flipped: height < 0,
        })
    }

    /// Flips `plane` when the image is stored bottom-up.
    pub fn orient<P: Pointer>(&self, plane: Plane<P>) -> Plane<P> {
        if self.flipped {
            plane.flip(self.height)
        } else {
            plane
        }
    }

    /// Merges all rows into a single one when every plane is tightly packed.
    ///
    /// Strides are meaningless after a successful merge.
    #[allow(clippy::cast_possible_wrap)]
    pub fn coalesce(&mut self, planes: &[(isize, Span)], limit: Option<usize>) -> bool {
        if self.height == 1 {
            return false;
        }

        let packed = planes
            .iter()
            .all(|(stride, span)| *stride == span.bytes(self.width) as isize);
        let subsampled = planes.iter().any(|(_, span)| span.shift > 0);
        if !packed || (subsampled && self.width % 2 != 0) {
            return false;
        }

        let samples = match self.width.checked_mul(self.height) {
            Some(samples) => samples,
            None => return false,
        };

        if limit.map_or(false, |limit| samples > limit) {
            return false;
        }

        self.width = samples;
        self.height = 1;
        true
    }
}

/// Checks a caller slice against the rows it is supposed to hold, and resolves
/// [`STRIDE_AUTO`].
#[allow(clippy::cast_possible_wrap)]
pub fn plane_stride(
    len: usize,
    stride: usize,
    span: Span,
    width: usize,
    height: usize,
) -> Result<isize, ErrorKind> {
    let row = span.bytes(width);
    let stride = if stride == STRIDE_AUTO { row } else { stride };
    if stride < row || stride > isize::MAX as usize {
        return Err(ErrorKind::InvalidValue);
    }

    let required = stride
        .checked_mul(height - 1)
        .and_then(|x| x.checked_add(row))
        .ok_or(ErrorKind::NotEnoughData)?;
    if len < required {
        return Err(ErrorKind::NotEnoughData);
    }

    Ok(stride as isize)
}

pub fn src_plane(
    buffer: &[u8],
    stride: usize,
    span: Span,
    geometry: &Geometry,
) -> Result<Src, ErrorKind> {
    let stride = plane_stride(
        buffer.len(),
        stride,
        span,
        geometry.width,
        geometry.height,
    )?;

    Ok(Plane::new(buffer.as_ptr(), stride))
}

pub fn dst_plane(
    buffer: &mut [u8],
    stride: usize,
    span: Span,
    geometry: &Geometry,
) -> Result<Dst, ErrorKind> {
    let stride = plane_stride(
        buffer.len(),
        stride,
        span,
        geometry.width,
        geometry.height,
    )?;

    Ok(Plane::new(buffer.as_mut_ptr(), stride))
}

/// True when the two planes address overlapping memory
pub fn overlaps(src: Src, src_row: usize, dst: Dst, dst_row: usize, height: usize) -> bool {
    let (src_lo, src_hi) = src.extent(src_row, height);
    let (dst_lo, dst_hi) = dst.extent(dst_row, height);
    src_lo < dst_hi && dst_lo < src_hi
}

/// Calls `f` with each source row and the destination row at the same height.
///
/// Source rows are staged through scratch memory when the planes overlap. Overlapping
/// planes walked in opposite directions are rejected, since a row would be
/// overwritten before it is read.
///
/// # Safety
/// Both planes must hold `height` rows of the given sizes.
pub unsafe fn for_each_row<F>(
    src: Src,
    src_row: usize,
    dst: Dst,
    dst_row: usize,
    height: usize,
    mut f: F,
) -> Result<(), ErrorKind>
where
    F: FnMut(&[u8], &mut [u8]),
{
    if overlaps(src, src_row, dst, dst_row, height) {
        if height > 1 && (src.stride < 0) != (dst.stride < 0) {
            log::debug!("Overlapping planes cannot be flipped in place");
            return Err(ErrorKind::InvalidOperation);
        }

        let mut staging = scratch(src_row)?;
        for y in 0..height {
            staging.copy_from_slice(src.row(y, src_row));
            f(&staging, dst.row_mut(y, dst_row));
        }
    } else {
        for y in 0..height {
            f(src.row(y, src_row), dst.row_mut(y, dst_row));
        }
    }

    Ok(())
}

/// Zeroed scratch memory, or `OutOfMemory` if it cannot be reserved.
pub fn scratch(len: usize) -> Result<Vec<u8>, ErrorKind> {
    let mut buffer = Vec::new();
    if buffer.try_reserve_exact(len).is_err() {
        log::debug!("Unable to reserve {} bytes of scratch memory", len);
        return Err(ErrorKind::OutOfMemory);
    }

    buffer.resize(len, 0);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_dimensions() {
        assert_eq!(Geometry::new(0, 1), Err(ErrorKind::InvalidValue));
        assert_eq!(Geometry::new(-3, 1), Err(ErrorKind::InvalidValue));
        assert_eq!(Geometry::new(1, 0), Err(ErrorKind::InvalidValue));
        assert_eq!(
            Geometry::new(2, -5),
            Ok(Geometry {
                width: 2,
                height: 5,
                flipped: true
            })
        );
    }

    #[test]
    fn flip_walks_bottom_up() {
        let buffer = [0_u8, 1, 2, 3, 4, 5];
        let plane = Plane::new(buffer.as_ptr(), 2).flip(3);
        assert_eq!(plane.stride, -2);
        unsafe {
            assert_eq!(plane.row(0, 2), &[4, 5]);
            assert_eq!(plane.row(2, 2), &[0, 1]);
        }

        assert_eq!(plane.extent(2, 3), (buffer.as_ptr() as usize, buffer.as_ptr() as usize + 6));
    }

    #[test]
    fn coalesce_packed_planes() {
        let luma = Span::packed(1);
        let chroma = Span::subsampled(1);
        let argb = Span::packed(4);

        let mut geometry = Geometry::new(8, 4).unwrap();
        assert!(geometry.coalesce(&[(8, luma), (4, chroma), (32, argb)], None));
        assert_eq!((geometry.width, geometry.height), (32, 1));

        let mut geometry = Geometry::new(7, 4).unwrap();
        assert!(!geometry.coalesce(&[(7, luma), (4, chroma), (28, argb)], None));

        let mut geometry = Geometry::new(8, 4).unwrap();
        assert!(!geometry.coalesce(&[(8, luma), (32, argb)], Some(16)));

        let mut geometry = Geometry::new(8, 4).unwrap();
        assert!(!geometry.coalesce(&[(-8, luma), (32, argb)], None));
    }

    #[test]
    fn stride_validation() {
        let span = Span::packed(4);
        assert_eq!(plane_stride(40, STRIDE_AUTO, span, 5, 2), Ok(20));
        assert_eq!(plane_stride(39, STRIDE_AUTO, span, 5, 2), Err(ErrorKind::NotEnoughData));
        assert_eq!(plane_stride(64, 19, span, 5, 2), Err(ErrorKind::InvalidValue));
        assert_eq!(plane_stride(44, 24, span, 5, 2), Ok(24));
        assert_eq!(plane_stride(3, 24, Span::subsampled(1), 5, 1), Ok(24));
    }

    #[test]
    fn overlapping_rows_are_staged() {
        let mut buffer: Vec<u8> = (0..12).collect();
        let dst = Plane::new(buffer.as_mut_ptr(), 4);
        let src = Plane::new(dst.ptr.cast_const().wrapping_add(1), 4);
        let result = unsafe {
            for_each_row(src, 3, dst, 3, 3, |s, d| {
                for (d, s) in d.iter_mut().zip(s) {
                    *d = *s;
                }
            })
        };

        assert_eq!(result, Ok(()));
        assert_eq!(buffer, [1, 2, 3, 3, 5, 6, 7, 7, 9, 10, 11, 11]);
    }

    #[test]
    fn flipped_overlap_is_rejected() {
        let mut buffer: Vec<u8> = (0..12).collect();
        let dst = Plane::new(buffer.as_mut_ptr(), 4);
        let src = dst.as_src().flip(3);
        let result = unsafe { for_each_row(src, 4, dst, 4, 3, |_, _| ()) };

        assert_eq!(result, Err(ErrorKind::InvalidOperation));
        assert_eq!(buffer, (0..12).collect::<Vec<u8>>());

        // A single row reads and writes the same bytes
        let src = dst.as_src().flip(1);
        let result = unsafe { for_each_row(src, 4, dst, 4, 1, |s, d| d.copy_from_slice(s)) };
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn overlap_detection() {
        let mut buffer = [0_u8; 64];
        let dst = Plane::new(buffer.as_mut_ptr(), 16);
        let src = Plane::new(dst.ptr.cast_const().wrapping_add(8), 16);
        assert!(overlaps(src, 8, dst, 16, 3));

        let src = Plane::new(dst.ptr.cast_const().wrapping_add(48), 16);
        assert!(!overlaps(src, 16, dst, 16, 3));
    }
}
