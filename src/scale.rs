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
//! Image scaling.
//!
//! Source positions are walked with 16.16 fixed point accumulators. Integer ratios and
//! filters that cannot change the result are turned into cheaper paths.
use crate::dispatcher::Registry;
use crate::geometry::{dst_plane, scratch, src_plane, Dst, Geometry, Src};
use crate::row::scalar::{
    scale_cols, scale_down_even_box_row, scale_down_even_row, scale_filter_cols,
};
use crate::row::{self, ScaleDown2Row};
use crate::tail::Span;
use crate::ErrorKind;

use std::mem;

/// Largest accepted source width and height
pub const MAX_SCALE_DIMENSION: usize = 32768;

/// An enumeration of the sampling filters used when scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum FilterMode {
    /// Point sampling
    None,
    /// Horizontal interpolation only
    Linear,
    /// Horizontal and vertical interpolation
    Bilinear,
    /// Averages 2x2 blocks when the image is reduced by an even integer factor,
    /// bilinear otherwise
    Box,
}

impl TryFrom<i32> for FilterMode {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FilterMode::None),
            1 => Ok(FilterMode::Linear),
            2 => Ok(FilterMode::Bilinear),
            3 => Ok(FilterMode::Box),
            _ => Err(()),
        }
    }
}

/// Downgrades `filtering` when a simpler filter gives the same result.
pub(crate) fn reduce_filter(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    filtering: FilterMode,
) -> FilterMode {
    let mut filtering = filtering;
    if filtering == FilterMode::Box && (dst_width * 2 >= src_width || dst_height * 2 >= src_height)
    {
        filtering = FilterMode::Bilinear;
    }

    if filtering == FilterMode::Bilinear {
        if src_height == 1 || dst_height == src_height || dst_height * 3 == src_height {
            filtering = FilterMode::Linear;
        }

        if src_width == 1 {
            filtering = FilterMode::None;
        }
    }

    if filtering == FilterMode::Linear
        && (src_width == 1 || dst_width == src_width || dst_width * 3 == src_width)
    {
        filtering = FilterMode::None;
    }

    filtering
}

/// Position of the first sample and distance between samples, 16.16 fixed point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Steps {
    pub x: i64,
    pub y: i64,
    pub dx: i64,
    pub dy: i64,
}

#[allow(clippy::cast_possible_wrap)]
fn fixed_div(num: usize, div: usize) -> i64 {
    ((num as i64) << 16) / div as i64
}

/// Maps the first and last destination samples onto the first and last source ones
#[allow(clippy::cast_possible_wrap)]
fn fixed_div1(num: usize, div: usize) -> i64 {
    (((num as i64) << 16) - 0x0001_0001) / (div as i64 - 1)
}

fn center_start(d: i64, bias: i64) -> i64 {
    (d >> 1) + bias
}

fn filtered_step(src: usize, dst: usize) -> (i64, i64) {
    if dst <= src {
        let d = fixed_div(src, dst);
        (center_start(d, -32768), d)
    } else if src > 1 && dst > 1 {
        (0, fixed_div1(src, dst))
    } else {
        (0, 0)
    }
}

pub(crate) fn slope(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    filtering: FilterMode,
) -> Steps {
    // A full size source reduced to one sample would overflow the step
    let dst_width = if dst_width == 1 && src_width >= MAX_SCALE_DIMENSION {
        src_width
    } else {
        dst_width
    };
    let dst_height = if dst_height == 1 && src_height >= MAX_SCALE_DIMENSION {
        src_height
    } else {
        dst_height
    };

    match filtering {
        FilterMode::Box => Steps {
            x: 0,
            y: 0,
            dx: fixed_div(src_width, dst_width),
            dy: fixed_div(src_height, dst_height),
        },
        FilterMode::Bilinear => {
            let (x, dx) = filtered_step(src_width, dst_width);
            let (y, dy) = filtered_step(src_height, dst_height);
            Steps { x, y, dx, dy }
        }
        FilterMode::Linear => {
            let (x, dx) = filtered_step(src_width, dst_width);
            let dy = fixed_div(src_height, dst_height);
            Steps { x, y: dy >> 1, dx, dy }
        }
        FilterMode::None => {
            let dx = fixed_div(src_width, dst_width);
            let dy = fixed_div(src_height, dst_height);
            Steps {
                x: center_start(dx, 0),
                y: center_start(dy, 0),
                dx,
                dy,
            }
        }
    }
}

pub(crate) fn check_dimensions(
    src_width: i32,
    src_height: i32,
    dst_width: i32,
    dst_height: i32,
) -> Result<(Geometry, Geometry), ErrorKind> {
    let src = Geometry::new(src_width, src_height)?;
    if src.width > MAX_SCALE_DIMENSION || src.height > MAX_SCALE_DIMENSION || dst_height <= 0 {
        return Err(ErrorKind::InvalidValue);
    }

    Ok((src, Geometry::new(dst_width, dst_height)?))
}

/// Scales an argb image.
///
/// Source dimensions must not exceed [`MAX_SCALE_DIMENSION`]. A negative source height
/// reads the source bottom-up.
///
/// # Examples
/// ```
/// use yuv_primitives::{argb_scale, FilterMode, STRIDE_AUTO};
///
/// let src = [10u8, 20, 30, 255, 50, 60, 70, 255];
/// let mut dst = [0u8; 4];
/// argb_scale(&src, STRIDE_AUTO, 2, 1, &mut dst, STRIDE_AUTO, 1, 1, FilterMode::Box).unwrap();
/// assert_eq!(dst, [30, 40, 50, 255]);
/// ```
pub fn argb_scale(
    src_argb: &[u8],
    src_stride_argb: usize,
    src_width: i32,
    src_height: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: usize,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
) -> Result<(), ErrorKind> {
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

/// Scales a plane of one byte samples.
///
/// Source dimensions must not exceed [`MAX_SCALE_DIMENSION`]. A negative source height
/// reads the source bottom-up.
pub fn scale_plane(
    src: &[u8],
    src_stride: usize,
    src_width: i32,
    src_height: i32,
    dst: &mut [u8],
    dst_stride: usize,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
) -> Result<(), ErrorKind> {
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

fn scale<const BPP: usize>(
    src: &[u8],
    src_stride: usize,
    src_width: i32,
    src_height: i32,
    dst: &mut [u8],
    dst_stride: usize,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
) -> Result<(), ErrorKind> {
    if src.is_empty() || dst.is_empty() {
        return Err(ErrorKind::InvalidValue);
    }

    let (src_geometry, dst_geometry) =
        check_dimensions(src_width, src_height, dst_width, dst_height)?;
    let src = src_plane(src, src_stride, Span::packed(BPP), &src_geometry)?;
    let dst = dst_plane(dst, dst_stride, Span::packed(BPP), &dst_geometry)?;
    unsafe { scale_unchecked::<BPP>(src, src_geometry, dst, dst_geometry, filtering) }
}

#[derive(Clone, Copy)]
struct Scaling {
    src: Src,
    src_width: usize,
    src_height: usize,
    dst: Dst,
    dst_width: usize,
    dst_height: usize,
}

impl Scaling {
    unsafe fn src_row<'a>(&self, y: usize, bpp: usize) -> &'a [u8] {
        self.src.row(y, self.src_width * bpp)
    }

    unsafe fn dst_row<'a>(&self, y: usize, bpp: usize) -> &'a mut [u8] {
        self.dst.row_mut(y, self.dst_width * bpp)
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn integer_part(value: i64) -> usize {
    (value.max(0) >> 16) as usize
}

/// Position of the last source row
#[allow(clippy::cast_possible_wrap)]
fn last_row(s: &Scaling) -> i64 {
    (s.src_height as i64 - 1) << 16
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn fraction(value: i64) -> u32 {
    ((value >> 8) & 255) as u32
}

pub(crate) unsafe fn scale_unchecked<const BPP: usize>(
    src: Src,
    src_geometry: Geometry,
    dst: Dst,
    dst_geometry: Geometry,
    filtering: FilterMode,
) -> Result<(), ErrorKind> {
    let scaling = Scaling {
        src: src_geometry.orient(src),
        src_width: src_geometry.width,
        src_height: src_geometry.height,
        dst,
        dst_width: dst_geometry.width,
        dst_height: dst_geometry.height,
    };

    let mut filtering = reduce_filter(
        scaling.src_width,
        scaling.src_height,
        scaling.dst_width,
        scaling.dst_height,
        filtering,
    );
    let steps = slope(
        scaling.src_width,
        scaling.src_height,
        scaling.dst_width,
        scaling.dst_height,
        filtering,
    );

    if ((steps.dx | steps.dy) & 0xffff) == 0 {
        if steps.dx == 0 || steps.dy == 0 {
            filtering = FilterMode::None;
        } else {
            let odd_x = (steps.dx & 0x10000) != 0;
            let odd_y = (steps.dy & 0x10000) != 0;
            if !odd_x && !odd_y {
                if steps.dx == 0x20000 {
                    scale_down2::<BPP>(&scaling, &steps, filtering);
                } else {
                    scale_down_even::<BPP>(&scaling, &steps, filtering);
                }

                return Ok(());
            }

            if odd_x && odd_y {
                filtering = FilterMode::None;
                if steps.dx == 0x10000 && steps.dy == 0x10000 {
                    copy_window::<BPP>(&scaling, &steps);
                    return Ok(());
                }
            }
        }
    }

    if steps.dx == 0x10000 && (steps.x & 0xffff) == 0 {
        scale_vertical::<BPP>(&scaling, &steps, filtering);
        return Ok(());
    }

    match filtering {
        FilterMode::None => scale_simple::<BPP>(&scaling, &steps),
        _ if steps.dy < 0x10000 => scale_bilinear_up::<BPP>(&scaling, &steps, filtering)?,
        _ => scale_bilinear_down::<BPP>(&scaling, &steps, filtering)?,
    }

    Ok(())
}

fn down2_registry<const BPP: usize>(filtering: FilterMode) -> &'static Registry<ScaleDown2Row> {
    match (BPP, filtering) {
        (4, FilterMode::None) => &row::SCALE_DOWN2_ARGB,
        (4, FilterMode::Linear) => &row::SCALE_DOWN2_LINEAR_ARGB,
        (4, _) => &row::SCALE_DOWN2_BOX_ARGB,
        (_, FilterMode::None) => &row::SCALE_DOWN2_PLANE,
        (_, FilterMode::Linear) => &row::SCALE_DOWN2_LINEAR_PLANE,
        _ => &row::SCALE_DOWN2_BOX_PLANE,
    }
}

/// Exact 2x horizontal reduction, with an even vertical reduction
unsafe fn scale_down2<const BPP: usize>(s: &Scaling, steps: &Steps, filtering: FilterMode) {
    let kernel = down2_registry::<BPP>(filtering).select(crate::capabilities(), s.dst_width);
    let first = integer_part(steps.y);
    let row_step = integer_part(steps.dy);
    let two_rows = matches!(filtering, FilterMode::Bilinear | FilterMode::Box);
    for j in 0..s.dst_height {
        let y = first + j * row_step;
        let top = s.src_row(y, BPP);
        let bottom = if two_rows { s.src_row(y + 1, BPP) } else { top };
        row::scale_down2(&kernel, [top, bottom], s.dst_row(j, BPP), BPP, s.dst_width);
    }
}

/// Even integer reduction on both axes
unsafe fn scale_down_even<const BPP: usize>(s: &Scaling, steps: &Steps, filtering: FilterMode) {
    let first = integer_part(steps.y);
    let row_step = integer_part(steps.dy);
    let col_step = integer_part(steps.dx);
    let offset = integer_part(steps.x) * BPP;
    for j in 0..s.dst_height {
        let y = first + j * row_step;
        let top = &s.src_row(y, BPP)[offset..];
        let dst = s.dst_row(j, BPP);
        match filtering {
            FilterMode::None => scale_down_even_row::<BPP>(top, top, col_step, dst, s.dst_width),
            FilterMode::Linear => {
                scale_down_even_box_row::<BPP>(top, top, col_step, dst, s.dst_width);
            }
            _ => {
                let bottom = &s.src_row(y + 1, BPP)[offset..];
                scale_down_even_box_row::<BPP>(top, bottom, col_step, dst, s.dst_width);
            }
        }
    }
}

unsafe fn copy_window<const BPP: usize>(s: &Scaling, steps: &Steps) {
    let first = integer_part(steps.y);
    let offset = integer_part(steps.x) * BPP;
    let bytes = s.dst_width * BPP;
    let kernel = row::COPY.select(crate::capabilities(), bytes);
    for j in 0..s.dst_height {
        let src = &s.src_row(first + j, BPP)[offset..offset + bytes];
        row::map(&kernel, src, 1, s.dst_row(j, BPP), 1, bytes);
    }
}

/// Rows `y` and `y + 1`, the second one clamped to the image
unsafe fn row_pair<'a, const BPP: usize>(s: &Scaling, y: usize) -> [&'a [u8]; 2] {
    [s.src_row(y, BPP), s.src_row((y + 1).min(s.src_height - 1), BPP)]
}

/// Unchanged width, any height
unsafe fn scale_vertical<const BPP: usize>(s: &Scaling, steps: &Steps, filtering: FilterMode) {
    let max_y = if s.src_height > 1 { last_row(s) - 1 } else { 0 };

    let offset = integer_part(steps.x) * BPP;
    let bytes = s.dst_width * BPP;
    let kernel = row::INTERPOLATE.select(crate::capabilities(), bytes);
    let mut y = steps.y;
    for j in 0..s.dst_height {
        y = y.min(max_y);
        let f = if filtering == FilterMode::None {
            0
        } else {
            fraction(y)
        };

        let [top, bottom] = row_pair::<BPP>(s, integer_part(y));
        row::interpolate(
            &kernel,
            [&top[offset..offset + bytes], &bottom[offset..offset + bytes]],
            s.dst_row(j, BPP),
            f,
            bytes,
        );
        y += steps.dy;
    }
}

fn filter_cols<const BPP: usize>(s: &Scaling, steps: &Steps, src: &[u8], dst: &mut [u8]) {
    scale_filter_cols::<BPP>(src, dst, s.src_width, s.dst_width, steps.x, steps.dx);
}

/// Vertical upsampling: filtered source rows are cached and blended
unsafe fn scale_bilinear_up<const BPP: usize>(
    s: &Scaling,
    steps: &Steps,
    filtering: FilterMode,
) -> Result<(), ErrorKind> {
    let max_y = last_row(s);
    let bytes = s.dst_width * BPP;
    let kernel = row::INTERPOLATE.select(crate::capabilities(), bytes);
    let mut rows = scratch(2 * bytes)?;
    let (mut top, mut bottom) = rows.split_at_mut(bytes);

    let mut y = steps.y.min(max_y);
    let mut cached = integer_part(y);
    let [first, second] = row_pair::<BPP>(s, cached);
    filter_cols::<BPP>(s, steps, first, top);
    filter_cols::<BPP>(s, steps, second, bottom);

    for j in 0..s.dst_height {
        y = y.min(max_y);
        let yi = integer_part(y);
        if yi != cached {
            let [next_top, next_bottom] = row_pair::<BPP>(s, yi);
            if yi == cached + 1 {
                mem::swap(&mut top, &mut bottom);
            } else {
                filter_cols::<BPP>(s, steps, next_top, top);
            }

            filter_cols::<BPP>(s, steps, next_bottom, bottom);
            cached = yi;
        }

        let f = if filtering == FilterMode::Linear {
            0
        } else {
            fraction(y)
        };
        row::interpolate(&kernel, [&*top, &*bottom], s.dst_row(j, BPP), f, bytes);
        y += steps.dy;
    }

    Ok(())
}

/// Vertical downsampling: rows are blended first, then columns are filtered
unsafe fn scale_bilinear_down<const BPP: usize>(
    s: &Scaling,
    steps: &Steps,
    filtering: FilterMode,
) -> Result<(), ErrorKind> {
    let max_y = last_row(s);
    let bytes = s.src_width * BPP;
    let kernel = row::INTERPOLATE.select(crate::capabilities(), bytes);
    let mut blended = if filtering == FilterMode::Linear {
        Vec::new()
    } else {
        scratch(bytes)?
    };

    let mut y = steps.y.min(max_y);
    for j in 0..s.dst_height {
        let [top, bottom] = row_pair::<BPP>(s, integer_part(y));
        let src = if filtering == FilterMode::Linear {
            top
        } else {
            row::interpolate(&kernel, [top, bottom], &mut blended, fraction(y), bytes);
            blended.as_slice()
        };

        scale_filter_cols::<BPP>(
            src,
            s.dst_row(j, BPP),
            s.src_width,
            s.dst_width,
            steps.x,
            steps.dx,
        );
        y = (y + steps.dy).min(max_y);
    }

    Ok(())
}

/// Point sampling
unsafe fn scale_simple<const BPP: usize>(s: &Scaling, steps: &Steps) {
    let mut y = steps.y;
    for j in 0..s.dst_height {
        let src = s.src_row(integer_part(y).min(s.src_height - 1), BPP);
        scale_cols::<BPP>(src, s.dst_row(j, BPP), s.dst_width, steps.x, steps.dx);
        y += steps.dy;
    }
}
