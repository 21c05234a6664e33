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
use std::fmt;

/// An enumeration of supported ycbcr color models.
///
/// Limited range variants map luma to 16-235 and chroma to 16-240, full range variants
/// use the whole 0-255 interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum ColorSpace {
    /// YCbCr, ITU-R Recommendation BT.601 (standard video system)
    Bt601,
    /// YCbCr, BT.601 (full range, also known as JPEG)
    Bt601FR,
    /// YCbCr, ITU-R Recommendation BT.709 (CSC systems)
    Bt709,
    /// YCbCr, BT.709 (full range)
    Bt709FR,
    /// YCbCr, ITU-R Recommendation BT.2020 (UHD systems)
    Bt2020,
    /// YCbCr, BT.2020 (full range)
    Bt2020FR,
}

impl ColorSpace {
    /// Constants converting planes ordered as Y, U, V.
    pub const fn yuv_constants(self) -> &'static YuvConstants {
        match self {
            ColorSpace::Bt601 => &YUV_I601_CONSTANTS,
            ColorSpace::Bt601FR => &YUV_JPEG_CONSTANTS,
            ColorSpace::Bt709 => &YUV_H709_CONSTANTS,
            ColorSpace::Bt709FR => &YUV_F709_CONSTANTS,
            ColorSpace::Bt2020 => &YUV_2020_CONSTANTS,
            ColorSpace::Bt2020FR => &YUV_V2020_CONSTANTS,
        }
    }

    /// Constants converting planes ordered as Y, V, U.
    ///
    /// Swapping the chroma planes and using these constants produces the blue and
    /// red channels in swapped positions.
    pub const fn yvu_constants(self) -> &'static YuvConstants {
        match self {
            ColorSpace::Bt601 => &YVU_I601_CONSTANTS,
            ColorSpace::Bt601FR => &YVU_JPEG_CONSTANTS,
            ColorSpace::Bt709 => &YVU_H709_CONSTANTS,
            ColorSpace::Bt709FR => &YVU_F709_CONSTANTS,
            ColorSpace::Bt2020 => &YVU_2020_CONSTANTS,
            ColorSpace::Bt2020FR => &YVU_V2020_CONSTANTS,
        }
    }
}

impl TryFrom<i32> for ColorSpace {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColorSpace::Bt601),
            1 => Ok(ColorSpace::Bt601FR),
            2 => Ok(ColorSpace::Bt709),
            3 => Ok(ColorSpace::Bt709FR),
            4 => Ok(ColorSpace::Bt2020),
            5 => Ok(ColorSpace::Bt2020FR),
            _ => Err(()),
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColorSpace::Bt601 => write!(f, "bt-601"),
            ColorSpace::Bt601FR => write!(f, "bt-601-fr"),
            ColorSpace::Bt709 => write!(f, "bt-709"),
            ColorSpace::Bt709FR => write!(f, "bt-709-fr"),
            ColorSpace::Bt2020 => write!(f, "bt-2020"),
            ColorSpace::Bt2020FR => write!(f, "bt-2020-fr"),
        }
    }
}

/// Fixed point coefficients for the ycbcr to rgb transform of one color space.
///
/// Chroma coefficients are scaled by 64. The luma gain is scaled so that
/// `(y * 257 * yg) >> 16` is luma times 64, and the luma bias already contains the
/// rounding term of the final shift by 6.
///
/// Values can only be obtained through the named constants of this module, or through
/// [`ColorSpace::yuv_constants`] and [`ColorSpace::yvu_constants`].
#[derive(Debug, PartialEq, Eq)]
#[repr(C)]
pub struct YuvConstants {
    pub(crate) ub: i32,
    pub(crate) ug: i32,
    pub(crate) vg: i32,
    pub(crate) vr: i32,
    pub(crate) yg: i32,
    pub(crate) yb: i32,
}

impl YuvConstants {
    /// The same transform for planes stored as Y, V, U.
    pub(crate) const fn mirrored(&self) -> YuvConstants {
        YuvConstants {
            ub: self.vr,
            ug: self.vg,
            vg: self.ug,
            vr: self.ub,
            yg: self.yg,
            yb: self.yb,
        }
    }
}

macro_rules! yuv_constants {
    ($name:tt, $yg:expr, $yb:expr, $ub:expr, $ug:expr, $vg:expr, $vr:expr) => {
        paste::paste! {
            #[doc = "Y, U, V ordered constants (" $name ")"]
            pub static [<YUV_ $name _CONSTANTS>]: YuvConstants = YuvConstants {
                ub: $ub,
                ug: $ug,
                vg: $vg,
                vr: $vr,
                yg: $yg,
                yb: $yb,
            };

            #[doc = "Y, V, U ordered constants (" $name ")"]
            pub static [<YVU_ $name _CONSTANTS>]: YuvConstants = YuvConstants {
                ub: $vr,
                ug: $vg,
                vg: $ug,
                vr: $ub,
                yg: $yg,
                yb: $yb,
            };
        }
    };
}

// BT.601 limited range
yuv_constants!(I601, 18997, -1160, 128, 25, 52, 102);
// BT.601 full range
yuv_constants!(JPEG, 16320, 32, 113, 22, 46, 90);
// BT.709 limited range
yuv_constants!(H709, 18997, -1160, 128, 14, 34, 115);
// BT.709 full range
yuv_constants!(F709, 16320, 32, 119, 12, 30, 101);
// BT.2020 limited range
yuv_constants!(2020, 19003, -1160, 128, 12, 42, 107);
// BT.2020 full range
yuv_constants!(V2020, 16320, 32, 120, 11, 37, 94);

pub const DEFAULT_ALPHA: u8 = 255;

#[inline(always)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp255(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Converts one ycbcr sample triple into blue, green and red.
#[inline(always)]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn yuv_pixel(y: u8, u: u8, v: u8, c: &YuvConstants) -> (u8, u8, u8) {
    let y32 = u32::from(y) * 0x0101;
    let y1 = ((y32 * (c.yg as u32)) >> 16) as i32 + c.yb;
    let ui = i32::from(u) - 128;
    let vi = i32::from(v) - 128;

    (
        clamp255((y1 + ui * c.ub) >> 6),
        clamp255((y1 - (ui * c.ug + vi * c.vg)) >> 6),
        clamp255((y1 + vi * c.vr) >> 6),
    )
}

#[inline(always)]
pub fn rgb_to_y(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    clamp255((66 * r + 129 * g + 25 * b + 0x1080) >> 8)
}

#[inline(always)]
pub fn rgb_to_u(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    clamp255((112 * b - 74 * g - 38 * r + 0x8000) >> 8)
}

#[inline(always)]
pub fn rgb_to_v(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    clamp255((112 * r - 94 * g - 18 * b + 0x8000) >> 8)
}

/// Rounded average of two samples
#[inline(always)]
#[allow(clippy::cast_possible_truncation)]
pub fn avg(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + 1) >> 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOR_SPACES: [ColorSpace; 6] = [
        ColorSpace::Bt601,
        ColorSpace::Bt601FR,
        ColorSpace::Bt709,
        ColorSpace::Bt709FR,
        ColorSpace::Bt2020,
        ColorSpace::Bt2020FR,
    ];

    #[test]
    fn color_space_from_integer() {
        for (value, &color_space) in (0..).zip(COLOR_SPACES.iter()) {
            assert_eq!(ColorSpace::try_from(value), Ok(color_space));
        }

        assert_eq!(ColorSpace::try_from(6), Err(()));
    }

    #[test]
    fn bt601_white_and_black() {
        let white = yuv_pixel(255, 128, 128, &YUV_I601_CONSTANTS);
        assert_eq!(white, (255, 255, 255));

        let black = yuv_pixel(0, 128, 128, &YUV_I601_CONSTANTS);
        assert_eq!(black, (0, 0, 0));

        // Nominal limited range extremes
        let (b, g, r) = yuv_pixel(235, 128, 128, &YUV_I601_CONSTANTS);
        assert!(b >= 254 && g >= 254 && r >= 254);
        let (b, g, r) = yuv_pixel(16, 128, 128, &YUV_I601_CONSTANTS);
        assert!(b <= 1 && g <= 1 && r <= 1);
    }

    #[test]
    fn full_range_grey_is_identity() {
        for y in 0..=255_u8 {
            let (b, g, r) = yuv_pixel(y, 128, 128, &YUV_JPEG_CONSTANTS);
            assert!((i32::from(b) - i32::from(y)).abs() <= 1);
            assert_eq!(b, g);
            assert_eq!(g, r);
        }
    }

    #[test]
    fn mirrored_constants_swap_blue_and_red() {
        for color_space in COLOR_SPACES {
            let yuv = color_space.yuv_constants();
            let yvu = color_space.yvu_constants();
            for (y, u, v) in [(16, 40, 200), (128, 255, 0), (200, 90, 170), (81, 90, 240)] {
                let (b, g, r) = yuv_pixel(y, u, v, yuv);
                let (r2, g2, b2) = yuv_pixel(y, v, u, yvu);
                assert_eq!((b, g, r), (b2, g2, r2));
            }
        }
    }

    #[test]
    fn mirror_of_yuv_is_yvu() {
        for color_space in COLOR_SPACES {
            assert_eq!(
                &color_space.yuv_constants().mirrored(),
                color_space.yvu_constants()
            );
        }
    }

    #[test]
    fn chroma_offsets_follow_coefficients() {
        let c = &YUV_I601_CONSTANTS;
        let (b0, _, r0) = yuv_pixel(128, 128, 128, c);
        let (b1, _, _) = yuv_pixel(128, 148, 128, c);
        let (_, _, r1) = yuv_pixel(128, 128, 148, c);

        // 20 * 128 / 64 = 40 and 20 * 102 / 64 = 31.875
        assert!((i32::from(b1) - i32::from(b0) - 40).abs() <= 1);
        assert!((i32::from(r1) - i32::from(r0) - 32).abs() <= 1);
    }

    #[test]
    fn rgb_to_yuv_extremes() {
        assert_eq!(rgb_to_y(0, 0, 0), 16);
        assert_eq!(rgb_to_y(255, 255, 255), 235);
        assert_eq!(rgb_to_u(255, 255, 255), 128);
        assert_eq!(rgb_to_v(255, 255, 255), 128);
        assert_eq!(rgb_to_u(0, 0, 255), 239);
        assert_eq!(rgb_to_v(255, 0, 0), 239);
    }

    #[test]
    fn averages_round_up() {
        assert_eq!(avg(0, 1), 1);
        assert_eq!(avg(254, 255), 255);
        assert_eq!(avg(10, 13), 12);
    }
}
