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
use core::fmt;

/// An enumeration of supported packed rgb pixel formats.
///
/// Names follow the little endian word order, so the first byte in memory is the last
/// letter of the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum PixelFormat {
    /// Blue, green, red and alpha bytes in memory.
    ///
    /// 32 bits per pixel
    Argb,
    /// Alpha, red, green and blue bytes in memory.
    ///
    /// 32 bits per pixel
    Bgra,
    /// Red, green, blue and alpha bytes in memory.
    ///
    /// 32 bits per pixel
    Abgr,
    /// Alpha, blue, green and red bytes in memory.
    ///
    /// 32 bits per pixel
    Rgba,
    /// Blue, green and red bytes in memory, no padding.
    ///
    /// 24 bits per pixel
    Rgb24,
    /// Red, green and blue bytes in memory, no padding.
    ///
    /// 24 bits per pixel
    Raw,
}

/// Position of each channel inside one pixel of a packed format.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelFormatDescriptor {
    /// Number of bytes of one pixel
    pub bytes_per_pixel: usize,
    /// Byte index of the blue channel
    pub b: usize,
    /// Byte index of the green channel
    pub g: usize,
    /// Byte index of the red channel
    pub r: usize,
    /// Byte index of the alpha channel, if the format has one
    pub a: Option<usize>,
}

const DESCRIPTORS: [PixelFormatDescriptor; 6] = [
    PixelFormatDescriptor {
        bytes_per_pixel: 4,
        b: 0,
        g: 1,
        r: 2,
        a: Some(3),
    },
    PixelFormatDescriptor {
        bytes_per_pixel: 4,
        b: 3,
        g: 2,
        r: 1,
        a: Some(0),
    },
    PixelFormatDescriptor {
        bytes_per_pixel: 4,
        b: 2,
        g: 1,
        r: 0,
        a: Some(3),
    },
    PixelFormatDescriptor {
        bytes_per_pixel: 4,
        b: 1,
        g: 2,
        r: 3,
        a: Some(0),
    },
    PixelFormatDescriptor {
        bytes_per_pixel: 3,
        b: 0,
        g: 1,
        r: 2,
        a: None,
    },
    PixelFormatDescriptor {
        bytes_per_pixel: 3,
        b: 2,
        g: 1,
        r: 0,
        a: None,
    },
];

impl PixelFormat {
    /// Channel layout of the format
    pub const fn descriptor(self) -> &'static PixelFormatDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Number of bytes of one pixel
    pub const fn depth(self) -> usize {
        self.descriptor().bytes_per_pixel
    }
}

impl fmt::Display for PixelFormat {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelFormat::Argb => write!(f, "argb"),
            PixelFormat::Bgra => write!(f, "bgra"),
            PixelFormat::Abgr => write!(f, "abgr"),
            PixelFormat::Rgba => write!(f, "rgba"),
            PixelFormat::Rgb24 => write!(f, "rgb24"),
            PixelFormat::Raw => write!(f, "raw"),
        }
    }
}

impl TryFrom<i32> for PixelFormat {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PixelFormat::Argb),
            1 => Ok(PixelFormat::Bgra),
            2 => Ok(PixelFormat::Abgr),
            3 => Ok(PixelFormat::Rgba),
            4 => Ok(PixelFormat::Rgb24),
            5 => Ok(PixelFormat::Raw),
            _ => Err(()),
        }
    }
}

/// If a plane stride is assigned to this constant, the plane will be assumed to contain packed data
pub const STRIDE_AUTO: usize = 0;

/// Source index marking a destination byte that receives an opaque alpha
pub const OPAQUE: u8 = 0x80;

/// Byte permutation turning pixels of one packed layout into another one.
///
/// `indices[i]` is the source byte written to destination byte `i` of every pixel, or
/// [`OPAQUE`]. `lanes` and `fill` expand the same permutation over four pixels, in the
/// form expected by byte shuffle instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedShuffle {
    pub src_bpp: usize,
    pub dst_bpp: usize,
    pub indices: [u8; 4],
    pub lanes: [u8; 16],
    pub fill: [u8; 16],
}

impl PackedShuffle {
    #[allow(clippy::cast_possible_truncation)]
    fn new(src_bpp: usize, dst_bpp: usize, indices: [u8; 4]) -> Self {
        let mut lanes = [OPAQUE; 16];
        let mut fill = [0; 16];
        for pixel in 0..4 {
            for (byte, &index) in indices.iter().enumerate().take(dst_bpp) {
                let lane = pixel * dst_bpp + byte;
                if index & OPAQUE == 0 {
                    lanes[lane] = (pixel * src_bpp) as u8 + index;
                } else {
                    fill[lane] = crate::color_space::DEFAULT_ALPHA;
                }
            }
        }

        PackedShuffle {
            src_bpp,
            dst_bpp,
            indices,
            lanes,
            fill,
        }
    }

    /// Permutation converting `src` pixels to `dst` pixels.
    ///
    /// Alpha is dropped when `dst` has none, and set to opaque when `src` has none.
    #[allow(clippy::cast_possible_truncation)]
    pub fn between(src: PixelFormat, dst: PixelFormat) -> Self {
        let s = src.descriptor();
        let d = dst.descriptor();

        let mut indices = [OPAQUE; 4];
        indices[d.b] = s.b as u8;
        indices[d.g] = s.g as u8;
        indices[d.r] = s.r as u8;
        if let Some(a) = d.a {
            indices[a] = s.a.map_or(OPAQUE, |x| x as u8);
        }

        PackedShuffle::new(s.bytes_per_pixel, d.bytes_per_pixel, indices)
    }

    /// Permutation of the four bytes of each pixel: destination byte `i` is source
    /// byte `permutation[i]`.
    pub fn from_permutation(permutation: &[u8; 4]) -> Option<Self> {
        if permutation.iter().any(|&index| index > 3) {
            return None;
        }

        Some(PackedShuffle::new(4, 4, *permutation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_integer() {
        assert_eq!(PixelFormat::try_from(1), Ok(PixelFormat::Bgra));
        assert_eq!(PixelFormat::try_from(5), Ok(PixelFormat::Raw));
        assert_eq!(PixelFormat::try_from(6), Err(()));
    }

    #[test]
    fn shuffle_tables_match_layouts() {
        let bgra_argb = PackedShuffle::between(PixelFormat::Bgra, PixelFormat::Argb);
        assert_eq!(bgra_argb.indices, [3, 2, 1, 0]);
        assert_eq!(&bgra_argb.lanes[4..8], &[7, 6, 5, 4]);

        let abgr_argb = PackedShuffle::between(PixelFormat::Abgr, PixelFormat::Argb);
        assert_eq!(abgr_argb.indices, [2, 1, 0, 3]);

        let rgba_argb = PackedShuffle::between(PixelFormat::Rgba, PixelFormat::Argb);
        assert_eq!(rgba_argb.indices, [1, 2, 3, 0]);

        let argb_rgba = PackedShuffle::between(PixelFormat::Argb, PixelFormat::Rgba);
        assert_eq!(argb_rgba.indices, [3, 0, 1, 2]);
        assert_eq!(argb_rgba.fill, [0; 16]);
    }

    #[test]
    fn three_byte_layouts() {
        let rgb24_argb = PackedShuffle::between(PixelFormat::Rgb24, PixelFormat::Argb);
        assert_eq!(rgb24_argb.indices, [0, 1, 2, OPAQUE]);
        assert_eq!(&rgb24_argb.lanes[4..8], &[3, 4, 5, OPAQUE]);
        assert_eq!(&rgb24_argb.fill[..8], &[0, 0, 0, 255, 0, 0, 0, 255]);

        let raw_rgba = PackedShuffle::between(PixelFormat::Raw, PixelFormat::Rgba);
        assert_eq!(raw_rgba.indices, [OPAQUE, 2, 1, 0]);

        let argb_raw = PackedShuffle::between(PixelFormat::Argb, PixelFormat::Raw);
        assert_eq!(&argb_raw.indices[..3], &[2, 1, 0]);
        assert_eq!(&argb_raw.lanes[3..6], &[6, 5, 4]);
        assert_eq!(&argb_raw.lanes[12..], &[OPAQUE; 4]);
    }

    #[test]
    fn permutation_rejects_out_of_range() {
        assert!(PackedShuffle::from_permutation(&[0, 1, 2, 4]).is_none());
        let identity = PackedShuffle::from_permutation(&[0, 1, 2, 3]);
        assert_eq!(
            identity,
            Some(PackedShuffle::between(PixelFormat::Argb, PixelFormat::Argb))
        );
    }
}
