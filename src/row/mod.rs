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
//! Row kernels and the registries that choose between them.
//!
//! Every slot has a scalar kernel accepting any width, plus vector kernels that only
//! accept multiples of their block. The wrappers below run the selected kernel through
//! the tail adapter so that callers can pass any width.
use crate::color_space::YuvConstants;
#[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))]
use crate::cpu_info::InstructionSet;
use crate::dispatcher::{Candidate, Registry, Selected};
use crate::pixel_format::{PackedShuffle, PixelFormatDescriptor};
use crate::tail::{self, Span};

pub mod scalar;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod avx2;
#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse2;

pub type ShuffleRow = unsafe fn(&[u8], &mut [u8], &PackedShuffle, usize);
pub type I422ToRgbRow = unsafe fn(
    &[u8],
    &[u8],
    &[u8],
    &mut [u8],
    &PixelFormatDescriptor,
    &YuvConstants,
    usize,
);
pub type I422AlphaToArgbRow =
    unsafe fn(&[u8], &[u8], &[u8], &[u8], &mut [u8], &YuvConstants, usize);
pub type UyvyToRgbRow =
    unsafe fn(&[u8], &mut [u8], &PixelFormatDescriptor, &YuvConstants, usize);
pub type RgbToYRow = unsafe fn(&[u8], &mut [u8], &PixelFormatDescriptor, usize);
pub type RgbToUvRow =
    unsafe fn(&[u8], &[u8], &mut [u8], &mut [u8], &PixelFormatDescriptor, usize);
pub type I422ToUyvyRow = unsafe fn(&[u8], &[u8], &[u8], &mut [u8], usize);
pub type UyvyToUvRow = unsafe fn(&[u8], &mut [u8], &mut [u8], usize);
/// One input and one output row, with a fixed layout on both sides
pub type MapRow = unsafe fn(&[u8], &mut [u8], usize);
pub type InterpolateRow = unsafe fn(&[u8], &[u8], &mut [u8], u32, usize);
pub type ScaleDown2Row = unsafe fn(&[u8], &[u8], &mut [u8], usize);

pub static SHUFFLE: Registry<ShuffleRow> = Registry {
    name: "shuffle",
    scalar: scalar::shuffle_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Ssse3,
            block: 4,
            kernel: sse2::shuffle_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 8,
            kernel: avx2::shuffle_row,
        },
        #[cfg(target_arch = "aarch64")]
        Candidate {
            set: InstructionSet::Neon,
            block: 4,
            kernel: neon::shuffle_row,
        },
    ],
};

pub static I422_TO_RGB: Registry<I422ToRgbRow> = Registry {
    name: "i422_to_rgb",
    scalar: scalar::i422_to_rgb_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 8,
            kernel: sse2::i422_to_rgb_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 16,
            kernel: avx2::i422_to_rgb_row,
        },
        #[cfg(target_arch = "aarch64")]
        Candidate {
            set: InstructionSet::Neon,
            block: 8,
            kernel: neon::i422_to_rgb_row,
        },
    ],
};

pub static I422_ALPHA_TO_ARGB: Registry<I422AlphaToArgbRow> = Registry {
    name: "i422_alpha_to_argb",
    scalar: scalar::i422_alpha_to_argb_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 8,
            kernel: sse2::i422_alpha_to_argb_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 16,
            kernel: avx2::i422_alpha_to_argb_row,
        },
    ],
};

pub static UYVY_TO_RGB: Registry<UyvyToRgbRow> = Registry {
    name: "uyvy_to_rgb",
    scalar: scalar::uyvy_to_rgb_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 8,
            kernel: sse2::uyvy_to_rgb_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 16,
            kernel: avx2::uyvy_to_rgb_row,
        },
    ],
};

pub static RGB_TO_Y: Registry<RgbToYRow> = Registry {
    name: "rgb_to_y",
    scalar: scalar::rgb_to_y_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 16,
            kernel: sse2::rgb_to_y_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 32,
            kernel: avx2::rgb_to_y_row,
        },
    ],
};

pub static RGB_TO_UV: Registry<RgbToUvRow> = Registry {
    name: "rgb_to_uv",
    scalar: scalar::rgb_to_uv_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 16,
            kernel: sse2::rgb_to_uv_row,
        },
    ],
};

pub static I422_TO_UYVY: Registry<I422ToUyvyRow> = Registry {
    name: "i422_to_uyvy",
    scalar: scalar::i422_to_uyvy_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 16,
            kernel: sse2::i422_to_uyvy_row,
        },
    ],
};

pub static UYVY_TO_Y: Registry<MapRow> = Registry {
    name: "uyvy_to_y",
    scalar: scalar::uyvy_to_y_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 16,
            kernel: sse2::uyvy_to_y_row,
        },
    ],
};

pub static UYVY_TO_UV: Registry<UyvyToUvRow> = Registry {
    name: "uyvy_to_uv",
    scalar: scalar::uyvy_to_uv_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 16,
            kernel: sse2::uyvy_to_uv_row,
        },
    ],
};

pub static ATTENUATE: Registry<MapRow> = Registry {
    name: "attenuate",
    scalar: scalar::attenuate_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 4,
            kernel: sse2::attenuate_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 8,
            kernel: avx2::attenuate_row,
        },
        #[cfg(target_arch = "aarch64")]
        Candidate {
            set: InstructionSet::Neon,
            block: 8,
            kernel: neon::attenuate_row,
        },
    ],
};

pub static UNATTENUATE: Registry<MapRow> = Registry {
    name: "unattenuate",
    scalar: scalar::unattenuate_row,
    accelerated: &[],
};

pub static INTERPOLATE: Registry<InterpolateRow> = Registry {
    name: "interpolate",
    scalar: scalar::interpolate_row,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 16,
            kernel: sse2::interpolate_row,
        },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Avx2,
            block: 32,
            kernel: avx2::interpolate_row,
        },
        #[cfg(target_arch = "aarch64")]
        Candidate {
            set: InstructionSet::Neon,
            block: 16,
            kernel: neon::interpolate_row,
        },
    ],
};

pub static COPY: Registry<MapRow> = Registry {
    name: "copy",
    scalar: scalar::copy_row,
    accelerated: &[],
};

pub static SCALE_DOWN2_ARGB: Registry<ScaleDown2Row> = Registry {
    name: "scale_down2_argb",
    scalar: scalar::scale_down2_row::<4>,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 4,
            kernel: sse2::scale_down2_row,
        },
    ],
};

pub static SCALE_DOWN2_LINEAR_ARGB: Registry<ScaleDown2Row> = Registry {
    name: "scale_down2_linear_argb",
    scalar: scalar::scale_down2_linear_row::<4>,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 4,
            kernel: sse2::scale_down2_linear_row,
        },
    ],
};

pub static SCALE_DOWN2_BOX_ARGB: Registry<ScaleDown2Row> = Registry {
    name: "scale_down2_box_argb",
    scalar: scalar::scale_down2_box_row::<4>,
    accelerated: &[
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Candidate {
            set: InstructionSet::Sse2,
            block: 4,
            kernel: sse2::scale_down2_box_row,
        },
    ],
};

pub static SCALE_DOWN2_PLANE: Registry<ScaleDown2Row> = Registry {
    name: "scale_down2_plane",
    scalar: scalar::scale_down2_row::<1>,
    accelerated: &[],
};

pub static SCALE_DOWN2_LINEAR_PLANE: Registry<ScaleDown2Row> = Registry {
    name: "scale_down2_linear_plane",
    scalar: scalar::scale_down2_linear_row::<1>,
    accelerated: &[],
};

pub static SCALE_DOWN2_BOX_PLANE: Registry<ScaleDown2Row> = Registry {
    name: "scale_down2_box_plane",
    scalar: scalar::scale_down2_box_row::<1>,
    accelerated: &[],
};

// Kernels are only selected for instruction sets the processor supports, which is what
// makes calling them sound.

/// One byte per pixel
pub const LUMA: Span = Span::packed(1);
/// One byte every two pixels
pub const CHROMA: Span = Span::subsampled(1);
/// U, Y, V, Y: four bytes every two pixels
pub const UYVY: Span = Span::subsampled(4);

pub fn shuffle(
    kernel: &Selected<ShuffleRow>,
    src: &[u8],
    dst: &mut [u8],
    shuffle: &PackedShuffle,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        [src],
        [Span::packed(shuffle.src_bpp)],
        [dst],
        [Span::packed(shuffle.dst_bpp)],
        |[s], [d], n| unsafe { (kernel.kernel)(s, d, shuffle, n) },
    );
}

pub fn i422_to_rgb(
    kernel: &Selected<I422ToRgbRow>,
    planes: [&[u8]; 3],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        planes,
        [LUMA, CHROMA, CHROMA],
        [dst],
        [Span::packed(layout.bytes_per_pixel)],
        |[y, u, v], [d], n| unsafe { (kernel.kernel)(y, u, v, d, layout, c, n) },
    );
}

pub fn i422_alpha_to_argb(
    kernel: &Selected<I422AlphaToArgbRow>,
    planes: [&[u8]; 4],
    dst: &mut [u8],
    c: &YuvConstants,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        planes,
        [LUMA, CHROMA, CHROMA, LUMA],
        [dst],
        [Span::packed(4)],
        |[y, u, v, a], [d], n| unsafe { (kernel.kernel)(y, u, v, a, d, c, n) },
    );
}

pub fn uyvy_to_rgb(
    kernel: &Selected<UyvyToRgbRow>,
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    c: &YuvConstants,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        [src],
        [UYVY],
        [dst],
        [Span::packed(layout.bytes_per_pixel)],
        |[s], [d], n| unsafe { (kernel.kernel)(s, d, layout, c, n) },
    );
}

pub fn rgb_to_y(
    kernel: &Selected<RgbToYRow>,
    src: &[u8],
    dst: &mut [u8],
    layout: &PixelFormatDescriptor,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        [src],
        [Span::packed(layout.bytes_per_pixel)],
        [dst],
        [LUMA],
        |[s], [d], n| unsafe { (kernel.kernel)(s, d, layout, n) },
    );
}

/// Chroma of a pair of rows, averaging 2x2 blocks
pub fn rgb_to_uv(
    kernel: &Selected<RgbToUvRow>,
    rows: [&[u8]; 2],
    dst_u: &mut [u8],
    dst_v: &mut [u8],
    layout: &PixelFormatDescriptor,
    width: usize,
) {
    let pixels = Span::packed(layout.bytes_per_pixel).replicated();
    tail::run(
        kernel.block,
        width,
        rows,
        [pixels, pixels],
        [dst_u, dst_v],
        [CHROMA, CHROMA],
        |[s0, s1], [u, v], n| unsafe { (kernel.kernel)(s0, s1, u, v, layout, n) },
    );
}

pub fn i422_to_uyvy(
    kernel: &Selected<I422ToUyvyRow>,
    planes: [&[u8]; 3],
    dst: &mut [u8],
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        planes,
        [LUMA, CHROMA, CHROMA],
        [dst],
        [UYVY],
        |[y, u, v], [d], n| unsafe { (kernel.kernel)(y, u, v, d, n) },
    );
}

pub fn uyvy_to_y(kernel: &Selected<MapRow>, src: &[u8], dst: &mut [u8], width: usize) {
    tail::run(
        kernel.block,
        width,
        [src],
        [UYVY],
        [dst],
        [LUMA],
        |[s], [d], n| unsafe { (kernel.kernel)(s, d, n) },
    );
}

pub fn uyvy_to_uv(
    kernel: &Selected<UyvyToUvRow>,
    src: &[u8],
    dst_u: &mut [u8],
    dst_v: &mut [u8],
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        [src],
        [UYVY],
        [dst_u, dst_v],
        [CHROMA, CHROMA],
        |[s], [u, v], n| unsafe { (kernel.kernel)(s, u, v, n) },
    );
}

/// Runs a kernel mapping `src_bpp` bytes per pixel to `dst_bpp` bytes per pixel
pub fn map(
    kernel: &Selected<MapRow>,
    src: &[u8],
    src_bpp: usize,
    dst: &mut [u8],
    dst_bpp: usize,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        [src],
        [Span::packed(src_bpp)],
        [dst],
        [Span::packed(dst_bpp)],
        |[s], [d], n| unsafe { (kernel.kernel)(s, d, n) },
    );
}

/// Blends two rows of `width` bytes
pub fn interpolate(
    kernel: &Selected<InterpolateRow>,
    rows: [&[u8]; 2],
    dst: &mut [u8],
    fraction: u32,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        rows,
        [LUMA, LUMA],
        [dst],
        [LUMA],
        |[s0, s1], [d], n| unsafe { (kernel.kernel)(s0, s1, d, fraction, n) },
    );
}

/// Halves a row, or a pair of rows, of pixels of `bpp` bytes
pub fn scale_down2(
    kernel: &Selected<ScaleDown2Row>,
    rows: [&[u8]; 2],
    dst: &mut [u8],
    bpp: usize,
    width: usize,
) {
    tail::run(
        kernel.block,
        width,
        rows,
        [Span::packed(2 * bpp), Span::packed(2 * bpp)],
        [dst],
        [Span::packed(bpp)],
        |[s0, s1], [d], n| unsafe { (kernel.kernel)(s0, s1, d, n) },
    );
}
