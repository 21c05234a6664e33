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
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::too_many_arguments, // API design
    clippy::missing_safety_doc, // Until we add them...
    clippy::missing_errors_doc, // Every entry point fails the same way
    clippy::similar_names, // This requires effort to ensure
    // Due to vzeroupper use, compiler does not inline intrinsics
    // but rather creates a function for each one that wraps the operation followed
    // by vzeroupper().
    // This is detrimental to performance
    clippy::inline_always,
    // Yield false positives
    clippy::must_use_candidate,
)]

//! YUV primitives is a library to convert and scale raster images.
//!
//! It is able to convert the following pixel formats:
//!
//! | Source pixel format  | Destination pixel formats               |
//! | -------------------- | --------------------------------------- |
//! | ARGB                 | ABGR, BGRA, RGBA, RGB24, RAW, I420, I422, UYVY |
//! | ABGR, BGRA, RGBA     | ARGB                                    |
//! | RGB24                | ARGB                                    |
//! | RAW                  | ARGB, RGBA                              |
//! | I422                 | ARGB, ABGR, RGBA, UYVY                  |
//! | I422 with alpha      | ARGB                                    |
//! | UYVY                 | ARGB, I422                              |
//!
//! The supported color models are:
//! * ycbcr, ITU-R Recommendation BT.601 (standard video system)
//! * ycbcr, ITU-R Recommendation BT.709 (CSC systems)
//! * ycbcr, ITU-R Recommendation BT.2020 (UHD systems)
//!
//! Both standard range and full range are supported.
//!
//! ARGB images can be premultiplied, unpremultiplied, shuffled and scaled. Single
//! byte planes can be copied and scaled.
//!
//! A negative height means the image is stored bottom-up. Strides are expressed in
//! bytes, [`STRIDE_AUTO`] meaning the rows are packed.
//!
//! # Examples
//!
//! Convert an image from i422 to argb, with Bt601 color space:
//! ```
//! use yuv_primitives as yp;
//! use yp::{i422_to_argb, STRIDE_AUTO};
//!
//! fn convert() {
//!     const WIDTH: usize = 640;
//!     const HEIGHT: usize = 480;
//!
//!     let y = vec![16u8; WIDTH * HEIGHT];
//!     let u = vec![128u8; WIDTH * HEIGHT / 2];
//!     let v = vec![128u8; WIDTH * HEIGHT / 2];
//!     let mut argb = vec![0u8; 4 * WIDTH * HEIGHT];
//!
//!     i422_to_argb(
//!         &y,
//!         STRIDE_AUTO,
//!         &u,
//!         STRIDE_AUTO,
//!         &v,
//!         STRIDE_AUTO,
//!         &mut argb,
//!         STRIDE_AUTO,
//!         WIDTH as i32,
//!         HEIGHT as i32,
//!     );
//! }
//! ```
//!
//! Handle conversion errors, choosing another color space:
//! ```
//! use yuv_primitives as yp;
//! use yp::{argb_to_i422, i422_to_argb_matrix, ColorSpace, STRIDE_AUTO};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: usize = 33;
//!     const HEIGHT: usize = 8;
//!     const CHROMA: usize = (WIDTH + 1) / 2;
//!
//!     let argb = vec![255u8; 4 * WIDTH * HEIGHT];
//!     let mut y = vec![0u8; WIDTH * HEIGHT];
//!     let mut u = vec![0u8; CHROMA * HEIGHT];
//!     let mut v = vec![0u8; CHROMA * HEIGHT];
//!
//!     argb_to_i422(
//!         &argb,
//!         STRIDE_AUTO,
//!         &mut y,
//!         STRIDE_AUTO,
//!         &mut u,
//!         STRIDE_AUTO,
//!         &mut v,
//!         STRIDE_AUTO,
//!         WIDTH as i32,
//!         HEIGHT as i32,
//!     )?;
//!
//!     let mut rgba = vec![0u8; 4 * WIDTH * HEIGHT];
//!     i422_to_argb_matrix(
//!         &y,
//!         STRIDE_AUTO,
//!         &u,
//!         STRIDE_AUTO,
//!         &v,
//!         STRIDE_AUTO,
//!         &mut rgba,
//!         STRIDE_AUTO,
//!         ColorSpace::Bt709.yuv_constants(),
//!         WIDTH as i32,
//!         -(HEIGHT as i32),
//!     )?;
//!
//!     Ok(())
//! }
//! # convert().unwrap();
//! ```
//!
//! Scale an argb image:
//! ```
//! use yuv_primitives as yp;
//! use yp::{argb_scale, FilterMode, STRIDE_AUTO};
//! use std::error;
//!
//! fn scale() -> Result<(), Box<dyn error::Error>> {
//!     let src = vec![0u8; 4 * 1920 * 1080];
//!     let mut dst = vec![0u8; 4 * 1280 * 720];
//!
//!     argb_scale(
//!         &src,
//!         STRIDE_AUTO,
//!         1920,
//!         1080,
//!         &mut dst,
//!         STRIDE_AUTO,
//!         1280,
//!         720,
//!         FilterMode::Bilinear,
//!     )?;
//!
//!     Ok(())
//! }
//! # scale().unwrap();
//! ```
mod color_space;
#[macro_use]
mod convert;
mod convert_from;
mod cpu_info;
mod dispatcher;
mod geometry;
mod pixel_format;
mod planar;
mod row;
mod scale;
mod tail;

#[doc(hidden)]
#[cfg(not(tarpaulin_include))]
#[cfg(not(feature = "test_instruction_sets"))]
pub mod c_api;

use cpu_info::{Capabilities, CpuManufacturer};
#[cfg(feature = "test_instruction_sets")]
use cpu_info::{InstructionSet, INSTRUCTION_SETS};
#[cfg(feature = "test_instruction_sets")]
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::OnceLock;

pub use color_space::{
    ColorSpace, YuvConstants, YUV_2020_CONSTANTS, YUV_F709_CONSTANTS, YUV_H709_CONSTANTS,
    YUV_I601_CONSTANTS, YUV_JPEG_CONSTANTS, YUV_V2020_CONSTANTS, YVU_2020_CONSTANTS,
    YVU_F709_CONSTANTS, YVU_H709_CONSTANTS, YVU_I601_CONSTANTS, YVU_JPEG_CONSTANTS,
    YVU_V2020_CONSTANTS,
};
pub use convert::{
    abgr_to_argb, bgra_to_argb, convert_packed, i422_alpha_to_argb_matrix, i422_to_abgr_matrix,
    i422_to_argb, i422_to_argb_matrix, i422_to_packed_matrix, i422_to_rgba_matrix, raw_to_argb,
    raw_to_rgba, rgb24_to_argb, rgba_to_argb, uyvy_to_argb_matrix,
};
pub use convert_from::{
    argb_to_abgr, argb_to_bgra, argb_to_i420, argb_to_i422, argb_to_raw, argb_to_rgb24,
    argb_to_rgba, argb_to_uyvy, i422_to_uyvy,
};
pub use pixel_format::{PixelFormat, PixelFormatDescriptor, STRIDE_AUTO};
pub use planar::{
    argb_attenuate, argb_copy, argb_shuffle, argb_unattenuate, copy_plane, uyvy_to_i422,
};
pub use scale::{argb_scale, scale_plane, FilterMode, MAX_SCALE_DIMENSION};

/// An enumeration of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(C)]
pub enum ErrorKind {
    /// One or more parameters have invalid values for the called function
    #[error("One or more parameters have not legal values for the command")]
    InvalidValue,
    /// The combination of parameters is unsupported for the called function
    #[error("The combination of parameters is not legal for the command")]
    InvalidOperation,
    /// Not enough data was provided to the called function. Typically, provided
    /// arrays are not correctly sized
    #[error("Not enough data provided")]
    NotEnoughData,
    /// Temporary memory needed by the called function could not be allocated
    #[error("Unable to allocate scratch memory")]
    OutOfMemory,
}

#[cfg(feature = "test_instruction_sets")]
static TEST_SET: AtomicI32 = AtomicI32::new(-1);

struct Context {
    manufacturer: CpuManufacturer,
    capabilities: Capabilities,
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    pub fn new() -> Self {
        let (manufacturer, capabilities) = cpu_info::get();
        log::debug!(
            "cpu manufacturer {:?}, instruction sets {:?}",
            manufacturer,
            capabilities
        );

        Context {
            manufacturer,
            capabilities,
        }
    }
}

/// Instruction sets row kernels may be selected from
pub(crate) fn capabilities() -> Capabilities {
    let capabilities = Context::global().capabilities;

    #[cfg(feature = "test_instruction_sets")]
    {
        let limit = usize::try_from(TEST_SET.load(Ordering::SeqCst))
            .ok()
            .and_then(|index| INSTRUCTION_SETS.get(index));
        if let Some(&limit) = limit {
            return capabilities.capped(limit);
        }
    }

    capabilities
}

/// Returns a description of the algorithms that are best for the running cpu and
/// available instruction sets
///
/// # Examples
/// ```
/// use yuv_primitives as yp;
/// println!("{}", yp::describe_acceleration());
/// // => {cpu-manufacturer:Intel,instruction-set:Avx2}
/// ```
pub fn describe_acceleration() -> String {
    format!(
        "{{cpu-manufacturer:{:?},instruction-set:{:?}}}",
        Context::global().manufacturer,
        capabilities().best()
    )
}

/// This is for internal use only
#[cfg(feature = "test_instruction_sets")]
pub fn initialize_with_instruction_set(instruction_set: &str) {
    let index = InstructionSet::parse(instruction_set)
        .and_then(|set| INSTRUCTION_SETS.iter().position(|&x| x == set))
        .and_then(|index| i32::try_from(index).ok())
        .unwrap_or(-1);

    TEST_SET.store(index, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_description() {
        let description = describe_acceleration();
        assert!(description.starts_with("{cpu-manufacturer:"));
        assert!(description.contains(",instruction-set:"));
        assert!(description.ends_with('}'));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ErrorKind::NotEnoughData.to_string(),
            "Not enough data provided"
        );
        assert_eq!(
            ErrorKind::OutOfMemory.to_string(),
            "Unable to allocate scratch memory"
        );
    }
}
