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
/// Bytes of one scratch block, large enough for the widest kernel of any slot
pub const BLOCK_BYTES: usize = 256;

/// Layout of one plane inside a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// Bytes of one sample group
    pub bpp: usize,
    /// Horizontal subsampling, as a power of two
    pub shift: u32,
    /// Repeat the last sample group when the width is odd
    pub replicate: bool,
}

impl Span {
    pub const fn packed(bpp: usize) -> Self {
        Span {
            bpp,
            shift: 0,
            replicate: false,
        }
    }

    /// One group of `bpp` bytes every two pixels
    pub const fn subsampled(bpp: usize) -> Self {
        Span {
            bpp,
            shift: 1,
            replicate: false,
        }
    }

    #[must_use]
    pub const fn replicated(self) -> Self {
        Span {
            replicate: true,
            ..self
        }
    }

    /// Bytes covered by `width` pixels
    pub const fn bytes(&self, width: usize) -> usize {
        ((width + (1 << self.shift) - 1) >> self.shift) * self.bpp
    }

    /// Byte offset of pixel `n`
    pub const fn offset(&self, n: usize) -> usize {
        (n >> self.shift) * self.bpp
    }
}

/// Runs `kernel`, which only accepts multiples of `block` pixels, over `width` pixels.
///
/// The bulk is handed to the kernel in place. The remaining pixels are copied into
/// zeroed blocks, processed as a whole block, and only the bytes that belong to the row
/// are copied back.
#[allow(clippy::needless_range_loop)]
pub fn run<const I: usize, const O: usize, K>(
    block: usize,
    width: usize,
    inputs: [&[u8]; I],
    input_spans: [Span; I],
    mut outputs: [&mut [u8]; O],
    output_spans: [Span; O],
    mut kernel: K,
) where
    K: FnMut([&[u8]; I], [&mut [u8]; O], usize),
{
    debug_assert!(block > 0);
    let remainder = width % block;
    let bulk = width - remainder;

    if bulk > 0 {
        let mut i = 0;
        let bulk_inputs = inputs.map(|input| {
            let bytes = input_spans[i].bytes(bulk);
            i += 1;
            &input[..bytes]
        });

        let mut o = 0;
        let bulk_outputs = outputs.each_mut().map(|output| {
            let bytes = output_spans[o].bytes(bulk);
            o += 1;
            &mut output[..bytes]
        });

        kernel(bulk_inputs, bulk_outputs, bulk);
    }

    if remainder == 0 {
        return;
    }

    let mut scratch_inputs = [[0_u8; BLOCK_BYTES]; I];
    for i in 0..I {
        let span = input_spans[i];
        debug_assert!(span.bytes(block) <= BLOCK_BYTES);
        let offset = span.offset(bulk);
        let bytes = span.bytes(remainder);
        scratch_inputs[i][..bytes].copy_from_slice(&inputs[i][offset..offset + bytes]);
        if span.replicate && width % 2 == 1 {
            scratch_inputs[i].copy_within(bytes - span.bpp..bytes, bytes);
        }
    }

    let mut scratch_outputs = [[0_u8; BLOCK_BYTES]; O];
    {
        let block_inputs = scratch_inputs.each_ref().map(|input| &input[..]);
        let block_outputs = scratch_outputs.each_mut().map(|output| &mut output[..]);
        kernel(block_inputs, block_outputs, block);
    }

    for o in 0..O {
        let span = output_spans[o];
        let offset = span.offset(bulk);
        let bytes = span.bytes(remainder);
        outputs[o][offset..offset + bytes].copy_from_slice(&scratch_outputs[o][..bytes]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_sizes() {
        assert_eq!(Span::packed(4).bytes(5), 20);
        assert_eq!(Span::subsampled(1).bytes(5), 3);
        assert_eq!(Span::subsampled(4).bytes(6), 12);
        assert_eq!(Span::subsampled(4).offset(6), 12);
        assert_eq!(Span::packed(3).offset(7), 21);
    }

    // Doubles each byte, but only knows how to work on multiples of 8 bytes
    fn double_by_eight(inputs: [&[u8]; 1], outputs: [&mut [u8]; 1], width: usize) {
        assert_eq!(width % 8, 0);
        let [output] = outputs;
        for (d, &s) in output.iter_mut().zip(inputs[0]).take(width) {
            *d = s.wrapping_mul(2);
        }
    }

    #[test]
    fn remainder_goes_through_scratch() {
        for width in 1..40 {
            let src: Vec<u8> = (0..width).map(|x| x as u8).collect();
            let mut dst = vec![0xee_u8; width + 1];
            let (row, guard) = dst.split_at_mut(width);
            run(
                8,
                width,
                [&src[..]],
                [Span::packed(1)],
                [row],
                [Span::packed(1)],
                |i, o, w| double_by_eight(i, o, w),
            );

            assert_eq!(guard, &[0xee]);
            for (x, &value) in dst[..width].iter().enumerate() {
                assert_eq!(value, (x * 2) as u8);
            }
        }
    }

    #[test]
    fn odd_width_replicates_last_group() {
        let row0 = [1_u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let mut seen = Vec::new();
        let mut out = [0_u8; 2];
        run(
            4,
            3,
            [&row0[..]],
            [Span::packed(4).replicated()],
            [&mut out[..]],
            [Span::subsampled(1)],
            |[input], _, w| {
                assert_eq!(w, 4);
                seen.extend_from_slice(&input[..16]);
            },
        );

        assert_eq!(&seen[..12], &row0[..]);
        assert_eq!(&seen[12..], &row0[8..]);
    }
}
