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
use crate::cpu_info::{Capabilities, InstructionSet};

/// A vector kernel together with the instruction set it needs and the number of pixels
/// it processes at once.
pub struct Candidate<F: 'static> {
    pub set: InstructionSet,
    pub block: usize,
    pub kernel: F,
}

/// All kernels implementing one row operation.
///
/// The scalar kernel accepts any width and is the reference for the other ones.
pub struct Registry<F: 'static> {
    pub name: &'static str,
    pub scalar: F,
    pub accelerated: &'static [Candidate<F>],
}

#[derive(Clone, Copy)]
pub struct Selected<F> {
    pub set: InstructionSet,
    pub block: usize,
    pub kernel: F,
}

impl<F: Copy> Registry<F> {
    /// Picks the widest kernel the processor can run, or the scalar one.
    pub fn select(&self, capabilities: Capabilities, width: usize) -> Selected<F> {
        let selected = self
            .accelerated
            .iter()
            .filter(|candidate| capabilities.contains(candidate.set))
            .max_by_key(|candidate| candidate.block)
            .map_or(
                Selected {
                    set: InstructionSet::X86,
                    block: 1,
                    kernel: self.scalar,
                },
                |candidate| Selected {
                    set: candidate.set,
                    block: candidate.block,
                    kernel: candidate.kernel,
                },
            );

        log::trace!(
            "{}: {:?} kernel, {} pixels per block, tail {}",
            self.name,
            selected.set,
            selected.block,
            width % selected.block != 0
        );

        selected
    }

    /// Every kernel runnable with `capabilities`, scalar first.
    #[cfg(test)]
    pub fn available(&self, capabilities: Capabilities) -> Vec<Selected<F>> {
        let mut kernels = vec![Selected {
            set: InstructionSet::X86,
            block: 1,
            kernel: self.scalar,
        }];

        kernels.extend(
            self.accelerated
                .iter()
                .filter(|candidate| capabilities.contains(candidate.set))
                .map(|candidate| Selected {
                    set: candidate.set,
                    block: candidate.block,
                    kernel: candidate.kernel,
                }),
        );

        kernels
    }
}
