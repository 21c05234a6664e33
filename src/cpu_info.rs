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
#[cfg(target_arch = "x86")]
use core::arch::x86::__cpuid;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::__cpuid;

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuManufacturer {
    Unknown,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Intel,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Amd,
}

/// Instruction set a row kernel is written for.
///
/// `X86` names the portable scalar kernels and is always available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionSet {
    X86,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Ssse3,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,
    #[cfg(target_arch = "aarch64")]
    Neon,
}

/// Instruction sets in ascending order of preference
pub const INSTRUCTION_SETS: &[InstructionSet] = &[
    InstructionSet::X86,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    InstructionSet::Sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    InstructionSet::Ssse3,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    InstructionSet::Avx2,
    #[cfg(target_arch = "aarch64")]
    InstructionSet::Neon,
];

impl InstructionSet {
    const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    pub fn parse(name: &str) -> Option<InstructionSet> {
        INSTRUCTION_SETS
            .iter()
            .copied()
            .find(|set| format!("{set:?}").eq_ignore_ascii_case(name))
    }
}

/// Set of instruction sets usable on the running processor.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Capabilities(u32);

impl Capabilities {
    pub const fn scalar() -> Self {
        Capabilities(InstructionSet::X86.bit())
    }

    #[must_use]
    pub const fn with(self, set: InstructionSet) -> Self {
        Capabilities(self.0 | set.bit())
    }

    pub const fn contains(self, set: InstructionSet) -> bool {
        (self.0 & set.bit()) != 0
    }

    /// Drops every instruction set preferred over `limit`
    #[must_use]
    pub fn capped(self, limit: InstructionSet) -> Self {
        let mut capped = Capabilities::scalar();
        for &set in INSTRUCTION_SETS {
            if self.contains(set) {
                capped = capped.with(set);
            }

            if set == limit {
                break;
            }
        }

        capped
    }

    pub fn best(self) -> InstructionSet {
        INSTRUCTION_SETS
            .iter()
            .rev()
            .copied()
            .find(|&set| self.contains(set))
            .unwrap_or(InstructionSet::X86)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(INSTRUCTION_SETS.iter().filter(|&&set| self.contains(set)))
            .finish()
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const fn four_cc(a: u8, b: u8, c: u8, d: u8) -> u32 {
    ((d as u32) << 24) | ((c as u32) << 16) | ((b as u32) << 8) | (a as u32)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn cpuid(functionnumber: u32, output: &mut [u32; 4]) {
    #[allow(unused_unsafe)]
    let result = unsafe { __cpuid(functionnumber) };
    output[0] = result.eax;
    output[1] = result.ebx;
    output[2] = result.ecx;
    output[3] = result.edx;
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn compare_cpu_manufacturer(features: &[u32; 4], name: &[u8; 12]) -> u32 {
    features[1].wrapping_sub(four_cc(name[0], name[1], name[2], name[3]))
        | features[3].wrapping_sub(four_cc(name[4], name[5], name[6], name[7]))
        | features[2].wrapping_sub(four_cc(name[8], name[9], name[10], name[11]))
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn get() -> (CpuManufacturer, Capabilities) {
    let mut manufacturer = CpuManufacturer::Unknown;
    let mut capabilities = Capabilities::scalar();

    let features = &mut [0; 4];
    cpuid(0, features);
    if features[0] == 0 {
        return (manufacturer, capabilities);
    }

    if compare_cpu_manufacturer(features, b"GenuineIntel") == 0 {
        manufacturer = CpuManufacturer::Intel;
    } else if (compare_cpu_manufacturer(features, b"AuthenticAMD") == 0)
        | (compare_cpu_manufacturer(features, b"AMDisbetter!") == 0)
    {
        manufacturer = CpuManufacturer::Amd;
    }

    // The std detection also checks the OS saves the extended register state
    if is_x86_feature_detected!("sse2") {
        capabilities = capabilities.with(InstructionSet::Sse2);

        if is_x86_feature_detected!("ssse3") {
            capabilities = capabilities.with(InstructionSet::Ssse3);

            if is_x86_feature_detected!("avx2") {
                capabilities = capabilities.with(InstructionSet::Avx2);
            }
        }
    }

    (manufacturer, capabilities)
}

#[cfg(target_arch = "aarch64")]
pub fn get() -> (CpuManufacturer, Capabilities) {
    let mut capabilities = Capabilities::scalar();
    if std::arch::is_aarch64_feature_detected!("neon") {
        capabilities = capabilities.with(InstructionSet::Neon);
    }

    (CpuManufacturer::Unknown, capabilities)
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub fn get() -> (CpuManufacturer, Capabilities) {
    (CpuManufacturer::Unknown, Capabilities::scalar())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_always_available() {
        let (_, capabilities) = get();
        assert!(capabilities.contains(InstructionSet::X86));
        assert!(Capabilities::scalar().contains(InstructionSet::X86));
        assert_eq!(Capabilities::scalar().best(), InstructionSet::X86);
    }

    #[test]
    fn capping_keeps_lower_sets() {
        let (_, capabilities) = get();
        let capped = capabilities.capped(InstructionSet::X86);
        assert_eq!(capped, Capabilities::scalar());

        for &set in INSTRUCTION_SETS {
            let capped = capabilities.capped(set);
            assert!(capped.contains(InstructionSet::X86));
            if capabilities.contains(set) {
                assert_eq!(capped.best(), set);
            }
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!(InstructionSet::parse("x86"), Some(InstructionSet::X86));
        assert_eq!(InstructionSet::parse("mmx"), None);
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            assert_eq!(InstructionSet::parse("sse2"), Some(InstructionSet::Sse2));
            assert_eq!(InstructionSet::parse("AVX2"), Some(InstructionSet::Avx2));
        }
    }
}
