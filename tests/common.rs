#![allow(dead_code)]

use rand::Rng;

pub const WIDTHS: [i32; 6] = [1, 3, 16, 17, 64, 65];
pub const HEIGHTS: [i32; 3] = [1, 2, 17];

/// BT.601 limited range coefficients: ub, ug, vg, vr, yg, yb
pub const I601: [i32; 6] = [128, 25, 52, 102, 18997, -1160];

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Blue, green and red of one ycbcr triple
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn yuv_to_bgr(y: u8, u: u8, v: u8, c: &[i32; 6]) -> [u8; 3] {
    let [ub, ug, vg, vr, yg, yb] = *c;
    let y1 = ((u32::from(y) * 0x0101 * yg as u32) >> 16) as i32 + yb;
    let u = i32::from(u) - 128;
    let v = i32::from(v) - 128;

    [
        clamp((y1 + u * ub) >> 6),
        clamp((y1 - (u * ug + v * vg)) >> 6),
        clamp((y1 + v * vr) >> 6),
    ]
}

pub fn bgr_to_y(b: u8, g: u8, r: u8) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    clamp((66 * r + 129 * g + 25 * b + 0x1080) >> 8)
}

pub fn bgr_to_uv(b: u8, g: u8, r: u8) -> (u8, u8) {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    (
        clamp((112 * b - 74 * g - 38 * r + 0x8000) >> 8),
        clamp((112 * r - 94 * g - 18 * b + 0x8000) >> 8),
    )
}

pub fn close(a: u8, b: u8, tolerance: u8) -> bool {
    a.abs_diff(b) <= tolerance
}

/// Rows of `row` bytes taken from a buffer with the given stride
pub fn rows(buffer: &[u8], stride: usize, row: usize, height: usize) -> Vec<&[u8]> {
    (0..height)
        .map(|y| &buffer[y * stride..y * stride + row])
        .collect()
}

#[allow(clippy::cast_sign_loss)]
pub fn dims(width: i32, height: i32) -> (usize, usize) {
    (width as usize, height.unsigned_abs() as usize)
}

/// Copy of a packed buffer with its rows in reverse order
pub fn reversed(buffer: &[u8], height: usize) -> Vec<u8> {
    let row = buffer.len() / height;
    buffer.chunks_exact(row).rev().flatten().copied().collect()
}
