//! Bit packing helpers for the DNS header flags word.
//!
//! Fields are appended most-significant first: each `pack_bits` call shifts
//! the accumulator left by `width` and places `value` in the freed low bits.
//! `unpack_bits` is the inverse and therefore peels fields off from the
//! least-significant end, in reverse packing order.

/// Shifts `acc` left by `width` bits and stores the low `width` bits of `value`.
#[inline]
pub fn pack_bits(acc: u16, width: u32, value: u16) -> u16 {
    (acc << width) | (value & mask(width))
}

/// Returns `(low width bits of acc, acc shifted right by width)`.
#[inline]
pub fn unpack_bits(acc: u16, width: u32) -> (u16, u16) {
    (acc & mask(width), acc >> width)
}

#[inline]
fn mask(width: u32) -> u16 {
    debug_assert!(width > 0 && width < 16);
    (1u16 << width) - 1
}
