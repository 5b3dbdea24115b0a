//! Bit helpers for 8-bit register values.
//!
//! `index` is always 0..=7; the callers derive it from a [`Pin`](crate::Pin)
//! so it cannot be out of range.

use bit_field::BitField;

/// Returns whether bit `index` of `value` is set.
#[inline]
pub fn get_bit(value: u8, index: u8) -> bool {
    value.get_bit(usize::from(index))
}

/// Returns `value` with bit `index` set.
#[inline]
pub fn set_bit(value: u8, index: u8) -> u8 {
    write_bit(value, index, true)
}

/// Returns `value` with bit `index` cleared.
#[inline]
pub fn clear_bit(value: u8, index: u8) -> u8 {
    write_bit(value, index, false)
}

/// Returns `value` with bit `index` set to `state`.
#[inline]
pub fn write_bit(mut value: u8, index: u8, state: bool) -> u8 {
    value.set_bit(usize::from(index), state);
    value
}
