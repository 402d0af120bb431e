//! Adaptive buffer sizing and the reusable scratch buffer.
//!
//! Repeated scratch encoding (most prominently the compact string encoder)
//! wants a buffer that grows geometrically and never shrinks, so that the
//! allocation cost amortizes across calls. [`oversize`] computes the growth
//! target; [`ScratchBuffer`] owns the bytes and applies it.

use crate::error::{StreamError, StreamResult};

/// Maximum usable buffer length in elements.
///
/// Wire lengths travel as 32-bit varints, so buffers sized for them are
/// capped just below `i32::MAX` with headroom for the alignment rounding
/// in [`oversize`].
pub const MAX_BUFFER_LENGTH: usize = i32::MAX as usize - 16;

/// Computes a growth-friendly element count from a minimum required count.
///
/// Grows the request by an eighth (at least 3 elements, so tiny buffers do
/// not reallocate on every use), clamps at [`MAX_BUFFER_LENGTH`], and rounds
/// the result up so the allocation lands on an 8-byte boundary on 64-bit
/// targets (4-byte on 32-bit). Element sizes outside {1, 2, 4, 8} are
/// returned unrounded. Deterministic, no side effects.
///
/// # Errors
///
/// Returns [`StreamError::InvalidArgument`] if `min_target_size` exceeds
/// [`MAX_BUFFER_LENGTH`].
pub fn oversize(min_target_size: usize, bytes_per_element: usize) -> StreamResult<usize> {
    if min_target_size == 0 {
        // wait until at least one element is requested
        return Ok(0);
    }

    if min_target_size > MAX_BUFFER_LENGTH {
        return Err(StreamError::invalid_argument(format!(
            "requested buffer size {min_target_size} exceeds maximum length ({MAX_BUFFER_LENGTH})"
        )));
    }

    let extra = (min_target_size >> 3).max(3);

    // +7 reserves room for the worst-case alignment rounding below.
    let new_size = match min_target_size.checked_add(extra).and_then(|n| n.checked_add(7)) {
        Some(padded) if padded <= MAX_BUFFER_LENGTH => min_target_size + extra,
        _ => return Ok(MAX_BUFFER_LENGTH),
    };

    #[cfg(target_pointer_width = "64")]
    let rounded = match bytes_per_element {
        // round up to a multiple of 2
        4 => (new_size + 1) & !1,
        // round up to a multiple of 4
        2 => (new_size + 3) & !3,
        // round up to a multiple of 8
        1 => (new_size + 7) & !7,
        // 8-byte elements are already aligned; odd sizes are not rounded
        _ => new_size,
    };

    #[cfg(not(target_pointer_width = "64"))]
    let rounded = match bytes_per_element {
        2 => (new_size + 1) & !1,
        1 => (new_size + 3) & !3,
        _ => new_size,
    };

    Ok(rounded)
}

/// A reusable scratch buffer whose capacity only grows.
///
/// The buffer behaves like a fixed-size byte array between growths: its full
/// length is writable and [`ScratchBuffer::ensure_capacity`] replaces the
/// allocation wholesale with an [`oversize`]d one when it is too small.
/// Nothing is ever partially freed, so a long-lived encoder converges on a
/// steady-state allocation.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
}

impl ScratchBuffer {
    /// Creates an empty scratch buffer. No allocation until first use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows the buffer to at least `min_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidArgument`] if `min_size` exceeds
    /// [`MAX_BUFFER_LENGTH`].
    pub fn ensure_capacity(&mut self, min_size: usize) -> StreamResult<()> {
        if self.bytes.len() < min_size {
            // copying the old bytes is unnecessary for scratch use
            self.bytes = vec![0; oversize(min_size, 1)?];
        }
        Ok(())
    }

    /// Current usable length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if no capacity has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The full buffer as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// The full buffer as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_minimum_is_zero() {
        assert_eq!(oversize(0, 1).unwrap(), 0);
        assert_eq!(oversize(0, 8).unwrap(), 0);
    }

    #[test]
    fn grows_and_aligns() {
        // 100 + 100/8 = 112, already a multiple of 2 for 4-byte elements
        let grown = oversize(100, 4).unwrap();
        assert!(grown >= 100);
        assert_eq!(grown % 2, 0);
        // deterministic
        assert_eq!(grown, oversize(100, 4).unwrap());
    }

    #[test]
    fn small_requests_grow_faster() {
        // extra is floored at 3: 1 + 3 = 4, rounded to 8 for byte elements
        assert_eq!(oversize(1, 1).unwrap(), 8);
        assert_eq!(oversize(1, 8).unwrap(), 4);
    }

    #[test]
    fn eight_byte_and_odd_element_sizes_unrounded() {
        assert_eq!(oversize(9, 8).unwrap(), 9 + 3);
        assert_eq!(oversize(9, 3).unwrap(), 9 + 3);
    }

    #[test]
    fn clamps_near_maximum() {
        assert_eq!(oversize(MAX_BUFFER_LENGTH, 1).unwrap(), MAX_BUFFER_LENGTH);
        assert_eq!(oversize(MAX_BUFFER_LENGTH - 1, 8).unwrap(), MAX_BUFFER_LENGTH);
    }

    #[test]
    fn over_maximum_is_usage_error() {
        let err = oversize(MAX_BUFFER_LENGTH + 1, 1).unwrap_err();
        assert!(matches!(err, StreamError::InvalidArgument(_)));
    }

    #[test]
    fn scratch_capacity_only_grows() {
        let mut scratch = ScratchBuffer::new();
        assert!(scratch.is_empty());

        scratch.ensure_capacity(10).unwrap();
        let first = scratch.len();
        assert!(first >= 10);

        // smaller requests leave the allocation alone
        scratch.ensure_capacity(4).unwrap();
        assert_eq!(scratch.len(), first);

        scratch.ensure_capacity(first + 1).unwrap();
        assert!(scratch.len() > first);
    }
}
