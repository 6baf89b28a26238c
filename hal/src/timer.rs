//! # Timer Device
//!
//! Hardware abstraction for monotonic time measurement.
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! This trait provides access to a monotonic millisecond counter. It does NOT:
//! - Provide wall-clock time
//! - Block or sleep (polling only)
//! - Have implicit side effects
//!
//! Every timing rule of the composer (multi-tap window, long press,
//! repeat rates, cursor blink) compares against values read from here,
//! so tests can substitute a fake clock and run without delays.

/// Monotonic millisecond clock
///
/// # Implementation Notes
///
/// - Must be monotonic (never return a smaller value)
/// - Must not block
pub trait TimerDevice {
    /// Returns milliseconds elapsed since boot
    fn now_ms(&mut self) -> u64;
}
