//! Time provider abstraction
//!
//! Publishing stamps a list with `published_date`, creation stamps `created_date`,
//! and every community aggregation pass stamps `updated_date`. All of them read
//! time through the [`Clock`] trait so tests can pin timestamps.
//!
//! # Example
//!
//! ```
//! use topfive::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.now();
//! assert!(now.timestamp() > 0);
//! ```

use std::fmt::Debug;

use chrono::{DateTime, TimeZone, Utc};

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A time provider for list timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> i64;

    /// Returns the current time as a UTC timestamp.
    ///
    /// Out-of-range millisecond values collapse to the Unix epoch.
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_millis())
            .single()
            .unwrap_or_default()
    }
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock with auto-advancing time.
///
/// Every `now_millis()` call returns the current value and then advances it by
/// one millisecond, so consecutive publishes get strictly increasing dates.
/// Use `hold()` to freeze the clock, e.g. to compare two aggregation passes.
///
/// # Example
///
/// ```
/// use topfive::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1000);
/// let t1 = clock.now_millis();
/// let t2 = clock.now_millis();
/// assert!(t2 > t1);
///
/// {
///     let _hold = clock.hold();
///     assert_eq!(clock.now(), clock.now());
/// }
/// ```
#[cfg(any(test, feature = "testing"))]
pub struct FixedClock {
    state: Mutex<FixedClockState>,
}

#[cfg(any(test, feature = "testing"))]
struct FixedClockState {
    millis: i64,
    held: bool,
}

/// RAII guard that freezes a [`FixedClock`] while held.
#[cfg(any(test, feature = "testing"))]
pub struct ClockHold<'a>(&'a FixedClock);

#[cfg(any(test, feature = "testing"))]
impl Drop for ClockHold<'_> {
    fn drop(&mut self) {
        self.0.state.lock().unwrap().held = false;
    }
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Create a new fixed clock with the given initial time in milliseconds.
    pub fn new(millis: i64) -> Self {
        Self {
            state: Mutex::new(FixedClockState {
                millis,
                held: false,
            }),
        }
    }

    /// Hold the clock, preventing auto-advance until the guard is dropped.
    pub fn hold(&self) -> ClockHold<'_> {
        self.state.lock().unwrap().held = true;
        ClockHold(self)
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: i64) {
        self.state.lock().unwrap().millis += ms;
    }

    /// Get the current time without advancing.
    pub fn get(&self) -> i64 {
        self.state.lock().unwrap().millis
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        let mut state = self.state.lock().unwrap();
        if state.held {
            state.millis
        } else {
            let t = state.millis;
            state.millis += 1;
            t
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("FixedClock")
            .field("millis", &state.millis)
            .field("held", &state.held)
            .finish()
    }
}
