//! Per-user minimum-interval admission control.
//!
//! The [`ThrottleGate`] decides whether an update from a given user may
//! proceed into the router. Admission is an explicit sum type
//! ([`Admission`]) rather than an error: a drop is normal control flow.
//!
//! The gate keeps one last-admitted timestamp per user. The map grows with
//! the number of distinct users seen over the process lifetime; callers that
//! run for long may periodically call [`ThrottleGate::evict_idle`] to sweep
//! entries for users that went quiet.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::update::UserId;

/// Default minimum interval between admitted updates per user.
pub const DEFAULT_RATE: Duration = Duration::from_millis(500);

/// The result of asking the gate about one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The update may proceed; the user's clock has been advanced.
    Admitted,
    /// The update arrived inside the rate window and must be dropped.
    Dropped {
        /// How long since the user's last *admitted* update.
        since_last: Duration,
    },
}

impl Admission {
    /// Returns `true` for [`Admission::Admitted`].
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Per-user minimum-interval gate over a shared timestamp map.
///
/// The map is guarded by a mutex so that two near-simultaneous updates from
/// the same user cannot both be admitted inside one rate window: the
/// check-then-update is a single critical section.
///
/// Rejections never touch the stored timestamp. A user hammering the bot
/// keeps measuring against their last *admitted* update, so the gate opens
/// again after `rate` regardless of how many attempts were dropped in
/// between; updating on every attempt would let rapid-fire messages push
/// the window forever.
pub struct ThrottleGate {
    rate: Duration,
    last_admitted: Mutex<HashMap<UserId, Instant>>,
}

impl ThrottleGate {
    /// Creates a gate with the given minimum interval.
    pub fn new(rate: Duration) -> Self {
        Self {
            rate,
            last_admitted: Mutex::new(HashMap::new()),
        }
    }

    /// The configured minimum interval.
    pub fn rate(&self) -> Duration {
        self.rate
    }

    /// Decides admission for `user` at the instant `now`.
    ///
    /// Admits when the user has no prior record or at least `rate` has
    /// passed since their last admitted update. Stored timestamps only move
    /// forward, never back.
    pub fn admit(&self, user: UserId, now: Instant) -> Admission {
        let mut map = self.last_admitted.lock();
        match map.get_mut(&user) {
            Some(last) => {
                let since_last = now.duration_since(*last);
                if since_last < self.rate {
                    return Admission::Dropped { since_last };
                }
                if now > *last {
                    *last = now;
                }
                Admission::Admitted
            }
            None => {
                map.insert(user, now);
                Admission::Admitted
            }
        }
    }

    /// Decides admission for `user` against the current monotonic clock.
    pub fn admit_now(&self, user: UserId) -> Admission {
        self.admit(user, Instant::now())
    }

    /// Removes entries for users whose last admitted update is older than
    /// `idle_for` as of `now`. Returns the number of entries removed.
    pub fn evict_idle(&self, idle_for: Duration, now: Instant) -> usize {
        let mut map = self.last_admitted.lock();
        let before = map.len();
        map.retain(|_, last| now.duration_since(*last) < idle_for);
        before - map.len()
    }

    /// Number of users currently tracked.
    pub fn tracked_users(&self) -> usize {
        self.last_admitted.lock().len()
    }
}

impl std::fmt::Debug for ThrottleGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottleGate")
            .field("rate", &self.rate)
            .field("tracked_users", &self.tracked_users())
            .finish()
    }
}
