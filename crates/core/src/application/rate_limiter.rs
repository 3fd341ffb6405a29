// Request throttling (token bucket)
//
// Shared by the HTTP and JSON-RPC front doors. Lock-free: the token count and
// the last refill instant are packed into one AtomicU64 and updated with CAS.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub const DEFAULT_BURST: u32 = 200;
pub const DEFAULT_RATE_PER_SEC: u32 = 100;

/// Largest burst the packed counter can hold
pub const MAX_BURST: u32 = (1 << TOKEN_BITS) - 1;

const TOKEN_BITS: u32 = 24;
const TIME_BITS: u32 = 64 - TOKEN_BITS;
// 2^40 ms is roughly 34 years of uptime
const TIME_MASK: u64 = (1 << TIME_BITS) - 1;

pub struct RateLimiter {
    /// Upper 24 bits: tokens. Lower 40 bits: millis since `origin` at last refill.
    packed: AtomicU64,
    origin: Instant,
    burst: u32,
    rate_per_sec: u32,
}

fn pack(tokens: u32, at_ms: u64) -> u64 {
    ((tokens as u64) << TIME_BITS) | (at_ms & TIME_MASK)
}

fn unpack(packed: u64) -> (u32, u64) {
    ((packed >> TIME_BITS) as u32, packed & TIME_MASK)
}

impl RateLimiter {
    /// `burst` requests may pass at once, refilled at `rate_per_sec`
    ///
    /// `burst` is capped at [`MAX_BURST`].
    pub fn new(burst: u32, rate_per_sec: u32) -> Self {
        let burst = burst.min(MAX_BURST);
        Self {
            packed: AtomicU64::new(pack(burst, 0)),
            origin: Instant::now(),
            burst,
            rate_per_sec,
        }
    }

    /// Take one token. Returns false when the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        let now_ms = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.acquire_at(now_ms)
    }

    fn acquire_at(&self, now_ms: u64) -> bool {
        let now_ms = now_ms & TIME_MASK;
        loop {
            let current = self.packed.load(Ordering::Acquire);
            let (tokens, last_ms) = unpack(current);

            let refill =
                now_ms.saturating_sub(last_ms).saturating_mul(self.rate_per_sec as u64) / 1000;
            let available = (tokens as u64).saturating_add(refill).min(self.burst as u64) as u32;

            // Keep the old timestamp when nothing was refilled so that
            // sub-token intervals accumulate across calls.
            let stamp = if refill > 0 { now_ms } else { last_ms };

            if available == 0 {
                return false;
            }

            if self
                .packed
                .compare_exchange(
                    current,
                    pack(available - 1, stamp),
                    Ordering::Release,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return true;
            }
        }
    }

    pub fn remaining(&self) -> u32 {
        unpack(self.packed.load(Ordering::Acquire)).0
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_BURST, DEFAULT_RATE_PER_SEC)
    }
}
