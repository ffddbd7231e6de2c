// ── Cosmetic network latency ──
//
// Real USSD gateways take a moment to answer. The handset waits a fixed
// pause before applying each transition; the pause carries no protocol
// meaning, so tests swap in an implementation that returns at once.

use std::time::Duration;

use async_trait::async_trait;

/// How long a given transition pauses before it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// "0" from a result screen: straight back to the main menu.
    None,
    /// Hanging up from a result screen.
    Brief,
    /// Every ordinary menu step.
    Standard,
    /// Submitting a report or finishing registration.
    Long,
}

/// Durations for each [`Pause`] class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub brief: Duration,
    pub standard: Duration,
    pub long: Duration,
}

impl LatencyProfile {
    /// All pauses zero.
    pub const INSTANT: Self = Self {
        brief: Duration::ZERO,
        standard: Duration::ZERO,
        long: Duration::ZERO,
    };

    /// Scale the default profile so the standard pause is `standard_ms`.
    /// Oversized values saturate rather than overflow.
    pub fn scaled(standard_ms: u64) -> Self {
        let ratio = |num: u128| {
            let ms = u128::from(standard_ms) * num / 3;
            Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
        };
        Self {
            brief: ratio(2),
            standard: Duration::from_millis(standard_ms),
            long: ratio(5),
        }
    }

    pub fn duration(&self, pause: Pause) -> Duration {
        match pause {
            Pause::None => Duration::ZERO,
            Pause::Brief => self.brief,
            Pause::Standard => self.standard,
            Pause::Long => self.long,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            brief: Duration::from_millis(200),
            standard: Duration::from_millis(300),
            long: Duration::from_millis(500),
        }
    }
}

/// Something that can wait.
#[async_trait]
pub trait Latency: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLatency;

#[async_trait]
impl Latency for TokioLatency {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantLatency;

#[async_trait]
impl Latency for InstantLatency {
    async fn wait(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_gateway_timings() {
        let profile = LatencyProfile::default();
        assert_eq!(profile.duration(Pause::None), Duration::ZERO);
        assert_eq!(profile.duration(Pause::Brief), Duration::from_millis(200));
        assert_eq!(profile.duration(Pause::Standard), Duration::from_millis(300));
        assert_eq!(profile.duration(Pause::Long), Duration::from_millis(500));
    }

    #[test]
    fn scaled_profile_keeps_proportions() {
        assert_eq!(LatencyProfile::scaled(300), LatencyProfile::default());
        assert_eq!(LatencyProfile::scaled(0), LatencyProfile::INSTANT);
    }

    #[test]
    fn huge_latency_saturates() {
        let profile = LatencyProfile::scaled(u64::MAX / 2);
        assert_eq!(profile.long, Duration::from_millis(u64::MAX));
        assert!(profile.brief < profile.standard);
        assert_eq!(LatencyProfile::scaled(u64::MAX).brief, Duration::from_millis(u64::MAX / 3 * 2));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_latency_advances_the_clock() {
        let start = tokio::time::Instant::now();
        TokioLatency.wait(Duration::from_millis(300)).await;
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
