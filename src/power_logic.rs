/// Deadline `period_ms` after `now_ms`, saturating at the end of time.
pub fn deadline_after(now_ms: u64, period_ms: u64) -> u64 {
    now_ms.saturating_add(period_ms)
}

/// Decide whether an armed idle timer has fired.
pub fn timer_expired(deadline_ms: Option<u64>, now_ms: u64) -> bool {
    match deadline_ms {
        Some(deadline) => now_ms >= deadline,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_timer_never_fires() {
        assert!(!timer_expired(None, 0));
        assert!(!timer_expired(None, u64::MAX));
    }

    #[test]
    fn fires_at_deadline() {
        let deadline = deadline_after(1_000, 60_000);
        assert!(!timer_expired(Some(deadline), 60_999));
        assert!(timer_expired(Some(deadline), 61_000));
        assert!(timer_expired(Some(deadline), 70_000));
    }

    #[test]
    fn deadline_saturates() {
        assert_eq!(deadline_after(u64::MAX - 5, 60_000), u64::MAX);
    }
}
