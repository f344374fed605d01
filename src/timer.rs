// ============================================
// src/timer.rs
// キャンセルできる一回限りのタイマー
// ============================================

use std::time::{Duration, Instant};

/// イベントループからポーリングされる遅延実行。
/// 持ち主 (セッション) ごと破棄されれば二度と発火しない。
#[derive(Debug, Clone, Default)]
pub struct Timer {
    due: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `now + delay` に発火を予約する (既存の予約は上書き)
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.due = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// 期限を過ぎていれば予約を消費して true を返す
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_the_delay() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_secs(1));

        assert!(!timer.fire_if_due(t0 + Duration::from_millis(999)));
        assert!(timer.fire_if_due(t0 + Duration::from_secs(1)));
        assert!(!timer.fire_if_due(t0 + Duration::from_secs(5)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_secs(1));
        timer.cancel();
        assert!(!timer.fire_if_due(t0 + Duration::from_secs(2)));
    }
}
