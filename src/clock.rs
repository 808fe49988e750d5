use std::time::Duration;

use crate::constants::{MAX_CATCH_UP, TIMER_HZ};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Work that has come due since the clock was last advanced
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Ticks {
    pub cycles: u32,
    pub timer_ticks: u32,
}

/// # Clock
/// Splits elapsed wall time into CPU cycles and 60Hz timer ticks.
///
/// The two rates are tracked separately so changing the instruction rate
/// never changes how fast the timers run. Time that doesn't add up to a
/// whole cycle or tick is carried into the next call.
#[derive(Debug, Clone)]
pub struct Clock {
    cycles_per_second: u32,
    cycle_debt: u128,
    timer_debt: u128,
}

impl Clock {
    pub fn new(cycles_per_second: u32) -> Self {
        Clock {
            cycles_per_second: cycles_per_second.max(1),
            cycle_debt: 0,
            timer_debt: 0,
        }
    }

    pub fn cycles_per_second(&self) -> u32 {
        self.cycles_per_second
    }

    /// Wall time between two CPU cycles
    pub fn cycle_period(&self) -> Duration {
        Duration::from_nanos((NANOS_PER_SECOND / u128::from(self.cycles_per_second)) as u64)
    }

    /// Account for `elapsed` wall time.
    /// Anything beyond `MAX_CATCH_UP` is dropped so a stalled host doesn't
    /// come back to a flood of queued cycles.
    pub fn advance(&mut self, elapsed: Duration) -> Ticks {
        let elapsed = elapsed.min(MAX_CATCH_UP).as_nanos();

        // debts are kept in units of nanos * rate to avoid rounding drift
        self.cycle_debt += elapsed * u128::from(self.cycles_per_second);
        self.timer_debt += elapsed * u128::from(TIMER_HZ);

        let cycles = self.cycle_debt / NANOS_PER_SECOND;
        let timer_ticks = self.timer_debt / NANOS_PER_SECOND;
        self.cycle_debt %= NANOS_PER_SECOND;
        self.timer_debt %= NANOS_PER_SECOND;

        Ticks {
            cycles: cycles as u32,
            timer_ticks: timer_ticks as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_in_steps() {
        let mut clock = Clock::new(500);
        let mut total = Ticks::default();
        for _ in 0..100 {
            let ticks = clock.advance(Duration::from_millis(10));
            total.cycles += ticks.cycles;
            total.timer_ticks += ticks.timer_ticks;
        }
        assert_eq!(total.cycles, 500);
        assert_eq!(total.timer_ticks, 60);
    }

    #[test]
    fn test_remainders_carry_over() {
        let mut clock = Clock::new(500);
        // 1ms is half a cycle and 0.06 of a timer tick
        assert_eq!(clock.advance(Duration::from_millis(1)), Ticks::default());
        assert_eq!(
            clock.advance(Duration::from_millis(1)),
            Ticks {
                cycles: 1,
                timer_ticks: 0
            }
        );
    }

    #[test]
    fn test_timer_rate_is_independent_of_cpu_rate() {
        let mut slow = Clock::new(60);
        let mut fast = Clock::new(5000);
        let slow_ticks = slow.advance(Duration::from_millis(200));
        let fast_ticks = fast.advance(Duration::from_millis(200));
        assert_eq!(slow_ticks.timer_ticks, 12);
        assert_eq!(fast_ticks.timer_ticks, 12);
        assert_eq!(slow_ticks.cycles, 12);
        assert_eq!(fast_ticks.cycles, 1000);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut clock = Clock::new(1000);
        let ticks = clock.advance(Duration::from_secs(10));
        assert_eq!(ticks.cycles, 250);
        assert_eq!(ticks.timer_ticks, 15);
    }

    #[test]
    fn test_cycle_period() {
        assert_eq!(Clock::new(500).cycle_period(), Duration::from_millis(2));
        assert_eq!(Clock::new(0).cycles_per_second(), 1);
    }
}
