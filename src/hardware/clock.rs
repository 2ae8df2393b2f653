use core::arch::x86_64::_rdtsc;
use x86_64::instructions::port::Port;

use crate::config::PollConfig;

/// POST diagnostic port; a write to it takes roughly one microsecond on ISA timing.
const IO_DELAY_PORT: u16 = 0x80;

/// Monotonic microsecond time source used to bound every poll loop.
pub trait Clock {
    fn now_us(&mut self) -> u64;

    /// Busy-waits for about `us` microseconds. Never sleeps.
    fn stall_us(&mut self, us: u64);
}

/// Point in time after which a poll loop gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at_us: u64,
}

impl Deadline {
    pub fn after<C: Clock>(clock: &mut C, budget_us: u64) -> Deadline {
        Deadline {
            expires_at_us: clock.now_us().saturating_add(budget_us),
        }
    }

    pub fn expired<C: Clock>(&self, clock: &mut C) -> bool {
        clock.now_us() >= self.expires_at_us
    }

    /// True when a stall of `us` would reach the deadline, so no attempt
    /// after it would fit in the window.
    pub fn expires_within<C: Clock>(&self, clock: &mut C, us: u64) -> bool {
        clock.now_us().saturating_add(us) >= self.expires_at_us
    }
}

/// Time stamp counter scaled by a known frequency.
pub struct TscClock {
    ticks_per_us: u64,
}

impl TscClock {
    pub fn new(tsc_mhz: u64) -> TscClock {
        TscClock {
            ticks_per_us: tsc_mhz.max(1),
        }
    }

    fn ticks(&self) -> u64 {
        unsafe { _rdtsc() }
    }
}

impl Clock for TscClock {
    fn now_us(&mut self) -> u64 {
        self.ticks() / self.ticks_per_us
    }

    fn stall_us(&mut self, us: u64) {
        let until = self.ticks().saturating_add(us.saturating_mul(self.ticks_per_us));
        while self.ticks() < until {
            core::hint::spin_loop();
        }
    }
}

/// Fallback when the TSC frequency is unknown: time only advances by stalling,
/// and each stalled microsecond is one write to the POST port.
pub struct PortDelayClock {
    delay_port: Port<u8>,
    elapsed_us: u64,
}

impl PortDelayClock {
    pub fn new() -> PortDelayClock {
        PortDelayClock {
            delay_port: Port::new(IO_DELAY_PORT),
            elapsed_us: 0,
        }
    }
}

impl Default for PortDelayClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PortDelayClock {
    fn now_us(&mut self) -> u64 {
        self.elapsed_us
    }

    fn stall_us(&mut self, us: u64) {
        for _ in 0..us {
            unsafe { self.delay_port.write(0u8) };
        }
        self.elapsed_us = self.elapsed_us.saturating_add(us);
    }
}

/// Clock selected from a [`PollConfig`].
pub enum SystemClock {
    Tsc(TscClock),
    PortDelay(PortDelayClock),
}

impl SystemClock {
    pub fn from_config(config: &PollConfig) -> SystemClock {
        match config.tsc_mhz {
            Some(mhz) => SystemClock::Tsc(TscClock::new(mhz)),
            None => SystemClock::PortDelay(PortDelayClock::new()),
        }
    }
}

impl Clock for SystemClock {
    fn now_us(&mut self) -> u64 {
        match self {
            SystemClock::Tsc(clock) => clock.now_us(),
            SystemClock::PortDelay(clock) => clock.now_us(),
        }
    }

    fn stall_us(&mut self, us: u64) {
        match self {
            SystemClock::Tsc(clock) => clock.stall_us(us),
            SystemClock::PortDelay(clock) => clock.stall_us(us),
        }
    }
}
