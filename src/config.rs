/// Timing parameters for every poll loop in the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wall-clock budget for one read or write, in microseconds.
    pub budget_us: u64,
    /// Pause between two failed polls.
    pub stall_us: u64,
    /// TSC frequency. When unknown, time is measured by counting stalls on port 0x80.
    pub tsc_mhz: Option<u64>,
}

impl PollConfig {
    /// 12000 polls of 1us each; the controller settles well below this.
    pub const DEFAULT: PollConfig = PollConfig {
        budget_us: 12_000,
        stall_us: 1,
        tsc_mhz: None,
    };

    pub fn with_tsc_mhz(mut self, mhz: u64) -> PollConfig {
        self.tsc_mhz = Some(mhz);
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig::DEFAULT
    }
}
