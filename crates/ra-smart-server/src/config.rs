//! Per-listener configuration.

/// Capacity knobs for one listener.
///
/// The two limits are independent: `pool_capacity` bounds how many
/// keep-alive connections are retained, `worker_limit` bounds how many
/// handler invocations run at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Maximum retained connections (idle or active).
    pub pool_capacity: usize,
    /// Maximum concurrent handler invocations.
    pub worker_limit: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 1000,
            worker_limit: 50,
        }
    }
}

impl ListenerConfig {
    /// Config with explicit limits.
    pub fn new(pool_capacity: usize, worker_limit: usize) -> Self {
        Self {
            pool_capacity,
            worker_limit,
        }
    }

    /// Small limits for tests.
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            pool_capacity: 4,
            worker_limit: 2,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.worker_limit == 0 {
            return Err("worker_limit must be at least 1");
        }
        Ok(())
    }
}
