//! Execution context and the collective operations the solve loop relies on.
//!
//! Partitioning and message passing belong to whichever distributed layer
//! hosts the run. This module only fixes the contract: every worker calls
//! the collectives in lock-step, and exactly one worker is the leader.

/// Position of this worker among the cooperating workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    pub rank: usize,
    pub size: usize,
}

impl ExecutionContext {
    /// A single-worker run.
    pub const SERIAL: ExecutionContext = ExecutionContext { rank: 0, size: 1 };

    /// The leader is the only worker allowed console and file output.
    pub fn is_leader(&self) -> bool {
        self.rank == 0
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::SERIAL
    }
}

/// Collective operations over all workers.
pub trait Communicator: Send + Sync {
    fn context(&self) -> ExecutionContext;

    /// Sum `local` over all workers; every worker receives the total.
    fn all_reduce_sum(&self, local: f64) -> f64;

    /// Sum each entry of `values` over all workers, in place.
    fn all_reduce_sum_slice(&self, values: &mut [f64]) {
        for v in values.iter_mut() {
            *v = self.all_reduce_sum(*v);
        }
    }

    fn is_leader(&self) -> bool {
        self.context().is_leader()
    }
}

/// Communicator for a run on one worker.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialCommunicator;

impl Communicator for SerialCommunicator {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::SERIAL
    }

    fn all_reduce_sum(&self, local: f64) -> f64 {
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_is_leader_and_reduce_is_identity() {
        let comm = SerialCommunicator;
        assert!(comm.is_leader());
        assert_eq!(comm.all_reduce_sum(2.5), 2.5);

        let mut v = [1.0, 2.0];
        comm.all_reduce_sum_slice(&mut v);
        assert_eq!(v, [1.0, 2.0]);
    }

    #[test]
    fn only_rank_zero_leads() {
        assert!(ExecutionContext { rank: 0, size: 4 }.is_leader());
        assert!(!ExecutionContext { rank: 3, size: 4 }.is_leader());
    }
}
