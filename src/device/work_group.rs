//! Execution context of a single work group.
//!
//! Work items of a group run in lockstep: a region passed to
//! [`WorkGroup::for_each_item`] is executed for every local id before the
//! group moves on. [`GroupBarrier`] tracks how many items have reached the
//! current program point and refuses to release until all of them have.

use super::WorkSize;

/// Identity of one work item inside a launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub global_id: usize,
    pub local_id: usize,
    pub group_id: usize,
    pub local_size: usize,
    pub global_size: usize,
}

/// All-workers-arrive gate for one group.
///
/// Every item starts at the kernel entry, so a fresh gate counts a full group.
/// Entering a region resets the count; each item that finishes the region
/// arrives. [`wait`](Self::wait) only releases a complete group.
#[derive(Debug)]
pub struct GroupBarrier {
    size: usize,
    arrived: usize,
    crossings: usize,
}

impl GroupBarrier {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            arrived: size,
            crossings: 0,
        }
    }

    fn enter_region(&mut self) {
        self.arrived = 0;
    }

    fn arrive(&mut self) {
        self.arrived += 1;
    }

    /// Release the group.
    ///
    /// # Panics
    /// Panics if some work item has not reached the barrier.
    pub fn wait(&mut self) {
        assert_eq!(
            self.arrived, self.size,
            "barrier released with {} of {} work items",
            self.arrived, self.size
        );
        self.crossings += 1;
    }

    /// Number of times the group has passed this barrier.
    pub fn crossings(&self) -> usize {
        self.crossings
    }
}

/// One work group of a launch, with its local memory.
pub struct WorkGroup<'a> {
    group_id: usize,
    work_size: WorkSize,
    local: &'a mut [u32],
    gate: GroupBarrier,
}

impl<'a> WorkGroup<'a> {
    /// `local` is the group's local memory; its contents are unspecified on entry.
    pub fn new(group_id: usize, work_size: WorkSize, local: &'a mut [u32]) -> Self {
        Self {
            group_id,
            work_size,
            local,
            gate: GroupBarrier::new(work_size.local_size()),
        }
    }

    pub fn group_id(&self) -> usize {
        self.group_id
    }

    pub fn local_size(&self) -> usize {
        self.work_size.local_size()
    }

    pub fn global_size(&self) -> usize {
        self.work_size.global_size()
    }

    /// Run one barrier-free region for every work item of the group.
    pub fn for_each_item<F>(&mut self, mut region: F)
    where
        F: FnMut(WorkItem, &mut [u32]),
    {
        let local_size = self.local_size();
        let base = self.group_id * local_size;
        self.gate.enter_region();
        for local_id in 0..local_size {
            let item = WorkItem {
                global_id: base + local_id,
                local_id,
                group_id: self.group_id,
                local_size,
                global_size: self.global_size(),
            };
            region(item, &mut *self.local);
            self.gate.arrive();
        }
    }

    /// Synchronise all work items of the group.
    pub fn barrier(&mut self) {
        self.gate.wait();
    }

    pub fn barriers_crossed(&self) -> usize {
        self.gate.crossings()
    }

    pub fn local_mem(&self) -> &[u32] {
        self.local
    }
}
