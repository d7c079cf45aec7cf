//! Pinning the measuring thread to one core while timing single-threaded
//! strategies.
//!
//! Only Linux pins for real (through `sched_setaffinity`). Elsewhere the guard
//! is inert and reports itself as unpinned, so the harness behaves the same
//! apart from scheduler noise.

use tracing::debug;

#[cfg(target_os = "linux")]
mod platform {
    use std::mem;

    /// The affinity mask a thread had before it was pinned.
    pub struct SavedMask(libc::cpu_set_t);

    pub fn online_cores() -> Option<usize> {
        // SAFETY: sysconf has no memory-safety preconditions.
        let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        (n > 0).then_some(n as usize)
    }

    pub fn current_core() -> Option<usize> {
        // SAFETY: sched_getcpu only reads the calling thread's state.
        let cpu = unsafe { libc::sched_getcpu() };
        (cpu >= 0).then_some(cpu as usize)
    }

    /// Pin the calling thread to `core`, returning the mask to restore later.
    pub fn pin(core: usize) -> Option<SavedMask> {
        // SAFETY: cpu_set_t is plain data; both calls get a pointer to a
        // properly sized set and operate on the calling thread (pid 0).
        unsafe {
            let mut saved: libc::cpu_set_t = mem::zeroed();
            if libc::sched_getaffinity(0, mem::size_of::<libc::cpu_set_t>(), &mut saved) != 0 {
                return None;
            }
            let mut set: libc::cpu_set_t = mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core, &mut set);
            if libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
                return None;
            }
            Some(SavedMask(saved))
        }
    }

    pub fn restore(saved: &SavedMask) -> bool {
        // SAFETY: see `pin`.
        unsafe { libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &saved.0) == 0 }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub struct SavedMask;

    pub fn online_cores() -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }

    pub fn current_core() -> Option<usize> {
        None
    }

    pub fn pin(_core: usize) -> Option<SavedMask> {
        None
    }

    pub fn restore(_saved: &SavedMask) -> bool {
        true
    }
}

/// Number of online cores, when the platform can tell.
pub fn online_cores() -> Option<usize> {
    platform::online_cores()
}

/// Pins the current thread on creation and restores its previous affinity on
/// drop, including during unwinding.
pub struct CpuPinGuard {
    core: Option<usize>,
    saved: Option<platform::SavedMask>,
}

impl CpuPinGuard {
    /// Pin to the core the thread is running on now, or core 0 if unknown.
    pub fn new() -> Self {
        Self::with_core(platform::current_core().unwrap_or(0))
    }

    pub fn with_core(core: usize) -> Self {
        let saved = platform::pin(core);
        let core = saved.as_ref().map(|_| core);
        Self { core, saved }
    }

    pub fn core_id(&self) -> Option<usize> {
        self.core
    }

    pub fn is_pinned(&self) -> bool {
        self.core.is_some()
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let restored = platform::restore(&saved);
            debug!(core = ?self.core, restored, "cpu unpin");
        }
    }
}
