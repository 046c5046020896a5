use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::foundation::core::{Fps, FrameIndex};

/// Handle to one scheduler registration.
///
/// Clones share the same liveness flag, so a callback can hold a clone and cancel itself.
#[derive(Clone, Debug)]
pub struct FrameToken {
    id: u64,
    live: Rc<Cell<bool>>,
}

impl FrameToken {
    /// Registration id, unique per scheduler. Ids of different schedulers may collide.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// `true` until the registration is cancelled or stopped.
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Cancel the registration. The callback is never invoked again, even later in the current
    /// tick.
    pub fn cancel(&self) {
        self.live.set(false);
    }
}

struct Registration {
    id: u64,
    live: Rc<Cell<bool>>,
    t: FrameIndex,
    callback: Box<dyn FnMut(FrameIndex)>,
}

/// Per-display-refresh callback driver.
///
/// Each registration owns a frame counter starting at 0; it is incremented before every
/// invocation, so the first call sees `t = 1`. Single-threaded: callbacks run on the thread that
/// calls [`FrameScheduler::tick`].
#[derive(Default)]
pub struct FrameScheduler {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("next_id", &self.next_id)
            .field("active", &self.active())
            .finish()
    }
}

impl FrameScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` to run once per tick until stopped.
    pub fn start(&mut self, callback: impl FnMut(FrameIndex) + 'static) -> FrameToken {
        let id = self.next_id;
        self.next_id += 1;
        let live = Rc::new(Cell::new(true));
        self.registrations.push(Registration {
            id,
            live: Rc::clone(&live),
            t: FrameIndex::default(),
            callback: Box::new(callback),
        });
        tracing::debug!(id, "frame callback registered");
        FrameToken { id, live }
    }

    /// Stop the registration behind `token`. Returns `false` if it was already stopped or was
    /// started on another scheduler, which is left untouched.
    pub fn stop(&mut self, token: &FrameToken) -> bool {
        let Some(pos) = self
            .registrations
            .iter()
            .position(|r| Rc::ptr_eq(&r.live, &token.live))
        else {
            return false;
        };
        let was_live = token.is_live();
        token.cancel();
        self.registrations.remove(pos);
        tracing::debug!(id = token.id, "frame callback stopped");
        was_live
    }

    /// One display refresh: invoke every live registration once. Returns the number of
    /// callbacks invoked.
    pub fn tick(&mut self) -> usize {
        self.registrations.retain(|r| r.live.get());
        let mut invoked = 0;
        for reg in &mut self.registrations {
            if !reg.live.get() {
                continue;
            }
            reg.t = reg.t.next();
            (reg.callback)(reg.t);
            invoked += 1;
        }
        invoked
    }

    /// Number of live registrations.
    pub fn active(&self) -> usize {
        self.registrations.iter().filter(|r| r.live.get()).count()
    }
}

/// Wall-clock pacing of ticks to a target rate.
///
/// Pacing only decides when a tick happens; it never changes the frame counter.
#[derive(Debug)]
pub struct FramePacer {
    period: Duration,
    next: Option<Instant>,
}

impl FramePacer {
    /// Pacer targeting `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            period: Duration::from_secs_f64(fps.frame_duration_secs()),
            next: None,
        }
    }

    /// Interval between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the next tick is due. A late caller is not made to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        let base = if due > now { due } else { now };
        self.next = Some(base + self.period);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
