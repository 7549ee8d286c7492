//! Periodic callbacks bound to nodes
//!
//! The host advances time with [`ObjTree::tick`]. A timer whose target node
//! was deleted is dropped instead of fired, and deleting a node cancels its
//! timers.

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::obj::ObjId;
use crate::tree::ObjTree;

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Timer callback; the last argument counts the firings, starting at 1
pub type TimerFn = fn(&mut ObjTree, ObjId, u32);

struct Timer {
    target: ObjId,
    period_ms: u32,
    elapsed_ms: u32,
    fired: u32,
    callback: TimerFn,
}

/// Timers registered with a tree
#[derive(Default)]
pub struct Timers {
    timers: SlotMap<TimerId, Timer>,
}

impl Timers {
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub(crate) fn cancel_for(&mut self, target: ObjId) {
        self.timers.retain(|_, t| t.target != target);
    }
}

impl ObjTree {
    /// Call `callback` for `target` every `period_ms` milliseconds
    pub fn schedule(&mut self, target: ObjId, period_ms: u32, callback: TimerFn) -> TimerId {
        self.timers.timers.insert(Timer {
            target,
            period_ms: period_ms.max(1),
            elapsed_ms: 0,
            fired: 0,
            callback,
        })
    }

    /// Remove a timer; returns false if it was already gone
    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.timers.remove(id).is_some()
    }

    /// Registered timers
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Advance time and fire every due timer
    pub fn tick(&mut self, elapsed_ms: u32) {
        let ids: Vec<TimerId> = self.timers.timers.keys().collect();
        for id in ids {
            let Some(timer) = self.timers.timers.get_mut(id) else {
                continue;
            };
            timer.elapsed_ms += elapsed_ms;
            let due = timer.elapsed_ms / timer.period_ms;
            timer.elapsed_ms %= timer.period_ms;

            for _ in 0..due {
                let Some(timer) = self.timers.timers.get_mut(id) else {
                    break;
                };
                let target = timer.target;
                if !self.objs.contains_key(target) {
                    self.timers.timers.remove(id);
                    break;
                }
                timer.fired += 1;
                let (fired, callback) = (timer.fired, timer.callback);
                trace!("timer {:?} fired for {:?} ({})", id, target, fired);
                callback(self, target, fired);
            }
        }
    }
}
