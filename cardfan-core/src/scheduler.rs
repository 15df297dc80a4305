//! Per-frame work dispatch, decoupled from the render loop.
//!
//! Two independent subscriber sets: one driven every frame by `tick`, one at
//! a fixed cadence by `fixed_tick`. Each pass snapshots the subscriber ids up
//! front, so subscribing or removing during a pass never disturbs the pass
//! already underway: every snapshotted subscriber runs exactly once this
//! tick, and the mutation shows up in the next one.

pub type FrameHandler<C> = Box<dyn FnMut(&mut C, &mut FrameScheduler<C>, f32)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    EveryFrame,
    Fixed,
}

struct Slot<C> {
    id: HandlerId,
    // None only while the handler is out being invoked.
    handler: Option<FrameHandler<C>>,
}

enum PendingOp<C> {
    Add(Cadence, HandlerId, FrameHandler<C>),
    Remove(HandlerId),
}

pub struct FrameScheduler<C> {
    next_id: u64,
    every_frame: Vec<Slot<C>>,
    fixed: Vec<Slot<C>>,
    pending: Vec<PendingOp<C>>,
    in_pass: bool,
    fixed_gate_open: bool,
}

impl<C> FrameScheduler<C> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            every_frame: Vec::new(),
            fixed: Vec::new(),
            pending: Vec::new(),
            in_pass: false,
            fixed_gate_open: true,
        }
    }

    pub fn add_update(&mut self, handler: FrameHandler<C>) -> HandlerId {
        self.add(Cadence::EveryFrame, handler)
    }

    pub fn add_fixed(&mut self, handler: FrameHandler<C>) -> HandlerId {
        self.add(Cadence::Fixed, handler)
    }

    fn add(&mut self, cadence: Cadence, handler: FrameHandler<C>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        if self.in_pass {
            self.pending.push(PendingOp::Add(cadence, id, handler));
        } else {
            self.set_for(cadence).push(Slot {
                id,
                handler: Some(handler),
            });
        }
        id
    }

    /// Removes a subscriber from whichever set holds it. During a pass the
    /// removal is deferred until the pass ends, so a subscriber already in
    /// the snapshot still runs this tick.
    pub fn remove(&mut self, id: HandlerId) {
        if self.in_pass {
            self.pending.push(PendingOp::Remove(id));
        } else {
            self.every_frame.retain(|slot| slot.id != id);
            self.fixed.retain(|slot| slot.id != id);
        }
    }

    pub fn update_len(&self) -> usize {
        self.every_frame.len()
    }

    pub fn fixed_len(&self) -> usize {
        self.fixed.len()
    }

    /// Drives the per-frame set once and re-opens the fixed-cadence gate.
    pub fn tick(&mut self, ctx: &mut C, dt: f32) {
        self.run_pass(Cadence::EveryFrame, ctx, dt);
        self.fixed_gate_open = true;
    }

    /// Drives the fixed-cadence set, at most once per frame boundary: a
    /// backlog of fixed steps within one frame collapses into a single pass.
    pub fn fixed_tick(&mut self, ctx: &mut C, dt: f32) {
        if self.in_pass || !self.fixed_gate_open {
            return;
        }
        self.fixed_gate_open = false;
        self.run_pass(Cadence::Fixed, ctx, dt);
    }

    fn run_pass(&mut self, cadence: Cadence, ctx: &mut C, dt: f32) {
        if self.in_pass {
            return;
        }
        self.in_pass = true;
        let snapshot: Vec<HandlerId> = self.set_for(cadence).iter().map(|slot| slot.id).collect();
        for id in snapshot {
            let Some(mut handler) = self.take_handler(cadence, id) else {
                continue;
            };
            handler(ctx, self, dt);
            self.put_back(cadence, id, handler);
        }
        self.in_pass = false;
        self.apply_pending();
    }

    fn set_for(&mut self, cadence: Cadence) -> &mut Vec<Slot<C>> {
        match cadence {
            Cadence::EveryFrame => &mut self.every_frame,
            Cadence::Fixed => &mut self.fixed,
        }
    }

    fn take_handler(&mut self, cadence: Cadence, id: HandlerId) -> Option<FrameHandler<C>> {
        self.set_for(cadence)
            .iter_mut()
            .find(|slot| slot.id == id)
            .and_then(|slot| slot.handler.take())
    }

    fn put_back(&mut self, cadence: Cadence, id: HandlerId, handler: FrameHandler<C>) {
        if let Some(slot) = self.set_for(cadence).iter_mut().find(|slot| slot.id == id) {
            slot.handler = Some(handler);
        }
    }

    fn apply_pending(&mut self) {
        for op in std::mem::take(&mut self.pending) {
            match op {
                PendingOp::Add(cadence, id, handler) => {
                    self.set_for(cadence).push(Slot {
                        id,
                        handler: Some(handler),
                    });
                }
                PendingOp::Remove(id) => {
                    self.every_frame.retain(|slot| slot.id != id);
                    self.fixed.retain(|slot| slot.id != id);
                }
            }
        }
    }
}

impl<C> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn invokes_subscribers_in_order_once_per_tick() {
        let mut scheduler: FrameScheduler<Vec<&'static str>> = FrameScheduler::new();
        scheduler.add_update(Box::new(|log, _, _| log.push("a")));
        scheduler.add_update(Box::new(|log, _, _| log.push("b")));

        let mut log = Vec::new();
        scheduler.tick(&mut log, DT);
        assert_eq!(log, vec!["a", "b"]);
    }

    #[test]
    fn subscriber_can_remove_itself_mid_pass() {
        let own_id = Rc::new(Cell::new(None));
        let own_id_in_handler = Rc::clone(&own_id);
        let mut scheduler: FrameScheduler<Vec<&'static str>> = FrameScheduler::new();
        let id = scheduler.add_update(Box::new(move |log, scheduler, _| {
            log.push("once");
            if let Some(id) = own_id_in_handler.get() {
                scheduler.remove(id);
            }
        }));
        own_id.set(Some(id));
        scheduler.add_update(Box::new(|log, _, _| log.push("steady")));

        let mut log = Vec::new();
        scheduler.tick(&mut log, DT);
        scheduler.tick(&mut log, DT);
        assert_eq!(log, vec!["once", "steady", "steady"]);
        assert_eq!(scheduler.update_len(), 1);
    }

    #[test]
    fn removing_another_subscriber_mid_pass_still_runs_it_this_tick() {
        let victim_id = Rc::new(Cell::new(None));
        let victim_id_in_handler = Rc::clone(&victim_id);
        let mut scheduler: FrameScheduler<Vec<&'static str>> = FrameScheduler::new();
        scheduler.add_update(Box::new(move |log, scheduler, _| {
            log.push("remover");
            if let Some(id) = victim_id_in_handler.get() {
                scheduler.remove(id);
            }
        }));
        let victim = scheduler.add_update(Box::new(|log, _, _| log.push("victim")));
        victim_id.set(Some(victim));

        let mut log = Vec::new();
        scheduler.tick(&mut log, DT);
        assert_eq!(log, vec!["remover", "victim"]);
        scheduler.tick(&mut log, DT);
        assert_eq!(log, vec!["remover", "victim", "remover"]);
    }

    #[test]
    fn additions_mid_pass_start_with_the_next_tick() {
        let added = Rc::new(Cell::new(false));
        let added_in_handler = Rc::clone(&added);
        let mut scheduler: FrameScheduler<Vec<&'static str>> = FrameScheduler::new();
        scheduler.add_update(Box::new(move |log, scheduler, _| {
            log.push("spawner");
            if !added_in_handler.get() {
                added_in_handler.set(true);
                scheduler.add_update(Box::new(|log, _, _| log.push("late")));
            }
        }));

        let mut log = Vec::new();
        scheduler.tick(&mut log, DT);
        assert_eq!(log, vec!["spawner"]);
        scheduler.tick(&mut log, DT);
        assert_eq!(log, vec!["spawner", "spawner", "late"]);
    }

    #[test]
    fn fixed_gate_admits_one_fixed_pass_per_frame() {
        let mut scheduler: FrameScheduler<u32> = FrameScheduler::new();
        scheduler.add_fixed(Box::new(|count, _, _| *count += 1));

        let mut count = 0;
        scheduler.fixed_tick(&mut count, DT);
        scheduler.fixed_tick(&mut count, DT);
        scheduler.fixed_tick(&mut count, DT);
        assert_eq!(count, 1);

        scheduler.tick(&mut count, DT);
        scheduler.fixed_tick(&mut count, DT);
        scheduler.fixed_tick(&mut count, DT);
        assert_eq!(count, 2);
    }

    #[test]
    fn remove_reaches_both_sets() {
        let mut scheduler: FrameScheduler<u32> = FrameScheduler::new();
        let update = scheduler.add_update(Box::new(|count, _, _| *count += 1));
        let fixed = scheduler.add_fixed(Box::new(|count, _, _| *count += 10));
        scheduler.remove(update);
        scheduler.remove(fixed);

        let mut count = 0;
        scheduler.tick(&mut count, DT);
        scheduler.fixed_tick(&mut count, DT);
        assert_eq!(count, 0);
        assert_eq!(scheduler.update_len(), 0);
        assert_eq!(scheduler.fixed_len(), 0);
    }
}
