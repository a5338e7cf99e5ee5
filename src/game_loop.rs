//! Loop objects owning their own scheduling.
//!
//! A view constructs a loop on mount and drops it on unmount; dropping a
//! loop cancels the underlying timer or animation frame.

use gloo::render::request_animation_frame;
use gloo::timers::callback::Interval;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// A pending timer or frame request; dropping it cancels.
pub struct Scheduled {
    _guard: Box<dyn Any>,
}

impl Scheduled {
    pub fn new(guard: impl Any) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

/// Source of timer and frame callbacks.
pub trait Scheduler {
    fn every(&self, period_ms: u32, callback: Rc<dyn Fn()>) -> Scheduled;
    fn next_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Scheduled;
}

/// `setInterval` and `requestAnimationFrame` through gloo.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn every(&self, period_ms: u32, callback: Rc<dyn Fn()>) -> Scheduled {
        Scheduled::new(Interval::new(period_ms, move || callback()))
    }

    fn next_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Scheduled {
        Scheduled::new(request_animation_frame(callback))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Paused,
    Stopped,
}

impl LoopState {
    /// Next state for `start`/`resume`; `Stopped` is terminal.
    fn on_start(self) -> LoopState {
        match self {
            LoopState::Stopped => LoopState::Stopped,
            _ => LoopState::Running,
        }
    }

    fn on_pause(self) -> LoopState {
        match self {
            LoopState::Running => LoopState::Paused,
            other => other,
        }
    }
}

/// Fixed-period loop on `setInterval`.
pub struct TickLoop {
    scheduler: Rc<dyn Scheduler>,
    callback: Rc<dyn Fn()>,
    period_ms: u32,
    state: LoopState,
    handle: Option<Scheduled>,
}

impl TickLoop {
    pub fn new(period_ms: u32, callback: impl Fn() + 'static) -> Self {
        Self::with_scheduler(Rc::new(BrowserScheduler), period_ms, callback)
    }

    pub fn with_scheduler(
        scheduler: Rc<dyn Scheduler>,
        period_ms: u32,
        callback: impl Fn() + 'static,
    ) -> Self {
        Self {
            scheduler,
            callback: Rc::new(callback),
            period_ms,
            state: LoopState::Idle,
            handle: None,
        }
    }

    pub fn start(&mut self) {
        self.state = self.state.on_start();
        if self.state == LoopState::Running && self.handle.is_none() {
            self.handle = Some(self.scheduler.every(self.period_ms, self.callback.clone()));
        }
    }

    pub fn resume(&mut self) {
        self.start();
    }

    pub fn pause(&mut self) {
        self.state = self.state.on_pause();
        self.handle = None;
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.handle = None;
    }

    /// Changing the period re-arms a running timer.
    pub fn set_period(&mut self, period_ms: u32) {
        if period_ms == self.period_ms {
            return;
        }
        self.period_ms = period_ms;
        if self.state == LoopState::Running {
            self.handle = None;
            self.start();
        }
    }
}

struct FrameInner {
    scheduler: Rc<dyn Scheduler>,
    callback: Rc<dyn Fn(f64)>,
    state: LoopState,
    frame: Option<Scheduled>,
}

/// Loop on `requestAnimationFrame`; the callback receives the frame timestamp.
pub struct FrameLoop {
    inner: Rc<RefCell<FrameInner>>,
}

impl FrameLoop {
    pub fn new(callback: impl Fn(f64) + 'static) -> Self {
        Self::with_scheduler(Rc::new(BrowserScheduler), callback)
    }

    pub fn with_scheduler(scheduler: Rc<dyn Scheduler>, callback: impl Fn(f64) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FrameInner {
                scheduler,
                callback: Rc::new(callback),
                state: LoopState::Idle,
                frame: None,
            })),
        }
    }

    fn schedule(inner: &Rc<RefCell<FrameInner>>) {
        let weak = Rc::downgrade(inner);
        let scheduler = inner.borrow().scheduler.clone();
        let handle = scheduler.next_frame(Box::new(move |ts| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let callback = {
                let mut i = inner.borrow_mut();
                i.frame.take();
                if i.state != LoopState::Running {
                    return;
                }
                i.callback.clone()
            };
            callback(ts);
            let still_running = inner.borrow().state == LoopState::Running;
            if still_running && inner.borrow().frame.is_none() {
                FrameLoop::schedule(&inner);
            }
        }));
        inner.borrow_mut().frame = Some(handle);
    }

    pub fn start(&mut self) {
        let should_schedule = {
            let mut i = self.inner.borrow_mut();
            i.state = i.state.on_start();
            i.state == LoopState::Running && i.frame.is_none()
        };
        if should_schedule {
            FrameLoop::schedule(&self.inner);
        }
    }

    pub fn resume(&mut self) {
        self.start();
    }

    pub fn pause(&mut self) {
        let mut i = self.inner.borrow_mut();
        i.state = i.state.on_pause();
        i.frame = None;
    }

    pub fn stop(&mut self) {
        let mut i = self.inner.borrow_mut();
        i.state = LoopState::Stopped;
        i.frame = None;
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Weak;

    /// Scheduler whose timers and frames fire only when the test says so.
    #[derive(Default)]
    struct ManualClock {
        next_id: Cell<u64>,
        intervals: RefCell<Vec<(u64, u32, Rc<dyn Fn()>)>>,
        frames: RefCell<Vec<(u64, Box<dyn FnOnce(f64)>)>>,
    }

    struct Cancel {
        id: u64,
        clock: Weak<ManualClock>,
    }

    impl Drop for Cancel {
        fn drop(&mut self) {
            if let Some(clock) = self.clock.upgrade() {
                clock.intervals.borrow_mut().retain(|(id, _, _)| *id != self.id);
                clock.frames.borrow_mut().retain(|(id, _)| *id != self.id);
            }
        }
    }

    struct ManualScheduler(Rc<ManualClock>);

    impl ManualScheduler {
        fn guard(&self) -> (u64, Scheduled) {
            let id = self.0.next_id.get();
            self.0.next_id.set(id + 1);
            let cancel = Cancel {
                id,
                clock: Rc::downgrade(&self.0),
            };
            (id, Scheduled::new(cancel))
        }
    }

    impl Scheduler for ManualScheduler {
        fn every(&self, period_ms: u32, callback: Rc<dyn Fn()>) -> Scheduled {
            let (id, guard) = self.guard();
            self.0.intervals.borrow_mut().push((id, period_ms, callback));
            guard
        }

        fn next_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Scheduled {
            let (id, guard) = self.guard();
            self.0.frames.borrow_mut().push((id, callback));
            guard
        }
    }

    impl ManualClock {
        fn periods(&self) -> Vec<u32> {
            self.intervals.borrow().iter().map(|(_, p, _)| *p).collect()
        }

        fn pending_frames(&self) -> usize {
            self.frames.borrow().len()
        }

        fn fire_intervals(&self) {
            let due: Vec<Rc<dyn Fn()>> =
                self.intervals.borrow().iter().map(|(_, _, cb)| cb.clone()).collect();
            for cb in due {
                cb();
            }
        }

        fn fire_frame(&self, ts: f64) {
            let next = {
                let mut frames = self.frames.borrow_mut();
                if frames.is_empty() {
                    None
                } else {
                    Some(frames.remove(0).1)
                }
            };
            if let Some(cb) = next {
                cb(ts);
            }
        }
    }

    fn clock() -> (Rc<ManualClock>, Rc<dyn Scheduler>) {
        let clock = Rc::new(ManualClock::default());
        let scheduler: Rc<dyn Scheduler> = Rc::new(ManualScheduler(clock.clone()));
        (clock, scheduler)
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        (hits, move || h.set(h.get() + 1))
    }

    #[test]
    fn tick_loop_arms_one_timer_on_start() {
        let (clock, scheduler) = clock();
        let (hits, cb) = counter();
        let mut lp = TickLoop::with_scheduler(scheduler, 150, cb);
        assert!(clock.periods().is_empty());
        lp.start();
        lp.start();
        assert_eq!(clock.periods(), vec![150]);
        clock.fire_intervals();
        clock.fire_intervals();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn set_period_rearms_running_timer() {
        let (clock, scheduler) = clock();
        let (_, cb) = counter();
        let mut lp = TickLoop::with_scheduler(scheduler, 150, cb);
        lp.start();
        lp.set_period(120);
        assert_eq!(clock.periods(), vec![120]);
        lp.set_period(120);
        assert_eq!(clock.periods(), vec![120]);
    }

    #[test]
    fn paused_tick_loop_holds_no_timer() {
        let (clock, scheduler) = clock();
        let (hits, cb) = counter();
        let mut lp = TickLoop::with_scheduler(scheduler, 150, cb);
        lp.start();
        lp.pause();
        assert!(clock.periods().is_empty());
        lp.set_period(90);
        assert!(clock.periods().is_empty());
        clock.fire_intervals();
        assert_eq!(hits.get(), 0);
        lp.resume();
        assert_eq!(clock.periods(), vec![90]);
    }

    #[test]
    fn stopped_tick_loop_cannot_restart() {
        let (clock, scheduler) = clock();
        let (_, cb) = counter();
        let mut lp = TickLoop::with_scheduler(scheduler, 150, cb);
        lp.start();
        lp.stop();
        assert!(clock.periods().is_empty());
        lp.start();
        assert!(clock.periods().is_empty());
    }

    #[test]
    fn dropping_tick_loop_cancels_timer() {
        let (clock, scheduler) = clock();
        let (_, cb) = counter();
        let mut lp = TickLoop::with_scheduler(scheduler, 1000, cb);
        lp.start();
        drop(lp);
        assert!(clock.periods().is_empty());
    }

    #[test]
    fn frame_loop_reschedules_after_each_frame() {
        let (clock, scheduler) = clock();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut lp = {
            let seen = seen.clone();
            FrameLoop::with_scheduler(scheduler, move |ts| seen.borrow_mut().push(ts))
        };
        lp.start();
        assert_eq!(clock.pending_frames(), 1);
        clock.fire_frame(16.0);
        clock.fire_frame(32.0);
        assert_eq!(*seen.borrow(), vec![16.0, 32.0]);
        assert_eq!(clock.pending_frames(), 1);
    }

    #[test]
    fn paused_frame_loop_releases_request() {
        let (clock, scheduler) = clock();
        let hits = Rc::new(Cell::new(0));
        let mut lp = {
            let hits = hits.clone();
            FrameLoop::with_scheduler(scheduler, move |_| hits.set(hits.get() + 1))
        };
        lp.start();
        lp.pause();
        assert_eq!(clock.pending_frames(), 0);
        lp.resume();
        assert_eq!(clock.pending_frames(), 1);
        clock.fire_frame(1.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_frame_loop_cancels_pending_frame() {
        let (clock, scheduler) = clock();
        let hits = Rc::new(Cell::new(0));
        let mut lp = {
            let hits = hits.clone();
            FrameLoop::with_scheduler(scheduler, move |_| hits.set(hits.get() + 1))
        };
        lp.start();
        drop(lp);
        assert_eq!(clock.pending_frames(), 0);
        clock.fire_frame(1.0);
        assert_eq!(hits.get(), 0);
    }


    #[test]
    fn stopped_is_terminal() {
        assert_eq!(LoopState::Stopped.on_start(), LoopState::Stopped);
        assert_eq!(LoopState::Stopped.on_pause(), LoopState::Stopped);
    }

    #[test]
    fn pause_only_affects_running_loops() {
        assert_eq!(LoopState::Running.on_pause(), LoopState::Paused);
        assert_eq!(LoopState::Idle.on_pause(), LoopState::Idle);
        assert_eq!(LoopState::Paused.on_start(), LoopState::Running);
        assert_eq!(LoopState::Idle.on_start(), LoopState::Running);
    }
}
