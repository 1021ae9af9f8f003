//! Debounce: вызывает callback только после паузы во вводе.

use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

/// Задержка поиска в выпадающем списке по умолчанию.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u32 = 200;

/// Источник таймеров. Удаление (drop) `Handle` отменяет отложенную задачу.
pub trait TimerScheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Browser timers via `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooScheduler;

impl TimerScheduler for GlooScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle {
        Timeout::new(delay_ms, task)
    }
}

/// Trailing-edge debounce: each `call` cancels the pending one and schedules
/// the callback `delay_ms` later with the latest argument only.
pub struct Debouncer<A: 'static, S: TimerScheduler = GlooScheduler> {
    delay_ms: u32,
    callback: Rc<dyn Fn(A)>,
    pending: RefCell<Option<S::Handle>>,
    scheduler: S,
}

impl<A: 'static> Debouncer<A, GlooScheduler> {
    pub fn new(delay_ms: u32, callback: impl Fn(A) + 'static) -> Self {
        Self::with_scheduler(delay_ms, GlooScheduler, callback)
    }
}

impl<A: 'static, S: TimerScheduler> Debouncer<A, S> {
    pub fn with_scheduler(delay_ms: u32, scheduler: S, callback: impl Fn(A) + 'static) -> Self {
        Self {
            delay_ms,
            callback: Rc::new(callback),
            pending: RefCell::new(None),
            scheduler,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn call(&self, arg: A) {
        let callback = Rc::clone(&self.callback);
        let handle = self
            .scheduler
            .schedule(self.delay_ms, Box::new(move || callback(arg)));
        // старый таймер отменяется при drop
        let previous = self.pending.replace(Some(handle));
        drop(previous);
    }

    pub fn cancel(&self) {
        let previous = self.pending.borrow_mut().take();
        drop(previous);
    }
}
