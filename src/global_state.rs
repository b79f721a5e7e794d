use core::cell::RefCell;

use cortex_m::interrupt::Mutex;
use hal::timer::{Alarm, Alarm0};
use rp_pico::hal;

use fugit::MicrosDurationU32;
use portable_atomic::{AtomicBool, Ordering};

pub static SHARED_STATE: Mutex<RefCell<Option<SharedState>>> = Mutex::new(RefCell::new(None));
pub static ATOMIC_STATE: AtomicState = AtomicState::new();

pub fn shared_state_interrupt_free<F>(f: F)
where
    F: FnOnce(&mut SharedState),
{
    cortex_m::interrupt::free(|cs| {
        SHARED_STATE
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(f)
            .unwrap();
    });
}

pub struct AtomicState {
    frame_due: AtomicBool,
}

impl AtomicState {
    pub const fn new() -> Self {
        Self {
            frame_due: AtomicBool::new(false),
        }
    }

    pub fn set_frame_due(&self) {
        self.frame_due.store(true, Ordering::Release);
    }

    /// Returns whether a frame is due and resets the flag.
    pub fn take_frame_due(&self) -> bool {
        self.frame_due.swap(false, Ordering::AcqRel)
    }
}

pub struct SharedState {
    pub alarm0: Alarm0,
    /// How long the current frame stays on screen
    pub frame_duration: MicrosDurationU32,
}

impl SharedState {
    pub fn alarm0_reschedule(&mut self) {
        self.alarm0.schedule(self.frame_duration).unwrap();
    }

    pub fn alarm0_clear_interrupt(&mut self) {
        self.alarm0.clear_interrupt();
    }
}
