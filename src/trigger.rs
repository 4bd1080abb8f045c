//! Bounded trigger queue between the sensor context and the sequence
//! executor.
//!
//! Built on `critical-section` and `heapless::Deque`, so senders may run in
//! interrupt context. Sends never block; a full queue drops the trigger.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::direction::Direction;

/// A bounded, interrupt-safe queue of pending cascade triggers.
///
/// Routing every trigger through this queue into a single consumer is what
/// serializes cascade execution: the executor owns all sequence state and
/// sees triggers strictly one at a time.
pub struct TriggerChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Direction, SIZE>>>,
}

impl<const SIZE: usize> TriggerChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle. Multiple senders may coexist.
    pub const fn sender(&self) -> TriggerSender<'_, SIZE> {
        TriggerSender { channel: self }
    }

    /// Get a receiver handle for the executor side.
    pub const fn receiver(&self) -> TriggerReceiver<'_, SIZE> {
        TriggerReceiver { channel: self }
    }

    fn push(&self, direction: Direction) -> bool {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .borrow_mut()
                .push_back(direction)
                .is_ok()
        })
    }

    fn pop(&self) -> Option<Direction> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for TriggerChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sender half of a [`TriggerChannel`]; a lightweight copyable handle.
#[derive(Clone, Copy)]
pub struct TriggerSender<'a, const SIZE: usize> {
    channel: &'a TriggerChannel<SIZE>,
}

impl<const SIZE: usize> TriggerSender<'_, SIZE> {
    /// Request a cascade in `direction`.
    ///
    /// Returns `false` when the queue is full and the trigger was dropped.
    pub fn send(&self, direction: Direction) -> bool {
        self.channel.push(direction)
    }

    /// Request the bottom-to-top sequence.
    pub fn go_up(&self) -> bool {
        self.send(Direction::Up)
    }

    /// Request the top-to-bottom sequence.
    pub fn go_down(&self) -> bool {
        self.send(Direction::Down)
    }
}

/// Receiver half of a [`TriggerChannel`].
#[derive(Clone, Copy)]
pub struct TriggerReceiver<'a, const SIZE: usize> {
    channel: &'a TriggerChannel<SIZE>,
}

impl<const SIZE: usize> TriggerReceiver<'_, SIZE> {
    /// Take the oldest pending trigger, if any.
    pub fn receive(&self) -> Option<Direction> {
        self.channel.pop()
    }
}
