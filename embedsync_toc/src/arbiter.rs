// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-origin arbiter: tells reader scrolling apart from scrolling we started ourselves.
//!
//! ## States
//!
//! - [`ScrollMode::Observing`] (initial): visibility reports drive the active chain.
//! - [`ScrollMode::Suspended`]: a click started a programmatic scroll; reports are ignored.
//!
//! A click moves to `Suspended`. The next raw input signal from the reader (pointer, key, wheel,
//! touch) moves back to `Observing`. Nothing resumes on a timer.

bitflags::bitflags! {
    /// Kinds of raw reader input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InputSignals: u8 {
        /// Pointer press.
        const POINTER = 0b0000_0001;
        /// Key press.
        const KEY     = 0b0000_0010;
        /// Wheel or trackpad scroll.
        const WHEEL   = 0b0000_0100;
        /// Touch start.
        const TOUCH   = 0b0000_1000;
    }
}

impl Default for InputSignals {
    fn default() -> Self {
        Self::all()
    }
}

/// Who is driving the scroll position.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ScrollMode {
    /// The reader; visibility reports are honored.
    #[default]
    Observing,
    /// A click-triggered programmatic scroll; visibility reports are ignored.
    Suspended,
}

/// What the caller must do after a signal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    /// Nothing changed.
    Stay,
    /// Stop observing.
    Suspend,
    /// Start observing again.
    Resume,
}

/// The two-state scroll-origin machine.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ScrollArbiter {
    mode: ScrollMode,
    resume_on: InputSignals,
}

impl ScrollArbiter {
    /// Create an arbiter that resumes on every input kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arbiter that resumes only on the given input kinds.
    pub fn resuming_on(resume_on: InputSignals) -> Self {
        Self {
            mode: ScrollMode::Observing,
            resume_on,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// Return to [`ScrollMode::Observing`], keeping the resume mask.
    pub fn reset(&mut self) {
        self.mode = ScrollMode::Observing;
    }

    /// A navigation link was clicked.
    pub fn on_click(&mut self) -> Transition {
        match self.mode {
            ScrollMode::Observing => {
                self.mode = ScrollMode::Suspended;
                Transition::Suspend
            }
            ScrollMode::Suspended => Transition::Stay,
        }
    }

    /// The reader produced raw input of kind `signal`.
    pub fn on_user_input(&mut self, signal: InputSignals) -> Transition {
        match self.mode {
            ScrollMode::Suspended if self.resume_on.intersects(signal) => {
                self.mode = ScrollMode::Observing;
                Transition::Resume
            }
            _ => Transition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_suspends_input_resumes() {
        let mut a = ScrollArbiter::new();
        assert_eq!(a.mode(), ScrollMode::Observing);
        assert_eq!(a.on_click(), Transition::Suspend);
        assert_eq!(a.mode(), ScrollMode::Suspended);
        assert_eq!(a.on_click(), Transition::Stay, "second click keeps suspension");
        assert_eq!(a.on_user_input(InputSignals::WHEEL), Transition::Resume);
        assert_eq!(a.mode(), ScrollMode::Observing);
    }

    #[test]
    fn input_while_observing_is_noop() {
        let mut a = ScrollArbiter::new();
        for signal in InputSignals::all().iter() {
            assert_eq!(a.on_user_input(signal), Transition::Stay);
        }
        assert_eq!(a.mode(), ScrollMode::Observing);
    }

    #[test]
    fn reset_returns_to_observing_and_keeps_mask() {
        let mut a = ScrollArbiter::resuming_on(InputSignals::WHEEL);
        a.on_click();
        a.reset();
        assert_eq!(a.mode(), ScrollMode::Observing);
        a.on_click();
        assert_eq!(a.on_user_input(InputSignals::KEY), Transition::Stay);
        assert_eq!(a.on_user_input(InputSignals::WHEEL), Transition::Resume);
    }

    #[test]
    fn resume_mask_filters_signals() {
        let mut a = ScrollArbiter::resuming_on(InputSignals::WHEEL | InputSignals::TOUCH);
        a.on_click();
        assert_eq!(a.on_user_input(InputSignals::KEY), Transition::Stay);
        assert_eq!(a.on_user_input(InputSignals::POINTER), Transition::Stay);
        assert_eq!(a.on_user_input(InputSignals::TOUCH), Transition::Resume);
    }
}
