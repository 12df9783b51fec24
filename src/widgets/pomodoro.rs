//! Work/break timer.
//!
//! Only the number of completed work sessions is persisted. The current
//! phase, the seconds left and whether the timer runs belong to the session
//! and start over as `WORK(1500)`, stopped, on every load.

use crate::store::{StoreHandle, POMODORO_COUNT_KEY};
use crate::widget_state::WidgetState;

pub const WORK_SECONDS: u32 = 25 * 60;
pub const BREAK_SECONDS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn duration(self) -> u32 {
        match self {
            Phase::Work => WORK_SECONDS,
            Phase::Break => BREAK_SECONDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "作業時間",
            Phase::Break => "休憩時間",
        }
    }
}

/// Message handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Emitted by [`PomodoroTimer::tick`] when a phase runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroEvent {
    WorkFinished { completed_cycles: u32 },
    BreakFinished,
}

impl PomodoroEvent {
    pub fn notification(&self) -> Notification {
        let (title, body) = match self {
            PomodoroEvent::WorkFinished { .. } => ("お疲れ様です！", "5分間休憩しましょう"),
            PomodoroEvent::BreakFinished => ("休憩終了！", "また頑張りましょう"),
        };
        Notification {
            title: title.into(),
            body: body.into(),
        }
    }
}

pub struct PomodoroTimer {
    phase: Phase,
    remaining: u32,
    running: bool,
    /// Session count; ahead of `cycles` while saving it keeps failing.
    completed: u32,
    cycles: WidgetState<u32>,
}

impl PomodoroTimer {
    pub fn load(store: StoreHandle) -> Self {
        let cycles = WidgetState::load(store, POMODORO_COUNT_KEY, || 0);
        Self {
            phase: Phase::Work,
            remaining: WORK_SECONDS,
            running: false,
            completed: *cycles.get(),
            cycles,
        }
    }

    /// Put the timer into `phase` with `remaining` seconds left, stopped.
    pub fn with_phase(mut self, phase: Phase, remaining: u32) -> Self {
        self.phase = phase;
        self.remaining = remaining;
        self.running = false;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed
    }

    /// Start the countdown. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        if self.remaining == 0 {
            self.remaining = self.phase.duration();
        }
        self.running = true;
        true
    }

    /// Pause the countdown, keeping the seconds left.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Start when stopped, stop when running. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    /// Advance by one second.
    ///
    /// At the end of a phase the timer switches to the other phase and stops;
    /// it has to be started again by hand.
    pub fn tick(&mut self) -> Option<PomodoroEvent> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }
        self.running = false;
        let event = match self.phase {
            Phase::Work => {
                self.completed = self.completed.saturating_add(1);
                // a failed save is retried with the full count after the next cycle
                if let Err(e) = self.cycles.replace(self.completed) {
                    tracing::error!("failed to save pomodoro count: {e:#}");
                }
                self.phase = Phase::Break;
                self.remaining = BREAK_SECONDS;
                PomodoroEvent::WorkFinished {
                    completed_cycles: self.completed_cycles(),
                }
            }
            Phase::Break => {
                self.phase = Phase::Work;
                self.remaining = WORK_SECONDS;
                PomodoroEvent::BreakFinished
            }
        };
        tracing::debug!(?event, "pomodoro phase finished");
        Some(event)
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.phase = Phase::Work;
        self.remaining = WORK_SECONDS;
    }

    /// Seconds left formatted as `MM:SS`.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// Fraction of the current phase still left, from `1.0` down to `0.0`.
    pub fn progress(&self) -> f64 {
        f64::from(self.remaining) / f64::from(self.phase.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FlakyStore;
    use crate::store::{self, MemoryStore, StoreRead};
    use std::sync::Arc;

    #[test]
    fn stopped_timer_ignores_ticks() {
        let mut timer = PomodoroTimer::load(MemoryStore::shared());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), WORK_SECONDS);
    }

    #[test]
    fn stop_keeps_remaining() {
        let mut timer = PomodoroTimer::load(MemoryStore::shared());
        assert!(timer.start());
        assert!(!timer.start());
        timer.tick();
        timer.tick();
        assert!(timer.stop());
        assert_eq!(timer.remaining(), WORK_SECONDS - 2);
        assert_eq!(timer.display(), "24:58");
    }

    #[test]
    fn break_end_returns_to_work() {
        let mut timer = PomodoroTimer::load(MemoryStore::shared()).with_phase(Phase::Break, 1);
        timer.start();
        assert_eq!(timer.tick(), Some(PomodoroEvent::BreakFinished));
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.remaining(), WORK_SECONDS);
        assert!(!timer.running());
        assert_eq!(timer.completed_cycles(), 0);
    }

    #[test]
    fn progress_tracks_current_phase() {
        let timer = PomodoroTimer::load(MemoryStore::shared()).with_phase(Phase::Break, 150);
        assert!((timer.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unsaved_cycle_is_still_counted() {
        let flaky = Arc::new(FlakyStore::default());
        let mut timer = PomodoroTimer::load(flaky.clone()).with_phase(Phase::Work, 1);

        flaky.fail_writes(true);
        timer.start();
        assert_eq!(
            timer.tick(),
            Some(PomodoroEvent::WorkFinished { completed_cycles: 1 })
        );
        assert_eq!(timer.completed_cycles(), 1);
        assert_eq!(store::get::<u32>(flaky.as_ref(), POMODORO_COUNT_KEY), StoreRead::Absent);

        flaky.fail_writes(false);
        let mut timer = timer.with_phase(Phase::Work, 1);
        timer.start();
        assert_eq!(
            timer.tick(),
            Some(PomodoroEvent::WorkFinished { completed_cycles: 2 })
        );
        assert_eq!(store::get::<u32>(flaky.as_ref(), POMODORO_COUNT_KEY), StoreRead::Present(2));
    }
}
