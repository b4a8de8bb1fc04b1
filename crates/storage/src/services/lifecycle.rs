//! Derives the status a show or class should currently be in.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{CompetitionClass, EventStatus, Show};

/// The dates (and optional opening time) during which an entity runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    /// Wall-clock time on `first_day` from which the entity counts as started
    pub opens_at: Option<NaiveTime>,
    /// Whether passing `last_day` completes the entity without an operator
    pub completes_automatically: bool,
}

impl ScheduleWindow {
    pub fn for_show(show: &Show) -> Self {
        Self {
            first_day: show.start_date,
            last_day: show.end_date,
            opens_at: None,
            completes_automatically: true,
        }
    }

    /// A class runs on a single day and is only ever closed by an operator,
    /// since scoring may continue after its nominal date.
    pub fn for_class(class: &CompetitionClass) -> Self {
        Self {
            first_day: class.class_date,
            last_day: class.class_date,
            opens_at: class.start_time,
            completes_automatically: false,
        }
    }

    fn is_open(&self, now: NaiveDateTime) -> bool {
        let today = now.date();
        if today < self.first_day || today > self.last_day {
            return false;
        }
        match self.opens_at {
            Some(opens_at) if today == self.first_day => minute_of(now.time()) >= minute_of(opens_at),
            _ => true,
        }
    }

    fn is_over(&self, now: NaiveDateTime) -> bool {
        now.date() > self.last_day
    }
}

fn minute_of(time: NaiveTime) -> (u32, u32) {
    (time.hour(), time.minute())
}

/// Applies the schedule to the current status. Never leaves `cancelled`, never returns
/// to `upcoming`, and yields the same answer when applied to its own output.
pub fn next_status(current: EventStatus, window: &ScheduleWindow, now: NaiveDateTime) -> EventStatus {
    if current == EventStatus::Cancelled {
        return current;
    }

    if window.completes_automatically && window.is_over(now) {
        return EventStatus::Completed;
    }

    if current == EventStatus::Upcoming && window.is_open(now) {
        return EventStatus::Ongoing;
    }

    current
}

/// Wall-clock time of the venue, which is where dates and start times are expressed.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn derive_show_status(show: &Show, now: NaiveDateTime) -> EventStatus {
    next_status(show.status, &ScheduleWindow::for_show(show), now)
}

pub fn derive_class_status(class: &CompetitionClass, now: NaiveDateTime) -> EventStatus {
    next_status(class.status, &ScheduleWindow::for_class(class), now)
}
