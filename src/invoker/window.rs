use std::time::Duration;

use jiff::Zoned;

use crate::config::ScheduleConfig;

/// Local hours in which the polling invoker may send, `[start_hour, end_hour)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryWindow {
    start_hour: u8,
    end_hour: u8,
}

impl DeliveryWindow {
    pub fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn from_schedule(schedule: &ScheduleConfig) -> Self {
        Self::new(schedule.start_hour, schedule.end_hour)
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    pub fn contains_hour(&self, hour: u8) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }

    pub fn contains(&self, now: &Zoned) -> bool {
        u8::try_from(now.hour()).is_ok_and(|hour| self.contains_hour(hour))
    }

    /// `start_hour:00` on the calendar day after `now`, in the same time zone
    ///
    /// This is tomorrow even when `now` is before today's start.
    pub fn next_start(&self, now: &Zoned) -> Result<Zoned, jiff::Error> {
        let hour = self.start_hour.min(23) as i8;
        now.date()
            .tomorrow()?
            .at(hour, 0, 0, 0)
            .to_zoned(now.time_zone().clone())
    }

    pub fn until_next_start(&self, now: &Zoned) -> Result<Duration, jiff::Error> {
        let next = self.next_start(now)?;
        Duration::try_from(next.duration_since(now))
    }
}
