use chrono::{DateTime, Local, TimeZone};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%B %d, %Y";

/// The two strings shown by the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockFace {
    pub time: String,
    pub date: String,
}

impl ClockFace {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: now.format(TIME_FORMAT).to_string(),
            date: now.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Refreshes the face on every clock tick. Missed ticks are not caught up:
/// each tick simply renders whatever time it is now.
pub struct ClockTicker {
    face: ClockFace,
    running: bool,
}

impl ClockTicker {
    /// Populated immediately so the first frame is never blank.
    pub fn new() -> Self {
        Self {
            face: ClockFace::at(&Local::now()),
            running: false,
        }
    }

    pub fn face(&self) -> &ClockFace {
        &self.face
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        if self.running {
            self.face = ClockFace::at(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn formats_24_hour_zero_padded() {
        let face = ClockFace::at(&at(2026, 3, 7, 9, 5, 3));
        assert_eq!(face.time, "09:05:03");
    }

    #[test]
    fn afternoon_is_not_twelve_hour() {
        let face = ClockFace::at(&at(2026, 3, 7, 21, 45, 0));
        assert_eq!(face.time, "21:45:00");
    }

    #[test]
    fn date_uses_full_month_name() {
        let face = ClockFace::at(&at(2026, 10, 18, 12, 0, 0));
        assert_eq!(face.date, "October 18, 2026");
    }

    #[test]
    fn single_digit_day_is_padded() {
        let face = ClockFace::at(&at(2026, 1, 5, 0, 0, 0));
        assert_eq!(face.date, "January 05, 2026");
    }

    #[test]
    fn formats_in_the_given_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let face = ClockFace::at(&now);
        assert_eq!(face.time, "23:59:59");
        assert_eq!(face.date, "December 31, 2026");
    }

    #[test]
    fn new_ticker_has_a_face_before_first_tick() {
        let ticker = ClockTicker::new();
        assert_eq!(ticker.face().time.len(), 8);
        assert!(!ticker.face().date.is_empty());
    }

    #[test]
    fn stopped_ticker_keeps_its_face() {
        let mut ticker = ClockTicker::new();
        let before = ticker.face().clone();
        ticker.tick(&at(1999, 1, 1, 0, 0, 0));
        assert_eq!(ticker.face(), &before);
    }

    #[test]
    fn running_ticker_renders_now() {
        let mut ticker = ClockTicker::new();
        ticker.start();
        ticker.tick(&at(2026, 6, 1, 7, 8, 9));
        assert_eq!(ticker.face().time, "07:08:09");
        assert_eq!(ticker.face().date, "June 01, 2026");
        ticker.stop();
        assert!(!ticker.is_running());
    }
}
