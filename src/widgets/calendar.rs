//! Month grid for the calendar widget.
use crate::clock::weekday_label;
use chrono::{Datelike, NaiveDate, Weekday};

/// Number of cells in the grid: six weeks of seven days.
pub const GRID_CELLS: usize = 42;

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    /// `false` for the days borrowed from the previous or next month.
    pub in_month: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthView {
    /// Build the grid for `year`/`month`, starting on Sunday. Returns `None`
    /// for an invalid month.
    pub fn new(year: i32, month: u32, today: NaiveDate) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = days_in_month(year, month)?;
        let prev_last = first.pred_opt()?.day();
        let lead = first.weekday().num_days_from_sunday();

        let mut cells = Vec::with_capacity(GRID_CELLS);
        for i in (0..lead).rev() {
            cells.push(DayCell {
                day: prev_last - i,
                in_month: false,
                is_today: false,
            });
        }
        for day in 1..=last {
            cells.push(DayCell {
                day,
                in_month: true,
                is_today: today.year() == year && today.month() == month && today.day() == day,
            });
        }
        let trailing = GRID_CELLS.saturating_sub(cells.len());
        for day in 1..=trailing as u32 {
            cells.push(DayCell {
                day,
                in_month: false,
                is_today: false,
            });
        }
        Some(Self { year, month, cells })
    }

    pub fn title(&self) -> String {
        format!("{}年{}月", self.year, self.month)
    }

    pub fn weekday_headers() -> [&'static str; 7] {
        WEEK.map(weekday_label)
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}

/// Which month the calendar shows. Session local, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWidget {
    year: i32,
    month: u32,
}

impl CalendarWidget {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn show_previous(&mut self) {
        if self.month == 1 {
            self.year -= 1;
            self.month = 12;
        } else {
            self.month -= 1;
        }
    }

    pub fn show_next(&mut self) {
        if self.month == 12 {
            self.year += 1;
            self.month = 1;
        } else {
            self.month += 1;
        }
    }

    pub fn view(&self, today: NaiveDate) -> Option<MonthView> {
        MonthView::new(self.year, self.month, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_has_leading_and_trailing_days() {
        // March 2025 starts on a Saturday.
        let view = MonthView::new(2025, 3, date(2025, 3, 14)).unwrap();
        assert_eq!(view.cells.len(), GRID_CELLS);
        assert_eq!(view.cells[0], DayCell { day: 23, in_month: false, is_today: false });
        assert_eq!(view.cells[5].day, 28);
        assert_eq!(view.cells[6], DayCell { day: 1, in_month: true, is_today: false });
        assert!(view.cells[19].is_today);
        assert_eq!(view.cells[19].day, 14);
        assert_eq!(view.cells[36].day, 31);
        assert_eq!(view.cells[37], DayCell { day: 1, in_month: false, is_today: false });
        assert_eq!(view.title(), "2025年3月");
    }

    #[test]
    fn leap_february() {
        let view = MonthView::new(2024, 2, date(2025, 1, 1)).unwrap();
        assert_eq!(view.cells.iter().filter(|c| c.in_month).count(), 29);
        assert!(view.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn navigation_wraps_years() {
        let mut cal = CalendarWidget::new(date(2025, 1, 10));
        cal.show_previous();
        assert_eq!((cal.year(), cal.month()), (2024, 12));
        cal.show_next();
        cal.show_next();
        assert_eq!((cal.year(), cal.month()), (2025, 2));
    }

    #[test]
    fn headers_start_on_sunday() {
        assert_eq!(MonthView::weekday_headers(), ["日", "月", "火", "水", "木", "金", "土"]);
    }
}
