mod aggregator;
mod calendar;
mod event_planner;

pub use aggregator::{AvailabilityAggregator, AvailabilityTable, BandAvailability, DateCoverage};
pub use calendar::{display_initials, CalendarDay, MonthCalendar};
pub use event_planner::{format_display_date, BookableDate, Event, EventDraft, EventPlanner};
