pub mod calendar;
pub mod checklist;
pub mod chrome;
pub mod countdown;
pub mod links;
pub mod memo;
pub mod pomodoro;
pub mod search;
pub mod todo;
pub mod weather;

pub use calendar::{CalendarWidget, MonthView};
pub use checklist::{ChecklistItem, ChecklistWidget, ItemId};
pub use chrome::PageChrome;
pub use countdown::{ActiveCountdown, CountdownItem, CountdownWidget, Remaining};
pub use links::{LinkItem, LinkList};
pub use memo::MemoWidget;
pub use pomodoro::{Notification, Phase, PomodoroEvent, PomodoroTimer};
pub use search::SearchEngine;
pub use todo::{TaskItem, TaskList};
pub use weather::{WeatherProvider, WeatherSnapshot, WeatherStatus, WeatherWidget};
