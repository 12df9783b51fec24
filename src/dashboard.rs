//! The dashboard owns every widget, the store handle and the refresh
//! scheduler, and turns user intents and timer ticks into widget changes.

use crate::clock::{format_datetime, Moment};
use crate::error::WidgetError;
use crate::scheduler::PeriodicRefreshScheduler;
use crate::settings::Settings;
use crate::store::StoreHandle;
use crate::widgets::search::search_url;
use crate::widgets::weather::DemoWeatherProvider;
use crate::widgets::{
    ActiveCountdown, CalendarWidget, CountdownWidget, ItemId, LinkItem, LinkList, MemoWidget,
    MonthView, Notification, PageChrome, PomodoroTimer, SearchEngine, TaskItem, TaskList,
    WeatherProvider, WeatherStatus, WeatherWidget,
};
use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POMODORO_TICK: Duration = Duration::from_secs(1);

/// Work items driven by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefreshJob {
    Clock,
    Weather,
    Countdowns,
    PomodoroTick,
    MemoAutosave,
}

/// Part of the page the presentation layer should redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Chrome,
    Clock,
    Weather,
    Countdowns,
    Calendar,
    Pomodoro,
    Links,
    Tasks,
    Memo,
}

/// A user request coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddCountdown { title: String, target: String },
    DeleteCountdown(usize),
    AddTask(String),
    ToggleTask { id: ItemId, completed: bool },
    RemoveTasks(Vec<ItemId>),
    AddLink { name: String, url: String },
    RemoveLinks(Vec<ItemId>),
    TogglePomodoro,
    ResetPomodoro,
    EditMemo(String),
    SaveMemo,
    ToggleDarkMode,
    ToggleMenu,
    PageClick { inside_menu: bool, on_switch: bool },
    PreviousMonth,
    NextMonth,
    Search { engine: Option<SearchEngine>, query: String },
    SetWeatherApiKey(Option<String>),
}

/// Read-only view handed to the presentation layer on every render.
pub struct DashboardView<'a> {
    pub chrome: &'a PageChrome,
    pub clock: &'a str,
    pub weather: &'a WeatherStatus,
    pub countdowns: &'a [ActiveCountdown],
    pub month: Option<&'a MonthView>,
    pub pomodoro: &'a PomodoroTimer,
    pub links: &'a LinkList,
    pub tasks: &'a TaskList,
    pub memo: &'a MemoWidget,
}

/// Renders widget state and forwards user input as [`Intent`]s.
pub trait PresentationAdapter {
    fn render(&mut self, surface: Surface, view: &DashboardView<'_>);

    /// Open a URL in a new tab.
    fn open_url(&mut self, _url: &str) {}
}

/// Receives pomodoro notifications. Must not fail; a sink without
/// permission to show anything simply drops the message.
pub trait NotificationSink {
    fn notify(&self, notification: &Notification);
}

/// Presentation adapter that draws nothing.
#[derive(Debug, Default)]
pub struct HeadlessPresenter;

impl PresentationAdapter for HeadlessPresenter {
    fn render(&mut self, _surface: Surface, _view: &DashboardView<'_>) {}
}

/// Notification sink writing to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
    }
}

pub struct Collaborators {
    pub presenter: Box<dyn PresentationAdapter>,
    pub notifier: Box<dyn NotificationSink>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl Collaborators {
    /// No rendering, notifications to the log and demo weather data.
    pub fn headless() -> Self {
        Self {
            presenter: Box::new(HeadlessPresenter),
            notifier: Box::new(LogNotifier),
            weather: Arc::new(DemoWeatherProvider),
        }
    }
}

pub struct Dashboard {
    settings: Settings,
    scheduler: PeriodicRefreshScheduler<RefreshJob>,
    chrome: PageChrome,
    clock_text: String,
    weather: WeatherWidget,
    countdowns: CountdownWidget,
    active_countdowns: Vec<ActiveCountdown>,
    calendar: CalendarWidget,
    month: Option<MonthView>,
    pomodoro: PomodoroTimer,
    links: LinkList,
    tasks: TaskList,
    memo: MemoWidget,
    presenter: Box<dyn PresentationAdapter>,
    notifier: Box<dyn NotificationSink>,
    weather_provider: Arc<dyn WeatherProvider>,
}

impl Dashboard {
    /// Load every widget from `store`. Nothing is scheduled until
    /// [`Dashboard::start`] is called.
    pub fn open(
        store: StoreHandle,
        settings: Settings,
        collaborators: Collaborators,
        moment: &Moment,
    ) -> Self {
        let today = moment.wall.with_timezone(&Local).date_naive();
        let calendar = CalendarWidget::new(today);
        let mut countdowns = CountdownWidget::load(store.clone());
        let active_countdowns = countdowns.refresh(moment.wall);
        Self {
            settings,
            scheduler: PeriodicRefreshScheduler::new(),
            chrome: PageChrome::load(store.clone()),
            clock_text: format_datetime(&moment.wall.with_timezone(&Local)),
            weather: WeatherWidget::load(store.clone()),
            countdowns,
            active_countdowns,
            month: calendar.view(today),
            calendar,
            pomodoro: PomodoroTimer::load(store.clone()),
            links: LinkList::load_links(store.clone()),
            tasks: TaskList::load_tasks(store.clone()),
            memo: MemoWidget::load(store),
            presenter: collaborators.presenter,
            notifier: collaborators.notifier,
            weather_provider: collaborators.weather,
        }
    }

    /// Subscribe the time driven widgets, start the first weather fetch and
    /// draw the whole page.
    pub fn start(&mut self, moment: &Moment) {
        let now = moment.instant;
        self.scheduler
            .every(RefreshJob::Clock, self.settings.clock_interval(), now);
        self.scheduler
            .every(RefreshJob::Weather, self.settings.weather_interval(), now);
        self.scheduler
            .every(RefreshJob::Countdowns, self.settings.countdown_interval(), now);
        self.weather.request(&self.weather_provider);
        tracing::info!("dashboard started");
        for surface in [
            Surface::Chrome,
            Surface::Clock,
            Surface::Weather,
            Surface::Countdowns,
            Surface::Calendar,
            Surface::Pomodoro,
            Surface::Links,
            Surface::Tasks,
            Surface::Memo,
        ] {
            self.render(surface);
        }
    }

    /// Apply a finished weather fetch, then run every scheduler job due at
    /// `moment`. Returns the jobs that ran.
    pub fn tick(&mut self, moment: &Moment) -> Vec<RefreshJob> {
        if self.weather.poll() {
            self.render(Surface::Weather);
        }
        let due = self.scheduler.due(moment.instant);
        for job in &due {
            self.run_job(*job, moment);
        }
        due
    }

    fn run_job(&mut self, job: RefreshJob, moment: &Moment) {
        match job {
            RefreshJob::Clock => {
                self.clock_text = format_datetime(&moment.wall.with_timezone(&Local));
                self.render(Surface::Clock);
            }
            RefreshJob::Weather => self.weather.request(&self.weather_provider),
            RefreshJob::Countdowns => self.refresh_countdowns(moment),
            RefreshJob::PomodoroTick => {
                if let Some(event) = self.pomodoro.tick() {
                    self.scheduler.cancel(RefreshJob::PomodoroTick);
                    self.notifier.notify(&event.notification());
                }
                self.render(Surface::Pomodoro);
            }
            RefreshJob::MemoAutosave => {
                if let Err(e) = self.memo.save() {
                    tracing::error!("memo autosave failed: {e:#}");
                }
                self.render(Surface::Memo);
            }
        }
    }

    /// Apply `intent`. Validation failures leave every widget unchanged.
    pub fn handle(&mut self, intent: Intent, moment: &Moment) -> Result<(), WidgetError> {
        tracing::debug!(?intent, "handling intent");
        match intent {
            Intent::AddCountdown { title, target } => {
                self.countdowns.add(&title, &target, moment.wall)?;
                self.refresh_countdowns(moment);
            }
            Intent::DeleteCountdown(index) => {
                self.countdowns.delete_at(index)?;
                self.refresh_countdowns(moment);
            }
            Intent::AddTask(text) => {
                self.tasks.add(TaskItem::new(&text))?;
                self.render(Surface::Tasks);
            }
            Intent::ToggleTask { id, completed } => {
                self.tasks.toggle(id, completed)?;
                self.render(Surface::Tasks);
            }
            Intent::RemoveTasks(ids) => {
                self.tasks.remove_ids(&ids)?;
                self.render(Surface::Tasks);
            }
            Intent::AddLink { name, url } => {
                self.links.add(LinkItem::new(&name, &url))?;
                self.render(Surface::Links);
            }
            Intent::RemoveLinks(ids) => {
                self.links.remove_ids(&ids)?;
                self.render(Surface::Links);
            }
            Intent::TogglePomodoro => {
                if self.pomodoro.toggle() {
                    self.scheduler
                        .every(RefreshJob::PomodoroTick, POMODORO_TICK, moment.instant);
                } else {
                    self.scheduler.cancel(RefreshJob::PomodoroTick);
                }
                self.render(Surface::Pomodoro);
            }
            Intent::ResetPomodoro => {
                self.pomodoro.reset();
                self.scheduler.cancel(RefreshJob::PomodoroTick);
                self.render(Surface::Pomodoro);
            }
            Intent::EditMemo(text) => {
                self.memo.edit(text);
                self.scheduler.once(
                    RefreshJob::MemoAutosave,
                    self.settings.memo_autosave_delay(),
                    moment.instant,
                );
            }
            Intent::SaveMemo => {
                self.scheduler.cancel(RefreshJob::MemoAutosave);
                self.memo.save()?;
                self.render(Surface::Memo);
            }
            Intent::ToggleDarkMode => {
                self.chrome.toggle_dark_mode()?;
                self.render(Surface::Chrome);
            }
            Intent::ToggleMenu => {
                self.chrome.toggle_menu();
                self.render(Surface::Chrome);
            }
            Intent::PageClick {
                inside_menu,
                on_switch,
            } => {
                if self.chrome.page_click(inside_menu, on_switch) {
                    self.render(Surface::Chrome);
                }
            }
            Intent::PreviousMonth => {
                self.calendar.show_previous();
                self.refresh_month(moment);
            }
            Intent::NextMonth => {
                self.calendar.show_next();
                self.refresh_month(moment);
            }
            Intent::Search { engine, query } => {
                let engine = engine.unwrap_or(self.settings.search_engine);
                if let Some(url) = search_url(engine, &query) {
                    self.presenter.open_url(&url);
                }
            }
            Intent::SetWeatherApiKey(key) => {
                self.weather.set_api_key(key)?;
                self.weather.request(&self.weather_provider);
            }
        }
        Ok(())
    }

    fn refresh_countdowns(&mut self, moment: &Moment) {
        self.active_countdowns = self.countdowns.refresh(moment.wall);
        self.render(Surface::Countdowns);
    }

    fn refresh_month(&mut self, moment: &Moment) {
        let today = moment.wall.with_timezone(&Local).date_naive();
        self.month = self.calendar.view(today);
        self.render(Surface::Calendar);
    }

    fn render(&mut self, surface: Surface) {
        let view = DashboardView {
            chrome: &self.chrome,
            clock: &self.clock_text,
            weather: self.weather.status(),
            countdowns: &self.active_countdowns,
            month: self.month.as_ref(),
            pomodoro: &self.pomodoro,
            links: &self.links,
            tasks: &self.tasks,
            memo: &self.memo,
        };
        self.presenter.render(surface, &view);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    pub fn weather(&self) -> &WeatherWidget {
        &self.weather
    }

    pub fn countdowns(&self) -> &CountdownWidget {
        &self.countdowns
    }

    pub fn active_countdowns(&self) -> &[ActiveCountdown] {
        &self.active_countdowns
    }

    pub fn calendar(&self) -> &CalendarWidget {
        &self.calendar
    }

    pub fn month(&self) -> Option<&MonthView> {
        self.month.as_ref()
    }

    pub fn pomodoro(&self) -> &PomodoroTimer {
        &self.pomodoro
    }

    pub fn links(&self) -> &LinkList {
        &self.links
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn memo(&self) -> &MemoWidget {
        &self.memo
    }

    pub fn is_scheduled(&self, job: RefreshJob) -> bool {
        self.scheduler.is_scheduled(job)
    }

    /// Earliest instant at which [`Dashboard::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}
