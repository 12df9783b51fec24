pub mod clock;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod widget_state;
pub mod widgets;

pub use clock::Moment;
pub use dashboard::{
    Collaborators, Dashboard, DashboardView, Intent, NotificationSink, PresentationAdapter,
    RefreshJob, Surface,
};
pub use error::{ValidationError, WidgetError};
pub use settings::Settings;
pub use store::{JsonDirStore, KeyValueStore, MemoryStore, StoreHandle, StoreRead};
pub use widget_state::{LoadOrigin, WidgetState};
