use start_page::{logging, Collaborators, Dashboard, Moment, Settings};
use std::path::Path;
use std::time::{Duration, Instant};

/// Upper bound on a single sleep so the loop notices clock jumps.
const MAX_IDLE: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(
        settings.debug_logging,
        settings.log_file.as_deref().map(Path::new),
    );

    let store = settings.open_store();
    let now = Moment::now();
    let mut dashboard = Dashboard::open(store, settings, Collaborators::headless(), &now);
    dashboard.start(&now);

    loop {
        dashboard.tick(&Moment::now());
        let wait = dashboard
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(MAX_IDLE)
            .min(MAX_IDLE);
        std::thread::sleep(wait);
    }
}
