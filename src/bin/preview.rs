use std::time::Duration;

use facecam::{
    gui::Gui,
    preview::Preview,
    result::Result,
    setting::Setting,
    telemetry::{get_subscriber, init_subscriber, DEFAULT_FILTER},
};

fn main() -> Result<()> {
    init_subscriber(get_subscriber("preview", DEFAULT_FILTER, std::io::stderr))?;
    let setting = Setting::get()?;
    let config = &setting.config.preview;

    let mut preview = Preview::open(config)?;
    // a dead camera has to fail here, not inside the window loop
    preview.next_composite()?;

    Gui::new(
        config.title.clone(),
        Duration::from_millis(config.wait_ms),
        preview,
    )
    .run()
}
