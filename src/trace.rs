use chrono::{Local, SecondsFormat};
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, time},
    prelude::*,
};
use yansi::Paint;

use crate::CONFIG;

pub fn init() {
    let is_color = CONFIG.log.style.is_color();
    if !is_color {
        yansi::disable();
    }

    let level = CONFIG.log.level.as_str();
    let filter = level.parse::<Targets>().unwrap_or_else(|err| {
        let msg = format!("invalid authgate log filter {level:?}: {err}");
        panic!("{}", msg.red().bold());
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_timer(LocalTime).with_ansi(is_color))
        .with(filter)
        .init();
}

struct LocalTime;

impl time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
        )
    }
}
