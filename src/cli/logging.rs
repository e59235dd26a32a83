//! Stderr logging for the `log` facade
//!
//! `simplelog` writes the records; the wrapper below keeps daybook's own
//! targets at the requested level and everything else at warn.

use log::Log;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

struct FilteredStderr {
    inner: Box<TermLogger>,
    max: LevelFilter,
}

impl FilteredStderr {
    fn new(max: LevelFilter) -> Self {
        let config = ConfigBuilder::new()
            .set_time_level(LevelFilter::Off)
            .set_thread_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Error)
            .build();

        Self {
            inner: TermLogger::new(max, config, TerminalMode::Stderr, ColorChoice::Auto),
            max,
        }
    }
}

impl log::Log for FilteredStderr {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if metadata.target().starts_with("daybook") {
            metadata.level() <= self.max
        } else {
            metadata.level() <= LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Installs the logger; debug output only with `--verbose`
pub fn init(verbose: bool) {
    let max = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // A second call (e.g. from tests) keeps the first logger
    if log::set_boxed_logger(Box::new(FilteredStderr::new(max))).is_ok() {
        log::set_max_level(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(target: &str, level: log::Level) -> log::Metadata<'_> {
        log::Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn filters_foreign_targets_to_warn() {
        let logger = FilteredStderr::new(LevelFilter::Debug);

        assert!(logger.enabled(&metadata("daybook::storage", log::Level::Debug)));
        assert!(!logger.enabled(&metadata("regex", log::Level::Debug)));
        assert!(logger.enabled(&metadata("regex", log::Level::Warn)));
    }

    #[test]
    fn quiet_mode_drops_debug() {
        let logger = FilteredStderr::new(LevelFilter::Warn);

        assert!(!logger.enabled(&metadata("daybook::domain", log::Level::Debug)));
        assert!(logger.enabled(&metadata("daybook::domain", log::Level::Warn)));
    }
}
