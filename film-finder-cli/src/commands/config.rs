use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use film_finder_lib::{SettingSource, SettingSources, Settings};

/// Show resolved settings and where each came from.
pub(crate) fn run_config_show(settings: &Settings, sources: &SettingSources) {
    let path = film_finder_lib::settings_path();

    log::info!(
        "{}",
        "film-finder Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let fields: &[(&str, String, SettingSource)] = &[
        (
            "catalog_path",
            settings.catalog_path.display().to_string(),
            sources.catalog_path,
        ),
        (
            "accounts_path",
            settings.accounts_path.display().to_string(),
            sources.accounts_path,
        ),
        (
            "history_path",
            settings.history_path.display().to_string(),
            sources.history_path,
        ),
        (
            "last_query_dir",
            settings.last_query_dir.display().to_string(),
            sources.last_query_dir,
        ),
        (
            "history_capacity",
            settings.history_capacity.to_string(),
            sources.history_capacity,
        ),
        (
            "replay_enabled",
            settings.replay_enabled.to_string(),
            sources.replay_enabled,
        ),
    ];

    for (name, value, source) in fields {
        let source_str = format!("({})", source);
        log::info!(
            "  {} {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
            source_str.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", film_finder_lib::settings_path().display());
}
