use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use film_finder_lib::Settings;

use crate::CliError;

/// Create the catalog schema, optionally loading the demo films.
pub(crate) fn run_catalog_init(settings: &Settings, demo: bool) -> Result<(), CliError> {
    let db_path = &settings.catalog_path;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = film_finder_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open catalog database: {}", e)))?;
    log::info!(
        "{} Catalog ready at {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    if demo {
        let added = film_finder_db::seed_demo(&conn)
            .map_err(|e| CliError::database(format!("Failed to load demo data: {}", e)))?;
        log::info!("  Added {} demo films", added);
    }
    Ok(())
}

pub(crate) fn run_catalog_stats(settings: &Settings) -> Result<(), CliError> {
    let db_path = &settings.catalog_path;

    if !db_path.exists() {
        log::warn!("No catalog database found at {}", db_path.display());
        log::info!("Run 'film-finder catalog init --demo' to create one.");
        return Ok(());
    }

    let conn = film_finder_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open catalog database: {}", e)))?;

    let stats = film_finder_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    log::info!(
        "{}",
        "Catalog Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Films:   {:>8}", stats.films);
    log::info!("  Actors:  {:>8}", stats.actors);
    log::info!("  Genres:  {:>8}", stats.genres);
    match (stats.min_year, stats.max_year) {
        (Some(min), Some(max)) => log::info!("  Years:   {:>8}", format!("{}-{}", min, max)),
        _ => log::info!("  Years:   {:>8}", "-"),
    }

    Ok(())
}
