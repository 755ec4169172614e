//! Film result rendering.

use std::io::{self, Write};

use film_finder_core::{FilmRow, RetryHint, Row};
use film_finder_history::{AuditRecord, ResultStatus, TopQuery};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

const RULE: &str = "------------------------------";

/// Print one page of film rows to stdout. Used as the paginator's page
/// renderer.
pub(crate) fn render_films(rows: &[Row], hint: Option<RetryHint>) {
    if let Err(e) = write_films(&mut io::stdout().lock(), rows, hint) {
        log::warn!("Failed to write results: {}", e);
    }
}

/// Write film rows. Actor searches carry a single actor per row, so the
/// label is singular.
pub(crate) fn write_films(
    out: &mut impl Write,
    rows: &[Row],
    hint: Option<RetryHint>,
) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    for row in rows {
        let Some(film) = FilmRow::from_row(row) else {
            log::debug!("Skipping malformed row: {:?}", row);
            continue;
        };
        writeln!(
            out,
            "{} {}",
            "Title --->".if_supports_color(Stdout, |t| t.cyan()),
            film.title.if_supports_color(Stdout, |t| t.bold()),
        )?;
        writeln!(
            out,
            "{} {}",
            "Year  --->".if_supports_color(Stdout, |t| t.magenta()),
            film.release_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        )?;
        writeln!(
            out,
            "{} {}",
            "Genre --->".if_supports_color(Stdout, |t| t.blue()),
            film.genre.as_deref().unwrap_or("unknown"),
        )?;
        if !film.actors.is_empty() {
            let label = if hint == Some(RetryHint::Actor) {
                "Actor:"
            } else {
                "Actors:"
            };
            writeln!(out, "{}", label)?;
            for actor in &film.actors {
                writeln!(
                    out,
                    "\t> {}",
                    actor.if_supports_color(Stdout, |t| t.bright_cyan())
                )?;
            }
        }
        writeln!(out, "{}", RULE)?;
    }
    Ok(())
}

/// Print one audit record: timestamp, outcome, search and the query text.
pub(crate) fn print_record(
    out: &mut impl Write,
    index: usize,
    record: &AuditRecord,
) -> io::Result<()> {
    let status = match record.result {
        ResultStatus::Success => record
            .result
            .to_string()
            .if_supports_color(Stdout, |t| t.green())
            .to_string(),
        ResultStatus::Failure => record
            .result
            .to_string()
            .if_supports_color(Stdout, |t| t.red())
            .to_string(),
    };
    writeln!(
        out,
        "{:>3}. {} {}",
        index,
        record
            .time
            .format("%Y-%m-%d %H:%M:%S")
            .if_supports_color(Stdout, |t| t.dimmed()),
        status,
    )?;
    if let (Some(key), Some(value)) = (&record.search_key, &record.search_value) {
        writeln!(
            out,
            "     {} {}",
            format!("{}:", key).if_supports_color(Stdout, |t| t.cyan()),
            value,
        )?;
    }
    for line in record.query.lines() {
        writeln!(out, "       {}", line)?;
    }
    Ok(())
}

/// Print ranked search values.
pub(crate) fn print_top_queries(out: &mut impl Write, top: &[TopQuery]) -> io::Result<()> {
    if top.is_empty() {
        writeln!(out, "No searches with a recorded value yet.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        "Top searches".if_supports_color(Stdout, |t| t.bold()),
    )?;
    for (i, entry) in top.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} {} {}",
            i + 1,
            format!("{}:", entry.search_key).if_supports_color(Stdout, |t| t.cyan()),
            entry.search_value,
            format!("({} times)", entry.frequency).if_supports_color(Stdout, |t| t.dimmed()),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use film_finder_core::SqlValue;

    use super::*;

    fn plain(bytes: Vec<u8>) -> String {
        String::from_utf8(strip_ansi_escapes::strip(bytes)).unwrap()
    }

    fn film_row(actors: &str) -> Row {
        vec![
            SqlValue::from("ALIEN CENTER"),
            SqlValue::from(2004),
            SqlValue::from("Horror"),
            SqlValue::from(actors),
        ]
    }

    #[test]
    fn actor_searches_use_singular_label() {
        let mut out = Vec::new();
        write_films(&mut out, &[film_row("Penelope Guiness")], Some(RetryHint::Actor)).unwrap();
        let text = plain(out);
        assert!(text.contains("Title ---> ALIEN CENTER"));
        assert!(text.contains("Year  ---> 2004"));
        assert!(text.contains("\nActor:\n\t> Penelope Guiness\n"));
    }

    #[test]
    fn other_searches_list_actors() {
        let mut out = Vec::new();
        write_films(&mut out, &[film_row("Ed Chase, Nick Wahlberg")], None).unwrap();
        let text = plain(out);
        assert!(text.contains("\nActors:\n\t> Ed Chase\n\t> Nick Wahlberg\n"));
    }

    #[test]
    fn top_queries_are_numbered() {
        let top = vec![
            TopQuery {
                search_key: "Genre".to_string(),
                search_value: "Drama".to_string(),
                frequency: 4,
            },
            TopQuery {
                search_key: "Genre".to_string(),
                search_value: "Comedy".to_string(),
                frequency: 3,
            },
        ];
        let mut out = Vec::new();
        print_top_queries(&mut out, &top).unwrap();
        assert_eq!(
            plain(out),
            "Top searches\n  1. Genre: Drama (4 times)\n  2. Genre: Comedy (3 times)\n"
        );
    }
}
