//! Small demo catalog for first runs and tests.

use rusqlite::{Connection, params};

use crate::schema::SchemaError;

const FILMS: &[(&str, i64, &str, &[(&str, &str)])] = &[
    ("ACADEMY DINOSAUR", 2006, "Documentary", &[("PENELOPE", "GUINESS"), ("CHRISTIAN", "GABLE")]),
    ("ACE GOLDFINGER", 2006, "Horror", &[("BOB", "FAWCETT"), ("MINNIE", "ZELLWEGER")]),
    ("ADAPTATION HOLES", 2004, "Documentary", &[("NICK", "WAHLBERG"), ("BOB", "FAWCETT")]),
    ("AFFAIR PREJUDICE", 2001, "Horror", &[("JODIE", "DEGENERES"), ("SCARLETT", "DAMON")]),
    ("AGENT TRUMAN", 1999, "Foreign", &[("KIRSTEN", "PALTROW"), ("SANDRA", "KILMER")]),
    ("AIRPLANE SIERRA", 1999, "Comedy", &[("JIM", "MOSTEL"), ("RICHARD", "PENN")]),
    ("AIRPORT POLLOCK", 2003, "Horror", &[("FAY", "KILMER"), ("GENE", "WILLIS")]),
    ("ALABAMA DEVIL", 2006, "Horror", &[("CHRISTIAN", "GABLE"), ("ELVIS", "MARX")]),
    ("ALADDIN CALENDAR", 2002, "Sports", &[("ALEC", "WAYNE"), ("JUDY", "DEAN")]),
    ("ALAMO VIDEOTAPE", 2000, "Family", &[("SANDRA", "PECK"), ("PENELOPE", "GUINESS")]),
    ("ALASKA PHANTOM", 2000, "Music", &[("VAL", "BOLGER"), ("BURT", "POSEY")]),
    ("ALI FOREVER", 2005, "Horror", &[("ED", "CHASE"), ("NICK", "WAHLBERG")]),
    ("ALIEN CENTER", 1998, "Sci-Fi", &[("KIRSTEN", "PALTROW"), ("ED", "CHASE")]),
    ("ALLEY EVOLUTION", 2001, "Foreign", &[("SANDRA", "KILMER")]),
    ("ALONE TRIP", 2004, "Music", &[("ELVIS", "MARX"), ("JUDY", "DEAN")]),
    ("AMADEUS HOLY", 2006, "Action", &[("RICHARD", "PENN"), ("FAY", "KILMER")]),
    ("AMELIE HELLFIGHTERS", 1997, "Music", &[("GENE", "WILLIS")]),
    ("AMERICAN CIRCUS", 2006, "Action", &[("ALEC", "WAYNE"), ("MINNIE", "ZELLWEGER")]),
    ("AMISTAD MIDSUMMER", 2002, "Drama", &[("JODIE", "DEGENERES"), ("BURT", "POSEY")]),
    ("ANACONDA CONFESSIONS", 2003, "Animation", &[("VAL", "BOLGER"), ("SCARLETT", "DAMON")]),
];

/// Insert the demo films, actors and genres. Idempotent per title.
///
/// Returns the number of films inserted.
pub fn seed_demo(conn: &Connection) -> Result<usize, SchemaError> {
    let mut inserted = 0;
    for (title, year, genre, cast) in FILMS {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM film WHERE title = ?1)",
            params![title],
            |row| row.get(0),
        )?;
        if exists {
            continue;
        }

        conn.execute(
            "INSERT INTO film (title, release_year) VALUES (?1, ?2)",
            params![title, year],
        )?;
        let film_id = conn.last_insert_rowid();

        conn.execute(
            "INSERT OR IGNORE INTO category (name) VALUES (?1)",
            params![genre],
        )?;
        let category_id: i64 = conn.query_row(
            "SELECT category_id FROM category WHERE name = ?1",
            params![genre],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO film_category (film_id, category_id) VALUES (?1, ?2)",
            params![film_id, category_id],
        )?;

        for (first, last) in cast.iter() {
            let actor_id = match conn.query_row(
                "SELECT actor_id FROM actor WHERE first_name = ?1 AND last_name = ?2",
                params![first, last],
                |row| row.get::<_, i64>(0),
            ) {
                Ok(id) => id,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    conn.execute(
                        "INSERT INTO actor (first_name, last_name) VALUES (?1, ?2)",
                        params![first, last],
                    )?;
                    conn.last_insert_rowid()
                }
                Err(e) => return Err(e.into()),
            };
            conn.execute(
                "INSERT INTO film_actor (actor_id, film_id) VALUES (?1, ?2)",
                params![actor_id, film_id],
            )?;
        }
        inserted += 1;
    }
    Ok(inserted)
}
