//! Common table expressions every catalog query is built on.
//!
//! These prefixes are scaffolding: the rendered (audit) form of a query has
//! them stripped so history shows only the interesting part.

/// One row per film with genre and a comma-joined actor list.
pub const MAIN_TABLE_CTE: &str = "
WITH main_table AS
(
SELECT
    f.title,
    f.release_year,
    c.name AS genre,
    GROUP_CONCAT(a.first_name || ' ' || a.last_name, ', ') AS actors
FROM film f
JOIN film_actor fa USING(film_id)
JOIN actor a USING(actor_id)
LEFT JOIN film_category fc USING(film_id)
LEFT JOIN category c USING(category_id)
GROUP BY f.title, f.release_year, c.name
)
";

/// One row per (film, actor) pair.
pub const ACTORS_TABLE_CTE: &str = "
WITH actors_table AS
(
SELECT
    f.title,
    f.release_year,
    c.name AS genre,
    a.first_name || ' ' || a.last_name AS Actor
FROM film f
JOIN film_actor fa USING(film_id)
JOIN actor a USING(actor_id)
LEFT JOIN film_category fc USING(film_id)
LEFT JOIN category c USING(category_id)
)
";

/// Both canonical prefixes, checked in this order when stripping.
pub const CANONICAL_PREFIXES: [&str; 2] = [ACTORS_TABLE_CTE, MAIN_TABLE_CTE];

/// Remove the first canonical prefix found in `query`, if any.
pub fn strip_scaffold<'a>(query: &'a str, prefixes: &[&str]) -> std::borrow::Cow<'a, str> {
    for prefix in prefixes {
        if !prefix.is_empty() && query.contains(prefix) {
            return query.replace(prefix, "").into();
        }
    }
    query.into()
}
