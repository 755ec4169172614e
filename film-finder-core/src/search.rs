//! Structured search requests, one variant per query family.
//!
//! Each request is validated when constructed and knows how to produce its
//! template, bound parameters and the key/value pair recorded in history.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::scaffold::{ACTORS_TABLE_CTE, MAIN_TABLE_CTE};
use crate::template::QueryTemplate;
use crate::value::ParamMap;

/// Which re-prompt flow the caller should offer when a search finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryHint {
    Actor,
    Title,
}

/// A single year or an inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    Single(i64),
    Range { from: i64, to: i64 },
}

impl YearFilter {
    pub fn range(from: i64, to: i64) -> Result<Self, SearchError> {
        if from >= to {
            return Err(SearchError::InvalidRange { from, to });
        }
        Ok(Self::Range { from, to })
    }
}

/// A validated film search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmSearch {
    Title(String),
    Year(YearFilter),
    Genre(String),
    GenreYear { genre: String, years: YearFilter },
    Actor(String),
}

/// Everything needed to execute and log one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub template: QueryTemplate,
    pub params: ParamMap,
    pub search_key: String,
    pub search_value: String,
    pub retry: Option<RetryHint>,
}

fn non_empty(text: &str) -> Result<String, SearchError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyInput);
    }
    Ok(trimmed.to_string())
}

impl FilmSearch {
    pub fn title(text: &str) -> Result<Self, SearchError> {
        Ok(Self::Title(non_empty(text)?))
    }

    pub fn year(year: i64) -> Self {
        Self::Year(YearFilter::Single(year))
    }

    pub fn year_range(from: i64, to: i64) -> Result<Self, SearchError> {
        Ok(Self::Year(YearFilter::range(from, to)?))
    }

    pub fn genre(genre: &str) -> Result<Self, SearchError> {
        Ok(Self::Genre(non_empty(genre)?))
    }

    pub fn genre_year(genre: &str, years: YearFilter) -> Result<Self, SearchError> {
        Ok(Self::GenreYear {
            genre: non_empty(genre)?,
            years,
        })
    }

    pub fn actor(name: &str) -> Result<Self, SearchError> {
        let name = non_empty(name)?;
        if name.chars().all(|c| c.is_ascii_digit()) {
            return Err(SearchError::NumericName(name));
        }
        Ok(Self::Actor(name))
    }

    /// Build the template, parameters and history metadata for this search.
    pub fn query(&self) -> SearchQuery {
        match self {
            FilmSearch::Title(text) => SearchQuery {
                template: QueryTemplate::new(format!(
                    "{MAIN_TABLE_CTE}
                SELECT
                    *
                FROM
                    main_table
                WHERE title = %(where)s OR title LIKE %(like)s
                ORDER BY title;"
                )),
                params: ParamMap::new()
                    .with("where", text.as_str())
                    .with("like", format!("%{}%", text)),
                search_key: "Title".to_string(),
                search_value: format!("{} or like %{}%", text, text),
                retry: Some(RetryHint::Title),
            },
            FilmSearch::Year(YearFilter::Single(year)) => SearchQuery {
                template: QueryTemplate::new(format!(
                    "{MAIN_TABLE_CTE}
                SELECT
                    *
                FROM
                    main_table
                WHERE
                    release_year = %(year)s
                ORDER BY title;"
                )),
                params: ParamMap::new().with("year", *year),
                search_key: "Year".to_string(),
                search_value: year.to_string(),
                retry: None,
            },
            FilmSearch::Year(YearFilter::Range { from, to }) => SearchQuery {
                template: QueryTemplate::new(format!(
                    "{MAIN_TABLE_CTE}
                SELECT
                    *
                FROM
                    main_table
                WHERE
                    release_year BETWEEN %(year_1)s AND %(year_2)s
                ORDER BY release_year ASC, title;"
                )),
                params: ParamMap::new().with("year_1", *from).with("year_2", *to),
                search_key: "Range of years".to_string(),
                search_value: format!("between {} and {}", from, to),
                retry: None,
            },
            FilmSearch::Genre(genre) => SearchQuery {
                template: QueryTemplate::new(format!(
                    "{MAIN_TABLE_CTE}
                SELECT
                    *
                FROM
                    main_table
                WHERE
                    genre = %(genre)s
                ORDER BY title;"
                )),
                params: ParamMap::new().with("genre", genre.as_str()),
                search_key: "Genre".to_string(),
                search_value: genre.clone(),
                retry: None,
            },
            FilmSearch::GenreYear { genre, years } => {
                let (year_clause, params, key, value) = match years {
                    YearFilter::Single(year) => (
                        "AND release_year = %(year_1)s",
                        ParamMap::new()
                            .with("genre", genre.as_str())
                            .with("year_1", *year),
                        "year and genre",
                        format!("{} and {}", year, genre),
                    ),
                    YearFilter::Range { from, to } => (
                        "AND release_year BETWEEN %(year_1)s AND %(year_2)s",
                        ParamMap::new()
                            .with("genre", genre.as_str())
                            .with("year_1", *from)
                            .with("year_2", *to),
                        "range of year and genre",
                        format!("between {} and {}, {}", from, to, genre),
                    ),
                };
                SearchQuery {
                    template: QueryTemplate::new(format!(
                        "{MAIN_TABLE_CTE}
                    SELECT
                        *
                    FROM
                        main_table
                    WHERE
                        genre = %(genre)s
                        {year_clause}
                    ORDER BY release_year ASC, title;"
                    )),
                    params,
                    search_key: key.to_string(),
                    search_value: value,
                    retry: None,
                }
            }
            FilmSearch::Actor(name) => SearchQuery {
                template: QueryTemplate::new(format!(
                    "{ACTORS_TABLE_CTE}
                SELECT
                    *
                FROM
                    actors_table
                WHERE
                    Actor LIKE %(like)s
                ORDER BY Actor, title;"
                )),
                params: ParamMap::new().with("like", format!("{}%", name)),
                search_key: "Actor".to_string(),
                search_value: format!("like %{}%", name),
                retry: Some(RetryHint::Actor),
            },
        }
    }
}

/// Distinct genres, for the genre picker. Not logged.
pub fn genres_query() -> QueryTemplate {
    QueryTemplate::new(format!(
        "{MAIN_TABLE_CTE}
                SELECT
                    DISTINCT genre
                FROM
                    main_table
                WHERE genre IS NOT NULL
                ORDER BY genre;"
    ))
}

/// Earliest and latest release years in the catalog. Not logged.
pub fn year_bounds_query() -> QueryTemplate {
    QueryTemplate::new(format!(
        "{MAIN_TABLE_CTE}
                SELECT
                    MIN(release_year), MAX(release_year)
                FROM
                    main_table;"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_binds_exactly_its_placeholders() {
        let searches = vec![
            FilmSearch::title("alien").unwrap(),
            FilmSearch::year(1999),
            FilmSearch::year_range(1990, 2000).unwrap(),
            FilmSearch::genre("Drama").unwrap(),
            FilmSearch::genre_year("Drama", YearFilter::Single(2006)).unwrap(),
            FilmSearch::genre_year("Drama", YearFilter::range(2000, 2006).unwrap()).unwrap(),
            FilmSearch::actor("Penelope").unwrap(),
        ];
        for search in searches {
            let q = search.query();
            assert!(q.template.check_params(&q.params).is_ok(), "{:?}", search);
        }
    }

    #[test]
    fn title_search_metadata() {
        let q = FilmSearch::title("  alien ").unwrap().query();
        assert_eq!(q.search_key, "Title");
        assert_eq!(q.search_value, "alien or like %alien%");
        assert_eq!(q.retry, Some(RetryHint::Title));
        assert_eq!(q.params.get("like").unwrap().as_text(), Some("%alien%"));
    }

    #[test]
    fn actor_search_rejects_numbers() {
        assert_eq!(
            FilmSearch::actor("42"),
            Err(SearchError::NumericName("42".to_string()))
        );
        assert_eq!(FilmSearch::actor("  "), Err(SearchError::EmptyInput));
    }

    #[test]
    fn year_range_must_increase() {
        assert_eq!(
            FilmSearch::year_range(2000, 2000),
            Err(SearchError::InvalidRange { from: 2000, to: 2000 })
        );
    }

    #[test]
    fn genre_year_single_uses_one_year_param() {
        let q = FilmSearch::genre_year("Comedy", YearFilter::Single(2001))
            .unwrap()
            .query();
        assert_eq!(q.search_key, "year and genre");
        assert_eq!(q.search_value, "2001 and Comedy");
        assert!(!q.params.contains("year_2"));
    }
}
