//! Parsing of free-form menu input.

use film_finder_core::YearFilter;

/// Parse `1999`, `1998-2003` or `1998 2003`.
pub(crate) fn parse_years(input: &str) -> Result<YearFilter, String> {
    let parts: Vec<&str> = input
        .split(|c: char| c == '-' || c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect();
    let year = |s: &str| {
        s.parse::<i64>()
            .map_err(|_| format!("'{}' is not a year.", s))
    };
    match parts.as_slice() {
        [single] => Ok(YearFilter::Single(year(*single)?)),
        [from, to] => {
            YearFilter::range(year(*from)?, year(*to)?).map_err(|e| e.to_string())
        }
        [] => Err("The field can't be empty.".to_string()),
        _ => Err("Enter one year or two years separated by '-'.".to_string()),
    }
}

/// Reject years outside the catalog's `[min, max]`.
pub(crate) fn check_year_bounds(years: YearFilter, bounds: Option<(i64, i64)>) -> Result<(), String> {
    let Some((min, max)) = bounds else {
        return Ok(());
    };
    let (from, to) = match years {
        YearFilter::Single(y) => (y, y),
        YearFilter::Range { from, to } => (from, to),
    };
    if from < min || to > max {
        return Err(format!("Films in the catalog span {} to {}.", min, max));
    }
    Ok(())
}

/// A yes/no answer; anything else is `None`.
pub(crate) fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Pick a genre by its number in `genres` or by name (case-insensitive).
pub(crate) fn pick_genre<'g>(input: &str, genres: &'g [String]) -> Option<&'g str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| genres.get(i)).map(String::as_str);
    }
    genres
        .iter()
        .find(|g| g.eq_ignore_ascii_case(input))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years() {
        assert_eq!(parse_years("1999"), Ok(YearFilter::Single(1999)));
        assert_eq!(
            parse_years("1998 - 2003"),
            Ok(YearFilter::Range {
                from: 1998,
                to: 2003
            })
        );
        assert!(parse_years("2003-1998").is_err());
        assert!(parse_years("abc").is_err());
        assert!(parse_years("").is_err());
        assert!(parse_years("1 2 3").is_err());
    }

    #[test]
    fn bounds() {
        let bounds = Some((1997, 2006));
        assert!(check_year_bounds(YearFilter::Single(2000), bounds).is_ok());
        assert!(check_year_bounds(YearFilter::Single(1990), bounds).is_err());
        assert!(
            check_year_bounds(YearFilter::Range { from: 2000, to: 2010 }, bounds).is_err()
        );
        assert!(check_year_bounds(YearFilter::Single(1900), None).is_ok());
    }

    #[test]
    fn genres() {
        let genres = vec!["Action".to_string(), "Drama".to_string()];
        assert_eq!(pick_genre("2", &genres), Some("Drama"));
        assert_eq!(pick_genre("action", &genres), Some("Action"));
        assert_eq!(pick_genre("0", &genres), None);
        assert_eq!(pick_genre("3", &genres), None);
        assert_eq!(pick_genre("Horror", &genres), None);
    }

    #[test]
    fn yes_no() {
        assert_eq!(parse_yes_no("Y"), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }
}
