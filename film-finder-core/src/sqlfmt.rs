//! Deterministic SQL pretty-printer for audit and display text.
//!
//! Keywords are uppercased and every top-level clause starts on its own
//! line. Literals, quoted identifiers and plain identifiers keep their exact
//! text, so the output is a pure function of the input.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Space,
    Word,
    Literal,
    Comment,
    Punct,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: Kind,
    text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    None,
    Select,
    Filter,
    Other,
}

/// Continuation indent for select-list items, aligned under the first one.
const SELECT_INDENT: &str = "       ";
const FILTER_INDENT: &str = "  ";

const KEYWORDS: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "AVG", "BETWEEN", "BINARY", "BY", "CASE", "COUNT", "CREATE",
    "CROSS", "DELETE", "DESC", "DISTINCT", "ELSE", "END", "EXISTS", "FALSE", "FROM", "FULL",
    "GROUP", "HAVING", "IN", "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT",
    "MAX", "MIN", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "RIGHT", "SELECT",
    "SEPARATOR", "SET", "SUM", "TABLE", "THEN", "TRUE", "UNION", "UPDATE", "USING", "VALUES",
    "WHEN", "WHERE", "WITH", "YEAR",
];

const JOIN_PREFIXES: &[&str] = &["LEFT", "RIGHT", "INNER", "FULL", "CROSS", "OUTER"];

/// Pretty-print `sql`.
pub fn format(sql: &str) -> String {
    let tokens = tokenize(sql.trim());
    let mut out = String::with_capacity(sql.len());
    let mut depth = 0usize;
    let mut clause = Clause::None;
    let mut between = false;
    let mut gap = false;
    let mut fresh_line = true;
    let mut statement_ended = false;
    let mut prev_word: Option<String> = None;

    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == Kind::Space {
            gap = true;
            continue;
        }

        let upper = (tok.kind == Kind::Word).then(|| tok.text.to_ascii_uppercase());
        let word = upper.as_deref().unwrap_or("");
        let text: Cow<'_, str> = if is_keyword(word) {
            Cow::Borrowed(word)
        } else {
            Cow::Borrowed(tok.text)
        };

        if statement_ended {
            out.push_str("\n\n");
            statement_ended = false;
            clause = Clause::None;
        } else if depth == 0
            && !out.is_empty()
            && starts_clause(word, prev_word.as_deref(), next_word(&tokens, i).as_deref())
        {
            break_line(&mut out, "");
        } else if depth == 0
            && clause == Clause::Filter
            && (word == "OR" || (word == "AND" && !between))
        {
            break_line(&mut out, FILTER_INDENT);
        } else if gap && !fresh_line {
            out.push(' ');
        }
        out.push_str(&text);
        gap = false;
        fresh_line = false;

        match tok.kind {
            Kind::Word => {
                match word {
                    "SELECT" if depth == 0 => clause = Clause::Select,
                    "WHERE" | "HAVING" if depth == 0 => clause = Clause::Filter,
                    "FROM" | "GROUP" | "ORDER" | "LIMIT" | "JOIN" | "UNION" | "WITH"
                        if depth == 0 =>
                    {
                        clause = Clause::Other
                    }
                    "BETWEEN" => between = true,
                    "AND" if between => between = false,
                    _ => {}
                }
                prev_word = Some(word.to_string());
            }
            Kind::Punct => {
                match tok.text {
                    "(" => depth += 1,
                    ")" => depth = depth.saturating_sub(1),
                    "," if depth == 0 && clause == Clause::Select => {
                        out.push('\n');
                        out.push_str(SELECT_INDENT);
                        fresh_line = true;
                    }
                    ";" => {
                        statement_ended = true;
                        depth = 0;
                    }
                    _ => {}
                }
                prev_word = None;
            }
            Kind::Comment => {
                out.push('\n');
                fresh_line = true;
                prev_word = None;
            }
            Kind::Literal | Kind::Space => prev_word = None,
        }
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

fn is_keyword(word: &str) -> bool {
    !word.is_empty() && KEYWORDS.contains(&word)
}

fn starts_clause(word: &str, prev: Option<&str>, next: Option<&str>) -> bool {
    match word {
        "SELECT" | "FROM" | "WHERE" | "HAVING" | "LIMIT" | "UNION" => true,
        "GROUP" | "ORDER" => next == Some("BY"),
        "LEFT" | "RIGHT" | "INNER" | "FULL" | "CROSS" => {
            matches!(next, Some("JOIN") | Some("OUTER"))
        }
        "JOIN" => !prev.is_some_and(|p| JOIN_PREFIXES.contains(&p)),
        _ => false,
    }
}

fn next_word(tokens: &[Token<'_>], i: usize) -> Option<String> {
    tokens[i + 1..]
        .iter()
        .find(|t| t.kind != Kind::Space)
        .filter(|t| t.kind == Kind::Word)
        .map(|t| t.text.to_ascii_uppercase())
}

fn break_line(out: &mut String, indent: &str) {
    let len = out.trim_end_matches(' ').len();
    out.truncate(len);
    out.push('\n');
    out.push_str(indent);
}

fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = sql;
    while let Some(c) = rest.chars().next() {
        let (kind, len) = if c.is_whitespace() {
            (Kind::Space, prefix_len(rest, char::is_whitespace))
        } else if c == '\'' || c == '"' || c == '`' {
            (Kind::Literal, quoted_len(rest, c))
        } else if rest.starts_with("--") {
            (Kind::Comment, rest.find('\n').unwrap_or(rest.len()))
        } else if c.is_alphabetic() || c == '_' {
            (
                Kind::Word,
                prefix_len(rest, |c| c.is_alphanumeric() || c == '_' || c == '$'),
            )
        } else if c.is_ascii_digit() {
            (
                Kind::Literal,
                prefix_len(rest, |c| c.is_ascii_alphanumeric() || c == '.'),
            )
        } else if ["<=", ">=", "<>", "!=", "||", "::"]
            .iter()
            .any(|op| rest.starts_with(op))
        {
            (Kind::Punct, 2)
        } else {
            (Kind::Punct, c.len_utf8())
        };
        tokens.push(Token {
            kind,
            text: &rest[..len],
        });
        rest = &rest[len..];
    }
    tokens
}

fn prefix_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(i, _)| i)
}

/// Byte length of a quoted run starting at its opening quote. A doubled
/// quote is an escape. Rendered values are not escaped, so a quote directly
/// followed by a letter or digit (`O'Brien`) is taken as part of the value.
/// An unterminated run extends to the end.
fn quoted_len(s: &str, quote: char) -> usize {
    let mut chars = s.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            match chars.peek() {
                Some(&(_, next)) if next == quote => {
                    chars.next();
                    continue;
                }
                Some(&(_, next)) if next.is_alphanumeric() => continue,
                _ => return i + c.len_utf8(),
            }
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clause_stays_on_one_line() {
        assert_eq!(format("where year = 1999"), "WHERE YEAR = 1999");
    }

    #[test]
    fn clauses_break_and_filters_indent() {
        let sql = "select * from main_table where title = 'x' or title like '%x%';";
        assert_eq!(
            format(sql),
            "SELECT *\nFROM main_table\nWHERE title = 'x'\n  OR title LIKE '%x%';"
        );
    }

    #[test]
    fn between_and_stays_inline() {
        let sql = "SELECT * FROM main_table WHERE genre = 'Drama' AND release_year \
                   BETWEEN 1990 AND 2000 ORDER BY release_year ASC;";
        assert_eq!(
            format(sql),
            "SELECT *\nFROM main_table\nWHERE genre = 'Drama'\n  AND release_year BETWEEN 1990 AND 2000\nORDER BY release_year ASC;"
        );
    }

    #[test]
    fn select_list_is_aligned() {
        assert_eq!(
            format("SELECT title,release_year, genre FROM film"),
            "SELECT title,\n       release_year,\n       genre\nFROM film"
        );
    }

    #[test]
    fn literals_are_untouched() {
        assert_eq!(
            format("select * from t where name = 'select from where'"),
            "SELECT *\nFROM t\nWHERE name = 'select from where'"
        );
        // An apostrophe inside a value survives byte for byte.
        assert_eq!(
            format("WHERE Actor LIKE 'O'Brien%'"),
            "WHERE Actor LIKE 'O'Brien%'"
        );
    }

    #[test]
    fn apostrophe_does_not_swallow_following_clauses() {
        let sql = "select * from actors_table where Actor like 'O'Brien%'\n                order by Actor, title;";
        assert_eq!(
            format(sql),
            "SELECT *\nFROM actors_table\nWHERE Actor LIKE 'O'Brien%'\nORDER BY Actor, title;"
        );
        assert_eq!(
            format("WHERE title = 'Schindler's List' and release_year = 1993"),
            "WHERE title = 'Schindler's List'\n  AND release_year = 1993"
        );
    }

    #[test]
    fn parenthesised_subquery_is_not_split() {
        assert_eq!(
            format("SELECT * FROM (select title from film) sub"),
            "SELECT *\nFROM (SELECT title FROM film) sub"
        );
    }

    #[test]
    fn left_join_breaks_once() {
        assert_eq!(
            format("SELECT * FROM film f LEFT JOIN category c USING(category_id)"),
            "SELECT *\nFROM film f\nLEFT JOIN category c USING(category_id)"
        );
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            format("  SELECT\n      *\n  FROM\n    main_table  "),
            "SELECT *\nFROM main_table"
        );
    }

    #[test]
    fn output_is_deterministic() {
        let sql = "select title from main_table where release_year between 1 and 2;";
        assert_eq!(format(sql), format(sql));
    }
}
