mod common;

use common::ScriptedConsole;
use film_finder_core::{Row, SqlValue};
use film_finder_lib::{NavigationChoice, Paginator};

fn rows(n: i64) -> Vec<Row> {
    (0..n).map(|i| vec![SqlValue::from(i)]).collect()
}

#[test]
fn walks_pages_and_rejects_bad_input() {
    let data = rows(5);
    let mut console =
        ScriptedConsole::new(&["0", "abc", "9", "2", "p", "n", "n", "n", "x", "q", "7", "3"]);
    let mut seen: Vec<Row> = Vec::new();
    let mut paginator =
        Paginator::new(&mut console, |page: &[Row], _| seen.extend_from_slice(page));

    let choice = paginator.paginate(&data, None);

    assert_eq!(choice, NavigationChoice::Exit);
    assert_eq!(seen, data);
    assert_eq!(
        console.errors,
        vec![
            "You can't show 0 results per page!",
            "Page size must be an integer.",
            "You can't get 9 elements per page, because you only have 5 rows.",
            "The first page does not have a previous page!",
            "The last page does not have a next page!",
            "Invalid input!",
            "Invalid choice: \"7\"",
        ]
    );
    assert!(console.notices.contains(&"Showing page 3 of 3".to_string()));
}

#[test]
fn single_page_skips_navigation_prompt() {
    let data = rows(3);
    let mut console = ScriptedConsole::new(&["3", "1"]);
    let mut pages = 0;
    let mut paginator = Paginator::new(&mut console, |_: &[Row], _| pages += 1);

    assert_eq!(paginator.paginate(&data, None), NavigationChoice::NewSearch);
    assert_eq!(pages, 1);
    assert!(!console.prompts.iter().any(|p| p.contains("next")));
}

#[test]
fn quitting_early_still_offers_navigation() {
    let data = rows(10);
    let mut console = ScriptedConsole::new(&["1", "n", "q", "2"]);
    let mut pages = 0;
    let mut paginator = Paginator::new(&mut console, |_: &[Row], _| pages += 1);

    assert_eq!(paginator.paginate(&data, None), NavigationChoice::MainMenu);
    assert_eq!(pages, 2);
}

#[test]
fn end_of_input_exits() {
    let data = rows(4);
    let mut console = ScriptedConsole::new(&[]);
    let mut paginator = Paginator::new(&mut console, |_: &[Row], _| {});
    assert_eq!(paginator.paginate(&data, None), NavigationChoice::Exit);
}
