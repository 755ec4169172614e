#![allow(dead_code)]

use std::collections::VecDeque;

use film_finder_core::{RetryHint, Row};
use film_finder_db::{SqliteCatalog, open_database, seed_demo};
use film_finder_lib::{Console, NavigationChoice, ResultPresenter};

/// A console fed from a fixed list of answers.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub notices: Vec<String>,
    pub errors: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front()
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Presenter that records what it was shown and answers with a fixed choice.
pub struct FixedChoice {
    pub choice: NavigationChoice,
    pub shown: Vec<(usize, Option<RetryHint>)>,
}

impl FixedChoice {
    pub fn new(choice: NavigationChoice) -> Self {
        Self {
            choice,
            shown: Vec::new(),
        }
    }
}

impl ResultPresenter for FixedChoice {
    fn present(&mut self, rows: &[Row], hint: Option<RetryHint>) -> NavigationChoice {
        self.shown.push((rows.len(), hint));
        self.choice
    }
}

pub fn demo_catalog() -> (tempfile::TempDir, SqliteCatalog) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let conn = open_database(&path).unwrap();
    seed_demo(&conn).unwrap();
    drop(conn);
    (dir, SqliteCatalog::new(path))
}
