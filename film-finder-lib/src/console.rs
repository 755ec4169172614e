/// Line-oriented user interaction used by interactive components.
///
/// Keeping this behind a trait lets the paginator and menus run against a
/// scripted console in tests.
pub trait Console {
    /// Show `message` and read one line with surrounding whitespace removed.
    /// Returns `None` when input is exhausted.
    fn prompt(&mut self, message: &str) -> Option<String>;

    /// Informational output.
    fn notice(&mut self, message: &str);

    /// A rejected input or failed operation.
    fn error(&mut self, message: &str);
}
