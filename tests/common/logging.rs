//! Log output verification helpers.
//!
//! Console logs of the binary go to stderr; these helpers assert on them.

/// Verifier for log lines captured from stderr or a run's log file.
///
/// # Example
///
/// ```ignore
/// LogVerifier::from_text(&stderr)
///     .assert_warn("settings parse error")
///     .assert_contains_level("ERROR", "must be run as root");
/// ```
pub struct LogVerifier {
    log_lines: Vec<String>,
}

impl LogVerifier {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            log_lines: text.lines().map(String::from).collect(),
        }
    }

    fn contains_level_and_message(&self, level: &str, message: &str) -> bool {
        let message = message.to_lowercase();
        self.log_lines
            .iter()
            .any(|line| line.contains(level) && line.to_lowercase().contains(&message))
    }

    /// Assert that a line carries both `level` and `message` (case-insensitive).
    ///
    /// # Panics
    ///
    /// Panics if no matching line is found.
    pub fn assert_contains_level(&self, level: &str, message: &str) -> &Self {
        assert!(
            self.contains_level_and_message(level, message),
            "No {level} log containing \"{message}\" found in:\n{}",
            self.log_lines.join("\n")
        );
        self
    }

    pub fn assert_warn(&self, message: &str) -> &Self {
        self.assert_contains_level("WARN", message)
    }

    /// Assert that some line matches `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if no line matches.
    pub fn assert_line_matches(&self, pattern: &str) -> &Self {
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        assert!(
            self.log_lines.iter().any(|line| re.is_match(line)),
            "No log line matches pattern \"{pattern}\"\nLog lines:\n{}",
            self.log_lines.join("\n")
        );
        self
    }
}
