//! Line-oriented cursor over text with one line of push-back.

use std::str::Lines;

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod cursor_tests;

/// A cursor yielding the lines of a text one at a time.
///
/// At most one line may be pushed back so that a sub-parser can hand a record it does not own
/// back to its caller.
pub(crate) struct LineCursor<'a> {
    lines: Lines<'a>,
    pushed_back: Option<&'a str>,
    line_number: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            pushed_back: None,
            line_number: 0,
        }
    }

    /// Returns the next line, or `None` at the end of the text.
    pub(crate) fn next_line(&mut self) -> Option<&'a str> {
        let line = self.pushed_back.take().or_else(|| self.lines.next());
        if line.is_some() {
            self.line_number += 1;
        }
        line
    }

    /// Returns the next line without consuming it.
    pub(crate) fn peek(&mut self) -> Option<&'a str> {
        if self.pushed_back.is_none() {
            self.pushed_back = self.lines.next();
        }
        self.pushed_back
    }

    /// Hands a line back so that the next call to [`Self::next_line`] returns it again.
    ///
    /// # Panics
    ///
    /// Panics if a line has already been pushed back.
    pub(crate) fn push_back(&mut self, line: &'a str) {
        assert!(
            self.pushed_back.is_none(),
            "Only one line can be pushed back at a time."
        );
        self.pushed_back = Some(line);
        self.line_number -= 1;
    }

    /// Consumes lines up to and including the first one satisfying `predicate`, and returns it.
    pub(crate) fn skip_past<F>(&mut self, predicate: F) -> Option<&'a str>
    where
        F: Fn(&str) -> bool,
    {
        while let Some(line) = self.next_line() {
            if predicate(line) {
                return Some(line);
            }
        }
        None
    }

    /// The one-based number of the most recently returned line.
    pub(crate) fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}
