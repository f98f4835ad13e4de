/// Extends string types with fixed-column helpers
pub trait StringExt {
    /// Slice a fixed-width column out of a line
    ///
    /// Lines are often shorter than the full record width because trailing
    /// whitespace was trimmed by an editor. Columns that run past the end of
    /// the line are clipped, and columns starting beyond it are empty.
    ///
    /// Returns `None` only if the column boundaries split a multi-byte
    /// character.
    ///
    /// ```rust
    /// # use endftools_utils::StringExt;
    /// let line = "0123456789";
    /// assert_eq!(line.column(2, 3), Some("234"));
    /// assert_eq!(line.column(8, 5), Some("89"));
    /// assert_eq!(line.column(20, 5), Some(""));
    /// ```
    fn column(&self, start: usize, width: usize) -> Option<&str>;

    /// True if every character is a space
    ///
    /// ```rust
    /// # use endftools_utils::StringExt;
    /// assert!("     ".is_blank());
    /// assert!("".is_blank());
    /// assert!(!"  1  ".is_blank());
    /// ```
    fn is_blank(&self) -> bool;

    /// Remove any trailing `\n` or `\r\n` line ending
    ///
    /// ```rust
    /// # use endftools_utils::StringExt;
    /// assert_eq!("text\r\n".trim_line_ending(), "text");
    /// assert_eq!("text  \n".trim_line_ending(), "text  ");
    /// ```
    fn trim_line_ending(&self) -> &str;
}

impl<T: AsRef<str> + ?Sized> StringExt for T {
    fn column(&self, start: usize, width: usize) -> Option<&str> {
        let s = self.as_ref();
        if start >= s.len() {
            return Some("");
        }
        let end = (start + width).min(s.len());
        s.get(start..end)
    }

    fn is_blank(&self) -> bool {
        self.as_ref().chars().all(|c| c == ' ')
    }

    fn trim_line_ending(&self) -> &str {
        self.as_ref().trim_end_matches(['\n', '\r'])
    }
}

#[cfg(test)]
mod string_ext_tests {
    use super::*;

    #[test]
    fn unsized_slices() {
        let line = String::from("  12  \n");
        let data: &str = &line[..6];
        assert!(line[..2].is_blank());
        assert_eq!(data.column(2, 2), Some("12"));
        assert_eq!(data.column(4, 10), Some("  "));
        assert_eq!(line.trim_line_ending(), "  12  ");
    }

    #[test]
    fn column_outlives_receiver_reference() {
        fn middle(line: &str) -> &str {
            line.column(1, 1).unwrap_or_default()
        }
        assert_eq!(middle("abc"), "b");
    }
}
