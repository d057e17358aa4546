use std::fmt;

/// Outcome of a scan: the diff either passes the gate or blocks it.
///
/// # Examples
///
/// ```
/// use vulngate_core::Verdict;
///
/// let v = Verdict::Fail;
/// assert_eq!(v.to_string(), "FAIL");
/// assert_eq!(v.exit_code(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verdict {
    /// No vulnerability reported, or the model answer was ambiguous.
    #[default]
    Pass,
    /// The model flagged the diff.
    Fail,
}

impl Verdict {
    /// Process exit status a CI runner should see for this verdict.
    ///
    /// # Examples
    ///
    /// ```
    /// use vulngate_core::Verdict;
    ///
    /// assert_eq!(Verdict::Pass.exit_code(), 0);
    /// assert_eq!(Verdict::Fail.exit_code(), 1);
    /// ```
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }

    /// The token written to the result artifact.
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
