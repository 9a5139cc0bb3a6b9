use std::fmt::{self, Write as _};

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one validation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with warnings
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    /// Label and message printed after the check name.
    fn detail(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }

    fn tone(&self) -> Tone {
        match self {
            CheckStatus::Ok => Tone::Good,
            CheckStatus::Warning(_) => Tone::Caution,
            CheckStatus::Failed(_) => Tone::Bad,
        }
    }
}

/// A named validation check and its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCheck {
    /// Check name
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn new(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Ok)
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warning(message.into()))
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Failed(message.into()))
    }

    /// Passed when `result` is `Ok`, failed with the error otherwise.
    pub(crate) fn from_result<T, E: fmt::Display>(
        name: impl Into<String>,
        result: &std::result::Result<T, E>,
    ) -> Self {
        match result {
            Ok(_) => Self::ok(name),
            Err(e) => Self::failed(name, e.to_string()),
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Heading,
    Good,
    Caution,
    Bad,
}

/// Applies a [`Tone`] to a piece of report text.
type Paint = fn(&str, Tone) -> String;

fn plain(text: &str, _: Tone) -> String {
    text.to_string()
}

#[cfg(feature = "colorized_output")]
fn colored(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Heading => style(text).bold().cyan().to_string(),
        Tone::Good => style(text).green().to_string(),
        Tone::Caution => style(text).yellow().to_string(),
        Tone::Bad => style(text).red().to_string(),
    }
}

/// Validation report for an HMSA file pair
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Checks in execution order
    pub checks: Vec<ValidationCheck>,
    /// Path of the validated document
    pub file_path: String,
}

impl ValidationReport {
    /// Empty report for `file_path`.
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Append a check.
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    fn count(&self, predicate: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| predicate(&c.status)).count()
    }

    /// Whether any check failed.
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Whether any check warned.
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Number of passed checks.
    pub fn success_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Ok))
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Warning(_)))
    }

    /// Number of failed checks.
    pub fn failure_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    fn verdict(&self) -> (&'static str, Tone) {
        if self.has_failures() {
            ("Validation FAILED", Tone::Bad)
        } else if self.has_warnings() {
            ("Validation PASSED with warnings", Tone::Caution)
        } else {
            ("Validation PASSED", Tone::Good)
        }
    }

    fn render(&self, paint: Paint) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}", paint("HMSA Validation Report", Tone::Heading))?;
        writeln!(out, "{}", paint("======================", Tone::Heading))?;
        writeln!(out, "File: {}", self.file_path)?;
        writeln!(out)?;

        for check in &self.checks {
            let symbol = paint(check.status.symbol(), check.status.tone());
            write!(out, "[{}] {}", symbol, check.name)?;
            match check.status.detail() {
                Some((label, msg)) => {
                    writeln!(out, " - {}: {}", paint(label, check.status.tone()), msg)?
                }
                None => writeln!(out)?,
            }
        }

        writeln!(out)?;
        writeln!(
            out,
            "Summary: {} passed, {} warnings, {} failed",
            paint(&self.success_count().to_string(), Tone::Good),
            paint(&self.warning_count().to_string(), Tone::Caution),
            paint(&self.failure_count().to_string(), Tone::Bad),
        )?;
        writeln!(out)?;
        let (verdict, tone) = self.verdict();
        writeln!(out, "{}", paint(verdict, tone))?;
        Ok(out)
    }

    /// Format the report with colors (requires the `colorized_output` feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        let paint: Paint = colored;
        #[cfg(not(feature = "colorized_output"))]
        let paint: Paint = plain;
        self.render(paint).unwrap_or_default()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(plain)?)
    }
}
