//! Operator-facing status lines.
//!
//! Every checker reports through a [`StatusSink`] instead of printing
//! directly, so the same decision code drives the terminal, the JSON report
//! and the tests. The rendered text (`[✓] message`) is scraped by existing
//! automation and must stay stable.

use colored::Colorize;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyph {
    Tick,
    Cross,
    Info,
}

impl Glyph {
    /// The glyph without terminal colors
    pub fn symbol(&self) -> &'static str {
        match self {
            Glyph::Tick => "[✓]",
            Glyph::Cross => "[✗]",
            Glyph::Info => "[i]",
        }
    }

    fn colored(&self) -> String {
        match self {
            Glyph::Tick => format!("[{}]", "✓".green().bold()),
            Glyph::Cross => format!("[{}]", "✗".red().bold()),
            Glyph::Info => "[i]".to_string(),
        }
    }
}

/// One line of installer output. Detail lines have no glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub glyph: Option<Glyph>,
    pub message: String,
}

impl StatusLine {
    pub fn tick(message: impl Into<String>) -> Self {
        Self {
            glyph: Some(Glyph::Tick),
            message: message.into(),
        }
    }

    pub fn cross(message: impl Into<String>) -> Self {
        Self {
            glyph: Some(Glyph::Cross),
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            glyph: Some(Glyph::Info),
            message: message.into(),
        }
    }

    pub fn detail(message: impl Into<String>) -> Self {
        Self {
            glyph: None,
            message: message.into(),
        }
    }

    /// Render without ANSI escapes, e.g. `[✓] Detected x86_64 architecture`
    pub fn plain(&self) -> String {
        match self.glyph {
            Some(glyph) => format!("{} {}", glyph.symbol(), self.message),
            None => format!("    {}", self.message),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.glyph {
            Some(glyph) => write!(f, "  {} {}", glyph.colored(), self.message),
            None => write!(f, "      {}", self.message),
        }
    }
}

/// Destination for status lines emitted by the checkers
pub trait StatusSink {
    fn emit(&mut self, line: StatusLine);

    fn tick(&mut self, message: &str) {
        self.emit(StatusLine::tick(message));
    }

    fn cross(&mut self, message: &str) {
        self.emit(StatusLine::cross(message));
    }

    fn info(&mut self, message: &str) {
        self.emit(StatusLine::info(message));
    }

    fn detail(&mut self, message: &str) {
        self.emit(StatusLine::detail(message));
    }
}

/// Prints every line to stdout as it arrives
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn emit(&mut self, line: StatusLine) {
        println!("{line}");
    }
}

/// Keeps lines in memory; used for `--json` output and in tests
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    lines: Vec<StatusLine>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[StatusLine] {
        &self.lines
    }

    /// All lines rendered with [`StatusLine::plain`], newline separated
    pub fn transcript(&self) -> String {
        self.lines
            .iter()
            .map(StatusLine::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, glyph: Glyph, message: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.glyph == Some(glyph) && line.message == message)
    }

    pub fn mentions(&self, fragment: &str) -> bool {
        self.lines.iter().any(|line| line.message.contains(fragment))
    }
}

impl StatusSink for RecordingSink {
    fn emit(&mut self, line: StatusLine) {
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering() {
        assert_eq!(
            StatusLine::tick("Current SELinux: Permissive").plain(),
            "[✓] Current SELinux: Permissive"
        );
        assert_eq!(
            StatusLine::cross("OS distribution not supported").plain(),
            "[✗] OS distribution not supported"
        );
        assert_eq!(
            StatusLine::info("SELinux not detected").plain(),
            "[i] SELinux not detected"
        );
        assert_eq!(
            StatusLine::detail("Please update").plain(),
            "    Please update"
        );
    }

    #[test]
    fn test_display_keeps_message_contiguous() {
        let rendered = StatusLine::tick("Detected x86_64 architecture").to_string();
        assert!(rendered.ends_with("] Detected x86_64 architecture"));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.info("FTL Checks...");
        sink.tick("Detected x86_64 architecture");

        assert_eq!(sink.lines().len(), 2);
        assert!(sink.contains(Glyph::Info, "FTL Checks..."));
        assert!(!sink.contains(Glyph::Cross, "FTL Checks..."));
        assert!(sink.mentions("x86_64"));
        assert_eq!(
            sink.transcript(),
            "[i] FTL Checks...\n[✓] Detected x86_64 architecture"
        );
    }
}
