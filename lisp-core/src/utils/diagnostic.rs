use std::{io::Write, path::PathBuf};

use codespan_reporting::{
    diagnostic::{Diagnostic as CodespanDiagnostic, Label as CodespanLabel, LabelStyle, Severity},
    files::SimpleFiles,
    term
};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use super::src_span::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Label {
    pub text: Option<String>,
    pub span: SrcSpan,
    pub primary: bool,
}

impl Label {
    pub fn primary(span: SrcSpan, text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), span, primary: true }
    }

    pub fn secondary(span: SrcSpan, text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), span, primary: false }
    }

    fn to_codespan_label(&self, file_id: usize) -> CodespanLabel<usize> {
        let style = if self.primary { LabelStyle::Primary } else { LabelStyle::Secondary };
        let label = CodespanLabel::new(
            style,
            file_id,
            (self.span.start as usize)..(self.span.end as usize),
        );

        match &self.text {
            None => label,
            Some(text) => label.with_message(text.clone()),
        }
    }
}

/// The source a diagnostic points into. The first label is the main one.
pub struct Location<'a> {
    pub src: &'a str,
    pub path: PathBuf,
    pub labels: Vec<Label>,
}

pub struct Diagnostic<'a> {
    pub title: String,
    pub text: String,
    pub notes: Vec<String>,
    pub level: Level,
    pub location: Option<Location<'a>>
}

impl<'a> Diagnostic<'a> {
    pub fn write(&self, buf: &mut Buffer) {
        match &self.location {
            Some(location) => self.write_span(location, buf),
            None => self.write_title(buf),
        }

        if !self.text.is_empty() {
            writeln!(buf, "{}", self.text).expect("text write")
        }
    }

    pub fn write_span(&self, location: &Location, buf: &mut Buffer) {
        let mut files = SimpleFiles::new();
        let file_id = files.add(location.path.to_string_lossy().into_owned(), location.src);

        let diagnostic = CodespanDiagnostic::new(self.level.into())
            .with_message(&self.title)
            .with_labels(location.labels.iter().map(|label| label.to_codespan_label(file_id)).collect())
            .with_notes(self.notes.clone());

        term::emit(buf, &term::Config::default(), &files, &diagnostic)
            .expect("write_diagnostic");
    }

    /// Header and notes for diagnostics without a source location.
    pub fn write_title(&self, buf: &mut Buffer) {
        let (kind, colour) = match self.level {
            Level::Error => ("error", Color::Red),
            Level::Warning => ("warning", Color::Yellow),
        };

        buf.set_color(ColorSpec::new().set_bold(true).set_fg(Some(colour)))
            .expect("write_title_color");
        write!(buf, "{kind}").expect("write_title_kind");

        buf.set_color(ColorSpec::new().set_bold(true))
            .expect("write_title_color");
        writeln!(buf, ": {}", self.title).expect("write_title_title");

        buf.reset().expect("write_title_reset");

        for note in &self.notes {
            writeln!(buf, "  = {note}").expect("write_title_note");
        }

        writeln!(buf).expect("write_title_end");
    }
}
