use annotate_snippets::{Renderer, Snippet};

use crate::re::parser;
use crate::Span;

pub type Level = annotate_snippets::Level;

/// Builds error reports.
///
/// `ReportBuilder` creates error reports with an annotated snippet of the
/// pattern where the error was found.
///
/// ```
/// use rexc::compiler::report::ReportBuilder;
/// use rexc::compiler::Error;
///
/// let pattern = "a{3,2}";
/// let Err(Error::Syntax(err)) = rexc::compile(pattern) else { panic!() };
/// let report = ReportBuilder::new().syntax_error(pattern, &err);
///
/// assert!(report.contains("error[E007]: invalid repetition"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    with_colors: bool,
    origin: Option<String>,
}

impl ReportBuilder {
    /// Creates a new instance of [`ReportBuilder`].
    pub fn new() -> Self {
        Self { with_colors: false, origin: None }
    }

    /// Indicates whether the reports should have colors. By default, this is
    /// `false`.
    pub fn with_colors(mut self, yes: bool) -> Self {
        self.with_colors = yes;
        self
    }

    /// Name shown as the origin of the snippets, usually a file name. By
    /// default, it is `pattern`.
    pub fn origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    /// Creates a report for a syntax error found in `src`.
    pub fn syntax_error(&self, src: &str, err: &parser::Error) -> String {
        let note = match err {
            parser::Error::RecursiveMacro { .. } => Some(
                "a macro can't refer to itself, directly or through other \
                 macros"
                    .to_string(),
            ),
            parser::Error::UnknownMacro { .. } => Some(
                "sequences of letters are macro references, use quotes for \
                 literal text"
                    .to_string(),
            ),
            _ => None,
        };

        self.create_report(
            Level::Error,
            src,
            err.span(),
            err.code(),
            &err.to_string(),
            &err.label(),
            note,
        )
    }

    /// Creates a new error or warning report.
    #[allow(clippy::too_many_arguments)]
    pub fn create_report(
        &self,
        level: Level,
        src: &str,
        span: &Span,
        code: &str,
        title: &str,
        label: &str,
        note: Option<String>,
    ) -> String {
        // Tabs become a single space. This doesn't affect spans, because the
        // number of characters remain the same, but keeps the snippet
        // aligned with its annotations.
        let src = src.replace('\t', " ");

        // Spans may point past the end of the source when the pattern is
        // unterminated.
        let end = span.end().min(src.len());
        let start = span.start().min(end);

        let snippet = Snippet::source(src.as_str())
            .origin(self.origin.as_deref().unwrap_or("pattern"))
            .fold(true)
            .annotation(level.span(start..end).label(label));

        let mut message = level.title(title).id(code).snippet(snippet);

        if let Some(note) = &note {
            message = message.footer(Level::Note.title(note.as_str()));
        }

        let renderer = if self.with_colors {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let report = renderer.render(message).to_string();
        report
    }
}
