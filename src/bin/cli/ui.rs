use clap::ValueEnum;
use coati::admin::StatsReport;
use coati::storage::{CollectionInfo, CollectionKind};
use coati::validate::{CheckResult, Report, Severity, Violation, ViolationDetail};
use indicatif::{ProgressBar, ProgressStyle};
use nu_ansi_term::{Color, Style};
use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Theme {
    Auto,
    Light,
    Dark,
    Plain,
}

/// Outcome class of a one-line notice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
    Done,
    Note,
}

/// Terminal renderer for validation reports and snapshot summaries.
///
/// `quiet` drops icons and the spinner but keeps every line of content, so
/// scripted callers can still grep the text output.
pub struct Ui {
    palette: Palette,
    paint: bool,
    quiet: bool,
}

impl Ui {
    pub fn new(theme: Theme, quiet: bool) -> Self {
        let paint = theme != Theme::Plain && !quiet && std::io::stdout().is_terminal();

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        let palette = match theme {
            Theme::Plain => Palette::plain(),
            Theme::Light => Palette::light(),
            Theme::Dark | Theme::Auto => Palette::dark(),
        };
        Self {
            palette,
            paint,
            quiet,
        }
    }

    fn style(&self, style: Style) -> Style {
        if self.paint {
            style
        } else {
            Style::new()
        }
    }

    pub fn notice(&self, tone: Tone, message: &str) {
        if self.quiet {
            println!("{message}");
            return;
        }
        let (icon, style) = match tone {
            Tone::Done => ("✔", self.palette.ok),
            Tone::Note => ("ℹ", self.palette.muted),
        };
        println!("{} {message}", self.style(style).paint(icon));
    }

    /// Spinner shown on stderr while a snapshot is being checked.
    pub fn spinner(&self, label: String) -> Spinner {
        let bar = (!self.quiet && std::io::stderr().is_terminal()).then(|| {
            let style = ProgressStyle::with_template("{spinner} {msg} {elapsed}")
                .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::new_spinner().with_style(style).with_message(label);
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        Spinner {
            bar,
            started: Instant::now(),
        }
    }

    /// Summary line, then one block per category in report order.
    pub fn report(&self, source: &Path, report: &Report, elapsed: Duration) {
        let took = format_duration(elapsed);
        if report.ok {
            self.notice(
                Tone::Done,
                &format!("{}: no integrity issues found ({took})", source.display()),
            );
            return;
        }
        let (critical, warning) = severity_tally(report);
        let summary = format!(
            "{}: {} issue(s) in {} categor{}, {critical} critical, {warning} warning ({took})",
            source.display(),
            report.total_issues,
            report.categories_with_issues,
            if report.categories_with_issues == 1 { "y" } else { "ies" },
        );
        println!("{}", self.style(self.palette.severity(worst(report))).paint(summary));
        for result in &report.issues {
            println!();
            self.category(result);
        }
    }

    fn category(&self, result: &CheckResult) {
        let badge = self
            .style(self.palette.severity(result.severity))
            .paint(format!("[{}]", result.severity.as_str()));
        let title = self.style(self.palette.title).paint(result.category.as_str());
        println!("{title} {badge} {}", result.count);

        let rows: Vec<Row> = result.items.iter().map(Row::from_violation).collect();
        let width = rows.iter().map(|row| row.subject.chars().count()).max().unwrap_or(0);
        for (row, violation) in rows.iter().zip(&result.items) {
            let subject = self.style(self.palette.subject).paint(row.subject.as_str());
            let pad = " ".repeat(width - row.subject.chars().count());
            println!("  - {subject}:{pad} {}", violation.issue);
            for note in &row.notes {
                println!("      {}", self.style(self.palette.muted).paint(note.as_str()));
            }
        }
    }

    pub fn stats(&self, report: &StatsReport) {
        println!(
            "{}",
            self.style(self.palette.title).paint(format!(
                "{} collections ({} document, {} edge), {} documents",
                report.total_collections,
                report.document_collections,
                report.edge_collections,
                report.total_documents
            ))
        );
        println!();
        self.collections(&report.collections);
    }

    /// Name, kind and size of each collection as an aligned table.
    pub fn collections(&self, collections: &[CollectionInfo]) {
        if collections.is_empty() {
            self.notice(Tone::Note, "snapshot has no collections");
            return;
        }
        let name_width = collections
            .iter()
            .map(|c| c.name.len())
            .chain([4])
            .max()
            .unwrap_or(4);
        let count_width = collections
            .iter()
            .map(|c| c.count.to_string().len())
            .chain([5])
            .max()
            .unwrap_or(5);
        let header = format!("{:<name_width$}  {:<8}  {:>count_width$}", "NAME", "KIND", "COUNT");
        println!("{}", self.style(self.palette.muted).paint(header));
        for info in collections {
            let kind = match info.kind {
                CollectionKind::Document => "document",
                CollectionKind::Edge => "edge",
            };
            let name = self
                .style(self.palette.subject)
                .paint(format!("{:<name_width$}", info.name));
            println!("{name}  {kind:<8}  {:>count_width$}", info.count);
        }
    }

    /// Key/value block used by `config show`.
    pub fn settings(&self, title: &str, rows: &[(&str, String)]) {
        println!("{}", self.style(self.palette.title).paint(title));
        let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in rows {
            let key = self.style(self.palette.muted).paint(format!("{key:>width$}"));
            println!("  {key}: {value}");
        }
    }
}

/// Live progress indicator; cleared when finished or dropped.
pub struct Spinner {
    bar: Option<ProgressBar>,
    started: Instant,
}

impl Spinner {
    pub fn finish(mut self) -> Duration {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        self.started.elapsed()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// One rendered violation: what it is about plus any diagnostics worth a line.
struct Row {
    subject: String,
    notes: Vec<String>,
}

impl Row {
    fn from_violation(violation: &Violation) -> Self {
        let quoted = |preview: &Option<String>| preview.as_ref().map(|text| format!("\"{text}\""));
        match &violation.detail {
            ViolationDetail::MultipleParents {
                atom_id,
                atom_content_preview,
                parents_count,
            } => Self {
                subject: atom_id.clone(),
                notes: [Some(format!("{parents_count} parents")), quoted(atom_content_preview)]
                    .into_iter()
                    .flatten()
                    .collect(),
            },
            ViolationDetail::Orphan {
                atom_id,
                atom_content_preview,
                ..
            } => Self {
                subject: atom_id.clone(),
                notes: quoted(atom_content_preview).into_iter().collect(),
            },
            ViolationDetail::IllegalLink { edge_id, from, to } => Self {
                subject: edge_id.clone(),
                notes: vec![format!("{from} -> {to}")],
            },
            ViolationDetail::RevisionCycle {
                atom_id,
                cycle_length,
            } => Self {
                subject: atom_id.clone(),
                notes: vec![format!("returns after {cycle_length} edge(s)")],
            },
            ViolationDetail::ProposalLink {
                edge_id,
                from,
                from_status,
                to,
                to_status,
            } => {
                let status = |s: &Option<String>| s.as_deref().unwrap_or("missing").to_string();
                Self {
                    subject: edge_id.clone(),
                    notes: vec![format!(
                        "{from} ({}) -> {to} ({})",
                        status(from_status),
                        status(to_status)
                    )],
                }
            }
            ViolationDetail::DeprecatedField(field) => Self {
                subject: field.node_key.clone(),
                notes: vec![format!("{} = {}", field.field, field.value)],
            },
        }
    }
}

fn severity_tally(report: &Report) -> (usize, usize) {
    report
        .issues
        .iter()
        .fold((0, 0), |(critical, warning), result| match result.severity {
            Severity::Critical => (critical + result.count, warning),
            Severity::Warning => (critical, warning + result.count),
        })
}

fn worst(report: &Report) -> Severity {
    if report.issues.iter().any(|r| r.severity == Severity::Critical) {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs_f64() >= 1.0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{:.0}ms", duration.as_secs_f64() * 1_000.0)
    }
}

struct Palette {
    title: Style,
    subject: Style,
    muted: Style,
    ok: Style,
    warning: Style,
    critical: Style,
}

impl Palette {
    fn dark() -> Self {
        Self {
            title: Style::new().fg(Color::Purple).bold(),
            subject: Style::new().fg(Color::LightBlue).bold(),
            muted: Style::new().fg(Color::DarkGray),
            ok: Style::new().fg(Color::LightGreen).bold(),
            warning: Style::new().fg(Color::Yellow).bold(),
            critical: Style::new().fg(Color::LightRed).bold(),
        }
    }

    fn light() -> Self {
        Self {
            title: Style::new().fg(Color::Blue).bold(),
            subject: Style::new().fg(Color::Black).bold(),
            muted: Style::new().fg(Color::DarkGray),
            ok: Style::new().fg(Color::Green).bold(),
            warning: Style::new().fg(Color::Yellow).bold(),
            critical: Style::new().fg(Color::Red).bold(),
        }
    }

    fn plain() -> Self {
        Self {
            title: Style::new(),
            subject: Style::new(),
            muted: Style::new(),
            ok: Style::new(),
            warning: Style::new(),
            critical: Style::new(),
        }
    }

    fn severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Critical => self.critical,
            Severity::Warning => self.warning,
        }
    }
}
