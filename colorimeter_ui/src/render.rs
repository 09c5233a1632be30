//! Renderers: the "render now" half of the display contract.

use std::io::Write;

use crate::screens::{MeasureScreen, MenuScreen, MessageKind, MessageScreen, Reading};

/// Borrowed view of whichever screen the current mode owns.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Measure(&'a MeasureScreen),
    Menu(&'a MenuScreen),
    Message(&'a MessageScreen),
}

/// Draws a screen. Fire-and-forget: implementations swallow their own
/// failures.
pub trait Renderer {
    fn render(&mut self, view: View<'_>);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, view: View<'_>) {
        (**self).render(view);
    }
}

pub fn format_reading(reading: &Reading, precision: usize) -> String {
    match reading {
        Reading::Number(v) => format!("{v:.precision$}"),
        Reading::Percent(p) => format!("{p}%"),
        Reading::Missing => "---".to_string(),
        Reading::Text(t) => t.clone(),
    }
}

/// Plain-text rendering used by the terminal renderer and in tests.
pub fn render_text(view: View<'_>) -> String {
    let mut out = String::new();
    match view {
        View::Measure(s) => {
            let mut header = s.name.clone();
            if let Some(u) = &s.units {
                header.push_str(&format!(" ({u})"));
            }
            out.push_str(&header);
            out.push('\n');
            if s.blanking {
                out.push_str("blanking...\n");
            } else if s.overflow {
                out.push_str("overflow\n");
            } else {
                for line in &s.lines {
                    out.push_str(&format!(
                        "{:<8}{}\n",
                        line.label,
                        format_reading(&line.value, s.precision)
                    ));
                }
            }
            let blank = if s.blanked { "blanked" } else { "not blanked" };
            let gain = s.gain.map(|g| g.to_string()).unwrap_or_else(|| "-".into());
            let bat = s
                .battery_volts
                .map(|v| format!("{v:.1}V"))
                .unwrap_or_else(|| "-".into());
            out.push_str(&format!("[{blank}] gain {gain} bat {bat}\n"));
        }
        View::Menu(s) => {
            out.push_str("MENU\n");
            for (i, item) in s.items.iter().enumerate() {
                let marker = if i == s.current { '>' } else { ' ' };
                out.push_str(&format!("{marker} {item}\n"));
            }
        }
        View::Message(s) => {
            let title = match s.kind {
                MessageKind::Error => "ERROR",
                MessageKind::About => "ABOUT",
                MessageKind::Abort => "ABORT",
            };
            out.push_str(&format!("{title}: {}\n", s.message));
            if s.ok_to_continue {
                out.push_str("press any button\n");
            }
        }
    }
    out
}

/// Writes each frame as text to any `Write` sink (stdout in the CLI).
pub struct TextRenderer<W: Write> {
    out: W,
    last: Option<String>,
    only_changes: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            only_changes: false,
        }
    }

    /// Skip frames identical to the previous one.
    pub fn only_changes(mut self) -> Self {
        self.only_changes = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: View<'_>) {
        let frame = render_text(view);
        if self.only_changes && self.last.as_deref() == Some(frame.as_str()) {
            return;
        }
        if let Err(e) = writeln!(self.out, "{frame}") {
            tracing::warn!(error = %e, "frame write failed");
        }
        self.last = Some(frame);
    }
}

/// Keeps every rendered frame in memory.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: View<'_>) {
        self.frames.push(render_text(view));
    }
}
