// Terminal stand-in for the map UI: text rendering plus line-based guess input.

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::domain::errors::GuessError;
use crate::domain::ports::{MapView, MarkerKind, PlayerPrompt, TextSlot};
use crate::domain::{Bounds, Coordinate};

/// Parses `"lat, lon"` (comma and/or whitespace separated) into a validated coordinate.
pub fn parse_guess(input: &str) -> Result<Coordinate, GuessError> {
    let malformed = || GuessError::Malformed(input.trim().to_string());

    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let lat = lat.parse::<f64>().map_err(|_| malformed())?;
    let lon = lon.parse::<f64>().map_err(|_| malformed())?;
    Coordinate::new(lat, lon)
}

fn fmt_point(at: Coordinate) -> String {
    format!("({:.4}, {:.4})", at.lat(), at.lon())
}

/// Writes map operations as plain text lines.
pub struct TerminalView<W> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // Terminal output is best-effort; a closed stdout should not abort the game.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> MapView for TerminalView<W> {
    fn clear(&mut self) {
        self.line("");
    }

    fn render_marker(&mut self, kind: MarkerKind, at: Coordinate) {
        let label = match kind {
            MarkerKind::Guess => "your guess",
            MarkerKind::Actual => "actual",
        };
        self.line(&format!("  [{label}] {}", fmt_point(at)));
    }

    fn render_line(&mut self, from: Coordinate, to: Coordinate) {
        self.line(&format!("  {} ----- {}", fmt_point(from), fmt_point(to)));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.line(&format!(
            "  view {} .. {}",
            fmt_point(bounds.south_west),
            fmt_point(bounds.north_east)
        ));
    }

    fn display_text(&mut self, slot: TextSlot, text: &str) {
        match slot {
            TextSlot::Round => self.line(&format!("=== {text} ===")),
            TextSlot::Address => self.line(&format!("IP: {text}")),
            TextSlot::TotalScore => self.line(&format!("Total score: {text}")),
            TextSlot::Result | TextSlot::Final => {
                for line in text.lines() {
                    self.line(&format!("  {line}"));
                }
            }
        }
    }
}

/// Reads guesses and yes/no answers line by line, writing prompts to `out`.
pub struct LinePrompt<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R: AsyncBufRead + Unpin, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    async fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.out, "{prompt}");
        let _ = self.out.flush();
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read player input");
                None
            }
        }
    }
}

#[async_trait]
impl<R, W> PlayerPrompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn next_guess(&mut self) -> Option<Coordinate> {
        loop {
            let line = self.read_line("Your guess (lat, lon) or 'q' to quit: ").await?;
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                return None;
            }
            match parse_guess(trimmed) {
                Ok(guess) => return Some(guess),
                Err(e) => {
                    let _ = writeln!(self.out, "  {e}");
                }
            }
        }
    }

    async fn confirm(&mut self, question: &str) -> bool {
        let Some(answer) = self.read_line(&format!("{question} [y/N]: ")).await else {
            return false;
        };
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
