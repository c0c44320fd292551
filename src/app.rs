//! Terminal front-end for slidecast.
//!
//! [`SlidecastApp`] is a line-oriented loop: a plain line is a topic
//! submission, `:`-prefixed lines are commands.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `:examples` | list the built-in example topics |
//! | `:example <n>` | submit example topic `n` |
//! | `:narration` | toggle narration on/off |
//! | `:repeat` | re-narrate the current slide |
//! | `:open [n]` / `:next` / `:prev` / `:close` | lightbox viewer |
//! | `:dwell <secs>` / `:dwell off` | per-slide dwell time |
//! | `:help` / `:quit` | the obvious |
//!
//! Generated slide images are written into the configured output
//! directory, one file per slide, so partial failures are visible as
//! placeholder `.gif` files next to the real illustrations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::AppConfig;
use crate::narration::SharedNarration;
use crate::pipeline::{ExplanationRequest, RunOutcome, SlidePipeline};
use crate::show::{nearest_slide, uniform_strip, Direction, SharedShow};

// ---------------------------------------------------------------------------
// Example topics
// ---------------------------------------------------------------------------

/// Built-in prompts, selectable with `:example <n>`.
pub const EXAMPLE_TOPICS: &[&str] = &[
    "how do computers remember things",
    "why is the sky blue",
    "how does the internet get a page to my screen",
    "what makes popcorn pop",
];

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A topic to explain (any line not starting with `:`).
    Submit(String),
    Examples,
    Example(usize),
    Narration,
    Repeat,
    /// Open the lightbox, optionally at a 1-based slide number.
    Open(Option<usize>),
    Next,
    Prev,
    Close,
    /// `Some(secs)` sets the dwell, `None` disables it.
    Dwell(Option<u64>),
    Help,
    Quit,
    /// Blank line — ignored.
    Empty,
    Unknown(String),
}

/// Parse one input line into a [`Command`].
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if !line.starts_with(':') {
        return Command::Submit(line.to_string());
    }

    let mut words = line[1..].split_whitespace();
    let head = words.next().unwrap_or("");
    let arg = words.next();

    match head {
        "examples" => Command::Examples,
        "example" => match arg.and_then(|a| a.parse::<usize>().ok()) {
            Some(n) if n >= 1 && n <= EXAMPLE_TOPICS.len() => Command::Example(n - 1),
            _ => Command::Unknown(line.to_string()),
        },
        "narration" => Command::Narration,
        "repeat" => Command::Repeat,
        "open" => match arg {
            None => Command::Open(None),
            Some(a) => match a.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Open(Some(n - 1)),
                _ => Command::Unknown(line.to_string()),
            },
        },
        "next" => Command::Next,
        "prev" => Command::Prev,
        "close" => Command::Close,
        "dwell" => match arg {
            Some("off") => Command::Dwell(None),
            Some(a) => match a.parse::<u64>() {
                Ok(secs) => Command::Dwell(Some(secs)),
                Err(_) => Command::Unknown(line.to_string()),
            },
            None => Command::Unknown(line.to_string()),
        },
        "help" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

// ---------------------------------------------------------------------------
// SlidecastApp
// ---------------------------------------------------------------------------

/// The interactive front-end loop.
pub struct SlidecastApp {
    show: SharedShow,
    narration: SharedNarration,
    pipeline: SlidePipeline,
    output_dir: PathBuf,
    /// Strip scroll position in slide units; follows the newest slide
    /// and the lightbox cursor, the way the slideshow scrolls each new
    /// slide into view.
    scroll_center: f32,
}

impl SlidecastApp {
    pub fn new(
        show: SharedShow,
        narration: SharedNarration,
        pipeline: SlidePipeline,
        config: &AppConfig,
    ) -> Self {
        Self {
            show,
            narration,
            pipeline,
            output_dir: config.ui.output_dir.clone(),
            scroll_center: 0.0,
        }
    }

    /// Run the input loop until `:quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        println!("slidecast — explain anything as a narrated slideshow");
        println!("Type a topic to begin, or :help for commands.");

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            print_prompt();
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_command(&line) {
                Command::Submit(topic) => self.submit(&topic).await?,
                Command::Examples => {
                    for (i, topic) in EXAMPLE_TOPICS.iter().enumerate() {
                        println!("  {}. {topic}", i + 1);
                    }
                }
                Command::Example(i) => {
                    let topic = EXAMPLE_TOPICS[i].to_string();
                    self.submit(&topic).await?;
                }
                Command::Narration => self.toggle_narration(),
                Command::Repeat => self.repeat(),
                Command::Open(index) => self.open_lightbox(index),
                Command::Next => self.navigate(Direction::Next),
                Command::Prev => self.navigate(Direction::Prev),
                Command::Close => {
                    self.show.lock().unwrap().close_lightbox();
                    println!("Lightbox closed.");
                }
                Command::Dwell(secs) => self.set_dwell(secs),
                Command::Help => print_help(),
                Command::Quit => break,
                Command::Empty => {}
                Command::Unknown(line) => {
                    println!("Unrecognised command: {line} (try :help)");
                }
            }

            self.print_banner();
        }

        self.narration.lock().unwrap().cancel_current();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    async fn submit(&mut self, topic: &str) -> Result<()> {
        let Some(request) = ExplanationRequest::new(topic) else {
            return Ok(());
        };
        if !self.show.lock().unwrap().input_enabled {
            println!("A slideshow is still being generated — please wait.");
            return Ok(());
        }

        println!("Explaining: {}", request.topic());
        let outcome = self.pipeline.run(&request).await;

        // Scroll to the newest slide, as the slideshow does.
        let count = self.show.lock().unwrap().slide_count();
        if count > 0 {
            self.scroll_center = count as f32 - 0.5;
        }

        match outcome {
            RunOutcome::Completed {
                slide_count,
                placeholder_count: 0,
            } => {
                self.write_slides()?;
                println!("Done — {slide_count} slides.");
            }
            RunOutcome::Completed {
                slide_count,
                placeholder_count,
            } => {
                self.write_slides()?;
                println!(
                    "Done — {slide_count} slides, {placeholder_count} with placeholder images."
                );
            }
            RunOutcome::NothingGenerated => {}
            RunOutcome::Aborted => {}
            RunOutcome::Superseded => {
                log::debug!("app: run superseded");
            }
        }
        Ok(())
    }

    /// Write each slide's image into the output directory and print the
    /// slide strip.
    fn write_slides(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;

        let show = self.show.lock().unwrap();
        for slide in show.slides() {
            let path = self
                .output_dir
                .join(format!("slide-{:03}.{}", slide.index, slide.image.extension()));
            std::fs::write(&path, slide.image.bytes())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("  [{}] {}  ({})", slide.index + 1, slide.sentence, path.display());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Narration
    // -----------------------------------------------------------------------

    /// Text of the slide nearest the viewport center, for narration.
    fn current_slide_text(&self) -> Option<String> {
        let show = self.show.lock().unwrap();
        let strip = uniform_strip(show.slide_count());
        nearest_slide(&strip, self.scroll_center).map(|i| show.slides()[i].sentence.clone())
    }

    fn toggle_narration(&mut self) {
        let current = self.current_slide_text();
        let enabled = {
            let mut narration = self.narration.lock().unwrap();
            let enabled = narration.toggle(current.as_deref());
            if let Some(message) = narration.take_speech_error() {
                self.show.lock().unwrap().banner = Some(message);
            }
            enabled
        };
        if enabled {
            println!("Narration enabled.");
        } else {
            println!("Narration disabled.");
        }
    }

    fn repeat(&mut self) {
        // Repeat is available only while narration is on and at least
        // one slide exists.
        if !self.narration.lock().unwrap().enabled() {
            println!("Narration is off — :narration to enable it first.");
            return;
        }
        let current = self.current_slide_text();
        if current.is_none() {
            println!("No slides to repeat yet.");
            return;
        }
        let mut narration = self.narration.lock().unwrap();
        narration.on_repeat(current.as_deref());
        if let Some(message) = narration.take_speech_error() {
            drop(narration);
            self.show.lock().unwrap().banner = Some(message);
        }
    }

    // -----------------------------------------------------------------------
    // Lightbox
    // -----------------------------------------------------------------------

    fn open_lightbox(&mut self, index: Option<usize>) {
        let mut show = self.show.lock().unwrap();
        let target = index.unwrap_or_else(|| show.slide_count().saturating_sub(1));
        match show.open_lightbox(target) {
            Some(opened) => {
                let slide = &show.slides()[opened];
                println!(
                    "Lightbox: slide {}/{} — {}",
                    opened + 1,
                    show.slide_count(),
                    slide.sentence
                );
                self.scroll_center = opened as f32 + 0.5;
            }
            None => println!("No slides to view yet."),
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let mut show = self.show.lock().unwrap();
        match show.navigate(direction) {
            Some(index) => {
                let slide = &show.slides()[index];
                println!(
                    "Lightbox: slide {}/{} — {}",
                    index + 1,
                    show.slide_count(),
                    slide.sentence
                );
                self.scroll_center = index as f32 + 0.5;
            }
            None => println!("Lightbox is closed — :open first."),
        }
    }

    // -----------------------------------------------------------------------
    // Dwell / banner
    // -----------------------------------------------------------------------

    fn set_dwell(&mut self, secs: Option<u64>) {
        self.pipeline
            .pacer_mut()
            .set_dwell(secs.map(std::time::Duration::from_secs));
        match secs {
            Some(secs) => println!("Each slide will dwell for {secs} s."),
            None => println!("Slide dwell disabled."),
        }
    }

    /// Print and dismiss the most recent banner text, if any.
    fn print_banner(&self) {
        if let Some(message) = self.show.lock().unwrap().banner.take() {
            println!("! {message}");
        }
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("Type any topic to generate a slideshow for it.");
    println!("  :examples          list example topics");
    println!("  :example <n>       submit example topic n");
    println!("  :narration         toggle text-to-speech narration");
    println!("  :repeat            re-narrate the current slide");
    println!("  :open [n]          open the lightbox (at slide n)");
    println!("  :next / :prev      move through the lightbox (wraps around)");
    println!("  :close             close the lightbox");
    println!("  :dwell <secs>|off  hold each new slide for <secs> seconds");
    println!("  :quit              exit");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_is_a_submission() {
        assert_eq!(
            parse_command("explain gravity"),
            Command::Submit("explain gravity".into())
        );
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn lightbox_commands_parse() {
        assert_eq!(parse_command(":open"), Command::Open(None));
        assert_eq!(parse_command(":open 3"), Command::Open(Some(2)));
        assert_eq!(parse_command(":next"), Command::Next);
        assert_eq!(parse_command(":prev"), Command::Prev);
        assert_eq!(parse_command(":close"), Command::Close);
    }

    #[test]
    fn dwell_parses_seconds_and_off() {
        assert_eq!(parse_command(":dwell 3"), Command::Dwell(Some(3)));
        assert_eq!(parse_command(":dwell off"), Command::Dwell(None));
        assert!(matches!(parse_command(":dwell"), Command::Unknown(_)));
        assert!(matches!(parse_command(":dwell soon"), Command::Unknown(_)));
    }

    #[test]
    fn example_selection_is_one_based_and_bounded() {
        assert_eq!(parse_command(":example 1"), Command::Example(0));
        assert!(matches!(parse_command(":example 0"), Command::Unknown(_)));
        let too_big = format!(":example {}", EXAMPLE_TOPICS.len() + 1);
        assert!(matches!(parse_command(&too_big), Command::Unknown(_)));
    }

    #[test]
    fn narration_repeat_and_misc_parse() {
        assert_eq!(parse_command(":narration"), Command::Narration);
        assert_eq!(parse_command(":repeat"), Command::Repeat);
        assert_eq!(parse_command(":help"), Command::Help);
        assert_eq!(parse_command(":quit"), Command::Quit);
        assert_eq!(parse_command(":q"), Command::Quit);
        assert!(matches!(parse_command(":frobnicate"), Command::Unknown(_)));
    }
}
