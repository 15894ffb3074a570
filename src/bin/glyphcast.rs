use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::ResetColor;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, event, execute, terminal};

use glyphcast::{CancelFlag, RenderOpts, RenderThreading};

#[derive(Parser, Debug)]
#[command(name = "glyphcast", version)]
#[command(about = "Loop an animated GIF in the terminal as colored glyphs, with a system-info overlay")]
struct Cli {
    /// Path to the animated GIF.
    gif: PathBuf,

    /// Width of the animation in characters.
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Height in characters; defaults to the width. The effective height is
    /// halved to compensate for the terminal character aspect ratio.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Playback frame rate; higher is faster.
    #[arg(long, default_value_t = 17, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Sensitivity multiplier for glyph selection. Higher renders denser;
    /// lower can map bright pixels to blank space.
    #[arg(long, default_value_t = 1.2)]
    multiplier: f32,

    /// 24-bit color output; pass `--color false` for monochrome glyphs.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    color: bool,

    /// Command producing the overlay text. Pick one that omits its own art.
    #[arg(long, default_value = "fastfetch --logo-type none")]
    info: String,

    /// Blank lines before the overlay text begins.
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Render worker threads; defaults to the available parallelism.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let source = glyphcast::decode_animation(&cli.gif)
        .with_context(|| format!("load '{}'", cli.gif.display()))?;
    let overlay = glyphcast::capture_lines(&cli.info);

    let height = cli.height.unwrap_or(cli.width);
    let opts = RenderOpts {
        width: cli.width as usize,
        height: (height / 2).max(1) as usize,
        color: cli.color,
        multiplier: cli.multiplier,
        overlay_offset: cli.offset,
    };

    let cancel = Arc::new(CancelFlag::new());
    let animation = glyphcast::prerender(
        &source,
        &opts,
        &overlay,
        &RenderThreading {
            threads: cli.threads,
        },
        &cancel,
    )?;
    let first_frame: Vec<String> = animation
        .first_frame()
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide).context("enter alternate screen")?;

    {
        let cancel = Arc::clone(&cancel);
        std::thread::spawn(move || watch_for_interrupt(&cancel));
    }

    let delay = Duration::from_millis(u64::from(1000 / cli.fps));
    let played = glyphcast::play(&mut stdout, &animation, delay, &cancel);

    // Teardown runs regardless of how playback ended.
    execute!(stdout, LeaveAlternateScreen, cursor::Show, ResetColor)
        .context("restore terminal")?;
    terminal::disable_raw_mode().context("disable raw mode")?;

    let mut out = io::stdout().lock();
    for line in &first_frame {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    played?;
    Ok(())
}

/// Block on terminal events until an interrupt key arrives. Raw mode turns
/// Ctrl-C into a key event, so no signal handler is needed.
fn watch_for_interrupt(cancel: &CancelFlag) {
    loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(_) => break,
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let interrupt = matches!(
                    (key.code, key.modifiers),
                    (KeyCode::Char('c'), KeyModifiers::CONTROL)
                        | (KeyCode::Char('q'), _)
                        | (KeyCode::Esc, _)
                );
                if interrupt {
                    break;
                }
            }
            Ok(_) => continue,
            Err(_) => break,
        }
    }
    cancel.set();
}
