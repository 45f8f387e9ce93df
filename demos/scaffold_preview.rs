//! Resizes a scaffold through its breakpoints and draws each frame as boxes.
//!
//! Run with `cargo run --example scaffold_preview`. Set `ADAPTIVE_LOG` to a
//! path to capture the engine's JSON-lines log.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use adaptive_room::logging::{FileSink, Logger, MemorySink};
use adaptive_room::{
    AdaptiveScaffold, Block, Destination, Environment, LayoutConfig, LayoutSettings, Platform,
    PreviewRenderer, PreviewSettings, Size, TextDirection,
};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

const FRAME: Duration = Duration::from_millis(50);

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (logger, memory) = match std::env::var("ADAPTIVE_LOG") {
        Ok(path) => (Logger::new(FileSink::new(path, 1 << 20)?), None),
        Err(_) => {
            let memory = MemorySink::new();
            (Logger::new(memory.clone()), Some(memory))
        }
    };

    let mut config = LayoutConfig::new(LayoutSettings::default().with_body_ratio(0.6))?
        .with_logger(logger);
    config.enable_metrics();

    let mut scaffold = AdaptiveScaffold::builder()
        .config(config)
        .destinations([
            Destination::new("Inbox", "inbox"),
            Destination::new("Articles", "article"),
            Destination::new("Chat", "chat"),
        ])
        .selected_index(0)
        .on_selected_index_change(|index| eprintln!("selected destination {index}"))
        .body(|env: &Environment| Block::new(format!("body {}px", env.width())))
        .small_body(|_: &Environment| Block::new("compact body"))
        .secondary_body(|_: &Environment| Block::new("details"))
        .hide_secondary_body_on_small()
        .build()?;

    let renderer = PreviewRenderer::new(PreviewSettings {
        cell_size: Size::new(12.0, 30.0),
        origin: (0, 1),
        restore_cursor: Some((0, 0)),
    });

    let steps = [
        (480.0, Platform::Android, TextDirection::Ltr),
        (720.0, Platform::Android, TextDirection::Ltr),
        (1200.0, Platform::Android, TextDirection::Ltr),
        (1200.0, Platform::Android, TextDirection::Rtl),
        (480.0, Platform::Linux, TextDirection::Ltr),
    ];

    let mut stdout = io::stdout();
    execute!(stdout, Hide)?;
    for (index, (width, platform, direction)) in steps.into_iter().enumerate() {
        let env = Environment::builder(Size::new(width, 720.0))
            .platform(platform)
            .direction(direction)
            .build()?;
        scaffold.select(index % scaffold.destinations().len())?;

        loop {
            let frame = scaffold.layout(&env);
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
            write!(
                stdout,
                "{width}px {platform:?} {direction:?} drawer={}",
                frame.drawer.is_some()
            )?;
            renderer.render(&mut stdout, &frame.layout)?;

            if !scaffold.is_animating() {
                break;
            }
            thread::sleep(FRAME);
            scaffold.tick(FRAME);
        }
        thread::sleep(Duration::from_millis(800));
    }
    execute!(stdout, Show, Clear(ClearType::All), MoveTo(0, 0))?;

    if let Some(snapshot) = scaffold.layout_engine().metrics_snapshot() {
        println!("{snapshot:?}");
    }
    if let Some(memory) = memory {
        println!("{} log events captured", memory.events().len());
    }
    Ok(())
}
