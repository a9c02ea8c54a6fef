//! Phobos Jam entry point
//!
//! Headless native driver: loads settings and a world map, then runs the
//! fixed-rate frame loop against a scripted input feed, recording draw calls
//! instead of presenting them. A windowed backend plugs in at `RenderSink`
//! and `InputEvent`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec2;

use phobos_jam::GameError;
use phobos_jam::Settings;
use phobos_jam::assets::sprite_frames;
use phobos_jam::input::{InputEvent, InputState};
use phobos_jam::map::WorldMap;
use phobos_jam::render::{DrawList, FrameAssets, draw_frame};
use phobos_jam::sim::{GameState, tick};
use phobos_jam::ui::{MessageFeed, MessageLog};

/// Player sprite sheet layout: two walking frames and a grappling frame
const PLAYER_SHEET_SIZE: (u32, u32) = (126, 42);
const PLAYER_FRAME_SIZE: (u32, u32) = (42, 42);
const STAR_TILE_SIZE: Vec2 = Vec2::new(512.0, 512.0);

/// Generated map size in blocks when no map file is given
const GENERATED_MAP_SIZE: (u32, u32) = (256, 64);

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Phobos Jam headless driver")]
struct Args {
    /// JSON settings file; defaults are used when missing or invalid
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings to this file and continue
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// RGB PNG world map; terrain is generated from --seed when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Frames to run before quitting
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seed for generated terrain
    #[arg(long, default_value_t = 0x9E37_79B9)]
    seed: u64,

    /// Sleep to hold the configured frame rate
    #[arg(long)]
    realtime: bool,
}

/// Scripted stand-in for a player at the keyboard
fn demo_events(frame: u64, frames: u64, screen: Vec2) -> Vec<InputEvent> {
    let center = screen * 0.5;
    let mut events = Vec::new();

    if frame == 0 {
        events.push(InputEvent::KeyDown('d' as u32));
    }
    match frame % 90 {
        45 => events.push(InputEvent::KeyDown(' ' as u32)),
        46 => events.push(InputEvent::KeyUp(' ' as u32)),
        _ => {}
    }
    match frame % 240 {
        200 => events.push(InputEvent::PointerDown(center + Vec2::new(200.0, -150.0))),
        230 => events.push(InputEvent::PointerUp),
        _ => {}
    }
    if frame % 120 == 60 {
        events.push(InputEvent::SecondaryClick(center + Vec2::new(48.0, 0.0)));
    }
    if frame + 1 >= frames {
        events.push(InputEvent::Quit);
    }
    events
}

fn run() -> Result<(), GameError> {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    settings.validate()?;
    if let Some(path) = &args.save_settings {
        settings.save(path)?;
    }

    let map = match &args.map {
        Some(path) => WorldMap::load_png(path)?,
        None => {
            let (w, h) = GENERATED_MAP_SIZE;
            WorldMap::generate(args.seed, w, h)
        }
    };

    let mut state = GameState::new(&map, &settings)?;
    let assets = FrameAssets {
        player_frames: sprite_frames(PLAYER_SHEET_SIZE, PLAYER_FRAME_SIZE)?,
        star_tile: STAR_TILE_SIZE,
    };
    let mut input = InputState::new(settings.keys.clone());
    let mut draw_list = DrawList::new();

    let messages = MessageLog::default();
    let mut feed = MessageFeed::spawn(messages.clone(), Duration::from_secs(1), |n| {
        format!("Phobos control: transmission {n}")
    });

    let frame_time = Duration::from_secs_f64(1.0 / f64::from(settings.fps));
    let fps = u64::from(settings.fps);
    let started = Instant::now();
    log::info!("Phobos Jam running, {} frames at {} fps", args.frames, settings.fps);

    let mut frame = 0u64;
    while !input.is_quit() {
        let frame_start = Instant::now();

        for event in demo_events(frame, args.frames, state.camera.screen_size()) {
            input.handle(event);
        }
        let tick_input = input.snapshot();
        let contacts = tick(&mut state, &tick_input);

        draw_list.clear();
        draw_frame(&state, &tick_input, &assets, &mut draw_list)?;

        if frame % fps == 0 {
            log::info!(
                "t={} player at {} contacts {:?}, {} draw calls, {} poles",
                state.time_ticks,
                state.player.position(),
                contacts,
                draw_list.len(),
                state.poles.placed().count()
            );
            for line in messages.recent(1) {
                log::info!("{}", line);
            }
        }

        frame += 1;
        if args.realtime {
            if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    feed.shutdown();
    log::info!(
        "stopped after {} frames in {:?}, {} messages received",
        frame,
        started.elapsed(),
        messages.len()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Phobos Jam starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
