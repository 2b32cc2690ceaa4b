use std::error::Error;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use log::{error, info};
use sdl2::event::Event;

use chip8_core::{Chip8, Step};
use chip8_display::{Palette, Screen};

use crate::cli::Args;
use crate::keymap::{translate, Input};
use crate::pace::Pacer;

type Shared = Arc<Mutex<Chip8>>;

fn lock(chip8: &Mutex<Chip8>) -> Result<MutexGuard<'_, Chip8>, Box<dyn Error>> {
    chip8
        .lock()
        .map_err(|_| "the cpu thread panicked while holding the machine".into())
}

/// Loads the rom and drives the machine until the window is closed.
///
/// Two loops share the machine behind one lock:
/// - a cpu thread steps it at `clock_hz`
/// - this thread handles input, ticks the timers and redraws at `timer_hz`
pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let rom = fs::read(&args.rom)?;
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    chip8.load_program(&rom)?;
    info!("loaded {} ({} bytes)", args.rom.display(), rom.len());

    let sdl = sdl2::init()?;
    let mut screen = Screen::new(&sdl, args.scale, Palette::default())?;
    let mut events = sdl.event_pump()?;

    let chip8: Shared = Arc::new(Mutex::new(chip8));
    let running = Arc::new(AtomicBool::new(true));
    let cpu = spawn_cpu(Arc::clone(&chip8), Arc::clone(&running), args.clock_hz)?;

    let result = drive_frames(&chip8, &rom, &mut screen, &mut events, args.timer_hz);

    running.store(false, Ordering::Relaxed);
    cpu.join().map_err(|_| "the cpu thread panicked")?;
    result
}

/// Steps the machine at a fixed rate until `running` is lowered.
///
/// The loop is paced even while the program sits in a `WaitKey`, which would otherwise
/// spin on the same instruction.
fn spawn_cpu(
    chip8: Shared,
    running: Arc<AtomicBool>,
    clock_hz: u32,
) -> Result<JoinHandle<()>, Box<dyn Error>> {
    let handle = thread::Builder::new()
        .name("cpu".to_string())
        .spawn(move || {
            let mut pacer = Pacer::new(clock_hz);
            let mut waiting = false;
            while running.load(Ordering::Relaxed) {
                let step = match chip8.lock() {
                    Ok(mut machine) => machine.step(),
                    Err(_) => {
                        error!("machine lock poisoned; stopping the cpu");
                        break;
                    }
                };
                match step {
                    Step::AwaitingKey if !waiting => {
                        info!("waiting for a key");
                        waiting = true;
                    }
                    Step::AwaitingKey => {}
                    _ => waiting = false,
                }
                pacer.wait();
            }
        })?;
    Ok(handle)
}

/// The 60Hz side: input, timers and rendering
fn drive_frames(
    chip8: &Mutex<Chip8>,
    rom: &[u8],
    screen: &mut Screen,
    events: &mut sdl2::EventPump,
    timer_hz: u32,
) -> Result<(), Box<dyn Error>> {
    let mut pacer = Pacer::new(timer_hz);

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match translate(key) {
                    Some(Input::Key(kc)) => lock(chip8)?.set_key(kc, true),
                    Some(Input::Restart) => {
                        let mut machine = lock(chip8)?;
                        machine.reset();
                        machine.load_program(rom)?;
                        info!("restarted");
                    }
                    Some(Input::Quit) => break 'event,
                    None => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(Input::Key(kc)) = translate(key) {
                        lock(chip8)?.set_key(kc, false);
                    }
                }
                _ => continue,
            };
        }

        // Advance the timers and pick up the frame if the draw flag is set
        let frame = {
            let mut machine = lock(chip8)?;
            if machine.tick_timers() {
                info!("beep");
            }
            machine.take_frame()
        };
        if let Some(frame) = frame {
            screen.render(&frame)?;
        }

        pacer.wait();
    }
    Ok(())
}
