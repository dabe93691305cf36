use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::info;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};

use sandbox_runtime::{
    print_final_state, CameraController, FirstPersonCamera, FsAssetLoader, KeyCode, LightKind,
    NamedKey, Sandbox, SandboxConfig, SummaryRenderer,
};

type Session = Sandbox<FirstPersonCamera, SummaryRenderer>;

#[derive(Parser, Debug, Clone)]
#[command(name = "sandbox-runtime")]
#[command(about = "Procedural 3D sandbox with first-person navigation", long_about = None)]
struct Cli {
    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Object slots to populate instead of a random count
    #[arg(long)]
    count: Option<usize>,

    /// Run without a window
    #[arg(long, default_value = "false")]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Seconds per simulated frame in headless mode
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_time: f32,

    /// Directory model and texture paths are resolved against
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// XML model catalog replacing the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Light type selected at startup (none, ambient, point, directional, spot)
    #[arg(long)]
    light: Option<LightKind>,

    /// Keys held down for the whole headless run, e.g. `--hold w --hold d`
    #[arg(long)]
    hold: Vec<String>,
}

impl Cli {
    fn config(&self) -> SandboxConfig {
        SandboxConfig {
            seed: self.seed,
            asset_root: self.assets.clone(),
            catalog: self.catalog.clone(),
            ..SandboxConfig::default()
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    let loader = Arc::new(FsAssetLoader::new(config.asset_root.clone()));
    let mut session: Session = Sandbox::new(
        &config,
        loader,
        FirstPersonCamera::default(),
        SummaryRenderer::default(),
    )?;

    let report = match cli.count {
        Some(count) => session.populate_with(count),
        None => session.populate(),
    };
    println!(
        "Populated scene with {} slots ({} attached, {} pending)",
        report.requested, report.attached, report.deferred
    );
    if let Some(kind) = cli.light {
        session.on_light_type_change(kind);
    }

    if cli.headless {
        run_headless(&mut session, &cli);
        return Ok(());
    }

    match run_interactive(&mut session) {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!(
                "{err}. Falling back to --headless mode (set DISPLAY or install X11 libs to open a window)."
            );
            run_headless(&mut session, &cli);
            Ok(())
        }
    }
}

fn run_headless(session: &mut Session, cli: &Cli) {
    for name in &cli.hold {
        session.on_key_down(KeyCode::from_name(name));
    }
    for _ in 0..cli.frames {
        session.frame(cli.frame_time);
    }
    let resolved = session.wait_for_pending_loads();
    println!(
        "Resolved {} model(s), {} failed",
        resolved.attached.len(),
        resolved.failed
    );
    let position = session.camera().position();
    println!(
        "Ran {} frames; camera at ({:.2}, {:.2}, {:.2})",
        session.frames(),
        position.x,
        position.y,
        position.z
    );
    print_final_state(session);
}

fn run_interactive(session: &mut Session) -> Result<(), WindowInitError> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let mut event_loop =
        event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;
    let window = WindowBuilder::new()
        .with_title("Sandbox Runtime")
        .with_inner_size(LogicalSize::new(800.0, 600.0))
        .build(&event_loop)
        .map_err(|err| WindowInitError::from_error("window", err))?;
    info!("press Enter to lock the camera, 0-4 to pick a light, Escape to release");

    let mut shell = Shell {
        session,
        window,
        last_frame: Instant::now(),
    };
    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        shell.process_event(&event, control_flow);
    });

    shell.session.wait_for_pending_loads();
    print_final_state(shell.session);
    Ok(())
}

/// Forwards window events into the session.
struct Shell<'a> {
    session: &'a mut Session,
    window: Window,
    last_frame: Instant,
}

impl Shell<'_> {
    fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                match event {
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    WindowEvent::Resized(size) if size.height > 0 => {
                        let aspect = size.width as f32 / size.height as f32;
                        self.session.renderer_mut().set_aspect(aspect);
                    }
                    WindowEvent::KeyboardInput { input, .. } => self.handle_keyboard(input),
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.window.id() => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;
                let report = self.session.frame(elapsed);
                if report.frame % 60 == 0 {
                    let position = self.session.camera().position();
                    self.window.set_title(&format!(
                        "Sandbox Runtime - {} objects, light: {}, camera ({:.1}, {:.1}, {:.1})",
                        self.session.scene().len(),
                        self.session.scene().light_kind(),
                        position.x,
                        position.y,
                        position.z
                    ));
                }
            }
            Event::MainEventsCleared => self.window.request_redraw(),
            _ => {}
        }
    }

    fn handle_keyboard(&mut self, input: &KeyboardInput) {
        let Some(key) = input.virtual_keycode.and_then(map_keycode) else {
            return;
        };
        if input.state == ElementState::Released {
            self.session.on_key_up(key);
            return;
        }
        match key {
            KeyCode::Named(NamedKey::Enter) => self.session.start(),
            KeyCode::Named(NamedKey::Escape) => self.session.stop(),
            KeyCode::Digit(digit) => {
                if let Some(kind) = light_for_digit(digit) {
                    self.session.on_light_type_change(kind);
                }
            }
            _ => {}
        }
        self.session.on_key_down(key);
    }
}

fn light_for_digit(digit: u8) -> Option<LightKind> {
    Some(match digit {
        0 => LightKind::None,
        1 => LightKind::Ambient,
        2 => LightKind::Point,
        3 => LightKind::Directional,
        4 => LightKind::Spot,
        _ => return None,
    })
}

fn map_keycode(code: winit::event::VirtualKeyCode) -> Option<KeyCode> {
    use winit::event::VirtualKeyCode as Key;
    Some(match code {
        Key::Space => KeyCode::Named(NamedKey::Space),
        Key::Return => KeyCode::Named(NamedKey::Enter),
        Key::Escape => KeyCode::Named(NamedKey::Escape),
        Key::Left => KeyCode::Named(NamedKey::Left),
        Key::Right => KeyCode::Named(NamedKey::Right),
        Key::Up => KeyCode::Named(NamedKey::Up),
        Key::Down => KeyCode::Named(NamedKey::Down),
        Key::LShift => KeyCode::Named(NamedKey::LeftShift),
        Key::RShift => KeyCode::Named(NamedKey::RightShift),
        Key::Key0 => KeyCode::Digit(0),
        Key::Key1 => KeyCode::Digit(1),
        Key::Key2 => KeyCode::Digit(2),
        Key::Key3 => KeyCode::Digit(3),
        Key::Key4 => KeyCode::Digit(4),
        Key::A => KeyCode::Character('A'),
        Key::D => KeyCode::Character('D'),
        Key::E => KeyCode::Character('E'),
        Key::Q => KeyCode::Character('Q'),
        Key::S => KeyCode::Character('S'),
        Key::W => KeyCode::Character('W'),
        _ => return None,
    })
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}
