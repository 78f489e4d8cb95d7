//! Native window, input translation and the paced frame loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::Settings;
use crate::assets::AssetCache;
use crate::audio::AudioManager;
use crate::consts::{FPS, MAX_FRAME_DT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::games::{GameKind, InputEvent, Key, all_manifests};
use crate::launcher::{Mode, Session};
use crate::renderer::{Frame, RenderState};

/// Keyboard keys the games listen to
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Space => Key::Space,
        KeyCode::Digit0 | KeyCode::Numpad0 => Key::Digit(0),
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Digit(1),
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Digit(2),
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Digit(3),
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Digit(4),
        KeyCode::Digit5 | KeyCode::Numpad5 => Key::Digit(5),
        KeyCode::Digit6 | KeyCode::Numpad6 => Key::Digit(6),
        KeyCode::Digit7 | KeyCode::Numpad7 => Key::Digit(7),
        KeyCode::Digit8 | KeyCode::Numpad8 => Key::Digit(8),
        KeyCode::Digit9 | KeyCode::Numpad9 => Key::Digit(9),
        _ => return None,
    };
    Some(key)
}

/// Physical window pixels to logical game coordinates
pub fn to_logical(position: PhysicalPosition<f64>, window_size: (u32, u32)) -> Vec2 {
    let (w, h) = window_size;
    if w == 0 || h == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        position.x as f32 * SCREEN_WIDTH / w as f32,
        position.y as f32 * SCREEN_HEIGHT / h as f32,
    )
}

/// Deadline after `scheduled`, keeping a fixed cadence. Re-anchors on `now`
/// once the loop has fallen more than one interval behind.
fn next_deadline(scheduled: Instant, now: Instant, interval: Duration) -> Instant {
    let next = scheduled + interval;
    if now.saturating_duration_since(next) > interval {
        now + interval
    } else {
        next
    }
}

struct WindowState {
    window: Arc<Window>,
    render: RenderState,
}

impl WindowState {
    fn new(event_loop: &ActiveEventLoop, title: &str) -> anyhow::Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("creating the window")?,
        );
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("creating the surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("finding a graphics adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render = pollster::block_on(RenderState::new(
            surface,
            &adapter,
            size.width.max(1),
            size.height.max(1),
        ))
        .context("opening the graphics device")?;

        Ok(Self { window, render })
    }
}

struct App {
    title: &'static str,
    assets: Arc<AssetCache>,
    audio: AudioManager,
    session: Session,
    state: Option<WindowState>,
    /// Input collected since the last frame
    events: Vec<InputEvent>,
    cursor: Vec2,
    last_frame: Instant,
    next_frame: Instant,
    frame_interval: Duration,
    error: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;
        let events = std::mem::take(&mut self.events);

        {
            let mut frame = Frame::default();
            self.session.frame(&events, dt, &mut self.audio, &mut frame);
            match state.render.render(&frame, &self.assets) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.render.reconfigure();
                }
                Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout, skipping frame"),
                Err(e) => {
                    self.fail(event_loop, anyhow::Error::new(e).context("presenting a frame"));
                    return;
                }
            }
        }

        if let Err(e) = self.session.end_frame() {
            self.fail(event_loop, anyhow::Error::new(e).context("starting a game"));
            return;
        }
        if self.session.is_finished() {
            log::info!("Goodbye");
            event_loop.exit();
        }
    }

    fn window_size(&self) -> (u32, u32) {
        self.state.as_ref().map_or((0, 0), |s| s.render.size)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match WindowState::new(event_loop, self.title) {
            Ok(state) => {
                log::info!("Window created: {}x{}", state.render.size.0, state.render.size.1);
                self.state = Some(state);
                self.last_frame = Instant::now();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(state) = &self.state {
                state.window.request_redraw();
            }
            self.next_frame = next_deadline(self.next_frame, now, self.frame_interval);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.render.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = map_key(code) {
                        self.events.push(InputEvent::Key(key));
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = to_logical(position, self.window_size());
                self.events.push(InputEvent::PointerMove(self.cursor));
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerDown(self.cursor),
                    ElementState::Released => InputEvent::PointerUp(self.cursor),
                };
                self.events.push(event);
            }

            WindowEvent::Touch(touch) => {
                let p = to_logical(touch.location, self.window_size());
                self.cursor = p;
                let event = match touch.phase {
                    TouchPhase::Started => InputEvent::PointerDown(p),
                    TouchPhase::Moved => InputEvent::PointerMove(p),
                    TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::PointerUp(p),
                };
                self.events.push(event);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

/// Open the window and run `mode` until it finishes or the window closes
pub fn run(mode: Mode, settings: &Settings) -> anyhow::Result<()> {
    let manifests = match mode {
        Mode::Launcher => all_manifests(),
        Mode::Standalone(kind) => vec![kind.manifest()],
    };
    let assets = Arc::new(AssetCache::load(&settings.asset_root, &manifests));
    let audio = AudioManager::from_settings(settings);
    let session =
        Session::new(mode, Arc::clone(&assets), settings).context("building the first screen")?;

    let title = match mode {
        Mode::Launcher => "Baby Fun Box",
        Mode::Standalone(kind) => kind.name(),
    };

    let event_loop = EventLoop::new().context("creating the event loop")?;
    let now = Instant::now();
    let mut app = App {
        title,
        assets,
        audio,
        session,
        state: None,
        events: Vec::new(),
        cursor: Vec2::ZERO,
        last_frame: now,
        next_frame: now,
        frame_interval: Duration::from_secs(1) / FPS,
        error: None,
    };
    event_loop.run_app(&mut app).context("running the event loop")?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Logger, settings, then [`run`]; shared by every binary
pub fn main(mode: Mode) -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load();
    match mode {
        Mode::Launcher => log::info!("Baby Fun Box starting..."),
        Mode::Standalone(kind) => log::info!("{} starting...", kind.name()),
    }
    log::info!(
        "Quality: {}, assets: {}",
        settings.quality.as_str(),
        settings.asset_root.display()
    );
    run(mode, &settings)
}

/// Standalone entry point for one game
pub fn main_standalone(kind: GameKind) -> anyhow::Result<()> {
    main(Mode::Standalone(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::Digit3), Some(Key::Digit(3)));
        assert_eq!(map_key(KeyCode::Numpad8), Some(Key::Digit(8)));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_late_wakeups_do_not_shift_the_schedule() {
        let interval = Duration::from_millis(16);
        let start = Instant::now();
        // Woken 5 ms late: the next deadline stays on the grid
        let next = next_deadline(start, start + Duration::from_millis(5), interval);
        assert_eq!(next, start + interval);
        let next = next_deadline(next, next + Duration::from_millis(3), interval);
        assert_eq!(next, start + interval * 2);
    }

    #[test]
    fn test_stall_reanchors_on_now() {
        let interval = Duration::from_millis(16);
        let start = Instant::now();
        let now = start + Duration::from_millis(200);
        assert_eq!(next_deadline(start, now, interval), now + interval);
    }

    #[test]
    fn test_to_logical_scales_hidpi_window() {
        let p = to_logical(PhysicalPosition::new(1024.0, 768.0), (2048, 1536));
        assert_eq!(p, Vec2::new(512.0, 384.0));
        assert_eq!(
            to_logical(PhysicalPosition::new(10.0, 10.0), (0, 0)),
            Vec2::ZERO
        );
    }
}
