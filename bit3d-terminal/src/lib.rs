/// Terminal front end: drives a bit3d scene in a crossterm session
use bit3d_core::{Camera, DragTracker, Scene};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::CharSurface;

/// Degrees of rotation per arrow/WASD key press.
const KEY_STEP: f32 = 5.0;

/// Camera travel along Z per `+`/`-` press.
const ZOOM_STEP: f32 = 20.0;

/// Driver settings chosen on the command line
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub fps: u32,
    /// Surface units spanned by one terminal column.
    pub units_per_column: f32,
    /// Degrees of rotation per column (or row) of mouse drag.
    pub drag_degrees: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            units_per_column: 6.0,
            drag_degrees: 4.0,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    initial_camera: Camera,
    surface: CharSurface,
    drag: DragTracker,
    config: AppConfig,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            initial_camera: scene.camera.clone(),
            scene,
            surface: CharSurface::new(width as usize, height as usize, config.units_per_column),
            drag: DragTracker::new(),
            config,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        info!(primitives = self.scene.len(), fps = self.config.fps, "terminal session started");

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        info!(frames = self.scene.tick(), "terminal session ended");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Update and render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one input event to the scene.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.surface.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.scene.drag(0.0, -KEY_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.scene.drag(0.0, KEY_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.scene.drag(-KEY_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.scene.drag(KEY_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.scene.camera.position.z += ZOOM_STEP,
            KeyCode::Char('-') => self.scene.camera.position.z -= ZOOM_STEP,
            KeyCode::Char('r') => {
                self.scene.camera = self.initial_camera.clone();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        let (x, y) = (column as f32, row as f32);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag.press(x, y),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag
                    .drag_camera(&mut self.scene.camera, x, y, self.config.drag_degrees);
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.release(),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Advance and draw the scene
        self.scene.frame(&mut self.surface);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        let rotation = self.scene.camera.rotation;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "bit3d | FPS: {:.1} | rot ({:.0}, {:.0}) | Drag/WASD=Rotate +/-=Dolly R=Reset Q=Quit",
                self.fps, rotation.x, rotation.y
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
