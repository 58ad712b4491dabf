//! The drawing surface contract and a recording implementation
use crate::color::{Color, Paint};

/// A 2D drawing backend with canvas-style scoped state.
///
/// Primitives build a path, pick styles and fill or stroke it. Style changes
/// made between `save` and the matching `restore` must not outlive the
/// `restore`.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    /// Circular arc around `(x, y)`, angles in radians, clockwise on screen.
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);

    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, color: Color);
    fn set_global_alpha(&mut self, alpha: f32);

    /// Paint the whole surface with `color`, blending by its alpha.
    fn clear(&mut self, color: Color);
}

/// Style state covered by `save`/`restore`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub fill: Paint,
    pub stroke: Color,
    pub global_alpha: f32,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            fill: Paint::Solid(Color::BLACK),
            stroke: Color::BLACK,
            global_alpha: 1.0,
        }
    }
}

/// Stack of saved states. `restore` without a matching `save` is ignored,
/// as on an HTML canvas.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    pub current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// One recorded surface call. Fill and stroke capture the style in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
    Arc {
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Fill { paint: Paint, alpha: f32 },
    Stroke { color: Color, alpha: f32 },
    Clear(Color),
}

/// A surface that draws nothing and records every call, for tests and
/// headless inspection of a frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    state: StateStack,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state.current
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.state.save();
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.state.restore();
        self.commands.push(DrawCommand::Restore);
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn fill(&mut self) {
        let state = self.state.current;
        self.commands.push(DrawCommand::Fill {
            paint: state.fill,
            alpha: state.global_alpha,
        });
    }

    fn stroke(&mut self) {
        let state = self.state.current;
        self.commands.push(DrawCommand::Stroke {
            color: state.stroke,
            alpha: state.global_alpha,
        });
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.current.fill = paint;
    }

    fn set_stroke(&mut self, color: Color) {
        self.state.current.stroke = color;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.current.global_alpha = alpha;
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }
}
