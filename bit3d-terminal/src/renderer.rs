/// ASCII rasterizer for terminal rendering
use bit3d_core::{Color, Paint, StateStack, Surface, SurfaceState};
use crossterm::{
    cursor::MoveTo,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::f32::consts::TAU;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Segments used to approximate a full circle.
const ARC_SEGMENTS: f32 = 48.0;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Default)]
struct SubPath {
    points: Vec<(f32, f32)>,
    closed: bool,
}

/// A `Surface` that rasterizes into a grid of colored characters.
///
/// Surface coordinates are centered on the grid; one column spans
/// `units_per_column` surface units and one row twice that.
pub struct CharSurface {
    width: usize,
    height: usize,
    units_per_column: f32,
    pixels: Vec<[f32; 3]>,
    /// Luminance of the last clear color; glyph density is measured above it.
    baseline: f32,
    path: Vec<SubPath>,
    state: StateStack,
}

impl CharSurface {
    pub fn new(width: usize, height: usize, units_per_column: f32) -> Self {
        Self {
            width,
            height,
            units_per_column,
            pixels: vec![[0.0; 3]; width * height],
            baseline: 0.0,
            path: Vec::new(),
            state: StateStack::default(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 3]; width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state.current
    }

    /// RGB of a cell, or `None` outside the grid.
    pub fn pixel(&self, col: usize, row: usize) -> Option<(u8, u8, u8)> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[row * self.width + col];
        Some((r as u8, g as u8, b as u8))
    }

    /// The glyph a cell renders as.
    pub fn glyph(&self, col: usize, row: usize) -> char {
        match self.pixel(col, row) {
            Some((r, g, b)) => self.glyph_for(Color::rgb(r, g, b)),
            None => ' ',
        }
    }

    fn glyph_for(&self, color: Color) -> char {
        let headroom = (1.0 - self.baseline).max(1e-6);
        let level = ((color.luminance() - self.baseline) / headroom).clamp(0.0, 1.0);
        let index = (level * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    fn to_cell(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.width as f32 / 2.0 + x / self.units_per_column,
            self.height as f32 / 2.0 + y / (self.units_per_column * CELL_ASPECT),
        )
    }

    fn to_surface(&self, col: f32, row: f32) -> (f32, f32) {
        (
            (col - self.width as f32 / 2.0) * self.units_per_column,
            (row - self.height as f32 / 2.0) * self.units_per_column * CELL_ASPECT,
        )
    }

    fn push_point(&mut self, point: (f32, f32)) {
        if let Some(sub) = self.path.last_mut().filter(|sub| !sub.closed) {
            sub.points.push(point);
            return;
        }
        // A closed subpath continues from its start point.
        let points = match self.path.last() {
            Some(sub) => vec![sub.points[0], point],
            None => vec![point],
        };
        self.path.push(SubPath {
            points,
            closed: false,
        });
    }

    fn blend(&mut self, col: usize, row: usize, color: Color, alpha: f32) {
        let a = (color.a * alpha).clamp(0.0, 1.0);
        let pixel = &mut self.pixels[row * self.width + col];
        for (channel, value) in pixel.iter_mut().zip([color.r, color.g, color.b]) {
            *channel = *channel * (1.0 - a) + value as f32 * a;
        }
    }

    fn plot(&mut self, x: f32, y: f32, color: Color, alpha: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (col, row) = (x as usize, y as usize);
        if col < self.width && row < self.height {
            self.blend(col, row, color, alpha);
        }
    }

    fn paint_cell(&mut self, col: usize, row: usize, paint: &Paint, alpha: f32) {
        let (x, y) = self.to_surface(col as f32 + 0.5, row as f32 + 0.5);
        let color = paint.color_at(x, y);
        self.blend(col, row, color, alpha);
    }

    /// Clip a segment in cell coordinates to the grid plus a one-cell margin
    /// (Liang-Barsky). Points near the focal plane project arbitrarily far
    /// out, so strokes are only stepped across the visible part.
    fn clip_segment(&self, a: (f32, f32), b: (f32, f32)) -> Option<((f32, f32), (f32, f32))> {
        if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (ax, ay) = (a.0 as f64, a.1 as f64);
        let (dx, dy) = (b.0 as f64 - ax, b.1 as f64 - ay);
        let (min_x, max_x) = (-1.0, self.width as f64 + 1.0);
        let (min_y, max_y) = (-1.0, self.height as f64 + 1.0);

        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-dx, ax - min_x),
            (dx, max_x - ax),
            (-dy, ay - min_y),
            (dy, max_y - ay),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| ((ax + dx * t) as f32, (ay + dy * t) as f32);
        Some((at(t0), at(t1)))
    }

    /// Write the grid to a terminal, one row per line.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(u8, u8, u8)> = None;
        for row in 0..self.height {
            writer.queue(MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let (r, g, b) = self.pixel(col, row).unwrap_or((0, 0, 0));
                if current != Some((r, g, b)) {
                    writer.queue(SetForegroundColor(TermColor::Rgb { r, g, b }))?;
                    current = Some((r, g, b));
                }
                writer.queue(Print(self.glyph_for(Color::rgb(r, g, b))))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for CharSurface {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let point = self.to_cell(x, y);
        self.path.push(SubPath {
            points: vec![point],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let point = self.to_cell(x, y);
        self.push_point(point);
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            if !sub.points.is_empty() {
                sub.closed = true;
            }
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        let sweep = end_angle - start_angle;
        let steps = ((sweep.abs() / TAU) * ARC_SEGMENTS).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let angle = start_angle + sweep * i as f32 / steps as f32;
            let point = self.to_cell(x + radius * angle.cos(), y + radius * angle.sin());
            self.push_point(point);
        }
    }

    /// Even-odd scanline fill of every subpath, each implicitly closed.
    fn fill(&mut self) {
        let state = self.state.current;
        let mut edges = Vec::new();
        let mut sum = (0.0, 0.0);
        let mut count = 0;
        for sub in &self.path {
            let n = sub.points.len();
            for i in 0..n {
                edges.push((sub.points[i], sub.points[(i + 1) % n]));
                sum.0 += sub.points[i].0;
                sum.1 += sub.points[i].1;
                count += 1;
            }
        }
        if count == 0 {
            return;
        }

        let mut covered = 0;
        for row in 0..self.height {
            let py = row as f32 + 0.5;
            let mut crossings: Vec<f32> = edges
                .iter()
                .filter(|(a, b)| (a.1 <= py) != (b.1 <= py))
                .map(|(a, b)| a.0 + (py - a.1) * (b.0 - a.0) / (b.1 - a.1))
                .collect();
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((span[1] - 0.5).ceil().max(0.0) as usize).min(self.width);
                for col in start..end {
                    self.paint_cell(col, row, &state.fill, state.global_alpha);
                    covered += 1;
                }
            }
        }

        // Shapes smaller than a cell still mark the cell they sit in.
        if covered == 0 {
            let (cx, cy) = (sum.0 / count as f32, sum.1 / count as f32);
            if cx >= 0.0 && cy >= 0.0 && (cx as usize) < self.width && (cy as usize) < self.height {
                self.paint_cell(cx as usize, cy as usize, &state.fill, state.global_alpha);
            }
        }
    }

    fn stroke(&mut self) {
        let state = self.state.current;
        let mut segments = Vec::new();
        for sub in &self.path {
            segments.extend(sub.points.windows(2).map(|w| (w[0], w[1])));
            if sub.closed && sub.points.len() > 2 {
                segments.push((sub.points[sub.points.len() - 1], sub.points[0]));
            }
        }

        for (a, b) in segments {
            let Some((a, b)) = self.clip_segment(a, b) else {
                continue;
            };
            let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let x = a.0 + (b.0 - a.0) * i as f32 / steps as f32;
                let y = a.1 + (b.1 - a.1) * i as f32 / steps as f32;
                self.plot(x, y, state.stroke, state.global_alpha);
            }
        }
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
        let a = color.a.clamp(0.0, 1.0);
        for pixel in &mut self.pixels {
            for (channel, value) in pixel.iter_mut().zip([color.r, color.g, color.b]) {
                *channel = *channel * (1.0 - a) + value as f32 * a;
            }
        }
        self.baseline = color.luminance();
    }
}
