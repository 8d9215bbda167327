use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result, bail};
use nback_core::{Align, Placed, Rgba, Shape};
use nback_timing::{HighPrecisionTimer, Timer};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use string_cache::DefaultAtom as Atom;
use tiny_skia::{Color, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform};

const BACKGROUND: Rgba = nback_core::stimulus::GREY;
const OUTLINE_WIDTH: f32 = 2.0;

/// Rasterised lines keyed by content, size and colour
struct TextCache {
    font: FontArc,
    map: HashMap<(Atom, u32, Rgba), Arc<Pixmap>>,
}

impl TextCache {
    fn new(font: FontArc) -> Self {
        Self {
            font,
            map: HashMap::new(),
        }
    }

    fn measure(&self, line: &str, size: f32) -> f32 {
        let sf = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut prev = None;
        for ch in line.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(p) = prev {
                width += sf.kern(p, id);
            }
            width += sf.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn line_height(&self, size: f32) -> f32 {
        let sf = self.font.as_scaled(PxScale::from(size));
        sf.height() + sf.line_gap()
    }

    fn get_or_render(&mut self, line: &str, size: f32, color: Rgba) -> Option<Arc<Pixmap>> {
        let key = (Atom::from(line), size.to_bits(), color);
        if let Some(p) = self.map.get(&key) {
            return Some(Arc::clone(p));
        }
        let pm = Arc::new(render_text_pixmap(line, size, &self.font, color)?);
        self.map.insert(key, Arc::clone(&pm));
        Some(pm)
    }
}

/// Renders one line into a pixmap as tall as the font's ascent-to-descent
/// box, baseline at the ascent. `None` for lines without visible glyphs.
pub fn render_text_pixmap(text: &str, size: f32, font: &FontArc, color: Rgba) -> Option<Pixmap> {
    let scale = PxScale::from(size);
    let sf = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let w = pen_x.ceil().max(1.0) as u32;
    let h = sf.height().ceil().max(1.0) as u32;
    let mut mask = Mask::new(w, h)?;
    let stride = w as usize;
    let mut inked = false;
    {
        let coverage = mask.data_mut();
        for g in glyphs {
            let Some(out) = font.outline_glyph(g) else {
                continue;
            };
            let b = out.px_bounds();
            out.draw(|x, y, cov| {
                let ix = (b.min.x + x as f32) as i32;
                let iy = (b.min.y + y as f32) as i32;
                if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                    return;
                }
                let i = iy as usize * stride + ix as usize;
                let a = (cov.clamp(0.0, 1.0) * 255.0) as u8;
                coverage[i] = coverage[i].saturating_add(a);
                inked |= a > 0;
            });
        }
    }
    if !inked {
        return None;
    }

    let mut pm = Pixmap::new(w, h)?;
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    pm.fill_rect(
        Rect::from_xywh(0.0, 0.0, w as f32, h as f32)?,
        &paint,
        Transform::identity(),
        Some(&mask),
    );
    Some(pm)
}

/// Centre-origin, y-up position to canvas pixels
pub fn to_canvas(center: (f32, f32), pos: (f32, f32)) -> (f32, f32) {
    (center.0 + pos.0, center.1 - pos.1)
}

/// Greedy word wrap; words wider than `max_width` keep a line to themselves
pub fn wrap_line(line: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

pub fn stroke_outline(
    pixmap: &mut Pixmap,
    center: (f32, f32),
    pos: (f32, f32),
    size: (f32, f32),
    color: Rgba,
) {
    let (cx, cy) = to_canvas(center, pos);
    let Some(rect) = Rect::from_xywh(cx - size.0 / 2.0, cy - size.1 / 2.0, size.0, size.1) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    let stroke = Stroke {
        width: OUTLINE_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

pub struct FrameStats {
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
    pub items: usize,
}

pub struct SkiaRenderer {
    width: u32,
    height: u32,
    center: (f32, f32),
    text_cache: TextCache,
    canvas: Pixmap,
    timer: HighPrecisionTimer,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, font: FontArc) -> Result<Self> {
        let canvas = Pixmap::new(width, height).context("zero-sized canvas")?;
        Ok(Self {
            width,
            height,
            center: (width as f32 / 2.0, height as f32 / 2.0),
            text_cache: TextCache::new(font),
            canvas,
            timer: HighPrecisionTimer::new(),
        })
    }

    pub fn load_font(path: &Path) -> Result<FontArc> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        FontArc::try_from_vec(bytes).with_context(|| format!("invalid font {}", path.display()))
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<()> {
        self.canvas = Pixmap::new(new_width, new_height).context("zero-sized canvas")?;
        self.width = new_width;
        self.height = new_height;
        self.center = (new_width as f32 / 2.0, new_height as f32 / 2.0);
        Ok(())
    }

    /// Clears to the background, draws every item and copies the result
    /// into an RGBA8 frame buffer of the same size.
    pub fn render_frame(&mut self, items: &[Placed], frame_buffer: &mut [u8]) -> Result<FrameStats> {
        let t_draw = self.timer.now();
        let [r, g, b, a] = BACKGROUND;
        self.canvas.fill(Color::from_rgba8(r, g, b, a));
        for item in items {
            match &item.shape {
                Shape::Text {
                    content,
                    size,
                    color,
                    wrap_width,
                    align,
                } => self.draw_text(content, *size, *color, *wrap_width, *align, item.pos),
                Shape::Outline {
                    width,
                    height,
                    color,
                } => stroke_outline(
                    &mut self.canvas,
                    self.center,
                    item.pos,
                    (*width, *height),
                    *color,
                ),
            }
        }
        let draw = self.timer.elapsed(t_draw);

        let t_copy = self.timer.now();
        let data = self.canvas.data();
        if frame_buffer.len() != data.len() {
            bail!(
                "frame buffer holds {} bytes, canvas {}x{} needs {}",
                frame_buffer.len(),
                self.width,
                self.height,
                data.len()
            );
        }
        frame_buffer.copy_from_slice(data);
        let copy = self.timer.elapsed(t_copy);

        Ok(FrameStats {
            draw,
            copy,
            total: draw + copy,
            items: items.len(),
        })
    }

    fn draw_text(
        &mut self,
        content: &str,
        size: f32,
        color: Rgba,
        wrap_width: Option<f32>,
        align: Align,
        pos: (f32, f32),
    ) {
        let mut lines = Vec::new();
        for raw in content.split('\n') {
            match wrap_width {
                Some(w) => lines.extend(wrap_line(raw, w, |s| self.text_cache.measure(s, size))),
                None => lines.push(raw.to_string()),
            }
        }
        let widths: Vec<f32> = lines
            .iter()
            .map(|l| self.text_cache.measure(l, size))
            .collect();
        let block_width = wrap_width.unwrap_or_else(|| widths.iter().copied().fold(0.0, f32::max));
        let line_height = self.text_cache.line_height(size);

        let (cx, cy) = to_canvas(self.center, pos);
        let top = cy - line_height * lines.len() as f32 / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let Some(pm) = self.text_cache.get_or_render(line, size, color) else {
                continue;
            };
            let x = match align {
                Align::Center => cx - widths[i] / 2.0,
                Align::Left => cx - block_width / 2.0,
            };
            let y = top + i as f32 * line_height;
            self.canvas.draw_pixmap(
                x.round() as i32,
                y.round() as i32,
                (*pm).as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_origin_maps_y_up() {
        assert_eq!(to_canvas((640.0, 360.0), (-270.0, 200.0)), (370.0, 160.0));
        assert_eq!(to_canvas((640.0, 360.0), (300.0, -250.0)), (940.0, 610.0));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let by_chars = |s: &str| s.chars().count() as f32 * 10.0;
        assert_eq!(
            wrap_line("the quick brown fox", 100.0, by_chars),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(
            wrap_line("incomprehensibilities ok", 100.0, by_chars),
            vec!["incomprehensibilities", "ok"]
        );
        assert_eq!(wrap_line("", 100.0, by_chars), vec![""]);
    }

    #[test]
    fn outline_strokes_edges_only() {
        let mut pm = Pixmap::new(100, 100).unwrap();
        pm.fill(Color::from_rgba8(128, 128, 128, 255));
        stroke_outline(&mut pm, (50.0, 50.0), (0.0, 0.0), (50.0, 60.0), [255, 255, 0, 255]);

        let edge = pm.pixel(25, 50).unwrap();
        assert_eq!((edge.red(), edge.green(), edge.blue()), (255, 255, 0));
        let inside = pm.pixel(50, 50).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue()), (128, 128, 128));
    }
}
