//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

/// Drawing helpers bound to the draw buffer, clip stack, theme and text backend of one surface.
/// Handed to [`Widget`] draw hooks and used by the built-in controls.
pub struct PaintCtx<'a> {
    buf: &'a mut DrawBuffer,
    clips: &'a mut ClipRectStack,
    theme: &'a Theme,
    metrics: &'a Metrics,
    text: &'a mut dyn TextBackend,
}

impl<'a> PaintCtx<'a> {
    pub(crate) fn new(buf: &'a mut DrawBuffer, clips: &'a mut ClipRectStack, theme: &'a Theme, metrics: &'a Metrics, text: &'a mut dyn TextBackend) -> Self {
        Self { buf, clips, theme, metrics, text }
    }

    /// Active theme.
    pub fn theme(&self) -> &Theme { self.theme }

    /// Active metrics.
    pub fn metrics(&self) -> &Metrics { self.metrics }

    /// Shortcut for `theme().color(id)`.
    pub fn color(&self, id: ThemeColor) -> Color { self.theme.color(id) }

    /// Raw draw buffer, for primitives without a helper here.
    pub fn buffer(&mut self) -> &mut DrawBuffer { self.buf }

    /// Effective clip rectangle.
    pub fn current_clip(&self) -> Rect { self.clips.top() }

    /// Narrows the clip to `r`.
    pub fn push_clip(&mut self, r: Rect) -> Rect { self.clips.push_rect(self.buf, r) }

    /// Restores the previous clip.
    pub fn pop_clip(&mut self) { self.clips.pop_rect(self.buf); }

    /// Font id to use for a control whose font is `font`.
    pub fn resolve_font(&self, font: Option<FontId>) -> FontId { font.unwrap_or(self.theme.default_font) }

    /// Solid fill.
    pub fn fill_rect(&mut self, r: Rect, color: Color) {
        self.buf.brush_color = color;
        self.buf.fill_rect(r);
    }

    /// One pixel outline inside `r`.
    pub fn draw_box(&mut self, r: Rect, color: Color) {
        self.buf.pen_color = color;
        self.buf.pen_width = 1.0;
        self.buf.draw_rect(r);
    }

    /// Plain one pixel line.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        self.buf.pen_color = color;
        self.buf.pen_width = 1.0;
        self.buf.draw_line(LineCap::None, LineCap::None, x0, y0, x1, y1);
    }

    /// Border decoration of `r` derived from `base`.
    pub fn draw_border(&mut self, r: Rect, style: BorderStyle, base: Color) {
        let amount = self.metrics.border_lighten;
        let (light, dark) = (base.lighten(amount), base.darken(amount));
        let (x0, y0) = (r.x as f32 + 0.5, r.y as f32 + 0.5);
        let (x1, y1) = ((r.x + r.w) as f32 - 0.5, (r.y + r.h) as f32 - 0.5);
        match style {
            BorderStyle::None => (),
            BorderStyle::Flat => self.draw_box(r, base),
            BorderStyle::Raised | BorderStyle::Lowered => {
                let (tl, br) = if style == BorderStyle::Raised { (light, dark) } else { (dark, light) };
                self.draw_line(x0, y0, x1, y0, tl);
                self.draw_line(x0, y0, x0, y1, tl);
                self.draw_line(x1, y0, x1, y1, br);
                self.draw_line(x0, y1, x1, y1, br);
            }
        }
    }

    /// Drop shadow behind `r`. The current clip is lifted while the shadow is emitted.
    pub fn draw_shadow(&mut self, r: Rect) {
        let saved = self.clips.pop_rect(self.buf);
        let size = self.metrics.shadow_size;
        self.buf.draw_shadow(r, size / 2, size as f32, self.theme.color(ThemeColor::Shadow));
        if let Some(clip) = saved {
            self.clips.push_rect(self.buf, clip);
        }
    }

    /// Dotted-style focus outline, drawn as a flat box in the focus color.
    pub fn draw_focus_rect(&mut self, r: Rect) {
        let c = self.theme.color(ThemeColor::FocusRect);
        self.draw_box(r, c);
    }

    /// Measures `text` with the backend.
    pub fn measure_text(&mut self, font: FontId, text: &str, options: TextOptions) -> Dimensioni { self.text.measure(font, text, options) }

    /// Bakes and draws `text` with its top-left corner at `pos`. Returns the measured size.
    pub fn draw_text(&mut self, font: FontId, text: &str, options: TextOptions, pos: Vec2i, color: Color) -> Dimensioni {
        let size = self.text.measure(font, text, options);
        if text.is_empty() || !self.clips.top().intersects(&rect(pos.x, pos.y, size.width, size.height)) {
            return size;
        }
        if let Some(handle) = self.text.bake(font, text, options) {
            self.buf.draw_text(handle, pos.x, pos.y, color);
        }
        size
    }

    /// Draws `text` centered inside `r`.
    pub fn draw_text_centered(&mut self, font: FontId, text: &str, options: TextOptions, r: Rect, color: Color) {
        let size = self.text.measure(font, text, options);
        let pos = vec2(r.x + (r.w - size.width) / 2, r.y + (r.h - size.height) / 2);
        self.draw_text(font, text, options, pos, color);
    }

    pub(crate) fn draw_arrow(&mut self, r: Rect, dir: Arrow, color: Color) {
        let cx = r.x as f32 + r.w as f32 / 2.0;
        let cy = r.y as f32 + r.h as f32 / 2.0;
        let s = (r.w.min(r.h) as f32 / 4.0).max(2.0);
        let (a, b, c) = match dir {
            Arrow::Up => (Vec2f::new(cx - s, cy + s / 2.0), Vec2f::new(cx + s, cy + s / 2.0), Vec2f::new(cx, cy - s / 2.0)),
            Arrow::Down => (Vec2f::new(cx - s, cy - s / 2.0), Vec2f::new(cx + s, cy - s / 2.0), Vec2f::new(cx, cy + s / 2.0)),
            Arrow::Left => (Vec2f::new(cx + s / 2.0, cy - s), Vec2f::new(cx + s / 2.0, cy + s), Vec2f::new(cx - s / 2.0, cy)),
            Arrow::Right => (Vec2f::new(cx - s / 2.0, cy - s), Vec2f::new(cx - s / 2.0, cy + s), Vec2f::new(cx + s / 2.0, cy)),
        };
        self.buf.brush_color = color;
        self.buf.fill_triangle(a, b, c);
    }

    pub(crate) fn draw_check(&mut self, r: Rect, color: Color) {
        let (x, y, w, h) = (r.x as f32, r.y as f32, r.w as f32, r.h as f32);
        self.buf.pen_color = color;
        self.buf.pen_width = 2.0;
        self.buf.draw_line(LineCap::Round, LineCap::Round, x + w * 0.2, y + h * 0.5, x + w * 0.45, y + h * 0.75);
        self.buf.draw_line(LineCap::Round, LineCap::Round, x + w * 0.45, y + h * 0.75, x + w * 0.8, y + h * 0.25);
        self.buf.pen_width = 1.0;
    }
}

impl UiEntry {
    /// Paint context over this surface's draw state.
    pub fn paint(&mut self) -> PaintCtx<'_> { PaintCtx::new(&mut self.draw, &mut self.clips, &self.theme, &self.metrics, self.text.as_mut()) }

    /// Background, shadow and border of a control at its cached absolute position.
    pub(crate) fn draw_chrome(&mut self, id: ControlId) {
        let Some(d) = self.control(id) else { return };
        let r = rect(d.abs.x, d.abs.y, d.width, d.height);
        let shadow = d.flags.contains(ControlFlags::BACKGROUND_SHADOW);
        let (back, border, style) = (d.back_color, d.border_color, d.border_style);
        let mut ctx = self.paint();
        if shadow {
            ctx.draw_shadow(r);
        }
        if !back.is_transparent() {
            ctx.fill_rect(r, back);
        }
        ctx.draw_border(r, style, border);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_border_uses_light_then_dark_lines() {
        let theme = Theme::default();
        let metrics = Metrics::default();
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(100, 100);
        let mut text = MonospaceBackend::default();
        let mut ctx = PaintCtx::new(&mut buf, &mut clips, &theme, &metrics, &mut text);
        let base = color(100, 100, 100, 255);
        ctx.draw_border(rect(0, 0, 10, 10), BorderStyle::Raised, base);
        let colors: Vec<Color> = buf
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], base.lighten(100));
        assert_eq!(colors[3], base.darken(100));
    }

    #[test]
    fn shadow_is_emitted_outside_the_current_clip() {
        let theme = Theme::default();
        let metrics = Metrics::default();
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(100, 100);
        let mut text = MonospaceBackend::default();
        let mut ctx = PaintCtx::new(&mut buf, &mut clips, &theme, &metrics, &mut text);
        ctx.push_clip(rect(10, 10, 20, 20));
        ctx.draw_shadow(rect(12, 12, 5, 5));
        assert_eq!(ctx.current_clip(), rect(10, 10, 20, 20));
        let cmds = buf.commands();
        let shadow_at = cmds.iter().position(|c| matches!(c, DrawCommand::ShadowQuad { .. })).unwrap();
        assert_eq!(cmds[shadow_at - 1], DrawCommand::Clip { rect: rect(0, 0, 100, 100) });
        assert_eq!(cmds[shadow_at + 1], DrawCommand::Clip { rect: rect(10, 10, 20, 20) });
    }

    #[test]
    fn fully_clipped_text_is_not_baked() {
        let theme = Theme::default();
        let metrics = Metrics::default();
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(100, 100);
        let mut text = MonospaceBackend::default();
        let mut ctx = PaintCtx::new(&mut buf, &mut clips, &theme, &metrics, &mut text);
        ctx.push_clip(rect(0, 0, 10, 10));
        let size = ctx.draw_text(FontId(0), "hello", TextOptions::NONE, vec2(50, 50), color(0, 0, 0, 255));
        assert_eq!(size.width, 40);
        assert!(!buf.commands().iter().any(|c| matches!(c, DrawCommand::TextQuad { .. })));
    }
}
