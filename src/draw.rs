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

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Decoration applied to either end of a line.
pub enum LineCap {
    #[default]
    /// Plain butt end.
    None,
    /// Arrow head.
    Arrow,
    /// Rounded end.
    Round,
    /// Square end extending half the pen width.
    Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Opaque handle to an image resource owned by the host renderer.
pub struct ImageHandle(pub u64);

#[derive(Clone, Debug, PartialEq)]
/// Primitive emitted by the UI for the renderer. Coordinates are absolute pixels with the
/// buffer's render transform already applied.
pub enum DrawCommand {
    /// Restricts all following primitives to `rect`.
    Clip {
        /// Clip region.
        rect: Rect,
    },
    /// Filled axis-aligned quad.
    SolidQuad {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Soft drop shadow behind a rectangle.
    ShadowQuad {
        /// Rectangle casting the shadow.
        rect: Rect,
        /// Shadow offset in pixels.
        offset: i32,
        /// Blur radius in pixels.
        blur: f32,
        /// Shadow color.
        color: Color,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: (f32, f32),
        /// End point.
        to: (f32, f32),
        /// Pen width.
        width: f32,
        /// Start decoration.
        start_cap: LineCap,
        /// End decoration.
        end_cap: LineCap,
        /// Pen color.
        color: Color,
    },
    /// Cubic bezier curve.
    Bezier {
        /// Control points.
        points: [(f32, f32); 4],
        /// Pen width.
        width: f32,
        /// Pen color.
        color: Color,
    },
    /// Circular arc between two angles (radians).
    Arc {
        /// Center point.
        center: (f32, f32),
        /// Radius.
        radius: f32,
        /// Start angle.
        start: f32,
        /// End angle.
        end: f32,
        /// Pen width.
        width: f32,
        /// Pen color.
        color: Color,
    },
    /// Filled ellipse inscribed in `rect`.
    Ellipse {
        /// Bounding rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Filled triangle.
    Triangle {
        /// Corner points.
        points: [(f32, f32); 3],
        /// Fill color.
        color: Color,
    },
    /// Pre-baked text run placed at `pos`.
    TextQuad {
        /// Handle produced by [`TextBackend::bake`].
        text: TextHandle,
        /// Top-left corner.
        pos: (i32, i32),
        /// Text color.
        color: Color,
    },
    /// Image stretched over `rect`.
    ImageQuad {
        /// Host image handle.
        image: ImageHandle,
        /// Target rectangle.
        rect: Rect,
        /// Tint.
        color: Color,
    },
}

/// Accumulates the draw commands for one frame.
///
/// Shapes are given in coordinates local to the current render transform, which the buffer adds
/// before recording. Pen and brush state mirror a classic canvas API.
pub struct DrawBuffer {
    commands: Vec<DrawCommand>,
    dx: i32,
    dy: i32,
    /// Color used for outlines and lines.
    pub pen_color: Color,
    /// Width used for outlines and lines.
    pub pen_width: f32,
    /// Color used for fills.
    pub brush_color: Color,
}

impl Default for DrawBuffer {
    fn default() -> Self { Self::new() }
}

impl DrawBuffer {
    /// Creates an empty buffer with a black one-pixel pen.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            dx: 0,
            dy: 0,
            pen_color: color(0, 0, 0, 255),
            pen_width: 1.0,
            brush_color: color(0, 0, 0, 255),
        }
    }

    /// Drops every recorded command and resets the render transform.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.dx = 0;
        self.dy = 0;
    }

    /// Commands recorded so far, in paint order.
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    /// Moves the recorded commands out, leaving the buffer empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> { std::mem::take(&mut self.commands) }

    /// Sets the offset added to every following primitive.
    pub fn set_render_transform(&mut self, dx: i32, dy: i32) {
        self.dx = dx;
        self.dy = dy;
    }

    /// Current render offset.
    pub fn render_transform(&self) -> Vec2i { vec2(self.dx, self.dy) }

    fn pt(&self, x: f32, y: f32) -> (f32, f32) { (x + self.dx as f32, y + self.dy as f32) }

    fn push(&mut self, cmd: DrawCommand) { self.commands.push(cmd); }

    /// Records a clip region. Clip rectangles are absolute and ignore the render transform.
    pub fn set_clip(&mut self, rect: Rect) { self.push(DrawCommand::Clip { rect }); }

    /// Fills `r` with the brush color.
    pub fn fill_rect(&mut self, r: Rect) {
        if r.is_empty() || self.brush_color.is_transparent() {
            return;
        }
        let rect = r.translate(self.dx, self.dy);
        let color = self.brush_color;
        self.push(DrawCommand::SolidQuad { rect, color });
    }

    /// Outlines `r` with one-pixel pen lines along the inside of its edges.
    pub fn draw_rect(&mut self, r: Rect) {
        let (x0, y0) = (r.x as f32 + 0.5, r.y as f32 + 0.5);
        let (x1, y1) = (r.right() as f32 - 0.5, r.bottom() as f32 - 0.5);
        self.draw_line(LineCap::None, LineCap::None, x0, y0, x1, y0);
        self.draw_line(LineCap::None, LineCap::None, x1, y0, x1, y1);
        self.draw_line(LineCap::None, LineCap::None, x1, y1, x0, y1);
        self.draw_line(LineCap::None, LineCap::None, x0, y1, x0, y0);
    }

    /// Draws a line with the pen.
    pub fn draw_line(&mut self, start_cap: LineCap, end_cap: LineCap, x0: f32, y0: f32, x1: f32, y1: f32) {
        if self.pen_color.is_transparent() {
            return;
        }
        let cmd = DrawCommand::Line {
            from: self.pt(x0, y0),
            to: self.pt(x1, y1),
            width: self.pen_width,
            start_cap,
            end_cap,
            color: self.pen_color,
        };
        self.push(cmd);
    }

    /// Draws a cubic bezier with the pen.
    pub fn draw_bezier(&mut self, p0: Vec2f, p1: Vec2f, p2: Vec2f, p3: Vec2f) {
        let points = [self.pt(p0.x, p0.y), self.pt(p1.x, p1.y), self.pt(p2.x, p2.y), self.pt(p3.x, p3.y)];
        let cmd = DrawCommand::Bezier { points, width: self.pen_width, color: self.pen_color };
        self.push(cmd);
    }

    /// Draws a circular arc with the pen.
    pub fn draw_arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        let cmd = DrawCommand::Arc {
            center: self.pt(cx, cy),
            radius,
            start,
            end,
            width: self.pen_width,
            color: self.pen_color,
        };
        self.push(cmd);
    }

    /// Fills the ellipse inscribed in `r` with the brush.
    pub fn fill_ellipse(&mut self, r: Rect) {
        let rect = r.translate(self.dx, self.dy);
        let color = self.brush_color;
        self.push(DrawCommand::Ellipse { rect, color });
    }

    /// Fills a triangle with the brush.
    pub fn fill_triangle(&mut self, a: Vec2f, b: Vec2f, c: Vec2f) {
        let points = [self.pt(a.x, a.y), self.pt(b.x, b.y), self.pt(c.x, c.y)];
        let color = self.brush_color;
        self.push(DrawCommand::Triangle { points, color });
    }

    /// Records a drop shadow behind `r`.
    pub fn draw_shadow(&mut self, r: Rect, offset: i32, blur: f32, color: Color) {
        let rect = r.translate(self.dx, self.dy);
        self.push(DrawCommand::ShadowQuad { rect, offset, blur, color });
    }

    /// Places a baked text run with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, text: TextHandle, x: i32, y: i32, color: Color) {
        let pos = (x + self.dx, y + self.dy);
        self.push(DrawCommand::TextQuad { text, pos, color });
    }

    /// Stretches an image over `r`.
    pub fn draw_image(&mut self, image: ImageHandle, r: Rect, color: Color) {
        let rect = r.translate(self.dx, self.dy);
        self.push(DrawCommand::ImageQuad { image, rect, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_transform_offsets_shapes() {
        let mut buf = DrawBuffer::new();
        buf.set_render_transform(10, 20);
        buf.brush_color = color(1, 2, 3, 255);
        buf.fill_rect(rect(1, 1, 5, 5));
        buf.draw_text(TextHandle(7), 2, 3, color(0, 0, 0, 255));
        match &buf.commands()[0] {
            DrawCommand::SolidQuad { rect: r, .. } => assert_eq!(*r, rect(11, 21, 5, 5)),
            other => panic!("unexpected command {:?}", other),
        }
        match &buf.commands()[1] {
            DrawCommand::TextQuad { pos, .. } => assert_eq!(*pos, (12, 23)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn clip_ignores_transform() {
        let mut buf = DrawBuffer::new();
        buf.set_render_transform(10, 20);
        buf.set_clip(rect(0, 0, 4, 4));
        assert_eq!(buf.commands()[0], DrawCommand::Clip { rect: rect(0, 0, 4, 4) });
    }

    #[test]
    fn transparent_fill_is_skipped() {
        let mut buf = DrawBuffer::new();
        buf.brush_color = color(10, 10, 10, 0);
        buf.fill_rect(rect(0, 0, 10, 10));
        buf.brush_color = color(10, 10, 10, 255);
        buf.fill_rect(rect(0, 0, 0, 10));
        assert!(buf.commands().is_empty());
    }

    #[test]
    fn outline_is_four_lines() {
        let mut buf = DrawBuffer::new();
        buf.draw_rect(rect(0, 0, 10, 10));
        assert_eq!(buf.commands().len(), 4);
        buf.clear();
        assert!(buf.commands().is_empty());
        assert_eq!(buf.render_transform().x, 0);
    }
}
