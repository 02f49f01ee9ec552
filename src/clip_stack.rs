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

/// Stack of nested clip rectangles for one draw pass.
///
/// Every entry is already intersected with the entries below it, so the top is always the
/// effective clip. Each change re-issues a [`DrawCommand::Clip`] into the draw buffer.
pub struct ClipRectStack {
    stack: Vec<Rect>,
    window: Rect,
}

impl ClipRectStack {
    /// Creates an empty stack for a surface of the given size.
    pub fn new(width: i32, height: i32) -> Self { Self { stack: Vec::new(), window: rect(0, 0, width, height) } }

    /// Updates the full-window rectangle used when the stack is empty.
    pub fn set_window_size(&mut self, width: i32, height: i32) { self.window = rect(0, 0, width.max(0), height.max(0)); }

    /// The full-window rectangle.
    pub fn window_rect(&self) -> Rect { self.window }

    /// Effective clip: the top entry, or the full window when nothing is pushed.
    pub fn top(&self) -> Rect { self.stack.last().copied().unwrap_or(self.window) }

    /// Number of pushed entries.
    pub fn depth(&self) -> usize { self.stack.len() }

    /// Returns `true` when nothing is pushed.
    pub fn is_empty(&self) -> bool { self.stack.is_empty() }

    /// Clamps a negative origin of `r` into its size, intersects it with the current top and
    /// pushes the result.
    pub fn push_rect(&mut self, buf: &mut DrawBuffer, r: Rect) -> Rect {
        let clipped = r.clamped().intersect(&self.top());
        self.stack.push(clipped);
        buf.set_clip(clipped);
        clipped
    }

    /// Accumulates `r` into the nested clip. Containers call this when descending into their
    /// content; it behaves exactly like [`ClipRectStack::push_rect`].
    pub fn add_rect(&mut self, buf: &mut DrawBuffer, r: Rect) -> Rect { self.push_rect(buf, r) }

    /// Removes the top entry and restores the clip of the entry below it (or the full window).
    pub fn pop_rect(&mut self, buf: &mut DrawBuffer) -> Option<Rect> {
        let popped = self.stack.pop();
        buf.set_clip(self.top());
        popped
    }

    /// Empties the stack and resets the clip to the full window.
    pub fn clear(&mut self, buf: &mut DrawBuffer) {
        self.stack.clear();
        buf.set_clip(self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_clip(buf: &DrawBuffer) -> Rect {
        match buf.commands().last() {
            Some(DrawCommand::Clip { rect }) => *rect,
            other => panic!("expected a clip command, got {:?}", other),
        }
    }

    #[test]
    fn nested_push_intersects() {
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(800, 600);
        clips.push_rect(&mut buf, rect(0, 0, 50, 50));
        clips.push_rect(&mut buf, rect(25, 25, 50, 50));
        assert_eq!(clips.top(), rect(25, 25, 25, 25));
        assert_eq!(last_clip(&buf), rect(25, 25, 25, 25));
    }

    #[test]
    fn pop_restores_previous_top() {
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(800, 600);
        clips.push_rect(&mut buf, rect(10, 10, 100, 100));
        let before = clips.top();
        clips.add_rect(&mut buf, rect(50, 50, 100, 100));
        assert_eq!(clips.pop_rect(&mut buf), Some(rect(50, 50, 60, 60)));
        assert_eq!(clips.top(), before);
        assert_eq!(last_clip(&buf), before);
        clips.pop_rect(&mut buf);
        assert_eq!(clips.top(), rect(0, 0, 800, 600));
        assert_eq!(last_clip(&buf), rect(0, 0, 800, 600));
    }

    #[test]
    fn top_is_intersection_of_all_entries() {
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(300, 300);
        let pushed = [rect(0, 0, 200, 200), rect(20, -10, 150, 100), rect(40, 40, 500, 30)];
        let mut expected = rect(0, 0, 300, 300);
        for r in pushed.iter() {
            clips.add_rect(&mut buf, *r);
            expected = r.clamped().intersect(&expected);
            assert_eq!(clips.top(), expected);
        }
    }

    #[test]
    fn negative_and_empty_regions_are_clamped() {
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(100, 100);
        let r = clips.push_rect(&mut buf, rect(-20, -20, 30, 30));
        assert_eq!(r, rect(0, 0, 10, 10));
        let empty = clips.push_rect(&mut buf, rect(50, 50, 10, 10));
        assert!(empty.is_empty());
        assert!(empty.w >= 0 && empty.h >= 0);
    }

    #[test]
    fn clear_resets_to_window() {
        let mut buf = DrawBuffer::new();
        let mut clips = ClipRectStack::new(640, 480);
        clips.push_rect(&mut buf, rect(1, 1, 2, 2));
        clips.clear(&mut buf);
        assert!(clips.is_empty());
        assert_eq!(last_clip(&buf), rect(0, 0, 640, 480));
        assert_eq!(clips.pop_rect(&mut buf), None);
    }
}
