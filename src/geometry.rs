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
use std::cmp::{max, min};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Integer rectangle. `w` and `h` may go negative while layout math is in flight;
/// [`Rect::clamped`] folds that back into a usable region.
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self { Self { x, y, w, h } }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 { self.x + self.w }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 { self.y + self.h }

    /// Returns `true` when the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool { self.w <= 0 || self.h <= 0 }

    /// Overlap of two rectangles. Disjoint inputs produce a zero-sized rectangle anchored at the
    /// overlap origin; the result never has a negative size.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = max(self.x, other.x);
        let y = max(self.y, other.y);
        let w = min(self.right(), other.right()) - x;
        let h = min(self.bottom(), other.bottom()) - y;
        Rect::new(x, y, max(w, 0), max(h, 0))
    }

    /// Returns `true` when the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool { !self.intersect(other).is_empty() }

    /// Half-open containment test.
    pub fn contains(&self, x: i32, y: i32) -> bool { x >= self.x && y >= self.y && x < self.right() && y < self.bottom() }

    /// Moves a negative origin to zero by shrinking the size by the same amount, then clamps the
    /// size to be non-negative.
    pub fn clamped(&self) -> Rect {
        let mut r = *self;
        if r.x < 0 {
            r.w += r.x;
            r.x = 0;
        }
        if r.y < 0 {
            r.h += r.y;
            r.y = 0;
        }
        r.w = max(r.w, 0);
        r.h = max(r.h, 0);
        r
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    pub fn translate(&self, dx: i32, dy: i32) -> Rect { Rect::new(self.x + dx, self.y + dy, self.w, self.h) }

    /// Returns the rectangle with `m` removed from each side.
    pub fn shrink(&self, m: &Margins) -> Rect { Rect::new(self.x + m.left, self.y + m.top, self.w - m.horizontal(), self.h - m.vertical()) }

    /// Expands (or shrinks, for negative `n`) the rectangle uniformly on all sides.
    pub fn expand(&self, n: i32) -> Rect { Rect::new(self.x - n, self.y - n, self.w + n * 2, self.h + n * 2) }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Per-side spacing used for padding and margins.
pub struct Margins {
    /// Left side.
    pub left: i32,
    /// Top side.
    pub top: i32,
    /// Right side.
    pub right: i32,
    /// Bottom side.
    pub bottom: i32,
}

impl Margins {
    /// Creates margins from the four sides.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self { Self { left, top, right, bottom } }

    /// Same value on every side.
    pub const fn uniform(v: i32) -> Self { Self::new(v, v, v, v) }

    /// `left + right`.
    pub fn horizontal(&self) -> i32 { self.left + self.right }

    /// `top + bottom`.
    pub fn vertical(&self) -> i32 { self.top + self.bottom }

    /// Multiplies every side by `scale`, rounding to the nearest pixel.
    pub fn scaled(&self, scale: f32) -> Self {
        let s = |v: i32| (v as f32 * scale).round() as i32;
        Self::new(s(self.left), s(self.top), s(self.right), s(self.bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_is_commutative() {
        let samples = [
            Rect::new(0, 0, 50, 50),
            Rect::new(25, 25, 50, 50),
            Rect::new(-10, 5, 30, 8),
            Rect::new(100, 100, 10, 10),
            Rect::new(40, -20, 5, 200),
        ];
        for a in samples.iter() {
            for b in samples.iter() {
                assert_eq!(a.intersect(b), b.intersect(a));
            }
        }
    }

    #[test]
    fn intersect_with_window_is_identity() {
        let window = Rect::new(0, 0, 800, 600);
        let a = Rect::new(12, 30, 200, 100);
        assert_eq!(a.intersect(&window), a);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        let i = a.intersect(&b);
        assert!(i.is_empty());
        assert!(i.w >= 0 && i.h >= 0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn clamped_folds_negative_origin() {
        let r = Rect::new(-5, -3, 20, 10).clamped();
        assert_eq!(r, Rect::new(0, 0, 15, 7));
        let gone = Rect::new(-30, 0, 20, 10).clamped();
        assert_eq!(gone, Rect::new(0, 0, 0, 10));
    }

    #[test]
    fn shrink_by_margins() {
        let r = Rect::new(0, 0, 200, 100).shrink(&Margins::uniform(10));
        assert_eq!(r, Rect::new(10, 10, 180, 80));
    }
}
