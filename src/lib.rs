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
#![deny(missing_docs)]
//! `ctrltree` is a retained-mode GUI core: a tree of controls that owns layout, input routing,
//! focus, clipping and a popup/menu subsystem, and that emits a flat list of draw commands each
//! frame for an external rasterizer to consume.
//!
//! The host owns the window, the input pump and the renderer. It forwards input to a [`UiEntry`]
//! through the `do_*` entry points and calls [`UiEntry::draw_ui`] once per frame.

use bitflags::*;

mod clip_stack;
mod container;
mod control;
mod dispatch;
mod draw;
mod entry;
mod error;
mod event;
mod focus;
mod form;
mod geometry;
mod menu;
mod paint;
mod text;
mod theme;
mod tree;
mod widgets;

pub use clip_stack::ClipRectStack;
pub use container::ContainerData;
pub use control::*;
pub use draw::*;
pub use entry::{CursorKind, InputRoutingContext, UiEntry};
pub use error::{UiError, UiResult};
pub use event::*;
pub use form::{FormData, FormDrag, ResizeMode};
pub use geometry::*;
pub use menu::{MenuData, MenuItemData, MenuStyle};
pub use paint::PaintCtx;
pub use rs_math3d::{Dimensioni, Vec2f, Vec2i};
pub use text::*;
pub use theme::*;
pub use widgets::*;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Adds `amount` to every color channel, clamping to `0..=255`. Alpha is untouched.
    pub fn lighten(self, amount: i32) -> Self {
        let ch = |c: u8| (c as i32 + amount).clamp(0, 255) as u8;
        Self { r: ch(self.r), g: ch(self.g), b: ch(self.b), a: self.a }
    }

    /// Subtracts `amount` from every color channel, clamping to `0..=255`.
    pub fn darken(self, amount: i32) -> Self { self.lighten(-amount) }

    /// Linearly interpolates towards `other`; `t` is clamped to `0.0..=1.0`.
    pub fn blend(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self { Self { a, ..self } }

    /// Returns `true` when the color would not paint anything.
    pub fn is_transparent(&self) -> bool { self.a == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    /// Modifier keys and mouse buttons held while an input event was produced.
    pub struct ShiftState : u32 {
        /// Either shift key.
        const SHIFT = 1;
        /// Either control key.
        const CONTROL = 2;
        /// Either alt key.
        const ALT = 4;
        /// Left mouse button.
        const LEFT_BUTTON = 8;
        /// Right mouse button.
        const RIGHT_BUTTON = 16;
        /// Middle mouse button.
        const MIDDLE_BUTTON = 32;
        /// No modifier.
        const NONE = 0;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Virtual key code delivered by the host for key-down and key-up events.
///
/// Letters and digits use their upper-case ASCII code, as produced by most windowing layers.
pub struct Key(pub u16);

impl Key {
    /// Backspace.
    pub const BACKSPACE: Self = Self(0x08);
    /// Tab.
    pub const TAB: Self = Self(0x09);
    /// Return / Enter.
    pub const RETURN: Self = Self(0x0D);
    /// Alt (menu) key.
    pub const ALT: Self = Self(0x12);
    /// Escape.
    pub const ESCAPE: Self = Self(0x1B);
    /// Space bar.
    pub const SPACE: Self = Self(0x20);
    /// Left arrow.
    pub const LEFT: Self = Self(0x25);
    /// Up arrow.
    pub const UP: Self = Self(0x26);
    /// Right arrow.
    pub const RIGHT: Self = Self(0x27);
    /// Down arrow.
    pub const DOWN: Self = Self(0x28);
    /// Delete.
    pub const DELETE: Self = Self(0x2E);

    /// Key code for an ASCII letter or digit. Lower-case letters are folded to upper case.
    pub fn from_char(c: char) -> Self { Self(c.to_ascii_uppercase() as u16) }

    /// Returns the upper-case character for letter and digit keys.
    pub fn as_alphanumeric(self) -> Option<char> {
        match self.0 {
            0x30..=0x39 | 0x41..=0x5A => char::from_u32(self.0 as u32),
            _ => None,
        }
    }
}

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Rect`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect { Rect { x, y, w, h } }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_clamps_channels() {
        let c = color(250, 10, 128, 200).lighten(20);
        assert_eq!(c, color(255, 30, 148, 200));
        let d = color(5, 10, 128, 255).darken(20);
        assert_eq!(d, color(0, 0, 108, 255));
    }

    #[test]
    fn blend_endpoints() {
        let a = color(0, 0, 0, 0);
        let b = color(200, 100, 50, 255);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
        assert_eq!(a.blend(b, 0.5), color(100, 50, 25, 128));
    }

    #[test]
    fn key_alphanumeric() {
        assert_eq!(Key::from_char('f').as_alphanumeric(), Some('F'));
        assert_eq!(Key::from_char('7').as_alphanumeric(), Some('7'));
        assert_eq!(Key::SPACE.as_alphanumeric(), None);
    }
}
