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
use std::collections::{HashMap, HashSet};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Index of a font registered with a [`TextBackend`].
pub struct FontId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Opaque handle to a baked text run, resolved by the renderer through its text backend.
pub struct TextHandle(pub u64);

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    /// Formatting flags passed to the text backend.
    pub struct TextOptions : u32 {
        /// Treat `&x` as a mnemonic: hide the ampersand and underline `x`.
        const SHOW_PREFIX = 1;
        /// Treat `&x` as a mnemonic but hide both the ampersand and the underline.
        const HIDE_PREFIX = 2;
        /// Plain text.
        const NONE = 0;
    }
}

impl TextOptions {
    /// Returns `true` when ampersands are interpreted as mnemonic prefixes.
    pub fn has_prefix(&self) -> bool { self.intersects(Self::SHOW_PREFIX | Self::HIDE_PREFIX) }
}

/// Measures and bakes strings for the UI. Both operations are treated as pure: the same inputs
/// must produce the same size and handle.
///
/// A font the backend does not know measures as zero and bakes to `None`.
pub trait TextBackend {
    /// Pixel size of `text` rendered with `font`.
    fn measure(&mut self, font: FontId, text: &str, options: TextOptions) -> Dimensioni;
    /// Produces (or returns the cached) drawable handle for `text`.
    fn bake(&mut self, font: FontId, text: &str, options: TextOptions) -> Option<TextHandle>;
    /// Looks up what a handle stands for.
    fn baked(&self, handle: TextHandle) -> Option<&BakedText>;
    /// Called at the start of every frame. Caching backends may drop runs the previous frame
    /// did not bake, so handles stay valid for one frame after their last use.
    fn begin_frame(&mut self) {}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Description of a baked text run, returned to the renderer.
pub struct BakedText {
    /// Font the run was baked with.
    pub font: FontId,
    /// Text with mnemonic prefixes already removed when the options asked for it.
    pub text: String,
    /// Character index of the underlined mnemonic, if one is shown.
    pub underline: Option<usize>,
}

/// Splits a label into its display text and the character index of its mnemonic.
///
/// A single `&` marks the following character; `&&` is a literal ampersand.
pub fn strip_mnemonic(text: &str) -> (String, Option<usize>) {
    let mut out = String::with_capacity(text.len());
    let mut mnemonic = None;
    let mut chars = text.chars().peekable();
    let mut index = 0;
    while let Some(c) = chars.next() {
        if c == '&' {
            match chars.next() {
                Some('&') => out.push('&'),
                Some(next) => {
                    mnemonic = Some(index);
                    out.push(next);
                }
                None => break,
            }
        } else {
            out.push(c);
        }
        index += 1;
    }
    (out, mnemonic)
}

/// Upper-cased mnemonic character of a label, if it has one.
pub fn access_key(text: &str) -> Option<char> {
    let (display, index) = strip_mnemonic(text);
    index.and_then(|i| display.chars().nth(i)).map(|c| c.to_ascii_uppercase())
}

#[derive(Default)]
struct BakeCache {
    lookup: HashMap<BakedText, TextHandle>,
    entries: HashMap<u64, BakedText>,
    used: HashSet<u64>,
    next: u64,
}

impl BakeCache {
    fn bake(&mut self, font: FontId, text: &str, options: TextOptions) -> TextHandle {
        let (display, underline) = if options.has_prefix() { strip_mnemonic(text) } else { (text.to_string(), None) };
        let underline = if options.contains(TextOptions::SHOW_PREFIX) { underline } else { None };
        let key = BakedText { font, text: display, underline };
        let handle = match self.lookup.get(&key) {
            Some(handle) => *handle,
            None => {
                let handle = TextHandle(self.next);
                self.next += 1;
                self.entries.insert(handle.0, key.clone());
                self.lookup.insert(key, handle);
                handle
            }
        };
        self.used.insert(handle.0);
        handle
    }

    fn get(&self, handle: TextHandle) -> Option<&BakedText> { self.entries.get(&handle.0) }

    /// Keeps only the runs baked since the last sweep. Handles are never reused.
    fn sweep(&mut self) {
        let used = std::mem::take(&mut self.used);
        self.entries.retain(|h, _| used.contains(h));
        self.lookup.retain(|_, h| used.contains(&h.0));
    }
}

fn display_text(text: &str, options: TextOptions) -> String {
    if options.has_prefix() { strip_mnemonic(text).0 } else { text.to_string() }
}

/// Fixed-advance text backend. Every character is `advance` pixels wide and every line is
/// `line_height` pixels tall.
pub struct MonospaceBackend {
    advance: i32,
    line_height: i32,
    font_count: usize,
    cache: BakeCache,
}

impl MonospaceBackend {
    /// Creates a backend with a single font.
    pub fn new(advance: i32, line_height: i32) -> Self { Self { advance, line_height, font_count: 1, cache: BakeCache::default() } }

    /// Declares how many fonts are available; ids past this count are unknown.
    pub fn with_font_count(mut self, count: usize) -> Self {
        self.font_count = count;
        self
    }
}

impl Default for MonospaceBackend {
    fn default() -> Self { Self::new(8, 16) }
}

impl TextBackend for MonospaceBackend {
    fn measure(&mut self, font: FontId, text: &str, options: TextOptions) -> Dimensioni {
        if font.0 >= self.font_count {
            return Dimensioni::new(0, 0);
        }
        let chars = display_text(text, options).chars().count() as i32;
        Dimensioni::new(chars * self.advance, self.line_height)
    }

    fn bake(&mut self, font: FontId, text: &str, options: TextOptions) -> Option<TextHandle> {
        if font.0 >= self.font_count {
            return None;
        }
        Some(self.cache.bake(font, text, options))
    }

    fn baked(&self, handle: TextHandle) -> Option<&BakedText> { self.cache.get(handle) }

    fn begin_frame(&mut self) { self.cache.sweep() }
}

#[cfg(feature = "fontdue")]
mod fontdue_backend {
    use super::*;
    use fontdue::{Font, FontSettings};

    /// Text backend measuring with real glyph metrics through `fontdue`.
    pub struct FontdueBackend {
        fonts: Vec<(Font, f32)>,
        cache: BakeCache,
    }

    impl Default for FontdueBackend {
        fn default() -> Self { Self::new() }
    }

    impl FontdueBackend {
        /// Creates a backend with no fonts.
        pub fn new() -> Self { Self { fonts: Vec::new(), cache: BakeCache::default() } }

        /// Parses a TrueType/OpenType font and registers it at `size` pixels.
        pub fn add_font(&mut self, bytes: &[u8], size: f32) -> UiResult<FontId> {
            let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| UiError::FontLoad(e.to_string()))?;
            self.fonts.push((font, size));
            log::debug!("registered font #{} at {}px", self.fonts.len() - 1, size);
            Ok(FontId(self.fonts.len() - 1))
        }
    }

    impl TextBackend for FontdueBackend {
        fn measure(&mut self, font: FontId, text: &str, options: TextOptions) -> Dimensioni {
            let Some((face, size)) = self.fonts.get(font.0) else {
                return Dimensioni::new(0, 0);
            };
            let width: f32 = display_text(text, options).chars().map(|c| face.metrics(c, *size).advance_width).sum();
            let height = face.horizontal_line_metrics(*size).map(|m| m.new_line_size).unwrap_or(*size);
            Dimensioni::new(width.ceil() as i32, height.ceil() as i32)
        }

        fn bake(&mut self, font: FontId, text: &str, options: TextOptions) -> Option<TextHandle> {
            if font.0 >= self.fonts.len() {
                return None;
            }
            Some(self.cache.bake(font, text, options))
        }

        fn baked(&self, handle: TextHandle) -> Option<&BakedText> { self.cache.get(handle) }

        fn begin_frame(&mut self) { self.cache.sweep() }
    }
}

#[cfg(feature = "fontdue")]
pub use fontdue_backend::FontdueBackend;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_extraction() {
        assert_eq!(strip_mnemonic("&File"), ("File".to_string(), Some(0)));
        assert_eq!(strip_mnemonic("Save &As"), ("Save As".to_string(), Some(5)));
        assert_eq!(strip_mnemonic("Fish && Chips"), ("Fish & Chips".to_string(), None));
        assert_eq!(access_key("e&xit"), Some('X'));
        assert_eq!(access_key("Plain"), None);
        assert_eq!(access_key("Trailing&"), None);
    }

    #[test]
    fn monospace_measures_display_text() {
        let mut text = MonospaceBackend::new(8, 16);
        let plain = text.measure(FontId(0), "&Open", TextOptions::NONE);
        assert_eq!((plain.width, plain.height), (40, 16));
        let prefixed = text.measure(FontId(0), "&Open", TextOptions::SHOW_PREFIX);
        assert_eq!((prefixed.width, prefixed.height), (32, 16));
    }

    #[test]
    fn missing_font_is_zero_sized() {
        let mut text = MonospaceBackend::new(8, 16);
        let size = text.measure(FontId(3), "hello", TextOptions::NONE);
        assert_eq!((size.width, size.height), (0, 0));
        assert!(text.bake(FontId(3), "hello", TextOptions::NONE).is_none());
    }

    #[test]
    fn bake_is_cached() {
        let mut text = MonospaceBackend::default();
        let a = text.bake(FontId(0), "&Edit", TextOptions::SHOW_PREFIX);
        let b = text.bake(FontId(0), "&Edit", TextOptions::SHOW_PREFIX);
        let c = text.bake(FontId(0), "&Edit", TextOptions::HIDE_PREFIX);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let baked = a.and_then(|h| text.baked(h)).cloned();
        assert_eq!(baked.map(|b| (b.text, b.underline)), Some(("Edit".to_string(), Some(0))));
    }

    #[test]
    fn runs_unused_for_a_frame_are_dropped() {
        let mut text = MonospaceBackend::default();
        let old = text.bake(FontId(0), "ni", TextOptions::NONE).unwrap();
        text.begin_frame();
        let kept = text.bake(FontId(0), "Edit", TextOptions::NONE).unwrap();
        text.begin_frame();
        assert!(text.baked(old).is_none());
        assert_eq!(text.baked(kept).map(|b| b.text.as_str()), Some("Edit"));
        let again = text.bake(FontId(0), "ni", TextOptions::NONE).unwrap();
        assert_ne!(again, old);
        assert_ne!(again, kept);
    }
}
