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
use crate::paint::Arrow;
use crate::*;

#[derive(Clone, Debug)]
/// Static text.
pub struct LabelData {
    /// Displayed text; `&` marks a mnemonic when `options` asks for prefix handling.
    pub text: String,
    /// Resize the control to the text whenever the text changes.
    pub auto_size: bool,
    /// Mnemonic handling.
    pub options: TextOptions,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Pointer state of a button.
pub enum ButtonState {
    #[default]
    /// Not pressed.
    Idle,
    /// Pressed and holding the capture.
    Pressed,
}

#[derive(Clone, Debug)]
/// Push button, optionally toggling a checked state on click.
pub struct ButtonData {
    /// Caption.
    pub text: String,
    /// Mnemonic handling of the caption.
    pub options: TextOptions,
    /// Clicking toggles `checked`.
    pub checkable: bool,
    pub(crate) checked: bool,
    pub(crate) state: ButtonState,
}

impl ButtonData {
    /// Checked state.
    pub fn checked(&self) -> bool { self.checked }

    /// Pointer state.
    pub fn state(&self) -> ButtonState { self.state }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Direction a scrollbar moves its thumb in.
pub enum Orientation {
    #[default]
    /// Thumb moves left and right.
    Horizontal,
    /// Thumb moves up and down.
    Vertical,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Pointer interaction of a scrollbar.
pub enum ScrollState {
    #[default]
    /// Nothing pressed.
    Idle,
    /// Thumb grabbed `grab` pixels from its start.
    DraggingThumb {
        /// Offset of the pointer inside the thumb.
        grab: i32,
    },
    /// Arrow button held; every tick moves by `step` scaled by the repeat acceleration.
    Repeating {
        /// Signed step per tick before acceleration.
        step: i32,
        /// Ticks since the button was pressed.
        ticks: i32,
    },
}

/// Ticks between acceleration steps while an arrow button is held.
pub const SCROLL_ACCEL_TICKS: i32 = 10;
/// Largest acceleration factor.
pub const SCROLL_MAX_ACCEL: i32 = 4;
/// Small changes per wheel notch.
pub const SCROLL_WHEEL_LINES: i32 = 3;

#[derive(Clone, Debug)]
/// Scrollbar value and interaction state.
pub struct ScrollBarData {
    /// Thumb direction.
    pub orientation: Orientation,
    /// Step of the arrow buttons and the wheel.
    pub small_change: i32,
    /// Step of a click in the track.
    pub large_change: i32,
    pub(crate) min: i32,
    pub(crate) max: i32,
    pub(crate) page_size: i32,
    pub(crate) position: i32,
    pub(crate) state: ScrollState,
}

impl ScrollBarData {
    /// Creates a scrollbar over `0..=100` with a page of 10.
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation, small_change: 1, large_change: 10, min: 0, max: 100, page_size: 10, position: 0, state: ScrollState::Idle }
    }

    /// Smallest position.
    pub fn min(&self) -> i32 { self.min }

    /// Largest position.
    pub fn max(&self) -> i32 { self.max }

    /// Visible portion of the range, used to size the thumb.
    pub fn page_size(&self) -> i32 { self.page_size }

    /// Current position, always within `min..=max`.
    pub fn position(&self) -> i32 { self.position }

    /// Interaction state.
    pub fn state(&self) -> ScrollState { self.state }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScrollGeometry {
    pub length: i32,
    pub button: i32,
    pub track_len: i32,
    pub thumb_pos: i32,
    pub thumb_len: i32,
}

impl ScrollGeometry {
    /// Lays the buttons, track and thumb along a bar `length` pixels long.
    pub fn compute(sb: &ScrollBarData, length: i32, button_size: i32) -> Self {
        let button = button_size.min(length / 2).max(0);
        let track_len = (length - 2 * button).max(0);
        let range = (sb.max - sb.min).max(0);
        let thumb_len = if range + sb.page_size <= 0 {
            track_len
        } else {
            (track_len * sb.page_size / (range + sb.page_size)).max(button / 2).min(track_len)
        };
        let free = track_len - thumb_len;
        let offset = if range > 0 { free * (sb.position - sb.min) / range } else { 0 };
        Self { length, button, track_len, thumb_pos: button + offset, thumb_len }
    }

    /// Position whose thumb starts at `thumb_start`.
    pub fn position_at(&self, sb: &ScrollBarData, thumb_start: i32) -> i32 {
        let free = self.track_len - self.thumb_len;
        if free <= 0 {
            return sb.min;
        }
        let range = (sb.max - sb.min).max(0);
        let t = (thumb_start - self.button).clamp(0, free);
        sb.min + (t * range + free / 2) / free
    }
}

impl UiEntry {
    /// Creates an auto-sized label.
    pub fn add_label(&mut self, parent: ControlId, text: &str) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.border_style = BorderStyle::None;
        data.back_color = Color::default();
        data.flags.remove(ControlFlags::ACCEPTS_FOCUS);
        let label = LabelData { text: text.to_string(), auto_size: true, options: TextOptions::NONE };
        let id = self.insert_control(parent, data, ControlKind::Label(label))?;
        self.fit_label(id);
        Ok(id)
    }

    /// Creates a push button sized to its caption.
    pub fn add_button(&mut self, parent: ControlId, text: &str) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.flags.insert(ControlFlags::TAB_STOP);
        let line = self.metrics.line_height;
        data.padding = Margins::new(line / 2, 0, line / 2, 0);
        let options = TextOptions::SHOW_PREFIX;
        let text_w = self.text.measure(self.theme.default_font, text, options).width;
        data.width = text_w + data.padding.horizontal();
        data.height = line + line / 2;
        let button = ButtonData { text: text.to_string(), options, checkable: false, checked: false, state: ButtonState::Idle };
        self.insert_control(parent, data, ControlKind::Button(button))
    }

    /// Creates a scrollbar one button thick.
    pub fn add_scroll_bar(&mut self, parent: ControlId, orientation: Orientation) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.border_style = BorderStyle::None;
        data.back_color = self.theme.color(ThemeColor::ScrollBarBack);
        data.flags.remove(ControlFlags::ACCEPTS_FOCUS);
        let size = self.metrics.scrollbar_button_size;
        let (w, h) = match orientation {
            Orientation::Horizontal => (size * 5, size),
            Orientation::Vertical => (size, size * 5),
        };
        data.width = w;
        data.height = h;
        self.insert_control(parent, data, ControlKind::ScrollBar(ScrollBarData::new(orientation)))
    }

    /// Text of a label, button, menu item or form title.
    pub fn text(&self, id: ControlId) -> Option<&str> {
        match self.kind(id)? {
            ControlKind::Label(l) => Some(&l.text),
            ControlKind::Button(b) => Some(&b.text),
            ControlKind::MenuItem(i) => Some(&i.text),
            ControlKind::Form(f) => Some(&f.title),
            _ => None,
        }
    }

    /// Replaces the text of a label, button, menu item or form title.
    pub fn set_text(&mut self, id: ControlId, text: &str) -> UiResult<()> {
        match self.kind_mut(id).ok_or(UiError::InvalidControl(id))? {
            ControlKind::Label(l) => l.text = text.to_string(),
            ControlKind::Button(b) => b.text = text.to_string(),
            ControlKind::Form(f) => f.title = text.to_string(),
            ControlKind::MenuItem(i) => {
                i.text = text.to_string();
                i.access_key = access_key(text);
            }
            _ => return Err(UiError::KindMismatch(id)),
        }
        match self.tag(id) {
            Some(KindTag::Label) => self.fit_label(id),
            Some(KindTag::MenuItem) => {
                if let Some(menu) = self.parent(id) {
                    self.posit_menu_items(menu);
                }
            }
            _ => (),
        }
        Ok(())
    }

    fn fit_label(&mut self, id: ControlId) {
        let Some(ControlKind::Label(l)) = self.kind(id) else { return };
        if !l.auto_size {
            return;
        }
        let (text, options) = (l.text.clone(), l.options);
        let Some(d) = self.control(id) else { return };
        let (left, top, pad) = (d.left, d.top, d.padding);
        let font = d.font.unwrap_or(self.theme.default_font);
        let size = self.text.measure(font, &text, options);
        let _ = self.posit(id, left, top, size.width + pad.horizontal(), size.height + pad.vertical());
    }

    /// Checked state of a button.
    pub fn is_checked(&self, id: ControlId) -> bool {
        match self.kind(id) {
            Some(ControlKind::Button(b)) => b.checked,
            Some(ControlKind::MenuItem(i)) => i.checked,
            _ => false,
        }
    }

    /// Sets the checked state of a button or menu item, raising [`UiEvent::Changed`] when it
    /// changes.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) -> UiResult<()> {
        let slot = match self.kind_mut(id).ok_or(UiError::InvalidControl(id))? {
            ControlKind::Button(b) => &mut b.checked,
            ControlKind::MenuItem(i) => &mut i.checked,
            _ => return Err(UiError::KindMismatch(id)),
        };
        if *slot != checked {
            *slot = checked;
            self.raise(id, UiEvent::Changed);
        }
        Ok(())
    }

    fn button_mut(&mut self, id: ControlId) -> Option<&mut ButtonData> {
        match self.kind_mut(id) {
            Some(ControlKind::Button(b)) => Some(b),
            _ => None,
        }
    }

    fn click_button(&mut self, id: ControlId) {
        let toggle = self.button_mut(id).map(|b| b.checkable).unwrap_or(false);
        if toggle {
            let now = !self.is_checked(id);
            let _ = self.set_checked(id, now);
        }
        self.raise(id, UiEvent::Click);
    }

    pub(crate) fn button_mouse_down(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.base_mouse_down(id, x, y, shift);
        let ok = self.control(id).map(|d| d.is_interactive() && d.is_point_in_client(x, y)).unwrap_or(false);
        if !ok || !shift.contains(ShiftState::LEFT_BUTTON) {
            return false;
        }
        if let Some(b) = self.button_mut(id) {
            b.state = ButtonState::Pressed;
        }
        self.set_capture(id);
        true
    }

    pub(crate) fn button_mouse_up(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        let pressed = self.button_mut(id).map(|b| std::mem::take(&mut b.state) == ButtonState::Pressed).unwrap_or(false);
        let Some(d) = self.control(id) else { return false };
        let inside = d.is_interactive() && d.is_point_in_content(x, y);
        self.raise(id, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
        self.release_capture(id);
        if pressed && inside {
            self.click_button(id);
        }
        pressed
    }

    pub(crate) fn button_key_down(&mut self, id: ControlId, args: KeyArgs) -> bool {
        self.raise(id, UiEvent::KeyDown(args));
        if args.key == Key::SPACE || args.key == Key::RETURN {
            if self.control(id).map(|d| d.is_interactive()).unwrap_or(false) {
                self.click_button(id);
                return true;
            }
        }
        false
    }

    fn scroll_bar(&self, id: ControlId) -> Option<&ScrollBarData> {
        match self.kind(id) {
            Some(ControlKind::ScrollBar(s)) => Some(s),
            _ => None,
        }
    }

    fn scroll_bar_mut(&mut self, id: ControlId) -> Option<&mut ScrollBarData> {
        match self.kind_mut(id) {
            Some(ControlKind::ScrollBar(s)) => Some(s),
            _ => None,
        }
    }

    /// Scrollbar position.
    pub fn scroll_position(&self, id: ControlId) -> Option<i32> { self.scroll_bar(id).map(|s| s.position) }

    /// Moves a scrollbar, clamping into its range. Raises [`UiEvent::Changed`] when the position
    /// moved.
    pub fn set_scroll_position(&mut self, id: ControlId, position: i32) -> UiResult<()> {
        let sb = self.scroll_bar_mut(id).ok_or(UiError::KindMismatch(id))?;
        let clamped = position.clamp(sb.min, sb.max.max(sb.min));
        if clamped != sb.position {
            sb.position = clamped;
            self.raise(id, UiEvent::Changed);
        }
        Ok(())
    }

    /// Sets the range and page size of a scrollbar; the position is clamped into the new range.
    pub fn set_scroll_range(&mut self, id: ControlId, min: i32, max: i32, page_size: i32) -> UiResult<()> {
        let sb = self.scroll_bar_mut(id).ok_or(UiError::KindMismatch(id))?;
        sb.min = min;
        sb.max = max.max(min);
        sb.page_size = page_size.max(0);
        let pos = sb.position;
        sb.position = pos.clamp(sb.min, sb.max);
        if sb.position != pos {
            self.raise(id, UiEvent::Changed);
        }
        Ok(())
    }

    fn scroll_geometry(&self, id: ControlId) -> Option<(ScrollBarData, ScrollGeometry)> {
        let sb = self.scroll_bar(id)?.clone();
        let d = self.control(id)?;
        let length = if sb.orientation == Orientation::Vertical { d.height } else { d.width };
        let g = ScrollGeometry::compute(&sb, length, self.metrics.scrollbar_button_size);
        Some((sb, g))
    }

    fn scroll_by(&mut self, id: ControlId, delta: i32) {
        if let Some(pos) = self.scroll_position(id) {
            let _ = self.set_scroll_position(id, pos + delta);
        }
    }

    pub(crate) fn scroll_bar_mouse_down(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.base_mouse_down(id, x, y, shift);
        let interactive = self.control(id).map(|d| d.is_interactive()).unwrap_or(false);
        let Some((sb, g)) = self.scroll_geometry(id) else { return false };
        if !interactive || !shift.contains(ShiftState::LEFT_BUTTON) {
            return false;
        }
        let p = if sb.orientation == Orientation::Vertical { y } else { x };
        let state = if p < g.button {
            self.scroll_by(id, -sb.small_change);
            ScrollState::Repeating { step: -sb.small_change, ticks: 0 }
        } else if p >= g.length - g.button {
            self.scroll_by(id, sb.small_change);
            ScrollState::Repeating { step: sb.small_change, ticks: 0 }
        } else if p >= g.thumb_pos && p < g.thumb_pos + g.thumb_len {
            ScrollState::DraggingThumb { grab: p - g.thumb_pos }
        } else {
            let step = if p < g.thumb_pos { -sb.large_change } else { sb.large_change };
            self.scroll_by(id, step);
            ScrollState::Idle
        };
        if let Some(s) = self.scroll_bar_mut(id) {
            s.state = state;
        }
        self.set_capture(id);
        true
    }

    pub(crate) fn scroll_bar_mouse_move(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.base_mouse_move(id, x, y, shift);
        let Some((sb, g)) = self.scroll_geometry(id) else { return false };
        match sb.state {
            ScrollState::DraggingThumb { grab } => {
                let p = if sb.orientation == Orientation::Vertical { y } else { x };
                let pos = g.position_at(&sb, p - grab);
                let _ = self.set_scroll_position(id, pos);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn scroll_bar_mouse_up(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.raise(id, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
        let was = self.scroll_bar_mut(id).map(|s| std::mem::take(&mut s.state)).unwrap_or_default();
        self.unsubscribe_tick(id);
        self.release_capture(id);
        was != ScrollState::Idle
    }

    pub(crate) fn scroll_bar_mouse_hover(&mut self, id: ControlId) -> bool {
        self.raise(id, UiEvent::MouseHover);
        if matches!(self.scroll_bar(id).map(|s| s.state), Some(ScrollState::Repeating { .. })) {
            self.subscribe_tick(id);
            return true;
        }
        false
    }

    pub(crate) fn scroll_bar_mouse_wheel(&mut self, id: ControlId, args: MouseArgs) -> bool {
        self.raise(id, UiEvent::MouseWheel(args));
        let Some(small) = self.scroll_bar(id).map(|s| s.small_change) else { return false };
        if args.delta == 0 {
            return false;
        }
        self.scroll_by(id, -args.delta.signum() * small * SCROLL_WHEEL_LINES);
        true
    }

    pub(crate) fn scroll_bar_tick(&mut self, id: ControlId) {
        let Some(sb) = self.scroll_bar_mut(id) else { return };
        match sb.state {
            ScrollState::Repeating { step, ticks } => {
                let ticks = ticks + 1;
                sb.state = ScrollState::Repeating { step, ticks };
                let accel = (1 + ticks / SCROLL_ACCEL_TICKS).min(SCROLL_MAX_ACCEL);
                self.scroll_by(id, step * accel);
            }
            _ => self.unsubscribe_tick(id),
        }
    }

    pub(crate) fn draw_label(&mut self, id: ControlId) {
        self.draw_chrome(id);
        let Some(ControlKind::Label(l)) = self.kind(id) else { return };
        let (text, options) = (l.text.clone(), l.options);
        let Some(d) = self.control(id) else { return };
        let (abs, pad, h, font, fore) = (d.abs, d.padding, d.height, d.font, d.font_color);
        let enabled = d.is_enabled();
        let mut ctx = self.paint();
        let font = ctx.resolve_font(font);
        let fore = if enabled { fore } else { ctx.color(ThemeColor::MenuItemDisabledFore) };
        let size = ctx.measure_text(font, &text, options);
        ctx.draw_text(font, &text, options, vec2(abs.x + pad.left, abs.y + (h - size.height) / 2), fore);
    }

    pub(crate) fn draw_button(&mut self, id: ControlId) {
        let Some(ControlKind::Button(b)) = self.kind(id) else { return };
        let (text, options, checked, pressed) = (b.text.clone(), b.options, b.checked, b.state == ButtonState::Pressed);
        let cursor = self.routing.cursor_pos;
        let hot = pressed && self.absolute_bounds(id).contains(cursor.x, cursor.y);
        let focused = self.routing.focused == Some(id);
        let Some(d) = self.control(id) else { return };
        let r = rect(d.abs.x, d.abs.y, d.width, d.height);
        let (back, border, font, fore, enabled) = (d.back_color, d.border_color, d.font, d.font_color, d.is_enabled());
        let mut ctx = self.paint();
        let fill = if hot {
            ctx.color(ThemeColor::ToolButtonPressed)
        } else if checked {
            ctx.color(ThemeColor::ButtonChecked)
        } else {
            back
        };
        ctx.fill_rect(r, fill);
        ctx.draw_border(r, if hot || checked { BorderStyle::Lowered } else { BorderStyle::Raised }, border);
        let font = ctx.resolve_font(font);
        let fore = if enabled { fore } else { ctx.color(ThemeColor::MenuItemDisabledFore) };
        let shift = if hot { 1 } else { 0 };
        ctx.draw_text_centered(font, &text, options, r.translate(shift, shift), fore);
        if focused {
            ctx.draw_focus_rect(r.expand(-3));
        }
    }

    pub(crate) fn draw_scroll_bar(&mut self, id: ControlId) {
        self.draw_chrome(id);
        let Some((sb, g)) = self.scroll_geometry(id) else { return };
        let Some(d) = self.control(id) else { return };
        let (abs, w, h, border) = (d.abs, d.width, d.height, d.border_color);
        let vertical = sb.orientation == Orientation::Vertical;
        let along = |start: i32, len: i32| if vertical { rect(abs.x, abs.y + start, w, len) } else { rect(abs.x + start, abs.y, len, h) };
        let first = along(0, g.button);
        let second = along(g.length - g.button, g.button);
        let thumb = along(g.thumb_pos, g.thumb_len);
        let (back_arrow, fwd_arrow) = if vertical { (Arrow::Up, Arrow::Down) } else { (Arrow::Left, Arrow::Right) };
        let (held_back, held_fwd) = match sb.state {
            ScrollState::Repeating { step, .. } => (step < 0, step > 0),
            _ => (false, false),
        };
        let dragging = matches!(sb.state, ScrollState::DraggingThumb { .. });
        let mut ctx = self.paint();
        let fore = ctx.color(ThemeColor::ScrollBarFore);
        for (r, arrow, held) in [(first, back_arrow, held_back), (second, fwd_arrow, held_fwd)] {
            let fill = if held { ctx.color(ThemeColor::ScrollBarPressed) } else { ctx.color(ThemeColor::ControlBack) };
            ctx.fill_rect(r, fill);
            ctx.draw_border(r, if held { BorderStyle::Lowered } else { BorderStyle::Raised }, border);
            ctx.draw_arrow(r, arrow, fore);
        }
        if g.thumb_len > 0 {
            let fill = if dragging { ctx.color(ThemeColor::ScrollBarPressed) } else { ctx.color(ThemeColor::ScrollBarSlider) };
            ctx.fill_rect(thumb, fill);
            ctx.draw_border(thumb, BorderStyle::Raised, border);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UiEntry { UiEntry::new(640, 480, Box::new(MonospaceBackend::default())) }

    #[test]
    fn label_sizes_itself_to_the_text() {
        let mut ui = entry();
        let l = ui.add_label(ui.root(), "hello").unwrap();
        let d = ui.control(l).unwrap();
        assert_eq!((d.width, d.height), (40, 16));
        ui.set_text(l, "hi").unwrap();
        assert_eq!(ui.control(l).unwrap().width, 16);
        assert_eq!(ui.text(l), Some("hi"));
        assert!(!ui.control(l).unwrap().accepts_focus());
    }

    #[test]
    fn set_text_rejects_controls_without_text() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        assert_eq!(ui.set_text(c, "x"), Err(UiError::KindMismatch(c)));
    }

    #[test]
    fn button_clicks_on_release_inside() {
        let mut ui = entry();
        let b = ui.add_button(ui.root(), "&Ok").unwrap();
        ui.posit(b, 10, 10, 60, 24).unwrap();
        ui.do_mouse_move(20, 20, ShiftState::NONE);
        assert!(ui.do_mouse_down(20, 20, ShiftState::LEFT_BUTTON));
        assert_eq!(ui.focused(), Some(b));
        assert_eq!(ui.capture(), Some(b));
        ui.take_events();
        ui.do_mouse_up(20, 20, ShiftState::NONE);
        assert!(ui.take_events().contains(&(b, UiEvent::Click)));
        assert_eq!(ui.capture(), None);

        ui.do_mouse_down(20, 20, ShiftState::LEFT_BUTTON);
        ui.do_mouse_move(200, 200, ShiftState::NONE);
        ui.take_events();
        ui.do_mouse_up(200, 200, ShiftState::NONE);
        assert!(!ui.take_events().contains(&(b, UiEvent::Click)));
    }

    #[test]
    fn checkable_button_toggles_from_keyboard() {
        let mut ui = entry();
        let b = ui.add_button(ui.root(), "Bold").unwrap();
        if let Some(ControlKind::Button(data)) = ui.kind_mut(b) {
            data.checkable = true;
        }
        ui.set_focused_control(Some(b));
        assert!(ui.do_key_down(Key::SPACE, ShiftState::NONE));
        assert!(ui.is_checked(b));
        let events = ui.take_events();
        assert!(events.contains(&(b, UiEvent::Changed)));
        assert!(events.contains(&(b, UiEvent::Click)));
    }

    #[test]
    fn scroll_geometry_maps_positions_both_ways() {
        let mut sb = ScrollBarData::new(Orientation::Vertical);
        let g = ScrollGeometry::compute(&sb, 116, 16);
        assert_eq!((g.button, g.track_len, g.thumb_pos, g.thumb_len), (16, 84, 16, 8));
        sb.position = 100;
        let g = ScrollGeometry::compute(&sb, 116, 16);
        assert_eq!(g.thumb_pos, 16 + 76);
        assert_eq!(g.position_at(&sb, g.thumb_pos), 100);
        assert_eq!(g.position_at(&sb, 16 + 38), 50);
        assert_eq!(g.position_at(&sb, -50), 0);
    }

    #[test]
    fn scroll_bar_arrows_repeat_with_acceleration() {
        let mut ui = entry();
        let s = ui.add_scroll_bar(ui.root(), Orientation::Vertical).unwrap();
        ui.posit(s, 0, 0, 16, 116).unwrap();
        ui.do_mouse_move(8, 110, ShiftState::NONE);
        assert!(ui.do_mouse_down(8, 110, ShiftState::LEFT_BUTTON));
        assert_eq!(ui.scroll_position(s), Some(1));
        ui.do_mouse_hover();
        for _ in 0..9 {
            ui.do_tick();
        }
        assert_eq!(ui.scroll_position(s), Some(10));
        ui.do_tick();
        assert_eq!(ui.scroll_position(s), Some(12));
        ui.do_mouse_up(8, 110, ShiftState::NONE);
        ui.do_tick();
        assert_eq!(ui.scroll_position(s), Some(12));
        assert_eq!(ui.capture(), None);
    }

    #[test]
    fn scroll_bar_thumb_drag_and_wheel() {
        let mut ui = entry();
        let s = ui.add_scroll_bar(ui.root(), Orientation::Vertical).unwrap();
        ui.posit(s, 0, 0, 16, 116).unwrap();
        ui.do_mouse_move(8, 18, ShiftState::NONE);
        ui.do_mouse_down(8, 18, ShiftState::LEFT_BUTTON);
        ui.do_mouse_move(8, 18 + 38, ShiftState::NONE);
        assert_eq!(ui.scroll_position(s), Some(50));
        ui.do_mouse_up(8, 56, ShiftState::NONE);
        ui.do_mouse_wheel(1, ShiftState::NONE);
        assert_eq!(ui.scroll_position(s), Some(47));
        ui.set_scroll_range(s, 0, 20, 5).unwrap();
        assert_eq!(ui.scroll_position(s), Some(20));
    }
}
