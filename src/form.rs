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
use log::{debug, warn};

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    /// Edges moved by a resize drag.
    pub struct ResizeMode : u32 {
        /// No edge.
        const NONE = 0;
        /// Left edge.
        const LEFT = 1;
        /// Top edge.
        const TOP = 2;
        /// Right edge.
        const RIGHT = 4;
        /// Bottom edge.
        const BOTTOM = 8;
    }
}

impl ResizeMode {
    /// Pointer shape matching the edges.
    pub fn cursor(self) -> CursorKind {
        let horizontal = self.intersects(Self::LEFT | Self::RIGHT);
        let vertical = self.intersects(Self::TOP | Self::BOTTOM);
        match (horizontal, vertical) {
            (true, true) if self.contains(Self::LEFT) == self.contains(Self::TOP) => CursorKind::SizeNWSE,
            (true, true) => CursorKind::SizeNESW,
            (true, false) => CursorKind::SizeWE,
            (false, true) => CursorKind::SizeNS,
            (false, false) => CursorKind::Arrow,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Pointer interaction of a form. Anchors are local to the form.
pub enum FormDrag {
    #[default]
    /// Nothing in progress.
    Idle,
    /// Title bar grabbed.
    Moving {
        /// Grab point, x.
        anchor_x: i32,
        /// Grab point, y.
        anchor_y: i32,
    },
    /// Border grabbed.
    Resizing {
        /// Edges being moved.
        mode: ResizeMode,
        /// Grab point, x.
        anchor_x: i32,
        /// Grab point, y.
        anchor_y: i32,
    },
    /// Close button held.
    ClosePressed,
}

#[derive(Clone, Debug)]
/// Floating top-level window with a title bar.
pub struct FormData {
    pub(crate) container: ContainerData,
    /// Caption.
    pub title: String,
    /// Borders can be dragged to resize.
    pub sizeable: bool,
    /// A close button is shown in the title bar.
    pub show_close: bool,
    pub(crate) activated: bool,
    pub(crate) drag: FormDrag,
    pub(crate) main_menu: Option<ControlId>,
}

impl FormData {
    /// Whether this is the active form.
    pub fn is_active(&self) -> bool { self.activated }

    /// Pointer interaction in progress.
    pub fn drag(&self) -> FormDrag { self.drag }

    /// Menu bar docked inside the form.
    pub fn main_menu(&self) -> Option<ControlId> { self.main_menu }

    /// Layout of the form's content.
    pub fn layout(&self) -> LayoutMode { self.container.layout }
}

impl UiEntry {
    /// Creates a hidden form. Call [`UiEntry::show_window`] to display and activate it.
    pub fn add_form(&mut self, title: &str) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.flags.remove(ControlFlags::VISIBLE);
        data.flags.insert(ControlFlags::BACKGROUND_SHADOW);
        data.border_style = BorderStyle::Flat;
        data.border_color = self.theme.color(ThemeColor::FormBorder);
        data.back_color = self.theme.color(ThemeColor::FormBack);
        data.padding = Margins::uniform(2);
        let form = FormData {
            container: ContainerData::default(),
            title: title.to_string(),
            sizeable: true,
            show_close: true,
            activated: false,
            drag: FormDrag::Idle,
            main_menu: None,
        };
        let root = self.root;
        let id = self.insert_control(root, data, ControlKind::Form(form))?;
        self.forms.push(id);
        let min_h = self.metrics.form_min_height();
        let min_w = self.metrics.form_min_width;
        self.posit(id, 20, 20, min_w.max(300), min_h.max(200))?;
        debug!("form {:?} '{}' created", id, title);
        Ok(id)
    }

    fn form(&self, id: ControlId) -> Option<&FormData> { self.kind(id).and_then(|k| k.as_form()) }

    fn form_mut(&mut self, id: ControlId) -> Option<&mut FormData> {
        match self.kind_mut(id) {
            Some(ControlKind::Form(f)) => Some(f),
            _ => None,
        }
    }

    /// Shows a form, raises it above the other forms and activates it.
    pub fn show_window(&mut self, form: ControlId) {
        if self.form(form).is_none() {
            warn!("show_window on {:?}, which is not a form", form);
            return;
        }
        let was_visible = self.control(form).map(|d| d.is_visible()).unwrap_or(false);
        if !was_visible {
            if let Some(d) = self.control_mut(form) {
                d.flags.insert(ControlFlags::VISIBLE);
            }
            self.raise(form, UiEvent::Show);
        }
        if self.forms.last() != Some(&form) {
            self.forms.retain(|f| *f != form);
            self.forms.push(form);
        }
        if self.active_form != Some(form) {
            if let Some(old) = self.active_form.filter(|f| self.tree.contains(*f)) {
                self.send_message(old, UiMessage::Deactivate);
            }
            self.active_form = Some(form);
            self.send_message(form, UiMessage::Activate);
        }
    }

    /// Hides a form. The topmost remaining visible form becomes active.
    pub fn close_window(&mut self, form: ControlId) {
        if self.form(form).is_none() {
            warn!("close_window on {:?}, which is not a form", form);
            return;
        }
        self.raise(form, UiEvent::Close);
        if let Some(d) = self.control_mut(form) {
            d.flags.remove(ControlFlags::VISIBLE);
        }
        if let Some(c) = self.routing.capture.filter(|c| self.tree.is_within(*c, form)) {
            self.release_capture(c);
        }
        let had_focus = self.routing.focused.map(|f| self.tree.is_within(f, form)).unwrap_or(false);
        if self.active_form == Some(form) {
            self.send_message(form, UiMessage::Deactivate);
            self.active_form = None;
            if had_focus {
                self.set_focused_control(None);
            }
            let next = self.forms.iter().rev().copied().find(|f| *f != form && self.control(*f).map(|d| d.is_visible()).unwrap_or(false));
            if let Some(next) = next {
                self.show_window(next);
            }
        } else if had_focus {
            self.set_focused_control(None);
        }
    }

    /// Activates the bottom-most visible and enabled form, bringing it to the top. Repeated calls
    /// cycle through all forms.
    pub fn cycle_forms(&mut self) {
        let next = self.forms.iter().copied().find(|f| self.control(*f).map(|d| d.is_interactive()).unwrap_or(false));
        if let Some(next) = next {
            debug!("cycling to form {:?}", next);
            self.show_window(next);
        }
    }

    pub(crate) fn form_activated(&mut self, id: ControlId) {
        if let Some(f) = self.form_mut(id) {
            f.activated = true;
        }
        self.raise(id, UiEvent::Activate);
        let inside = self.routing.focused.map(|f| self.tree.is_descendant_of(f, id)).unwrap_or(false);
        if !inside {
            let target = self.find_next_focus(id).unwrap_or(id);
            self.set_focused_control(Some(target));
        }
    }

    pub(crate) fn form_deactivated(&mut self, id: ControlId) {
        if let Some(f) = self.form_mut(id) {
            f.activated = false;
        }
        self.raise(id, UiEvent::Deactivate);
    }

    /// Forms accept points slightly outside their bounds so thin borders stay grabbable.
    pub(crate) fn form_hit_test(&self, id: ControlId, x: i32, y: i32) -> Option<ControlId> {
        if let Some(hit) = self.container_hit_test(id, x, y) {
            return Some(hit);
        }
        let d = self.control(id)?;
        let margin = self.metrics.line_height / 2;
        (x >= -margin && y >= -margin && x <= d.width + margin && y <= d.height + margin).then_some(id)
    }

    fn resize_mode_at(&self, id: ControlId, x: i32, y: i32) -> ResizeMode {
        let (Some(f), Some(d)) = (self.form(id), self.control(id)) else { return ResizeMode::NONE };
        if !f.sizeable {
            return ResizeMode::NONE;
        }
        let handle = self.metrics.resize_handle;
        let mut mode = ResizeMode::NONE;
        mode.set(ResizeMode::LEFT, x < handle);
        mode.set(ResizeMode::RIGHT, x > d.width - handle);
        mode.set(ResizeMode::TOP, y < handle);
        mode.set(ResizeMode::BOTTOM, y > d.height - handle);
        mode
    }

    fn close_button_rect(&self, id: ControlId) -> Rect {
        let title = self.metrics.title_height();
        let w = self.control(id).map(|d| d.width).unwrap_or(0);
        rect(w - title - 1, 1, title, title)
    }

    pub(crate) fn form_mouse_down(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        let focus_inside = self.routing.focused.map(|f| self.tree.is_descendant_of(f, id)).unwrap_or(false);
        if focus_inside {
            self.raise(id, UiEvent::MouseDown(MouseArgs { x, y, delta: 0, shift }));
            self.show_window(id);
        } else {
            self.base_mouse_down(id, x, y, shift);
            self.show_window(id);
        }
        if !shift.contains(ShiftState::LEFT_BUTTON) {
            return false;
        }
        let Some(f) = self.form(id) else { return false };
        let show_close = f.show_close;
        let Some(w) = self.control(id).map(|d| d.width) else { return false };
        let title = self.metrics.title_height();
        let mode = self.resize_mode_at(id, x, y);
        let close = self.close_button_rect(id);
        let title_end = if show_close { close.x } else { w - 3 };
        let drag = if !mode.is_empty() {
            FormDrag::Resizing { mode, anchor_x: x, anchor_y: y }
        } else if show_close && close.contains(x, y) {
            FormDrag::ClosePressed
        } else if y > 0 && y < title + 1 && x > 3 && x < title_end {
            FormDrag::Moving { anchor_x: x, anchor_y: y }
        } else {
            FormDrag::Idle
        };
        if let Some(f) = self.form_mut(id) {
            f.drag = drag;
        }
        if drag == FormDrag::Idle {
            return false;
        }
        self.set_capture(id);
        true
    }

    pub(crate) fn form_mouse_move(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.base_mouse_move(id, x, y, shift);
        let Some(drag) = self.form(id).map(|f| f.drag) else { return false };
        let Some(d) = self.control(id) else { return false };
        let (mut l, mut t, mut w, mut h) = (d.left, d.top, d.width, d.height);
        match drag {
            FormDrag::Moving { anchor_x, anchor_y } => {
                if let Some(d) = self.control_mut(id) {
                    d.left += x - anchor_x;
                    d.top += y - anchor_y;
                }
                true
            }
            FormDrag::Resizing { mode, mut anchor_x, mut anchor_y } => {
                let (dx, dy) = (x - anchor_x, y - anchor_y);
                let (min_w, min_h) = (self.metrics.form_min_width, self.metrics.form_min_height());
                if mode.contains(ResizeMode::LEFT) {
                    let nw = (w - dx).max(min_w);
                    l += w - nw;
                    w = nw;
                }
                if mode.contains(ResizeMode::RIGHT) {
                    let nw = (w + dx).max(min_w);
                    anchor_x += nw - w;
                    w = nw;
                }
                if mode.contains(ResizeMode::TOP) {
                    let nh = (h - dy).max(min_h);
                    t += h - nh;
                    h = nh;
                }
                if mode.contains(ResizeMode::BOTTOM) {
                    let nh = (h + dy).max(min_h);
                    anchor_y += nh - h;
                    h = nh;
                }
                if let Some(f) = self.form_mut(id) {
                    f.drag = FormDrag::Resizing { mode, anchor_x, anchor_y };
                }
                self.routing.cursor = mode.cursor();
                let _ = self.posit(id, l, t, w, h);
                true
            }
            FormDrag::ClosePressed => true,
            FormDrag::Idle => {
                self.routing.cursor = self.resize_mode_at(id, x, y).cursor();
                false
            }
        }
    }

    pub(crate) fn form_mouse_up(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.raise(id, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
        let Some(drag) = self.form_mut(id).map(|f| std::mem::take(&mut f.drag)) else { return false };
        self.release_capture(id);
        match drag {
            FormDrag::ClosePressed => {
                if self.close_button_rect(id).contains(x, y) {
                    self.close_window(id);
                }
            }
            FormDrag::Moving { .. } | FormDrag::Resizing { .. } => self.clamp_form(id),
            FormDrag::Idle => return false,
        }
        true
    }

    /// Keeps at least a corner of the form inside its parent.
    fn clamp_form(&mut self, id: ControlId) {
        let Some(parent) = self.parent(id) else { return };
        let client = self.client_rect(parent);
        if let Some(d) = self.control_mut(id) {
            d.left = d.left.min(client.w - 50).max(0);
            d.top = d.top.min(client.h - 50).max(0);
        }
    }

    pub(crate) fn draw_form(&mut self, id: ControlId) {
        self.draw_chrome(id);
        let Some(f) = self.form(id) else { return };
        let (title_text, active, show_close, pressed) = (f.title.clone(), f.activated, f.show_close, f.drag == FormDrag::ClosePressed);
        let Some(d) = self.control(id) else { return };
        let (abs, w, font) = (d.abs, d.width, d.font);
        let title = self.metrics.title_height();
        let close = self.close_button_rect(id).translate(abs.x, abs.y);
        let bar = rect(abs.x + 1, abs.y + 1, w - 2, title);
        let mut ctx = self.paint();
        let fill = if active { ctx.color(ThemeColor::TitleBar) } else { ctx.color(ThemeColor::TitleBarInactive) };
        ctx.fill_rect(bar, fill);
        let fore = ctx.color(ThemeColor::TitleFont);
        let font = ctx.resolve_font(font);
        ctx.push_clip(rect(bar.x, bar.y, if show_close { close.x - bar.x } else { bar.w }, bar.h));
        let size = ctx.measure_text(font, &title_text, TextOptions::NONE);
        ctx.draw_text(font, &title_text, TextOptions::NONE, vec2(bar.x + title / 3, bar.y + (title - size.height) / 2), fore);
        ctx.pop_clip();
        if show_close {
            if pressed {
                let c = ctx.color(ThemeColor::ToolButtonPressed);
                ctx.fill_rect(close, c);
            }
            let inset = close.expand(-(title / 4));
            let (x0, y0, x1, y1) = (inset.x as f32, inset.y as f32, inset.right() as f32, inset.bottom() as f32);
            ctx.draw_line(x0, y0, x1, y1, fore);
            ctx.draw_line(x0, y1, x1, y0, fore);
        }
        self.draw_children(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UiEntry { UiEntry::new(640, 480, Box::new(MonospaceBackend::default())) }

    fn form_at(ui: &mut UiEntry, x: i32, y: i32) -> ControlId {
        let f = ui.add_form("Tools").unwrap();
        ui.posit(f, x, y, 300, 200).unwrap();
        ui.show_window(f);
        f
    }

    fn press(ui: &mut UiEntry, x: i32, y: i32) {
        ui.do_mouse_move(x, y, ShiftState::NONE);
        ui.do_mouse_down(x, y, ShiftState::LEFT_BUTTON);
    }

    #[test]
    fn show_window_activates_and_focuses_first_tab_stop() {
        let mut ui = entry();
        let f = ui.add_form("Tools").unwrap();
        let b = ui.add_button(f, "Ok").unwrap();
        assert!(!ui.control(f).unwrap().is_visible());
        ui.show_window(f);
        assert!(ui.control(f).unwrap().is_visible());
        assert_eq!(ui.active_form(), Some(f));
        assert_eq!(ui.focused(), Some(b));
        let events = ui.take_events();
        assert!(events.contains(&(f, UiEvent::Show)));
        assert!(events.contains(&(f, UiEvent::Activate)));
    }

    #[test]
    fn clicking_a_form_brings_it_forward() {
        let mut ui = entry();
        let a = form_at(&mut ui, 10, 10);
        let b = form_at(&mut ui, 200, 100);
        assert_eq!(ui.forms(), &[a, b]);
        ui.take_events();
        press(&mut ui, 50, 100);
        ui.do_mouse_up(50, 100, ShiftState::NONE);
        assert_eq!(ui.forms(), &[b, a]);
        assert_eq!(ui.active_form(), Some(a));
        assert!(ui.take_events().contains(&(b, UiEvent::Deactivate)));
        assert!(!ui.form(b).unwrap().is_active());
    }

    #[test]
    fn clicking_bare_root_deactivates_and_blurs() {
        let mut ui = entry();
        let f = form_at(&mut ui, 200, 200);
        let b = ui.add_button(f, "Ok").unwrap();
        ui.set_focused_control(Some(b));
        assert_eq!(ui.active_form(), Some(f));
        ui.take_events();
        press(&mut ui, 20, 20);
        ui.do_mouse_up(20, 20, ShiftState::NONE);
        assert_eq!(ui.active_form(), None);
        assert_eq!(ui.focused(), None);
        assert!(!ui.form(f).unwrap().is_active());
        let events = ui.take_events();
        assert!(events.contains(&(f, UiEvent::Deactivate)));
        assert!(events.contains(&(b, UiEvent::LostFocus { new_focus: None })));

        press(&mut ui, 250, 250);
        assert_eq!(ui.active_form(), Some(f));
        assert_eq!(ui.focused(), Some(b));
    }

    #[test]
    fn title_drag_moves_the_form() {
        let mut ui = entry();
        let f = form_at(&mut ui, 20, 20);
        press(&mut ui, 70, 30);
        assert!(matches!(ui.form(f).unwrap().drag(), FormDrag::Moving { .. }));
        assert_eq!(ui.capture(), Some(f));
        ui.do_mouse_move(170, 80, ShiftState::LEFT_BUTTON);
        ui.do_mouse_up(170, 80, ShiftState::NONE);
        assert_eq!(ui.control(f).unwrap().bounds(), rect(120, 70, 300, 200));
        assert_eq!(ui.capture(), None);
    }

    #[test]
    fn release_clamps_position_into_parent() {
        let mut ui = entry();
        let f = form_at(&mut ui, 20, 20);
        press(&mut ui, 70, 30);
        ui.do_mouse_move(-500, 900, ShiftState::LEFT_BUTTON);
        ui.do_mouse_up(-500, 900, ShiftState::NONE);
        let d = ui.control(f).unwrap();
        assert_eq!((d.left, d.top), (0, 430));
    }

    #[test]
    fn resize_respects_minimum_size() {
        let mut ui = entry();
        let f = form_at(&mut ui, 20, 20);
        press(&mut ui, 318, 218);
        assert!(matches!(ui.form(f).unwrap().drag(), FormDrag::Resizing { mode, .. } if mode == ResizeMode::RIGHT | ResizeMode::BOTTOM));
        ui.do_mouse_move(118, 118, ShiftState::LEFT_BUTTON);
        assert_eq!(ui.control(f).unwrap().bounds(), rect(20, 20, 120, 100));
        assert_eq!(ui.cursor_kind(), CursorKind::SizeNWSE);
        ui.do_mouse_up(118, 118, ShiftState::NONE);
    }

    #[test]
    fn border_grace_margin_is_grabbable() {
        let mut ui = entry();
        let f = form_at(&mut ui, 20, 20);
        assert_eq!(ui.find_control_at_position(16, 100), f);
        assert_eq!(ui.find_control_at_position(5, 100), ui.root());
    }

    #[test]
    fn close_button_hides_the_form() {
        let mut ui = entry();
        let f = form_at(&mut ui, 20, 20);
        let title = ui.metrics().title_height();
        let (x, y) = (20 + 300 - title / 2 - 1, 20 + title / 2);
        press(&mut ui, x, y);
        assert_eq!(ui.form(f).unwrap().drag(), FormDrag::ClosePressed);
        ui.take_events();
        ui.do_mouse_up(x, y, ShiftState::NONE);
        assert!(!ui.control(f).unwrap().is_visible());
        assert_eq!(ui.active_form(), None);
        assert!(ui.take_events().contains(&(f, UiEvent::Close)));
    }

    #[test]
    fn ctrl_tab_cycles_forms() {
        let mut ui = entry();
        let a = form_at(&mut ui, 10, 10);
        let b = form_at(&mut ui, 200, 100);
        assert_eq!(ui.active_form(), Some(b));
        assert!(ui.do_key_down(Key::TAB, ShiftState::CONTROL));
        assert_eq!(ui.forms(), &[b, a]);
        assert_eq!(ui.active_form(), Some(a));
        ui.do_key_down(Key::TAB, ShiftState::CONTROL);
        assert_eq!(ui.active_form(), Some(b));
    }

    #[test]
    fn form_children_sit_below_the_title_bar() {
        let mut ui = entry();
        let f = form_at(&mut ui, 0, 0);
        let title = ui.metrics().title_height();
        assert_eq!(ui.client_rect(f), rect(3, 3 + title, 294, 194 - title));
    }
}
