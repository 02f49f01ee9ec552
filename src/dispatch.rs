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

impl UiEntry {
    /// Runs `f` with the widget of a custom control temporarily taken out of its slot, so the hook
    /// can borrow the whole entry.
    fn with_widget<R>(&mut self, id: ControlId, f: impl FnOnce(&mut dyn Widget, &mut WidgetCtx<'_>) -> R) -> Option<R> {
        let mut widget = match self.kind_mut(id) {
            Some(ControlKind::Custom(c)) => c.widget.take()?,
            _ => return None,
        };
        let result = {
            let mut ctx = WidgetCtx::new(self, id);
            f(widget.as_mut(), &mut ctx)
        };
        if let Some(ControlKind::Custom(c)) = self.kind_mut(id) {
            if c.widget.is_none() {
                c.widget = Some(widget);
            }
        }
        Some(result)
    }

    fn paint_widget(&mut self, id: ControlId, bounds: Rect, top_layer: bool) {
        let mut widget = match self.kind_mut(id) {
            Some(ControlKind::Custom(c)) => match c.widget.take() {
                Some(w) => w,
                None => return,
            },
            _ => return,
        };
        {
            let mut ctx = self.paint();
            if top_layer {
                widget.draw_top_layer(&mut ctx, bounds);
            } else {
                widget.draw(&mut ctx, bounds);
            }
        }
        if let Some(ControlKind::Custom(c)) = self.kind_mut(id) {
            if c.widget.is_none() {
                c.widget = Some(widget);
            }
        }
    }

    pub(crate) fn base_mouse_down(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        let Some(d) = self.control(id) else { return false };
        if d.is_interactive() {
            let inside = d.is_point_in_client(x, y);
            self.raise(id, UiEvent::MouseDown(MouseArgs { x, y, delta: 0, shift }));
            if inside && !self.routing.focus_claimed {
                self.routing.focus_claimed = true;
                self.set_focus(id);
            }
        }
        false
    }

    pub(crate) fn base_mouse_up(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        let Some(d) = self.control(id) else { return false };
        if d.is_interactive() {
            let inside = d.is_point_in_content(x, y);
            self.raise(id, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
            if inside && self.routing.mouse_down == Some(id) {
                self.raise(id, UiEvent::Click);
            }
        }
        false
    }

    pub(crate) fn base_mouse_move(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        if self.control(id).map(|d| d.is_interactive()).unwrap_or(false) {
            self.raise(id, UiEvent::MouseMove(MouseArgs { x, y, delta: 0, shift }));
        }
        false
    }

    pub(crate) fn control_mouse_down(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        match self.tag(id) {
            Some(KindTag::Button) => self.button_mouse_down(id, x, y, shift),
            Some(KindTag::ScrollBar) => self.scroll_bar_mouse_down(id, x, y, shift),
            Some(KindTag::Form) => self.form_mouse_down(id, x, y, shift),
            Some(KindTag::Menu) => self.menu_mouse_down(id, x, y, shift),
            Some(KindTag::MenuItem) => self.menu_item_mouse_down(id, x, y, shift),
            Some(KindTag::Custom) => {
                self.base_mouse_down(id, x, y, shift);
                self.with_widget(id, |w, ctx| w.mouse_down(ctx, MouseArgs { x, y, delta: 0, shift })).unwrap_or(false)
            }
            Some(_) => self.base_mouse_down(id, x, y, shift),
            None => false,
        }
    }

    pub(crate) fn control_mouse_up(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        match self.tag(id) {
            Some(KindTag::Button) => self.button_mouse_up(id, x, y, shift),
            Some(KindTag::ScrollBar) => self.scroll_bar_mouse_up(id, x, y, shift),
            Some(KindTag::Form) => self.form_mouse_up(id, x, y, shift),
            Some(KindTag::Menu) => self.menu_mouse_up(id, x, y, shift),
            Some(KindTag::MenuItem) => self.menu_item_mouse_up(id, x, y, shift),
            Some(KindTag::Custom) => {
                self.base_mouse_up(id, x, y, shift);
                self.with_widget(id, |w, ctx| w.mouse_up(ctx, MouseArgs { x, y, delta: 0, shift })).unwrap_or(false)
            }
            Some(_) => self.base_mouse_up(id, x, y, shift),
            None => false,
        }
    }

    pub(crate) fn control_mouse_move(&mut self, id: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        match self.tag(id) {
            Some(KindTag::ScrollBar) => self.scroll_bar_mouse_move(id, x, y, shift),
            Some(KindTag::Form) => self.form_mouse_move(id, x, y, shift),
            Some(KindTag::Menu) => self.menu_mouse_move(id, x, y, shift),
            Some(KindTag::Custom) => {
                self.base_mouse_move(id, x, y, shift);
                self.with_widget(id, |w, ctx| w.mouse_move(ctx, MouseArgs { x, y, delta: 0, shift })).unwrap_or(false)
            }
            Some(_) => self.base_mouse_move(id, x, y, shift),
            None => false,
        }
    }

    pub(crate) fn control_mouse_wheel(&mut self, id: ControlId, x: i32, y: i32, delta: i32, shift: ShiftState) -> bool {
        let args = MouseArgs { x, y, delta, shift };
        match self.tag(id) {
            Some(KindTag::ScrollBar) => self.scroll_bar_mouse_wheel(id, args),
            Some(KindTag::Custom) => {
                self.raise(id, UiEvent::MouseWheel(args));
                self.with_widget(id, |w, ctx| w.mouse_wheel(ctx, args)).unwrap_or(false)
            }
            Some(_) => {
                self.raise(id, UiEvent::MouseWheel(args));
                false
            }
            None => false,
        }
    }

    pub(crate) fn control_mouse_hover(&mut self, id: ControlId) -> bool {
        match self.tag(id) {
            Some(KindTag::ScrollBar) => self.scroll_bar_mouse_hover(id),
            Some(KindTag::Menu) => self.menu_mouse_hover(id),
            Some(KindTag::Custom) => {
                self.raise(id, UiEvent::MouseHover);
                self.with_widget(id, |w, ctx| w.mouse_hover(ctx)).unwrap_or(false)
            }
            Some(_) => {
                self.raise(id, UiEvent::MouseHover);
                false
            }
            None => false,
        }
    }

    pub(crate) fn control_dbl_click(&mut self, id: ControlId) -> bool {
        if self.control(id).map(|d| d.is_interactive()).unwrap_or(false) {
            self.raise(id, UiEvent::DblClick);
        }
        false
    }

    pub(crate) fn control_mouse_enter(&mut self, id: ControlId) {
        match self.tag(id) {
            Some(KindTag::MenuItem) => self.menu_item_mouse_enter(id),
            Some(_) => self.raise(id, UiEvent::MouseEnter),
            None => (),
        }
    }

    pub(crate) fn control_mouse_leave(&mut self, id: ControlId) {
        match self.tag(id) {
            Some(KindTag::MenuItem) => self.menu_item_mouse_leave(id),
            Some(_) => self.raise(id, UiEvent::MouseLeave),
            None => (),
        }
    }

    pub(crate) fn control_key_down(&mut self, id: ControlId, key: Key, shift: ShiftState) -> bool {
        let args = KeyArgs { key, shift };
        match self.tag(id) {
            Some(KindTag::Button) => self.button_key_down(id, args),
            Some(KindTag::Menu) => {
                self.raise(id, UiEvent::KeyDown(args));
                self.menu_key_down(id, key, shift)
            }
            Some(KindTag::Custom) => {
                self.raise(id, UiEvent::KeyDown(args));
                self.with_widget(id, |w, ctx| w.key_down(ctx, args)).unwrap_or(false)
            }
            Some(_) => {
                self.raise(id, UiEvent::KeyDown(args));
                false
            }
            None => false,
        }
    }

    pub(crate) fn control_key_up(&mut self, id: ControlId, key: Key, shift: ShiftState) -> bool {
        let args = KeyArgs { key, shift };
        self.raise(id, UiEvent::KeyUp(args));
        match self.tag(id) {
            Some(KindTag::Custom) => self.with_widget(id, |w, ctx| w.key_up(ctx, args)).unwrap_or(false),
            _ => false,
        }
    }

    pub(crate) fn control_key_press(&mut self, id: ControlId, ch: char, shift: ShiftState) -> bool {
        self.raise(id, UiEvent::KeyPress { ch, shift });
        match self.tag(id) {
            Some(KindTag::Custom) => self.with_widget(id, |w, ctx| w.key_press(ctx, ch, shift)).unwrap_or(false),
            _ => false,
        }
    }

    pub(crate) fn control_tick(&mut self, id: ControlId) {
        match self.tag(id) {
            Some(KindTag::ScrollBar) => self.scroll_bar_tick(id),
            Some(KindTag::Custom) => {
                self.with_widget(id, |w, ctx| w.tick(ctx));
            }
            _ => (),
        }
    }

    /// Dismisses popups in the subtree of `id`, deepest first.
    pub(crate) fn control_close_popup(&mut self, id: ControlId) {
        for child in self.tree.children(id).to_vec() {
            self.control_close_popup(child);
        }
        match self.tag(id) {
            Some(KindTag::Menu) if self.is_popup_menu(id) => self.close_menu(id),
            Some(KindTag::Custom) => {
                self.with_widget(id, |w, ctx| w.close_popup(ctx));
            }
            _ => (),
        }
    }

    pub(crate) fn control_lost_focus(&mut self, id: ControlId, new_focus: Option<ControlId>) {
        self.raise(id, UiEvent::LostFocus { new_focus });
        if self.tag(id) == Some(KindTag::Menu) {
            self.menu_lost_focus(id, new_focus);
        }
    }

    pub(crate) fn deliver_ime(&mut self, id: ControlId, text: &str) {
        self.raise(id, UiEvent::ImeResult(text.to_string()));
        if self.tag(id) == Some(KindTag::Custom) {
            self.with_widget(id, |w, ctx| w.ime_result(ctx, text));
        }
    }

    /// Delivers an internal message to a control.
    pub fn send_message(&mut self, id: ControlId, msg: UiMessage) {
        match (self.tag(id), msg) {
            (Some(KindTag::Menu), UiMessage::TopLayerDraw) => self.draw_popup_menu(id),
            (Some(KindTag::Custom), UiMessage::TopLayerDraw) => {
                if self.control(id).map(|d| d.is_visible()).unwrap_or(false) {
                    let bounds = self.absolute_bounds(id);
                    self.paint_widget(id, bounds, true);
                }
            }
            (Some(KindTag::Form), UiMessage::Activate) => self.form_activated(id),
            (Some(KindTag::Form), UiMessage::Deactivate) => self.form_deactivated(id),
            _ => (),
        }
    }

    /// Bounds of `id` in surface coordinates.
    pub fn absolute_bounds(&self, id: ControlId) -> Rect {
        let pos = self.local_to_absolute(id, 0, 0);
        let (w, h) = self.control(id).map(|d| (d.width, d.height)).unwrap_or((0, 0));
        rect(pos.x, pos.y, w, h)
    }

    /// Activates a control as if it had been clicked: buttons and plain controls raise
    /// [`UiEvent::Click`], menu items run their command (or open their submenu).
    pub fn perform_click(&mut self, id: ControlId) {
        match self.tag(id) {
            Some(KindTag::MenuItem) => self.menu_item_hit(id, true),
            Some(_) => self.raise(id, UiEvent::Click),
            None => (),
        }
    }

    /// Draws `id` with its parent's reference origin at `origin` (absolute).
    pub(crate) fn draw_control(&mut self, id: ControlId, origin: Vec2i) {
        let Some(d) = self.control_mut(id) else { return };
        d.abs = vec2(origin.x + d.left, origin.y + d.top);
        let bounds = rect(d.abs.x, d.abs.y, d.width, d.height);
        match self.tag(id) {
            Some(KindTag::Plain) => self.draw_chrome(id),
            Some(KindTag::Container) => {
                self.draw_chrome(id);
                self.draw_children(id);
            }
            Some(KindTag::Label) => self.draw_label(id),
            Some(KindTag::Button) => self.draw_button(id),
            Some(KindTag::ScrollBar) => self.draw_scroll_bar(id),
            Some(KindTag::Form) => self.draw_form(id),
            Some(KindTag::Menu) => {
                if !self.is_popup_menu(id) {
                    self.draw_menu_bar(id);
                }
            }
            Some(KindTag::MenuItem) => (),
            Some(KindTag::Custom) => {
                self.draw_chrome(id);
                self.paint_widget(id, bounds, false);
                if self.kind(id).map(|k| k.is_container()).unwrap_or(false) {
                    self.draw_children(id);
                }
            }
            None => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Probe {
        log: Rc<RefCell<Vec<&'static str>>>,
        consume_down: bool,
    }

    impl Widget for Probe {
        fn draw(&mut self, ctx: &mut PaintCtx<'_>, bounds: Rect) {
            self.log.borrow_mut().push("draw");
            ctx.fill_rect(bounds, color(1, 2, 3, 255));
        }

        fn mouse_down(&mut self, ctx: &mut WidgetCtx<'_>, _args: MouseArgs) -> bool {
            self.log.borrow_mut().push("down");
            ctx.capture();
            self.consume_down
        }

        fn tick(&mut self, ctx: &mut WidgetCtx<'_>) {
            self.log.borrow_mut().push("tick");
            ctx.unsubscribe_tick();
        }

        fn ime_result(&mut self, _ctx: &mut WidgetCtx<'_>, _text: &str) { self.log.borrow_mut().push("ime"); }
    }

    fn entry() -> UiEntry { UiEntry::new(320, 240, Box::new(MonospaceBackend::default())) }

    #[test]
    fn innermost_handler_runs_first_and_can_stop_propagation() {
        let mut ui = entry();
        let outer_log = Rc::new(RefCell::new(Vec::new()));
        let inner_log = Rc::new(RefCell::new(Vec::new()));
        let outer = ui.add_custom(ui.root(), CustomData::container(Box::new(Probe { log: outer_log.clone(), consume_down: false }))).unwrap();
        ui.posit(outer, 0, 0, 100, 100).unwrap();
        let inner = ui.add_custom(outer, CustomData::leaf(Box::new(Probe { log: inner_log.clone(), consume_down: true }))).unwrap();
        ui.posit(inner, 10, 10, 20, 20).unwrap();

        ui.do_mouse_move(15, 15, ShiftState::NONE);
        assert_eq!(ui.pointed(), Some(inner));
        assert!(ui.do_mouse_down(15, 15, ShiftState::LEFT_BUTTON));
        assert_eq!(*inner_log.borrow(), vec!["down"]);
        assert!(outer_log.borrow().is_empty());
        assert_eq!(ui.capture(), Some(inner));
        ui.do_mouse_up(15, 15, ShiftState::NONE);
        assert_eq!(ui.capture(), None);
    }

    #[test]
    fn unhandled_events_bubble_to_the_parent() {
        let mut ui = entry();
        let outer_log = Rc::new(RefCell::new(Vec::new()));
        let outer = ui.add_custom(ui.root(), CustomData::container(Box::new(Probe { log: outer_log.clone(), consume_down: true }))).unwrap();
        ui.posit(outer, 0, 0, 100, 100).unwrap();
        let inner = ui.add_control(outer, ControlKind::Plain).unwrap();
        ui.posit(inner, 10, 10, 20, 20).unwrap();
        ui.do_mouse_move(15, 15, ShiftState::NONE);
        assert!(ui.do_mouse_down(15, 15, ShiftState::LEFT_BUTTON));
        assert_eq!(*outer_log.borrow(), vec!["down"]);
        assert_eq!(ui.focused(), Some(inner));
    }

    #[test]
    fn custom_widgets_draw_and_tick() {
        let mut ui = entry();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = ui.add_custom(ui.root(), CustomData::leaf(Box::new(Probe { log: log.clone(), consume_down: false }))).unwrap();
        ui.posit(id, 5, 5, 10, 10).unwrap();
        ui.draw_ui();
        assert!(ui.draw_commands().contains(&DrawCommand::SolidQuad { rect: rect(5, 5, 10, 10), color: color(1, 2, 3, 255) }));
        ui.subscribe_tick(id);
        ui.do_tick();
        ui.do_tick();
        assert_eq!(*log.borrow(), vec!["draw", "tick"]);
    }

    #[test]
    fn perform_click_raises_click() {
        let mut ui = entry();
        let id = ui.add_control(ui.root(), ControlKind::Plain).unwrap();
        ui.take_events();
        ui.perform_click(id);
        assert_eq!(ui.take_events(), vec![(id, UiEvent::Click)]);
    }
}
