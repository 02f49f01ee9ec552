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
use crate::tree::ControlTree;
use crate::*;
use log::{debug, trace, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Pointer shape requested by the control under the pointer.
pub enum CursorKind {
    #[default]
    /// Default arrow.
    Arrow,
    /// Horizontal resize.
    SizeWE,
    /// Vertical resize.
    SizeNS,
    /// Diagonal resize, top-left to bottom-right.
    SizeNWSE,
    /// Diagonal resize, top-right to bottom-left.
    SizeNESW,
}

#[derive(Clone, Debug, Default)]
/// Input routing state of a surface.
pub struct InputRoutingContext {
    /// Control under the pointer after the last move.
    pub pointed: Option<ControlId>,
    /// Control receiving every pointer event until it releases the capture.
    pub capture: Option<ControlId>,
    /// Control that received the last button press.
    pub mouse_down: Option<ControlId>,
    /// Control holding keyboard focus.
    pub focused: Option<ControlId>,
    /// Last pointer position in surface coordinates.
    pub cursor_pos: Vec2i,
    /// Pointer shape requested by the last move.
    pub cursor: CursorKind,
    pub(crate) recaptured: bool,
    pub(crate) focus_claimed: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ImeState {
    pub visible: bool,
    pub composition: String,
    pub receiver: Option<ControlId>,
}

/// Root of a control tree bound to one drawing surface.
///
/// The entry owns every control, routes host input to them, and turns the tree into a
/// [`DrawCommand`] list on [`UiEntry::draw_ui`].
pub struct UiEntry {
    pub(crate) tree: ControlTree,
    pub(crate) root: ControlId,
    pub(crate) routing: InputRoutingContext,
    pub(crate) forms: Vec<ControlId>,
    pub(crate) active_form: Option<ControlId>,
    pub(crate) popups: Vec<ControlId>,
    pub(crate) top_layer: Vec<ControlId>,
    pub(crate) tick_subscribers: Vec<ControlId>,
    pub(crate) main_menu: Option<ControlId>,
    pub(crate) menu_return_focus: Option<ControlId>,
    pub(crate) ime: ImeState,
    pub(crate) draw: DrawBuffer,
    pub(crate) clips: ClipRectStack,
    pub(crate) theme: Theme,
    pub(crate) metrics: Metrics,
    pub(crate) text: Box<dyn TextBackend>,
    pub(crate) events: Vec<(ControlId, UiEvent)>,
}

impl UiEntry {
    /// Creates a surface of `width` x `height` pixels with the default theme.
    pub fn new(width: i32, height: i32, text: Box<dyn TextBackend>) -> Self { Self::with_theme(width, height, text, Theme::default()) }

    /// Creates a surface with an explicit theme.
    pub fn with_theme(width: i32, height: i32, text: Box<dyn TextBackend>, theme: Theme) -> Self {
        let mut tree = ControlTree::default();
        let mut data = ControlData::new(&theme);
        data.width = width;
        data.height = height;
        data.border_style = BorderStyle::None;
        data.back_color = Color::default();
        data.flags.remove(ControlFlags::ACCEPTS_FOCUS);
        let root = tree.insert(data, ControlKind::Container(ContainerData::default()));
        let mut entry = Self {
            tree,
            root,
            routing: InputRoutingContext::default(),
            forms: Vec::new(),
            active_form: None,
            popups: Vec::new(),
            top_layer: Vec::new(),
            tick_subscribers: Vec::new(),
            main_menu: None,
            menu_return_focus: None,
            ime: ImeState::default(),
            draw: DrawBuffer::new(),
            clips: ClipRectStack::new(width, height),
            theme,
            metrics: Metrics::default(),
            text,
            events: Vec::new(),
        };
        entry.metrics.line_height = entry.measure_line_height();
        entry.metrics.scrollbar_button_size = entry.metrics.line_height;
        entry.size_changed(root);
        debug!("ui entry created: {}x{}, line height {}", width, height, entry.metrics.line_height);
        entry
    }

    pub(crate) fn measure_line_height(&mut self) -> i32 {
        let h = self.text.measure(self.theme.default_font, "M", TextOptions::NONE).height;
        if h > 0 { h } else { Metrics::default().line_height }
    }

    /// The root container.
    pub fn root(&self) -> ControlId { self.root }

    /// Surface width.
    pub fn width(&self) -> i32 { self.control(self.root).map(|d| d.width).unwrap_or(0) }

    /// Surface height.
    pub fn height(&self) -> i32 { self.control(self.root).map(|d| d.height).unwrap_or(0) }

    /// Number of live controls, root included.
    pub fn control_count(&self) -> usize { self.tree.len() }

    /// Returns `true` while `id` refers to a live control.
    pub fn contains(&self, id: ControlId) -> bool { self.tree.contains(id) }

    /// Common data of a control.
    pub fn control(&self, id: ControlId) -> Option<&ControlData> { self.tree.get(id).map(|n| &n.data) }

    /// Mutable common data. Geometry edits made here take effect at the next layout pass; use
    /// [`UiEntry::posit`] to re-layout immediately.
    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut ControlData> { self.tree.get_mut(id).map(|n| &mut n.data) }

    /// Kind-specific data of a control.
    pub fn kind(&self, id: ControlId) -> Option<&ControlKind> { self.tree.get(id).map(|n| &n.kind) }

    /// Mutable kind-specific data of a control.
    pub fn kind_mut(&mut self, id: ControlId) -> Option<&mut ControlKind> { self.tree.get_mut(id).map(|n| &mut n.kind) }

    /// Discriminant of a control's kind.
    pub fn tag(&self, id: ControlId) -> Option<KindTag> { self.tree.get(id).map(|n| n.kind.tag()) }

    /// Parent of a control; `None` for the root.
    pub fn parent(&self, id: ControlId) -> Option<ControlId> { self.tree.parent(id) }

    /// Children of a control in z-order (last is topmost).
    pub fn children(&self, id: ControlId) -> &[ControlId] { self.tree.children(id) }

    /// Returns `true` when `id` is a strict descendant of `ancestor`.
    pub fn is_child_of(&self, id: ControlId, ancestor: ControlId) -> bool { self.tree.is_descendant_of(id, ancestor) }

    /// Routing state.
    pub fn routing(&self) -> &InputRoutingContext { &self.routing }

    /// Focused control.
    pub fn focused(&self) -> Option<ControlId> { self.routing.focused }

    /// Capturing control.
    pub fn capture(&self) -> Option<ControlId> { self.routing.capture }

    /// Control under the pointer.
    pub fn pointed(&self) -> Option<ControlId> { self.routing.pointed }

    /// Pointer shape requested by the last move.
    pub fn cursor_kind(&self) -> CursorKind { self.routing.cursor }

    /// Active form.
    pub fn active_form(&self) -> Option<ControlId> { self.active_form }

    /// Forms from bottom to top.
    pub fn forms(&self) -> &[ControlId] { &self.forms }

    /// Open popup menus in opening order.
    pub fn popups(&self) -> &[ControlId] { &self.popups }

    /// Menu bar attached to the root, if any.
    pub fn main_menu(&self) -> Option<ControlId> { self.main_menu }

    /// Active theme.
    pub fn theme(&self) -> &Theme { &self.theme }

    /// Replaces the theme. Colors already copied into controls are left alone.
    pub fn set_theme(&mut self, theme: Theme) { self.theme = theme; }

    /// Size constants.
    pub fn metrics(&self) -> &Metrics { &self.metrics }

    /// Height of one line of the default font.
    pub fn line_height(&self) -> i32 { self.metrics.line_height }

    /// Text backend used for measuring and baking.
    pub fn text_backend(&mut self) -> &mut dyn TextBackend { self.text.as_mut() }

    /// Swaps the text backend. Call [`UiEntry::do_dpi_changed`] afterwards when the new backend
    /// measures differently.
    pub fn set_text_backend(&mut self, text: Box<dyn TextBackend>) { self.text = text; }

    /// Commands produced by the last [`UiEntry::draw_ui`].
    pub fn draw_commands(&self) -> &[DrawCommand] { self.draw.commands() }

    /// Creates a control of an arbitrary kind under `parent`.
    pub fn add_control(&mut self, parent: ControlId, kind: ControlKind) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        if !kind.is_container() {
            data.border_style = BorderStyle::None;
        }
        self.insert_control(parent, data, kind)
    }

    /// Creates a host-defined widget under `parent`.
    pub fn add_custom(&mut self, parent: ControlId, custom: CustomData) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.border_style = BorderStyle::None;
        data.back_color = Color::default();
        self.insert_control(parent, data, ControlKind::Custom(custom))
    }

    pub(crate) fn insert_control(&mut self, parent: ControlId, data: ControlData, kind: ControlKind) -> UiResult<ControlId> {
        let p = self.tree.get(parent).ok_or(UiError::InvalidControl(parent))?;
        if !p.kind.is_container() {
            return Err(UiError::NotAContainer(parent));
        }
        let relayout = p.kind.container().map(|c| c.layout != LayoutMode::None).unwrap_or(false)
            || p.data.flags.intersects(ControlFlags::AUTO_WIDTH | ControlFlags::AUTO_HEIGHT);
        let tag = kind.tag();
        let id = self.tree.insert(data, kind);
        self.tree.attach(parent, id);
        trace!("created {:?} {:?} under {:?}", tag, id, parent);
        if relayout {
            self.size_changed(parent);
        }
        Ok(id)
    }

    /// Moves `id` under `new_parent`, appending it as the topmost child.
    pub fn set_parent(&mut self, id: ControlId, new_parent: ControlId) -> UiResult<()> {
        if id == self.root {
            return Err(UiError::RootImmutable);
        }
        if !self.tree.contains(id) {
            return Err(UiError::InvalidControl(id));
        }
        let p = self.tree.get(new_parent).ok_or(UiError::InvalidControl(new_parent))?;
        if !p.kind.is_container() {
            return Err(UiError::NotAContainer(new_parent));
        }
        if self.tree.is_within(new_parent, id) {
            return Err(UiError::WouldCreateCycle);
        }
        let old = self.tree.parent(id);
        self.tree.attach(new_parent, id);
        if let Some(old) = old {
            self.size_changed(old);
        }
        self.size_changed(new_parent);
        Ok(())
    }

    /// Destroys `id` and its whole subtree. Every routing slot and registry entry that pointed
    /// into the subtree is cleared.
    pub fn destroy(&mut self, id: ControlId) -> UiResult<()> {
        if id == self.root {
            return Err(UiError::RootImmutable);
        }
        if !self.tree.contains(id) {
            return Err(UiError::InvalidControl(id));
        }
        let parent = self.tree.parent(id);
        let removed = self.tree.remove_subtree(id);
        debug!("destroyed {:?} ({} controls)", id, removed.len());
        for gone in &removed {
            self.forget(*gone);
        }
        if let Some(parent) = parent {
            self.size_changed(parent);
            if self.tag(parent) == Some(KindTag::Menu) {
                self.posit_menu_items(parent);
            }
        }
        Ok(())
    }

    fn forget(&mut self, id: ControlId) {
        let r = &mut self.routing;
        for slot in [&mut r.pointed, &mut r.capture, &mut r.mouse_down, &mut r.focused] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        for slot in [&mut self.active_form, &mut self.main_menu, &mut self.menu_return_focus, &mut self.ime.receiver] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        self.forms.retain(|f| *f != id);
        self.popups.retain(|p| *p != id);
        self.top_layer.retain(|t| *t != id);
        self.tick_subscribers.retain(|t| *t != id);
    }

    /// Shows or hides a control and re-arranges its parent.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) -> UiResult<()> { self.set_flags(id, ControlFlags::VISIBLE, visible) }

    /// Enables or disables a control.
    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) -> UiResult<()> { self.set_flags(id, ControlFlags::ENABLED, enabled) }

    /// Sets or clears flags, then re-arranges the control and its parent.
    pub fn set_flags(&mut self, id: ControlId, flags: ControlFlags, on: bool) -> UiResult<()> {
        let d = self.control_mut(id).ok_or(UiError::InvalidControl(id))?;
        d.flags.set(flags, on);
        self.relayout_around(id);
        Ok(())
    }

    /// Changes the docking of a control and re-arranges its parent.
    pub fn set_dock(&mut self, id: ControlId, dock: DockStyle) -> UiResult<()> {
        self.control_mut(id).ok_or(UiError::InvalidControl(id))?.dock = dock;
        self.relayout_around(id);
        Ok(())
    }

    /// Changes the padding of a control and re-arranges it.
    pub fn set_padding(&mut self, id: ControlId, padding: Margins) -> UiResult<()> {
        self.control_mut(id).ok_or(UiError::InvalidControl(id))?.padding = padding;
        self.relayout_around(id);
        Ok(())
    }

    fn relayout_around(&mut self, id: ControlId) {
        self.size_changed(id);
        if let Some(parent) = self.tree.parent(id) {
            self.size_changed(parent);
        }
    }

    /// Registers a listener for events of `kind` raised by `id`.
    pub fn on(&mut self, id: ControlId, kind: EventKind, listener: impl FnMut(ControlId, &UiEvent) + 'static) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::InvalidControl(id))?;
        node.listeners.push((kind, Box::new(listener)));
        Ok(())
    }

    /// Raises `event` on `id`: matching listeners run immediately and the pair is queued for
    /// [`UiEntry::take_events`].
    pub fn raise(&mut self, id: ControlId, event: UiEvent) {
        let kind = event.kind();
        let Some(node) = self.tree.get_mut(id) else { return };
        for (k, listener) in node.listeners.iter_mut() {
            if *k == kind {
                listener(id, &event);
            }
        }
        self.events.push((id, event));
    }

    /// Drains the queued events.
    pub fn take_events(&mut self) -> Vec<(ControlId, UiEvent)> { std::mem::take(&mut self.events) }

    /// Routes every pointer event to `id` until it is released.
    pub fn set_capture(&mut self, id: ControlId) {
        if !self.tree.contains(id) {
            warn!("capture requested by stale control {:?}", id);
            return;
        }
        if self.routing.capture != Some(id) {
            trace!("capture -> {:?}", id);
        }
        self.routing.capture = Some(id);
        self.routing.recaptured = true;
    }

    /// Releases the capture if `id` holds it.
    pub fn release_capture(&mut self, id: ControlId) {
        if self.routing.capture == Some(id) {
            trace!("capture released by {:?}", id);
            self.routing.capture = None;
        }
    }

    /// Asks for [`Widget::tick`] (or the built-in tick handler) on every [`UiEntry::do_tick`].
    pub fn subscribe_tick(&mut self, id: ControlId) {
        if !self.tree.contains(id) {
            warn!("tick subscription for stale control {:?}", id);
            return;
        }
        if !self.tick_subscribers.contains(&id) {
            self.tick_subscribers.push(id);
        }
    }

    /// Stops tick delivery to `id`.
    pub fn unsubscribe_tick(&mut self, id: ControlId) { self.tick_subscribers.retain(|t| *t != id); }

    /// Adds `id` to the top-layer pass drawn after every form.
    pub fn register_top_layer(&mut self, id: ControlId) {
        if !self.top_layer.contains(&id) {
            self.top_layer.push(id);
        }
    }

    /// Removes `id` from the top-layer pass.
    pub fn unregister_top_layer(&mut self, id: ControlId) { self.top_layer.retain(|t| *t != id); }

    /// Resizes the surface.
    pub fn resize(&mut self, width: i32, height: i32) -> UiResult<()> {
        let root = self.root;
        self.posit(root, 0, 0, width, height)
    }

    /// Keeps every form reachable after the surface shrank.
    pub(crate) fn clamp_forms(&mut self) {
        let (w, h) = (self.width(), self.height());
        for form in self.forms.clone() {
            let Some(d) = self.control_mut(form) else { continue };
            d.left = d.left.min(w - 50).max(0);
            d.top = d.top.min(h - 50).max(0);
        }
    }

    fn chain_from(&self, start: ControlId) -> Vec<ControlId> {
        let mut chain = self.tree.ancestry(start);
        chain.retain(|c| *c != self.root);
        chain
    }

    fn live_capture(&self) -> Option<ControlId> { self.routing.capture.filter(|c| self.tree.contains(*c)) }

    /// Pointer target: the capturing control, or the control under the pointer.
    fn mouse_target(&self) -> Option<ControlId> { self.live_capture().or(self.routing.pointed) }

    fn dispatch_mouse(&mut self, x: i32, y: i32, mut handler: impl FnMut(&mut Self, ControlId, i32, i32) -> bool) -> bool {
        let Some(target) = self.mouse_target() else { return false };
        for id in self.chain_from(target) {
            if !self.tree.contains(id) {
                continue;
            }
            let local = self.absolute_to_local(id, x, y);
            if handler(self, id, local.x, local.y) {
                return true;
            }
        }
        false
    }

    /// Hit-tests `(x, y)`. Enter/leave transitions only run while nothing holds the capture.
    fn update_pointed(&mut self, x: i32, y: i32) -> ControlId {
        self.routing.cursor_pos = vec2(x, y);
        let hit = self.find_control_at_position(x, y);
        if self.live_capture().is_none() {
            self.move_pointer(hit);
        }
        hit
    }

    /// Leaves from the old pointed control up to the first ancestor of `hit`, then enters from
    /// `hit` up to that ancestor.
    fn move_pointer(&mut self, hit: ControlId) {
        let old = self.routing.pointed.filter(|p| self.tree.contains(*p));
        if old == Some(hit) {
            return;
        }
        let mut shared = old;
        while let Some(c) = shared {
            if self.tree.is_within(hit, c) {
                break;
            }
            self.control_mouse_leave(c);
            shared = self.tree.parent(c);
        }
        let entering: Vec<ControlId> = self.tree.ancestry(hit).into_iter().take_while(|c| Some(*c) != shared).collect();
        for id in entering {
            self.control_mouse_enter(id);
        }
        self.routing.pointed = Some(hit);
    }

    /// Activates the topmost usable form holding `id`. Outside every form the active form is
    /// deactivated and the focus dropped.
    fn activate_form_under(&mut self, id: ControlId) {
        let target = self.forms.iter().rev().copied().find(|f| self.control(*f).map(|d| d.is_interactive()).unwrap_or(false) && self.tree.is_within(id, *f));
        if let Some(form) = target {
            self.show_window(form);
        } else if let Some(old) = self.active_form.take() {
            if self.tree.contains(old) {
                self.send_message(old, UiMessage::Deactivate);
            }
            self.set_focused_control(None);
        }
    }

    /// Button press at the surface point `(x, y)`. Returns `true` when a control consumed it.
    pub fn do_mouse_down(&mut self, x: i32, y: i32, shift: ShiftState) -> bool {
        let captured = self.live_capture().is_some();
        let hit = self.update_pointed(x, y);
        self.routing.pointed = Some(hit);
        let in_popup = self.popups.iter().any(|m| self.tree.is_within(hit, *m));
        if !in_popup && !self.popups.is_empty() {
            self.do_close_popup();
        }
        if !captured {
            self.activate_form_under(hit);
        }
        self.routing.mouse_down = self.mouse_target();
        self.routing.focus_claimed = false;
        let handled = self.dispatch_mouse(x, y, |ui, id, lx, ly| ui.control_mouse_down(id, lx, ly, shift));
        if !handled {
            let root = self.root;
            if !captured && hit == root && self.live_capture().is_none() {
                self.set_capture(root);
                self.set_focused_control(Some(root));
            }
            self.raise(root, UiEvent::MouseDown(MouseArgs { x, y, delta: 0, shift }));
        }
        handled
    }

    /// Button release. The capture is released afterwards unless a handler captured again.
    pub fn do_mouse_up(&mut self, x: i32, y: i32, shift: ShiftState) -> bool {
        self.routing.cursor_pos = vec2(x, y);
        let before = self.routing.pointed;
        let hit = self.find_control_at_position(x, y);
        self.routing.pointed = Some(hit);
        self.routing.recaptured = false;
        let root = self.root;
        let handled = self.live_capture() != Some(root) && self.dispatch_mouse(x, y, |ui, id, lx, ly| ui.control_mouse_up(id, lx, ly, shift));
        if !handled {
            self.raise(root, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
        }
        if !self.routing.recaptured {
            self.routing.capture = None;
        }
        self.routing.mouse_down = None;
        if self.routing.capture.is_none() {
            self.routing.pointed = before;
            self.move_pointer(hit);
        }
        handled
    }

    /// Pointer move. Without a capture the pointed control follows the pointer, with leave and
    /// enter raised along the path between the old and new control.
    pub fn do_mouse_move(&mut self, x: i32, y: i32, shift: ShiftState) -> bool {
        self.update_pointed(x, y);
        self.routing.cursor = CursorKind::Arrow;
        let handled = self.dispatch_mouse(x, y, |ui, id, lx, ly| ui.control_mouse_move(id, lx, ly, shift));
        if !handled {
            let root = self.root;
            self.raise(root, UiEvent::MouseMove(MouseArgs { x, y, delta: 0, shift }));
        }
        handled
    }

    /// Wheel turn at the current pointer position.
    pub fn do_mouse_wheel(&mut self, delta: i32, shift: ShiftState) -> bool {
        let Vec2i { x, y, .. } = self.routing.cursor_pos;
        let handled = self.dispatch_mouse(x, y, |ui, id, lx, ly| ui.control_mouse_wheel(id, lx, ly, delta, shift));
        if !handled {
            let root = self.root;
            self.raise(root, UiEvent::MouseWheel(MouseArgs { x, y, delta, shift }));
        }
        handled
    }

    /// The pointer rested at its current position.
    pub fn do_mouse_hover(&mut self) -> bool {
        let Some(target) = self.mouse_target() else { return false };
        for id in self.chain_from(target) {
            if self.tree.contains(id) && self.control_mouse_hover(id) {
                return true;
            }
        }
        let root = self.root;
        self.raise(root, UiEvent::MouseHover);
        false
    }

    /// Double click at the current pointer position.
    pub fn do_dbl_click(&mut self) -> bool {
        let Some(target) = self.mouse_target() else { return false };
        for id in self.chain_from(target) {
            if self.tree.contains(id) && self.control_dbl_click(id) {
                return true;
            }
        }
        false
    }

    fn focus_chain(&self) -> Vec<ControlId> { self.routing.focused.filter(|f| self.tree.contains(*f)).map(|f| self.chain_from(f)).unwrap_or_default() }

    /// Key press. Alt chords go to the menu bars first and Ctrl+Tab cycles the forms, then the
    /// focused control and its ancestors see the key. An unconsumed Tab moves the focus.
    pub fn do_key_down(&mut self, key: Key, shift: ShiftState) -> bool {
        if shift.contains(ShiftState::ALT) || key == Key::ALT {
            let bars = self.menu_bars();
            if key == Key::ALT || key.as_alphanumeric().is_some() {
                for &menu in &bars {
                    if self.control_key_down(menu, key, shift) {
                        return true;
                    }
                }
            }
            if key != Key::ALT {
                for menu in bars {
                    self.hide_menu_mnemonics(menu);
                }
            }
        }
        if key == Key::TAB && shift.contains(ShiftState::CONTROL) && self.popups.is_empty() {
            self.cycle_forms();
            return true;
        }
        for id in self.focus_chain() {
            if self.tree.contains(id) && self.control_key_down(id, key, shift) {
                return true;
            }
        }
        if key == Key::TAB {
            let wants_tab = self.routing.focused.and_then(|f| self.control(f)).map(|d| d.flags.contains(ControlFlags::WANTS_TAB)).unwrap_or(false);
            if !wants_tab {
                if shift.contains(ShiftState::SHIFT) {
                    self.move_focus_backward();
                } else {
                    self.move_focus_forward();
                }
                return true;
            }
        }
        let root = self.root;
        self.raise(root, UiEvent::KeyDown(KeyArgs { key, shift }));
        false
    }

    /// Key release, routed like [`UiEntry::do_key_down`]. Releasing a lone Alt moves the focus to
    /// the menu bar.
    pub fn do_key_up(&mut self, key: Key, shift: ShiftState) -> bool {
        if key == Key::ALT {
            for menu in self.menu_bars() {
                self.menu_alt_released(menu);
            }
        }
        for id in self.focus_chain() {
            if self.tree.contains(id) && self.control_key_up(id, key, shift) {
                return true;
            }
        }
        let root = self.root;
        self.raise(root, UiEvent::KeyUp(KeyArgs { key, shift }));
        false
    }

    /// Character input. When nothing consumes it and the IME window is open, printable characters
    /// go to the IME receiver.
    pub fn do_key_press(&mut self, ch: char, shift: ShiftState) -> bool {
        for id in self.focus_chain() {
            if self.tree.contains(id) && self.control_key_press(id, ch, shift) {
                return true;
            }
        }
        if self.ime.visible && (ch == '\t' || (' '..='\u{7f}').contains(&ch)) {
            if let Some(receiver) = self.ime.receiver.filter(|r| self.tree.contains(*r)) {
                self.deliver_ime(receiver, &ch.to_string());
                return true;
            }
        }
        let root = self.root;
        self.raise(root, UiEvent::KeyPress { ch, shift });
        false
    }

    /// Delivers a periodic tick to every subscriber.
    pub fn do_tick(&mut self) {
        self.tick_subscribers.retain(|t| self.tree.contains(*t));
        for id in self.tick_subscribers.clone() {
            if self.tree.contains(id) {
                self.control_tick(id);
            }
        }
    }

    /// Opens the IME composition window.
    pub fn do_ime_start(&mut self) {
        self.ime.visible = true;
        self.ime.composition.clear();
    }

    /// Updates the text shown in the IME composition window.
    pub fn do_ime_composite_string(&mut self, text: &str) { self.ime.composition = text.to_string(); }

    /// Commits IME text to the receiver.
    pub fn do_ime_result_string(&mut self, text: &str) {
        if let Some(receiver) = self.ime.receiver.filter(|r| self.tree.contains(*r)) {
            self.deliver_ime(receiver, text);
        }
    }

    /// Closes the IME composition window.
    pub fn do_ime_end(&mut self) {
        self.ime.visible = false;
        self.ime.composition.clear();
    }

    /// Whether the IME composition window is open.
    pub fn ime_visible(&self) -> bool { self.ime.visible }

    /// Control receiving IME results.
    pub fn ime_receiver(&self) -> Option<ControlId> { self.ime.receiver }

    /// Re-measures the line height after the backend changed scale, rescales free-positioned
    /// controls and re-runs every layout.
    pub fn do_dpi_changed(&mut self) {
        let old = self.metrics.line_height.max(1);
        let new = self.measure_line_height();
        let scale = new as f32 / old as f32;
        self.metrics.line_height = new;
        self.metrics.scrollbar_button_size = new;
        self.metrics.dpi_scale *= scale;
        debug!("dpi changed: line height {} -> {}, scale {}", old, new, scale);
        let root = self.root;
        if (scale - 1.0).abs() > f32::EPSILON {
            self.rescale_children(root, scale);
        }
        self.refresh_menus();
        self.size_changed(root);
    }

    /// Closes every open popup of the surface.
    pub fn do_close_popup(&mut self) {
        let root = self.root;
        self.control_close_popup(root);
    }

    /// Produces this frame's draw commands.
    pub fn draw_ui(&mut self) -> &[DrawCommand] {
        self.draw.clear();
        self.text.begin_frame();
        let root = self.root;
        let (w, h) = (self.width(), self.height());
        self.clips.set_window_size(w, h);
        self.clips.clear(&mut self.draw);

        let (rl, rt) = self.control(root).map(|d| (d.left, d.top)).unwrap_or((0, 0));
        if let Some(d) = self.control_mut(root) {
            d.abs = vec2(rl, rt);
        }
        self.draw_chrome(root);
        let client = self.client_rect(root);
        for child in self.tree.children(root).to_vec() {
            if self.tag(child) == Some(KindTag::Form) || self.is_popup_menu(child) {
                continue;
            }
            let Some(c) = self.control(child) else { continue };
            if !c.is_visible() {
                continue;
            }
            let origin = if c.dock.uses_client_origin() { vec2(rl + client.x, rt + client.y) } else { vec2(rl, rt) };
            let bounds = rect(origin.x + c.left, origin.y + c.top, c.width + 1, c.height + 1);
            self.draw_clipped(child, origin, bounds);
        }
        for form in self.forms.clone() {
            let Some(c) = self.control(form) else { continue };
            if !c.is_visible() {
                continue;
            }
            let origin = vec2(rl + client.x, rt + client.y);
            let bounds = rect(origin.x + c.left - 1, origin.y + c.top - 1, c.width + 2, c.height + 2);
            self.draw_clipped(form, origin, bounds);
        }
        for id in self.top_layer.clone() {
            if self.tree.contains(id) {
                self.send_message(id, UiMessage::TopLayerDraw);
            }
        }
        self.draw_ime_window();
        self.draw.commands()
    }

    fn draw_ime_window(&mut self) {
        if !self.ime.visible {
            return;
        }
        let Some(receiver) = self.ime.receiver.filter(|r| self.tree.contains(*r)) else { return };
        let h = self.control(receiver).map(|d| d.height).unwrap_or(0);
        let pos = self.local_to_absolute(receiver, 0, h);
        let text = self.ime.composition.clone();
        let font = self.theme.default_font;
        let line = self.metrics.line_height;
        let mut ctx = self.paint();
        let size = ctx.measure_text(font, &text, TextOptions::NONE);
        let r = rect(pos.x, pos.y, size.width + line, line + line / 2);
        ctx.fill_rect(r, ctx.color(ThemeColor::EditableBack));
        ctx.draw_box(r, ctx.color(ThemeColor::ControlBorder));
        let fore = ctx.color(ThemeColor::ControlFont);
        ctx.draw_text(font, &text, TextOptions::NONE, vec2(r.x + line / 2, r.y + (r.h - size.height) / 2), fore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn entry() -> UiEntry { UiEntry::new(640, 480, Box::new(MonospaceBackend::default())) }

    fn plain(ui: &mut UiEntry, parent: ControlId, x: i32, y: i32, w: i32, h: i32) -> ControlId {
        let id = ui.add_control(parent, ControlKind::Plain).unwrap();
        ui.posit(id, x, y, w, h).unwrap();
        id
    }

    fn transitions(ui: &mut UiEntry) -> Vec<(ControlId, UiEvent)> {
        ui.take_events().into_iter().filter(|(_, e)| matches!(e, UiEvent::MouseEnter | UiEvent::MouseLeave)).collect()
    }

    #[test]
    fn line_height_comes_from_the_backend() {
        let ui = UiEntry::new(100, 100, Box::new(MonospaceBackend::new(7, 13)));
        assert_eq!(ui.line_height(), 13);
        assert_eq!(ui.metrics().scrollbar_button_size, 13);
    }

    #[test]
    fn add_control_rejects_leaf_parent() {
        let mut ui = entry();
        let root = ui.root();
        let leaf = plain(&mut ui, root, 0, 0, 10, 10);
        assert_eq!(ui.add_control(leaf, ControlKind::Plain), Err(UiError::NotAContainer(leaf)));
    }

    #[test]
    fn destroy_clears_routing_and_invalidates_ids() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        let child = plain(&mut ui, c, 0, 0, 10, 10);
        ui.routing.focused = Some(child);
        ui.routing.pointed = Some(child);
        ui.set_capture(child);
        ui.subscribe_tick(child);
        ui.destroy(c).unwrap();
        assert!(!ui.contains(child));
        assert_eq!(ui.focused(), None);
        assert_eq!(ui.pointed(), None);
        assert_eq!(ui.capture(), None);
        assert!(ui.tick_subscribers.is_empty());
        assert_eq!(ui.destroy(c), Err(UiError::InvalidControl(c)));
        assert_eq!(ui.destroy(ui.root()), Err(UiError::RootImmutable));
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut ui = entry();
        let a = ui.add_container(ui.root()).unwrap();
        let b = ui.add_container(a).unwrap();
        assert_eq!(ui.set_parent(a, b), Err(UiError::WouldCreateCycle));
        let c = ui.add_container(ui.root()).unwrap();
        ui.set_parent(b, c).unwrap();
        assert_eq!(ui.parent(b), Some(c));
        assert!(ui.children(a).is_empty());
    }

    #[test]
    fn listeners_and_queue_both_see_events() {
        let mut ui = entry();
        let root = ui.root();
        let id = plain(&mut ui, root, 0, 0, 10, 10);
        ui.take_events();
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        ui.on(id, EventKind::Click, move |_, _| *counter.borrow_mut() += 1).unwrap();
        ui.raise(id, UiEvent::Click);
        ui.raise(id, UiEvent::Changed);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(ui.take_events(), vec![(id, UiEvent::Click), (id, UiEvent::Changed)]);
    }

    #[test]
    fn capture_is_released_after_mouse_up() {
        let mut ui = entry();
        let root = ui.root();
        let id = plain(&mut ui, root, 10, 10, 50, 50);
        ui.do_mouse_move(20, 20, ShiftState::NONE);
        assert_eq!(ui.pointed(), Some(id));
        ui.do_mouse_down(20, 20, ShiftState::LEFT_BUTTON);
        ui.set_capture(id);
        ui.do_mouse_up(20, 20, ShiftState::NONE);
        assert_eq!(ui.capture(), None);
    }

    #[test]
    fn click_needs_press_and_release_on_the_same_control() {
        let mut ui = entry();
        let root = ui.root();
        let a = plain(&mut ui, root, 10, 10, 50, 50);
        let b = plain(&mut ui, root, 100, 10, 50, 50);
        ui.do_mouse_move(20, 20, ShiftState::NONE);
        ui.do_mouse_down(20, 20, ShiftState::LEFT_BUTTON);
        ui.do_mouse_up(20, 20, ShiftState::NONE);
        ui.do_mouse_move(110, 20, ShiftState::NONE);
        ui.do_mouse_up(110, 20, ShiftState::NONE);
        let clicks: Vec<ControlId> = ui.take_events().into_iter().filter(|(_, e)| *e == UiEvent::Click).map(|(id, _)| id).collect();
        assert_eq!(clicks, vec![a]);
        assert!(!clicks.contains(&b));
    }

    #[test]
    fn leave_walks_up_to_the_shared_ancestor() {
        let mut ui = entry();
        let root = ui.root();
        let c = ui.add_container(root).unwrap();
        ui.posit(c, 10, 10, 100, 100).unwrap();
        let a = plain(&mut ui, c, 10, 10, 30, 30);
        let b = plain(&mut ui, c, 50, 10, 30, 30);
        ui.do_mouse_move(30, 30, ShiftState::NONE);
        assert_eq!(ui.pointed(), Some(a));
        ui.take_events();

        ui.do_mouse_move(70, 30, ShiftState::NONE);
        assert_eq!(transitions(&mut ui), vec![(a, UiEvent::MouseLeave), (b, UiEvent::MouseEnter)]);

        ui.do_mouse_move(300, 300, ShiftState::NONE);
        assert_eq!(transitions(&mut ui), vec![(b, UiEvent::MouseLeave), (c, UiEvent::MouseLeave)]);
        assert_eq!(ui.pointed(), Some(root));

        ui.do_mouse_move(30, 30, ShiftState::NONE);
        assert_eq!(transitions(&mut ui), vec![(a, UiEvent::MouseEnter), (c, UiEvent::MouseEnter)]);
    }

    #[test]
    fn capture_freezes_the_pointed_control() {
        let mut ui = entry();
        let root = ui.root();
        let a = plain(&mut ui, root, 10, 10, 50, 50);
        ui.do_mouse_move(20, 20, ShiftState::NONE);
        ui.set_capture(a);
        ui.take_events();
        ui.do_mouse_move(300, 300, ShiftState::NONE);
        assert!(transitions(&mut ui).is_empty());
        assert_eq!(ui.pointed(), Some(a));

        ui.do_mouse_up(300, 300, ShiftState::NONE);
        assert_eq!(ui.capture(), None);
        assert_eq!(ui.pointed(), Some(root));
        assert_eq!(transitions(&mut ui), vec![(a, UiEvent::MouseLeave)]);
    }

    #[test]
    fn unhandled_press_on_the_root_captures_until_release() {
        let mut ui = entry();
        let root = ui.root();
        ui.do_mouse_move(200, 200, ShiftState::NONE);
        ui.take_events();
        assert!(!ui.do_mouse_down(200, 200, ShiftState::LEFT_BUTTON));
        assert_eq!(ui.capture(), Some(root));
        assert_eq!(ui.focused(), None);
        ui.do_mouse_up(200, 200, ShiftState::NONE);
        assert_eq!(ui.capture(), None);
        let events = ui.take_events();
        assert!(events.iter().any(|(id, e)| *id == root && matches!(e, UiEvent::MouseDown(_))));
        assert!(events.iter().any(|(id, e)| *id == root && matches!(e, UiEvent::MouseUp(_))));
    }

    #[test]
    fn ime_result_reaches_the_receiver() {
        let mut ui = entry();
        let root = ui.root();
        let id = plain(&mut ui, root, 10, 10, 50, 20);
        ui.set_flags(id, ControlFlags::IME_RECEIVER | ControlFlags::TAB_STOP, true).unwrap();
        ui.set_focused_control(Some(id));
        assert_eq!(ui.ime_receiver(), Some(id));
        ui.do_ime_start();
        ui.do_ime_composite_string("ni");
        ui.draw_ui();
        assert!(ui.draw_commands().iter().any(|c| matches!(c, DrawCommand::TextQuad { pos: (18, 34), .. })));
        ui.do_ime_result_string("你");
        ui.do_key_press('a', ShiftState::NONE);
        ui.do_ime_end();
        let results: Vec<UiEvent> = ui.take_events().into_iter().filter(|(c, e)| *c == id && e.kind() == EventKind::ImeResult).map(|(_, e)| e).collect();
        assert_eq!(results, vec![UiEvent::ImeResult("你".into()), UiEvent::ImeResult("a".into())]);
    }

    #[test]
    fn dpi_change_rescales_free_controls() {
        let mut ui = entry();
        let root = ui.root();
        let id = plain(&mut ui, root, 10, 20, 30, 40);
        ui.set_text_backend(Box::new(MonospaceBackend::new(16, 32)));
        ui.do_dpi_changed();
        assert_eq!(ui.line_height(), 32);
        assert_eq!(ui.control(id).unwrap().bounds(), rect(20, 40, 60, 80));
        assert!((ui.metrics().dpi_scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn draw_ui_starts_with_window_clip() {
        let mut ui = entry();
        let root = ui.root();
        plain(&mut ui, root, 10, 10, 50, 50);
        let cmds = ui.draw_ui();
        assert_eq!(cmds[0], DrawCommand::Clip { rect: rect(0, 0, 640, 480) });
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Clip { rect } if *rect == rect_of(10, 10, 51, 51))));
    }

    fn rect_of(x: i32, y: i32, w: i32, h: i32) -> Rect { rect(x, y, w, h) }
}
