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
use log::debug;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Presentation of a [`ControlKind::Menu`].
pub enum MenuStyle {
    #[default]
    /// Floating list opened by [`UiEntry::popup_menu`] or by a parent item.
    Popup,
    /// Horizontal bar docked along the top of its parent.
    Main,
}

#[derive(Clone, Debug, Default)]
/// State of a menu bar or popup menu. Its children are [`ControlKind::MenuItem`] controls.
pub struct MenuData {
    pub(crate) container: ContainerData,
    pub(crate) style: MenuStyle,
    pub(crate) cur_sub_menu: Option<ControlId>,
    pub(crate) parent_item: Option<ControlId>,
    pub(crate) item_height: i32,
    pub(crate) mnemonic_visible: bool,
    pub(crate) hover_armed: bool,
}

impl MenuData {
    /// Bar or popup.
    pub fn style(&self) -> MenuStyle { self.style }

    /// Submenu currently opened from one of the items.
    pub fn cur_sub_menu(&self) -> Option<ControlId> { self.cur_sub_menu }

    /// Item this popup hangs from, `None` for menu bars and context menus.
    pub fn parent_item(&self) -> Option<ControlId> { self.parent_item }

    /// Height of a regular item after the last layout.
    pub fn item_height(&self) -> i32 { self.item_height }

    /// Whether access-key underlines are shown.
    pub fn mnemonic_visible(&self) -> bool { self.mnemonic_visible }
}

#[derive(Clone, Debug, Default)]
/// One entry of a menu.
pub struct MenuItemData {
    pub(crate) container: ContainerData,
    pub(crate) text: String,
    pub(crate) shortcut: String,
    pub(crate) access_key: Option<char>,
    pub(crate) separator: bool,
    pub(crate) selected: bool,
    pub(crate) checked: bool,
    pub(crate) is_button: bool,
    pub(crate) sub_menu: Option<ControlId>,
}

impl MenuItemData {
    /// Label, with `&` marking the access key.
    pub fn text(&self) -> &str { &self.text }

    /// Shortcut text shown right-aligned in popups.
    pub fn shortcut(&self) -> &str { &self.shortcut }

    /// Upper-cased access key.
    pub fn access_key(&self) -> Option<char> { self.access_key }

    /// Separator line instead of a command.
    pub fn is_separator(&self) -> bool { self.separator }

    /// Highlighted by the pointer or the keyboard.
    pub fn is_selected(&self) -> bool { self.selected }

    /// Check mark state.
    pub fn is_checked(&self) -> bool { self.checked }

    /// Item of a menu bar.
    pub fn is_button(&self) -> bool { self.is_button }

    /// Popup opened by this item.
    pub fn sub_menu(&self) -> Option<ControlId> { self.sub_menu }
}

impl UiEntry {
    /// Menu part of `id`.
    pub fn menu_data(&self, id: ControlId) -> Option<&MenuData> { self.kind(id).and_then(|k| k.as_menu()) }

    fn menu_data_mut(&mut self, id: ControlId) -> Option<&mut MenuData> {
        match self.kind_mut(id) {
            Some(ControlKind::Menu(m)) => Some(m),
            _ => None,
        }
    }

    /// Menu item part of `id`.
    pub fn menu_item_data(&self, id: ControlId) -> Option<&MenuItemData> { self.kind(id).and_then(|k| k.as_menu_item()) }

    fn menu_item_data_mut(&mut self, id: ControlId) -> Option<&mut MenuItemData> {
        match self.kind_mut(id) {
            Some(ControlKind::MenuItem(i)) => Some(i),
            _ => None,
        }
    }

    fn check_menu(&self, id: ControlId) -> UiResult<()> {
        if !self.tree.contains(id) {
            return Err(UiError::InvalidControl(id));
        }
        self.menu_data(id).map(|_| ()).ok_or(UiError::NotAMenu(id))
    }

    fn is_shown(&self, id: ControlId) -> bool { self.control(id).map(|d| d.is_visible()).unwrap_or(false) }

    /// Returns `true` for a menu shown as a floating popup.
    pub fn is_popup_menu(&self, id: ControlId) -> bool { self.menu_data(id).map(|m| m.style == MenuStyle::Popup).unwrap_or(false) }

    /// Returns `true` for a menu bar.
    pub fn is_main_menu(&self, id: ControlId) -> bool { self.menu_data(id).map(|m| m.style == MenuStyle::Main).unwrap_or(false) }

    /// `id` is a menu, a menu item, or lies inside one.
    pub fn is_in_menu(&self, id: ControlId) -> bool { self.tree.ancestry(id).into_iter().any(|a| matches!(self.tag(a), Some(KindTag::Menu) | Some(KindTag::MenuItem))) }

    /// Menu bars that see Alt chords: the active form's first, then the surface's.
    pub(crate) fn menu_bars(&self) -> Vec<ControlId> {
        let form_menu = self.active_form.and_then(|f| self.kind(f)).and_then(|k| k.as_form()).and_then(|f| f.main_menu);
        [form_menu, self.main_menu].into_iter().flatten().filter(|m| self.tree.contains(*m)).collect()
    }

    /// Creates a menu under `parent`. A [`MenuStyle::Main`] menu docks along the top of its parent
    /// and becomes the menu bar of the form (or of the surface when `parent` is the root); a
    /// [`MenuStyle::Popup`] menu starts hidden.
    pub fn add_menu(&mut self, parent: ControlId, style: MenuStyle) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.border_style = BorderStyle::None;
        match style {
            MenuStyle::Main => {
                data.dock = DockStyle::Top;
                data.back_color = self.theme.color(ThemeColor::ToolButtonBack);
            }
            MenuStyle::Popup => {
                data.flags.remove(ControlFlags::VISIBLE);
                data.flags.insert(ControlFlags::BACKGROUND_SHADOW | ControlFlags::TOP_MOST);
                data.back_color = self.theme.color(ThemeColor::MenuBack);
                data.padding = Margins::uniform(2);
            }
        }
        let id = self.insert_control(parent, data, ControlKind::Menu(MenuData { style, ..MenuData::default() }))?;
        match style {
            MenuStyle::Main => {
                if parent == self.root {
                    self.main_menu = Some(id);
                } else if let Some(ControlKind::Form(f)) = self.kind_mut(parent) {
                    f.main_menu = Some(id);
                }
                self.posit_menu_items(id);
            }
            MenuStyle::Popup => self.register_top_layer(id),
        }
        debug!("{:?} menu {:?} added under {:?}", style, id, parent);
        Ok(id)
    }

    /// Appends an item. `text` may mark its access key with `&`; `shortcut` is display-only.
    pub fn add_menu_item(&mut self, menu: ControlId, text: &str, shortcut: &str) -> UiResult<ControlId> {
        self.check_menu(menu)?;
        let line = self.metrics.line_height;
        let mut data = ControlData::new(&self.theme);
        data.border_style = BorderStyle::None;
        data.back_color = color(0, 0, 0, 0);
        data.flags.remove(ControlFlags::ACCEPTS_FOCUS);
        data.padding = Margins::new(line / 2, 0, line / 2, 0);
        let item = MenuItemData {
            text: text.to_string(),
            shortcut: shortcut.to_string(),
            access_key: access_key(text),
            is_button: self.is_main_menu(menu),
            ..MenuItemData::default()
        };
        let id = self.insert_control(menu, data, ControlKind::MenuItem(item))?;
        self.posit_menu_items(menu);
        Ok(id)
    }

    /// Appends a separator line. Menu bars hide their separators.
    pub fn add_menu_separator(&mut self, menu: ControlId) -> UiResult<ControlId> {
        let id = self.add_menu_item(menu, "", "")?;
        if let Some(i) = self.menu_item_data_mut(id) {
            i.separator = true;
        }
        self.posit_menu_items(menu);
        Ok(id)
    }

    /// Popup menu opened by `item`, created on first use.
    pub fn sub_menu(&mut self, item: ControlId) -> UiResult<ControlId> {
        if !self.tree.contains(item) {
            return Err(UiError::InvalidControl(item));
        }
        let existing = self.menu_item_data(item).ok_or(UiError::NotAMenuItem(item))?.sub_menu;
        if let Some(sub) = existing.filter(|s| self.tree.contains(*s)) {
            return Ok(sub);
        }
        let sub = self.add_menu(item, MenuStyle::Popup)?;
        let mnemonic = self.parent(item).and_then(|m| self.menu_data(m)).map(|m| m.mnemonic_visible).unwrap_or(false);
        if let Some(m) = self.menu_data_mut(sub) {
            m.parent_item = Some(item);
            m.mnemonic_visible = mnemonic;
        }
        if let Some(i) = self.menu_item_data_mut(item) {
            i.sub_menu = Some(sub);
        }
        Ok(sub)
    }

    /// Appends an item to the submenu of `item`, creating the submenu when needed.
    pub fn add_sub_item(&mut self, item: ControlId, text: &str, shortcut: &str) -> UiResult<ControlId> {
        let sub = self.sub_menu(item)?;
        let id = self.add_menu_item(sub, text, shortcut)?;
        if let Some(menu) = self.parent(item) {
            self.posit_menu_items(menu);
        }
        Ok(id)
    }

    /// Items of `menu` in display order.
    pub fn menu_items(&self, menu: ControlId) -> Vec<ControlId> { self.tree.children(menu).iter().copied().filter(|c| self.tag(*c) == Some(KindTag::MenuItem)).collect() }

    /// Item at `index`.
    pub fn menu_item(&self, menu: ControlId, index: usize) -> UiResult<ControlId> {
        self.check_menu(menu)?;
        let items = self.menu_items(menu);
        items.get(index).copied().ok_or(UiError::IndexOutOfRange { index, len: items.len() })
    }

    /// Number of items, separators included.
    pub fn menu_item_count(&self, menu: ControlId) -> UiResult<usize> {
        self.check_menu(menu)?;
        Ok(self.menu_items(menu).len())
    }

    /// Highlighted item of `menu`.
    pub fn selected_menu_item(&self, menu: ControlId) -> Option<ControlId> { self.menu_items(menu).into_iter().find(|i| self.menu_item_data(*i).map(|d| d.selected).unwrap_or(false)) }

    fn live_sub_menu(&self, item: ControlId) -> Option<ControlId> {
        self.menu_item_data(item).and_then(|i| i.sub_menu).filter(|s| self.tree.contains(*s) && !self.menu_items(*s).is_empty())
    }

    /// Menu whose item opened `menu`.
    fn owner_menu(&self, menu: ControlId) -> Option<ControlId> {
        let item = self.menu_data(menu)?.parent_item?;
        self.parent(item).filter(|p| self.tag(*p) == Some(KindTag::Menu))
    }

    fn top_menu_of(&self, menu: ControlId) -> ControlId {
        let mut cur = menu;
        while let Some(owner) = self.owner_menu(cur) {
            cur = owner;
        }
        cur
    }

    fn is_selectable(&self, item: ControlId) -> bool {
        self.control(item).map(|d| d.is_interactive()).unwrap_or(false) && self.menu_item_data(item).map(|i| !i.separator).unwrap_or(false)
    }

    fn set_item_selected(&mut self, item: ControlId, selected: bool) {
        if let Some(i) = self.menu_item_data_mut(item) {
            i.selected = selected;
        }
    }

    fn deselect_all(&mut self, menu: ControlId) {
        for item in self.menu_items(menu) {
            self.set_item_selected(item, false);
        }
    }

    fn select_only(&mut self, menu: ControlId, item: ControlId) {
        self.deselect_all(menu);
        self.set_item_selected(item, true);
    }

    fn select_first(&mut self, menu: ControlId) {
        let items = self.menu_items(menu);
        if let Some(first) = self.step_selection(&items, None, true) {
            self.select_only(menu, items[first]);
        }
    }

    fn selected_index(&self, items: &[ControlId]) -> Option<usize> { items.iter().position(|i| self.menu_item_data(*i).map(|d| d.selected).unwrap_or(false)) }

    /// Next selectable index after `from` (wrapping), skipping separators, hidden and disabled
    /// items.
    fn step_selection(&self, items: &[ControlId], from: Option<usize>, forward: bool) -> Option<usize> {
        let n = items.len();
        let mut cur = from;
        for _ in 0..n {
            let next = match (cur, forward) {
                (None, true) => 0,
                (None, false) => n - 1,
                (Some(i), true) => (i + 1) % n,
                (Some(i), false) => (i + n - 1) % n,
            };
            if self.is_selectable(items[next]) {
                return Some(next);
            }
            cur = Some(next);
        }
        None
    }

    /// Shows or hides access-key underlines on `menu` and all of its submenus.
    pub fn show_mnemonic_key(&mut self, menu: ControlId, show: bool) {
        let Some(m) = self.menu_data_mut(menu) else { return };
        m.mnemonic_visible = show;
        for item in self.menu_items(menu) {
            if let Some(sub) = self.menu_item_data(item).and_then(|i| i.sub_menu) {
                self.show_mnemonic_key(sub, show);
            }
        }
    }

    pub(crate) fn hide_menu_mnemonics(&mut self, menu: ControlId) {
        let focus_in = self.routing.focused.map(|f| self.is_in_menu(f)).unwrap_or(false);
        if !focus_in {
            self.show_mnemonic_key(menu, false);
        }
    }

    fn measure_menu_item(&mut self, item: ControlId, as_button: bool) -> i32 {
        let Some(c) = self.control(item) else { return 0 };
        let (pad, font) = (c.padding, c.font.unwrap_or(self.theme.default_font));
        let Some(i) = self.menu_item_data(item) else { return 0 };
        if i.separator {
            return 0;
        }
        let (text, shortcut) = (i.text.clone(), i.shortcut.clone());
        let arrow = if self.live_sub_menu(item).is_some() { self.metrics.separator_heading } else { 0 };
        let heading = self.metrics.separator_heading;
        let line = self.metrics.line_height;
        let backend = self.text_backend();
        let text_w = backend.measure(font, &text, TextOptions::SHOW_PREFIX).width;
        if as_button {
            return text_w + heading + pad.horizontal();
        }
        let shortcut_w = if shortcut.is_empty() { 0 } else { backend.measure(font, &shortcut, TextOptions::NONE).width + line };
        text_w + shortcut_w + heading + pad.horizontal() + arrow
    }

    /// Re-measures the items of `menu`. Popups stack them vertically and size themselves to the
    /// widest; bars lay them out left to right and take the height of one item.
    pub fn posit_menu_items(&mut self, menu: ControlId) {
        let Some(style) = self.menu_data(menu).map(|m| m.style) else { return };
        let Some(d) = self.control(menu) else { return };
        let (pad, left, top, old_w, old_h) = (d.padding, d.left, d.top, d.width, d.height);
        let line = self.metrics.line_height;
        let items = self.menu_items(menu);
        match style {
            MenuStyle::Popup => {
                let item_h = line * 3 / 2;
                let mut rows = Vec::with_capacity(items.len());
                let mut y = pad.top;
                let mut width = 0;
                for &item in &items {
                    if !self.is_shown(item) {
                        continue;
                    }
                    let separator = self.menu_item_data(item).map(|i| i.separator).unwrap_or(false);
                    let h = if separator { item_h / 4 } else { item_h };
                    width = width.max(self.measure_menu_item(item, false) + item_h);
                    rows.push((item, y, h));
                    y += h;
                }
                for (item, row_top, h) in rows {
                    self.place(item, pad.left, row_top, width, h);
                }
                if let Some(m) = self.menu_data_mut(menu) {
                    m.item_height = item_h;
                }
                self.place(menu, left, top, width + pad.horizontal(), y + pad.bottom);
            }
            MenuStyle::Main => {
                let item_h = line * 5 / 4;
                let mut x = pad.left;
                for &item in &items {
                    if self.menu_item_data(item).map(|i| i.separator).unwrap_or(false) {
                        if let Some(c) = self.control_mut(item) {
                            c.flags.remove(ControlFlags::VISIBLE);
                        }
                        continue;
                    }
                    if let Some(i) = self.menu_item_data_mut(item) {
                        i.is_button = true;
                    }
                    if !self.is_shown(item) {
                        continue;
                    }
                    let w = self.measure_menu_item(item, true);
                    self.place(item, x, pad.top, w, item_h);
                    x += w;
                }
                if let Some(m) = self.menu_data_mut(menu) {
                    m.item_height = item_h;
                }
                let height = item_h + pad.vertical();
                self.place(menu, left, top, old_w, height);
                if old_h != height {
                    if let Some(parent) = self.parent(menu) {
                        self.size_changed(parent);
                    }
                }
            }
        }
    }

    /// Re-applies line-height dependent padding to every menu item and re-measures every menu.
    pub(crate) fn refresh_menus(&mut self) {
        let line = self.metrics.line_height;
        let mut menus = Vec::new();
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            if self.tag(id) == Some(KindTag::Menu) {
                menus.push(id);
            }
            pending.extend(self.tree.children(id).iter().copied());
        }
        for &menu in &menus {
            for item in self.menu_items(menu) {
                if let Some(c) = self.control_mut(item) {
                    c.padding = Margins::new(line / 2, 0, line / 2, 0);
                }
            }
        }
        for menu in menus {
            self.posit_menu_items(menu);
        }
    }

    /// Opens a popup menu at `(x, y)` in its parent's client coordinates. The menu flips to the
    /// left of / above that point when it would leave the surface, then takes the focus and the
    /// mouse capture.
    pub fn popup_menu(&mut self, menu: ControlId, x: i32, y: i32) -> UiResult<()> {
        self.check_menu(menu)?;
        if !self.is_popup_menu(menu) {
            return Err(UiError::KindMismatch(menu));
        }
        self.open_popup(menu, x, y);
        Ok(())
    }

    fn open_popup(&mut self, menu: ControlId, x: i32, y: i32) {
        if self.is_shown(menu) {
            return;
        }
        let parent_item = self.menu_data(menu).and_then(|m| m.parent_item);
        let from_outside = parent_item.map(|pi| self.menu_item_data(pi).map(|i| i.is_button).unwrap_or(false)).unwrap_or(true);
        let focus_in_menu = self.routing.focused.map(|f| self.is_in_menu(f)).unwrap_or(false);
        if from_outside && !focus_in_menu {
            self.menu_return_focus = self.routing.focused;
        }
        self.raise(menu, UiEvent::Popup);
        self.posit_menu_items(menu);
        self.deselect_all(menu);
        let (w, h) = self.control(menu).map(|d| (d.width, d.height)).unwrap_or((0, 0));
        if let Some(d) = self.control_mut(menu) {
            d.left = x;
            d.top = y;
        }
        let abs = self.local_to_absolute(menu, 0, 0);
        let (mut left, mut top) = (x, y);
        if abs.x + w > self.width() {
            left -= w;
        }
        if abs.y + h > self.height() {
            top -= h;
        }
        if let Some(d) = self.control_mut(menu) {
            d.left = left;
            d.top = top;
            d.flags.insert(ControlFlags::VISIBLE);
        }
        if let Some(m) = self.menu_data_mut(menu) {
            m.cur_sub_menu = None;
            m.hover_armed = false;
        }
        self.popups.retain(|p| *p != menu);
        self.popups.push(menu);
        self.unregister_top_layer(menu);
        self.register_top_layer(menu);
        self.set_focused_control(Some(menu));
        self.set_capture(menu);
        debug!("popup {:?} opened at ({}, {})", menu, left, top);
    }

    /// Opens `sub` as the submenu of `menu`, closing the previously open submenu first.
    pub fn popup_sub_menu(&mut self, menu: ControlId, sub: ControlId, x: i32, y: i32) -> UiResult<()> {
        self.check_menu(menu)?;
        self.check_menu(sub)?;
        if !self.is_popup_menu(sub) {
            return Err(UiError::KindMismatch(sub));
        }
        self.open_sub_menu(menu, sub, x, y);
        Ok(())
    }

    fn open_sub_menu(&mut self, menu: ControlId, sub: ControlId, x: i32, y: i32) {
        let cur = self.menu_data(menu).and_then(|m| m.cur_sub_menu);
        if cur == Some(sub) && self.is_shown(sub) {
            return;
        }
        if cur.is_some() {
            self.close_sub_menu(menu);
        }
        let mnemonic = self.menu_data(menu).map(|m| m.mnemonic_visible).unwrap_or(false);
        self.show_mnemonic_key(sub, mnemonic);
        self.open_popup(sub, x, y);
        if let Some(m) = self.menu_data_mut(menu) {
            m.cur_sub_menu = Some(sub);
        }
    }

    /// Closes the open submenu of `menu`, if any. A popup `menu` takes the capture back.
    pub fn close_sub_menu(&mut self, menu: ControlId) {
        let Some(sub) = self.menu_data(menu).and_then(|m| m.cur_sub_menu) else { return };
        self.close_menu(sub);
        if let Some(m) = self.menu_data_mut(menu) {
            m.cur_sub_menu = None;
        }
        if self.is_popup_menu(menu) && self.is_shown(menu) {
            self.set_capture(menu);
        }
    }

    /// Hides a popup menu and its open submenus.
    ///
    /// Menus opened from outside the menu system (context menus and menu bar popups) give the
    /// focus back to the control that held it when they opened. Nested popups hand the focus to
    /// the menu that opened them, which also gets the capture back.
    pub fn close_menu(&mut self, menu: ControlId) {
        if !self.is_popup_menu(menu) || !self.is_shown(menu) {
            return;
        }
        if let Some(sub) = self.menu_data(menu).and_then(|m| m.cur_sub_menu) {
            self.close_menu(sub);
        }
        if let Some(d) = self.control_mut(menu) {
            d.flags.remove(ControlFlags::VISIBLE);
        }
        if let Some(m) = self.menu_data_mut(menu) {
            m.cur_sub_menu = None;
            m.hover_armed = false;
        }
        self.deselect_all(menu);
        self.popups.retain(|p| *p != menu);

        let parent_item = self.menu_data(menu).and_then(|m| m.parent_item).filter(|pi| self.tree.contains(*pi));
        let owner = self.owner_menu(menu);
        let button_parent = parent_item.and_then(|pi| self.menu_item_data(pi)).map(|i| i.is_button).unwrap_or(false);
        if let Some(m) = owner.and_then(|o| self.menu_data_mut(o)) {
            if m.cur_sub_menu == Some(menu) {
                m.cur_sub_menu = None;
            }
        }
        if let Some(pi) = parent_item.filter(|_| button_parent) {
            self.set_item_selected(pi, false);
        }
        if let Some(c) = self.routing.capture.filter(|c| self.tree.is_within(*c, menu)) {
            self.release_capture(c);
        }

        let focus_inside = self.routing.focused.map(|f| self.tree.is_within(f, menu)).unwrap_or(false);
        if parent_item.is_none() || button_parent {
            let back = self.menu_return_focus.take().filter(|f| self.tree.contains(*f));
            if back.is_some() {
                self.set_focused_control(back);
            } else if focus_inside {
                self.set_focused_control(None);
            }
            if let Some(bar) = owner {
                self.hide_menu_mnemonics(bar);
            }
        } else if focus_inside {
            self.set_focused_control(owner);
        }
        if let Some(o) = owner.filter(|o| self.is_popup_menu(*o) && self.is_shown(*o)) {
            self.set_capture(o);
        }
        self.raise(menu, UiEvent::MenuClosed);
        debug!("popup {:?} closed", menu);
    }

    /// Activates `item`: an item with a submenu opens it, any other item runs its command when
    /// `mouse_up` is set, closing the whole popup chain and raising [`UiEvent::Click`].
    pub(crate) fn menu_item_hit(&mut self, item: ControlId, mouse_up: bool) {
        let Some(menu) = self.parent(item).filter(|m| self.tag(*m) == Some(KindTag::Menu)) else { return };
        if !self.is_selectable(item) {
            return;
        }
        let is_button = self.menu_item_data(item).map(|i| i.is_button).unwrap_or(false);
        if let Some(sub) = self.live_sub_menu(item) {
            let Some(c) = self.control(item) else { return };
            let (x, y) = if is_button { (-c.padding.left, c.height - c.padding.vertical()) } else { (c.width - c.padding.left, -c.padding.top) };
            self.open_sub_menu(menu, sub, x, y);
            self.set_item_selected(item, true);
            return;
        }
        if mouse_up {
            self.item_selected(menu, item);
            self.raise(item, UiEvent::Click);
        }
    }

    /// Closes the menu chain above `menu` after `item` was chosen. Menu bars drop their selection
    /// and give the focus back.
    pub fn item_selected(&mut self, menu: ControlId, item: ControlId) {
        if let Some(owner) = self.owner_menu(menu) {
            self.item_selected(owner, item);
        }
        if self.is_popup_menu(menu) {
            self.close_menu(menu);
            return;
        }
        self.close_sub_menu(menu);
        self.deselect_all(menu);
        self.show_mnemonic_key(menu, false);
        if self.routing.focused.map(|f| self.tree.is_within(f, menu)).unwrap_or(false) {
            let back = self.menu_return_focus.take().filter(|f| self.tree.contains(*f));
            self.set_focused_control(back);
        }
    }

    /// Moves the selection of a menu bar to the neighboring item. An open submenu follows the
    /// selection.
    fn step_main_menu(&mut self, bar: ControlId, forward: bool) {
        let items = self.menu_items(bar);
        let cur = self.menu_data(bar).and_then(|m| m.cur_sub_menu);
        let open_index = cur.and_then(|c| items.iter().position(|i| self.menu_item_data(*i).and_then(|d| d.sub_menu) == Some(c)));
        let from = open_index.or_else(|| self.selected_index(&items));
        let Some(next) = self.step_selection(&items, from, forward) else { return };
        let item = items[next];
        self.close_sub_menu(bar);
        self.select_only(bar, item);
        match self.live_sub_menu(item) {
            Some(sub) if cur.is_some() => {
                self.menu_item_hit(item, false);
                self.select_first(sub);
            }
            _ => self.set_focused_control(Some(bar)),
        }
    }

    pub(crate) fn menu_key_down(&mut self, menu: ControlId, key: Key, shift: ShiftState) -> bool {
        if !self.control(menu).map(|d| d.is_interactive()).unwrap_or(false) {
            return false;
        }
        let Some(style) = self.menu_data(menu).map(|m| m.style) else { return false };
        if shift.contains(ShiftState::ALT) || key == Key::ALT {
            self.show_mnemonic_key(menu, true);
        }
        let items = self.menu_items(menu);
        if let Some(ch) = key.as_alphanumeric() {
            let hit = items.iter().copied().find(|i| self.is_selectable(*i) && self.menu_item_data(*i).and_then(|d| d.access_key) == Some(ch));
            if let Some(item) = hit {
                self.select_only(menu, item);
                self.menu_item_hit(item, true);
                if let Some(sub) = self.live_sub_menu(item) {
                    self.select_first(sub);
                }
                return true;
            }
        }
        let selected = self.selected_index(&items).map(|i| items[i]);
        match style {
            MenuStyle::Popup => {
                match key {
                    Key::UP | Key::DOWN => {
                        let from = self.selected_index(&items);
                        if let Some(next) = self.step_selection(&items, from, key == Key::DOWN) {
                            self.select_only(menu, items[next]);
                        }
                    }
                    Key::RIGHT => match selected.and_then(|s| self.live_sub_menu(s).map(|sub| (s, sub))) {
                        Some((item, sub)) => {
                            self.menu_item_hit(item, false);
                            self.select_first(sub);
                        }
                        None => {
                            let top = self.top_menu_of(menu);
                            if self.is_main_menu(top) {
                                self.step_main_menu(top, true);
                            }
                        }
                    },
                    Key::LEFT => match self.owner_menu(menu) {
                        Some(owner) if self.is_main_menu(owner) => self.step_main_menu(owner, false),
                        Some(owner) => self.close_sub_menu(owner),
                        None => (),
                    },
                    Key::ESCAPE => match self.owner_menu(menu) {
                        Some(owner) if self.is_main_menu(owner) => {
                            let parent_item = self.menu_data(menu).and_then(|m| m.parent_item);
                            self.close_sub_menu(owner);
                            if let Some(pi) = parent_item {
                                self.select_only(owner, pi);
                            }
                            self.set_focused_control(Some(owner));
                        }
                        Some(owner) => self.close_sub_menu(owner),
                        None => self.close_menu(menu),
                    },
                    Key::RETURN | Key::SPACE => {
                        if let Some(item) = selected {
                            self.menu_item_hit(item, true);
                            if let Some(sub) = self.live_sub_menu(item) {
                                self.select_first(sub);
                            }
                        }
                    }
                    _ => (),
                }
                true
            }
            MenuStyle::Main => {
                if self.routing.focused != Some(menu) {
                    return false;
                }
                match key {
                    Key::LEFT | Key::RIGHT => {
                        self.step_main_menu(menu, key == Key::RIGHT);
                        true
                    }
                    Key::DOWN | Key::RETURN | Key::SPACE => {
                        let Some(item) = selected else { return true };
                        if let Some(sub) = self.live_sub_menu(item) {
                            self.menu_item_hit(item, false);
                            self.select_first(sub);
                        } else if key != Key::DOWN {
                            self.menu_item_hit(item, true);
                        }
                        true
                    }
                    Key::ESCAPE => {
                        self.close_sub_menu(menu);
                        self.deselect_all(menu);
                        self.show_mnemonic_key(menu, false);
                        let back = self.menu_return_focus.take().filter(|f| self.tree.contains(*f));
                        self.set_focused_control(back);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// A lone Alt press-and-release moves the focus to the menu bar and selects its first item.
    pub(crate) fn menu_alt_released(&mut self, bar: ControlId) {
        let shown = self.menu_data(bar).map(|m| m.mnemonic_visible).unwrap_or(false);
        let focus_in = self.routing.focused.map(|f| self.is_in_menu(f)).unwrap_or(false);
        if shown && !focus_in && self.control(bar).map(|d| d.is_interactive()).unwrap_or(false) {
            self.set_focused_control(Some(bar));
            self.select_first(bar);
        }
    }

    pub(crate) fn menu_lost_focus(&mut self, menu: ControlId, new_focus: Option<ControlId>) {
        if !self.is_main_menu(menu) || new_focus.map(|n| self.is_in_menu(n)).unwrap_or(false) {
            return;
        }
        self.show_mnemonic_key(menu, false);
        if self.menu_data(menu).and_then(|m| m.cur_sub_menu).is_none() {
            self.deselect_all(menu);
        }
    }

    fn item_at(&self, menu: ControlId, x: i32, y: i32) -> Option<(ControlId, Rect)> {
        self.menu_items(menu).into_iter().filter_map(|i| self.control(i).filter(|d| d.is_visible()).map(|d| (i, d.bounds()))).find(|(_, b)| b.contains(x, y))
    }

    fn menu_contains(&self, menu: ControlId, x: i32, y: i32) -> bool { self.control(menu).map(|d| rect(0, 0, d.width, d.height).contains(x, y)).unwrap_or(false) }

    pub(crate) fn menu_mouse_down(&mut self, menu: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        if !self.control(menu).map(|d| d.is_interactive()).unwrap_or(false) {
            return false;
        }
        if !self.menu_contains(menu, x, y) {
            self.raise(menu, UiEvent::MouseDown(MouseArgs { x, y, delta: 0, shift }));
            if self.is_popup_menu(menu) {
                self.show_mnemonic_key(menu, false);
                self.close_menu(menu);
            }
            return false;
        }
        self.base_mouse_down(menu, x, y, shift);
        if let Some((item, b)) = self.item_at(menu, x, y) {
            self.menu_item_mouse_down(item, x - b.x, y - b.y, shift);
        }
        true
    }

    pub(crate) fn menu_mouse_up(&mut self, menu: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        if !self.control(menu).map(|d| d.is_interactive()).unwrap_or(false) {
            return false;
        }
        self.raise(menu, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
        let inside = self.menu_contains(menu, x, y);
        let popup = self.is_popup_menu(menu);
        if inside {
            if let Some((item, b)) = self.item_at(menu, x, y) {
                self.menu_item_mouse_up(item, x - b.x, y - b.y, shift);
            }
        } else if popup {
            let parent_item = self.menu_data(menu).and_then(|m| m.parent_item);
            if parent_item.is_none() || self.routing.pointed != parent_item {
                self.close_menu(menu);
            }
        }
        if popup && self.is_shown(menu) {
            self.set_capture(menu);
        }
        inside || popup
    }

    pub(crate) fn menu_mouse_move(&mut self, menu: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        self.base_mouse_move(menu, x, y, shift);
        if !self.control(menu).map(|d| d.is_interactive()).unwrap_or(false) {
            return false;
        }
        let Some(m) = self.menu_data(menu) else { return false };
        let (style, cur, parent_item) = (m.style, m.cur_sub_menu, m.parent_item);
        let inside = self.menu_contains(menu, x, y);
        if inside {
            for item in self.menu_items(menu) {
                let over = self.is_selectable(item) && self.control(item).map(|d| d.is_visible() && d.bounds().contains(x, y)).unwrap_or(false);
                self.set_item_selected(item, over);
            }
            if let Some(m) = self.menu_data_mut(menu) {
                m.hover_armed = true;
            }
            if let Some(pi) = parent_item {
                self.set_item_selected(pi, true);
            }
        } else {
            if let Some(m) = self.menu_data_mut(menu) {
                m.hover_armed = false;
            }
            if cur.is_none() {
                self.deselect_all(menu);
            }
        }
        if let (Some(cur), MenuStyle::Main, true) = (cur, style, inside) {
            if let Some(item) = self.selected_menu_item(menu) {
                let next = self.live_sub_menu(item);
                if next != Some(cur) {
                    self.close_sub_menu(menu);
                    self.set_item_selected(item, true);
                    if next.is_some() {
                        self.menu_item_hit(item, false);
                    }
                }
            }
        }
        let nested = self.parent(menu).map(|p| matches!(self.tag(p), Some(KindTag::Menu) | Some(KindTag::MenuItem))).unwrap_or(false);
        !nested
    }

    pub(crate) fn menu_mouse_hover(&mut self, menu: ControlId) -> bool {
        self.raise(menu, UiEvent::MouseHover);
        let armed = self.menu_data(menu).map(|m| m.hover_armed).unwrap_or(false);
        if !armed {
            return false;
        }
        if let Some(m) = self.menu_data_mut(menu) {
            m.hover_armed = false;
        }
        if let Some(item) = self.selected_menu_item(menu) {
            self.menu_item_hover(item);
        }
        false
    }

    /// Resting on a popup item opens its submenu, or closes the sibling's.
    fn menu_item_hover(&mut self, item: ControlId) {
        let Some(menu) = self.parent(item).filter(|m| self.tag(*m) == Some(KindTag::Menu)) else { return };
        if self.menu_item_data(item).map(|i| i.is_button).unwrap_or(true) || !self.is_selectable(item) {
            return;
        }
        match self.live_sub_menu(item) {
            Some(_) => self.menu_item_hit(item, false),
            None => self.close_sub_menu(menu),
        }
    }

    pub(crate) fn menu_item_mouse_down(&mut self, item: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        let Some(d) = self.control(item) else { return false };
        let inside = rect(0, 0, d.width, d.height).contains(x, y);
        self.raise(item, UiEvent::MouseDown(MouseArgs { x, y, delta: 0, shift }));
        if inside {
            self.menu_item_hit(item, false);
        }
        inside
    }

    pub(crate) fn menu_item_mouse_up(&mut self, item: ControlId, x: i32, y: i32, shift: ShiftState) -> bool {
        let Some(d) = self.control(item) else { return false };
        let inside = rect(0, 0, d.width, d.height).contains(x, y);
        self.raise(item, UiEvent::MouseUp(MouseArgs { x, y, delta: 0, shift }));
        if inside {
            self.menu_item_hit(item, true);
        }
        inside
    }

    pub(crate) fn menu_item_mouse_enter(&mut self, item: ControlId) {
        self.raise(item, UiEvent::MouseEnter);
        if !self.is_selectable(item) {
            return;
        }
        if let Some(menu) = self.parent(item).filter(|m| self.tag(*m) == Some(KindTag::Menu)) {
            self.select_only(menu, item);
        }
    }

    pub(crate) fn menu_item_mouse_leave(&mut self, item: ControlId) {
        self.raise(item, UiEvent::MouseLeave);
        let open = self.live_sub_menu(item).map(|s| self.is_shown(s)).unwrap_or(false);
        self.set_item_selected(item, open);
    }

    fn menu_text_options(mnemonic: bool) -> TextOptions {
        if mnemonic {
            TextOptions::SHOW_PREFIX
        } else {
            TextOptions::HIDE_PREFIX
        }
    }

    pub(crate) fn draw_menu_bar(&mut self, bar: ControlId) {
        self.draw_chrome(bar);
        let Some(d) = self.control(bar) else { return };
        let (abs, bar_font) = (d.abs, d.font);
        let options = Self::menu_text_options(self.menu_data(bar).map(|m| m.mnemonic_visible).unwrap_or(false));
        for item in self.menu_items(bar) {
            let Some(c) = self.control(item) else { continue };
            if !c.is_visible() {
                continue;
            }
            let r = rect(abs.x + c.left, abs.y + c.top, c.width, c.height);
            let (enabled, font) = (c.is_enabled(), c.font.or(bar_font));
            let Some(i) = self.menu_item_data(item) else { continue };
            let open = i.sub_menu.map(|s| self.is_shown(s)).unwrap_or(false);
            let (selected, text) = (i.selected, i.text.clone());
            if let Some(c) = self.control_mut(item) {
                c.abs = vec2(r.x, r.y);
            }
            let mut ctx = self.paint();
            if open {
                ctx.fill_rect(r, ctx.color(ThemeColor::ToolButtonPressed));
                ctx.draw_box(r, ctx.color(ThemeColor::ToolButtonBorderHighlight));
            } else if selected && enabled {
                ctx.fill_rect(r, ctx.color(ThemeColor::ToolButtonHighlight));
                ctx.draw_box(r, ctx.color(ThemeColor::ToolButtonBorderHighlight));
            }
            let fore = match (enabled, open || selected) {
                (false, _) => ctx.color(ThemeColor::MenuItemDisabledFore),
                (true, true) => ctx.color(ThemeColor::MenuItemHighlightFore),
                (true, false) => ctx.color(ThemeColor::MenuItemFore),
            };
            let font = ctx.resolve_font(font);
            ctx.draw_text_centered(font, &text, options, r, fore);
        }
    }

    /// Top-layer paint of a popup: icon column, border, then the items.
    pub(crate) fn draw_popup_menu(&mut self, menu: ControlId) {
        if !self.is_popup_menu(menu) || !self.is_shown(menu) {
            return;
        }
        let abs = self.local_to_absolute(menu, 0, 0);
        let Some(m) = self.menu_data(menu) else { return };
        let (item_h, mnemonic) = (m.item_height, m.mnemonic_visible);
        let Some(d) = self.control_mut(menu) else { return };
        d.abs = abs;
        let (w, h, pad, font) = (d.width, d.height, d.padding, d.font);
        self.draw_chrome(menu);
        let r = rect(abs.x, abs.y, w, h);
        {
            let mut ctx = self.paint();
            ctx.fill_rect(rect(abs.x + pad.left, abs.y + pad.top, item_h, h - pad.vertical()), ctx.color(ThemeColor::MenuIconBack));
            ctx.draw_box(r, ctx.color(ThemeColor::MenuBorder));
            ctx.push_clip(r);
        }
        let options = Self::menu_text_options(mnemonic);
        for item in self.menu_items(menu) {
            self.draw_popup_item(item, abs, item_h, options, font);
        }
        self.paint().pop_clip();
    }

    fn draw_popup_item(&mut self, item: ControlId, origin: Vec2i, item_h: i32, options: TextOptions, menu_font: Option<FontId>) {
        let Some(c) = self.control(item) else { return };
        if !c.is_visible() {
            return;
        }
        let r = rect(origin.x + c.left, origin.y + c.top, c.width, c.height);
        let (enabled, pad, font) = (c.is_enabled(), c.padding, c.font.or(menu_font));
        let has_sub = self.live_sub_menu(item).is_some();
        let Some(i) = self.menu_item_data(item) else { return };
        let open = i.sub_menu.map(|s| self.is_shown(s)).unwrap_or(false);
        let (separator, selected, checked) = (i.separator, i.selected, i.checked);
        let (text, shortcut) = (i.text.clone(), i.shortcut.clone());
        if let Some(c) = self.control_mut(item) {
            c.abs = vec2(r.x, r.y);
        }
        let heading = self.metrics.separator_heading;
        let mut ctx = self.paint();
        if separator {
            let y = r.y as f32 + r.h as f32 / 2.0;
            ctx.draw_line((r.x + item_h + heading) as f32, y, r.right() as f32, y, ctx.color(ThemeColor::MenuSeparator));
            return;
        }
        let highlighted = enabled && (selected || open);
        if highlighted {
            ctx.fill_rect(r, ctx.color(ThemeColor::ToolButtonHighlight));
            ctx.draw_box(r, ctx.color(ThemeColor::ToolButtonBorderHighlight));
        }
        let fore = match (enabled, highlighted) {
            (false, _) => ctx.color(ThemeColor::MenuItemDisabledFore),
            (true, true) => ctx.color(ThemeColor::MenuItemHighlightFore),
            (true, false) => ctx.color(ThemeColor::MenuItemFore),
        };
        let font = ctx.resolve_font(font);
        let size = ctx.measure_text(font, &text, options);
        let ty = r.y + (r.h - size.height) / 2;
        ctx.draw_text(font, &text, options, vec2(r.x + item_h + heading, ty), fore);
        let arrow_w = if has_sub { heading } else { 0 };
        if !shortcut.is_empty() {
            let sw = ctx.measure_text(font, &shortcut, TextOptions::NONE).width;
            ctx.draw_text(font, &shortcut, TextOptions::NONE, vec2(r.right() - pad.right - arrow_w - sw, ty), fore);
        }
        if has_sub {
            ctx.draw_arrow(rect(r.right() - pad.right - arrow_w, r.y, arrow_w, r.h), Arrow::Right, fore);
        }
        if checked {
            ctx.draw_check(rect(r.x, r.y, item_h, r.h).expand(-(item_h / 5)), fore);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UiEntry { UiEntry::new(640, 480, Box::new(MonospaceBackend::default())) }

    fn item(ui: &UiEntry, id: ControlId) -> &MenuItemData { ui.menu_item_data(id).unwrap() }

    fn cur_sub(ui: &UiEntry, menu: ControlId) -> Option<ControlId> { ui.menu_data(menu).unwrap().cur_sub_menu() }

    fn visible(ui: &UiEntry, id: ControlId) -> bool { ui.control(id).unwrap().is_visible() }

    fn press(ui: &mut UiEntry, x: i32, y: i32) {
        ui.do_mouse_move(x, y, ShiftState::NONE);
        ui.do_mouse_down(x, y, ShiftState::LEFT_BUTTON);
    }

    fn click(ui: &mut UiEntry, x: i32, y: i32) {
        press(ui, x, y);
        ui.do_mouse_up(x, y, ShiftState::NONE);
    }

    struct Bar {
        bar: ControlId,
        file: ControlId,
        edit: ControlId,
        open: ControlId,
        exit: ControlId,
        copy: ControlId,
    }

    fn menu_bar(ui: &mut UiEntry) -> Bar {
        let root = ui.root();
        let bar = ui.add_menu(root, MenuStyle::Main).unwrap();
        let file = ui.add_menu_item(bar, "&File", "").unwrap();
        let edit = ui.add_menu_item(bar, "&Edit", "").unwrap();
        let open = ui.add_sub_item(file, "&Open", "Ctrl+O").unwrap();
        let exit = ui.add_sub_item(file, "E&xit", "").unwrap();
        let copy = ui.add_sub_item(edit, "&Copy", "").unwrap();
        Bar { bar, file, edit, open, exit, copy }
    }

    #[test]
    fn item_lookup_checks_bounds_and_kind() {
        let mut ui = entry();
        let root = ui.root();
        let menu = ui.add_menu(root, MenuStyle::Popup).unwrap();
        let cut = ui.add_menu_item(menu, "&Cut", "").unwrap();
        ui.add_menu_separator(menu).unwrap();
        assert_eq!(ui.menu_item(menu, 0), Ok(cut));
        assert_eq!(ui.menu_item_count(menu), Ok(2));
        assert_eq!(ui.menu_item(menu, 5), Err(UiError::IndexOutOfRange { index: 5, len: 2 }));
        assert_eq!(ui.menu_item(cut, 0), Err(UiError::NotAMenu(cut)));
        assert_eq!(ui.sub_menu(menu), Err(UiError::NotAMenuItem(menu)));
        assert_eq!(ui.popup_menu(root, 0, 0), Err(UiError::NotAMenu(root)));
    }

    #[test]
    fn popup_items_stack_with_short_separators() {
        let mut ui = entry();
        let root = ui.root();
        let menu = ui.add_menu(root, MenuStyle::Popup).unwrap();
        let cut = ui.add_menu_item(menu, "Cu&t", "Ctrl+X").unwrap();
        let sep = ui.add_menu_separator(menu).unwrap();
        let paste = ui.add_menu_item(menu, "&Paste", "").unwrap();
        assert_eq!(ui.control(cut).unwrap().bounds(), rect(2, 2, 136, 24));
        assert_eq!(ui.control(sep).unwrap().bounds(), rect(2, 26, 136, 6));
        assert_eq!(ui.control(paste).unwrap().bounds(), rect(2, 32, 136, 24));
        let d = ui.control(menu).unwrap();
        assert_eq!((d.width, d.height), (140, 58));
        assert_eq!(item(&ui, cut).access_key(), Some('T'));
        assert!(item(&ui, sep).is_separator());
    }

    #[test]
    fn menu_bar_docks_and_lays_out_horizontally() {
        let mut ui = entry();
        let m = menu_bar(&mut ui);
        assert_eq!(ui.main_menu(), Some(m.bar));
        assert_eq!(ui.control(m.bar).unwrap().bounds(), rect(0, 0, 640, 20));
        assert_eq!(ui.control(m.file).unwrap().bounds(), rect(0, 0, 56, 20));
        assert_eq!(ui.control(m.edit).unwrap().bounds(), rect(56, 0, 56, 20));
        assert_eq!(ui.client_rect(ui.root()), rect(0, 20, 640, 460));
        assert!(item(&ui, m.file).is_button());
    }

    #[test]
    fn popup_flips_at_the_surface_edge() {
        let mut ui = entry();
        let root = ui.root();
        let menu = ui.add_menu(root, MenuStyle::Popup).unwrap();
        ui.add_menu_item(menu, "&Cut", "").unwrap();
        ui.add_menu_item(menu, "&Copy", "").unwrap();
        ui.popup_menu(menu, 600, 450).unwrap();
        let d = ui.control(menu).unwrap();
        assert_eq!(d.bounds(), rect(516, 398, 84, 52));
        assert!(d.is_visible());
        assert_eq!(ui.popups(), &[menu]);
        assert_eq!(ui.capture(), Some(menu));
        assert_eq!(ui.focused(), Some(menu));
    }

    #[test]
    fn clicking_outside_closes_and_restores_focus() {
        let mut ui = entry();
        let root = ui.root();
        let b = ui.add_button(root, "Go").unwrap();
        ui.posit(b, 300, 300, 60, 24).unwrap();
        ui.set_focused_control(Some(b));
        let menu = ui.add_menu(root, MenuStyle::Popup).unwrap();
        ui.add_menu_item(menu, "&Cut", "").unwrap();
        ui.popup_menu(menu, 100, 100).unwrap();
        ui.take_events();
        press(&mut ui, 20, 20);
        assert!(!visible(&ui, menu));
        assert!(ui.popups().is_empty());
        assert_eq!(ui.capture(), None);
        assert_eq!(ui.focused(), Some(b));
        assert!(ui.take_events().contains(&(menu, UiEvent::MenuClosed)));
    }

    #[test]
    fn menu_bar_click_opens_and_hover_switches_submenus() {
        let mut ui = entry();
        let m = menu_bar(&mut ui);
        let file_sub = item(&ui, m.file).sub_menu().unwrap();
        let edit_sub = item(&ui, m.edit).sub_menu().unwrap();

        click(&mut ui, 10, 10);
        assert_eq!(cur_sub(&ui, m.bar), Some(file_sub));
        assert_eq!(ui.absolute_bounds(file_sub), rect(0, 20, 148, 52));
        assert_eq!(ui.capture(), Some(file_sub));

        ui.do_mouse_move(70, 10, ShiftState::NONE);
        assert_eq!(cur_sub(&ui, m.bar), Some(edit_sub));
        assert!(!visible(&ui, file_sub));
        assert_eq!(ui.popups(), &[edit_sub]);
        assert_eq!(ui.capture(), Some(edit_sub));
        assert_eq!(ui.absolute_bounds(edit_sub).x, 56);

        ui.take_events();
        click(&mut ui, 66, 30);
        assert!(ui.take_events().contains(&(m.copy, UiEvent::Click)));
        assert!(ui.popups().is_empty());
        assert_eq!(ui.capture(), None);
        assert_eq!(cur_sub(&ui, m.bar), None);
    }

    #[test]
    fn access_key_then_arrows_run_a_command() {
        let mut ui = entry();
        let root = ui.root();
        let m = menu_bar(&mut ui);
        let b = ui.add_button(root, "Go").unwrap();
        ui.set_focused_control(Some(b));
        let file_sub = item(&ui, m.file).sub_menu().unwrap();

        assert!(ui.do_key_down(Key::from_char('f'), ShiftState::ALT));
        assert_eq!(ui.focused(), Some(file_sub));
        assert!(item(&ui, m.open).is_selected());
        assert!(ui.menu_data(m.bar).unwrap().mnemonic_visible());

        ui.do_key_down(Key::DOWN, ShiftState::NONE);
        assert!(item(&ui, m.exit).is_selected());
        assert!(!item(&ui, m.open).is_selected());

        ui.take_events();
        ui.do_key_down(Key::RETURN, ShiftState::NONE);
        assert!(ui.take_events().contains(&(m.exit, UiEvent::Click)));
        assert!(!visible(&ui, file_sub));
        assert_eq!(ui.focused(), Some(b));
        assert!(!ui.menu_data(m.bar).unwrap().mnemonic_visible());
    }

    #[test]
    fn escape_steps_back_to_the_bar_then_out() {
        let mut ui = entry();
        let root = ui.root();
        let m = menu_bar(&mut ui);
        let b = ui.add_button(root, "Go").unwrap();
        ui.set_focused_control(Some(b));
        ui.do_key_down(Key::from_char('F'), ShiftState::ALT);

        ui.do_key_down(Key::ESCAPE, ShiftState::NONE);
        assert!(ui.popups().is_empty());
        assert_eq!(ui.focused(), Some(m.bar));
        assert!(item(&ui, m.file).is_selected());

        ui.do_key_down(Key::ESCAPE, ShiftState::NONE);
        assert_eq!(ui.focused(), Some(b));
        assert!(!item(&ui, m.file).is_selected());
    }

    #[test]
    fn lone_alt_focuses_the_bar() {
        let mut ui = entry();
        let root = ui.root();
        let m = menu_bar(&mut ui);
        let b = ui.add_button(root, "Go").unwrap();
        ui.set_focused_control(Some(b));
        ui.do_key_down(Key::ALT, ShiftState::ALT);
        ui.do_key_up(Key::ALT, ShiftState::NONE);
        assert_eq!(ui.focused(), Some(m.bar));
        assert!(item(&ui, m.file).is_selected());

        ui.do_key_down(Key::RIGHT, ShiftState::NONE);
        assert!(item(&ui, m.edit).is_selected());
        ui.do_key_down(Key::DOWN, ShiftState::NONE);
        let edit_sub = item(&ui, m.edit).sub_menu().unwrap();
        assert_eq!(ui.focused(), Some(edit_sub));
        assert!(item(&ui, m.copy).is_selected());
    }

    #[test]
    fn alt_chord_for_other_keys_does_not_steal_focus() {
        let mut ui = entry();
        let root = ui.root();
        menu_bar(&mut ui);
        let b = ui.add_button(root, "Go").unwrap();
        ui.set_focused_control(Some(b));
        ui.do_key_down(Key::ALT, ShiftState::ALT);
        ui.do_key_down(Key::LEFT, ShiftState::ALT);
        ui.do_key_up(Key::ALT, ShiftState::NONE);
        assert_eq!(ui.focused(), Some(b));
    }

    #[test]
    fn hover_opens_nested_submenu_and_escape_closes_it() {
        let mut ui = entry();
        let root = ui.root();
        let menu = ui.add_menu(root, MenuStyle::Popup).unwrap();
        let more = ui.add_menu_item(menu, "&More", "").unwrap();
        ui.add_sub_item(more, "&Alpha", "").unwrap();
        let sub = item(&ui, more).sub_menu().unwrap();
        assert_eq!(ui.control(more).unwrap().width, 88);
        ui.popup_menu(menu, 100, 100).unwrap();

        ui.do_mouse_move(112, 112, ShiftState::NONE);
        assert!(item(&ui, more).is_selected());
        ui.do_mouse_hover();
        assert_eq!(cur_sub(&ui, menu), Some(sub));
        let b = ui.absolute_bounds(sub);
        assert_eq!((b.x, b.y), (190, 102));
        assert_eq!(ui.capture(), Some(sub));
        assert_eq!(ui.focused(), Some(sub));

        ui.do_key_down(Key::ESCAPE, ShiftState::NONE);
        assert!(!visible(&ui, sub));
        assert!(visible(&ui, menu));
        assert_eq!(ui.focused(), Some(menu));
        assert_eq!(ui.capture(), Some(menu));
    }

    #[test]
    fn mouse_up_inside_the_opening_item_keeps_the_popup() {
        let mut ui = entry();
        let m = menu_bar(&mut ui);
        let file_sub = item(&ui, m.file).sub_menu().unwrap();
        press(&mut ui, 10, 10);
        ui.do_mouse_up(12, 10, ShiftState::NONE);
        assert!(visible(&ui, file_sub));
        assert_eq!(ui.capture(), Some(file_sub));
    }

    #[test]
    fn open_popup_is_drawn_in_the_top_layer() {
        let mut ui = entry();
        let root = ui.root();
        let menu = ui.add_menu(root, MenuStyle::Popup).unwrap();
        ui.add_menu_item(menu, "&Cut", "").unwrap();
        ui.add_menu_item(menu, "&Copy", "").unwrap();
        ui.popup_menu(menu, 100, 100).unwrap();
        let back = ui.theme().color(ThemeColor::MenuBack);
        let cmds = ui.draw_ui().to_vec();
        let at = cmds.iter().position(|c| *c == DrawCommand::SolidQuad { rect: rect(100, 100, 84, 52), color: back }).unwrap();
        assert!(cmds[..at].iter().any(|c| matches!(c, DrawCommand::ShadowQuad { .. })));
        assert!(cmds[at..].iter().any(|c| matches!(c, DrawCommand::TextQuad { .. })));
    }
}
