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
use log::trace;
use std::collections::HashSet;

impl UiEntry {
    /// A control the Tab walk may enter: visible, enabled, and not a separate focus scope.
    fn is_walkable(&self, id: ControlId) -> bool {
        self.control(id).map(|d| d.is_interactive()).unwrap_or(false) && self.tag(id) != Some(KindTag::Form) && !self.is_popup_menu(id)
    }

    fn is_tab_target(&self, id: ControlId) -> bool { self.control(id).map(|d| d.is_interactive() && d.is_tab_stop()).unwrap_or(false) }

    /// Nearest form containing `id` (itself included).
    pub fn form_of(&self, id: ControlId) -> Option<ControlId> { self.tree.ancestry(id).into_iter().find(|a| self.tag(*a) == Some(KindTag::Form)) }

    /// Forms and the root bound Tab navigation.
    fn focus_scope(&self, id: ControlId) -> ControlId { self.form_of(id).unwrap_or(self.root) }

    fn first_tab_target_in(&self, id: ControlId, visited: &mut HashSet<ControlId>) -> Option<ControlId> {
        if !visited.insert(id) {
            return None;
        }
        for &child in self.tree.children(id) {
            if !self.is_walkable(child) {
                continue;
            }
            if self.is_tab_target(child) {
                return Some(child);
            }
            if let Some(found) = self.first_tab_target_in(child, visited) {
                return Some(found);
            }
        }
        None
    }

    /// Next Tab target after `ctrl` in depth-first order: its own subtree first, then later
    /// siblings, then the later siblings of each ancestor. The walk stops at the enclosing form
    /// (or the root) and returns `None` when it runs off the end.
    pub fn find_next_focus(&self, ctrl: ControlId) -> Option<ControlId> {
        let mut visited = HashSet::new();
        if let Some(found) = self.first_tab_target_in(ctrl, &mut visited) {
            return Some(found);
        }
        let mut cur = ctrl;
        loop {
            if self.tag(cur) == Some(KindTag::Form) {
                return None;
            }
            let parent = self.tree.parent(cur)?;
            let siblings = self.tree.children(parent);
            let index = siblings.iter().position(|s| *s == cur)?;
            for &sib in &siblings[index + 1..] {
                if !self.is_walkable(sib) {
                    continue;
                }
                if self.is_tab_target(sib) {
                    return Some(sib);
                }
                if let Some(found) = self.first_tab_target_in(sib, &mut visited) {
                    return Some(found);
                }
            }
            cur = parent;
        }
    }

    /// Last walkable leaf under `id`, descending into the last eligible child at each level. A
    /// container without eligible children is its own last leaf.
    pub fn last_leaf(&self, id: ControlId) -> ControlId {
        let mut visited = HashSet::new();
        let mut cur = id;
        while visited.insert(cur) {
            match self.tree.children(cur).iter().rev().find(|c| self.is_walkable(**c)) {
                Some(&child) => cur = child,
                None => break,
            }
        }
        cur
    }

    fn last_tab_target_in(&self, id: ControlId, visited: &mut HashSet<ControlId>) -> Option<ControlId> {
        if !visited.insert(id) {
            return None;
        }
        for &child in self.tree.children(id).iter().rev() {
            if !self.is_walkable(child) {
                continue;
            }
            if let Some(found) = self.last_tab_target_in(child, visited) {
                return Some(found);
            }
        }
        if self.is_tab_target(id) { Some(id) } else { None }
    }

    /// Previous Tab target before `ctrl`, the exact reverse of [`UiEntry::find_next_focus`].
    pub fn find_previous_focus(&self, ctrl: ControlId) -> Option<ControlId> {
        let mut visited = HashSet::new();
        let mut cur = ctrl;
        loop {
            if self.tag(cur) == Some(KindTag::Form) {
                return None;
            }
            let parent = self.tree.parent(cur)?;
            let siblings = self.tree.children(parent);
            let index = siblings.iter().position(|s| *s == cur)?;
            for &sib in siblings[..index].iter().rev() {
                if !self.is_walkable(sib) {
                    continue;
                }
                if let Some(found) = self.last_tab_target_in(sib, &mut visited) {
                    return Some(found);
                }
            }
            if parent != self.root && self.tag(parent) != Some(KindTag::Form) && self.is_tab_target(parent) {
                return Some(parent);
            }
            cur = parent;
        }
    }

    fn focus_start(&self) -> (ControlId, Option<ControlId>) {
        let focused = self.routing.focused.filter(|f| self.tree.contains(*f));
        let scope = match (focused, self.active_form) {
            (Some(f), _) => self.focus_scope(f),
            (None, Some(form)) if self.tree.contains(form) => form,
            _ => self.root,
        };
        (scope, focused)
    }

    /// Tab: focuses the next target, wrapping to the first target of the focus scope.
    pub fn move_focus_forward(&mut self) {
        let (scope, focused) = self.focus_start();
        let next = focused.and_then(|f| self.find_next_focus(f)).or_else(|| self.find_next_focus(scope));
        if next.is_some() {
            self.set_focused_control(next);
        }
    }

    /// Shift+Tab: focuses the previous target, wrapping to the last target of the focus scope.
    pub fn move_focus_backward(&mut self) {
        let (scope, focused) = self.focus_start();
        let prev = focused.and_then(|f| self.find_previous_focus(f)).or_else(|| {
            let leaf = self.last_leaf(scope);
            if leaf != scope && self.is_tab_target(leaf) { Some(leaf) } else { self.find_previous_focus(leaf) }
        });
        if prev.is_some() {
            self.set_focused_control(prev);
        }
    }

    /// Focuses `id`, or its nearest ancestor that accepts focus.
    pub fn set_focus(&mut self, id: ControlId) {
        let target = self.tree.ancestry(id).into_iter().find(|a| self.control(*a).map(|d| d.accepts_focus() && d.is_interactive()).unwrap_or(false));
        if target.is_some() {
            self.set_focused_control(target);
        }
    }

    /// Removes the focus from `id` if it holds it.
    pub fn kill_focus(&mut self, id: ControlId) {
        if self.routing.focused == Some(id) {
            self.set_focused_control(None);
        }
    }

    /// Moves the keyboard focus to `target`, or to its nearest ancestor that accepts focus. The
    /// previous holder gets [`UiEvent::LostFocus`], the IME receiver follows the focus, and the
    /// form owning the new focus is brought forward and activated.
    pub fn set_focused_control(&mut self, target: Option<ControlId>) {
        let target = target.and_then(|t| self.tree.ancestry(t).into_iter().find(|a| self.control(*a).map(|d| d.accepts_focus()).unwrap_or(false)));
        let old = self.routing.focused.filter(|f| self.tree.contains(*f));
        if old == target {
            return;
        }
        if let Some(t) = target {
            let entering_menu_bar = self.is_main_menu(t);
            let from_menu = old.map(|o| self.is_in_menu(o)).unwrap_or(false);
            if entering_menu_bar && !from_menu {
                self.menu_return_focus = old;
            }
        }
        trace!("focus {:?} -> {:?}", old, target);
        self.routing.focused = target;
        if let Some(old) = old {
            self.control_lost_focus(old, target);
        }
        self.ime.receiver = target.filter(|t| self.control(*t).map(|d| d.flags.contains(ControlFlags::IME_RECEIVER)).unwrap_or(false));
        if let Some(form) = target.and_then(|t| self.form_of(t)) {
            self.show_window(form);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UiEntry { UiEntry::new(640, 480, Box::new(MonospaceBackend::default())) }

    fn stop(ui: &mut UiEntry, parent: ControlId) -> ControlId {
        let id = ui.add_control(parent, ControlKind::Plain).unwrap();
        ui.posit(id, 0, 0, 10, 10).unwrap();
        ui.set_flags(id, ControlFlags::TAB_STOP, true).unwrap();
        id
    }

    #[test]
    fn tab_order_is_depth_first() {
        let mut ui = entry();
        let root = ui.root();
        let a = stop(&mut ui, root);
        let group = ui.add_container(ui.root()).unwrap();
        let b = stop(&mut ui, group);
        let c = stop(&mut ui, group);
        let d = stop(&mut ui, root);

        assert_eq!(ui.find_next_focus(a), Some(b));
        assert_eq!(ui.find_next_focus(b), Some(c));
        assert_eq!(ui.find_next_focus(c), Some(d));
        assert_eq!(ui.find_next_focus(d), None);
        assert_eq!(ui.find_previous_focus(d), Some(c));
        assert_eq!(ui.find_previous_focus(b), Some(a));
        assert_eq!(ui.find_previous_focus(a), None);
        for x in [b, c, d] {
            assert_eq!(ui.find_next_focus(ui.find_previous_focus(x).unwrap()), Some(x));
        }
    }

    #[test]
    fn tab_skips_disabled_and_hidden_controls() {
        let mut ui = entry();
        let root = ui.root();
        let a = stop(&mut ui, root);
        let disabled = stop(&mut ui, root);
        let hidden = stop(&mut ui, root);
        let b = stop(&mut ui, root);
        ui.set_enabled(disabled, false).unwrap();
        ui.set_visible(hidden, false).unwrap();
        ui.set_focused_control(Some(a));
        ui.do_key_down(Key::TAB, ShiftState::NONE);
        assert_eq!(ui.focused(), Some(b));
        ui.do_key_down(Key::TAB, ShiftState::NONE);
        assert_eq!(ui.focused(), Some(a));
        ui.do_key_down(Key::TAB, ShiftState::SHIFT);
        assert_eq!(ui.focused(), Some(b));
    }

    #[test]
    fn tab_stop_container_precedes_its_children() {
        let mut ui = entry();
        let root = ui.root();
        let group = ui.add_container(ui.root()).unwrap();
        ui.set_flags(group, ControlFlags::TAB_STOP | ControlFlags::ACCEPTS_FOCUS, true).unwrap();
        let inner = stop(&mut ui, group);
        let after = stop(&mut ui, root);
        assert_eq!(ui.find_next_focus(group), Some(inner));
        assert_eq!(ui.find_previous_focus(inner), Some(group));
        assert_eq!(ui.find_previous_focus(after), Some(inner));
    }

    #[test]
    fn last_leaf_descends_into_last_eligible_child() {
        let mut ui = entry();
        let group = ui.add_container(ui.root()).unwrap();
        let x = stop(&mut ui, group);
        let hidden = stop(&mut ui, group);
        ui.set_visible(hidden, false).unwrap();
        assert_eq!(ui.last_leaf(ui.root()), x);
        let empty = ui.add_container(ui.root()).unwrap();
        assert_eq!(ui.last_leaf(ui.root()), empty);
    }

    #[test]
    fn focus_change_notifies_the_old_holder() {
        let mut ui = entry();
        let root = ui.root();
        let a = stop(&mut ui, root);
        let b = stop(&mut ui, root);
        ui.set_focused_control(Some(a));
        ui.take_events();
        ui.set_focused_control(Some(b));
        assert_eq!(ui.take_events(), vec![(a, UiEvent::LostFocus { new_focus: Some(b) })]);
        ui.kill_focus(b);
        assert_eq!(ui.focused(), None);
    }

    #[test]
    fn set_focus_walks_up_to_a_focusable_ancestor() {
        let mut ui = entry();
        let group = ui.add_container(ui.root()).unwrap();
        ui.set_flags(group, ControlFlags::ACCEPTS_FOCUS, true).unwrap();
        let label = ui.add_label(group, "text").unwrap();
        ui.set_focus(label);
        assert_eq!(ui.focused(), Some(group));
    }

    #[test]
    fn focused_control_always_accepts_focus() {
        let mut ui = entry();
        let root = ui.root();
        let group = ui.add_container(root).unwrap();
        ui.set_flags(group, ControlFlags::ACCEPTS_FOCUS, true).unwrap();
        let label = ui.add_label(group, "text").unwrap();
        ui.set_focused_control(Some(label));
        assert_eq!(ui.focused(), Some(group));

        let loose = ui.add_label(root, "loose").unwrap();
        ui.set_focused_control(Some(loose));
        assert_eq!(ui.focused(), None);
    }
}
