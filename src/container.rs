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

#[derive(Clone, Debug, Default)]
/// Child-owning part of a control: the layout mode and the client rectangle computed by the last
/// arrangement.
pub struct ContainerData {
    /// Placement of `DockStyle::None` children.
    pub layout: LayoutMode,
    pub(crate) client_rect: Rect,
}

impl ContainerData {
    /// Container using the given layout mode.
    pub fn with_layout(layout: LayoutMode) -> Self { Self { layout, client_rect: Rect::default() } }

    /// Area left for `None`/`Fill` children after padding and docked strips, relative to the
    /// container's raw origin.
    pub fn client_rect(&self) -> Rect { self.client_rect }
}

impl UiEntry {
    /// Creates a plain container under `parent`.
    pub fn add_container(&mut self, parent: ControlId) -> UiResult<ControlId> {
        let mut data = ControlData::new(&self.theme);
        data.border_style = BorderStyle::None;
        data.back_color = Color::default();
        data.flags.remove(ControlFlags::ACCEPTS_FOCUS);
        self.insert_control(parent, data, ControlKind::Container(ContainerData::default()))
    }

    /// Changes the layout mode of a container and re-arranges it.
    pub fn set_layout(&mut self, id: ControlId, layout: LayoutMode) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::InvalidControl(id))?;
        let container = node.kind.container_mut().ok_or(UiError::NotAContainer(id))?;
        container.layout = layout;
        self.size_changed(id);
        Ok(())
    }

    /// Client rectangle of `id` relative to its raw origin. Leaves report their full bounds.
    pub fn client_rect(&self, id: ControlId) -> Rect {
        match self.tree.get(id) {
            Some(node) => match node.kind.container() {
                Some(c) => c.client_rect,
                None => rect(0, 0, node.data.width, node.data.height),
            },
            None => Rect::default(),
        }
    }

    /// Moves and resizes a control, then re-runs its layout and, when the placement of the control
    /// depends on its parent's layout, the parent's layout too.
    pub fn posit(&mut self, id: ControlId, left: i32, top: i32, width: i32, height: i32) -> UiResult<()> {
        if !self.tree.contains(id) {
            return Err(UiError::InvalidControl(id));
        }
        self.place(id, left, top, width, height);
        if let Some(parent) = self.tree.parent(id) {
            if self.placement_depends_on_parent(id, parent) {
                self.size_changed(parent);
            }
        }
        Ok(())
    }

    /// Moves a control without changing its size.
    pub fn set_position(&mut self, id: ControlId, left: i32, top: i32) -> UiResult<()> {
        let (w, h) = self.control(id).map(|d| (d.width, d.height)).ok_or(UiError::InvalidControl(id))?;
        self.posit(id, left, top, w, h)
    }

    /// Resizes a control without moving it.
    pub fn set_size(&mut self, id: ControlId, width: i32, height: i32) -> UiResult<()> {
        let (l, t) = self.control(id).map(|d| (d.left, d.top)).ok_or(UiError::InvalidControl(id))?;
        self.posit(id, l, t, width, height)
    }

    fn placement_depends_on_parent(&self, id: ControlId, parent: ControlId) -> bool {
        let docked = self.control(id).map(|d| d.dock != DockStyle::None).unwrap_or(false);
        match self.tree.get(parent) {
            Some(p) => {
                let auto = p.data.flags.intersects(ControlFlags::AUTO_WIDTH | ControlFlags::AUTO_HEIGHT);
                let flowing = p.kind.container().map(|c| c.layout != LayoutMode::None).unwrap_or(false);
                let menu = p.kind.tag() == KindTag::Menu;
                !menu && (docked || auto || flowing)
            }
            None => false,
        }
    }

    /// Sets the geometry and runs `size_changed` when the size actually changed. Layout code uses
    /// this so arranging a child never re-arranges the parent.
    pub(crate) fn place(&mut self, id: ControlId, left: i32, top: i32, width: i32, height: i32) {
        let Some(node) = self.tree.get_mut(id) else { return };
        let d = &mut node.data;
        let resized = d.width != width || d.height != height;
        d.left = left;
        d.top = top;
        d.width = width;
        d.height = height;
        if resized || node.kind.is_container() {
            self.size_changed(id);
        }
    }

    /// Recomputes the layout that depends on the size of `id` and raises [`UiEvent::Resize`].
    pub fn size_changed(&mut self, id: ControlId) {
        let Some(node) = self.tree.get(id) else { return };
        let (w, h) = (node.data.width, node.data.height);
        let tag = node.kind.tag();
        let is_container = node.kind.is_container();
        if id == self.root {
            self.clips.set_window_size(w, h);
            self.arrange_controls(id, rect(0, 0, w, h));
            self.clamp_forms();
        } else {
            match tag {
                KindTag::Form => {
                    let title = self.metrics.title_height();
                    self.arrange_controls(id, rect(1, 1 + title, w - 2, h - 2 - title));
                }
                KindTag::Menu => {
                    if let Some(c) = self.tree.get_mut(id).and_then(|n| n.kind.container_mut()) {
                        c.client_rect = rect(0, 0, w, h);
                    }
                }
                _ if is_container => self.arrange_controls(id, rect(0, 0, w, h)),
                _ => (),
            }
        }
        self.raise(id, UiEvent::Resize { width: w, height: h });
    }

    /// Lays out the children of `id` inside `init` (relative to the raw origin of `id`): docked
    /// strips are carved off in child order, `Fill` children take what remains, `None` children
    /// are placed by the layout mode, and auto-sizing is applied last.
    pub(crate) fn arrange_controls(&mut self, id: ControlId, init: Rect) {
        let Some(node) = self.tree.get(id) else { return };
        let Some(layout) = node.kind.container().map(|c| c.layout) else { return };
        let padding = node.data.padding;
        let flags = node.data.flags;
        let children = node.children.clone();

        let mut client = init.shrink(&padding);
        for &child in &children {
            let Some(c) = self.control(child) else { continue };
            if !c.is_visible() {
                continue;
            }
            let (cw, ch) = (c.width, c.height);
            match c.dock {
                DockStyle::Top => {
                    self.place(child, client.x, client.y, client.w, ch);
                    client.y += ch;
                    client.h -= ch;
                }
                DockStyle::Bottom => {
                    self.place(child, client.x, client.y + client.h - ch, client.w, ch);
                    client.h -= ch;
                }
                DockStyle::Left => {
                    self.place(child, client.x, client.y, cw, client.h);
                    client.x += cw;
                    client.w -= cw;
                }
                DockStyle::Right => {
                    self.place(child, client.x + client.w - cw, client.y, cw, client.h);
                    client.w -= cw;
                }
                _ => (),
            }
        }
        client.w = client.w.max(0);
        client.h = client.h.max(0);
        if let Some(c) = self.tree.get_mut(id).and_then(|n| n.kind.container_mut()) {
            c.client_rect = client;
        }

        for &child in &children {
            if self.control(child).map(|c| c.is_visible() && c.dock == DockStyle::Fill).unwrap_or(false) {
                self.place(child, 0, 0, client.w, client.h);
            }
        }

        if layout != LayoutMode::None {
            self.flow_children(&children, layout, client);
        }

        if flags.intersects(ControlFlags::AUTO_WIDTH | ControlFlags::AUTO_HEIGHT) {
            self.auto_size(id, &children, client, padding, flags);
        }
    }

    fn flow_children(&mut self, children: &[ControlId], layout: LayoutMode, client: Rect) {
        let (mut x, mut y, mut row_height) = (0, 0, 0);
        for &child in children {
            let Some(c) = self.control(child) else { continue };
            if !c.is_visible() || c.dock != DockStyle::None || self.skipped_by_layout(child) {
                continue;
            }
            let m = c.margin;
            let width = if layout == LayoutMode::Stack { (client.w - m.horizontal()).max(0) } else { c.width };
            let height = c.height;
            if layout == LayoutMode::Stack || (x > 0 && x + width + m.left > client.w) {
                x = 0;
                y += row_height;
                row_height = 0;
            }
            self.place(child, x + m.left, y + m.top, width, height);
            x += width + m.horizontal();
            row_height = row_height.max(height + m.vertical());
        }
    }

    fn auto_size(&mut self, id: ControlId, children: &[ControlId], client: Rect, padding: Margins, flags: ControlFlags) {
        let (mut max_w, mut max_h) = (0, 0);
        for &child in children {
            let Some(c) = self.control(child) else { continue };
            if !c.is_visible() || self.skipped_by_layout(child) {
                continue;
            }
            let mut cw = c.left + c.width + c.margin.right;
            let mut ch = c.top + c.height + c.margin.bottom;
            match c.dock {
                DockStyle::Left | DockStyle::Right => ch -= client.y,
                DockStyle::Top | DockStyle::Bottom => cw -= client.x,
                _ => (),
            }
            max_w = max_w.max(cw);
            max_h = max_h.max(ch);
        }
        if let Some(d) = self.control_mut(id) {
            if flags.contains(ControlFlags::AUTO_WIDTH) {
                d.width = max_w + padding.horizontal();
            }
            if flags.contains(ControlFlags::AUTO_HEIGHT) {
                d.height = max_h + padding.vertical();
            }
        }
    }

    /// Forms and popup menus are positioned by their own logic, never by the parent's layout.
    fn skipped_by_layout(&self, id: ControlId) -> bool { self.tag(id) == Some(KindTag::Form) || self.is_popup_menu(id) }

    /// Offset of `child`'s origin inside `parent`'s raw coordinate space.
    pub(crate) fn child_offset(&self, parent: ControlId, child: ControlId) -> Vec2i {
        let Some(c) = self.control(child) else { return vec2(0, 0) };
        if c.dock.uses_client_origin() {
            let client = self.client_rect(parent);
            vec2(c.left + client.x, c.top + client.y)
        } else {
            vec2(c.left, c.top)
        }
    }

    /// Position of `id`'s origin relative to `ancestor` (or to the surface when `None`).
    pub fn relative_pos(&self, id: ControlId, ancestor: Option<ControlId>) -> Vec2i {
        let mut pos = vec2(0, 0);
        let mut cur = id;
        while Some(cur) != ancestor {
            match self.tree.parent(cur) {
                Some(parent) => {
                    let off = self.child_offset(parent, cur);
                    pos.x += off.x;
                    pos.y += off.y;
                    cur = parent;
                }
                None => {
                    if let Some(d) = self.control(cur) {
                        pos.x += d.left;
                        pos.y += d.top;
                    }
                    break;
                }
            }
        }
        pos
    }

    /// Converts a point local to `id` into surface coordinates.
    pub fn local_to_absolute(&self, id: ControlId, x: i32, y: i32) -> Vec2i {
        let origin = self.relative_pos(id, None);
        vec2(origin.x + x, origin.y + y)
    }

    /// Converts a surface point into coordinates local to `id`.
    pub fn absolute_to_local(&self, id: ControlId, x: i32, y: i32) -> Vec2i {
        let origin = self.relative_pos(id, None);
        vec2(x - origin.x, y - origin.y)
    }

    /// Deepest visible control of the surface under the surface point `(x, y)`. Open popups are
    /// tested first, then forms from top to bottom, then the remaining children of the root.
    pub fn find_control_at_position(&self, x: i32, y: i32) -> ControlId {
        for &popup in self.popups.iter().rev() {
            let origin = self.relative_pos(popup, None);
            if let Some(hit) = self.hit_test(popup, x - origin.x, y - origin.y) {
                return hit;
            }
        }
        let root = self.root;
        let (rx, ry) = self.control(root).map(|d| (x - d.left, y - d.top)).unwrap_or((x, y));
        for &form in self.forms.iter().rev() {
            let off = self.child_offset(root, form);
            if let Some(hit) = self.hit_test(form, rx - off.x, ry - off.y) {
                return hit;
            }
        }
        self.hit_test(root, rx, ry).unwrap_or(root)
    }

    /// Hit test of `id` and its subtree with `(x, y)` local to `id`.
    pub(crate) fn hit_test(&self, id: ControlId, x: i32, y: i32) -> Option<ControlId> {
        let node = self.tree.get(id)?;
        if !node.data.is_visible() {
            return None;
        }
        match node.kind.tag() {
            KindTag::Form => self.form_hit_test(id, x, y),
            _ if node.kind.is_container() => self.container_hit_test(id, x, y),
            _ if node.data.is_point_in_client(x, y) => Some(id),
            _ => None,
        }
    }

    /// A point in the padding gutter belongs to the container itself; otherwise children are
    /// tested from the last (topmost) to the first.
    pub(crate) fn container_hit_test(&self, id: ControlId, x: i32, y: i32) -> Option<ControlId> {
        let node = self.tree.get(id)?;
        let d = &node.data;
        if !d.is_point_in_client(x, y) {
            return None;
        }
        let pad = d.padding;
        if x <= pad.left || y <= pad.top || x >= d.width - pad.right || y >= d.height - pad.bottom {
            return Some(id);
        }
        for child in self.z_ordered(id).into_iter().rev() {
            if self.skipped_by_layout(child) {
                continue;
            }
            let off = self.child_offset(id, child);
            if let Some(hit) = self.hit_test(child, x - off.x, y - off.y) {
                return Some(hit);
            }
        }
        Some(id)
    }

    /// Children bottom to top: plain children in order, then the `TOP_MOST` ones.
    pub(crate) fn z_ordered(&self, id: ControlId) -> Vec<ControlId> {
        let children = self.tree.children(id);
        let top_most = |c: &ControlId| self.control(*c).map(|d| d.flags.contains(ControlFlags::TOP_MOST)).unwrap_or(false);
        let (top, mut out): (Vec<ControlId>, Vec<ControlId>) = children.iter().copied().partition(top_most);
        out.extend(top);
        out
    }

    /// Draws the visible children of `id` inside its padded area. `abs` of `id` must be current.
    pub(crate) fn draw_children(&mut self, id: ControlId) {
        let Some(node) = self.tree.get(id) else { return };
        let abs = node.data.abs;
        let pad = node.data.padding;
        let (w, h) = (node.data.width, node.data.height);
        let children = self.z_ordered(id);
        let client = self.client_rect(id);

        self.clips.add_rect(&mut self.draw, rect(abs.x + pad.left, abs.y + pad.top, w - pad.horizontal(), h - pad.vertical()));
        if !self.clips.top().is_empty() {
            for child in children {
                if self.skipped_by_layout(child) {
                    continue;
                }
                let Some(c) = self.control(child) else { continue };
                if !c.is_visible() {
                    continue;
                }
                let origin = if c.dock.uses_client_origin() { vec2(abs.x + client.x, abs.y + client.y) } else { abs };
                let bounds = rect(origin.x + c.left, origin.y + c.top, c.width, c.height);
                if self.clips.top().intersects(&bounds) {
                    self.draw_clipped(child, origin, bounds);
                }
            }
        }
        self.clips.pop_rect(&mut self.draw);
    }

    /// Draws one child with its own clip when the control asks for one.
    pub(crate) fn draw_clipped(&mut self, id: ControlId, origin: Vec2i, bounds: Rect) {
        let clip = self.control(id).map(|c| c.flags.contains(ControlFlags::CLIP_DRAW)).unwrap_or(false);
        if clip {
            self.clips.add_rect(&mut self.draw, bounds);
        }
        self.draw_control(id, origin);
        if clip {
            self.clips.pop_rect(&mut self.draw);
        }
    }

    /// Rescales the free-positioned children of `id` after a DPI change. Docked children only have
    /// their docked dimension scaled; menus re-measure themselves.
    pub(crate) fn rescale_children(&mut self, id: ControlId, scale: f32) {
        let layout = self.tree.get(id).and_then(|n| n.kind.container()).map(|c| c.layout);
        let children = self.tree.children(id).to_vec();
        for child in children {
            if self.tag(child) == Some(KindTag::Menu) {
                continue;
            }
            let s = |v: i32| (v as f32 * scale).round() as i32;
            if let Some(d) = self.control_mut(child) {
                match d.dock {
                    DockStyle::None if layout == Some(LayoutMode::None) => {
                        d.left = s(d.left);
                        d.top = s(d.top);
                        d.width = s(d.width);
                        d.height = s(d.height);
                    }
                    DockStyle::Top | DockStyle::Bottom => d.height = s(d.height),
                    DockStyle::Left | DockStyle::Right => d.width = s(d.width),
                    _ => (),
                }
            }
            self.rescale_children(child, scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UiEntry { UiEntry::new(640, 480, Box::new(MonospaceBackend::default())) }

    #[test]
    fn top_dock_carves_padded_strip() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.control_mut(c).unwrap().padding = Margins::uniform(10);
        ui.posit(c, 0, 0, 200, 100).unwrap();
        let child = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(child, 0, 0, 50, 20).unwrap();
        ui.set_dock(child, DockStyle::Top).unwrap();

        assert_eq!(ui.control(child).unwrap().bounds(), rect(10, 10, 180, 20));
        assert_eq!(ui.client_rect(c), rect(10, 30, 180, 60));
    }

    #[test]
    fn docks_carve_in_child_order() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.posit(c, 0, 0, 200, 100).unwrap();
        let top = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(top, 0, 0, 10, 20).unwrap();
        ui.set_dock(top, DockStyle::Top).unwrap();
        let left = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(left, 0, 0, 30, 10).unwrap();
        ui.set_dock(left, DockStyle::Left).unwrap();
        let fill = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.set_dock(fill, DockStyle::Fill).unwrap();

        assert_eq!(ui.control(left).unwrap().bounds(), rect(0, 20, 30, 80));
        let client = ui.client_rect(c);
        assert_eq!(client, rect(30, 20, 170, 80));
        assert!(client.w >= 0 && client.h >= 0);
        assert_eq!(ui.control(fill).unwrap().bounds(), rect(0, 0, 170, 80));
    }

    #[test]
    fn oversized_docks_never_leave_negative_client() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.posit(c, 0, 0, 50, 50).unwrap();
        let top = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(top, 0, 0, 10, 80).unwrap();
        ui.set_dock(top, DockStyle::Top).unwrap();
        let client = ui.client_rect(c);
        assert_eq!((client.w, client.h), (50, 0));
    }

    #[test]
    fn posit_is_idempotent() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.control_mut(c).unwrap().padding = Margins::uniform(4);
        ui.posit(c, 5, 5, 100, 60).unwrap();
        let first = ui.client_rect(c);
        ui.posit(c, 5, 5, 100, 60).unwrap();
        assert_eq!(ui.client_rect(c), first);
        assert_eq!(first, rect(4, 4, 92, 52));
    }

    #[test]
    fn flow_layout_wraps_rows() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.posit(c, 0, 0, 100, 100).unwrap();
        ui.set_layout(c, LayoutMode::Flow).unwrap();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let b = ui.add_control(c, ControlKind::Plain).unwrap();
            ui.posit(b, 0, 0, 40, 10).unwrap();
            ids.push(b);
        }
        assert_eq!(ui.control(ids[0]).unwrap().bounds(), rect(0, 0, 40, 10));
        assert_eq!(ui.control(ids[1]).unwrap().bounds(), rect(40, 0, 40, 10));
        assert_eq!(ui.control(ids[2]).unwrap().bounds(), rect(0, 10, 40, 10));
    }

    #[test]
    fn flow_wrap_ignores_right_margin() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.posit(c, 0, 0, 100, 100).unwrap();
        ui.set_layout(c, LayoutMode::Flow).unwrap();
        let mut ids = Vec::new();
        for _ in 0..2 {
            let b = ui.add_control(c, ControlKind::Plain).unwrap();
            ui.control_mut(b).unwrap().margin = Margins::new(0, 0, 10, 0);
            ui.posit(b, 0, 0, 45, 10).unwrap();
            ids.push(b);
        }
        assert_eq!(ui.control(ids[0]).unwrap().bounds(), rect(0, 0, 45, 10));
        assert_eq!(ui.control(ids[1]).unwrap().bounds(), rect(55, 0, 45, 10));
    }

    #[test]
    fn top_most_child_wins_overlaps() {
        let mut ui = entry();
        let root = ui.root();
        let c = ui.add_container(root).unwrap();
        ui.posit(c, 0, 0, 200, 200).unwrap();
        let a = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(a, 10, 10, 50, 50).unwrap();
        let b = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(b, 30, 30, 50, 50).unwrap();
        assert_eq!(ui.find_control_at_position(40, 40), b);
        ui.set_flags(a, ControlFlags::TOP_MOST, true).unwrap();
        assert_eq!(ui.z_ordered(c), vec![b, a]);
        assert_eq!(ui.find_control_at_position(40, 40), a);
        assert_eq!(ui.children(c), &[a, b]);
    }

    #[test]
    fn stack_layout_stretches_children() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.posit(c, 0, 0, 100, 100).unwrap();
        ui.set_layout(c, LayoutMode::Stack).unwrap();
        let a = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(a, 0, 0, 10, 12).unwrap();
        let b = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.control_mut(b).unwrap().margin = Margins::new(2, 1, 2, 1);
        ui.posit(b, 0, 0, 10, 12).unwrap();
        assert_eq!(ui.control(a).unwrap().bounds(), rect(0, 0, 100, 12));
        assert_eq!(ui.control(b).unwrap().bounds(), rect(2, 13, 96, 12));
    }

    #[test]
    fn auto_size_follows_children() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.control_mut(c).unwrap().padding = Margins::uniform(3);
        ui.set_flags(c, ControlFlags::AUTO_WIDTH | ControlFlags::AUTO_HEIGHT, true).unwrap();
        let child = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(child, 10, 5, 20, 8).unwrap();
        let d = ui.control(c).unwrap();
        assert_eq!((d.width, d.height), (36, 19));
    }

    #[test]
    fn hit_test_prefers_last_child_and_padding_gutter() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.control_mut(c).unwrap().padding = Margins::uniform(5);
        ui.posit(c, 10, 10, 100, 100).unwrap();
        let a = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(a, 0, 0, 50, 50).unwrap();
        let b = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(b, 20, 20, 50, 50).unwrap();

        assert_eq!(ui.find_control_at_position(40, 40), b);
        assert_eq!(ui.find_control_at_position(20, 20), a);
        assert_eq!(ui.find_control_at_position(13, 50), c);
        assert_eq!(ui.find_control_at_position(300, 300), ui.root());
    }

    #[test]
    fn relative_and_absolute_positions_agree() {
        let mut ui = entry();
        let c = ui.add_container(ui.root()).unwrap();
        ui.control_mut(c).unwrap().padding = Margins::uniform(4);
        ui.posit(c, 10, 20, 100, 100).unwrap();
        let child = ui.add_control(c, ControlKind::Plain).unwrap();
        ui.posit(child, 3, 3, 10, 10).unwrap();
        assert_eq!(ui.relative_pos(child, Some(c)).x, 7);
        let abs = ui.local_to_absolute(child, 1, 1);
        assert_eq!((abs.x, abs.y), (18, 28));
        let back = ui.absolute_to_local(child, abs.x, abs.y);
        assert_eq!((back.x, back.y), (1, 1));
    }
}
