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

pub(crate) struct Node {
    pub data: ControlData,
    pub kind: ControlKind,
    pub parent: Option<ControlId>,
    pub children: Vec<ControlId>,
    pub listeners: Vec<(EventKind, Listener)>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena holding every control of one surface. Parents own their children through the child
/// list; a node's `parent` and its membership in that parent's list always agree.
#[derive(Default)]
pub(crate) struct ControlTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl ControlTree {
    pub fn insert(&mut self, data: ControlData, kind: ControlKind) -> ControlId {
        let node = Node { data, kind, parent: None, children: Vec::new(), listeners: Vec::new() };
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ControlId { index, generation: slot.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, node: Some(node) });
                ControlId { index: self.slots.len() as u32 - 1, generation: 0 }
            }
        }
    }

    pub fn len(&self) -> usize { self.live }

    pub fn contains(&self, id: ControlId) -> bool { self.get(id).is_some() }

    pub fn get(&self, id: ControlId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub fn parent(&self, id: ControlId) -> Option<ControlId> { self.get(id).and_then(|n| n.parent) }

    pub fn children(&self, id: ControlId) -> &[ControlId] { self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[]) }

    /// Strict ancestry test: `true` when `ancestor` is above `id`.
    pub fn is_descendant_of(&self, id: ControlId, ancestor: ControlId) -> bool {
        let mut cur = self.parent(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// `id` itself or one of its descendants.
    pub fn is_within(&self, id: ControlId, ancestor: ControlId) -> bool { id == ancestor || self.is_descendant_of(id, ancestor) }

    /// Chain from `id` up to the topmost ancestor, `id` first.
    pub fn ancestry(&self, id: ControlId) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut cur = Some(id).filter(|c| self.contains(*c));
        while let Some(c) = cur {
            out.push(c);
            cur = self.parent(c);
        }
        out
    }

    pub fn attach(&mut self, parent: ControlId, child: ControlId) {
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    pub fn detach(&mut self, child: ControlId) {
        let Some(parent) = self.parent(child) else { return };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
    }

    /// Detaches `id` and frees it together with its whole subtree. Returns the freed ids,
    /// `id` first.
    pub fn remove_subtree(&mut self, id: ControlId) -> Vec<ControlId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);
        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(cur) = pending.pop() {
            let slot = &mut self.slots[cur.index as usize];
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.index);
                self.live -= 1;
                pending.extend(node.children.iter().rev());
                removed.push(cur);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tree: &mut ControlTree) -> ControlId { tree.insert(ControlData::new(&Theme::default()), ControlKind::Container(ContainerData::default())) }

    #[test]
    fn attach_keeps_parent_and_children_consistent() {
        let mut tree = ControlTree::default();
        let a = node(&mut tree);
        let b = node(&mut tree);
        let c = node(&mut tree);
        tree.attach(a, c);
        tree.attach(b, c);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.parent(c), Some(b));
    }

    #[test]
    fn removed_ids_go_stale() {
        let mut tree = ControlTree::default();
        let root = node(&mut tree);
        let child = node(&mut tree);
        let grandchild = node(&mut tree);
        tree.attach(root, child);
        tree.attach(child, grandchild);
        let removed = tree.remove_subtree(child);
        assert_eq!(removed, vec![child, grandchild]);
        assert!(!tree.contains(grandchild));
        assert!(tree.children(root).is_empty());
        let reused = node(&mut tree);
        assert_eq!(reused.index, grandchild.index);
        assert!(tree.get(grandchild).is_none());
        assert!(tree.get(reused).is_some());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn ancestry_and_descendant_checks() {
        let mut tree = ControlTree::default();
        let root = node(&mut tree);
        let mid = node(&mut tree);
        let leaf = node(&mut tree);
        tree.attach(root, mid);
        tree.attach(mid, leaf);
        assert_eq!(tree.ancestry(leaf), vec![leaf, mid, root]);
        assert!(tree.is_descendant_of(leaf, root));
        assert!(!tree.is_descendant_of(root, root));
        assert!(tree.is_within(root, root));
        assert!(!tree.is_within(mid, leaf));
    }
}
