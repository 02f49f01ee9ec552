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

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Generational handle to a control owned by a [`UiEntry`]. Handles to destroyed controls never
/// resolve again, even after their slot is reused.
pub struct ControlId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ControlId {
    /// Slot index, useful for debugging output.
    pub fn index(&self) -> u32 { self.index }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// How a control is placed by its parent's layout.
pub enum DockStyle {
    #[default]
    /// Free positioning (or flow/stack layout) inside the parent's client rectangle.
    None,
    /// Strip along the left edge.
    Left,
    /// Strip along the top edge.
    Top,
    /// Strip along the right edge.
    Right,
    /// Strip along the bottom edge.
    Bottom,
    /// Whatever remains after the docked strips.
    Fill,
}

impl DockStyle {
    /// `None` and `Fill` children are positioned relative to the parent's client origin; docked
    /// strips are positioned relative to the parent's raw origin.
    pub fn uses_client_origin(self) -> bool { matches!(self, Self::None | Self::Fill) }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Border decoration painted around a control.
pub enum BorderStyle {
    /// No border.
    None,
    #[default]
    /// Light top/left edges, dark bottom/right edges.
    Raised,
    /// Dark top/left edges, light bottom/right edges.
    Lowered,
    /// Single-color outline.
    Flat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Automatic placement of `DockStyle::None` children.
pub enum LayoutMode {
    #[default]
    /// Children keep the position they were given.
    None,
    /// Left to right, wrapping to a new row when the row is full.
    Flow,
    /// One child per row, stretched to the container width.
    Stack,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    /// Capability and state bits of a control.
    pub struct ControlFlags : u32 {
        /// Painted and hit-tested.
        const VISIBLE = 1;
        /// Receives input.
        const ENABLED = 2;
        /// Reached by Tab navigation.
        const TAB_STOP = 4;
        /// Can hold keyboard focus.
        const ACCEPTS_FOCUS = 8;
        /// Painted and hit-tested above its siblings.
        const TOP_MOST = 16;
        /// Receives Tab as a key instead of moving focus.
        const WANTS_TAB = 32;
        /// Content is clipped to the control bounds.
        const CLIP_DRAW = 64;
        /// Casts a drop shadow.
        const BACKGROUND_SHADOW = 128;
        /// Width follows the content.
        const AUTO_WIDTH = 256;
        /// Height follows the content.
        const AUTO_HEIGHT = 512;
        /// Receives IME composition results.
        const IME_RECEIVER = 1024;
        /// Default state of a new control.
        const DEFAULT = Self::VISIBLE.bits() | Self::ENABLED.bits() | Self::ACCEPTS_FOCUS.bits() | Self::CLIP_DRAW.bits();
    }
}

#[derive(Clone, Debug)]
/// Geometry, state and styling common to every control.
pub struct ControlData {
    /// Left edge relative to the parent's origin (client origin for `None`/`Fill` docking).
    pub left: i32,
    /// Top edge, same reference as `left`.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
    /// Capability and state bits.
    pub flags: ControlFlags,
    /// Docking behavior.
    pub dock: DockStyle,
    /// Border decoration.
    pub border_style: BorderStyle,
    /// Border base color.
    pub border_color: Color,
    /// Background fill; fully transparent skips the fill.
    pub back_color: Color,
    /// Text color.
    pub font_color: Color,
    /// Inner spacing.
    pub padding: Margins,
    /// Outer spacing used by flow/stack layout.
    pub margin: Margins,
    /// Font override; the theme's default font when `None`.
    pub font: Option<FontId>,
    pub(crate) abs: Vec2i,
}

impl ControlData {
    pub(crate) fn new(theme: &Theme) -> Self {
        Self {
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            flags: ControlFlags::DEFAULT,
            dock: DockStyle::None,
            border_style: BorderStyle::Raised,
            border_color: theme.color(ThemeColor::ControlBorder),
            back_color: theme.color(ThemeColor::ControlBack),
            font_color: theme.color(ThemeColor::ControlFont),
            padding: Margins::default(),
            margin: Margins::default(),
            font: None,
            abs: vec2(0, 0),
        }
    }

    /// Bounds relative to the parent's reference origin.
    pub fn bounds(&self) -> Rect { rect(self.left, self.top, self.width, self.height) }

    /// Absolute position cached by the last draw pass.
    pub fn absolute_pos(&self) -> Vec2i { self.abs }

    /// Visible flag.
    pub fn is_visible(&self) -> bool { self.flags.contains(ControlFlags::VISIBLE) }

    /// Enabled flag.
    pub fn is_enabled(&self) -> bool { self.flags.contains(ControlFlags::ENABLED) }

    /// Tab stop flag.
    pub fn is_tab_stop(&self) -> bool { self.flags.contains(ControlFlags::TAB_STOP) }

    /// Accepts-focus flag.
    pub fn accepts_focus(&self) -> bool { self.flags.contains(ControlFlags::ACCEPTS_FOCUS) }

    /// Visible and enabled.
    pub fn is_interactive(&self) -> bool { self.is_visible() && self.is_enabled() }

    /// Strict interior test in local coordinates; points on the top/left edge are outside.
    pub fn is_point_in_client(&self, x: i32, y: i32) -> bool { x > 0 && y > 0 && x < self.width && y < self.height }

    /// Inclusive bounds test in local coordinates.
    pub fn is_point_in_content(&self, x: i32, y: i32) -> bool { x >= 0 && y >= 0 && x <= self.width && y <= self.height }
}

/// Closed set of control variants. Capability queries such as [`ControlKind::container`] replace
/// run-time downcasts.
pub enum ControlKind {
    /// Bare control without children.
    Plain,
    /// Generic container.
    Container(ContainerData),
    /// Static text.
    Label(LabelData),
    /// Push button.
    Button(ButtonData),
    /// Scrollbar.
    ScrollBar(ScrollBarData),
    /// Floating top-level window.
    Form(FormData),
    /// Menu bar or popup menu.
    Menu(MenuData),
    /// Entry of a menu.
    MenuItem(MenuItemData),
    /// Host-defined widget.
    Custom(CustomData),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Payload-free copy of a [`ControlKind`] discriminant.
pub enum KindTag {
    /// [`ControlKind::Plain`].
    Plain,
    /// [`ControlKind::Container`].
    Container,
    /// [`ControlKind::Label`].
    Label,
    /// [`ControlKind::Button`].
    Button,
    /// [`ControlKind::ScrollBar`].
    ScrollBar,
    /// [`ControlKind::Form`].
    Form,
    /// [`ControlKind::Menu`].
    Menu,
    /// [`ControlKind::MenuItem`].
    MenuItem,
    /// [`ControlKind::Custom`].
    Custom,
}

impl ControlKind {
    /// Discriminant of this kind.
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Plain => KindTag::Plain,
            Self::Container(_) => KindTag::Container,
            Self::Label(_) => KindTag::Label,
            Self::Button(_) => KindTag::Button,
            Self::ScrollBar(_) => KindTag::ScrollBar,
            Self::Form(_) => KindTag::Form,
            Self::Menu(_) => KindTag::Menu,
            Self::MenuItem(_) => KindTag::MenuItem,
            Self::Custom(_) => KindTag::Custom,
        }
    }

    /// Container part of the control, if it can own children.
    pub fn container(&self) -> Option<&ContainerData> {
        match self {
            Self::Container(c) => Some(c),
            Self::Form(f) => Some(&f.container),
            Self::Menu(m) => Some(&m.container),
            Self::MenuItem(i) => Some(&i.container),
            Self::Custom(c) => c.container.as_ref(),
            _ => None,
        }
    }

    /// Mutable container part of the control.
    pub fn container_mut(&mut self) -> Option<&mut ContainerData> {
        match self {
            Self::Container(c) => Some(c),
            Self::Form(f) => Some(&mut f.container),
            Self::Menu(m) => Some(&mut m.container),
            Self::MenuItem(i) => Some(&mut i.container),
            Self::Custom(c) => c.container.as_mut(),
            _ => None,
        }
    }

    /// Returns `true` when the control can own children.
    pub fn is_container(&self) -> bool { self.container().is_some() }

    /// Form part of the control.
    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Self::Form(f) => Some(f),
            _ => None,
        }
    }

    /// Menu part of the control.
    pub fn as_menu(&self) -> Option<&MenuData> {
        match self {
            Self::Menu(m) => Some(m),
            _ => None,
        }
    }

    /// Menu item part of the control.
    pub fn as_menu_item(&self) -> Option<&MenuItemData> {
        match self {
            Self::MenuItem(i) => Some(i),
            _ => None,
        }
    }
}

/// Host-defined widget plugged into the tree through [`ControlKind::Custom`].
///
/// The entry performs the common work (events, focus, capture bookkeeping) before calling the
/// hooks, so every hook is optional.
pub trait Widget {
    /// Paints the widget. `bounds` is absolute; the clip is already set.
    fn draw(&mut self, _ctx: &mut PaintCtx<'_>, _bounds: Rect) {}
    /// Paints above every form and popup when the widget is registered as top layer.
    fn draw_top_layer(&mut self, _ctx: &mut PaintCtx<'_>, _bounds: Rect) {}
    /// Button pressed. Return `true` to stop propagation.
    fn mouse_down(&mut self, _ctx: &mut WidgetCtx<'_>, _args: MouseArgs) -> bool { false }
    /// Button released.
    fn mouse_up(&mut self, _ctx: &mut WidgetCtx<'_>, _args: MouseArgs) -> bool { false }
    /// Pointer moved.
    fn mouse_move(&mut self, _ctx: &mut WidgetCtx<'_>, _args: MouseArgs) -> bool { false }
    /// Wheel turned.
    fn mouse_wheel(&mut self, _ctx: &mut WidgetCtx<'_>, _args: MouseArgs) -> bool { false }
    /// Pointer rested over the widget.
    fn mouse_hover(&mut self, _ctx: &mut WidgetCtx<'_>) -> bool { false }
    /// Key pressed while focused (or while a descendant is focused).
    fn key_down(&mut self, _ctx: &mut WidgetCtx<'_>, _args: KeyArgs) -> bool { false }
    /// Key released.
    fn key_up(&mut self, _ctx: &mut WidgetCtx<'_>, _args: KeyArgs) -> bool { false }
    /// Character typed.
    fn key_press(&mut self, _ctx: &mut WidgetCtx<'_>, _ch: char, _shift: ShiftState) -> bool { false }
    /// Periodic callback for subscribed widgets.
    fn tick(&mut self, _ctx: &mut WidgetCtx<'_>) {}
    /// Every popup of the surface is being dismissed.
    fn close_popup(&mut self, _ctx: &mut WidgetCtx<'_>) {}
    /// Committed IME text for a widget flagged [`ControlFlags::IME_RECEIVER`].
    fn ime_result(&mut self, _ctx: &mut WidgetCtx<'_>, _text: &str) {}
}

/// Storage of a [`ControlKind::Custom`] control.
pub struct CustomData {
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Present when the widget owns children.
    pub container: Option<ContainerData>,
}

impl CustomData {
    /// Wraps a leaf widget.
    pub fn leaf(widget: Box<dyn Widget>) -> Self { Self { widget: Some(widget), container: None } }

    /// Wraps a widget that owns children.
    pub fn container(widget: Box<dyn Widget>) -> Self { Self { widget: Some(widget), container: Some(ContainerData::default()) } }
}

/// Mutable access to the surface handed to [`Widget`] hooks.
pub struct WidgetCtx<'a> {
    entry: &'a mut UiEntry,
    id: ControlId,
}

impl<'a> WidgetCtx<'a> {
    pub(crate) fn new(entry: &'a mut UiEntry, id: ControlId) -> Self { Self { entry, id } }

    /// Id of the widget being called.
    pub fn id(&self) -> ControlId { self.id }

    /// The owning surface.
    pub fn entry(&mut self) -> &mut UiEntry { self.entry }

    /// Shared data of the widget.
    pub fn data(&self) -> Option<&ControlData> { self.entry.control(self.id) }

    /// Routes all mouse input to this widget until released.
    pub fn capture(&mut self) { self.entry.set_capture(self.id) }

    /// Releases the mouse if this widget holds it.
    pub fn release(&mut self) { self.entry.release_capture(self.id) }

    /// Raises an event on this widget.
    pub fn raise(&mut self, event: UiEvent) { self.entry.raise(self.id, event) }

    /// Starts receiving [`Widget::tick`].
    pub fn subscribe_tick(&mut self) { self.entry.subscribe_tick(self.id) }

    /// Stops receiving [`Widget::tick`].
    pub fn unsubscribe_tick(&mut self) { self.entry.unsubscribe_tick(self.id) }
}
