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
/// Discriminant of [`UiEvent`], used to subscribe listeners.
pub enum EventKind {
    /// See [`UiEvent::Click`].
    Click,
    /// See [`UiEvent::DblClick`].
    DblClick,
    /// See [`UiEvent::MouseEnter`].
    MouseEnter,
    /// See [`UiEvent::MouseLeave`].
    MouseLeave,
    /// See [`UiEvent::MouseMove`].
    MouseMove,
    /// See [`UiEvent::MouseDown`].
    MouseDown,
    /// See [`UiEvent::MouseUp`].
    MouseUp,
    /// See [`UiEvent::MouseWheel`].
    MouseWheel,
    /// See [`UiEvent::MouseHover`].
    MouseHover,
    /// See [`UiEvent::KeyDown`].
    KeyDown,
    /// See [`UiEvent::KeyUp`].
    KeyUp,
    /// See [`UiEvent::KeyPress`].
    KeyPress,
    /// See [`UiEvent::Resize`].
    Resize,
    /// See [`UiEvent::LostFocus`].
    LostFocus,
    /// See [`UiEvent::Changed`].
    Changed,
    /// See [`UiEvent::Popup`].
    Popup,
    /// See [`UiEvent::MenuClosed`].
    MenuClosed,
    /// See [`UiEvent::Activate`].
    Activate,
    /// See [`UiEvent::Deactivate`].
    Deactivate,
    /// See [`UiEvent::Close`].
    Close,
    /// See [`UiEvent::Show`].
    Show,
    /// See [`UiEvent::ImeResult`].
    ImeResult,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Pointer data attached to mouse events. Coordinates are local to the receiving control.
pub struct MouseArgs {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
    /// Wheel delta (zero for non-wheel events).
    pub delta: i32,
    /// Modifiers and buttons.
    pub shift: ShiftState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Key data attached to key-down and key-up events.
pub struct KeyArgs {
    /// Virtual key.
    pub key: Key,
    /// Modifiers.
    pub shift: ShiftState,
}

#[derive(Clone, Debug, PartialEq)]
/// Notification raised by a control. Listeners receive it together with the id of the control
/// that raised it; the same pair is appended to the entry's event queue.
pub enum UiEvent {
    /// Primary activation (button release over the control that saw the press, menu item hit).
    Click,
    /// Double click.
    DblClick,
    /// Pointer entered the control.
    MouseEnter,
    /// Pointer left the control.
    MouseLeave,
    /// Pointer moved over (or while captured by) the control.
    MouseMove(MouseArgs),
    /// Button pressed.
    MouseDown(MouseArgs),
    /// Button released.
    MouseUp(MouseArgs),
    /// Wheel turned.
    MouseWheel(MouseArgs),
    /// Pointer rested over the control.
    MouseHover,
    /// Key pressed while focused.
    KeyDown(KeyArgs),
    /// Key released while focused.
    KeyUp(KeyArgs),
    /// Character typed while focused.
    KeyPress {
        /// Typed character.
        ch: char,
        /// Modifiers.
        shift: ShiftState,
    },
    /// Size changed.
    Resize {
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
    /// Focus moved away from the control.
    LostFocus {
        /// Control receiving focus, if any.
        new_focus: Option<ControlId>,
    },
    /// Value changed (scrollbar position, checked state).
    Changed,
    /// Popup menu is about to open.
    Popup,
    /// Popup menu closed.
    MenuClosed,
    /// Form became the active form.
    Activate,
    /// Form stopped being the active form.
    Deactivate,
    /// Form was closed.
    Close,
    /// Form became visible.
    Show,
    /// Committed IME text delivered to the focused receiver.
    ImeResult(String),
}

impl UiEvent {
    /// Discriminant used to match listeners.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Click => EventKind::Click,
            Self::DblClick => EventKind::DblClick,
            Self::MouseEnter => EventKind::MouseEnter,
            Self::MouseLeave => EventKind::MouseLeave,
            Self::MouseMove(_) => EventKind::MouseMove,
            Self::MouseDown(_) => EventKind::MouseDown,
            Self::MouseUp(_) => EventKind::MouseUp,
            Self::MouseWheel(_) => EventKind::MouseWheel,
            Self::MouseHover => EventKind::MouseHover,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::KeyPress { .. } => EventKind::KeyPress,
            Self::Resize { .. } => EventKind::Resize,
            Self::LostFocus { .. } => EventKind::LostFocus,
            Self::Changed => EventKind::Changed,
            Self::Popup => EventKind::Popup,
            Self::MenuClosed => EventKind::MenuClosed,
            Self::Activate => EventKind::Activate,
            Self::Deactivate => EventKind::Deactivate,
            Self::Close => EventKind::Close,
            Self::Show => EventKind::Show,
            Self::ImeResult(_) => EventKind::ImeResult,
        }
    }
}

/// Callback invoked when a control raises an event it is subscribed to.
pub type Listener = Box<dyn FnMut(ControlId, &UiEvent)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Internal broadcast delivered through [`UiEntry::send_message`].
pub enum UiMessage {
    /// Paint pass for controls registered as top layer.
    TopLayerDraw,
    /// The form became active.
    Activate,
    /// The form stopped being active.
    Deactivate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_payloads() {
        assert_eq!(UiEvent::Click.kind(), EventKind::Click);
        assert_eq!(UiEvent::MouseDown(MouseArgs::default()).kind(), EventKind::MouseDown);
        assert_eq!(UiEvent::KeyPress { ch: 'a', shift: ShiftState::NONE }.kind(), EventKind::KeyPress);
        assert_eq!(UiEvent::ImeResult("x".into()).kind(), EventKind::ImeResult);
        assert_eq!(UiEvent::Resize { width: 1, height: 2 }.kind(), EventKind::Resize);
    }
}
