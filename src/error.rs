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
use crate::ControlId;
use thiserror::Error;

/// Result alias used by fallible UI operations.
pub type UiResult<T> = std::result::Result<T, UiError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised by explicit tree and accessor calls. Input dispatch, layout and drawing never
/// return these; they clamp or ignore instead.
pub enum UiError {
    /// The id does not name a live control.
    #[error("control {0:?} does not exist")]
    InvalidControl(ControlId),
    /// Children can only be added to container controls.
    #[error("control {0:?} cannot own children")]
    NotAContainer(ControlId),
    /// The operation needs a menu.
    #[error("control {0:?} is not a menu")]
    NotAMenu(ControlId),
    /// The operation needs a menu item.
    #[error("control {0:?} is not a menu item")]
    NotAMenuItem(ControlId),
    /// The operation needs a form.
    #[error("control {0:?} is not a form")]
    NotAForm(ControlId),
    /// The control kind does not support the operation.
    #[error("control {0:?} does not support this operation")]
    KindMismatch(ControlId),
    /// Positional lookup past the end of a list.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of entries.
        len: usize,
    },
    /// Reparenting a control under itself or one of its descendants.
    #[error("control would become its own ancestor")]
    WouldCreateCycle,
    /// The root of a surface cannot be destroyed or reparented.
    #[error("the root control cannot be modified this way")]
    RootImmutable,
    /// A font could not be parsed.
    #[error("cannot load font: {0}")]
    FontLoad(String),
}
