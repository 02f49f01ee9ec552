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

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[repr(usize)]
/// Identifiers for each entry of [`Theme::colors`].
pub enum ThemeColor {
    /// Drop shadows behind forms and popups.
    Shadow = 0,
    /// Default control background.
    ControlBack,
    /// Default control border.
    ControlBorder,
    /// Default text color.
    ControlFont,
    /// Background of editable areas.
    EditableBack,
    /// Scrollbar track.
    ScrollBarBack,
    /// Scrollbar arrows.
    ScrollBarFore,
    /// Scrollbar thumb.
    ScrollBarSlider,
    /// Scrollbar part under the pointer.
    ScrollBarHighlight,
    /// Scrollbar part being pressed.
    ScrollBarPressed,
    /// Icon column of popup menus.
    MenuIconBack,
    /// Popup menu background.
    MenuBack,
    /// Popup menu border.
    MenuBorder,
    /// Menu separator lines.
    MenuSeparator,
    /// Menu item text.
    MenuItemFore,
    /// Disabled menu item text.
    MenuItemDisabledFore,
    /// Highlighted menu item text.
    MenuItemHighlightFore,
    /// Menu bar and tool button background.
    ToolButtonBack,
    /// Highlighted menu item or tool button.
    ToolButtonHighlight,
    /// Pressed menu item or tool button.
    ToolButtonPressed,
    /// Border around highlighted tool buttons.
    ToolButtonBorderHighlight,
    /// Background of checked buttons.
    ButtonChecked,
    /// Selection background.
    Selection,
    /// Selection text.
    SelectionFore,
    /// Keyboard focus rectangle.
    FocusRect,
    /// Title bar of the active form.
    TitleBar,
    /// Title bar of inactive forms.
    TitleBarInactive,
    /// Title text.
    TitleFont,
    /// Form background.
    FormBack,
    /// Form border.
    FormBorder,
}

impl ThemeColor {
    /// Number of entries in [`Theme::colors`].
    pub const COUNT: usize = 30;
}

#[derive(Copy, Clone, Debug)]
/// Color table and font choice shared by every control of one [`UiEntry`].
pub struct Theme {
    /// Palette indexed by [`ThemeColor`].
    pub colors: [Color; ThemeColor::COUNT],
    /// Font used when a control does not name its own.
    pub default_font: FontId,
}

impl Theme {
    /// Looks up a palette entry.
    pub fn color(&self, id: ThemeColor) -> Color { self.colors[id as usize] }

    /// Replaces a palette entry.
    pub fn set_color(&mut self, id: ThemeColor, c: Color) { self.colors[id as usize] = c; }

    /// Light palette.
    pub fn light() -> Self {
        let control_back = color(235, 238, 241, 255);
        let control_border = color(160, 160, 160, 255);
        let scroll_back = color(240, 240, 240, 255);
        let slider = color(210, 210, 210, 255);
        Self {
            colors: [
                color(0, 0, 0, 120),
                control_back,
                control_border,
                color(0, 0, 0, 255),
                color(255, 255, 255, 255),
                scroll_back,
                color(80, 80, 80, 255),
                slider,
                color(150, 150, 150, 255),
                color(130, 130, 130, 255),
                color(232, 232, 225, 255),
                color(242, 242, 238, 255),
                color(150, 150, 150, 255),
                color(180, 180, 180, 255),
                color(0, 0, 0, 255),
                color(180, 180, 180, 255),
                color(0, 0, 0, 255),
                control_back,
                color(255, 250, 210, 255),
                color(249, 217, 132, 255),
                color(254, 193, 92, 255),
                color(254, 216, 152, 255),
                color(10, 36, 106, 255),
                color(255, 255, 255, 255),
                color(120, 120, 120, 220),
                color(10, 36, 106, 255),
                color(128, 128, 128, 255),
                color(255, 255, 255, 255),
                control_back,
                control_border,
            ],
            default_font: FontId(0),
        }
    }

    /// Dark palette.
    pub fn dark() -> Self {
        let control_border = color(140, 140, 140, 255);
        let selection = color(224, 135, 0, 255);
        Self {
            colors: [
                color(0, 0, 0, 255),
                color(0, 0, 0, 0),
                control_border,
                color(255, 255, 255, 255),
                color(50, 50, 50, 170),
                color(80, 80, 80, 170),
                color(180, 180, 180, 255),
                color(110, 110, 110, 255),
                color(140, 140, 140, 255),
                color(100, 100, 100, 255),
                color(127, 127, 127, 255),
                color(80, 80, 80, 255),
                color(127, 127, 127, 255),
                color(130, 130, 130, 255),
                color(255, 255, 255, 255),
                color(180, 180, 180, 255),
                color(255, 255, 255, 255),
                color(0, 0, 0, 0),
                selection,
                color(184, 75, 0, 255),
                color(254, 193, 92, 0),
                color(40, 40, 40, 255),
                selection,
                color(255, 255, 255, 255),
                color(120, 120, 120, 220),
                color(85, 85, 85, 255),
                color(128, 128, 128, 255),
                color(255, 255, 255, 255),
                color(0, 0, 0, 180),
                control_border,
            ],
            default_font: FontId(0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::light() }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Size constants derived from the current font and DPI.
pub struct Metrics {
    /// Height of one text line ("M" measured with the default font).
    pub line_height: i32,
    /// Accumulated DPI scale relative to the first measured line height.
    pub dpi_scale: f32,
    /// Edge length of scrollbar arrow buttons.
    pub scrollbar_button_size: i32,
    /// Form title bar height in line heights.
    pub title_bar_em: f32,
    /// Thickness of the grab zone along sizeable form borders.
    pub resize_handle: i32,
    /// Smallest width a form can be resized to.
    pub form_min_width: i32,
    /// Amount added to / removed from the border color for raised and lowered bevels.
    pub border_lighten: i32,
    /// Gap between the icon column and the text of popup menu items.
    pub separator_heading: i32,
    /// Offset of drop shadows.
    pub shadow_size: i32,
}

impl Metrics {
    /// Title bar height in pixels.
    pub fn title_height(&self) -> i32 { (self.line_height as f32 * self.title_bar_em) as i32 }

    /// Smallest height a form can be resized to.
    pub fn form_min_height(&self) -> i32 { self.title_height() * 2 }
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            line_height: 16,
            dpi_scale: 1.0,
            scrollbar_button_size: 16,
            title_bar_em: 1.2,
            resize_handle: 4,
            form_min_width: 120,
            border_lighten: 100,
            separator_heading: 8,
            shadow_size: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lookup_matches_index() {
        let mut theme = Theme::light();
        theme.set_color(ThemeColor::FormBorder, color(1, 2, 3, 4));
        assert_eq!(theme.color(ThemeColor::FormBorder), color(1, 2, 3, 4));
        assert_eq!(theme.colors[ThemeColor::COUNT - 1], color(1, 2, 3, 4));
        assert_eq!(Theme::dark().color(ThemeColor::ControlFont), color(255, 255, 255, 255));
    }

    #[test]
    fn title_height_follows_line_height() {
        let m = Metrics { line_height: 20, ..Metrics::default() };
        assert_eq!(m.title_height(), 24);
        assert_eq!(m.form_min_height(), 48);
    }
}
