// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};
use web_sys::{HtmlElement, Window};

use parallax_core::host::Container;

/// The hero container element, measured through the DOM.
#[derive(Clone, Debug)]
pub struct DomContainer {
    window: Window,
    element: HtmlElement,
}

impl DomContainer {
    /// Wraps `element`; the pixel ratio is read from `window`.
    #[must_use]
    pub fn new(window: Window, element: HtmlElement) -> Self {
        Self { window, element }
    }

    /// The wrapped element.
    #[must_use]
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl Container for DomContainer {
    fn client_size(&self) -> Size {
        Size::new(
            f64::from(self.element.client_width()),
            f64::from(self.element.client_height()),
        )
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.element.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}
