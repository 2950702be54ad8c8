//! Element categories
//!
//! Closed dispatch set for everything that branches on "what kind of
//! element is this". Computed once from the tag at creation time;
//! checking the category is much faster than re-matching tag strings
//! in every hot path.

/// What kind of element a tag denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// Document root (`svg`).
    Svg,
    /// Grouping containers: `g`, `symbol`, `a`.
    Group,
    /// `defs`.
    Defs,
    /// `clipPath`.
    ClipPath,
    /// `mask`.
    Mask,
    /// Text content: `text`, `tspan`.
    Text,
    /// `image`.
    Image,
    /// `use`.
    Use,
    /// `path`.
    Path,
    /// `rect`.
    Rect,
    /// `circle`.
    Circle,
    /// `ellipse`.
    Ellipse,
    /// `line`.
    Line,
    /// `polygon`.
    Polygon,
    /// `polyline`.
    Polyline,
    /// Anything else (metadata, gradients, filters, unknown tags).
    Other,
}

impl ElementCategory {
    /// Classify a tag name (namespace prefixes already stripped).
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "svg" => Self::Svg,
            "g" | "symbol" | "a" => Self::Group,
            "defs" => Self::Defs,
            "clipPath" => Self::ClipPath,
            "mask" => Self::Mask,
            "text" | "tspan" => Self::Text,
            "image" => Self::Image,
            "use" => Self::Use,
            "path" => Self::Path,
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "polygon" => Self::Polygon,
            "polyline" => Self::Polyline,
            _ => Self::Other,
        }
    }

    /// Elements whose geometry resolves to a path.
    #[inline]
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            Self::Path
                | Self::Rect
                | Self::Circle
                | Self::Ellipse
                | Self::Line
                | Self::Polygon
                | Self::Polyline
        )
    }

    /// Containers whose bounding box is the union of their children.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Svg | Self::Group | Self::ClipPath | Self::Mask)
    }

    /// Elements whose style participates in inheritance: a child's
    /// specified style starts from the specified style of a
    /// style-bearing parent.
    #[inline]
    pub fn is_style_bearing(self) -> bool {
        self.is_shape()
            || matches!(
                self,
                Self::Svg | Self::Group | Self::Text | Self::Image | Self::Use
            )
    }

    /// Clip and mask definitions get relocated into `defs` when cloned.
    #[inline]
    pub fn is_clip_or_mask(self) -> bool {
        matches!(self, Self::ClipPath | Self::Mask)
    }
}
