//! Known units, properties and at-rules.
//!
//! The tables are compile-time `phf` sets shared by every parse call and
//! never mutated. Request-scoped additions go through [`DataView`], which
//! owns its extra names and falls back to the shared tables.

use phf::phf_set;

static UNITS: phf::Set<&'static str> = phf_set! {
    // lengths
    "px", "cm", "mm", "q", "in", "pt", "pc",
    "em", "rem", "ex", "rex", "ch", "rch", "cap", "rcap", "ic", "ric", "lh", "rlh",
    "vw", "vh", "vi", "vb", "vmin", "vmax",
    "svw", "svh", "svi", "svb", "svmin", "svmax",
    "lvw", "lvh", "lvi", "lvb", "lvmin", "lvmax",
    "dvw", "dvh", "dvi", "dvb", "dvmin", "dvmax",
    "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
    "fr",
    // angles
    "deg", "grad", "rad", "turn",
    // times
    "s", "ms",
    // frequencies
    "hz", "khz",
    // resolutions
    "dpi", "dpcm", "dppx", "x",
};

static AT_RULES: phf::Set<&'static str> = phf_set! {
    "@charset", "@import", "@namespace", "@media", "@supports", "@page",
    "@font-face", "@keyframes", "@-webkit-keyframes", "@-moz-keyframes",
    "@-o-keyframes", "@layer", "@container", "@property", "@counter-style",
    "@font-feature-values", "@font-palette-values", "@viewport", "@-ms-viewport",
    "@document", "@-moz-document", "@scope", "@starting-style",
    "@top-left-corner", "@top-left", "@top-center", "@top-right",
    "@top-right-corner", "@bottom-left-corner", "@bottom-left",
    "@bottom-center", "@bottom-right", "@bottom-right-corner", "@left-top",
    "@left-middle", "@left-bottom", "@right-top", "@right-middle",
    "@right-bottom",
};

static PROPERTIES: phf::Set<&'static str> = phf_set! {
    "align-content", "align-items", "align-self", "all", "animation",
    "animation-delay", "animation-direction", "animation-duration",
    "animation-fill-mode", "animation-iteration-count", "animation-name",
    "animation-play-state", "animation-timing-function", "appearance",
    "aspect-ratio", "backdrop-filter", "backface-visibility", "background",
    "background-attachment", "background-blend-mode", "background-clip",
    "background-color", "background-image", "background-origin",
    "background-position", "background-repeat", "background-size",
    "block-size", "border", "border-block", "border-bottom",
    "border-bottom-color", "border-bottom-left-radius",
    "border-bottom-right-radius", "border-bottom-style", "border-bottom-width",
    "border-collapse", "border-color", "border-image", "border-inline",
    "border-left", "border-left-color", "border-left-style", "border-left-width",
    "border-radius", "border-right", "border-right-color", "border-right-style",
    "border-right-width", "border-spacing", "border-style", "border-top",
    "border-top-color", "border-top-left-radius", "border-top-right-radius",
    "border-top-style", "border-top-width", "border-width", "bottom",
    "box-shadow", "box-sizing", "break-after", "break-before", "break-inside",
    "caption-side", "caret-color", "clear", "clip", "clip-path", "color",
    "column-count", "column-gap", "column-rule", "column-span", "column-width",
    "columns", "contain", "container", "container-name", "container-type",
    "content", "counter-increment", "counter-reset", "cursor", "direction",
    "display", "empty-cells", "fill", "filter", "flex", "flex-basis",
    "flex-direction", "flex-flow", "flex-grow", "flex-shrink", "flex-wrap",
    "float", "font", "font-display", "font-family", "font-feature-settings",
    "font-size", "font-stretch", "font-style", "font-variant", "font-weight",
    "gap", "grid", "grid-area", "grid-auto-columns", "grid-auto-flow",
    "grid-auto-rows", "grid-column", "grid-column-end", "grid-column-start",
    "grid-row", "grid-row-end", "grid-row-start", "grid-template",
    "grid-template-areas", "grid-template-columns", "grid-template-rows",
    "height", "hyphens", "inherits", "initial-value", "inline-size", "inset",
    "isolation", "justify-content", "justify-items", "justify-self", "left",
    "letter-spacing", "line-height", "list-style", "list-style-image",
    "list-style-position", "list-style-type", "margin", "margin-block",
    "margin-bottom", "margin-inline", "margin-left", "margin-right",
    "margin-top", "mask", "max-height", "max-width", "min-height", "min-width",
    "mix-blend-mode", "object-fit", "object-position", "opacity", "order",
    "orphans", "outline", "outline-color", "outline-offset", "outline-style",
    "outline-width", "overflow", "overflow-wrap", "overflow-x", "overflow-y",
    "padding", "padding-block", "padding-bottom", "padding-inline",
    "padding-left", "padding-right", "padding-top", "page-break-after",
    "page-break-before", "page-break-inside", "perspective",
    "perspective-origin", "place-content", "place-items", "place-self",
    "pointer-events", "position", "quotes", "resize", "right", "rotate",
    "row-gap", "scale", "scroll-behavior", "scroll-snap-type", "size", "src",
    "stroke", "stroke-width", "syntax", "tab-size", "table-layout",
    "text-align", "text-decoration", "text-decoration-color",
    "text-decoration-line", "text-decoration-style", "text-indent",
    "text-overflow", "text-shadow", "text-transform", "top", "transform",
    "transform-origin", "transform-style", "transition", "transition-delay",
    "transition-duration", "transition-property", "transition-timing-function",
    "translate", "unicode-bidi", "unicode-range", "user-select",
    "vertical-align", "visibility", "white-space", "widows", "width",
    "will-change", "word-break", "word-spacing", "word-wrap", "writing-mode",
    "z-index", "zoom",
};

/// Whether `unit` is a known dimension unit, ignoring ASCII case.
#[must_use]
pub fn is_known_unit(unit: &str) -> bool {
    UNITS.contains(unit) || UNITS.contains(unit.to_ascii_lowercase().as_str())
}

/// Request-scoped names supplied by the caller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CustomData {
    /// Extra property names.
    pub properties: Vec<String>,
    /// Extra at-rule names, with or without the leading `@`.
    pub at_directives: Vec<String>,
}

/// Read-only lookup over the shared tables plus optional custom data.
#[derive(Debug, Default, Clone)]
pub struct DataView {
    properties: Vec<String>,
    at_directives: Vec<String>,
}

impl DataView {
    /// View over the built-in tables only.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    /// View combining the built-in tables with `custom`.
    ///
    /// Names are normalised to lower case and at-rules to their `@` form.
    #[must_use]
    pub fn with_custom(custom: CustomData) -> Self {
        let properties = custom
            .properties
            .into_iter()
            .map(|p| p.to_ascii_lowercase())
            .collect();
        let at_directives = custom
            .at_directives
            .into_iter()
            .map(|d| normalise_at_rule(&d))
            .collect();
        Self {
            properties,
            at_directives,
        }
    }

    /// Whether `name` is a known property.
    ///
    /// Custom properties (`--x`) are always known; vendor prefixes are
    /// ignored when looking up the shared table.
    #[must_use]
    pub fn is_known_property(&self, name: &str) -> bool {
        if name.starts_with("--") {
            return true;
        }
        let lower = name.to_ascii_lowercase();
        if PROPERTIES.contains(lower.as_str()) || self.properties.contains(&lower) {
            return true;
        }
        strip_vendor_prefix(&lower).is_some_and(|bare| PROPERTIES.contains(bare))
    }

    /// Whether `name` (with or without `@`) is a known at-rule.
    #[must_use]
    pub fn is_known_at_rule(&self, name: &str) -> bool {
        let normalised = normalise_at_rule(name);
        AT_RULES.contains(normalised.as_str()) || self.at_directives.contains(&normalised)
    }
}

fn normalise_at_rule(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with('@') {
        lower
    } else {
        format!("@{lower}")
    }
}

fn strip_vendor_prefix(name: &str) -> Option<&str> {
    let rest = name.strip_prefix('-')?;
    let (_, bare) = rest.split_once('-')?;
    Some(bare)
}
