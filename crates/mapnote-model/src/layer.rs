use std::fmt;
use std::str::FromStr;

/// The category a POI is filed under for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Accessibility,
    Classrooms,
    Custom,
    Eateries,
    Fitness,
    Lounges,
    Miscellaneous,
    Utilities,
    Washrooms,
}

impl Layer {
    /// Every layer, in declaration order.
    pub const ALL: [Layer; 9] = [
        Layer::Accessibility,
        Layer::Classrooms,
        Layer::Custom,
        Layer::Eateries,
        Layer::Fitness,
        Layer::Lounges,
        Layer::Miscellaneous,
        Layer::Utilities,
        Layer::Washrooms,
    ];

    /// The enumeration name used in the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Accessibility => "accessibility",
            Layer::Classrooms => "classrooms",
            Layer::Custom => "custom",
            Layer::Eateries => "eateries",
            Layer::Fitness => "fitness",
            Layer::Lounges => "lounges",
            Layer::Miscellaneous => "miscellaneous",
            Layer::Utilities => "utilities",
            Layer::Washrooms => "washrooms",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Layer::Accessibility => "Accessibility",
            Layer::Classrooms => "Classrooms",
            Layer::Custom => "Custom",
            Layer::Eateries => "Eateries",
            Layer::Fitness => "Fitness",
            Layer::Lounges => "Lounges",
            Layer::Miscellaneous => "Miscellaneous",
            Layer::Utilities => "Utilities",
            Layer::Washrooms => "Washrooms",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layer: {0}")]
pub struct UnknownLayer(pub String);

impl FromStr for Layer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}
