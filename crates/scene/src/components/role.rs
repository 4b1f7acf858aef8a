/// What an element stands for. Used for queries and SVG class names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Root,
    /// Top-level container (boundaries or routes).
    Layer,
    /// One record's route, marker and arrowhead.
    RouteGroup,
    Route,
    Marker,
    Arrowhead,
    Boundary,
}

impl ElementRole {
    pub fn is_container(self) -> bool {
        matches!(self, ElementRole::Root | ElementRole::Layer | ElementRole::RouteGroup)
    }

    pub fn class_name(self) -> &'static str {
        match self {
            ElementRole::Root => "root",
            ElementRole::Layer => "layer",
            ElementRole::RouteGroup => "route-group",
            ElementRole::Route => "route",
            ElementRole::Marker => "marker",
            ElementRole::Arrowhead => "arrow",
            ElementRole::Boundary => "boundary",
        }
    }
}
