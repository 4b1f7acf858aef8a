use foundation::handles::Handle;

/// Identity of one element in a retained scene.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub Handle);

impl ElementId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.0.index(), self.0.generation())
    }
}
