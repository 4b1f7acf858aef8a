use crate::components::{ElementRole, Shape, Style};
use crate::entity::ElementId;
use crate::surface::{HoverHandlers, SceneSurface, SurfaceError};
use crate::world::World;

/// World that starts rejecting creations or destructions once the matching
/// allowance is spent. `None` means unlimited.
pub(crate) struct LimitedSurface {
    pub world: World,
    pub creates_left: Option<usize>,
    pub destroys_left: Option<usize>,
}

impl LimitedSurface {
    pub fn new(world: World) -> Self {
        Self {
            world,
            creates_left: None,
            destroys_left: None,
        }
    }
}

fn spend(allowance: &mut Option<usize>, id: ElementId) -> Result<(), SurfaceError> {
    match allowance {
        Some(0) => Err(SurfaceError::UnknownElement(id)),
        Some(n) => {
            *n -= 1;
            Ok(())
        }
        None => Ok(()),
    }
}

impl SceneSurface for LimitedSurface {
    fn root(&self) -> ElementId {
        self.world.root()
    }

    fn create_group(&mut self, parent: ElementId, role: ElementRole) -> Result<ElementId, SurfaceError> {
        spend(&mut self.creates_left, parent)?;
        self.world.create_group(parent, role)
    }

    fn create_shape(&mut self, parent: ElementId, role: ElementRole, shape: Shape, style: Style) -> Result<ElementId, SurfaceError> {
        spend(&mut self.creates_left, parent)?;
        self.world.create_shape(parent, role, shape, style)
    }

    fn set_shape(&mut self, id: ElementId, shape: Shape) -> Result<(), SurfaceError> {
        self.world.set_shape(id, shape)
    }

    fn set_style(&mut self, id: ElementId, style: Style) -> Result<(), SurfaceError> {
        self.world.set_style(id, style)
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), SurfaceError> {
        self.world.set_visible(id, visible)
    }

    fn set_hover(&mut self, id: ElementId, handlers: HoverHandlers) -> Result<(), SurfaceError> {
        self.world.set_hover(id, handlers)
    }

    fn destroy(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        spend(&mut self.destroys_left, id)?;
        self.world.destroy(id)
    }

    fn contains(&self, id: ElementId) -> bool {
        self.world.contains(id)
    }
}
