//! Retained scene contract: elements are created, attributed and destroyed
//! individually, and carry their own hover handlers.

use std::rc::Rc;

use foundation::math::Vec2;

use crate::components::{ElementRole, Shape, Style};
use crate::entity::ElementId;
use crate::overlay::InteractionOverlay;

pub type HoverHandler = Rc<dyn Fn(&mut dyn InteractionOverlay)>;

#[derive(Clone, Default)]
pub struct HoverHandlers {
    pub enter: Option<HoverHandler>,
    pub leave: Option<HoverHandler>,
}

impl HoverHandlers {
    pub fn new(enter: HoverHandler, leave: HoverHandler) -> Self {
        Self {
            enter: Some(enter),
            leave: Some(leave),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enter.is_none() && self.leave.is_none()
    }
}

impl std::fmt::Debug for HoverHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverHandlers")
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    UnknownElement(ElementId),
    NotAGroup(ElementId),
    RootElement,
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::UnknownElement(id) => write!(f, "unknown element {id}"),
            SurfaceError::NotAGroup(id) => write!(f, "element {id} cannot hold children"),
            SurfaceError::RootElement => write!(f, "the root element cannot be destroyed"),
        }
    }
}

impl std::error::Error for SurfaceError {}

pub trait SceneSurface {
    fn root(&self) -> ElementId;

    fn create_group(&mut self, parent: ElementId, role: ElementRole) -> Result<ElementId, SurfaceError>;

    fn create_shape(
        &mut self,
        parent: ElementId,
        role: ElementRole,
        shape: Shape,
        style: Style,
    ) -> Result<ElementId, SurfaceError>;

    fn set_shape(&mut self, id: ElementId, shape: Shape) -> Result<(), SurfaceError>;

    fn set_style(&mut self, id: ElementId, style: Style) -> Result<(), SurfaceError>;

    fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), SurfaceError>;

    /// Replaces the element's hover handlers.
    fn set_hover(&mut self, id: ElementId, handlers: HoverHandlers) -> Result<(), SurfaceError>;

    /// Removes the element and its whole subtree.
    fn destroy(&mut self, id: ElementId) -> Result<(), SurfaceError>;

    fn contains(&self, id: ElementId) -> bool;
}

/// Pointer input routed to hover handlers.
pub trait PointerTarget {
    fn pointer_move(&mut self, position: Vec2, overlay: &mut dyn InteractionOverlay);

    fn pointer_leave(&mut self, overlay: &mut dyn InteractionOverlay);
}
