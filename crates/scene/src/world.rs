use foundation::Arena;
use foundation::math::Vec2;
use projection::format_coord;

use crate::components::{ElementRole, Shape, Style};
use crate::entity::ElementId;
use crate::overlay::InteractionOverlay;
use crate::picking::pick;
use crate::surface::{HoverHandler, HoverHandlers, PointerTarget, SceneSurface, SurfaceError};

#[derive(Debug, Clone)]
pub struct Element {
    pub role: ElementRole,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub shape: Option<Shape>,
    pub style: Style,
    pub visible: bool,
    pub hover: HoverHandlers,
}

impl Element {
    fn new(role: ElementRole, parent: Option<ElementId>) -> Self {
        Self {
            role,
            parent,
            children: Vec::new(),
            shape: None,
            style: Style::none(),
            visible: true,
            hover: HoverHandlers::default(),
        }
    }

    fn can_hold_children(&self) -> bool {
        self.role.is_container() && self.shape.is_none()
    }
}

/// Mutation counters since construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub created: usize,
    pub destroyed: usize,
    pub attribute_writes: usize,
}

/// In-memory retained scene with hover picking.
#[derive(Debug)]
pub struct World {
    elements: Arena<Element>,
    root: ElementId,
    hovered: Option<ElementId>,
    hit_tolerance: f64,
    stats: WorldStats,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub const DEFAULT_HIT_TOLERANCE: f64 = 3.0;

    pub fn new() -> Self {
        let mut elements = Arena::new();
        let root = ElementId(elements.alloc(Element::new(ElementRole::Root, None)));
        Self {
            elements,
            root,
            hovered: None,
            hit_tolerance: Self::DEFAULT_HIT_TOLERANCE,
            stats: WorldStats::default(),
        }
    }

    pub fn with_hit_tolerance(mut self, tolerance: f64) -> Self {
        self.hit_tolerance = tolerance.max(0.0);
        self
    }

    pub fn hit_tolerance(&self) -> f64 {
        self.hit_tolerance
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Live elements, the root included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Pre-order walk from the root; siblings in creation order.
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.elements.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.element(id) else {
                continue;
            };
            out.push(id);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }

    pub fn elements_with_role(&self, role: ElementRole) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|e| e.role == role))
            .collect()
    }

    /// Visible itself and through every ancestor.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.element(current) {
                Some(e) if e.visible => cursor = e.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_svg(self.root, &mut out);
        out
    }

    fn write_svg(&self, id: ElementId, out: &mut String) {
        let Some(e) = self.element(id) else {
            return;
        };
        let mut attrs = format!(" class=\"{}\"", e.role.class_name());
        let css = e.style.to_css();
        if !css.is_empty() {
            attrs.push_str(&format!(" style=\"{css}\""));
        }
        if !e.visible {
            attrs.push_str(" display=\"none\"");
        }
        match &e.shape {
            None => {
                out.push_str(&format!("<g{attrs}>"));
                for child in &e.children {
                    self.write_svg(*child, out);
                }
                out.push_str("</g>");
            }
            Some(Shape::Path(path)) => {
                out.push_str(&format!("<path{attrs} d=\"{}\"/>", path.to_svg()));
            }
            Some(Shape::Circle { center, radius }) => {
                out.push_str(&format!(
                    "<circle{attrs} cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                    format_coord(center.x),
                    format_coord(center.y),
                    format_coord(*radius)
                ));
            }
            Some(Shape::Polygon(points)) => {
                let points: Vec<String> = points
                    .iter()
                    .map(|p| format!("{},{}", format_coord(p.x), format_coord(p.y)))
                    .collect();
                out.push_str(&format!("<polygon{attrs} points=\"{}\"/>", points.join(" ")));
            }
        }
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, SurfaceError> {
        self.stats.attribute_writes += 1;
        self.elements.get_mut(id.0).ok_or(SurfaceError::UnknownElement(id))
    }

    fn attach(&mut self, parent: ElementId, element: Element) -> Result<ElementId, SurfaceError> {
        match self.element(parent) {
            None => return Err(SurfaceError::UnknownElement(parent)),
            Some(p) if !p.can_hold_children() => return Err(SurfaceError::NotAGroup(parent)),
            Some(_) => {}
        }
        let id = ElementId(self.elements.alloc(element));
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.children.push(id);
        }
        self.stats.created += 1;
        Ok(id)
    }

    fn handler(&self, id: ElementId, pick_handler: impl Fn(&HoverHandlers) -> Option<HoverHandler>) -> Option<HoverHandler> {
        self.element(id).and_then(|e| pick_handler(&e.hover))
    }
}

impl SceneSurface for World {
    fn root(&self) -> ElementId {
        self.root
    }

    fn create_group(&mut self, parent: ElementId, role: ElementRole) -> Result<ElementId, SurfaceError> {
        self.attach(parent, Element::new(role, Some(parent)))
    }

    fn create_shape(
        &mut self,
        parent: ElementId,
        role: ElementRole,
        shape: Shape,
        style: Style,
    ) -> Result<ElementId, SurfaceError> {
        let mut element = Element::new(role, Some(parent));
        element.shape = Some(shape);
        element.style = style;
        self.attach(parent, element)
    }

    fn set_shape(&mut self, id: ElementId, shape: Shape) -> Result<(), SurfaceError> {
        self.element_mut(id)?.shape = Some(shape);
        Ok(())
    }

    fn set_style(&mut self, id: ElementId, style: Style) -> Result<(), SurfaceError> {
        self.element_mut(id)?.style = style;
        Ok(())
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), SurfaceError> {
        self.element_mut(id)?.visible = visible;
        Ok(())
    }

    fn set_hover(&mut self, id: ElementId, handlers: HoverHandlers) -> Result<(), SurfaceError> {
        self.element_mut(id)?.hover = handlers;
        Ok(())
    }

    fn destroy(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        if id == self.root {
            return Err(SurfaceError::RootElement);
        }
        let parent = self
            .element(id)
            .ok_or(SurfaceError::UnknownElement(id))?
            .parent;
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(p.0)) {
            parent.children.retain(|c| *c != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.elements.remove(current.0) {
                stack.extend(removed.children);
                self.stats.destroyed += 1;
                if self.hovered == Some(current) {
                    self.hovered = None;
                }
            }
        }
        Ok(())
    }

    fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(id.0)
    }
}

impl PointerTarget for World {
    fn pointer_move(&mut self, position: Vec2, overlay: &mut dyn InteractionOverlay) {
        let hit = pick(self, position, self.hit_tolerance);
        if hit == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take()
            && let Some(leave) = self.handler(previous, |h| h.leave.clone())
        {
            leave(overlay);
        }
        self.hovered = hit;
        if let Some(current) = hit
            && let Some(enter) = self.handler(current, |h| h.enter.clone())
        {
            enter(overlay);
        }
    }

    fn pointer_leave(&mut self, overlay: &mut dyn InteractionOverlay) {
        if let Some(previous) = self.hovered.take()
            && let Some(leave) = self.handler(previous, |h| h.leave.clone())
        {
            leave(overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{World, WorldStats};
    use crate::components::{ElementRole, Shape, Style};
    use crate::overlay::{InteractionOverlay, TooltipOverlay};
    use crate::surface::{HoverHandlers, PointerTarget, SceneSurface, SurfaceError};
    use flows::{Color, GeoLocation};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    fn dot(center: Vec2) -> Shape {
        Shape::Circle { center, radius: 3.0 }
    }

    fn location_handlers(ip: &str) -> HoverHandlers {
        let mut location = GeoLocation::at(0.0, 0.0);
        location.ip_address = ip.to_string();
        HoverHandlers::new(
            Rc::new(move |o: &mut dyn InteractionOverlay| o.show_location_info(&location)),
            Rc::new(|o: &mut dyn InteractionOverlay| o.hide()),
        )
    }

    #[test]
    fn destroy_removes_subtree_and_detaches() {
        let mut world = World::new();
        let root = world.root();
        let group = world.create_group(root, ElementRole::RouteGroup).expect("group");
        let a = world
            .create_shape(group, ElementRole::Marker, dot(Vec2::ZERO), Style::none())
            .expect("marker");
        let b = world
            .create_shape(group, ElementRole::Arrowhead, Shape::Polygon(vec![]), Style::none())
            .expect("arrow");
        assert_eq!(world.len(), 4);

        world.destroy(group).expect("destroy");
        assert!(!world.contains(group));
        assert!(!world.contains(a));
        assert!(!world.contains(b));
        assert_eq!(world.document_order(), vec![root]);
        assert_eq!(
            world.stats(),
            WorldStats {
                created: 3,
                destroyed: 3,
                attribute_writes: 0
            }
        );
        assert_eq!(world.destroy(group), Err(SurfaceError::UnknownElement(group)));
        assert_eq!(world.destroy(root), Err(SurfaceError::RootElement));
    }

    #[test]
    fn shapes_cannot_hold_children() {
        let mut world = World::new();
        let root = world.root();
        let marker = world
            .create_shape(root, ElementRole::Marker, dot(Vec2::ZERO), Style::none())
            .expect("marker");
        assert_eq!(
            world.create_group(marker, ElementRole::RouteGroup),
            Err(SurfaceError::NotAGroup(marker))
        );
    }

    #[test]
    fn hover_enters_topmost_and_leaves() {
        let mut world = World::new();
        let root = world.root();
        let below = world
            .create_shape(root, ElementRole::Marker, dot(Vec2::new(10.0, 10.0)), Style::none())
            .expect("below");
        let above = world
            .create_shape(root, ElementRole::Marker, dot(Vec2::new(11.0, 10.0)), Style::none())
            .expect("above");
        world.set_hover(below, location_handlers("10.0.0.1")).expect("hover");
        world.set_hover(above, location_handlers("10.0.0.2")).expect("hover");

        let mut overlay = TooltipOverlay::new();
        world.pointer_move(Vec2::new(10.5, 10.0), &mut overlay);
        assert_eq!(world.hovered(), Some(above));
        assert_eq!(overlay.current().map(|c| c.header.as_str()), Some("10.0.0.2"));

        world.set_visible(above, false).expect("hide");
        world.pointer_move(Vec2::new(10.4, 10.0), &mut overlay);
        assert_eq!(world.hovered(), Some(below));
        assert_eq!(overlay.current().map(|c| c.header.as_str()), Some("10.0.0.1"));

        world.pointer_move(Vec2::new(100.0, 100.0), &mut overlay);
        assert_eq!(world.hovered(), None);
        assert!(!overlay.is_visible());
    }

    #[test]
    fn pointer_leave_hides_once() {
        let mut world = World::new();
        let root = world.root();
        let marker = world
            .create_shape(root, ElementRole::Marker, dot(Vec2::ZERO), Style::none())
            .expect("marker");
        world.set_hover(marker, location_handlers("10.0.0.9")).expect("hover");

        let mut overlay = TooltipOverlay::new();
        world.pointer_move(Vec2::new(1.0, 1.0), &mut overlay);
        assert!(overlay.is_visible());
        world.pointer_leave(&mut overlay);
        assert!(!overlay.is_visible());
        assert_eq!(world.hovered(), None);
    }

    #[test]
    fn svg_reflects_tree() {
        let mut world = World::new();
        let root = world.root();
        let layer = world.create_group(root, ElementRole::Layer).expect("layer");
        world
            .create_shape(
                layer,
                ElementRole::Marker,
                Shape::Circle {
                    center: Vec2::new(1.5, 2.0),
                    radius: 3.0,
                },
                Style::fill(Color::RED),
            )
            .expect("marker");
        let arrow = world
            .create_shape(
                layer,
                ElementRole::Arrowhead,
                Shape::Polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]),
                Style::none(),
            )
            .expect("arrow");
        world.set_visible(arrow, false).expect("hide");

        assert_eq!(
            world.to_svg(),
            "<g class=\"root\"><g class=\"layer\">\
             <circle class=\"marker\" style=\"fill: #ff0000;\" cx=\"1.5\" cy=\"2\" r=\"3\"/>\
             <polygon class=\"arrow\" display=\"none\" points=\"0,0 1,0 0,1\"/>\
             </g></g>"
        );
    }
}
