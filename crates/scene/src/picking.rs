use foundation::math::Vec2;

use crate::World;
use crate::entity::ElementId;

/// Topmost hoverable element under `position`.
///
/// Ordering contract:
/// - Later elements in document order paint above earlier ones, so the last
///   hit wins.
/// - Only rendered elements (visible through every ancestor) that carry an
///   enter handler are candidates.
/// - Strokes count as hit within `tolerance` pixels.
pub fn pick(world: &World, position: Vec2, tolerance: f64) -> Option<ElementId> {
    world.document_order().into_iter().rev().find(|id| {
        let Some(element) = world.element(*id) else {
            return false;
        };
        let Some(shape) = &element.shape else {
            return false;
        };
        element.hover.enter.is_some()
            && shape
                .bounds()
                .is_some_and(|b| b.inflate(tolerance).contains(position))
            && world.is_rendered(*id)
            && shape.hit(position, tolerance)
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::pick;
    use crate::World;
    use crate::components::{ElementRole, Shape, Style};
    use crate::overlay::InteractionOverlay;
    use crate::surface::{HoverHandlers, SceneSurface};
    use foundation::math::Vec2;
    use projection::{PathDescriptor, SubPath};

    fn hide_handlers() -> HoverHandlers {
        HoverHandlers::new(
            Rc::new(|o: &mut dyn InteractionOverlay| o.hide()),
            Rc::new(|o: &mut dyn InteractionOverlay| o.hide()),
        )
    }

    #[test]
    fn skips_elements_without_handlers_and_hidden_groups() {
        let mut world = World::new();
        let root = world.root();
        let group = world.create_group(root, ElementRole::RouteGroup).expect("group");
        let line = PathDescriptor::new(vec![SubPath::open(vec![Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0)])]);
        let route = world
            .create_shape(group, ElementRole::Route, Shape::Path(line), Style::none())
            .expect("route");
        let boundary = world
            .create_shape(
                root,
                ElementRole::Boundary,
                Shape::Polygon(vec![Vec2::new(-5.0, -5.0), Vec2::new(30.0, -5.0), Vec2::new(30.0, 5.0)]),
                Style::none(),
            )
            .expect("boundary");

        assert_eq!(pick(&world, Vec2::new(10.0, 1.0), 2.0), None);

        world.set_hover(route, hide_handlers()).expect("hover");
        assert_eq!(pick(&world, Vec2::new(10.0, 1.0), 2.0), Some(route));
        assert_eq!(pick(&world, Vec2::new(10.0, 3.0), 2.0), None);

        world.set_visible(group, false).expect("hide");
        assert_eq!(pick(&world, Vec2::new(10.0, 1.0), 2.0), None);
        assert!(world.contains(boundary));
    }
}
