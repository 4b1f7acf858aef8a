use projection::{BaseSignature, GeoProjector, MapFeature, PathDescriptor};
use tracing::debug;

use crate::components::{ElementRole, Shape, Style};
use crate::entity::ElementId;
use crate::surface::{SceneSurface, SurfaceError};
use crate::sync::RepaintReport;

#[derive(Debug)]
struct RenderedBoundary {
    element: ElementId,
    feature: MapFeature,
    signature: BaseSignature,
    base: PathDescriptor,
}

/// Country outlines drawn in their own group. Create it before the routes
/// layer so it paints beneath them.
#[derive(Debug)]
pub struct BoundaryLayer {
    layer: ElementId,
    boundaries: Vec<RenderedBoundary>,
}

impl BoundaryLayer {
    pub fn new(surface: &mut dyn SceneSurface) -> Result<Self, SurfaceError> {
        let root = surface.root();
        let layer = surface.create_group(root, ElementRole::Layer)?;
        Ok(Self {
            layer,
            boundaries: Vec::new(),
        })
    }

    pub fn layer(&self) -> ElementId {
        self.layer
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.boundaries.iter().map(|b| b.element)
    }

    /// Replaces every rendered feature.
    pub fn set_features(
        &mut self,
        surface: &mut dyn SceneSurface,
        features: Vec<MapFeature>,
        projector: &GeoProjector,
    ) -> Result<usize, SurfaceError> {
        while let Some(old) = self.boundaries.last() {
            surface.destroy(old.element)?;
            self.boundaries.pop();
        }
        let signature = projector.base_signature();
        for feature in features {
            let base = projector.base_path_for(&feature.geometry);
            let path = base.transformed(&projector.affine());
            let visible = !path.is_empty();
            let element = surface.create_shape(self.layer, ElementRole::Boundary, Shape::Path(path), Style::none())?;
            if !visible {
                debug!(geometry = feature.geometry.type_name(), "boundary feature has no drawable path");
            }
            self.boundaries.push(RenderedBoundary {
                element,
                feature,
                signature,
                base,
            });
            if !visible {
                surface.set_visible(element, false)?;
            }
        }
        debug!(features = self.boundaries.len(), "boundaries rendered");
        Ok(self.boundaries.len())
    }

    pub fn refresh(&mut self, surface: &mut dyn SceneSurface, projector: &GeoProjector) -> Result<RepaintReport, SurfaceError> {
        let signature = projector.base_signature();
        let affine = projector.affine();
        let mut report = RepaintReport {
            groups: self.boundaries.len(),
            reprojected: 0,
        };
        for boundary in &mut self.boundaries {
            if boundary.signature != signature {
                boundary.base = projector.base_path_for(&boundary.feature.geometry);
                boundary.signature = signature;
                report.reprojected += 1;
            }
            let path = boundary.base.transformed(&affine);
            let visible = !path.is_empty();
            surface.set_shape(boundary.element, Shape::Path(path))?;
            surface.set_visible(boundary.element, visible)?;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::BoundaryLayer;
    use crate::World;
    use crate::components::ElementRole;
    use crate::sync::RepaintReport;
    use crate::surface::SceneSurface;
    use crate::testing::LimitedSurface;
    use foundation::math::{GeoPoint, Vec2};
    use pretty_assertions::assert_eq;
    use projection::{Affine, GeoProjector, Geometry, MapFeature, ProjectionKind, ProjectionOptions, Rotation};

    fn features() -> Vec<MapFeature> {
        let square = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(0.0, 0.0),
        ];
        vec![
            MapFeature::new(Geometry::Polygon(vec![square])),
            MapFeature::new(Geometry::Point(GeoPoint::new(5.0, 5.0))),
        ]
    }

    #[test]
    fn replaces_features_and_hides_empty_paths() {
        let mut world = World::new();
        let mut layer = BoundaryLayer::new(&mut world).expect("layer");
        let projector = GeoProjector::default();

        assert_eq!(layer.set_features(&mut world, features(), &projector), Ok(2));
        let ids: Vec<_> = layer.elements().collect();
        assert_eq!(world.elements_with_role(ElementRole::Boundary), ids);
        assert_eq!(world.element(ids[0]).map(|e| e.visible), Some(true));
        assert_eq!(world.element(ids[1]).map(|e| e.visible), Some(false));

        assert_eq!(layer.set_features(&mut world, features()[..1].to_vec(), &projector), Ok(1));
        assert!(!world.contains(ids[0]));
        assert_eq!(world.elements_with_role(ElementRole::Boundary).len(), 1);
    }

    #[test]
    fn zoom_reuses_base_paths() {
        let mut world = World::new();
        let mut layer = BoundaryLayer::new(&mut world).expect("layer");
        let flat = GeoProjector::default();
        layer.set_features(&mut world, features(), &flat).expect("features");

        let zoomed = flat.with_affine(Affine::new(2.0, Vec2::ZERO));
        assert_eq!(
            layer.refresh(&mut world, &zoomed),
            Ok(RepaintReport { groups: 2, reprojected: 0 })
        );

        let globe = GeoProjector::new(ProjectionKind::Globe, Rotation::IDENTITY, Affine::IDENTITY, ProjectionOptions::default());
        assert_eq!(
            layer.refresh(&mut world, &globe),
            Ok(RepaintReport { groups: 2, reprojected: 2 })
        );
        assert_eq!(
            layer.refresh(&mut world, &globe),
            Ok(RepaintReport { groups: 2, reprojected: 0 })
        );
    }

    #[test]
    fn failed_teardown_keeps_remaining_features_tracked() {
        let mut surface = LimitedSurface::new(World::new());
        let mut layer = BoundaryLayer::new(&mut surface).expect("layer");
        let projector = GeoProjector::default();
        let mut three = features();
        three.extend(features()[..1].to_vec());
        assert_eq!(layer.set_features(&mut surface, three, &projector), Ok(3));

        surface.destroys_left = Some(1);
        assert!(layer.set_features(&mut surface, Vec::new(), &projector).is_err());
        assert_eq!(layer.len(), 2);
        assert!(layer.elements().all(|id| surface.world.contains(id)));
        assert_eq!(surface.world.elements_with_role(ElementRole::Boundary).len(), 2);
    }
}
