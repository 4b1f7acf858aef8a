//! Keyed enter/update/exit synchronization of flow records with route groups.

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use flows::{Color, ColorScale, Endpoint, FlowId, FlowRecord, RecordError};
use foundation::math::Vec2;
use projection::{BaseSignature, GeoProjector, Geometry, PathDescriptor};
use tracing::{debug, warn};

use crate::arrow::arrowhead_points;
use crate::components::{ElementRole, Shape, Style};
use crate::config::SceneConfig;
use crate::entity::ElementId;
use crate::overlay::InteractionOverlay;
use crate::surface::{HoverHandler, HoverHandlers, SceneSurface, SurfaceError};

#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    InvalidRecord { position: usize, source: RecordError },
    DuplicateId(FlowId),
    Surface(SurfaceError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::InvalidRecord { position, source } => {
                write!(f, "invalid record at position {position}: {source}")
            }
            SyncError::DuplicateId(id) => write!(f, "duplicate record id {id}"),
            SyncError::Surface(err) => write!(f, "scene surface error: {err}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::InvalidRecord { source, .. } => Some(source),
            SyncError::Surface(err) => Some(err),
            SyncError::DuplicateId(_) => None,
        }
    }
}

impl From<SurfaceError> for SyncError {
    fn from(err: SurfaceError) -> Self {
        SyncError::Surface(err)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
    pub restyled: usize,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RepaintReport {
    pub groups: usize,
    /// Groups whose base path had to be projected again.
    pub reprojected: usize,
}

/// Route path in base screen space, valid while the projector's base
/// signature is unchanged.
#[derive(Debug, Clone)]
struct BaseRoute {
    signature: BaseSignature,
    path: PathDescriptor,
}

impl BaseRoute {
    fn project(record: &FlowRecord, projector: &GeoProjector) -> Self {
        let geometry = Geometry::route(record.src.point(), record.dst.point());
        Self {
            signature: projector.base_signature(),
            path: projector.base_path_for(&geometry),
        }
    }
}

/// Screen geometry of one group under the current projector.
struct RouteLayout {
    route: PathDescriptor,
    marker: Option<Vec2>,
    arrow: Option<[Vec2; 3]>,
}

impl RouteLayout {
    fn new(record: &FlowRecord, base: &BaseRoute, projector: &GeoProjector, config: &SceneConfig) -> Self {
        let route = base.path.transformed(&projector.affine());
        let marker = projector.project_visible(record.src.point());
        let arrow = if projector.is_visible(record.dst.point()) {
            arrowhead_points(&route, config.arrow_size)
        } else {
            None
        };
        Self { route, marker, arrow }
    }
}

/// Route, source marker and arrowhead of one record, destroyed as a unit.
#[derive(Debug)]
pub struct RenderedElementGroup {
    group: ElementId,
    route: ElementId,
    marker: ElementId,
    arrow: ElementId,
    record: Rc<FlowRecord>,
    color: Color,
    base: BaseRoute,
}

impl RenderedElementGroup {
    pub fn group(&self) -> ElementId {
        self.group
    }

    pub fn route(&self) -> ElementId {
        self.route
    }

    pub fn marker(&self) -> ElementId {
        self.marker
    }

    pub fn arrow(&self) -> ElementId {
        self.arrow
    }

    pub fn record(&self) -> &Rc<FlowRecord> {
        &self.record
    }

    pub fn color(&self) -> Color {
        self.color
    }

    fn apply(&self, surface: &mut dyn SceneSurface, layout: RouteLayout, config: &SceneConfig) -> Result<(), SurfaceError> {
        surface.set_shape(self.route, Shape::Path(layout.route))?;
        if let Some(center) = layout.marker {
            surface.set_shape(
                self.marker,
                Shape::Circle {
                    center,
                    radius: config.marker_radius,
                },
            )?;
        }
        surface.set_visible(self.marker, layout.marker.is_some())?;
        if let Some(points) = layout.arrow {
            surface.set_shape(self.arrow, Shape::Polygon(points.to_vec()))?;
        }
        surface.set_visible(self.arrow, layout.arrow.is_some())?;
        Ok(())
    }

    fn register_hover(&self, surface: &mut dyn SceneSurface) -> Result<(), SurfaceError> {
        surface.set_hover(self.route, transfer_hover(&self.record))?;
        surface.set_hover(self.marker, location_hover(&self.record, Endpoint::Source))?;
        surface.set_hover(self.arrow, location_hover(&self.record, Endpoint::Destination))?;
        Ok(())
    }
}

fn hide_handler() -> HoverHandler {
    Rc::new(|overlay: &mut dyn InteractionOverlay| overlay.hide())
}

fn transfer_hover(record: &Rc<FlowRecord>) -> HoverHandlers {
    let record = Rc::clone(record);
    HoverHandlers::new(
        Rc::new(move |overlay: &mut dyn InteractionOverlay| overlay.show_transfer_info(&record)),
        hide_handler(),
    )
}

fn location_hover(record: &Rc<FlowRecord>, endpoint: Endpoint) -> HoverHandlers {
    let record = Rc::clone(record);
    HoverHandlers::new(
        Rc::new(move |overlay: &mut dyn InteractionOverlay| {
            overlay.show_location_info(record.location(endpoint))
        }),
        hide_handler(),
    )
}

/// Owns the id -> group map for the routes layer.
#[derive(Debug)]
pub struct SceneSynchronizer {
    layer: ElementId,
    config: SceneConfig,
    groups: BTreeMap<FlowId, RenderedElementGroup>,
}

impl SceneSynchronizer {
    /// Creates the routes layer above anything already under the root.
    pub fn new(surface: &mut dyn SceneSurface, config: SceneConfig) -> Result<Self, SurfaceError> {
        let root = surface.root();
        let layer = surface.create_group(root, ElementRole::Layer)?;
        Ok(Self {
            layer,
            config,
            groups: BTreeMap::new(),
        })
    }

    pub fn layer(&self) -> ElementId {
        self.layer
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rendered ids in ascending order.
    pub fn rendered_ids(&self) -> Vec<FlowId> {
        self.groups.keys().cloned().collect()
    }

    pub fn group(&self, id: &FlowId) -> Option<&RenderedElementGroup> {
        self.groups.get(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&FlowId, &RenderedElementGroup)> + '_ {
        self.groups.iter()
    }

    /// Makes the rendered set equal to `records`, touching only the delta.
    ///
    /// Every record is validated before the surface is touched; any invalid
    /// or repeated id fails the whole call.
    pub fn sync(
        &mut self,
        surface: &mut dyn SceneSurface,
        records: &[Rc<FlowRecord>],
        scale: &dyn ColorScale,
        projector: &GeoProjector,
    ) -> Result<SyncReport, SyncError> {
        let mut incoming: HashSet<&FlowId> = HashSet::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|source| SyncError::InvalidRecord { position, source })?;
            if !incoming.insert(&record.id) {
                return Err(SyncError::DuplicateId(record.id.clone()));
            }
        }

        let mut report = SyncReport::default();

        let exiting: Vec<FlowId> = self
            .groups
            .keys()
            .filter(|id| !incoming.contains(*id))
            .cloned()
            .collect();
        for id in exiting {
            if let Some(group) = self.groups.get(&id) {
                surface.destroy(group.group)?;
                self.groups.remove(&id);
                report.exited += 1;
            }
        }

        for record in records {
            let color = scale.color_for(record.byte_size);
            if let Some(group) = self.groups.get_mut(&record.id) {
                report.updated += 1;
                if Self::update(surface, group, record, color, projector, &self.config)? {
                    report.restyled += 1;
                }
                continue;
            }
            let group = self.enter(surface, record, color, projector)?;
            self.groups.insert(record.id.clone(), group);
            report.entered += 1;
        }

        debug!(
            entered = report.entered,
            updated = report.updated,
            exited = report.exited,
            restyled = report.restyled,
            "scene synced"
        );
        Ok(report)
    }

    /// Geometry-only repaint of every group. Never creates or destroys groups.
    pub fn refresh(&mut self, surface: &mut dyn SceneSurface, projector: &GeoProjector) -> Result<RepaintReport, SyncError> {
        let signature = projector.base_signature();
        let mut report = RepaintReport {
            groups: self.groups.len(),
            reprojected: 0,
        };
        for group in self.groups.values_mut() {
            if group.base.signature != signature {
                group.base = BaseRoute::project(&group.record, projector);
                report.reprojected += 1;
            }
            let layout = RouteLayout::new(&group.record, &group.base, projector, &self.config);
            group.apply(surface, layout, &self.config)?;
        }
        debug!(groups = report.groups, reprojected = report.reprojected, "routes repainted");
        Ok(report)
    }

    fn enter(
        &self,
        surface: &mut dyn SceneSurface,
        record: &Rc<FlowRecord>,
        color: Color,
        projector: &GeoProjector,
    ) -> Result<RenderedElementGroup, SurfaceError> {
        let base = BaseRoute::project(record, projector);
        let layout = RouteLayout::new(record, &base, projector, &self.config);

        let group = surface.create_group(self.layer, ElementRole::RouteGroup)?;
        match self.populate(surface, group, record, color, base, layout) {
            Ok(rendered) => Ok(rendered),
            Err(err) => {
                if let Err(cleanup) = surface.destroy(group) {
                    warn!(%group, error = %cleanup, "partial route group left on surface");
                }
                Err(err)
            }
        }
    }

    fn populate(
        &self,
        surface: &mut dyn SceneSurface,
        group: ElementId,
        record: &Rc<FlowRecord>,
        color: Color,
        base: BaseRoute,
        layout: RouteLayout,
    ) -> Result<RenderedElementGroup, SurfaceError> {
        let route = surface.create_shape(group, ElementRole::Route, Shape::Path(layout.route.clone()), Style::stroke(color))?;
        let arrow = surface.create_shape(group, ElementRole::Arrowhead, Shape::Polygon(Vec::new()), Style::none())?;
        let marker = surface.create_shape(
            group,
            ElementRole::Marker,
            Shape::Circle {
                center: Vec2::ZERO,
                radius: self.config.marker_radius,
            },
            Style::none(),
        )?;

        let rendered = RenderedElementGroup {
            group,
            route,
            marker,
            arrow,
            record: Rc::clone(record),
            color,
            base,
        };
        rendered.apply(surface, layout, &self.config)?;
        rendered.register_hover(surface)?;
        Ok(rendered)
    }

    /// Returns whether the route was restyled.
    fn update(
        surface: &mut dyn SceneSurface,
        group: &mut RenderedElementGroup,
        record: &Rc<FlowRecord>,
        color: Color,
        projector: &GeoProjector,
        config: &SceneConfig,
    ) -> Result<bool, SurfaceError> {
        let restyle = color != group.color;
        if restyle {
            surface.set_style(group.route, Style::stroke(color))?;
            group.color = color;
        }
        if Rc::ptr_eq(&group.record, record) {
            return Ok(restyle);
        }

        let moved = group.record.src.point() != record.src.point() || group.record.dst.point() != record.dst.point();
        group.record = Rc::clone(record);
        if moved {
            group.base = BaseRoute::project(record, projector);
            let layout = RouteLayout::new(record, &group.base, projector, config);
            group.apply(surface, layout, config)?;
        }
        group.register_hover(surface)?;
        Ok(restyle)
    }
}
