use std::time::Duration;

use flows::{Dataset, DatasetError, FlowId, FlowRecord, LinearColorScale, format_timestamp};
use formats::{FlowFormatError, MapFormatError, parse_flow_records, parse_map_features};
use foundation::Time;
use foundation::math::Vec2;
use projection::{MapFeature, ProjectionError, ProjectionKind};
use runtime::{Event, PlaybackError, PlaybackEvent, PlaybackMode, PlaybackScheduler};
use scene::{
    BoundaryLayer, PointerTarget, RepaintReport, SceneSurface, SceneSynchronizer, SurfaceError, SyncError,
    SyncReport, TooltipOverlay,
};
use tracing::{debug, info, warn};
use viewport::{Gesture, Repaint, ViewportController};

use crate::config::ViewerConfig;

#[derive(Debug)]
pub enum HostError {
    Surface(SurfaceError),
    Sync(SyncError),
    Projection(ProjectionError),
    Playback(PlaybackError),
    Dataset(DatasetError),
    FlowFormat(FlowFormatError),
    MapFormat(MapFormatError),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::Surface(err) => write!(f, "{err}"),
            HostError::Sync(err) => write!(f, "{err}"),
            HostError::Projection(err) => write!(f, "{err}"),
            HostError::Playback(err) => write!(f, "{err}"),
            HostError::Dataset(err) => write!(f, "{err}"),
            HostError::FlowFormat(err) => write!(f, "{err}"),
            HostError::MapFormat(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Surface(err) => Some(err),
            HostError::Sync(err) => Some(err),
            HostError::Projection(err) => Some(err),
            HostError::Playback(err) => Some(err),
            HostError::Dataset(err) => Some(err),
            HostError::FlowFormat(err) => Some(err),
            HostError::MapFormat(err) => Some(err),
        }
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for HostError {
                fn from(err: $ty) -> Self {
                    HostError::$variant(err)
                }
            }
        )*
    };
}

impl_from!(
    Surface(SurfaceError),
    Sync(SyncError),
    Projection(ProjectionError),
    Playback(PlaybackError),
    Dataset(DatasetError),
    FlowFormat(FlowFormatError),
    MapFormat(MapFormatError),
);

/// The flow map host.
///
/// Playback events are drained synchronously after every operation that can
/// produce them; cursor changes are coalesced into one scene sync.
#[derive(Debug)]
pub struct FlowMap<S: SceneSurface + PointerTarget> {
    surface: S,
    overlay: TooltipOverlay,
    viewport: ViewportController,
    scheduler: PlaybackScheduler,
    boundaries: BoundaryLayer,
    routes: SceneSynchronizer,
    dataset: Option<Dataset>,
    scale: LinearColorScale,
}

impl<S: SceneSurface + PointerTarget> FlowMap<S> {
    /// Boundaries are layered beneath routes.
    pub fn new(mut surface: S, config: &ViewerConfig) -> Result<Self, HostError> {
        let boundaries = BoundaryLayer::new(&mut surface)?;
        let routes = SceneSynchronizer::new(&mut surface, config.scene.clone())?;
        Ok(Self {
            surface,
            overlay: TooltipOverlay::new(),
            viewport: ViewportController::new(config.viewport.clone(), config.projection.clone()),
            scheduler: PlaybackScheduler::new(config.playback.clone()),
            boundaries,
            routes,
            dataset: None,
            scale: LinearColorScale::new(0),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn overlay(&self) -> &TooltipOverlay {
        &self.overlay
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    pub fn routes(&self) -> &SceneSynchronizer {
        &self.routes
    }

    pub fn boundaries(&self) -> &BoundaryLayer {
        &self.boundaries
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn color_scale(&self) -> &LinearColorScale {
        &self.scale
    }

    pub fn visible_ids(&self) -> Vec<FlowId> {
        self.routes.rendered_ids()
    }

    pub fn load_map(&mut self, features: Vec<MapFeature>) -> Result<usize, HostError> {
        let count = self
            .boundaries
            .set_features(&mut self.surface, features, self.viewport.projector())?;
        Ok(count)
    }

    pub fn load_map_json(&mut self, payload: &str) -> Result<usize, HostError> {
        let features = parse_map_features(payload)?;
        self.load_map(features)
    }

    /// Assigns a new dataset: rebuilds the color scale, resets playback to the
    /// dataset bounds and shows the records active at its start.
    ///
    /// A rejected dataset leaves the map without data and playback unloaded.
    pub fn load_dataset(&mut self, records: Vec<FlowRecord>) -> Result<(), HostError> {
        let dataset = match Dataset::new(records) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!(error = %err, "dataset rejected");
                self.dataset = None;
                self.scheduler.unload();
                self.scheduler.drain_events();
                self.sync_cursor(None)?;
                return Err(err.into());
            }
        };

        self.scale = LinearColorScale::new(dataset.byte_range().1);
        let bounds = dataset.bounds();
        info!(
            records = dataset.len(),
            min = bounds.start.millis(),
            max = bounds.end.millis(),
            "dataset assigned"
        );
        self.dataset = Some(dataset);
        self.scheduler.load(bounds);
        if self.scheduler.config().autoplay {
            self.scheduler.play()?;
        }
        self.process_events()?;
        Ok(())
    }

    pub fn load_dataset_json(&mut self, payload: &str) -> Result<(), HostError> {
        let records = parse_flow_records(payload)?;
        self.load_dataset(records)
    }

    pub fn set_projection(&mut self, kind: ProjectionKind) -> Result<RepaintReport, HostError> {
        self.viewport.set_projection(kind);
        self.repaint()
    }

    /// Unknown names fail and keep the current projection.
    pub fn set_projection_named(&mut self, name: &str) -> Result<RepaintReport, HostError> {
        self.viewport.set_projection_named(name)?;
        self.repaint()
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) -> Result<Option<Repaint>, HostError> {
        let Some(repaint) = self.viewport.handle(gesture) else {
            return Ok(None);
        };
        self.repaint()?;
        Ok(Some(repaint))
    }

    /// Geometry-only repaint of boundaries and routes.
    pub fn repaint(&mut self) -> Result<RepaintReport, HostError> {
        let projector = self.viewport.projector();
        self.boundaries.refresh(&mut self.surface, projector)?;
        let report = self.routes.refresh(&mut self.surface, projector)?;
        Ok(report)
    }

    pub fn play(&mut self) -> Result<(), HostError> {
        self.scheduler.play()?;
        self.process_events()?;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), HostError> {
        self.scheduler.pause();
        self.process_events()?;
        Ok(())
    }

    pub fn toggle_loop(&mut self) -> PlaybackMode {
        self.scheduler.toggle_loop()
    }

    pub fn scrub(&mut self, target: Time) -> Result<Time, HostError> {
        let cursor = self.scheduler.scrub(target)?;
        self.process_events()?;
        Ok(cursor)
    }

    /// Runs one tick directly, bypassing the wall-clock timer.
    pub fn tick(&mut self) -> Result<Option<Time>, HostError> {
        let cursor = self.scheduler.tick();
        self.process_events()?;
        Ok(cursor)
    }

    /// Feeds wall-clock time to the scheduler; returns the ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> Result<u32, HostError> {
        let ticks = self.scheduler.advance(elapsed);
        self.process_events()?;
        Ok(ticks)
    }

    /// Feeds one timer period at a time for up to `run` while playback is
    /// running. Playback is never started here; returns the time fed.
    pub fn replay(&mut self, run: Duration) -> Result<Duration, HostError> {
        let frame = Duration::from_millis(self.scheduler.config().tick_interval_ms.max(1));
        let mut elapsed = Duration::ZERO;
        while elapsed < run && self.scheduler.is_playing() {
            self.advance(frame)?;
            elapsed += frame;
        }
        Ok(elapsed)
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.surface.pointer_move(position, &mut self.overlay);
    }

    pub fn pointer_leave(&mut self) {
        self.surface.pointer_leave(&mut self.overlay);
    }

    /// Cursor time for display, e.g. `Sat, 02 Jan 2016 10:00:00 UTC`.
    pub fn cursor_label(&self) -> Option<String> {
        self.scheduler.cursor().map(format_timestamp)
    }

    /// Drains playback events, dropping those from an older dataset
    /// generation, and syncs the scene to the last cursor seen.
    pub fn process_events(&mut self) -> Result<Option<SyncReport>, HostError> {
        let events = self.scheduler.drain_events();
        match latest_cursor(&events, self.scheduler.generation()) {
            Some(t) => self.sync_cursor(Some(t)).map(Some),
            None => Ok(None),
        }
    }

    fn sync_cursor(&mut self, cursor: Option<Time>) -> Result<SyncReport, HostError> {
        let visible = match (&self.dataset, cursor) {
            (Some(dataset), Some(t)) => dataset.visible_at(t),
            _ => Vec::new(),
        };
        let report = self
            .routes
            .sync(&mut self.surface, &visible, &self.scale, self.viewport.projector())?;
        Ok(report)
    }
}

/// Last cursor emitted under `generation`; events from other generations are
/// skipped wherever they sit in the queue.
fn latest_cursor(events: &[Event<PlaybackEvent>], generation: u64) -> Option<Time> {
    let mut cursor = None;
    for event in events {
        if event.payload.generation() != generation {
            debug!(seq = event.seq, generation = event.payload.generation(), "stale playback event dropped");
            continue;
        }
        match event.payload {
            PlaybackEvent::CursorChanged { cursor: t, .. } => cursor = Some(t),
            PlaybackEvent::Loaded { .. } | PlaybackEvent::RunStateChanged { .. } | PlaybackEvent::ModeChanged { .. } => {}
        }
    }
    cursor
}
