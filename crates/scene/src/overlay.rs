use flows::{FlowRecord, GeoLocation, OverlayContent, location_content, transfer_content};

/// Receiver of hover notifications. Implementations decide how the content is
/// presented.
pub trait InteractionOverlay {
    fn show_transfer_info(&mut self, record: &FlowRecord);
    fn show_location_info(&mut self, location: &GeoLocation);
    fn hide(&mut self);
}

/// Keeps the descriptor that is currently shown, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipOverlay {
    current: Option<OverlayContent>,
}

impl TooltipOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&OverlayContent> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}

impl InteractionOverlay for TooltipOverlay {
    fn show_transfer_info(&mut self, record: &FlowRecord) {
        self.current = Some(transfer_content(record));
    }

    fn show_location_info(&mut self, location: &GeoLocation) {
        self.current = Some(location_content(location));
    }

    fn hide(&mut self) {
        self.current = None;
    }
}
