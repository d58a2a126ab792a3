//! Shared map state, explicitly owned and injected.
//!
//! Two small stores replace what a UI layer would keep in a global: the live
//! user/destination pair and the live marker list. Each field has exactly one
//! writer (the location-permission callback, the autocomplete selection
//! handler, the scene refresh) and any number of snapshot readers. The stores
//! carry no interior mutability of their own; whoever owns them decides how
//! they are shared.

use crate::drivers::{DriverId, Marker};
use crate::geo::Coordinate;
use crate::search::SelectedLocation;

/// The trip endpoints as currently known. Both start unresolved: the user
/// side waits on the location permission, the destination on a search
/// selection.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocationStore {
    user: Option<Coordinate>,
    user_address: Option<String>,
    destination: Option<Coordinate>,
    destination_address: Option<String>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer: the location-permission callback.
    pub fn set_user_location(&mut self, coordinate: Coordinate, address: Option<String>) {
        self.user = Some(coordinate);
        self.user_address = address;
    }

    /// Writer: the autocomplete selection handler.
    pub fn set_destination(&mut self, location: SelectedLocation) {
        self.destination = Some(location.coordinate);
        self.destination_address = Some(location.address);
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.destination_address = None;
    }

    pub fn user(&self) -> Option<Coordinate> {
        self.user
    }

    pub fn user_address(&self) -> Option<&str> {
        self.user_address.as_deref()
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn destination_address(&self) -> Option<&str> {
        self.destination_address.as_deref()
    }
}

/// The marker list the map is currently rendering, plus which driver the
/// user has tapped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DriverStore {
    markers: Vec<Marker>,
    selected: Option<DriverId>,
}

impl DriverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer: the scene refresh. Replaces the whole list; a selection whose
    /// driver left the feed is dropped with it.
    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
        if let Some(id) = self.selected {
            if !self.markers.iter().any(|m| m.id == id) {
                self.selected = None;
            }
        }
    }

    /// Select a driver by id. Ids not present in the marker list are
    /// ignored, so a tap racing a feed refresh cannot select a ghost.
    pub fn select(&mut self, id: DriverId) -> bool {
        if self.markers.iter().any(|m| m.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn selected(&self) -> Option<DriverId> {
        self.selected
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected
            .and_then(|id| self.markers.iter().find(|m| m.id == id))
    }
}
