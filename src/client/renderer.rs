//! Presence renderer: reconciles events into per-identity map state.
//!
//! [`PresenceRenderer`] owns one [`MarkerState`] per identifier it has
//! seen: a marker, a breadcrumb trail, and the last known coordinates and
//! heading. The actual map library sits behind the [`MapSurface`] trait so
//! the reconciliation logic runs (and is tested) without a map.

use std::collections::HashMap;

use crate::client::ClientError;
use crate::client::geo::{self, Coordinates};
use crate::domain::{ConnectionId, PresenceUpdate};

/// Zoom level used when centering on the user for the first time.
pub const DEFAULT_ZOOM: u8 = 16;

/// Trail color for the user's own breadcrumb, regardless of marker color.
pub const SELF_TRAIL_COLOR: &str = "#007bff";

/// Visual styling for one identity's marker and trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Marker fill color (CSS color string).
    pub marker_color: String,
    /// Breadcrumb trail color.
    pub trail_color: String,
    /// Whether this is the local user (pulse animation, center dot).
    pub is_self: bool,
}

/// Content of a marker's popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    /// Display name, or `"Me"` for the local user.
    pub title: String,
    /// Straight-line distance to the local user in km, two decimals.
    /// `None` for the local user or while the local position is unknown.
    pub distance_km: Option<String>,
    /// Whether to offer a "get route" action (peers only).
    pub offer_route: bool,
}

/// Map backend abstraction.
///
/// One implementation wraps the real map library in the platform shell;
/// tests use a recording stub. Handles are opaque to the renderer.
pub trait MapSurface {
    /// Handle to a placed marker.
    type Marker: std::fmt::Debug;
    /// Handle to a breadcrumb polyline.
    type Trail: std::fmt::Debug;

    /// Places a new marker.
    fn add_marker(
        &mut self,
        at: Coordinates,
        heading: f64,
        style: &MarkerStyle,
        popup: &PopupContent,
    ) -> Self::Marker;
    /// Moves an existing marker.
    fn move_marker(&mut self, marker: &mut Self::Marker, to: Coordinates);
    /// Rotates a marker's heading indicator.
    fn rotate_marker(&mut self, marker: &mut Self::Marker, heading: f64);
    /// Replaces a marker's popup content.
    fn set_popup(&mut self, marker: &mut Self::Marker, popup: &PopupContent);
    /// Removes a marker from the map.
    fn remove_marker(&mut self, marker: Self::Marker);

    /// Creates an empty breadcrumb trail.
    fn add_trail(&mut self, style: &MarkerStyle) -> Self::Trail;
    /// Appends one point to a trail.
    fn extend_trail(&mut self, trail: &mut Self::Trail, point: Coordinates);
    /// Drops the oldest points so at most `keep` remain.
    fn trim_trail(&mut self, trail: &mut Self::Trail, keep: usize);
    /// Removes a trail from the map.
    fn remove_trail(&mut self, trail: Self::Trail);

    /// Centers the viewport.
    fn set_view(&mut self, center: Coordinates, zoom: u8);
}

/// Per-identity state kept between events.
#[derive(Debug)]
struct MarkerState<M: MapSurface> {
    marker: M::Marker,
    trail: M::Trail,
    coords: Coordinates,
    heading: f64,
    trail_len: usize,
}

/// A routing request for the external directions engine: straight from
/// the local user to a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Start point (the local user's last known position).
    pub from: Coordinates,
    /// Destination.
    pub to: Coordinates,
}

/// Reconciles the incoming presence stream into map annotations.
///
/// Updates are idempotent by replacement: a later event for an identifier
/// fully supersedes the earlier one, only the breadcrumb trail accumulates.
#[derive(Debug)]
pub struct PresenceRenderer<M: MapSurface> {
    map: M,
    markers: HashMap<ConnectionId, MarkerState<M>>,
    self_id: Option<ConnectionId>,
    self_coords: Option<Coordinates>,
    has_centered: bool,
    trail_limit: Option<usize>,
}

impl<M: MapSurface> PresenceRenderer<M> {
    /// Creates a renderer over the given map surface. Trails grow without
    /// bound, matching the deployed client.
    #[must_use]
    pub fn new(map: M) -> Self {
        Self {
            map,
            markers: HashMap::new(),
            self_id: None,
            self_coords: None,
            has_centered: false,
            trail_limit: None,
        }
    }

    /// Caps every breadcrumb trail at `limit` points, evicting the oldest.
    #[must_use]
    pub fn with_trail_limit(mut self, limit: usize) -> Self {
        self.trail_limit = Some(limit);
        self
    }

    /// Records the local connection identifier (from the `connected`
    /// frame) so self-events are recognized.
    pub fn set_self_id(&mut self, id: ConnectionId) {
        self.self_id = Some(id);
    }

    /// Access to the underlying map surface.
    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Number of identities currently on the map.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Breadcrumb length for an identity, if present.
    #[must_use]
    pub fn trail_len(&self, id: ConnectionId) -> Option<usize> {
        self.markers.get(&id).map(|s| s.trail_len)
    }

    /// Last known coordinates for an identity, if present.
    #[must_use]
    pub fn coords_of(&self, id: ConnectionId) -> Option<Coordinates> {
        self.markers.get(&id).map(|s| s.coords)
    }

    /// Last known heading for an identity, if present.
    #[must_use]
    pub fn heading_of(&self, id: ConnectionId) -> Option<f64> {
        self.markers.get(&id).map(|s| s.heading)
    }

    /// Applies one `receive-location` event.
    ///
    /// Upserts the identity's marker and trail; on the very first self
    /// event the map is centered once (and never again, so user pan/zoom
    /// is left alone).
    pub fn apply(&mut self, update: &PresenceUpdate) {
        let coords = Coordinates::new(update.latitude, update.longitude);
        let is_self = self.self_id == Some(update.id);

        if is_self {
            self.self_coords = Some(coords);
            if !self.has_centered {
                self.map.set_view(coords, DEFAULT_ZOOM);
                self.has_centered = true;
            }
        }

        let popup = build_popup(is_self, &update.name, self.self_coords, coords);

        if let Some(state) = self.markers.get_mut(&update.id) {
            self.map.move_marker(&mut state.marker, coords);
            self.map.rotate_marker(&mut state.marker, update.heading);
            self.map.set_popup(&mut state.marker, &popup);
            self.map.extend_trail(&mut state.trail, coords);
            state.trail_len += 1;
            if let Some(limit) = self.trail_limit
                && state.trail_len > limit
            {
                self.map.trim_trail(&mut state.trail, limit);
                state.trail_len = limit;
            }
            state.coords = coords;
            state.heading = update.heading;
        } else {
            let style = MarkerStyle {
                marker_color: update.color.clone(),
                trail_color: if is_self {
                    SELF_TRAIL_COLOR.to_string()
                } else {
                    update.color.clone()
                },
                is_self,
            };
            let mut trail = self.map.add_trail(&style);
            self.map.extend_trail(&mut trail, coords);
            let marker = self.map.add_marker(coords, update.heading, &style, &popup);
            self.markers.insert(
                update.id,
                MarkerState {
                    marker,
                    trail,
                    coords,
                    heading: update.heading,
                    trail_len: 1,
                },
            );
        }
    }

    /// Applies a `user-disconnected` event: marker and trail are removed
    /// and the identity forgotten. A later event for the same identifier
    /// starts from scratch.
    pub fn remove(&mut self, id: ConnectionId) {
        if let Some(state) = self.markers.remove(&id) {
            self.map.remove_marker(state.marker);
            self.map.remove_trail(state.trail);
        }
    }

    /// Builds a routing request from the local position to `dest` for the
    /// external directions engine.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SelfPositionUnknown`] while no self position
    /// has been seen; the shell surfaces this to the user directly rather
    /// than failing silently.
    pub fn route_to(&self, dest: Coordinates) -> Result<RouteRequest, ClientError> {
        let from = self.self_coords.ok_or(ClientError::SelfPositionUnknown)?;
        Ok(RouteRequest { from, to: dest })
    }
}

/// Popup content for one identity: `"Me"` for self, the display name
/// otherwise, with a distance line for peers once the local position is
/// known.
fn build_popup(
    is_self: bool,
    name: &str,
    self_coords: Option<Coordinates>,
    coords: Coordinates,
) -> PopupContent {
    let distance_km = if is_self {
        None
    } else {
        self_coords.map(|mine| geo::format_km(geo::distance_m(mine, coords)))
    };
    PopupContent {
        title: if is_self { "Me".to_string() } else { name.to_string() },
        distance_km,
        offer_route: !is_self,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    /// Recording stub standing in for the map library.
    #[derive(Debug, Default)]
    struct RecordingMap {
        next_handle: usize,
        markers_on_map: usize,
        trails_on_map: usize,
        set_view_calls: Vec<(Coordinates, u8)>,
        popups: HashMap<usize, PopupContent>,
        marker_positions: HashMap<usize, Coordinates>,
        trail_points: HashMap<usize, Vec<Coordinates>>,
    }

    impl MapSurface for RecordingMap {
        type Marker = usize;
        type Trail = usize;

        fn add_marker(
            &mut self,
            at: Coordinates,
            _heading: f64,
            _style: &MarkerStyle,
            popup: &PopupContent,
        ) -> usize {
            self.next_handle += 1;
            self.markers_on_map += 1;
            self.marker_positions.insert(self.next_handle, at);
            self.popups.insert(self.next_handle, popup.clone());
            self.next_handle
        }

        fn move_marker(&mut self, marker: &mut usize, to: Coordinates) {
            self.marker_positions.insert(*marker, to);
        }

        fn rotate_marker(&mut self, _marker: &mut usize, _heading: f64) {}

        fn set_popup(&mut self, marker: &mut usize, popup: &PopupContent) {
            self.popups.insert(*marker, popup.clone());
        }

        fn remove_marker(&mut self, marker: usize) {
            self.markers_on_map -= 1;
            self.marker_positions.remove(&marker);
            self.popups.remove(&marker);
        }

        fn add_trail(&mut self, _style: &MarkerStyle) -> usize {
            self.next_handle += 1;
            self.trails_on_map += 1;
            self.trail_points.insert(self.next_handle, Vec::new());
            self.next_handle
        }

        fn extend_trail(&mut self, trail: &mut usize, point: Coordinates) {
            self.trail_points.entry(*trail).or_default().push(point);
        }

        fn trim_trail(&mut self, trail: &mut usize, keep: usize) {
            if let Some(points) = self.trail_points.get_mut(trail) {
                let excess = points.len().saturating_sub(keep);
                points.drain(..excess);
            }
        }

        fn remove_trail(&mut self, trail: usize) {
            self.trails_on_map -= 1;
            self.trail_points.remove(&trail);
        }

        fn set_view(&mut self, center: Coordinates, zoom: u8) {
            self.set_view_calls.push((center, zoom));
        }
    }

    fn update(id: ConnectionId, lat: f64, lng: f64) -> PresenceUpdate {
        PresenceUpdate {
            id,
            latitude: lat,
            longitude: lng,
            heading: 90.0,
            name: "A".to_string(),
            color: "#111".to_string(),
        }
    }

    #[test]
    fn first_event_creates_marker_and_trail() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let id = ConnectionId::new();

        renderer.apply(&update(id, 10.0, 20.0));

        assert_eq!(renderer.marker_count(), 1);
        assert_eq!(renderer.trail_len(id), Some(1));
        assert_eq!(renderer.map().markers_on_map, 1);
        assert_eq!(renderer.map().trails_on_map, 1);
    }

    #[test]
    fn upsert_is_idempotent_by_replacement() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let id = ConnectionId::new();

        renderer.apply(&update(id, 10.0, 20.0));
        renderer.apply(&update(id, 11.0, 21.0));

        assert_eq!(renderer.marker_count(), 1);
        assert_eq!(renderer.coords_of(id), Some(Coordinates::new(11.0, 21.0)));
        assert_eq!(renderer.map().markers_on_map, 1);
    }

    #[test]
    fn trail_grows_by_one_per_event_in_order() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let id = ConnectionId::new();

        for i in 0..5 {
            renderer.apply(&update(id, f64::from(i), 0.0));
        }

        assert_eq!(renderer.trail_len(id), Some(5));
        let points: Vec<_> = renderer
            .map()
            .trail_points
            .values()
            .next()
            .cloned()
            .unwrap_or_default();
        let latitudes: Vec<f64> = points.iter().map(|p| p.latitude).collect();
        assert_eq!(latitudes, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn trail_limit_evicts_oldest() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default()).with_trail_limit(3);
        let id = ConnectionId::new();

        for i in 0..5 {
            renderer.apply(&update(id, f64::from(i), 0.0));
        }

        assert_eq!(renderer.trail_len(id), Some(3));
        let points: Vec<_> = renderer
            .map()
            .trail_points
            .values()
            .next()
            .cloned()
            .unwrap_or_default();
        let latitudes: Vec<f64> = points.iter().map(|p| p.latitude).collect();
        assert_eq!(latitudes, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn departure_removes_everything_and_recreates_fresh() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let id = ConnectionId::new();

        renderer.apply(&update(id, 10.0, 20.0));
        renderer.apply(&update(id, 11.0, 21.0));
        renderer.remove(id);

        assert_eq!(renderer.marker_count(), 0);
        assert_eq!(renderer.map().markers_on_map, 0);
        assert_eq!(renderer.map().trails_on_map, 0);

        // Re-appearing starts from scratch.
        renderer.apply(&update(id, 12.0, 22.0));
        assert_eq!(renderer.trail_len(id), Some(1));
    }

    #[test]
    fn removing_unknown_identity_is_a_no_op() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        renderer.remove(ConnectionId::new());
        assert_eq!(renderer.marker_count(), 0);
    }

    #[test]
    fn first_self_event_centers_exactly_once() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let me = ConnectionId::new();
        renderer.set_self_id(me);

        renderer.apply(&update(me, 10.0, 20.0));
        renderer.apply(&update(me, 11.0, 21.0));

        assert_eq!(renderer.map().set_view_calls.len(), 1);
        assert_eq!(
            renderer.map().set_view_calls.first(),
            Some(&(Coordinates::new(10.0, 20.0), DEFAULT_ZOOM))
        );
    }

    #[test]
    fn peer_events_never_center() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        renderer.set_self_id(ConnectionId::new());

        renderer.apply(&update(ConnectionId::new(), 10.0, 20.0));
        assert!(renderer.map().set_view_calls.is_empty());
    }

    #[test]
    fn self_popup_says_me_without_distance() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let me = ConnectionId::new();
        renderer.set_self_id(me);

        renderer.apply(&update(me, 10.0, 20.0));

        let popup = renderer.map().popups.values().next().cloned();
        let Some(popup) = popup else {
            panic!("expected a popup");
        };
        assert_eq!(popup.title, "Me");
        assert_eq!(popup.distance_km, None);
        assert!(!popup.offer_route);
    }

    #[test]
    fn peer_popup_carries_distance_once_self_known() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let me = ConnectionId::new();
        let peer = ConnectionId::new();
        renderer.set_self_id(me);

        // Peer seen before any self position: no distance yet.
        renderer.apply(&update(peer, 48.8566, 2.3522));
        renderer.apply(&update(me, 51.5074, -0.1278));
        // Next peer event recomputes the popup with a distance.
        renderer.apply(&update(peer, 48.8566, 2.3522));

        let popups: Vec<_> = renderer.map().popups.values().cloned().collect();
        let peer_popup = popups.iter().find(|p| p.title == "A");
        let Some(peer_popup) = peer_popup else {
            panic!("expected the peer popup");
        };
        let Some(distance) = &peer_popup.distance_km else {
            panic!("expected a distance");
        };
        // Paris ↔ London ≈ 343.9 km.
        assert!(distance.starts_with("34"), "got {distance}");
        assert!(peer_popup.offer_route);
    }

    #[test]
    fn route_requires_known_self_position() {
        let mut renderer = PresenceRenderer::new(RecordingMap::default());
        let me = ConnectionId::new();
        renderer.set_self_id(me);

        let dest = Coordinates::new(1.0, 2.0);
        assert!(matches!(
            renderer.route_to(dest),
            Err(ClientError::SelfPositionUnknown)
        ));

        renderer.apply(&update(me, 10.0, 20.0));
        let request = renderer.route_to(dest).ok();
        assert_eq!(
            request,
            Some(RouteRequest {
                from: Coordinates::new(10.0, 20.0),
                to: dest,
            })
        );
    }
}
