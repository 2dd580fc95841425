//! Pointer-ray picking against the interactive hotspots of a scene.
//!
//! The scene loader fills a [`HotspotRegistry`] once when the model is ready.
//! [`HotspotPicker`] turns pointer positions into hover changes and clicks
//! into [`HotspotSelection`]s; it never touches materials itself, hover
//! changes are applied through a [`HighlightSurface`].

use std::fmt::Debug;

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::highlight::{HighlightColor, HighlightPalette};

/// Unique identifier for a hotspot.
pub type HotspotId = String;

/// Perspective camera parameters needed to build pointer rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
}

/// A ray in world space with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    /// Ray from the camera through a pointer position in normalized device
    /// coordinates (x right, y up, both in `[-1, 1]`).
    pub fn from_ndc(view: &CameraView, ndc: Vec2) -> Self {
        let half_height = (view.fov_y * 0.5).tan();
        let local = Vec3::new(ndc.x * half_height * view.aspect, ndc.y * half_height, -1.0);
        Self {
            origin: view.position,
            direction: (view.rotation * local).normalize_or(view.rotation * Vec3::NEG_Z),
        }
    }

    /// Distance along the ray to the first intersection with a sphere.
    ///
    /// An origin inside the sphere counts as a hit at distance 0.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let far = -b + root;
        if far < 0.0 {
            return None;
        }
        Some((-b - root).max(0.0))
    }
}

/// A pickable hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotRecord<H> {
    pub id: HotspotId,
    pub handle: H,
    /// Assigned once at registration and never changed afterwards.
    pub highlight: HighlightColor,
    pub position: Vec3,
    pub radius: f32,
}

/// An auxiliary marker that picks as its parent hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRecord<H> {
    pub handle: H,
    pub parent_id: HotspotId,
    pub position: Vec3,
    pub radius: f32,
}

/// Nearest hit of a pointer ray.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit<H> {
    pub hotspot_id: HotspotId,
    /// Handle of the hotspot (the parent when a proxy was hit).
    pub handle: H,
    /// Handle of the object the ray actually hit.
    pub hit_handle: H,
    pub distance: f32,
    /// World position of the hotspot.
    pub position: Vec3,
}

impl<H: PartialEq> PickHit<H> {
    pub fn via_proxy(&self) -> bool {
        self.handle != self.hit_handle
    }
}

/// A resolved click on a hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotSelection {
    pub hotspot_id: HotspotId,
    pub position: Vec3,
}

/// Typed registry of interactive scene objects, keyed by handle.
#[derive(Debug, Clone)]
pub struct HotspotRegistry<H> {
    hotspots: Vec<HotspotRecord<H>>,
    proxies: Vec<ProxyRecord<H>>,
    palette: HighlightPalette,
    seed: u64,
}

impl<H> Default for HotspotRegistry<H> {
    fn default() -> Self {
        Self::new(12345)
    }
}

impl<H> HotspotRegistry<H> {
    pub fn new(seed: u64) -> Self {
        Self {
            hotspots: Vec::new(),
            proxies: Vec::new(),
            palette: HighlightPalette::new(seed),
            seed,
        }
    }

    pub fn hotspots(&self) -> &[HotspotRecord<H>] {
        &self.hotspots
    }

    pub fn proxies(&self) -> &[ProxyRecord<H>] {
        &self.proxies
    }

    /// Number of hotspots (proxies not counted).
    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HotspotRecord<H>> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// Forgets everything, restarting color assignment for a new scene.
    pub fn clear(&mut self) {
        self.hotspots.clear();
        self.proxies.clear();
        self.palette = HighlightPalette::new(self.seed);
    }
}

impl<H: Copy + PartialEq + Debug> HotspotRegistry<H> {
    /// Registers a hotspot and returns its highlight color.
    ///
    /// Registering a handle again updates its position and radius but keeps
    /// the color it was first given.
    pub fn register(
        &mut self,
        id: impl Into<HotspotId>,
        handle: H,
        position: Vec3,
        radius: f32,
    ) -> HighlightColor {
        let id = id.into();
        if let Some(existing) = self.hotspots.iter_mut().find(|h| h.handle == handle) {
            existing.id = id;
            existing.position = position;
            existing.radius = radius;
            return existing.highlight;
        }

        if self.get(&id).is_some() {
            tracing::warn!(
                "[picker] duplicate hotspot id {id} (handle {handle:?}), lookups by id resolve to the first"
            );
        }

        let highlight = self.palette.next_color();
        self.hotspots.push(HotspotRecord {
            id,
            handle,
            highlight,
            position,
            radius,
        });
        highlight
    }

    /// Registers a proxy marker resolving to `parent_id`.
    pub fn register_proxy(
        &mut self,
        handle: H,
        parent_id: impl Into<HotspotId>,
        position: Vec3,
        radius: f32,
    ) {
        let parent_id = parent_id.into();
        if let Some(existing) = self.proxies.iter_mut().find(|p| p.handle == handle) {
            existing.parent_id = parent_id;
            existing.position = position;
            existing.radius = radius;
            return;
        }
        self.proxies.push(ProxyRecord {
            handle,
            parent_id,
            position,
            radius,
        });
    }

    pub fn by_handle(&self, handle: H) -> Option<&HotspotRecord<H>> {
        self.hotspots.iter().find(|h| h.handle == handle)
    }

    /// Removes a hotspot or proxy. Proxies of a removed hotspot stay
    /// registered but no longer resolve.
    pub fn remove(&mut self, handle: H) -> bool {
        let before = self.hotspots.len() + self.proxies.len();
        self.hotspots.retain(|h| h.handle != handle);
        self.proxies.retain(|p| p.handle != handle);
        before != self.hotspots.len() + self.proxies.len()
    }

    /// Nearest hotspot hit by `ray`, resolving proxies to their parent.
    pub fn pick(&self, ray: &PickRay) -> Option<PickHit<H>> {
        let direct = self.hotspots.iter().filter_map(|h| {
            ray.intersect_sphere(h.position, h.radius)
                .map(|distance| (distance, h, h.handle))
        });
        let proxied = self.proxies.iter().filter_map(|p| {
            let parent = self.get(&p.parent_id)?;
            ray.intersect_sphere(p.position, p.radius)
                .map(|distance| (distance, parent, p.handle))
        });

        let mut nearest: Option<(f32, &HotspotRecord<H>, H)> = None;
        for candidate in direct.chain(proxied) {
            if nearest.as_ref().is_none_or(|(best, _, _)| candidate.0 < *best) {
                nearest = Some(candidate);
            }
        }

        nearest.map(|(distance, hotspot, hit_handle)| PickHit {
            hotspot_id: hotspot.id.clone(),
            handle: hotspot.handle,
            hit_handle,
            distance,
            position: hotspot.position,
        })
    }
}

/// Pointer affordance shown over the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorAffordance {
    #[default]
    Default,
    Pointer,
}

/// Receives hover highlight changes.
pub trait HighlightSurface<H> {
    /// Puts the object's material back to its base color.
    fn restore_base(&mut self, handle: H);
    fn apply_highlight(&mut self, handle: H, color: HighlightColor);
}

/// Highlight writes produced by one hover update.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverChange<H> {
    pub restore: Option<H>,
    pub highlight: Option<(H, HighlightColor)>,
}

impl<H> HoverChange<H> {
    pub fn none() -> Self {
        Self {
            restore: None,
            highlight: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.restore.is_none() && self.highlight.is_none()
    }

    /// Restores first, then highlights.
    pub fn apply(self, surface: &mut impl HighlightSurface<H>) {
        if let Some(handle) = self.restore {
            surface.restore_base(handle);
        }
        if let Some((handle, color)) = self.highlight {
            surface.apply_highlight(handle, color);
        }
    }
}

/// Hover and click resolution over a [`HotspotRegistry`].
#[derive(Debug, Clone)]
pub struct HotspotPicker<H> {
    hovered: Option<H>,
    cursor: CursorAffordance,
}

impl<H> Default for HotspotPicker<H> {
    fn default() -> Self {
        Self {
            hovered: None,
            cursor: CursorAffordance::Default,
        }
    }
}

impl<H: Copy + PartialEq + Debug> HotspotPicker<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<H> {
        self.hovered
    }

    pub fn cursor(&self) -> CursorAffordance {
        self.cursor
    }

    /// Updates hover from the pointer ray (`None` when the pointer left the
    /// viewer). Nothing resolves while input is blocked.
    pub fn hover(
        &mut self,
        registry: &HotspotRegistry<H>,
        ray: Option<&PickRay>,
        input_blocked: bool,
    ) -> HoverChange<H> {
        let next = if input_blocked {
            None
        } else {
            ray.and_then(|ray| registry.pick(ray))
                .and_then(|hit| registry.by_handle(hit.handle))
                .map(|record| (record.handle, record.highlight))
        };

        self.cursor = if next.is_some() {
            CursorAffordance::Pointer
        } else {
            CursorAffordance::Default
        };

        if next.map(|(handle, _)| handle) == self.hovered {
            return HoverChange::none();
        }

        let change = HoverChange {
            restore: self.hovered.take(),
            highlight: next,
        };
        self.hovered = next.map(|(handle, _)| handle);
        change
    }

    /// Resolves a click into a selection.
    pub fn click(
        &self,
        registry: &HotspotRegistry<H>,
        ray: &PickRay,
        input_blocked: bool,
    ) -> Option<HotspotSelection> {
        if input_blocked {
            tracing::debug!("[picker] click ignored, input blocked");
            return None;
        }

        let hit = registry.pick(ray)?;
        tracing::info!(
            "[picker] selected hotspot {} (proxy: {}, distance {:.3})",
            hit.hotspot_id,
            hit.via_proxy(),
            hit.distance
        );
        Some(HotspotSelection {
            hotspot_id: hit.hotspot_id,
            position: hit.position,
        })
    }

    /// Drops hover state for a removed object without restoring it.
    pub fn forget(&mut self, handle: H) {
        if self.hovered == Some(handle) {
            self.hovered = None;
            self.cursor = CursorAffordance::Default;
        }
    }

    /// Clears hover, restoring the hovered object.
    pub fn clear(&mut self) -> HoverChange<H> {
        self.cursor = CursorAffordance::Default;
        HoverChange {
            restore: self.hovered.take(),
            highlight: None,
        }
    }
}
