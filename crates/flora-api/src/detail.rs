//! Detail/map view
//!
//! [`map_view`] turns one record's geography into a [`MapViewState`]: a
//! marker at the center, three square highlight slots around it and a
//! viewport fitted to their union. [`DetailPanel`] owns the single open
//! view and the map resource mounted for it.

use serde::Serialize;

use flora_core::{Coordinate, SpeciesId, SpeciesRecord};

pub const MIN_ZOOM: u8 = 5;
pub const MAX_ZOOM: u8 = 10;
pub const FIT_PADDING_PX: u32 = 50;
/// Half the side of each highlight square, in degrees
pub const HIGHLIGHT_HALF_SIDE: f64 = 0.2;
pub const BASELINE_TITLE: &str = "BÖLGESEL YAYILIM ANALİZİ";

/// (lat offset, lon offset, intensity) per highlight slot
const SLOTS: [(f64, f64, f64); 3] = [(0.0, 0.0, 1.0), (0.5, -0.5, 0.7), (-0.8, 0.2, 0.5)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinate,
    pub title: String,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionHighlight {
    pub slot: usize,
    pub name: String,
    pub center: Coordinate,
    pub intensity: f64,
    pub fill_opacity: f64,
    /// Closed ring: the first corner is repeated at the end
    pub polygon: Vec<Coordinate>,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box holding every point; `None` for an empty input.
    #[must_use]
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Self>, point| {
            Some(match acc {
                None => Self { south: point.lat, west: point.lon, north: point.lat, east: point.lon },
                Some(bounds) => Self {
                    south: bounds.south.min(point.lat),
                    west: bounds.west.min(point.lon),
                    north: bounds.north.max(point.lat),
                    east: bounds.east.max(point.lon),
                },
            })
        })
    }

    /// Finite with non-zero width and height.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        [self.south, self.west, self.north, self.east].iter().all(|value| value.is_finite())
            && self.north > self.south
            && self.east > self.west
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    Fitted { bounds: Bounds, padding_px: u32 },
    Centered { center: Coordinate, zoom: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewState {
    pub species_id: SpeciesId,
    pub title: String,
    pub center: Coordinate,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub marker: Marker,
    pub highlights: Vec<RegionHighlight>,
    pub viewport: Viewport,
}

/// Fill opacity for a highlight of the given intensity.
#[must_use]
pub fn fill_opacity(intensity: f64) -> f64 {
    0.3 * intensity + 0.2
}

fn square(center: Coordinate) -> Vec<Coordinate> {
    let h = HIGHLIGHT_HALF_SIDE;
    vec![
        center.offset(-h, -h),
        center.offset(-h, h),
        center.offset(h, h),
        center.offset(h, -h),
        center.offset(-h, -h),
    ]
}

#[must_use]
pub fn map_view(record: &SpeciesRecord) -> MapViewState {
    let geography = &record.geography;
    let center = geography.center;
    let first_region = geography.regions.first().map_or("", String::as_str);

    let highlights = SLOTS
        .iter()
        .enumerate()
        .map(|(slot, &(d_lat, d_lon, intensity))| {
            let name = geography.regions.get(slot).map_or(first_region, String::as_str);
            let slot_center = center.offset(d_lat, d_lon);
            RegionHighlight {
                slot,
                name: name.to_string(),
                center: slot_center,
                intensity,
                fill_opacity: fill_opacity(intensity),
                polygon: square(slot_center),
                popup: format!("{name}\nDağılım Yoğunluğu: Yüksek\nTür: {}", record.common_name),
            }
        })
        .collect::<Vec<_>>();

    let zoom = geography.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    let viewport = match Bounds::enclosing(highlights.iter().flat_map(|h| h.polygon.iter())) {
        Some(bounds) if bounds.is_well_formed() => {
            Viewport::Fitted { bounds, padding_px: FIT_PADDING_PX }
        }
        other => {
            tracing::warn!(
                species_id = %record.id,
                bounds = ?other,
                "highlight bounds are degenerate; keeping center and zoom"
            );
            Viewport::Centered { center, zoom }
        }
    };

    MapViewState {
        species_id: record.id.clone(),
        title: format!("{} - Coğrafi Dağılım", record.common_name),
        center,
        zoom,
        min_zoom: MIN_ZOOM,
        max_zoom: MAX_ZOOM,
        marker: Marker {
            position: center,
            title: format!("{} (Merkez Üssü)", record.common_name),
            popup: format!("{}\n{} (Merkez)", record.common_name, record.scientific_name),
        },
        highlights,
        viewport,
    }
}

/// Opaque handle for a mounted map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MapHandle(pub u64);

/// Something that can draw a [`MapViewState`]
pub trait MapSurface: Send {
    fn mount(&mut self, view: &MapViewState) -> MapHandle;
    fn unmount(&mut self, handle: MapHandle);
}

/// Keeps mounted views in memory; used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryMapSurface {
    next: u64,
    mounted: Vec<(MapHandle, MapViewState)>,
    mounts: u64,
    unmounts: u64,
}

impl MemoryMapSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mounted(&self) -> Vec<&MapViewState> {
        self.mounted.iter().map(|(_, view)| view).collect()
    }

    #[must_use]
    pub fn mount_count(&self) -> u64 {
        self.mounts
    }

    #[must_use]
    pub fn unmount_count(&self) -> u64 {
        self.unmounts
    }
}

impl MapSurface for MemoryMapSurface {
    fn mount(&mut self, view: &MapViewState) -> MapHandle {
        self.next += 1;
        self.mounts += 1;
        let handle = MapHandle(self.next);
        self.mounted.push((handle, view.clone()));
        handle
    }

    fn unmount(&mut self, handle: MapHandle) {
        let before = self.mounted.len();
        self.mounted.retain(|(mounted, _)| *mounted != handle);
        if self.mounted.len() < before {
            self.unmounts += 1;
        }
    }
}

struct OpenDetail {
    handle: MapHandle,
    view: MapViewState,
}

/// At most one open detail view
pub struct DetailPanel<S: MapSurface> {
    surface: S,
    open: Option<OpenDetail>,
}

impl<S: MapSurface> DetailPanel<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, open: None }
    }

    /// Close whatever is open, then mount a view for `record`.
    pub fn open(&mut self, record: &SpeciesRecord) -> &MapViewState {
        self.close();
        let view = map_view(record);
        let handle = self.surface.mount(&view);
        tracing::info!(species_id = %record.id, handle = handle.0, "detail view opened");
        &self.open.insert(OpenDetail { handle, view }).view
    }

    /// Unmount the open view. Returns whether anything was open.
    pub fn close(&mut self) -> bool {
        let Some(open) = self.open.take() else {
            return false;
        };
        self.surface.unmount(open.handle);
        tracing::debug!(species_id = %open.view.species_id, "detail view closed");
        true
    }

    pub fn current(&self) -> Option<&MapViewState> {
        self.open.as_ref().map(|open| &open.view)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn title(&self) -> &str {
        self.current().map_or(BASELINE_TITLE, |view| view.title.as_str())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
