//! Region and measure zoom.
//!
//! A selection is expressed once (as measures, or as a time range on the
//! reference track) and materialized on every track in its local time. All
//! views get the same window width, the longest local region plus padding,
//! so tracks at different tempi line up visually.

use tracing::{debug, warn};

use crate::config::PlayerConfig;
use crate::measure::{MeasureSpan, BOUNDARY_TOLERANCE};
use crate::payload::ReferenceRegion;
use crate::transport::{LocateTarget, TrackContext, Transport};
use crate::view::{Segment, Zoom, RELEVANT_MEASURE_ID, SELECTED_REGION_ID};

/// Window last applied to a view, re-applied on container resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewWindow {
    Auto,
    Full { secs: f64 },
    Region { secs: f64, start: f64 },
}

#[derive(Debug, Clone)]
pub struct ZoomController {
    zooming_enabled: bool,
    zoom_padding_secs: f64,
    full_view_padding_secs: f64,
    region_color: String,
    selection: Option<MeasureSpan>,
    windows: Vec<ViewWindow>,
}

impl ZoomController {
    /// Starts with every view showing its whole track.
    pub fn new(config: &PlayerConfig, durations: &[f64]) -> Self {
        Self {
            zooming_enabled: config.zooming_enabled,
            zoom_padding_secs: config.zoom_padding_secs,
            full_view_padding_secs: config.full_view_padding_secs,
            region_color: config.region_color.clone(),
            selection: None,
            windows: durations.iter().map(|&secs| ViewWindow::Full { secs }).collect(),
        }
    }

    /// Currently selected measures, `None` for no selection.
    pub fn selection(&self) -> Option<MeasureSpan> {
        self.selection
    }

    pub fn window(&self, track: usize) -> Option<ViewWindow> {
        self.windows.get(track).copied()
    }

    pub fn zooming_enabled(&self) -> bool {
        self.zooming_enabled
    }

    pub fn set_zooming_enabled(&mut self, enabled: bool) {
        self.zooming_enabled = enabled;
    }

    /// Zooms every track onto `span`, or restores full views with `None`.
    ///
    /// Selecting the span that is already selected toggles back out.
    pub fn zoom_on_measure_selection(
        &mut self,
        transport: &mut Transport,
        ctx: &mut TrackContext<'_>,
        span: Option<MeasureSpan>,
    ) {
        if !ctx.is_ready() {
            return;
        }
        let span = match span {
            Some(s) if self.selection == Some(s) => None,
            other => other,
        };

        Self::pause(transport, ctx);
        Self::clear_selected_segments(ctx);
        self.select_measures(transport, ctx, span);
    }

    /// Selects a region picked from one of the backend's region lists.
    ///
    /// Every segment is dropped first, including highlights left by an
    /// earlier relevant measure.
    pub fn select_region(
        &mut self,
        transport: &mut Transport,
        ctx: &mut TrackContext<'_>,
        region: &ReferenceRegion,
    ) {
        if !ctx.is_ready() {
            return;
        }
        Self::pause(transport, ctx);
        for view in ctx.views.iter_mut() {
            view.remove_all_segments();
        }
        ctx.registry.clear_selections();

        match region {
            ReferenceRegion::SelectedRegion {
                start_time,
                end_time,
                color,
            } => self.select_reference_range(transport, ctx, *start_time, *end_time, color),
            ReferenceRegion::DifferenceRegion {
                region_name,
                start_time,
                end_time,
                start_time_target,
                end_time_target,
                color,
            } => self.select_difference(
                transport,
                ctx,
                region_name,
                (*start_time, *end_time),
                (*start_time_target, *end_time_target),
                color,
            ),
            ReferenceRegion::RelevantMeasure { measure_idx, color } => {
                let span = MeasureSpan::single(*measure_idx);
                for (track, view) in ctx.views.iter_mut().enumerate() {
                    if let Some(map) = ctx.measures.get(track) {
                        let (start, end) = map.span_times(span);
                        let highlight = Segment::new(RELEVANT_MEASURE_ID, start, end, color.clone());
                        view.add_segment(highlight);
                    }
                }
                self.select_measures(transport, ctx, Some(span));
                debug!(measure = *measure_idx, "zoomed on relevant measure");
            }
        }
    }

    fn select_measures(
        &mut self,
        transport: &mut Transport,
        ctx: &mut TrackContext<'_>,
        span: Option<MeasureSpan>,
    ) {
        let Some(span) = span else {
            for (track, view) in ctx.views.iter_mut().enumerate() {
                let secs = ctx.registry.duration(track) + self.full_view_padding_secs;
                view.set_zoom(Zoom::Seconds(secs));
                self.windows[track] = ViewWindow::Full { secs };
            }
            self.selection = None;
            debug!("measure selection cleared");
            return;
        };

        let ranges: Vec<(usize, f64, f64)> = (0..ctx.views.len())
            .map(|track| {
                let (start, end) = ctx
                    .measures
                    .get(track)
                    .map_or((0.0, 0.0), |map| map.span_times(span));
                (track, start, end)
            })
            .collect();
        let color = self.region_color.clone();
        self.apply_regions(transport, ctx, &ranges, &color);
        self.selection = Some(span);
        debug!(start = span.start, end = span.end, "zoomed on measures");
    }

    /// Each track's bounds come from the sync mapping; the backing measure
    /// span is read from the reference measure map.
    fn select_reference_range(
        &mut self,
        transport: &mut Transport,
        ctx: &mut TrackContext<'_>,
        start_time: f64,
        end_time: f64,
        color: &str,
    ) {
        let reference = ctx.mapper.reference();
        let ranges: Vec<(usize, f64, f64)> = (0..ctx.views.len())
            .map(|track| {
                (
                    track,
                    ctx.mapper.to_other_track(reference, track, start_time),
                    ctx.mapper.to_other_track(reference, track, end_time),
                )
            })
            .collect();
        self.apply_regions(transport, ctx, &ranges, color);

        self.selection = ctx.measures.get(reference).and_then(|map| {
            let start = map.measure_at(start_time + BOUNDARY_TOLERANCE)?;
            let end = map
                .measure_at(end_time - BOUNDARY_TOLERANCE)
                .unwrap_or(start);
            Some(MeasureSpan::new(start, end))
        });
        debug!(start = start_time, end = end_time, "zoomed on reference region");
    }

    /// Marks a passage on the reference and on the performance named by
    /// `target_name`, each in its own time, and makes the reference audible.
    /// Other tracks keep their windows.
    fn select_difference(
        &mut self,
        transport: &mut Transport,
        ctx: &mut TrackContext<'_>,
        target_name: &str,
        reference_range: (f64, f64),
        target_range: (f64, f64),
        color: &str,
    ) {
        let target = match ctx.registry.index_of(target_name) {
            Ok(track) => track,
            Err(e) => {
                warn!(error = %e, "difference region dropped");
                return;
            }
        };
        let reference = ctx.mapper.reference();
        transport.select_track(ctx, reference);

        let ranges = [
            (reference, reference_range.0, reference_range.1),
            (target, target_range.0, target_range.1),
        ];
        self.apply_regions(transport, ctx, &ranges, color);
        self.selection = None;
        debug!(target, "zoomed on difference region");
    }

    /// Drops every segment and returns all views to automatic zoom.
    pub fn clear_selection(&mut self, transport: &mut Transport, ctx: &mut TrackContext<'_>) {
        if !ctx.is_ready() {
            return;
        }
        Self::pause(transport, ctx);
        for view in ctx.views.iter_mut() {
            view.remove_all_segments();
            view.set_zoom(Zoom::Auto);
        }
        ctx.registry.clear_selections();
        self.windows.fill(ViewWindow::Auto);
        self.selection = None;
    }

    /// Re-applies the current windows after the view container changed size.
    pub fn on_container_resized(&self, ctx: &mut TrackContext<'_>) {
        for (view, window) in ctx.views.iter_mut().zip(&self.windows) {
            match *window {
                ViewWindow::Auto => view.set_zoom(Zoom::Auto),
                ViewWindow::Full { secs } => view.set_zoom(Zoom::Seconds(secs)),
                ViewWindow::Region { secs, start } => {
                    view.set_zoom(Zoom::Seconds(secs));
                    view.set_start_time(start);
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.selection = None;
        self.windows.fill(ViewWindow::Auto);
    }

    fn pause(transport: &mut Transport, ctx: &mut TrackContext<'_>) {
        if transport.is_playing() {
            transport.stop(ctx);
        }
    }

    fn clear_selected_segments(ctx: &mut TrackContext<'_>) {
        for view in ctx.views.iter_mut() {
            view.remove_segment(SELECTED_REGION_ID);
        }
        ctx.registry.clear_selections();
    }

    /// Adds a selection segment on each listed track, zooms those views
    /// onto it and moves the audible track to its region start.
    fn apply_regions(
        &mut self,
        transport: &mut Transport,
        ctx: &mut TrackContext<'_>,
        ranges: &[(usize, f64, f64)],
        color: &str,
    ) {
        for &(track, start, end) in ranges {
            let segment = Segment::selected_region(start, end, color);
            let view = &mut ctx.views[track];
            view.enable_auto_scroll(false);
            view.remove_segment(SELECTED_REGION_ID);
            view.add_segment(segment.clone());
            ctx.registry.set_selection(track, Some(segment));
        }

        let secs = ctx.registry.longest_region() + self.zoom_padding_secs;
        if self.zooming_enabled {
            for &(track, start, _) in ranges {
                let view = &mut ctx.views[track];
                view.set_zoom(Zoom::Seconds(secs));
                view.set_start_time(start);
                self.windows[track] = ViewWindow::Region { secs, start };
            }
        }

        transport.locate_to(ctx, LocateTarget::RegionStart);
    }
}
