//! The ribbon edit pipeline.
//!
//! [`apply_ribbon`] runs every stage for one curve bundle: it marks and deletes
//! the region between the curves, estimates extrusion frames, builds and
//! subdivides control polylines, and stitches the new strip in. The three
//! editing profiles share the pipeline and differ only in their
//! [`ProfileConfig`].
//!
//! All edits happen on a scratch copy of the mesh that replaces the caller's
//! mesh only when every stage succeeded, so a failed edit leaves the input
//! untouched.

use std::fmt;
use std::str::FromStr;

use crate::algo::{CancelToken, Progress};
use crate::error::{MeshError, Result};
use crate::mesh::{AdjacencyGraph, MeshIndex, TriMesh, VertexId};

use super::control::{build_control_polylines, refresh_endpoints, smooth_interior_points, ControlLayout};
use super::curve::RibbonCurves;
use super::filter::{smooth_directions, FilterPass};
use super::frame::{build_frames, cross_sections, estimate_directions, smooth_extends};
use super::patch::{close_open_ends, finish_mesh, stitch_strip, strip_winding};
use super::region::{mark_ribbon_region, region_triangles, RegionMarks};
use super::services::RibbonServices;
use super::strip::{insert_rows, subdivide_polylines, SubdivisionGrid};

/// Editing profile of a ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Flat bevel.
    Chamfer,
    /// Rounded bevel; also smooths the top and down curves.
    Blend,
    /// Single ridge.
    Sharp,
}

impl Profile {
    /// All profiles.
    pub const ALL: [Profile; 3] = [Profile::Chamfer, Profile::Blend, Profile::Sharp];

    /// Lowercase profile name.
    pub fn name(self) -> &'static str {
        match self {
            Profile::Chamfer => "chamfer",
            Profile::Blend => "blend",
            Profile::Sharp => "sharp",
        }
    }

    /// Pipeline configuration of this profile.
    pub fn config(self) -> ProfileConfig {
        match self {
            Profile::Chamfer => ProfileConfig::new(ControlLayout::Handles),
            Profile::Blend => ProfileConfig::new(ControlLayout::Handles).with_boundary_smoothing(true),
            Profile::Sharp => ProfileConfig::new(ControlLayout::Apex),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MeshError::invalid_param("profile", s, "expected chamfer, blend or sharp"))
    }
}

/// What distinguishes one profile from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Control polyline layout.
    pub layout: ControlLayout,
    /// Smooth the top and down curves through the services before subdividing.
    pub smooth_boundary_curves: bool,
}

impl ProfileConfig {
    /// A configuration with the given layout and no boundary smoothing.
    pub fn new(layout: ControlLayout) -> Self {
        Self {
            layout,
            smooth_boundary_curves: false,
        }
    }

    /// Enable or disable boundary curve smoothing.
    pub fn with_boundary_smoothing(mut self, enabled: bool) -> Self {
        self.smooth_boundary_curves = enabled;
        self
    }
}

impl From<Profile> for ProfileConfig {
    fn from(profile: Profile) -> Self {
        profile.config()
    }
}

/// Numeric parameters of the pipeline.
#[derive(Debug, Clone)]
pub struct RibbonOptions {
    /// Segments each control polyline segment is subdivided into.
    pub subdivision_count: usize,

    /// Scale of the extend vectors for handle layouts.
    pub handle_scale: f64,

    /// Smoothing of extrusion directions along the curve.
    pub direction_pass: FilterPass,

    /// Smoothing of handle lengths along the curve.
    pub extend_pass: FilterPass,

    /// Smoothing of interior control points along the curve.
    pub control_pass: FilterPass,

    /// Whether to compute frames in parallel (default: true).
    pub parallel: bool,
}

impl Default for RibbonOptions {
    fn default() -> Self {
        Self {
            subdivision_count: 3,
            handle_scale: 0.33,
            direction_pass: FilterPass::new(5, 0.5),
            extend_pass: FilterPass::new(5, 0.5),
            control_pass: FilterPass::new(3, 0.5),
            parallel: true,
        }
    }
}

impl RibbonOptions {
    /// Set the subdivision count.
    pub fn with_subdivisions(mut self, count: usize) -> Self {
        self.subdivision_count = count;
        self
    }

    /// Set the handle scale.
    pub fn with_handle_scale(mut self, scale: f64) -> Self {
        self.handle_scale = scale;
        self
    }

    /// Set the direction smoothing pass.
    pub fn with_direction_pass(mut self, pass: FilterPass) -> Self {
        self.direction_pass = pass;
        self
    }

    /// Set the handle length smoothing pass.
    pub fn with_extend_pass(mut self, pass: FilterPass) -> Self {
        self.extend_pass = pass;
        self
    }

    /// Set the control point smoothing pass.
    pub fn with_control_pass(mut self, pass: FilterPass) -> Self {
        self.control_pass = pass;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.subdivision_count == 0 {
            return Err(MeshError::invalid_param(
                "subdivision_count",
                self.subdivision_count,
                "must be at least 1",
            ));
        }
        if !self.handle_scale.is_finite() || self.handle_scale < 0.0 {
            return Err(MeshError::invalid_param(
                "handle_scale",
                self.handle_scale,
                "must be finite and non-negative",
            ));
        }
        for (name, pass) in [
            ("direction_pass.weight", self.direction_pass),
            ("extend_pass.weight", self.extend_pass),
            ("control_pass.weight", self.control_pass),
        ] {
            if !(0.0..=1.0).contains(&pass.weight) {
                return Err(MeshError::invalid_param(name, pass.weight, "must be in [0, 1]"));
            }
        }
        Ok(())
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has run yet.
    Idle,
    /// Normals refreshed and adjacency graph built.
    AdjacencyBuilt,
    /// Region vertices marked.
    RegionMarked,
    /// Region triangles deleted.
    RegionDeleted,
    /// Extrusion frames estimated.
    FramesComputed,
    /// Handle lengths smoothed.
    Smoothed,
    /// Control polylines built.
    PolylinesBuilt,
    /// New rows inserted.
    Subdivided,
    /// Strip and end caps stitched in.
    Patched,
    /// Mesh cleaned up.
    Done,
    /// A stage failed.
    Failed,
}

impl Stage {
    /// Number of working stages between [`Stage::Idle`] and [`Stage::Done`].
    pub const COUNT: usize = 9;

    /// Position of the stage in the pipeline (`Idle` is 0, `Done` is [`Stage::COUNT`]).
    pub fn position(self) -> usize {
        match self {
            Stage::Idle | Stage::Failed => 0,
            Stage::AdjacencyBuilt => 1,
            Stage::RegionMarked => 2,
            Stage::RegionDeleted => 3,
            Stage::FramesComputed => 4,
            Stage::Smoothed => 5,
            Stage::PolylinesBuilt => 6,
            Stage::Subdivided => 7,
            Stage::Patched => 8,
            Stage::Done => 9,
        }
    }

    /// The work that leads into this stage.
    pub fn activity(self) -> &'static str {
        match self {
            Stage::Idle => "waiting",
            Stage::AdjacencyBuilt => "building adjacency",
            Stage::RegionMarked => "marking region",
            Stage::RegionDeleted => "deleting region",
            Stage::FramesComputed => "computing frames",
            Stage::Smoothed => "smoothing handles",
            Stage::PolylinesBuilt => "building control polylines",
            Stage::Subdivided => "subdividing polylines",
            Stage::Patched => "patching mesh",
            Stage::Done => "cleaning up",
            Stage::Failed => "failed",
        }
    }
}

/// What a successful ribbon edit did.
#[derive(Debug, Clone)]
pub struct RibbonReport<I: MeshIndex = u32> {
    /// Region marks, indexed by the pre-edit vertex slots.
    pub region: RegionMarks,
    /// Triangles removed from the region.
    pub deleted_triangles: usize,
    /// Vertices created for interior rows.
    pub inserted_vertices: usize,
    /// Triangles added for the strip.
    pub strip_triangles: usize,
    /// Triangles added by hole filling (open curves only).
    pub hole_fill_triangles: usize,
    /// Vertices removed because no triangle used them any more.
    pub pruned_vertices: usize,
    /// Rows per cross-section, including the top and down rows.
    pub rows: usize,
    /// Vertex ids of the strip.
    pub grid: SubdivisionGrid<I>,
    /// Seeds passed to hole filling (empty for closed curves).
    pub hole_seeds: Vec<VertexId<I>>,
}

/// Apply a ribbon edit to `mesh`.
///
/// # Errors
///
/// Precondition failures ([`MeshError::EmptyMesh`], curve and option errors)
/// are returned as-is. Failures inside the pipeline are wrapped in
/// [`MeshError::StageFailed`]. In every error case `mesh` is unchanged.
///
/// # Example
///
/// ```
/// use meshrib::prelude::*;
/// use nalgebra::Point3;
///
/// // A 4 x 4 grid of unit squares in the z = 0 plane.
/// let mut vertices = Vec::new();
/// for j in 0..5 {
///     for i in 0..5 {
///         vertices.push(Point3::new(i as f64, j as f64, 0.0));
///     }
/// }
/// let mut faces = Vec::new();
/// for j in 0..4 {
///     for i in 0..4 {
///         let v = j * 5 + i;
///         faces.push([v, v + 1, v + 6]);
///         faces.push([v, v + 6, v + 5]);
///     }
/// }
/// let mut mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
///
/// let row = |j: usize| (1..4).map(|i| VertexId::new(j * 5 + i)).collect::<Vec<_>>();
/// let curves = RibbonCurves::open(row(2), row(1), row(3));
///
/// let report = apply_ribbon(
///     &mut mesh,
///     &curves,
///     Profile::Chamfer,
///     &RibbonOptions::default(),
///     &MeshServices::new(),
/// )
/// .unwrap();
/// assert_eq!(report.deleted_triangles, 8);
/// assert_eq!(report.rows, 10);
/// ```
pub fn apply_ribbon<I, S>(
    mesh: &mut TriMesh<I>,
    curves: &RibbonCurves<I>,
    profile: impl Into<ProfileConfig>,
    options: &RibbonOptions,
    services: &S,
) -> Result<RibbonReport<I>>
where
    I: MeshIndex,
    S: RibbonServices<I> + ?Sized,
{
    apply_ribbon_with_progress(
        mesh,
        curves,
        profile,
        options,
        services,
        &Progress::none(),
        &CancelToken::new(),
    )
}

/// Apply a ribbon edit with progress reporting and cancellation.
///
/// Progress is reported once per stage in permille. The cancel token is
/// checked before every stage; a cancelled edit returns
/// [`MeshError::Cancelled`] and leaves `mesh` unchanged.
pub fn apply_ribbon_with_progress<I, S>(
    mesh: &mut TriMesh<I>,
    curves: &RibbonCurves<I>,
    profile: impl Into<ProfileConfig>,
    options: &RibbonOptions,
    services: &S,
    progress: &Progress,
    cancel: &CancelToken,
) -> Result<RibbonReport<I>>
where
    I: MeshIndex,
    S: RibbonServices<I> + ?Sized,
{
    options.validate()?;
    curves.validate(mesh)?;
    let config = profile.into();

    log::debug!(
        "ribbon edit: {} cross-sections, {} curves, {:?}",
        curves.string_size(),
        if curves.closed { "closed" } else { "open" },
        config.layout
    );

    let mut scratch = mesh.clone();
    let mut run = RibbonRun {
        stage: Stage::Idle,
        progress,
        cancel,
    };

    match run.execute(&mut scratch, curves, &config, options, services) {
        Ok(report) => {
            *mesh = scratch;
            log::debug!(
                "ribbon edit done: -{} +{} triangles, {} new vertices",
                report.deleted_triangles,
                report.strip_triangles + report.hole_fill_triangles,
                report.inserted_vertices
            );
            Ok(report)
        }
        Err(err) => {
            if !err.is_cancelled() {
                log::warn!("ribbon edit rolled back: {}", err);
            }
            Err(err)
        }
    }
}

struct RibbonRun<'a> {
    stage: Stage,
    progress: &'a Progress,
    cancel: &'a CancelToken,
}

impl RibbonRun<'_> {
    /// Run the work leading into `target`, tagging any failure with it.
    fn step<T>(&mut self, target: Stage, work: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Err(err) = self.cancel.check() {
            self.stage = Stage::Failed;
            return Err(err);
        }
        self.progress
            .report_stage(self.stage.position(), Stage::COUNT, target.activity());

        match work() {
            Ok(value) => {
                log::trace!("ribbon stage reached: {:?}", target);
                self.stage = target;
                Ok(value)
            }
            Err(err) => {
                self.stage = Stage::Failed;
                Err(err.in_stage(target.activity()))
            }
        }
    }

    fn execute<I, S>(
        &mut self,
        scratch: &mut TriMesh<I>,
        curves: &RibbonCurves<I>,
        config: &ProfileConfig,
        options: &RibbonOptions,
        services: &S,
    ) -> Result<RibbonReport<I>>
    where
        I: MeshIndex,
        S: RibbonServices<I> + ?Sized,
    {
        let closed = curves.closed;

        let graph = self.step(Stage::AdjacencyBuilt, || {
            scratch.update_normals();
            Ok(AdjacencyGraph::build(scratch))
        })?;

        let (region, doomed) = self.step(Stage::RegionMarked, || {
            let marks = mark_ribbon_region(scratch, &graph, curves, services)?;
            let doomed = region_triangles(scratch, &marks);
            Ok((marks, doomed))
        })?;
        log::trace!(
            "region: {} fence, {} interior vertices",
            region.fence_count(),
            region.interior_count()
        );

        let deleted_triangles = self.step(Stage::RegionDeleted, || scratch.delete_triangles(&doomed))?;

        let (sections, mut frames) = self.step(Stage::FramesComputed, || {
            let sections = cross_sections(scratch, &curves.top, &curves.down);
            let mut directions = estimate_directions(&sections, closed, options.parallel);
            smooth_directions(&mut directions, closed, options.direction_pass);
            let frames = build_frames(&sections, &directions, options.parallel);
            Ok((sections, frames))
        })?;

        self.step(Stage::Smoothed, || {
            smooth_extends(&mut frames, closed, options.extend_pass);
            Ok(())
        })?;

        let polylines = self.step(Stage::PolylinesBuilt, || {
            let mut polylines =
                build_control_polylines(&sections, &frames, config.layout, options.handle_scale);
            smooth_interior_points(&mut polylines, closed, options.control_pass);
            if config.smooth_boundary_curves {
                services.smooth_curve(scratch, &curves.top, closed)?;
                services.smooth_curve(scratch, &curves.down, closed)?;
                refresh_endpoints(&mut polylines, scratch, &curves.top, &curves.down);
            }
            Ok(polylines)
        })?;

        let grid = self.step(Stage::Subdivided, || {
            let subdivided =
                subdivide_polylines::<I, S>(services, &polylines, options.subdivision_count)?;
            insert_rows(scratch, &curves.top, &curves.down, &subdivided)
        })?;

        let (strip_triangles, hole_seeds, hole_fill_triangles) = self.step(Stage::Patched, || {
            let winding = strip_winding(scratch, curves);
            let strip = stitch_strip(scratch, &grid, &curves.column_pairs(), winding)?;
            if closed {
                Ok((strip, Vec::new(), 0))
            } else {
                let (seeds, added) = close_open_ends(scratch, services, &curves.top)?;
                Ok((strip, seeds, added))
            }
        })?;

        let pruned_vertices = self.step(Stage::Done, || Ok(finish_mesh(scratch)))?;
        self.progress
            .report_stage(Stage::COUNT, Stage::COUNT, Stage::Done.activity());

        Ok(RibbonReport {
            region,
            deleted_triangles,
            inserted_vertices: grid.interior_vertices().count(),
            strip_triangles,
            hole_fill_triangles,
            pruned_vertices,
            rows: grid.num_rows(),
            grid,
            hole_seeds,
        })
    }
}
