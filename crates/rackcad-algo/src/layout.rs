//! Places columns, plates, guard rails, bracing, beams, side beams, decking and
//! spacers for a rack.
//!
//! World frame: X runs along the bays, Y across the depth of a row, Z up. Row `r`
//! spans `r·(D + row_spacing) ..= r·(D + row_spacing) + D` in Y; column line `i`
//! sits at `X = i·W`.

use crate::assembly::{Assembly, AxisRotation, Axis, ShapeId};
use crate::bracing::{bracing_segments, BracingMode};
use crate::error::LayoutError;
use crate::solid::{self, ProfileKind, UprightProfile, DEFAULT_UPRIGHT_WALL};
use nalgebra::Vector3;
use rackcad_core::color::{Palette, Rgba};
use rackcad_core::model::{RackConfig, SectionSize};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// How beam levels are distributed over the frame height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSpacing {
    /// Linear between `bottom` and `total_height - top`.
    Clearance { bottom: f64, top: f64 },
    /// `level × H / (levels + 1)`.
    Uniform,
    /// `first_beam_height + (level - 1) × beam_spacing`.
    Configured,
}

impl Default for LevelSpacing {
    fn default() -> Self {
        LevelSpacing::Clearance {
            bottom: 300.0,
            top: 400.0,
        }
    }
}

impl LevelSpacing {
    /// Beam centre heights for levels `1..=levels`.
    pub fn level_heights(&self, params: &LayoutParams) -> Result<Vec<f64>, LayoutError> {
        let h = params.total_height;
        let n = params.levels;
        let heights: Vec<f64> = match *self {
            LevelSpacing::Clearance { bottom, top } => {
                let span = (h - top) - bottom;
                if n > 1 && !(span > 0.0) {
                    return Err(LayoutError::NonPositive {
                        what: "level span between clearances",
                        value: span,
                    });
                }
                let step = if n > 1 { span / f64::from(n - 1) } else { 0.0 };
                (0..n).map(|k| bottom + f64::from(k) * step).collect()
            }
            LevelSpacing::Uniform => {
                let step = h / f64::from(n + 1);
                (1..=n).map(|level| f64::from(level) * step).collect()
            }
            LevelSpacing::Configured => (0..n)
                .map(|k| params.first_beam_height + f64::from(k) * params.beam_spacing)
                .collect(),
        };
        if let Some(&z) = heights.iter().find(|z| !(z.is_finite() && **z > 0.0)) {
            return Err(LayoutError::NonPositive {
                what: "level height",
                value: z,
            });
        }
        Ok(heights)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub name: String,
    pub level_spacing: LevelSpacing,
    pub bracing: BracingMode,
    pub bracing_width: f64,
    pub bracing_thickness: f64,
    /// Spacer heights as fractions of the frame height.
    pub spacer_heights: Vec<f64>,
    pub panels_per_bay: u32,
    pub seam_gap: f64,
    pub upright_wall: f64,
    /// Depth-wise beams on the two end frames at every level.
    pub side_beams: bool,
    /// Guard rings around every column foot.
    pub guard_rails: bool,
    pub bracing_color: String,
    pub base_plate_color: String,
    pub spacer_color: String,
    pub guard_rail_color: String,
    pub palette: Palette,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            name: "warehouse_rack".to_string(),
            level_spacing: LevelSpacing::default(),
            bracing: BracingMode::default(),
            bracing_width: 30.0,
            bracing_thickness: 2.0,
            spacer_heights: vec![1.0 / 3.0, 2.0 / 3.0],
            panels_per_bay: 1,
            seam_gap: 5.0,
            upright_wall: DEFAULT_UPRIGHT_WALL,
            side_beams: true,
            guard_rails: false,
            bracing_color: "gray".to_string(),
            base_plate_color: "gray".to_string(),
            spacer_color: "gray".to_string(),
            guard_rail_color: "orange".to_string(),
            palette: Palette::default(),
        }
    }
}

/// Dimensions and component choices the engine lays out.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub bay_width: f64,
    pub bay_depth: f64,
    pub total_height: f64,
    pub levels: u32,
    pub first_beam_height: f64,
    pub beam_spacing: f64,
    pub bay_count: u32,
    pub row_count: u32,
    pub row_spacing: f64,
    pub double_row: bool,
    pub upright_kind: ProfileKind,
    pub upright_section: SectionSize,
    pub beam_section: SectionSize,
    /// Panel thickness, `None` when the rack has no decking.
    pub decking_thickness: Option<f64>,
    pub upright_color: String,
    pub beam_color: String,
    pub decking_color: String,
}

impl LayoutParams {
    pub fn from_config(config: &RackConfig) -> Result<Self, LayoutError> {
        let layout = &config.warehouse_config.overall_layout;
        let rack = &config.racking_system;
        let parts = &rack.components;
        Ok(Self {
            bay_width: rack.dimensions.bay_width,
            bay_depth: rack.dimensions.bay_depth,
            total_height: rack.dimensions.total_height,
            levels: rack.structure.levels,
            first_beam_height: rack.structure.first_beam_height,
            beam_spacing: rack.structure.beam_spacing,
            bay_count: layout.bays_per_row,
            row_count: layout.rows,
            row_spacing: layout.row_spacing,
            double_row: layout.double_row,
            upright_kind: ProfileKind::from_type_name(&parts.upright.profile),
            upright_section: SectionSize::parse(&parts.upright.section_size)?,
            beam_section: SectionSize::parse(&parts.beam.section_size)?,
            decking_thickness: parts
                .decking
                .has_decking
                .then_some(parts.decking.thickness),
            upright_color: parts.upright.color.clone(),
            beam_color: parts.beam.color.clone(),
            decking_color: parts.decking.color.clone(),
        })
    }

    /// Reads a completed configuration; any missing key is an error.
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        Self::from_config(&RackConfig::from_value(value)?)
    }

    /// Double-row mode always lays out at least two rows.
    pub fn effective_rows(&self) -> u32 {
        if self.double_row {
            self.row_count.max(2)
        } else {
            self.row_count
        }
    }

    /// `(front, back)` Y coordinates of every row.
    pub fn row_pairs(&self) -> Vec<(f64, f64)> {
        let pitch = self.bay_depth + self.row_spacing;
        (0..self.effective_rows())
            .map(|r| {
                let y0 = f64::from(r) * pitch;
                (y0, y0 + self.bay_depth)
            })
            .collect()
    }

    fn check(&self) -> Result<(), LayoutError> {
        for (what, value) in [
            ("bay width", self.bay_width),
            ("bay depth", self.bay_depth),
            ("total height", self.total_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::NonPositive { what, value });
            }
        }
        for (what, value) in [
            ("levels", self.levels),
            ("bays per row", self.bay_count),
            ("rows", self.effective_rows()),
        ] {
            if value < 1 {
                return Err(LayoutError::TooFew {
                    what,
                    min: 1,
                    value,
                });
            }
        }
        if self.effective_rows() > 1 && !(self.row_spacing.is_finite() && self.row_spacing > 0.0) {
            return Err(LayoutError::NonPositive {
                what: "row spacing",
                value: self.row_spacing,
            });
        }
        Ok(())
    }
}

/// Side of a row a column or beam sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Front,
    Back,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

pub struct RackBuilder {
    opts: LayoutOptions,
}

impl RackBuilder {
    pub fn new(opts: LayoutOptions) -> Self {
        Self { opts }
    }

    pub fn build(&self, params: &LayoutParams) -> Result<Assembly, LayoutError> {
        params.check()?;
        let mut asm = Assembly::new(self.opts.name.clone());
        let rows = params.row_pairs();

        self.place_frames(&mut asm, params, &rows)?;
        self.place_bracing(&mut asm, params, &rows)?;
        self.place_bays(&mut asm, params, &rows)?;
        if self.opts.side_beams {
            self.place_side_beams(&mut asm, params, &rows)?;
        }
        if self.opts.guard_rails {
            self.place_guard_rails(&mut asm, params, &rows)?;
        }
        if params.double_row {
            self.place_spacers(&mut asm, params, &rows)?;
        }

        info!(
            name = asm.name(),
            rows = rows.len(),
            bays = params.bay_count,
            levels = params.levels,
            placements = asm.len(),
            shapes = asm.shapes().len(),
            "rack assembled"
        );
        Ok(asm)
    }

    fn color(&self, name: &str) -> Rgba {
        self.opts.palette.resolve(name)
    }

    fn place_frames(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        rows: &[(f64, f64)],
    ) -> Result<(), LayoutError> {
        let profile = UprightProfile::new(
            params.upright_kind,
            params.upright_section,
            self.opts.upright_wall,
        );
        let column = asm.add_shape(solid::upright(&profile, params.total_height)?);
        let plate = asm.add_shape(solid::base_plate(params.upright_section)?);
        let column_color = self.color(&params.upright_color);
        let plate_color = self.color(&self.opts.base_plate_color);

        for (r, &(y_front, y_back)) in rows.iter().enumerate() {
            for i in 0..=params.bay_count {
                let x = f64::from(i) * params.bay_width;
                for (side, y) in [(Side::Front, y_front), (Side::Back, y_back)] {
                    let name = format!("r{r}_col{i}_{}", side.as_str());
                    let at = Vector3::new(x, y, 0.0);
                    asm.place(format!("{name}_plate"), plate, at, None, plate_color)?;
                    asm.place(name, column, at, None, column_color)?;
                }
            }
        }
        Ok(())
    }

    fn place_bracing(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        rows: &[(f64, f64)],
    ) -> Result<(), LayoutError> {
        let segments = bracing_segments(params.total_height, params.bay_depth, self.opts.bracing)?;
        let Some(first) = segments.first() else {
            return Ok(());
        };
        let bar = asm.add_shape(solid::bracing_bar(
            first.length,
            self.opts.bracing_width,
            self.opts.bracing_thickness,
        )?);
        let color = self.color(&self.opts.bracing_color);
        debug!(segments = segments.len(), height = first.height, "end-frame bracing");

        for (r, &(y_front, y_back)) in rows.iter().enumerate() {
            let y_mid = (y_front + y_back) * 0.5;
            for i in [0, params.bay_count] {
                let x = f64::from(i) * params.bay_width;
                for seg in &segments {
                    asm.place(
                        format!("r{r}_col{i}_brace{}", seg.index),
                        bar,
                        Vector3::new(x, y_mid, seg.z_mid),
                        Some(AxisRotation::new(Axis::X, seg.rotation_deg)),
                        color,
                    )?;
                }
            }
        }
        Ok(())
    }

    fn place_bays(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        rows: &[(f64, f64)],
    ) -> Result<(), LayoutError> {
        let column_width = params.upright_section.first;
        let span = params.bay_width - column_width;
        if !(span > 0.0) {
            return Err(LayoutError::NonPositive {
                what: "clear span between columns",
                value: span,
            });
        }
        let beam = asm.add_shape(solid::beam(params.beam_section, span)?);
        let beam_turn = Some(AxisRotation::new(Axis::Y, 90.0));
        let beam_color = self.color(&params.beam_color);
        let levels = self.opts.level_spacing.level_heights(params)?;

        let deck = match params.decking_thickness {
            Some(thickness) => Some(self.deck_layout(asm, params, span, thickness)?),
            None => None,
        };
        let deck_color = self.color(&params.decking_color);

        for (r, &(y_front, y_back)) in rows.iter().enumerate() {
            let y_mid = (y_front + y_back) * 0.5;
            for b in 0..params.bay_count {
                let x_mid = (f64::from(b) + 0.5) * params.bay_width;
                for (k, &z) in levels.iter().enumerate() {
                    let level = k + 1;
                    for (side, y) in [(Side::Front, y_front), (Side::Back, y_back)] {
                        asm.place(
                            format!("r{r}_bay{b}_l{level}_beam_{}", side.as_str()),
                            beam,
                            Vector3::new(x_mid, y, z),
                            beam_turn,
                            beam_color,
                        )?;
                    }

                    let Some(deck) = &deck else { continue };
                    let z_deck = z + params.beam_section.first * 0.5 + deck.thickness * 0.5;
                    for (p, x_off) in deck.offsets.iter().enumerate() {
                        let name = if deck.offsets.len() == 1 {
                            format!("r{r}_bay{b}_l{level}_deck")
                        } else {
                            format!("r{r}_bay{b}_l{level}_deck{p}")
                        };
                        asm.place(
                            name,
                            deck.shape,
                            Vector3::new(x_mid + x_off, y_mid, z_deck),
                            None,
                            deck_color,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn place_side_beams(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        rows: &[(f64, f64)],
    ) -> Result<(), LayoutError> {
        let span = params.bay_depth - params.upright_section.second;
        if !(span > 0.0) {
            return Err(LayoutError::NonPositive {
                what: "clear depth between columns",
                value: span,
            });
        }
        let beam = asm.add_shape(solid::side_beam(params.beam_section, span)?);
        let turn = Some(AxisRotation::new(Axis::X, 90.0));
        let color = self.color(&params.beam_color);
        let levels = self.opts.level_spacing.level_heights(params)?;

        for (r, &(y_front, y_back)) in rows.iter().enumerate() {
            let y_mid = (y_front + y_back) * 0.5;
            for i in [0, params.bay_count] {
                let x = f64::from(i) * params.bay_width;
                for (k, &z) in levels.iter().enumerate() {
                    asm.place(
                        format!("r{r}_col{i}_l{}_side_beam", k + 1),
                        beam,
                        Vector3::new(x, y_mid, z),
                        turn,
                        color,
                    )?;
                }
            }
        }
        Ok(())
    }

    fn place_guard_rails(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        rows: &[(f64, f64)],
    ) -> Result<(), LayoutError> {
        let half = asm.add_shape(solid::guard_rail(params.upright_section)?);
        let color = self.color(&self.opts.guard_rail_color);
        let halves = [None, Some(AxisRotation::new(Axis::Z, 180.0))];

        for (r, &(y_front, y_back)) in rows.iter().enumerate() {
            for i in 0..=params.bay_count {
                let x = f64::from(i) * params.bay_width;
                for (side, y) in [(Side::Front, y_front), (Side::Back, y_back)] {
                    // Stands on the floor beside the plate.
                    let at = Vector3::new(x, y, -solid::BASE_PLATE_THICKNESS);
                    for (k, turn) in halves.into_iter().enumerate() {
                        asm.place(
                            format!("r{r}_col{i}_{}_guard{k}", side.as_str()),
                            half,
                            at,
                            turn,
                            color,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn deck_layout(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        span: f64,
        thickness: f64,
    ) -> Result<DeckLayout, LayoutError> {
        let panels = self.opts.panels_per_bay;
        if panels < 1 {
            return Err(LayoutError::TooFew {
                what: "panels per bay",
                min: 1,
                value: panels,
            });
        }
        let gaps = f64::from(panels - 1) * self.opts.seam_gap;
        let width = (span - gaps) / f64::from(panels);
        if !(width > 0.0) {
            return Err(LayoutError::NonPositive {
                what: "decking panel width",
                value: width,
            });
        }

        let (thickness, note) = solid::clamp_decking_thickness(thickness);
        if let Some(note) = note {
            warn!("{note}");
            asm.add_note(note);
        }
        let shape = asm.add_shape(solid::decking(width, params.bay_depth, thickness)?);
        let pitch = width + self.opts.seam_gap;
        let first = -span * 0.5 + width * 0.5;
        let offsets = (0..panels).map(|p| first + f64::from(p) * pitch).collect();
        Ok(DeckLayout {
            shape,
            thickness,
            offsets,
        })
    }

    fn place_spacers(
        &self,
        asm: &mut Assembly,
        params: &LayoutParams,
        rows: &[(f64, f64)],
    ) -> Result<(), LayoutError> {
        if rows.len() < 2 {
            return Ok(());
        }
        if self.opts.spacer_heights.is_empty() {
            return Err(LayoutError::TooFew {
                what: "spacer heights",
                min: 1,
                value: 0,
            });
        }
        if let Some(&f) = self
            .opts
            .spacer_heights
            .iter()
            .find(|f| !(**f > 0.0 && **f < 1.0))
        {
            return Err(LayoutError::BadFraction {
                what: "spacer height",
                value: f,
            });
        }

        let color = self.color(&self.opts.spacer_color);
        let turn = Some(AxisRotation::new(Axis::X, 90.0));
        for (r, pair) in rows.windows(2).enumerate() {
            let (gap_start, gap_end) = (pair[0].1, pair[1].0);
            let bar = asm.add_shape(solid::spacer_bar(gap_end - gap_start)?);
            let y = (gap_start + gap_end) * 0.5;
            for i in 0..=params.bay_count {
                let x = f64::from(i) * params.bay_width;
                for (k, frac) in self.opts.spacer_heights.iter().enumerate() {
                    asm.place(
                        format!("r{r}-{}_col{i}_spacer{k}", r + 1),
                        bar,
                        Vector3::new(x, y, frac * params.total_height),
                        turn,
                        color,
                    )?;
                }
            }
        }
        Ok(())
    }
}

struct DeckLayout {
    shape: ShapeId,
    thickness: f64,
    /// Panel centre offsets along X from the bay midpoint.
    offsets: Vec<f64>,
}
