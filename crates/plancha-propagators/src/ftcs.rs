//! Forward-time, centred-space control-volume scheme for the slab.
//!
//! Each node owns a control volume of `ex·ey·dx²` (`ex`, `ey` from
//! [`NodeCategory::extents`]). An energy balance over that volume gives
//! the update as a weighted sum of old temperatures:
//!
//! ```text
//! T'ᵢ = cᵢᵢ·Tᵢ + Σⱼ cᵢⱼ·Tⱼ + c∞·T∞ + S
//!
//! cᵢⱼ = Fo / ey    j above or below i
//! cᵢⱼ = Fo / ex    j left or right of i
//! c∞  = Bi·Fo · (convective face length) / (ex·ey)
//! S   = Fo · (q''·dx/k) · (flux face length) / (ex·ey)
//! cᵢᵢ = 1 − Σⱼ cᵢⱼ − c∞
//! ```
//!
//! On the nine categories this reduces to the familiar closed forms, e.g.
//! `Fo·(2T_a + 2T_b + 4Bi·T∞) + (1 − 4Fo − 4BiFo)·T` at a convective
//! corner. Coefficients sum to one by construction, and `wᵢ·cᵢⱼ = wⱼ·cⱼᵢ`
//! for the volume weights `wᵢ = ex·ey`, so with no flux and no
//! convection `Σ wᵢ·Tᵢ` is conserved.

use plancha_arena::{PingPongField, StagingGuard};
use plancha_core::{
    require_finite, ConfigError, MaterialProperties, StabilityParameters, StepError,
};
use plancha_space::{NodeCategory, SlabGrid};
use smallvec::SmallVec;

use crate::boundary::SurfaceConditions;
use crate::snapshot::FieldSnapshot;

/// Update weights for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStencil {
    /// Category the weights were derived for.
    pub category: NodeCategory,
    /// Weight on the node's own old temperature.
    pub self_coeff: f64,
    /// `(flat index, weight)` for each in-bounds neighbour.
    pub neighbours: SmallVec<[(usize, f64); 4]>,
    /// Weight on the ambient temperature.
    pub ambient_coeff: f64,
    /// Constant flux source term, K per step.
    pub source: f64,
}

impl NodeStencil {
    fn build(grid: &SlabGrid, index: usize, fourier: f64, biot: f64, flux_number: f64) -> Self {
        let category = grid.category(index);
        let (ex, ey) = category.extents();
        let volume = category.volume_weight();

        let neighbours: SmallVec<[(usize, f64); 4]> = grid
            .neighbours(index)
            .into_iter()
            .map(|(dir, j)| {
                let coeff = if dir.is_vertical() {
                    fourier / ey
                } else {
                    fourier / ex
                };
                (j, coeff)
            })
            .collect();
        let ambient_coeff = biot * fourier * category.convective_length() / volume;
        let source = fourier * flux_number * category.flux_length() / volume;
        let conducted: f64 = neighbours.iter().map(|&(_, c)| c).sum();

        Self {
            category,
            self_coeff: 1.0 - conducted - ambient_coeff,
            neighbours,
            ambient_coeff,
            source,
        }
    }

    /// Sum of the weights on every temperature the update reads.
    ///
    /// Exactly one up to rounding.
    pub fn coefficient_sum(&self) -> f64 {
        self.self_coeff + self.ambient_coeff + self.neighbours.iter().map(|&(_, c)| c).sum::<f64>()
    }

    /// New temperature of a node whose old temperature is `own`.
    #[inline]
    pub fn apply(&self, own: f64, current: &[f64], ambient: f64) -> f64 {
        let mut acc = self.self_coeff * own;
        for &(j, c) in &self.neighbours {
            acc += c * current[j];
        }
        acc + self.ambient_coeff * ambient + self.source
    }
}

/// Stencils for every node of a grid, built once per parameter set.
#[derive(Clone, Debug)]
pub struct StencilTable {
    stencils: Vec<NodeStencil>,
}

impl StencilTable {
    /// Build stencils from the grid's cached categories.
    ///
    /// `flux_number` is `q''·dx/k`, the temperature difference the surface
    /// flux drives across one spacing.
    pub fn build(grid: &SlabGrid, fourier: f64, biot: f64, flux_number: f64) -> Self {
        let stencils = (0..grid.cell_count())
            .map(|i| NodeStencil::build(grid, i, fourier, biot, flux_number))
            .collect();
        Self { stencils }
    }

    /// Stencil of node `index`.
    pub fn get(&self, index: usize) -> Option<&NodeStencil> {
        self.stencils.get(index)
    }

    /// Number of stencils (one per node).
    pub fn len(&self) -> usize {
        self.stencils.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.stencils.is_empty()
    }

    /// Iterate stencils in row-major node order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeStencil> {
        self.stencils.iter()
    }

    #[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
    fn evaluate_serial(&self, current: &[f64], next: &mut [f64], ambient: f64) {
        for (i, (out, stencil)) in next.iter_mut().zip(&self.stencils).enumerate() {
            *out = stencil.apply(current[i], current, ambient);
        }
    }

    #[cfg(feature = "parallel")]
    fn evaluate_parallel(&self, current: &[f64], next: &mut [f64], ambient: f64) {
        use rayon::prelude::*;
        next.par_iter_mut()
            .zip(self.stencils.par_iter())
            .enumerate()
            .for_each(|(i, (out, stencil))| {
                *out = stencil.apply(current[i], current, ambient);
            });
    }

    fn evaluate(&self, current: &[f64], next: &mut [f64], ambient: f64) {
        #[cfg(feature = "parallel")]
        {
            self.evaluate_parallel(current, next, ambient);
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.evaluate_serial(current, next, ambient);
        }
    }
}

/// The slab temperature field and the explicit scheme that advances it.
///
/// Advancing is two explicit calls: [`step`](Self::step) writes the next
/// time level into the staging buffer, [`commit`](Self::commit) makes it
/// current. Calling `step` again before `commit` recomputes the same
/// staged field.
#[derive(Clone, Debug)]
pub struct FiniteDifferenceGrid {
    grid: SlabGrid,
    field: PingPongField,
    stencils: StencilTable,
    parameters: StabilityParameters,
    surface: SurfaceConditions,
    dt: f64,
}

impl FiniteDifferenceGrid {
    /// Set up a grid at uniform `initial` temperature, marching with `dt`.
    ///
    /// The Fourier number is computed from `dt` as given; stability is the
    /// caller's concern (see [`StabilityAnalyzer`](crate::StabilityAnalyzer)).
    pub fn new(
        grid: SlabGrid,
        material: MaterialProperties,
        surface: SurfaceConditions,
        dt: f64,
        initial: f64,
    ) -> Result<Self, ConfigError> {
        material.validate()?;
        surface.validate()?;
        let initial = require_finite("initial_temperature", initial)?;
        let dx = grid.spacing();
        let k = material.conductivity;
        let parameters = StabilityParameters::new(
            surface.convection_coefficient,
            k,
            dx,
            material.diffusivity(),
            dt,
            dx,
        )?;
        let flux_number = surface.heat_flux * dx / k;
        let stencils = StencilTable::build(&grid, parameters.fourier, parameters.biot, flux_number);
        log::debug!(
            "built {} stencils for {}x{} grid: Fo={:.6}, Bi={:.3e}",
            stencils.len(),
            grid.rows(),
            grid.cols(),
            parameters.fourier,
            parameters.biot
        );
        let field = PingPongField::uniform(grid.cell_count(), initial);
        Ok(Self {
            grid,
            field,
            stencils,
            parameters,
            surface,
            dt,
        })
    }

    /// Replace the current field, e.g. with a non-uniform initial state.
    ///
    /// Discards any staged step and restarts the committed-step count.
    pub fn set_field(&mut self, values: &[f64]) -> Result<(), StepError> {
        self.field.reset(values)
    }

    /// Compute the next time level into the staging buffer.
    pub fn step(&mut self) {
        let ambient = self.surface.ambient;
        let StagingGuard { current, next } = self.field.stage();
        self.stencils.evaluate(current, next, ambient);
    }

    /// Make the staged time level current.
    ///
    /// Fails with [`StepError::NothingStaged`] if [`step`](Self::step) was
    /// not called since the last commit.
    pub fn commit(&mut self) -> Result<(), StepError> {
        self.field.publish()
    }

    /// Current temperature at `(row, col)`, if in bounds.
    pub fn temperature(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.grid.rows() || col >= self.grid.cols() {
            return None;
        }
        Some(self.field.published()[self.grid.index(row, col)])
    }

    /// Current field, row-major.
    pub fn field(&self) -> &[f64] {
        self.field.published()
    }

    /// Owned copy of the current field, stamped with `time`.
    pub fn snapshot(&self, time: f64) -> FieldSnapshot {
        FieldSnapshot::from_parts(
            time,
            self.grid.rows(),
            self.grid.cols(),
            self.field.published().to_vec(),
        )
    }

    /// Control-volume-weighted temperature sum `Σ wᵢ·Tᵢ`, K.
    ///
    /// Multiplied by `ρ·cp·dx²` this is the stored energy per unit length.
    pub fn thermal_content(&self) -> f64 {
        self.grid
            .categories()
            .iter()
            .zip(self.field.published())
            .map(|(cat, t)| cat.volume_weight() * t)
            .sum()
    }

    /// Stencil of node `index`.
    pub fn stencil(&self, index: usize) -> Option<&NodeStencil> {
        self.stencils.get(index)
    }

    /// All stencils.
    pub fn stencils(&self) -> &StencilTable {
        &self.stencils
    }

    /// Fourier number of the time step marched with.
    pub fn fourier(&self) -> f64 {
        self.parameters.fourier
    }

    /// Node Biot number `h·dx/k`.
    pub fn biot(&self) -> f64 {
        self.parameters.biot
    }

    /// Time step, s.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Grid geometry.
    pub fn grid(&self) -> &SlabGrid {
        &self.grid
    }

    /// Boundary conditions.
    pub fn surface(&self) -> &SurfaceConditions {
        &self.surface
    }

    /// Steps committed since construction or the last
    /// [`set_field`](Self::set_field).
    pub fn steps_committed(&self) -> u64 {
        self.field.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plancha_core::fourier;
    use plancha_space::Side;
    use plancha_test_utils::{aluminum, assert_close, small_grid};
    use proptest::prelude::*;

    const FO: f64 = 0.2;
    const BI: f64 = 0.05;
    const FLUX_NUMBER: f64 = 3.0;

    fn table_3x3() -> (SlabGrid, StencilTable) {
        let grid = small_grid(3, 3);
        let table = StencilTable::build(&grid, FO, BI, FLUX_NUMBER);
        (grid, table)
    }

    fn stencil_at(grid: &SlabGrid, table: &StencilTable, row: usize, col: usize) -> NodeStencil {
        table.get(grid.index(row, col)).unwrap().clone()
    }

    fn weight_of(stencil: &NodeStencil, index: usize) -> f64 {
        stencil
            .neighbours
            .iter()
            .find(|&&(j, _)| j == index)
            .map(|&(_, c)| c)
            .unwrap()
    }

    fn grid_with(rows: usize, cols: usize, h: f64, q: f64, ambient: f64) -> FiniteDifferenceGrid {
        let grid = small_grid(rows, cols);
        let material = aluminum();
        let dx = grid.spacing();
        let surface = SurfaceConditions::new(ambient, h, q).unwrap();
        let dt = 0.2 * dx * dx / material.diffusivity();
        FiniteDifferenceGrid::new(grid, material, surface, dt, ambient).unwrap()
    }

    #[test]
    fn coefficients_sum_to_one_everywhere() {
        let grid = small_grid(6, 9);
        let table = StencilTable::build(&grid, FO, BI, FLUX_NUMBER);
        assert_eq!(table.len(), grid.cell_count());
        for stencil in table.iter() {
            assert_close(stencil.coefficient_sum(), 1.0, 1e-14);
        }
    }

    #[test]
    fn interior_is_five_point_average() {
        let (grid, table) = table_3x3();
        let s = stencil_at(&grid, &table, 1, 1);
        assert_eq!(s.category, NodeCategory::Interior);
        assert_close(s.self_coeff, 1.0 - 4.0 * FO, 1e-15);
        assert_eq!(s.neighbours.len(), 4);
        assert!(s.neighbours.iter().all(|&(_, c)| (c - FO).abs() < 1e-15));
        assert_eq!(s.ambient_coeff, 0.0);
        assert_eq!(s.source, 0.0);
    }

    #[test]
    fn convective_top_weights_inner_neighbour_twice() {
        let (grid, table) = table_3x3();
        let s = stencil_at(&grid, &table, 2, 1);
        assert_eq!(s.category, NodeCategory::ConvectiveTop);
        assert_close(s.self_coeff, 1.0 - 4.0 * FO - 2.0 * BI * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(1, 1)), 2.0 * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(2, 0)), FO, 1e-15);
        assert_close(weight_of(&s, grid.index(2, 2)), FO, 1e-15);
        assert_close(s.ambient_coeff, 2.0 * BI * FO, 1e-15);
        assert_eq!(s.source, 0.0);
    }

    #[test]
    fn convective_side_mirrors_top() {
        let (grid, table) = table_3x3();
        let s = stencil_at(&grid, &table, 1, 2);
        assert_eq!(s.category, NodeCategory::ConvectiveSide(Side::Right));
        assert_close(s.self_coeff, 1.0 - 4.0 * FO - 2.0 * BI * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(1, 1)), 2.0 * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(0, 2)), FO, 1e-15);
        assert_close(weight_of(&s, grid.index(2, 2)), FO, 1e-15);
        assert_close(s.ambient_coeff, 2.0 * BI * FO, 1e-15);
    }

    #[test]
    fn convective_corner_has_two_convective_faces() {
        let (grid, table) = table_3x3();
        let s = stencil_at(&grid, &table, 2, 0);
        assert_eq!(s.category, NodeCategory::ConvectiveCorner(Side::Left));
        assert_close(s.self_coeff, 1.0 - 4.0 * FO - 4.0 * BI * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(1, 0)), 2.0 * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(2, 1)), 2.0 * FO, 1e-15);
        assert_close(s.ambient_coeff, 4.0 * BI * FO, 1e-15);
    }

    #[test]
    fn flux_edge_has_source_and_no_convection() {
        let (grid, table) = table_3x3();
        let s = stencil_at(&grid, &table, 0, 1);
        assert_eq!(s.category, NodeCategory::FluxEdge);
        assert_close(s.self_coeff, 1.0 - 4.0 * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(1, 1)), 2.0 * FO, 1e-15);
        assert_eq!(s.ambient_coeff, 0.0);
        assert_close(s.source, 2.0 * FO * FLUX_NUMBER, 1e-14);
    }

    #[test]
    fn flux_corner_has_source_and_half_convection() {
        let (grid, table) = table_3x3();
        let s = stencil_at(&grid, &table, 0, 2);
        assert_eq!(s.category, NodeCategory::FluxCorner(Side::Right));
        assert_close(s.self_coeff, 1.0 - 4.0 * FO - 2.0 * BI * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(1, 2)), 2.0 * FO, 1e-15);
        assert_close(weight_of(&s, grid.index(0, 1)), 2.0 * FO, 1e-15);
        assert_close(s.ambient_coeff, 2.0 * BI * FO, 1e-15);
        assert_close(s.source, 2.0 * FO * FLUX_NUMBER, 1e-14);
    }

    #[test]
    fn convective_corner_update_matches_closed_form() {
        let mut g = grid_with(3, 3, 5000.0, 0.0, 300.0);
        let values: Vec<f64> = (0..9).map(|i| 300.0 + 10.0 * f64::from(i)).collect();
        g.set_field(&values).unwrap();
        let fo = g.fourier();
        let bi = g.biot();
        g.step();
        g.commit().unwrap();
        // Node (2, 2): neighbours (1, 2) and (2, 1).
        let t = values[8];
        let expected = fo * (2.0 * values[5] + 2.0 * values[7] + 4.0 * bi * 300.0)
            + (1.0 - 4.0 * fo - 4.0 * bi * fo) * t;
        assert_close(g.temperature(2, 2).unwrap(), expected, 1e-12);
    }

    #[test]
    fn commit_without_step_fails() {
        let mut g = grid_with(3, 4, 15.0, 4500.0, 300.0);
        assert_eq!(g.commit(), Err(StepError::NothingStaged));
        g.step();
        g.commit().unwrap();
        assert_eq!(g.commit(), Err(StepError::NothingStaged));
        assert_eq!(g.steps_committed(), 1);
    }

    #[test]
    fn repeated_step_is_idempotent() {
        let mut once = grid_with(4, 5, 15.0, 4500.0, 300.0);
        let mut twice = once.clone();
        once.step();
        once.commit().unwrap();
        twice.step();
        twice.step();
        twice.commit().unwrap();
        assert_eq!(once.field(), twice.field());
    }

    #[test]
    fn step_leaves_current_field_untouched() {
        let mut g = grid_with(3, 3, 15.0, 4500.0, 300.0);
        g.step();
        assert!(g.field().iter().all(|&t| t == 300.0));
    }

    #[test]
    fn flux_raises_only_heated_face_first() {
        let mut g = grid_with(4, 6, 15.0, 4500.0, 300.0);
        g.step();
        g.commit().unwrap();
        let expected_rise = g.stencil(1).unwrap().source;
        assert!(expected_rise > 0.0);
        for col in 0..6 {
            assert_close(g.temperature(0, col).unwrap(), 300.0 + expected_rise, 1e-9);
            assert_close(g.temperature(1, col).unwrap(), 300.0, 1e-12);
        }
    }

    #[test]
    fn uniform_field_at_ambient_stays_uniform() {
        let mut g = grid_with(5, 7, 50.0, 0.0, 320.0);
        for _ in 0..200 {
            g.step();
            g.commit().unwrap();
        }
        for &t in g.field() {
            assert_close(t, 320.0, 1e-9);
        }
    }

    #[test]
    fn fourier_follows_dt_used() {
        let g = grid_with(3, 3, 15.0, 4500.0, 300.0);
        let dx = g.grid().spacing();
        assert_close(g.fourier(), fourier(aluminum().diffusivity(), g.dt(), dx), 1e-12);
        let expected =
            StabilityParameters::new(15.0, 237.0, dx, aluminum().diffusivity(), g.dt(), dx)
                .unwrap();
        assert_close(g.biot(), expected.biot, 1e-15);
    }

    #[test]
    fn snapshot_and_temperature_agree() {
        let mut g = grid_with(3, 5, 15.0, 4500.0, 300.0);
        g.step();
        g.commit().unwrap();
        let snap = g.snapshot(1.0);
        assert_eq!(snap.time(), 1.0);
        assert_eq!(snap.get(0, 2), g.temperature(0, 2));
        assert_eq!(g.temperature(3, 0), None);
    }

    #[test]
    fn rejects_non_positive_dt() {
        let grid = small_grid(3, 3);
        let surface = SurfaceConditions::new(300.0, 15.0, 4500.0).unwrap();
        assert!(matches!(
            FiniteDifferenceGrid::new(grid, aluminum(), surface, 0.0, 300.0),
            Err(ConfigError::NonPositive { name: "dt", .. })
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_serial_bitwise() {
        let grid = small_grid(7, 11);
        let table = StencilTable::build(&grid, FO, BI, FLUX_NUMBER);
        let current: Vec<f64> = (0..grid.cell_count()).map(|i| 300.0 + i as f64 * 0.37).collect();
        let mut serial = vec![0.0; current.len()];
        let mut parallel = vec![0.0; current.len()];
        table.evaluate_serial(&current, &mut serial, 290.0);
        table.evaluate_parallel(&current, &mut parallel, 290.0);
        assert_eq!(serial, parallel);
    }

    proptest! {
        #[test]
        fn insulated_slab_conserves_thermal_content(
            rows in 3usize..7,
            cols in 3usize..9,
            seed in proptest::collection::vec(250.0f64..650.0, 6 * 8),
            steps in 1usize..60,
        ) {
            let mut g = grid_with(rows, cols, 0.0, 0.0, 300.0);
            let values: Vec<f64> = seed.iter().copied().cycle().take(rows * cols).collect();
            g.set_field(&values).unwrap();
            let before = g.thermal_content();
            for _ in 0..steps {
                g.step();
                g.commit().unwrap();
            }
            let after = g.thermal_content();
            prop_assert!((after - before).abs() <= 1e-9 * before.abs());
        }

        #[test]
        fn stable_step_keeps_every_self_coefficient_non_negative(
            rows in 3usize..6,
            cols in 3usize..6,
            h in 0.0f64..1e6,
        ) {
            let grid = small_grid(rows, cols);
            let material = aluminum();
            let report = crate::StabilityAnalyzer::new(material, h, 0.01, grid.spacing())
                .unwrap()
                .analyze();
            let surface = SurfaceConditions::new(300.0, h, 0.0).unwrap();
            let g = FiniteDifferenceGrid::new(grid, material, surface, report.dt_max, 300.0).unwrap();
            for stencil in g.stencils().iter() {
                prop_assert!(stencil.self_coeff >= -1e-12, "{}: {}", stencil.category, stencil.self_coeff);
            }
        }
    }
}
