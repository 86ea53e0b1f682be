//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use tracing::{info, warn};

use mx_agent::{Agent, AgentRegistry, IdAllocator};
use mx_core::{AgentKind, SimConfig, SimRng};
use mx_force::SocialForceTable;
use mx_geometry::{Geometry, PathService};
use mx_schedule::{DepartureSchedule, DistributionSet};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick length, total ticks, seed, …
/// - [`Geometry`] — from [`mx_geometry::GeometryBuilder`]
/// - `P: PathService` — waypoint provider (e.g. [`mx_geometry::StraightLine`])
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                   |
/// |-----------------------|-------------------------------------------|
/// | `.schedule(s)`        | Empty schedule: no departures             |
/// | `.distributions(d)`   | Empty matrices: nobody boards or leaves a zone |
/// | `.forces(t)`          | `SocialForceTable::default_for_registry()` |
/// | `.agent(a)`           | No agents at tick 0                       |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, geometry, StraightLine)
///     .schedule(schedule)
///     .distributions(distributions)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PathService> {
    config:        SimConfig,
    geometry:      Geometry,
    paths:         P,
    schedule:      Option<DepartureSchedule>,
    distributions: Option<DistributionSet>,
    forces:        Option<SocialForceTable>,
    agents:        Vec<Agent>,
}

impl<P: PathService> SimBuilder<P> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, geometry: Geometry, paths: P) -> Self {
        Self {
            config,
            geometry,
            paths,
            schedule:      None,
            distributions: None,
            forces:        None,
            agents:        Vec::new(),
        }
    }

    /// Supply the OD matrices.  Periods are checked by [`build`](Self::build).
    pub fn schedule(mut self, schedule: DepartureSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Supply the transition distribution matrices.
    pub fn distributions(mut self, distributions: DistributionSet) -> Self {
        self.distributions = Some(distributions);
        self
    }

    /// Override the social-force parameter table.
    pub fn forces(mut self, forces: SocialForceTable) -> Self {
        self.forces = Some(forces);
        self
    }

    /// Register an agent present from tick 0.  Its id is kept; spawned
    /// agents get ids above every id registered here.
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Validate inputs, fix OD rates and return a ready-to-run [`Sim`].
    ///
    /// Fails with a setup-class error on a bad configuration or a
    /// non-positive OD period.  Distribution rows and columns that name
    /// nothing in the geometry are only logged: they fail at lookup time and
    /// the affected agents wait.  Initial agents standing in an obstacle or
    /// closer to a wall than their radius are logged too.
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        let mut schedule = self.schedule.unwrap_or_default();
        schedule.prepare(self.config.tick_length_secs)?;

        let distributions = self.distributions.unwrap_or_default();
        check_distributions(&distributions, &self.geometry);

        let ids = Arc::new(IdAllocator::new());
        let registry = AgentRegistry::new();
        for agent in self.agents {
            if overlaps_barrier(&self.geometry, &agent) {
                warn!(agent = %agent.id, kind = %agent.kind, "initial agent overlaps a wall or obstacle");
            }
            ids.reserve_through(agent.id);
            if let Some(old) = registry.insert(agent)? {
                warn!(agent = %old.id, "duplicate initial agent id; earlier agent replaced");
            }
        }

        #[cfg(feature = "parallel")]
        if let Some(n) = self.config.num_threads {
            if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
                tracing::debug!(error = %e, "rayon global pool already configured");
            }
        }

        info!(
            seed       = self.config.seed,
            ticks      = self.config.total_ticks,
            tick_secs  = self.config.tick_length_secs,
            crossings  = self.geometry.crossings.len(),
            zones      = self.geometry.zones.len(),
            barriers   = self.geometry.barrier_count(),
            agents     = registry.total_len(),
            "simulation built"
        );

        Ok(Sim {
            clock:    self.config.make_clock(),
            rng:      SimRng::new(self.config.seed),
            config:   self.config,
            geometry: self.geometry,
            schedule,
            distributions,
            forces:   self.forces.unwrap_or_default(),
            paths:    self.paths,
            registry,
            ids,
        })
    }
}

fn check_distributions(distributions: &DistributionSet, geometry: &Geometry) {
    for kind in AgentKind::ALL {
        let matrix = distributions.get(kind);
        for row in matrix.row_names() {
            if geometry.zone_by_name(row).is_none() {
                warn!(%kind, row, "distribution row names no transition zone");
            }
            for column in matrix.row(row).unwrap_or_default() {
                if geometry.resolve_destination(&column.destination).is_err() {
                    warn!(%kind, row, destination = %column.destination, "distribution column does not resolve");
                }
            }
        }
    }
}

/// `true` if `agent` starts inside an obstacle or its disc touches a barrier.
pub(crate) fn overlaps_barrier(geometry: &Geometry, agent: &Agent) -> bool {
    let p = agent.position_2d();
    geometry.obstacle_at(p).is_some()
        || geometry.nearest_barrier_point(p).is_some_and(|(_, d)| d < agent.radius)
}
