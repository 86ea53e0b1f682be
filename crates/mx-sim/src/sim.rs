//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use tracing::{trace, warn};

use mx_agent::{Agent, AgentCollection, AgentRegistry, AgentSnapshot, IdAllocator, RegistryGuard, Steering};
use mx_core::{AgentId, AgentKind, DVec2, DVec3, SimClock, SimConfig, SimRng, Tick};
use mx_force::{
    ForceResult, NeighborIndex, SocialForceTable, agent_repulsion, ensure_finite,
    target_attraction, wall_obstacle_repulsion,
};
use mx_geometry::{Geometry, PathService};
use mx_schedule::{DepartureSchedule, DistributionSet};

use crate::{SimError, SimHandle, SimObserver, SimResult, SpawnRequest, TickSummary};

#[cfg(feature = "fx-hash")]
pub(crate) type IdMap<V> = rustc_hash::FxHashMap<AgentId, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type IdMap<V> = std::collections::HashMap<AgentId, V>;

/// The main simulation runner.
///
/// `Sim<P>` owns the geometry (including zone queues), the departure
/// schedule, the distribution matrices and the run's only RNG.  Agents live
/// in a shared [`AgentRegistry`] so that a [`SimHandle`] can reach them
/// between ticks.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: PathService> {
    /// Global configuration (tick length, total ticks, seed, …).
    pub config: SimConfig,

    /// Simulation clock; tracks the current tick.
    pub clock: SimClock,

    /// Walls, obstacles, crossings and transition zones.
    pub geometry: Geometry,

    /// OD matrices still producing departures.
    pub schedule: DepartureSchedule,

    /// Where agents go next when they leave a zone.
    pub distributions: DistributionSet,

    /// Social-force parameters per kind pair.
    pub forces: SocialForceTable,

    /// Waypoint provider for routes without a template.
    pub paths: P,

    pub(crate) registry: AgentRegistry,
    pub(crate) ids:      Arc<IdAllocator>,
    pub(crate) rng:      SimRng,
}

impl<P: PathService> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.observed_tick(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_tick(observer)?;
        }
        Ok(())
    }

    /// Process one tick without observers and advance the clock.
    pub fn tick(&mut self) -> SimResult<TickSummary> {
        let now = self.clock.current_tick;
        let summary = self.process_tick(now)?;
        self.clock.advance();
        Ok(summary)
    }

    /// A host bridge sharing this simulation's agents.
    pub fn handle(&self) -> SimHandle {
        SimHandle::new(self.registry.clone(), Arc::clone(&self.ids), self.clock.clone())
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Copies of every agent, in kind then id order.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        let agents = self.registry.lock_all();
        AgentKind::ALL
            .iter()
            .flat_map(|&k| agents.collection(k).iter().map(AgentSnapshot::from))
            .collect()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn observed_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now)?;
        observer.on_tick_end(now, &summary);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.snapshot());
        }
        self.clock.advance();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<TickSummary> {
        let mut summary = TickSummary::new(now);

        // Every collection stays locked for the whole tick; hosts wait.
        let registry = self.registry.clone();
        let mut agents = registry.lock_all();

        // ── Phase 1: departures ───────────────────────────────────────────
        self.generate_departures(&mut agents, &mut summary)?;

        // ── Phase 2: zone upkeep ──────────────────────────────────────────
        self.purge_zones(&mut agents, &mut summary);
        self.fill_zones(&mut agents, &mut summary)?;

        // ── Phase 3: movement, one kind-group at a time ───────────────────
        //
        // Neighbor indices are rebuilt before each group, so a later kind
        // sees where an earlier kind moved this tick.
        let mut arrived = Vec::new();
        for kind in AgentKind::ALL {
            self.step_kind(kind, &mut agents, &mut arrived, &mut summary)?;
        }

        // ── Phase 4: arrivals ─────────────────────────────────────────────
        self.resolve_arrivals(&mut agents, arrived, &mut summary);

        // ── Phase 5: mode switches ────────────────────────────────────────
        self.board_waiting(&mut agents, &mut summary)?;
        self.release_passengers(&mut agents, &mut summary)?;
        self.purge_zones(&mut agents, &mut summary);

        // ── Phase 6: passengers ride along ────────────────────────────────
        propagate_passengers(&mut agents);

        summary.counts = agents.counts();
        trace!(
            %now,
            agents   = summary.total_agents(),
            spawned  = summary.spawned,
            removed  = summary.removed,
            boarded  = summary.boardings,
            released = summary.releases,
            "tick done"
        );
        Ok(summary)
    }

    /// Spawn everything the schedule releases this tick.
    fn generate_departures(
        &mut self,
        agents:  &mut RegistryGuard<'_>,
        summary: &mut TickSummary,
    ) -> SimResult<()> {
        for (kind, departure) in self.schedule.due(self.clock.elapsed_secs()) {
            let request = match SpawnRequest::plan(kind, &departure, &self.geometry, &self.paths) {
                Ok(r) => r,
                Err(e) => {
                    let e = SimError::from(e);
                    if !e.class().is_recoverable() {
                        return Err(e);
                    }
                    warn!(
                        %kind,
                        entrance = %departure.entrance,
                        exit     = %departure.exit,
                        error    = %e,
                        "departure dropped"
                    );
                    summary.dropped_departures += departure.count as usize;
                    continue;
                }
            };
            for _ in 0..departure.count {
                for agent in request.spawn(&self.geometry, &self.clock, &self.ids, &mut self.rng) {
                    let id = agent.id;
                    match agents.insert(agent) {
                        Ok(_) => summary.spawned += 1,
                        Err(e) => SimError::from(e).absorb(id, "spawned agent not registered")?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Steer, evaluate forces and integrate every simulated agent of `kind`.
    fn step_kind(
        &mut self,
        kind:    AgentKind,
        agents:  &mut RegistryGuard<'_>,
        arrived: &mut Vec<AgentId>,
        summary: &mut TickSummary,
    ) -> SimResult<()> {
        // Steering mutates queues and draws wander jitter, so it runs
        // sequentially in id order.
        let mut plan: Vec<(AgentId, DVec2)> = Vec::new();
        {
            let wander = &self.config.wander;
            let rng = &mut self.rng;
            for agent in agents.collection_mut(kind).iter_mut() {
                if !agent.is_simulated() {
                    continue;
                }
                match agent.steer(rng, wander) {
                    Steering::Arrived    => arrived.push(agent.id),
                    Steering::Toward(to) => plan.push((agent.id, to)),
                }
            }
        }
        if plan.is_empty() {
            return Ok(());
        }

        let indices = AgentKind::ALL.map(|k| NeighborIndex::from_agents(agents.collection(k).iter()));
        let forces = self.compute_forces(planned_agents(agents.collection(kind), &plan), &indices);

        let dt = self.clock.tick_length_secs;
        let collection = agents.collection_mut(kind);
        for (id, result) in forces {
            let Some(agent) = collection.get_mut(id) else {
                continue;
            };
            let force = match result {
                Ok(f) => f,
                Err(e) => {
                    SimError::from(e).absorb(id, "force evaluation failed; agent skipped this tick")?;
                    summary.skipped += 1;
                    continue;
                }
            };
            agent.apply_force(force);
            match agent.integrate(&self.geometry, dt) {
                Ok(report) if !report.moved => summary.blocked += 1,
                Ok(_) => {}
                Err(e) => {
                    SimError::from(e).absorb(id, "integration failed; agent skipped this tick")?;
                    summary.skipped += 1;
                }
            }
        }
        Ok(())
    }

    /// Net force for every planned agent.
    ///
    /// Pure reads over a frozen group; with the `parallel` feature the
    /// evaluation runs on Rayon's thread pool.  Output keeps plan order.
    fn compute_forces(
        &self,
        plan:    Vec<(&Agent, DVec2)>,
        indices: &[NeighborIndex; AgentKind::COUNT],
    ) -> Vec<(AgentId, ForceResult<DVec3>)> {
        #[cfg(not(feature = "parallel"))]
        {
            plan.into_iter()
                .map(|(agent, to)| (agent.id, self.net_force(agent, to, indices)))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            plan.into_par_iter()
                .map(|(agent, to)| (agent.id, self.net_force(agent, to, indices)))
                .collect()
        }
    }

    fn net_force(
        &self,
        agent:   &Agent,
        to:      DVec2,
        indices: &[NeighborIndex; AgentKind::COUNT],
    ) -> ForceResult<DVec3> {
        let mut force = target_attraction(agent, to);
        for other in AgentKind::ALL {
            force += agent_repulsion(agent, &indices[other.index()], self.forces.get(agent.kind, other));
        }
        force += wall_obstacle_repulsion(agent, &self.geometry);
        ensure_finite(agent, force)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn planned_agents<'a>(collection: &'a AgentCollection, plan: &[(AgentId, DVec2)]) -> Vec<(&'a Agent, DVec2)> {
    plan.iter()
        .filter_map(|&(id, to)| collection.get(id).map(|a| (a, to)))
        .collect()
}

/// Move every passenger onto its carrier and face it the same way.
///
/// Passengers have no velocity of their own while carried; the carrier's
/// may exceed the passenger's `max_speed`.
fn propagate_passengers(agents: &mut RegistryGuard<'_>) {
    let mut rides: IdMap<(DVec3, f64)> = IdMap::default();
    for kind in AgentKind::ALL {
        for carrier in agents.collection(kind).iter() {
            for &p in &carrier.transporting {
                rides.insert(p, (carrier.position, carrier.heading));
            }
        }
    }
    for (id, (position, heading)) in rides {
        if let Some(p) = agents.get_mut(id) {
            p.position = position;
            p.heading = heading;
            p.velocity = DVec3::ZERO;
            p.speed = 0.0;
        }
    }
}
