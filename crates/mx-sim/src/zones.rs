//! Arrival handling and the transition-zone mode switch.
//!
//! ```text
//!   pedestrian ──arrives at zone──▶ waiting ──boards──▶ TRANSPORTED
//!   carrier    ──arrives at zone──▶ parked  ──releases passengers──▶ parked
//!   parked carrier ──pedestrian boards──▶ TRANSPORT_OTHERS ──▶ next zone
//!   anyone     ──arrives at crossing──▶ removed with everyone on board
//! ```
//!
//! A failed lookup leaves everything as it was; the waiting pedestrian or
//! the loaded carrier is retried on the next tick.

use tracing::{debug, warn};

use mx_agent::{Agent, RegistryGuard};
use mx_behavior::{AgentState, BehaviorQueue, BehaviorTemplate};
use mx_core::{AgentId, AgentKind, DVec2, DVec3, ZoneId};
use mx_geometry::{Destination, GeometryError, PathService};

use crate::{Sim, SimResult, TickSummary};

impl<P: PathService> Sim<P> {
    // ── Zone upkeep ───────────────────────────────────────────────────────

    /// Evict the oldest carriers from every rack holding more than
    /// `capacity + PURGE_MARGIN`, down to `capacity`.
    pub(crate) fn purge_zones(&mut self, agents: &mut RegistryGuard<'_>, summary: &mut TickSummary) {
        for zone in &mut self.geometry.zones {
            let evicted = zone.purge_excess();
            if evicted.is_empty() {
                continue;
            }
            debug!(zone = %zone.name, evicted = evicted.len(), "zone purged");
            for id in evicted {
                if let Ok(gone) = agents.remove_cascade(id) {
                    summary.purged += gone.len();
                }
            }
        }
    }

    /// Top every rack up to capacity with parked carriers at its centroid.
    pub(crate) fn fill_zones(
        &mut self,
        agents:  &mut RegistryGuard<'_>,
        summary: &mut TickSummary,
    ) -> SimResult<()> {
        for zone in &mut self.geometry.zones {
            let stale: Vec<AgentId> = zone.enclosed().filter(|&id| agents.get(id).is_none()).collect();
            for id in stale {
                zone.forget(id);
            }

            let deficit = zone.deficit();
            if deficit == 0 {
                continue;
            }
            let kind = zone.kind.carrier_kind();
            for _ in 0..deficit {
                let mut carrier = Agent::new(self.ids.next_id(), kind, zone.centroid, &self.clock);
                carrier.park();
                carrier.current_zone = Some(zone.id);
                zone.push_enclosed(carrier.id);
                agents.insert(carrier)?;
            }
            summary.spawned += deficit;
            debug!(zone = %zone.name, %kind, added = deficit, "zone filled");
        }
        Ok(())
    }

    // ── Arrivals ──────────────────────────────────────────────────────────

    pub(crate) fn resolve_arrivals(
        &mut self,
        agents:  &mut RegistryGuard<'_>,
        arrived: Vec<AgentId>,
        summary: &mut TickSummary,
    ) {
        for id in arrived {
            let Some(agent) = agents.get_mut(id) else {
                continue;
            };
            // Vehicles never use zones.
            let bound = agent.current_zone.filter(|_| agent.kind != AgentKind::Vehicle);
            let Some(zone_id) = bound else {
                let exit = agent
                    .exit
                    .and_then(|c| self.geometry.destination_name(Destination::Crossing(c)))
                    .unwrap_or("-")
                    .to_owned();
                match agents.remove_cascade(id) {
                    Ok(gone) => {
                        debug!(agent = %id, %exit, removed = gone.len(), "left through exit");
                        summary.removed += gone.len();
                    }
                    Err(e) => debug!(agent = %id, error = %e, "arrival removal failed"),
                }
                continue;
            };
            let Some(zone) = self.geometry.zone_mut(zone_id) else {
                warn!(agent = %id, zone = %zone_id, "arrived at an unknown zone");
                agent.current_zone = None;
                continue;
            };

            agent.park();
            agent.exit = None;
            if agent.kind.is_carrier() {
                zone.push_enclosed(id);
                debug!(agent = %id, zone = %zone.name, passengers = agent.transporting.len(), "carrier parked");
            } else {
                zone.push_waiting(id);
                debug!(agent = %id, zone = %zone.name, "waiting for a carrier");
            }
        }
    }

    // ── Boarding ──────────────────────────────────────────────────────────

    /// Try to put every waiting pedestrian on the newest parked carrier.
    pub(crate) fn board_waiting(
        &mut self,
        agents:  &mut RegistryGuard<'_>,
        summary: &mut TickSummary,
    ) -> SimResult<()> {
        for zi in 0..self.geometry.zones.len() {
            let waiting: Vec<AgentId> = self.geometry.zones[zi].waiting().collect();
            for pedestrian in waiting {
                match self.board(agents, zi, pedestrian) {
                    Ok(true) => summary.boardings += 1,
                    Ok(false) => {}
                    Err(e) => e.absorb(pedestrian, "boarding deferred")?,
                }
            }
        }
        Ok(())
    }

    /// `Ok(false)`: nothing to do this tick (no carrier, or the pedestrian
    /// is no longer waiting).
    fn board(&mut self, agents: &mut RegistryGuard<'_>, zi: usize, pedestrian: AgentId) -> SimResult<bool> {
        let zone = &mut self.geometry.zones[zi];
        if !agents.get(pedestrian).is_some_and(Agent::is_stopped) {
            zone.forget(pedestrian);
            return Ok(false);
        }

        let stale: Vec<AgentId> = zone.enclosed().filter(|&id| agents.get(id).is_none()).collect();
        for id in stale {
            zone.forget(id);
        }
        // A carrier still unloading is parked but not free.
        let free = zone.newest_where(|id| agents.get(id).is_some_and(|c| c.transporting.is_empty()));
        let Some((carrier, from)) = free.and_then(|id| agents.get(id)).map(|c| (c.id, c.position_2d())) else {
            return Ok(false);
        };

        let kind = zone.kind.carrier_kind();
        let row = zone.name.clone();
        let column = self.distributions.get(kind).choose(&row, self.rng.percent())?;
        let (label, template) = (column.destination.clone(), column.template.clone());
        let dest = self.geometry.resolve_destination(&label)?;
        let behavior = self.route(template, from, dest, AgentState::TransportOthers, &label)?;

        let zone = &mut self.geometry.zones[zi];
        zone.forget(carrier);
        zone.forget(pedestrian);

        if let Some(c) = agents.get_mut(carrier) {
            c.assign_behavior(behavior);
            c.target = None;
            c.path.clear();
            head_for(c, dest);
            c.transporting.insert(pedestrian);
        }
        if let Some(p) = agents.get_mut(pedestrian) {
            p.board(carrier);
            p.place_at(from);
        }
        debug!(agent = %pedestrian, %carrier, zone = %row, destination = %label, "boarded");
        Ok(true)
    }

    // ── Releasing ─────────────────────────────────────────────────────────

    /// Let the passengers of every parked carrier off at its zone.
    pub(crate) fn release_passengers(
        &mut self,
        agents:  &mut RegistryGuard<'_>,
        summary: &mut TickSummary,
    ) -> SimResult<()> {
        let guard: &RegistryGuard<'_> = agents;
        let loaded: Vec<(AgentId, ZoneId, DVec2, Vec<AgentId>)> = AgentKind::ALL
            .into_iter()
            .filter(|k| k.is_carrier())
            .flat_map(move |k| guard.collection(k).iter())
            .filter(|c| c.is_stopped() && !c.transporting.is_empty())
            .filter_map(|c| {
                c.current_zone
                    .map(|z| (c.id, z, c.position_2d(), c.transporting.iter().copied().collect()))
            })
            .collect();

        for (carrier, zone, at, passengers) in loaded {
            let Some(row) = self.geometry.zone(zone).map(|z| z.name.clone()) else {
                continue;
            };
            for passenger in passengers {
                match self.release(agents, carrier, &row, at, passenger) {
                    Ok(true) => summary.releases += 1,
                    Ok(false) => {}
                    Err(e) => e.absorb(passenger, "release deferred")?,
                }
            }
        }
        Ok(())
    }

    fn release(
        &mut self,
        agents:    &mut RegistryGuard<'_>,
        carrier:   AgentId,
        row:       &str,
        at:        DVec2,
        passenger: AgentId,
    ) -> SimResult<bool> {
        if agents.get(passenger).is_none() {
            if let Some(c) = agents.get_mut(carrier) {
                c.transporting.remove(&passenger);
            }
            return Ok(false);
        }

        let column = self.distributions.get(AgentKind::Pedestrian).choose(row, self.rng.percent())?;
        let (label, template) = (column.destination.clone(), column.template.clone());
        let dest = self.geometry.resolve_destination(&label)?;
        let behavior = self.route(template, at, dest, AgentState::MoveAutonomously, &label)?;

        if let Some(p) = agents.get_mut(passenger) {
            p.carried_by = None;
            p.velocity = DVec3::ZERO;
            p.speed = 0.0;
            p.assign_behavior(behavior);
            p.place_at(at);
            head_for(p, dest);
        }
        if let Some(c) = agents.get_mut(carrier) {
            c.transporting.remove(&passenger);
        }
        debug!(agent = %passenger, %carrier, zone = %row, destination = %label, "released");
        Ok(true)
    }

    // ── Routes ────────────────────────────────────────────────────────────

    /// Behavior for a trip from `from` to `dest`, tagged `state`: the
    /// template if the distribution column has one, else the path service's
    /// waypoints, else a straight line.
    fn route(
        &self,
        template: Option<BehaviorTemplate>,
        from:     DVec2,
        dest:     Destination,
        state:    AgentState,
        label:    &str,
    ) -> SimResult<BehaviorQueue> {
        if let Some(t) = template {
            return Ok(t.instantiate(Some(state)));
        }
        let to = self
            .geometry
            .destination_point(dest)
            .ok_or_else(|| GeometryError::UnknownDestination(label.to_owned()))?;
        Ok(match self.paths.find_path(&self.geometry, from, to) {
            Some(path) if !path.is_empty() => BehaviorQueue::single(state, path),
            _ => BehaviorQueue::single(state, [to]),
        })
    }
}

fn head_for(agent: &mut Agent, dest: Destination) {
    match dest {
        Destination::Crossing(c) => {
            agent.exit = Some(c);
            agent.current_zone = None;
        }
        Destination::Zone(z) => {
            agent.current_zone = Some(z);
            agent.exit = None;
        }
    }
}
