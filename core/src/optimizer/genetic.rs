//! The population-based search layer (§4.6): a small, deterministic
//! genetic algorithm seeded by the shared `RngManager`, with the greedy
//! baseline re-injected into every generation so the search can never
//! finish worse than it started.

use super::greedy::baseline;
use super::{objective, Decision, OptimizationContext};
use crate::models::class::{Class, ClassVec};
use crate::rng::RngManager;
use std::time::Instant;

const POPULATION_SIZE: usize = 24;
const TOURNAMENT_SIZE: usize = 4;
const ELITISM: usize = 3;
const MUTATION_RATE: f64 = 0.15;
const NO_IMPROVEMENT_LIMIT: u32 = 12;

pub fn optimize(ctx: &OptimizationContext, rng: &mut RngManager, deadline: Instant) -> Decision {
    let greedy = baseline(ctx);
    if ctx.horizon.loadable_flights.is_empty() {
        return greedy;
    }

    let mut population = initialize_population(ctx, &greedy, rng);
    let mut best = greedy.clone();
    let mut best_fitness = objective(ctx, &best);
    let mut stale_generations = 0u32;

    while stale_generations < NO_IMPROVEMENT_LIMIT && Instant::now() < deadline {
        let mut scored: Vec<(f64, Decision)> =
            population.into_iter().map(|d| (objective(ctx, &d), d)).collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        if scored[0].0 < best_fitness {
            best_fitness = scored[0].0;
            best = scored[0].1.clone();
            stale_generations = 0;
        } else {
            stale_generations += 1;
        }

        let mut next_gen: Vec<Decision> = scored.iter().take(ELITISM).map(|(_, d)| d.clone()).collect();
        next_gen.push(greedy.clone());

        let pool: Vec<Decision> = scored.into_iter().map(|(_, d)| d).collect();
        while next_gen.len() < POPULATION_SIZE {
            let parent_a = tournament_select(ctx, &pool, rng);
            let parent_b = tournament_select(ctx, &pool, rng);
            let mut child = crossover(parent_a, parent_b, rng);
            mutate(ctx, &mut child, rng);
            next_gen.push(child);
        }
        population = next_gen;
    }

    best
}

fn initialize_population(ctx: &OptimizationContext, greedy: &Decision, rng: &mut RngManager) -> Vec<Decision> {
    let mut population = Vec::with_capacity(POPULATION_SIZE);
    population.push(greedy.clone());
    population.push(scale_decision(ctx, greedy, 1.0));
    population.push(scale_decision(ctx, greedy, 1.08));

    while population.len() < POPULATION_SIZE {
        let fraction = 0.5 + rng.next_f64();
        population.push(scale_decision(ctx, greedy, fraction));
    }
    population
}

fn scale_decision(ctx: &OptimizationContext, base: &Decision, factor: f64) -> Decision {
    let mut loads = base.loads.clone();
    for flight_id in &ctx.horizon.loadable_flights {
        let Some(flight) = ctx.mirror.flight(flight_id) else { continue };
        let Some(aircraft) = ctx.catalog.aircraft(&flight.aircraft_type_code) else { continue };
        let entry = loads.entry(flight_id.clone()).or_insert_with(ClassVec::zero);
        *entry = ClassVec::from_fn(|c| ((entry[c] as f64 * factor).round() as i64).clamp(0, aircraft.kit_capacity[c]));
    }
    let purchases = ClassVec::from_fn(|c| ((base.purchases[c] as f64 * factor).round() as i64).max(0));
    Decision { loads, purchases }
}

fn tournament_select<'a>(_ctx: &OptimizationContext, pool: &'a [Decision], rng: &mut RngManager) -> &'a Decision {
    let mut best_idx = rng.range(0, pool.len() as i64) as usize;
    for _ in 1..TOURNAMENT_SIZE {
        let candidate = rng.range(0, pool.len() as i64) as usize;
        if candidate < best_idx {
            best_idx = candidate;
        }
    }
    &pool[best_idx]
}

fn crossover(a: &Decision, b: &Decision, rng: &mut RngManager) -> Decision {
    let mut loads = a.loads.clone();
    for (flight_id, k) in &b.loads {
        if rng.range(0, 2) == 1 {
            loads.insert(flight_id.clone(), *k);
        }
    }
    let purchases = if rng.range(0, 2) == 1 { b.purchases } else { a.purchases };
    Decision { loads, purchases }
}

fn mutate(ctx: &OptimizationContext, decision: &mut Decision, rng: &mut RngManager) {
    for flight_id in &ctx.horizon.loadable_flights {
        let Some(flight) = ctx.mirror.flight(flight_id) else { continue };
        let Some(aircraft) = ctx.catalog.aircraft(&flight.aircraft_type_code) else { continue };
        let entry = decision.loads.entry(flight_id.clone()).or_insert_with(ClassVec::zero);
        for class in Class::ALL {
            if rng.next_f64() >= MUTATION_RATE {
                continue;
            }
            let delta = if rng.next_f64() < 0.8 { rng.range(1, 4) } else { rng.range(5, 11) };
            let sign = if rng.range(0, 2) == 1 { 1 } else { -1 };
            entry[class] = (entry[class] + sign * delta).clamp(0, aircraft.kit_capacity[class]);
        }
    }

    for class in Class::ALL {
        if rng.next_f64() >= MUTATION_RATE {
            continue;
        }
        let delta = rng.range(1, 6);
        let sign = if rng.range(0, 2) == 1 { 1 } else { -1 };
        decision.purchases[class] = (decision.purchases[class] + sign * delta).max(0);
    }
}
