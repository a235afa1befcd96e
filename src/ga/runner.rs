//! GA evolutionary loop execution.
//!
//! Initialization → evaluation → selection → crossover → mutation →
//! repeat, with elitism and a full re-seed when the feasible
//! subpopulation collapses.

use super::config::GaConfig;
use crate::context::{DomainContext, RunContext};
use crate::models::{DutyRef, Guard, Schedule};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Upper bound of the fitness scale; a perfect schedule approaches it.
pub const FITNESS_CEILING: f64 = 10_000.0;
/// Fitness lost per `Shortage` gene.
const SHORTAGE_PENALTY: f64 = 1_000.0;
/// Fitness lost when the schedule fails the whole-schedule oracle.
const HARD_VIOLATION_PENALTY: f64 = 200.0;
/// Fitness lost per unit of distribution deviation.
const DEVIATION_PENALTY: f64 = 5.0;
/// Fitness lost per unit of the owner soft penalty.
const SOFT_PENALTY_WEIGHT: f64 = 1.0;
/// A best fitness within this margin of the ceiling stops the search.
const NEAR_CEILING_MARGIN: f64 = 10.0;

/// One chromosome: a gene per guard slot plus its cached fitness.
#[derive(Debug, Clone)]
struct Individual {
    genes: Vec<Guard>,
    fitness: f64,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Schedule built from the best chromosome.
    pub best: Schedule,
    /// Fitness of the best chromosome (0 when none was feasible).
    pub best_fitness: f64,
    /// Generations executed.
    pub generations: usize,
    /// Times the feasible subpopulation collapsed and was re-seeded.
    pub collapses: usize,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Best fitness at the end of each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA over the guard slots of `template`.
    ///
    /// `template` fixes the exam placement; assignments already present
    /// in it (e.g. locked owners) are copied into every seeded
    /// chromosome and excluded from mutation.
    pub fn run(
        template: Schedule,
        domain: &DomainContext<'_>,
        config: &GaConfig,
        ctx: &RunContext,
    ) -> GaResult {
        config.validate().expect("invalid GaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let duties = template.duties();
        if duties.is_empty() {
            let best_fitness = fitness_of(&template, domain);
            return GaResult {
                best: template,
                best_fitness,
                generations: 0,
                collapses: 0,
                cancelled: false,
                fitness_history: Vec::new(),
            };
        }

        // Genes pre-assigned in the template never move.
        let frozen: HashSet<usize> = duties
            .iter()
            .enumerate()
            .filter(|(_, d)| !template.guard(**d).is_shortage())
            .map(|(i, _)| i)
            .collect();

        let mut population: Vec<Individual> = (0..config.population_size)
            .map(|_| seed_individual(&template, &duties, domain, &mut rng))
            .collect();

        let mut best: Option<Individual> = None;
        let mut collapses = 0usize;
        let mut cancelled = false;
        let mut fitness_history = Vec::with_capacity(config.max_generations);
        let mut generations = 0usize;

        for gen in 0..config.max_generations {
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }
            generations = gen + 1;
            ctx.progress((generations * 100 / config.max_generations) as u32);

            let mut feasible: Vec<&Individual> =
                population.iter().filter(|ind| ind.fitness > 0.0).collect();

            if feasible.is_empty() {
                ctx.log(format!(
                    "[ga] generation {generations}: population collapsed, re-seeding"
                ));
                collapses += 1;
                population = (0..config.population_size)
                    .map(|_| seed_individual(&template, &duties, domain, &mut rng))
                    .collect();
                fitness_history.push(best.as_ref().map(|b| b.fitness).unwrap_or(0.0));
                continue;
            }

            feasible.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

            if best
                .as_ref()
                .is_none_or(|b| feasible[0].fitness > b.fitness)
            {
                best = Some(feasible[0].clone());
                ctx.log(format!(
                    "[ga] generation {generations}: new best fitness {:.1}",
                    feasible[0].fitness
                ));
            }

            let best_fitness = best.as_ref().map(|b| b.fitness).unwrap_or(0.0);
            fitness_history.push(best_fitness);
            if best_fitness >= FITNESS_CEILING - NEAR_CEILING_MARGIN {
                ctx.log("[ga] near-ceiling fitness reached, stopping".to_string());
                break;
            }

            // Elites survive unchanged; offspring fill the rest.
            let mut next: Vec<Individual> = feasible
                .iter()
                .take(config.elitism)
                .map(|ind| (*ind).clone())
                .collect();

            while next.len() < config.population_size {
                let p1 = roulette_pick(&feasible, &mut rng);
                let p2 = roulette_pick(&feasible, &mut rng);

                let (mut c1, mut c2) = if rng.random::<f64>() < config.crossover_rate {
                    crossover(&p1.genes, &p2.genes, &mut rng)
                } else {
                    (p1.genes.clone(), p2.genes.clone())
                };

                if rng.random::<f64>() < config.mutation_rate {
                    mutate(&mut c1, &template, &duties, &frozen, domain, &mut rng);
                }
                if rng.random::<f64>() < config.mutation_rate {
                    mutate(&mut c2, &template, &duties, &frozen, domain, &mut rng);
                }

                for genes in [c1, c2] {
                    if next.len() >= config.population_size {
                        break;
                    }
                    let schedule = express(&template, &duties, &genes);
                    let fitness = fitness_of(&schedule, domain);
                    next.push(Individual { genes, fitness });
                }
            }

            population = next;
        }

        let best = best.unwrap_or_else(|| {
            // No feasible chromosome ever appeared; hand back the best
            // of the final population so the caller still gets a
            // schedule to diagnose.
            population
                .iter()
                .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
                .cloned()
                .expect("population is never empty")
        });

        GaResult {
            best: express(&template, &duties, &best.genes),
            best_fitness: best.fitness,
            generations,
            collapses,
            cancelled,
            fitness_history,
        }
    }
}

/// Maps a cost tuple onto the single fitness scale: a large ceiling
/// minus penalties in tuple priority order, floored at zero.
fn fitness_of(schedule: &Schedule, domain: &DomainContext<'_>) -> f64 {
    let cost = domain.evaluate(schedule);
    let penalty = cost.shortage as f64 * SHORTAGE_PENALTY
        + cost.hard_violation as f64 * HARD_VIOLATION_PENALTY
        + cost.deviation * DEVIATION_PENALTY
        + cost.soft_penalty * SOFT_PENALTY_WEIGHT;
    (FITNESS_CEILING - penalty).max(0.0)
}

/// Builds the schedule a chromosome encodes.
fn express(template: &Schedule, duties: &[DutyRef], genes: &[Guard]) -> Schedule {
    let mut schedule = template.clone();
    for (duty, gene) in duties.iter().zip(genes) {
        schedule.assign(*duty, gene.clone());
    }
    schedule
}

/// Seeds one chromosome with the randomized feasibility-seeking fill.
fn seed_individual<R: Rng>(
    template: &Schedule,
    duties: &[DutyRef],
    domain: &DomainContext<'_>,
    rng: &mut R,
) -> Individual {
    let mut schedule = template.clone();
    let mut ledger = domain.ledger(&schedule);

    let mut order: Vec<DutyRef> = schedule.shortage_duties();
    order.shuffle(rng);

    for duty in order {
        let exam = schedule.exams[duty.exam].clone();
        let mut professors: Vec<&String> = domain.roster.professors.iter().collect();
        professors.shuffle(rng);

        let pick = professors
            .into_iter()
            .find(|p| !exam.has_guard(p) && domain.assignment_valid(p, &exam, &ledger))
            .cloned();

        if let Some(prof) = pick {
            ledger.record(&prof, &exam, domain.config);
            schedule.assign(duty, Guard::Assigned(prof));
        }
    }

    let genes: Vec<Guard> = duties.iter().map(|d| schedule.guard(*d).clone()).collect();
    let fitness = fitness_of(&schedule, domain);
    Individual { genes, fitness }
}

/// Fitness-proportional selection over the feasible subpopulation.
fn roulette_pick<'a, R: Rng>(feasible: &[&'a Individual], rng: &mut R) -> &'a Individual {
    let total: f64 = feasible.iter().map(|ind| ind.fitness).sum();
    if total <= 0.0 {
        return feasible[0];
    }
    let mut roll = rng.random_range(0.0..total);
    for ind in feasible {
        roll -= ind.fitness;
        if roll <= 0.0 {
            return ind;
        }
    }
    feasible[feasible.len() - 1]
}

/// Single-point crossover.
fn crossover<R: Rng>(p1: &[Guard], p2: &[Guard], rng: &mut R) -> (Vec<Guard>, Vec<Guard>) {
    if p1.len() < 2 {
        return (p1.to_vec(), p2.to_vec());
    }
    let point = rng.random_range(1..p1.len());
    let mut c1 = p1[..point].to_vec();
    c1.extend_from_slice(&p2[point..]);
    let mut c2 = p2[..point].to_vec();
    c2.extend_from_slice(&p1[point..]);
    (c1, c2)
}

/// Swaps two mutable gene positions, reverting when the resulting
/// schedule fails the whole-schedule oracle.
fn mutate<R: Rng>(
    genes: &mut [Guard],
    template: &Schedule,
    duties: &[DutyRef],
    frozen: &HashSet<usize>,
    domain: &DomainContext<'_>,
    rng: &mut R,
) {
    let movable: Vec<usize> = (0..genes.len()).filter(|i| !frozen.contains(i)).collect();
    if movable.len() < 2 {
        return;
    }
    let a = movable[rng.random_range(0..movable.len())];
    let b = movable[rng.random_range(0..movable.len())];
    if a == b {
        return;
    }

    genes.swap(a, b);
    let mutated = express(template, duties, genes);
    if !domain.schedule_valid(&mutated) {
        genes.swap(a, b); // revert
    }
}
