use rand::Rng;
use tracing::debug;

use super::config::EvolutionConfig;
use super::crossover::CrossoverMethod;
use super::diversity::diversity;
use super::mutation::{adaptive_rate, mutate};
use super::selection::{cmp_fitness, SelectionMethod};
use crate::brain::{Brain, Evaluator};
use crate::error::SessionError;
use crate::game::{SnakeAgent, SnakeFactory};

/// A brain together with the fitness it earned
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBrain {
    pub brain: Brain,
    pub fitness: f64,
}

impl From<&SnakeAgent> for ScoredBrain {
    fn from(agent: &SnakeAgent) -> Self {
        Self {
            brain: agent.brain.clone(),
            fitness: agent.fitness,
        }
    }
}

/// What happened while breeding one generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreedStats {
    pub diversity: f64,
    pub mutation_rate: f64,
    pub elites: usize,
    pub offspring: usize,
    pub injected: usize,
    /// Parents picked by each method, in [`SelectionMethod::ALL`] order
    pub selections: [usize; 3],
}

/// Next generation of brains, the same size as `parents`.
///
/// The first entries are the elites, unchanged and fittest first. The rest
/// are mutated offspring with the occasional random newcomer.
///
/// `config` must pass [`EvolutionConfig::validate`]; probabilities outside
/// [0, 1] panic in the random draws. [`evolve`] checks this itself.
pub fn breed<R: Rng + ?Sized>(
    parents: &[ScoredBrain],
    best_history: &[f64],
    genome_len: usize,
    config: &EvolutionConfig,
    rng: &mut R,
) -> (Vec<Brain>, BreedStats) {
    let size = parents.len();
    if size == 0 {
        return (Vec::new(), BreedStats::default());
    }

    let diversity = diversity(parents.iter().map(|p| &p.brain));
    let mutation_rate = adaptive_rate(best_history, diversity, config);
    let injection_probability = if diversity < config.injection_diversity_threshold {
        config.injection_probability * config.injection_boost
    } else {
        config.injection_probability
    }
    .clamp(0.0, 1.0);

    let mut ranked: Vec<&ScoredBrain> = parents.iter().collect();
    ranked.sort_by(|a, b| cmp_fitness(b.fitness, a.fitness));

    let elites = config.elitism.count(size);
    let mut next: Vec<Brain> = ranked[..elites].iter().map(|p| p.brain.clone()).collect();

    let fitness: Vec<f64> = parents.iter().map(|p| p.fitness).collect();
    let mut stats = BreedStats {
        diversity,
        mutation_rate,
        elites,
        ..Default::default()
    };

    while next.len() < size {
        let method = SelectionMethod::pick(diversity, config, rng);
        let first = method.select(&fitness, config.tournament_size, rng);
        let second = method.select(&fitness, config.tournament_size, rng);
        let (Some(first), Some(second)) = (first, second) else {
            break;
        };
        stats.selections[method as usize] += 2;

        let crossover = CrossoverMethod::random(rng);
        let mut child = crossover
            .apply(&parents[first].brain, &parents[second].brain, rng)
            .fitted(genome_len);
        mutate(&mut child, mutation_rate, config.gene_mutation_probability, rng);
        next.push(child);
        stats.offspring += 1;

        if rng.gen_bool(injection_probability) {
            next.push(Brain::random(genome_len, rng));
            stats.injected += 1;
        }
    }

    next.truncate(size);
    (next, stats)
}

/// A bred population ready to run
#[derive(Debug)]
pub struct NextGeneration {
    pub agents: Vec<SnakeAgent>,
    pub stats: BreedStats,
}

/// Build the next population from a finished one.
///
/// `fitness_history` is the best fitness of every earlier generation, oldest
/// first. Elites keep their brain but restart from a fresh board.
pub fn evolve<R: Rng + ?Sized>(
    population: &[SnakeAgent],
    fitness_history: &[f64],
    factory: &SnakeFactory,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<NextGeneration, SessionError> {
    config.validate()?;
    let parents: Vec<ScoredBrain> = population.iter().map(ScoredBrain::from).collect();
    let genome_len = factory.evaluator().genome_len();
    let (brains, stats) = breed(&parents, fitness_history, genome_len, config, rng);

    debug!(
        diversity = stats.diversity,
        mutation_rate = stats.mutation_rate,
        elites = stats.elites,
        injected = stats.injected,
        "bred next generation"
    );

    let agents = brains
        .into_iter()
        .map(|brain| factory.create_agent(Some(brain), rng))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NextGeneration { agents, stats })
}
