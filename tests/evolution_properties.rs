use ga_snake::brain::{Brain, EvaluatorKind, SearchConfig};
use ga_snake::evolution::{breed, evolve, Elitism, EvolutionConfig, ScoredBrain};
use ga_snake::game::{GameConfig, SnakeFactory, World};
use ga_snake::session::{SessionConfig, TrainingSession};
use ga_snake::{ConfigError, SessionError};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn finished_population(seed: u64, size: usize) -> (SnakeFactory, Vec<ga_snake::game::SnakeAgent>) {
    let factory = SnakeFactory::new(
        World::new(GameConfig::small(), SearchConfig::default()),
        EvaluatorKind::Linear,
    );
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut population = factory.create_population(size, &mut rng).unwrap();
    for _ in 0..3_000 {
        for agent in population.iter_mut() {
            agent.step();
        }
        if population.iter().all(|a| !a.alive) {
            break;
        }
    }
    (factory, population)
}

#[test]
fn evolve_preserves_population_size() {
    let config = EvolutionConfig::default();
    for size in [1, 2, 5, 13, 30] {
        let (factory, population) = finished_population(size as u64, size);
        let mut rng = SmallRng::seed_from_u64(100);
        let next = evolve(&population, &[1.0, 2.0], &factory, &config, &mut rng).unwrap();
        assert_eq!(next.agents.len(), size);
        assert!(next.agents.iter().all(|a| a.alive && a.length == 0));
    }
}

#[test]
fn evolve_of_empty_population_is_empty() {
    let (factory, _) = finished_population(0, 1);
    let mut rng = SmallRng::seed_from_u64(0);
    let next = evolve(&[], &[], &factory, &EvolutionConfig::default(), &mut rng).unwrap();
    assert!(next.agents.is_empty());
}

#[test]
fn evolve_rejects_out_of_range_probability() {
    let (factory, population) = finished_population(11, 6);
    let config = EvolutionConfig {
        gene_mutation_probability: 1.5,
        ..Default::default()
    };
    let mut rng = SmallRng::seed_from_u64(0);
    let result = evolve(&population, &[], &factory, &config, &mut rng);
    assert!(matches!(
        result,
        Err(SessionError::Config(ConfigError::OutOfRange {
            field: "gene_mutation_probability",
            ..
        }))
    ));
}

#[test]
fn fittest_brain_survives_unchanged() {
    let (factory, population) = finished_population(9, 12);
    let best = population
        .iter()
        .map(|a| a.fitness)
        .fold(f64::NEG_INFINITY, f64::max);
    let fittest: Vec<&Brain> = population
        .iter()
        .filter(|a| a.fitness == best)
        .map(|a| &a.brain)
        .collect();

    for elitism in [Elitism::Fixed(1), Elitism::Fixed(3), Elitism::Fraction(0.1)] {
        let config = EvolutionConfig {
            elitism,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(10);
        let next = evolve(&population, &[], &factory, &config, &mut rng).unwrap();
        assert!(fittest.contains(&&next.agents[0].brain));
    }
}

/// Mean squared change of every non-elite gene relative to a shared parent
fn perturbation(best_history: &[f64], trials: u64) -> f64 {
    let parent = Brain::new(vec![0.5, -0.25, 1.0, 0.0, 0.75, -1.0, 0.1, 0.2, -0.3]);
    let parents = vec![
        ScoredBrain {
            brain: parent.clone(),
            fitness: 10.0,
        };
        20
    ];
    let config = EvolutionConfig {
        elitism: Elitism::Fixed(1),
        injection_probability: 0.0,
        ..Default::default()
    };

    let mut total = 0.0;
    let mut genes = 0;
    for seed in 0..trials {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (children, _) = breed(&parents, best_history, 9, &config, &mut rng);
        for child in &children[1..] {
            for (c, p) in child.weights().iter().zip(parent.weights()) {
                total += (c - p).powi(2);
                genes += 1;
            }
        }
    }
    total / genes as f64
}

#[test]
fn improving_generations_mutate_less_than_stalled_ones() {
    let improving = perturbation(&[100.0, 150.0], 40);
    let stalled = perturbation(&[150.0, 150.0], 40);
    assert!(improving < stalled);
    // rates 0.1 and 0.3, both doubled for a collapsed population
    assert!(stalled / improving > 4.0);
}

#[test]
fn seeded_sessions_are_reproducible() {
    let config = SessionConfig {
        population_size: 10,
        seed: Some(2024),
        game: GameConfig::small(),
        max_ticks_per_generation: Some(3_000),
        ..Default::default()
    };

    let run = || {
        let mut session = TrainingSession::new(config.clone()).unwrap();
        let mut history = Vec::new();
        for _ in 0..3 {
            let summary = session.run_generation();
            history.push((summary.best_fitness, summary.best_length, summary.ticks));
            session.evolve().unwrap();
        }
        history
    };

    assert_eq!(run(), run());
}

#[test]
fn network_sessions_evolve_fifteen_genes() {
    let config = SessionConfig {
        population_size: 6,
        seed: Some(5),
        evaluator: EvaluatorKind::Network,
        game: GameConfig::small(),
        max_ticks_per_generation: Some(1_000),
        ..Default::default()
    };
    let mut session = TrainingSession::new(config).unwrap();
    session.run_generation();
    session.evolve().unwrap();

    assert!(session.population().iter().all(|a| a.brain.len() == 15));
}
