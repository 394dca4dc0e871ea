//! End-to-end runs of the optimizer on standard test problems

use mogwo::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn zdt1(x: &[f64]) -> Vec<f64> {
    let f1 = x[0];
    let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (x.len() - 1) as f64;
    vec![f1, g * (1.0 - (f1 / g).sqrt())]
}

fn dtlz2(x: &[f64]) -> Vec<f64> {
    use std::f64::consts::FRAC_PI_2;
    let g: f64 = x[2..].iter().map(|v| (v - 0.5).powi(2)).sum();
    let r = 1.0 + g;
    vec![
        r * (x[0] * FRAC_PI_2).cos() * (x[1] * FRAC_PI_2).cos(),
        r * (x[0] * FRAC_PI_2).cos() * (x[1] * FRAC_PI_2).sin(),
        r * (x[0] * FRAC_PI_2).sin(),
    ]
}

fn assert_mutually_non_dominated(objectives: &[Vec<f64>]) {
    for a in objectives {
        for b in objectives {
            assert!(!dominates(a, b), "{:?} dominates {:?}", a, b);
        }
    }
}

#[test]
fn zdt1_approaches_true_front() {
    let result = Mogwo::builder()
        .bounds(MultiBounds::uniform(Bounds::unit(), 10))
        .population_size(40)
        .max_generations(60)
        .archive_size(50)
        .reference_point(ReferencePointPolicy::Static(vec![1.1, 11.0]))
        .parallel_evaluation(false)
        .objective(zdt1)
        .build()
        .unwrap()
        .run_with_rng(&mut StdRng::seed_from_u64(7))
        .unwrap();

    assert_eq!(result.hypervolume_history.len(), 61);
    assert!(result.len() <= 50);
    assert_mutually_non_dominated(&result.objectives);
    assert_eq!(
        result.stats.generations[0].reference_point,
        vec![1.1, 11.0]
    );
    let first = result.hypervolume_history[0];
    let last = result.final_hypervolume().unwrap();
    assert!(last > first);
}

#[test]
fn three_objectives_use_monte_carlo() {
    let result = Mogwo::builder()
        .bounds(MultiBounds::uniform(Bounds::unit(), 6))
        .population_size(30)
        .max_generations(15)
        .archive_size(40)
        .leaders(LeaderStrategy::Composite)
        .pruning(PruningStrategy::clustering())
        .objective(dtlz2)
        .build()
        .unwrap()
        .run_with_rng(&mut StdRng::seed_from_u64(3))
        .unwrap();

    assert_eq!(result.hypervolume_history.len(), 16);
    assert!(result.objectives.iter().all(|o| o.len() == 3));
    assert!(result.hypervolume_history.iter().all(|hv| *hv >= 0.0));
    assert_mutually_non_dominated(&result.objectives);
}

#[test]
fn same_seed_same_result() {
    let run = |seed| {
        Mogwo::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 5))
            .population_size(20)
            .max_generations(10)
            .leaders(LeaderStrategy::CrowdingRanked)
            .hybrid(DifferentialHybrid::default())
            .seed(seed)
            .objective(zdt1)
            .build()
            .unwrap()
            .run()
            .unwrap()
    };
    let a = run(11);
    let b = run(11);
    assert_eq!(a.decisions, b.decisions);
    assert_eq!(a.objectives, b.objectives);
    assert_eq!(a.hypervolume_history, b.hypervolume_history);
}

#[test]
fn archive_members_respect_bounds() {
    let bounds = MultiBounds::from_pairs(&[(0.0, 1.0), (-2.0, 2.0), (-2.0, 2.0)]).unwrap();
    let result = Mogwo::builder()
        .bounds(bounds.clone())
        .population_size(25)
        .max_generations(20)
        .boundary(BoundaryHandling::Reflect)
        .diversity(DiversitySchedule::linear())
        .levy_flight(1.5)
        .objective(|x: &[f64]| vec![x[0], 1.0 - x[0] + x[1].powi(2) + x[2].powi(2)])
        .build()
        .unwrap()
        .run_with_rng(&mut StdRng::seed_from_u64(5))
        .unwrap();
    for (decision, _) in result.iter() {
        assert!(bounds.contains_vec(decision));
    }
}

#[test]
fn stagnation_stops_search_early() {
    // Every decision maps to the same objective vector, so the hypervolume
    // never moves after the first generation
    let result = Mogwo::builder()
        .bounds(MultiBounds::uniform(Bounds::unit(), 2))
        .population_size(10)
        .max_generations(100)
        .termination(HypervolumeStagnation::new(5, 1e-12))
        .objective(|_: &[f64]| vec![0.5, 0.5])
        .build()
        .unwrap()
        .run_with_rng(&mut StdRng::seed_from_u64(1))
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.generations, 4);
    assert_eq!(
        result.stats.termination_reason.as_deref(),
        Some("Hypervolume stagnation detected")
    );
}

#[test]
fn evaluation_budget_is_respected() {
    let result = Mogwo::builder()
        .bounds(MultiBounds::uniform(Bounds::unit(), 3))
        .population_size(10)
        .max_generations(100)
        .termination(MaxEvaluations::new(55))
        .objective(zdt1)
        .build()
        .unwrap()
        .run_with_rng(&mut StdRng::seed_from_u64(2))
        .unwrap();

    assert_eq!(result.evaluations, 60);
    assert_eq!(result.generations, 5);
}

#[test]
fn non_finite_objective_aborts_run() {
    let mut mogwo = Mogwo::builder()
        .bounds(MultiBounds::uniform(Bounds::unit(), 2))
        .population_size(8)
        .objective(|x: &[f64]| vec![x[0], f64::NAN])
        .build()
        .unwrap();
    let err = mogwo
        .run_with_rng(&mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert_eq!(err, MogwoError::NonFiniteObjective { index: 0 });
    assert_eq!(mogwo.state(), SearchState::Uninitialized);
}

#[test]
fn single_objective_rejected() {
    let mut mogwo = Mogwo::builder()
        .bounds(MultiBounds::uniform(Bounds::unit(), 2))
        .objective(|x: &[f64]| vec![x[0]])
        .build()
        .unwrap();
    let err = mogwo
        .run_with_rng(&mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, MogwoError::DimensionMismatch { .. }));
}

#[test]
fn config_round_trips_through_json() {
    let json = r#"{
        "population_size": 16,
        "max_generations": 4,
        "leaders": "Composite",
        "pruning": { "SigmaSharing": { "sigma": 0.2 } },
        "seed": 9
    }"#;
    let config = MogwoConfig::from_json(json).unwrap();
    assert_eq!(config.leaders, LeaderStrategy::Composite);

    let result = Mogwo::builder()
        .config(config)
        .bounds(MultiBounds::uniform(Bounds::unit(), 4))
        .objective(zdt1)
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(result.hypervolume_history.len(), 5);
    assert_eq!(result.evaluations, 16 * 5);

    let serialized = serde_json::to_string(&result).unwrap();
    assert!(serialized.contains("hypervolume_history"));
}
