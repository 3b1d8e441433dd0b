#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flapsim::simulation::collision::{CollisionEngine, CollisionModel};
use flapsim::simulation::flyer::Flyer;
use flapsim::simulation::obstacle::Obstacle;
use flapsim::{Episode, EpisodeOutcome, NeuralPolicy, Params};

const MODELS: [CollisionModel; 2] = [CollisionModel::BoundingBox, CollisionModel::PixelMask];

fn create_test_params(model: CollisionModel) -> Params {
    Params {
        collision_model: model,
        ..Params::default()
    }
}

#[test]
fn test_flyer_inside_gap_is_clear() {
    for model in MODELS {
        let params = create_test_params(model);
        let mut engine = CollisionEngine::new(model);
        let flyer = Flyer::new(230.0, 350.0, &params);
        let obstacle = Obstacle::with_gap(200.0, 300, &params);

        assert!(
            !engine.flyer_hits_obstacle(&flyer, &obstacle, &params),
            "{model:?}"
        );
    }
}

#[test]
fn test_flyer_in_top_piece_collides() {
    for model in MODELS {
        let params = create_test_params(model);
        let mut engine = CollisionEngine::new(model);
        let flyer = Flyer::new(230.0, 280.0, &params);
        let obstacle = Obstacle::with_gap(200.0, 300, &params);

        assert!(
            engine.flyer_hits_obstacle(&flyer, &obstacle, &params),
            "{model:?}"
        );
    }
}

#[test]
fn test_flyer_in_bottom_piece_collides() {
    for model in MODELS {
        let params = create_test_params(model);
        let mut engine = CollisionEngine::new(model);
        let flyer = Flyer::new(230.0, 480.0, &params);
        let obstacle = Obstacle::with_gap(200.0, 300, &params);

        assert!(
            engine.flyer_hits_obstacle(&flyer, &obstacle, &params),
            "{model:?}"
        );
    }
}

#[test]
fn test_distant_obstacle_is_clear() {
    for model in MODELS {
        let params = create_test_params(model);
        let mut engine = CollisionEngine::new(model);
        let flyer = Flyer::new(230.0, 100.0, &params);
        let obstacle = Obstacle::with_gap(600.0, 300, &params);

        assert!(
            !engine.flyer_hits_obstacle(&flyer, &obstacle, &params),
            "{model:?}"
        );
    }
}

#[test]
fn test_mask_cache_is_keyed_by_tilt() {
    let params = create_test_params(CollisionModel::PixelMask);
    let mut engine = CollisionEngine::new(CollisionModel::PixelMask);
    let obstacle = Obstacle::with_gap(200.0, 300, &params);
    let mut flyer = Flyer::new(230.0, 350.0, &params);

    for tilt in [0.0, 0.2, 20.0, 25.0, 20.0] {
        flyer.tilt = tilt;
        engine.flyer_hits_obstacle(&flyer, &obstacle, &params);
    }

    // 0.0 and 0.2 share one whole-degree entry
    assert_eq!(engine.atlas().cached_tilts(), 3);
}

#[test]
fn test_pixel_mask_episode_runs_to_completion() {
    let params = Params {
        population_size: 6,
        ..create_test_params(CollisionModel::PixelMask)
    };
    let mut policies: Vec<NeuralPolicy> = (0..6)
        .map(|i| NeuralPolicy::random(4, 40 + i).unwrap())
        .collect();
    let mut episode = Episode::new(params, &mut policies, 0, 8).unwrap();

    let outcome = episode.run_headless();

    assert_ne!(outcome, EpisodeOutcome::Cancelled);
    assert_eq!(
        episode.simulator().collision().model(),
        CollisionModel::PixelMask
    );
}
