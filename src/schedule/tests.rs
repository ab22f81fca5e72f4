//! Schedule tests

use super::*;
use crate::config::{generate_config, Template, TrainConfig};

fn debug_config() -> TrainConfig {
    generate_config(Template::Debug)
}

fn plan(config: &TrainConfig, epoch: u32) -> EpochPlan {
    EpochPlan::for_epoch(config, epoch)
}

#[test]
fn test_phases_start_strictly_after_threshold() {
    let config = debug_config();

    assert_eq!(plan(&config, 1).train, vec![Phase::Tokenizer]);
    assert_eq!(
        plan(&config, 2).train,
        vec![Phase::Tokenizer, Phase::WorldModel]
    );
    assert_eq!(plan(&config, 3).train, Phase::ALL.to_vec());
}

#[test]
fn test_no_training_when_disabled() {
    let mut config = debug_config();
    config.training_settings.should = false;

    let plan = plan(&config, 4);
    assert!(plan.train.is_empty());
    assert!(!plan.collect_train);
    assert_eq!(plan.checkpoint, None);
    assert!(plan.evaluate);
}

#[test]
fn test_collection_stops_after_threshold() {
    let config = debug_config();
    assert!(plan(&config, 4).collect_train);
    assert!(!plan(&config, 5).collect_train);
}

#[test]
fn test_collection_without_stop_runs_every_epoch() {
    let mut config = debug_config();
    config.collector_train.stop_after_epochs = None;
    assert!(Schedule::new(&config).all(|plan| plan.collect_train));
}

#[test]
fn test_evaluation_cadence() {
    let config = debug_config();
    let evaluated: Vec<u32> = Schedule::new(&config)
        .filter(|plan| plan.evaluate)
        .map(|plan| plan.epoch)
        .collect();
    assert_eq!(evaluated, vec![2, 4, 6]);
}

#[test]
fn test_evaluation_gated_per_phase() {
    let config = debug_config();

    let second = plan(&config, 2);
    assert_eq!(second.eval, vec![Phase::Tokenizer, Phase::WorldModel]);
    assert!(!second.inspects_imagination());

    let fourth = plan(&config, 4);
    assert_eq!(fourth.eval, Phase::ALL.to_vec());
    assert!(fourth.inspects_imagination());

    assert!(plan(&config, 3).eval.is_empty());
}

#[test]
fn test_evaluation_disabled() {
    let mut config = debug_config();
    config.evaluation_settings.should = false;
    assert!(Schedule::new(&config).all(|plan| !plan.evaluate && plan.eval.is_empty()));
}

#[test]
fn test_reconstructions_only_on_evaluation_epochs() {
    let mut config = debug_config();
    config.evaluation_settings.tokenizer.save_reconstructions = true;

    assert!(!plan(&config, 1).save_reconstructions);
    assert!(plan(&config, 2).save_reconstructions);
}

#[test]
fn test_checkpoint_mode_follows_do_checkpoint() {
    let mut config = debug_config();
    assert_eq!(plan(&config, 1).checkpoint, Some(CheckpointMode::AgentOnly));

    config.common.do_checkpoint = true;
    assert_eq!(plan(&config, 1).checkpoint, Some(CheckpointMode::Full));
}

#[test]
fn test_idle_epoch() {
    let mut config = debug_config();
    config.training_settings.should = false;
    assert!(plan(&config, 1).is_idle());
    assert!(!plan(&config, 2).is_idle());
}

#[test]
fn test_schedule_covers_every_epoch() {
    let config = debug_config();
    let epochs: Vec<u32> = Schedule::new(&config).map(|plan| plan.epoch).collect();
    assert_eq!(epochs, (1..=6).collect::<Vec<_>>());
    assert_eq!(Schedule::new(&config).len(), 6);
}

#[test]
fn test_resumed_schedule_starts_after_completed_epoch() {
    let config = debug_config();
    let schedule = Schedule::resume_after(&config, 4);
    assert_eq!(schedule.start_epoch(), Some(5));
    assert_eq!(schedule.map(|plan| plan.epoch).collect::<Vec<_>>(), vec![5, 6]);

    let finished = Schedule::resume_after(&config, 6);
    assert_eq!(finished.start_epoch(), None);
    assert_eq!(finished.count(), 0);
}

#[test]
fn test_between_clamps_to_run() {
    let config = debug_config();
    let epochs: Vec<u32> = Schedule::between(&config, 0, 100)
        .map(|plan| plan.epoch)
        .collect();
    assert_eq!(epochs.first(), Some(&1));
    assert_eq!(epochs.last(), Some(&6));

    assert_eq!(Schedule::between(&config, 5, 3).count(), 0);
}

#[test]
fn test_training_batch_shapes() {
    let config = generate_config(Template::Default);

    let tokenizer = training_batch(&config, Phase::Tokenizer);
    assert_eq!(tokenizer.sample.sequence_length, 1);
    assert!(tokenizer.sample.sample_from_start);
    assert_eq!(tokenizer.sample.batch_num_samples, 256);

    let world_model = training_batch(&config, Phase::WorldModel);
    assert_eq!(world_model.sample.sequence_length, 20);
    assert!(world_model.sample.sample_from_start);

    let actor_critic = training_batch(&config, Phase::ActorCritic);
    assert_eq!(actor_critic.sample.sequence_length, 21);
    assert!(!actor_critic.sample.sample_from_start);
}

#[test]
fn test_maximal_burn_in_saturates_sequence_length() {
    let mut config = debug_config();
    config.training_settings.actor_critic.burn_in = u32::MAX;

    let batch = training_batch(&config, Phase::ActorCritic);
    assert_eq!(batch.sample.sequence_length, u32::MAX);
    let imagination = evaluation_batch(&config, Phase::ActorCritic);
    assert_eq!(imagination.sequence_length, u32::MAX);
    assert_eq!(summarize(&config).epochs, config.common.epochs);
}

#[test]
fn test_effective_batch_size_includes_accumulation() {
    let mut config = generate_config(Template::Default);
    config.training_settings.world_model.component.grad_acc_steps = 4;

    let batch = training_batch(&config, Phase::WorldModel);
    assert_eq!(batch.effective_batch_size(), 256);
    assert_eq!(batch.samples_per_epoch(), 256 * 200);
}

#[test]
fn test_evaluation_batches_use_evaluation_sizes() {
    let mut config = generate_config(Template::Default);
    config.evaluation_settings.tokenizer.batch_num_samples = 32;

    assert_eq!(
        evaluation_batch(&config, Phase::Tokenizer).batch_num_samples,
        32
    );
    let imagination = evaluation_batch(&config, Phase::ActorCritic);
    assert_eq!(imagination.batch_num_samples, 64);
    assert_eq!(imagination.sequence_length, 21);
    assert!(!imagination.sample_from_start);

    let reconstructions = reconstruction_batch(&config);
    assert_eq!(reconstructions.batch_num_samples, RECONSTRUCTION_SAMPLES);
    assert_eq!(reconstructions.sequence_length, 20);
}

#[test]
fn test_imagination_episode_ids() {
    let config = generate_config(Template::Default);

    assert_eq!(imagination_episode_id(&config, 51, 0, 64), Some(0));
    assert_eq!(imagination_episode_id(&config, 55, 3, 64), Some(4 * 64 + 3));
    assert_eq!(imagination_episode_id(&config, 50, 0, 64), None);
    assert_eq!(imagination_episode_id(&config, 0, 0, 64), None);
}

#[test]
fn test_early_imagination_inspection_has_no_episode_ids() {
    let mut config = debug_config();
    config.evaluation_settings.actor_critic.start_after_epochs = 0;
    let n = config.evaluation_settings.actor_critic.num_episodes_to_save;

    let second = plan(&config, 2);
    assert!(second.inspects_imagination());
    assert_eq!(imagination_episode_id(&config, 2, 0, n), None);

    let fourth = plan(&config, 4);
    assert!(fourth.inspects_imagination());
    assert_eq!(imagination_episode_id(&config, 4, 0, n), Some(u64::from(n)));
}

#[test]
fn test_summary_counts_debug_run() {
    let config = debug_config();
    let summary = summarize(&config);

    assert_eq!(summary.epochs, 6);
    assert_eq!(summary.collection_epochs, 4);
    assert_eq!(summary.evaluation_epochs, 3);
    assert_eq!(summary.checkpoint_epochs, 6);

    let training: Vec<u32> = summary.phases.iter().map(|p| p.training_epochs).collect();
    assert_eq!(training, vec![6, 5, 4]);
    let evaluation: Vec<u32> = summary.phases.iter().map(|p| p.evaluation_epochs).collect();
    assert_eq!(evaluation, vec![3, 3, 2]);

    let tokenizer = &summary.phases[0];
    assert_eq!(tokenizer.optimizer_steps, 12);
    assert_eq!(tokenizer.samples, 6 * 4 * 2);
}

#[test]
fn test_phase_names_match_sections() {
    let names: Vec<String> = Phase::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["tokenizer", "world_model", "actor_critic"]);
    assert_eq!(
        serde_json::to_string(&Phase::WorldModel).unwrap(),
        "\"world_model\""
    );
}
