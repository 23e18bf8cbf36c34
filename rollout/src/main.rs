mod args;
mod config;
use anyhow::Result;
use args::Args;
use clap::Parser;
use config::EvalConfig;
use log::{error, info};
use rollout_atari_env::{create_atari_env, AtariAct, AtariObs, Monitor};
use rollout_core::{
    record::{NullRecorder, Recorder},
    DefaultEvaluator, Env, EvalSummary, Evaluator as _,
};
use rollout_tch_agent::TchRecurrentPolicy;
use rollout_tensorboard::TensorboardRecorder;

fn create_recorder(config: &EvalConfig) -> Box<dyn Recorder> {
    match &config.logdir {
        Some(logdir) => {
            info!("Write diagnostics to {:?}", logdir);
            Box::new(TensorboardRecorder::new(logdir))
        }
        None => Box::new(NullRecorder::new()),
    }
}

fn evaluate<E>(env: E, policy: &mut TchRecurrentPolicy, config: &EvalConfig) -> Result<EvalSummary>
where
    E: Env<Obs = AtariObs, Act = AtariAct>,
{
    let recorder = create_recorder(config);
    DefaultEvaluator::new(env, config.n_episodes)
        .with_recorder(recorder)
        .evaluate(policy)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = EvalConfig::from_args(&args)?;

    if args.show_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let env = create_atari_env(&config.env_config)?;
    let mut policy =
        match TchRecurrentPolicy::from_checkpoint_dir(&config.checkpoint_dir, &config.policy_config)
        {
            Ok(policy) => policy,
            Err(e) => {
                error!("Failed to load a checkpoint: {:#}", e);
                std::process::exit(1);
            }
        };

    let summary = match &config.monitor_config {
        Some(monitor_config) => evaluate(Monitor::new(env, monitor_config)?, &mut policy, &config)?,
        None => evaluate(env, &mut policy, &config)?,
    };
    info!(
        "Evaluated, reward: {} +/-{}",
        summary.reward_mean(),
        summary.reward_std()
    );
    info!("Mean episode length: {}", summary.length_mean());

    if let Some(path) = &config.summary_path {
        summary.save(path)?;
        info!("Saved the summary to {:?}", path);
    }

    Ok(())
}
