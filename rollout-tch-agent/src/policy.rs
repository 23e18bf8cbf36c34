//! Recurrent policy backed by a TorchScript module.
use crate::{latest_checkpoint, PolicyError, TchPolicyConfig};
use anyhow::Result;
use log::{info, trace};
use rollout_core::{Env, Policy};
use std::{convert::TryFrom, path::Path};
use tch::{CModule, Device, IValue, Kind, Tensor};

/// State of an LSTM cell, both of shape `[1, hidden_size]`.
pub struct LstmState {
    /// Cell state.
    pub c: Tensor,

    /// Hidden state.
    pub h: Tensor,
}

impl LstmState {
    /// Zero state.
    pub fn zeros(hidden_size: i64, device: Device) -> Self {
        Self {
            c: Tensor::zeros(&[1, hidden_size], (Kind::Float, device)),
            h: Tensor::zeros(&[1, hidden_size], (Kind::Float, device)),
        }
    }
}

/// Splits the output of the module into `(c, h, action)`.
fn split_output(output: IValue) -> Result<(Tensor, Tensor, Tensor)> {
    let items = match output {
        IValue::Tuple(items) | IValue::GenericList(items) => items,
        v => {
            return Err(
                PolicyError::UnexpectedOutput(format!("expected a tuple, got {:?}", v)).into(),
            )
        }
    };

    let mut tensors = Vec::with_capacity(3);
    for item in items {
        match item {
            IValue::Tensor(t) => tensors.push(t),
            v => {
                return Err(
                    PolicyError::UnexpectedOutput(format!("expected a tensor, got {:?}", v))
                        .into(),
                )
            }
        }
    }

    match <[Tensor; 3]>::try_from(tensors) {
        Ok([c, h, action]) => Ok((c, h, action)),
        Err(tensors) => Err(PolicyError::UnexpectedOutput(format!(
            "expected (c, h, action), got {} tensors",
            tensors.len()
        ))
        .into()),
    }
}

/// Returns the action index in `action`.
///
/// One-hot vectors or logits (rank 2 or more) are reduced with arg-max over
/// the last axis, otherwise the value itself is the action.
fn action_index(action: &Tensor) -> Result<usize> {
    let action = if action.dim() >= 2 {
        action.f_argmax(-1, false)?
    } else {
        action.shallow_clone()
    };
    let action = action.f_to_kind(Kind::Int64)?.f_reshape(&[-1])?;
    if action.numel() == 0 {
        return Err(PolicyError::UnexpectedOutput("empty action".to_string()).into());
    }

    let a = action.f_int64_value(&[0])?;
    if a < 0 {
        return Err(PolicyError::UnexpectedOutput(format!("negative action {}", a)).into());
    }
    Ok(a as usize)
}

/// A policy computing actions and the next LSTM state with a TorchScript module.
pub struct TchRecurrentPolicy {
    module: CModule,
    method: String,
    hidden_size: i64,
    device: Device,
}

impl TchRecurrentPolicy {
    /// Loads the module saved at `path`.
    pub fn load(path: impl AsRef<Path>, config: &TchPolicyConfig) -> Result<Self> {
        let path = path.as_ref();
        let device: Device = config.device.into();
        info!("Loading checkpoint {:?}", path);
        let mut module = CModule::load_on_device(path, device)?;
        module.set_eval();

        Ok(Self {
            module,
            method: config.method.clone(),
            hidden_size: config.hidden_size,
            device,
        })
    }

    /// Loads the latest checkpoint in `dir`.
    pub fn from_checkpoint_dir(dir: impl AsRef<Path>, config: &TchPolicyConfig) -> Result<Self> {
        let dir = dir.as_ref();
        match latest_checkpoint(dir)? {
            Some(path) => Self::load(path, config),
            None => Err(PolicyError::CheckpointNotFound(dir.to_path_buf()).into()),
        }
    }

    fn forward(&self, obs: &Tensor, state: LstmState) -> Result<(usize, LstmState)> {
        let inputs = [
            IValue::Tensor(obs.to_device(self.device)),
            IValue::Tensor(state.c),
            IValue::Tensor(state.h),
        ];
        let output = self.module.method_is(&self.method, &inputs)?;
        let (c, h, action) = split_output(output)?;
        let act = action_index(&action)?;
        trace!("action = {}", act);

        Ok((act, LstmState { c, h }))
    }
}

impl<E> Policy<E> for TchRecurrentPolicy
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<usize>,
{
    type State = LstmState;

    fn initial_state(&self) -> LstmState {
        LstmState::zeros(self.hidden_size, self.device)
    }

    fn sample(&mut self, obs: &E::Obs, state: LstmState) -> Result<(E::Act, LstmState)> {
        let obs: Tensor = obs.clone().into();
        let (act, state) = tch::no_grad(|| self.forward(&obs, state))?;
        Ok((act.into(), state))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_action_index() -> Result<()> {
        init();
        let logits = Tensor::from_slice(&[0.1f32, 0.7, 0.2]).reshape(&[1, 3]);
        assert_eq!(action_index(&logits)?, 1);

        let one_hot = Tensor::from_slice(&[0f32, 0., 0., 1.]).reshape(&[1, 4]);
        assert_eq!(action_index(&one_hot)?, 3);

        assert_eq!(action_index(&Tensor::from_slice(&[2i64]))?, 2);
        assert_eq!(action_index(&Tensor::from(5i64))?, 5);
        assert!(action_index(&Tensor::from_slice(&[-1i64])).is_err());
        Ok(())
    }

    #[test]
    fn test_split_output() -> Result<()> {
        let output = IValue::Tuple(vec![
            IValue::Tensor(Tensor::zeros(&[1, 4], (Kind::Float, Device::Cpu))),
            IValue::Tensor(Tensor::ones(&[1, 4], (Kind::Float, Device::Cpu))),
            IValue::Tensor(Tensor::from(1i64)),
        ]);
        let (c, h, action) = split_output(output)?;
        assert_eq!(c.size(), vec![1, 4]);
        assert_eq!(h.double_value(&[0, 0]), 1.0);
        assert_eq!(action_index(&action)?, 1);

        let pair = IValue::Tuple(vec![
            IValue::Tensor(Tensor::from(1i64)),
            IValue::Tensor(Tensor::from(1i64)),
        ]);
        assert!(split_output(pair).is_err());
        assert!(split_output(IValue::Tensor(Tensor::from(1i64))).is_err());
        Ok(())
    }

    #[test]
    fn test_zero_state() {
        let state = LstmState::zeros(256, Device::Cpu);
        assert_eq!(state.c.size(), vec![1, 256]);
        assert_eq!(state.h.size(), vec![1, 256]);
        assert_eq!(state.h.abs().sum(Kind::Float).double_value(&[]), 0.0);
    }

    #[test]
    fn test_missing_checkpoint() -> Result<()> {
        init();
        let dir = tempdir::TempDir::new("policy")?;
        let config = TchPolicyConfig::default();
        let err = match TchRecurrentPolicy::from_checkpoint_dir(dir.path(), &config) {
            Ok(_) => panic!("loaded a policy from an empty directory"),
            Err(err) => err,
        };
        assert!(matches!(
            err.downcast_ref::<PolicyError>(),
            Some(PolicyError::CheckpointNotFound(_))
        ));
        Ok(())
    }
}
