//! Transition sampling

use rand::Rng;
use tracing::warn;

use crate::error::{PlanError, Result};
use crate::model::{validate_distribution, MdpModel, PROBABILITY_TOLERANCE};

/// Draw one successor state and reward for `action` in `state`.
///
/// Inverse-CDF sampling: a uniform draw in `[0, 1)` selects the first
/// transition whose cumulative probability mass meets or exceeds it.
/// Must not be called on a state without transitions. A list whose mass
/// is not 1 within [`PROBABILITY_TOLERANCE`] is rejected before drawing.
pub fn sample<M, R>(
    model: &M,
    state: &M::State,
    action: &M::Action,
    rng: &mut R,
) -> Result<(M::State, f64)>
where
    M: MdpModel + ?Sized,
    R: Rng + ?Sized,
{
    let transitions = model.transitions(state, action);
    if transitions.is_empty() {
        return Err(PlanError::no_transitions(state, action));
    }
    validate_distribution(state, action, &transitions, PROBABILITY_TOLERANCE)?;

    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for t in &transitions {
        cumulative += t.probability;
        if draw <= cumulative {
            return Ok((t.next_state.clone(), t.reward));
        }
    }

    // Only rounding is left: the mass is within tolerance of 1.
    warn!(
        draw,
        cumulative,
        ?state,
        ?action,
        "transition mass below draw, using final transition"
    );
    match transitions.into_iter().last() {
        Some(t) => Ok((t.next_state, t.reward)),
        None => Err(PlanError::no_transitions(state, action)),
    }
}
