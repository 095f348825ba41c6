use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Step;
use crate::error::{Error, Result};

/// Ordered, index-addressable collection of [`Step`]s.
///
/// Insertion order is execution order; nothing here reorders implicitly.
/// Index-addressed operations validate every index before mutating, so a
/// failed call is always a no-op rather than a partial mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    /// An empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step at the end.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Remove and return the step at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Step> {
        if index >= self.steps.len() {
            return Err(Error::NotFound(index));
        }
        Ok(self.steps.remove(index))
    }

    /// Drop all steps.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// The step at `index`.
    pub fn get(&self, index: usize) -> Result<&Step> {
        self.steps.get(index).ok_or(Error::NotFound(index))
    }

    /// Replace the step at `index`.
    pub fn replace_at(&mut self, index: usize, step: Step) -> Result<()> {
        let slot = self
            .steps
            .get_mut(index)
            .ok_or(Error::NotFound(index))?;
        *slot = step;
        Ok(())
    }

    /// Move the step at `from` so it ends up at position `to`. Both indices
    /// are checked up front; an invalid move leaves the sequence untouched.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.steps.len();
        if from >= len {
            return Err(Error::NotFound(from));
        }
        if to >= len {
            return Err(Error::NotFound(to));
        }
        let step = self.steps.remove(from);
        self.steps.insert(to, step);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl From<Vec<Step>> for StepSequence {
    fn from(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

impl FromIterator<Step> for StepSequence {
    fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeyAction, KeySpec, MouseAction, MouseButton, NamedKey};

    fn sample() -> StepSequence {
        StepSequence::from(vec![
            Step::mouse(MouseButton::Right, MouseAction::Click),
            Step::keyboard(KeySpec::Named(NamedKey::Esc), KeyAction::Press),
            Step::mouse(MouseButton::Left, MouseAction::Click),
        ])
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut seq = StepSequence::new();
        assert!(seq.is_empty());
        seq.push(Step::delay(1.0).unwrap());
        seq.push(Step::mouse(MouseButton::Left, MouseAction::Click));
        assert_eq!(seq.len(), 2);
        assert!(seq.get(0).unwrap().is_delay());
        assert!(!seq.get(1).unwrap().is_delay());
    }

    #[test]
    fn remove_at_returns_the_removed_step() {
        let mut seq = sample();
        let removed = seq.remove_at(1).unwrap();
        assert_eq!(
            removed,
            Step::keyboard(KeySpec::Named(NamedKey::Esc), KeyAction::Press)
        );
        assert_eq!(seq.len(), 2);
        assert!(matches!(seq.remove_at(2), Err(Error::NotFound(2))));
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn get_and_replace_report_not_found() {
        let mut seq = sample();
        assert!(matches!(seq.get(3), Err(Error::NotFound(3))));
        assert!(matches!(
            seq.replace_at(9, Step::delay(1.0).unwrap()),
            Err(Error::NotFound(9))
        ));
        seq.replace_at(0, Step::delay(2.0).unwrap()).unwrap();
        assert!(seq.get(0).unwrap().is_delay());
    }

    #[test]
    fn move_to_reorders() {
        let mut seq = sample();
        seq.move_to(0, 2).unwrap();
        assert_eq!(
            seq.steps()[2],
            Step::mouse(MouseButton::Right, MouseAction::Click)
        );
        assert_eq!(
            seq.steps()[0],
            Step::keyboard(KeySpec::Named(NamedKey::Esc), KeyAction::Press)
        );
    }

    #[test]
    fn invalid_move_is_a_no_op() {
        let mut seq = sample();
        let before = seq.clone();
        assert!(matches!(seq.move_to(0, 3), Err(Error::NotFound(3))));
        assert!(matches!(seq.move_to(5, 0), Err(Error::NotFound(5))));
        assert_eq!(seq, before);
    }

    #[test]
    fn clear_empties_the_sequence() {
        let mut seq = sample();
        seq.clear();
        assert!(seq.is_empty());
    }

    #[test]
    fn sequence_serializes_as_plain_list() {
        let seq = sample();
        let json = serde_json::to_string(&seq).unwrap();
        assert!(json.starts_with('['));
        let back: StepSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
    }
}
