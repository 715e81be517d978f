//! Ping-pong pair of temperature buffers.
//!
//! The lifecycle per step is:
//! 1. `stage()`: borrow published (read) and staging (write) buffers
//! 2. the caller fills every cell of the staging buffer
//! 3. `publish()`: swap roles, bump the generation

use plancha_core::StepError;

/// Read/write access to the two buffers during one step.
///
/// Created by [`PingPongField::stage()`]. Holds a shared borrow of the
/// published buffer and a mutable borrow of the staging buffer, so the
/// field cannot be published or reset while the step is in flight.
#[must_use]
pub struct StagingGuard<'a> {
    /// Field at the current time level. Read-only.
    pub current: &'a [f64],
    /// Field at the next time level. Every cell must be written.
    pub next: &'a mut [f64],
}

/// Double-buffered scalar field with index swap on publish.
#[derive(Clone, Debug)]
pub struct PingPongField {
    buffer_a: Vec<f64>,
    buffer_b: Vec<f64>,
    /// Which buffer is currently staging (false = A staging, B published).
    b_is_staging: bool,
    /// Number of successful publishes.
    generation: u64,
    /// Whether `stage()` has been called since the last publish.
    staged: bool,
}

impl PingPongField {
    /// A field of `len` cells, all at `value`.
    pub fn uniform(len: usize, value: f64) -> Self {
        Self::from_values(vec![value; len])
    }

    /// A field initialised from `values`.
    ///
    /// Both buffers start with the same contents so a staging buffer is
    /// never observed uninitialised.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            buffer_a: values.clone(),
            buffer_b: values,
            b_is_staging: false,
            generation: 0,
            staged: false,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.buffer_a.len()
    }

    /// Whether the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.buffer_a.is_empty()
    }

    /// Number of publishes since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a staged step is waiting to be published.
    pub fn is_staged(&self) -> bool {
        self.staged
    }

    /// The published (current) field.
    pub fn published(&self) -> &[f64] {
        if self.b_is_staging {
            &self.buffer_a
        } else {
            &self.buffer_b
        }
    }

    /// Begin a step: borrow current for reading and next for writing.
    pub fn stage(&mut self) -> StagingGuard<'_> {
        self.staged = true;
        if self.b_is_staging {
            StagingGuard {
                current: &self.buffer_a,
                next: &mut self.buffer_b,
            }
        } else {
            StagingGuard {
                current: &self.buffer_b,
                next: &mut self.buffer_a,
            }
        }
    }

    /// Make the staged buffer current.
    ///
    /// Returns [`StepError::NothingStaged`] if no step has been staged
    /// since the previous publish.
    pub fn publish(&mut self) -> Result<(), StepError> {
        if !self.staged {
            return Err(StepError::NothingStaged);
        }
        self.b_is_staging = !self.b_is_staging;
        self.generation += 1;
        self.staged = false;
        Ok(())
    }

    /// Drop any staged data without publishing it.
    pub fn discard(&mut self) {
        self.staged = false;
    }

    /// Overwrite both buffers with `values` and restart at generation 0.
    pub fn reset(&mut self, values: &[f64]) -> Result<(), StepError> {
        if values.len() != self.len() {
            return Err(StepError::LengthMismatch {
                expected: self.len(),
                got: values.len(),
            });
        }
        self.buffer_a.copy_from_slice(values);
        self.buffer_b.copy_from_slice(values);
        self.b_is_staging = false;
        self.generation = 0;
        self.staged = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn publish_without_stage_fails() {
        let mut f = PingPongField::uniform(4, 300.0);
        assert_eq!(f.publish(), Err(StepError::NothingStaged));
        assert_eq!(f.generation(), 0);
    }

    #[test]
    fn staged_values_become_current_after_publish() {
        let mut f = PingPongField::uniform(3, 1.0);
        {
            let StagingGuard { current, next } = f.stage();
            for (n, c) in next.iter_mut().zip(current) {
                *n = c + 1.0;
            }
        }
        assert_eq!(f.published(), &[1.0, 1.0, 1.0]);
        f.publish().unwrap();
        assert_eq!(f.published(), &[2.0, 2.0, 2.0]);
        assert_eq!(f.generation(), 1);
        assert!(!f.is_staged());
    }

    #[test]
    fn discard_keeps_current() {
        let mut f = PingPongField::uniform(2, 5.0);
        f.stage().next.fill(9.0);
        f.discard();
        assert_eq!(f.publish(), Err(StepError::NothingStaged));
        assert_eq!(f.published(), &[5.0, 5.0]);
    }

    #[test]
    fn reset_checks_length() {
        let mut f = PingPongField::uniform(2, 5.0);
        assert_eq!(
            f.reset(&[1.0]),
            Err(StepError::LengthMismatch {
                expected: 2,
                got: 1
            })
        );
        f.stage().next.fill(7.0);
        f.publish().unwrap();
        f.reset(&[1.0, 2.0]).unwrap();
        assert_eq!(f.published(), &[1.0, 2.0]);
        assert_eq!(f.generation(), 0);
    }

    proptest! {
        #[test]
        fn buffers_alternate(steps in 1usize..20) {
            let mut f = PingPongField::uniform(2, 0.0);
            for i in 0..steps {
                let StagingGuard { current, next } = f.stage();
                prop_assert_eq!(current[0], i as f64);
                next.fill(i as f64 + 1.0);
                f.publish().unwrap();
            }
            prop_assert_eq!(f.published()[0], steps as f64);
            prop_assert_eq!(f.generation(), steps as u64);
        }
    }
}
