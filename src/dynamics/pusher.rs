//! Cascading displacement.
//!
//! A pusher that runs into non-static solids asks each of them to move by the
//! same step. The step only stands if every blocker moves the full amount;
//! otherwise every solid moved while trying is restored and the pusher is
//! treated as blocked.
//!
//! The chain of pushers above the current call is passed down the recursion
//! as a borrowed linked list. A solid already in the chain counts as an
//! immovable blocker, so two pushers can never push each other back and
//! forth, and the chain disappears with the top-level call.

use super::resolver::Resolver;
use crate::core::types::{Precision, Vec2};
use crate::utils::allocator::SolidId;

/// Pushers involved in the current top-level move, innermost first.
#[derive(Debug, Clone, Copy)]
pub struct PushChain<'a> {
    id: SolidId,
    parent: Option<&'a PushChain<'a>>,
}

impl<'a> PushChain<'a> {
    pub fn root(id: SolidId) -> Self {
        Self { id, parent: None }
    }

    pub fn then(&'a self, id: SolidId) -> PushChain<'a> {
        PushChain {
            id,
            parent: Some(self),
        }
    }

    pub fn contains(&self, id: SolidId) -> bool {
        let mut link = Some(self);
        while let Some(current) = link {
            if current.id == id {
                return true;
            }
            link = current.parent;
        }
        false
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut link = Some(self);
        while let Some(current) = link {
            depth += 1;
            link = current.parent;
        }
        depth
    }
}

impl<'w> Resolver<'w> {
    /// Pushes `blockers` by the step `id` just took from `previous`.
    ///
    /// Returns `false`, with `id` back at `previous` and every pushed solid
    /// restored, if any blocker is static, already in the chain, or could not
    /// move the full step.
    pub(super) fn shove(
        &mut self,
        id: SolidId,
        previous: Vec2,
        blockers: &[SolidId],
        precision: Precision,
        chain: Option<&PushChain<'_>>,
    ) -> bool {
        let step = self.position(id) - previous;

        let immovable = blockers.iter().any(|&blocker| {
            chain.is_some_and(|chain| chain.contains(blocker))
                || self.solids.get(blocker).map_or(true, |solid| solid.is_static)
        });
        if immovable {
            self.place(id, previous);
            return false;
        }

        let link = match chain {
            Some(parent) => parent.then(id),
            None => PushChain::root(id),
        };
        let checkpoint = self.journal.len();
        self.profiler.pushes_attempted += 1;

        for &blocker in blockers {
            let pushed = self.resolve(blocker, step, Some(precision), Some(&link));
            if !pushed.is_complete() {
                log::trace!(
                    "solid {id} failed to push {blocker} by {step:?} (chain depth {})",
                    link.depth()
                );
                self.roll_back(checkpoint);
                self.place(id, previous);
                return false;
            }
        }

        let Some(solid) = self.solids.get(id) else {
            return false;
        };
        let (bounds, collides_with) = (solid.bounds, solid.collides_with);
        if self.groups.collides(id, &bounds, collides_with, &*self.solids) {
            self.roll_back(checkpoint);
            self.place(id, previous);
            return false;
        }
        true
    }

    /// Restores every solid journaled after `checkpoint`, newest first.
    fn roll_back(&mut self, checkpoint: usize) {
        self.profiler.pushes_rolled_back += 1;
        while self.journal.len() > checkpoint {
            if let Some((id, position)) = self.journal.pop() {
                self.place(id, position);
            }
        }
        self.groups.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_tracks_every_ancestor() {
        let a = SolidId::new(0, 0);
        let b = SolidId::new(1, 0);
        let c = SolidId::new(2, 0);

        let root = PushChain::root(a);
        let inner = root.then(b);
        assert!(inner.contains(a));
        assert!(inner.contains(b));
        assert!(!inner.contains(c));
        assert_eq!(inner.depth(), 2);
        assert!(!root.contains(b));
    }
}
