//! FIFO buffer of directions assembled before a run.

use std::collections::VecDeque;

use arrow_quest_core::Direction;

/// Pending program. The core never caps its length; slot limits belong to
/// the editor in front of it.
#[derive(Clone, Debug, Default)]
pub(crate) struct CommandQueue {
    entries: VecDeque<Direction>,
}

impl CommandQueue {
    pub(crate) fn push(&mut self, direction: Direction) {
        self.entries.push_back(direction);
    }

    pub(crate) fn pop_front(&mut self) -> Option<Direction> {
        self.entries.pop_front()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_insertion_order() {
        let mut queue = CommandQueue::default();
        queue.push(Direction::Down);
        queue.push(Direction::Right);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front(), Some(Direction::Down));
        assert_eq!(queue.pop_front(), Some(Direction::Right));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_discards_everything() {
        let mut queue = CommandQueue::default();
        for direction in [Direction::Up, Direction::Left, Direction::Up] {
            queue.push(direction);
        }

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.iter().count(), 0);
    }
}
