use crate::diagnostics::Warning;
use crate::model::{Activation, Message, MessageDir, Participant, RowItem};

/// Per-participant working set of open activation intervals, indexed by level.
///
/// Lives only for the duration of [`compute_activations`]; finalized into
/// immutable [`Activation`] records.
#[derive(Debug, Default)]
struct ActivityStack {
    open: Vec<Option<(usize, usize)>>,
    done: Vec<Activation>,
}

impl ActivityStack {
    fn activate(&mut self, row: usize, level: usize) {
        if self.open.len() <= level {
            self.open.resize(level + 1, None);
        }
        match self.open[level] {
            Some((start, end)) if end + 1 == row => self.open[level] = Some((start, row)),
            Some(_) => {
                self.deactivate(level);
                self.open[level] = Some((row, row));
            }
            None => self.open[level] = Some((row, row)),
        }
    }

    fn deactivate(&mut self, level: usize) {
        if let Some((start, end)) = self.open[level].take() {
            self.done.push(Activation { level, start, end });
        }
    }

    fn finish(mut self) -> Vec<Activation> {
        for level in 0..self.open.len() {
            self.deactivate(level);
        }
        self.done.sort_by_key(|a| (a.level, a.start));
        self.done
    }
}

/// Walks the rows in order, tracking an active-count per participant the way
/// a call stack would: `forward` messages open a level on the receiver,
/// `back` messages close one.
///
/// `participants` must be in column order and `messages` must reference them
/// by column.
pub(super) fn compute_activations(
    participants: &mut [Participant],
    messages: &[Message],
    rows: &[RowItem],
    warnings: &mut Vec<Warning>,
) {
    let Some(first) = messages.first() else {
        return;
    };

    let mut counts = vec![0usize; participants.len()];
    counts[first.from.index()] = 1;
    for (column, participant) in participants.iter().enumerate() {
        if participant.activated {
            counts[column] = 1;
        }
    }

    let mut stacks: Vec<ActivityStack> = participants
        .iter()
        .map(|_| ActivityStack::default())
        .collect();

    for (row, item) in rows.iter().enumerate() {
        if let RowItem::Message(id) = item {
            let message = &messages[id.index()];
            if message.activate {
                let target = message.to.index();
                match message.dir {
                    MessageDir::Forward => counts[target] += 1,
                    MessageDir::Back if counts[target] == 0 => {
                        Warning::UnbalancedReturn {
                            participant: participants[target].id.clone(),
                            row,
                        }
                        .record(warnings);
                    }
                    MessageDir::Back => counts[target] -= 1,
                }
            }
        }

        for (column, count) in counts.iter().enumerate() {
            for level in 0..*count {
                stacks[column].activate(row, level);
            }
        }
    }

    for (participant, stack) in participants.iter_mut().zip(stacks) {
        participant.activations = stack.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_in_level_splits_activation() {
        let mut stack = ActivityStack::default();
        stack.activate(0, 0);
        stack.activate(1, 0);
        stack.activate(3, 0);
        stack.activate(1, 1);
        let acts = stack.finish();
        assert_eq!(
            acts,
            vec![
                Activation {
                    level: 0,
                    start: 0,
                    end: 1
                },
                Activation {
                    level: 0,
                    start: 3,
                    end: 3
                },
                Activation {
                    level: 1,
                    start: 1,
                    end: 1
                },
            ]
        );
    }

    #[test]
    fn empty_stack_materializes_nothing() {
        assert!(ActivityStack::default().finish().is_empty());
    }
}
