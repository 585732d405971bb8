// SPDX-License-Identifier: GPL-3.0-only

/// Identifies one issued request of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Monotonic request counter, only the answer to the latest ticket is applied
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// What happened to an answer handed back to a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer request was issued meanwhile, the answer was dropped
    Stale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_ticket_is_current() {
        let mut sequence = RequestSequence::default();
        let first = sequence.issue();
        let second = sequence.issue();

        assert!(first < second);
        assert!(!sequence.is_latest(first));
        assert!(sequence.is_latest(second));
    }
}
