//! Elevator reflex agent.
//!
//! A sense/act agent with no search: it sweeps up and down, stopping at
//! requested floors. Nothing in the search core depends on it.

use log::*;

/// An agent driven by repeated `sense` / `act` cycles.
pub trait ReflexAgent {
    type Percept;

    fn sense(&self) -> Self::Percept;

    fn act(&mut self, percept: Self::Percept);
}

/// What the elevator perceives on its current floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorPercept {
    pub requested: bool,
    /// On the top floor moving up, or on floor 0 moving down.
    pub at_boundary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct Elevator {
    requests: Vec<bool>,
    floor: usize,
    direction: Direction,
    served: Vec<usize>,
}

impl Elevator {
    /// `requests[f]` is true if floor `f` has a pending call. Starts on
    /// floor 0 moving up. Returns `None` for an empty building.
    pub fn new(requests: Vec<bool>) -> Option<Self> {
        if requests.is_empty() {
            return None;
        }
        Some(Elevator {
            requests,
            floor: 0,
            direction: Direction::Up,
            served: Vec::new(),
        })
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn top_floor(&self) -> usize {
        self.requests.len() - 1
    }

    pub fn pending(&self) -> usize {
        self.requests.iter().filter(|&&r| r).count()
    }

    /// Floors stopped at, in order.
    pub fn served(&self) -> &[usize] {
        &self.served
    }

    /// Run `steps` sense/act cycles and return the floor after each.
    pub fn run(&mut self, steps: usize) -> Vec<usize> {
        (0..steps)
            .map(|_| {
                let percept = self.sense();
                self.act(percept);
                self.floor
            })
            .collect()
    }

    fn advance(&mut self, at_boundary: bool) {
        if at_boundary {
            self.direction = match self.direction {
                Direction::Up => Direction::Down,
                Direction::Down => Direction::Up,
            };
            debug!("elevator: reversing to {:?} at floor {}", self.direction, self.floor);
        }
        // A single-floor building has nowhere to go.
        if self.top_floor() == 0 {
            return;
        }
        self.floor = match self.direction {
            Direction::Up => self.floor + 1,
            Direction::Down => self.floor - 1,
        };
    }
}

impl ReflexAgent for Elevator {
    type Percept = FloorPercept;

    fn sense(&self) -> FloorPercept {
        let at_boundary = match self.direction {
            Direction::Up => self.floor == self.top_floor(),
            Direction::Down => self.floor == 0,
        };
        FloorPercept {
            requested: self.requests[self.floor],
            at_boundary,
        }
    }

    fn act(&mut self, percept: FloorPercept) {
        if percept.requested {
            info!("elevator: stopping on floor {}", self.floor);
            self.requests[self.floor] = false;
            self.served.push(self.floor);
        }
        self.advance(percept.at_boundary);
    }
}
