use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use fnv::{FnvHashMap, FnvHashSet};

use crate::goal::GoalDescription;
use crate::heuristic::Heuristic;
use crate::level::Level;
use crate::state::State;

/// Open set of the graph search. States are arena references so the frontier
/// never owns or copies them.
///
/// `contains` and duplicate detection compare states by value (agent and box
/// positions), never by reference identity.
pub trait Frontier<'a> {
    /// Called before the first `add`, with the level and goal the search is
    /// about to run on. Discards anything left over from a previous search.
    fn prepare(&mut self, level: &'a Level, goal_description: &GoalDescription);

    fn add(&mut self, state: &'a State<'a>);

    fn pop(&mut self) -> Option<&'a State<'a>>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn size(&self) -> usize;

    fn contains(&self, state: &State<'a>) -> bool;

    /// Strategy name for status output.
    fn name(&self) -> String;
}

/// FIFO frontier - breadth-first search.
#[derive(Debug, Default)]
pub struct FrontierBfs<'a> {
    queue: VecDeque<&'a State<'a>>,
    set: FnvHashSet<&'a State<'a>>,
}

impl<'a> FrontierBfs<'a> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Frontier<'a> for FrontierBfs<'a> {
    fn prepare(&mut self, _level: &'a Level, _goal_description: &GoalDescription) {
        self.queue.clear();
        self.set.clear();
    }

    fn add(&mut self, state: &'a State<'a>) {
        self.queue.push_back(state);
        self.set.insert(state);
    }

    fn pop(&mut self) -> Option<&'a State<'a>> {
        let state = self.queue.pop_front()?;
        self.set.remove(state);
        Some(state)
    }

    fn size(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, state: &State<'a>) -> bool {
        self.set.contains(state)
    }

    fn name(&self) -> String {
        "breadth-first search".to_string()
    }
}

/// LIFO frontier - depth-first search.
#[derive(Debug, Default)]
pub struct FrontierDfs<'a> {
    stack: Vec<&'a State<'a>>,
    set: FnvHashSet<&'a State<'a>>,
}

impl<'a> FrontierDfs<'a> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Frontier<'a> for FrontierDfs<'a> {
    fn prepare(&mut self, _level: &'a Level, _goal_description: &GoalDescription) {
        self.stack.clear();
        self.set.clear();
    }

    fn add(&mut self, state: &'a State<'a>) {
        self.stack.push(state);
        self.set.insert(state);
    }

    fn pop(&mut self) -> Option<&'a State<'a>> {
        let state = self.stack.pop()?;
        self.set.remove(state);
        Some(state)
    }

    fn size(&self) -> usize {
        self.stack.len()
    }

    fn contains(&self, state: &State<'a>) -> bool {
        self.set.contains(state)
    }

    fn name(&self) -> String {
        "depth-first search".to_string()
    }
}

/// How a best-first frontier combines path cost and heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// f = h
    Greedy,
    /// f = g + h
    AStar,
}

/// Best-first frontier ordered by `f`, greedy or A* depending on
/// [`Evaluation`].
#[derive(Debug)]
pub struct FrontierBestFirst<'a> {
    evaluation: Evaluation,
    heuristic: Box<dyn Heuristic>,
    queue: PriorityQueue<'a>,
    goal_description: GoalDescription,
}

impl<'a> FrontierBestFirst<'a> {
    pub fn greedy(heuristic: Box<dyn Heuristic>) -> Self {
        Self::new(Evaluation::Greedy, heuristic)
    }

    pub fn astar(heuristic: Box<dyn Heuristic>) -> Self {
        Self::new(Evaluation::AStar, heuristic)
    }

    pub fn new(evaluation: Evaluation, heuristic: Box<dyn Heuristic>) -> Self {
        FrontierBestFirst {
            evaluation,
            heuristic,
            queue: PriorityQueue::new(),
            goal_description: GoalDescription::default(),
        }
    }

    fn f(&self, state: &State<'a>) -> f64 {
        let h = self.heuristic.h(state, &self.goal_description);
        match self.evaluation {
            Evaluation::Greedy => h,
            Evaluation::AStar => f64::from(state.path_cost) + h,
        }
    }
}

impl<'a> Frontier<'a> for FrontierBestFirst<'a> {
    fn prepare(&mut self, level: &'a Level, goal_description: &GoalDescription) {
        self.queue.clear();
        self.heuristic.preprocess(level);
        self.goal_description = goal_description.clone();
    }

    fn add(&mut self, state: &'a State<'a>) {
        let priority = self.f(state);
        self.queue.push(state, priority);
    }

    fn pop(&mut self) -> Option<&'a State<'a>> {
        self.queue.pop()
    }

    fn size(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, state: &State<'a>) -> bool {
        self.queue.contains(state)
    }

    fn name(&self) -> String {
        let strategy = match self.evaluation {
            Evaluation::Greedy => "greedy best-first search",
            Evaluation::AStar => "A* search",
        };
        format!("{} using {:?}", strategy, self.heuristic)
    }
}

#[derive(Debug)]
struct Entry<'a> {
    priority: f64,
    seq: u64,
    state: &'a State<'a>,
}

impl<'a> PartialEq for Entry<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a> Eq for Entry<'a> {}

impl<'a> PartialOrd for Entry<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Entry<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        // equal priorities break ties by insertion order (FIFO), which keeps
        // searches deterministic
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-priority queue over arena states with lazy deletion.
///
/// `BinaryHeap` has no decrease-key, so changing a state's priority pushes a
/// fresh entry and records its sequence number in `entry_finder`; `pop`
/// discards heap entries whose sequence number is no longer the recorded one.
/// `entry_finder` is the source of truth for membership and length.
#[derive(Debug, Default)]
pub struct PriorityQueue<'a> {
    heap: BinaryHeap<Reverse<Entry<'a>>>,
    entry_finder: FnvHashMap<&'a State<'a>, u64>,
    next_seq: u64,
}

impl<'a> PriorityQueue<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the state, or re-prioritizes it if already queued.
    pub fn push(&mut self, state: &'a State<'a>, priority: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entry_finder.insert(state, seq);
        self.heap.push(Reverse(Entry { priority, seq, state }));
    }

    pub fn pop(&mut self) -> Option<&'a State<'a>> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if self.entry_finder.get(entry.state) == Some(&entry.seq) {
                self.entry_finder.remove(entry.state);
                return Some(entry.state);
            }
            // stale entry superseded by a later push, skip it
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entry_finder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_finder.is_empty()
    }

    pub fn contains(&self, state: &State<'a>) -> bool {
        self.entry_finder.contains_key(state)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.entry_finder.clear();
    }
}
