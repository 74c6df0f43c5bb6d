//! Multiset assignment engine.
//!
//! Decides whether got items can be paired with expected pins under a
//! [`Policy`], calling back into the comparator to test each candidate
//! pairing. On failure it reports which items could not be placed instead
//! of a bare "no match".
//!
//! Duplicates-matter problems (the Bag family) are solved as a maximum
//! bipartite matching; the items left unmatched by a maximum matching are
//! a smallest witness of infeasibility. Duplicates-ignored problems (the
//! Set family) collapse equal got items and only require every item on a
//! saturated side to have at least one compatible partner.
//!
//! Pins are tried literal-first, then in declared order, so the witness
//! chosen for ambiguous inputs is stable from run to run.

mod kuhn;

use serde::Serialize;

use crate::compare::compare;
use crate::context::Context;
use crate::tag::{Expectation, Tag};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Every got item and every pin is paired.
    Exact,
    /// Every got item is paired; pins may be left over.
    Sub,
    /// Every pin is paired; got items may be left over.
    Super,
    /// No got item may be compatible with any pin.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Duplicates {
    /// Bag family: each got item consumes one pin.
    Matter,
    /// Set family: equal got items collapse, a pin may serve many items.
    Ignored,
}

impl Policy {
    fn saturates_got(self) -> bool {
        matches!(self, Self::Exact | Self::Sub)
    }

    fn saturates_pins(self) -> bool {
        matches!(self, Self::Exact | Self::Super)
    }
}

/// A witnessing assignment: `(got index, pin index)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub pairs: Vec<(usize, usize)>,
}

impl Solution {
    pub fn pin_for(&self, got: usize) -> Option<usize> {
        self.pairs.iter().find(|(g, _)| *g == got).map(|(_, p)| *p)
    }
}

/// Why no assignment exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Unsatisfied {
    /// Pins left without a got item, in declared order.
    pub missing: Vec<usize>,
    /// Got items left without a pin, in got order.
    pub extra: Vec<usize>,
    /// `(got index, pin index)` pairs that must not match but do.
    pub collisions: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Copy)]
pub struct AssignmentProblem<'a> {
    pub got: &'a [Value],
    pub pins: &'a [Expectation],
    pub duplicates: Duplicates,
    pub policy: Policy,
}

impl<'a> AssignmentProblem<'a> {
    pub fn new(
        got: &'a [Value],
        pins: &'a [Expectation],
        duplicates: Duplicates,
        policy: Policy,
    ) -> Self {
        Self {
            got,
            pins,
            duplicates,
            policy,
        }
    }

    /// Solves the problem, testing pairings with boolean-only probes of
    /// `ctx` (each with its own visited set).
    pub fn solve(&self, ctx: &Context) -> Result<Solution, Unsatisfied> {
        let tags: Vec<Tag> = self.pins.iter().map(Expectation::tag).collect();
        solve_graph(
            self.got.len(),
            &tags,
            self.policy,
            self.duplicates,
            |g, p| compare(&ctx.probe(), &self.got[g], self.pins[p].value()).is_ok(),
            |a, b| compare(&ctx.probe(), &self.got[a], &self.got[b]).is_ok(),
        )
    }
}

/// Pin indices, literals first, each group in declared order.
fn preference_order(tags: &[Tag]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tags.len()).collect();
    order.sort_by_key(|&p| tags[p]);
    order
}

/// First occurrence of each class of equal got items.
fn representatives<F>(got_len: usize, mut same: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut reps: Vec<usize> = Vec::new();
    for g in 0..got_len {
        if !reps.iter().any(|&r| same(r, g)) {
            reps.push(g);
        }
    }
    reps
}

/// The engine proper, over an abstract compatibility relation.
///
/// `edge(g, p)` tells whether got item `g` is compatible with pin `p`;
/// `same_got(a, b)` whether two got items are equal (only consulted when
/// duplicates are ignored).
pub(crate) fn solve_graph<E, S>(
    got_len: usize,
    pin_tags: &[Tag],
    policy: Policy,
    duplicates: Duplicates,
    mut edge: E,
    same_got: S,
) -> Result<Solution, Unsatisfied>
where
    E: FnMut(usize, usize) -> bool,
    S: FnMut(usize, usize) -> bool,
{
    let order = preference_order(pin_tags);
    let reps = match duplicates {
        Duplicates::Matter => (0..got_len).collect(),
        Duplicates::Ignored => representatives(got_len, same_got),
    };
    let adj: Vec<Vec<usize>> = reps
        .iter()
        .map(|&g| order.iter().copied().filter(|&p| edge(g, p)).collect())
        .collect();

    tracing::debug!(
        got = got_len,
        distinct = reps.len(),
        pins = pin_tags.len(),
        edges = adj.iter().map(Vec::len).sum::<usize>(),
        ?policy,
        ?duplicates,
        "solving assignment"
    );

    let outcome = match (policy, duplicates) {
        (Policy::None, _) => solve_none(&reps, &adj),
        (_, Duplicates::Matter) => solve_bag(&reps, &adj, pin_tags.len(), policy),
        (_, Duplicates::Ignored) => solve_set(&reps, &adj, pin_tags.len(), policy),
    };

    match &outcome {
        Ok(sol) => tracing::trace!(pairs = sol.pairs.len(), "assignment found"),
        Err(u) => tracing::debug!(
            missing = u.missing.len(),
            extra = u.extra.len(),
            collisions = u.collisions.len(),
            "assignment infeasible"
        ),
    }
    outcome
}

fn solve_none(reps: &[usize], adj: &[Vec<usize>]) -> Result<Solution, Unsatisfied> {
    let mut collisions: Vec<(usize, usize)> = reps
        .iter()
        .zip(adj)
        .flat_map(|(&g, pins)| pins.iter().map(move |&p| (g, p)))
        .collect();
    if collisions.is_empty() {
        return Ok(Solution::default());
    }
    collisions.sort_unstable();
    Err(Unsatisfied {
        collisions,
        ..Unsatisfied::default()
    })
}

fn solve_bag(
    reps: &[usize],
    adj: &[Vec<usize>],
    pin_len: usize,
    policy: Policy,
) -> Result<Solution, Unsatisfied> {
    let m = kuhn::max_matching(adj, pin_len);
    tracing::trace!(matched = m.size(), "maximum matching");

    let extra: Vec<usize> = if policy.saturates_got() {
        reps.iter()
            .zip(&m.left)
            .filter(|(_, r)| r.is_none())
            .map(|(&g, _)| g)
            .collect()
    } else {
        Vec::new()
    };
    let missing: Vec<usize> = if policy.saturates_pins() {
        (0..pin_len).filter(|&p| m.right[p].is_none()).collect()
    } else {
        Vec::new()
    };

    if !extra.is_empty() || !missing.is_empty() {
        return Err(Unsatisfied {
            missing,
            extra,
            collisions: Vec::new(),
        });
    }
    Ok(Solution {
        pairs: reps
            .iter()
            .zip(&m.left)
            .filter_map(|(&g, r)| r.map(|p| (g, p)))
            .collect(),
    })
}

fn solve_set(
    reps: &[usize],
    adj: &[Vec<usize>],
    pin_len: usize,
    policy: Policy,
) -> Result<Solution, Unsatisfied> {
    // First compatible got item for each pin.
    let mut cover: Vec<Option<usize>> = vec![None; pin_len];
    for (&g, pins) in reps.iter().zip(adj) {
        for &p in pins {
            cover[p].get_or_insert(g);
        }
    }

    let extra: Vec<usize> = if policy.saturates_got() {
        reps.iter()
            .zip(adj)
            .filter(|(_, pins)| pins.is_empty())
            .map(|(&g, _)| g)
            .collect()
    } else {
        Vec::new()
    };
    let missing: Vec<usize> = if policy.saturates_pins() {
        (0..pin_len).filter(|&p| cover[p].is_none()).collect()
    } else {
        Vec::new()
    };

    if !extra.is_empty() || !missing.is_empty() {
        return Err(Unsatisfied {
            missing,
            extra,
            collisions: Vec::new(),
        });
    }

    // Each got item with its preferred pin, then any pin not yet used
    // with its first compatible got item.
    let mut pairs: Vec<(usize, usize)> = reps
        .iter()
        .zip(adj)
        .filter_map(|(&g, pins)| pins.first().map(|&p| (g, p)))
        .collect();
    for (p, g) in cover.iter().enumerate() {
        if let Some(g) = g {
            if !pairs.iter().any(|&(_, used)| used == p) {
                pairs.push((*g, p));
            }
        }
    }
    Ok(Solution { pairs })
}
