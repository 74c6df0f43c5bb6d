//! Per-comparison state threaded through the recursion.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::config::ContextConfig;
use crate::errors::{MatchError, Path, Reason, Segment};
use crate::value::Pointer;

/// Pointer pairs already entered during one comparison, per lax mode.
///
/// The handles are held until the comparison ends so that an address in
/// the set cannot be reused by a pointer allocated later on (Smuggle
/// output, user operators).
#[derive(Debug, Default)]
pub struct Visited {
    pairs: HashMap<(usize, usize, bool), (Pointer, Pointer)>,
}

impl Visited {
    /// Records the pair; returns `true` if it was already present.
    pub fn record(&mut self, got: &Pointer, expected: &Pointer, lax: bool) -> bool {
        let key = (got.id(), expected.id(), lax);
        if self.pairs.contains_key(&key) {
            return true;
        }
        self.pairs.insert(key, (got.clone(), expected.clone()));
        false
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Comparison context.
///
/// Cloned on every descent (`child`, `with_lax`, ...) so each branch owns
/// its path; the visited set is shared by all clones of one comparison.
#[derive(Clone)]
pub struct Context {
    pub path: Path,
    pub be_lax: bool,
    pub boolean_only: bool,
    pub max_depth: Option<usize>,
    visited: Rc<RefCell<Visited>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path.to_string())
            .field("be_lax", &self.be_lax)
            .field("boolean_only", &self.boolean_only)
            .field("visited", &self.visited.borrow().len())
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(&ContextConfig::default())
    }
}

impl Context {
    pub fn new(cfg: &ContextConfig) -> Self {
        Self {
            path: Path::new(cfg.root_name.clone()),
            be_lax: cfg.be_lax,
            boolean_only: cfg.boolean_only,
            max_depth: cfg.max_depth,
            visited: Rc::new(RefCell::new(Visited::default())),
        }
    }

    pub fn child(&self, seg: Segment) -> Self {
        let mut next = self.clone();
        next.path = self.path.push(seg);
        next
    }

    pub fn with_lax(&self, on: bool) -> Self {
        let mut next = self.clone();
        next.be_lax = on;
        next
    }

    /// A boolean-only context with a fresh visited set, used to probe
    /// candidate pairings without disturbing the caller's state.
    pub fn probe(&self) -> Self {
        Self {
            path: self.path.clone(),
            be_lax: self.be_lax,
            boolean_only: true,
            max_depth: self.max_depth,
            visited: Rc::new(RefCell::new(Visited::default())),
        }
    }

    /// Records a (got, expected) pointer pair; `true` means the pair is
    /// already being compared in the same lax mode and the cycle closes
    /// here.
    pub fn enter(&self, got: &Pointer, expected: &Pointer) -> bool {
        self.visited.borrow_mut().record(got, expected, self.be_lax)
    }

    pub fn too_deep(&self) -> bool {
        self.max_depth.is_some_and(|max| self.path.depth() > max)
    }

    /// Builds a failure at the current path, or the boolean error when no
    /// detail is wanted. `build` is not called in boolean-only mode.
    pub fn fail<F>(&self, reason: Reason, message: &str, build: F) -> MatchError
    where
        F: FnOnce(MatchError) -> MatchError,
    {
        if self.boolean_only {
            return MatchError::boolean();
        }
        build(MatchError::new(reason, message, &self.path))
    }

    pub fn fail_plain(&self, reason: Reason, message: &str) -> MatchError {
        self.fail(reason, message, |e| e)
    }
}
