//! Constraint modifiers: relaxation policies the solver uses to widen the
//! search space (spec.md §4.2).
//!
//! Three independent policy sets, each a set of package names:
//!
//! - `allow_newer[name]` relaxes upper bounds.
//! - `allow_older[name]` relaxes lower bounds.
//! - `allow_any[name]` relaxes both.

use std::collections::HashSet;

use crate::constraint::{Constraint, MultiConstraint};
use crate::requirement::Requirement;
use crate::version::Version;

/// Rewrite every primitive in `req.constraints` according to the
/// relaxation table, then re-canonicalize the result.
///
/// Applying the same policy sets twice is idempotent: a primitive that
/// already relaxed to `Any` stays `Any`, and `!=`/`*` are never rewritten.
pub fn transform_requirement<V: Version>(
    req: &Requirement<V>,
    allow_newer: &HashSet<String>,
    allow_older: &HashSet<String>,
    allow_any: &HashSet<String>,
) -> Requirement<V> {
    let newer = allow_newer.contains(req.name());
    let older = allow_older.contains(req.name());
    let any = allow_any.contains(req.name()) || (newer && older);

    let rewritten: Vec<Constraint<V>> = req
        .constraints()
        .primitives()
        .iter()
        .map(|primitive| transform_primitive(primitive, newer, older, any))
        .collect();

    Requirement::new(req.name(), MultiConstraint::new(rewritten))
}

fn transform_primitive<V: Version>(
    primitive: &Constraint<V>,
    newer: bool,
    older: bool,
    any: bool,
) -> Constraint<V> {
    if any {
        return match primitive {
            Constraint::Neq(v) => Constraint::Neq(v.clone()),
            Constraint::Any => Constraint::Any,
            _ => Constraint::Any,
        };
    }

    match primitive {
        Constraint::Any => Constraint::Any,
        Constraint::Neq(v) => Constraint::Neq(v.clone()),
        Constraint::Gt(v) => {
            if older {
                Constraint::Any
            } else {
                Constraint::Gt(v.clone())
            }
        }
        Constraint::Geq(v) => {
            if older {
                Constraint::Any
            } else {
                Constraint::Geq(v.clone())
            }
        }
        Constraint::Lt(v) => {
            if newer {
                Constraint::Any
            } else {
                Constraint::Lt(v.clone())
            }
        }
        Constraint::Leq(v) => {
            if newer {
                Constraint::Any
            } else {
                Constraint::Leq(v.clone())
            }
        }
        Constraint::Eq(v) => {
            if newer {
                Constraint::Geq(v.clone())
            } else if older {
                Constraint::Leq(v.clone())
            } else {
                Constraint::Eq(v.clone())
            }
        }
        Constraint::EnpkgUpstreamMatch(v) => {
            if newer {
                Constraint::Geq(v.clone())
            } else if older {
                Constraint::Leq(v.predecessor_of_upstream_ceiling())
            } else {
                Constraint::EnpkgUpstreamMatch(v.clone())
            }
        }
    }
}
