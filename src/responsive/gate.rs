use std::collections::BTreeMap;

use crate::{
    foundation::core::{IdGen, RuleId},
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    responsive::media::MediaQuery,
};

/// Something that can record and later dispose of what a branch builds.
pub trait BranchHost {
    type Scope;

    /// Start recording handles created by a branch.
    fn open_scope(&mut self);

    /// Stop recording and return what was created since [`BranchHost::open_scope`].
    fn close_scope(&mut self) -> Self::Scope;

    /// Tear down everything in `scope`.
    fn dispose_scope(&mut self, scope: Self::Scope);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Branch {
    Enabled,
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BreakpointChange {
    pub rule: RuleId,
    pub branch: Branch,
    pub width: f64,
}

/// What one [`ResponsiveGate::evaluate`] pass did.
#[derive(Debug, Default)]
pub struct GateEvaluation {
    pub changes: Vec<BreakpointChange>,
    /// Rules whose branch failed to build. They have no live branch and are
    /// retried once the width changes.
    pub failures: Vec<(RuleId, ScrollweaveError)>,
}

pub type BranchFn<H> = Box<dyn FnMut(&mut H) -> ScrollweaveResult<()>>;

struct Rule<H: BranchHost> {
    query: MediaQuery,
    enable: BranchFn<H>,
    disable: BranchFn<H>,
    active: Option<(Branch, H::Scope)>,
    failed: Option<(Branch, f64)>,
}

/// Breakpoint rules, each with exactly one branch live once evaluated.
pub struct ResponsiveGate<H: BranchHost> {
    rules: BTreeMap<RuleId, Rule<H>>,
    ids: IdGen,
}

impl<H: BranchHost> Default for ResponsiveGate<H> {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
            ids: IdGen::default(),
        }
    }
}

impl<H: BranchHost> std::fmt::Debug for ResponsiveGate<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsiveGate")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<H: BranchHost> ResponsiveGate<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Neither branch runs until the next [`ResponsiveGate::evaluate`].
    pub fn on_breakpoint_change(
        &mut self,
        query: MediaQuery,
        enable: impl FnMut(&mut H) -> ScrollweaveResult<()> + 'static,
        disable: impl FnMut(&mut H) -> ScrollweaveResult<()> + 'static,
    ) -> RuleId {
        let id = RuleId(self.ids.next());
        self.rules.insert(
            id,
            Rule {
                query,
                enable: Box::new(enable),
                disable: Box::new(disable),
                active: None,
                failed: None,
            },
        );
        id
    }

    /// Forget a rule; the live branch's scope is handed back for disposal.
    pub fn remove(&mut self, id: RuleId) -> Option<H::Scope> {
        self.rules
            .remove(&id)
            .and_then(|r| r.active.map(|(_, scope)| scope))
    }

    pub fn contains(&self, id: RuleId) -> bool {
        self.rules.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn branch(&self, id: RuleId) -> Option<Branch> {
        self.rules
            .get(&id)
            .and_then(|r| r.active.as_ref().map(|(b, _)| *b))
    }

    /// An empty gate whose ids continue after this one's.
    ///
    /// Stands in for a gate that is being evaluated, so rules registered by a
    /// running branch can be [`absorbed`](ResponsiveGate::absorb) afterwards.
    pub fn successor(&self) -> Self {
        Self {
            rules: BTreeMap::new(),
            ids: self.ids.clone(),
        }
    }

    /// Move rules added to `other` into this gate, keeping their ids.
    pub fn absorb(&mut self, other: Self) {
        self.ids.reserve(other.ids.peek_last());
        self.rules.extend(other.rules);
    }

    /// Bring every rule in line with `width`.
    ///
    /// A switching rule disposes its old branch completely before the new one
    /// builds. Rules already on the right branch are untouched. A failing
    /// branch is torn down and reported without affecting the other rules.
    pub fn evaluate(&mut self, width: f64, host: &mut H) -> GateEvaluation {
        let mut out = GateEvaluation::default();
        for (&id, rule) in self.rules.iter_mut() {
            let want = if rule.query.matches(width) {
                Branch::Enabled
            } else {
                Branch::Disabled
            };
            if rule.active.as_ref().map(|(b, _)| *b) == Some(want)
                || rule.failed == Some((want, width))
            {
                continue;
            }
            if let Some((_, scope)) = rule.active.take() {
                host.dispose_scope(scope);
            }
            tracing::debug!(%id, query = %rule.query, width, branch = ?want, "breakpoint branch switch");
            host.open_scope();
            let built = match want {
                Branch::Enabled => (rule.enable)(host),
                Branch::Disabled => (rule.disable)(host),
            };
            let scope = host.close_scope();
            match built {
                Ok(()) => {
                    rule.active = Some((want, scope));
                    rule.failed = None;
                    out.changes.push(BreakpointChange {
                        rule: id,
                        branch: want,
                        width,
                    });
                }
                Err(e) => {
                    host.dispose_scope(scope);
                    rule.failed = Some((want, width));
                    out.failures.push((id, e));
                }
            }
        }
        out
    }

    /// Remove every rule, returning the live scopes for disposal.
    pub fn drain(&mut self) -> Vec<H::Scope> {
        std::mem::take(&mut self.rules)
            .into_values()
            .filter_map(|r| r.active.map(|(_, scope)| scope))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/responsive/gate.rs"]
mod tests;
