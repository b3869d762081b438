//! The rule contract (spec.md §3 "Rule", §4.3 "Rule contract").
//!
//! A rule is a named, stateless descriptor whose `run` is called once per
//! file to produce a listener map; handler registration happens only at
//! that call, never mid-walk (spec.md §4.3). Grounded on the teacher's
//! `rule.rs`/`rules/prefer_impl_param.rs`, which build a `Vec<RuleListener>`
//! from a `create`/`run` closure keyed by query rather than `(kind, phase)`;
//! here the listener key is the node-kind/phase pair spec.md §3 specifies.

use std::fmt;

use crate::context::RuleContext;
use crate::syntax::{Kind, Node};

/// `Enter` (pre-order) or `Exit` (post-order), relative to child traversal
/// (spec.md §3 "Phase").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Exit,
}

/// Rules receive options as an arbitrary structured JSON value and
/// normalize it themselves in their `run` prologue (Design Notes §9:
/// "Options are structured but untyped... normalized once... the only
/// place dynamic decoding lives").
pub type RuleOptions = serde_json::Value;

/// A single `(kind, phase) -> handler` registration. `on_end_of_file`
/// rules register against `Kind::EndOfFileToken` with `Phase::Enter`
/// (spec.md §4.4 "Special synthetic event").
pub struct Listener<'a> {
    pub kind: Kind,
    pub phase: Phase,
    handler: Box<dyn Fn(Node<'a>, &RuleContext<'a>) + 'a>,
}

impl<'a> Listener<'a> {
    pub fn new(
        kind: Kind,
        phase: Phase,
        handler: impl Fn(Node<'a>, &RuleContext<'a>) + 'a,
    ) -> Self {
        Self {
            kind,
            phase,
            handler: Box::new(handler),
        }
    }

    pub fn invoke(&self, node: Node<'a>, ctx: &RuleContext<'a>) {
        (self.handler)(node, ctx)
    }
}

/// The listener map a rule's `run` returns: every `(kind, phase)` pair it
/// wants to observe for this file (spec.md §3 "Listener map").
pub struct Listeners<'a> {
    entries: Vec<Listener<'a>>,
}

impl<'a> Default for Listeners<'a> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<'a> Listeners<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        kind: Kind,
        phase: Phase,
        handler: impl Fn(Node<'a>, &RuleContext<'a>) + 'a,
    ) -> Self {
        self.entries.push(Listener::new(kind, phase, handler));
        self
    }

    pub fn on_enter(self, kind: Kind, handler: impl Fn(Node<'a>, &RuleContext<'a>) + 'a) -> Self {
        self.on(kind, Phase::Enter, handler)
    }

    pub fn on_exit(self, kind: Kind, handler: impl Fn(Node<'a>, &RuleContext<'a>) + 'a) -> Self {
        self.on(kind, Phase::Exit, handler)
    }

    /// Registers against the synthetic end-of-file event (spec.md §4.4).
    pub fn on_end_of_file(self, handler: impl Fn(Node<'a>, &RuleContext<'a>) + 'a) -> Self {
        self.on(Kind::EndOfFileToken, Phase::Enter, handler)
    }

    pub fn into_entries(self) -> Vec<Listener<'a>> {
        self.entries
    }
}

/// A rule's static metadata (spec.md §3 "Rule", §4.5 "fixable" gate used
/// by the rule tester to reject a non-fixable rule's `output` fixture).
#[derive(Debug, Clone)]
pub struct RuleMeta {
    pub name: String,
    pub fixable: bool,
}

/// A named pure checker (spec.md §3 "Rule"). Implementors carry no
/// mutable state across files — `run` is handed a fresh `RuleContext` per
/// (file, rule) invocation.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn run<'a>(&self, ctx: &RuleContext<'a>, options: &RuleOptions) -> Listeners<'a>;
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({:?})", self.meta().name)
    }
}
