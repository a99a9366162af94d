//! Initializer chain
//!
//! Every runtime module contributes one [`Initializer`]: a register callback
//! that fills the routine registry and a query callback that inspects the
//! registry once everything has been registered.
//!
//! Linking pushes a record at the head of a singly linked list, so a walk
//! visits the most recently linked module first. Walking consumes the chain;
//! a chain can never be run twice.

use log::{debug, trace, warn};

/// Register callback: adds entries to the startup context.
pub type RegisterFn<C> = fn(&mut C);

/// Query callback: post-registration introspection over the populated context.
pub type QueryFn<C> = fn(&C) -> Result<(), String>;

/// One module's pair of startup callbacks.
pub struct Initializer<C> {
    pub name: &'static str,
    pub register: RegisterFn<C>,
    pub query: QueryFn<C>,
}

impl<C> Initializer<C> {
    pub const fn new(name: &'static str, register: RegisterFn<C>, query: QueryFn<C>) -> Self {
        Self {
            name,
            register,
            query,
        }
    }

    /// Initializer without a query step.
    pub const fn register_only(name: &'static str, register: RegisterFn<C>) -> Self {
        Self {
            name,
            register,
            query: no_query::<C>,
        }
    }
}

// Manual impls: derive would require `C: Clone`.
impl<C> Clone for Initializer<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Initializer<C> {}

impl<C> std::fmt::Debug for Initializer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Initializer").field("name", &self.name).finish()
    }
}

fn no_query<C>(_: &C) -> Result<(), String> {
    Ok(())
}

/// A linked record. `next` points at the record linked before this one.
struct InitializerRecord<C> {
    init: Initializer<C>,
    next: Option<Box<InitializerRecord<C>>>,
}

/// Outcome of a query pass: module names paired with their failure message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryReport {
    pub queried: usize,
    pub failures: Vec<(&'static str, String)>,
}

impl QueryReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Process startup chain of module initializers.
pub struct InitializerChain<C> {
    head: Option<Box<InitializerRecord<C>>>,
    len: usize,
}

impl<C> InitializerChain<C> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Link an initializer at the head of the chain.
    ///
    /// Names are labels only: a second module with an already linked name is
    /// still linked and still registers.
    pub fn link(&mut self, init: Initializer<C>) {
        if self.contains(init.name) {
            warn!("initializer '{}' is linked more than once", init.name);
        }

        trace!("linking initializer '{}'", init.name);
        let next = self.head.take();
        self.head = Some(Box::new(InitializerRecord { init, next }));
        self.len += 1;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|init| init.name == name)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Initializers in walk order (most recently linked first).
    pub fn iter(&self) -> impl Iterator<Item = &Initializer<C>> + '_ {
        let mut cursor = self.head.as_deref();
        std::iter::from_fn(move || {
            let record = cursor?;
            cursor = record.next.as_deref();
            Some(&record.init)
        })
    }

    /// Names in walk order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|init| init.name).collect()
    }

    /// Run every register callback exactly once, most recently linked first.
    ///
    /// Returns the initializers in the order they ran so the caller can run
    /// the query pass later with [`run_queries`].
    pub fn run_registration(mut self, ctx: &mut C) -> Vec<Initializer<C>> {
        let mut ran = Vec::with_capacity(self.len);
        let mut cursor = self.head.take();

        while let Some(record) = cursor {
            let InitializerRecord { init, next } = *record;
            debug!("registering module '{}'", init.name);
            (init.register)(ctx);
            ran.push(init);
            cursor = next;
        }

        ran
    }

    /// Register pass followed by the query pass.
    pub fn run(self, ctx: &mut C) -> QueryReport {
        let ran = self.run_registration(ctx);
        run_queries(&ran, ctx)
    }
}

impl<C> Default for InitializerChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Drop for InitializerChain<C> {
    // Unlink iteratively so a long chain cannot overflow the stack.
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut record) = cursor {
            cursor = record.next.take();
        }
    }
}

/// Query pass over initializers that already ran their register step.
pub fn run_queries<C>(ran: &[Initializer<C>], ctx: &C) -> QueryReport {
    let mut report = QueryReport::default();

    for init in ran {
        report.queried += 1;
        if let Err(message) = (init.query)(ctx) {
            warn!("query for module '{}' failed: {}", init.name, message);
            report.failures.push((init.name, message));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_r1(log: &mut Vec<&'static str>) {
        log.push("r1");
    }

    fn push_r2(log: &mut Vec<&'static str>) {
        log.push("r2");
    }

    fn push_r3(log: &mut Vec<&'static str>) {
        log.push("r3");
    }

    fn needs_r1(log: &Vec<&'static str>) -> Result<(), String> {
        if log.contains(&"r1") {
            Ok(())
        } else {
            Err("r1 missing".to_string())
        }
    }

    fn always_fails(_: &Vec<&'static str>) -> Result<(), String> {
        Err("broken".to_string())
    }

    #[test]
    fn test_walk_runs_most_recent_first() {
        let mut chain = InitializerChain::new();
        chain.link(Initializer::register_only("r1", push_r1));
        chain.link(Initializer::register_only("r2", push_r2));
        chain.link(Initializer::register_only("r3", push_r3));

        assert_eq!(chain.names(), vec!["r3", "r2", "r1"]);

        let mut log = Vec::new();
        let report = chain.run(&mut log);
        assert_eq!(log, vec!["r3", "r2", "r1"]);
        assert!(report.is_ok());
        assert_eq!(report.queried, 3);
    }

    #[test]
    fn test_shared_name_still_registers() {
        let mut chain = InitializerChain::new();
        chain.link(Initializer::register_only("r1", push_r1));
        chain.link(Initializer::register_only("r1", push_r2));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.names(), vec!["r1", "r1"]);

        let mut log = Vec::new();
        let report = chain.run(&mut log);
        assert_eq!(log, vec!["r2", "r1"]);
        assert_eq!(report.queried, 2);
    }

    #[test]
    fn test_queries_run_after_all_registrations() {
        let mut chain = InitializerChain::new();
        chain.link(Initializer::register_only("r1", push_r1));
        // Linked last, so it registers first; its query still sees r1.
        chain.link(Initializer::new("r2", push_r2, needs_r1));

        let mut log = Vec::new();
        let report = chain.run(&mut log);
        assert!(report.is_ok());
    }

    #[test]
    fn test_query_failures_are_collected() {
        let mut chain = InitializerChain::new();
        chain.link(Initializer::new("bad", push_r1, always_fails));
        chain.link(Initializer::register_only("good", push_r2));

        let mut log = Vec::new();
        let report = chain.run(&mut log);
        assert!(!report.is_ok());
        assert_eq!(report.failures, vec![("bad", "broken".to_string())]);
    }

    #[test]
    fn test_empty_chain() {
        let chain: InitializerChain<Vec<&'static str>> = InitializerChain::default();
        assert!(chain.is_empty());
        let mut log = Vec::new();
        let report = chain.run(&mut log);
        assert_eq!(report.queried, 0);
        assert!(log.is_empty());
    }
}
