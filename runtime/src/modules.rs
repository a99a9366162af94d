//! Startup coordinator
//!
//! [`Runtime::boot`] is the single place where the routine registry gets
//! populated. It links, in this order:
//! 1. the builtin modules, in [`BUILTIN_MODULES`] order
//! 2. extension modules submitted with [`submit_module!`](crate::submit_module),
//!    sorted by module name
//! 3. modules passed explicitly to [`Runtime::boot_with`]
//!
//! then walks the chain once (register pass, then query pass). The chain
//! starts at the most recently linked module, so later modules register
//! first. Registrations with disjoint names never depend on that order.
//!
//! The booted [`Runtime`] is immutable; share it by reference or `Arc`.

use brisk_plugin::{Initializer, InitializerChain, QueryReport};
use log::{debug, info, warn};

use crate::registry::{NativeFn, NativeRegistry, RegistryError};
use crate::value::BoxedValue;
use crate::{convert, text};

/// Builtin modules, linked first to last.
pub const BUILTIN_MODULES: &[Initializer<NativeRegistry>] = &[convert::MODULE, text::MODULE];

/// Module contributed by another crate.
pub struct ExtensionModule(pub Initializer<NativeRegistry>);

inventory::collect!(ExtensionModule);

/// Submit an extension module to every runtime booted in this process.
///
/// ```rust,ignore
/// fn register(registry: &mut NativeRegistry) {
///     registry.register("lengthOf", "[^i,v,l]", length_of);
/// }
///
/// brisk_runtime::submit_module!(Initializer::register_only("lists", register));
/// ```
#[macro_export]
macro_rules! submit_module {
    ($init:expr) => {
        $crate::inventory::submit! {
            $crate::modules::ExtensionModule($init)
        }
    };
}

/// Link every module into a fresh chain, in boot order.
pub fn build_chain(extra: &[Initializer<NativeRegistry>]) -> InitializerChain<NativeRegistry> {
    let mut chain = InitializerChain::new();

    for init in BUILTIN_MODULES {
        chain.link(*init);
    }

    let mut extensions: Vec<Initializer<NativeRegistry>> = inventory::iter::<ExtensionModule>
        .into_iter()
        .map(|module| module.0)
        .collect();
    extensions.sort_by_key(|init| init.name);
    for init in extensions {
        chain.link(init);
    }

    for init in extra {
        chain.link(*init);
    }

    chain
}

/// Populated, read-only runtime
pub struct Runtime {
    registry: NativeRegistry,
    modules: Vec<&'static str>,
    report: QueryReport,
}

impl Runtime {
    pub fn boot() -> Runtime {
        Self::boot_with(&[])
    }

    pub fn boot_with(extra: &[Initializer<NativeRegistry>]) -> Runtime {
        let chain = build_chain(extra);
        let modules = chain.names();
        debug!("booting runtime with modules {:?}", modules);

        let mut registry = NativeRegistry::new();
        let report = chain.run(&mut registry);

        if report.is_ok() {
            info!(
                "runtime ready: {} module(s), {} routine(s)",
                modules.len(),
                registry.len()
            );
        } else {
            warn!(
                "runtime booted with {} failing module quer{}",
                report.failures.len(),
                if report.failures.len() == 1 { "y" } else { "ies" }
            );
        }

        Runtime {
            registry,
            modules,
            report,
        }
    }

    pub fn registry(&self) -> &NativeRegistry {
        &self.registry
    }

    pub fn lookup(&self, name: &str, signature: &str) -> Option<NativeFn> {
        self.registry.lookup(name, signature)
    }

    pub fn call(
        &self,
        name: &str,
        signature: &str,
        args: &[BoxedValue],
    ) -> Result<BoxedValue, RegistryError> {
        self.registry.call(name, signature, args)
    }

    /// Module names in the order their register callbacks ran.
    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    pub fn query_report(&self) -> &QueryReport {
        &self.report
    }
}
