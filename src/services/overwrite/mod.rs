pub mod resolver;

pub use resolver::{
    ensure_valid_mod_name, resolve_target, OverwriteOptions, ResolvedTarget, TargetState,
};

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod resolver_tests;
