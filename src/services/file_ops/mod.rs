pub mod meta_ini;

pub use meta_ini::MetaIni;

#[cfg(test)]
#[path = "tests/meta_ini_tests.rs"]
mod meta_ini_tests;
