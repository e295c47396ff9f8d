#![allow(clippy::multiple_crate_versions)]

//! Tabsplit command-line entry point.

fn main() {
    tabsplit_lib::logging::init();

    if let Err(err) = tabsplit_lib::cli::run() {
        eprintln!("tabsplit: {err}");
        std::process::exit(1);
    }
}
