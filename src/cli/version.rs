//! Version flag handler

/// Version string reported in the banner and by `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display version information
pub fn display_version() {
    println!("kasba {}", VERSION);
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
    println!("  Repository: {}", env!("CARGO_PKG_REPOSITORY"));
}
