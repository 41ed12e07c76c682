use log::info;

/// Versions des crates principales, injectées par `build.rs`.
pub fn core_dependency_versions() -> [(&'static str, &'static str); 3] {
    [
        ("GL", option_env!("GL").unwrap_or("Unknown")),
        ("GLFW", option_env!("GLFW").unwrap_or("Unknown")),
        ("RAND", option_env!("RAND").unwrap_or("Unknown")),
    ]
}

/// Affiche les informations Rust et les dépendances principales de la compilation.
pub fn show_rust_core_dependencies() {
    info!(
        "Rust compiler version: {}",
        rustc_version_runtime::version()
    );
    info!("  Platform    : {}", std::env::consts::OS);
    info!("  Arch        : {}", std::env::consts::ARCH);

    info!("Rust core dependancies");
    for (name, version) in core_dependency_versions() {
        info!("  {:<4} version: {}", name, version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_rust_core_dependencies_no_panic() {
        show_rust_core_dependencies();
    }

    #[test]
    fn test_core_dependency_versions_are_filled() {
        // build.rs injecte les trois versions depuis cargo_metadata
        for (name, version) in core_dependency_versions() {
            assert_ne!(version, "Unknown", "{} version not injected by build.rs", name);
            assert!(version.starts_with(|c: char| c.is_ascii_digit()), "{} = {}", name, version);
        }
    }
}
