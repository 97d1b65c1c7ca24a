fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // The pyo3 extension module resolves libpython symbols at import time on macOS.
    let building_extension = std::env::var_os("CARGO_FEATURE_PYTHON").is_some();
    if building_extension && std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("macos") {
        for arg in ["-undefined", "dynamic_lookup"] {
            println!("cargo:rustc-cdylib-link-arg={arg}");
        }
    }
}
