fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping header generation");
        return;
    };
    let out_dir = std::path::Path::new(&crate_dir).join("include");

    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        println!("cargo:warning=Failed to create include directory: {e}");
        return;
    }

    let header_path = out_dir.join("mpexpr_rs.h");

    let config = match cbindgen::Config::from_file(std::path::Path::new(&crate_dir).join("cbindgen.toml")) {
        Ok(config) => config,
        Err(e) => {
            println!("cargo:warning=Failed to load cbindgen.toml: {e}");
            return;
        }
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(header_path);
        }
        Err(e) => {
            println!("cargo:warning=Unable to generate bindings: {e}");
        }
    }
}
