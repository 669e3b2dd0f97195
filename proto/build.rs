use std::{env, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let descriptor_path = out_dir.join("node_descriptor.bin");

    if env::var_os("PROTOC").is_none() {
        env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .build_server(true)
        .file_descriptor_set_path(&descriptor_path)
        .compile(&["rpc_common.proto", "fs.proto", "ui.proto"], &["."])?;

    // Only these packages may supply message types to the bridge surface.
    let descriptors = std::fs::read(&descriptor_path)?;
    let generated = codegen::Generator::new()
        .namespace("rpc_common", "crate::rpc_common")
        .namespace("fs", "crate::fs")
        .namespace("ui", "crate::ui")
        .no_argument(".rpc_common.Empty")
        .no_result(".rpc_common.Empty")
        .support("crate::invoke")
        .generate(&descriptors, "ui.Node")?;
    std::fs::write(out_dir.join("node_service.rs"), generated)?;

    println!("cargo:rerun-if-changed=rpc_common.proto");
    println!("cargo:rerun-if-changed=fs.proto");
    println!("cargo:rerun-if-changed=ui.proto");
    Ok(())
}
