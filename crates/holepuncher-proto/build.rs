//! Build script for holepuncher-proto
//!
//! Compiles protobuf definitions using prost-build. Descriptors are produced
//! by protox, so no `protoc` binary is required.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_root = "../../proto";

    let protos = ["holepuncher/v1/holepuncher.proto"];

    let proto_paths: Vec<_> = protos
        .iter()
        .map(|p| format!("{proto_root}/{p}"))
        .collect();

    for path in &proto_paths {
        println!("cargo:rerun-if-changed={path}");
    }

    let file_descriptors = protox::compile(&proto_paths, [proto_root])?;
    prost_build::Config::new().compile_fds(file_descriptors)?;

    Ok(())
}
