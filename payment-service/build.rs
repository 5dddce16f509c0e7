fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);

    // Compile the rating server proto with a file descriptor set for reflection
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("rating_descriptor.bin"))
        .compile_protos(
            &["../proto/tourmate/rating/v1/rating.proto"],
            &["../proto"],
        )?;

    println!("cargo:rerun-if-changed=../proto/tourmate/rating/v1/rating.proto");

    Ok(())
}
