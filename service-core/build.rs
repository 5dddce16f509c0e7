fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile directory-service protos (client side only).
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(
            &[
                "../proto/tourmate/user/v1/user.proto",
                "../proto/tourmate/tour/v1/tour.proto",
            ],
            &["../proto"],
        )?;

    println!("cargo:rerun-if-changed=../proto/tourmate/user/v1/user.proto");
    println!("cargo:rerun-if-changed=../proto/tourmate/tour/v1/tour.proto");

    Ok(())
}
