use std::error::Error;
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn Error>> {
    // Source tarballs carry no git metadata; fall back to a fixed describe string.
    if EmitBuilder::builder()
        .fail_on_error()
        .custom_build_rs(".")
        .git_describe(true, false, None)
        .emit()
        .is_err()
    {
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
    }
    Ok(())
}
