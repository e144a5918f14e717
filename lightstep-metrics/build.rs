use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.gen.rs");
    let mut f = File::create(dest_path).unwrap();

    let target = env::var("TARGET").unwrap();
    let mut target_bits = target.split('-');
    target_bits.next();
    target_bits.next();
    let os = target_bits.next().unwrap_or("unknown");

    writeln!(f, "/// The rustc version that was used to compile this crate").ok();
    match rustc_version::version() {
        Ok(version) => writeln!(
            f,
            "pub const RUSTC_VERSION: Option<&str> = Some(\"{}\");",
            version
        ),
        Err(_) => writeln!(f, "pub const RUSTC_VERSION: Option<&str> = None;"),
    }
    .ok();

    writeln!(f, "/// The target operating system").ok();
    writeln!(f, "pub const TARGET_OS: &str = \"{}\";", os).ok();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
