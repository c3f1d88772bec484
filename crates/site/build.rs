//! Build script for the site crate.
//!
//! Generates content-based hashes for static assets (CSS and JS) so they can
//! be cached as immutable under hashed file names.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// `(path under static/, env var holding its hash)`
const ASSETS: [(&str, &str); 3] = [
    ("css/main.css", "CSS_HASH"),
    ("js/blog.js", "BLOG_JS_HASH"),
    ("js/checkout.js", "CHECKOUT_JS_HASH"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    for (asset, env_name) in ASSETS {
        hash_asset(&static_dir, asset, env_name);
    }
}

/// Hash one asset and copy it to `derived/` with the hash in its file name.
///
/// `css/main.css` with hash `1a2b3c4d` becomes `css/derived/main.1a2b3c4d.css`,
/// and `env!(env_name)` yields `1a2b3c4d`.
fn hash_asset(static_dir: &Path, asset: &str, env_name: &str) {
    let source = static_dir.join(asset);

    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {asset}: {e}");
            println!("cargo:rustc-env={env_name}=");
            return;
        }
    };

    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = format!("{:x}", hasher.finalize());
    let short_hash = &hash[..8];

    println!("cargo:rustc-env={env_name}={short_hash}");

    let source_dir = source.parent().expect("asset path has a parent directory");
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .expect("asset file name is UTF-8");
    let extension = source
        .extension()
        .and_then(|s| s.to_str())
        .expect("asset has an extension");

    let derived_dir = source_dir.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    fs::copy(&source, derived_dir.join(format!("{stem}.{short_hash}.{extension}")))
        .expect("Failed to copy asset to derived directory");
}
