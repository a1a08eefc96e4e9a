use cbindgen::Config;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=src");

    // 头文件输出到 target/debug 或 target/release
    let out_dir = if cfg!(debug_assertions) {
        PathBuf::from(env::var("CARGO_TARGET_DIR").unwrap_or_else(|_| "target".into()))
            .join("debug")
    } else {
        PathBuf::from(env::var("CARGO_TARGET_DIR").unwrap_or_else(|_| "target".into()))
            .join("release")
    };

    let crate_dir =
        env::var("CARGO_MANIFEST_DIR").expect("Could not find Cargo manifest directory");

    // 没有配置文件时退回默认的 C 头文件配置
    let config = Config::from_file(PathBuf::from(&crate_dir).join("cbindgen.toml"))
        .unwrap_or_else(|e| {
            println!("cargo:warning=cbindgen.toml unavailable ({e:?}), using defaults");
            Config {
                language: cbindgen::Language::C,
                ..Config::default()
            }
        });

    // 头文件生成失败不影响库本身的构建
    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            if let Err(e) = fs::create_dir_all(&out_dir) {
                println!("cargo:warning=Unable to create {}: {e}", out_dir.display());
                return;
            }
            bindings.write_to_file(out_dir.join("byte_list.h"));
        }
        Err(e) => {
            println!("cargo:warning=Failed to generate bindings: {e:?}");
        }
    }
}
