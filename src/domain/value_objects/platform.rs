//! Host platform identity
//!
//! Architecture names, the default runtime identifier and the runtime
//! loader's file name, as the managed runtime spells them.

use std::env::consts;

/// Architecture directory name used by servicing and package-cache layouts
pub fn host_arch() -> &'static str {
    match consts::ARCH {
        "x86_64" => "x64",
        "x86" => "x86",
        "aarch64" => "arm64",
        "arm" => "arm",
        other => other,
    }
}

fn os_prefix() -> &'static str {
    match consts::OS {
        "windows" => "win",
        "macos" => "osx",
        "freebsd" => "freebsd",
        _ => "linux",
    }
}

/// Runtime identifier of the running host (e.g. `linux-x64`)
pub fn host_rid() -> String {
    format!("{}-{}", os_prefix(), host_arch())
}

/// File name of the runtime loader library on this platform
pub fn runtime_loader_file_name() -> &'static str {
    if cfg!(windows) {
        "coreclr.dll"
    } else if cfg!(target_os = "macos") {
        "libcoreclr.dylib"
    } else {
        "libcoreclr.so"
    }
}
